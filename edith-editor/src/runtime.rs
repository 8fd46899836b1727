use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::bridge::Bridge;
use crate::instance::EditorInstance;
use crate::keys::KeyPress;
use crate::protocol::BridgeCall;
use crate::sink::MessageSink;

/// Everything that reaches the bridge after startup: host calls and widget
/// notifications, in one ordered stream.
#[derive(Debug)]
pub enum Inbound {
    Call {
        call: BridgeCall,
        reply: Option<oneshot::Sender<Value>>,
    },
    ContentChanged,
    CursorMoved {
        line: u32,
        column: u32,
    },
    KeyPressed(KeyPress),
}

/// Cheap, cloneable sender into a running bridge.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    tx: mpsc::UnboundedSender<Inbound>,
}

pub fn channel() -> (BridgeHandle, mpsc::UnboundedReceiver<Inbound>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BridgeHandle { tx }, rx)
}

impl BridgeHandle {
    fn send(&self, message: Inbound) {
        if self.tx.send(message).is_err() {
            log::debug!("Bridge has stopped; dropping inbound message");
        }
    }

    /// Fire-and-forget call.
    pub fn call(&self, call: BridgeCall) {
        self.send(Inbound::Call { call, reply: None });
    }

    /// Call and wait for the result. `None` if the bridge stopped first.
    pub async fn query(&self, call: BridgeCall) -> Option<Value> {
        let (reply, rx) = oneshot::channel();
        self.send(Inbound::Call {
            call,
            reply: Some(reply),
        });
        rx.await.ok()
    }

    pub fn content_changed(&self) {
        self.send(Inbound::ContentChanged);
    }

    pub fn cursor_moved(&self, line: u32, column: u32) {
        self.send(Inbound::CursorMoved { line, column });
    }

    pub fn key_pressed(&self, press: KeyPress) {
        self.send(Inbound::KeyPressed(press));
    }
}

/// Drive `bridge` on the current task until every [`BridgeHandle`] is gone.
///
/// `editor` resolves when the widget finishes its asynchronous construction;
/// it is checked before inbound messages so a construction and a call that
/// become ready together attach first. If construction is abandoned the
/// bridge keeps running and never becomes ready.
pub async fn run<E, S>(
    mut bridge: Bridge<E, S>,
    mut editor: oneshot::Receiver<E>,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
) -> Bridge<E, S>
where
    E: EditorInstance,
    S: MessageSink,
{
    let mut constructed = false;
    loop {
        tokio::select! {
            biased;

            created = &mut editor, if !constructed => {
                constructed = true;
                match created {
                    Ok(instance) => bridge.attach(instance),
                    Err(_) => log::warn!("Editor construction was abandoned"),
                }
            }
            message = inbound.recv() => match message {
                Some(message) => handle(&mut bridge, message).await,
                None => break,
            },
        }
    }
    log::debug!("Bridge stopped");
    bridge
}

async fn handle<E, S>(bridge: &mut Bridge<E, S>, message: Inbound)
where
    E: EditorInstance,
    S: MessageSink,
{
    match message {
        Inbound::Call { call, reply } => {
            let result = bridge.dispatch(call).await;
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
        }
        Inbound::ContentChanged => bridge.content_changed(),
        Inbound::CursorMoved { line, column } => bridge.cursor_moved(line, column),
        Inbound::KeyPressed(press) => {
            bridge.key_pressed(&press);
        }
    }
}
