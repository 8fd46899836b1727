use tokio::sync::mpsc;

/// Where outbound bridge messages go (the web view's script message
/// handler). Delivery is best effort: callers drop errors.
pub trait MessageSink {
    fn post(&self, message: &str) -> Result<(), String>;
}

impl<F> MessageSink for F
where
    F: Fn(&str) -> Result<(), String>,
{
    fn post(&self, message: &str) -> Result<(), String> {
        self(message)
    }
}

/// Sink backed by an unbounded tokio channel. Posting fails once the
/// receiving side has been dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSink { tx }, rx)
    }
}

impl MessageSink for ChannelSink {
    fn post(&self, message: &str) -> Result<(), String> {
        self.tx
            .send(message.to_string())
            .map_err(|_| "message handler is not registered".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.post("one").unwrap();
        sink.post("two").unwrap();
        assert_eq!(rx.try_recv().unwrap(), "one");
        assert_eq!(rx.try_recv().unwrap(), "two");
    }

    #[test]
    fn channel_sink_fails_without_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        assert!(sink.post("lost").is_err());
    }

    #[test]
    fn closures_are_sinks() {
        let sink = |msg: &str| -> Result<(), String> { Err(format!("rejected {}", msg)) };
        assert_eq!(sink.post("x").unwrap_err(), "rejected x");
    }
}
