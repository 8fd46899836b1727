pub mod abbreviation;
pub mod bridge;
pub mod gate;
pub mod host;
pub mod instance;
pub mod keys;
pub mod options;
pub mod protocol;
pub mod runtime;
pub mod session;
pub mod sink;

#[cfg(test)]
mod testing;

pub use bridge::Bridge;
pub use host::HostController;
pub use protocol::{BridgeCall, BridgeEvent, LineEnding};
