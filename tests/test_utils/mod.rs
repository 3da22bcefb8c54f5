pub mod scripted_transport;

pub use scripted_transport::{Reply, ScriptedTransport};
