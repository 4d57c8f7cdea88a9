//! Message transport adapters.

mod console_transport;
mod recording_transport;

pub use console_transport::ConsoleTransport;
pub use recording_transport::{RecordingTransport, SentMessage};
