//! Adapters - Implementations of port interfaces.
//!
//! - `storage` - session repository
//! - `catalog` - product catalog lookup
//! - `orders` - order store
//! - `transport` - reply delivery (console, recording)

pub mod catalog;
pub mod orders;
pub mod storage;
pub mod transport;

pub use catalog::{CatalogSeedError, InMemoryCatalog};
pub use orders::InMemoryOrderStore;
pub use storage::InMemorySessionRepository;
pub use transport::{ConsoleTransport, RecordingTransport, SentMessage};
