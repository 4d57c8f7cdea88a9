//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the conversation core and its collaborators. Adapters implement these
//! ports.
//!
//! - `SessionRepository` - Durable session backend with atomic insert-if-absent
//! - `CatalogLookup` - Product, presentation and modifier lookups
//! - `OrderStore` - Order persistence
//! - `MessageTransport` - Outbound chat delivery

mod catalog_lookup;
mod message_transport;
mod order_store;
mod session_repository;

pub use catalog_lookup::{CatalogError, CatalogLookup};
pub use message_transport::{DeliveryAck, MessageTransport, TransportError};
pub use order_store::{OrderStore, OrderStoreError};
pub use session_repository::{GetOrCreate, SessionRepository, SessionStoreError};
