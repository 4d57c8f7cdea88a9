//! Order store adapters.

mod in_memory_order_store;

pub use in_memory_order_store::InMemoryOrderStore;
