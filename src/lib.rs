//! Order Concierge - conversational ordering engine
//!
//! Tracks where each chat user is in a purchase journey (browsing, picking
//! items, paying, giving a delivery address, asking for support), keeps
//! their cart priced, and turns a finished conversation into an order.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
