//! Order domain module.
//!
//! Orders, cart line items, payment methods and delivery details.

mod aggregate;
mod delivery;
mod line_item;
mod payment_method;

pub use aggregate::{Order, OrderStatus};
pub use delivery::{
    DeliveryAddress, DeliveryInfo, DeliveryType, DEFAULT_COUNTRY, MIN_CITY_LEN, MIN_DISTRICT_LEN,
    MIN_STREET_LEN,
};
pub use line_item::{ModifierLine, OrderLineItem};
pub use payment_method::PaymentMethod;
