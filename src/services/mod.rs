pub mod traits;

pub mod binance;
pub mod telegram;

pub mod monitor_registry;

pub use traits::{Notifier, PriceSource};
