pub mod monitor;

pub use monitor::{DEFAULT_ALERT_THRESHOLD, Monitor};
