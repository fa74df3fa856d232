//! Library entrypoint for PriceWatch.
//!
//! This file exists mainly to make tests easy (integration tests under
//! `tests/` can import the app state, registry, services and the tick
//! functions, and drive them with fake collaborators).

pub mod config;
pub mod error;
pub mod models;

pub mod services;

pub mod alert_monitor;

use std::sync::Arc;

use crate::services::monitor_registry::MonitorRegistry;
use crate::services::{Notifier, PriceSource};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub registry: Arc<MonitorRegistry>,
    pub price_source: Arc<dyn PriceSource>,
    pub notifier: Arc<dyn Notifier>,
}
