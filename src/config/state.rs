// Application state module
// Immutable state shared by every connection task

use std::sync::Arc;

use super::types::Config;
use crate::clock::{Clock, SystemClock};
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create `AppState` reading the system wall clock
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create `AppState` with an explicit clock capability
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            routes: RouteTable::default(),
            clock,
        }
    }
}
