use std::sync::Arc;

use crate::catalog::Aggregator;
use crate::config::Config;
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Arc<Aggregator>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, aggregator: Aggregator, metrics: Arc<Metrics>) -> Self {
        Self {
            config: Arc::new(config),
            aggregator: Arc::new(aggregator),
            metrics,
        }
    }
}
