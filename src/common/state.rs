use std::sync::Arc;

use crate::aggregator::OccupancyAggregator;
use crate::config::Config;
use crate::store::ReadingStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Arc<OccupancyAggregator>,
}

impl AppState {
    /// The aggregator gets its own handle on the facility layout; the layout
    /// does not change after startup.
    pub fn new(config: Config, store: Arc<dyn ReadingStore>) -> Self {
        let facility = Arc::new(config.facility.clone());

        Self {
            aggregator: Arc::new(OccupancyAggregator::new(store, facility)),
            config: Arc::new(config),
        }
    }
}
