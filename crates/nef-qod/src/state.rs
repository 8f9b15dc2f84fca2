use std::sync::Arc;

use nef_qod::QodSessionService;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<QodSessionService>,
    pub metrics: Arc<Metrics>,
}
