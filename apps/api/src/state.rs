use std::sync::Arc;

use crate::classification::matcher::TitleClassifier;
use crate::classification::taxonomy::CategorySummary;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup from the taxonomy file; read-only afterwards.
    pub classifier: Arc<TitleClassifier>,
    pub categories: Arc<Vec<CategorySummary>>,
}
