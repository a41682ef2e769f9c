use std::sync::Arc;
use ni_inference::ImpactAnalyzer;

pub struct AppState {
    pub analyzer: Arc<ImpactAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<ImpactAnalyzer>) -> Self {
        Self { analyzer }
    }
}
