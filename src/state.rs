use std::sync::Arc;

use sqlx::PgPool;

use crate::services::generation_guard::GenerationGuard;
use crate::services::llm_service::LlmProvider;

/// Windows bounding the scoring and aggregation queries.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Prior quarters fed to trend computation.
    pub trend_window: usize,
    /// Most recent analyzed quarters aggregated into the comprehensive
    /// narrative.
    pub comprehensive_window: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { trend_window: 8, comprehensive_window: 8 }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            trend_window: std::env::var("TREND_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.trend_window),
            comprehensive_window: std::env::var("COMPREHENSIVE_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.comprehensive_window),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub llm: Arc<dyn LlmProvider>,
    pub generation_guard: GenerationGuard,
    pub settings: EngineSettings,
}
