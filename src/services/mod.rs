pub mod analysis_service;
pub mod comprehensive_ai_service;
pub mod generation_guard;
pub mod label_classifier;
pub mod llm_service;
pub mod prompt_builder;
pub mod quarter_ai_service;
pub mod score_engine;
pub mod summary;
pub mod trend_analyzer;
