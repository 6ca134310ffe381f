//! Application state.

use std::sync::Arc;

use clipgif_engine::{build_pipeline, EngineConfig, EngineResult, Ingestor, ProductionPipeline};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub engine: EngineConfig,
    pub pipeline: Arc<ProductionPipeline>,
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig, engine: EngineConfig) -> EngineResult<Self> {
        let pipeline = build_pipeline(&engine)?;
        let ingestor = Ingestor::new(engine.clone());

        Ok(Self {
            config,
            engine,
            pipeline: Arc::new(pipeline),
            ingestor: Arc::new(ingestor),
        })
    }
}
