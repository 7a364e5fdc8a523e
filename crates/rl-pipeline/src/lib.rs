pub mod config;
pub mod engine;
pub mod resources;
pub mod summary;

pub use config::{AnalysisConfig, AuditConfig, EngineConfig, ResourceConfig};
pub use engine::{AnalysisEngine, LexiconChoice, RunOutput};
pub use resources::Resources;
pub use summary::{summarize, RunSummary};
