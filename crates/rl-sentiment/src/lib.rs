pub mod aspect;
pub mod audit;
pub mod corrections;
pub mod lexicon;
pub mod scorer;

pub use aspect::AspectAttributor;
pub use audit::{reference_band, AuditReport, DiagnosticAuditor, Disagreement, ReferenceBand};
pub use corrections::{gaming_corrections, load_corrections};
pub use lexicon::{Lexicon, LexiconBuilder};
pub use scorer::{PolarityScorer, VaderScorer};
