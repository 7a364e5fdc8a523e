use serde::{Deserialize, Serialize};

/// Direction of a scorer/ground-truth disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Well-rated review the scorer called negative.
    FalseNegative,
    /// Poorly-rated review the scorer called positive.
    FalsePositive,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::FalseNegative => "false_negative",
            Direction::FalsePositive => "false_positive",
        }
    }
}

impl From<&str> for Direction {
    fn from(s: &str) -> Self {
        match s {
            "false_positive" => Direction::FalsePositive,
            _ => Direction::FalseNegative,
        }
    }
}

/// A word implicated in disagreements, aggregated over the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulpritWord {
    pub word: String,
    /// Weight in the lexicon the audit ran against.
    pub weight: f64,
    /// Occurrences across all disagreeing reviews of one direction.
    pub count: usize,
}
