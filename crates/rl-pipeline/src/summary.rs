//! Aggregate view of one run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use rl_core::{AnalyzedReview, Category};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub reviews: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Mean compound over all reviews; `0.0` for an empty run.
    pub mean_compound: f64,
    /// Reviews with no usable text.
    pub missing_text: usize,
    /// Per aspect, how many reviews produced a score.
    pub aspect_coverage: BTreeMap<String, usize>,
}

pub fn summarize(reviews: &[AnalyzedReview]) -> RunSummary {
    let mut summary = RunSummary {
        reviews: reviews.len(),
        ..RunSummary::default()
    };
    let mut total = 0.0;
    for r in reviews {
        match r.category() {
            Category::Positive => summary.positive += 1,
            Category::Negative => summary.negative += 1,
            Category::Neutral => summary.neutral += 1,
        }
        total += r.polarity.compound;
        if r.review.text().is_none() {
            summary.missing_text += 1;
        }
        for (aspect, score) in &r.aspects {
            let slot = summary.aspect_coverage.entry(aspect.clone()).or_insert(0);
            if score.is_some() {
                *slot += 1;
            }
        }
    }
    if !reviews.is_empty() {
        summary.mean_compound = total / reviews.len() as f64;
    }
    summary
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} reviews: {} positive, {} negative, {} neutral (mean compound {:.4})",
            self.reviews, self.positive, self.negative, self.neutral, self.mean_compound
        )?;
        if self.missing_text > 0 {
            writeln!(f, "{} reviews without text", self.missing_text)?;
        }
        for (aspect, n) in &self.aspect_coverage {
            writeln!(f, "  {aspect:<20} {n}")?;
        }
        Ok(())
    }
}
