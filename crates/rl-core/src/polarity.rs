use serde::{Deserialize, Serialize};

/// Half-width of the neutral band around zero.
pub const NEUTRAL_THRESHOLD: f64 = 0.05;

/// Polarity bucket derived from a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Positive,
    Negative,
    Neutral,
}

impl Category {
    /// Classify a compound score. Both band edges are inclusive:
    /// `0.05` is Positive and `-0.05` is Negative.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= NEUTRAL_THRESHOLD {
            Category::Positive
        } else if compound <= -NEUTRAL_THRESHOLD {
            Category::Negative
        } else {
            Category::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "Positive",
            Category::Negative => "Negative",
            Category::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "Positive" => Category::Positive,
            "Negative" => Category::Negative,
            _ => Category::Neutral,
        }
    }
}

/// Compound score in [-1, 1] plus its category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityResult {
    pub compound: f64,
    pub category: Category,
}

impl PolarityResult {
    /// Clamp `compound` into [-1, 1] and derive the category.
    pub fn from_compound(compound: f64) -> Self {
        let compound = if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            compound,
            category: Category::from_compound(compound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(Category::from_compound(0.05), Category::Positive);
        assert_eq!(Category::from_compound(-0.05), Category::Negative);
        assert_eq!(Category::from_compound(0.0), Category::Neutral);
    }

    #[test]
    fn values_just_inside_the_band_are_neutral() {
        assert_eq!(Category::from_compound(0.0499), Category::Neutral);
        assert_eq!(Category::from_compound(-0.0499), Category::Neutral);
    }

    #[test]
    fn result_clamps_out_of_range_scores() {
        let r = PolarityResult::from_compound(1.7);
        assert_eq!(r.compound, 1.0);
        assert_eq!(r.category, Category::Positive);
    }

    #[test]
    fn nan_compound_is_neutral_zero() {
        let r = PolarityResult::from_compound(f64::NAN);
        assert_eq!(r.compound, 0.0);
        assert_eq!(r.category, Category::Neutral);
    }

    #[test]
    fn category_round_trips_through_str() {
        for c in [Category::Positive, Category::Negative, Category::Neutral] {
            assert_eq!(Category::from(c.as_str()), c);
        }
    }
}
