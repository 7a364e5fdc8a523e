use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::polarity::{Category, PolarityResult};

// ---------------------------------------------------------------------------
// AuthorRole
// ---------------------------------------------------------------------------

/// Who wrote a review. Each role rates on its own native scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRole {
    /// Professional critic, rating on 0–100.
    Critic,
    /// End user, rating on 0–10.
    User,
}

impl AuthorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorRole::Critic => "critic",
            AuthorRole::User => "user",
        }
    }

    /// Factor that maps this role's native scale onto 0–100.
    pub fn scale_factor(&self) -> f64 {
        match self {
            AuthorRole::Critic => 1.0,
            AuthorRole::User => 10.0,
        }
    }

    /// Map a native-scale rating onto the shared 0–100 scale.
    ///
    /// Values outside the native range are clamped after scaling.
    pub fn normalize_rating(&self, native: f64) -> f64 {
        (native * self.scale_factor()).clamp(0.0, 100.0)
    }
}

impl std::fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AuthorRole {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critic" => AuthorRole::Critic,
            _ => AuthorRole::User, // graceful fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// One ingested review.
///
/// `text` and `rating` are optional: a review with missing text or an
/// unparseable rating is still carried through the batch, it simply yields
/// empty or absent derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Stable unique identifier (UUIDv4) assigned at ingestion.
    pub id: Uuid,
    /// Title of the reviewed subject (e.g. the game name).
    pub subject: String,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub role: AuthorRole,
    /// Raw review text as supplied.
    pub text: Option<String>,
    /// Rating on the role's native scale.
    pub rating: Option<f64>,
    /// Rating mapped onto 0–100.
    pub normalized_rating: Option<f64>,
}

impl Review {
    /// Build a review, deriving the normalized rating from `role`.
    pub fn new(
        subject: impl Into<String>,
        role: AuthorRole,
        text: Option<String>,
        rating: Option<f64>,
    ) -> Self {
        let rating = rating.filter(|r| r.is_finite());
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            developer: None,
            publisher: None,
            role,
            text,
            rating,
            normalized_rating: rating.map(|r| role.normalize_rating(r)),
        }
    }

    pub fn with_studio(mut self, developer: Option<String>, publisher: Option<String>) -> Self {
        self.developer = developer;
        self.publisher = publisher;
        self
    }

    /// Review text, or `None` when missing or blank.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// AnalyzedReview
// ---------------------------------------------------------------------------

/// A review plus every field derived by one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedReview {
    pub review: Review,
    /// Normalized lemma stream (bag-of-words export only).
    pub tokens: Vec<String>,
    /// Overall polarity under the tuned lexicon.
    pub polarity: PolarityResult,
    /// One entry per defined aspect; `None` means no sentence mentioned it.
    pub aspects: BTreeMap<String, Option<f64>>,
}

impl AnalyzedReview {
    /// Space-joined token stream.
    pub fn processed_text(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn category(&self) -> Category {
        self.polarity.category
    }

    /// Number of aspects that received at least one piece of evidence.
    pub fn scored_aspect_count(&self) -> usize {
        self.aspects.values().filter(|v| v.is_some()).count()
    }
}
