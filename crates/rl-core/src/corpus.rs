//! Corpus ingestion: flattening per-subject review listings into [`Review`]s.
//!
//! The scraped dataset is a JSON array of subjects, each carrying a critic
//! review list and a user review list. Ratings arrive as numbers, numeric
//! strings, or junk ("tbd", null); only the first two parse.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Result, RlError};
use crate::review::{AuthorRole, Review};

/// One review entry as scraped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReviewEntry {
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub score: Value,
}

/// One subject (game) with its review listings.
///
/// Every field is read leniently: a title that is not a non-blank string
/// becomes `"Unknown"`, a studio that is not a string is dropped, and a
/// listing that is not an array is empty. Listing items that are not
/// objects are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRecord {
    #[serde(rename = "Title", default = "unknown", deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(rename = "Developer", default, deserialize_with = "lenient_name")]
    pub developer: Option<String>,
    #[serde(rename = "Publisher", default, deserialize_with = "lenient_name")]
    pub publisher: Option<String>,
    #[serde(rename = "Critic Reviews Data", default, deserialize_with = "lenient_entries")]
    pub critic_reviews: Vec<RawReviewEntry>,
    #[serde(rename = "User Reviews Data", default, deserialize_with = "lenient_entries")]
    pub user_reviews: Vec<RawReviewEntry>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn lenient_title<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => unknown(),
    })
}

fn lenient_name<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_entries<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<RawReviewEntry>, D::Error> {
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Parse a scraped rating. Numbers and numeric strings parse; anything else
/// is treated as unparseable.
pub fn parse_rating(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Whether a scraped text field carries anything at all. Empty strings,
/// null, `false`, and `0` count as missing and the entry is skipped.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Flatten subjects into reviews, critic listings first, in input order.
///
/// Entries with no text are dropped. Entries whose text is present but not a
/// string are kept with `text = None` so they still flow through the batch.
pub fn flatten_subjects(subjects: &[SubjectRecord]) -> Vec<Review> {
    let mut reviews = Vec::new();
    for subject in subjects {
        let listings = [
            (AuthorRole::Critic, &subject.critic_reviews),
            (AuthorRole::User, &subject.user_reviews),
        ];
        for (role, entries) in listings {
            for entry in entries.iter().filter(|e| has_content(&e.text)) {
                let text = entry.text.as_str().map(str::to_string);
                let review = Review::new(subject.title.clone(), role, text, parse_rating(&entry.score))
                    .with_studio(subject.developer.clone(), subject.publisher.clone());
                reviews.push(review);
            }
        }
    }
    reviews
}

/// Parse a corpus document. The top level must be an array; array items
/// that are not subject objects are skipped with a warning.
pub fn parse_subjects(content: &str) -> Result<Vec<SubjectRecord>> {
    let items: Vec<Value> = serde_json::from_str(content)?;
    let mut subjects = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(index, "skipping corpus entry that is not an object");
            continue;
        }
        match serde_json::from_value::<SubjectRecord>(item) {
            Ok(subject) => subjects.push(subject),
            Err(e) => warn!(index, error = %e, "skipping malformed subject"),
        }
    }
    Ok(subjects)
}

/// Load and flatten a JSON corpus file. A missing file aborts the run.
pub fn load_corpus(path: &Path) -> Result<Vec<Review>> {
    if !path.exists() {
        return Err(RlError::CorpusMissing(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let subjects = parse_subjects(&content)?;
    let reviews = flatten_subjects(&subjects);
    info!(
        path = %path.display(),
        subjects = subjects.len(),
        reviews = reviews.len(),
        "corpus loaded"
    );
    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<SubjectRecord> {
        serde_json::from_value(json!([
            {
                "Title": "Elden Ring",
                "Developer": "FromSoftware",
                "Critic Reviews Data": [
                    {"text": "A masterpiece.", "score": 97},
                    {"text": "", "score": 90}
                ],
                "User Reviews Data": [
                    {"text": "Too hard", "score": "4"},
                    {"text": 12, "score": "tbd"}
                ]
            },
            { "Title": "Empty Game" }
        ]))
        .unwrap()
    }

    #[test]
    fn flattens_critic_then_user() {
        let reviews = flatten_subjects(&sample());
        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews[0].role, AuthorRole::Critic);
        assert_eq!(reviews[0].rating, Some(97.0));
        assert_eq!(reviews[0].developer.as_deref(), Some("FromSoftware"));
        assert_eq!(reviews[1].role, AuthorRole::User);
        assert_eq!(reviews[1].normalized_rating, Some(40.0));
    }

    #[test]
    fn non_string_text_is_kept_as_missing() {
        let reviews = flatten_subjects(&sample());
        assert_eq!(reviews[2].text, None);
        assert_eq!(reviews[2].rating, None);
    }

    #[test]
    fn parse_rating_variants() {
        assert_eq!(parse_rating(&json!(8)), Some(8.0));
        assert_eq!(parse_rating(&json!(" 7.5 ")), Some(7.5));
        assert_eq!(parse_rating(&json!("tbd")), None);
        assert_eq!(parse_rating(&Value::Null), None);
    }

    #[test]
    fn missing_title_defaults_to_unknown() {
        let subjects: Vec<SubjectRecord> =
            serde_json::from_value(json!([{ "User Reviews Data": [{"text": "fun"}] }])).unwrap();
        let reviews = flatten_subjects(&subjects);
        assert_eq!(reviews[0].subject, "Unknown");
    }

    #[test]
    fn malformed_subject_does_not_sink_the_corpus() {
        let subjects = parse_subjects(
            r#"[
                {"Title": "Hades", "User Reviews Data": [{"text": "great", "score": 9}]},
                {"Title": null, "Developer": 7,
                 "Critic Reviews Data": null,
                 "User Reviews Data": ["junk", 3, {"text": "meh", "score": 5}]},
                {"Title": "Celeste", "Critic Reviews Data": {"text": "not a list"}},
                42
            ]"#,
        )
        .unwrap();
        assert_eq!(subjects.len(), 3);
        assert_eq!(subjects[1].title, "Unknown");
        assert_eq!(subjects[1].developer, None);
        assert!(subjects[1].critic_reviews.is_empty());
        assert!(subjects[2].critic_reviews.is_empty());

        let reviews = flatten_subjects(&subjects);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].subject, "Hades");
        assert_eq!(reviews[1].subject, "Unknown");
        assert_eq!(reviews[1].text.as_deref(), Some("meh"));
    }

    #[test]
    fn corpus_that_is_not_a_list_is_an_error() {
        assert!(parse_subjects(r#"{"Title": "Hades"}"#).is_err());
    }

    #[test]
    fn missing_corpus_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_corpus(&dir.path().join("games.json")).unwrap_err();
        assert!(matches!(err, RlError::CorpusMissing(_)));
    }

    #[test]
    fn loads_corpus_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.json");
        std::fs::write(
            &path,
            r#"[{"Title":"Hades","User Reviews Data":[{"text":"great","score":9}]}]"#,
        )
        .unwrap();
        let reviews = load_corpus(&path).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].subject, "Hades");
    }
}
