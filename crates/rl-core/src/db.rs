use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::culprit::{CulpritWord, Direction};
use crate::error::{Result, RlError};
use crate::polarity::Category;
use crate::review::{AnalyzedReview, AuthorRole};
use crate::schema::{run_migrations, SCHEMA_VERSION};

// ---------------------------------------------------------------------------
// Pool type alias
// ---------------------------------------------------------------------------

pub type DbPool = Pool<SqliteConnectionManager>;

// ---------------------------------------------------------------------------
// Pool constructors
// ---------------------------------------------------------------------------

/// Open a connection pool backed by a file-based SQLite database.
pub fn create_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(8)
        .build(manager)
        .map_err(|e| RlError::Internal(e.to_string()))?;

    let conn = pool.get().map_err(|e| RlError::Internal(e.to_string()))?;
    run_migrations(&conn)?;

    Ok(pool)
}

/// Open a connection pool backed by an in-memory SQLite database.
///
/// The pool is capped at one connection: every `:memory:` connection is a
/// separate database.
pub fn create_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| RlError::Internal(e.to_string()))?;

    let conn = pool.get().map_err(|e| RlError::Internal(e.to_string()))?;
    run_migrations(&conn)?;

    Ok(pool)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Metadata for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Fingerprint of the pristine lexicon the audit ran against.
    pub base_fingerprint: String,
    /// Fingerprint of the tuned lexicon used for final scoring.
    pub tuned_fingerprint: String,
    pub override_count: usize,
    pub review_count: usize,
    pub false_negatives: usize,
    pub false_positives: usize,
    /// `sentence_split` or `whole_document`.
    pub sentence_strategy: String,
}

/// Scores of one stored review, as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScore {
    pub review_id: Uuid,
    pub subject: String,
    pub role: AuthorRole,
    pub normalized_rating: Option<f64>,
    pub compound: f64,
    pub category: Category,
    pub aspects: BTreeMap<String, Option<f64>>,
}

// ---------------------------------------------------------------------------
// ResultStore trait
// ---------------------------------------------------------------------------

/// Persistence interface for analysis runs and their outputs.
pub trait ResultStore: Send + Sync {
    fn insert_run(&self, run: &RunRecord) -> Result<()>;
    fn get_run(&self, id: &Uuid) -> Result<RunRecord>;
    fn insert_reviews(&self, run_id: &Uuid, reviews: &[AnalyzedReview]) -> Result<()>;
    fn get_scores(&self, run_id: &Uuid) -> Result<Vec<StoredScore>>;
    fn insert_culprits(&self, run_id: &Uuid, direction: Direction, words: &[CulpritWord]) -> Result<()>;
    fn get_culprits(&self, run_id: &Uuid, direction: Direction) -> Result<Vec<CulpritWord>>;

    /// Write a whole run atomically: either every row lands or none does.
    fn insert_output(
        &self,
        run: &RunRecord,
        reviews: &[AnalyzedReview],
        fn_culprits: &[CulpritWord],
        fp_culprits: &[CulpritWord],
    ) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SqliteResultStore
// ---------------------------------------------------------------------------

pub struct SqliteResultStore {
    pool: DbPool,
}

impl SqliteResultStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| RlError::Internal(e.to_string()))
    }
}

fn parse_uuid(idx: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    let id_str: String = row.get(0)?;
    let started_at_str: String = row.get(1)?;
    let started_at = DateTime::parse_from_rfc3339(&started_at_str)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(RunRecord {
        id: parse_uuid(0, &id_str)?,
        started_at,
        base_fingerprint: row.get(2)?,
        tuned_fingerprint: row.get(3)?,
        override_count: row.get::<_, i64>(4)? as usize,
        review_count: row.get::<_, i64>(5)? as usize,
        false_negatives: row.get::<_, i64>(6)? as usize,
        false_positives: row.get::<_, i64>(7)? as usize,
        sentence_strategy: row.get(8)?,
    })
}

// Statement bodies shared by the single-table methods and `insert_output`.
// They take a plain connection so a caller's transaction can be passed in.

fn write_run(conn: &rusqlite::Connection, run: &RunRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO runs
            (id, schema_version, started_at, base_fingerprint, tuned_fingerprint,
             override_count, review_count, false_negatives, false_positives,
             sentence_strategy)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            run.id.to_string(),
            SCHEMA_VERSION,
            run.started_at.to_rfc3339(),
            run.base_fingerprint,
            run.tuned_fingerprint,
            run.override_count as i64,
            run.review_count as i64,
            run.false_negatives as i64,
            run.false_positives as i64,
            run.sentence_strategy,
        ],
    )?;
    Ok(())
}

fn write_reviews(conn: &rusqlite::Connection, run_id: &Uuid, reviews: &[AnalyzedReview]) -> Result<()> {
    let run_id = run_id.to_string();
    let mut review_stmt = conn.prepare_cached(
        "INSERT INTO reviews
            (id, run_id, seq, subject, developer, publisher, role, raw_text,
             rating, normalized_rating, processed_text, compound, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    let mut aspect_stmt = conn.prepare_cached(
        "INSERT INTO aspect_scores (run_id, review_id, aspect, score) VALUES (?1, ?2, ?3, ?4)",
    )?;

    for (seq, analyzed) in reviews.iter().enumerate() {
        let r = &analyzed.review;
        let review_id = r.id.to_string();
        review_stmt.execute(params![
            review_id,
            run_id,
            seq as i64,
            r.subject,
            r.developer,
            r.publisher,
            r.role.as_str(),
            r.text,
            r.rating,
            r.normalized_rating,
            analyzed.processed_text(),
            analyzed.polarity.compound,
            analyzed.polarity.category.as_str(),
        ])?;
        for (aspect, score) in &analyzed.aspects {
            aspect_stmt.execute(params![run_id, review_id, aspect, score])?;
        }
    }
    Ok(())
}

fn write_culprits(
    conn: &rusqlite::Connection,
    run_id: &Uuid,
    direction: Direction,
    words: &[CulpritWord],
) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO culprit_words (run_id, direction, rank, word, weight, count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (rank, w) in words.iter().enumerate() {
        stmt.execute(params![
            run_id.to_string(),
            direction.as_str(),
            rank as i64,
            w.word,
            w.weight,
            w.count as i64,
        ])?;
    }
    Ok(())
}

impl ResultStore for SqliteResultStore {
    fn insert_run(&self, run: &RunRecord) -> Result<()> {
        let conn = self.conn()?;
        write_run(&conn, run)
    }

    fn get_run(&self, id: &Uuid) -> Result<RunRecord> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, started_at, base_fingerprint, tuned_fingerprint, override_count,
                    review_count, false_negatives, false_positives, sentence_strategy
               FROM runs
              WHERE id = ?1",
            params![id.to_string()],
            row_to_run,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RlError::NotFound(format!("run {id}")),
            other => RlError::Database(other),
        })
    }

    fn insert_reviews(&self, run_id: &Uuid, reviews: &[AnalyzedReview]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_reviews(&tx, run_id, reviews)?;
        tx.commit()?;
        Ok(())
    }

    fn get_scores(&self, run_id: &Uuid) -> Result<Vec<StoredScore>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, subject, role, normalized_rating, compound, category
               FROM reviews
              WHERE run_id = ?1
              ORDER BY seq ASC",
        )?;
        let mut scores: Vec<StoredScore> = stmt
            .query_map(params![run_id.to_string()], |row| {
                let id_str: String = row.get(0)?;
                let role_str: String = row.get(2)?;
                let category_str: String = row.get(5)?;
                Ok(StoredScore {
                    review_id: parse_uuid(0, &id_str)?,
                    subject: row.get(1)?,
                    role: AuthorRole::from(role_str.as_str()),
                    normalized_rating: row.get(3)?,
                    compound: row.get(4)?,
                    category: Category::from(category_str.as_str()),
                    aspects: BTreeMap::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut aspect_stmt = conn.prepare_cached(
            "SELECT aspect, score
               FROM aspect_scores
              WHERE run_id = ?1 AND review_id = ?2
              ORDER BY aspect ASC",
        )?;
        for score in scores.iter_mut() {
            let rows = aspect_stmt
                .query_map(params![run_id.to_string(), score.review_id.to_string()], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Option<f64>>(1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            score.aspects = rows.into_iter().collect();
        }
        Ok(scores)
    }

    fn insert_culprits(&self, run_id: &Uuid, direction: Direction, words: &[CulpritWord]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_culprits(&tx, run_id, direction, words)?;
        tx.commit()?;
        Ok(())
    }

    fn get_culprits(&self, run_id: &Uuid, direction: Direction) -> Result<Vec<CulpritWord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT word, weight, count
               FROM culprit_words
              WHERE run_id = ?1 AND direction = ?2
              ORDER BY rank ASC",
        )?;
        let words = stmt
            .query_map(params![run_id.to_string(), direction.as_str()], |row| {
                Ok(CulpritWord {
                    word: row.get(0)?,
                    weight: row.get(1)?,
                    count: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    fn insert_output(
        &self,
        run: &RunRecord,
        reviews: &[AnalyzedReview],
        fn_culprits: &[CulpritWord],
        fp_culprits: &[CulpritWord],
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_run(&tx, run)?;
        write_reviews(&tx, &run.id, reviews)?;
        write_culprits(&tx, &run.id, Direction::FalseNegative, fn_culprits)?;
        write_culprits(&tx, &run.id, Direction::FalsePositive, fp_culprits)?;
        tx.commit()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
