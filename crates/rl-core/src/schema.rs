use crate::error::Result;

/// Monotonic version string recorded in every `runs` row so that readers
/// can detect when a database was created by an older build.
pub const SCHEMA_VERSION: &str = "2.0.0";

// ---------------------------------------------------------------------------
// DDL
// ---------------------------------------------------------------------------

/// Full DDL for every table and index in the result store.
///
/// All tables use `CREATE TABLE IF NOT EXISTS` so that `run_migrations` is
/// idempotent and safe to call on an already-initialised database.
pub const CREATE_TABLES: &str = "
-- -------------------------------------------------------------------------
-- runs
-- -------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS runs (
    id                   TEXT    NOT NULL PRIMARY KEY,
    schema_version       TEXT    NOT NULL,
    started_at           TEXT    NOT NULL,
    base_fingerprint     TEXT    NOT NULL,
    tuned_fingerprint    TEXT    NOT NULL,
    override_count       INTEGER NOT NULL DEFAULT 0,
    review_count         INTEGER NOT NULL DEFAULT 0,
    false_negatives      INTEGER NOT NULL DEFAULT 0,
    false_positives      INTEGER NOT NULL DEFAULT 0,
    sentence_strategy    TEXT    NOT NULL
);

-- -------------------------------------------------------------------------
-- reviews (one row per review per run; a corpus may be analyzed many times)
-- -------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS reviews (
    id                 TEXT    NOT NULL,
    run_id             TEXT    NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
    seq                INTEGER NOT NULL,
    subject            TEXT    NOT NULL,
    developer          TEXT,
    publisher          TEXT,
    role               TEXT    NOT NULL,
    raw_text           TEXT,
    rating             REAL,
    normalized_rating  REAL,
    processed_text     TEXT    NOT NULL,
    compound           REAL    NOT NULL,
    category           TEXT    NOT NULL,
    PRIMARY KEY (run_id, id)
);

CREATE INDEX IF NOT EXISTS idx_reviews_run_seq
    ON reviews (run_id, seq);

-- -------------------------------------------------------------------------
-- aspect_scores (NULL score = aspect absent for that review)
-- -------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS aspect_scores (
    run_id     TEXT NOT NULL,
    review_id  TEXT NOT NULL,
    aspect     TEXT NOT NULL,
    score      REAL,
    PRIMARY KEY (run_id, review_id, aspect),
    FOREIGN KEY (run_id, review_id) REFERENCES reviews(run_id, id) ON DELETE CASCADE
);

-- -------------------------------------------------------------------------
-- culprit_words
-- -------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS culprit_words (
    run_id     TEXT    NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
    direction  TEXT    NOT NULL,
    rank       INTEGER NOT NULL,
    word       TEXT    NOT NULL,
    weight     REAL    NOT NULL,
    count      INTEGER NOT NULL,
    PRIMARY KEY (run_id, direction, rank)
);
";

// ---------------------------------------------------------------------------
// Migration runner
// ---------------------------------------------------------------------------

/// Initialise (or upgrade) the database schema.
///
/// This function is **idempotent**: it is safe to call on a database that has
/// already been initialised.
pub fn run_migrations(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    // SQLite does not enforce foreign keys by default; every connection must
    // opt in.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute_batch(CREATE_TABLES)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
