//! Command handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use rl_core::corpus::load_corpus;
use rl_core::db::{create_pool, SqliteResultStore};
use rl_core::{Result, RlError};
use rl_pipeline::{AnalysisConfig, AnalysisEngine, LexiconChoice, Resources};

/// Resource and config flags shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ResourceArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Base lexicon file (word<TAB>weight per line)
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
    /// Correction lexicon (JSON object of word to weight)
    #[arg(long)]
    pub corrections: Option<PathBuf>,
    /// Aspect definition table (CSV with Dimension and Keywords columns)
    #[arg(long)]
    pub aspects: Option<PathBuf>,
    /// Stopword list, one word per line
    #[arg(long)]
    pub stopwords: Option<PathBuf>,
}

impl ResourceArgs {
    /// Config file values, with command-line flags taking precedence.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        let res = &mut config.resources;
        if self.lexicon.is_some() {
            res.base_lexicon = self.lexicon.clone();
        }
        if self.corrections.is_some() {
            res.corrections = self.corrections.clone();
        }
        if self.aspects.is_some() {
            res.aspects = self.aspects.clone();
        }
        if self.stopwords.is_some() {
            res.stopwords = self.stopwords.clone();
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Corpus JSON (list of titles with critic and user reviews)
    pub corpus: PathBuf,
    #[command(flatten)]
    pub resources: ResourceArgs,
    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Persist the run to this SQLite database
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
    /// Culprit rows per direction
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Corpus JSON
    pub corpus: PathBuf,
    #[command(flatten)]
    pub resources: ResourceArgs,
    /// Culprit rows per direction
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Review text
    pub text: String,
    /// Subject title whose words are removed
    #[arg(short, long)]
    pub title: Option<String>,
    #[command(flatten)]
    pub resources: ResourceArgs,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Text to score
    pub text: String,
    /// Score with the base lexicon instead of the corrected one
    #[arg(long)]
    pub pristine: bool,
    #[command(flatten)]
    pub resources: ResourceArgs,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub fn analyze(args: AnalyzeArgs) -> Result<()> {
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            run_analyze(&args, &mut out)?;
            out.flush()?;
            info!(path = %path.display(), "results written");
            Ok(())
        }
        None => run_analyze(&args, &mut io::stdout().lock()),
    }
}

pub fn run_analyze(args: &AnalyzeArgs, out: &mut dyn Write) -> Result<()> {
    let mut config = args.resources.resolve()?;
    if let Some(threads) = args.threads {
        config.engine.worker_threads = threads;
    }
    if let Some(limit) = args.limit {
        config.audit.culprit_limit = limit;
    }
    if args.db.is_some() {
        config.database = args.db.clone();
    }

    let reviews = load_corpus(&args.corpus)?;
    let engine = AnalysisEngine::new(Resources::probe(&config.resources)?, &config);
    let output = engine.analyze(&reviews)?;

    if let Some(db) = &config.database {
        let store = SqliteResultStore::new(create_pool(path_str(db)?)?);
        output.persist(&store)?;
    }

    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    eprint!("{}", output.summary());
    Ok(())
}

pub fn audit(args: AuditArgs) -> Result<()> {
    run_audit(&args, &mut io::stdout().lock())
}

pub fn run_audit(args: &AuditArgs, out: &mut dyn Write) -> Result<()> {
    let mut config = args.resources.resolve()?;
    if let Some(limit) = args.limit {
        config.audit.culprit_limit = limit;
    }
    let reviews = load_corpus(&args.corpus)?;
    let engine = AnalysisEngine::new(Resources::probe(&config.resources)?, &config);
    let report = engine.audit(&reviews)?;
    write!(out, "{report}")?;
    Ok(())
}

pub fn normalize(args: NormalizeArgs) -> Result<()> {
    run_normalize(&args, &mut io::stdout().lock())
}

pub fn run_normalize(args: &NormalizeArgs, out: &mut dyn Write) -> Result<()> {
    let config = args.resources.resolve()?;
    let resources = Resources::probe(&config.resources)?;
    let tokens = resources
        .normalizer
        .normalize(Some(args.text.as_str()), args.title.as_deref());
    writeln!(out, "{}", tokens.join(" "))?;
    Ok(())
}

pub fn score(args: ScoreArgs) -> Result<()> {
    run_score(&args, &mut io::stdout().lock())
}

pub fn run_score(args: &ScoreArgs, out: &mut dyn Write) -> Result<()> {
    let config = args.resources.resolve()?;
    let engine = AnalysisEngine::new(Resources::probe(&config.resources)?, &config);
    let choice = if args.pristine {
        LexiconChoice::Pristine
    } else {
        LexiconChoice::Tuned
    };
    let result = engine.score_text(&args.text, choice);
    writeln!(out, "{:.4}\t{}", result.compound, result.category)?;
    Ok(())
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| RlError::InvalidInput(format!("non-UTF-8 path: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"[
        {
            "Title": "Dread Keep",
            "Developer": "Some Studio",
            "Critic Reviews Data": [
                {"text": "A horror game where you kill everything in hell. Superb.", "score": 92}
            ],
            "User Reviews Data": [
                {"text": "Boring and repetitive.", "score": "3"},
                {"text": "", "score": 9}
            ]
        }
    ]"#;

    fn corpus(dir: &Path) -> PathBuf {
        let path = dir.join("games.json");
        std::fs::write(&path, CORPUS).unwrap();
        path
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("rl.toml");
        std::fs::write(
            &cfg,
            "[resources]\naspects = \"from_file.csv\"\nstopwords = \"stop.txt\"\n",
        )
        .unwrap();
        let args = ResourceArgs {
            config: Some(cfg),
            aspects: Some(PathBuf::from("from_flag.csv")),
            ..ResourceArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.resources.aspects, Some(PathBuf::from("from_flag.csv")));
        assert_eq!(config.resources.stopwords, Some(PathBuf::from("stop.txt")));
    }

    #[test]
    fn analyze_writes_json_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let dims = dir.path().join("dims.csv");
        std::fs::write(&dims, "Dimension,Keywords\nAtmosphere,horror;dread\n").unwrap();
        let args = AnalyzeArgs {
            corpus: corpus(dir.path()),
            resources: ResourceArgs {
                aspects: Some(dims),
                ..ResourceArgs::default()
            },
            output: None,
            db: Some(dir.path().join("runs.db")),
            threads: Some(1),
            limit: None,
        };
        let mut buf = Vec::new();
        run_analyze(&args, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["reviews"].as_array().unwrap().len(), 2);
        assert_eq!(value["run"]["review_count"], 2);
        assert!(value["reviews"][0]["aspects"]["Atmosphere"].is_number());
        assert!(dir.path().join("runs.db").exists());
    }

    #[test]
    fn missing_corpus_fails() {
        let args = AuditArgs {
            corpus: PathBuf::from("/nonexistent/games.json"),
            resources: ResourceArgs::default(),
            limit: None,
        };
        let err = run_audit(&args, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, RlError::CorpusMissing(_)));
    }

    #[test]
    fn audit_prints_tables() {
        let dir = tempfile::tempdir().unwrap();
        let args = AuditArgs {
            corpus: corpus(dir.path()),
            resources: ResourceArgs::default(),
            limit: Some(5),
        };
        let mut buf = Vec::new();
        run_audit(&args, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Word            | Weight"));
        assert!(text.contains("horror"));
    }

    #[test]
    fn normalize_prints_tokens() {
        let args = NormalizeArgs {
            text: "The knights of the Dread Keep are great".into(),
            title: Some("Dread Keep".into()),
            resources: ResourceArgs::default(),
        };
        let mut buf = Vec::new();
        run_normalize(&args, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "knight great\n");
    }

    #[test]
    fn score_uses_tuned_lexicon_unless_pristine() {
        let mut args = ScoreArgs {
            text: "horror".into(),
            pristine: false,
            resources: ResourceArgs::default(),
        };
        let mut tuned = Vec::new();
        run_score(&args, &mut tuned).unwrap();
        assert!(String::from_utf8(tuned).unwrap().ends_with("Positive\n"));

        args.pristine = true;
        let mut pristine = Vec::new();
        run_score(&args, &mut pristine).unwrap();
        assert!(String::from_utf8(pristine).unwrap().ends_with("Negative\n"));
    }
}
