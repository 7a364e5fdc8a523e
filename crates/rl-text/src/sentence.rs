//! Sentence segmentation.
//!
//! [`SentenceStrategy`] is chosen once at startup: either a real splitter, or
//! a degraded mode that treats every document as a single sentence when the
//! splitter's resources are unavailable.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use rl_core::{Result, RlError};

const BUILTIN_ABBREVIATIONS: &str = include_str!("../resources/abbreviations_en.txt");

fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '…')
}

fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

// ---------------------------------------------------------------------------
// SentenceSplitter
// ---------------------------------------------------------------------------

/// Rule-based splitter: breaks after `.`, `!`, `?` or an ellipsis followed by
/// whitespace, except after a known abbreviation, or after an ellipsis that
/// runs on into a lowercase word.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    abbreviations: HashSet<String>,
}

impl SentenceSplitter {
    pub fn english() -> Self {
        Self::from_list(BUILTIN_ABBREVIATIONS)
    }

    /// Load an abbreviation list (one per line, without the final period).
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RlError::resource(format!("abbreviations ({})", path.display()), e))?;
        Ok(Self::from_list(&content))
    }

    fn from_list(content: &str) -> Self {
        Self {
            abbreviations: content
                .lines()
                .map(|l| l.trim().trim_end_matches('.').to_lowercase())
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .collect(),
        }
    }

    /// Split `text` into trimmed, non-empty sentences.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let byte_at = |i: usize| chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());

        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;

        while i < chars.len() {
            if !is_terminal(chars[i].1) {
                i += 1;
                continue;
            }

            let term_start = i;
            while i < chars.len() && is_terminal(chars[i].1) {
                i += 1;
            }
            let term_end = i;
            while i < chars.len() && is_closing(chars[i].1) {
                i += 1;
            }
            if i < chars.len() && !chars[i].1.is_whitespace() {
                continue;
            }

            let terminator: String = chars[term_start..term_end].iter().map(|(_, c)| *c).collect();
            if terminator == "." && self.is_abbreviation(&chars[..term_start]) {
                continue;
            }
            let ellipsis = terminator.contains('…') || terminator.starts_with("..");
            if ellipsis && next_word_is_lowercase(&chars[i..]) {
                continue;
            }

            let end = byte_at(i);
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }

    fn is_abbreviation(&self, before: &[(usize, char)]) -> bool {
        let word: String = before
            .iter()
            .rev()
            .take_while(|(_, c)| c.is_alphanumeric() || *c == '.')
            .map(|(_, c)| *c)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        !word.is_empty() && self.abbreviations.contains(&word.to_lowercase())
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::english()
    }
}

fn next_word_is_lowercase(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace())
        .map(char::is_lowercase)
        .unwrap_or(false)
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, s: &'a str) {
    let s = s.trim();
    if !s.is_empty() {
        out.push(s);
    }
}

// ---------------------------------------------------------------------------
// SentenceStrategy
// ---------------------------------------------------------------------------

/// How documents are cut into sentences for aspect attribution.
#[derive(Debug, Clone)]
pub enum SentenceStrategy {
    SentenceSplit(SentenceSplitter),
    /// Degraded mode: the whole document is one sentence.
    WholeDocument,
}

impl SentenceStrategy {
    /// Pick a strategy once, at startup.
    ///
    /// With no abbreviation list configured the builtin splitter is used. A
    /// configured list that cannot be read degrades to
    /// [`SentenceStrategy::WholeDocument`] instead of failing the run.
    pub fn probe(abbreviations: Option<&Path>) -> Self {
        match abbreviations {
            None => {
                debug!("using builtin sentence splitter");
                SentenceStrategy::SentenceSplit(SentenceSplitter::english())
            }
            Some(path) => match SentenceSplitter::from_file(path) {
                Ok(splitter) => SentenceStrategy::SentenceSplit(splitter),
                Err(e) => {
                    warn!(error = %e, "sentence splitter unavailable; treating each document as one sentence");
                    SentenceStrategy::WholeDocument
                }
            },
        }
    }

    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            SentenceStrategy::SentenceSplit(splitter) => splitter.split(text),
            SentenceStrategy::WholeDocument => {
                let mut out = Vec::new();
                push_trimmed(&mut out, text);
                out
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceStrategy::SentenceSplit(_) => "sentence_split",
            SentenceStrategy::WholeDocument => "whole_document",
        }
    }
}

impl Default for SentenceStrategy {
    fn default() -> Self {
        SentenceStrategy::SentenceSplit(SentenceSplitter::english())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
