//! Word tokenizer for review text.
//!
//! Tokenization rules:
//! - Runs of letters and digits form Word or Number tokens.
//! - An apostrophe, hyphen or period between two alphanumerics joins them
//!   (`well-known`, `3.5`, `u.s`).
//! - Contractions split into stem and clitic: `don't` → `do` `n't`,
//!   `game's` → `game` `'s`.
//! - Other punctuation is emitted as independent tokens; a run of the same
//!   mark (`...`, `!!`) stays one token.
//!
//! Example:
//!   "Don't buy it... seriously!" →
//!   [Do][n't][buy][it][...][seriously][!]

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Category of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Word,
    Number,
    Punctuation,
    /// Contraction suffix split off a word (`n't`, `'s`, `'ll`, ...).
    Clitic,
    /// Anything else (emoji, currency signs, ...).
    Symbol,
}

/// Atomic unit of text produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Text as it appears in the input.
    pub text: String,
    pub kind: TokenKind,
    /// Byte offset of the first character within the input.
    pub offset: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Tokenize `text` into a sequence of [`Token`]s. Whitespace is not emitted.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());

    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, ch) = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if is_punctuation(ch) {
            while i < chars.len() && chars[i].1 == ch {
                i += 1;
            }
            tokens.push(Token {
                text: text[offset..byte_at(i)].to_string(),
                kind: TokenKind::Punctuation,
                offset,
            });
            continue;
        }

        let start = i;
        while i < chars.len() {
            let c = chars[i].1;
            if c.is_alphanumeric() {
                i += 1;
                continue;
            }
            let joins = is_joiner(c)
                && i > start
                && chars[i - 1].1.is_alphanumeric()
                && chars.get(i + 1).map(|(_, n)| n.is_alphanumeric()).unwrap_or(false);
            if joins {
                i += 1;
                continue;
            }
            break;
        }

        if i == start {
            // Neither punctuation nor alphanumeric: consume a symbol run.
            while i < chars.len() {
                let c = chars[i].1;
                if c.is_whitespace() || c.is_alphanumeric() || is_punctuation(c) {
                    break;
                }
                i += 1;
            }
            tokens.push(Token {
                text: text[offset..byte_at(i)].to_string(),
                kind: TokenKind::Symbol,
                offset,
            });
            continue;
        }

        push_word(&mut tokens, &text[offset..byte_at(i)], offset);
    }

    tokens
}

/// Token texts only.
pub fn words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.text).collect()
}

/// `true` if `token` is exactly one ASCII punctuation mark.
pub fn is_punctuation_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}

/// `true` if `token` is non-empty and every character is alphabetic.
pub fn is_alphabetic_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// `true` if `token` is non-empty and every character is a letter or digit.
pub fn is_alphanumeric_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Return `true` if `ch` should be treated as an independent punctuation token.
fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || matches!(
            ch,
            '–' | '—' | '…' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '«' | '»'
        )
}

/// Characters that glue two alphanumeric runs into one token.
fn is_joiner(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}' | '-' | '.')
}

const CLITICS: [&str; 6] = ["s", "re", "ve", "ll", "d", "m"];

/// Push a word token, splitting a trailing contraction into its own token.
fn push_word(tokens: &mut Vec<Token>, word: &str, offset: usize) {
    match clitic_split(word) {
        Some(at) => {
            tokens.push(Token {
                text: word[..at].to_string(),
                kind: classify_word(&word[..at]),
                offset,
            });
            tokens.push(Token {
                text: word[at..].to_string(),
                kind: TokenKind::Clitic,
                offset: offset + at,
            });
        }
        None => tokens.push(Token {
            text: word.to_string(),
            kind: classify_word(word),
            offset,
        }),
    }
}

/// Byte index where a contraction suffix starts, if `word` ends in one.
fn clitic_split(word: &str) -> Option<usize> {
    let (apos, apos_char) = word
        .char_indices()
        .filter(|(_, c)| matches!(c, '\'' | '\u{2019}'))
        .last()?;
    let suffix = word[apos + apos_char.len_utf8()..].to_lowercase();
    let stem = &word[..apos];

    if suffix == "t" {
        let (n_idx, n) = stem.char_indices().last()?;
        if (n == 'n' || n == 'N') && n_idx > 0 {
            return Some(n_idx);
        }
        return None;
    }
    if CLITICS.contains(&suffix.as_str()) && apos > 0 {
        return Some(apos);
    }
    None
}

fn classify_word(word: &str) -> TokenKind {
    let has_digit = word.chars().any(|c| c.is_ascii_digit());
    if has_digit && word.chars().all(|c| c.is_ascii_digit() || c == '.') {
        TokenKind::Number
    } else {
        TokenKind::Word
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
