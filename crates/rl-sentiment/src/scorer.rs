//! Lexicon-weighted polarity scoring.
//!
//! [`PolarityScorer`] is the seam the auditor, the attributor and the
//! pipeline depend on. [`VaderScorer`] is the default implementation: the
//! rule-based valence heuristic (boosters, negation, capitalisation,
//! contrastive "but", punctuation emphasis) normalised into `[-1, 1]`.
//!
//! The scorer holds no lexicon of its own; every call names the lexicon it
//! scores against, so pristine and tuned passes share one scorer.

use rl_core::PolarityResult;

use crate::lexicon::Lexicon;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Compound sentiment for an arbitrary span of text.
pub trait PolarityScorer: Send + Sync {
    /// Compound score in `[-1, 1]`.
    fn compound(&self, text: &str, lexicon: &Lexicon) -> f64;

    /// Compound score plus its category.
    fn score(&self, text: &str, lexicon: &Lexicon) -> PolarityResult {
        PolarityResult::from_compound(self.compound(text, lexicon))
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
/// Added to a shouted word when the text is not shouted throughout.
const C_INCR: f64 = 0.733;
/// Multiplier applied to negated valence.
const N_SCALAR: f64 = -0.74;
/// Normalisation constant approximating the maximum expected sum.
const ALPHA: f64 = 15.0;

const EXCLAMATION_WEIGHT: f64 = 0.292;
const EXCLAMATION_CAP: usize = 4;
const QUESTION_WEIGHT: f64 = 0.18;
const QUESTION_CAP_WEIGHT: f64 = 0.96;

const NEGATE: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

const BOOST_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerable", "considerably",
    "decidedly", "deeply", "effing", "enormous", "enormously", "entirely", "especially",
    "exceptional", "exceptionally", "extreme", "extremely", "fabulously", "flipping", "flippin",
    "frackin", "fracking", "fricking", "frickin", "frigging", "friggin", "fully", "fuckin",
    "fucking", "fuggin", "fugging", "greatly", "hella", "highly", "hugely", "incredible",
    "incredibly", "intensely", "major", "majorly", "more", "most", "particularly", "purely",
    "quite", "really", "remarkably", "so", "substantially", "thoroughly", "total", "totally",
    "tremendous", "tremendously", "uber", "unbelievably", "unusually", "utter", "utterly", "very",
];

const BOOST_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "just enough", "kind of", "kinda", "kindof", "kind-of", "less",
    "little", "marginal", "marginally", "occasional", "occasionally", "partly", "scarce",
    "scarcely", "slight", "slightly", "somewhat", "sort of", "sorta", "sortof", "sort-of",
];

/// Multi-word expressions whose valence replaces the word-level score.
const SPECIAL_IDIOMS: &[(&str, f64)] = &[
    ("the shit", 3.0),
    ("the bomb", 3.0),
    ("bad ass", 1.5),
    ("badass", 1.5),
    ("bus stop", 0.0),
    ("yeah right", -2.0),
    ("kiss of death", -1.5),
    ("to die for", 3.0),
    ("beating heart", 3.1),
    ("broken heart", -2.9),
    ("cut the mustard", 2.0),
    ("hand to mouth", -2.0),
];

fn booster(word: &str) -> Option<f64> {
    if BOOST_UP.contains(&word) {
        Some(B_INCR)
    } else if BOOST_DOWN.contains(&word) {
        Some(B_DECR)
    } else {
        None
    }
}

fn idiom(phrase: &str) -> Option<f64> {
    SPECIAL_IDIOMS
        .iter()
        .find(|(p, _)| *p == phrase)
        .map(|(_, v)| *v)
}

fn is_negation(word: &str) -> bool {
    NEGATE.contains(&word) || word.contains("n't")
}

/// True when the word has cased letters and all of them are uppercase.
fn is_shouted(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

// ---------------------------------------------------------------------------
// Text preparation
// ---------------------------------------------------------------------------

/// Whitespace tokens with surrounding ASCII punctuation stripped, except
/// where stripping would leave two characters or fewer (emoticons, "k.").
struct SentiText {
    words: Vec<String>,
    lower: Vec<String>,
    cap_differential: bool,
}

impl SentiText {
    fn new(text: &str) -> Self {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                let stripped = w.trim_matches(|c: char| c.is_ascii_punctuation());
                if stripped.chars().count() <= 2 {
                    w.to_string()
                } else {
                    stripped.to_string()
                }
            })
            .collect();
        let lower = words.iter().map(|w| w.to_lowercase()).collect();
        let shouted = words.iter().filter(|w| is_shouted(w)).count();
        let cap_differential = shouted > 0 && shouted < words.len();
        Self {
            words,
            lower,
            cap_differential,
        }
    }
}

// ---------------------------------------------------------------------------
// VaderScorer
// ---------------------------------------------------------------------------

/// Rule-based valence scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }

    /// Per-word valences before the contrastive and punctuation passes.
    fn valences(&self, st: &SentiText, lexicon: &Lexicon) -> Vec<f64> {
        let n = st.words.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let lower = st.lower[i].as_str();
            if booster(lower).is_some() {
                out.push(0.0);
                continue;
            }
            if lower == "kind" && st.lower.get(i + 1).map(String::as_str) == Some("of") {
                out.push(0.0);
                continue;
            }
            out.push(self.word_valence(st, i, lexicon));
        }
        out
    }

    fn word_valence(&self, st: &SentiText, i: usize, lexicon: &Lexicon) -> f64 {
        let words = &st.lower;
        let item = words[i].as_str();
        let Some(base) = lexicon.get(item) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" used as a determiner in front of a scored word carries nothing.
        if item == "no" && words.get(i + 1).is_some_and(|next| lexicon.contains(next)) {
            valence = 0.0;
        }
        let no_before = (i > 0 && words[i - 1] == "no")
            || (i > 1 && words[i - 2] == "no")
            || (i > 2 && words[i - 3] == "no" && matches!(words[i - 1].as_str(), "or" | "nor"));
        if no_before {
            valence = base * N_SCALAR;
        }

        if is_shouted(&st.words[i]) && st.cap_differential {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = i - (start + 1);
            if lexicon.contains(&words[prev]) {
                continue;
            }
            let mut s = self.scalar_inc_dec(st, prev, valence);
            if s != 0.0 {
                match start {
                    1 => s *= 0.95,
                    2 => s *= 0.9,
                    _ => {}
                }
            }
            valence += s;
            valence = negation_check(valence, words, start, i);
            if start == 2 {
                valence = idioms_check(valence, words, i);
            }
        }

        least_check(valence, words, i, lexicon)
    }

    fn scalar_inc_dec(&self, st: &SentiText, idx: usize, valence: f64) -> f64 {
        let Some(mut scalar) = booster(&st.lower[idx]) else {
            return 0.0;
        };
        if valence < 0.0 {
            scalar = -scalar;
        }
        if is_shouted(&st.words[idx]) && st.cap_differential {
            if valence > 0.0 {
                scalar += C_INCR;
            } else {
                scalar -= C_INCR;
            }
        }
        scalar
    }
}

fn negation_check(valence: f64, words: &[String], start: usize, i: usize) -> f64 {
    let w = |k: usize| words[i - k].as_str();
    match start {
        0 => {
            if is_negation(w(1)) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if w(2) == "never" && matches!(w(1), "so" | "this") {
                return valence * 1.25;
            }
            if w(2) == "without" && w(1) == "doubt" {
                return valence;
            }
            if is_negation(w(2)) {
                return valence * N_SCALAR;
            }
        }
        2 => {
            if w(3) == "never" && (matches!(w(2), "so" | "this") || matches!(w(1), "so" | "this")) {
                return valence * 1.25;
            }
            if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") {
                return valence;
            }
            if is_negation(w(3)) {
                return valence * N_SCALAR;
            }
        }
        _ => {}
    }
    valence
}

/// Replace the valence when the word closes or opens a known idiom, then
/// apply a booster bigram sitting right in front of it.
fn idioms_check(mut valence: f64, words: &[String], i: usize) -> f64 {
    let join = |from: usize, to: usize| words[from..=to].join(" ");
    let mut candidates = vec![join(i - 1, i), join(i - 2, i), join(i - 2, i - 1)];
    if i >= 3 {
        candidates.push(join(i - 3, i - 1));
    }
    if i + 1 < words.len() {
        candidates.push(join(i, i + 1));
    }
    if i + 2 < words.len() {
        candidates.push(join(i, i + 2));
    }
    for phrase in &candidates {
        if let Some(v) = idiom(phrase) {
            valence = v;
            break;
        }
    }

    let mut boosters = vec![join(i - 2, i - 1)];
    if i >= 3 {
        boosters.push(join(i - 3, i - 1));
    }
    if let Some(b) = boosters.iter().find_map(|p| booster(p)) {
        valence += b;
    }
    valence
}

fn least_check(valence: f64, words: &[String], i: usize, lexicon: &Lexicon) -> f64 {
    if i > 0 && words[i - 1] == "least" && !lexicon.contains("least") {
        if i > 1 && matches!(words[i - 2].as_str(), "at" | "very") {
            return valence;
        }
        return valence * N_SCALAR;
    }
    valence
}

/// Dampen everything before the first "but" and amplify everything after.
fn but_check(words: &[String], valences: &mut [f64]) {
    let Some(pivot) = words.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, v) in valences.iter_mut().enumerate() {
        if idx < pivot {
            *v *= 0.5;
        } else if idx > pivot {
            *v *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let bangs = text.matches('!').count().min(EXCLAMATION_CAP);
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_WEIGHT,
        _ => QUESTION_CAP_WEIGHT,
    };
    bangs as f64 * EXCLAMATION_WEIGHT + question_amp
}

/// Map an unbounded valence sum into `[-1, 1]`.
pub fn normalize_sum(sum: f64) -> f64 {
    let norm = sum / (sum * sum + ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str, lexicon: &Lexicon) -> f64 {
        let st = SentiText::new(text);
        if st.words.is_empty() {
            return 0.0;
        }
        let mut valences = self.valences(&st, lexicon);
        but_check(&st.lower, &mut valences);

        let mut sum: f64 = valences.iter().sum();
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        if sum == 0.0 {
            return 0.0;
        }
        round_compound(normalize_sum(sum))
    }
}

/// Compound scores are reported to four decimals, and the category cut is
/// taken on the reported value.
fn round_compound(compound: f64) -> f64 {
    (compound * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(entries: &[(&str, f64)]) -> Lexicon {
        Lexicon::from_entries(entries.iter().copied())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn empty_text_scores_zero() {
        let s = VaderScorer::new();
        assert_eq!(s.compound("", &lex(&[("good", 1.9)])), 0.0);
        assert_eq!(s.compound("   \n", &lex(&[("good", 1.9)])), 0.0);
    }

    #[test]
    fn unknown_words_score_zero() {
        let s = VaderScorer::new();
        let r = s.score("the roguelike loop", &lex(&[("good", 1.9)]));
        assert_eq!(r.compound, 0.0);
        assert_eq!(r.category, rl_core::Category::Neutral);
    }

    #[test]
    fn single_word_normalisation() {
        let s = VaderScorer::new();
        // 1.9 / sqrt(1.9^2 + 15)
        let c = s.compound("good", &lex(&[("good", 1.9)]));
        assert!(approx(c, 1.9 / (1.9f64 * 1.9 + 15.0).sqrt()));
    }

    #[test]
    fn trailing_punctuation_is_stripped() {
        let s = VaderScorer::new();
        let l = lex(&[("boring", -1.3)]);
        assert_eq!(s.compound("boring.", &l), s.compound("boring", &l));
    }

    #[test]
    fn negation_flips_valence() {
        let s = VaderScorer::new();
        let l = lex(&[("good", 2.0)]);
        let c = s.compound("not good", &l);
        assert!(approx(c, normalize_sum(2.0 * N_SCALAR)));
        assert!(s.compound("isn't good", &l) < 0.0);
    }

    #[test]
    fn category_is_cut_on_the_rounded_compound() {
        let s = VaderScorer::new();
        // 0.19374 / sqrt(0.19374^2 + 15) = 0.049961
        let l = lex(&[("fine", 0.19374), ("meh", -0.19374)]);
        let up = s.score("fine", &l);
        assert_eq!(up.compound, 0.05);
        assert_eq!(up.category, rl_core::Category::Positive);
        let down = s.score("meh", &l);
        assert_eq!(down.compound, -0.05);
        assert_eq!(down.category, rl_core::Category::Negative);
    }

    #[test]
    fn booster_raises_magnitude() {
        let s = VaderScorer::new();
        let l = lex(&[("good", 2.0)]);
        assert!(approx(s.compound("very good", &l), normalize_sum(2.0 + B_INCR)));
        assert!(approx(s.compound("slightly good", &l), normalize_sum(2.0 + B_DECR)));
    }

    #[test]
    fn booster_sign_follows_valence() {
        let s = VaderScorer::new();
        let l = lex(&[("bad", -2.0)]);
        assert!(approx(s.compound("very bad", &l), normalize_sum(-2.0 - B_INCR)));
    }

    #[test]
    fn but_reweights_clauses() {
        let s = VaderScorer::new();
        let l = lex(&[("good", 2.0), ("bad", -2.0)]);
        // 2.0 * 0.5 + -2.0 * 1.5 = -2.0
        assert!(approx(s.compound("good but bad", &l), normalize_sum(-2.0)));
    }

    #[test]
    fn exclamation_amplifies() {
        let s = VaderScorer::new();
        let l = lex(&[("good", 2.0)]);
        assert!(approx(
            s.compound("good!!", &l),
            normalize_sum(2.0 + 2.0 * EXCLAMATION_WEIGHT)
        ));
        // capped at four marks
        assert_eq!(s.compound("good!!!!", &l), s.compound("good!!!!!!!", &l));
    }

    #[test]
    fn shouting_amplifies_when_not_uniform() {
        let s = VaderScorer::new();
        let l = lex(&[("good", 2.0)]);
        assert!(approx(s.compound("GOOD game", &l), normalize_sum(2.0 + C_INCR)));
        // uniform caps carry no differential
        assert!(approx(s.compound("GOOD GAME", &l), normalize_sum(2.0)));
    }

    #[test]
    fn least_negates() {
        let s = VaderScorer::new();
        let l = lex(&[("fun", 2.0)]);
        assert!(s.compound("the least fun", &l) < 0.0);
        assert!(s.compound("at least fun", &l) > 0.0);
    }

    #[test]
    fn kind_of_is_not_scored() {
        let s = VaderScorer::new();
        let l = lex(&[("kind", 2.4), ("fun", 2.0)]);
        let c = s.compound("kind of fun", &l);
        assert!(approx(c, normalize_sum(2.0)));
    }

    #[test]
    fn compound_stays_in_range() {
        let s = VaderScorer::new();
        let l = lex(&[("great", 4.0)]);
        let text = "GREAT great great great great great great great!!!!";
        let c = s.compound(text, &l);
        assert!(c <= 1.0 && c > 0.9);
    }

    #[test]
    fn scoring_depends_only_on_the_given_lexicon() {
        let s = VaderScorer::new();
        let pristine = lex(&[("boring", -0.1)]);
        let tuned = pristine
            .builder()
            .override_weights(vec![("boring", -3.0), ("amazing", 2.0)])
            .build();
        let text = "amazing combat, boring story";
        assert!(approx(s.compound(text, &pristine), -0.025810));
        assert!(approx(s.compound(text, &tuned), -0.25));
    }
}
