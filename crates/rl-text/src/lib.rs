pub mod lemmatize;
pub mod normalize;
pub mod sentence;
pub mod stopwords;
pub mod tokenize;

pub use lemmatize::Lemmatizer;
pub use normalize::Normalizer;
pub use sentence::{SentenceSplitter, SentenceStrategy};
pub use stopwords::Stopwords;
pub use tokenize::{tokenize, words, Token, TokenKind};
