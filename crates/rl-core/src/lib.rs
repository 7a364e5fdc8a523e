pub mod aspect;
pub mod corpus;
pub mod culprit;
pub mod db;
pub mod error;
pub mod hash;
pub mod polarity;
pub mod review;
pub mod schema;

pub use aspect::*;
pub use culprit::*;
pub use error::*;
pub use hash::*;
pub use polarity::*;
pub use review::*;
