//! Core domain for the Veritas credibility assistant.
//!
//! Holds the analysis record model, the injectable randomness and clock
//! providers, the built-in seed records, and the matcher that resolves
//! free text to a record.

pub mod config;
pub mod error;
pub mod matcher;
pub mod providers;
pub mod seed;
pub mod types;

pub use config::VeritasConfig;
pub use error::{Result, VeritasError};
pub use matcher::AnalysisMatcher;
pub use providers::{Clock, ManualClock, RandomSource, StdRandom, SystemClock};
pub use seed::seed_records;
pub use types::{AnalysisRecord, ScoreBand, MAX_SCORE};
