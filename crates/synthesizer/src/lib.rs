//! # Synthesizer
//!
//! Record synthesis for one invocation.
//!
//! Responsibilities:
//! - Build a fully populated, immutable `Record`
//! - Provide the production clock and identifier collaborators
//! - Provide deterministic collaborators for tests and local runs
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use synthesizer::{RecordSynthesizer, UuidGenerator};
//!
//! let synthesizer = RecordSynthesizer::new(Arc::new(UuidGenerator));
//! let record = synthesizer.synthesize(chrono::Utc::now()).unwrap();
//! assert_eq!(record.partition_key(), "1");
//! ```

mod clock;
mod ids;
mod synthesizer;

pub use clock::{ManualClock, SystemClock};
pub use ids::{SequentialIdGenerator, UuidGenerator};
pub use synthesizer::{function_message, RecordSynthesizer};

pub use contracts::{Clock, IdGenerator, Record};
