//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: the record
//! model, the per-invocation aggregate, collaborator traits and the output sink
//! interface. Business crates depend on this crate only, never on each other's
//! internals.
//!
//! ## Time Model
//! - All instants are UTC wall-clock time (`chrono::DateTime<Utc>`)
//! - The clock is a collaborator (`Clock`), never read implicitly by the core

mod aggregate;
mod blob_path;
mod blueprint;
mod collaborators;
mod error;
mod record;
mod request;
mod responses;
mod sink;

pub use aggregate::*;
pub use blob_path::{BlobPathTemplate, DEFAULT_BLOB_PATH};
pub use blueprint::*;
pub use collaborators::{Clock, IdGenerator};
pub use error::*;
pub use record::*;
pub use request::*;
pub use responses::*;
pub use sink::*;
