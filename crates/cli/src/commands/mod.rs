//! Command implementations.

mod info;
mod invoke;
mod serve;
mod validate;

pub use info::run_info;
pub use invoke::run_invoke;
pub use serve::run_serve;
pub use validate::run_validate;
