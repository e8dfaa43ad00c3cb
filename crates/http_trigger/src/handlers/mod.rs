mod health;
mod invoke;

pub use health::health_check;
pub use invoke::invoke_function;
