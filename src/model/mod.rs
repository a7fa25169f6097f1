pub mod config;
pub mod form;
pub mod pin_set;
pub mod task;

pub use config::*;
pub use form::*;
pub use pin_set::*;
pub use task::*;
