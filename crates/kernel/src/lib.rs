//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest core of vocabulary shared by every crate in the workspace:
//! - Unified error type and result alias
//! - Type-safe entity ID wrappers
//!
//! **Design Principle**: only things that are hard to change and mean the
//! same thing in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
pub use id::AccountId;
