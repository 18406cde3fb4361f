//! Application Layer
//!
//! Use cases and application configuration.

pub mod config;
pub mod login;
pub mod register;
pub mod user_info;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use user_info::{GetUserInfoUseCase, UserInfoOutput};
