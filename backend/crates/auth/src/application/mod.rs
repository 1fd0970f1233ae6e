//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod me;
pub mod outcome;
pub mod register;
pub mod session;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use forgot_password::ForgotPasswordUseCase;
pub use login::{LoginInput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use me::MeUseCase;
pub use outcome::UserOutcome;
pub use register::{RegisterInput, RegisterUseCase};
pub use session::{CookieChange, SessionContext, SessionManager};
