//! Daily digest command-line tools
//!
//! Smoke commands against a running server, a configuration dump and the
//! Google OAuth bootstrap that produces the Gmail and Calendar refresh token.

pub mod cli;
pub mod digest_client;
pub mod google_auth;

pub use cli::{Cli, Commands, SourceFlags};
pub use digest_client::{ClientError, DigestClient};
pub use google_auth::AuthError;
