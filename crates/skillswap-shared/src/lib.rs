//! # skillswap-shared
//!
//! Types shared by every SkillSwap crate: identifiers, the small enums that
//! make up a profile and a swap request, password hashing and bearer
//! credential signing.

pub mod constants;
pub mod credential;
pub mod error;
pub mod password;
pub mod types;

pub use error::{CredentialError, PasswordError};
pub use types::*;
