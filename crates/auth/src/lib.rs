//! `househunter-auth`: identity tokens and access policy.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod identity;
pub mod policy;
pub mod token;

pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use identity::Identity;
pub use policy::{AuthzError, RoleFlags, require_self};
pub use token::{TOKEN_TTL_HOURS, TokenError, TokenService, VerifiedToken};
