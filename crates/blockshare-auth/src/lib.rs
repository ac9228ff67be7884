//! # blockshare-auth
//!
//! Authentication and authorization primitives for BlockShare.
//!
//! ## Modules
//!
//! - `jwt`: verification of bearer tokens issued by the identity service,
//!   plus an encoder for issuing compatible tokens
//! - `ownership`: the owner-only capability check used by every mutation

pub mod jwt;
pub mod ownership;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use ownership::require_owner;
