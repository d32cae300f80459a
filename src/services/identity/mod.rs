//! Identity-token verification.
//!
//! Handlers depend on [`IdentityVerifier`] only; the Google implementation
//! lives behind it together with its signing-key source.

pub mod certs;
pub mod google;
mod verifier;

pub use certs::{CertsSource, FetchedCerts, HttpCertsSource};
pub use google::GoogleIdTokenVerifier;
pub use verifier::{IdentityVerifier, VerifiedIdentity, VerifyError};
