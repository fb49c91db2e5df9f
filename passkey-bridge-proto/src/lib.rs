//! JSON Protocol Structs and representations for carrying WebAuthn ceremonies
//! between a web or hybrid application and a native platform credential
//! service.
//!
//! Most structures come in two forms:
//!
//! * a typed form holding raw bytes, which is what application code builds
//!   and consumes, and
//! * a `*Json` wire form where every binary field is a
//!   [Base64UrlSafeData][base64urlsafedata::Base64UrlSafeData], which is
//!   what crosses the script/native boundary.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(warnings)]
#![warn(unused_extern_crates)]
#![warn(missing_docs)]

pub mod attest;
pub mod auth;
pub mod command;
pub mod envelope;
pub mod native;
pub mod options;

pub use attest::*;
pub use auth::*;
pub use command::*;
pub use envelope::*;
pub use native::*;
pub use options::*;

pub use base64urlsafedata::Base64UrlSafeData;

#[cfg(test)]
mod tests;
