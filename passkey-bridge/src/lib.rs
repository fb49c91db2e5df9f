//! passkey-bridge carries WebAuthn ceremonies between a web or hybrid
//! application and the platform's native passkey service (Credential Manager
//! on Android, AuthenticationServices on Apple platforms).
//!
//! The application hands over `PublicKeyCredentialCreationOptionsJSON` or
//! `PublicKeyCredentialRequestOptionsJSON`, the bridge decodes and checks
//! them, runs exactly one native ceremony through a [CredentialService], and
//! answers with the resulting credential wrapped in an
//! [Envelope][passkey_bridge_proto::Envelope]:
//!
//! ```json
//! {"ok": true, "data": {"id": "...", "rawId": "...", "clientDataJSON": "..."}}
//! {"ok": false, "error": "a credential ceremony is already in progress", "code": "concurrent_request"}
//! ```
//!
//! This library does not verify signatures or attestation statements; that
//! remains the job of the relying party.
//!
//! ## Layout
//!
//! * [serialize]: typed options to and from their JSON wire form.
//! * [parse]: native ceremony output to [CredentialResult] and
//!   [AssertionResult].
//! * [coordinator]: the single-flight [CeremonyCoordinator].
//! * [commands]: routing of `create_credential` and `get_credential`.
//! * [client]: the calling side, [PasskeyClient].
//! * [native]: [CallbackService], for native hosts that reply through a
//!   completion handler.
//! * [fixture]: [FixtureService], canned replies for tests and tooling.
//!
//! [CredentialService]: crate::service::CredentialService
//! [CredentialResult]: passkey_bridge_proto::CredentialResult
//! [AssertionResult]: passkey_bridge_proto::AssertionResult
//! [CeremonyCoordinator]: crate::coordinator::CeremonyCoordinator
//! [PasskeyClient]: crate::client::PasskeyClient
//! [CallbackService]: crate::native::CallbackService
//! [FixtureService]: crate::fixture::FixtureService

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod fixture;
pub mod native;
pub mod parse;
pub mod serialize;
pub mod service;

pub mod prelude {
    pub use crate::client::{CommandTransport, PasskeyClient};
    pub use crate::commands::dispatch;
    pub use crate::config::BridgeConfig;
    pub use crate::coordinator::{CeremonyCoordinator, CeremonyState};
    pub use crate::error::{
        BridgeError, ParseError, PlatformError, PlatformErrorKind, SerializationError,
    };
    pub use crate::fixture::FixtureService;
    pub use crate::native::{CallbackService, Completion, NativeHost};
    pub use crate::service::{
        AssertionRequest, CredentialService, NativeCredential, RegistrationRequest,
    };
    pub use base64urlsafedata::Base64UrlSafeData;
    pub use passkey_bridge_proto::{
        AssertionResult, CeremonyKind, CreationOptions, CredentialResult, Envelope,
        RequestOptions,
    };
}
