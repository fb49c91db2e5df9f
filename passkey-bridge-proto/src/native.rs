//! What crosses into, and back out of, a JSON-speaking native credential
//! host.

use base64urlsafedata::Base64UrlSafeData;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attest::RegistrationResponseJson;
use crate::auth::AuthenticationResponseJson;
use crate::options::{
    AttestationConveyancePreference, AuthenticatorSelectionCriteria, CredentialDescriptorJson,
    Extensions, PubKeyCredParams, UserVerificationPolicy,
};

/// The two kinds of native ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeremonyKind {
    /// Creating a new credential (attestation).
    Registration,
    /// Using an existing credential (assertion).
    Assertion,
}

impl fmt::Display for CeremonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CeremonyKind::Registration => f.write_str("registration"),
            CeremonyKind::Assertion => f.write_str("assertion"),
        }
    }
}

/// Parameters of a platform registration request.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NativeRegistrationParams {
    /// The relying party identifier the credential is scoped to.
    pub rp_id: String,
    /// The challenge.
    pub challenge: Base64UrlSafeData,
    /// The user handle.
    pub user_id: Base64UrlSafeData,
    /// The account name.
    pub user_name: String,
    /// The users preferred name for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_display_name: Option<String>,
    /// The relying party's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_name: Option<String>,
    /// Acceptable algorithms, most preferred first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pub_key_cred_params: Vec<PubKeyCredParams>,
    /// Milliseconds the platform may wait for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Credentials the authenticator must not already hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<CredentialDescriptorJson>>,
    /// Which authenticators may be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,
    /// The requested attestation conveyance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<AttestationConveyancePreference>,
    /// Extension inputs, untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

/// Parameters of a platform assertion request.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NativeAssertionParams {
    /// The relying party identifier.
    pub rp_id: String,
    /// The challenge.
    pub challenge: Base64UrlSafeData,
    /// When present, only these credentials may be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credential_ids: Option<Vec<Base64UrlSafeData>>,
    /// The same credentials as full descriptors, with their transport hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<CredentialDescriptorJson>>,
    /// Milliseconds the platform may wait for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// The user verification the platform should request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerificationPolicy>,
    /// Extension inputs, untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

/// A native host's answer to one ceremony.
///
/// ```json
/// {"registration": {"id": "...", "rawAttestationObject": "...", "clientDataJSON": "..."}}
/// {"assertion": {"id": "...", "response": {...}}}
/// {"error": "The operation couldn't be completed."}
/// {"notAllowed": "The request is not allowed by the user agent."}
/// "cancelled"
/// ```
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NativeReply {
    /// A registration credential.
    Registration(RegistrationResponseJson),
    /// An assertion credential.
    Assertion(AuthenticationResponseJson),
    /// The platform failed the ceremony.
    Error(String),
    /// The platform refused the ceremony, for example because the calling
    /// app is not associated with the relying party.
    NotAllowed(String),
    /// The platform has no passkey support.
    NotSupported(String),
    /// The user dismissed the platform UI.
    Cancelled,
}
