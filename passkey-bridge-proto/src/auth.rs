//! Types related to authentication (Assertion)

use base64urlsafedata::Base64UrlSafeData;
use serde::{Deserialize, Serialize};

use crate::options::*;

/// The requested options for the authentication, with binary members held
/// as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// The challenge that should be signed by the authenticator. Must not be
    /// empty.
    pub challenge: Vec<u8>,
    /// The set of credentials that are allowed to sign this challenge.
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
    /// The relying party ID.
    pub rp_id: Option<String>,
    /// The timeout for the authenticator in case of no interaction.
    pub timeout: Option<u32>,
    /// The verification policy the browser will request.
    pub user_verification: Option<UserVerificationPolicy>,
    /// Extensions, passed through untouched.
    pub extensions: Option<Extensions>,
}

impl RequestOptions {
    /// Options carrying only a challenge.
    pub fn new(challenge: Vec<u8>) -> Self {
        RequestOptions {
            challenge,
            allow_credentials: None,
            rp_id: None,
            timeout: None,
            user_verification: None,
            extensions: None,
        }
    }
}

/// Wire form of [RequestOptions].
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptionsJson {
    /// The challenge. Absent or `null` on the wire is read as empty, and
    /// rejected when decoded.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub challenge: Base64UrlSafeData,
    /// The set of credentials that are allowed to sign this challenge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<CredentialDescriptorJson>>,
    /// extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
    /// The relying party ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    /// The timeout for the authenticator in case of no interaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// The verification policy the browser will request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerificationPolicy>,
}

/// The assertion response members as the native service reported them.
#[derive(Debug, Serialize, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponseJson {
    /// Signed client data.
    #[serde(
        rename = "clientDataJSON",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_data_json: Option<String>,
    /// Raw authenticator data.
    #[serde(
        default,
        alias = "rawAuthenticatorData",
        skip_serializing_if = "Option::is_none"
    )]
    pub authenticator_data: Option<String>,
    /// Signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Optional userhandle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

impl AssertionResponseJson {
    /// Fill every member missing from `self` with the one from `other`.
    pub fn or(self, other: AssertionResponseJson) -> AssertionResponseJson {
        AssertionResponseJson {
            client_data_json: self.client_data_json.or(other.client_data_json),
            authenticator_data: self.authenticator_data.or(other.authenticator_data),
            signature: self.signature.or(other.signature),
            user_handle: self.user_handle.or(other.user_handle),
        }
    }
}

/// An assertion as returned by a native ceremony, before it is checked.
/// Accepts both the nested and the flat shape, see
/// [RegistrationResponseJson][crate::RegistrationResponseJson].
#[derive(Debug, Serialize, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponseJson {
    /// The credential id, base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The credential id, base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<String>,
    /// The type of credential.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// `platform` or `cross-platform`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
    /// Nested response members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AssertionResponseJson>,
    /// Flat response members.
    #[serde(flatten)]
    pub flat: AssertionResponseJson,
}

impl AuthenticationResponseJson {
    /// The response members, nested ones taking precedence.
    pub fn response_members(&mut self) -> AssertionResponseJson {
        let flat = std::mem::take(&mut self.flat);
        match self.response.take() {
            Some(nested) => nested.or(flat),
            None => flat,
        }
    }
}

/// A checked assertion, binary members decoded.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    /// The credential Id, base64url.
    pub id: String,
    /// The binary of the credential id.
    pub raw_id: Base64UrlSafeData,
    /// Signed client data.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Base64UrlSafeData,
    /// Raw authenticator data.
    pub authenticator_data: Base64UrlSafeData,
    /// Signature
    pub signature: Base64UrlSafeData,
    /// The user handle, only when the platform returned a non-empty one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<Base64UrlSafeData>,
    /// How the authenticator was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
}

impl AssertionResult {
    /// Retrieve the user uniqueid that *may* have been provided by the authenticator during this
    /// authentication.
    pub fn get_user_unique_id(&self) -> Option<&[u8]> {
        self.user_handle.as_ref().map(|b| b.as_slice())
    }

    /// Retrieve the credential id that was provided in this authentication
    pub fn get_credential_id(&self) -> &[u8] {
        self.raw_id.as_slice()
    }
}
