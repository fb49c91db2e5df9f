//! Types that define options as to how an authenticator may interact with
//! the relying party.

use base64urlsafedata::Base64UrlSafeData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque extension inputs, passed through without interpretation.
pub type Extensions = BTreeMap<String, serde_json::Value>;

/// The only credential type WebAuthn defines.
pub const PUBLIC_KEY_TYPE: &str = "public-key";

pub(crate) fn public_key_type() -> String {
    PUBLIC_KEY_TYPE.to_string()
}

/// Reads `null` the same as an absent member: as empty bytes.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<Base64UrlSafeData, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Base64UrlSafeData>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Defines the User Authenticator Verification policy.
/// <https://w3c.github.io/webauthn/#enumdef-userverificationrequirement>
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserVerificationPolicy {
    /// Fail the operation if the authenticator cannot verify the user.
    Required,
    /// Verify the user if the authenticator is able to.
    Preferred,
    /// Avoid user verification where possible.
    Discouraged,
}

/// <https://w3c.github.io/webauthn/#enumdef-residentkeyrequirement>
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResidentKeyRequirement {
    /// Prefer a server-side credential.
    Discouraged,
    /// Prefer a discoverable credential, but accept a server-side one.
    Preferred,
    /// Require a discoverable credential.
    Required,
}

/// <https://www.w3.org/TR/webauthn/#enumdef-attestationconveyancepreference>
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttestationConveyancePreference {
    /// Do not request attestation.
    None,
    /// Request attestation in a semi-anonymized form.
    Indirect,
    /// Request attestation in a direct form.
    Direct,
    /// Request attestation that may uniquely identify the authenticator.
    Enterprise,
}

/// The authenticator attachment. Only these two values exist; anything else
/// coming back from a platform is treated as an error rather than guessed at.
///
/// <https://www.w3.org/TR/webauthn/#attachment>
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthenticatorAttachment {
    /// A device that is part of the machine aka inseperable.
    #[serde(rename = "platform")]
    Platform,
    /// A device that can be seperated from the machine aka an external token.
    #[serde(rename = "cross-platform")]
    CrossPlatform,
}

impl AuthenticatorAttachment {
    /// The WebAuthn string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticatorAttachment::Platform => "platform",
            AuthenticatorAttachment::CrossPlatform => "cross-platform",
        }
    }
}

impl fmt::Display for AuthenticatorAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthenticatorAttachment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform" => Ok(AuthenticatorAttachment::Platform),
            "cross-platform" => Ok(AuthenticatorAttachment::CrossPlatform),
            other => Err(other.to_string()),
        }
    }
}

/// Relying Party Entity
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelyingParty {
    /// The id of the relying party. When absent the bridge falls back to its
    /// configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The name of the relying party.
    pub name: String,
}

/// User Entity, holding the raw user handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The user handle. Must not be empty.
    pub id: Vec<u8>,
    /// The account name.
    pub name: String,
    /// The users preferred name for display.
    pub display_name: String,
}

/// Wire form of [User].
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserJson {
    /// The user handle. Absent or `null` on the wire is read as empty, and
    /// rejected when decoded.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: Base64UrlSafeData,
    /// The account name.
    pub name: String,
    /// The users preferred name for display.
    pub display_name: String,
}

/// Public key cryptographic parameters. Order within a list is the relying
/// party's preference order.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
pub struct PubKeyCredParams {
    /// The type of public-key credential.
    #[serde(rename = "type")]
    pub type_: String,
    /// The algorithm in use defined by COSE.
    pub alg: i64,
}

/// <https://www.w3.org/TR/webauthn/#dictdef-publickeycredentialdescriptor>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDescriptor {
    /// The type of credential
    pub type_: String,
    /// The raw credential id.
    pub id: Vec<u8>,
    /// Transport hints, passed through verbatim.
    pub transports: Option<Vec<String>>,
}

impl CredentialDescriptor {
    /// A `public-key` descriptor with no transport hints.
    pub fn public_key(id: Vec<u8>) -> Self {
        CredentialDescriptor {
            type_: public_key_type(),
            id,
            transports: None,
        }
    }
}

/// Wire form of [CredentialDescriptor].
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
pub struct CredentialDescriptorJson {
    /// The type of credential
    #[serde(rename = "type", default = "public_key_type")]
    pub type_: String,
    /// The credential id.
    pub id: Base64UrlSafeData,
    /// The allowed transports for this credential. Note this is a hint, and is NOT
    /// enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
}

/// <https://www.w3.org/TR/webauthn/#dictdef-authenticatorselectioncriteria>
#[derive(Debug, Serialize, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelectionCriteria {
    /// How the authenticator should be attached to the client machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,

    /// Whether a discoverable credential should be created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_key: Option<ResidentKeyRequirement>,

    /// Level 1 form of `resident_key`, kept for older relying parties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_resident_key: Option<bool>,

    /// The user verification level to request during registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerificationPolicy>,
}
