//! Types related to attestation (Registration)

use base64urlsafedata::Base64UrlSafeData;
use serde::{Deserialize, Serialize};

use crate::options::*;

/// <https://w3c.github.io/webauthn/#dictionary-makecredentialoptions>, with
/// binary members held as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationOptions {
    /// The relying party
    pub rp: RelyingParty,
    /// The user.
    pub user: User,
    /// The one-time challenge for the credential to sign. Must not be empty.
    pub challenge: Vec<u8>,
    /// The set of cryptographic types allowed by this server, most preferred
    /// first.
    pub pub_key_cred_params: Vec<PubKeyCredParams>,
    /// The timeout for the authenticator to stop accepting the operation
    pub timeout: Option<u32>,
    /// Credential ID's that are excluded from being able to be registered.
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    /// Criteria defining which authenticators may be used in this operation.
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,
    /// The requested attestation level from the device.
    pub attestation: Option<AttestationConveyancePreference>,
    /// Extensions, passed through untouched.
    pub extensions: Option<Extensions>,
}

/// Wire form of [CreationOptions], the `PublicKeyCredentialCreationOptionsJSON`
/// shape. Optional members are omitted rather than written as `null`.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreationOptionsJson {
    /// The relying party
    pub rp: RelyingParty,
    /// The user.
    pub user: UserJson,
    /// The challenge. Absent or `null` on the wire is read as empty, and
    /// rejected when decoded.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub challenge: Base64UrlSafeData,
    /// The set of cryptographic types allowed by this server.
    #[serde(default)]
    pub pub_key_cred_params: Vec<PubKeyCredParams>,

    /// The timeout for the authenticator to stop accepting the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Credential ID's that are excluded from being able to be registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<CredentialDescriptorJson>>,

    /// Criteria defining which authenticators may be used in this operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,

    /// The requested attestation level from the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<AttestationConveyancePreference>,

    /// Extensions that may be used by the browser/authenticator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

/// The attestation response members of a registration, exactly as the native
/// service reported them: every member is text and every member may be
/// missing.
#[derive(Debug, Serialize, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponseJson {
    /// <https://w3c.github.io/webauthn/#dom-authenticatorresponse-clientdatajson>
    #[serde(
        rename = "clientDataJSON",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_data_json: Option<String>,
    /// <https://w3c.github.io/webauthn/#dom-authenticatorattestationresponse-attestationobject>
    #[serde(
        default,
        alias = "rawAttestationObject",
        skip_serializing_if = "Option::is_none"
    )]
    pub attestation_object: Option<String>,
    /// <https://w3c.github.io/webauthn/#dom-authenticatorattestationresponse-getauthenticatordata>
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_data: Option<String>,
    /// <https://w3c.github.io/webauthn/#dom-authenticatorattestationresponse-getpublickey>
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// <https://w3c.github.io/webauthn/#dom-authenticatorattestationresponse-getpublickeyalgorithm>
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_algorithm: Option<i64>,
    /// <https://w3c.github.io/webauthn/#dom-authenticatorattestationresponse-gettransports>
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
}

impl AttestationResponseJson {
    /// Fill every member missing from `self` with the one from `other`.
    pub fn or(self, other: AttestationResponseJson) -> AttestationResponseJson {
        AttestationResponseJson {
            client_data_json: self.client_data_json.or(other.client_data_json),
            attestation_object: self.attestation_object.or(other.attestation_object),
            authenticator_data: self.authenticator_data.or(other.authenticator_data),
            public_key: self.public_key.or(other.public_key),
            public_key_algorithm: self.public_key_algorithm.or(other.public_key_algorithm),
            transports: self.transports.or(other.transports),
        }
    }
}

/// A registration as returned by a native ceremony, before it is checked.
///
/// Android's Credential Manager reports the standard nested
/// `RegistrationResponseJSON` shape, while AuthenticationServices bridges
/// report the response members flat beside `id`. Both are accepted; a
/// nested member wins over a flat one.
#[derive(Debug, Serialize, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponseJson {
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
    pub response: Option<AttestationResponseJson>,
    /// Flat response members.
    #[serde(flatten)]
    pub flat: AttestationResponseJson,
}

impl RegistrationResponseJson {
    /// The response members, nested ones taking precedence.
    pub fn response_members(&mut self) -> AttestationResponseJson {
        let flat = std::mem::take(&mut self.flat);
        match self.response.take() {
            Some(nested) => nested.or(flat),
            None => flat,
        }
    }
}

/// A checked registration credential, binary members decoded.
///
/// Serialises flat, in camelCase, with binary members as unpadded base64url.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResult {
    /// The credential id, base64url.
    pub id: String,
    /// The credential id, as binary.
    pub raw_id: Base64UrlSafeData,
    /// The client data the authenticator signed over.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Base64UrlSafeData,
    /// The CBOR attestation object. Some platforms omit it.
    #[serde(
        default,
        alias = "rawAttestationObject",
        skip_serializing_if = "Option::is_none"
    )]
    pub attestation_object: Option<Base64UrlSafeData>,
    /// Raw authenticator data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_data: Option<Base64UrlSafeData>,
    /// The DER SubjectPublicKeyInfo of the new credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Base64UrlSafeData>,
    /// COSE algorithm identifier of `public_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_algorithm: Option<i64>,
    /// Transports the authenticator believes it supports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
    /// How the authenticator was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
}

impl CredentialResult {
    /// Retrieve the credential id that was created.
    pub fn get_credential_id(&self) -> &[u8] {
        self.raw_id.as_slice()
    }
}
