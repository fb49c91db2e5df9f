//! Turns the textual output of a native ceremony into checked credential
//! results.

use base64urlsafedata::{Base64UrlSafeData, DecodeError};
use passkey_bridge_proto::{
    AssertionResult, AuthenticationResponseJson, AuthenticatorAttachment, CredentialResult,
    RegistrationResponseJson,
};

use crate::error::ParseError;

fn decode_field(value: &str, field: &'static str) -> Result<Base64UrlSafeData, ParseError> {
    base64urlsafedata::decode(value)
        .map(Base64UrlSafeData)
        .map_err(|source: DecodeError| ParseError::InvalidEncoding { field, source })
}

fn required(value: Option<String>, field: &'static str) -> Result<Base64UrlSafeData, ParseError> {
    let value = value.ok_or(ParseError::MissingField(field))?;
    decode_field(&value, field)
}

fn optional(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<Base64UrlSafeData>, ParseError> {
    value.map(|v| decode_field(&v, field)).transpose()
}

/// iOS only reports `id`, other platforms report both. When both are
/// present they must name the same credential.
fn credential_id(
    id: Option<String>,
    raw_id: Option<String>,
) -> Result<(String, Base64UrlSafeData), ParseError> {
    match (id, raw_id) {
        (Some(id), Some(raw_id)) => {
            let raw = decode_field(&raw_id, "rawId")?;
            if decode_field(&id, "id")? != raw {
                return Err(ParseError::InvalidEncoding {
                    field: "id",
                    source: DecodeError::Malformed(format!("{id} does not match rawId")),
                });
            }
            Ok((id, raw))
        }
        (Some(id), None) => {
            let raw = decode_field(&id, "id")?;
            Ok((id, raw))
        }
        (None, Some(raw_id)) => {
            let raw = decode_field(&raw_id, "rawId")?;
            Ok((raw.encoded(), raw))
        }
        (None, None) => Err(ParseError::MissingField("rawId")),
    }
}

fn attachment(value: Option<String>) -> Result<Option<AuthenticatorAttachment>, ParseError> {
    value
        .map(|v| v.parse().map_err(ParseError::UnknownAttachment))
        .transpose()
}

pub fn parse_registration(
    mut rsp: RegistrationResponseJson,
) -> Result<CredentialResult, ParseError> {
    let members = rsp.response_members();
    let (id, raw_id) = credential_id(rsp.id, rsp.raw_id)?;

    Ok(CredentialResult {
        id,
        raw_id,
        client_data_json: required(members.client_data_json, "clientDataJSON")?,
        attestation_object: optional(members.attestation_object, "attestationObject")?,
        authenticator_data: optional(members.authenticator_data, "authenticatorData")?,
        public_key: optional(members.public_key, "publicKey")?,
        public_key_algorithm: members.public_key_algorithm,
        transports: members.transports,
        authenticator_attachment: attachment(rsp.authenticator_attachment)?,
    })
}

pub fn parse_assertion(mut rsp: AuthenticationResponseJson) -> Result<AssertionResult, ParseError> {
    let members = rsp.response_members();
    let (id, raw_id) = credential_id(rsp.id, rsp.raw_id)?;

    let user_handle = optional(
        members.user_handle.filter(|h| !h.is_empty()),
        "userHandle",
    )?
    .and_then(Base64UrlSafeData::non_empty);

    Ok(AssertionResult {
        id,
        raw_id,
        client_data_json: required(members.client_data_json, "clientDataJSON")?,
        authenticator_data: required(members.authenticator_data, "authenticatorData")?,
        signature: required(members.signature, "signature")?,
        user_handle,
        authenticator_attachment: attachment(rsp.authenticator_attachment)?,
    })
}
