//! Conversion of ceremony options between their typed form and the JSON wire
//! form. The guest side serialises, the native side decodes; both check that
//! the challenge and the user handle are present.

use passkey_bridge_proto::{
    CreationOptions, CreationOptionsJson, CredentialDescriptor, CredentialDescriptorJson,
    RequestOptions, RequestOptionsJson, User, UserJson,
};

use crate::error::SerializationError;

fn require(bytes: &[u8], field: &'static str) -> Result<(), SerializationError> {
    if bytes.is_empty() {
        Err(SerializationError::MissingRequiredField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn descriptors_to_json(list: &[CredentialDescriptor]) -> Vec<CredentialDescriptorJson> {
    list.iter()
        .map(|d| CredentialDescriptorJson {
            type_: d.type_.clone(),
            id: d.id.clone().into(),
            transports: d.transports.clone(),
        })
        .collect()
}

fn descriptors_from_json(list: Vec<CredentialDescriptorJson>) -> Vec<CredentialDescriptor> {
    list.into_iter()
        .map(|d| CredentialDescriptor {
            type_: d.type_,
            id: d.id.into(),
            transports: d.transports,
        })
        .collect()
}

pub fn serialize_creation_options(
    options: &CreationOptions,
) -> Result<CreationOptionsJson, SerializationError> {
    require(&options.challenge, "challenge")?;
    require(&options.user.id, "user.id")?;

    Ok(CreationOptionsJson {
        rp: options.rp.clone(),
        user: UserJson {
            id: options.user.id.clone().into(),
            name: options.user.name.clone(),
            display_name: options.user.display_name.clone(),
        },
        challenge: options.challenge.clone().into(),
        pub_key_cred_params: options.pub_key_cred_params.clone(),
        timeout: options.timeout,
        exclude_credentials: options
            .exclude_credentials
            .as_deref()
            .map(descriptors_to_json),
        authenticator_selection: options.authenticator_selection.clone(),
        attestation: options.attestation,
        extensions: options.extensions.clone(),
    })
}

pub fn serialize_request_options(
    options: &RequestOptions,
) -> Result<RequestOptionsJson, SerializationError> {
    require(&options.challenge, "challenge")?;

    Ok(RequestOptionsJson {
        challenge: options.challenge.clone().into(),
        allow_credentials: options.allow_credentials.as_deref().map(descriptors_to_json),
        extensions: options.extensions.clone(),
        rp_id: options.rp_id.clone(),
        timeout: options.timeout,
        user_verification: options.user_verification,
    })
}

pub fn decode_creation_options(
    options: CreationOptionsJson,
) -> Result<CreationOptions, SerializationError> {
    require(&options.challenge, "challenge")?;
    require(&options.user.id, "user.id")?;

    Ok(CreationOptions {
        rp: options.rp,
        user: User {
            id: options.user.id.into(),
            name: options.user.name,
            display_name: options.user.display_name,
        },
        challenge: options.challenge.into(),
        pub_key_cred_params: options.pub_key_cred_params,
        timeout: options.timeout,
        exclude_credentials: options.exclude_credentials.map(descriptors_from_json),
        authenticator_selection: options.authenticator_selection,
        attestation: options.attestation,
        extensions: options.extensions,
    })
}

pub fn decode_request_options(
    options: RequestOptionsJson,
) -> Result<RequestOptions, SerializationError> {
    require(&options.challenge, "challenge")?;

    Ok(RequestOptions {
        challenge: options.challenge.into(),
        allow_credentials: options.allow_credentials.map(descriptors_from_json),
        rp_id: options.rp_id,
        timeout: options.timeout,
        user_verification: options.user_verification,
        extensions: options.extensions,
    })
}
