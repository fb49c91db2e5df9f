//! The seam between the coordinator and a platform credential service.

use async_trait::async_trait;
use passkey_bridge_proto::{
    AuthenticationResponseJson, CeremonyKind, CreationOptions, RegistrationResponseJson,
    RequestOptions,
};
use std::sync::Arc;

use crate::error::{PlatformError, SerializationError};

/// What a platform needs to create a credential.
///
/// The leading members are the minimal view AuthenticationServices works
/// from. `options` keeps everything that was decoded, for hosts such as
/// Credential Manager that take the whole `PublicKeyCredentialCreationOptions`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub user_id: Vec<u8>,
    pub user_name: String,
    pub display_name: Option<String>,
    pub options: CreationOptions,
}

impl RegistrationRequest {
    /// Build from decoded options. `rp_id` is the relying party id after any
    /// configured fallback was applied.
    pub fn from_options(
        mut options: CreationOptions,
        rp_id: Option<String>,
    ) -> Result<Self, SerializationError> {
        let rp_id = rp_id.ok_or(SerializationError::MissingRequiredField("rp.id"))?;
        options.rp.id = Some(rp_id.clone());
        let display_name = Some(options.user.display_name.clone()).filter(|n| !n.is_empty());
        Ok(RegistrationRequest {
            rp_id,
            challenge: options.challenge.clone(),
            user_id: options.user.id.clone(),
            user_name: options.user.name.clone(),
            display_name,
            options,
        })
    }
}

/// What a platform needs to produce an assertion. As with
/// [RegistrationRequest], `options` carries the full decoded request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub allowed_credential_ids: Option<Vec<Vec<u8>>>,
    pub options: RequestOptions,
}

impl AssertionRequest {
    pub fn from_options(
        mut options: RequestOptions,
        rp_id: Option<String>,
    ) -> Result<Self, SerializationError> {
        let rp_id = rp_id.ok_or(SerializationError::MissingRequiredField("rpId"))?;
        options.rp_id = Some(rp_id.clone());
        Ok(AssertionRequest {
            rp_id,
            challenge: options.challenge.clone(),
            allowed_credential_ids: options
                .allow_credentials
                .as_ref()
                .map(|list| list.iter().map(|d| d.id.clone()).collect()),
            options,
        })
    }
}

/// A credential as the platform produced it, tagged with its kind so a
/// coordinator never has to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCredential {
    Registration(RegistrationResponseJson),
    Assertion(AuthenticationResponseJson),
}

impl NativeCredential {
    pub fn kind(&self) -> CeremonyKind {
        match self {
            NativeCredential::Registration(_) => CeremonyKind::Registration,
            NativeCredential::Assertion(_) => CeremonyKind::Assertion,
        }
    }
}

/// A platform credential service, such as Credential Manager or
/// AuthenticationServices.
///
/// Each call drives one platform ceremony to completion and must not retry.
#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn perform_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<NativeCredential, PlatformError>;

    async fn perform_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<NativeCredential, PlatformError>;
}

#[async_trait]
impl<T> CredentialService for Arc<T>
where
    T: CredentialService + ?Sized,
{
    async fn perform_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<NativeCredential, PlatformError> {
        (**self).perform_registration(request).await
    }

    async fn perform_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<NativeCredential, PlatformError> {
        (**self).perform_assertion(request).await
    }
}
