//! Adapter for native hosts that answer through completion handlers.
//!
//! AuthenticationServices and Credential Manager both report the outcome of
//! a ceremony by calling back, at most once, on an arbitrary thread. A
//! [NativeHost] exposes that shape directly: a method name, the JSON
//! parameters, and a completion taking the JSON reply.
//! [CallbackService] turns each call into one future, so the coordinator
//! can simply `await` it.

use async_trait::async_trait;
use futures::channel::oneshot;
use passkey_bridge_proto::{NativeAssertionParams, NativeRegistrationParams, NativeReply};

use crate::error::{PlatformError, PlatformErrorKind};
use crate::serialize::descriptors_to_json;
use crate::service::{AssertionRequest, CredentialService, NativeCredential, RegistrationRequest};

pub const REGISTER_METHOD: &str = "register";
pub const AUTHENTICATE_METHOD: &str = "authenticate";

/// Receives the [NativeReply] JSON of one ceremony.
pub type Completion = Box<dyn FnOnce(String) + Send + 'static>;

pub trait NativeHost: Send + Sync {
    /// Start `method` with `request_json`. The host must call `completion`
    /// exactly once; dropping it uncalled is treated as a cancellation.
    fn invoke(&self, method: &str, request_json: String, completion: Completion);
}

/// Map a host's reply onto the result of a [CredentialService] call.
pub fn native_outcome(reply: NativeReply) -> Result<NativeCredential, PlatformError> {
    match reply {
        NativeReply::Registration(rsp) => Ok(NativeCredential::Registration(rsp)),
        NativeReply::Assertion(rsp) => Ok(NativeCredential::Assertion(rsp)),
        NativeReply::Error(message) => Err(PlatformError::other(message)),
        NativeReply::NotAllowed(message) => {
            Err(PlatformError::new(PlatformErrorKind::NotAllowed, message))
        }
        NativeReply::NotSupported(message) => {
            Err(PlatformError::new(PlatformErrorKind::NotSupported, message))
        }
        NativeReply::Cancelled => Err(PlatformError::cancelled("the user cancelled the request")),
    }
}

pub struct CallbackService<H> {
    host: H,
}

impl<H> CallbackService<H>
where
    H: NativeHost,
{
    pub fn new(host: H) -> Self {
        CallbackService { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    async fn call(
        &self,
        method: &str,
        request_json: String,
    ) -> Result<NativeCredential, PlatformError> {
        let (tx, rx) = oneshot::channel::<String>();
        self.host.invoke(
            method,
            request_json,
            Box::new(move |reply| {
                if tx.send(reply).is_err() {
                    debug!("native reply arrived after the ceremony was abandoned");
                }
            }),
        );

        let reply = rx
            .await
            .map_err(|_| PlatformError::cancelled("the native host dropped the request"))?;
        let reply: NativeReply = serde_json::from_str(&reply).map_err(|e| {
            error!(?e, "unreadable native reply");
            PlatformError::other(format!("unreadable native reply: {e}"))
        })?;
        native_outcome(reply)
    }
}

fn encode_params<T: serde::Serialize>(params: &T) -> Result<String, PlatformError> {
    serde_json::to_string(params)
        .map_err(|e| PlatformError::other(format!("could not encode native parameters: {e}")))
}

#[async_trait]
impl<H> CredentialService for CallbackService<H>
where
    H: NativeHost,
{
    async fn perform_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<NativeCredential, PlatformError> {
        let options = request.options;
        let params = NativeRegistrationParams {
            rp_id: request.rp_id,
            challenge: request.challenge.into(),
            user_id: request.user_id.into(),
            user_name: request.user_name,
            user_display_name: request.display_name,
            rp_name: Some(options.rp.name).filter(|n| !n.is_empty()),
            pub_key_cred_params: options.pub_key_cred_params,
            timeout: options.timeout,
            exclude_credentials: options
                .exclude_credentials
                .as_deref()
                .map(descriptors_to_json),
            authenticator_selection: options.authenticator_selection,
            attestation: options.attestation,
            extensions: options.extensions,
        };
        let request_json = encode_params(&params)?;
        self.call(REGISTER_METHOD, request_json).await
    }

    async fn perform_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<NativeCredential, PlatformError> {
        let options = request.options;
        let params = NativeAssertionParams {
            rp_id: request.rp_id,
            challenge: request.challenge.into(),
            allow_credential_ids: request
                .allowed_credential_ids
                .map(|ids| ids.into_iter().map(Into::into).collect()),
            allow_credentials: options.allow_credentials.as_deref().map(descriptors_to_json),
            timeout: options.timeout,
            user_verification: options.user_verification,
            extensions: options.extensions,
        };
        let request_json = encode_params(&params)?;
        self.call(AUTHENTICATE_METHOD, request_json).await
    }
}
