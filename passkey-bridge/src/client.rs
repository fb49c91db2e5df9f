//! The calling side of the bridge: build options, send them as a command,
//! and read the envelope that comes back.

use async_trait::async_trait;
use passkey_bridge_proto::{
    AssertionResult, Command, CreateCredentialRequest, CreationOptions, CredentialResult,
    Envelope, GetCredentialRequest, RequestOptions,
};
use serde::de::DeserializeOwned;

use crate::commands::dispatch;
use crate::config::DEFAULT_PLUGIN_NAME;
use crate::coordinator::CeremonyCoordinator;
use crate::error::{BridgeError, Result};
use crate::serialize::{serialize_creation_options, serialize_request_options};
use crate::service::CredentialService;

/// Something that can deliver a command to a bridge and return its reply.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn invoke(&self, command: &str, payload_json: &str) -> Result<String>;
}

#[async_trait]
impl<S> CommandTransport for CeremonyCoordinator<S>
where
    S: CredentialService,
{
    async fn invoke(&self, command: &str, payload_json: &str) -> Result<String> {
        Ok(dispatch(self, command, payload_json).await)
    }
}

pub struct PasskeyClient<T> {
    transport: T,
    plugin_name: String,
}

impl<T> PasskeyClient<T>
where
    T: CommandTransport,
{
    pub fn new(transport: T) -> Self {
        Self::with_plugin_name(transport, DEFAULT_PLUGIN_NAME)
    }

    pub fn with_plugin_name(transport: T, plugin_name: impl Into<String>) -> Self {
        PasskeyClient {
            transport,
            plugin_name: plugin_name.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send<R: DeserializeOwned>(&self, command: Command, payload: String) -> Result<R> {
        let reply = self
            .transport
            .invoke(&command.qualified(&self.plugin_name), &payload)
            .await?;
        let envelope: Envelope<R> = serde_json::from_str(&reply)?;
        envelope
            .into_result()
            .map_err(|(code, message)| BridgeError::Rejected { code, message })
    }

    /// Register a new credential.
    pub async fn create_credential(&self, options: &CreationOptions) -> Result<CredentialResult> {
        let creation_params = serde_json::to_string(&serialize_creation_options(options)?)?;
        let payload = serde_json::to_string(&CreateCredentialRequest { creation_params })?;
        self.send(Command::CreateCredential, payload).await
    }

    /// Authenticate with an existing credential.
    pub async fn get_credential(&self, options: &RequestOptions) -> Result<AssertionResult> {
        let get_params = serde_json::to_string(&serialize_request_options(options)?)?;
        let payload = serde_json::to_string(&GetCredentialRequest { get_params })?;
        self.send(Command::GetCredential, payload).await
    }
}
