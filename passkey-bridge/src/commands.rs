//! Routing of named commands, as a host's invoke channel delivers them, to a
//! coordinator.

use passkey_bridge_proto::{Command, CreateCredentialRequest, Envelope, GetCredentialRequest};

use crate::coordinator::CeremonyCoordinator;
use crate::error::BridgeError;
use crate::service::CredentialService;

fn reject(e: BridgeError) -> String {
    warn!(code = e.code(), "command rejected: {}", e);
    let envelope: Envelope<()> = e.into_envelope();
    envelope.to_json()
}

/// Answer `command` with `payload_json` as its arguments. Always returns
/// envelope JSON.
pub async fn dispatch<S>(
    coordinator: &CeremonyCoordinator<S>,
    command: &str,
    payload_json: &str,
) -> String
where
    S: CredentialService,
{
    let Some(cmd) = Command::parse(command, &coordinator.config().plugin_name) else {
        return reject(BridgeError::UnknownCommand(command.to_string()));
    };
    trace!(%cmd, "dispatch");

    match cmd {
        Command::CreateCredential => {
            match serde_json::from_str::<CreateCredentialRequest>(payload_json) {
                Ok(req) => coordinator.create_credential(&req.creation_params).await,
                Err(e) => reject(e.into()),
            }
        }
        Command::GetCredential => match serde_json::from_str::<GetCredentialRequest>(payload_json)
        {
            Ok(req) => coordinator.get_credential(&req.get_params).await,
            Err(e) => reject(e.into()),
        },
    }
}
