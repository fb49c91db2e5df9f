//! The commands the bridge answers and their argument payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Command name of the registration ceremony.
pub const CREATE_CREDENTIAL: &str = "create_credential";
/// Command name of the authentication ceremony.
pub const GET_CREDENTIAL: &str = "get_credential";

/// Every command the bridge answers.
pub const COMMANDS: &[&str] = &[CREATE_CREDENTIAL, GET_CREDENTIAL];

/// A command the bridge answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `create_credential`
    CreateCredential,
    /// `get_credential`
    GetCredential,
}

impl Command {
    /// The bare command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateCredential => CREATE_CREDENTIAL,
            Command::GetCredential => GET_CREDENTIAL,
        }
    }

    /// The name qualified for invocation through a host, as in
    /// `plugin:passkey-bridge|create_credential`.
    pub fn qualified(&self, plugin_name: &str) -> String {
        format!("plugin:{}|{}", plugin_name, self.name())
    }

    /// Resolve either a bare name or a name qualified with `plugin_name`.
    /// A name qualified for any other plugin does not resolve.
    pub fn parse(command: &str, plugin_name: &str) -> Option<Command> {
        let bare = match command.strip_prefix("plugin:") {
            Some(rest) => {
                let (plugin, cmd) = rest.split_once('|')?;
                if plugin != plugin_name {
                    return None;
                }
                cmd
            }
            None => command,
        };

        match bare {
            CREATE_CREDENTIAL => Some(Command::CreateCredential),
            GET_CREDENTIAL => Some(Command::GetCredential),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments of [CREATE_CREDENTIAL]. The options travel as JSON text, not as
/// a nested object.
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialRequest {
    /// [CreationOptionsJson][crate::CreationOptionsJson], as JSON text.
    pub creation_params: String,
}

/// Arguments of [GET_CREDENTIAL].
#[derive(Debug, Serialize, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetCredentialRequest {
    /// [RequestOptionsJson][crate::RequestOptionsJson], as JSON text.
    pub get_params: String,
}
