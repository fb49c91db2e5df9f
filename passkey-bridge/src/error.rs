use base64urlsafedata::DecodeError;
use passkey_bridge_proto::{CeremonyKind, Envelope};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Options could not be put on, or taken off, the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// A mandatory option member was absent or empty.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// The native ceremony output was incomplete or malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("field {field} is not valid base64url: {source}")]
    InvalidEncoding {
        field: &'static str,
        source: DecodeError,
    },
    #[error("missing field in native credential: {0}")]
    MissingField(&'static str),
    #[error("unknown authenticator attachment: {0:?}")]
    UnknownAttachment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// The user dismissed the platform UI.
    Cancelled,
    /// The platform refused the ceremony.
    NotAllowed,
    /// Passkeys are unavailable on this platform.
    NotSupported,
    Other,
}

impl fmt::Display for PlatformErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformErrorKind::Cancelled => "cancelled",
            PlatformErrorKind::NotAllowed => "not allowed",
            PlatformErrorKind::NotSupported => "not supported",
            PlatformErrorKind::Other => "platform error",
        })
    }
}

/// A failure reported by the native credential service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct PlatformError {
    pub kind: PlatformErrorKind,
    pub message: String,
}

impl PlatformError {
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        PlatformError {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Cancelled, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Other, message)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("a credential ceremony is already in progress")]
    ConcurrentRequest,
    #[error("expected a {expected} credential, the platform returned {actual}")]
    UnexpectedCredentialType {
        expected: CeremonyKind,
        actual: CeremonyKind,
    },
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A failure envelope, as seen by a client.
    #[error("{message} ({code})")]
    Rejected { code: String, message: String },
}

impl BridgeError {
    /// The stable code a failure envelope carries for this error.
    pub fn code(&self) -> &str {
        match self {
            BridgeError::Decode(_) => "decode",
            BridgeError::Serialization(SerializationError::MissingRequiredField(_)) => {
                "missing_required_field"
            }
            BridgeError::Parse(ParseError::InvalidEncoding { .. }) => "invalid_encoding",
            BridgeError::Parse(ParseError::MissingField(_)) => "missing_field",
            BridgeError::Parse(ParseError::UnknownAttachment(_)) => "unknown_attachment",
            BridgeError::ConcurrentRequest => "concurrent_request",
            BridgeError::UnexpectedCredentialType { .. } => "unexpected_credential_type",
            BridgeError::Platform(e) if e.kind == PlatformErrorKind::Cancelled => "cancelled",
            BridgeError::Platform(_) => "platform",
            BridgeError::InvalidPayload(_) => "invalid_payload",
            BridgeError::UnknownCommand(_) => "unknown_command",
            BridgeError::Rejected { code, .. } => code,
        }
    }

    /// Classify a failure to read an options payload. A base64url member
    /// that does not decode is reported as [BridgeError::Decode], anything
    /// else as [BridgeError::InvalidPayload].
    pub(crate) fn payload(e: &serde_json::Error) -> Self {
        let message = e.to_string();
        if e.is_data() && message.starts_with(base64urlsafedata::MALFORMED_PREFIX) {
            BridgeError::Decode(DecodeError::Malformed(message))
        } else {
            BridgeError::InvalidPayload(message)
        }
    }

    pub fn into_envelope<T>(self) -> Envelope<T> {
        let code = self.code().to_string();
        Envelope::failure(code, self.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::InvalidPayload(e.to_string())
    }
}
