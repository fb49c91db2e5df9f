//! The `{ok, data, error}` wrapper every outcome is returned in.
//!
//! This is the only channel by which a failure crosses from native code back
//! to the calling script, so the shape is strict: `ok: true` carries `data`
//! and nothing else, `ok: false` carries `error` (and a `code` to branch on)
//! and never `data`.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `code` used when a failure envelope omits one.
pub const UNKNOWN_FAILURE_CODE: &str = "unknown";

/// Emitted if an envelope itself cannot be serialised.
const ENCODER_FAILURE: &str =
    r#"{"ok":false,"error":"failed to encode the bridge response","code":"internal"}"#;

/// The outcome of one bridge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    /// The call succeeded with `T`.
    Success(T),
    /// The call failed.
    Failure {
        /// A stable machine-readable discriminator.
        code: String,
        /// A human readable message.
        message: String,
    },
}

impl<T> Envelope<T> {
    /// Wrap a failure.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Envelope::Failure {
            code: code.into(),
            message: message.into(),
        }
    }

    /// `true` for [Envelope::Success].
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// The failure code, if this is a failure.
    pub fn code(&self) -> Option<&str> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure { code, .. } => Some(code),
        }
    }

    /// Convert into a plain [Result], failures as `(code, message)`.
    pub fn into_result(self) -> Result<T, (String, String)> {
        match self {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure { code, message } => Err((code, message)),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Encode as a JSON string. Never fails; an encoder failure is itself
    /// reported as a failure envelope.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| ENCODER_FAILURE.to_string())
    }
}

impl<T> From<Result<T, (String, String)>> for Envelope<T> {
    fn from(r: Result<T, (String, String)>) -> Self {
        match r {
            Ok(data) => Envelope::Success(data),
            Err((code, message)) => Envelope::Failure { code, message },
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Envelope::Success(data) => {
                let mut st = serializer.serialize_struct("Envelope", 2)?;
                st.serialize_field("ok", &true)?;
                st.serialize_field("data", data)?;
                st.end()
            }
            Envelope::Failure { code, message } => {
                let mut st = serializer.serialize_struct("Envelope", 3)?;
                st.serialize_field("ok", &false)?;
                st.serialize_field("error", message)?;
                st.serialize_field("code", code)?;
                st.end()
            }
        }
    }
}

#[derive(Deserialize)]
struct RawEnvelope<T> {
    ok: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl<'de, T> Deserialize<'de> for Envelope<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        match (raw.ok, raw.data, raw.error) {
            (true, Some(data), None) => Ok(Envelope::Success(data)),
            (false, None, Some(message)) => Ok(Envelope::Failure {
                code: raw
                    .code
                    .unwrap_or_else(|| UNKNOWN_FAILURE_CODE.to_string()),
                message,
            }),
            (true, None, _) => Err(D::Error::custom("envelope is ok but carries no data")),
            (false, _, None) => Err(D::Error::custom("envelope failed but carries no error")),
            _ => Err(D::Error::custom("envelope carries both data and error")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_shape() {
        let e: Envelope<serde_json::Value> = Envelope::Success(json!({"id": "AAEC"}));
        let v: serde_json::Value = serde_json::from_str(&e.to_json()).unwrap();
        assert_eq!(v, json!({"ok": true, "data": {"id": "AAEC"}}));
        assert!(v.get("error").is_none());
    }

    #[test]
    fn failure_shape() {
        let e: Envelope<serde_json::Value> = Envelope::failure("cancelled", "user cancelled");
        let v: serde_json::Value = serde_json::from_str(&e.to_json()).unwrap();
        assert_eq!(
            v,
            json!({"ok": false, "error": "user cancelled", "code": "cancelled"})
        );
        assert!(v.get("data").is_none());
    }

    #[test]
    fn parse_round_trip() {
        let e: Envelope<String> = Envelope::Success("x".to_string());
        assert_eq!(serde_json::from_str::<Envelope<String>>(&e.to_json()).unwrap(), e);

        let f: Envelope<String> = Envelope::failure("platform", "nope");
        assert_eq!(serde_json::from_str::<Envelope<String>>(&f.to_json()).unwrap(), f);
    }

    #[test]
    fn parse_defaults_missing_code() {
        let e: Envelope<String> = serde_json::from_str(r#"{"ok":false,"error":"boom"}"#).unwrap();
        assert_eq!(e.code(), Some(UNKNOWN_FAILURE_CODE));
    }

    #[test]
    fn parse_rejects_inconsistent() {
        assert!(serde_json::from_str::<Envelope<String>>(r#"{"ok":true}"#).is_err());
        assert!(serde_json::from_str::<Envelope<String>>(r#"{"ok":false}"#).is_err());
        assert!(serde_json::from_str::<Envelope<String>>(
            r#"{"ok":true,"data":"x","error":"y"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<Envelope<String>>(
            r#"{"ok":false,"data":"x","error":"y"}"#
        )
        .is_err());
    }
}
