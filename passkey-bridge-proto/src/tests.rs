use crate::attest::{CreationOptionsJson, RegistrationResponseJson};
use crate::auth::{AuthenticationResponseJson, RequestOptionsJson};
use crate::command::{Command, CreateCredentialRequest, GetCredentialRequest};
use crate::native::NativeReply;
use crate::options::AuthenticatorAttachment;

#[test]
fn creation_options_omit_absent_members() {
    let opts: CreationOptionsJson = serde_json::from_str(
        r#"{
        "rp": {"id": "example.com", "name": "Example"},
        "user": {"id": "AQID", "name": "alice", "displayName": "Alice"},
        "challenge": "BAUG",
        "pubKeyCredParams": [{"type": "public-key", "alg": -7}]
    }"#,
    )
    .unwrap();

    let v = serde_json::to_value(&opts).unwrap();
    let obj = v.as_object().unwrap();
    for absent in [
        "timeout",
        "excludeCredentials",
        "authenticatorSelection",
        "attestation",
        "extensions",
    ] {
        assert!(!obj.contains_key(absent), "{absent} should be omitted");
    }
    assert_eq!(v["user"]["displayName"], "Alice");
    assert_eq!(v["pubKeyCredParams"][0]["alg"], -7);
}

#[test]
fn creation_options_missing_challenge_reads_empty() {
    let opts: CreationOptionsJson = serde_json::from_str(
        r#"{
        "rp": {"name": "Example"},
        "user": {"name": "alice", "displayName": "Alice"}
    }"#,
    )
    .unwrap();
    assert!(opts.challenge.is_empty());
    assert!(opts.user.id.is_empty());
    assert!(opts.rp.id.is_none());
    assert!(opts.pub_key_cred_params.is_empty());
}

#[test]
fn null_challenge_reads_empty() {
    let opts: CreationOptionsJson = serde_json::from_str(
        r#"{
        "rp": {"name": "Example"},
        "user": {"id": null, "name": "alice", "displayName": "Alice"},
        "challenge": null
    }"#,
    )
    .unwrap();
    assert!(opts.challenge.is_empty());
    assert!(opts.user.id.is_empty());

    let opts: RequestOptionsJson = serde_json::from_str(r#"{"challenge": null}"#).unwrap();
    assert!(opts.challenge.is_empty());

    // a present value still has to decode
    assert!(serde_json::from_str::<RequestOptionsJson>(r#"{"challenge": "A"}"#).is_err());
}

#[test]
fn request_options_descriptor_defaults_type() {
    let opts: RequestOptionsJson = serde_json::from_str(
        r#"{
        "challenge": "AAEC",
        "allowCredentials": [{"id": "CQoL"}],
        "rpId": "example.com"
    }"#,
    )
    .unwrap();
    let allow = opts.allow_credentials.as_ref().unwrap();
    assert_eq!(allow[0].type_, "public-key");
    assert_eq!(allow[0].id, vec![9, 10, 11]);
    assert!(allow[0].transports.is_none());

    let v = serde_json::to_value(&opts).unwrap();
    assert!(v.get("timeout").is_none());
    assert!(v.get("userVerification").is_none());
    assert!(v["allowCredentials"][0].get("transports").is_none());
}

#[test]
fn registration_nested_shape() {
    let mut rsp: RegistrationResponseJson = serde_json::from_str(
        r#"{
        "id": "AQID",
        "rawId": "AQID",
        "type": "public-key",
        "authenticatorAttachment": "platform",
        "response": {
            "clientDataJSON": "e30",
            "attestationObject": "o2Nm",
            "transports": ["internal", "hybrid"]
        },
        "clientExtensionResults": {}
    }"#,
    )
    .unwrap();

    let members = rsp.response_members();
    assert_eq!(members.client_data_json.as_deref(), Some("e30"));
    assert_eq!(members.attestation_object.as_deref(), Some("o2Nm"));
    assert_eq!(
        members.transports,
        Some(vec!["internal".to_string(), "hybrid".to_string()])
    );
    assert_eq!(rsp.raw_id.as_deref(), Some("AQID"));
}

#[test]
fn registration_flat_shape() {
    let mut rsp: RegistrationResponseJson = serde_json::from_str(
        r#"{
        "id": "AQID",
        "rawAttestationObject": "o2Nm",
        "clientDataJSON": "e30"
    }"#,
    )
    .unwrap();

    assert!(rsp.response.is_none());
    let members = rsp.response_members();
    assert_eq!(members.client_data_json.as_deref(), Some("e30"));
    assert_eq!(members.attestation_object.as_deref(), Some("o2Nm"));
    assert!(rsp.raw_id.is_none());
}

#[test]
fn nested_members_win_over_flat() {
    let mut rsp: AuthenticationResponseJson = serde_json::from_str(
        r#"{
        "id": "AQID",
        "signature": "flat",
        "userHandle": "dXNlcg",
        "response": {
            "clientDataJSON": "e30",
            "authenticatorData": "AAAA",
            "signature": "nested"
        }
    }"#,
    )
    .unwrap();

    let members = rsp.response_members();
    assert_eq!(members.signature.as_deref(), Some("nested"));
    assert_eq!(members.user_handle.as_deref(), Some("dXNlcg"));
    assert_eq!(members.authenticator_data.as_deref(), Some("AAAA"));
}

#[test]
fn assertion_flat_raw_authenticator_data() {
    let mut rsp: AuthenticationResponseJson = serde_json::from_str(
        r#"{
        "id": "AQID",
        "rawAuthenticatorData": "AAAA",
        "clientDataJSON": "e30",
        "signature": "MEUC"
    }"#,
    )
    .unwrap();
    let members = rsp.response_members();
    assert_eq!(members.authenticator_data.as_deref(), Some("AAAA"));
    assert!(members.user_handle.is_none());
}

#[test]
fn attachment_from_str() {
    assert_eq!(
        "platform".parse::<AuthenticatorAttachment>(),
        Ok(AuthenticatorAttachment::Platform)
    );
    assert_eq!(
        "cross-platform".parse::<AuthenticatorAttachment>(),
        Ok(AuthenticatorAttachment::CrossPlatform)
    );
    assert_eq!(
        "hybrid".parse::<AuthenticatorAttachment>(),
        Err("hybrid".to_string())
    );
    assert_eq!(AuthenticatorAttachment::CrossPlatform.to_string(), "cross-platform");
}

#[test]
fn command_names() {
    assert_eq!(
        Command::parse("create_credential", "passkey-bridge"),
        Some(Command::CreateCredential)
    );
    assert_eq!(
        Command::parse("plugin:passkey-bridge|get_credential", "passkey-bridge"),
        Some(Command::GetCredential)
    );
    assert_eq!(
        Command::parse("plugin:other|get_credential", "passkey-bridge"),
        None
    );
    assert_eq!(Command::parse("plugin:passkey-bridge", "passkey-bridge"), None);
    assert_eq!(Command::parse("sign", "passkey-bridge"), None);
    assert_eq!(
        Command::CreateCredential.qualified("passkey-bridge"),
        "plugin:passkey-bridge|create_credential"
    );
}

#[test]
fn command_payload_keys() {
    let create: CreateCredentialRequest =
        serde_json::from_str(r#"{"creationParams": "{\"challenge\":\"BAUG\"}"}"#).unwrap();
    assert_eq!(create.creation_params, r#"{"challenge":"BAUG"}"#);

    let get = GetCredentialRequest {
        get_params: "{}".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&get).unwrap(),
        serde_json::json!({"getParams": "{}"})
    );
}

#[test]
fn native_reply_shapes() {
    let r: NativeReply = serde_json::from_str(r#""cancelled""#).unwrap();
    assert_eq!(r, NativeReply::Cancelled);

    let r: NativeReply = serde_json::from_str(r#"{"error": "not allowed"}"#).unwrap();
    assert_eq!(r, NativeReply::Error("not allowed".to_string()));

    let r: NativeReply = serde_json::from_str(r#"{"notSupported": "no passkeys"}"#).unwrap();
    assert_eq!(r, NativeReply::NotSupported("no passkeys".to_string()));

    let r: NativeReply = serde_json::from_str(
        r#"{"registration": {"id": "AQID", "rawAttestationObject": "o2Nm", "clientDataJSON": "e30"}}"#,
    )
    .unwrap();
    assert!(matches!(r, NativeReply::Registration(_)));

    let r: NativeReply = serde_json::from_str(
        r#"{"assertion": {"id": "AQID", "response": {"clientDataJSON": "e30", "authenticatorData": "AAAA", "signature": "MEUC"}}}"#,
    )
    .unwrap();
    assert!(matches!(r, NativeReply::Assertion(_)));
}
