use async_trait::async_trait;
use passkey_bridge::native::native_outcome;
use passkey_bridge::prelude::*;
use passkey_bridge_proto::NativeReply;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Barrier, Notify};

fn creation_params() -> String {
    json!({
        "rp": {"id": "example.com", "name": "Example"},
        "user": {"id": "AQID", "name": "alice", "displayName": "Alice"},
        "challenge": "SGVsbG8",
        "pubKeyCredParams": [{"type": "public-key", "alg": -7}, {"type": "public-key", "alg": -257}]
    })
    .to_string()
}

fn get_params() -> String {
    json!({"challenge": "BAUG", "rpId": "example.com"}).to_string()
}

fn registration_reply(id: &[u8], attestation: &[u8]) -> NativeReply {
    serde_json::from_value(json!({
        "registration": {
            "id": base64urlsafedata::encode(id),
            "rawAttestationObject": base64urlsafedata::encode(attestation),
            "clientDataJSON": "e30"
        }
    }))
    .unwrap()
}

fn assertion_reply() -> NativeReply {
    serde_json::from_value(json!({
        "assertion": {
            "id": "AQID",
            "rawAuthenticatorData": "AAAA",
            "clientDataJSON": "e30",
            "signature": "MEUC"
        }
    }))
    .unwrap()
}

fn envelope(s: &str) -> Value {
    serde_json::from_str(s).unwrap()
}

/// Holds every ceremony until released.
struct GatedService {
    reply: NativeReply,
    started: Notify,
    release: Notify,
    calls: AtomicUsize,
}

impl GatedService {
    fn new(reply: NativeReply) -> Self {
        GatedService {
            reply,
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    async fn wait(&self) -> Result<NativeCredential, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        native_outcome(self.reply.clone())
    }
}

#[async_trait]
impl CredentialService for GatedService {
    async fn perform_registration(
        &self,
        _request: RegistrationRequest,
    ) -> Result<NativeCredential, PlatformError> {
        self.wait().await
    }

    async fn perform_assertion(
        &self,
        _request: AssertionRequest,
    ) -> Result<NativeCredential, PlatformError> {
        self.wait().await
    }
}

#[tokio::test]
async fn scenario_a_registration_bytes_survive() {
    let _ = tracing_subscriber::fmt::try_init();
    let id: Vec<u8> = (0..=255).rev().collect();
    let attestation: Vec<u8> = vec![0xa3, 0x63, 0x66, 0x6d, 0x74, 0x00, 0xff, 0xfe];

    let service = Arc::new(
        FixtureService::new().with_registration(registration_reply(&id, &attestation)),
    );
    let c = CeremonyCoordinator::new(service.clone());

    let v = envelope(&c.create_credential(&creation_params()).await);
    assert_eq!(v["ok"], true);
    assert!(v.get("error").is_none());

    let data = &v["data"];
    let id_text = data["id"].as_str().unwrap();
    assert_eq!(base64urlsafedata::decode(id_text).unwrap(), id);
    assert_eq!(
        base64urlsafedata::decode(data["rawId"].as_str().unwrap()).unwrap(),
        id
    );
    assert_eq!(
        base64urlsafedata::decode(data["attestationObject"].as_str().unwrap()).unwrap(),
        attestation
    );
    assert!(data.get("authenticatorData").is_none());

    let request = service.last_registration().unwrap();
    assert_eq!(request.challenge, base64urlsafedata::decode("SGVsbG8").unwrap());
    assert_eq!(request.user_id, vec![1, 2, 3]);
    assert_eq!(service.registration_calls(), 1);
}

#[tokio::test]
async fn scenario_b_assertion_without_user_handle() {
    let _ = tracing_subscriber::fmt::try_init();
    let c = CeremonyCoordinator::new(FixtureService::new().with_assertion(assertion_reply()));

    let v = envelope(&c.get_credential(&get_params()).await);
    assert_eq!(v["ok"], true);
    assert_eq!(v["data"]["signature"], "MEUC");
    assert_eq!(v["data"]["authenticatorData"], "AAAA");
    assert!(v["data"].get("userHandle").is_none());
}

#[tokio::test]
async fn scenario_c_missing_challenge_never_reaches_platform() {
    let _ = tracing_subscriber::fmt::try_init();
    let service =
        Arc::new(FixtureService::new().with_registration(registration_reply(&[1], &[2])));
    let c = CeremonyCoordinator::new(service.clone());

    let params = json!({
        "rp": {"id": "example.com", "name": "Example"},
        "user": {"id": "AQID", "name": "alice", "displayName": "Alice"},
        "pubKeyCredParams": []
    })
    .to_string();

    let v = envelope(&c.create_credential(&params).await);
    assert_eq!(v["ok"], false);
    assert_eq!(v["code"], "missing_required_field");
    assert!(v["error"].as_str().unwrap().contains("challenge"));
    assert!(v.get("data").is_none());
    assert_eq!(service.registration_calls(), 0);
    assert_eq!(c.state(), CeremonyState::Idle);
}

#[tokio::test]
async fn scenario_d_wrong_credential_kind() {
    let _ = tracing_subscriber::fmt::try_init();
    let service = Arc::new(FixtureService::new().with_registration(assertion_reply()));
    let c = CeremonyCoordinator::new(service.clone());

    let v = envelope(&c.create_credential(&creation_params()).await);
    assert_eq!(v["ok"], false);
    assert_eq!(v["code"], "unexpected_credential_type");
    assert_eq!(c.state(), CeremonyState::Idle);

    match c.register(&creation_params()).await {
        Err(BridgeError::UnexpectedCredentialType { expected, actual }) => {
            assert_eq!(expected, CeremonyKind::Registration);
            assert_eq!(actual, CeremonyKind::Assertion);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(service.registration_calls(), 2);
}

#[tokio::test]
async fn single_flight() {
    let _ = tracing_subscriber::fmt::try_init();
    let service = Arc::new(GatedService::new(registration_reply(&[7, 7], &[8])));
    let c = CeremonyCoordinator::new(service.clone());

    let params = creation_params();
    let first = c.create_credential(&params);
    let second = async {
        service.started.notified().await;
        assert_eq!(
            c.state(),
            CeremonyState::InFlight(CeremonyKind::Registration)
        );
        let rejected = c.get_credential(&get_params()).await;
        service.release.notify_one();
        rejected
    };

    let (first, second) = tokio::join!(first, second);

    let second = envelope(&second);
    assert_eq!(second["ok"], false);
    assert_eq!(second["code"], "concurrent_request");

    let first = envelope(&first);
    assert_eq!(first["ok"], true);
    assert_eq!(first["data"]["id"], "Bwc");

    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.state(), CeremonyState::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_flight_across_tasks() {
    let _ = tracing_subscriber::fmt::try_init();
    const CALLERS: usize = 8;

    let service = Arc::new(GatedService::new(registration_reply(&[7, 7], &[8])));
    let c = Arc::new(CeremonyCoordinator::new(service.clone()));
    let barrier = Arc::new(Barrier::new(CALLERS));
    let (tx, mut rx) = mpsc::unbounded_channel();

    for _ in 0..CALLERS {
        let c = c.clone();
        let barrier = barrier.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            barrier.wait().await;
            let reply = c.create_credential(&creation_params()).await;
            let _ = tx.send(envelope(&reply));
        });
    }
    drop(tx);

    // Everyone but the winner is turned away while the winner is held.
    for _ in 1..CALLERS {
        let v = rx.recv().await.unwrap();
        assert_eq!(v["ok"], false);
        assert_eq!(v["code"], "concurrent_request");
    }
    service.started.notified().await;
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);

    service.release.notify_one();
    let winner = rx.recv().await.unwrap();
    assert_eq!(winner["ok"], true);
    assert!(rx.recv().await.is_none());

    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.state(), CeremonyState::Idle);
}

#[tokio::test]
async fn recovery_after_every_outcome() {
    let _ = tracing_subscriber::fmt::try_init();
    for reply in [
        registration_reply(&[1], &[2]),
        NativeReply::Error("The operation couldn't be completed.".to_string()),
        NativeReply::Cancelled,
    ] {
        let service = Arc::new(
            FixtureService::new()
                .with_registration(reply)
                .with_assertion(assertion_reply()),
        );
        let c = CeremonyCoordinator::new(service.clone());

        c.create_credential(&creation_params()).await;
        assert_eq!(c.state(), CeremonyState::Idle);

        let v = envelope(&c.get_credential(&get_params()).await);
        assert_eq!(v["ok"], true);
        assert_eq!(service.assertion_calls(), 1);
    }
}

#[tokio::test]
async fn recovery_after_dropped_future() {
    let _ = tracing_subscriber::fmt::try_init();
    let service = Arc::new(GatedService::new(registration_reply(&[1], &[2])));
    let c = CeremonyCoordinator::new(service.clone());

    let params = creation_params();
    let mut pending = Box::pin(c.register(&params));
    assert!(futures::poll!(pending.as_mut()).is_pending());
    assert_eq!(
        c.state(),
        CeremonyState::InFlight(CeremonyKind::Registration)
    );
    drop(pending);
    assert_eq!(c.state(), CeremonyState::Idle);

    service.release.notify_one();
    let r = c.register(&params).await.unwrap();
    assert_eq!(r.raw_id, vec![1]);
    assert_eq!(service.calls.load(Ordering::SeqCst), 2);
}
