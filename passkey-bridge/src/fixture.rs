//! A [CredentialService] that replays canned native replies, for tests and
//! for driving the bridge without a platform.
//!
//! Fixtures are JSON, one optional [NativeReply] per ceremony kind:
//!
//! ```json
//! {
//!     "registration": {"registration": {"id": "AQID", "rawAttestationObject": "o2Nm", "clientDataJSON": "e30"}},
//!     "assertion": "cancelled"
//! }
//! ```

use async_trait::async_trait;
use passkey_bridge_proto::NativeReply;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{PlatformError, PlatformErrorKind};
use crate::native::native_outcome;
use crate::service::{AssertionRequest, CredentialService, NativeCredential, RegistrationRequest};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Fixture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    registration: Option<NativeReply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assertion: Option<NativeReply>,
}

#[derive(Debug, Default)]
pub struct FixtureService {
    fixture: Fixture,
    registration_calls: AtomicUsize,
    assertion_calls: AtomicUsize,
    last_registration: Mutex<Option<RegistrationRequest>>,
    last_assertion: Mutex<Option<AssertionRequest>>,
}

impl FixtureService {
    /// A service with no replies; every ceremony is answered as unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::from_fixture)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader).map(Self::from_fixture)
    }

    fn from_fixture(fixture: Fixture) -> Self {
        FixtureService {
            fixture,
            ..Default::default()
        }
    }

    pub fn with_registration(mut self, reply: NativeReply) -> Self {
        self.fixture.registration = Some(reply);
        self
    }

    pub fn with_assertion(mut self, reply: NativeReply) -> Self {
        self.fixture.assertion = Some(reply);
        self
    }

    pub fn registration_calls(&self) -> usize {
        self.registration_calls.load(Ordering::SeqCst)
    }

    pub fn assertion_calls(&self) -> usize {
        self.assertion_calls.load(Ordering::SeqCst)
    }

    /// The request of the most recent registration ceremony.
    pub fn last_registration(&self) -> Option<RegistrationRequest> {
        self.last_registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The request of the most recent assertion ceremony.
    pub fn last_assertion(&self) -> Option<AssertionRequest> {
        self.last_assertion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replay(reply: Option<&NativeReply>) -> Result<NativeCredential, PlatformError> {
        match reply {
            Some(reply) => native_outcome(reply.clone()),
            None => Err(PlatformError::new(
                PlatformErrorKind::NotSupported,
                "no fixture for this ceremony",
            )),
        }
    }
}

#[async_trait]
impl CredentialService for FixtureService {
    async fn perform_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<NativeCredential, PlatformError> {
        self.registration_calls.fetch_add(1, Ordering::SeqCst);
        trace!(rp_id = %request.rp_id, "fixture registration");
        *self
            .last_registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request);
        Self::replay(self.fixture.registration.as_ref())
    }

    async fn perform_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<NativeCredential, PlatformError> {
        self.assertion_calls.fetch_add(1, Ordering::SeqCst);
        trace!(rp_id = %request.rp_id, "fixture assertion");
        *self
            .last_assertion
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request);
        Self::replay(self.fixture.assertion.as_ref())
    }
}
