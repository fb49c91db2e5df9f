//! Single-flight coordination of native credential ceremonies.
//!
//! Platforms can present only one credential UI at a time, so a coordinator
//! accepts one ceremony and rejects any other until that one resolves. The
//! in-flight marker is released by a guard, so every way out of a ceremony
//! (an error, a panic, or the caller dropping the future) returns the
//! coordinator to [CeremonyState::Idle].

use futures::FutureExt;
use passkey_bridge_proto::{
    AssertionResult, CeremonyKind, CreationOptionsJson, CredentialResult, Envelope,
    RequestOptionsJson,
};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::parse::{parse_assertion, parse_registration};
use crate::serialize::{decode_creation_options, decode_request_options};
use crate::service::{AssertionRequest, CredentialService, NativeCredential, RegistrationRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyState {
    Idle,
    InFlight(CeremonyKind),
}

/// Holds [CeremonyState::InFlight] until dropped.
struct InFlight<'a> {
    state: &'a Mutex<CeremonyState>,
    kind: CeremonyKind,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = CeremonyState::Idle;
        trace!(kind = %self.kind, "ceremony finished, coordinator idle");
    }
}

pub struct CeremonyCoordinator<S> {
    service: S,
    config: BridgeConfig,
    state: Mutex<CeremonyState>,
}

impl<S> CeremonyCoordinator<S>
where
    S: CredentialService,
{
    pub fn new(service: S) -> Self {
        Self::with_config(service, BridgeConfig::default())
    }

    pub fn with_config(service: S, config: BridgeConfig) -> Self {
        CeremonyCoordinator {
            service,
            config,
            state: Mutex::new(CeremonyState::Idle),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn lock_state(&self) -> MutexGuard<'_, CeremonyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> CeremonyState {
        *self.lock_state()
    }

    fn begin(&self, kind: CeremonyKind) -> Result<InFlight<'_>> {
        let mut state = self.lock_state();
        match *state {
            CeremonyState::InFlight(current) => {
                debug!(requested = %kind, %current, "rejecting concurrent ceremony");
                Err(BridgeError::ConcurrentRequest)
            }
            CeremonyState::Idle => {
                *state = CeremonyState::InFlight(kind);
                trace!(%kind, "ceremony started");
                Ok(InFlight {
                    state: &self.state,
                    kind,
                })
            }
        }
    }

    /// Run a registration ceremony for `creation_params`, the JSON text of
    /// a [CreationOptionsJson].
    pub async fn register(&self, creation_params: &str) -> Result<CredentialResult> {
        let _in_flight = self.begin(CeremonyKind::Registration)?;
        if self.config.log_payloads {
            debug!(%creation_params, "create_credential");
        }

        let wire: CreationOptionsJson =
            serde_json::from_str(creation_params).map_err(|e| BridgeError::payload(&e))?;
        let options = decode_creation_options(wire)?;
        let rp_id = self.config.resolve_rp_id(options.rp.id.clone());
        let request = RegistrationRequest::from_options(options, rp_id)?;

        match self.service.perform_registration(request).await? {
            NativeCredential::Registration(rsp) => {
                if self.config.log_payloads {
                    debug!(?rsp, "native registration");
                }
                Ok(parse_registration(rsp)?)
            }
            other => Err(BridgeError::UnexpectedCredentialType {
                expected: CeremonyKind::Registration,
                actual: other.kind(),
            }),
        }
    }

    /// Run an assertion ceremony for `get_params`, the JSON text of a
    /// [RequestOptionsJson].
    pub async fn authenticate(&self, get_params: &str) -> Result<AssertionResult> {
        let _in_flight = self.begin(CeremonyKind::Assertion)?;
        if self.config.log_payloads {
            debug!(%get_params, "get_credential");
        }

        let wire: RequestOptionsJson =
            serde_json::from_str(get_params).map_err(|e| BridgeError::payload(&e))?;
        let options = decode_request_options(wire)?;
        let rp_id = self.config.resolve_rp_id(options.rp_id.clone());
        let request = AssertionRequest::from_options(options, rp_id)?;

        match self.service.perform_assertion(request).await? {
            NativeCredential::Assertion(rsp) => {
                if self.config.log_payloads {
                    debug!(?rsp, "native assertion");
                }
                Ok(parse_assertion(rsp)?)
            }
            other => Err(BridgeError::UnexpectedCredentialType {
                expected: CeremonyKind::Assertion,
                actual: other.kind(),
            }),
        }
    }

    /// [Self::register], answered as envelope JSON. Never fails.
    pub async fn create_credential(&self, creation_params: &str) -> String {
        let outcome = AssertUnwindSafe(self.register(creation_params))
            .catch_unwind()
            .await;
        into_envelope(CeremonyKind::Registration, outcome).to_json()
    }

    /// [Self::authenticate], answered as envelope JSON. Never fails.
    pub async fn get_credential(&self, get_params: &str) -> String {
        let outcome = AssertUnwindSafe(self.authenticate(get_params))
            .catch_unwind()
            .await;
        into_envelope(CeremonyKind::Assertion, outcome).to_json()
    }
}

fn into_envelope<T: Serialize>(
    kind: CeremonyKind,
    outcome: std::thread::Result<Result<T>>,
) -> Envelope<T> {
    match outcome {
        Ok(Ok(data)) => Envelope::Success(data),
        Ok(Err(e)) => {
            error!(%kind, code = e.code(), "ceremony failed: {}", e);
            e.into_envelope()
        }
        Err(_) => {
            error!(%kind, "native credential service panicked");
            Envelope::failure("platform", "the native credential service panicked")
        }
    }
}
