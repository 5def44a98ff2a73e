//! The check-in orchestrator.
//!
//! Drives one badge scan at a time from reader acquisition to outcome,
//! serializing scans so overlapping check-ins for the same tag cannot race
//! past the server's duplicate check.

use crate::outcome::ScanOutcome;
use crate::state::{ScanState, ScanStateMachine};
use lanyard_api::{ApiOperation, ApiRequest, Transport, decode_check_in, decode_user_get};
use lanyard_core::{
    CheckDirection, CheckInRequest, Error, Result, TagName,
    constants::{DEFAULT_READ_TIMEOUT, DEFAULT_TRANSPORT_TIMEOUT},
};
use lanyard_reader::{BadgeReader, ReaderSession};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Configuration for the orchestrator.
///
/// # Example
///
/// ```
/// use lanyard_checkin::OrchestratorConfig;
/// use std::time::Duration;
///
/// let config = OrchestratorConfig {
///     read_timeout: Duration::from_secs(10),
///     ..OrchestratorConfig::default()
/// };
/// assert!(config.resolve_before_submit);
/// ```
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Timeout for each reader operation (open, read).
    pub read_timeout: Duration,

    /// Timeout for each transport exchange (resolve, submit).
    pub transport_timeout: Duration,

    /// Resolve the user and prior tag state before submitting. Skipping it
    /// saves a round trip; the duplicate check then falls back to the
    /// refreshed state in the mutation response.
    pub resolve_before_submit: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT),
            transport_timeout: Duration::from_millis(DEFAULT_TRANSPORT_TIMEOUT),
            resolve_before_submit: true,
        }
    }
}

/// Orchestrates the scan-to-outcome cycle against a reader and a transport.
///
/// Processes one badge at a time to completion: `process_scan` takes
/// `&mut self`, so a second scan cannot start until the current one reached
/// a terminal state. Every scan runs a fresh [`ScanStateMachine`]; no state
/// carries across scans.
pub struct CheckInOrchestrator<R, T> {
    reader: R,
    transport: T,
    config: OrchestratorConfig,
}

impl<R: BadgeReader, T: Transport> CheckInOrchestrator<R, T> {
    /// Create an orchestrator with default configuration.
    pub fn new(reader: R, transport: T) -> Self {
        Self::with_config(reader, transport, OrchestratorConfig::default())
    }

    /// Create an orchestrator with explicit configuration.
    pub fn with_config(reader: R, transport: T, config: OrchestratorConfig) -> Self {
        Self {
            reader,
            transport,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Process one scan event: read the badge, decode it, and check the
    /// user in to (or out of) `tag`.
    ///
    /// # Errors
    ///
    /// Any variant of the closed error taxonomy; see [`process_scan_cancellable`]
    /// for the full contract.
    ///
    /// [`process_scan_cancellable`]: Self::process_scan_cancellable
    pub async fn process_scan(
        &mut self,
        tag: &TagName,
        direction: CheckDirection,
    ) -> Result<ScanOutcome> {
        self.process_scan_cancellable(tag, direction, &CancellationToken::new())
            .await
    }

    /// Process one scan event with caller-driven cancellation.
    ///
    /// Returns [`ScanOutcome::Completed`] when the mutation was applied and
    /// [`ScanOutcome::AlreadyInState`] when the tag was already in the
    /// requested state — callers must treat the latter as a notable success,
    /// not a failure.
    ///
    /// # Errors
    ///
    /// - `Error::Timeout` — a reader or transport operation exceeded its
    ///   configured timeout; the reader session is released
    /// - `Error::MalformedTag` — the tag bytes did not decode; nothing was
    ///   submitted
    /// - `Error::UnknownUser` — the identifier matched no service user
    /// - `Error::CheckInRejected` — the service refused the mutation for a
    ///   reason other than the tag already being in the requested state
    /// - `Error::Transport` — network/protocol failure; the mutation is NOT
    ///   retried, since it may or may not have been applied. Re-scanning is
    ///   safe: the server-side duplicate detection adjudicates
    /// - `Error::Cancelled` — `cancel` fired; an in-flight mutation is not
    ///   retracted, so callers must not assume it did not land
    /// - `Error::Reader` — hardware failure from the badge reader
    pub async fn process_scan_cancellable(
        &mut self,
        tag: &TagName,
        direction: CheckDirection,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        let mut machine = ScanStateMachine::new();
        let result = self.run_scan(&mut machine, tag, direction, cancel).await;

        match &result {
            Ok(outcome) => {
                machine.transition_to(ScanState::Completed)?;
                info!(
                    user = %outcome.user().id,
                    %tag,
                    %direction,
                    already_in_state = outcome.is_already_in_state(),
                    "scan completed"
                );
            }
            Err(error) => {
                if !machine.current_state().is_terminal() {
                    machine.transition_to(ScanState::Failed)?;
                }
                warn!(%error, %tag, %direction, "scan failed");
            }
        }

        result
    }

    /// The scan body: transitions the machine through the active states and
    /// leaves the terminal transition to the caller.
    async fn run_scan(
        &mut self,
        machine: &mut ScanStateMachine,
        tag: &TagName,
        direction: CheckDirection,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        machine.transition_to(ScanState::Reading)?;
        debug!(%tag, %direction, "scan started");

        let read_timeout = self.config.read_timeout;
        let mut session = match timeout(read_timeout, self.reader.open_session()).await {
            Ok(opened) => opened?,
            Err(_) => return Err(Error::timeout(read_timeout.as_millis() as u64)),
        };

        let read_result = match timeout(read_timeout, session.read_tag_bytes()).await {
            Ok(read) => read,
            Err(_) => Err(Error::timeout(read_timeout.as_millis() as u64)),
        };

        // Release the device before acting on the read result, so no session
        // survives a failed scan.
        if let Err(error) = session.close().await {
            warn!(%error, "reader session did not close cleanly");
        }
        let raw = read_result?;

        machine.transition_to(ScanState::Decoding)?;
        let badge = lanyard_ndef::decode(&raw)?;
        debug!(user = %badge, "badge decoded");

        // The identifier is decoded and validated: the mutation may exist now.
        let request = CheckInRequest::new(badge, tag.clone(), direction);

        let prior_checked_in = if self.config.resolve_before_submit {
            machine.transition_to(ScanState::Resolving)?;
            self.resolve_prior_state(&request, cancel).await?
        } else {
            None
        };

        machine.transition_to(ScanState::Submitting)?;
        self.submit(request, prior_checked_in, cancel).await
    }

    /// Confirm the user exists and is eligible, and capture the prior
    /// `checked_in` value for the targeted tag.
    async fn resolve_prior_state(
        &self,
        request: &CheckInRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<bool>> {
        let api_request = ApiOperation::UserGet {
            id: request.user().as_str().to_owned(),
        }
        .into_request()?;

        let response = self.execute(&api_request, cancel).await?;
        let resolved = decode_user_get(response)?
            .ok_or_else(|| Error::unknown_user(request.user().as_str()))?;

        if !resolved.user.is_eligible() {
            return Err(Error::rejected("user is not accepted and confirmed"));
        }

        Ok(resolved
            .tag_state(request.tag())
            .map(|state| state.checked_in))
    }

    /// Submit the mutation and classify the service's answer.
    async fn submit(
        &self,
        request: CheckInRequest,
        prior_checked_in: Option<bool>,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        let direction = request.direction();
        let tag = request.tag().clone();
        let user_id = request.user().as_str().to_owned();

        let api_request = ApiOperation::from(request).into_request()?;
        let response = self.execute(&api_request, cancel).await?;
        let payload = decode_check_in(response)?.ok_or_else(|| Error::unknown_user(&user_id))?;

        let state = payload
            .tag_state(&tag)
            .cloned()
            .ok_or_else(|| Error::transport(format!("response missing state for tag {tag}")))?;
        let user = payload.user;

        if state.checkin_success {
            return Ok(ScanOutcome::Completed { user, tag: state });
        }

        // The service refused to flip the state. A refusal whose requested
        // direction matches the pre-existing value is the repeated-scan case,
        // which is an outcome, not an error.
        let pre_existing = prior_checked_in.unwrap_or(state.checked_in);
        if pre_existing == direction.as_bool() {
            Ok(ScanOutcome::AlreadyInState { user, tag: state })
        } else {
            Err(Error::rejected(format!(
                "service refused {direction} for tag {tag}"
            )))
        }
    }

    /// One transport exchange, bounded by the configured timeout and the
    /// caller's cancellation token. Cancellation does not retract an
    /// in-flight mutation (fire-and-forget at the transport boundary).
    async fn execute(&self, request: &ApiRequest, cancel: &CancellationToken) -> Result<Value> {
        let transport_timeout = self.config.transport_timeout;
        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = timeout(transport_timeout, self.transport.execute(request)) => match result {
                Ok(response) => response,
                Err(_) => Err(Error::timeout(transport_timeout.as_millis() as u64)),
            },
        }
    }
}
