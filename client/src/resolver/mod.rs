//! Tiered identity resolution with local-backup recovery.

pub(crate) mod error;

pub use error::{ResolverError, Result as ResolverResult};

use crate::backup::BackupCache;
use crate::profile::{BackupRecord, ResolutionOutcome};
use crate::transport::{ProfileTransport, TierFailure};

use std::future::Future;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

type FlightReceiver = watch::Receiver<Option<ResolverResult<ResolutionOutcome>>>;

/// Orchestrates the ordered fallback chain: primary source, secondary
/// source, local backup.
///
/// Tiers run strictly sequentially. Running them in parallel would
/// waste a working secondary call while a slow primary answer is still
/// in flight; the added latency when the primary is entirely down is
/// accepted and bounded by the per-tier timeout.
///
/// `resolve()` always settles into exactly one of the four outcomes.
/// Concurrent triggers share a single in-flight chain; followers await
/// the leader's result instead of starting a second round-trip
/// sequence.
pub struct ProfileResolver<T: ProfileTransport> {
    transport: T,
    cache: BackupCache,
    tier_timeout: Duration,
    flight: Mutex<Option<FlightReceiver>>,
    cancel_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl<T: ProfileTransport> ProfileResolver<T> {
    pub fn new(transport: T, cache: BackupCache, tier_timeout: Duration) -> Self {
        Self {
            transport,
            cache,
            tier_timeout,
            flight: Mutex::new(None),
            cancel_tx: Mutex::new(None),
        }
    }

    /// Resolve identity through the fallback chain.
    ///
    /// At most two network calls and at most one backup write per
    /// chain. Tier failures never escape; the only error is
    /// [`ResolverError::Cancelled`].
    pub async fn resolve(&self) -> ResolverResult<ResolutionOutcome> {
        let (result_tx, cancel_rx) = {
            let mut flight = self.flight.lock().await;

            if let Some(rx) = flight.as_ref() {
                // Another trigger is already running the chain.
                let rx = rx.clone();
                drop(flight);
                return Self::await_flight(rx).await;
            }

            let (result_tx, result_rx) = watch::channel(None);
            *flight = Some(result_rx);

            let (cancel_tx, cancel_rx) = watch::channel(false);
            *self.cancel_tx.lock().await = Some(cancel_tx);

            (result_tx, cancel_rx)
        };

        let result = self.run_chain(cancel_rx).await;

        {
            let mut flight = self.flight.lock().await;
            *flight = None;
            *self.cancel_tx.lock().await = None;
        }

        // Followers cloned their receivers before the flight slot was
        // cleared; they still observe this send.
        let _ = result_tx.send(Some(result.clone()));

        result
    }

    /// Cancel the in-flight resolution, if any.
    ///
    /// The chain stops at its next suspension point; a late-arriving
    /// response neither writes to the backup store nor produces an
    /// outcome.
    pub async fn cancel(&self) {
        if let Some(tx) = self.cancel_tx.lock().await.as_ref() {
            info!("Cancellation requested for in-flight resolution");
            let _ = tx.send(true);
        }
    }

    /// Wait for the leader's published result.
    async fn await_flight(mut rx: FlightReceiver) -> ResolverResult<ResolutionOutcome> {
        loop {
            if let Some(result) = rx.borrow().clone() {
                return result;
            }
            if rx.changed().await.is_err() {
                // Leader dropped without publishing
                return Err(ResolverError::Cancelled);
            }
        }
    }

    /// The fixed-precedence chain. No retries within a tier.
    async fn run_chain(
        &self,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> ResolverResult<ResolutionOutcome> {
        // Tier 1: primary source. An explicit unauthenticated answer
        // falls through exactly like any other failure; no credential
        // refresh is attempted.
        match self
            .call_tier(self.transport.fetch_profile(), &mut cancel_rx)
            .await?
        {
            Ok(profile) => {
                Self::check_cancelled(&cancel_rx)?;
                self.store_backup(&BackupRecord::from(&profile));
                info!("Resolved full profile for wallet {}", profile.wallet);
                return Ok(ResolutionOutcome::Resolved(profile));
            }
            Err(failure) => {
                warn!("Primary source unavailable, trying session info: {failure}");
            }
        }

        // Tier 2: secondary source.
        match self
            .call_tier(self.transport.fetch_session_info(), &mut cancel_rx)
            .await?
        {
            Ok(session) => {
                Self::check_cancelled(&cancel_rx)?;
                self.store_backup(&BackupRecord::from(&session));
                info!(
                    "Partially resolved session for wallet {}",
                    session.wallet_address
                );
                return Ok(ResolutionOutcome::PartiallyResolved(session));
            }
            Err(failure) => {
                warn!("Secondary source unavailable, consulting backup: {failure}");
            }
        }

        // Tier 3: local backup. No further network calls.
        match self.cache.get() {
            Ok(Some(record)) => {
                info!("Recovered identity from backup: wallet {}", record.wallet);
                Ok(ResolutionOutcome::RecoveredFromBackup(record))
            }
            Ok(None) => Ok(ResolutionOutcome::Unauthenticated),
            Err(e) => {
                warn!("Backup store unreadable: {e}");
                Ok(ResolutionOutcome::Unauthenticated)
            }
        }
    }

    /// Run one tier under the per-tier deadline, racing cancellation.
    ///
    /// A timed-out tier is classified as a transport failure so the
    /// chain advances; cancellation aborts the chain outright.
    async fn call_tier<F, O>(
        &self,
        tier: F,
        cancel_rx: &mut watch::Receiver<bool>,
    ) -> ResolverResult<Result<O, TierFailure>>
    where
        F: Future<Output = Result<O, TierFailure>>,
    {
        if *cancel_rx.borrow() {
            return Err(ResolverError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel_rx.changed() => Err(ResolverError::Cancelled),
            answer = tokio::time::timeout(self.tier_timeout, tier) => {
                Ok(answer.unwrap_or_else(|_| Err(TierFailure::timeout(self.tier_timeout))))
            }
        }
    }

    fn check_cancelled(cancel_rx: &watch::Receiver<bool>) -> ResolverResult<()> {
        if *cancel_rx.borrow() {
            Err(ResolverError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Successful tiers overwrite the backup slot; a failed write must
    /// not fail the resolution.
    fn store_backup(&self, record: &BackupRecord) {
        if let Err(e) = self.cache.put(record) {
            warn!("Failed to persist identity backup: {e}");
        }
    }
}
