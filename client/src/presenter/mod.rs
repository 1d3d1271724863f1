pub(crate) mod loader;
pub(crate) mod view_state;

pub use loader::DashboardLoader;
pub use view_state::ViewState;

use crate::profile::ResolutionOutcome;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

const DEGRADED_NOTICE: &str = "Profile information could not be fully loaded";

/// Maps a resolution outcome to an observable view state and schedules
/// any follow-up work.
pub struct RecoveryPresenter {
    state_tx: watch::Sender<ViewState>,
    loader: Arc<dyn DashboardLoader>,
    retry_delay: Duration,
    banner_duration: Duration,
}

impl RecoveryPresenter {
    /// Create a presenter.
    ///
    /// # Arguments
    /// * `loader` - Dependent-data loader for the degraded refresh
    /// * `retry_delay` - Delay before the one scheduled dependent load
    /// * `banner_duration` - How long the stale-data banner stays up
    pub fn new(
        loader: Arc<dyn DashboardLoader>,
        retry_delay: Duration,
        banner_duration: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(ViewState::Idle);

        Self {
            state_tx,
            loader,
            retry_delay,
            banner_duration,
        }
    }

    /// Subscribe to view-state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    /// Get current view state.
    pub fn state(&self) -> ViewState {
        self.state_tx.borrow().clone()
    }

    /// Mark the load as in flight. Called when resolution begins.
    pub fn mark_resolving(&self) {
        self.state_tx.send_replace(ViewState::Resolving);
    }

    /// Consume the resolution outcome. The single entry point through
    /// which identity state reaches presentation.
    pub fn present(&self, outcome: ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Resolved(profile) => {
                info!("Presenting full dashboard for wallet {}", profile.wallet);
                self.state_tx.send_replace(ViewState::Full { profile });
            }
            ResolutionOutcome::PartiallyResolved(session) => {
                info!(
                    "Presenting degraded dashboard for wallet {}",
                    session.wallet_address
                );
                self.state_tx.send_replace(ViewState::Degraded {
                    session,
                    holdings_available: false,
                    notice: DEGRADED_NOTICE.into(),
                });
                self.schedule_dependent_loads();
            }
            ResolutionOutcome::RecoveredFromBackup(record) => {
                info!("Presenting recovered dashboard for wallet {}", record.wallet);
                self.state_tx.send_replace(ViewState::Recovered {
                    record,
                    banner_visible: true,
                });
                self.schedule_banner_dismiss();
            }
            ResolutionOutcome::Unauthenticated => {
                info!("Presenting re-authentication prompt");
                self.state_tx.send_replace(ViewState::Unauthenticated {
                    modal_visible: true,
                    overlay_visible: true,
                });
            }
        }
    }

    /// Dismiss the re-authentication modal. Models the user clicking
    /// either the dismiss button or the backing overlay; both hide the
    /// modal and the overlay together.
    pub fn dismiss_modal(&self) {
        self.state_tx.send_modify(|state| {
            if let ViewState::Unauthenticated {
                modal_visible,
                overlay_visible,
            } = state
            {
                *modal_visible = false;
                *overlay_visible = false;
            }
        });
    }

    /// One dependent-data refresh after the fixed delay. Not a new
    /// resolution; the identity outcome for this load is already final.
    fn schedule_dependent_loads(&self) {
        let loader = self.loader.clone();
        let delay = self.retry_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!("Running scheduled dependent-data refresh");
            loader.load_dependents().await;
        });
    }

    fn schedule_banner_dismiss(&self) {
        let state_tx = self.state_tx.clone();
        let delay = self.banner_duration;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state_tx.send_modify(|state| {
                if let ViewState::Recovered { banner_visible, .. } = state {
                    *banner_visible = false;
                }
            });
        });
    }
}
