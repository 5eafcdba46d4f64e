//! Funnel runtime — owns the state, executes effects, ticks the counters.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::state::{Action, Effect, FunnelState};
use super::view::View;
use crate::analytics::Tracker;
use crate::config::FunnelConfig;
use crate::counters::{CounterDeltas, EngagementCounters};
use crate::dashboard::{MatchCard, match_cards};
use crate::error::FunnelError;
use crate::lead::{Field, LeadSubmission, UserType};
use crate::simulation::{ReceivableTerm, parse_amount};
use crate::submit::{HttpSubmitter, LeadSubmitter};

/// A lead's session through the funnel.
pub struct Funnel {
    state: RwLock<FunnelState>,
    submitter: Arc<dyn LeadSubmitter>,
    tracker: Tracker,
}

impl Funnel {
    pub fn new(
        submitter: Arc<dyn LeadSubmitter>,
        tracker: Tracker,
        counters: EngagementCounters,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(FunnelState::new(counters)),
            submitter,
            tracker,
        })
    }

    /// Funnel that submits to the configured relay over HTTP.
    pub fn from_config(config: &FunnelConfig) -> Arc<Self> {
        Self::new(
            Arc::new(HttpSubmitter::new(&config.relay_base_url)),
            config.tracker(),
            config.seed_counters,
        )
    }

    pub async fn snapshot(&self) -> FunnelState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> View {
        self.state.read().await.view
    }

    /// Match cards for the dashboard, empty until a profile is selected.
    pub async fn match_cards(&self) -> Vec<MatchCard> {
        self.state
            .read()
            .await
            .user_type()
            .map(match_cards)
            .unwrap_or_default()
    }

    /// Whether the registration "continue" control is enabled.
    pub async fn can_continue(&self) -> bool {
        !self.state.read().await.submitting
    }

    /// Apply an action and run its effects. Returns the handle of the
    /// submission spawned by this action, if any; dropping it does not
    /// cancel the submission.
    pub async fn dispatch(self: &Arc<Self>, action: Action) -> Result<Option<JoinHandle<()>>, FunnelError> {
        let effects = self.apply(action).await?;
        Ok(self.run_effects(effects))
    }

    async fn apply(&self, action: Action) -> Result<Vec<Effect>, FunnelError> {
        let mut state = self.state.write().await;
        debug!(action = ?action, view = %state.view, "Funnel action");
        state.update(action, chrono::Utc::now())
    }

    fn run_effects(self: &Arc<Self>, effects: Vec<Effect>) -> Option<JoinHandle<()>> {
        let mut spawned = None;
        for effect in effects {
            match effect {
                Effect::Track { event, label } => self.tracker.track(&event, label),
                Effect::Submit(submission) => {
                    spawned = Some(self.spawn_submission(submission));
                }
            }
        }
        spawned
    }

    /// Fire-and-forget: one attempt, failures are logged, navigation has
    /// already happened.
    fn spawn_submission(self: &Arc<Self>, submission: LeadSubmission) -> JoinHandle<()> {
        let funnel = Arc::clone(self);
        tokio::spawn(async move {
            let ok = match funnel.submitter.submit(&submission).await {
                Ok(()) => {
                    info!(
                        user_type = submission.user_type.as_deref().unwrap_or("unknown"),
                        "Lead submitted"
                    );
                    true
                }
                Err(e) => {
                    error!(error = %e, "Lead submission failed");
                    false
                }
            };

            match funnel.apply(Action::SubmissionFinished { ok }).await {
                Ok(effects) => {
                    funnel.run_effects(effects);
                }
                Err(e) => warn!(error = %e, "Could not record submission outcome"),
            }
        })
    }

    // ── User interactions ───────────────────────────────────────────────

    pub async fn select_profile(self: &Arc<Self>, user_type: UserType) -> Result<(), FunnelError> {
        self.dispatch(Action::SelectProfile(user_type)).await.map(drop)
    }

    pub async fn update_field(self: &Arc<Self>, field: Field, value: &str) -> Result<(), FunnelError> {
        self.dispatch(Action::UpdateField {
            field,
            value: value.to_string(),
        })
        .await
        .map(drop)
    }

    /// Feed the raw amount input; non-numeric or non-positive input keeps
    /// the current result.
    pub async fn set_amount(self: &Arc<Self>, input: &str) -> Result<(), FunnelError> {
        self.dispatch(Action::SetAmount(parse_amount(input))).await.map(drop)
    }

    pub async fn select_term(self: &Arc<Self>, term: ReceivableTerm) -> Result<(), FunnelError> {
        self.dispatch(Action::SelectTerm(term)).await.map(drop)
    }

    /// Move to `target`. Leaving registration for the simulation view
    /// spawns the lead submission and returns its handle.
    pub async fn advance(self: &Arc<Self>, target: View) -> Result<Option<JoinHandle<()>>, FunnelError> {
        let handle = self.dispatch(Action::Navigate(target)).await?;
        info!(view = %target, "Navigated");
        Ok(handle)
    }

    pub async fn set_feedback(self: &Arc<Self>, text: &str) -> Result<(), FunnelError> {
        self.dispatch(Action::SetFeedback(text.to_string())).await.map(drop)
    }

    pub async fn submit_feedback(self: &Arc<Self>) -> Result<(), FunnelError> {
        self.dispatch(Action::SubmitFeedback).await.map(drop)
    }

    pub async fn click_match(self: &Arc<Self>, index: usize) -> Result<(), FunnelError> {
        self.dispatch(Action::ClickMatch(index)).await.map(drop)
    }

    pub async fn click_early_adopter(self: &Arc<Self>) -> Result<(), FunnelError> {
        self.dispatch(Action::ClickEarlyAdopter).await.map(drop)
    }

    /// Apply one random tick to the engagement counters.
    pub async fn tick_counters(self: &Arc<Self>) {
        let deltas = CounterDeltas::sample(&mut rand::thread_rng());
        if let Err(e) = self.dispatch(Action::Tick(deltas)).await {
            warn!(error = %e, "Counter tick rejected");
        }
    }
}

/// Background counter ticker. Dropping it stops the ticks.
pub struct CounterTicker {
    handle: JoinHandle<()>,
}

impl CounterTicker {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CounterTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Tick the funnel's counters every `interval` until the ticker is dropped
/// or the funnel itself goes away.
pub fn spawn_counter_ticker(funnel: &Arc<Funnel>, interval: Duration) -> CounterTicker {
    let weak: Weak<Funnel> = Arc::downgrade(funnel);
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Skip immediate first tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(funnel) = weak.upgrade() else {
                debug!("Funnel dropped, stopping counter ticker");
                break;
            };
            funnel.tick_counters().await;
        }
    });
    CounterTicker { handle }
}
