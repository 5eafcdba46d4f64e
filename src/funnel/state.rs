//! Funnel state and its update function.
//!
//! `FunnelState::update` is pure: it applies one [`Action`] and returns the
//! side effects the runtime should perform. A rejected action leaves the
//! state untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::view::View;
use crate::analytics::AnalyticsEvent;
use crate::counters::{CounterDeltas, EngagementCounters};
use crate::dashboard::MATCH_COUNT;
use crate::error::FunnelError;
use crate::lead::{Field, FieldRejection, LeadDraft, LeadSubmission, UserType};
use crate::simulation::{ReceivableTerm, SimulationResult, compute_simulation};

/// A user interaction or timer event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectProfile(UserType),
    UpdateField { field: Field, value: String },
    SetAmount(Decimal),
    SelectTerm(ReceivableTerm),
    Navigate(View),
    SubmissionFinished { ok: bool },
    Tick(CounterDeltas),
    SetFeedback(String),
    SubmitFeedback,
    ClickMatch(usize),
    ClickEarlyAdopter,
}

/// Work the runtime performs after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Track {
        event: AnalyticsEvent,
        label: Option<UserType>,
    },
    Submit(LeadSubmission),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelState {
    pub view: View,
    pub draft: LeadDraft,
    pub simulation: Option<SimulationResult>,
    pub term: ReceivableTerm,
    pub counters: EngagementCounters,
    pub feedback: String,
    /// Set while a lead submission is in flight. The registration
    /// "continue" control is disabled meanwhile.
    pub submitting: bool,
}

impl Default for FunnelState {
    fn default() -> Self {
        Self::new(EngagementCounters::default())
    }
}

impl FunnelState {
    pub fn new(counters: EngagementCounters) -> Self {
        Self {
            view: View::default(),
            draft: LeadDraft::default(),
            simulation: None,
            term: ReceivableTerm::default(),
            counters,
            feedback: String::new(),
            submitting: false,
        }
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.draft.user_type
    }

    pub fn update(&mut self, action: Action, now: DateTime<Utc>) -> Result<Vec<Effect>, FunnelError> {
        let mut effects = Vec::new();

        match action {
            Action::SelectProfile(user_type) => {
                self.draft.user_type = Some(user_type);
                effects.push(self.track(AnalyticsEvent::UserTypeSelected { user_type }));
            }

            Action::UpdateField { field, value } => {
                self.draft
                    .set_field(field, &value)
                    .map_err(|rejection| match rejection {
                        FieldRejection::NoProfileSelected => FunnelError::NoProfileSelected,
                        FieldRejection::WrongProfile(user_type) => {
                            FunnelError::FieldNotInProfile { field, user_type }
                        }
                    })?;
            }

            Action::SetAmount(amount) => {
                let user_type = self.user_type().ok_or(FunnelError::NoProfileSelected)?;
                // Non-positive amounts keep the last valid result.
                if let Some(result) = compute_simulation(user_type, amount) {
                    let event = AnalyticsEvent::SimulationCalculated {
                        user_type,
                        amount,
                        headline: result.headline(),
                    };
                    self.simulation = Some(result);
                    effects.push(self.track(event));
                }
            }

            Action::SelectTerm(term) => self.term = term,

            Action::Navigate(target) => {
                if !self.view.can_transition_to(target) {
                    return Err(FunnelError::InvalidTransition {
                        from: self.view,
                        to: target,
                    });
                }
                if self.view == View::Registration && target == View::Simulation {
                    if self.submitting {
                        return Err(FunnelError::SubmissionPending);
                    }
                    self.submitting = true;
                    effects.push(Effect::Submit(LeadSubmission::from_draft(
                        &self.draft,
                        self.simulation.as_ref(),
                        &self.counters,
                        now,
                    )));
                }
                self.view = target;
                effects.push(self.track(AnalyticsEvent::PageView { page: target }));
            }

            Action::SubmissionFinished { ok } => {
                self.submitting = false;
                if ok {
                    effects.push(self.track(AnalyticsEvent::FormSubmitted {
                        user_type: self.user_type(),
                    }));
                }
            }

            Action::Tick(deltas) => self.counters.apply(deltas),

            Action::SetFeedback(text) => self.feedback = text,

            Action::SubmitFeedback => {
                if self.feedback.trim().is_empty() {
                    return Err(FunnelError::EmptyFeedback);
                }
                let feedback = std::mem::take(&mut self.feedback);
                effects.push(self.track(AnalyticsEvent::FeedbackSubmitted { feedback }));
            }

            Action::ClickMatch(index) => {
                if index >= MATCH_COUNT {
                    return Err(FunnelError::MatchOutOfRange { index });
                }
                effects.push(self.track(AnalyticsEvent::MatchClicked { index }));
            }

            Action::ClickEarlyAdopter => {
                effects.push(self.track(AnalyticsEvent::EarlyAdopterClicked));
            }
        }

        Ok(effects)
    }

    fn track(&self, event: AnalyticsEvent) -> Effect {
        Effect::Track {
            event,
            label: self.user_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn apply(state: &mut FunnelState, action: Action) -> Vec<Effect> {
        state.update(action, now()).unwrap()
    }

    fn field(field: Field, value: &str) -> Action {
        Action::UpdateField {
            field,
            value: value.to_string(),
        }
    }

    fn at_registration(user_type: UserType) -> FunnelState {
        let mut state = FunnelState::default();
        apply(&mut state, Action::Navigate(View::Registration));
        apply(&mut state, Action::SelectProfile(user_type));
        state
    }

    fn submissions(effects: &[Effect]) -> Vec<&LeadSubmission> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Submit(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_on_landing() {
        let state = FunnelState::default();
        assert_eq!(state.view, View::Landing);
        assert!(state.simulation.is_none());
        assert!(!state.submitting);
    }

    #[test]
    fn select_profile_tracks_event() {
        let mut state = FunnelState::default();
        let effects = apply(&mut state, Action::SelectProfile(UserType::Business));
        assert_eq!(state.user_type(), Some(UserType::Business));
        assert_eq!(
            effects,
            vec![Effect::Track {
                event: AnalyticsEvent::UserTypeSelected {
                    user_type: UserType::Business
                },
                label: Some(UserType::Business),
            }]
        );
    }

    #[test]
    fn reselecting_keeps_other_variant_fields() {
        let mut state = at_registration(UserType::Business);
        apply(&mut state, field(Field::LegalName, "Acme Ltda"));
        apply(&mut state, Action::SelectProfile(UserType::Investor));
        apply(&mut state, Action::SelectProfile(UserType::Business));
        assert_eq!(state.draft.business.legal_name, "Acme Ltda");
    }

    #[test]
    fn update_field_errors_leave_state_untouched() {
        let mut state = FunnelState::default();
        assert_eq!(
            state.update(field(Field::Email, "a@b.com"), now()),
            Err(FunnelError::NoProfileSelected)
        );

        let mut state = at_registration(UserType::Investor);
        let before = state.clone();
        assert_eq!(
            state.update(field(Field::TaxId, "123"), now()),
            Err(FunnelError::FieldNotInProfile {
                field: Field::TaxId,
                user_type: UserType::Investor
            })
        );
        assert_eq!(state, before);

        state.update(field(Field::Income, "1M"), now()).unwrap();
        assert_eq!(state.draft.investor.income, "1M");
    }

    #[test]
    fn invalid_navigation_is_rejected() {
        let mut state = FunnelState::default();
        let err = state.update(Action::Navigate(View::Dashboard), now()).unwrap_err();
        assert_eq!(
            err,
            FunnelError::InvalidTransition {
                from: View::Landing,
                to: View::Dashboard
            }
        );
        assert_eq!(state.view, View::Landing);
    }

    #[test]
    fn leaving_registration_forward_submits_and_navigates() {
        let mut state = at_registration(UserType::Business);
        apply(&mut state, field(Field::Email, "a@b.com"));
        apply(&mut state, field(Field::Sector, "industria"));

        let effects = apply(&mut state, Action::Navigate(View::Simulation));

        assert_eq!(state.view, View::Simulation);
        assert!(state.submitting);
        let subs = submissions(&effects);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].email.as_deref(), Some("a@b.com"));
        assert_eq!(subs[0].setor.as_deref(), Some("industria"));
        assert!(subs[0].analytics.is_some());
        assert!(matches!(
            effects.last(),
            Some(Effect::Track {
                event: AnalyticsEvent::PageView {
                    page: View::Simulation
                },
                ..
            })
        ));
    }

    #[test]
    fn going_back_to_landing_does_not_submit() {
        let mut state = at_registration(UserType::Investor);
        let effects = apply(&mut state, Action::Navigate(View::Landing));
        assert!(submissions(&effects).is_empty());
        assert!(!state.submitting);
    }

    #[test]
    fn continue_is_disabled_while_submitting() {
        let mut state = at_registration(UserType::Business);
        apply(&mut state, Action::Navigate(View::Simulation));
        apply(&mut state, Action::Navigate(View::Registration));

        assert_eq!(
            state.update(Action::Navigate(View::Simulation), now()),
            Err(FunnelError::SubmissionPending)
        );
        assert_eq!(state.view, View::Registration);

        apply(&mut state, Action::SubmissionFinished { ok: false });
        let effects = apply(&mut state, Action::Navigate(View::Simulation));
        assert_eq!(submissions(&effects).len(), 1);
    }

    #[test]
    fn submission_finished_tracks_only_success() {
        let mut state = at_registration(UserType::Business);
        state.submitting = true;
        assert!(apply(&mut state, Action::SubmissionFinished { ok: false }).is_empty());
        assert!(!state.submitting);

        state.submitting = true;
        let effects = apply(&mut state, Action::SubmissionFinished { ok: true });
        assert!(matches!(
            effects.as_slice(),
            [Effect::Track {
                event: AnalyticsEvent::FormSubmitted { .. },
                ..
            }]
        ));
    }

    #[test]
    fn simulation_recomputes_and_ignores_non_positive() {
        let mut state = at_registration(UserType::Business);
        apply(&mut state, Action::SetAmount(dec!(1000)));
        let first = state.simulation.clone().unwrap();
        assert_eq!(first.headline(), dec!(40));

        assert!(apply(&mut state, Action::SetAmount(dec!(0))).is_empty());
        assert!(apply(&mut state, Action::SetAmount(dec!(-5))).is_empty());
        assert_eq!(state.simulation.as_ref(), Some(&first));

        apply(&mut state, Action::SetAmount(dec!(2000)));
        assert_eq!(state.simulation.unwrap().headline(), dec!(80));
    }

    #[test]
    fn simulation_requires_profile() {
        let mut state = FunnelState::default();
        assert_eq!(
            state.update(Action::SetAmount(dec!(100)), now()),
            Err(FunnelError::NoProfileSelected)
        );
    }

    #[test]
    fn submission_carries_current_simulation() {
        let mut state = at_registration(UserType::Investor);
        apply(&mut state, Action::SetAmount(dec!(10000)));
        let effects = apply(&mut state, Action::Navigate(View::Simulation));
        let sub = submissions(&effects)[0];
        assert_eq!(sub.simulation.as_ref().unwrap()["retornoMensal"], 125.0);
    }

    #[test]
    fn ticks_do_not_change_view() {
        let mut state = FunnelState::default();
        apply(
            &mut state,
            Action::Tick(CounterDeltas {
                businesses: 2,
                investors: 1,
                simulated_volume: 10_000,
                matches: 1,
            }),
        );
        assert_eq!(state.view, View::Landing);
        assert_eq!(state.counters.businesses, 249);
        assert_eq!(state.counters.simulated_volume, 1_260_000);
    }

    #[test]
    fn feedback_must_not_be_blank() {
        let mut state = FunnelState::default();
        apply(&mut state, Action::SetFeedback("   ".to_string()));
        assert_eq!(
            state.update(Action::SubmitFeedback, now()),
            Err(FunnelError::EmptyFeedback)
        );

        apply(&mut state, Action::SetFeedback("Gostei!".to_string()));
        let effects = apply(&mut state, Action::SubmitFeedback);
        assert!(state.feedback.is_empty());
        assert!(matches!(
            &effects[0],
            Effect::Track { event: AnalyticsEvent::FeedbackSubmitted { feedback }, .. } if feedback == "Gostei!"
        ));
    }

    #[test]
    fn match_click_bounds() {
        let mut state = FunnelState::default();
        assert_eq!(apply(&mut state, Action::ClickMatch(2)).len(), 1);
        assert_eq!(
            state.update(Action::ClickMatch(3), now()),
            Err(FunnelError::MatchOutOfRange { index: 3 })
        );
    }
}
