//! Navigation controller: the screen-flow state machine.
//!
//! `NavState::apply` is a total reducer: every event either produces a
//! transition or is explicitly ignored, and ignoring never touches state.

use serde::{Deserialize, Serialize};

use super::draft::OnboardingDraft;
use super::event::NavEvent;
use super::screen::{OnboardingStep, ScreenId};

/// Everything the controller owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub screen: ScreenId,
    pub onboarding_step: OnboardingStep,
    pub draft: OnboardingDraft,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            screen: ScreenId::Welcome,
            onboarding_step: OnboardingStep::FIRST,
            draft: OnboardingDraft::default(),
        }
    }
}

/// Outcome of applying an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    /// The event matched. `from == to` for in-place updates such as
    /// re-selecting the current tab.
    Applied { from: ScreenId, to: ScreenId },
    /// The event has no meaning on the current screen; state is unchanged.
    Ignored { screen: ScreenId, event: String },
    /// The event came from an async completion issued against a screen
    /// that is no longer current; state is unchanged.
    Stale { issued_on: ScreenId, current: ScreenId },
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event.
    pub fn apply(&mut self, event: NavEvent) -> Transition {
        let from = self.screen;
        let name = event.name();

        let next = match (from, event) {
            (ScreenId::Welcome, NavEvent::WelcomeCompleted) => Some(ScreenId::Signup),
            (ScreenId::Signup, NavEvent::ChooseManualSignup) => Some(ScreenId::ManualSignup),
            (ScreenId::Signup, NavEvent::SocialSignupSucceeded { .. }) => Some(ScreenId::Success),
            (ScreenId::ManualSignup, NavEvent::ManualSignupSucceeded) => Some(ScreenId::Success),
            (ScreenId::Signup | ScreenId::ManualSignup, NavEvent::GoToSignIn) => {
                Some(ScreenId::Signin)
            }
            (ScreenId::Signin, NavEvent::SignInSucceeded) => Some(ScreenId::Success),
            (ScreenId::Success, NavEvent::SuccessContinue) => {
                self.onboarding_step = OnboardingStep::FIRST;
                Some(OnboardingStep::FIRST.screen())
            }
            (screen, NavEvent::ProgressDotClicked { step }) if screen.is_onboarding() => {
                self.revisit_step(step)
            }
            (ScreenId::OnboardingLocation, NavEvent::LocationContinue { location }) => {
                let location = location.trim();
                if location.is_empty() {
                    None
                } else {
                    self.draft.location = location.to_string();
                    Some(self.advance_to(2))
                }
            }
            (ScreenId::OnboardingInterests, NavEvent::InterestsContinue { interests }) => {
                if interests.is_empty() {
                    None
                } else {
                    self.draft.interests = interests;
                    Some(self.advance_to(3))
                }
            }
            (ScreenId::OnboardingFriends, NavEvent::FriendsContinue) => Some(self.advance_to(4)),
            (ScreenId::OnboardingCalendar, NavEvent::CalendarContinue) => Some(self.advance_to(5)),
            (ScreenId::OnboardingComplete, NavEvent::GetStarted) => {
                self.draft = OnboardingDraft::default();
                Some(ScreenId::Home)
            }
            (screen, NavEvent::Skip) if screen.is_skippable() => Some(self.skip()),
            (screen, NavEvent::Back) => self.back(screen),
            (screen, NavEvent::TabSelected { tab }) if screen.tab().is_some() => Some(tab.screen()),
            (ScreenId::Settings, NavEvent::SignedOut) => {
                *self = Self::default();
                Some(ScreenId::Welcome)
            }
            _ => None,
        };

        match next {
            Some(to) => {
                self.screen = to;
                Transition::Applied { from, to }
            }
            None => {
                tracing::debug!(screen = %from, event = name, "Ignoring event with no transition");
                Transition::Ignored {
                    screen: from,
                    event: name.to_string(),
                }
            }
        }
    }

    fn advance_to(&mut self, n: u8) -> ScreenId {
        // `n` is always a literal in 2..=5.
        let step = OnboardingStep::new(n).unwrap_or(OnboardingStep::LAST);
        self.onboarding_step = step;
        step.screen()
    }

    /// Only strictly earlier steps are clickable; the completion step never is.
    fn revisit_step(&mut self, n: u8) -> Option<ScreenId> {
        let step = OnboardingStep::new(n)?;
        if step >= self.onboarding_step || step > OnboardingStep::SKIP_LIMIT {
            return None;
        }
        self.onboarding_step = step;
        Some(step.screen())
    }

    /// Below the calendar step, skip increments; from the calendar step it
    /// jumps to completion and leaves the counter at 4.
    fn skip(&mut self) -> ScreenId {
        if self.onboarding_step < OnboardingStep::SKIP_LIMIT {
            match self.onboarding_step.next() {
                Some(next) => {
                    self.onboarding_step = next;
                    next.screen()
                }
                None => ScreenId::OnboardingComplete,
            }
        } else {
            ScreenId::OnboardingComplete
        }
    }

    fn back(&mut self, screen: ScreenId) -> Option<ScreenId> {
        match screen {
            ScreenId::Signup => Some(ScreenId::Welcome),
            ScreenId::ManualSignup | ScreenId::Signin => Some(ScreenId::Signup),
            ScreenId::OnboardingComplete => {
                self.onboarding_step = OnboardingStep::SKIP_LIMIT;
                Some(OnboardingStep::SKIP_LIMIT.screen())
            }
            s if s.is_skippable() => {
                let prev = self.onboarding_step.prev()?;
                self.onboarding_step = prev;
                Some(prev.screen())
            }
            _ => None,
        }
    }
}
