//! Transition events fired by screens.

use serde::{Deserialize, Serialize};

use super::screen::Tab;
use crate::collaborators::OAuthProvider;

/// A user-triggered event emitted by a leaf screen.
///
/// This is the whole callback surface between screens and the controller:
/// each variant is one named callback with at most one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEvent {
    WelcomeCompleted,
    ChooseManualSignup,
    SocialSignupSucceeded { provider: OAuthProvider },
    ManualSignupSucceeded,
    GoToSignIn,
    SignInSucceeded,
    SuccessContinue,
    ProgressDotClicked { step: u8 },
    LocationContinue { location: String },
    InterestsContinue { interests: Vec<String> },
    FriendsContinue,
    CalendarContinue,
    GetStarted,
    Skip,
    Back,
    TabSelected { tab: Tab },
    SignedOut,
}

impl NavEvent {
    /// Short name used in logs and the screen contract table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WelcomeCompleted => "welcome_completed",
            Self::ChooseManualSignup => "choose_manual_signup",
            Self::SocialSignupSucceeded { .. } => "social_signup_succeeded",
            Self::ManualSignupSucceeded => "manual_signup_succeeded",
            Self::GoToSignIn => "go_to_sign_in",
            Self::SignInSucceeded => "sign_in_succeeded",
            Self::SuccessContinue => "success_continue",
            Self::ProgressDotClicked { .. } => "progress_dot_clicked",
            Self::LocationContinue { .. } => "location_continue",
            Self::InterestsContinue { .. } => "interests_continue",
            Self::FriendsContinue => "friends_continue",
            Self::CalendarContinue => "calendar_continue",
            Self::GetStarted => "get_started",
            Self::Skip => "skip",
            Self::Back => "back",
            Self::TabSelected { .. } => "tab_selected",
            Self::SignedOut => "signed_out",
        }
    }

    /// Screen action that owns this event, for events that may only fire
    /// after a collaborator call succeeds. `None` for plain taps.
    pub fn screen_action(&self) -> Option<&'static str> {
        match self {
            Self::SocialSignupSucceeded { .. } => Some("/api/screens/oauth"),
            Self::ManualSignupSucceeded => Some("/api/screens/signup"),
            Self::SignInSucceeded => Some("/api/screens/signin"),
            Self::LocationContinue { .. } => Some("/api/screens/location"),
            Self::InterestsContinue { .. } => Some("/api/screens/interests"),
            Self::CalendarContinue => Some("/api/screens/calendar"),
            Self::SignedOut => Some("/api/screens/signout"),
            Self::WelcomeCompleted
            | Self::ChooseManualSignup
            | Self::GoToSignIn
            | Self::SuccessContinue
            | Self::ProgressDotClicked { .. }
            | Self::FriendsContinue
            | Self::GetStarted
            | Self::Skip
            | Self::Back
            | Self::TabSelected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event: NavEvent =
            serde_json::from_str(r#"{"type":"location_continue","location":"Austin, TX"}"#)
                .unwrap();
        assert_eq!(
            event,
            NavEvent::LocationContinue {
                location: "Austin, TX".to_string()
            }
        );

        let event: NavEvent = serde_json::from_str(r#"{"type":"tab_selected","tab":"inbox"}"#).unwrap();
        assert_eq!(event, NavEvent::TabSelected { tab: Tab::Inbox });

        let json = serde_json::to_value(NavEvent::Skip).unwrap();
        assert_eq!(json["type"], "skip");
    }

    #[test]
    fn name_matches_serde_tag() {
        let events = [
            NavEvent::WelcomeCompleted,
            NavEvent::ProgressDotClicked { step: 2 },
            NavEvent::InterestsContinue { interests: vec![] },
            NavEvent::SignedOut,
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.name());
        }
    }

    #[test]
    fn completion_events_belong_to_screen_actions() {
        assert_eq!(
            NavEvent::SignInSucceeded.screen_action(),
            Some("/api/screens/signin")
        );
        assert_eq!(
            NavEvent::InterestsContinue { interests: vec![] }.screen_action(),
            Some("/api/screens/interests")
        );
        assert_eq!(NavEvent::SignedOut.screen_action(), Some("/api/screens/signout"));

        for tap in [
            NavEvent::WelcomeCompleted,
            NavEvent::FriendsContinue,
            NavEvent::Skip,
            NavEvent::TabSelected { tab: Tab::Home },
        ] {
            assert_eq!(tap.screen_action(), None, "{}", tap.name());
        }
    }
}
