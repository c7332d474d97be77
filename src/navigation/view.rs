//! Screen contracts: what each screen shows and which callbacks it may fire.

use serde::Serialize;

use super::navigator::NavSnapshot;
use super::screen::{OnboardingStep, ScreenId, Tab};

/// Progress indicator shown on onboarding screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: u8,
    pub total: u8,
    /// Dots that respond to taps. Always strictly earlier steps.
    pub clickable: Vec<u8>,
}

/// The contract a rendering client needs for the active screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenView {
    Screen {
        screen: ScreenId,
        title: &'static str,
        /// Callback names (`NavEvent` tags) the screen may fire.
        callbacks: Vec<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<Progress>,
        /// Bottom tab bar, present on primary tab screens.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tabs: Vec<Tab>,
    },
    /// Nothing to render.
    Blank,
}

impl ScreenView {
    /// Build the view for a snapshot.
    pub fn for_snapshot(snapshot: &NavSnapshot) -> Self {
        Self::render(snapshot.screen, snapshot.onboarding_step)
    }

    /// Resolve a screen by name, falling back to [`ScreenView::Blank`].
    pub fn lookup(name: &str, step: OnboardingStep) -> Self {
        match name.parse::<ScreenId>() {
            Ok(screen) => Self::render(screen, step),
            Err(_) => Self::Blank,
        }
    }

    pub fn render(screen: ScreenId, step: OnboardingStep) -> Self {
        let (title, callbacks): (&'static str, &[&'static str]) = match screen {
            ScreenId::Welcome => ("Welcome to Gather", &["welcome_completed"]),
            ScreenId::Signup => (
                "Create your account",
                &[
                    "choose_manual_signup",
                    "social_signup_succeeded",
                    "go_to_sign_in",
                    "back",
                ],
            ),
            ScreenId::ManualSignup => (
                "Sign up with email",
                &["manual_signup_succeeded", "go_to_sign_in", "back"],
            ),
            ScreenId::Signin => ("Welcome back", &["sign_in_succeeded", "back"]),
            ScreenId::Success => ("You're in!", &["success_continue"]),
            ScreenId::OnboardingLocation => (
                "Where are you based?",
                &["location_continue", "skip", "progress_dot_clicked"],
            ),
            ScreenId::OnboardingInterests => (
                "What are you into?",
                &["interests_continue", "skip", "back", "progress_dot_clicked"],
            ),
            ScreenId::OnboardingFriends => (
                "Find your friends",
                &["friends_continue", "skip", "back", "progress_dot_clicked"],
            ),
            ScreenId::OnboardingCalendar => (
                "Connect your calendar",
                &["calendar_continue", "skip", "back", "progress_dot_clicked"],
            ),
            ScreenId::OnboardingComplete => (
                "You're all set",
                &["get_started", "back", "progress_dot_clicked"],
            ),
            ScreenId::Home => ("Home", &["tab_selected"]),
            ScreenId::Search => ("Search", &["tab_selected"]),
            ScreenId::Profile => ("Profile", &["tab_selected"]),
            ScreenId::Notifications => ("Inbox", &["tab_selected"]),
            ScreenId::Settings => ("Settings", &["tab_selected", "signed_out"]),
        };

        let progress = screen.onboarding_step().map(|_| Progress {
            current: step.get(),
            total: OnboardingStep::LAST.get(),
            clickable: (1..step.get().min(OnboardingStep::LAST.get()))
                .filter(|n| *n <= OnboardingStep::SKIP_LIMIT.get())
                .collect(),
        });

        let tabs = if screen.tab().is_some() {
            Tab::ALL.to_vec()
        } else {
            Vec::new()
        };

        Self::Screen {
            screen,
            title,
            callbacks: callbacks.to_vec(),
            progress,
            tabs,
        }
    }
}
