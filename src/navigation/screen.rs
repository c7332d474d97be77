//! Screen identifiers, primary tabs, and the onboarding progress step.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which screen is presented. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenId {
    Welcome,
    Signup,
    ManualSignup,
    Signin,
    Success,
    OnboardingLocation,
    OnboardingInterests,
    OnboardingFriends,
    OnboardingCalendar,
    OnboardingComplete,
    Home,
    Search,
    Profile,
    Notifications,
    Settings,
}

impl ScreenId {
    /// Every screen, in presentation order.
    pub const ALL: [ScreenId; 15] = [
        ScreenId::Welcome,
        ScreenId::Signup,
        ScreenId::ManualSignup,
        ScreenId::Signin,
        ScreenId::Success,
        ScreenId::OnboardingLocation,
        ScreenId::OnboardingInterests,
        ScreenId::OnboardingFriends,
        ScreenId::OnboardingCalendar,
        ScreenId::OnboardingComplete,
        ScreenId::Home,
        ScreenId::Search,
        ScreenId::Profile,
        ScreenId::Notifications,
        ScreenId::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Signup => "signup",
            Self::ManualSignup => "manual-signup",
            Self::Signin => "signin",
            Self::Success => "success",
            Self::OnboardingLocation => "onboarding-location",
            Self::OnboardingInterests => "onboarding-interests",
            Self::OnboardingFriends => "onboarding-friends",
            Self::OnboardingCalendar => "onboarding-calendar",
            Self::OnboardingComplete => "onboarding-complete",
            Self::Home => "home",
            Self::Search => "search",
            Self::Profile => "profile",
            Self::Notifications => "notifications",
            Self::Settings => "settings",
        }
    }

    /// The progress step this screen represents, if it is an onboarding screen.
    pub fn onboarding_step(&self) -> Option<OnboardingStep> {
        let n = match self {
            Self::OnboardingLocation => 1,
            Self::OnboardingInterests => 2,
            Self::OnboardingFriends => 3,
            Self::OnboardingCalendar => 4,
            Self::OnboardingComplete => 5,
            _ => return None,
        };
        OnboardingStep::new(n)
    }

    /// Onboarding screens that show the progress indicator.
    pub fn is_onboarding(&self) -> bool {
        self.onboarding_step().is_some()
    }

    /// Onboarding screens that offer "skip" (location through calendar).
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::OnboardingLocation
                | Self::OnboardingInterests
                | Self::OnboardingFriends
                | Self::OnboardingCalendar
        )
    }

    /// The tab this screen belongs to, if it is a primary tab screen.
    pub fn tab(&self) -> Option<Tab> {
        match self {
            Self::Home => Some(Tab::Home),
            Self::Search => Some(Tab::Search),
            Self::Profile => Some(Tab::Profile),
            Self::Notifications => Some(Tab::Inbox),
            Self::Settings => Some(Tab::Settings),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScreenId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| format!("unknown screen: {s}"))
    }
}

/// Primary navigation tabs shown on the bottom bar after onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Home,
    Search,
    Profile,
    Inbox,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Home, Tab::Search, Tab::Profile, Tab::Inbox, Tab::Settings];

    pub fn screen(&self) -> ScreenId {
        match self {
            Self::Home => ScreenId::Home,
            Self::Search => ScreenId::Search,
            Self::Profile => ScreenId::Profile,
            Self::Inbox => ScreenId::Notifications,
            Self::Settings => ScreenId::Settings,
        }
    }
}

/// Progress through the five onboarding screens, always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OnboardingStep(u8);

impl OnboardingStep {
    pub const FIRST: OnboardingStep = OnboardingStep(1);
    pub const LAST: OnboardingStep = OnboardingStep(5);

    /// The last step that "skip" increments to before jumping to completion.
    pub const SKIP_LIMIT: OnboardingStep = OnboardingStep(4);

    pub fn new(n: u8) -> Option<Self> {
        (1..=5).contains(&n).then_some(Self(n))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// The onboarding screen matching this step.
    pub fn screen(&self) -> ScreenId {
        match self.0 {
            1 => ScreenId::OnboardingLocation,
            2 => ScreenId::OnboardingInterests,
            3 => ScreenId::OnboardingFriends,
            4 => ScreenId::OnboardingCalendar,
            _ => ScreenId::OnboardingComplete,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for OnboardingStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| format!("onboarding step out of range: {n}"))
    }
}

impl From<OnboardingStep> for u8 {
    fn from(step: OnboardingStep) -> Self {
        step.0
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::LAST.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde() {
        for screen in ScreenId::ALL {
            let json = serde_json::to_string(&screen).unwrap();
            assert_eq!(format!("\"{screen}\""), json, "mismatch for {screen:?}");
        }
    }

    #[test]
    fn from_str_round_trips_every_screen() {
        for screen in ScreenId::ALL {
            assert_eq!(screen.as_str().parse::<ScreenId>().unwrap(), screen);
        }
        assert!("onboarding".parse::<ScreenId>().is_err());
    }

    #[test]
    fn step_and_screen_agree() {
        for n in 1..=5 {
            let step = OnboardingStep::new(n).unwrap();
            assert_eq!(step.screen().onboarding_step(), Some(step));
        }
    }

    #[test]
    fn step_bounds() {
        assert!(OnboardingStep::new(0).is_none());
        assert!(OnboardingStep::new(6).is_none());
        assert_eq!(OnboardingStep::LAST.next(), None);
        assert_eq!(OnboardingStep::FIRST.prev(), None);
        assert!(serde_json::from_str::<OnboardingStep>("7").is_err());
        assert_eq!(serde_json::from_str::<OnboardingStep>("3").unwrap().get(), 3);
    }

    #[test]
    fn inbox_tab_maps_to_notifications() {
        assert_eq!(Tab::Inbox.screen(), ScreenId::Notifications);
        for tab in Tab::ALL {
            assert_eq!(tab.screen().tab(), Some(tab));
        }
    }

    #[test]
    fn only_location_through_calendar_are_skippable() {
        let skippable: Vec<_> = ScreenId::ALL.into_iter().filter(|s| s.is_skippable()).collect();
        assert_eq!(
            skippable,
            vec![
                ScreenId::OnboardingLocation,
                ScreenId::OnboardingInterests,
                ScreenId::OnboardingFriends,
                ScreenId::OnboardingCalendar,
            ]
        );
        assert!(ScreenId::OnboardingComplete.is_onboarding());
        assert!(!ScreenId::OnboardingComplete.is_skippable());
    }
}
