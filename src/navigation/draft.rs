//! Answers accumulated across the onboarding screens.

use serde::{Deserialize, Serialize};

/// Session-scoped onboarding answers.
///
/// Filled in as each onboarding screen completes and discarded once the user
/// leaves onboarding for the home screen. The interests screen persists the
/// categories to the profile store; the draft itself is never written anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingDraft {
    /// Free-text location. Empty means unset.
    pub location: String,
    /// Interest category ids in the order they were picked.
    pub interests: Vec<String>,
}

impl OnboardingDraft {
    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_empty() && self.interests.is_empty()
    }
}
