//! Onboarding step 3: suggested people to follow.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{ScreenError, fire};
use crate::collaborators::fixtures::{FRIEND_SUGGESTIONS, FriendSuggestion};
use crate::collaborators::UserSummary;
use crate::context::AppContext;
use crate::navigation::{NavEvent, ScreenId, Transition};

const SEARCH_LIMIT: usize = 20;

/// Local follow toggles. Nothing is persisted until a social graph exists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FriendPicker {
    following: BTreeSet<String>,
}

impl FriendPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `id` is followed afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.following.remove(id) {
            false
        } else {
            self.following.insert(id.to_string());
            true
        }
    }

    pub fn is_following(&self, id: &str) -> bool {
        self.following.contains(id)
    }

    pub fn following(&self) -> impl Iterator<Item = &str> {
        self.following.iter().map(String::as_str)
    }
}

/// Fixture suggestions filtered by `query` (name or handle, case-insensitive),
/// ranked by shared interests then mutual friends.
pub fn suggestions(query: &str, interests: &[String]) -> Vec<&'static FriendSuggestion> {
    let needle = query.trim().to_lowercase();
    let shared = |f: &FriendSuggestion| {
        f.interests
            .iter()
            .filter(|i| interests.iter().any(|mine| mine == *i))
            .count()
    };

    let mut hits: Vec<_> = FRIEND_SUGGESTIONS
        .iter()
        .filter(|f| {
            needle.is_empty()
                || f.name.to_lowercase().contains(&needle)
                || f.handle.to_lowercase().contains(&needle)
        })
        .collect();
    hits.sort_by(|a, b| {
        shared(b)
            .cmp(&shared(a))
            .then(b.mutual_friends.cmp(&a.mutual_friends))
    });
    hits
}

/// Search every user through the profile store.
pub async fn search(ctx: &AppContext, query: &str) -> Result<Vec<UserSummary>, ScreenError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let screen = ctx.navigator.current_screen().await;
    ctx.deps
        .profiles
        .search_users(query, SEARCH_LIMIT)
        .await
        .map_err(|e| ScreenError::on(screen, e))
}

/// Continue to the calendar step. Follows live only in the [`FriendPicker`]
/// on the device, so there is nothing to save here.
pub async fn finish(ctx: &AppContext) -> Result<Transition, ScreenError> {
    fire(ctx, ScreenId::OnboardingFriends, NavEvent::FriendsContinue).await
}
