//! Home feed and search tab.

use serde::Deserialize;

use crate::collaborators::fixtures::{self, TRENDING_EVENTS, TrendingEvent};

/// Feed filters. Both fields are optional; empty means "no filter".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Trending events filtered by `filter`, with the user's interest categories
/// first and larger events ahead of smaller ones.
pub fn trending(interests: &[String], filter: &FeedQuery) -> Vec<&'static TrendingEvent> {
    let needle = filter.query.trim().to_lowercase();
    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut events: Vec<_> = TRENDING_EVENTS
        .iter()
        .filter(|e| category.is_none_or(|c| e.category.eq_ignore_ascii_case(c)))
        .filter(|e| needle.is_empty() || matches_text(e, &needle))
        .collect();

    let preferred = |e: &TrendingEvent| interests.iter().any(|i| i == e.category);
    events.sort_by(|a, b| {
        preferred(b)
            .cmp(&preferred(a))
            .then(b.attendees.cmp(&a.attendees))
    });
    events
}

fn matches_text(event: &TrendingEvent, needle: &str) -> bool {
    let label = fixtures::category(event.category).map_or("", |c| c.label);
    [event.title, event.venue, label]
        .iter()
        .any(|s| s.to_lowercase().contains(needle))
}
