//! Fixture data backing the in-memory collaborators and the home feed.

use serde::Serialize;

/// An interest category offered on the interests screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    /// Optional finer-grained picks shown once the category is selected.
    pub details: &'static [&'static str],
}

/// Someone the friends screen suggests following.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendSuggestion {
    pub id: &'static str,
    pub name: &'static str,
    pub handle: &'static str,
    pub mutual_friends: u32,
    pub interests: &'static [&'static str],
}

/// An event shown in the home feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub venue: &'static str,
    pub when: &'static str,
    pub attendees: u32,
}

/// A free slot suggested after connecting a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub day: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

pub const INTEREST_CATEGORIES: &[InterestCategory] = &[
    InterestCategory {
        id: "music",
        label: "Music",
        emoji: "🎵",
        details: &["live shows", "jazz", "indie", "electronic"],
    },
    InterestCategory {
        id: "sports",
        label: "Sports",
        emoji: "⚽",
        details: &["soccer", "basketball", "climbing", "running"],
    },
    InterestCategory {
        id: "food",
        label: "Food & Drink",
        emoji: "🍜",
        details: &["brunch", "street food", "wine", "coffee"],
    },
    InterestCategory {
        id: "arts",
        label: "Arts",
        emoji: "🎨",
        details: &["galleries", "theatre", "photography"],
    },
    InterestCategory {
        id: "tech",
        label: "Tech",
        emoji: "💻",
        details: &["startups", "gaming", "hackathons"],
    },
    InterestCategory {
        id: "outdoors",
        label: "Outdoors",
        emoji: "🏕️",
        details: &["hiking", "camping", "cycling"],
    },
    InterestCategory {
        id: "wellness",
        label: "Wellness",
        emoji: "🧘",
        details: &["yoga", "meditation", "fitness"],
    },
    InterestCategory {
        id: "film",
        label: "Film",
        emoji: "🎬",
        details: &["indie cinema", "documentaries", "screenings"],
    },
];

pub const FRIEND_SUGGESTIONS: &[FriendSuggestion] = &[
    FriendSuggestion {
        id: "f-1",
        name: "Maya Chen",
        handle: "@mayac",
        mutual_friends: 12,
        interests: &["music", "food"],
    },
    FriendSuggestion {
        id: "f-2",
        name: "Jordan Reyes",
        handle: "@jreyes",
        mutual_friends: 8,
        interests: &["sports", "outdoors"],
    },
    FriendSuggestion {
        id: "f-3",
        name: "Sam Okafor",
        handle: "@samo",
        mutual_friends: 5,
        interests: &["tech", "film"],
    },
    FriendSuggestion {
        id: "f-4",
        name: "Priya Nair",
        handle: "@priyan",
        mutual_friends: 3,
        interests: &["arts", "wellness"],
    },
    FriendSuggestion {
        id: "f-5",
        name: "Alex Kim",
        handle: "@alexk",
        mutual_friends: 1,
        interests: &["music", "tech"],
    },
];

pub const TRENDING_EVENTS: &[TrendingEvent] = &[
    TrendingEvent {
        id: "e-1",
        title: "Rooftop Jazz Night",
        category: "music",
        venue: "The Skyline Bar",
        when: "Fri 8:00 PM",
        attendees: 64,
    },
    TrendingEvent {
        id: "e-2",
        title: "Sunday Trail Run",
        category: "sports",
        venue: "Riverside Park",
        when: "Sun 7:30 AM",
        attendees: 23,
    },
    TrendingEvent {
        id: "e-3",
        title: "Night Market Food Crawl",
        category: "food",
        venue: "Downtown Market Hall",
        when: "Sat 6:00 PM",
        attendees: 112,
    },
    TrendingEvent {
        id: "e-4",
        title: "Gallery Opening: New Voices",
        category: "arts",
        venue: "Eastside Gallery",
        when: "Thu 7:00 PM",
        attendees: 41,
    },
    TrendingEvent {
        id: "e-5",
        title: "Weekend Hackathon",
        category: "tech",
        venue: "Innovation Hub",
        when: "Sat 9:00 AM",
        attendees: 87,
    },
    TrendingEvent {
        id: "e-6",
        title: "Sunset Yoga in the Park",
        category: "wellness",
        venue: "Lakeside Lawn",
        when: "Wed 6:30 PM",
        attendees: 35,
    },
    TrendingEvent {
        id: "e-7",
        title: "Indie Film Screening",
        category: "film",
        venue: "Roxy Cinema",
        when: "Tue 8:30 PM",
        attendees: 28,
    },
    TrendingEvent {
        id: "e-8",
        title: "Open Mic & Acoustic Sets",
        category: "music",
        venue: "Corner Café",
        when: "Thu 9:00 PM",
        attendees: 19,
    },
];

pub const TIME_SLOTS: &[TimeSlot] = &[
    TimeSlot {
        day: "Thu",
        start: "18:00",
        end: "21:00",
    },
    TimeSlot {
        day: "Sat",
        start: "10:00",
        end: "14:00",
    },
    TimeSlot {
        day: "Sun",
        start: "16:00",
        end: "20:00",
    },
];

/// Look up a category by id.
pub fn category(id: &str) -> Option<&'static InterestCategory> {
    INTEREST_CATEGORIES.iter().find(|c| c.id == id)
}
