//! External collaborators invoked by screens: auth, profile storage, device
//! location and calendar sync.
//!
//! Each is an async trait so screens can run against the hosted backend
//! ([`rest::RestBackend`]) or the in-memory fixtures ([`memory`]) without
//! knowing which.

pub mod fixtures;
pub mod memory;
pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, CalendarError, LocationError, ProfileError};

pub use memory::{FixedLocation, InMemoryBackend, SimulatedCalendarSync};
pub use rest::RestBackend;

/// Third-party identity providers offered on the signup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthProvider {
    Google,
    Apple,
    Facebook,
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Google => "google",
            Self::Apple => "apple",
            Self::Facebook => "facebook",
        };
        write!(f, "{s}")
    }
}

/// Calendar providers offered on the calendar screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarProvider {
    Google,
    Outlook,
    Apple,
}

impl std::fmt::Display for CalendarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
        };
        write!(f, "{s}")
    }
}

/// A user's profile as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a user may change from the profile screen. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<&Profile> for UserSummary {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name.clone(),
            location: p.location.clone(),
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub profile: Profile,
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.profile.id
    }
}

/// Device location permission outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Account creation and sign-in.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account. The returned session carries the new profile.
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<Session, AuthError>;

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError>;

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<Session, AuthError>;

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

/// Profile and interest persistence keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn save_interests(&self, user_id: Uuid, categories: &[String])
    -> Result<(), ProfileError>;

    /// Store sub-category picks as `(category, detail)` pairs.
    async fn save_detailed_interests(
        &self,
        user_id: Uuid,
        details: &[(String, String)],
    ) -> Result<(), ProfileError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ProfileError>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, ProfileError>;

    async fn search_users(&self, query: &str, limit: usize)
    -> Result<Vec<UserSummary>, ProfileError>;
}

/// Device location services.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> PermissionStatus;

    async fn current_position(&self) -> Result<Coordinates, LocationError>;

    /// Resolve coordinates to a human-readable place label, e.g. "Austin, TX".
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String, LocationError>;
}

/// Calendar account linking.
#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Returns whether the account is now synced.
    async fn sync(
        &self,
        provider: CalendarProvider,
        account: &str,
        credential: &SecretString,
    ) -> Result<bool, CalendarError>;
}
