//! In-memory collaborators: fixture backend for local runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::fixtures::FRIEND_SUGGESTIONS;
use super::{
    AuthProvider, CalendarProvider, CalendarSync, Coordinates, LocationProvider, OAuthProvider,
    PermissionStatus, Profile, ProfileStore, ProfileUpdate, Session, UserSummary,
};
use crate::error::{AuthError, CalendarError, LocationError, NetworkError, ProfileError};

/// How the simulated consent sheet responds for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthOutcome {
    Approve,
    Cancel,
}

struct Account {
    password: SecretString,
    user_id: Uuid,
}

/// Auth + profile backend held entirely in memory.
pub struct InMemoryBackend {
    accounts: RwLock<HashMap<String, Account>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    interest_details: RwLock<HashMap<Uuid, Vec<(String, String)>>>,
    oauth: RwLock<HashMap<OAuthProvider, OAuthOutcome>>,
    offline: AtomicBool,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Empty backend with Google and Apple sign-in approved.
    pub fn new() -> Self {
        let oauth = HashMap::from([
            (OAuthProvider::Google, OAuthOutcome::Approve),
            (OAuthProvider::Apple, OAuthOutcome::Approve),
        ]);
        Self {
            accounts: RwLock::new(HashMap::new()),
            profiles: RwLock::new(HashMap::new()),
            interest_details: RwLock::new(HashMap::new()),
            oauth: RwLock::new(oauth),
            offline: AtomicBool::new(false),
        }
    }

    /// Backend seeded with the suggested-friend profiles so search has results.
    pub fn with_fixtures() -> Self {
        let mut backend = Self::new();
        let profiles = FRIEND_SUGGESTIONS
            .iter()
            .map(|f| {
                let profile = Profile {
                    id: Uuid::new_v4(),
                    email: format!("{}@example.com", f.handle.trim_start_matches('@')),
                    display_name: f.name.to_string(),
                    bio: None,
                    location: None,
                    interests: f.interests.iter().map(|s| s.to_string()).collect(),
                    created_at: Utc::now(),
                };
                (profile.id, profile)
            })
            .collect();
        backend.profiles = RwLock::new(profiles);
        backend
    }

    /// Configure how OAuth sign-in with `provider` behaves.
    pub async fn set_oauth(&self, provider: OAuthProvider, outcome: Option<OAuthOutcome>) {
        let mut oauth = self.oauth.write().await;
        match outcome {
            Some(o) => oauth.insert(provider, o),
            None => oauth.remove(&provider),
        };
    }

    /// Simulate loss of connectivity: every call fails with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn detailed_interests(&self, user_id: Uuid) -> Vec<(String, String)> {
        self.interest_details
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), NetworkError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::RequestFailed {
                service: "memory".to_string(),
                reason: "offline".to_string(),
            });
        }
        Ok(())
    }

    fn new_session(profile: Profile) -> Session {
        Session {
            access_token: SecretString::from(Uuid::new_v4().to_string()),
            profile,
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        self.check_online()?;
        let key = email.trim().to_lowercase();

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::DuplicateAccount);
        }

        let profile = Profile {
            id: Uuid::new_v4(),
            email: key.clone(),
            display_name: display_name.trim().to_string(),
            bio: None,
            location: None,
            interests: Vec::new(),
            created_at: Utc::now(),
        };
        accounts.insert(
            key,
            Account {
                password: password.clone(),
                user_id: profile.id,
            },
        );
        self.profiles.write().await.insert(profile.id, profile.clone());

        info!(user_id = %profile.id, "Account created");
        Ok(Self::new_session(profile))
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        self.check_online()?;
        let key = email.trim().to_lowercase();

        let accounts = self.accounts.read().await;
        let account = accounts.get(&key).ok_or(AuthError::InvalidCredentials)?;
        if account.password.expose_secret() != password.expose_secret() {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self
            .profiles
            .read()
            .await
            .get(&account.user_id)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        debug!(user_id = %profile.id, "Signed in");
        Ok(Self::new_session(profile))
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<Session, AuthError> {
        self.check_online()?;
        let outcome = self.oauth.read().await.get(&provider).copied();
        match outcome {
            Some(OAuthOutcome::Approve) => {}
            Some(OAuthOutcome::Cancel) => return Err(AuthError::UserCancelled),
            None => {
                return Err(AuthError::Configuration(format!(
                    "{provider} sign-in is not enabled"
                )));
            }
        }

        let email = format!("{provider}-user@example.com");
        let existing = {
            let accounts = self.accounts.read().await;
            accounts.get(&email).map(|a| a.user_id)
        };
        let profile = match existing {
            Some(id) => self.profiles.read().await.get(&id).cloned(),
            None => None,
        };
        let profile = match profile {
            Some(p) => p,
            None => {
                let profile = Profile {
                    id: Uuid::new_v4(),
                    email: email.clone(),
                    display_name: format!("{provider} user"),
                    bio: None,
                    location: None,
                    interests: Vec::new(),
                    created_at: Utc::now(),
                };
                self.accounts.write().await.insert(
                    email,
                    Account {
                        password: SecretString::from(Uuid::new_v4().to_string()),
                        user_id: profile.id,
                    },
                );
                self.profiles.write().await.insert(profile.id, profile.clone());
                profile
            }
        };
        Ok(Self::new_session(profile))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        debug!(user_id = %session.user_id(), "Signed out");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for InMemoryBackend {
    async fn save_interests(
        &self,
        user_id: Uuid,
        categories: &[String],
    ) -> Result<(), ProfileError> {
        self.check_online()?;
        let mut profiles = self.profiles.write().await;
        let profile = profiles.get_mut(&user_id).ok_or_else(|| ProfileError::NotFound {
            user_id: user_id.to_string(),
        })?;
        profile.interests = categories.to_vec();
        Ok(())
    }

    async fn save_detailed_interests(
        &self,
        user_id: Uuid,
        details: &[(String, String)],
    ) -> Result<(), ProfileError> {
        self.check_online()?;
        if !self.profiles.read().await.contains_key(&user_id) {
            return Err(ProfileError::NotFound {
                user_id: user_id.to_string(),
            });
        }
        self.interest_details
            .write()
            .await
            .insert(user_id, details.to_vec());
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ProfileError> {
        self.check_online()?;
        self.profiles
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, ProfileError> {
        self.check_online()?;
        let mut profiles = self.profiles.write().await;
        let profile = profiles.get_mut(&user_id).ok_or_else(|| ProfileError::NotFound {
            user_id: user_id.to_string(),
        })?;
        if let Some(ref name) = update.display_name {
            profile.display_name = name.clone();
        }
        if let Some(ref bio) = update.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(ref location) = update.location {
            profile.location = Some(location.clone());
        }
        Ok(profile.clone())
    }

    async fn search_users(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<UserSummary>, ProfileError> {
        self.check_online()?;
        let needle = query.trim().to_lowercase();
        let profiles = self.profiles.read().await;
        let mut hits: Vec<UserSummary> = profiles
            .values()
            .filter(|p| needle.is_empty() || p.display_name.to_lowercase().contains(&needle))
            .map(UserSummary::from)
            .collect();
        hits.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Location provider with a fixed answer.
pub struct FixedLocation {
    permission: PermissionStatus,
    coords: Coordinates,
    label: Option<String>,
}

impl FixedLocation {
    pub fn granted(coords: Coordinates, label: impl Into<String>) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            coords,
            label: Some(label.into()),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            coords: Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            },
            label: None,
        }
    }

    /// Permission granted, but reverse geocoding finds nothing.
    pub fn unlabeled(coords: Coordinates) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            coords,
            label: None,
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match self.permission {
            PermissionStatus::Granted => Ok(self.coords),
            PermissionStatus::Denied => Err(LocationError::PermissionDenied),
        }
    }

    async fn reverse_geocode(&self, _coords: Coordinates) -> Result<String, LocationError> {
        self.label
            .clone()
            .ok_or_else(|| LocationError::Unavailable("no place found".to_string()))
    }
}

/// Calendar sync that waits a fixed delay and succeeds for non-empty inputs.
pub struct SimulatedCalendarSync {
    delay: Duration,
}

impl SimulatedCalendarSync {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CalendarSync for SimulatedCalendarSync {
    async fn sync(
        &self,
        provider: CalendarProvider,
        account: &str,
        credential: &SecretString,
    ) -> Result<bool, CalendarError> {
        tokio::time::sleep(self.delay).await;
        let synced = !account.trim().is_empty() && !credential.expose_secret().is_empty();
        info!(provider = %provider, synced, "Calendar sync finished");
        Ok(synced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let backend = InMemoryBackend::new();
        let session = backend
            .sign_up("Ada@Example.com", &secret("hunter22"), "Ada")
            .await
            .unwrap();
        assert_eq!(session.profile.email, "ada@example.com");

        let again = backend
            .sign_in("ada@example.com", &secret("hunter22"))
            .await
            .unwrap();
        assert_eq!(again.user_id(), session.user_id());
    }

    #[tokio::test]
    async fn duplicate_and_bad_password() {
        let backend = InMemoryBackend::new();
        backend.sign_up("ada@example.com", &secret("hunter22"), "Ada").await.unwrap();

        let dup = backend.sign_up("ADA@example.com", &secret("other1"), "Ada 2").await;
        assert!(matches!(dup, Err(AuthError::DuplicateAccount)));

        let bad = backend.sign_in("ada@example.com", &secret("wrong!")).await;
        assert!(matches!(bad, Err(AuthError::InvalidCredentials)));

        let unknown = backend.sign_in("bob@example.com", &secret("hunter22")).await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn oauth_outcomes() {
        let backend = InMemoryBackend::new();
        assert!(backend.sign_in_with_oauth(OAuthProvider::Google).await.is_ok());

        let fb = backend.sign_in_with_oauth(OAuthProvider::Facebook).await;
        assert!(matches!(fb, Err(AuthError::Configuration(_))));

        backend
            .set_oauth(OAuthProvider::Apple, Some(OAuthOutcome::Cancel))
            .await;
        let apple = backend.sign_in_with_oauth(OAuthProvider::Apple).await;
        assert!(matches!(apple, Err(AuthError::UserCancelled)));
    }

    #[tokio::test]
    async fn oauth_reuses_existing_account() {
        let backend = InMemoryBackend::new();
        let first = backend.sign_in_with_oauth(OAuthProvider::Google).await.unwrap();
        let second = backend.sign_in_with_oauth(OAuthProvider::Google).await.unwrap();
        assert_eq!(first.user_id(), second.user_id());
    }

    #[tokio::test]
    async fn offline_backend_fails_with_network_error() {
        let backend = InMemoryBackend::new();
        backend.set_offline(true);
        let err = backend
            .sign_in("ada@example.com", &secret("hunter22"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
    }

    #[tokio::test]
    async fn profile_updates_and_interests() {
        let backend = InMemoryBackend::new();
        let session = backend
            .sign_up("ada@example.com", &secret("hunter22"), "Ada")
            .await
            .unwrap();
        let id = session.user_id();

        backend
            .save_interests(id, &["music".to_string(), "tech".to_string()])
            .await
            .unwrap();
        backend
            .save_detailed_interests(id, &[("music".to_string(), "jazz".to_string())])
            .await
            .unwrap();

        let updated = backend
            .update_profile(
                id,
                &ProfileUpdate {
                    bio: Some("Hi".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.display_name, "Ada");
        assert_eq!(updated.bio.as_deref(), Some("Hi"));
        assert_eq!(updated.interests, vec!["music", "tech"]);
        assert_eq!(backend.detailed_interests(id).await.len(), 1);

        let missing = backend.get_profile(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ProfileError::NotFound { .. })));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_limited() {
        let backend = InMemoryBackend::with_fixtures();
        let hits = backend.search_users("MAYA", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "Maya Chen");

        let all = backend.search_users("", 2).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn calendar_sync_requires_inputs() {
        let sync = SimulatedCalendarSync::new(Duration::ZERO);
        assert!(sync
            .sync(CalendarProvider::Google, "ada@example.com", &secret("token"))
            .await
            .unwrap());
        assert!(!sync
            .sync(CalendarProvider::Google, "  ", &secret("token"))
            .await
            .unwrap());
        assert!(!sync
            .sync(CalendarProvider::Outlook, "ada@example.com", &secret(""))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn denied_location_reports_permission_denied() {
        let loc = FixedLocation::denied();
        assert_eq!(loc.request_permission().await, PermissionStatus::Denied);
        assert!(matches!(
            loc.current_position().await,
            Err(LocationError::PermissionDenied)
        ));
    }
}
