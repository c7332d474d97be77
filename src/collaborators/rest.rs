//! Hosted backend client: GoTrue-style auth plus a PostgREST-style data API.
//!
//! Every request carries the project's public API key in the `apikey`
//! header. Data requests are authorized with the signed-in user's access
//! token when there is one, and the API key otherwise.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    AuthProvider, OAuthProvider, Profile, ProfileStore, ProfileUpdate, Session, UserSummary,
};
use crate::config::BackendConfig;
use crate::error::{AuthError, NetworkError, ProfileError};

const SERVICE: &str = "backend";

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: Option<String>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: String,
    #[serde(default)]
    user_metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl AuthUser {
    fn into_profile(self) -> Profile {
        let display_name = self
            .user_metadata
            .get("display_name")
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string());
        Profile {
            id: self.id,
            email: self.email,
            display_name,
            bio: None,
            location: None,
            interests: Vec::new(),
            created_at: self.created_at,
        }
    }
}

/// Client for the hosted backend.
pub struct RestBackend {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
    access_token: RwLock<Option<SecretString>>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
            access_token: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn bearer(&self) -> String {
        match self.access_token.read().await.as_ref() {
            Some(token) => token.expose_secret().to_string(),
            None => self.api_key.expose_secret().to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str, bearer: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(bearer)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, NetworkError> {
        builder.send().await.map_err(|e| NetworkError::RequestFailed {
            service: SERVICE.to_string(),
            reason: e.to_string(),
        })
    }

    /// Pass 2xx responses through; turn anything else into `UnexpectedStatus`.
    async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(NetworkError::UnexpectedStatus {
            service: SERVICE.to_string(),
            status,
            body,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, NetworkError> {
        resp.json::<T>().await.map_err(|e| NetworkError::InvalidResponse {
            service: SERVICE.to_string(),
            reason: e.to_string(),
        })
    }

    async fn start_session(&self, auth: AuthResponse) -> Result<Session, AuthError> {
        let token = auth.access_token.ok_or_else(|| {
            AuthError::Configuration("backend requires email confirmation before sign-in".to_string())
        })?;
        let token = SecretString::from(token);
        *self.access_token.write().await = Some(token.clone());

        let user_id = auth.user.id;
        let profile = match self.get_profile(user_id).await {
            Ok(profile) => profile,
            Err(ProfileError::NotFound { .. }) => auth.user.into_profile(),
            Err(ProfileError::Network(e)) => return Err(AuthError::Network(e)),
        };
        info!(user_id = %user_id, "Backend session started");
        Ok(Session {
            access_token: token,
            profile,
        })
    }
}

/// Map a failed auth response to the auth error taxonomy.
fn classify_auth_failure(status: StatusCode, body: &str, signing_up: bool) -> AuthError {
    let lower = body.to_lowercase();
    if signing_up && (lower.contains("already registered") || lower.contains("user_already_exists"))
    {
        return AuthError::DuplicateAccount;
    }
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            AuthError::InvalidCredentials
        }
        _ => AuthError::Network(NetworkError::UnexpectedStatus {
            service: SERVICE.to_string(),
            status: status.as_u16(),
            body: body.to_string(),
        }),
    }
}

#[async_trait]
impl AuthProvider for RestBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "email": email.trim(),
            "password": password.expose_secret(),
            "data": { "display_name": display_name.trim() },
        });
        let resp = self
            .send(
                self.request(reqwest::Method::POST, "/auth/v1/signup", self.api_key.expose_secret())
                    .json(&body),
            )
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            warn!(status = %status, "Sign-up rejected");
            return Err(classify_auth_failure(status, &text, true));
        }
        let auth: AuthResponse = Self::parse(resp).await?;

        let profile_row = serde_json::json!({
            "id": auth.user.id,
            "email": auth.user.email,
            "display_name": display_name.trim(),
        });
        let token = auth.access_token.clone().unwrap_or_default();
        if !token.is_empty() {
            let resp = self
                .send(
                    self.request(reqwest::Method::POST, "/rest/v1/profiles", &token)
                        .header("Prefer", "resolution=merge-duplicates")
                        .json(&profile_row),
                )
                .await?;
            Self::expect_success(resp).await?;
        }

        self.start_session(auth).await
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "email": email.trim(),
            "password": password.expose_secret(),
        });
        let resp = self
            .send(
                self.request(reqwest::Method::POST, "/auth/v1/token", self.api_key.expose_secret())
                    .query(&[("grant_type", "password")])
                    .json(&body),
            )
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            debug!(status = %status, "Sign-in rejected");
            return Err(classify_auth_failure(status, &text, false));
        }
        let auth: AuthResponse = Self::parse(resp).await?;
        self.start_session(auth).await
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<Session, AuthError> {
        // The hosted flow needs a browser redirect or a native identity token,
        // neither of which this client owns.
        Err(AuthError::Configuration(format!(
            "{provider} sign-in needs a native identity token"
        )))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let resp = self
            .send(self.request(
                reqwest::Method::POST,
                "/auth/v1/logout",
                session.access_token.expose_secret(),
            ))
            .await?;
        *self.access_token.write().await = None;
        Self::expect_success(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for RestBackend {
    async fn save_interests(
        &self,
        user_id: Uuid,
        categories: &[String],
    ) -> Result<(), ProfileError> {
        let bearer = self.bearer().await;
        let body = serde_json::json!({ "user_id": user_id, "categories": categories });
        let resp = self
            .send(
                self.request(reqwest::Method::POST, "/rest/v1/user_interests", &bearer)
                    .header("Prefer", "resolution=merge-duplicates")
                    .json(&body),
            )
            .await?;
        Self::expect_success(resp).await?;
        Ok(())
    }

    async fn save_detailed_interests(
        &self,
        user_id: Uuid,
        details: &[(String, String)],
    ) -> Result<(), ProfileError> {
        let bearer = self.bearer().await;
        let rows: Vec<serde_json::Value> = details
            .iter()
            .map(|(category, detail)| {
                serde_json::json!({ "user_id": user_id, "category": category, "detail": detail })
            })
            .collect();
        let resp = self
            .send(
                self.request(reqwest::Method::POST, "/rest/v1/user_interest_details", &bearer)
                    .header("Prefer", "resolution=merge-duplicates")
                    .json(&rows),
            )
            .await?;
        Self::expect_success(resp).await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ProfileError> {
        let bearer = self.bearer().await;
        let resp = self
            .send(
                self.request(reqwest::Method::GET, "/rest/v1/profiles", &bearer)
                    .query(&[("id", format!("eq.{user_id}")), ("select", "*".to_string())]),
            )
            .await?;
        let rows: Vec<Profile> = Self::parse(Self::expect_success(resp).await?).await?;
        rows.into_iter().next().ok_or_else(|| ProfileError::NotFound {
            user_id: user_id.to_string(),
        })
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, ProfileError> {
        let bearer = self.bearer().await;
        let resp = self
            .send(
                self.request(reqwest::Method::PATCH, "/rest/v1/profiles", &bearer)
                    .query(&[("id", format!("eq.{user_id}"))])
                    .header("Prefer", "return=representation")
                    .json(update),
            )
            .await?;
        let rows: Vec<Profile> = Self::parse(Self::expect_success(resp).await?).await?;
        rows.into_iter().next().ok_or_else(|| ProfileError::NotFound {
            user_id: user_id.to_string(),
        })
    }

    async fn search_users(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<UserSummary>, ProfileError> {
        let bearer = self.bearer().await;
        let mut params = vec![
            ("select", "id,display_name,location".to_string()),
            ("order", "display_name.asc".to_string()),
            ("limit", limit.to_string()),
        ];
        let needle = query.trim();
        if !needle.is_empty() {
            params.push(("display_name", format!("ilike.*{needle}*")));
        }
        let resp = self
            .send(self.request(reqwest::Method::GET, "/rest/v1/profiles", &bearer).query(&params))
            .await?;
        let hits: Vec<UserSummary> = Self::parse(Self::expect_success(resp).await?).await?;
        Ok(hits)
    }
}
