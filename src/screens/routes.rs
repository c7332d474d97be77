//! REST endpoints for screen actions that call collaborators.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::auth::{self, SignInForm, SignUpForm};
use super::feed::{self, FeedQuery};
use super::friends;
use super::interests::{self, InterestSelection};
use super::{ErrorKind, ScreenError, calendar, location, profile};
use crate::collaborators::{CalendarProvider, OAuthProvider, ProfileUpdate};
use crate::context::AppContext;
use crate::navigation::{NavSnapshot, ScreenId, Transition};

impl IntoResponse for ScreenError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::NotActive => StatusCode::CONFLICT,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = serde_json::json!({
            "error": self.message,
            "kind": self.kind,
            "screen": self.screen,
        });
        (status, Json(body)).into_response()
    }
}

/// Response body of a screen action that fired a navigation event.
#[derive(Debug, Serialize)]
struct ActionResponse {
    transition: Transition,
    state: NavSnapshot,
}

async fn respond(ctx: &AppContext, result: Result<Transition, ScreenError>) -> Response {
    let transition = match result {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };
    // A stale completion means the user left the screen mid-call.
    let status = match transition {
        Transition::Stale { .. } => StatusCode::CONFLICT,
        _ => StatusCode::OK,
    };
    let state = ctx.navigator.snapshot().await;
    (status, Json(ActionResponse { transition, state })).into_response()
}

#[derive(Debug, Deserialize)]
struct SignUpRequest {
    email: String,
    password: String,
    confirm_password: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct OAuthRequest {
    provider: OAuthProvider,
}

#[derive(Debug, Deserialize)]
struct LocationRequest {
    location: String,
}

#[derive(Debug, Deserialize)]
struct DetailPick {
    category: String,
    detail: String,
}

#[derive(Debug, Deserialize)]
struct InterestsRequest {
    interests: Vec<String>,
    #[serde(default)]
    details: Vec<DetailPick>,
}

#[derive(Debug, Deserialize)]
struct CalendarRequest {
    provider: CalendarProvider,
    account: String,
    credential: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

/// Build the screen action routes.
pub fn screen_routes(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/screens/signup", post(sign_up))
        .route("/api/screens/signin", post(sign_in))
        .route("/api/screens/oauth", post(oauth))
        .route("/api/screens/location", post(submit_location))
        .route("/api/screens/location/detect", post(detect_location))
        .route("/api/screens/interests", post(submit_interests))
        .route("/api/screens/friends", post(finish_friends))
        .route("/api/screens/calendar", post(connect_calendar))
        .route("/api/screens/signout", post(sign_out))
        .route("/api/friends/suggestions", get(friend_suggestions))
        .route("/api/feed", get(get_feed))
        .route("/api/users", get(search_users))
        .route("/api/profile", get(get_profile).patch(update_profile))
        .with_state(ctx)
}

/// POST /api/screens/signup
async fn sign_up(State(ctx): State<Arc<AppContext>>, Json(req): Json<SignUpRequest>) -> Response {
    let form = SignUpForm {
        email: req.email,
        password: SecretString::from(req.password),
        confirm_password: SecretString::from(req.confirm_password),
        display_name: req.display_name,
    };
    let result = auth::submit_sign_up(&ctx, &form).await;
    respond(&ctx, result).await
}

/// POST /api/screens/signin
async fn sign_in(State(ctx): State<Arc<AppContext>>, Json(req): Json<SignInRequest>) -> Response {
    let form = SignInForm {
        email: req.email,
        password: SecretString::from(req.password),
    };
    let result = auth::submit_sign_in(&ctx, &form).await;
    respond(&ctx, result).await
}

/// POST /api/screens/oauth
async fn oauth(State(ctx): State<Arc<AppContext>>, Json(req): Json<OAuthRequest>) -> Response {
    let result = auth::sign_up_with_oauth(&ctx, req.provider).await;
    respond(&ctx, result).await
}

/// POST /api/screens/location
async fn submit_location(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<LocationRequest>,
) -> Response {
    let result = location::submit(&ctx, &req.location).await;
    respond(&ctx, result).await
}

/// POST /api/screens/location/detect
async fn detect_location(State(ctx): State<Arc<AppContext>>) -> Response {
    match location::detect(&ctx).await {
        Ok(lookup) => Json(lookup).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/screens/interests
async fn submit_interests(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<InterestsRequest>,
) -> Response {
    let screen = ScreenId::OnboardingInterests;
    let mut selection = InterestSelection::new(ctx.config.max_interests);
    for id in &req.interests {
        if let Err(e) = selection.toggle(id) {
            return ScreenError::on(screen, e).into_response();
        }
    }
    for pick in &req.details {
        if let Err(e) = selection.toggle_detail(&pick.category, &pick.detail) {
            return ScreenError::on(screen, e).into_response();
        }
    }
    let result = interests::submit(&ctx, &selection).await;
    respond(&ctx, result).await
}

/// POST /api/screens/friends
async fn finish_friends(State(ctx): State<Arc<AppContext>>) -> Response {
    let result = friends::finish(&ctx).await;
    respond(&ctx, result).await
}

/// POST /api/screens/calendar
async fn connect_calendar(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<CalendarRequest>,
) -> Response {
    let credential = SecretString::from(req.credential);
    let result = calendar::connect(&ctx, req.provider, &req.account, &credential).await;
    respond(&ctx, result).await
}

/// POST /api/screens/signout
async fn sign_out(State(ctx): State<Arc<AppContext>>) -> Response {
    let result = auth::sign_out(&ctx).await;
    respond(&ctx, result).await
}

/// Interests to rank by: this session's onboarding picks, else the stored
/// profile's, else none.
async fn current_interests(ctx: &AppContext) -> Vec<String> {
    let draft = ctx.navigator.snapshot().await.draft;
    if !draft.interests.is_empty() {
        return draft.interests;
    }
    let Some(session) = ctx.session().await else {
        return Vec::new();
    };
    match ctx.deps.profiles.get_profile(session.user_id()).await {
        Ok(profile) => profile.interests,
        Err(e) => {
            tracing::debug!(error = %e, "Falling back to session interests");
            session.profile.interests
        }
    }
}

/// GET /api/friends/suggestions?query=
async fn friend_suggestions(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let interests = current_interests(&ctx).await;
    Json(friends::suggestions(&params.query, &interests)).into_response()
}

/// GET /api/feed?query=&category=
async fn get_feed(
    State(ctx): State<Arc<AppContext>>,
    Query(filter): Query<FeedQuery>,
) -> Response {
    let interests = current_interests(&ctx).await;
    Json(feed::trending(&interests, &filter)).into_response()
}

/// GET /api/users?query=
async fn search_users(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match friends::search(&ctx, &params.query).await {
        Ok(users) => Json(users).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/profile
async fn get_profile(State(ctx): State<Arc<AppContext>>) -> Response {
    match profile::load(&ctx).await {
        Ok(p) => Json(p).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/profile
async fn update_profile(
    State(ctx): State<Arc<AppContext>>,
    Json(update): Json<ProfileUpdate>,
) -> Response {
    match profile::update(&ctx, &update).await {
        Ok(p) => Json(p).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::screens::test_support::{context_on, signed_in};

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn sign_up_moves_to_success() {
        let (ctx, _) = context_on(ScreenId::ManualSignup);
        let resp = screen_routes(ctx.clone())
            .oneshot(post_json(
                "/api/screens/signup",
                serde_json::json!({
                    "email": "ada@example.com",
                    "password": "hunter22",
                    "confirm_password": "hunter22",
                    "display_name": "Ada",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["state"]["screen"], "success");
        assert!(ctx.session().await.is_some());
    }

    #[tokio::test]
    async fn validation_error_is_unprocessable() {
        let (ctx, _) = context_on(ScreenId::Signin);
        let resp = screen_routes(ctx)
            .oneshot(post_json(
                "/api/screens/signin",
                serde_json::json!({"email": "nope", "password": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["screen"], "signin");
        assert_eq!(json["error"], "Enter a valid email address");
    }

    #[tokio::test]
    async fn inactive_screen_conflicts() {
        let (ctx, _) = context_on(ScreenId::Welcome);
        let resp = screen_routes(ctx)
            .oneshot(post_json(
                "/api/screens/location",
                serde_json::json!({"location": "Lisbon"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["kind"], "not_active");
    }

    #[tokio::test]
    async fn too_many_interests_rejected_before_backend() {
        let (ctx, _) = context_on(ScreenId::OnboardingInterests);
        signed_in(&ctx).await;
        let resp = screen_routes(ctx.clone())
            .oneshot(post_json(
                "/api/screens/interests",
                serde_json::json!({
                    "interests": ["music", "sports", "food", "arts", "tech", "film"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ctx.navigator.current_screen().await,
            ScreenId::OnboardingInterests
        );
    }

    #[tokio::test]
    async fn friends_continues_to_calendar() {
        let (ctx, _) = context_on(ScreenId::OnboardingFriends);
        let resp = screen_routes(ctx)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/screens/friends")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["state"]["screen"], "onboarding-calendar");
    }

    #[tokio::test]
    async fn feed_filters_by_category() {
        let (ctx, _) = context_on(ScreenId::Home);
        let resp = screen_routes(ctx)
            .oneshot(get("/api/feed?category=music"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let ids: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["e-1", "e-8"]);
    }

    #[tokio::test]
    async fn user_search_returns_matches() {
        let (ctx, _) = context_on(ScreenId::Search);
        let resp = screen_routes(ctx)
            .oneshot(get("/api/users?query=okafor"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json[0]["display_name"], "Sam Okafor");
    }

    #[tokio::test]
    async fn profile_requires_sign_in() {
        let (ctx, _) = context_on(ScreenId::Profile);
        let resp = screen_routes(ctx.clone()).oneshot(get("/api/profile")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(resp).await["kind"], "auth");

        signed_in(&ctx).await;
        let resp = screen_routes(ctx).oneshot(get("/api/profile")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["display_name"], "Ada");
    }
}
