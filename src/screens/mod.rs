//! Screen-local logic for the leaf screens.
//!
//! A screen validates its input, takes a navigation ticket, calls its
//! collaborator, and only then fires its completion event. Any failure is a
//! [`ScreenError`] shown inline on that screen; navigation state is never
//! touched on failure.

pub mod auth;
pub mod calendar;
pub mod feed;
pub mod friends;
pub mod interests;
pub mod location;
pub mod profile;
pub mod routes;

use serde::Serialize;

use crate::context::AppContext;
use crate::error::{AuthError, CalendarError, Error, LocationError, ProfileError};
use crate::navigation::{NavEvent, ScreenId, Ticket, Transition};

pub use routes::screen_routes;

/// Failure category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Auth,
    Network,
    PermissionDenied,
    /// The action was requested from a screen that is not presented.
    NotActive,
}

/// An inline error for one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{screen}: {message}")]
pub struct ScreenError {
    pub screen: ScreenId,
    pub kind: ErrorKind,
    pub message: String,
}

impl ScreenError {
    /// Attach an error to the screen it happened on.
    pub fn on(screen: ScreenId, err: impl Into<Error>) -> Self {
        let err = err.into();
        let kind = match &err {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Auth(AuthError::Network(_)) => ErrorKind::Network,
            Error::Auth(_) => ErrorKind::Auth,
            Error::Network(_) | Error::Config(_) => ErrorKind::Network,
            Error::Profile(ProfileError::NotFound { .. }) => ErrorKind::Auth,
            Error::Profile(ProfileError::Network(_)) => ErrorKind::Network,
            Error::Location(LocationError::PermissionDenied) => ErrorKind::PermissionDenied,
            Error::Location(LocationError::Unavailable(_)) => ErrorKind::Network,
            Error::Calendar(CalendarError::Rejected { .. }) => ErrorKind::Auth,
            Error::Calendar(CalendarError::Network(_)) => ErrorKind::Network,
        };
        let message = err.to_string();
        tracing::debug!(screen = %screen, kind = ?kind, %message, "Screen error");
        Self {
            screen,
            kind,
            message,
        }
    }

    pub fn not_active(screen: ScreenId, current: ScreenId) -> Self {
        Self {
            screen,
            kind: ErrorKind::NotActive,
            message: format!("{screen} is not the active screen (showing {current})"),
        }
    }
}

/// Take a ticket for `screen`, failing with `NotActive` if it is not shown.
pub(crate) async fn begin(ctx: &AppContext, screen: ScreenId) -> Result<Ticket, ScreenError> {
    match ctx.navigator.begin(screen).await {
        Some(ticket) => Ok(ticket),
        None => Err(ScreenError::not_active(
            screen,
            ctx.navigator.current_screen().await,
        )),
    }
}

/// Fire a synchronous screen event after checking the screen is shown.
pub(crate) async fn fire(
    ctx: &AppContext,
    screen: ScreenId,
    event: NavEvent,
) -> Result<Transition, ScreenError> {
    let ticket = begin(ctx, screen).await?;
    Ok(ctx.navigator.complete(ticket, event).await)
}
