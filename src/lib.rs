//! Gather: onboarding and navigation core for a social events app.

pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod navigation;
pub mod screens;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::context::AppContext;

/// Full HTTP surface: navigation REST + WebSocket and the screen actions.
pub fn router(ctx: Arc<AppContext>) -> Router {
    navigation::navigation_routes(Arc::clone(&ctx.navigator))
        .merge(screens::screen_routes(ctx))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}
