//! Profile tab.

use tracing::info;

use super::ScreenError;
use crate::collaborators::{Profile, ProfileUpdate};
use crate::context::AppContext;
use crate::error::ValidationError;
use crate::navigation::ScreenId;

const SCREEN: ScreenId = ScreenId::Profile;

/// Load the signed-in user's profile.
pub async fn load(ctx: &AppContext) -> Result<Profile, ScreenError> {
    let session = ctx
        .require_session()
        .await
        .map_err(|e| ScreenError::on(SCREEN, e))?;
    ctx.deps
        .profiles
        .get_profile(session.user_id())
        .await
        .map_err(|e| ScreenError::on(SCREEN, e))
}

/// Save edits to the signed-in user's profile.
pub async fn update(ctx: &AppContext, update: &ProfileUpdate) -> Result<Profile, ScreenError> {
    if update
        .display_name
        .as_deref()
        .is_some_and(|n| n.trim().is_empty())
    {
        return Err(ScreenError::on(
            SCREEN,
            ValidationError::MissingField { field: "Name" },
        ));
    }
    let session = ctx
        .require_session()
        .await
        .map_err(|e| ScreenError::on(SCREEN, e))?;
    let profile = ctx
        .deps
        .profiles
        .update_profile(session.user_id(), update)
        .await
        .map_err(|e| ScreenError::on(SCREEN, e))?;
    info!(user_id = %profile.id, "Profile updated");
    Ok(profile)
}
