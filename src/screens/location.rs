//! Onboarding step 1: where the user is based.

use serde::Serialize;
use tracing::{debug, info};

use super::{ScreenError, begin, fire};
use crate::collaborators::PermissionStatus;
use crate::context::AppContext;
use crate::error::ValidationError;
use crate::navigation::{NavEvent, ScreenId, Transition};

/// What the location screen should show after trying device location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LocationLookup {
    /// Pre-fill the text field with a detected place.
    Detected { label: String },
    /// Show an empty text field; detection was denied or failed.
    ManualEntry { reason: String },
}

/// Try to detect the user's location.
///
/// Never fails because of the device: permission denial and lookup errors
/// degrade to manual entry.
pub async fn detect(ctx: &AppContext) -> Result<LocationLookup, ScreenError> {
    begin(ctx, ScreenId::OnboardingLocation).await?;
    let location = &ctx.deps.location;

    if location.request_permission().await == PermissionStatus::Denied {
        info!("Location permission denied, falling back to manual entry");
        return Ok(LocationLookup::ManualEntry {
            reason: "Location permission was denied".to_string(),
        });
    }

    let lookup = match location.current_position().await {
        Ok(coords) => location.reverse_geocode(coords).await,
        Err(e) => Err(e),
    };
    match lookup {
        Ok(label) => Ok(LocationLookup::Detected { label }),
        Err(e) => {
            debug!(error = %e, "Location lookup failed, falling back to manual entry");
            Ok(LocationLookup::ManualEntry {
                reason: e.to_string(),
            })
        }
    }
}

/// Continue with the entered (or detected) location.
pub async fn submit(ctx: &AppContext, location: &str) -> Result<Transition, ScreenError> {
    let screen = ScreenId::OnboardingLocation;
    let location = location.trim();
    if location.is_empty() {
        return Err(ScreenError::on(screen, ValidationError::BlankLocation));
    }
    fire(
        ctx,
        screen,
        NavEvent::LocationContinue {
            location: location.to_string(),
        },
    )
    .await
}
