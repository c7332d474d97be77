//! Onboarding step 2: interest categories.

use serde::Serialize;
use tracing::info;

use super::{ScreenError, begin};
use crate::collaborators::ProfileUpdate;
use crate::collaborators::fixtures::{self, INTEREST_CATEGORIES, InterestCategory};
use crate::context::AppContext;
use crate::error::ValidationError;
use crate::navigation::{NavEvent, ScreenId, Transition};

/// Categories picked on the interests screen, in the order they were tapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestSelection {
    max: usize,
    selected: Vec<String>,
    details: Vec<(String, String)>,
}

impl InterestSelection {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            selected: Vec::new(),
            details: Vec::new(),
        }
    }

    /// The categories offered on the screen.
    pub fn catalog() -> &'static [InterestCategory] {
        INTEREST_CATEGORIES
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() >= self.max
    }

    /// Tap a category. Returns whether it is selected afterwards.
    ///
    /// Deselecting also drops that category's detailed picks.
    pub fn toggle(&mut self, id: &str) -> Result<bool, ValidationError> {
        if fixtures::category(id).is_none() {
            return Err(ValidationError::UnknownInterest(id.to_string()));
        }
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            self.details.retain(|(category, _)| category != id);
            return Ok(false);
        }
        if self.is_full() {
            return Err(ValidationError::TooManyInterests { max: self.max });
        }
        self.selected.push(id.to_string());
        Ok(true)
    }

    /// Tap a detailed pick inside a selected category.
    pub fn toggle_detail(&mut self, category: &str, detail: &str) -> Result<bool, ValidationError> {
        let known = fixtures::category(category)
            .is_some_and(|c| c.details.contains(&detail));
        if !known || !self.selected.iter().any(|s| s == category) {
            return Err(ValidationError::UnknownInterest(format!("{category}/{detail}")));
        }
        if let Some(pos) = self
            .details
            .iter()
            .position(|(c, d)| c == category && d == detail)
        {
            self.details.remove(pos);
            return Ok(false);
        }
        self.details.push((category.to_string(), detail.to_string()));
        Ok(true)
    }
}

/// Persist the selection (and the draft location) and continue to friends.
pub async fn submit(
    ctx: &AppContext,
    selection: &InterestSelection,
) -> Result<Transition, ScreenError> {
    let screen = ScreenId::OnboardingInterests;
    if selection.selected.is_empty() {
        return Err(ScreenError::on(screen, ValidationError::NoInterests));
    }
    if selection.selected.len() > ctx.config.max_interests {
        return Err(ScreenError::on(
            screen,
            ValidationError::TooManyInterests {
                max: ctx.config.max_interests,
            },
        ));
    }

    let session = ctx
        .require_session()
        .await
        .map_err(|e| ScreenError::on(screen, e))?;
    let ticket = begin(ctx, screen).await?;
    let user_id = session.user_id();
    let profiles = &ctx.deps.profiles;

    let draft = ctx.navigator.snapshot().await.draft;
    let location_update = draft.has_location().then(|| ProfileUpdate {
        location: Some(draft.location),
        ..Default::default()
    });

    let details = async {
        if selection.details.is_empty() {
            return Ok(());
        }
        profiles
            .save_detailed_interests(user_id, &selection.details)
            .await
    };
    let location = async {
        match location_update {
            Some(ref update) => profiles.update_profile(user_id, update).await.map(|_| ()),
            None => Ok(()),
        }
    };
    futures::try_join!(
        profiles.save_interests(user_id, &selection.selected),
        details,
        location
    )
    .map_err(|e| ScreenError::on(screen, e))?;

    info!(user_id = %user_id, count = selection.selected.len(), "Interests saved");
    Ok(ctx
        .navigator
        .complete(
            ticket,
            NavEvent::InterestsContinue {
                interests: selection.selected.clone(),
            },
        )
        .await)
}
