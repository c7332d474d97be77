//! Onboarding step 4: connect a calendar.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::{ScreenError, begin};
use crate::collaborators::CalendarProvider;
use crate::collaborators::fixtures::{TIME_SLOTS, TimeSlot};
use crate::context::AppContext;
use crate::error::{CalendarError, ValidationError};
use crate::navigation::{NavEvent, ScreenId, Transition};

/// Link a calendar account and continue to the completion screen.
///
/// A sync that reports `false` is shown inline and leaves the user on the
/// calendar screen; they may retry or skip.
pub async fn connect(
    ctx: &AppContext,
    provider: CalendarProvider,
    account: &str,
    credential: &SecretString,
) -> Result<Transition, ScreenError> {
    let screen = ScreenId::OnboardingCalendar;
    if account.trim().is_empty() {
        return Err(ScreenError::on(
            screen,
            ValidationError::MissingField { field: "Account" },
        ));
    }
    if credential.expose_secret().is_empty() {
        return Err(ScreenError::on(
            screen,
            ValidationError::MissingField { field: "Password" },
        ));
    }

    let ticket = begin(ctx, screen).await?;
    let synced = ctx
        .deps
        .calendar
        .sync(provider, account.trim(), credential)
        .await
        .map_err(|e| ScreenError::on(screen, e))?;
    if !synced {
        return Err(ScreenError::on(
            screen,
            CalendarError::Rejected {
                provider: provider.to_string(),
            },
        ));
    }

    info!(provider = %provider, "Calendar connected");
    Ok(ctx.navigator.complete(ticket, NavEvent::CalendarContinue).await)
}

/// Free slots to suggest once a calendar is linked.
pub fn suggested_slots() -> &'static [TimeSlot] {
    TIME_SLOTS
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::collaborators::SimulatedCalendarSync;
    use crate::screens::ErrorKind;
    use crate::screens::test_support::{context_on, secret};

    #[tokio::test]
    async fn connect_advances_to_complete() {
        let (ctx, _) = context_on(ScreenId::OnboardingCalendar);
        let t = connect(&ctx, CalendarProvider::Google, "ada@gmail.com", &secret("pw"))
            .await
            .unwrap();
        assert!(t.is_applied());
        let snap = ctx.navigator.snapshot().await;
        assert_eq!(snap.screen, ScreenId::OnboardingComplete);
        assert_eq!(snap.onboarding_step.get(), 5);
    }

    #[tokio::test]
    async fn blank_inputs_are_rejected() {
        let (ctx, _) = context_on(ScreenId::OnboardingCalendar);
        let err = connect(&ctx, CalendarProvider::Outlook, " ", &secret("pw"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = connect(&ctx, CalendarProvider::Outlook, "ada", &secret(""))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(
            ctx.navigator.current_screen().await,
            ScreenId::OnboardingCalendar
        );
    }

    #[tokio::test]
    async fn leaving_during_sync_suppresses_completion() {
        let (ctx, _) = context_on(ScreenId::OnboardingCalendar);
        let mut deps = ctx.deps.clone();
        deps.calendar = Arc::new(SimulatedCalendarSync::new(Duration::from_millis(50)));
        let ctx = crate::context::AppContext::new(
            ctx.config.clone(),
            deps,
            ctx.navigator.clone(),
        );

        let task = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                connect(&ctx, CalendarProvider::Apple, "ada", &secret("pw")).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.navigator.dispatch(NavEvent::Skip).await;

        let t = task.await.unwrap().unwrap();
        assert!(matches!(t, Transition::Stale { .. }));
        let snap = ctx.navigator.snapshot().await;
        assert_eq!(snap.screen, ScreenId::OnboardingComplete);
        assert_eq!(snap.onboarding_step.get(), 4);
    }

    #[test]
    fn slots_are_offered() {
        assert!(!suggested_slots().is_empty());
    }
}
