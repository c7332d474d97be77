//! Sign-up, sign-in and sign-out screens.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::{ScreenError, begin, fire};
use crate::collaborators::OAuthProvider;
use crate::context::AppContext;
use crate::error::ValidationError;
use crate::navigation::{NavEvent, ScreenId, Transition};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField { field: "Email" });
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Manual sign-up form.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub display_name: String,
}

impl SignUpForm {
    pub fn validate(&self, min_password_len: usize) -> Result<(), ValidationError> {
        if self.display_name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Name" });
        }
        validate_email(&self.email)?;
        let password = self.password.expose_secret();
        if password.is_empty() {
            return Err(ValidationError::MissingField { field: "Password" });
        }
        if password.chars().count() < min_password_len {
            return Err(ValidationError::PasswordTooShort {
                min: min_password_len,
            });
        }
        if password != self.confirm_password.expose_secret() {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Sign-in form.
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField { field: "Password" });
        }
        Ok(())
    }
}

/// Submit the manual sign-up form.
pub async fn submit_sign_up(ctx: &AppContext, form: &SignUpForm) -> Result<Transition, ScreenError> {
    let screen = ScreenId::ManualSignup;
    form.validate(ctx.config.min_password_len)
        .map_err(|e| ScreenError::on(screen, e))?;

    let ticket = begin(ctx, screen).await?;
    let session = ctx
        .deps
        .auth
        .sign_up(&form.email, &form.password, &form.display_name)
        .await
        .map_err(|e| ScreenError::on(screen, e))?;

    if ctx.navigator.is_current(&ticket).await {
        info!(user_id = %session.user_id(), "Signed up");
        ctx.set_session(session).await;
    }
    Ok(ctx.navigator.complete(ticket, NavEvent::ManualSignupSucceeded).await)
}

/// Submit the sign-in form.
pub async fn submit_sign_in(ctx: &AppContext, form: &SignInForm) -> Result<Transition, ScreenError> {
    let screen = ScreenId::Signin;
    form.validate().map_err(|e| ScreenError::on(screen, e))?;

    let ticket = begin(ctx, screen).await?;
    let session = ctx
        .deps
        .auth
        .sign_in(&form.email, &form.password)
        .await
        .map_err(|e| ScreenError::on(screen, e))?;

    if ctx.navigator.is_current(&ticket).await {
        info!(user_id = %session.user_id(), "Signed in");
        ctx.set_session(session).await;
    }
    Ok(ctx.navigator.complete(ticket, NavEvent::SignInSucceeded).await)
}

/// Sign up through a third-party identity provider from the signup screen.
pub async fn sign_up_with_oauth(
    ctx: &AppContext,
    provider: OAuthProvider,
) -> Result<Transition, ScreenError> {
    let screen = ScreenId::Signup;
    let ticket = begin(ctx, screen).await?;
    let session = ctx
        .deps
        .auth
        .sign_in_with_oauth(provider)
        .await
        .map_err(|e| ScreenError::on(screen, e))?;

    if ctx.navigator.is_current(&ticket).await {
        info!(user_id = %session.user_id(), provider = %provider, "Signed up with OAuth");
        ctx.set_session(session).await;
    }
    Ok(ctx
        .navigator
        .complete(ticket, NavEvent::SocialSignupSucceeded { provider })
        .await)
}

/// Sign out from the settings screen.
///
/// Navigation resets first; the local session is dropped only once that
/// transition applied, then the backend is told. A backend failure is logged
/// and does not restore the session.
pub async fn sign_out(ctx: &AppContext) -> Result<Transition, ScreenError> {
    let screen = ScreenId::Settings;
    let ticket = begin(ctx, screen).await?;
    let transition = ctx.navigator.complete(ticket, NavEvent::SignedOut).await;
    if !transition.is_applied() {
        return Ok(transition);
    }
    if let Some(session) = ctx.clear_session().await {
        info!(user_id = %session.user_id(), "Signed out");
        if let Err(e) = ctx.deps.auth.sign_out(&session).await {
            tracing::warn!(error = %e, "Backend sign-out failed; local session cleared");
        }
    }
    Ok(transition)
}

/// Shorthand used by the signup screen's "sign in instead" link.
pub async fn go_to_sign_in(ctx: &AppContext, from: ScreenId) -> Result<Transition, ScreenError> {
    if !matches!(from, ScreenId::Signup | ScreenId::ManualSignup) {
        return Err(ScreenError::not_active(
            from,
            ctx.navigator.current_screen().await,
        ));
    }
    fire(ctx, from, NavEvent::GoToSignIn).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::collaborators::memory::OAuthOutcome;
    use crate::collaborators::{AuthProvider, InMemoryBackend, Session};
    use crate::error::AuthError;
    use crate::navigation::Tab;
    use crate::screens::ErrorKind;
    use crate::screens::test_support::{context_on, secret};

    fn sign_up_form(email: &str, password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            email: email.to_string(),
            password: secret(password),
            confirm_password: secret(confirm),
            display_name: "Ada".to_string(),
        }
    }

    #[test]
    fn sign_up_validation() {
        assert!(sign_up_form("ada@example.com", "hunter22", "hunter22").validate(6).is_ok());
        assert_eq!(
            sign_up_form("ada@", "hunter22", "hunter22").validate(6),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            sign_up_form("", "hunter22", "hunter22").validate(6),
            Err(ValidationError::MissingField { field: "Email" })
        );
        assert_eq!(
            sign_up_form("ada@example.com", "abc", "abc").validate(6),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            sign_up_form("ada@example.com", "hunter22", "hunter23").validate(6),
            Err(ValidationError::PasswordMismatch)
        );

        let mut nameless = sign_up_form("ada@example.com", "hunter22", "hunter22");
        nameless.display_name = "  ".to_string();
        assert_eq!(
            nameless.validate(6),
            Err(ValidationError::MissingField { field: "Name" })
        );
    }

    #[tokio::test]
    async fn valid_sign_up_reaches_success() {
        let (ctx, _) = context_on(ScreenId::ManualSignup);
        let form = sign_up_form("ada@example.com", "hunter22", "hunter22");

        let t = submit_sign_up(&ctx, &form).await.unwrap();
        assert!(t.is_applied());
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Success);
        assert!(ctx.session().await.is_some());
    }

    #[tokio::test]
    async fn invalid_form_never_calls_backend() {
        let (ctx, backend) = context_on(ScreenId::ManualSignup);
        backend.set_offline(true);
        let form = sign_up_form("not-an-email", "hunter22", "hunter22");

        let err = submit_sign_up(&ctx, &form).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::ManualSignup);
    }

    #[tokio::test]
    async fn duplicate_account_stays_on_form() {
        let (ctx, _) = context_on(ScreenId::ManualSignup);
        ctx.deps
            .auth
            .sign_up("ada@example.com", &secret("hunter22"), "Ada")
            .await
            .unwrap();

        let form = sign_up_form("ada@example.com", "hunter22", "hunter22");
        let err = submit_sign_up(&ctx, &form).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.screen, ScreenId::ManualSignup);
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::ManualSignup);
        assert!(ctx.session().await.is_none());
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_screen_unchanged() {
        let (ctx, _) = context_on(ScreenId::Signin);
        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: secret("wrong-pass"),
        };

        let err = submit_sign_in(&ctx, &form).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.message, "Invalid email or password");
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Signin);
    }

    #[tokio::test]
    async fn network_failure_is_inline() {
        let (ctx, backend) = context_on(ScreenId::Signin);
        backend.set_offline(true);
        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: secret("hunter22"),
        };

        let err = submit_sign_in(&ctx, &form).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Signin);
    }

    #[tokio::test]
    async fn sign_in_succeeds_with_existing_account() {
        let (ctx, _) = context_on(ScreenId::Signin);
        ctx.deps
            .auth
            .sign_up("ada@example.com", &secret("hunter22"), "Ada")
            .await
            .unwrap();

        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: secret("hunter22"),
        };
        submit_sign_in(&ctx, &form).await.unwrap();
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Success);
        assert_eq!(ctx.session().await.unwrap().profile.display_name, "Ada");
    }

    #[tokio::test]
    async fn oauth_cancel_stays_on_signup() {
        let (ctx, backend) = context_on(ScreenId::Signup);
        backend
            .set_oauth(OAuthProvider::Google, Some(OAuthOutcome::Cancel))
            .await;

        let err = sign_up_with_oauth(&ctx, OAuthProvider::Google).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Signup);

        let t = sign_up_with_oauth(&ctx, OAuthProvider::Apple).await.unwrap();
        assert!(t.is_applied());
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Success);
    }

    #[tokio::test]
    async fn sign_out_returns_to_welcome() {
        let (ctx, _) = context_on(ScreenId::Settings);
        crate::screens::test_support::signed_in(&ctx).await;

        sign_out(&ctx).await.unwrap();
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Welcome);
        assert!(ctx.session().await.is_none());
    }

    /// Auth provider whose sign-out takes a while.
    struct SlowSignOut {
        inner: Arc<InMemoryBackend>,
        delay: Duration,
    }

    #[async_trait]
    impl AuthProvider for SlowSignOut {
        async fn sign_up(
            &self,
            email: &str,
            password: &SecretString,
            display_name: &str,
        ) -> Result<Session, AuthError> {
            self.inner.sign_up(email, password, display_name).await
        }

        async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
            self.inner.sign_in(email, password).await
        }

        async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<Session, AuthError> {
            self.inner.sign_in_with_oauth(provider).await
        }

        async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
            tokio::time::sleep(self.delay).await;
            self.inner.sign_out(session).await
        }
    }

    #[tokio::test]
    async fn tab_tap_during_sign_out_cannot_strand_user_on_tabs() {
        let (ctx, backend) = context_on(ScreenId::Settings);
        let mut deps = ctx.deps.clone();
        deps.auth = Arc::new(SlowSignOut {
            inner: backend,
            delay: Duration::from_millis(50),
        });
        let ctx = AppContext::new(ctx.config.clone(), deps, ctx.navigator.clone());
        crate::screens::test_support::signed_in(&ctx).await;

        let task = {
            let ctx = ctx.clone();
            tokio::spawn(async move { sign_out(&ctx).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let tap = ctx
            .navigator
            .dispatch(NavEvent::TabSelected { tab: Tab::Home })
            .await;

        let t = task.await.unwrap().unwrap();
        assert!(t.is_applied());
        assert!(!tap.is_applied());
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Welcome);
        assert!(ctx.session().await.is_none());
    }

    #[tokio::test]
    async fn stale_sign_out_keeps_session() {
        let (ctx, _) = context_on(ScreenId::Settings);
        crate::screens::test_support::signed_in(&ctx).await;
        let ticket = ctx.navigator.begin(ScreenId::Settings).await.unwrap();
        ctx.navigator
            .dispatch(NavEvent::TabSelected { tab: Tab::Home })
            .await;

        let t = ctx.navigator.complete(ticket, NavEvent::SignedOut).await;
        assert!(matches!(t, Transition::Stale { .. }));
        let err = sign_out(&ctx).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotActive);
        assert!(ctx.session().await.is_some());
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Home);
    }

    #[tokio::test]
    async fn sign_in_link_only_from_signup_screens() {
        let (ctx, _) = context_on(ScreenId::ManualSignup);
        go_to_sign_in(&ctx, ScreenId::ManualSignup).await.unwrap();
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Signin);

        let err = go_to_sign_in(&ctx, ScreenId::Home).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotActive);
        assert_eq!(ctx.navigator.current_screen().await, ScreenId::Signin);
    }

    #[tokio::test]
    async fn sign_in_requested_off_screen_is_not_active() {
        let (ctx, _) = context_on(ScreenId::Welcome);
        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: secret("hunter22"),
        };
        let err = submit_sign_in(&ctx, &form).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotActive);
    }
}
