//! Signup and login against the application under test.
//!
//! The app's signup behavior is not guaranteed identical across
//! environments: some auto-login and land on home, others bounce to the
//! login form for a second explicit submission. [`ensure_authenticated`]
//! models both paths as a race over the resolved routes.

use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::action;
use crate::config::{AuthConfig, Config};
use crate::error::{HarnessError, HarnessResult};
use crate::locator::{Locator, Role};
use crate::nav::{self, UrlPattern};
use crate::session::Context;

/// An ephemeral username/password pair, generated per run and used
/// exactly once for signup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Generate a collision-free username under the configured prefix.
    pub fn generate(auth: &AuthConfig) -> Self {
        let stamp = chrono::Utc::now().format("%H%M%S");
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            username: format!("{}_{stamp}_{}", auth.username_prefix, &suffix[..6]),
            password: auth.password.clone(),
        }
    }
}

fn as_auth_timeout(err: HarnessError, started: Instant) -> HarnessError {
    match err {
        HarnessError::WaitTimeout { .. } => HarnessError::AuthTimeout {
            elapsed_secs: started.elapsed().as_secs(),
        },
        other => other,
    }
}

/// Sign up with `creds` and make sure the session ends on the home
/// route, tolerating either auto-login or a redirect through the login
/// form.
pub async fn ensure_authenticated(
    ctx: &Context,
    cfg: &Config,
    creds: &Credentials,
) -> HarnessResult<()> {
    let auth_timeout = Duration::from_secs(cfg.timeouts.auth_secs);
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);
    let started = Instant::now();

    nav::goto(ctx, &cfg.signup_url()).await?;
    info!(username = %creds.username, "signing up");
    action::fill(
        ctx,
        &Locator::placeholder(&cfg.ui.username_placeholder),
        &creds.username,
        wait,
    )
    .await?;
    action::fill(
        ctx,
        &Locator::placeholder(&cfg.ui.password_placeholder),
        &creds.password,
        wait,
    )
    .await?;
    action::click(ctx, &Locator::role(Role::Button, &cfg.ui.sign_up_label), wait).await?;

    let home = UrlPattern::Is(cfg.home_url());
    let login = UrlPattern::Contains(cfg.routes.login.clone());
    let outcome = nav::wait_for_any_url(ctx, &[home.clone(), login], auth_timeout)
        .await
        .map_err(|e| as_auth_timeout(e, started))?;

    if outcome == 1 {
        info!("signup bounced to login; authenticating explicitly");
        action::fill(
            ctx,
            &Locator::placeholder(&cfg.ui.username_placeholder),
            &creds.username,
            wait,
        )
        .await?;
        action::fill(
            ctx,
            &Locator::placeholder(&cfg.ui.password_placeholder),
            &creds.password,
            wait,
        )
        .await?;
        action::click(ctx, &Locator::role(Role::Button, &cfg.ui.sign_in_label), wait).await?;
        nav::wait_for_url(ctx, &home, auth_timeout)
            .await
            .map_err(|e| as_auth_timeout(e, started))?;
    }

    info!("authenticated; home route reached");
    Ok(())
}

/// Log in with existing credentials. A session that is already
/// authenticated gets redirected away from the login route and skips
/// the form.
pub async fn login(ctx: &Context, cfg: &Config, creds: &Credentials) -> HarnessResult<()> {
    let auth_timeout = Duration::from_secs(cfg.timeouts.auth_secs);
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);
    let started = Instant::now();

    nav::goto(ctx, &cfg.login_url()).await?;
    let url = ctx.url().await?;
    if url.contains(cfg.routes.login.as_str()) {
        info!(username = %creds.username, "logging in");
        action::fill(
            ctx,
            &Locator::placeholder(&cfg.ui.username_placeholder),
            &creds.username,
            wait,
        )
        .await?;
        action::fill(
            ctx,
            &Locator::placeholder(&cfg.ui.password_placeholder),
            &creds.password,
            wait,
        )
        .await?;
        action::click(ctx, &Locator::role(Role::Button, &cfg.ui.sign_in_label), wait).await?;
        nav::wait_for_url(ctx, &UrlPattern::Is(cfg.home_url()), auth_timeout)
            .await
            .map_err(|e| as_auth_timeout(e, started))?;
        info!("logged in");
    }
    Ok(())
}

/// Authenticate as the view-only guest account.
pub async fn guest_login(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let auth_timeout = Duration::from_secs(cfg.timeouts.auth_secs);
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);
    let started = Instant::now();

    nav::goto(ctx, &cfg.login_url()).await?;
    info!("logging in as guest");
    action::click(
        ctx,
        &Locator::role(Role::Button, &cfg.ui.guest_login_label),
        wait,
    )
    .await?;
    nav::wait_for_url(ctx, &UrlPattern::Is(cfg.home_url()), auth_timeout)
        .await
        .map_err(|e| as_auth_timeout(e, started))?;
    info!("guest session established");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_credentials_are_unique_and_prefixed() {
        let auth = AuthConfig::default();
        let a = Credentials::generate(&auth);
        let b = Credentials::generate(&auth);
        assert!(a.username.starts_with("vigil_"));
        assert_ne!(a.username, b.username);
        assert_eq!(a.password, "password123");
    }
}
