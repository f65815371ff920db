use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Viewport dimensions for a browsing context.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Preferred color scheme emulated in a browsing context.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

/// Wait budgets, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Timeouts {
    /// Signup/login flow end-to-end.
    #[serde(default = "default_auth_secs")]
    pub auth_secs: u64,
    /// A single element/url/network-idle wait.
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,
    /// Server readiness probe.
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
}

fn default_auth_secs() -> u64 {
    12
}

fn default_wait_secs() -> u64 {
    10
}

fn default_probe_secs() -> u64 {
    30
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            auth_secs: default_auth_secs(),
            wait_secs: default_wait_secs(),
            probe_secs: default_probe_secs(),
        }
    }
}

/// Application routes, relative to `base_url`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Routes {
    #[serde(default = "default_home")]
    pub home: String,
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default = "default_signup")]
    pub signup: String,
    #[serde(default = "default_upload")]
    pub upload: String,
    #[serde(default = "default_settings")]
    pub settings: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Diary detail route prefix; the entry id is appended.
    #[serde(default = "default_diary")]
    pub diary: String,
    /// Static page seeded with one own and one foreign comment.
    #[serde(default = "default_verify_delete")]
    pub verify_delete: String,
}

fn default_home() -> String {
    "/".into()
}

fn default_login() -> String {
    "/login".into()
}

fn default_signup() -> String {
    "/signup".into()
}

fn default_upload() -> String {
    "/upload".into()
}

fn default_settings() -> String {
    "/settings".into()
}

fn default_profile() -> String {
    "/profile".into()
}

fn default_diary() -> String {
    "/diary".into()
}

fn default_verify_delete() -> String {
    "/verify-delete".into()
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            home: default_home(),
            login: default_login(),
            signup: default_signup(),
            upload: default_upload(),
            settings: default_settings(),
            profile: default_profile(),
            diary: default_diary(),
            verify_delete: default_verify_delete(),
        }
    }
}

/// Markers the application renders. Every one of them is coupling to the
/// app's current implementation, so every one is overridable; the
/// defaults reproduce the seeded environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UiMarkers {
    #[serde(default = "default_username_placeholder")]
    pub username_placeholder: String,
    #[serde(default = "default_password_placeholder")]
    pub password_placeholder: String,
    #[serde(default = "default_sign_in_label")]
    pub sign_in_label: String,
    #[serde(default = "default_sign_up_label")]
    pub sign_up_label: String,
    #[serde(default = "default_guest_login_label")]
    pub guest_login_label: String,
    #[serde(default = "default_share_label")]
    pub share_label: String,
    #[serde(default = "default_delete_comment_label")]
    pub delete_comment_label: String,
    #[serde(default = "default_edit_profile_label")]
    pub edit_profile_label: String,
    #[serde(default = "default_follow_label")]
    pub follow_label: String,
    #[serde(default = "default_dark_mode_label")]
    pub dark_mode_label: String,
    #[serde(default = "default_processing_text")]
    pub processing_text: String,
    #[serde(default = "default_feed_grid")]
    pub feed_grid: String,
    #[serde(default = "default_spoiler_indicator")]
    pub spoiler_indicator: String,
    #[serde(default = "default_spoiler_checkbox")]
    pub spoiler_checkbox: String,
    #[serde(default = "default_comment_field")]
    pub comment_field: String,
    #[serde(default = "default_file_input")]
    pub file_input: String,
    #[serde(default = "default_crop_slider")]
    pub crop_slider: String,
    #[serde(default = "default_crop_confirm_label")]
    pub crop_confirm_label: String,
    #[serde(default = "default_modal_overlay")]
    pub modal_overlay: String,
    #[serde(default = "default_comment_group")]
    pub comment_group: String,
    #[serde(default = "default_user_link")]
    pub user_link: String,
    #[serde(default = "default_verify_delete_heading")]
    pub verify_delete_heading: String,
    #[serde(default = "default_own_comment_text")]
    pub own_comment_text: String,
    #[serde(default = "default_other_comment_text")]
    pub other_comment_text: String,
}

fn default_username_placeholder() -> String {
    "Username".into()
}

fn default_password_placeholder() -> String {
    "Password".into()
}

fn default_sign_in_label() -> String {
    "Sign in".into()
}

fn default_sign_up_label() -> String {
    "Sign up".into()
}

fn default_guest_login_label() -> String {
    "Guest Login (View Only)".into()
}

fn default_share_label() -> String {
    "Share".into()
}

fn default_delete_comment_label() -> String {
    "Delete comment".into()
}

fn default_edit_profile_label() -> String {
    "Edit Profile".into()
}

fn default_follow_label() -> String {
    "Follow".into()
}

fn default_dark_mode_label() -> String {
    "Dark".into()
}

fn default_processing_text() -> String {
    "Processing...".into()
}

fn default_feed_grid() -> String {
    ".grid.grid-cols-3".into()
}

fn default_spoiler_indicator() -> String {
    ".text-yellow-500".into()
}

fn default_spoiler_checkbox() -> String {
    "#isSpoiler".into()
}

fn default_comment_field() -> String {
    "input[name='comment']".into()
}

fn default_file_input() -> String {
    "input[type='file']".into()
}

fn default_crop_slider() -> String {
    "input[type='range']".into()
}

fn default_crop_confirm_label() -> String {
    "Confirm crop".into()
}

fn default_modal_overlay() -> String {
    "div.fixed.inset-0".into()
}

fn default_comment_group() -> String {
    "div.group".into()
}

fn default_user_link() -> String {
    "a[href^='/users/']".into()
}

fn default_verify_delete_heading() -> String {
    "Verification Page".into()
}

fn default_own_comment_text() -> String {
    "My Comment".into()
}

fn default_other_comment_text() -> String {
    "Other Comment".into()
}

impl Default for UiMarkers {
    fn default() -> Self {
        Self {
            username_placeholder: default_username_placeholder(),
            password_placeholder: default_password_placeholder(),
            sign_in_label: default_sign_in_label(),
            sign_up_label: default_sign_up_label(),
            guest_login_label: default_guest_login_label(),
            share_label: default_share_label(),
            delete_comment_label: default_delete_comment_label(),
            edit_profile_label: default_edit_profile_label(),
            follow_label: default_follow_label(),
            dark_mode_label: default_dark_mode_label(),
            processing_text: default_processing_text(),
            feed_grid: default_feed_grid(),
            spoiler_indicator: default_spoiler_indicator(),
            spoiler_checkbox: default_spoiler_checkbox(),
            comment_field: default_comment_field(),
            file_input: default_file_input(),
            crop_slider: default_crop_slider(),
            crop_confirm_label: default_crop_confirm_label(),
            modal_overlay: default_modal_overlay(),
            comment_group: default_comment_group(),
            user_link: default_user_link(),
            verify_delete_heading: default_verify_delete_heading(),
            own_comment_text: default_own_comment_text(),
            other_comment_text: default_other_comment_text(),
        }
    }
}

/// Credential material for ephemeral signup accounts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Prefix for generated usernames; a random suffix is appended.
    #[serde(default = "default_username_prefix")]
    pub username_prefix: String,
    /// Fixed password the seeded application accepts.
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username_prefix() -> String {
    "vigil".into()
}

fn default_password() -> String {
    "password123".into()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username_prefix: default_username_prefix(),
            password: default_password(),
        }
    }
}

/// Top-level harness configuration, loaded from `vigil.yaml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the application under test.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory screenshot artifacts are written into (auto-created).
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
    /// Run the browser without a visible window.
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub routes: Routes,
    #[serde(default)]
    pub ui: UiMarkers,
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_base_url() -> String {
    "http://localhost:3000".into()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("verification")
}

fn default_headless() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            artifact_dir: default_artifact_dir(),
            headless: default_headless(),
            viewport: Viewport::default(),
            color_scheme: ColorScheme::default(),
            timeouts: Timeouts::default(),
            routes: Routes::default(),
            ui: UiMarkers::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Read and parse a YAML configuration file.
    pub async fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let cfg: Config = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(cfg)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `--config` path must exist; without one, `vigil.yaml`
    /// in the working directory is used if present, else built-in
    /// defaults. `VIGIL_BASE_URL` and the `--base-url` flag override the
    /// file, flag winning.
    pub async fn resolve(
        path: Option<&Path>,
        base_url_flag: Option<&str>,
    ) -> anyhow::Result<Config> {
        let mut cfg = match path {
            Some(p) => Config::load(p).await?,
            None => {
                let implicit = Path::new("vigil.yaml");
                if implicit.exists() {
                    Config::load(implicit).await?
                } else {
                    Config::default()
                }
            }
        };
        if let Ok(url) = std::env::var("VIGIL_BASE_URL") {
            if !url.is_empty() {
                cfg.base_url = url;
            }
        }
        if let Some(url) = base_url_flag {
            cfg.base_url = url.to_string();
        }
        Ok(cfg)
    }

    /// Join a route onto the base URL.
    pub fn url(&self, route: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if route.starts_with('/') {
            format!("{base}{route}")
        } else {
            format!("{base}/{route}")
        }
    }

    pub fn home_url(&self) -> String {
        self.url(&self.routes.home)
    }

    pub fn login_url(&self) -> String {
        self.url(&self.routes.login)
    }

    pub fn signup_url(&self) -> String {
        self.url(&self.routes.signup)
    }

    pub fn diary_url(&self, id: &str) -> String {
        let prefix = self.url(&self.routes.diary);
        format!("{}/{id}", prefix.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_seeded_environment() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, "http://localhost:3000");
        assert_eq!(cfg.artifact_dir, PathBuf::from("verification"));
        assert!(cfg.headless);
        assert_eq!(cfg.viewport, Viewport::default());
        assert_eq!(cfg.ui.guest_login_label, "Guest Login (View Only)");
        assert_eq!(cfg.auth.password, "password123");
        assert_eq!(cfg.timeouts.auth_secs, 12);
    }

    #[test]
    fn url_joining_handles_slashes() {
        let cfg = Config {
            base_url: "http://localhost:3000/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.home_url(), "http://localhost:3000/");
        assert_eq!(cfg.login_url(), "http://localhost:3000/login");
        assert_eq!(cfg.diary_url("42"), "http://localhost:3000/diary/42");
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let cfg: Config = serde_yaml_ng::from_str(
            "base_url: http://127.0.0.1:8080\nui:\n  guest_login_label: Browse as guest\n",
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.ui.guest_login_label, "Browse as guest");
        // untouched fields keep their defaults
        assert_eq!(cfg.ui.spoiler_indicator, ".text-yellow-500");
        assert_eq!(cfg.routes.settings, "/settings");
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<Config, _> =
            serde_yaml_ng::from_str::<Config>("base_url: http://x\nbogus_field: 1\n");
        assert!(result.is_err(), "unknown top-level field should be rejected");
    }

    #[test]
    fn color_scheme_yaml_forms() {
        let cfg: Config = serde_yaml_ng::from_str("color_scheme: dark\n").unwrap();
        assert_eq!(cfg.color_scheme, ColorScheme::Dark);
        assert_eq!(cfg.color_scheme.as_str(), "dark");
    }
}
