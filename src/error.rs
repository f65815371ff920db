//! Harness error taxonomy.
//!
//! Every failure a scenario can hit maps onto one of these variants.
//! Only two alternatives are ever recovered locally (signup auto-login
//! vs. explicit login, and guest features present vs. absent); everything
//! else propagates to the scenario boundary, where the runner captures a
//! diagnostic screenshot and re-raises.

/// Errors surfaced by the verification harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The browser process could not be started. Fatal — no retry.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Authentication did not reach the home route in time.
    #[error("authentication did not reach the home route within {elapsed_secs}s")]
    AuthTimeout {
        /// Seconds spent waiting before giving up.
        elapsed_secs: u64,
    },

    /// A wait strategy exhausted its timeout.
    #[error("timed out waiting for {condition}")]
    WaitTimeout {
        /// The selector/pattern that was never satisfied.
        condition: String,
    },

    /// An expectation about the page did not hold.
    #[error("assertion failed for {locator}: expected {expected}, observed {observed}")]
    Assertion {
        /// The locator the expectation was evaluated against.
        locator: String,
        /// What the scenario expected.
        expected: String,
        /// What the page actually showed.
        observed: String,
    },

    /// Any other failure surfaced by the browser driver or the host.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_display() {
        let e = HarnessError::Launch("no chrome binary".into());
        assert_eq!(e.to_string(), "browser launch failed: no chrome binary");
    }

    #[test]
    fn auth_timeout_display() {
        let e = HarnessError::AuthTimeout { elapsed_secs: 12 };
        assert_eq!(
            e.to_string(),
            "authentication did not reach the home route within 12s"
        );
    }

    #[test]
    fn wait_timeout_display_carries_condition() {
        let e = HarnessError::WaitTimeout {
            condition: "url contains \"/login\"".into(),
        };
        assert_eq!(e.to_string(), "timed out waiting for url contains \"/login\"");
    }

    #[test]
    fn assertion_display_names_both_states() {
        let e = HarnessError::Assertion {
            locator: "css=\"#isSpoiler\"".into(),
            expected: "visible".into(),
            observed: "absent".into(),
        };
        assert_eq!(
            e.to_string(),
            "assertion failed for css=\"#isSpoiler\": expected visible, observed absent"
        );
    }

    #[test]
    fn unexpected_from_anyhow() {
        let e: HarnessError = anyhow::anyhow!("boom").into();
        assert!(matches!(e, HarnessError::Unexpected(_)));
        assert_eq!(e.to_string(), "boom");
    }
}
