//! Inline test fixtures.
//!
//! The upload scenarios need real image files on disk; the bytes are
//! embedded here as base64 so a run has no external inputs beyond the
//! application itself. The diary scenario additionally reads a small
//! identity file produced by the seeding step.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use base64::Engine as _;

use crate::error::{HarnessError, HarnessResult};

/// 1×1 white pixel PNG.
pub const WHITE_PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

/// 10×10 red square PNG.
pub const RED_SQUARE_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAYAAACNMs+9AAAAFUlEQVR42mP8z8BQz0AEYBxVyCqPAQA7OQf7r/4hOAAAAABJRU5ErkJggg==";

/// Decode a base64 PNG fixture and write it to `<dir>/<name>`,
/// overwriting any previous copy.
pub async fn write_png(dir: &Path, name: &str, b64: &str) -> HarnessResult<PathBuf> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| anyhow!("decoding fixture {name}: {e}"))?;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow!("creating fixture dir {}: {e}", dir.display()))?;
    let path = dir.join(name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| anyhow!("writing fixture {}: {e}", path.display()))?;
    Ok(path)
}

/// Identity of a seeded user plus one of their diary entries, read from
/// a two-field comma-separated file (`username,diary_id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub diary_id: String,
}

impl Identity {
    pub fn parse(contents: &str) -> HarnessResult<Identity> {
        let line = contents.trim();
        let (username, diary_id) = line.split_once(',').ok_or_else(|| {
            HarnessError::Unexpected(anyhow!(
                "identity file must contain `username,diary_id`, got: {line:?}"
            ))
        })?;
        let (username, diary_id) = (username.trim(), diary_id.trim());
        if username.is_empty() || diary_id.is_empty() {
            return Err(HarnessError::Unexpected(anyhow!(
                "identity file has an empty field: {line:?}"
            )));
        }
        Ok(Identity {
            username: username.to_string(),
            diary_id: diary_id.to_string(),
        })
    }

    pub async fn load(path: &Path) -> HarnessResult<Identity> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("reading identity file {}: {e}", path.display()))?;
        Identity::parse(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_decode_to_png() {
        for b64 in [WHITE_PIXEL_PNG, RED_SQUARE_PNG] {
            let bytes = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
            assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47], "PNG magic bytes");
        }
    }

    #[test]
    fn identity_parses_and_trims() {
        let id = Identity::parse(" alice , 42\n").unwrap();
        assert_eq!(
            id,
            Identity {
                username: "alice".into(),
                diary_id: "42".into()
            }
        );
    }

    #[test]
    fn identity_rejects_malformed_input() {
        assert!(Identity::parse("no-comma-here").is_err());
        assert!(Identity::parse("alice,").is_err());
        assert!(Identity::parse(",42").is_err());
    }
}
