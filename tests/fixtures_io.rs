//! Fixture and artifact filesystem behavior.

use vigil::fixtures::{write_png, Identity, RED_SQUARE_PNG, WHITE_PIXEL_PNG};

#[tokio::test]
async fn write_png_creates_the_directory_and_a_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("verification");

    let path = write_png(&nested, "test.png", RED_SQUARE_PNG).await.unwrap();
    assert!(path.exists());
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
}

#[tokio::test]
async fn write_png_overwrites_without_residue() {
    // Artifacts are unversioned: re-running a scenario must leave the
    // same filenames with fresh contents.
    let dir = tempfile::tempdir().unwrap();

    let first = write_png(dir.path(), "fixture.png", RED_SQUARE_PNG).await.unwrap();
    let red_len = std::fs::read(&first).unwrap().len();

    let second = write_png(dir.path(), "fixture.png", WHITE_PIXEL_PNG).await.unwrap();
    assert_eq!(first, second);
    let white_len = std::fs::read(&second).unwrap().len();
    assert_ne!(red_len, white_len, "file content was replaced");

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "no stray versioned copies");
}

#[tokio::test]
async fn identity_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_info.txt");
    std::fs::write(&path, "diary_user,abc123\n").unwrap();

    let id = Identity::load(&path).await.unwrap();
    assert_eq!(id.username, "diary_user");
    assert_eq!(id.diary_id, "abc123");
}

#[tokio::test]
async fn identity_load_fails_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Identity::load(&dir.path().join("absent.txt")).await;
    assert!(result.is_err());
}
