extern crate tempdir;

use anyhow::Result;
use tempdir::TempDir;

use super::TokenCache;
use crate::domain::models::Session;

#[tokio::test]
async fn it_loads_a_logged_out_session_without_a_file() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));

    let session = cache.load().await?;
    assert!(!session.is_logged_in());

    return Ok(());
}

#[tokio::test]
async fn it_saves_and_loads_tokens() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("nested/token"));

    cache.save(&Session::with_token("abc")).await?;
    let session = cache.load().await?;

    assert_eq!(session.get_token(), "abc");

    return Ok(());
}

#[tokio::test]
async fn it_removes_the_file_when_saving_a_cleared_session() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));

    let session = Session::with_token("abc");
    cache.save(&session).await?;
    assert!(cache.file_path.exists());

    session.clear();
    cache.save(&session).await?;
    assert!(!cache.file_path.exists());

    return Ok(());
}

#[tokio::test]
async fn it_ignores_removing_a_missing_file() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));

    cache.remove().await?;
    assert!(!cache.file_path.exists());

    return Ok(());
}

#[cfg(unix)]
#[tokio::test]
async fn it_keeps_the_token_private_to_the_owner() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));
    std::fs::write(&cache.file_path, "old")?;
    std::fs::set_permissions(&cache.file_path, std::fs::Permissions::from_mode(0o644))?;

    cache.save(&Session::with_token("abc")).await?;

    let mode = std::fs::metadata(&cache.file_path)?.permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(std::fs::read_to_string(&cache.file_path)?, "abc");

    return Ok(());
}

#[cfg(unix)]
#[tokio::test]
async fn it_creates_new_token_files_private_to_the_owner() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));

    cache.save(&Session::with_token("abc")).await?;

    let mode = std::fs::metadata(&cache.file_path)?.permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    return Ok(());
}
