// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed credential storage.

use std::sync::Arc;

use mlcontent_client::storage::keys;
use mlcontent_client::{CredentialStorage, CredentialStore, FileStorage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{api, client_with_store, token_json};

fn file_store(dir: &tempfile::TempDir) -> (CredentialStore, std::path::PathBuf) {
    let file = dir.path().join("nested").join("credentials.json");
    let store = CredentialStore::new(Arc::new(FileStorage::new(file.clone())));
    (store, file)
}

#[test]
fn test_credentials_survive_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let (store, file) = file_store(&dir);

    store.set_access("a1");
    store.set_refresh("r1");

    let reopened = CredentialStore::new(Arc::new(FileStorage::new(file.clone())));
    assert_eq!(reopened.access(), "a1");
    assert_eq!(reopened.refresh(), "r1");

    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
    assert_eq!(on_disk[keys::ACCESS_TOKEN], "a1");
    assert_eq!(on_disk[keys::REFRESH_TOKEN], "r1");
}

#[test]
fn test_clear_removes_both_keys() {
    let dir = tempfile::tempdir().unwrap();
    let (store, file) = file_store(&dir);
    store.set_access("a1");
    store.set_refresh("r1");

    store.clear();

    assert_eq!(store.access(), "");
    assert_eq!(store.refresh(), "");
    let storage = FileStorage::new(file);
    assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::REFRESH_TOKEN).unwrap(), None);
}

#[test]
fn test_clear_on_missing_file_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (store, file) = file_store(&dir);

    store.clear();

    assert!(!file.exists());
}

#[test]
fn test_corrupt_file_reads_empty_and_is_replaced_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("credentials.json");
    std::fs::write(&file, b"{not json").unwrap();

    let storage = FileStorage::new(file.clone());
    assert!(storage.get(keys::ACCESS_TOKEN).is_err());

    let store = CredentialStore::new(Arc::new(storage));
    assert_eq!(store.access(), "");

    store.set_access("a2");
    assert_eq!(store.access(), "a2");
}

#[cfg(unix)]
#[test]
fn test_credential_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let (store, file) = file_store(&dir);
    store.set_access("a1");

    let mode = std::fs::metadata(&file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn test_rewrite_never_exposes_credentials_with_loose_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("credentials.json");
    std::fs::write(&file, b"{}").unwrap();
    std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

    let store = CredentialStore::new(Arc::new(FileStorage::new(file.clone())));
    store.set_access("a1");

    // The file is replaced by one created private, not chmod-ed after the fact.
    let mode = std::fs::metadata(&file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("credentials.json")]);
}

#[test]
fn test_concurrent_writers_leave_a_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("credentials.json");

    let writers: Vec<_> = (0..4)
        .map(|n| {
            // Separate instances, as two processes would have.
            let storage = FileStorage::new(file.clone());
            std::thread::spawn(move || {
                for i in 0..25 {
                    let value = format!("{}-{}", n, i);
                    storage
                        .set_many(&[
                            (keys::ACCESS_TOKEN, value.as_str()),
                            (keys::REFRESH_TOKEN, value.as_str()),
                        ])
                        .unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let storage = FileStorage::new(file);
    let access = storage.get(keys::ACCESS_TOKEN).unwrap().unwrap();
    let refresh = storage.get(keys::REFRESH_TOKEN).unwrap().unwrap();
    assert_eq!(access, refresh);
}

#[tokio::test]
async fn test_login_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let (store, file) = file_store(&dir);

    let server = wiremock::MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/auth/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("a1", "r1")))
        .mount(&server)
        .await;

    let client = client_with_store(&server, store);
    client.login("alice", "pw").await.unwrap();

    let reopened = CredentialStore::new(Arc::new(FileStorage::new(file)));
    assert_eq!(reopened.access(), "a1");
    assert_eq!(reopened.refresh(), "r1");
}
