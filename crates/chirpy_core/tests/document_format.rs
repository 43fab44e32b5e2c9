use chirpy_core::{
    ErrorKind, JsonRepository, PostId, PostListQuery, PostRepository, RevocationRepository,
    StoreConfig, UserId, UserRepository,
};
use serde_json::Value;
use std::fs;
use std::path::Path;

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn open_creates_empty_three_key_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");

    JsonRepository::open(&StoreConfig::new(&path)).unwrap();

    assert_eq!(
        read_json(&path),
        serde_json::json!({ "chirps": {}, "users": {}, "revoked_tokens": {} })
    );
}

#[test]
fn persisted_shape_uses_string_keys_and_encoded_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    let repo = JsonRepository::open(&StoreConfig::new(&path)).unwrap();

    repo.create_user("a@example.com", b"hash".to_vec()).unwrap();
    repo.create_post("hello world", UserId(1)).unwrap();
    repo.revoke_token("tok").unwrap();

    let json = read_json(&path);
    let root = json.as_object().unwrap();
    assert_eq!(root.len(), 3);

    assert_eq!(
        json["chirps"]["1"],
        serde_json::json!({ "id": 1, "body": "hello world", "author_id": 1 })
    );
    assert_eq!(
        json["users"]["1"],
        serde_json::json!({
            "id": 1,
            "email": "a@example.com",
            "password": "aGFzaA==",
            "is_chirpy_red": false
        })
    );
    let revoked_at = json["revoked_tokens"]["tok"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(revoked_at).is_ok());
}

#[test]
fn reads_document_written_by_another_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(
        &path,
        r#"{
            "chirps": {
                "1": {"id": 1, "body": "first", "author_id": 2},
                "3": {"id": 3, "body": "third", "author_id": 2}
            },
            "users": {
                "2": {"id": 2, "email": "x@example.com", "password": "aGFzaA==", "is_chirpy_red": true}
            },
            "revoked_tokens": {"old": "2024-05-01T12:00:00Z"}
        }"#,
    )
    .unwrap();

    let repo = JsonRepository::open(&StoreConfig::new(&path)).unwrap();

    let posts = repo.list_posts(&PostListQuery::default()).unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].id, PostId(3));
    let user = repo.get_user(UserId(2)).unwrap().unwrap();
    assert!(user.is_privileged);
    assert_eq!(user.password_hash, b"hash");
    assert!(repo.is_token_revoked("old").unwrap());
    assert_eq!(repo.create_post("fourth", UserId(2)).unwrap().id, PostId(4));
}

#[test]
fn open_refuses_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(&path, r#"{"chirps": {}, "users": {}}"#).unwrap();

    let err = JsonRepository::open(&StoreConfig::new(&path)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptDocument);
    // The unreadable file is left for inspection.
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"{"chirps": {}, "users": {}}"#
    );
}

#[test]
fn open_refuses_unreadable_path() {
    let dir = tempfile::tempdir().unwrap();

    let err = JsonRepository::open(&StoreConfig::new(dir.path())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
}

#[test]
fn operations_report_corruption_after_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    let repo = JsonRepository::open(&StoreConfig::new(&path)).unwrap();

    fs::write(
        &path,
        r#"{"chirps": {"1": {"id": 2, "body": "x", "author_id": 1}}, "users": {}, "revoked_tokens": {}}"#,
    )
    .unwrap();

    let read_err = repo.get_post(PostId(1)).unwrap_err();
    assert_eq!(read_err.kind(), ErrorKind::CorruptDocument);
    let write_err = repo.create_post("x", UserId(1)).unwrap_err();
    assert_eq!(write_err.kind(), ErrorKind::CorruptDocument);
}

#[test]
fn unknown_record_fields_are_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(
        &path,
        r#"{"chirps": {"1": {"id": 1, "body": "x", "author_id": 1, "likes": 4}}, "users": {}, "revoked_tokens": {}}"#,
    )
    .unwrap();

    let err = JsonRepository::open(&StoreConfig::new(&path)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptDocument);
}

#[test]
fn exhausted_id_space_is_reported_not_wrapped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    let seeded = r#"{
        "chirps": {"18446744073709551615": {"id": 18446744073709551615, "body": "last", "author_id": 1}},
        "users": {"18446744073709551615": {"id": 18446744073709551615, "email": "x@example.com", "password": "aGFzaA==", "is_chirpy_red": false}},
        "revoked_tokens": {}
    }"#;
    fs::write(&path, seeded).unwrap();
    let repo = JsonRepository::open(&StoreConfig::new(&path)).unwrap();

    let post_err = repo.create_post("next", UserId(1)).unwrap_err();
    assert_eq!(post_err.kind(), ErrorKind::CorruptDocument);
    let user_err = repo.create_user("y@example.com", b"h".to_vec()).unwrap_err();
    assert_eq!(user_err.kind(), ErrorKind::CorruptDocument);

    assert_eq!(fs::read_to_string(&path).unwrap(), seeded);
    assert!(repo.get_post(PostId(u64::MAX)).unwrap().is_some());
}

#[test]
fn aliased_record_keys_are_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    let seeded = r#"{
        "chirps": {
            "1": {"id": 1, "body": "first", "author_id": 1},
            "+1": {"id": 1, "body": "alias", "author_id": 1},
            "01": {"id": 1, "body": "alias2", "author_id": 1}
        },
        "users": {},
        "revoked_tokens": {}
    }"#;
    fs::write(&path, seeded).unwrap();

    let err = JsonRepository::open(&StoreConfig::new(&path)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptDocument);
    assert_eq!(fs::read_to_string(&path).unwrap(), seeded);

    for key in ["01", "+1"] {
        fs::write(
            &path,
            format!(
                r#"{{"chirps": {{"{key}": {{"id": 1, "body": "x", "author_id": 1}}}}, "users": {{}}, "revoked_tokens": {{}}}}"#
            ),
        )
        .unwrap();
        let err = JsonRepository::open(&StoreConfig::new(&path)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptDocument, "key {key}");
    }
}
