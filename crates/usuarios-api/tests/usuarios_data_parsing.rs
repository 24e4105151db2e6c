//! Integration tests for parsing `/usuarios` data.
//!
//! These tests validate that the usuarios-api models deserialize a captured
//! user list, including records with null columns.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use usuarios_api::{Status, UserId, UserRecord};

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load the user list fixture from disk.
fn load_user_list_fixture() -> String {
    let fixture_path = fixtures_dir().join("usuarios_list.json");
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read user list fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

fn parse_users() -> Vec<UserRecord> {
    let json_data = load_user_list_fixture();
    serde_json::from_str(&json_data).unwrap_or_else(|e| {
        panic!(
            "Failed to deserialize user list data: {}\nJSON: {}",
            e, json_data
        )
    })
}

#[test]
fn deserialize_user_list() {
    let users = parse_users();
    assert_eq!(users.len(), 13, "Expected 13 users in test data");
}

#[test]
fn identifiers_are_unique() {
    let users = parse_users();
    let ids: HashSet<UserId> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), users.len());
}

#[test]
fn status_values() {
    let users = parse_users();
    let inactive: Vec<u64> = users
        .iter()
        .filter(|u| u.fields.status == Status::Inactive)
        .map(|u| u.id.get())
        .collect();
    assert_eq!(inactive, vec![4, 9, 13]);
}

#[test]
fn null_columns_become_empty() {
    let users = parse_users();
    let pablo = users.iter().find(|u| u.id == UserId::new(12)).unwrap();
    assert_eq!(pablo.fields.first_name, "Pablo");
    assert!(pablo.fields.last_name.is_empty());
    assert!(pablo.fields.password_sha1.is_empty());
}

#[test]
fn null_status_keeps_the_row_as_inactive() {
    let users = parse_users();
    let rosa = users.last().unwrap();
    assert_eq!(rosa.id, UserId::new(13));
    assert_eq!(rosa.fields.username, "rmendez");
    assert_eq!(rosa.fields.status, Status::Inactive);
}

#[test]
fn reserialize_keeps_wire_names() {
    let users = parse_users();
    let value = serde_json::to_value(&users[0]).unwrap();
    for key in [
        "idusuario",
        "nombre",
        "apellido",
        "email",
        "usuario",
        "contrasena_hash",
        "contrasena_md5",
        "contrasena_sha1",
        "status",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
}
