use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(UserId::from(uuid), id);
}

#[test]
fn test_typed_ids_are_unique() {
    let first = TransactionId::new();
    let second = TransactionId::new();
    assert_ne!(first, second);
}

#[test]
fn test_typed_id_display_round_trips() {
    let id = TransactionId::new();
    let parsed = TransactionId::from_str(&id.to_string()).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(UserId::from_str("not-a-user").is_err());
    assert!(TransactionId::from_str("").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&UserId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
