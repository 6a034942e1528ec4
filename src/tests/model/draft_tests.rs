use super::*;
use crate::test_support::item;

#[test]
fn validate_reports_first_missing_field_in_form_order() {
    let mut draft = ItemDraft::new("", "", 0);
    assert_eq!(draft.validate(), Err(DraftError::MissingName));

    draft.name = "Milk".to_string();
    assert_eq!(draft.validate(), Err(DraftError::MissingDescription));

    draft.description = "2%".to_string();
    assert_eq!(draft.validate(), Err(DraftError::InvalidCount));

    draft.count = 2;
    assert_eq!(draft.validate(), Ok(()));
}

#[test]
fn draft_errors_read_like_form_messages() {
    assert_eq!(DraftError::MissingName.to_string(), "Enter Item Name!");
    assert_eq!(
        DraftError::MissingDescription.to_string(),
        "Enter Item Description!"
    );
    assert_eq!(DraftError::InvalidCount.to_string(), "Enter Valid Quantity!");
}

#[test]
fn draft_serializes_without_id_or_empty_color() -> anyhow::Result<()> {
    let draft = ItemDraft::new("Eggs", "dozen", 12);
    let v = serde_json::to_value(&draft)?;
    assert_eq!(
        v,
        serde_json::json!({"name": "Eggs", "description": "dozen", "count": 12})
    );
    Ok(())
}

#[test]
fn apply_to_keeps_identity_and_tombstone() {
    let mut target = item("a1", "Bread");
    target.color = "#e74c3c".to_string();
    let draft = ItemDraft::new("Rye bread", "sliced", 3);
    draft.apply_to(&mut target);

    assert_eq!(target.id.as_str(), "a1");
    assert_eq!(target.name, "Rye bread");
    assert_eq!(target.description, "sliced");
    assert_eq!(target.count, 3);
    assert_eq!(target.color, "#e74c3c");
    assert!(!target.is_deleted);
}

#[test]
fn image_file_becomes_data_url() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("pic.PNG");
    std::fs::write(&path, b"abc")?;

    let draft = ItemDraft::new("Tea", "green", 1).with_image_file(&path)?;
    assert_eq!(draft.image.as_deref(), Some("data:image/png;base64,YWJj"));
    Ok(())
}

#[test]
fn item_accepts_legacy_date_deleted_and_server_field_names() -> anyhow::Result<()> {
    let raw = serde_json::json!({
        "_id": "64f0",
        "name": "Soap",
        "description": "bar",
        "count": 2,
        "color": "#2ecc71",
        "isDeleted": true,
        "dateDeleted": "2023-05-01T12:00:00.000Z",
        "userId": "someone"
    });
    let parsed: Item = serde_json::from_value(raw)?;
    assert_eq!(parsed.id.as_str(), "64f0");
    assert!(parsed.is_deleted);
    assert_eq!(
        parsed.deleted_at.map(|t| t.unix_timestamp()),
        Some(1_682_942_400)
    );

    let out = serde_json::to_value(&parsed)?;
    assert_eq!(out["_id"], "64f0");
    assert_eq!(out["isDeleted"], true);
    assert!(out.get("deletedAt").is_some());
    Ok(())
}

#[test]
fn normalized_strips_deleted_at_from_live_items() {
    let mut it = item("x", "Salt");
    it.deleted_at = Some(crate::test_support::at(1_000));
    let it = it.normalized();
    assert!(it.deleted_at.is_none());
}
