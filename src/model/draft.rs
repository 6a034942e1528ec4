use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::item::Item;

/// A partial item as the client submits it: no identifier, the authority assigns one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub count: u32,

    /// Filled in by the dispatcher when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Enter Item Name!")]
    MissingName,
    #[error("Enter Item Description!")]
    MissingDescription,
    #[error("Enter Valid Quantity!")]
    InvalidCount,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            count,
            ..Self::default()
        }
    }

    /// Checks fields in form order and reports the first problem.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.description.is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if self.count == 0 {
            return Err(DraftError::InvalidCount);
        }
        Ok(())
    }

    /// Copies the editable fields onto an existing item. Identity, color and tombstone
    /// fields are left alone.
    pub fn apply_to(&self, item: &mut Item) {
        item.name = self.name.clone();
        item.description = self.description.clone();
        item.count = self.count;
        if self.image.is_some() {
            item.image = self.image.clone();
        }
    }

    /// Attaches an image file as a base64 `data:` URL.
    pub fn with_image_file(mut self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.image = Some(format!("data:{};base64,{}", image_mime(path), encoded));
        Ok(self)
    }
}

impl From<&Item> for ItemDraft {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            count: item.count,
            color: item.color.clone(),
            image: item.image.clone(),
        }
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../tests/model/draft_tests.rs"]
mod tests;
