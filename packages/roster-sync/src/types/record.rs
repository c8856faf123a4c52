//! Roster records and their identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::identity::identity_key;

/// Image URL sentinel for listings without a photo.
pub const NO_IMAGE: &str = "No Image";

/// Stable label of the adapter that produced a record (e.g. `crawford`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Canonical ledger key, see [`crate::identity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for IdentityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One listing observed at one source.
///
/// Serialized with the field names the published files have always used
/// (`inmateId`, `name`, `imageUrl`, `county`). The descriptive names are
/// accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InmateRecord {
    #[serde(rename = "inmateId", alias = "identityKey")]
    pub identity_key: IdentityKey,

    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,

    #[serde(rename = "imageUrl")]
    pub image_url: String,

    #[serde(rename = "county", alias = "sourceId")]
    pub source_id: SourceId,
}

impl InmateRecord {
    /// Build a record; the identity key is derived from name and source.
    pub fn new(
        display_name: impl Into<String>,
        source_id: SourceId,
        image_url: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            identity_key: identity_key(&display_name, &source_id),
            display_name,
            image_url: image_url.into(),
            source_id,
        }
    }

    /// Build a record with the no-image sentinel.
    pub fn without_image(display_name: impl Into<String>, source_id: SourceId) -> Self {
        Self::new(display_name, source_id, NO_IMAGE)
    }

    pub fn has_image(&self) -> bool {
        self.image_url != NO_IMAGE
    }
}

/// A record tagged by the reconciler as new or already known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: InmateRecord,

    #[serde(rename = "isNew")]
    pub is_new: bool,
}

impl AnnotatedRecord {
    pub fn new(record: InmateRecord, is_new: bool) -> Self {
        Self { record, is_new }
    }

    pub fn key(&self) -> &IdentityKey {
        &self.record.identity_key
    }
}
