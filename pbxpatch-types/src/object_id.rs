use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A pbxproj object identifier: 24 uppercase hexadecimal characters.
///
/// Every object in the manifest (file references, build files, groups,
/// phases) is keyed by one of these. New identifiers are drawn from UUIDv4
/// entropy; within 24 hex characters the collision probability against a
/// real-world manifest is negligible, but callers that insert into an
/// existing manifest should still screen against its text (see
/// `pbxpatch-edit`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Length of an identifier in hex characters.
    pub const LEN: usize = 24;

    /// Generate a fresh identifier. Cannot fail.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        ObjectId(hex[..Self::LEN].to_ascii_uppercase())
    }

    /// Parse an identifier from manifest text. Returns `None` unless the
    /// input is exactly 24 uppercase hex characters.
    pub fn parse(s: &str) -> Option<Self> {
        let ok = s.len() == Self::LEN
            && s.bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
        ok.then(|| ObjectId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
