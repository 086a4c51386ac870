//! Declarative description of the files a patch run registers.
//!
//! The patcher does not discover files; it is handed an explicit table of
//! entries plus the anchor line the new group children are appended after.
//! The built-in table covers the file set this tool ships for; arbitrary
//! sets can be supplied through the CLI config layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Build phase a file participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    Sources,
    Resources,
}

impl BuildPhase {
    /// The comment label pbxproj uses for this phase ("Sources" / "Resources").
    pub fn comment(self) -> &'static str {
        match self {
            BuildPhase::Sources => "Sources",
            BuildPhase::Resources => "Resources",
        }
    }

    /// The `isa` value of the phase object.
    pub fn isa(self) -> &'static str {
        match self {
            BuildPhase::Sources => "PBXSourcesBuildPhase",
            BuildPhase::Resources => "PBXResourcesBuildPhase",
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.comment())
    }
}

/// One file to register: logical name, path relative to the project
/// directory, its `lastKnownFileType`, and the phase it builds in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub file_type: String,
    pub phase: BuildPhase,
}

impl FileEntry {
    pub fn new(name: &str, path: &str, file_type: &str, phase: BuildPhase) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            file_type: file_type.to_string(),
            phase,
        }
    }
}

/// The full table for one patch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    /// Existing child line of the target group (including its trailing
    /// comma); the new membership lines are inserted immediately after it.
    pub group_anchor: String,

    /// Idempotency sentinel. Defaults to the first entry's logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,

    /// Entries in declaration order; insertion order follows it.
    pub files: Vec<FileEntry>,
}

impl FileSet {
    /// The substring whose presence marks the manifest as already patched.
    /// `None` only for an empty table with no explicit sentinel.
    pub fn sentinel(&self) -> Option<&str> {
        self.sentinel
            .as_deref()
            .or_else(|| self.files.first().map(|e| e.name.as_str()))
    }

    /// Entries participating in `phase`, in declaration order.
    pub fn entries_in(&self, phase: BuildPhase) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(move |e| e.phase == phase)
    }

    /// The file set this tool was built to register: the SecureWebSocket
    /// native module plus the pinned gateway certificate in PEM and DER form.
    pub fn builtin() -> Self {
        Self {
            group_anchor: "13B07FB61A68108700A75B9A /* Info.plist */,".to_string(),
            sentinel: None,
            files: vec![
                FileEntry::new(
                    "SecureWebSocket.swift",
                    "iOSclaw/SecureWebSocket.swift",
                    "sourcecode.swift",
                    BuildPhase::Sources,
                ),
                FileEntry::new(
                    "SecureWebSocket.m",
                    "iOSclaw/SecureWebSocket.m",
                    "sourcecode.c.objc",
                    BuildPhase::Sources,
                ),
                FileEntry::new(
                    "gateway-cert.pem",
                    "iOSclaw/gateway-cert.pem",
                    "text",
                    BuildPhase::Resources,
                ),
                FileEntry::new(
                    "gateway-cert.der",
                    "iOSclaw/gateway-cert.der",
                    "file",
                    BuildPhase::Resources,
                ),
            ],
        }
    }
}
