use crate::object_id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// How a patch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// Insertions computed and written to disk.
    Applied,
    /// Sentinel found; manifest untouched.
    AlreadyApplied,
    /// Insertions computed, nothing written.
    DryRun,
}

/// One generated identifier, keyed by its logical slot name
/// (e.g. "SecureWebSocket.swift reference", "gateway-cert.pem in Resources").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotId {
    pub slot: String,
    pub id: ObjectId,
}

/// Before/after digest of the patched manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub sha256_before: String,
    pub sha256_after: String,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub run: RunInfo,

    pub outcome: PatchOutcome,

    /// Path of the manifest this run targeted.
    pub manifest: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<FileChange>,
}

impl PatchReport {
    pub fn new(tool: ToolInfo, manifest: String, outcome: PatchOutcome) -> Self {
        Self {
            schema: crate::schema::PBXPATCH_REPORT_V1.to_string(),
            tool,
            run: RunInfo::default(),
            outcome,
            manifest,
            slots: vec![],
            change: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_roundtrips_through_json() {
        let mut report = PatchReport::new(
            ToolInfo {
                name: "pbxpatch".to_string(),
                version: Some("0.0.0".to_string()),
            },
            "ios/App.xcodeproj/project.pbxproj".to_string(),
            PatchOutcome::Applied,
        );
        report.slots.push(SlotId {
            slot: "SecureWebSocket.swift reference".to_string(),
            id: ObjectId::generate(),
        });

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: PatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.schema, crate::schema::PBXPATCH_REPORT_V1);
        assert_eq!(back.outcome, PatchOutcome::Applied);
        assert_eq!(back.slots, report.slots);
    }

    #[test]
    fn no_op_report_omits_empty_fields() {
        let report = PatchReport::new(
            ToolInfo {
                name: "pbxpatch".to_string(),
                version: None,
            },
            "project.pbxproj".to_string(),
            PatchOutcome::AlreadyApplied,
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("\"slots\""));
        assert!(!json.contains("\"change\""));
        assert!(json.contains("\"already_applied\""));
    }
}
