//! Rendering helpers (markdown) for human-readable artifacts.

use pbxpatch_types::report::{PatchOutcome, PatchReport};

pub fn render_report_md(report: &PatchReport) -> String {
    let mut out = String::new();
    out.push_str("# pbxpatch report\n\n");
    out.push_str(&format!("- Manifest: `{}`\n", report.manifest));
    out.push_str(&format!("- Outcome: `{}`\n", outcome_label(report.outcome)));
    if let Some(change) = &report.change {
        out.push_str(&format!(
            "- Bytes: {} → {}\n",
            change.bytes_before, change.bytes_after
        ));
    }
    out.push('\n');

    out.push_str("## Generated identifiers\n\n");
    if report.slots.is_empty() {
        out.push_str("_No identifiers generated._\n");
        return out;
    }

    for slot in &report.slots {
        out.push_str(&format!("- `{}`: `{}`\n", slot.slot, slot.id));
    }

    if let Some(change) = &report.change {
        out.push_str("\n**File change**\n\n");
        out.push_str(&format!(
            "- `{}` {} → {}\n",
            change.path, change.sha256_before, change.sha256_after
        ));
    }

    out
}

fn outcome_label(outcome: PatchOutcome) -> &'static str {
    match outcome {
        PatchOutcome::Applied => "applied",
        PatchOutcome::AlreadyApplied => "already_applied",
        PatchOutcome::DryRun => "dry_run",
    }
}

#[cfg(test)]
mod tests {
    use super::render_report_md;
    use pbxpatch_types::object_id::ObjectId;
    use pbxpatch_types::report::{PatchOutcome, PatchReport, SlotId, ToolInfo};

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "pbxpatch".to_string(),
            version: None,
        }
    }

    #[test]
    fn no_op_report_renders_placeholder() {
        let report = PatchReport::new(
            tool(),
            "project.pbxproj".to_string(),
            PatchOutcome::AlreadyApplied,
        );
        let md = render_report_md(&report);
        assert!(md.contains("`already_applied`"));
        assert!(md.contains("_No identifiers generated._"));
    }

    #[test]
    fn applied_report_lists_every_slot() {
        let mut report = PatchReport::new(
            tool(),
            "project.pbxproj".to_string(),
            PatchOutcome::Applied,
        );
        let id = ObjectId::generate();
        report.slots.push(SlotId {
            slot: "SecureWebSocket.swift reference".to_string(),
            id: id.clone(),
        });

        let md = render_report_md(&report);
        assert!(md.contains("`applied`"));
        assert!(md.contains(&format!("- `SecureWebSocket.swift reference`: `{id}`")));
    }
}
