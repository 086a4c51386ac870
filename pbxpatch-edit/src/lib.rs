//! Patch engine for Xcode project manifests (`project.pbxproj`).
//!
//! Responsibilities:
//! - Allocate collision-free object identifiers for the entries of a
//!   [`FileSet`].
//! - Compute the five coordinated insertions (file references, group
//!   children, sources-phase members, resources-phase members, build-file
//!   records) on an in-memory copy of the manifest.
//! - Persist only after every insertion succeeded; a missed anchor raises
//!   [`PatchError::AnchorNotMatched`] and leaves the file untouched.
//!
//! The manifest is never parsed into an object model. Each insertion point
//! is located through a fixed literal or structural anchor, and the anchors
//! are textually disjoint, so the insertions compose as one linear rewrite.

mod error;

pub use error::{Anchor, PatchError, PatchResult};

use camino::Utf8Path;
use chrono::Utc;
use diffy::PatchFormatter;
use fs_err as fs;
use pbxpatch_types::fileset::{BuildPhase, FileEntry, FileSet};
use pbxpatch_types::object_id::ObjectId;
use pbxpatch_types::report::{
    FileChange, PatchOutcome, PatchReport, SlotId, ToolInfo,
};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Literal anchor opening the PBXFileReference section.
pub const FILE_REFERENCE_ANCHOR: &str = "/* Begin PBXFileReference section */";

/// Literal anchor opening the PBXBuildFile section.
pub const BUILD_FILE_ANCHOR: &str = "/* Begin PBXBuildFile section */";

#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// Compute the patch and report, but write nothing.
    pub dry_run: bool,
}

/// Result of running the patch over manifest text.
#[derive(Debug, Clone)]
pub enum TextOutcome {
    /// Sentinel already present; nothing to do.
    AlreadyApplied,
    /// Fully patched text plus the slot-to-identifier mapping for the run.
    Patched { text: String, slots: Vec<SlotId> },
}

/// True when the idempotency sentinel for `set` occurs in the manifest text.
pub fn is_applied(manifest: &str, set: &FileSet) -> bool {
    set.sentinel().is_some_and(|s| manifest.contains(s))
}

/// Patch manifest text in memory. Pure: no filesystem access.
///
/// All insertions are computed in sequence on an owned string; any anchor
/// that fails to match aborts the whole run with no partial output.
pub fn patch_text(manifest: &str, set: &FileSet) -> PatchResult<TextOutcome> {
    let sentinel = set.sentinel().ok_or(PatchError::EmptyFileSet)?;
    if manifest.contains(sentinel) {
        debug!(sentinel, "sentinel present; manifest already patched");
        return Ok(TextOutcome::AlreadyApplied);
    }

    let ids = allocate_ids(manifest, set);

    let text = insert_file_references(manifest, set, &ids)?;
    let text = insert_group_children(&text, set, &ids)?;
    let text = insert_phase_members(&text, set, &ids, BuildPhase::Sources)?;
    let text = insert_phase_members(&text, set, &ids, BuildPhase::Resources)?;
    let text = insert_build_files(&text, set, &ids)?;

    let slots = slot_records(set, &ids);
    Ok(TextOutcome::Patched { text, slots })
}

/// Patch the manifest at `path` and write it back in place.
///
/// Returns the run report plus a unified-diff preview of the change. On
/// `dry_run` the diff and report are produced but the file is not written.
pub fn patch_manifest(
    path: &Utf8Path,
    set: &FileSet,
    tool: ToolInfo,
    opts: &PatchOptions,
) -> PatchResult<(PatchReport, String)> {
    let started = Utc::now();
    let before = fs::read_to_string(path).map_err(|source| PatchError::ManifestRead {
        path: path.to_owned(),
        source,
    })?;

    let outcome = patch_text(&before, set)?;
    let mut report = PatchReport::new(tool, path.to_string(), PatchOutcome::AlreadyApplied);
    report.run.started_at = Some(started);

    match outcome {
        TextOutcome::AlreadyApplied => {
            report.run.ended_at = Some(Utc::now());
            info!("manifest already patched: {}", path);
            Ok((report, String::new()))
        }
        TextOutcome::Patched { text, slots } => {
            let patch = render_patch(path.as_str(), &before, &text);

            if opts.dry_run {
                report.outcome = PatchOutcome::DryRun;
            } else {
                fs::write(path, &text).map_err(|source| PatchError::ManifestWrite {
                    path: path.to_owned(),
                    source,
                })?;
                report.outcome = PatchOutcome::Applied;
            }

            report.change = Some(FileChange {
                path: path.to_string(),
                sha256_before: sha256_hex(before.as_bytes()),
                sha256_after: sha256_hex(text.as_bytes()),
                bytes_before: before.len() as u64,
                bytes_after: text.len() as u64,
            });
            report.slots = slots;
            report.run.ended_at = Some(Utc::now());

            info!(
                slots = report.slots.len(),
                dry_run = opts.dry_run,
                "patched {}",
                path
            );
            Ok((report, patch))
        }
    }
}

/// Reference id plus build-membership id for one file entry.
#[derive(Debug, Clone)]
struct EntryIds {
    reference: ObjectId,
    membership: ObjectId,
}

/// Draw two identifiers per entry, re-drawing on any textual collision with
/// the manifest or with an identifier drawn earlier in this run.
fn allocate_ids(manifest: &str, set: &FileSet) -> Vec<EntryIds> {
    let mut seen: HashSet<ObjectId> = HashSet::new();
    let mut draw = || loop {
        let id = ObjectId::generate();
        if !manifest.contains(id.as_str()) && seen.insert(id.clone()) {
            return id;
        }
    };

    set.files
        .iter()
        .map(|_| EntryIds {
            reference: draw(),
            membership: draw(),
        })
        .collect()
}

fn slot_records(set: &FileSet, ids: &[EntryIds]) -> Vec<SlotId> {
    let mut slots = Vec::with_capacity(set.files.len() * 2);
    for (entry, ids) in set.files.iter().zip(ids) {
        slots.push(SlotId {
            slot: format!("{} reference", entry.name),
            id: ids.reference.clone(),
        });
        slots.push(SlotId {
            slot: format!("{} in {}", entry.name, entry.phase),
            id: ids.membership.clone(),
        });
    }
    slots
}

/// Splice `insertion` into `text` immediately after the first occurrence of
/// `needle`, or fail with the given anchor.
fn insert_after(text: &str, anchor: Anchor, needle: &str, insertion: &str) -> PatchResult<String> {
    let Some(pos) = text.find(needle) else {
        return Err(PatchError::AnchorNotMatched { anchor });
    };
    let end = pos + needle.len();

    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..end]);
    out.push_str(insertion);
    out.push_str(&text[end..]);
    Ok(out)
}

fn insert_file_references(text: &str, set: &FileSet, ids: &[EntryIds]) -> PatchResult<String> {
    let mut block = String::new();
    for (entry, ids) in set.files.iter().zip(ids) {
        block.push_str(&format!(
            "\n\t\t{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = {}; name = {}; path = {}; sourceTree = \"<group>\"; }};",
            ids.reference,
            entry.name,
            entry.file_type,
            quoted(&entry.name),
            quoted(&entry.path),
        ));
    }
    insert_after(text, Anchor::FileReferenceSection, FILE_REFERENCE_ANCHOR, &block)
}

fn insert_group_children(text: &str, set: &FileSet, ids: &[EntryIds]) -> PatchResult<String> {
    let mut block = String::new();
    for (entry, ids) in set.files.iter().zip(ids) {
        block.push_str(&format!("\n\t\t\t\t{} /* {} */,", ids.reference, entry.name));
    }
    insert_after(text, Anchor::GroupChildren, &set.group_anchor, &block)
}

fn insert_phase_members(
    text: &str,
    set: &FileSet,
    ids: &[EntryIds],
    phase: BuildPhase,
) -> PatchResult<String> {
    let members: Vec<(&FileEntry, &EntryIds)> = set
        .files
        .iter()
        .zip(ids)
        .filter(|(entry, _)| entry.phase == phase)
        .collect();
    if members.is_empty() {
        return Ok(text.to_string());
    }

    // Matched structurally: phase comment, isa, any action mask, then the
    // opening of the file list. The membership lines land right after `(`.
    let Some(found) = phase_open(phase).find(text) else {
        let anchor = match phase {
            BuildPhase::Sources => Anchor::SourcesPhase,
            BuildPhase::Resources => Anchor::ResourcesPhase,
        };
        return Err(PatchError::AnchorNotMatched { anchor });
    };

    let mut block = String::new();
    for (entry, ids) in members {
        block.push_str(&format!(
            "\n\t\t\t\t{} /* {} in {} */,",
            ids.membership, entry.name, phase
        ));
    }

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..found.end()]);
    out.push_str(&block);
    out.push_str(&text[found.end()..]);
    Ok(out)
}

fn insert_build_files(text: &str, set: &FileSet, ids: &[EntryIds]) -> PatchResult<String> {
    let mut block = String::new();
    for (entry, ids) in set.files.iter().zip(ids) {
        block.push_str(&format!(
            "\n\t\t{} /* {} in {} */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; }};",
            ids.membership, entry.name, entry.phase, ids.reference, entry.name,
        ));
    }
    insert_after(text, Anchor::BuildFileSection, BUILD_FILE_ANCHOR, &block)
}

fn phase_open(phase: BuildPhase) -> &'static Regex {
    static SOURCES: OnceLock<Regex> = OnceLock::new();
    static RESOURCES: OnceLock<Regex> = OnceLock::new();

    let cell = match phase {
        BuildPhase::Sources => &SOURCES,
        BuildPhase::Resources => &RESOURCES,
    };
    cell.get_or_init(|| {
        let pattern = format!(
            r"/\* {comment} \*/ = \{{\s*isa = {isa};\s*buildActionMask = \d+;\s*files = \(",
            comment = phase.comment(),
            isa = phase.isa(),
        );
        Regex::new(&pattern).expect("static phase pattern")
    })
}

/// pbxproj value quoting: bare while the string stays inside the unquoted
/// identifier alphabet, double-quoted otherwise.
fn quoted(s: &str) -> Cow<'_, str> {
    let bare = !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'/'));
    if bare {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("\"{}\"", s))
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn render_patch(path: &str, before: &str, after: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    out.push_str(&PatchFormatter::new().fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
