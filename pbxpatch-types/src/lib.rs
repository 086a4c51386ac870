//! Shared DTOs (schemas-as-code) for the pbxpatch workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod fileset;
pub mod object_id;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const PBXPATCH_REPORT_V1: &str = "pbxpatch.report.v1";
}
