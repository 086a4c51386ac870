//! Error types for pbxpatch-edit.
//!
//! Two classes are distinguished:
//! - Structural mismatch (exit code 2): an anchor the patch relies on is not
//!   present in the manifest. Nothing is written in that case.
//! - Runtime errors (exit code 1): I/O failures reading or writing the
//!   manifest, or an unusable file set.

use camino::Utf8PathBuf;
use thiserror::Error;

/// The anchor regions a patch run must locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Literal `/* Begin PBXFileReference section */`.
    FileReferenceSection,
    /// Literal `/* Begin PBXBuildFile section */`.
    BuildFileSection,
    /// The configured child line of the target group.
    GroupChildren,
    /// Structural opening of the PBXSourcesBuildPhase file list.
    SourcesPhase,
    /// Structural opening of the PBXResourcesBuildPhase file list.
    ResourcesPhase,
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Anchor::FileReferenceSection => "PBXFileReference section",
            Anchor::BuildFileSection => "PBXBuildFile section",
            Anchor::GroupChildren => "group children anchor line",
            Anchor::SourcesPhase => "PBXSourcesBuildPhase file list",
            Anchor::ResourcesPhase => "PBXResourcesBuildPhase file list",
        };
        f.write_str(label)
    }
}

/// The top-level error type for patch operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Manifest could not be read. Fatal before any mutation.
    #[error("manifest not readable: {path}")]
    ManifestRead {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest could not be written back after a successful transform.
    #[error("manifest not writable: {path}")]
    ManifestWrite {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An anchor the patch relies on does not occur in the manifest.
    /// The file on disk is left untouched.
    #[error("anchor not matched: {anchor}")]
    AnchorNotMatched { anchor: Anchor },

    /// The file set has no entries and no explicit sentinel.
    #[error("file set is empty")]
    EmptyFileSet,
}

impl PatchError {
    /// True for structural-mismatch errors (exit code 2).
    pub fn is_structural(&self) -> bool {
        matches!(self, PatchError::AnchorNotMatched { .. })
    }

    /// The recommended process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_structural() { 2 } else { 1 }
    }
}

/// Result type alias using PatchError.
pub type PatchResult<T> = Result<T, PatchError>;
