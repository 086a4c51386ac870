//! Configuration file loading for pbxpatch.
//!
//! The file set to register is a declarative table. It can come from a
//! `pbxpatch.toml` discovered next to the manifest, from an explicit
//! `--file-set` path, or fall back to the built-in table.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use pbxpatch_types::fileset::FileSet;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "pbxpatch.toml";

/// Top-level configuration from pbxpatch.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PbxpatchConfig {
    /// The file set to register. Absent means "use the built-in set".
    pub fileset: Option<FileSet>,
}

/// Discover a pbxpatch.toml next to the manifest.
///
/// Returns `None` if the manifest has no parent directory or the file is
/// not there.
pub fn discover_config(manifest: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = manifest.parent()?.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a pbxpatch.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PbxpatchConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PbxpatchConfig> {
    let config: PbxpatchConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Resolve the active file set for a run.
///
/// Precedence: explicit `--file-set` path, then a pbxpatch.toml next to the
/// manifest, then the built-in table. An explicit config without a
/// `[fileset]` table is an error; empty tables are rejected here rather than
/// deep in the patch engine.
pub fn resolve_file_set(
    manifest: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<FileSet> {
    let set = match explicit {
        Some(path) => load_config(path)?
            .fileset
            .with_context(|| format!("{} has no [fileset] table", path))?,
        None => match discover_config(manifest) {
            Some(path) => match load_config(&path)?.fileset {
                Some(set) => set,
                None => FileSet::builtin(),
            },
            None => FileSet::builtin(),
        },
    };

    anyhow::ensure!(!set.files.is_empty(), "file set has no entries");
    anyhow::ensure!(
        !set.group_anchor.trim().is_empty(),
        "file set has no group_anchor"
    );
    Ok(set)
}
