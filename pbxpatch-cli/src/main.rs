mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use fs_err as fs;
use pbxpatch_edit::{is_applied, patch_manifest, PatchError, PatchOptions};
use pbxpatch_render::render_report_md;
use pbxpatch_types::report::{PatchOutcome, PatchReport, ToolInfo};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pbxpatch",
    version,
    about = "Registers native source and resource files in an Xcode project manifest."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Patch a manifest in place (idempotent).
    Apply(ApplyArgs),
    /// Report whether a manifest already contains the file set.
    Check(CheckArgs),
    /// List the entries of the active file set.
    ListFiles(ListFilesArgs),
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    /// Path to the project.pbxproj manifest.
    #[arg(long)]
    manifest: Utf8PathBuf,

    /// File-set config (default: pbxpatch.toml next to the manifest,
    /// else the built-in set).
    #[arg(long)]
    file_set: Option<Utf8PathBuf>,

    /// Compute the patch and report, but do not write the manifest.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Directory for report.json / report.md / patch.diff artifacts.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Path to the project.pbxproj manifest.
    #[arg(long)]
    manifest: Utf8PathBuf,

    /// File-set config (default: pbxpatch.toml next to the manifest,
    /// else the built-in set).
    #[arg(long)]
    file_set: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ListFilesArgs {
    /// Manifest whose neighboring pbxpatch.toml should be consulted.
    #[arg(long, default_value = "project.pbxproj")]
    manifest: Utf8PathBuf,

    /// File-set config override.
    #[arg(long)]
    file_set: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        let code = e
            .downcast_ref::<PatchError>()
            .map(PatchError::exit_code)
            .unwrap_or(1);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Check(args) => cmd_check(args),
        Command::ListFiles(args) => cmd_list_files(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let set = config::resolve_file_set(&args.manifest, args.file_set.as_deref())?;
    let opts = PatchOptions {
        dry_run: args.dry_run,
    };

    let (report, patch) = patch_manifest(&args.manifest, &set, tool_info(), &opts)?;

    match report.outcome {
        PatchOutcome::AlreadyApplied => println!("Files already in project"),
        PatchOutcome::Applied => {
            println!("Added {} files to {}:", set.files.len(), args.manifest);
            print_slots(&report);
        }
        PatchOutcome::DryRun => {
            println!(
                "Dry-run: would add {} files to {}:",
                set.files.len(),
                args.manifest
            );
            print_slots(&report);
        }
    }

    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
        write_json(&out_dir.join("report.json"), &report)?;
        fs::write(out_dir.join("report.md"), render_report_md(&report))?;
        fs::write(out_dir.join("patch.diff"), &patch)?;
        info!("wrote patch artifacts to {}", out_dir);
    }

    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let set = config::resolve_file_set(&args.manifest, args.file_set.as_deref())?;
    let manifest = fs::read_to_string(&args.manifest)
        .with_context(|| format!("read manifest {}", args.manifest))?;

    if is_applied(&manifest, &set) {
        println!("Files already in project");
    } else {
        println!("File set not applied to {}", args.manifest);
    }
    Ok(())
}

fn cmd_list_files(args: ListFilesArgs) -> anyhow::Result<()> {
    let set = config::resolve_file_set(&args.manifest, args.file_set.as_deref())?;

    match args.format {
        OutputFormat::Text => {
            println!("Active file set ({} entries):\n", set.files.len());
            println!("  {:<26} {:<22} {:<10} PATH", "NAME", "TYPE", "PHASE");
            for entry in &set.files {
                println!(
                    "  {:<26} {:<22} {:<10} {}",
                    entry.name,
                    entry.file_type,
                    entry.phase.comment(),
                    entry.path
                );
            }
            println!();
            println!("Sentinel: {}", set.sentinel().unwrap_or("-"));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
    }
    Ok(())
}

fn print_slots(report: &PatchReport) {
    for slot in &report.slots {
        println!("  {}: {}", slot.slot, slot.id);
    }
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "pbxpatch".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
