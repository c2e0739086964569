//! CLI argument parsing using clap.

use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use cuepack_core::EventName;
use cuepack_core::PackId;
use std::path::Path;
use std::path::PathBuf;

/// Archive suffixes stripped when deriving a pack id from a file name.
const ARCHIVE_SUFFIXES: [&str; 8] = [
    ".tar.gz", ".tgz", ".tar.bz2", ".tar.xz", ".tar.zst", ".tar.zstd", ".tar", ".zip",
];

#[derive(Parser)]
#[command(name = "cuepack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log filter written to stderr (e.g. "info", "cuepack_core=debug")
    #[arg(long, global = true, default_value = "warn", value_name = "FILTER")]
    pub log_level: String,

    /// Directory holding installed packs [default: ~/.cuepack/packs]
    #[arg(long, global = true, env = "CUEPACK_PACKS_DIR", value_name = "DIR")]
    pub packs_dir: Option<PathBuf>,
}

impl Cli {
    /// The packs directory from the flag, the environment, or the home
    /// directory.
    pub fn resolve_packs_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.packs_dir {
            return Ok(dir.clone());
        }
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".cuepack").join("packs"))
            .ok_or_else(|| {
                anyhow!("cannot locate a home directory; pass --packs-dir or set CUEPACK_PACKS_DIR")
            })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check an archive without installing it
    ///
    /// Prints nothing and exits 0 if the archive would install cleanly.
    /// Otherwise prints one line per problem and exits 1.
    Validate(ValidateArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Install a pack from an archive file or an http(s) URL
    Install(InstallArgs),
    /// Add a single sound file to an installed pack
    Add(AddArgs),
    /// List installed packs
    Packs,
    /// List the sounds of an installed pack
    Sounds(PackArgs),
    /// Print a random sound of a pack for an event
    Pick(PickArgs),
    /// Remove an installed pack
    Remove(PackArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Expected pack id (default: derived from the archive file name)
    #[arg(short, long, value_name = "ID", value_parser = parse_pack_id)]
    pub pack: Option<PackId>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show entry kinds and sizes
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct InstallArgs {
    /// Archive path or http(s) URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Pack id (default: derived from the archive file name)
    #[arg(short, long, value_name = "ID", value_parser = parse_pack_id)]
    pub pack: Option<PackId>,
}

#[derive(clap::Args)]
pub struct AddArgs {
    /// Installed pack
    #[arg(value_name = "PACK", value_parser = parse_pack_id)]
    pub pack: PackId,

    /// Event the sound plays on
    #[arg(value_name = "EVENT", value_parser = parse_event)]
    pub event: EventName,

    /// Audio file to add
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Installed pack
    #[arg(value_name = "PACK", value_parser = parse_pack_id)]
    pub pack: PackId,
}

#[derive(clap::Args)]
pub struct PickArgs {
    /// Installed pack
    #[arg(value_name = "PACK", value_parser = parse_pack_id)]
    pub pack: PackId,

    /// Event to pick a sound for
    #[arg(value_name = "EVENT", value_parser = parse_event)]
    pub event: EventName,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_pack_id(s: &str) -> Result<PackId, String> {
    PackId::parse(s).map_err(|e| e.to_string())
}

fn parse_event(s: &str) -> Result<EventName, String> {
    s.parse::<EventName>().map_err(|_| {
        let names: Vec<_> = EventName::ALL.iter().map(|e| e.as_str()).collect();
        format!("unknown event '{s}' (expected one of: {})", names.join(", "))
    })
}

/// Derives a pack id from an archive file name or URL by stripping the
/// archive suffix, e.g. `retro-beeps.tar.gz` → `retro-beeps`.
pub fn pack_id_from_source(source: &str) -> Result<PackId> {
    let last = source
        .split(['?', '#'])
        .next()
        .unwrap_or(source)
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source);
    let file_name = Path::new(last)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(last);

    let lower = file_name.to_ascii_lowercase();
    let stem = ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| {
            lower
                .strip_suffix(suffix)
                .map(|_| &file_name[..file_name.len() - suffix.len()])
        })
        .unwrap_or(file_name);

    PackId::parse(stem).map_err(|_| {
        anyhow!("cannot derive a pack id from '{file_name}'\nHINT: Pass the pack id with --pack.")
    })
}
