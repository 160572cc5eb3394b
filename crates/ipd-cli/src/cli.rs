use clap::{ArgAction, Parser, Subcommand};
use ipd_format::ADDRESS_BOOK;

#[derive(Parser)]
#[command(
    name = "ipd2vcf",
    version,
    about = "Extract Address Book contacts from a BlackBerry IPD backup as vCards",
    long_about = "Extract Address Book contacts from a BlackBerry IPD backup as vCards.\n\nNotes:\n  - `ipd2vcf PATH` is shorthand for `ipd2vcf export PATH`.\n  - Set RUST_LOG (e.g. `RUST_LOG=ipd_format=debug`) for decoder diagnostics on stderr.",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    /// Backup file to export as vCards.
    #[arg(value_name = "PATH")]
    pub(crate) path: Option<String>,

    #[command(subcommand)]
    pub(crate) cmd: Option<Command>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the contacts of one database as vCards (or JSON with `--json`).
    Export {
        /// Backup file path (e.g. `backup.ipd`).
        path: String,
        /// Database to export.
        #[arg(long, default_value = ADDRESS_BOOK)]
        database: String,
    },
    /// Show the container header and per-database record counts.
    Inspect {
        /// Backup file path.
        path: String,
    },
    /// Decode every record and report whether the file is well-formed.
    Validate {
        /// Backup file path.
        path: String,
    },
}
