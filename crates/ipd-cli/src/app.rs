use crate::cli::{Cli, Command};
use ipd_format::ADDRESS_BOOK;
use tracing_subscriber::EnvFilter;

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    match (cli.cmd, cli.path) {
        (Some(_), Some(path)) => {
            anyhow::bail!("unexpected PATH {path:?} before a subcommand")
        }
        (None, Some(path)) => crate::commands::export::cmd_export(&path, ADDRESS_BOOK, cli.json),
        (None, None) => anyhow::bail!("missing backup PATH (see --help)"),
        (Some(Command::Export { path, database }), None) => {
            crate::commands::export::cmd_export(&path, &database, cli.json)
        }
        (Some(Command::Inspect { path }), None) => {
            crate::commands::inspect::cmd_inspect(&path, cli.json)
        }
        (Some(Command::Validate { path }), None) => {
            crate::commands::validate::cmd_validate(&path, cli.json)
        }
    }
}

/// Logs go to stderr so stdout carries only vCard or JSON output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
