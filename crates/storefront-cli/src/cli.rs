//! Argument parsing, logging setup and command dispatch for `sectionctl`.

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use storefront_sections::{MoveDirection, SectionKind};
use storefront_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, command_span, init_logging,
};

use crate::commands::edit::handle_edit;
use crate::commands::normalize::handle_normalize;
use crate::commands::rows::handle_rows;
use crate::context::{AppContext, CliResult};

/// Parses CLI arguments, installs logging and executes the requested command.
/// Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let span = command_span(command_label(&cli.command), cli.kind.as_str());
    let _entered = span.enter();

    match dispatch(cli) {
        Ok(()) => 0,
        Err(err) => {
            let message = err.display_message();
            tracing::debug!(exit_code = err.exit_code(), "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::resolve(cli.kind, cli.profile.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Normalize(args) => handle_normalize(&ctx, &args, &mut out),
        Command::Rows(args) => handle_rows(&ctx, &args, &mut out),
        Command::Edit(args) => handle_edit(&ctx, &args, &mut out),
    }
}

#[derive(Parser)]
#[command(
    name = "sectionctl",
    about = "Normalise, inspect and edit storefront section documents"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_SECTION_KIND",
        value_parser = parse_kind,
        default_value = "products-by-category",
        help = "Section editor profile (products-by-category or news-by-category)"
    )]
    kind: SectionKind,
    #[arg(
        long,
        global = true,
        help = "JSON file of profile overrides (defaultLimit, maxLimit, ...)"
    )]
    profile: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document (migrating the legacy shape) and print it sanitized.
    Normalize(NormalizeArgs),
    /// List the rows a document parses to.
    Rows(RowsArgs),
    /// Apply one row command and print or write the resulting document.
    Edit(EditArgs),
}

#[derive(Args)]
pub(crate) struct NormalizeArgs {
    pub(crate) file: PathBuf,
    #[arg(long, help = "List parser fallbacks on stderr")]
    pub(crate) warnings: bool,
}

#[derive(Args)]
pub(crate) struct RowsArgs {
    pub(crate) file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args)]
pub(crate) struct EditArgs {
    pub(crate) file: PathBuf,
    #[arg(long, help = "Write the result back to FILE instead of stdout")]
    pub(crate) in_place: bool,
    #[command(subcommand)]
    pub(crate) action: EditAction,
}

#[derive(Subcommand)]
pub(crate) enum EditAction {
    /// Append a default row.
    Add,
    /// Remove a row; removing the last one leaves a fresh default row.
    Remove {
        #[arg(long)]
        id: String,
    },
    /// Merge a JSON patch (e.g. '{"limit": 6}') into a row.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        patch: String,
    },
    /// Swap a row with its neighbour.
    Move {
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for MoveDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Normalize(_) => "normalize",
        Command::Rows(_) => "rows",
        Command::Edit(_) => "edit",
    }
}

fn parse_kind(value: &str) -> Result<SectionKind, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse().map_err(|err| format!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sectionctl",
            "rows",
            "doc.json",
            "--format",
            "json",
            "--kind",
            "news",
            "--log-format",
            "json",
        ])
        .expect("arguments parse");
        assert_eq!(cli.kind, SectionKind::NewsByCategory);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        match cli.command {
            Command::Rows(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected rows command"),
        }
    }

    #[test]
    fn edit_move_requires_a_direction() {
        assert!(Cli::try_parse_from(["sectionctl", "edit", "doc.json", "move", "--id", "r1"]).is_err());
        let cli = Cli::try_parse_from([
            "sectionctl",
            "edit",
            "doc.json",
            "--in-place",
            "move",
            "--id",
            "r1",
            "--direction",
            "up",
        ])
        .expect("arguments parse");
        match cli.command {
            Command::Edit(args) => {
                assert!(args.in_place);
                assert!(matches!(
                    args.action,
                    EditAction::Move { direction: DirectionArg::Up, .. }
                ));
            }
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["sectionctl", "--kind", "recipes", "rows", "doc.json"]).is_err());
    }
}
