//! Command-line interface.

pub mod commands;

use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Namespace;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dayflags", version, about = "Holiday and workday flag store")]
pub struct Cli {
    /// Database path (overrides config and DAYFLAGS_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file path (default: <data dir>/dayflags.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            db: self.db.clone(),
            config: self.config.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the store file and tables if absent
    Init,
    /// Insert a flag; a date already present is left untouched
    Add(AddArgs),
    /// Query a namespace
    List(ListArgs),
    /// Look up one date
    Get(GetArgs),
    /// Print the type string for an address
    Type(TypeArgs),
    /// Accepted for compatibility; never changes anything
    Update(UpdateArgs),
    /// Accepted for compatibility; never removes anything
    Delete(DeleteArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamespaceArg {
    Holiday,
    Workday,
}

impl From<NamespaceArg> for Namespace {
    fn from(value: NamespaceArg) -> Self {
        match value {
            NamespaceArg::Holiday => Self::Holiday,
            NamespaceArg::Workday => Self::Workday,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub namespace: NamespaceArg,
    /// Day in YYYY-MM-DD form
    pub date: String,
    #[arg(long, default_value_t = 1)]
    pub state: i64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub namespace: NamespaceArg,
    /// Filter expression with `?` placeholders
    #[arg(long = "where")]
    pub selection: Option<String>,
    /// Placeholder value (repeatable, bound in order)
    #[arg(long = "arg")]
    pub args: Vec<String>,
    /// ORDER BY clause
    #[arg(long)]
    pub order: Option<String>,
    /// Comma-separated columns to return
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub namespace: NamespaceArg,
    pub date: String,
}

#[derive(Args, Debug)]
pub struct TypeArgs {
    /// Address such as content://dayflags/holiday or content://dayflags/workday/3
    pub uri: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub namespace: NamespaceArg,
    pub date: String,
    #[arg(long, default_value_t = 0)]
    pub state: i64,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub namespace: NamespaceArg,
    #[arg(long = "where")]
    pub selection: Option<String>,
    #[arg(long = "arg")]
    pub args: Vec<String>,
}

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the command fails.
pub fn run(cli: &Cli) -> Result<()> {
    let overrides = cli.overrides();
    match &cli.command {
        Commands::Init => commands::init::execute(cli.json, &overrides),
        Commands::Add(args) => commands::add::execute(args, cli.json, &overrides),
        Commands::List(args) => commands::list::execute(args, cli.json, &overrides),
        Commands::Get(args) => commands::get::execute(args, cli.json, &overrides),
        Commands::Type(args) => commands::type_::execute(args, cli.json, &overrides),
        Commands::Update(args) => commands::noop::execute_update(args, cli.json, &overrides),
        Commands::Delete(args) => commands::noop::execute_delete(args, cli.json, &overrides),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_with_columns() {
        let cli = Cli::try_parse_from([
            "dayflags", "list", "holiday", "--where", "state = ?", "--arg", "1", "--columns",
            "date,state",
        ])
        .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(Namespace::from(args.namespace), Namespace::Holiday);
        assert_eq!(args.columns, vec!["date", "state"]);
        assert_eq!(args.args, vec!["1"]);
    }

    #[test]
    fn rejects_unknown_namespace() {
        assert!(Cli::try_parse_from(["dayflags", "add", "vacation", "2024-01-01"]).is_err());
    }
}
