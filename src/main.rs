mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use mindmap::{logging, paths};

#[derive(Parser)]
#[command(
    name = "mindmap",
    about = "Markdown outlines as mind maps: parse, lay out, edit and write back"
)]
struct Cli {
    /// Increase log output (-v info, -vv debug). MINDMAP_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of the nearest .mindmap.conf
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new outline with the default structure
    Init { file: PathBuf },
    /// Print the outline as a tree
    Show { file: PathBuf },
    /// Print computed canvas positions
    Layout { file: PathBuf },
    /// Rewrite the outline in canonical form
    Fmt {
        file: PathBuf,
        /// Only report whether the file would change
        #[arg(long)]
        check: bool,
    },
    /// List wikilink targets
    Links { file: PathBuf },
    /// Apply an edit script (read from stdin without --script)
    Edit {
        file: PathBuf,
        #[arg(long, value_name = "PATH")]
        script: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let explicit = cli.config.as_deref();

    match cli.command {
        Command::Init { file } => commands::init::run(&file),
        Command::Show { file } => commands::show::run(&file),
        Command::Layout { file } => {
            let cfg = paths::load_config(explicit, &file)?;
            commands::layout::run(&file, &cfg.layout_params())
        }
        Command::Fmt { file, check } => commands::fmt::run(&file, check),
        Command::Links { file } => commands::links::run(&file),
        Command::Edit { file, script } => {
            let cfg = paths::load_config(explicit, &file)?;
            commands::edit::run(&file, script.as_deref(), &cfg)
        }
    }
}
