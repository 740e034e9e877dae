use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use perfect_numbers::checkpoints::DEFAULT_CHECKPOINT;
use perfect_numbers::commands::{check, run, show};
use perfect_numbers::config::Overrides;
use perfect_numbers::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perfects")]
#[command(about = "Find every perfect number that fits in 32 bits", long_about = None)]
#[command(version)]
struct Cli {
    /// Log diagnostics at debug level to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run (or resume) the search; this is the default
    Run(RunArgs),

    /// Print the contents of a checkpoint file
    Show {
        /// Checkpoint file to inspect
        #[arg(short, long, default_value = DEFAULT_CHECKPOINT)]
        checkpoint: PathBuf,
    },

    /// Test one value for perfection
    Check {
        /// Value to test
        value: u32,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Checkpoint file (default: PerfectNumbers.dat)
    #[arg(short, long)]
    checkpoint: Option<PathBuf>,

    /// Config file (default: ./perfects.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore an existing checkpoint and start from the first candidate
    #[arg(long)]
    fresh: bool,

    /// Do not ring the bell when a perfect number is found
    #[arg(long)]
    no_bell: bool,

    /// Save a checkpoint every N seconds
    #[arg(long, value_name = "SECS")]
    autosave: Option<u64>,
}

impl From<RunArgs> for run::RunOptions {
    fn from(args: RunArgs) -> Self {
        run::RunOptions {
            config: args.config,
            overrides: Overrides {
                checkpoint: args.checkpoint,
                no_bell: args.no_bell,
                autosave_secs: args.autosave,
            },
            fresh: args.fresh,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            run::execute(args.into())?;
        }
        Commands::Show { checkpoint } => show::execute(&checkpoint)?,
        Commands::Check { value } => check::execute(value)?,
    }

    Ok(())
}
