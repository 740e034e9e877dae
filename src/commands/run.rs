//! `perfects run`: the interactive search session

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use crate::checkpoints::{Checkpoint, CheckpointStore, Progress, StoreLock};
use crate::config::{Config, Overrides};
use crate::control::{
    Action, Autosave, Command, ControlSource, KeyboardControl, SignalControl, MENU,
};
use crate::error::CheckpointError;
use crate::search::{Discovery, Flow, Operator, Outcome, Search};
use crate::utils::{format_elapsed, ring_bell, with_cooked_terminal};

/// Options for a search session.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub overrides: Overrides,
    /// Ignore any existing checkpoint.
    pub fresh: bool,
}

/// Operator shell: carries out command actions and reports discoveries.
pub struct Shell {
    store: CheckpointStore,
    bell: bool,
}

impl Shell {
    pub fn new(store: CheckpointStore, bell: bool) -> Self {
        Self { store, bell }
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Save the search's current state. Failures are reported, never fatal.
    pub fn save(&mut self, search: &Search) -> bool {
        match self.store.save(&search.checkpoint()) {
            Ok(()) => {
                println!(
                    "Context saved to '{}'.",
                    self.store.path().display().to_string().cyan()
                );
                true
            }
            Err(err) => {
                println!("{}", format!("ERROR: {err}").red().bold());
                println!(
                    "{}",
                    "Data will be lost if the search stops before a successful save.".yellow()
                );
                false
            }
        }
    }

    fn report_elapsed(&self, search: &Search) {
        println!("Elapsed time: {}.", format_elapsed(search.elapsed_secs()));
    }

    fn report_status(&self, search: &Search) {
        match search.position() {
            Some(position) => println!(
                "Currently at {}, working on perfect #{}.",
                position.value(),
                search.next_ordinal()
            ),
            None => println!("Search complete."),
        }
        self.report_elapsed(search);
    }

    fn list_records(&self, search: &Search) {
        println!();
        for (index, value) in search.records().iter().enumerate() {
            println!("#{} = {}", index + 1, value.to_string().green());
        }
        println!();
    }

    fn dispatch(&mut self, command: Command, search: &Search) -> Flow {
        let mut checkpoint_saved = false;
        for action in command.actions() {
            match *action {
                Action::ReportElapsed => self.report_elapsed(search),
                Action::ReportStatus => self.report_status(search),
                Action::ListRecords => self.list_records(search),
                Action::ShowMenu => println!("\n{MENU}"),
                Action::SaveCheckpoint => {
                    self.report_elapsed(search);
                    checkpoint_saved = self.save(search);
                }
                Action::Terminate { saved: true } if !checkpoint_saved => {
                    println!(
                        "{}",
                        "Still searching: the checkpoint was not saved. Press Q to quit without saving."
                            .yellow()
                    );
                    return Flow::Continue;
                }
                Action::Terminate { saved: true } => return Flow::Stop(Outcome::Suspended),
                Action::Terminate { saved: false } => return Flow::Stop(Outcome::Cancelled),
            }
        }
        Flow::Continue
    }
}

impl Operator for Shell {
    fn on_command(&mut self, command: Command, search: &Search) -> Flow {
        with_cooked_terminal(|| self.dispatch(command, search))
    }

    fn on_discovery(&mut self, discovery: &Discovery, search: &Search) {
        with_cooked_terminal(|| {
            println!(
                "{} #{} is {}. Elapsed time: {}.",
                "Perfect number".bold(),
                discovery.ordinal,
                discovery.value.to_string().green().bold(),
                format_elapsed(search.elapsed_secs())
            );
            if self.bell {
                ring_bell();
            }
        });
    }
}

/// Drive `search` to an outcome and perform the end-of-session bookkeeping.
pub fn run_search(
    search: &mut Search,
    control: &mut dyn ControlSource,
    shell: &mut Shell,
) -> Result<Outcome> {
    let outcome = match search.run(control, &mut *shell) {
        Ok(outcome) => outcome,
        Err(err) => {
            // Keep whatever was found before failing.
            with_cooked_terminal(|| shell.save(search));
            return Err(err).context("Search stopped");
        }
    };

    with_cooked_terminal(|| match outcome {
        Outcome::Exhausted => {
            shell.report_elapsed(search);
            println!("{}", "Done.".green().bold());
            shell.save(search);
        }
        Outcome::Suspended => println!("Search suspended. Run again to resume."),
        Outcome::Cancelled => println!("{}", "Cancelled.".yellow()),
    });
    info!(?outcome, records = search.records().len(), "search session ended");
    Ok(outcome)
}

/// Restore prior progress, treating an unreadable file as a fresh start.
pub fn restore(store: &CheckpointStore, fresh: bool) -> Result<Search> {
    if fresh {
        println!("Ignoring any existing context file; starting from scratch...");
        return Ok(Search::new());
    }

    let checkpoint: Option<Checkpoint> = match store.load() {
        Ok(checkpoint) => checkpoint,
        Err(err @ CheckpointError::Unavailable { .. }) => {
            warn!(error = %err, "starting without checkpoint");
            println!("{}", format!("Cannot open context file: {err}").yellow());
            None
        }
        Err(err) => {
            return Err(err).context("Refusing to continue from a damaged context file")
        }
    };

    let Some(checkpoint) = checkpoint else {
        println!(
            "No context file '{}'. Starting from scratch...",
            store.path().display()
        );
        return Ok(Search::new());
    };

    if checkpoint.progress == Progress::Legacy {
        println!(
            "{}",
            "Context file has no search position; rescanning from the start. \
             Known perfect numbers will not be reported again."
                .yellow()
        );
    }
    Ok(Search::restore(&checkpoint))
}

/// Take the checkpoint lock. Only another running search is fatal: when the
/// lock file itself cannot be created the search runs unlocked and any save
/// failure is reported when it happens.
pub fn acquire_lock(store: &CheckpointStore) -> Result<Option<StoreLock>> {
    match store.lock() {
        Ok(lock) => Ok(Some(lock)),
        Err(err @ CheckpointError::Locked { .. }) => Err(err.into()),
        Err(err) => {
            warn!(error = %err, "running without checkpoint lock");
            println!(
                "{}",
                format!("Cannot lock context file, continuing without a lock: {err}").yellow()
            );
            Ok(None)
        }
    }
}

fn control_source(config: &Config) -> Result<Box<dyn ControlSource>> {
    let base: Box<dyn ControlSource> = if std::io::stdin().is_terminal() {
        println!(
            "{}",
            "Press T, S, C, X or Q at any time; any other key shows the menu.".dimmed()
        );
        Box::new(KeyboardControl::enable().context("Failed to enable raw terminal mode")?)
    } else {
        Box::new(SignalControl::install().context("Failed to set signal handler")?)
    };

    let source: Box<dyn ControlSource> = match config.autosave_interval() {
        Some(interval) => Box::new(Autosave::new(base, interval)),
        None => base,
    };
    Ok(source)
}

/// Entry point for `perfects run`.
pub fn execute(options: RunOptions) -> Result<Outcome> {
    let config = Config::load(options.config.as_deref())?.apply(&options.overrides)?;

    println!(
        "{} -- perfect number generator, v{}",
        "PerfectNumbers".bold().blue(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{}\n",
        format!("Started {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
    );

    let store = CheckpointStore::new(&config.checkpoint);
    let _lock = acquire_lock(&store)?;
    let mut search = restore(&store, options.fresh)?;
    let mut shell = Shell::new(store, config.bell);

    if search.is_exhausted() {
        println!("{}", "Search already complete.".green());
        shell.list_records(&search);
        shell.report_elapsed(&search);
        return Ok(Outcome::Exhausted);
    }

    shell.report_status(&search);

    let mut control = control_source(&config)?;
    run_search(&mut search, &mut control, &mut shell)
}
