//! `perfects show`: inspect a checkpoint without searching

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::checkpoints::{Checkpoint, CheckpointStore, Progress};
use crate::search::SearchPosition;
use crate::utils::format_elapsed;

/// One-line description of where a checkpointed search stands.
pub fn describe_progress(progress: Progress) -> String {
    match progress {
        Progress::Legacy => "no position stored (search restarts from the beginning)".to_string(),
        Progress::At(position) => {
            let total = SearchPosition::FIRST.remaining();
            let done = total.saturating_sub(position.remaining());
            format!("next candidate {position}, {done} of {total} candidates tested")
        }
        Progress::Complete => "complete".to_string(),
    }
}

/// Render a checkpoint as the lines `show` prints.
pub fn render(checkpoint: &Checkpoint) -> Vec<String> {
    let mut lines = vec![
        format!("Elapsed time: {}", format_elapsed(checkpoint.elapsed_secs)),
        format!("Progress:     {}", describe_progress(checkpoint.progress)),
        format!("Perfect numbers found: {}", checkpoint.records.len()),
    ];
    for (index, value) in checkpoint.records.iter().enumerate() {
        lines.push(format!("  #{} = {}", index + 1, value));
    }
    lines
}

/// Entry point for `perfects show`.
pub fn execute(path: &Path) -> Result<()> {
    let store = CheckpointStore::new(path);
    let checkpoint = store
        .load()
        .with_context(|| format!("Failed to inspect {}", path.display()))?;

    let Some(checkpoint) = checkpoint else {
        println!("{}", format!("No context file at '{}'.", path.display()).yellow());
        return Ok(());
    };

    println!("{}", format!("Context file '{}'", path.display()).bold());
    for line in render(&checkpoint) {
        println!("{line}");
    }
    Ok(())
}
