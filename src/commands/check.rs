//! `perfects check`: test a single value

use anyhow::Result;
use colored::Colorize;

use crate::search::{divisor_sum, is_perfect, max_divisor};

/// Verdict line for `value`.
pub fn verdict(value: u32) -> String {
    let sum = divisor_sum(value);
    if is_perfect(value, max_divisor(value)) {
        format!("{value} is perfect: its proper divisors sum to {sum}")
    } else {
        format!("{value} is not perfect: its proper divisors sum to {sum}")
    }
}

/// Entry point for `perfects check`.
pub fn execute(value: u32) -> Result<()> {
    let line = verdict(value);
    if is_perfect(value, max_divisor(value)) {
        println!("{}", line.green().bold());
    } else {
        println!("{line}");
    }
    Ok(())
}
