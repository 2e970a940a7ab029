//! Idle-gap decisions for the CLI.

use std::io::{BufRead, Write};
use std::time::Duration;

use et_core::{IdleAnswer, IdlePrompt, format_elapsed};

/// Asks on a terminal whether an idle gap counts. Defaults to "no".
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, gap: Duration) -> std::io::Result<bool> {
        writeln!(
            self.output,
            "Time since last change to this document: {}",
            format_elapsed(gap)
        )?;
        write!(
            self.output,
            "Should this time be included in processing time? [y/N] "
        )?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R: BufRead, W: Write> IdlePrompt for TerminalPrompt<R, W> {
    fn include_idle_gap(&mut self, gap: Duration) -> bool {
        self.ask(gap).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "idle prompt failed; excluding gap");
            false
        })
    }
}

/// Idle decision source selected by configuration.
#[derive(Debug)]
pub enum IdleDecider<R, W> {
    Fixed(IdleAnswer),
    Ask(TerminalPrompt<R, W>),
}

impl<R: BufRead, W: Write> IdlePrompt for IdleDecider<R, W> {
    fn include_idle_gap(&mut self, gap: Duration) -> bool {
        match self {
            Self::Fixed(answer) => answer.include_idle_gap(gap),
            Self::Ask(prompt) => prompt.include_idle_gap(gap),
        }
    }
}
