// SPDX-License-Identifier: AGPL-3.0-or-later
//! Interactive operation picker

use std::io::{BufRead, Write};

use tracing::{error, info};

use crate::colors;
use crate::config::Config;
use crate::error::{Result, SetupError};
use crate::operations::Operation;
use crate::shell::{self, CommandRunner};

/// What the operator picked at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Quit,
    Run(Operation),
}

/// Interpret a token typed at the `selection` prompt (1-based, `q` quits)
pub fn parse_selection(token: &str) -> Result<Selection> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("q") {
        return Ok(Selection::Quit);
    }

    let index: usize = token
        .parse()
        .map_err(|_| SetupError::InvalidSelection(token.to_string()))?;

    match index.checked_sub(1).and_then(|i| Operation::ALL.get(i)) {
        Some(op) => Ok(Selection::Run(*op)),
        None => Err(SetupError::InvalidSelection(token.to_string())),
    }
}

fn print_options<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "\n{}Please select an option (q to exit):{}",
        colors::YELLOW,
        colors::RESET
    )?;
    for (i, op) in Operation::ALL.iter().enumerate() {
        writeln!(writer, "{}. {}", i + 1, op.title())?;
    }
    Ok(())
}

/// Prompt until the operator enters a valid selection
fn read_selection<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<Selection> {
    loop {
        let token = match shell::prompt(reader, writer, "selection") {
            Ok(token) => token,
            Err(SetupError::EmptyInput) => continue,
            Err(e) => return Err(e),
        };

        match parse_selection(&token) {
            Ok(selection) => return Ok(selection),
            Err(e) => writeln!(writer, "{}error: {}{}", colors::RED, e, colors::RESET)?,
        }
    }
}

/// Menu loop: list operations, run the chosen one, repeat until `q` or end of input.
///
/// A failing operation is reported and the menu is shown again.
pub async fn run_menu<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    cfg: &Config,
    runner: &dyn CommandRunner,
) -> Result<()> {
    loop {
        print_options(writer)?;

        let selection = match read_selection(reader, writer) {
            Ok(selection) => selection,
            Err(SetupError::ReadFailed(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Selection::Quit
            }
            Err(e) => return Err(e),
        };

        let operation = match selection {
            Selection::Quit => {
                writeln!(writer, "{}exiting...{}", colors::BLUE, colors::RESET)?;
                return Ok(());
            }
            Selection::Run(op) => op,
        };

        info!(operation = %operation, "Selected from menu");
        writer.flush()?;
        if let Err(e) = operation.run(cfg, runner).await {
            error!(operation = %operation, error = %e, "Operation failed");
            writeln!(writer, "{}error: {}.{}", colors::RED, e, colors::RESET)?;
        }
    }
}
