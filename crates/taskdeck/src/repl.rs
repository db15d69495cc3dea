//! Interactive session over one long-lived engine.
//!
//! A one-shot process throws its undo buffers away on exit, so `undo` is
//! only ever useful here, where the engine outlives individual commands.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use taskdeck_app::service::TaskListService;
use taskdeck_app::store::TaskStore;

use crate::{Command, commands};

/// One line of the interactive session, parsed with the same grammar as the
/// one-shot CLI.
#[derive(Parser, Debug)]
#[command(name = "taskdeck", no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    cmd: Command,
}

/// Read commands from stdin until EOF or `exit`/`quit`.
pub fn run<S: TaskStore>(service: &mut TaskListService<S>) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("taskdeck> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed, "exit" | "quit") {
            break;
        }

        let words = match shell_words::split(trimmed) {
            Ok(words) => words,
            Err(err) => {
                println!("could not parse line: {err}");
                continue;
            }
        };

        match ReplLine::try_parse_from(words) {
            Ok(ReplLine { cmd: Command::Repl }) => {
                println!("already in an interactive session");
            }
            Ok(ReplLine { cmd }) => {
                if let Err(err) = commands::run(cmd, service) {
                    println!("error: {err:#}");
                }
            }
            Err(err) => {
                let _ = err.print();
            }
        }
    }

    println!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::Priority;

    #[test]
    fn repl_line_parses_quoted_arguments() {
        let words = shell_words::split("add --title \"Buy milk\" --due 2024-07-01")
            .expect("must split line");
        let line = ReplLine::try_parse_from(words).expect("must parse line");

        match line.cmd {
            Command::Add {
                title, priority, ..
            } => {
                assert_eq!(title, "Buy milk");
                assert_eq!(priority, Priority::Medium);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn repl_line_rejects_unknown_commands() {
        let words = vec!["destroy".to_owned()];
        assert!(ReplLine::try_parse_from(words).is_err());
    }

    #[test]
    fn repl_line_parses_undo_with_kind() {
        let words = shell_words::split("undo toggle").expect("must split line");
        let line = ReplLine::try_parse_from(words).expect("must parse line");
        match line.cmd {
            Command::Undo { kind } => assert!(kind.is_some()),
            _ => panic!("expected undo command"),
        }
    }
}
