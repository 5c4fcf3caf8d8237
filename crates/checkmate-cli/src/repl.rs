//! Interactive menu mode.

use crate::app::App;
use crate::commands;
use crate::error::Result;
use crate::input::{is_exit, LineSource};
use crate::output::Formatter;

/// A parsed menu selection.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// Free-form chat with the model
    Chat,
    /// Fact-check one claim
    FactCheck,
    /// Leave the program
    Exit,
    /// Blank line
    Empty,
    /// Anything else
    Invalid(String),
}

/// Parse one line of menu input.
pub fn parse_choice(line: &str) -> MenuChoice {
    let line = line.trim();
    if line.is_empty() {
        return MenuChoice::Empty;
    }
    if is_exit(line) {
        return MenuChoice::Exit;
    }
    match line {
        "1" => MenuChoice::Chat,
        "2" => MenuChoice::FactCheck,
        other => MenuChoice::Invalid(other.to_string()),
    }
}

/// Run the menu until the user exits or input ends.
pub async fn run_menu(app: &App, input: &mut dyn LineSource, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("Checkmate - verify claims with live search results"));

    loop {
        print_menu();

        let Some(line) = input.read_line("checkmate> ")? else {
            break;
        };

        match parse_choice(&line) {
            MenuChoice::Chat => {
                commands::run_chat(app.model(), input, formatter).await?;
            }
            MenuChoice::FactCheck => {
                let Some(claim) = input.read_line("claim> ")? else {
                    break;
                };
                if let Err(e) = commands::execute_check(&claim, app.checker(), formatter).await {
                    eprintln!("{}", formatter.error(&e.to_string()));
                }
            }
            MenuChoice::Exit => {
                println!("{}", formatter.info("Goodbye!"));
                break;
            }
            MenuChoice::Empty => {}
            MenuChoice::Invalid(choice) => {
                eprintln!(
                    "{}",
                    formatter.error(&format!("Invalid choice '{}'. Enter 1, 2 or exit.", choice))
                );
            }
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("  1) Chat with the model");
    println!("  2) Fact-check a claim");
    println!("  exit) Quit");
    println!();
}
