//! Interactive tutoring session.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::router::Router;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
///
/// Each line is routed independently; per-query transcript reset applies,
/// so questions do not carry context into one another.
pub async fn run_chat(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check_api_key() {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut router = Router::from_settings(&settings)?;

    println!("\n{}", style("Laere Tutor").bold().cyan());
    println!(
        "{}\n",
        style("Ask your questions, or 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        let spinner = Output::spinner("Thinking...");
        let answer = router.route(input).await;
        spinner.finish_and_clear();

        println!("\n{} {}\n", style("Tutor:").cyan().bold(), answer);
    }

    Ok(())
}
