//! Ask command implementation.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::router::Router;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check_api_key() {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut router = Router::from_settings(&settings)?;

    let spinner = Output::spinner("Thinking...");
    let answer = router.route(question).await;
    spinner.finish_and_clear();

    println!("\n{}\n", answer);

    Ok(())
}
