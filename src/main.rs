// Humanize command: one JSON request on stdin, one JSON response on stdout

use anyhow::{bail, Context, Result};
use rephrase_ai_lib::models::HumanizeRequest;
use rephrase_ai_lib::services::humanize::{Humanizer, StdRandom};
use std::io::{self, Read, Write};

fn run(input: &str) -> Result<String> {
    let request: HumanizeRequest =
        serde_json::from_str(input).context("Invalid JSON input")?;
    if request.text.trim().is_empty() {
        bail!("Text is required");
    }

    let response = Humanizer::default().handle(&request, &mut StdRandom::from_entropy())?;
    Ok(serde_json::to_string(&response)?)
}

fn main() {
    rephrase_ai_lib::init_logging();

    let mut input = String::new();
    let result = io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")
        .and_then(|_| run(&input));

    let mut stdout = io::stdout();
    match result {
        Ok(json) => {
            let _ = writeln!(stdout, "{}", json);
        }
        Err(e) => {
            tracing::warn!(error = %e, "humanize.command_failed");
            let body = serde_json::json!({ "error": format!("{:#}", e) });
            let _ = writeln!(stdout, "{}", body);
            std::process::exit(1);
        }
    }
}
