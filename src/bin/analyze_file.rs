use anyhow::{anyhow, Context, Result};
use rephrase_ai_lib::api::analyze_text;
use rephrase_ai_lib::services::config_store::{AppConfig, ConfigStore};
use std::path::PathBuf;

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn load_config(config_dir: Option<String>) -> Result<AppConfig> {
    let dir = match config_dir {
        Some(d) => Some(PathBuf::from(d)),
        None => ConfigStore::default_config_dir(),
    };
    let config = match dir {
        Some(d) => ConfigStore::new(d).load().map_err(|e| anyhow!(e))?,
        None => AppConfig::default(),
    };
    Ok(config.with_env_overrides())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  analyze_file <path.txt> [--config <dir>] [--out <json_path>]\n\nNotes:\n  - Service URLs come from config.json, overridable via DETECTION_API_URL / PLAGIARISM_API_URL.\n  - An unreachable service is logged and left out of the report."
        );
        return Ok(());
    }

    rephrase_ai_lib::init_logging();

    let path = args[1].clone();
    let config = load_config(parse_arg_value(&args, "--config"))?;
    let out_path = parse_arg_value(&args, "--out");

    let text = std::fs::read_to_string(&path).with_context(|| format!("read file failed: {}", path))?;

    println!("File: {}", path);
    println!("Text: {} chars ({} bytes)", text.chars().count(), text.len());
    println!("Detection: {}", config.detection_api_url);
    println!("Plagiarism: {}", config.plagiarism_api_url);

    let report = analyze_text(&config, &text).await;

    println!();
    println!("Request: {}", report.request_id);
    println!("AI content: {}%", report.ai_content_percentage);
    println!("Plagiarism: {}%", report.plagiarism_percentage);
    println!("Original: {}%", report.original_percentage);
    println!("Summary: {}", report.summary);
    println!();

    for h in &report.highlights {
        let sources = if h.kind.flags_plagiarism() {
            format!(" sources={}", h.sources.len())
        } else {
            String::new()
        };
        println!(
            "[{:>10}] {:>6}..{:<6} conf={:.2}{} {}",
            h.kind.as_str(),
            h.start,
            h.end,
            h.confidence,
            sources,
            preview(&h.text, 60)
        );
    }

    if let Some(out) = out_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&out, json).with_context(|| format!("write output failed: {}", out))?;
        println!("\nReport written to {}", out);
    }

    Ok(())
}
