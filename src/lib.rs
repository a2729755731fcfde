pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod extractor;
pub mod http_client;
pub mod models;
pub mod prober;
pub mod reporter;
pub mod server;
pub mod transport;

use analyzer::{Analyzer, AnalyzerSettings};
use anyhow::Result;
use cli::{Cli, Command};
use colored::*;
use config::Config;
use reporter::Reporter;
use std::time::Duration;

pub async fn run(args: Cli) -> Result<()> {
    let args = match Config::load(&args)? {
        Some(config) => config.merge_with_cli(&args),
        None => args,
    };

    if args.timeout == 0 {
        anyhow::bail!("Timeout must be at least one second");
    }

    let settings = AnalyzerSettings {
        timeout: Duration::from_secs(args.timeout),
        max_concurrency: args.concurrency,
    };

    match args.command {
        Command::Analyze { url, output, save } => {
            let analyzer = Analyzer::new(&settings)?;

            if args.verbose {
                eprintln!("{} {}", "Analyzing:".bright_yellow(), url);
            }

            let report = analyzer.analyze(&url).await?;

            match output.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&report)?;
                    println!("{}", json);
                }
                _ => {
                    Reporter::print_text_report(&url, &report);
                }
            }

            if let Some(filename) = save {
                Reporter::save_json_report(&report, &filename)?;
            }
        }
        Command::Serve { bind } => {
            println!(
                "{} http://{}/fetch?url=<page>",
                "Serving on".bright_cyan().bold(),
                bind
            );
            server::serve(&bind, &settings).await?;
        }
    }

    Ok(())
}
