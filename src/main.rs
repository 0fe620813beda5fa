use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use brand_signal::{analyze_batch, Batch, RecommendationPolicy};

#[derive(Parser)]
#[command(
    name = "brand-signal",
    about = "Extract brand-visibility signals from LLM answers and discussion threads",
    version
)]
struct Cli {
    /// Batch JSON files to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Minimum occurrences for a word to count as a keyword
    #[arg(long, env = "BRAND_SIGNAL_MIN_FREQUENCY")]
    min_frequency: Option<usize>,

    /// What counts as the target being recommended
    #[arg(long, value_enum, env = "BRAND_SIGNAL_POLICY")]
    policy: Option<RecommendationPolicy>,

    /// Print only the summary, without per-document detail
    #[arg(long)]
    summary_only: bool,
}

impl Cli {
    fn apply_overrides(&self, batch: &mut Batch) {
        if let Some(n) = self.min_frequency {
            batch.options.min_keyword_frequency = n;
        }
        if let Some(policy) = self.policy {
            batch.options.recommendation_policy = policy;
        }
    }

    fn run(&self, label: &str, input: &str) -> Result<()> {
        let mut batch =
            Batch::from_json(input).with_context(|| format!("Invalid batch in {label}"))?;
        self.apply_overrides(&mut batch);
        debug!("Batch options - {:?}", batch.options);

        let report = analyze_batch(&batch);
        let json = if self.summary_only {
            serde_json::to_string_pretty(&report.summary)?
        } else {
            serde_json::to_string_pretty(&report)?
        };
        println!("{json}");
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        cli.run("stdin", &input)?;
    } else {
        for path in &cli.files {
            let input =
                std::fs::read_to_string(path).with_context(|| format!("Error reading {path}"))?;
            cli.run(path, &input)?;
        }
    }
    Ok(())
}
