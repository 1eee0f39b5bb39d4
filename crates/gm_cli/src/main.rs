//! Game Master ingestion front end.
//!
//! Ingests a Game Master document and prints the aggregate report.
//!
//! Usage:
//!   gm_ingest GAME_MASTER.json
//!   gm_ingest GAME_MASTER.json --max-rejections 10 --summary
//!   gm_ingest GAME_MASTER.json --config ingest.json --log-format json

mod logging;
mod models;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gamemaster::{IngestConfig, IngestContext, IngestError, Ingested};
use tracing::{error, info};

use logging::LogFormat;
use models::Summary;

#[derive(Parser, Debug)]
#[command(name = "gm_ingest", about = "Ingest a Game Master document")]
struct Cli {
    /// Game Master JSON document
    path: PathBuf,

    /// JSON file with ingestion settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail once more than this many entries are rejected
    #[arg(long)]
    max_rejections: Option<usize>,

    /// Capacity of the deferred family stack (1-255)
    #[arg(long)]
    deferred_capacity: Option<usize>,

    /// Log filter, e.g. `debug` or `gamemaster::deferred=trace`
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Print the report as JSON
    #[arg(long)]
    summary: bool,
}

impl Cli {
    /// Settings from the config file, then overridden by flags.
    fn ingest_config(&self) -> Result<IngestConfig, IngestError> {
        let mut config = match &self.config {
            Some(path) => IngestConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => IngestConfig::default(),
        };
        if let Some(limit) = self.max_rejections {
            config = config.max_rejections(limit);
        }
        if let Some(capacity) = self.deferred_capacity {
            config = config.deferred_capacity(capacity);
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<(IngestContext, Ingested), IngestError> {
    let ctx = IngestContext::new(cli.ingest_config()?)?;
    let out = ctx.ingest_path(&cli.path)?;
    Ok((ctx, out))
}

fn print_text(summary: &Summary) {
    println!("status:            {}", summary.status);
    println!("entries:           {}", summary.entries);
    println!("moves:             {}", summary.moves);
    println!("creatures:         {}", summary.creatures);
    println!("skipped:           {}", summary.skipped);
    println!("deferred:          {}", summary.deferred);
    println!("resolution passes: {}", summary.resolution_passes);
    if !summary.rejections.is_empty() {
        println!("rejected:          {}", summary.rejections.len());
        for r in &summary.rejections {
            println!("  {} ({}): {}", r.name, r.template_id, r.error);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_format);

    let (ctx, out) = match run(&cli) {
        Ok(done) => done,
        Err(err) => {
            error!(%err, "ingestion failed");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let summary = Summary::new(&out.report, ctx.classifier());
    if cli.summary {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_text(&summary);
    }
    info!(path = %cli.path.display(), "done");
    ExitCode::SUCCESS
}
