use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cpescout::catalog::http_client::create_shared_client;
use cpescout::{
    CachedCatalog, Config, DiscoveryEngine, NvdClient, ProgressEvent,
};

#[derive(Parser)]
#[command(name = "cpescout")]
#[command(about = "Discover CPE identifiers for free-text asset names", long_about = None)]
#[command(version)]
struct Cli {
    /// NVD API key (raises the request budget)
    #[arg(long, global = true, env = "NVD_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for CPEs matching an asset name
    Find {
        /// Free-text asset descriptor, e.g. "Apache HTTP Server 2.4.51"
        asset: String,

        /// Number of ranked candidates to return (1-20)
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,

        /// Output format: summary, json, or markdown
        #[arg(short, long, default_value = "summary")]
        output: String,
    },
    /// Validate a CPE 2.3 URI syntactically and against the catalog
    Validate {
        /// The CPE 2.3 URI to check
        cpe: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::default();
    config.nvd.api_key = cli.api_key;

    let client = match create_shared_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let nvd = NvdClient::with_client(client, config.nvd.api_key.clone());
    let catalog = CachedCatalog::new(
        nvd,
        config.nvd.effective_min_interval(),
        config.cache.ttl(),
    );
    let engine = DiscoveryEngine::new(catalog, config);

    match cli.command {
        Commands::Find { asset, top, output } => run_find(&engine, &asset, top, &output).await,
        Commands::Validate { cpe } => run_validate(&engine, &cpe).await,
    }
}

async fn run_find<C: cpescout::CpeCatalog + 'static>(
    engine: &DiscoveryEngine<C>,
    asset: &str,
    top: usize,
    output: &str,
) -> ExitCode {
    let mut rx = match engine.find_cpe(asset, Some(top)) {
        Ok(rx) => rx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut report = None;
    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::Progress { message, .. } => eprintln!("{}", message),
            ProgressEvent::Completed { payload, .. } => report = Some(payload),
            ProgressEvent::Error { phase, message } => {
                eprintln!("Error during {:?}: {}", phase, message);
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(report) = report else {
        eprintln!("Pipeline ended without a result");
        return ExitCode::FAILURE;
    };

    match output {
        "json" => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
        "markdown" => {
            println!("# CPE Candidates\n");
            println!("**Asset**: {}", report.parsed.raw);
            println!("**Date**: {}\n", chrono::Local::now().format("%Y-%m-%d"));
            println!("| # | Score | CPE | Title |");
            println!("|---|-------|-----|-------|");
            for (i, candidate) in report.candidates.iter().enumerate() {
                println!(
                    "| {} | {:.2} | `{}` | {} |",
                    i + 1,
                    candidate.score,
                    candidate.cpe_name,
                    candidate.title
                );
            }
            println!(
                "\n{} of {} catalog matches shown",
                report.count, report.total_found
            );
        }
        _ => {
            // Summary format
            println!("Results for \"{}\"\n", report.parsed.raw);
            if report.candidates.is_empty() {
                println!("  No matching CPEs found ({} catalog matches)", report.total_found);
            }
            for (i, candidate) in report.candidates.iter().enumerate() {
                let flag = if candidate.deprecated { " [deprecated]" } else { "" };
                println!("  {}. {:6.2}  {}{}", i + 1, candidate.score, candidate.cpe_name, flag);
                println!(
                    "             vendor {:.2} | product {:.2} | version {:.2} | tokens {:.2}",
                    candidate.breakdown.vendor,
                    candidate.breakdown.product,
                    candidate.breakdown.version,
                    candidate.breakdown.token_overlap
                );
            }
            println!("\n{} of {} catalog matches shown", report.count, report.total_found);
        }
    }

    ExitCode::SUCCESS
}

async fn run_validate<C: cpescout::CpeCatalog + 'static>(
    engine: &DiscoveryEngine<C>,
    cpe: &str,
) -> ExitCode {
    let validation = engine.validate_cpe(cpe).await;

    println!("{}", validation.message);
    if let Some(parsed) = &validation.parsed {
        println!(
            "  part: {} | vendor: {} | product: {} | version: {}",
            parsed.part, parsed.vendor, parsed.product, parsed.version
        );
    }
    if let Some(deprecated) = validation.deprecated {
        println!("  deprecated: {}", deprecated);
    }

    if validation.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
