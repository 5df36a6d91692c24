use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use api::domain::envelope::ApiResponse;
use api::domain::history::{HistoryFilter, OperationRecord};
use api::domain::metrics::MetricsSnapshot;
use api::domain::operation::{FactorialRequest, FibonacciRequest, Operation, PowerRequest};
use api::utilities::auth::{FileTokenStore, NoToken, StaticToken, TokenProvider};
use api::utilities::export::{export_history, ExportOutcome, DEFAULT_EXPORT_FILE};
use api::{ApiConfig, MathApi};
use clap::{Parser, Subcommand};

/// Dashboard client for the remote arithmetic service
#[derive(Parser)]
#[command(name = "mathdash", version, about)]
struct Cli {
    /// Override the API base URL (default: MATHDASH_API_BASE_URL or localhost)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token; falls back to the persisted token file
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Raise a base to an exponent
    Power {
        base: f64,
        exponent: f64,
        /// Print the raw response envelope as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the n-th Fibonacci number
    Fibonacci {
        n: u32,
        #[arg(long)]
        json: bool,
    },
    /// Compute n factorial
    Factorial {
        n: u32,
        #[arg(long)]
        json: bool,
    },
    /// List past operations
    History {
        /// Substring match on operation name or result
        #[arg(long)]
        search: Option<String>,
        /// Restrict to one operation (power, fibonacci, factorial)
        #[arg(long)]
        operation: Option<Operation>,
        /// Export the full history to a CSV file instead of listing it
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show usage metrics
    Metrics {
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
        /// Refresh interval in seconds
        #[arg(long, default_value_t = 30)]
        interval: u64,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // One transient notice; resubmission is up to the user.
        eprintln!("request failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.base_url {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(),
    };
    let api = MathApi::new(config, token_provider(cli.token))?;

    match cli.command {
        Command::Power {
            base,
            exponent,
            json,
        } => {
            let request = validate_power(base, exponent)?;
            let envelope = api.calculate_power(&request).await?;
            print_envelope(&format!("{}^{}", base, exponent), &envelope, json)
        }
        Command::Fibonacci { n, json } => {
            let request = validate_fibonacci(n)?;
            let envelope = api.calculate_fibonacci(&request).await?;
            print_envelope(&format!("F({})", n), &envelope, json)
        }
        Command::Factorial { n, json } => {
            let request = validate_factorial(n)?;
            let envelope = api.calculate_factorial(&request).await?;
            print_envelope(&format!("{}!", n), &envelope, json)
        }
        Command::History {
            search,
            operation,
            export,
            json,
        } => {
            let history = api.get_history().await?;
            if let Some(path) = export {
                return match export_history(&history, &path)? {
                    ExportOutcome::Skipped => {
                        println!("No operations available to export.");
                        Ok(())
                    }
                    ExportOutcome::Written { path, rows } => {
                        println!("Exported {} operations to {}", rows, path.display());
                        Ok(())
                    }
                };
            }
            let filter = HistoryFilter { search, operation };
            print_history(&history, &filter, json)
        }
        Command::Metrics {
            watch,
            interval,
            json,
        } => {
            if !watch {
                let metrics = api.get_metrics().await?;
                return print_metrics(&metrics, json);
            }
            watch_metrics(&api, interval, json).await
        }
    }
}

/// Token resolution order: explicit flag, then MATHDASH_AUTH_TOKEN_FILE, then
/// the conventional token file. All of it is best-effort.
fn token_provider(flag: Option<String>) -> Arc<dyn TokenProvider> {
    if let Some(token) = flag {
        return Arc::new(StaticToken(token));
    }
    if let Ok(path) = std::env::var("MATHDASH_AUTH_TOKEN_FILE") {
        log::debug!("reading auth token from {}", path);
        return Arc::new(FileTokenStore::new(PathBuf::from(path)));
    }
    match FileTokenStore::default_path() {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(NoToken),
    }
}

// Range checks belong to the form layer; the api crate sends inputs verbatim.
fn validate_power(base: f64, exponent: f64) -> anyhow::Result<PowerRequest> {
    if !(-1_000_000.0..=1_000_000.0).contains(&base) {
        bail!("base must be between -1000000 and 1000000");
    }
    if !(-1000.0..=1000.0).contains(&exponent) {
        bail!("exponent must be between -1000 and 1000");
    }
    Ok(PowerRequest { base, exponent })
}

fn validate_fibonacci(n: u32) -> anyhow::Result<FibonacciRequest> {
    if n > 1000 {
        bail!("n must be between 0 and 1000");
    }
    Ok(FibonacciRequest { n })
}

fn validate_factorial(n: u32) -> anyhow::Result<FactorialRequest> {
    if n > 100 {
        bail!("n must be between 0 and 100");
    }
    Ok(FactorialRequest { n })
}

fn print_envelope(label: &str, envelope: &ApiResponse<f64>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(envelope)?);
        return Ok(());
    }
    println!("{} = {}", label, envelope.data);
    println!(
        "status: {}  took: {}ms  at: {}",
        envelope.status,
        envelope.execution_time,
        envelope.timestamp.to_rfc3339()
    );
    Ok(())
}

fn print_history(
    history: &[OperationRecord],
    filter: &HistoryFilter,
    json: bool,
) -> anyhow::Result<()> {
    let filtered = filter.apply(history);
    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }
    if filtered.is_empty() {
        println!("No operations found");
        return Ok(());
    }
    for record in &filtered {
        println!(
            "#{:<5} {:<10} {:<16} = {:<12} {}ms  {}  {}",
            record.id,
            record.operation,
            record.format_inputs(),
            record.result,
            record.execution_time,
            record.status,
            record.timestamp,
        );
    }
    println!("{} of {} operations", filtered.len(), history.len());
    Ok(())
}

fn print_metrics(metrics: &MetricsSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(metrics)?);
        return Ok(());
    }
    println!("total requests:        {}", metrics.total_requests);
    println!("average response time: {:.1}ms", metrics.average_response_time);
    println!("success rate:          {:.1}%", metrics.success_rate);
    let mut counts: Vec<_> = metrics.operation_counts.iter().collect();
    counts.sort();
    for (operation, count) in counts {
        println!("  {:<10} {}", operation, count);
    }
    Ok(())
}

/// Fixed-interval refresh of the metrics view, the dashboard's only recurring
/// work. Ctrl-C cancels the loop; a failed refresh prints a notice and the
/// loop keeps going.
async fn watch_metrics(api: &MathApi, interval: u64, json: bool) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match api.get_metrics().await {
                    Ok(metrics) => print_metrics(&metrics, json)?,
                    Err(err) => eprintln!("request failed: {:#}", err),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
