//! tsuite-run
//!
//! Submits a test run or security scan to an executor, follows it until it
//! finishes, and prints the results as JSON.
//!
//! Usage:
//!   tsuite-run test https://github.com/user/repo.git --framework jest
//!   tsuite-run scan https://github.com/user/repo.git --scanner secrets
//!
//! Environment Variables:
//!   EXECUTOR_URL - Executor base URL (default: http://localhost:8000)
//!   EXECUTOR_PROJECT_ID - Project id sent with every job (default: default)
//!   RUST_LOG - Log filter (default: info)
//!
//! Exits non-zero when the job fails or polling is interrupted.

use std::collections::HashMap;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tsuite::jobs::JobClient;
use tsuite::shared::{
    ClientConfig, JobSpec, JobStatus, ScanParams, ScannerType, TestRunParams,
};

#[derive(Parser, Debug)]
#[command(name = "tsuite-run")]
#[command(about = "Submit a job to the executor and wait for its results")]
struct Args {
    /// Executor base URL
    #[arg(long, env = "EXECUTOR_URL", default_value = "http://localhost:8000")]
    executor_url: String,

    /// Project id sent with every job
    #[arg(long, env = "EXECUTOR_PROJECT_ID", default_value = "default")]
    project_id: String,

    /// Seconds between status polls
    #[arg(long, default_value = "2")]
    interval: u64,

    #[command(subcommand)]
    job: Job,
}

#[derive(Subcommand, Debug)]
enum Job {
    /// Run a repository's test suite
    Test {
        repository_url: String,

        /// Test framework (jest, pytest, ...)
        #[arg(short, long)]
        framework: String,

        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Command overriding the framework's default
        #[arg(long)]
        command: Option<String>,

        /// Environment variable for the run, as KEY=VALUE (repeatable)
        #[arg(short, long = "env", value_parser = parse_env_var)]
        env: Vec<(String, String)>,
    },
    /// Scan a repository for vulnerabilities
    Scan {
        repository_url: String,

        /// dependency, sast, or secrets
        #[arg(short, long, default_value = "dependency")]
        scanner: ScannerType,

        #[arg(short, long, default_value = "main")]
        branch: String,
    },
}

impl Job {
    fn into_spec(self) -> JobSpec {
        match self {
            Job::Test {
                repository_url,
                framework,
                branch,
                command,
                env,
            } => JobSpec::Test(TestRunParams {
                branch,
                test_command: command,
                environment_vars: env.into_iter().collect::<HashMap<_, _>>(),
                ..TestRunParams::new(repository_url, framework)
            }),
            Job::Scan {
                repository_url,
                scanner,
                branch,
            } => JobSpec::SecurityScan(ScanParams {
                branch,
                ..ScanParams::new(repository_url, scanner)
            }),
        }
    }
}

fn parse_env_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::builder()
        .executor_url(args.executor_url)
        .project_id(args.project_id)
        .poll_interval(Duration::from_secs(args.interval))
        .build()?;
    let client = JobClient::from_config(&config);

    let job_id = client.submit(args.job.into_spec()).await?;
    info!(job_id = %job_id, "Job submitted");

    let watch = client.watch(job_id, config.poll_interval);
    let mut updates = watch.subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let latest = *updates.borrow_and_update();
            if let Some(report) = latest {
                info!(status = %report.status, progress = ?report.progress, "Job status");
            }
        }
    });

    // Dropping the watch on interrupt stops the poller
    let outcome = tokio::select! {
        results = watch.results() => Some(results),
        _ = tokio::signal::ctrl_c() => None,
    };
    progress.abort();

    let results = match outcome {
        Some(results) => results?,
        None => {
            warn!("Interrupted, polling stopped");
            return Ok(ExitCode::from(130));
        }
    };

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(match results.status {
        JobStatus::Completed => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
