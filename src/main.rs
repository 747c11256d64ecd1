use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::{
    session::{Reporter, UploadOutcome, UploadSession},
    transport::HttpTransport,
    ui::ConsoleReporter,
};

mod config;
mod error;
mod plan;
mod query;
mod session;
mod transport;
mod ui;

#[derive(Parser)]
#[command(name = "resumable-upload")]
#[command(version)]
#[command(about = "Upload a file to a remote server in resumable chunks")]
struct Cli {
    /// Log protocol details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload file to remote server
    Upload {
        /// Sent verbatim as the Authorization header
        apikey: String,
        /// Remote server URL for upload
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// File to upload
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let reporter = ConsoleReporter;
    match run(cli, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.report_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<R: Reporter>(cli: Cli, reporter: &R) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match cli.command {
        Commands::Upload { apikey, url, file } => rt.block_on(upload(reporter, apikey, url, file)),
    }
}

async fn upload<R: Reporter>(
    reporter: &R,
    api_key: String,
    url: String,
    file: PathBuf,
) -> Result<()> {
    Url::parse(&url).with_context(|| format!("Invalid URL: {}", url))?;

    let config = config::read_config()?;
    let path = expand_tilde(&file);
    let transport = HttpTransport::new(api_key);

    let outcome = UploadSession::new(&transport, reporter, config.chunk_size)
        .run(&url, &path)
        .await?;

    match outcome {
        UploadOutcome::Completed { .. } => info!(file = %path.display(), "upload complete"),
        UploadOutcome::AlreadyComplete => {
            info!(file = %path.display(), "server already holds every chunk")
        }
        UploadOutcome::Finished { uploaded_chunks } => {
            info!(file = %path.display(), uploaded_chunks, "upload finished without a result")
        }
    }

    Ok(())
}

/// Replaces a leading `~` component with the current user's home directory.
///
/// Only the current user's home is known; `~user` forms are left untouched.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_upload_arguments() {
        let cli = Cli::try_parse_from([
            "resumable-upload",
            "upload",
            "key-123",
            "http://localhost:8080/upload",
            "~/video.mp4",
        ])
        .unwrap();

        let Commands::Upload { apikey, url, file } = cli.command;
        assert_eq!(apikey, "key-123");
        assert_eq!(url, "http://localhost:8080/upload");
        assert_eq!(file, PathBuf::from("~/video.mp4"));
        assert!(!cli.verbose);
    }

    #[test]
    fn upload_requires_three_arguments() {
        assert!(Cli::try_parse_from(["resumable-upload", "upload", "key", "http://x"]).is_err());
    }

    #[test]
    fn expands_home_relative_paths() {
        let home = directories::BaseDirs::new().unwrap().home_dir().to_path_buf();

        assert_eq!(expand_tilde(Path::new("~/a/b.txt")), home.join("a/b.txt"));
        assert_eq!(expand_tilde(Path::new("~")), home.join(""));
        assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert_eq!(expand_tilde(Path::new("~other/x")), PathBuf::from("~other/x"));
    }
}
