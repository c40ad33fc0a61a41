//! vk-photo-backup: copies the profile photos of a VK user or community to
//! Yandex Disk, and optionally to a local folder and Google Drive.
//!
//! One page of the profile album is fetched, each photo is reduced to its
//! largest size and named after its like count (with the capture date added
//! on collisions), and the same named set is used for every destination.

#![warn(clippy::all)]

mod cli;
mod config;
mod download;
mod http;
mod orchestrator;
mod photo_log;
mod photos;
mod prompt;
mod sink;
mod types;
mod vk;

#[cfg(test)]
mod test_support;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::Config;
use orchestrator::{Orchestrator, RunError, RunOptions};
use photo_log::JsonPhotoLog;
use prompt::Prompter;
use sink::{DriveSink, GoogleDrive, YandexDisk};
use vk::VkClient;

/// Fill in whatever the command line left out by asking.
fn run_options<R: BufRead, W: Write>(
    config: &Config,
    prompter: &mut Prompter<R, W>,
) -> io::Result<RunOptions> {
    let handle = match &config.handle {
        Some(h) => h.clone(),
        None => prompter.ask_text("VK screen name or id:")?,
    };
    let folder = match &config.folder {
        Some(f) => f.clone(),
        None => prompter.ask_text("Yandex Disk folder name:")?,
    };
    let count = match config.count {
        Some(n) => n,
        None => prompter.ask_count("How many photos to back up?")?,
    };
    let download_dir = config
        .download_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&folder));

    Ok(RunOptions {
        handle,
        folder,
        count,
        offset: config.offset,
        download_dir,
        no_progress_bar: config.no_progress_bar,
    })
}

fn build_orchestrator(config: &Config, options: RunOptions) -> anyhow::Result<Orchestrator> {
    let vk = VkClient::new(http::build_client(None)?, config.tokens.vk.clone());
    let yandex = YandexDisk::new(http::build_client(Some(&YandexDisk::authorization(
        &config.tokens.yandex,
    )))?);
    let drive = match &config.tokens.gdrive {
        Some(token) => Some(Box::new(GoogleDrive::new(http::build_client(Some(
            &GoogleDrive::authorization(token),
        ))?)) as Box<dyn DriveSink>),
        None => None,
    };

    Ok(Orchestrator::new(
        Box::new(vk),
        Box::new(yandex),
        drive,
        Box::new(JsonPhotoLog::new(&config.log_file)),
        options,
    ))
}

/// Run the backup steps in order. Returns on the first fatal error; a
/// step-local failure is logged and the next step runs.
async fn run<R: BufRead, W: Write>(
    orchestrator: &mut Orchestrator,
    prompter: &mut Prompter<R, W>,
    config: &Config,
) -> Result<(), RunError> {
    let photos = orchestrator.fetch().await?;
    if photos.is_empty() {
        tracing::warn!("No photos found");
    }

    let cloud = orchestrator.upload_to_cloud(&photos).await?;
    println!(
        "Uploaded {} of {} photos to Yandex Disk folder '{}'",
        cloud.uploaded.len(),
        photos.len(),
        orchestrator.options().folder
    );

    let download_dir = orchestrator.options().download_dir.display().to_string();
    if config.yes_local
        || prompter.confirm(&format!("Download the photos to '{}'?", download_dir))?
    {
        let local = orchestrator.download_local(&photos).await?;
        println!("Saved {} photos to {}", local.saved.len(), download_dir);
    }

    if config.yes_drive
        || prompter.confirm(&format!("Upload '{}' to Google Drive?", download_dir))?
    {
        match orchestrator.upload_to_drive().await {
            Ok(report) => println!(
                "Uploaded {} files to Google Drive ({} failed)",
                report.uploaded.len(),
                report.failed.len()
            ),
            Err(e) if !e.is_fatal() => tracing::error!("Google Drive upload skipped: {}", e),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let config = Config::from_cli(cli)?;
    tracing::debug!(?config, "Configuration loaded");

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let options = run_options(&config, &mut prompter)?;
    let mut orchestrator = build_orchestrator(&config, options)?;

    let started = Instant::now();
    if let Err(e) = run(&mut orchestrator, &mut prompter, &config).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!(
        "Done in {}",
        download::format_duration(started.elapsed())
    );
    Ok(())
}
