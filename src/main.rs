use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubescribe::cli::{Cli, Commands};
use tubescribe::config::Config;
use tubescribe::extractors::extract_video_id;
use tubescribe::output::{self, PdfRenderer};
use tubescribe::pipeline::{render_download, PdfDownload, TranscriptPipeline};
use tubescribe::utils::{format_duration, format_file_size};
use tubescribe::ScribeError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "tubescribe=debug" } else { "tubescribe=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch {
            url,
            output,
            format,
            timestamps,
            pdf,
            pdf_dir,
        } => {
            let pipeline = TranscriptPipeline::new(config)?;

            let progress = spinner(cli.quiet, "Fetching transcript...");
            let fetched = pipeline.fetch(&url).await;
            progress.finish_and_clear();

            let result = fetched?;
            tracing::info!(
                "Transcript covers {} of video",
                format_duration(result.transcript.duration())
            );

            match output {
                Some(path) => {
                    output::save_to_file(&result, &path, &format, timestamps)?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => output::print_to_console(&result, &format, timestamps)?,
            }

            if pdf {
                let download = pipeline.render_pdf(&result)?;
                let dir = pdf_dir.unwrap_or_else(|| PathBuf::from("."));
                write_download(&download, &dir.join(&download.filename))?;
            }
        }
        Commands::Pdf {
            input,
            title,
            output,
        } => {
            let text = read_input(&input)?;
            let download = render_download(PdfRenderer::new(&config.pdf), &text, &title)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&download.filename));
            write_download(&download, &path)?;
        }
        Commands::Id { url } => match extract_video_id(&url) {
            Some(id) => println!("{}", id),
            None => return Err(ScribeError::InvalidInput(url).into()),
        },
        Commands::Config { show, init } => {
            if init {
                let path = config.save(cli.config.as_deref())?;
                println!("Configuration written to: {}", path.display());
            }
            if show || !init {
                config.display();
            }
        }
    }

    Ok(())
}

fn spinner(quiet: bool, message: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(std::time::Duration::from_millis(120));
    progress
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read text from stdin")?;
        return Ok(text);
    }

    fs_err::read_to_string(input).context("Failed to read input text")
}

fn write_download(download: &PdfDownload, path: &Path) -> Result<()> {
    output::save_pdf(&download.bytes, path)?;
    println!(
        "PDF saved to: {} ({})",
        path.display(),
        format_file_size(download.bytes.len() as u64)
    );
    Ok(())
}
