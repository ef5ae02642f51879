use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tubescribe",
    about = "tubescribe - Fetch YouTube transcripts as text or PDF",
    version,
    long_about = "Fetches the caption transcript of a YouTube video, prints or saves it as text, and renders it into a paginated PDF named after the video title."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file (defaults to ./tubescribe.yaml or the user config dir)
    #[arg(short, long, global = true, value_name = "FILE", env = "TUBESCRIBE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript of a YouTube video
    Fetch {
        /// YouTube URL (watch, youtu.be, embed or shorts link)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Prefix each line with its start time
        #[arg(long)]
        timestamps: bool,

        /// Also render the transcript as <title>.pdf
        #[arg(long)]
        pdf: bool,

        /// Directory for the PDF (current directory if not specified)
        #[arg(long, value_name = "DIR", requires = "pdf")]
        pdf_dir: Option<PathBuf>,
    },

    /// Render a text file as a PDF
    Pdf {
        /// Text file to render, or - for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Title used for the file name and document metadata
        #[arg(short, long, default_value = "transcript")]
        title: String,

        /// Output path (defaults to <title>.pdf in the current directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print the video id found in a URL
    Id {
        /// YouTube URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show or initialise the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON with timestamps and title
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
