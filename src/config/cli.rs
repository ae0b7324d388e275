use crate::config::toml_config::CrawlerConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cable-crawler")]
#[command(about = "Crawl the AAD telegram overview tables and download the cables")]
pub struct CliConfig {
    /// TOML configuration (year table, user agent, retry delays); the built-in table is used when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log JSON lines instead of the compact format
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Log process CPU and memory usage
    #[arg(long, global = true)]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write every overview row of a year into one CSV file
    Export {
        #[arg(long)]
        year: u16,
        #[arg(short, long)]
        output: PathBuf,
        /// Do not write the CSV header row
        #[arg(long)]
        no_header: bool,
    },
    /// Write one CSV file per result page (resumable with --start-page)
    Pages {
        #[arg(long)]
        year: u16,
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, default_value = "1")]
        start_page: u32,
        /// Results per page: 10, 20 or 50
        #[arg(long, default_value = "50")]
        page_size: u32,
    },
    /// Merge per-page CSV files into one overview CSV
    Merge {
        #[arg(long)]
        input_dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Download the documents listed in an overview CSV
    Download {
        #[arg(long)]
        overview: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
        /// Data rows to skip, to resume an interrupted run
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// List the years with a configured search URL
    Years,
}

impl CliConfig {
    /// The configuration file if given, the built-in year table otherwise.
    pub fn load_crawler_config(&self) -> Result<CrawlerConfig> {
        match &self.config {
            Some(path) => CrawlerConfig::from_file(path),
            None => CrawlerConfig::builtin(),
        }
    }
}

fn path_str(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Export { output, .. } => validate_path("output", &path_str(output)),
            Command::Pages {
                output_dir,
                start_page,
                ..
            } => {
                validate_path("output_dir", &path_str(output_dir))?;
                validate_positive_number("start_page", *start_page as usize, 1)
            }
            Command::Merge { input_dir, output } => {
                validate_path("input_dir", &path_str(input_dir))?;
                validate_path("output", &path_str(output))
            }
            Command::Download {
                overview,
                output_dir,
                ..
            } => {
                validate_path("overview", &path_str(overview))?;
                validate_path("output_dir", &path_str(output_dir))
            }
            Command::Years => Ok(()),
        }
    }
}
