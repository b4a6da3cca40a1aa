use clap::{Parser, ValueEnum};
use ct_archiver::{ArchiverConfig, Target};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ct-archiver")]
#[command(about = "Save CyberTalents courses and challenges as full-page screenshots")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory in which the CyberTalents folder is created
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// WebDriver server URL (overrides WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Skip the target prompt
    #[arg(short, long, value_enum)]
    pub target: Option<TargetArg>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Learn,
    Practice,
}

/// Convert from CLI argument target to internal target
pub fn convert_target(arg: TargetArg) -> Target {
    match arg {
        TargetArg::Learn => Target::Learn,
        TargetArg::Practice => Target::Practice,
    }
}

impl Args {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply(&self, config: &mut ArchiverConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if self.headful {
            config.headless = false;
        }
    }
}
