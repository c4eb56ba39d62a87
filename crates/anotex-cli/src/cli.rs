use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Extract highlights and comments from a PDF document into Markdown.
#[derive(Debug, Parser)]
#[command(name = "anotex", about, version)]
pub struct Cli {
    /// Path to the input document
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file. Default: '<INPUT>.md'
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write Markdown to standard output instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// Apply Unicode normalization to highlighted text
    #[arg(long, value_enum)]
    pub unicode_norm: Option<UnicodeNormArg>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Unicode normalization form for highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnicodeNormArg {
    /// Canonical Decomposition, followed by Canonical Composition
    Nfc,
    /// Canonical Decomposition
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition
    Nfkc,
    /// Compatibility Decomposition
    Nfkd,
}

impl UnicodeNormArg {
    pub fn to_unicode_norm(self) -> anotex::UnicodeNorm {
        match self {
            UnicodeNormArg::Nfc => anotex::UnicodeNorm::Nfc,
            UnicodeNormArg::Nfd => anotex::UnicodeNorm::Nfd,
            UnicodeNormArg::Nfkc => anotex::UnicodeNorm::Nfkc,
            UnicodeNormArg::Nfkd => anotex::UnicodeNorm::Nfkd,
        }
    }
}
