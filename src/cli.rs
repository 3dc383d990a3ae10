//! CLI argument definitions using clap.
//!
//! The CLI is the presentation layer: it bounds the grade to 1-12, collects
//! the topic, and renders whatever the pipeline returns.

use clap::Parser;
use std::path::PathBuf;

/// edugen - grade-appropriate lesson generation with automated review
#[derive(Parser, Debug)]
#[command(name = "edugen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Student grade (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub grade: u8,

    /// Lesson topic, e.g. "Types of Angles"
    #[arg(short, long)]
    pub topic: String,

    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit the result as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
