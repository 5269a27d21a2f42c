// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and the render, inspect and variants subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docmerge")]
#[command(about = "Fill Word document templates with field data, whatever the key spelling")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template with field data
    Render(RenderArgs),

    /// List the placeholders of a template and report malformed ones
    Inspect {
        #[arg(help = "Template path or http(s) URL")]
        template: String,

        #[arg(long, help = "Only allow loops within a single paragraph")]
        no_paragraph_loop: bool,

        #[arg(long, help = "Output format: text, json, pretty or yaml")]
        format: Option<String>,
    },

    /// Print every spelling a field key is matched under
    Variants {
        #[arg(required = true, help = "Field keys, e.g. firstName")]
        keys: Vec<String>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    #[arg(help = "Template path or http(s) URL")]
    pub template: String,

    #[arg(short, long, help = "URL-encoded field data, e.g. firstName=Ada&email=")]
    pub query: Option<String>,

    #[arg(short = 'V', long = "var", help = "Field value (key=value), repeatable")]
    pub vars: Vec<String>,

    #[arg(short, long, help = "JSON file holding a field object")]
    pub data: Option<PathBuf>,

    #[arg(short, long, help = "Path of the generated document")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Keep newlines in values as literal text")]
    pub no_linebreaks: bool,

    #[arg(long, help = "Only allow loops within a single paragraph")]
    pub no_paragraph_loop: bool,

    #[arg(long, help = "Error report format: text, json, pretty or yaml")]
    pub report_format: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
