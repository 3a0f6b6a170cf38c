use clap::{command, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Turn debug logging on
    #[arg(short, long)]
    pub debug: bool,

    /// Print times in UTC instead of the local timezone
    #[arg(short, long)]
    pub utc: bool,

    #[command(subcommand)]
    pub command: Commands,

    /// Destination of resulting HTML file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite the dates of an HTML page
    Page {
        /// Url the page was loaded from, selects the site rules
        #[arg(long, value_name = "URL")]
        url: String,

        /// Source HTML file
        #[arg(long, value_name = "FILE")]
        html: PathBuf,

        /// Directory with additional rule files
        /// Files replace built-in rules of the same name
        #[arg(long, value_name = "DIR")]
        config: Option<PathBuf>,
    },
    /// Normalize a timestamp or date string, e.g. '1700000000' or '2023-11-14T22:13:20Z'
    Date {
        value: String,
    },
    /// Rewrite the month names mentioned in a text
    Text {
        text: String,
    },
}
