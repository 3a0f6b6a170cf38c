use std::path::{Path, PathBuf};
use std::process::exit;

use crate::args::{Args, Commands};
use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use url::Url;
use yyyymmdd::{DateNormalizer, Dispatcher, Page, SiteRuleTable};

mod args;

pub fn main() {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(error) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to set up logging: {error}");
    }

    let normalizer = if args.utc {
        DateNormalizer::utc()
    } else {
        DateNormalizer::new()
    };

    match args.command {
        Commands::Page { url, html, config } => {
            rewrite_page(&url, &html, config.as_deref(), normalizer, args.output)
        }
        Commands::Date { value } => println!("{}", normalizer.date_fmt(&value)),
        Commands::Text { text } => println!("{}", normalizer.fix_text(&text)),
    }
}

fn rewrite_page(
    url: &str,
    html_file: &Path,
    config: Option<&Path>,
    normalizer: DateNormalizer,
    output: Option<PathBuf>,
) {
    let url = match Url::parse(url) {
        Ok(url) => url,
        Err(error) => {
            log::error!("Invalid url '{url}': {error}");
            exit(1);
        }
    };

    let html = match std::fs::read_to_string(html_file) {
        Ok(html) => html,
        Err(error) => {
            log::error!("Failed to read HTML file {html_file:?}: {error}");
            exit(1);
        }
    };

    let mut page = match Page::parse(&url, &html) {
        Ok(page) => page,
        Err(error) => {
            log::error!("Failed to parse HTML: {error}");
            exit(1);
        }
    };

    let mut dispatcher = Dispatcher::new(SiteRuleTable::parse(config), normalizer);
    let report = dispatcher.run(&mut page);
    log::info!("Applied site rules: {}", report.active.join(", "));

    let html = page.to_html();
    match output {
        Some(path) => {
            if let Err(error) = std::fs::write(&path, html) {
                log::error!("Failed to write {path:?}: {error}");
                exit(1);
            }
            log::info!("Wrote {path:?}");
        }
        None => println!("{html}"),
    }
}
