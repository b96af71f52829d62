//! Scene metadata scraper plugin for www.avbase.net.
//!
//! Invoked by the host with a mode string and a JSON payload on stdin;
//! prints one JSON document to stdout and diagnostics to stderr.

use clap::Parser;

use scene_scrape_sites::{AvBase, init_logging, protocol};

#[derive(Parser)]
#[command(name = "avbase")]
#[command(about = "Scene metadata scraper for www.avbase.net", long_about = None)]
struct Cli {
    /// Host mode (scene-by-url, scene-by-fragment, scene-by-name,
    /// scene-by-query-fragment), or a URL/fragment for ad-hoc testing
    mode: Option<String>,
}

fn main() {
    init_logging("AvBase");
    let cli = Cli::parse();
    let response = protocol::run(&AvBase, cli.mode.as_deref());
    println!("{}", response.to_json());
}
