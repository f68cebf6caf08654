//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `paperfeed_core` linkage without the mobile runtime.
//! - Optionally summarize a catalog file: `paperfeed_cli [catalog.json]`.

use paperfeed_core::{filter_papers, PaperCatalog, Topic};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("paperfeed_core ping={}", paperfeed_core::ping());
    println!("paperfeed_core version={}", paperfeed_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match PaperCatalog::from_path(&path) {
        Ok(catalog) => {
            println!("catalog papers={}", catalog.len());
            for topic in Topic::TABS {
                let eligible = filter_papers(catalog.papers(), topic, &[]).len();
                println!("topic {} eligible={}", topic, eligible);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("catalog error: {err}");
            ExitCode::FAILURE
        }
    }
}
