//! gitshow: Build, serve, package and print Markdown slide presentations
//!
//! A presentation folder holds `presentation.json` and its content files. The
//! tool resolves the chosen template against the presentation's properties and
//! stages a static site that the browser runtime turns into slides.

use std::process::ExitCode;

mod build;
mod cli;
mod config;
mod domain;
mod error;
mod package;
mod pdf;
mod resolve;
mod rewrite;
mod serve;
mod template;
mod utils;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<error::ProjectError>().map_or(1, error::ProjectError::exit_code);
            ExitCode::from(code)
        }
    }
}
