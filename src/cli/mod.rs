//! Command-line interface for gitshow
//!
//! One subcommand per stage of a presentation's life: create, build, serve,
//! package and print, plus a few inspection helpers.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod build;
mod info;
mod init;
mod package;
mod pdf;
mod serve;
mod utils;

/// Build, serve, package and print Markdown slide presentations
#[derive(Parser)]
#[command(name = "gitshow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new presentation from the starter sample
    Init(init::InitArgs),

    /// Build the presentation into its destination folder
    Build(build::BuildArgs),

    /// Build, serve and rebuild on change with live reload
    Serve(serve::ServeArgs),

    /// Build and zip the presentation into <id>.zip
    Package(package::PackageArgs),

    /// Build and print the presentation to <id>.pdf with a headless browser
    Pdf(pdf::PdfArgs),

    /// Remove the destination folder
    Clean(build::CleanArgs),

    /// Print the resolved presentation configuration
    Resolve(info::ResolveArgs),

    /// Print markdown slides with the template's rewrite rules applied
    Preview(info::PreviewArgs),

    /// List available templates
    Templates(info::TemplatesArgs),

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Build(args) => build::run(args),
        Commands::Serve(args) => serve::run(args),
        Commands::Package(args) => package::run(args),
        Commands::Pdf(args) => pdf::run(args),
        Commands::Clean(args) => build::clean(args),
        Commands::Resolve(args) => info::resolve(args),
        Commands::Preview(args) => info::preview(args),
        Commands::Templates(args) => info::templates(args),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
