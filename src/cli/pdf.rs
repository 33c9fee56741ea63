//! PDF command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::{open_project, runtime, spinner, success, ProjectArgs};
use crate::build::{build, BuildContext};
use crate::config::SettingsOverrides;
use crate::pdf::{find_browser, pdf_path, print_pdf, print_url};
use crate::serve::{self, BackgroundServer};

#[derive(Args, Debug)]
pub struct PdfArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Headless browser executable (Chromium, Chrome or Edge)
    #[arg(long, value_name = "PATH")]
    pub browser: Option<PathBuf>,

    /// Port for the temporary print server
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Keep the destination folder after printing
    #[arg(long)]
    pub keep_dest: bool,
}

pub fn run(args: PdfArgs) -> Result<()> {
    let overrides =
        SettingsOverrides { browser: args.browser.clone(), port: args.port, ..args.project.overrides() };
    let (src_dir, settings) = open_project(&args.project, overrides)?;

    let ctx = BuildContext::new(&src_dir, &settings)?;
    let project = build(&ctx)?;
    let browser = find_browser(settings.browser.as_deref())?;
    let output = pdf_path(&src_dir, project.presentation.id());

    let rt = runtime()?;
    rt.block_on(async {
        let listener = serve::bind(&settings.host, settings.port).await?;
        let server = BackgroundServer::spawn(listener, serve::router(&ctx.dest_dir, None));

        let pb = spinner(format!("Printing {}", output.display()));
        let url = print_url(&serve::url(&settings.host, settings.port));
        let printed = print_pdf(&browser, &output, &url).await;
        pb.finish_and_clear();

        server.stop().await?;
        printed
    })?;

    if !args.keep_dest {
        ctx.clean()?;
    }
    success(format!("Printed {}", output.display()));
    Ok(())
}
