//! Serve command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::utils::{open_project, runtime, ProjectArgs};
use crate::build::{build, BuildContext};
use crate::config::SettingsOverrides;
use crate::serve::{self, watch, LiveReload};

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Interface to listen on
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Serve the build without watching sources
    #[arg(long)]
    pub no_watch: bool,
}

pub fn run(args: ServeArgs) -> Result<()> {
    let overrides = SettingsOverrides { host: args.host.clone(), port: args.port, ..args.project.overrides() };
    let (src_dir, settings) = open_project(&args.project, overrides)?;

    let live_reload = !args.no_watch;
    let ctx = BuildContext::new(&src_dir, &settings)?.with_live_reload(live_reload);
    let project = build(&ctx)?;

    let rt = runtime()?;
    rt.block_on(async move {
        let listener = serve::bind(&settings.host, settings.port).await?;
        let reload = live_reload.then(LiveReload::new);
        let router = serve::router(&ctx.dest_dir, reload.clone());

        let stop = Arc::new(AtomicBool::new(false));
        let watcher = reload.map(|reload| {
            let (ctx, stop) = (ctx.clone(), Arc::clone(&stop));
            tokio::task::spawn_blocking(move || watch::watch(ctx, project, reload, stop))
        });

        println!(
            "Serving {} at {} (Ctrl-C to stop)",
            ctx.dest_dir.display(),
            style(serve::url(&settings.host, settings.port)).cyan().underlined()
        );
        let served = serve::run(listener, router, serve::ctrl_c()).await;

        stop.store(true, Ordering::Relaxed);
        if let Some(watcher) = watcher {
            watcher.await.context("Watcher panicked")?;
        }
        served
    })
}
