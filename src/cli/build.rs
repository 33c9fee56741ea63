//! Build and clean commands

use anyhow::Result;
use clap::Args;
use console::style;
use std::time::Instant;

use super::utils::{open_project, success, ProjectArgs};
use crate::build::{build, BuildContext};
use crate::config::CONFIG_FILE;
use crate::error::ProjectError;

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Remove the destination folder before building
    #[arg(long)]
    pub clean: bool,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let (src_dir, settings) = open_project(&args.project, args.project.overrides())?;
    let ctx = BuildContext::new(&src_dir, &settings)?;
    if args.clean {
        ctx.clean()?;
    }

    let started = Instant::now();
    let project = build(&ctx)?;
    success(format!(
        "Built {} ({} template) into {} in {:.2}s",
        style(project.presentation.id()).bold(),
        project.template.name,
        ctx.dest_dir.display(),
        started.elapsed().as_secs_f64()
    ));
    Ok(())
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

pub fn clean(args: CleanArgs) -> Result<()> {
    let (src_dir, settings) = open_project(&args.project, args.project.overrides())?;
    if !src_dir.join(CONFIG_FILE).is_file() {
        return Err(ProjectError::ConfigMissing(src_dir).into());
    }
    let ctx = BuildContext::new(&src_dir, &settings)?;
    ctx.clean()?;
    success(format!("Removed {}", ctx.dest_dir.display()));
    Ok(())
}
