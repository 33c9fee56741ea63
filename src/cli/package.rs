//! Package command implementation

use anyhow::Result;
use clap::Args;

use super::utils::{open_project, spinner, success, ProjectArgs};
use crate::build::{build, BuildContext};
use crate::package::{archive_path, archive_size, package};

#[derive(Args, Debug)]
pub struct PackageArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Keep the destination folder after packaging
    #[arg(long)]
    pub keep_dest: bool,
}

pub fn run(args: PackageArgs) -> Result<()> {
    let (src_dir, settings) = open_project(&args.project, args.project.overrides())?;
    let ctx = BuildContext::new(&src_dir, &settings)?;
    let project = build(&ctx)?;

    let archive = archive_path(&src_dir, project.presentation.id());
    let pb = spinner(format!("Packaging {}", archive.display()));
    let packaged = package(&ctx.dest_dir, &archive);
    pb.finish_and_clear();
    let files = packaged?;

    if !args.keep_dest {
        ctx.clean()?;
    }
    success(format!("Packaged {} files into {} ({} bytes)", files, archive.display(), archive_size(&archive)));
    Ok(())
}
