//! Inspection commands: resolve, templates, preview

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;

use super::utils::ProjectArgs;
use crate::build::{copy::expand_content, BuildContext, Project};
use crate::config::{load_settings, SettingsOverrides};
use crate::rewrite::{split_markdown, Rewriter};
use crate::template::{builtin, BUILTIN_NAMES};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Print the resolved presentation tree as pretty JSON.
pub fn resolve(args: ResolveArgs) -> Result<()> {
    let (_, project) = load_quiet(&args.project)?;
    println!("{}", serde_json::to_string_pretty(&project.resolved)?);
    Ok(())
}

#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Tool root whose templates/ folder is listed too
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

pub fn templates(args: TemplatesArgs) -> Result<()> {
    println!("Built-in templates:");
    for name in BUILTIN_NAMES {
        let description = builtin(name)
            .and_then(|t| t.description.get("description").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_default();
        println!("  {:<10} {}", style(name).bold(), description);
    }

    let root = match args.root {
        Some(root) => Some(root),
        None => {
            let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
            load_settings(&cwd, &SettingsOverrides::default())?.root
        }
    };
    if let Some(dir) = root.map(|r| r.join("templates")).filter(|d| d.is_dir()) {
        let mut names: Vec<String> = fs::read_dir(&dir)
            .with_context(|| format!("Failed listing {}", dir.display()))?
            .filter_map(Result::ok)
            .filter(|entry| entry.path().join(crate::template::TEMPLATE_FILE).is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        if !names.is_empty() {
            println!("Templates in {}:", dir.display());
            for name in names {
                println!("  {}", name);
            }
        }
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Print every markdown content slide with the template's rewrite rules applied.
pub fn preview(args: PreviewArgs) -> Result<()> {
    let (src_dir, project) = load_quiet(&args.project)?;
    let rewrite = project.resolved.pointer("/reveal/rewrite").cloned().unwrap_or_default();
    let (rewriter, problems) = Rewriter::from_config(&rewrite);
    for problem in problems {
        tracing::warn!("Skipping rewrite {}", problem);
    }
    tracing::debug!("applying {} rewrite rules", rewriter.rules().len());

    let mut slides = Vec::new();
    for entry in &project.presentation.contents {
        for (path, _) in expand_content(&src_dir, entry)? {
            if path.extension().is_some_and(|ext| ext == "md" || ext == "markdown") {
                let source = fs::read_to_string(&path)
                    .with_context(|| format!("Failed reading {}", path.display()))?;
                slides.extend(split_markdown(&source));
            }
        }
    }

    let rendered = rewriter.rewrite_deck(&slides);
    println!("{}", rendered.join("\n---\n"));
    Ok(())
}

/// Load the project without status output, leaving stdout to the command's result.
fn load_quiet(args: &ProjectArgs) -> Result<(PathBuf, Project)> {
    let src_dir = args.source_dir()?;
    let settings = load_settings(&src_dir, &args.overrides())?;
    let project = Project::load(&BuildContext::new(&src_dir, &settings)?)?;
    Ok((src_dir, project))
}
