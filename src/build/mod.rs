//! Presentation build pipeline
//!
//! Stages a presentation into its destination folder. Each [`Step`] owns a
//! disjoint part of the destination, so the steps run in parallel.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub mod copy;
pub mod index;

use crate::config::{load_presentation, ToolSettings, CONFIG_FILE};
use crate::domain::Presentation;
use crate::error::ProjectError;
use crate::resolve::{as_layer, resolve_presentation};
use crate::rewrite;
use crate::template::{find_template, Template, TemplateSource};
use copy::{copy_file, copy_tree, expand_content};

/// Folders and paths a build works with. Threaded explicitly through every step.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub src_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub root: Option<PathBuf>,
    pub live_reload: bool,
}

impl BuildContext {
    /// Fails when the configured destination is the source folder or one of its parents,
    /// since the destination is removed by `clean`, `package` and `pdf`.
    pub fn new(src_dir: &Path, settings: &ToolSettings) -> Result<Self, ProjectError> {
        let dest_dir = lexical_normalize(&src_dir.join(&settings.dest));
        if settings.dest.trim().is_empty() || lexical_normalize(src_dir).starts_with(&dest_dir) {
            return Err(ProjectError::UnsafeDest {
                dest: settings.dest.clone(),
                src_dir: src_dir.to_path_buf(),
            });
        }
        Ok(Self {
            src_dir: src_dir.to_path_buf(),
            dest_dir,
            root: settings.root.clone(),
            live_reload: false,
        })
    }

    pub fn with_live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    /// Make sure the destination folder exists.
    pub fn prepare_dest(&self) -> Result<(), ProjectError> {
        fs::create_dir_all(&self.dest_dir)
            .map_err(|source| ProjectError::DestFolder { path: self.dest_dir.clone(), source })
    }

    /// Remove the destination folder if present.
    pub fn clean(&self) -> Result<()> {
        if self.dest_dir.exists() {
            tracing::info!("clean {}", self.dest_dir.display());
            fs::remove_dir_all(&self.dest_dir)
                .with_context(|| format!("Failed removing {}", self.dest_dir.display()))?;
        }
        Ok(())
    }

    fn runtime_dir(&self, part: &str) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join("runtime").join(part)).filter(|dir| dir.is_dir())
    }
}

/// Resolve `.` and `..` without touching the file system.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// A loaded presentation with its template and resolved configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub presentation: Presentation,
    pub template: Template,
    pub resolved: Value,
}

impl Project {
    pub fn load(ctx: &BuildContext) -> Result<Self> {
        let presentation = load_presentation(&ctx.src_dir)?;
        let template = find_template(presentation.template_name(), ctx.root.as_deref(), &ctx.src_dir)?;
        let resolved = resolve_presentation(&presentation, &template);

        for problem in rewrite::validate(&as_layer(resolved.get("reveal"))) {
            tracing::warn!("Rewrite {} will be ignored by the browser", problem);
        }

        Ok(Self { presentation, template, resolved })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Config,
    Index,
    Css,
    Js,
    Contents,
    Assets,
    Template,
}

impl Step {
    pub const ALL: [Step; 7] =
        [Step::Config, Step::Index, Step::Css, Step::Js, Step::Contents, Step::Assets, Step::Template];

    pub fn name(self) -> &'static str {
        match self {
            Step::Config => "config",
            Step::Index => "index",
            Step::Css => "css",
            Step::Js => "js",
            Step::Contents => "contents",
            Step::Assets => "assets",
            Step::Template => "template",
        }
    }

    fn run(self, ctx: &BuildContext, project: &Project) -> Result<()> {
        match self {
            Step::Config => write_config(ctx, project),
            Step::Index => write_index(ctx, project),
            Step::Css => copy_runtime(ctx, "css", &ctx.dest_dir.join("css")),
            Step::Js => copy_runtime(ctx, "js", &ctx.dest_dir),
            Step::Contents => copy_contents(ctx, project),
            Step::Assets => copy_assets(ctx),
            Step::Template => stage_template(ctx, &project.template),
        }
    }
}

/// Run the full build and return the loaded project.
pub fn build(ctx: &BuildContext) -> Result<Project> {
    let project = Project::load(ctx)?;
    ctx.prepare_dest()?;
    run_steps(ctx, &project, &Step::ALL)?;
    Ok(project)
}

/// Run `steps` in parallel against an already prepared destination.
pub fn run_steps(ctx: &BuildContext, project: &Project, steps: &[Step]) -> Result<()> {
    steps.par_iter().try_for_each(|step| {
        tracing::debug!("build step {}", step.name());
        step.run(ctx, project).with_context(|| format!("Build step '{}' failed", step.name()))
    })
}

fn write_config(ctx: &BuildContext, project: &Project) -> Result<()> {
    let path = ctx.dest_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&project.resolved)?;
    fs::write(&path, json).with_context(|| format!("Failed writing {}", path.display()))
}

fn write_index(ctx: &BuildContext, project: &Project) -> Result<()> {
    let page = index::load_index_template(ctx.root.as_deref())?;
    let html = index::render_index(&page, &project.resolved, ctx.live_reload);
    let path = ctx.dest_dir.join("index.html");
    fs::write(&path, html).with_context(|| format!("Failed writing {}", path.display()))
}

fn copy_runtime(ctx: &BuildContext, part: &str, to: &Path) -> Result<()> {
    let Some(from) = ctx.runtime_dir(part) else {
        tracing::warn!(
            "No runtime/{} folder under the tool root; set --root or GITSHOW_ROOT to stage it",
            part
        );
        return Ok(());
    };
    let copied = copy_tree(&from, to)?;
    tracing::debug!("staged {} runtime {} files", copied, part);
    Ok(())
}

fn copy_contents(ctx: &BuildContext, project: &Project) -> Result<()> {
    for entry in &project.presentation.contents {
        for (from, rel) in expand_content(&ctx.src_dir, entry)? {
            copy_file(&from, &ctx.dest_dir.join(rel))?;
        }
    }
    Ok(())
}

fn copy_assets(ctx: &BuildContext) -> Result<()> {
    let assets = ctx.src_dir.join("assets");
    if assets.is_dir() {
        copy_tree(&assets, &ctx.dest_dir.join("assets"))?;
    }
    Ok(())
}

fn stage_template(ctx: &BuildContext, template: &Template) -> Result<()> {
    let to = ctx.dest_dir.join("template");
    match &template.source {
        TemplateSource::Directory(dir) => {
            copy_tree(dir, &to)?;
        }
        TemplateSource::Builtin(files) => {
            fs::create_dir_all(&to).with_context(|| format!("Failed creating {}", to.display()))?;
            for file in files.iter() {
                fs::write(to.join(file.path), file.contents)
                    .with_context(|| format!("Failed writing template file {}", file.path))?;
            }
        }
    }
    Ok(())
}
