//! Polling source watcher

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

use crate::build::{run_steps, BuildContext, Project, Step};

use super::livereload::LiveReload;

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub type Snapshot = HashMap<PathBuf, SystemTime>;

/// Modification times of every file under `dirs`, skipping `ignore` and hidden entries.
pub fn snapshot(dirs: &[&Path], ignore: &Path) -> Snapshot {
    let mut files = Snapshot::new();
    for dir in dirs {
        let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
            let hidden = entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.');
            !hidden && entry.path() != ignore
        });
        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(modified) = entry.metadata().ok().and_then(|meta| meta.modified().ok()) {
                files.insert(entry.into_path(), modified);
            }
        }
    }
    files
}

/// Paths added, removed or modified between two snapshots.
pub fn changed_paths(before: &Snapshot, after: &Snapshot) -> Vec<PathBuf> {
    let mut changed: Vec<PathBuf> = after
        .iter()
        .filter(|(path, modified)| before.get(*path) != Some(*modified))
        .map(|(path, _)| path.clone())
        .collect();
    changed.extend(before.keys().filter(|path| !after.contains_key(*path)).cloned());
    changed.sort();
    changed
}

/// Build steps made stale by a change to `path`.
pub fn classify(path: &Path, src_dir: &Path, template_dir: Option<&Path>) -> BTreeSet<Step> {
    let mut steps = BTreeSet::new();

    if template_dir.is_some_and(|dir| path.starts_with(dir)) {
        steps.insert(Step::Template);
        // template.json feeds the resolved configuration.
        if path.extension().is_some_and(|ext| ext == "json") {
            steps.extend([Step::Config, Step::Index]);
        }
        return steps;
    }
    if path.starts_with(src_dir.join("assets")) {
        steps.insert(Step::Assets);
        return steps;
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            steps.extend([Step::Config, Step::Index, Step::Template]);
        }
        Some("md" | "markdown" | "html" | "htm") => {
            steps.insert(Step::Contents);
        }
        _ => {}
    }
    steps
}

fn template_dir(project: &Project) -> Option<PathBuf> {
    project.template.directory().map(Path::to_path_buf)
}

/// Poll the sources until `stop` is set, rebuilding stale steps and notifying pages.
///
/// Blocking; run it on a dedicated thread or `spawn_blocking`.
pub fn watch(ctx: BuildContext, mut project: Project, reload: LiveReload, stop: Arc<AtomicBool>) {
    let dirs = |project: &Project| {
        let mut dirs = vec![ctx.src_dir.clone()];
        dirs.extend(template_dir(project).filter(|dir| !dir.starts_with(&ctx.src_dir)));
        dirs
    };
    let take_snapshot = |project: &Project| {
        let dirs = dirs(project);
        let refs: Vec<&Path> = dirs.iter().map(PathBuf::as_path).collect();
        snapshot(&refs, &ctx.dest_dir)
    };

    let mut last = take_snapshot(&project);
    tracing::debug!("watching {} files", last.len());

    while !stop.load(Ordering::Relaxed) {
        std::thread::sleep(POLL_INTERVAL);
        let current = take_snapshot(&project);
        let changed = changed_paths(&last, &current);
        last = current;
        if changed.is_empty() {
            continue;
        }

        let template = template_dir(&project);
        let steps: BTreeSet<Step> = changed
            .iter()
            .flat_map(|path| classify(path, &ctx.src_dir, template.as_deref()))
            .collect();
        if steps.is_empty() {
            continue;
        }

        if steps.contains(&Step::Config) {
            match Project::load(&ctx) {
                Ok(reloaded) => project = reloaded,
                Err(err) => {
                    tracing::error!("Reloading presentation failed: {err:#}");
                    continue;
                }
            }
            last = take_snapshot(&project);
        }

        let steps: Vec<Step> = steps.into_iter().collect();
        let names: Vec<&str> = steps.iter().map(|step| step.name()).collect();
        tracing::info!("rebuilding {}", names.join(", "));

        let rebuilt = ctx
            .prepare_dest()
            .map_err(anyhow::Error::from)
            .and_then(|()| run_steps(&ctx, &project, &steps));
        match rebuilt {
            Ok(()) => {
                let pages = reload.notify();
                tracing::debug!("reload sent to {} pages", pages);
            }
            Err(err) => tracing::error!("Rebuild failed: {err:#}"),
        }
    }
}
