//! Watch mode - re-expand files when they change on disk

use super::expand::expand_all;
use crate::context::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// Block until the event channel closes, expanding changed files
///
/// Parent directories are watched rather than the files, so editors that
/// save by renaming a temp file are still seen. Bursts of events are
/// coalesced over the configured debounce window. Writing an already
/// expanded file is skipped, so the watcher does not retrigger itself.
pub fn run(files: &[PathBuf], ctx: &Context) -> Result<()> {
    let targets: Vec<PathBuf> = files
        .iter()
        .map(|f| {
            f.canonicalize()
                .with_context(|| format!("cannot watch {}", f.display()))
        })
        .collect::<Result<_>>()?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    let dirs: BTreeSet<&Path> = targets.iter().filter_map(|p| p.parent()).collect();
    for dir in &dirs {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        log::debug!("watching {}", dir.display());
    }

    println!(
        "{} Watching {} file(s), press Ctrl-C to stop",
        "→".cyan(),
        targets.len()
    );

    let debounce = Duration::from_millis(ctx.config.watch.debounce_ms);
    loop {
        let Ok(first) = rx.recv() else {
            return Ok(());
        };
        let mut changed = BTreeSet::new();
        collect_changes(first, &targets, &mut changed);

        loop {
            match rx.recv_timeout(debounce) {
                Ok(event) => collect_changes(event, &targets, &mut changed),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }

        if !changed.is_empty() {
            let files: Vec<PathBuf> = changed.into_iter().collect();
            log::info!("{} file(s) changed", files.len());
            expand_all(&files, ctx);
        }
    }
}

fn collect_changes(
    event: notify::Result<Event>,
    targets: &[PathBuf],
    changed: &mut BTreeSet<PathBuf>,
) {
    let event = match event {
        Ok(event) => event,
        Err(e) => {
            log::warn!("watch error: {}", e);
            return;
        }
    };
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }
    for path in &event.paths {
        if let Some(target) = match_target(path, targets) {
            changed.insert(target.to_path_buf());
        }
    }
}

/// Map an event path onto one of the watched files
fn match_target<'t>(path: &Path, targets: &'t [PathBuf]) -> Option<&'t Path> {
    if let Some(target) = targets.iter().find(|t| t.as_path() == path) {
        return Some(target);
    }
    let canonical = path.canonicalize().ok()?;
    targets
        .iter()
        .find(|t| **t == canonical)
        .map(PathBuf::as_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &Path) -> notify::Result<Event> {
        Ok(Event::new(kind).add_path(path.to_path_buf()))
    }

    #[test]
    fn test_collects_only_watched_files() {
        let targets = vec![PathBuf::from("/src/a.c"), PathBuf::from("/src/b.c")];
        let mut changed = BTreeSet::new();

        collect_changes(
            event(EventKind::Modify(ModifyKind::Any), Path::new("/src/a.c")),
            &targets,
            &mut changed,
        );
        collect_changes(
            event(EventKind::Create(CreateKind::File), Path::new("/src/a.c")),
            &targets,
            &mut changed,
        );
        collect_changes(
            event(EventKind::Modify(ModifyKind::Any), Path::new("/src/other.c")),
            &targets,
            &mut changed,
        );

        assert_eq!(changed.into_iter().collect::<Vec<_>>(), [PathBuf::from("/src/a.c")]);
    }

    #[test]
    fn test_ignores_removals_and_errors() {
        let targets = vec![PathBuf::from("/src/a.c")];
        let mut changed = BTreeSet::new();

        collect_changes(
            event(EventKind::Remove(RemoveKind::File), Path::new("/src/a.c")),
            &targets,
            &mut changed,
        );
        collect_changes(Err(notify::Error::generic("boom")), &targets, &mut changed);

        assert!(changed.is_empty());
    }
}
