use std::path::{Path, PathBuf};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Directory names whose events never trigger a rebuild. The output
/// directory is filtered separately since its name is configurable.
const IGNORED_DIRS: &[&str] = &["node_modules", ".git", "target"];

/// Watches the project root and pushes changed paths into a bounded channel.
///
/// The channel being bounded is what makes rebuild coalescing work: events
/// that arrive while a build is in flight pile up here (dropping overflow)
/// and are drained into a single follow-up rebuild.
pub struct FileWatcher {
  _watcher: RecommendedWatcher,
}

impl FileWatcher {
  pub fn new(
    root_dir: &Path,
    out_dir: PathBuf,
    tx: mpsc::Sender<PathBuf>,
  ) -> anyhow::Result<Self> {
    let mut watcher =
      notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
          for path in event.paths {
            if should_ignore(&path, &out_dir) {
              continue;
            }
            // Full means a build is already pending; the change is picked
            // up by the rebuild that drain triggers.
            let _ = tx.try_send(path);
          }
        }
      })?;

    watcher.watch(root_dir, RecursiveMode::Recursive)?;
    tracing::debug!(root = %root_dir.display(), "file watcher started");

    Ok(Self { _watcher: watcher })
  }
}

fn should_ignore(path: &Path, out_dir: &Path) -> bool {
  if path.starts_with(out_dir) {
    return true;
  }

  path.components().any(|component| {
    component.as_os_str().to_str().is_some_and(|name| IGNORED_DIRS.contains(&name))
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ignores_output_and_vendor_paths() {
    let out_dir = PathBuf::from("/app/dist");
    assert!(should_ignore(Path::new("/app/dist/main.js"), &out_dir));
    assert!(should_ignore(Path::new("/app/node_modules/react/index.js"), &out_dir));
    assert!(should_ignore(Path::new("/app/.git/HEAD"), &out_dir));
    assert!(!should_ignore(Path::new("/app/src/index.js"), &out_dir));
  }
}
