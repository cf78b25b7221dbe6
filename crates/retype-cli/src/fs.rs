//! Unit document discovery.

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct FileDiscoveryOptions {
    /// Patterns matched against paths relative to each searched directory.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub follow_links: bool,
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build glob set")
}

/// Collect unit documents under `roots`, sorted and deduplicated.
///
/// A root that is a file is taken as-is; directories are walked and filtered
/// by the include/exclude patterns.
pub fn discover_unit_files(roots: &[PathBuf], options: &FileDiscoveryOptions) -> Result<Vec<PathBuf>> {
    let include = build_glob_set(&options.include)?;
    let exclude = build_glob_set(&options.exclude)?;

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            bail!("path not found: {}", root.display());
        }
        collect_dir(root, &include, &exclude, options.follow_links, &mut files)?;
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "discovered unit documents");
    Ok(files)
}

fn collect_dir(
    root: &Path,
    include: &GlobSet,
    exclude: &GlobSet,
    follow_links: bool,
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    let walker = WalkDir::new(root)
        .follow_links(follow_links)
        .into_iter()
        .filter_entry(|entry| {
            // Prune excluded directories without descending into them
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .path()
                    .strip_prefix(root)
                    .is_ok_and(|rel| exclude.is_match(rel))
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if exclude.is_match(relative) || !include.is_match(relative) {
            trace!(path = %relative.display(), "skipped");
            continue;
        }
        out.push(entry.path().to_path_buf());
    }
    Ok(())
}
