use anyhow::{Context, Result};
use rayon::prelude::*;
use retype_engine::{Recipe, UnitMigration, migrate_all};
use retype_tree::{SourceFile, parse_unit_json};
use retype_types::TypeInterner;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::args::CliArgs;
use crate::config::{find_config, resolve_options};
use crate::fs::{FileDiscoveryOptions, discover_unit_files};

/// One migrated unit document.
pub struct UnitResult {
    /// Document the unit was loaded from.
    pub file: PathBuf,
    pub source: SourceFile,
    pub migration: UnitMigration,
}

pub struct RunResult {
    pub recipes: Vec<Recipe>,
    pub units: Vec<UnitResult>,
    /// Files written under `--out-dir`.
    pub written: Vec<PathBuf>,
}

impl RunResult {
    pub fn changed_units(&self) -> usize {
        self.units.iter().filter(|u| u.migration.changed()).count()
    }

    pub fn rewritten(&self) -> usize {
        self.units.iter().map(|u| u.migration.rewritten()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.units.iter().map(|u| u.migration.skipped()).sum()
    }
}

pub fn load_unit(types: &Arc<TypeInterner>, path: &Path) -> Result<SourceFile> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read unit document: {}", path.display()))?;
    parse_unit_json(Arc::clone(types), &source)
        .with_context(|| format!("failed to load unit document: {}", path.display()))
}

/// Load config, discover and load unit documents, and migrate them.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let config = find_config(args, cwd)?;
    let types = Arc::new(TypeInterner::new());
    let options = resolve_options(&types, &config, args)?;
    debug!(recipes = options.recipes.len(), "resolved options");

    let roots: Vec<PathBuf> = if args.paths.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        args.paths.iter().map(|path| cwd.join(path)).collect()
    };
    let discovery = FileDiscoveryOptions {
        include: options.include.clone(),
        exclude: options.exclude.clone(),
        follow_links: true,
    };
    let files = discover_unit_files(&roots, &discovery)?;

    let mut sources = files
        .par_iter()
        .map(|path| load_unit(&types, path))
        .collect::<Result<Vec<_>>>()?;
    let migrations = migrate_all(&mut sources, &options.recipes);

    let written = match &args.out_dir {
        Some(out_dir) => write_migrated(&cwd.join(out_dir), &sources, &migrations)?,
        None => Vec::new(),
    };

    let units: Vec<UnitResult> = files
        .into_iter()
        .zip(sources)
        .zip(migrations)
        .map(|((file, source), migration)| UnitResult {
            file,
            source,
            migration,
        })
        .collect();
    info!(
        units = units.len(),
        written = written.len(),
        "migration finished"
    );

    Ok(RunResult {
        recipes: options.recipes,
        units,
        written,
    })
}

/// Write the printed source of each changed unit to `out_dir`, at the
/// unit's own relative path.
fn write_migrated(
    out_dir: &Path,
    sources: &[SourceFile],
    migrations: &[UnitMigration],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (source, migration) in sources.iter().zip(migrations) {
        if !migration.changed() {
            continue;
        }
        let target = out_dir.join(relative_unit_path(&migration.path));
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&target, source.print(source.root))
            .with_context(|| format!("failed to write {}", target.display()))?;
        written.push(target);
    }
    Ok(written)
}

/// `path` with root, prefix, `.` and `..` components dropped, so output
/// never escapes the output directory.
pub(crate) fn relative_unit_path(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}
