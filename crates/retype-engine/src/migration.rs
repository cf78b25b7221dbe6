//! Unit and batch migration.
//!
//! A unit is migrated by running each recipe in turn: the recipe's gate is
//! checked against the current root, the engine runs, and the import delta
//! is applied before the next recipe sees the unit. Units are independent
//! and are migrated in parallel.

use crate::driver::{RewriteEngine, RewriteReport};
use crate::imports::{ImportDelta, apply_import_delta};
use crate::recipe::Recipe;
use rayon::prelude::*;
use retype_tree::{NodeIndex, SourceFile};
use serde::Serialize;
use tracing::{debug, info_span};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRun {
    pub recipe: String,
    /// `false` when the recipe's gate rejected the unit.
    pub applicable: bool,
    pub report: Option<RewriteReport>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMigration {
    pub path: String,
    pub original_root: NodeIndex,
    pub root: NodeIndex,
    pub runs: Vec<RecipeRun>,
}

impl UnitMigration {
    pub fn changed(&self) -> bool {
        self.root != self.original_root
    }

    pub fn rewritten(&self) -> usize {
        self.reports().map(RewriteReport::rewritten).sum()
    }

    pub fn skipped(&self) -> usize {
        self.reports().map(RewriteReport::skipped).sum()
    }

    pub fn reports(&self) -> impl Iterator<Item = &RewriteReport> {
        self.runs.iter().filter_map(|run| run.report.as_ref())
    }
}

pub fn migrate_unit(file: &mut SourceFile, recipes: &[Recipe]) -> UnitMigration {
    let span = info_span!("migrate_unit", path = %file.path());
    let _guard = span.enter();

    let original_root = file.root;
    let mut root = original_root;
    let mut runs = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let engine = RewriteEngine::new(recipe.rule.clone());
        let gate = recipe.precondition();
        let mut imports = ImportDelta::new();
        let report = engine.run_if_applicable(&mut file.arena, root, &gate, &mut imports);
        if let Some(report) = &report {
            root = apply_import_delta(&mut file.arena, report.root, &imports);
        }
        debug!(recipe = %recipe.id, applied = report.is_some(), "recipe finished");
        runs.push(RecipeRun {
            recipe: recipe.id.clone(),
            applicable: report.is_some(),
            report,
        });
    }

    let migration = UnitMigration {
        path: file.path().to_string(),
        original_root,
        root,
        runs,
    };
    file.root = root;
    migration
}

/// Migrate every unit in parallel. Results are in input order.
pub fn migrate_all(files: &mut [SourceFile], recipes: &[Recipe]) -> Vec<UnitMigration> {
    files
        .par_iter_mut()
        .map(|file| migrate_unit(file, recipes))
        .collect()
}
