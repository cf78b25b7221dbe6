use anyhow::{Context, Result};
use colored::Colorize;
use retype_engine::{CATALOG, Recipe, RecipeRun, SiteOutcome};
use retype_tree::Printer;
use retype_types::TypeInterner;
use serde::Serialize;

use crate::driver::{RunResult, UnitResult};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Text report: one block per unit with call sites or changes, then a
    /// summary line.
    pub fn render(&self, result: &RunResult) -> String {
        let mut out = String::new();
        for unit in &result.units {
            let quiet = unit
                .migration
                .runs
                .iter()
                .all(|run| run.report.as_ref().is_none_or(|r| r.sites.is_empty()));
            if quiet {
                continue;
            }
            out.push_str(&self.format_unit(unit));
            out.push('\n');
        }
        out.push_str(&self.format_summary(result));
        out.push('\n');
        out
    }

    pub fn format_unit(&self, unit: &UnitResult) -> String {
        let migration = &unit.migration;
        let mut output = format!(
            "{}: {} rewritten, {} skipped\n",
            self.bold(&unit.file.display().to_string()),
            self.green(&migration.rewritten().to_string()),
            self.yellow(&migration.skipped().to_string()),
        );

        for run in &migration.runs {
            let Some(report) = &run.report else {
                output.push_str(&format!("  {}: {}\n", run.recipe, self.dim("not applicable")));
                continue;
            };
            for site in &report.sites {
                if let SiteOutcome::Skipped { reason } = site.outcome {
                    let call = Printer::print_expression(&unit.source.arena, site.call);
                    output.push_str(&format!(
                        "  {} {}: {}\n",
                        self.yellow("skipped"),
                        call,
                        reason
                    ));
                }
            }
        }

        if migration.changed() {
            let text = unit.source.print(migration.root);
            for line in text.lines() {
                output.push_str("  | ");
                output.push_str(line);
                output.push('\n');
            }
        }
        output
    }

    pub fn format_summary(&self, result: &RunResult) -> String {
        let mut summary = format!(
            "{} of {} units changed, {} call sites rewritten, {} skipped",
            result.changed_units(),
            result.units.len(),
            result.rewritten(),
            result.skipped()
        );
        if !result.written.is_empty() {
            summary.push_str(&format!(", {} files written", result.written.len()));
        }
        self.bold(&summary)
    }

    /// The built-in recipes with their metadata.
    pub fn render_catalog(&self, types: &TypeInterner) -> String {
        let mut out = String::new();
        for spec in CATALOG {
            let recipe = Recipe::from_spec(types, spec);
            out.push_str(&format!("{}\n", self.bold(spec.id)));
            out.push_str(&format!("    {}\n", recipe.display_name()));
            out.push_str(&format!("    {}\n", self.dim(&recipe.description())));
        }
        out
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn yellow(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    recipes: Vec<&'a str>,
    units: Vec<JsonUnit<'a>>,
    changed_units: usize,
    rewritten: usize,
    skipped: usize,
    written: &'a [std::path::PathBuf],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonUnit<'a> {
    file: String,
    path: &'a str,
    changed: bool,
    rewritten: usize,
    skipped: usize,
    runs: &'a [RecipeRun],
    /// Migrated source, present only for changed units.
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

pub fn render_json(result: &RunResult) -> Result<String> {
    let units = result
        .units
        .iter()
        .map(|unit| {
            let migration = &unit.migration;
            JsonUnit {
                file: unit.file.display().to_string(),
                path: &migration.path,
                changed: migration.changed(),
                rewritten: migration.rewritten(),
                skipped: migration.skipped(),
                runs: &migration.runs,
                source: migration
                    .changed()
                    .then(|| unit.source.print(migration.root)),
            }
        })
        .collect();
    let report = JsonReport {
        recipes: result.recipes.iter().map(|r| r.id.as_str()).collect(),
        units,
        changed_units: result.changed_units(),
        rewritten: result.rewritten(),
        skipped: result.skipped(),
        written: &result.written,
    };
    serde_json::to_string_pretty(&report).context("failed to serialize report")
}
