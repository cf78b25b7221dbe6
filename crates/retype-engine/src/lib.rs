//! Context-sensitive factory-call migration.
//!
//! Replaces calls such as `ImmutableList.of(..)` with `List.of(..)` where
//! the call's value is immediately down-cast to a type the replacement also
//! satisfies, and carries the new type into the enclosing declaration.
//!
//! - `matcher`: which calls are candidates
//! - `context`: whether a candidate's parent allows the replacement
//! - `synthesize`: the replacement call, with boxed parameter types
//! - `propagate`: declared types of rewritten initializers
//! - `driver`: the traversal tying them together

pub mod context;
pub mod driver;
pub mod imports;
pub mod matcher;
pub mod migration;
pub mod precondition;
pub mod propagate;
pub mod recipe;
pub mod rule;
pub mod synthesize;

pub use context::{SyntacticParent, classify, qualifies, syntactic_parent};
pub use driver::{RewriteEngine, RewriteReport, SiteOutcome, SiteReport, SkipReason};
pub use imports::{ImportDelta, ImportService, apply_import_delta};
pub use matcher::matches;
pub use migration::{RecipeRun, UnitMigration, migrate_all, migrate_unit};
pub use precondition::{AllOf, Precondition, UsesJavaVersion, UsesType};
pub use propagate::propagate;
pub use recipe::{CATALOG, Recipe, RecipeSpec, lookup_recipe};
pub use rule::RewriteRule;
pub use synthesize::{Replacement, synthesize};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;
#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod matcher_tests;
#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod context_tests;
#[cfg(test)]
#[path = "tests/synthesize_tests.rs"]
mod synthesize_tests;
#[cfg(test)]
#[path = "tests/propagate_tests.rs"]
mod propagate_tests;
#[cfg(test)]
#[path = "tests/imports_tests.rs"]
mod imports_tests;
#[cfg(test)]
#[path = "tests/precondition_tests.rs"]
mod precondition_tests;
#[cfg(test)]
#[path = "tests/recipe_tests.rs"]
mod recipe_tests;
