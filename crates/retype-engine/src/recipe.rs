//! Recipes: a rewrite rule plus its metadata and applicability gate.

use crate::precondition::{AllOf, Precondition, UsesJavaVersion, UsesType};
use crate::rule::RewriteRule;
use once_cell::sync::Lazy;
use retype_types::{TypeInterner, short_name};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::time::Duration;

/// Language level that introduced the immutable collection factories.
pub const DEFAULT_MIN_JAVA_VERSION: u32 = 9;

const EFFORT_PER_OCCURRENCE: Duration = Duration::from_secs(10 * 60);

/// Static description of a built-in recipe.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSpec {
    pub id: &'static str,
    pub source: &'static str,
    pub target: &'static str,
}

pub static CATALOG: &[RecipeSpec] = &[
    RecipeSpec {
        id: "no-guava-immutable-list-of",
        source: "com.google.common.collect.ImmutableList",
        target: "java.util.List",
    },
    RecipeSpec {
        id: "no-guava-immutable-set-of",
        source: "com.google.common.collect.ImmutableSet",
        target: "java.util.Set",
    },
    RecipeSpec {
        id: "no-guava-immutable-map-of",
        source: "com.google.common.collect.ImmutableMap",
        target: "java.util.Map",
    },
];

static CATALOG_BY_ID: Lazy<FxHashMap<&'static str, &'static RecipeSpec>> =
    Lazy::new(|| CATALOG.iter().map(|spec| (spec.id, spec)).collect());

pub fn lookup_recipe(id: &str) -> Option<&'static RecipeSpec> {
    CATALOG_BY_ID.get(id).copied()
}

#[derive(Clone, Debug)]
pub struct Recipe {
    pub id: String,
    pub rule: RewriteRule,
    pub min_java_version: u32,
    source: String,
    target: String,
    factory_method: String,
}

impl Recipe {
    pub fn from_spec(types: &TypeInterner, spec: &RecipeSpec) -> Self {
        Recipe::custom(types, spec.id, spec.source, spec.target)
    }

    /// Built-in recipe by id.
    pub fn builtin(types: &TypeInterner, id: &str) -> Option<Self> {
        lookup_recipe(id).map(|spec| Recipe::from_spec(types, spec))
    }

    pub fn custom(types: &TypeInterner, id: &str, source: &str, target: &str) -> Self {
        Recipe {
            id: id.to_string(),
            rule: RewriteRule::new(types, source, target),
            min_java_version: DEFAULT_MIN_JAVA_VERSION,
            source: source.to_string(),
            target: target.to_string(),
            factory_method: crate::rule::DEFAULT_FACTORY_METHOD.to_string(),
        }
    }

    pub fn with_factory_method(mut self, types: &TypeInterner, name: &str) -> Self {
        self.rule = self.rule.with_factory_method(types, name);
        self.factory_method = name.to_string();
        self
    }

    pub fn with_strict_outer_calls(mut self, strict: bool) -> Self {
        self.rule = self.rule.with_strict_outer_calls(strict);
        self
    }

    pub fn with_min_java_version(mut self, version: u32) -> Self {
        self.min_java_version = version;
        self
    }

    pub fn display_name(&self) -> String {
        format!(
            "Prefer `{}.{}(..)` in Java {} or higher",
            short_name(&self.target),
            self.factory_method,
            self.min_java_version
        )
    }

    pub fn description(&self) -> String {
        format!(
            "Replaces `{}.{}(..)` if the returned type is immediately down-cast.",
            short_name(&self.source),
            self.factory_method
        )
    }

    pub fn estimated_effort_per_occurrence(&self) -> Duration {
        EFFORT_PER_OCCURRENCE
    }

    /// Runs only on units at the minimum language level that use the source
    /// class.
    pub fn precondition(&self) -> AllOf {
        let gates: Vec<Box<dyn Precondition>> = vec![
            Box::new(UsesJavaVersion {
                min: self.min_java_version,
            }),
            Box::new(UsesType {
                fq_name: self.rule.source,
            }),
        ];
        AllOf(gates)
    }
}
