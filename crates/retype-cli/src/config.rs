use anyhow::{Context, Result, bail};
use retype_engine::recipe::DEFAULT_MIN_JAVA_VERSION;
use retype_engine::{CATALOG, Recipe, lookup_recipe};
use retype_types::{TypeData, TypeInterner, parse_type};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "retype.json";

/// Units matched when neither the config nor the command line names a pattern.
pub const DEFAULT_INCLUDE: &str = "**/*.unit.json";

/// Accepts both `true` and `"true"` for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RetypeConfig {
    /// Built-in recipe ids. `None` runs the whole catalog unless custom
    /// rules are given.
    #[serde(default)]
    pub recipes: Option<Vec<String>>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub min_java_version: Option<u32>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

/// A user-defined `source.factoryMethod(..)` to `target.factoryMethod(..)` rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub factory_method: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict_outer_calls: Option<bool>,
}

impl RuleConfig {
    fn id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-to-{}", self.source, self.target))
    }
}

pub fn parse_config(source: &str) -> Result<RetypeConfig> {
    let config = serde_json::from_str(source).context("failed to parse retype config JSON")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RetypeConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// The config named by `--config`, else `retype.json` in `cwd` when it
/// exists, else the defaults.
pub fn find_config(args: &CliArgs, cwd: &Path) -> Result<RetypeConfig> {
    if let Some(path) = &args.config {
        return load_config(&cwd.join(path));
    }
    let default_path = cwd.join(CONFIG_FILE_NAME);
    if default_path.is_file() {
        return load_config(&default_path);
    }
    Ok(RetypeConfig::default())
}

/// Options after merging the config file with command-line overrides.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub recipes: Vec<Recipe>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

pub fn resolve_options(
    types: &TypeInterner,
    config: &RetypeConfig,
    args: &CliArgs,
) -> Result<ResolvedOptions> {
    let min_java_version = args
        .min_java_version
        .or(config.min_java_version)
        .unwrap_or(DEFAULT_MIN_JAVA_VERSION);

    let ids: Vec<String> = if !args.recipes.is_empty() {
        args.recipes.clone()
    } else if let Some(ids) = &config.recipes {
        ids.clone()
    } else if config.rules.is_empty() {
        CATALOG.iter().map(|spec| spec.id.to_string()).collect()
    } else {
        Vec::new()
    };

    let mut recipes = Vec::with_capacity(ids.len() + config.rules.len());
    for id in &ids {
        let Some(spec) = lookup_recipe(id) else {
            bail!("unknown recipe '{id}'");
        };
        recipes.push(Recipe::from_spec(types, spec));
    }
    for rule in &config.rules {
        let recipe =
            resolve_rule(types, rule).with_context(|| format!("invalid rule '{}'", rule.id()))?;
        recipes.push(recipe);
    }
    if recipes.is_empty() {
        bail!("no recipes selected");
    }

    let recipes = recipes
        .into_iter()
        .map(|recipe| {
            let strict = args.strict_outer_calls || recipe.rule.strict_outer_calls;
            recipe
                .with_min_java_version(min_java_version)
                .with_strict_outer_calls(strict)
        })
        .collect();

    Ok(ResolvedOptions {
        recipes,
        include: config
            .include
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_INCLUDE.to_string()]),
        exclude: config.exclude.clone().unwrap_or_default(),
    })
}

fn resolve_rule(types: &TypeInterner, rule: &RuleConfig) -> Result<Recipe> {
    validate_class_name(types, "source", &rule.source)?;
    validate_class_name(types, "target", &rule.target)?;
    if rule.source == rule.target {
        bail!("source and target are both '{}'", rule.source);
    }
    let mut recipe = Recipe::custom(types, &rule.id(), &rule.source, &rule.target);
    if let Some(method) = &rule.factory_method {
        if method.trim().is_empty() {
            bail!("factoryMethod must not be empty");
        }
        recipe = recipe.with_factory_method(types, method.trim());
    }
    Ok(recipe.with_strict_outer_calls(rule.strict_outer_calls.unwrap_or(false)))
}

fn validate_class_name(types: &TypeInterner, field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("{field} must not be empty");
    }
    let ty = parse_type(types, name).with_context(|| format!("{field} '{name}'"))?;
    if !matches!(types.lookup(ty), Some(TypeData::Nominal(_))) {
        bail!("{field} '{name}' is not a class name");
    }
    Ok(())
}
