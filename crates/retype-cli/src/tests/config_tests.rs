use clap::Parser;
use retype_types::TypeInterner;
use std::path::Path;

use crate::args::CliArgs;
use crate::config::{
    CONFIG_FILE_NAME, DEFAULT_INCLUDE, RuleConfig, find_config, parse_config, resolve_options,
};

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["retype"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args")
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("failed to write test file");
}

#[test]
fn parses_full_config() {
    let config = parse_config(
        r#"{
          "recipes": ["no-guava-immutable-list-of"],
          "rules": [{ "source": "org.legacy.OldList", "target": "java.util.List", "factoryMethod": "copyOf", "strictOuterCalls": "yes" }],
          "minJavaVersion": 11,
          "include": ["src/**/*.json"],
          "exclude": ["build/**"]
        }"#,
    )
    .expect("should parse");

    assert_eq!(config.recipes, Some(vec!["no-guava-immutable-list-of".to_string()]));
    assert_eq!(config.min_java_version, Some(11));
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.rules[0].factory_method.as_deref(), Some("copyOf"));
    assert_eq!(config.rules[0].strict_outer_calls, Some(true));
    assert_eq!(config.exclude, Some(vec!["build/**".to_string()]));
}

#[test]
fn boolean_options_accept_strings() {
    let rule: RuleConfig =
        serde_json::from_str(r#"{"source": "a.A", "target": "b.B", "strictOuterCalls": "false"}"#)
            .expect("string boolean");
    assert_eq!(rule.strict_outer_calls, Some(false));

    let rule: RuleConfig =
        serde_json::from_str(r#"{"source": "a.A", "target": "b.B", "strictOuterCalls": true}"#)
            .expect("plain boolean");
    assert_eq!(rule.strict_outer_calls, Some(true));

    let bad: Result<RuleConfig, _> =
        serde_json::from_str(r#"{"source": "a.A", "target": "b.B", "strictOuterCalls": "maybe"}"#);
    assert!(bad.is_err());
}

#[test]
fn defaults_run_the_whole_catalog() {
    let types = TypeInterner::new();
    let options = resolve_options(&types, &parse_config("{}").expect("empty"), &args(&[]))
        .expect("defaults resolve");

    let ids: Vec<&str> = options.recipes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "no-guava-immutable-list-of",
            "no-guava-immutable-set-of",
            "no-guava-immutable-map-of"
        ]
    );
    assert!(options.recipes.iter().all(|r| r.min_java_version == 9));
    assert_eq!(options.include, vec![DEFAULT_INCLUDE]);
    assert!(options.exclude.is_empty());
}

#[test]
fn command_line_overrides_config() {
    let types = TypeInterner::new();
    let config = parse_config(
        r#"{"recipes": ["no-guava-immutable-set-of"], "minJavaVersion": 11}"#,
    )
    .expect("config");

    let options = resolve_options(
        &types,
        &config,
        &args(&["--recipe", "no-guava-immutable-list-of", "--min-java-version", "17", "--strict-outer-calls"]),
    )
    .expect("resolves");
    assert_eq!(options.recipes.len(), 1);
    assert_eq!(options.recipes[0].id, "no-guava-immutable-list-of");
    assert_eq!(options.recipes[0].min_java_version, 17);
    assert!(options.recipes[0].rule.strict_outer_calls);

    let options = resolve_options(&types, &config, &args(&[])).expect("resolves");
    assert_eq!(options.recipes[0].id, "no-guava-immutable-set-of");
    assert_eq!(options.recipes[0].min_java_version, 11);
}

#[test]
fn custom_rules_only() {
    let types = TypeInterner::new();
    let config = parse_config(
        r#"{"rules": [{"id": "old-list", "source": "org.legacy.OldList", "target": "java.util.List", "strictOuterCalls": "on"}]}"#,
    )
    .expect("config");

    let options = resolve_options(&types, &config, &args(&[])).expect("resolves");
    assert_eq!(options.recipes.len(), 1);
    let recipe = &options.recipes[0];
    assert_eq!(recipe.id, "old-list");
    assert!(recipe.rule.strict_outer_calls);
    assert_eq!(recipe.display_name(), "Prefer `List.of(..)` in Java 9 or higher");
}

#[test]
fn rejects_invalid_configs() {
    let types = TypeInterner::new();
    let cases = [
        (r#"{"recipes": ["no-such-recipe"]}"#, "unknown recipe 'no-such-recipe'"),
        (r#"{"recipes": []}"#, "no recipes selected"),
        (r#"{"rules": [{"source": "", "target": "java.util.List"}]}"#, "source must not be empty"),
        (
            r#"{"rules": [{"source": "java.util.List", "target": "java.util.List"}]}"#,
            "source and target are both 'java.util.List'",
        ),
        (
            r#"{"rules": [{"source": "a.Old", "target": "java.util.List<java.lang.String>"}]}"#,
            "is not a class name",
        ),
        (
            r#"{"rules": [{"source": "a.Old", "target": "b.New", "factoryMethod": " "}]}"#,
            "factoryMethod must not be empty",
        ),
    ];
    for (json, expected) in cases {
        let config = parse_config(json).expect("parses");
        let err = resolve_options(&types, &config, &args(&[])).expect_err(json);
        let message = format!("{err:#}");
        assert!(message.contains(expected), "{json}: {message}");
    }
}

#[test]
fn finds_default_config_in_working_directory() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config = find_config(&args(&[]), temp.path()).expect("no config is fine");
    assert!(config.recipes.is_none());

    write_file(temp.path(), CONFIG_FILE_NAME, r#"{"minJavaVersion": 21}"#);
    let config = find_config(&args(&[]), temp.path()).expect("default config");
    assert_eq!(config.min_java_version, Some(21));

    write_file(temp.path(), "other.json", r#"{"minJavaVersion": 10}"#);
    let config = find_config(&args(&["--config", "other.json"]), temp.path()).expect("explicit config");
    assert_eq!(config.min_java_version, Some(10));

    let missing = find_config(&args(&["--config", "missing.json"]), temp.path());
    assert!(missing.is_err());
}
