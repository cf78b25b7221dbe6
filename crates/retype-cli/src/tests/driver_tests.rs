use clap::Parser;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::args::CliArgs;
use crate::driver::{relative_unit_path, run};
use crate::reporter::{Reporter, render_json};

const GUAVA_LIST: &str = "com.google.common.collect.ImmutableList";

fn list_of(args: Vec<Value>) -> Value {
    let params: Vec<&str> = args.iter().map(|_| "java.lang.Object").collect();
    json!({
        "kind": "call",
        "target": { "kind": "typeName", "type": GUAVA_LIST },
        "name": "of",
        "args": args,
        "method": {
            "declaringType": GUAVA_LIST,
            "name": "of",
            "params": params,
            "returnType": "com.google.common.collect.ImmutableList<java.lang.String>"
        },
        "type": "com.google.common.collect.ImmutableList<java.lang.String>"
    })
}

/// A unit with one field initialized by `ImmutableList.of("a")` and declared
/// as `declared`.
fn unit_json(path: &str, java_version: u32, declared: &str) -> String {
    json!({
        "path": path,
        "javaVersion": java_version,
        "package": "com.example",
        "imports": [GUAVA_LIST],
        "classes": [{
            "name": "com.example.Names",
            "members": [{
                "kind": "field",
                "type": declared,
                "variables": [{ "name": "names", "init": list_of(vec![json!({ "kind": "literal", "value": "\"a\"", "type": "String" })]) }]
            }]
        }]
    })
    .to_string()
}

fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dirs");
    }
    std::fs::write(&path, contents).expect("write file");
    path
}

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["retype"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args")
}

fn project() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = temp.path();
    write_file(
        root,
        "units/Changed.unit.json",
        &unit_json("com/example/Changed.java", 11, "java.util.List<java.lang.String>"),
    );
    write_file(
        root,
        "units/Narrow.unit.json",
        &unit_json("com/example/Narrow.java", 11, "java.util.ArrayList<java.lang.String>"),
    );
    write_file(
        root,
        "units/legacy/Old.unit.json",
        &unit_json("com/example/Old.java", 8, "java.util.List<java.lang.String>"),
    );
    temp
}

#[test]
fn migrates_discovered_units() {
    let temp = project();
    let result = run(&args(&["--recipe", "no-guava-immutable-list-of", "units"]), temp.path())
        .expect("run succeeds");

    assert_eq!(result.units.len(), 3);
    assert_eq!(result.changed_units(), 1);
    assert_eq!(result.rewritten(), 1);
    assert_eq!(result.skipped(), 1);

    let changed = result
        .units
        .iter()
        .find(|u| u.migration.changed())
        .expect("one changed unit");
    assert!(changed.file.ends_with("units/Changed.unit.json"));
    assert_eq!(
        changed.source.print(changed.migration.root),
        "package com.example;\n\nimport java.util.List;\n\nclass Names {\n    List<String> names = List.of(\"a\");\n}\n"
    );
}

#[test]
fn config_file_drives_selection() {
    let temp = project();
    write_file(
        temp.path(),
        "retype.json",
        r#"{"recipes": ["no-guava-immutable-list-of"], "minJavaVersion": 8, "exclude": ["**/Narrow.*"]}"#,
    );

    let result = run(&args(&[]), temp.path()).expect("run succeeds");
    assert_eq!(result.units.len(), 2);
    assert_eq!(result.changed_units(), 2);
    assert_eq!(result.recipes.len(), 1);
}

#[test]
fn writes_migrated_sources_to_out_dir() {
    let temp = project();
    let result = run(&args(&["--out-dir", "out", "units"]), temp.path()).expect("run succeeds");

    let expected = temp.path().join("out/com/example/Changed.java");
    assert_eq!(result.written, vec![expected.clone()]);
    let text = std::fs::read_to_string(&expected).expect("written file");
    assert!(text.contains("List<String> names = List.of(\"a\");"));
}

#[test]
fn load_errors_name_the_document() {
    let temp = project();
    write_file(temp.path(), "units/Broken.unit.json", r#"{"path": "B.java", "classes": [{"name": ""}]}"#);

    let err = match run(&args(&["units"]), temp.path()) {
        Ok(_) => panic!("broken unit should fail the run"),
        Err(err) => format!("{err:#}"),
    };
    assert!(err.contains("Broken.unit.json"), "{err}");
    assert!(err.contains("class without a name"), "{err}");
}

#[test]
fn unit_paths_stay_inside_out_dir() {
    assert_eq!(
        relative_unit_path("/abs/../com/./Test.java"),
        PathBuf::from("abs/com/Test.java")
    );
    assert_eq!(relative_unit_path("Test.java"), PathBuf::from("Test.java"));
}

#[test]
fn reports_render_in_both_formats() {
    let temp = project();
    let result = run(&args(&["units"]), temp.path()).expect("run succeeds");

    let text = Reporter::new(false).render(&result);
    assert!(text.contains("Changed.unit.json: 1 rewritten, 0 skipped"), "{text}");
    assert!(
        text.contains("skipped ImmutableList.of(\"a\"): incompatible required type"),
        "{text}"
    );
    assert!(text.contains("  |     List<String> names = List.of(\"a\");"), "{text}");
    assert!(
        text.ends_with("1 of 3 units changed, 1 call sites rewritten, 1 skipped\n"),
        "{text}"
    );

    let json: Value = serde_json::from_str(&render_json(&result).expect("json")).expect("valid json");
    assert_eq!(json["changedUnits"], 1);
    assert_eq!(json["recipes"].as_array().map(Vec::len), Some(3));
    let units = json["units"].as_array().expect("units");
    assert_eq!(units.len(), 3);
    let changed: Vec<&Value> = units.iter().filter(|u| u["changed"] == true).collect();
    assert_eq!(changed.len(), 1);
    assert!(changed[0]["source"].as_str().is_some_and(|s| s.contains("List.of")));
    assert!(units.iter().filter(|u| u["changed"] == false).all(|u| u.get("source").is_none()));
}
