//! JSON unit builders shared by the integration tests.

#![allow(dead_code)]

use retype_engine::{ImportDelta, RewriteEngine, RewriteReport, RewriteRule, apply_import_delta};
use retype_tree::{NodeIndex, SourceFile, parse_unit_json};
use retype_types::TypeInterner;
use serde_json::{Value, json};
use std::sync::Arc;

pub const GUAVA_LIST: &str = "com.google.common.collect.ImmutableList";
pub const GUAVA_SET: &str = "com.google.common.collect.ImmutableSet";
pub const JAVA_LIST: &str = "java.util.List";

pub fn lit(value: &str, ty: &str) -> Value {
    json!({ "kind": "literal", "value": value, "type": ty })
}

pub fn string(value: &str) -> Value {
    lit(&format!("\"{value}\""), "String")
}

pub fn int(value: i32) -> Value {
    lit(&value.to_string(), "int")
}

pub fn name(name: &str, ty: &str) -> Value {
    json!({ "kind": "name", "name": name, "type": ty })
}

/// `Class.of(args..)` attributed to the class's `of(E...)`.
pub fn factory_call(class: &str, args: Vec<Value>, return_type: &str) -> Value {
    let params: Vec<&str> = args.iter().map(|_| "java.lang.Object").collect();
    json!({
        "kind": "call",
        "target": { "kind": "typeName", "type": class },
        "name": "of",
        "args": args,
        "method": {
            "declaringType": class,
            "name": "of",
            "params": params,
            "returnType": return_type
        },
        "type": return_type
    })
}

pub fn guava_of(args: Vec<Value>, return_type: &str) -> Value {
    factory_call(GUAVA_LIST, args, return_type)
}

pub fn local(ty: &str, var: &str, init: Value) -> Value {
    json!({ "kind": "local", "type": ty, "variables": [{ "name": var, "init": init }] })
}

pub fn ret(expr: Value) -> Value {
    json!({ "kind": "return", "expr": expr })
}

pub fn expr(expr: Value) -> Value {
    json!({ "kind": "expr", "expr": expr })
}

/// `class Test { <return_type> m() { body } }` in package `com.example`.
pub fn unit(java_version: Option<u32>, imports: &[&str], return_type: Option<&str>, body: Vec<Value>) -> Value {
    let mut method = json!({ "kind": "method", "name": "m", "body": body });
    if let Some(ty) = return_type {
        method["returnType"] = json!(ty);
    }
    json!({
        "path": "src/main/java/com/example/Test.java",
        "javaVersion": java_version,
        "package": "com.example",
        "imports": imports,
        "classes": [{ "name": "com.example.Test", "members": [method] }]
    })
}

pub fn guava_unit(return_type: Option<&str>, body: Vec<Value>) -> Value {
    unit(Some(11), &[GUAVA_LIST], return_type, body)
}

pub fn load(types: &Arc<TypeInterner>, doc: &Value) -> SourceFile {
    parse_unit_json(Arc::clone(types), &doc.to_string()).expect("unit document loads")
}

pub fn list_rule(types: &TypeInterner) -> RewriteRule {
    RewriteRule::new(types, GUAVA_LIST, JAVA_LIST)
}

pub struct Migrated {
    pub file: SourceFile,
    pub before: NodeIndex,
    pub after: NodeIndex,
    pub report: RewriteReport,
    pub imports: ImportDelta,
}

impl Migrated {
    pub fn text(&self) -> String {
        self.file.print(self.after)
    }

    pub fn original_text(&self) -> String {
        self.file.print(self.before)
    }
}

/// Load `doc`, run `rule` over it, and apply the import changes.
pub fn migrate(types: &Arc<TypeInterner>, doc: &Value, rule: RewriteRule) -> Migrated {
    let mut file = load(types, doc);
    let before = file.root;
    let mut imports = ImportDelta::new();
    let report = RewriteEngine::new(rule).run(&mut file.arena, before, &mut imports);
    let after = apply_import_delta(&mut file.arena, report.root, &imports);
    Migrated {
        file,
        before,
        after,
        report,
        imports,
    }
}

/// Expected printed unit for a single method body.
pub fn expected_unit(imports: &[&str], method: &str) -> String {
    let mut out = String::from("package com.example;\n\n");
    for import in imports {
        out.push_str(&format!("import {import};\n"));
    }
    if !imports.is_empty() {
        out.push('\n');
    }
    out.push_str("class Test {\n");
    for line in method.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}
