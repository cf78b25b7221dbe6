use crate::fixtures::{Fixture, GUAVA_LIST, JAVA_LIST};
use crate::imports::{ImportDelta, ImportService, apply_import_delta};
use retype_tree::{NodeArena, NodeIndex};

fn import_names(arena: &NodeArena, root: NodeIndex) -> Vec<String> {
    let unit = arena.get_compilation_unit(root).expect("unit");
    unit.imports
        .nodes
        .iter()
        .filter_map(|&i| arena.get_import(i))
        .map(|i| arena.resolve_name(i.qualified_name).to_string())
        .collect()
}

fn delta(fx: &Fixture, add: &[&str], remove: &[&str]) -> ImportDelta {
    let mut delta = ImportDelta::new();
    for name in add {
        delta.add_import(fx.types.intern_name(name));
    }
    for name in remove {
        delta.remove_import(fx.types.intern_name(name));
    }
    delta
}

#[test]
fn test_delta_deduplicates_in_order() {
    let fx = Fixture::new();
    let d = delta(&fx, &[JAVA_LIST, "java.util.Set", JAVA_LIST], &[GUAVA_LIST, GUAVA_LIST]);
    assert_eq!(d.added.len(), 2);
    assert_eq!(d.removed.len(), 1);
    assert_eq!(d.added.first(), Some(&fx.types.intern_name(JAVA_LIST)));
    assert!(ImportDelta::new().is_empty());
}

#[test]
fn test_apply_replaces_unused_import() {
    let mut fx = Fixture::new();
    let unit = fx.unit(None, vec![]);

    let d = delta(&fx, &[JAVA_LIST], &[GUAVA_LIST]);
    let new_root = apply_import_delta(&mut fx.arena, unit, &d);
    assert_ne!(new_root, unit);
    assert_eq!(import_names(&fx.arena, new_root), vec![JAVA_LIST]);
    // The original unit keeps its imports
    assert_eq!(import_names(&fx.arena, unit), vec![GUAVA_LIST]);
}

#[test]
fn test_apply_keeps_import_still_referenced() {
    let mut fx = Fixture::new();
    // A skipped site still names ImmutableList
    let call = fx.guava_of(vec![], GUAVA_LIST);
    let stmt = fx.arena.add_expression_statement(call);
    let unit = fx.unit(None, vec![stmt]);

    let d = delta(&fx, &[JAVA_LIST], &[GUAVA_LIST]);
    let new_root = apply_import_delta(&mut fx.arena, unit, &d);
    assert_eq!(import_names(&fx.arena, new_root), vec![GUAVA_LIST, JAVA_LIST]);
}

#[test]
fn test_apply_skips_covered_imports() {
    let mut fx = Fixture::new();
    let wildcard = fx.arena.add_import("java.util.*", false);
    let unit = fx.arena.add_compilation_unit(
        "A.java",
        Some(11),
        Some("com.example"),
        vec![wildcard],
        vec![],
    );

    let d = delta(
        &fx,
        &[JAVA_LIST, "java.lang.Integer", "com.example.Sibling"],
        &[],
    );
    assert_eq!(apply_import_delta(&mut fx.arena, unit, &d), unit);

    // Nested java.lang packages are not implicit
    let d = delta(&fx, &["java.lang.reflect.Method"], &[]);
    let new_root = apply_import_delta(&mut fx.arena, unit, &d);
    assert_eq!(
        import_names(&fx.arena, new_root),
        vec!["java.util.*", "java.lang.reflect.Method"]
    );
}

#[test]
fn test_apply_empty_delta_is_noop() {
    let mut fx = Fixture::new();
    let unit = fx.unit(None, vec![]);
    let before = fx.arena.len();
    assert_eq!(apply_import_delta(&mut fx.arena, unit, &ImportDelta::new()), unit);
    assert_eq!(fx.arena.len(), before);
}
