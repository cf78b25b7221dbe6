use crate::fixtures::{Fixture, GUAVA_LIST};
use crate::precondition::{AllOf, Precondition, UsesJavaVersion, UsesType};
use retype_types::TypeId;

#[test]
fn test_uses_java_version() {
    let mut fx = Fixture::new();
    let unit = fx.unit(None, vec![]);

    assert!(UsesJavaVersion { min: 9 }.is_applicable(&fx.arena, unit));
    assert!(UsesJavaVersion { min: 11 }.is_applicable(&fx.arena, unit));
    assert!(!UsesJavaVersion { min: 17 }.is_applicable(&fx.arena, unit));

    let unknown = fx
        .arena
        .add_compilation_unit("B.java", None, None, vec![], vec![]);
    assert!(!UsesJavaVersion { min: 1 }.is_applicable(&fx.arena, unknown));
}

#[test]
fn test_uses_type_by_import() {
    let mut fx = Fixture::new();
    let unit = fx.unit(None, vec![]);
    let gate = UsesType {
        fq_name: fx.types.intern_name(GUAVA_LIST),
    };
    assert!(gate.is_applicable(&fx.arena, unit));

    let wildcard = fx.arena.add_import("com.google.common.collect.*", false);
    let by_wildcard = fx
        .arena
        .add_compilation_unit("W.java", Some(11), None, vec![wildcard], vec![]);
    assert!(gate.is_applicable(&fx.arena, by_wildcard));

    let other = fx.arena.add_import("java.util.List", false);
    let without = fx
        .arena
        .add_compilation_unit("N.java", Some(11), None, vec![other], vec![]);
    assert!(!gate.is_applicable(&fx.arena, without));
}

#[test]
fn test_uses_type_in_nested_type_argument() {
    let mut fx = Fixture::new();
    let declared = fx.ty("java.util.Map<java.lang.String, com.google.common.collect.ImmutableList>");
    let variable = fx.arena.add_named_variable("m", declared, retype_tree::NodeIndex::NONE);
    let decls = fx.arena.add_variable_decls(declared, vec![variable]);
    let class = fx.arena.add_class("com.example.M", vec![decls]);
    let unit = fx
        .arena
        .add_compilation_unit("M.java", Some(11), None, vec![], vec![class]);

    let gate = UsesType {
        fq_name: fx.types.intern_name(GUAVA_LIST),
    };
    assert!(gate.is_applicable(&fx.arena, unit));
}

#[test]
fn test_uses_type_by_resolved_method() {
    let mut fx = Fixture::new();
    let receiver = fx.arena.add_identifier("lists", TypeId::UNKNOWN);
    let shape = retype_types::MethodShape::new(
        fx.ty(GUAVA_LIST),
        fx.types.intern_name("builder"),
        Vec::new(),
        TypeId::UNKNOWN,
    );
    let call = fx
        .arena
        .add_method_invocation(receiver, "builder", vec![], Some(shape), TypeId::UNKNOWN);
    let stmt = fx.arena.add_expression_statement(call);
    let body = fx.arena.add_block(vec![stmt]);
    let method = fx.arena.add_method_decl("m", None, vec![], body);
    let class = fx.arena.add_class("com.example.C", vec![method]);
    let unit = fx
        .arena
        .add_compilation_unit("C.java", Some(11), None, vec![], vec![class]);

    let gate = UsesType {
        fq_name: fx.types.intern_name(GUAVA_LIST),
    };
    assert!(gate.is_applicable(&fx.arena, unit));
}

#[test]
fn test_all_of() {
    let mut fx = Fixture::new();
    let unit = fx.unit(None, vec![]);
    let uses = UsesType {
        fq_name: fx.types.intern_name(GUAVA_LIST),
    };

    let pass = AllOf(vec![Box::new(UsesJavaVersion { min: 9 }), Box::new(uses)]);
    assert!(pass.is_applicable(&fx.arena, unit));
    assert_eq!(
        pass.describe(&fx.types),
        format!("uses Java 9 or higher and uses type {GUAVA_LIST}")
    );

    let fail = AllOf(vec![Box::new(UsesJavaVersion { min: 21 }), Box::new(uses)]);
    assert!(!fail.is_applicable(&fx.arena, unit));

    assert!(AllOf(vec![]).is_applicable(&fx.arena, unit));
}
