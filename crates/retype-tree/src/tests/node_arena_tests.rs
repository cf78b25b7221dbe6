use crate::parser::{Node, NodeArena, NodeIndex, NodeKind};
use retype_types::{MethodShape, TypeData, TypeId, TypeInterner};
use std::sync::Arc;

fn arena() -> NodeArena {
    NodeArena::new(Arc::new(TypeInterner::new()))
}

/// `x = ImmutableList.of("a")` inside `void f() { ... }`.
fn build_assignment(arena: &mut NodeArena) -> (NodeIndex, NodeIndex, NodeIndex) {
    let guava = arena.types().nominal("com.google.common.collect.ImmutableList");
    let receiver = arena.add_type_reference(guava);
    let arg = arena.add_literal("\"a\"", TypeId::STRING_LITERAL);
    let call = arena.add_method_invocation(receiver, "of", vec![arg], None, guava);
    let target = arena.add_variable_ref("x", guava);
    let assign = arena.add_assignment(target, call);
    let stmt = arena.add_expression_statement(assign);
    let body = arena.add_block(vec![stmt]);
    let method = arena.add_method_decl("f", None, vec![], body);
    (method, call, arg)
}

#[test]
fn test_children_are_created_before_parents() {
    let mut arena = arena();
    let (method, call, arg) = build_assignment(&mut arena);

    for idx in arena.descendants(method) {
        let node = arena.get(idx).expect("reachable node exists");
        for child in node.children() {
            assert!(child < idx, "child {child:?} of {idx:?} must be older");
        }
    }
    assert!(arg < call);
    assert!(call < method);
}

#[test]
fn test_typed_getters() {
    let mut arena = arena();
    let (method, call, arg) = build_assignment(&mut arena);

    assert_eq!(arena.kind(method), Some(NodeKind::MethodDecl));
    assert!(arena.get_call(call).is_some());
    assert!(arena.get_call(arg).is_none());
    assert_eq!(arena.type_of(arg), TypeId::STRING_LITERAL);
    assert_eq!(arena.type_of(NodeIndex::NONE), TypeId::UNKNOWN);
    assert!(arena.get(NodeIndex::NONE).is_none());

    let data = arena.get_call(call).expect("call data");
    assert_eq!(&*arena.resolve_name(data.name), "of");
    assert_eq!(data.args.nodes, vec![arg]);
}

#[test]
fn test_find_path_from_root_to_target() {
    let mut arena = arena();
    let (method, call, arg) = build_assignment(&mut arena);

    let path = arena.find_path(method, arg).expect("arg is reachable");
    assert_eq!(path.first(), Some(&method));
    assert_eq!(path.last(), Some(&arg));
    assert_eq!(path[path.len() - 2], call);

    let kinds: Vec<_> = path.iter().filter_map(|&idx| arena.kind(idx)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::MethodDecl,
            NodeKind::Block,
            NodeKind::ExpressionStatement,
            NodeKind::Assignment,
            NodeKind::MethodInvocation,
            NodeKind::Literal,
        ]
    );

    // Unrelated node: not reachable
    let stray = arena.add_literal("1", TypeId::INT);
    assert!(arena.find_path(method, stray).is_none());
}

#[test]
fn test_replace_copies_only_the_ancestor_path() {
    let mut arena = arena();
    let (method, call, arg) = build_assignment(&mut arena);
    let old_body = arena.get_method_decl(method).expect("method").body;

    let replacement = arena.add_literal("null", TypeId::OBJECT);
    let before = arena.len();
    let new_root = arena.replace(method, call, replacement);

    assert_ne!(new_root, method);
    // method, block, statement, assignment
    assert_eq!(arena.len(), before + 4);

    // The old tree still reaches the old call
    assert!(arena.find_path(method, call).is_some());
    assert!(arena.find_path(new_root, call).is_none());
    assert!(arena.find_path(new_root, replacement).is_some());
    assert!(arena.find_path(new_root, arg).is_none());

    // The assignment target is shared between both trees
    let Some(Node::Block(block)) = arena.get(old_body) else {
        panic!("expected block");
    };
    let old_stmt = block.statements.nodes[0];
    let old_target = match arena.get(old_stmt) {
        Some(Node::ExpressionStatement(stmt)) => match arena.get(stmt.expression) {
            Some(Node::Assignment(assign)) => assign.target,
            _ => panic!("expected assignment"),
        },
        _ => panic!("expected expression statement"),
    };
    assert!(arena.find_path(new_root, old_target).is_some());
}

#[test]
fn test_replace_root_and_unreachable_target() {
    let mut arena = arena();
    let (method, _, _) = build_assignment(&mut arena);
    let other = arena.add_literal("1", TypeId::INT);

    assert_eq!(arena.replace(method, method, other), other);
    let stray = arena.add_literal("2", TypeId::INT);
    assert_eq!(arena.replace(method, stray, other), method);
}

#[test]
fn test_rebuild_without_changes_returns_same_index() {
    let mut arena = arena();
    let (method, call, _) = build_assignment(&mut arena);
    let before = arena.len();

    assert_eq!(arena.rebuild(method, |child| child), method);
    assert_eq!(arena.len(), before);

    let replacement = arena.add_empty();
    let rebuilt = arena.rebuild(call, |_| replacement);
    assert_ne!(rebuilt, call);
    let data = arena.get_call(rebuilt).expect("rebuilt call");
    assert_eq!(data.select, replacement);
    assert_eq!(data.args.nodes, vec![replacement]);
}

#[test]
fn test_type_tree_uses_simple_names() {
    let mut arena = arena();
    let types = arena.types_arc();
    let list = types.intern_name("com.google.common.collect.ImmutableList");
    let string = types.nominal("java.lang.String");
    let ty = types.array(types.parameterized(list, vec![string]));

    let tree = arena.add_type_tree(ty);
    assert_eq!(arena.type_of(tree), ty);

    let Some(Node::ArrayType(array)) = arena.get(tree) else {
        panic!("expected array type");
    };
    let Some(Node::ParameterizedType(param)) = arena.get(array.element) else {
        panic!("expected parameterized type");
    };
    let base = arena.get_type_identifier(param.base).expect("base name");
    assert_eq!(&*arena.resolve_name(base.name), "ImmutableList");
    assert_eq!(
        types.lookup(base.ty),
        Some(TypeData::Nominal(list)),
        "base identifier carries the raw class"
    );
    let arg = arena.get_type_identifier(param.args.nodes[0]).expect("arg name");
    assert_eq!(&*arena.resolve_name(arg.name), "String");
}

#[test]
fn test_referenced_classes() {
    let mut arena = arena();
    let types = arena.types_arc();
    let (method, _, _) = build_assignment(&mut arena);
    let guava = types.intern_name("com.google.common.collect.ImmutableList");

    // Only the static receiver names ImmutableList; `x` is a variable.
    let names = arena.referenced_classes(method);
    assert_eq!(names, vec![guava]);
}

#[test]
fn test_method_shape_attached_to_call() {
    let mut arena = arena();
    let types = arena.types_arc();
    let target = types.nominal("java.util.List");
    let of = types.intern_name("of");
    let shape = MethodShape::new(target, of, [types.nominal("java.lang.Integer")], target);

    let arg = arena.add_literal("1", TypeId::INT);
    let call = arena.add_method_invocation(NodeIndex::NONE, "of", vec![arg], Some(shape.clone()), target);
    assert_eq!(arena.get_call(call).and_then(|c| c.method.clone()), Some(shape));
}
