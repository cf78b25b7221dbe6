//! Applicability gates evaluated before a unit is traversed.

use retype_common::Atom;
use retype_tree::{Node, NodeArena, NodeIndex};
use retype_types::{TypeInterner, contains_nominal, fully_qualified_name};

pub trait Precondition: Send + Sync {
    fn is_applicable(&self, arena: &NodeArena, root: NodeIndex) -> bool;

    fn describe(&self, types: &TypeInterner) -> String;
}

/// The unit declares at least the given language level. A unit without a
/// declared level is not applicable.
#[derive(Clone, Copy, Debug)]
pub struct UsesJavaVersion {
    pub min: u32,
}

impl Precondition for UsesJavaVersion {
    fn is_applicable(&self, arena: &NodeArena, root: NodeIndex) -> bool {
        arena
            .get_compilation_unit(root)
            .and_then(|unit| unit.java_version)
            .is_some_and(|version| version >= self.min)
    }

    fn describe(&self, _types: &TypeInterner) -> String {
        format!("uses Java {} or higher", self.min)
    }
}

/// The unit imports the class or refers to it in any resolved type,
/// including nested type arguments and resolved method signatures.
#[derive(Clone, Copy, Debug)]
pub struct UsesType {
    pub fq_name: Atom,
}

impl UsesType {
    fn imports_type(&self, arena: &NodeArena, root: NodeIndex) -> bool {
        let Some(unit) = arena.get_compilation_unit(root) else {
            return false;
        };
        let types = arena.types();
        let name = types.resolve_name(self.fq_name);
        let wildcard = name
            .rfind('.')
            .and_then(|dot| types.lookup_name(&format!("{}.*", &name[..dot])));
        unit.imports.nodes.iter().any(|&import| {
            arena.get_import(import).is_some_and(|data| {
                data.qualified_name == self.fq_name || Some(data.qualified_name) == wildcard
            })
        })
    }
}

impl Precondition for UsesType {
    fn is_applicable(&self, arena: &NodeArena, root: NodeIndex) -> bool {
        if self.imports_type(arena, root) {
            return true;
        }
        let types = arena.types();
        arena.descendants(root).into_iter().any(|idx| {
            if contains_nominal(types, arena.type_of(idx), self.fq_name) {
                return true;
            }
            let method = match arena.get(idx) {
                Some(Node::MethodInvocation(call)) => call.method.as_ref(),
                Some(Node::NewClass(new)) => new.constructor.as_ref(),
                _ => None,
            };
            method.is_some_and(|m| fully_qualified_name(types, m.declaring_type) == Some(self.fq_name))
        })
    }

    fn describe(&self, types: &TypeInterner) -> String {
        format!("uses type {}", types.resolve_name(self.fq_name))
    }
}

/// All inner preconditions hold.
pub struct AllOf(pub Vec<Box<dyn Precondition>>);

impl Precondition for AllOf {
    fn is_applicable(&self, arena: &NodeArena, root: NodeIndex) -> bool {
        self.0.iter().all(|p| p.is_applicable(arena, root))
    }

    fn describe(&self, types: &TypeInterner) -> String {
        self.0
            .iter()
            .map(|p| p.describe(types))
            .collect::<Vec<_>>()
            .join(" and ")
    }
}
