//! Import list maintenance.
//!
//! The rewrite engine only records which classes it started and stopped
//! referencing; `apply_import_delta` turns that into an edited import list
//! once the whole unit has been migrated.

use indexmap::IndexSet;
use retype_common::Atom;
use retype_tree::{CompilationUnitData, Node, NodeArena, NodeIndex, NodeList};
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::debug;

/// Receiver of import requests from the rewrite engine.
pub trait ImportService {
    fn add_import(&mut self, fq_name: Atom);
    fn remove_import(&mut self, fq_name: Atom);
}

/// Ordered, de-duplicated import requests of one or more engine runs.
#[derive(Clone, Debug, Default)]
pub struct ImportDelta {
    pub added: IndexSet<Atom, FxBuildHasher>,
    pub removed: IndexSet<Atom, FxBuildHasher>,
}

impl ImportDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl ImportService for ImportDelta {
    fn add_import(&mut self, fq_name: Atom) {
        self.added.insert(fq_name);
    }

    fn remove_import(&mut self, fq_name: Atom) {
        self.removed.insert(fq_name);
    }
}

/// Classes in `java.lang` are never imported.
fn is_implicitly_imported(fq_name: &str) -> bool {
    fq_name
        .strip_prefix("java.lang.")
        .is_some_and(|rest| !rest.contains('.'))
}

fn package_of(fq_name: &str) -> &str {
    fq_name.rfind('.').map_or("", |dot| &fq_name[..dot])
}

/// Apply `delta` to the import list of the compilation unit at `root`.
///
/// Requested imports are added unless already covered (same import, a
/// wildcard of its package, the unit's own package, or `java.lang`).
/// Requested removals only happen when nothing in the unit still names the
/// class. Returns the new root, or `root` when the list is unchanged.
pub fn apply_import_delta(arena: &mut NodeArena, root: NodeIndex, delta: &ImportDelta) -> NodeIndex {
    if delta.is_empty() {
        return root;
    }
    let Some(unit) = arena.get_compilation_unit(root).cloned() else {
        return root;
    };
    let types = arena.types_arc();
    let referenced: FxHashSet<Atom> = arena.referenced_classes(root).into_iter().collect();

    let mut imports = Vec::with_capacity(unit.imports.len() + delta.added.len());
    let mut present: FxHashSet<Atom> = FxHashSet::default();
    let mut changed = false;
    for &import in &unit.imports.nodes {
        if let Some(data) = arena.get_import(import)
            && !data.is_static
            && delta.removed.contains(&data.qualified_name)
            && !referenced.contains(&data.qualified_name)
        {
            debug!(import = %types.resolve_name(data.qualified_name), "removing unused import");
            changed = true;
            continue;
        }
        if let Some(data) = arena.get_import(import) {
            present.insert(data.qualified_name);
        }
        imports.push(import);
    }

    let unit_package = unit.package.map(|p| types.resolve_name(p));
    for &fq_name in &delta.added {
        if present.contains(&fq_name) {
            continue;
        }
        let name = types.resolve_name(fq_name);
        let package = package_of(&name);
        let wildcard = format!("{package}.*");
        let covered = is_implicitly_imported(&name)
            || unit_package.as_deref() == Some(package)
            || types
                .lookup_name(&wildcard)
                .is_some_and(|atom| present.contains(&atom));
        if covered {
            continue;
        }
        debug!(import = %name, "adding import");
        imports.push(arena.add_import(&name, false));
        present.insert(fq_name);
        changed = true;
    }

    if !changed {
        return root;
    }
    arena.add(Node::CompilationUnit(CompilationUnitData {
        imports: NodeList::from(imports),
        ..unit
    }))
}
