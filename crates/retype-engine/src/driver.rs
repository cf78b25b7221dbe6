//! Rewrite engine driver.
//!
//! Walks a unit depth-first, children before their parent, left to right.
//! Every matched call site is classified against its direct parent, replaced
//! when the context qualifies, and recorded in the report either way. When a
//! variable declaration has been walked, its declared type is propagated if
//! one of its initializers was replaced.
//!
//! The tree is never mutated: changed nodes are pushed as new nodes and the
//! run yields a new root that shares every untouched subtree with the old
//! one.

use crate::context::{classify, qualifies};
use crate::imports::ImportService;
use crate::matcher::matches;
use crate::precondition::Precondition;
use crate::propagate::propagate;
use crate::rule::RewriteRule;
use crate::synthesize::synthesize;
use retype_common::limits::MAX_TREE_DEPTH;
use retype_tree::{NodeArena, NodeIndex, NodeKind};
use retype_types::TypeId;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Why a matched call site was left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// A type needed for the decision could not be resolved.
    UnresolvedType,
    /// The call's parent is not a downcast context.
    UnsupportedContext,
    /// The enclosing call or constructor signature has no parameter at the
    /// call's position.
    MalformedSignature,
    /// The context requires a type other than the target, the source, or
    /// `Object`, wider or narrower.
    IncompatibleRequiredType,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            SkipReason::UnresolvedType => "unresolved type",
            SkipReason::UnsupportedContext => "unsupported context",
            SkipReason::MalformedSignature => "malformed signature",
            SkipReason::IncompatibleRequiredType => "incompatible required type",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum SiteOutcome {
    Rewritten { replacement: NodeIndex },
    Skipped { reason: SkipReason },
}

/// One matched call site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    /// Index of the call in the tree that was traversed.
    pub call: NodeIndex,
    /// Type required by the call's context, when it could be derived.
    #[serde(skip)]
    pub required: Option<TypeId>,
    #[serde(flatten)]
    pub outcome: SiteOutcome,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteReport {
    pub root: NodeIndex,
    pub changed: bool,
    pub sites: Vec<SiteReport>,
    /// New declarations whose declared type was propagated.
    pub propagated: Vec<NodeIndex>,
}

impl RewriteReport {
    pub fn rewritten(&self) -> usize {
        self.sites
            .iter()
            .filter(|s| matches!(s.outcome, SiteOutcome::Rewritten { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.sites.len() - self.rewritten()
    }
}

/// Per-declaration propagation state, created when a `VariableDecls` is
/// entered and dropped when it is left.
#[derive(Clone, Copy, Debug, Default)]
struct DeclarationScope {
    /// One of the declared variables is initialized by a replaced call.
    initializer_rewritten: bool,
}

pub struct RewriteEngine {
    rule: RewriteRule,
}

impl RewriteEngine {
    pub fn new(rule: RewriteRule) -> Self {
        RewriteEngine { rule }
    }

    /// Migrate the tree at `root`. Imports are requested from `imports`
    /// once per replaced call.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.0))]
    pub fn run(
        &self,
        arena: &mut NodeArena,
        root: NodeIndex,
        imports: &mut dyn ImportService,
    ) -> RewriteReport {
        let mut traversal = Traversal {
            rule: &self.rule,
            arena,
            imports,
            path: Vec::new(),
            scopes: Vec::new(),
            replacements: FxHashSet::default(),
            report: RewriteReport::default(),
        };
        let new_root = traversal.visit(root, 0);
        let mut report = traversal.report;
        report.root = new_root;
        report.changed = new_root != root;
        debug!(
            sites = report.sites.len(),
            rewritten = report.rewritten(),
            changed = report.changed,
            "rewrite finished"
        );
        report
    }

    /// Like `run`, but only when `gate` accepts the unit.
    pub fn run_if_applicable(
        &self,
        arena: &mut NodeArena,
        root: NodeIndex,
        gate: &dyn Precondition,
        imports: &mut dyn ImportService,
    ) -> Option<RewriteReport> {
        if !gate.is_applicable(arena, root) {
            debug!(gate = %gate.describe(arena.types()), "unit not applicable");
            return None;
        }
        Some(self.run(arena, root, imports))
    }
}

struct Traversal<'a> {
    rule: &'a RewriteRule,
    arena: &'a mut NodeArena,
    imports: &'a mut dyn ImportService,
    /// Ancestors of the node being visited, in original indices.
    path: Vec<NodeIndex>,
    scopes: Vec<DeclarationScope>,
    /// Calls synthesized during this run.
    replacements: FxHashSet<NodeIndex>,
    report: RewriteReport,
}

impl Traversal<'_> {
    fn visit(&mut self, idx: NodeIndex, depth: u32) -> NodeIndex {
        if depth >= MAX_TREE_DEPTH {
            return idx;
        }
        let Some(node) = self.arena.get(idx) else {
            return idx;
        };
        let kind = node.kind();
        let children = node.children();

        if kind == NodeKind::VariableDecls {
            self.scopes.push(DeclarationScope::default());
        }

        self.path.push(idx);
        let mut changed: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        for child in children {
            let new_child = self.visit(child, depth + 1);
            if new_child != child {
                changed.push((child, new_child));
            }
        }
        self.path.pop();

        let mut current = if changed.is_empty() {
            idx
        } else {
            self.arena.rebuild(idx, |child| {
                changed
                    .iter()
                    .find(|(old, _)| *old == child)
                    .map_or(child, |&(_, new)| new)
            })
        };

        match kind {
            NodeKind::MethodInvocation => current = self.visit_call(idx, current),
            NodeKind::NamedVariable => {
                let initializer = self
                    .arena
                    .get_named_variable(current)
                    .map_or(NodeIndex::NONE, |v| v.initializer);
                if self.replacements.contains(&initializer)
                    && let Some(scope) = self.scopes.last_mut()
                {
                    scope.initializer_rewritten = true;
                }
            }
            NodeKind::VariableDecls => {
                let scope = self.scopes.pop().unwrap_or_default();
                if scope.initializer_rewritten
                    && let Some(decls) = propagate(self.arena, current, self.rule)
                {
                    self.report.propagated.push(decls);
                    current = decls;
                }
            }
            _ => {}
        }
        current
    }

    /// `original` is the call as it appears in the traversed tree (its
    /// parent still refers to it); `current` has rewritten children.
    fn visit_call(&mut self, original: NodeIndex, current: NodeIndex) -> NodeIndex {
        let Some(call) = self.arena.get_call(current) else {
            return current;
        };
        if !matches(self.arena, call, self.rule) {
            return current;
        }

        self.path.push(original);
        let required = classify(self.arena, &self.path, self.rule);
        self.path.pop();

        let decision = required.and_then(|ty| {
            if qualifies(self.arena.types(), ty, self.rule) {
                Ok(ty)
            } else {
                Err(SkipReason::IncompatibleRequiredType)
            }
        });
        let outcome = decision.and_then(|_| synthesize(self.arena, current, self.rule));

        let (result, outcome) = match outcome {
            Ok(replacement) => {
                self.imports.add_import(self.rule.target);
                self.imports.remove_import(self.rule.source);
                self.replacements.insert(replacement.node);
                trace!(call = original.0, replacement = replacement.node.0, "rewrote call site");
                (
                    replacement.node,
                    SiteOutcome::Rewritten {
                        replacement: replacement.node,
                    },
                )
            }
            Err(reason) => {
                debug!(call = original.0, %reason, "skipped call site");
                (current, SiteOutcome::Skipped { reason })
            }
        };
        self.report.sites.push(SiteReport {
            call: original,
            required: required.ok(),
            outcome,
        });
        result
    }
}
