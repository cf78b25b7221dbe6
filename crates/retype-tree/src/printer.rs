//! Java source printer.
//!
//! Renders a tree back to Java-like text. Type trees print the names they
//! hold (simple names after a rewrite), so the output reflects exactly what
//! the migration produced rather than a re-derivation from `TypeId`s.

use crate::parser::{Node, NodeArena, NodeIndex, NodeList};
use retype_common::limits::MAX_TREE_DEPTH;
use retype_types::TypeFormatter;

pub struct Printer<'a> {
    arena: &'a NodeArena,
    output: String,
    indent_level: u32,
    indent_str: &'static str,
    depth: u32,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Printer {
            arena,
            output: String::new(),
            indent_level: 0,
            indent_str: "    ",
            depth: 0,
        }
    }

    /// Print a whole tree (usually a `CompilationUnit`).
    pub fn print(arena: &NodeArena, root: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit_node(root);
        printer.output
    }

    /// Print a single expression or type tree on one line.
    pub fn print_expression(arena: &NodeArena, idx: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit_expression(idx);
        printer.output
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_name(&mut self, atom: retype_common::Atom) {
        let name = self.arena.resolve_name(atom);
        self.write(&name);
    }

    pub fn emit_node(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node {
            Node::CompilationUnit(data) => {
                if let Some(package) = data.package {
                    self.write("package ");
                    self.write_name(package);
                    self.write(";");
                    self.write_line();
                    self.write_line();
                }
                for &import in &data.imports.nodes {
                    self.emit_node(import);
                }
                if !data.imports.is_empty() {
                    self.write_line();
                }
                for (i, &class) in data.classes.nodes.iter().enumerate() {
                    if i > 0 {
                        self.write_line();
                    }
                    self.emit_node(class);
                }
            }
            Node::Import(data) => {
                self.write("import ");
                if data.is_static {
                    self.write("static ");
                }
                self.write_name(data.qualified_name);
                self.write(";");
                self.write_line();
            }
            Node::ClassDecl(data) => {
                self.write_indent();
                self.write("class ");
                self.write_name(data.name);
                self.write(" {");
                self.write_line();
                self.increase_indent();
                for &member in &data.members.nodes {
                    self.emit_statement(member);
                }
                self.decrease_indent();
                self.write_indent();
                self.write("}");
                self.write_line();
            }
            _ => self.emit_statement(idx),
        }
    }

    /// Emit a statement or class member on its own indented line.
    fn emit_statement(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        if matches!(node, Node::ClassDecl(_)) {
            self.emit_node(idx);
            return;
        }
        self.write_indent();
        match node {
            Node::MethodDecl(data) => {
                if !data.is_constructor {
                    if data.return_type_expr.is_some() {
                        self.emit_expression(data.return_type_expr);
                    } else {
                        self.write("void");
                    }
                    self.write(" ");
                }
                self.write_name(data.name);
                self.write("(");
                self.emit_comma_list(&data.params);
                self.write(")");
                if data.body.is_some() {
                    self.write(" ");
                    self.emit_block(data.body);
                } else {
                    self.write(";");
                }
            }
            Node::Block(_) => self.emit_block(idx),
            Node::VariableDecls(_) | Node::ExpressionStatement(_) => {
                self.emit_expression(idx);
                self.write(";");
            }
            Node::Return(data) => {
                self.write("return");
                if data.expression.is_some() {
                    self.write(" ");
                    self.emit_expression(data.expression);
                }
                self.write(";");
            }
            _ => {
                self.emit_expression(idx);
                self.write(";");
            }
        }
        self.write_line();
    }

    fn emit_block(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(Node::Block(data)) = arena.get(idx) else {
            self.emit_expression(idx);
            return;
        };
        self.write("{");
        self.write_line();
        self.increase_indent();
        for &statement in &data.statements.nodes {
            self.emit_statement(statement);
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_comma_list(&mut self, list: &NodeList) {
        let mut first = true;
        for &item in &list.nodes {
            if matches!(self.arena.get(item), Some(Node::Empty)) {
                continue;
            }
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_expression(item);
        }
    }

    fn emit_expression(&mut self, idx: NodeIndex) {
        if self.depth >= MAX_TREE_DEPTH {
            self.write("...");
            return;
        }
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        self.depth += 1;
        match node {
            Node::VariableDecls(data) => {
                self.emit_expression(data.type_expr);
                self.write(" ");
                self.emit_comma_list(&data.variables);
            }
            Node::NamedVariable(data) => {
                self.write_name(data.name);
                if data.initializer.is_some() {
                    self.write(" = ");
                    self.emit_expression(data.initializer);
                }
            }
            Node::ExpressionStatement(data) => self.emit_expression(data.expression),
            Node::Lambda(data) => {
                self.write("(");
                self.emit_comma_list(&data.params);
                self.write(") -> ");
                if matches!(self.arena.get(data.body), Some(Node::Block(_))) {
                    self.emit_block(data.body);
                } else {
                    self.emit_expression(data.body);
                }
            }
            Node::Assignment(data) => {
                self.emit_expression(data.target);
                self.write(" = ");
                self.emit_expression(data.value);
            }
            Node::Identifier(data) => self.write_name(data.name),
            Node::FieldAccess(data) => {
                self.emit_expression(data.target);
                self.write(".");
                self.write_name(data.name);
            }
            Node::MethodInvocation(data) => {
                if data.select.is_some() {
                    self.emit_expression(data.select);
                    self.write(".");
                }
                self.write_name(data.name);
                self.write("(");
                self.emit_comma_list(&data.args);
                self.write(")");
            }
            Node::NewClass(data) => {
                self.write("new ");
                self.emit_expression(data.class_type);
                self.write("(");
                self.emit_comma_list(&data.args);
                self.write(")");
            }
            Node::NewArray(data) => {
                let ty = TypeFormatter::new(self.arena.types()).format(data.ty);
                self.write("new ");
                self.write(&ty);
                self.write("{");
                self.emit_comma_list(&data.initializer);
                self.write("}");
            }
            Node::Ternary(data) => {
                self.emit_expression(data.condition);
                self.write(" ? ");
                self.emit_expression(data.when_true);
                self.write(" : ");
                self.emit_expression(data.when_false);
            }
            Node::Literal(data) => self.write(&data.source),
            Node::Empty => {}
            Node::TypeIdentifier(data) => self.write_name(data.name),
            Node::ParameterizedType(data) => {
                self.emit_expression(data.base);
                self.write("<");
                self.emit_comma_list(&data.args);
                self.write(">");
            }
            Node::ArrayType(data) => {
                self.emit_expression(data.element);
                self.write("[]");
            }
            Node::Return(_)
            | Node::Block(_)
            | Node::MethodDecl(_)
            | Node::ClassDecl(_)
            | Node::Import(_)
            | Node::CompilationUnit(_) => {
                // Statement-level nodes in expression position (e.g. a lambda
                // body) print through the statement path without indentation.
                let saved = self.indent_level;
                self.indent_level = 0;
                self.emit_node(idx);
                self.indent_level = saved;
            }
        }
        self.depth -= 1;
    }
}
