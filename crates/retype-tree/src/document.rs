//! Serialized compilation units.
//!
//! A unit document is the JSON form of an attributed Java compilation unit:
//! declarations, statements, and expressions tagged by `kind`, with every
//! resolved type written as a Java type string (`?` when unresolved).
//! `lower_unit` builds the arena bottom-up from a parsed document.

use crate::parser::{NodeArena, NodeIndex};
use crate::printer::Printer;
use anyhow::{Context, Result, bail};
use retype_types::{MethodShape, TypeId, TypeInterner, parse_type};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDocument {
    pub path: String,
    #[serde(default)]
    pub java_version: Option<u32>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub static_imports: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassDocument>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDocument {
    /// Fully-qualified class name.
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberDocument>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemberDocument {
    Field {
        #[serde(rename = "type")]
        ty: String,
        variables: Vec<VariableDocument>,
    },
    #[serde(rename_all = "camelCase")]
    Method {
        name: String,
        /// Absent for `void`.
        #[serde(default)]
        return_type: Option<String>,
        #[serde(default)]
        params: Vec<ParamDocument>,
        #[serde(default)]
        body: Option<Vec<StatementDocument>>,
    },
    Constructor {
        #[serde(default)]
        params: Vec<ParamDocument>,
        #[serde(default)]
        body: Vec<StatementDocument>,
    },
    Class(ClassDocument),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParamDocument {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VariableDocument {
    pub name: String,
    /// Resolved type of the variable; defaults to the declared type.
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    #[serde(default)]
    pub init: Option<ExprDocument>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatementDocument {
    Local {
        #[serde(rename = "type")]
        ty: String,
        variables: Vec<VariableDocument>,
    },
    Expr {
        expr: ExprDocument,
    },
    Return {
        #[serde(default)]
        expr: Option<ExprDocument>,
    },
    Block {
        statements: Vec<StatementDocument>,
    },
}

/// Resolved method reference of a call or constructor invocation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDocument {
    pub declaring_type: String,
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "unknown_type")]
    pub return_type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExprDocument {
    Literal {
        value: String,
        #[serde(rename = "type")]
        ty: String,
    },
    /// Reference to a local, parameter, or field by simple name.
    Name {
        name: String,
        #[serde(rename = "type", default = "unknown_type")]
        ty: String,
    },
    /// Class name used as a static receiver.
    TypeName {
        #[serde(rename = "type")]
        ty: String,
    },
    Field {
        target: Box<ExprDocument>,
        name: String,
        #[serde(rename = "type", default = "unknown_type")]
        ty: String,
    },
    Call {
        #[serde(default)]
        target: Option<Box<ExprDocument>>,
        name: String,
        #[serde(default)]
        args: Vec<ExprDocument>,
        #[serde(default)]
        method: Option<MethodDocument>,
        #[serde(rename = "type", default = "unknown_type")]
        ty: String,
    },
    New {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        args: Vec<ExprDocument>,
        #[serde(default)]
        constructor: Option<MethodDocument>,
    },
    NewArray {
        /// The array type, e.g. `java.lang.Object[]`.
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        elements: Vec<ExprDocument>,
    },
    Assign {
        target: Box<ExprDocument>,
        value: Box<ExprDocument>,
    },
    Ternary {
        condition: Box<ExprDocument>,
        then: Box<ExprDocument>,
        #[serde(rename = "else")]
        otherwise: Box<ExprDocument>,
        #[serde(rename = "type", default = "unknown_type")]
        ty: String,
    },
    Lambda {
        #[serde(default)]
        params: Vec<String>,
        #[serde(default)]
        body: Option<Box<ExprDocument>>,
        #[serde(default)]
        statements: Option<Vec<StatementDocument>>,
        #[serde(rename = "type", default = "unknown_type")]
        ty: String,
    },
    /// Placeholder argument of an empty argument list.
    Empty,
}

fn unknown_type() -> String {
    "?".to_string()
}

/// A lowered compilation unit: its arena and the root `CompilationUnit`.
pub struct SourceFile {
    pub arena: NodeArena,
    pub root: NodeIndex,
}

impl SourceFile {
    pub fn path(&self) -> &str {
        self.arena
            .get_compilation_unit(self.root)
            .map_or("", |unit| unit.source_path.as_str())
    }

    /// Java-like source text of `root` (which may be a migrated root).
    pub fn print(&self, root: NodeIndex) -> String {
        Printer::print(&self.arena, root)
    }
}

pub fn parse_unit_json(types: Arc<TypeInterner>, source: &str) -> Result<SourceFile> {
    let doc: UnitDocument =
        serde_json::from_str(source).context("failed to parse unit document JSON")?;
    lower_unit(types, &doc)
}

pub fn lower_unit(types: Arc<TypeInterner>, doc: &UnitDocument) -> Result<SourceFile> {
    let mut lowerer = Lowerer {
        arena: NodeArena::new(types),
    };
    let root = lowerer
        .lower_unit(doc)
        .with_context(|| format!("failed to lower unit '{}'", doc.path))?;
    debug!(path = %doc.path, nodes = lowerer.arena.len(), "lowered unit");
    Ok(SourceFile {
        arena: lowerer.arena,
        root,
    })
}

struct Lowerer {
    arena: NodeArena,
}

impl Lowerer {
    fn ty(&self, text: &str) -> Result<TypeId> {
        Ok(parse_type(self.arena.types(), text)?)
    }

    fn method(&self, doc: &MethodDocument) -> Result<MethodShape> {
        let declaring = self.ty(&doc.declaring_type)?;
        let params = doc
            .params
            .iter()
            .map(|p| self.ty(p))
            .collect::<Result<Vec<_>>>()?;
        let ret = self.ty(&doc.return_type)?;
        let name = self.arena.types().intern_name(&doc.name);
        Ok(MethodShape::new(declaring, name, params, ret))
    }

    fn lower_unit(&mut self, doc: &UnitDocument) -> Result<NodeIndex> {
        let mut imports = Vec::with_capacity(doc.imports.len() + doc.static_imports.len());
        for import in &doc.imports {
            imports.push(self.arena.add_import(import, false));
        }
        for import in &doc.static_imports {
            imports.push(self.arena.add_import(import, true));
        }
        let mut classes = Vec::with_capacity(doc.classes.len());
        for class in &doc.classes {
            classes.push(self.lower_class(class)?);
        }
        Ok(self.arena.add_compilation_unit(
            doc.path.clone(),
            doc.java_version,
            doc.package.as_deref(),
            imports,
            classes,
        ))
    }

    fn lower_class(&mut self, doc: &ClassDocument) -> Result<NodeIndex> {
        if doc.name.is_empty() {
            bail!("class without a name");
        }
        let mut members = Vec::with_capacity(doc.members.len());
        for member in &doc.members {
            let idx = self
                .lower_member(doc, member)
                .with_context(|| format!("in class {}", doc.name))?;
            members.push(idx);
        }
        Ok(self.arena.add_class(&doc.name, members))
    }

    fn lower_member(&mut self, class: &ClassDocument, doc: &MemberDocument) -> Result<NodeIndex> {
        match doc {
            MemberDocument::Field { ty, variables } => self.lower_variable_decls(ty, variables),
            MemberDocument::Method {
                name,
                return_type,
                params,
                body,
            } => {
                let return_type = match return_type {
                    Some(text) => Some(self.ty(text)?),
                    None => None,
                };
                let params = self.lower_params(params)?;
                let body = match body {
                    Some(statements) => self.lower_block(statements)?,
                    None => NodeIndex::NONE,
                };
                Ok(self.arena.add_method_decl(name, return_type, params, body))
            }
            MemberDocument::Constructor { params, body } => {
                let params = self.lower_params(params)?;
                let body = self.lower_block(body)?;
                let name = retype_types::short_name(&class.name).to_string();
                Ok(self.arena.add_constructor(&name, params, body))
            }
            MemberDocument::Class(nested) => self.lower_class(nested),
        }
    }

    fn lower_params(&mut self, params: &[ParamDocument]) -> Result<Vec<NodeIndex>> {
        params
            .iter()
            .map(|param| {
                let ty = self
                    .ty(&param.ty)
                    .with_context(|| format!("parameter '{}'", param.name))?;
                let variable = self.arena.add_named_variable(&param.name, ty, NodeIndex::NONE);
                Ok(self.arena.add_variable_decls(ty, vec![variable]))
            })
            .collect()
    }

    fn lower_variable_decls(&mut self, ty: &str, variables: &[VariableDocument]) -> Result<NodeIndex> {
        let declared = self.ty(ty)?;
        let mut lowered = Vec::with_capacity(variables.len());
        for variable in variables {
            let var_ty = match &variable.ty {
                Some(text) => self.ty(text)?,
                None => declared,
            };
            let init = match &variable.init {
                Some(expr) => self
                    .lower_expr(expr)
                    .with_context(|| format!("initializer of '{}'", variable.name))?,
                None => NodeIndex::NONE,
            };
            lowered.push(self.arena.add_named_variable(&variable.name, var_ty, init));
        }
        Ok(self.arena.add_variable_decls(declared, lowered))
    }

    fn lower_block(&mut self, statements: &[StatementDocument]) -> Result<NodeIndex> {
        let mut lowered = Vec::with_capacity(statements.len());
        for statement in statements {
            lowered.push(self.lower_statement(statement)?);
        }
        Ok(self.arena.add_block(lowered))
    }

    fn lower_statement(&mut self, doc: &StatementDocument) -> Result<NodeIndex> {
        match doc {
            StatementDocument::Local { ty, variables } => self.lower_variable_decls(ty, variables),
            StatementDocument::Expr { expr } => {
                let expr = self.lower_expr(expr)?;
                Ok(self.arena.add_expression_statement(expr))
            }
            StatementDocument::Return { expr } => {
                let expr = match expr {
                    Some(expr) => self.lower_expr(expr)?,
                    None => NodeIndex::NONE,
                };
                Ok(self.arena.add_return(expr))
            }
            StatementDocument::Block { statements } => self.lower_block(statements),
        }
    }

    fn lower_args(&mut self, args: &[ExprDocument]) -> Result<Vec<NodeIndex>> {
        args.iter().map(|arg| self.lower_expr(arg)).collect()
    }

    fn lower_expr(&mut self, doc: &ExprDocument) -> Result<NodeIndex> {
        Ok(match doc {
            ExprDocument::Literal { value, ty } => {
                let ty = self.ty(ty)?;
                self.arena.add_literal(value.clone(), ty)
            }
            ExprDocument::Name { name, ty } => {
                let ty = self.ty(ty)?;
                self.arena.add_variable_ref(name, ty)
            }
            ExprDocument::TypeName { ty } => {
                let ty = self.ty(ty)?;
                self.arena.add_type_reference(ty)
            }
            ExprDocument::Field { target, name, ty } => {
                let target = self.lower_expr(target)?;
                let ty = self.ty(ty)?;
                self.arena.add_field_access(target, name, ty)
            }
            ExprDocument::Call {
                target,
                name,
                args,
                method,
                ty,
            } => {
                let select = match target {
                    Some(target) => self.lower_expr(target)?,
                    None => NodeIndex::NONE,
                };
                let args = self
                    .lower_args(args)
                    .with_context(|| format!("arguments of call to '{name}'"))?;
                let method = match method {
                    Some(method) => Some(self.method(method)?),
                    None => None,
                };
                let ty = self.ty(ty)?;
                self.arena.add_method_invocation(select, name, args, method, ty)
            }
            ExprDocument::New {
                ty,
                args,
                constructor,
            } => {
                let ty = self.ty(ty)?;
                let args = self.lower_args(args)?;
                let constructor = match constructor {
                    Some(method) => Some(self.method(method)?),
                    None => None,
                };
                self.arena.add_new_class(ty, args, constructor)
            }
            ExprDocument::NewArray { ty, elements } => {
                let ty = self.ty(ty)?;
                let elements = self.lower_args(elements)?;
                self.arena.add_new_array(ty, elements)
            }
            ExprDocument::Assign { target, value } => {
                let target = self.lower_expr(target)?;
                let value = self.lower_expr(value)?;
                self.arena.add_assignment(target, value)
            }
            ExprDocument::Ternary {
                condition,
                then,
                otherwise,
                ty,
            } => {
                let condition = self.lower_expr(condition)?;
                let when_true = self.lower_expr(then)?;
                let when_false = self.lower_expr(otherwise)?;
                let ty = self.ty(ty)?;
                self.arena.add_ternary(condition, when_true, when_false, ty)
            }
            ExprDocument::Lambda {
                params,
                body,
                statements,
                ty,
            } => {
                let params: Vec<NodeIndex> = params
                    .iter()
                    .map(|name| self.arena.add_named_variable(name, TypeId::UNKNOWN, NodeIndex::NONE))
                    .collect();
                let body = match (body, statements) {
                    (Some(expr), None) => self.lower_expr(expr)?,
                    (None, Some(statements)) => self.lower_block(statements)?,
                    _ => bail!("lambda needs exactly one of 'body' or 'statements'"),
                };
                let ty = self.ty(ty)?;
                self.arena.add_lambda(params, body, ty)
            }
            ExprDocument::Empty => self.arena.add_empty(),
        })
    }
}
