//! Type formatting for printing and diagnostics.

use crate::intern::TypeInterner;
use crate::types::{TypeData, TypeId};
use crate::visitor::short_name;
use retype_common::limits::MAX_TYPE_NESTING_DEPTH;

/// Renders types as Java source text.
///
/// Short form (`List<String>`) is what the printer emits in type positions;
/// qualified form (`java.util.List<java.lang.String>`) round-trips through
/// `parse_type`.
pub struct TypeFormatter<'a> {
    db: &'a TypeInterner,
    qualified: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a TypeInterner) -> Self {
        TypeFormatter {
            db,
            qualified: false,
        }
    }

    pub fn qualified(db: &'a TypeInterner) -> Self {
        TypeFormatter {
            db,
            qualified: true,
        }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, ty, 0);
        out
    }

    fn write_name(&self, out: &mut String, name: &str) {
        if self.qualified {
            out.push_str(name);
        } else {
            out.push_str(short_name(name));
        }
    }

    fn write(&self, out: &mut String, ty: TypeId, depth: u32) {
        if depth >= MAX_TYPE_NESTING_DEPTH {
            out.push_str("...");
            return;
        }
        match self.db.lookup(ty) {
            None | Some(TypeData::Unknown) => out.push('?'),
            Some(TypeData::Primitive(kind)) => out.push_str(kind.keyword()),
            Some(TypeData::Nominal(name)) => {
                self.write_name(out, &self.db.resolve_name(name));
            }
            Some(TypeData::Array(element)) => {
                self.write(out, element, depth + 1);
                out.push_str("[]");
            }
            Some(TypeData::Parameterized { base, args }) => {
                self.write_name(out, &self.db.resolve_name(base));
                out.push('<');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(out, arg, depth + 1);
                }
                out.push('>');
            }
        }
    }
}
