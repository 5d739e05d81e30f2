//! Type formatting for error messages.

use keel_ir::{StringInterner, TypeId};

use super::Pool;
use crate::data::{Primitive, Template, TypeData};

impl Pool {
    /// Format a type as a human-readable string.
    pub fn format_type(&self, id: TypeId, interner: &StringInterner) -> String {
        let mut buf = String::new();
        self.format_type_into(id, interner, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, id: TypeId, interner: &StringInterner, buf: &mut String) {
        keel_stack::ensure_sufficient_stack(|| match self.data(id) {
            TypeData::Primitive(p) => buf.push_str(primitive_name(p)),
            TypeData::Pointer(elem) => {
                self.format_type_into(elem, interner, buf);
                buf.push('*');
            }
            TypeData::ByRef(elem) => {
                buf.push_str("ref ");
                self.format_type_into(elem, interner, buf);
            }
            TypeData::Array { elem, rank } => {
                self.format_type_into(elem, interner, buf);
                buf.push('[');
                for _ in 1..rank {
                    buf.push(',');
                }
                buf.push(']');
            }
            TypeData::Class { name }
            | TypeData::Interface { name }
            | TypeData::Struct { name }
            | TypeData::Enum { name, .. }
            | TypeData::Alias { name, .. }
            | TypeData::TypeParam { name, .. } => buf.push_str(interner.lookup(name)),
            TypeData::Delegate { name, params, ret } => {
                if name.is_empty() {
                    buf.push('(');
                    self.format_list(&params, ", ", interner, buf);
                    buf.push_str(") => ");
                    self.format_type_into(ret, interner, buf);
                } else {
                    buf.push_str(interner.lookup(name));
                }
            }
            TypeData::Tuple(fields) => {
                buf.push('(');
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    self.format_type_into(field.ty, interner, buf);
                    if !field.is_anonymous() {
                        buf.push(' ');
                        buf.push_str(interner.lookup(field.name));
                    }
                }
                buf.push(')');
            }
            TypeData::Union(members) => self.format_list(&members, " | ", interner, buf),
            TypeData::Intersection(members) => self.format_list(&members, " & ", interner, buf),
            TypeData::Generic {
                template: Template::Nullable,
                args,
            } if args.len() == 1 => {
                self.format_type_into(args[0], interner, buf);
                buf.push('?');
            }
            TypeData::Generic { template, args } => {
                buf.push_str(match template {
                    Template::Nullable => "Nullable",
                    Template::Boxed => "Boxed",
                    Template::NonNull => "NonNull",
                    Template::Invariant => "Invariant",
                    Template::Sequence => "Sequence",
                    Template::NonEmptySequence => "NonEmptySequence",
                    Template::Enumerator => "Enumerator",
                    Template::List => "List",
                    Template::Named(name) => interner.lookup(name),
                });
                buf.push('<');
                self.format_list(&args, ", ", interner, buf);
                buf.push('>');
            }
        });
    }

    fn format_list(
        &self,
        ids: &[TypeId],
        separator: &str,
        interner: &StringInterner,
        buf: &mut String,
    ) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                buf.push_str(separator);
            }
            self.format_type_into(id, interner, buf);
        }
    }
}

fn primitive_name(p: Primitive) -> &'static str {
    p.type_id().builtin_name().unwrap_or("<builtin>")
}
