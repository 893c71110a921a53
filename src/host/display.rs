//! Name display for type symbols.

use super::symbols::{TypeKind, TypeSymbol};

#[derive(Clone, Copy)]
struct Style {
    global: bool,
    qualified: bool,
    type_arguments: bool,
    reference_nullability: bool,
}

const FULLY_QUALIFIED: Style = Style {
    global: true,
    qualified: true,
    type_arguments: true,
    reference_nullability: false,
};

impl TypeSymbol {
    /// `global::Ns.Outer.Name<Args>`, keywords for special types.
    pub fn fully_qualified(&self) -> String {
        self.display(FULLY_QUALIFIED)
    }

    /// Like [`fully_qualified`](Self::fully_qualified), keeping `?` on
    /// annotated reference types.
    pub fn fully_qualified_with_nullability(&self) -> String {
        self.display(Style {
            reference_nullability: true,
            ..FULLY_QUALIFIED
        })
    }

    pub fn fully_qualified_without_type_parameters(&self) -> String {
        self.display(Style {
            type_arguments: false,
            ..FULLY_QUALIFIED
        })
    }

    /// Name as written inside its declaration, e.g. `Foo<T>`.
    pub fn minimal_name(&self) -> String {
        self.display(Style {
            global: false,
            qualified: false,
            type_arguments: true,
            reference_nullability: false,
        })
    }

    /// Name plus `` `N `` generic arity.
    pub fn metadata_name(&self) -> String {
        match self.kind {
            TypeKind::Array | TypeKind::Pointer => self.fully_qualified_metadata_name(),
            _ => match self.arity() {
                0 => self.name.to_string(),
                arity => format!("{}`{arity}", self.name),
            },
        }
    }

    /// `Ns.Outer+Inner`1`, the key markers are matched against.
    pub fn fully_qualified_metadata_name(&self) -> String {
        match self.kind {
            TypeKind::Array => format!("{}[]", self.element().fully_qualified_metadata_name()),
            TypeKind::Pointer => format!("{}*", self.element().fully_qualified_metadata_name()),
            TypeKind::TypeParameter => self.name.to_string(),
            _ => {
                if let Some(containing) = &self.containing_type {
                    format!(
                        "{}+{}",
                        containing.fully_qualified_metadata_name(),
                        self.metadata_name()
                    )
                } else if self.namespace.is_empty() {
                    self.metadata_name()
                } else {
                    format!("{}.{}", self.namespace, self.metadata_name())
                }
            }
        }
    }

    /// Whether this type or one of its base types has `metadata_name`.
    pub fn has_or_inherits_metadata_name(&self, metadata_name: &str) -> bool {
        self.fully_qualified_metadata_name() == metadata_name || self.inherits_from(metadata_name)
    }

    /// Whether a base type, excluding this type, has `metadata_name`.
    pub fn inherits_from(&self, metadata_name: &str) -> bool {
        let mut current = self.base_type.clone();
        while let Some(base) = current {
            if base.fully_qualified_metadata_name() == metadata_name {
                return true;
            }
            current = base.base_type.clone();
        }
        false
    }

    /// Interfaces implemented directly, through other interfaces or by base types.
    pub fn all_interfaces(&self) -> Vec<TypeSymbol> {
        let mut result: Vec<TypeSymbol> = Vec::new();
        let mut stack: Vec<TypeSymbol> = Vec::new();
        let mut current = Some(self.clone());
        while let Some(ty) = current {
            stack.extend(ty.interfaces.iter().rev().cloned());
            current = ty.base_type.clone();
        }
        stack.reverse();
        while let Some(interface) = stack.pop() {
            let name = interface.fully_qualified();
            if result.iter().any(|known| known.fully_qualified() == name) {
                continue;
            }
            stack.extend(interface.interfaces.iter().rev().cloned());
            result.push(interface);
        }
        result
    }

    pub fn implements_interface(&self, metadata_name: &str) -> bool {
        self.all_interfaces()
            .iter()
            .any(|interface| interface.fully_qualified_metadata_name() == metadata_name)
    }

    pub fn has_attribute(&self, metadata_name: &str) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.class.fully_qualified_metadata_name() == metadata_name)
    }

    fn element(&self) -> &TypeSymbol {
        self.element_type.as_ref().unwrap_or(self)
    }

    fn display(&self, style: Style) -> String {
        let mut text = String::new();
        self.write(&mut text, style);
        text
    }

    fn write(&self, out: &mut String, style: Style) {
        match self.kind {
            TypeKind::Array => {
                self.element().write(out, style);
                out.push_str("[]");
            }
            TypeKind::Pointer => {
                self.element().write(out, style);
                out.push('*');
            }
            TypeKind::TypeParameter => out.push_str(&self.name),
            _ => match self.special.keyword() {
                Some(keyword) => out.push_str(keyword),
                None => self.write_named(out, style),
            },
        }

        let annotate = self.nullable
            && (self.is_value_type() || style.reference_nullability)
            && self.kind != TypeKind::Pointer;
        if annotate {
            out.push('?');
        }
    }

    fn write_named(&self, out: &mut String, style: Style) {
        if style.qualified {
            if style.global {
                out.push_str("global::");
            }
            match &self.containing_type {
                Some(containing) => {
                    containing.write_named(
                        out,
                        Style {
                            global: false,
                            type_arguments: true,
                            ..style
                        },
                    );
                    out.push('.');
                }
                None if !self.namespace.is_empty() => {
                    out.push_str(&self.namespace);
                    out.push('.');
                }
                None => {}
            }
        }
        out.push_str(&self.name);
        if !style.type_arguments {
            return;
        }

        if !self.type_arguments.is_empty() {
            out.push('<');
            for (index, argument) in self.type_arguments.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                argument.write(
                    out,
                    Style {
                        qualified: true,
                        global: true,
                        ..style
                    },
                );
            }
            out.push('>');
        } else if self.is_unbound_generic {
            out.push('<');
            out.push_str(&",".repeat(self.arity().saturating_sub(1)));
            out.push('>');
        } else if !self.type_parameters.is_empty() {
            out.push('<');
            out.push_str(&self.type_parameters.join(", "));
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::symbols::SpecialType;

    fn list() -> TypeSymbol {
        TypeSymbol::class("System.Collections.Generic", "List")
            .type_parameters(&["T"])
            .not_partial()
            .build()
    }

    #[test]
    fn test_special_types_use_keywords() {
        let int = TypeSymbol::special(SpecialType::Int32);
        assert_eq!(int.fully_qualified(), "int");
        assert_eq!(int.fully_qualified_metadata_name(), "System.Int32");
        assert_eq!(int.annotated().fully_qualified(), "int?");
    }

    #[test]
    fn test_reference_nullability_only_in_nullable_display() {
        let string = TypeSymbol::special(SpecialType::String).annotated();
        assert_eq!(string.fully_qualified(), "string");
        assert_eq!(string.fully_qualified_with_nullability(), "string?");
    }

    #[test]
    fn test_generic_forms() {
        let list = list();
        let constructed = list.construct(vec![TypeSymbol::special(SpecialType::String)]);
        assert_eq!(list.fully_qualified(), "global::System.Collections.Generic.List<T>");
        assert_eq!(
            constructed.fully_qualified(),
            "global::System.Collections.Generic.List<string>"
        );
        assert_eq!(list.unbound().fully_qualified(), "global::System.Collections.Generic.List<>");
        assert_eq!(
            constructed.fully_qualified_without_type_parameters(),
            "global::System.Collections.Generic.List"
        );
        assert_eq!(
            constructed.fully_qualified_metadata_name(),
            "System.Collections.Generic.List`1"
        );
        assert_eq!(list.minimal_name(), "List<T>");
    }

    #[test]
    fn test_nested_types() {
        let outer = TypeSymbol::class("App", "Outer").build();
        let inner = TypeSymbol::class("", "Inner").nested_in(&outer).build();
        assert_eq!(inner.fully_qualified(), "global::App.Outer.Inner");
        assert_eq!(inner.fully_qualified_metadata_name(), "App.Outer+Inner");
    }

    #[test]
    fn test_arrays_and_pointers() {
        let objects = TypeSymbol::array(TypeSymbol::special(SpecialType::Object).annotated());
        assert_eq!(objects.fully_qualified_with_nullability(), "object?[]");
        assert_eq!(
            TypeSymbol::pointer(TypeSymbol::special(SpecialType::UInt32)).fully_qualified(),
            "uint*"
        );
    }

    #[test]
    fn test_inheritance_queries() {
        let task = TypeSymbol::class("System.Threading.Tasks", "Task").not_partial().build();
        let generic_task = TypeSymbol::class("System.Threading.Tasks", "Task")
            .type_parameters(&["TResult"])
            .base(&task)
            .not_partial()
            .build();
        assert!(generic_task.has_or_inherits_metadata_name("System.Threading.Tasks.Task"));
        assert!(!task.inherits_from("System.Threading.Tasks.Task"));

        let disposable = TypeSymbol::interface("System", "IDisposable").build();
        let service = TypeSymbol::interface("App", "IService").interface(&disposable).build();
        let base = TypeSymbol::class("App", "Base").interface(&service).build();
        let derived = TypeSymbol::class("App", "Derived").base(&base).build();
        assert!(derived.implements_interface("System.IDisposable"));
        assert_eq!(derived.all_interfaces().len(), 2);
    }
}
