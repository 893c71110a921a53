//! Type and hierarchy descriptors.

use rowan::GreenNode;
use smol_str::SmolStr;

use crate::base::StructuralArray;
use crate::host::{TypeKind, TypeSymbol};
use crate::syntax::factory::{
    CompilationUnitSyntax, MemberSyntax, Modifier, TriviaSyntax, TypeDeclarationKind,
    TypeDeclarationSyntax, TypeSyntax,
};

/// A type argument, or a type parameter of a generic definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeArgumentDescriptor {
    pub minimal_name: SmolStr,
    pub fully_qualified_name: SmolStr,
    pub fully_qualified_name_with_nullability: SmolStr,
}

impl TypeArgumentDescriptor {
    pub fn from_symbol(symbol: &TypeSymbol) -> Self {
        Self {
            minimal_name: symbol.name.clone(),
            fully_qualified_name: symbol.fully_qualified().into(),
            fully_qualified_name_with_nullability: symbol.fully_qualified_with_nullability().into(),
        }
    }

    pub fn type_syntax(&self) -> TypeSyntax {
        TypeSyntax::parse(&self.fully_qualified_name_with_nullability)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub name: SmolStr,
    pub minimal_name: SmolStr,
    pub fully_qualified_name: SmolStr,
    pub fully_qualified_name_without_type_parameters: SmolStr,
    pub fully_qualified_metadata_name: SmolStr,
    pub kind: TypeKind,
    pub is_record: bool,
    pub type_arguments: StructuralArray<TypeArgumentDescriptor>,
}

impl TypeDescriptor {
    pub fn from_symbol(symbol: &TypeSymbol) -> Self {
        let type_arguments: StructuralArray<TypeArgumentDescriptor> =
            if symbol.type_arguments.is_empty() {
                symbol
                    .type_parameters
                    .iter()
                    .map(|name| TypeArgumentDescriptor::from_symbol(&TypeSymbol::type_parameter(name)))
                    .collect()
            } else {
                symbol
                    .type_arguments
                    .iter()
                    .map(TypeArgumentDescriptor::from_symbol)
                    .collect()
            };
        Self {
            name: symbol.name.clone(),
            minimal_name: symbol.minimal_name().into(),
            fully_qualified_name: symbol.fully_qualified().into(),
            fully_qualified_name_without_type_parameters: symbol
                .fully_qualified_without_type_parameters()
                .into(),
            fully_qualified_metadata_name: symbol.fully_qualified_metadata_name().into(),
            kind: symbol.kind,
            is_record: symbol.is_record,
            type_arguments,
        }
    }

    pub fn declaration_kind(&self) -> TypeDeclarationKind {
        match (self.kind, self.is_record) {
            (TypeKind::Struct, true) => TypeDeclarationKind::RecordStruct,
            (TypeKind::Struct, false) => TypeDeclarationKind::Struct,
            (TypeKind::Interface, _) => TypeDeclarationKind::Interface,
            (TypeKind::Class, true) => TypeDeclarationKind::Record,
            _ => TypeDeclarationKind::Class,
        }
    }

    /// An empty declaration of this type, type parameters included.
    pub fn declaration(&self) -> TypeDeclarationSyntax {
        let parameters: Vec<String> = self
            .type_arguments
            .iter()
            .map(|argument| argument.minimal_name.to_string())
            .collect();
        TypeDeclarationSyntax::new(self.declaration_kind(), &self.name).type_parameters(&parameters)
    }

    /// Reference to this type; generics render as `Name<>` without arguments.
    pub fn type_syntax(&self, include_type_arguments: bool) -> TypeSyntax {
        if include_type_arguments || self.type_arguments.is_empty() {
            TypeSyntax::parse(&self.fully_qualified_name)
        } else {
            TypeSyntax::generic(&self.fully_qualified_name_without_type_parameters, Vec::new())
        }
    }
}

/// A type together with the types enclosing it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HierarchyDescriptor {
    /// Fully qualified metadata name, used as the output hint stem.
    pub file_name_hint: SmolStr,
    pub metadata_name: SmolStr,
    pub namespace: SmolStr,
    /// Innermost type first.
    pub hierarchy: StructuralArray<TypeDescriptor>,
}

impl HierarchyDescriptor {
    pub fn from_symbol(symbol: &TypeSymbol) -> Self {
        let mut hierarchy = vec![TypeDescriptor::from_symbol(symbol)];
        let mut parent = symbol.containing_type.clone();
        while let Some(current) = parent {
            hierarchy.push(TypeDescriptor::from_symbol(&current));
            parent = current.containing_type.clone();
        }
        Self {
            file_name_hint: symbol.fully_qualified_metadata_name().into(),
            metadata_name: symbol.metadata_name().into(),
            namespace: symbol.namespace.clone(),
            hierarchy: hierarchy.into(),
        }
    }

    /// The innermost type.
    pub fn target(&self) -> Option<&TypeDescriptor> {
        self.hierarchy.iter().next()
    }

    /// Name of the innermost type, without type parameters.
    pub fn name(&self) -> &str {
        self.target().map_or("", |target| target.name.as_str())
    }

    /// Output hint: the file name stem plus `suffix`, e.g. `.g.cs`.
    pub fn hint(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.file_name_hint)
    }

    /// A file declaring `members` inside partial re-declarations of every
    /// type in the hierarchy, in the type's namespace.
    pub fn compilation_unit(&self, members: Vec<MemberSyntax>, base_list: Vec<TypeSyntax>) -> GreenNode {
        let mut types = self.hierarchy.iter();
        let declaration = match types.next() {
            Some(target) => {
                let mut declaration = target
                    .declaration()
                    .modifiers(&[Modifier::Partial])
                    .base_list(base_list)
                    .members(members)
                    .build();
                for parent in types {
                    declaration = parent
                        .declaration()
                        .modifiers(&[Modifier::Partial])
                        .members(vec![declaration])
                        .build();
                }
                vec![declaration.with_leading_trivia(&TriviaSyntax::nullable_enable())]
            }
            None => members,
        };
        CompilationUnitSyntax::new()
            .namespace(&self.namespace)
            .members(declaration)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SpecialType;
    use crate::syntax::factory::FieldDeclarationSyntax;
    use crate::config::RenderOptions;
    use crate::syntax::render;

    #[test]
    fn test_record_struct_declaration() {
        let symbol = TypeSymbol::structure("App", "Point").record().build();
        let descriptor = TypeDescriptor::from_symbol(&symbol);
        assert_eq!(descriptor.declaration_kind(), TypeDeclarationKind::RecordStruct);
        assert_eq!(descriptor.fully_qualified_name, "global::App.Point");
    }

    #[test]
    fn test_generic_definition_lists_parameters() {
        let symbol = TypeSymbol::class("App", "Box").type_parameters(&["T"]).build();
        let descriptor = TypeDescriptor::from_symbol(&symbol);
        assert_eq!(descriptor.type_arguments.len(), 1);
        assert_eq!(descriptor.type_arguments[0].minimal_name, "T");
        assert_eq!(descriptor.type_syntax(false).text(), "global::App.Box<>");
        assert_eq!(descriptor.type_syntax(true).text(), "global::App.Box<T>");
    }

    #[test]
    fn test_nested_compilation_unit() {
        let outer = TypeSymbol::class("App.Models", "Outer").build();
        let inner = TypeSymbol::structure("", "Inner").nested_in(&outer).build();
        let hierarchy = HierarchyDescriptor::from_symbol(&inner);
        assert_eq!(hierarchy.file_name_hint, "App.Models.Outer+Inner");
        assert_eq!(hierarchy.hint(".g.cs"), "App.Models.Outer+Inner.g.cs");
        assert_eq!(hierarchy.name(), "Inner");

        let field = FieldDeclarationSyntax::new(
            TypeSyntax::parse(&TypeSymbol::special(SpecialType::Int32).fully_qualified()),
            "value",
        )
        .modifiers(&[Modifier::Private])
        .build();
        let text = render(
            &hierarchy.compilation_unit(vec![field], Vec::new()),
            &RenderOptions::default(),
        );
        assert_eq!(
            text,
            "namespace App.Models;\n\n#nullable enable\npartial class Outer\n{\n    partial struct Inner\n    {\n        private int value;\n    }\n}\n"
        );
    }

    #[test]
    fn test_global_namespace_and_base_list() {
        let symbol = TypeSymbol::class("", "Plain").build();
        let hierarchy = HierarchyDescriptor::from_symbol(&symbol);
        let unit = hierarchy.compilation_unit(
            Vec::new(),
            vec![TypeSyntax::parse("global::System.IDisposable")],
        );
        let text = render(&unit, &RenderOptions::default());
        assert_eq!(text, "#nullable enable\npartial class Plain : global::System.IDisposable\n{\n}\n");
    }
}
