//! Builds a [`Compilation`] from symbols.
//!
//! Each file's declarations are synthesized through the syntax factory, then
//! the finished tree is walked once to bind every declaration node to the
//! symbol it was built from. Nodes are matched by green-node identity, so
//! binding survives the declaration being moved into its parents.

use indexmap::IndexMap;
use rowan::{GreenNode, GreenNodeData};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::compilation::{Compilation, NodeKey, SyntaxTree};
use super::symbols::{
    Accessibility, AttributeData, ConstantValue, FieldSymbol, MemberSymbol, MethodKind, MethodSymbol, Primitive,
    PropertySymbol, SpecialType, Symbol, TypeKind, TypeSymbol,
};
use crate::syntax::factory::{
    AccessorSyntax, ArgumentSyntax, AttributeListSyntax, AttributeSyntax, Body,
    CompilationUnitSyntax, ConstructorDeclarationSyntax, EnumDeclarationSyntax, EnumMemberSyntax,
    ExpressionSyntax, FieldDeclarationSyntax, IndexerDeclarationSyntax, MemberSyntax,
    MethodDeclarationSyntax, Modifier, ParameterSyntax, PropertyDeclarationSyntax,
    TypeDeclarationKind, TypeDeclarationSyntax, TypeSyntax,
};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Collects files and referenced types for a [`Compilation`].
pub struct CompilationBuilder {
    assembly_name: SmolStr,
    files: Vec<(SmolStr, Vec<TypeSymbol>)>,
    sources: Vec<(SmolStr, GreenNode)>,
    references: Vec<TypeSymbol>,
    expression_types: Vec<(GreenNode, TypeSymbol)>,
}

impl CompilationBuilder {
    pub fn new(assembly_name: &str) -> Self {
        Self {
            assembly_name: assembly_name.into(),
            files: Vec::new(),
            sources: Vec::new(),
            references: Vec::new(),
            expression_types: Vec::new(),
        }
    }

    /// A file declaring `types`. Nested types are placed inside their
    /// containing type when it is declared in the same file.
    pub fn file(mut self, path: &str, types: Vec<TypeSymbol>) -> Self {
        self.files.push((path.into(), types));
        self
    }

    /// A file given as an already built tree, without bindings.
    pub fn source(mut self, path: &str, root: GreenNode) -> Self {
        self.sources.push((path.into(), root));
        self
    }

    /// A type from a referenced assembly.
    pub fn reference(mut self, ty: &TypeSymbol) -> Self {
        self.references.push(ty.clone());
        self
    }

    /// Records the type of an expression that appears in a method body.
    pub fn expression_type(mut self, expression: &ExpressionSyntax, ty: &TypeSymbol) -> Self {
        self.expression_types
            .push((expression.green().clone(), ty.clone()));
        self
    }

    pub fn build(self) -> Compilation {
        let mut types = IndexMap::new();
        for ty in self
            .files
            .iter()
            .flat_map(|(_, types)| types.iter())
            .chain(self.references.iter())
        {
            register(&mut types, ty);
        }

        let expression_types: FxHashMap<*const GreenNodeData, TypeSymbol> = self
            .expression_types
            .iter()
            .map(|(green, ty)| (identity(green), ty.clone()))
            .collect();

        let mut compilation = Compilation {
            assembly_name: self.assembly_name,
            trees: Vec::new(),
            bindings: FxHashMap::default(),
            expression_types: FxHashMap::default(),
            types,
        };

        for (path, declared_types) in &self.files {
            let mut declared = Vec::new();
            let root = file_syntax(declared_types, &mut declared);
            let index = compilation.trees.len();
            let symbols: FxHashMap<*const GreenNodeData, Symbol> = declared
                .iter()
                .map(|(green, symbol)| (identity(green), symbol.clone()))
                .collect();
            bind(&mut compilation, index, &root, &symbols, &expression_types);
            compilation.trees.push(SyntaxTree {
                path: path.clone(),
                root,
            });
        }
        for (path, root) in self.sources {
            let index = compilation.trees.len();
            bind(&mut compilation, index, &root, &FxHashMap::default(), &expression_types);
            compilation.trees.push(SyntaxTree { path, root });
        }
        compilation
    }
}

fn identity(green: &GreenNode) -> *const GreenNodeData {
    &**green
}

fn bind(
    compilation: &mut Compilation,
    index: usize,
    root: &GreenNode,
    symbols: &FxHashMap<*const GreenNodeData, Symbol>,
    expression_types: &FxHashMap<*const GreenNodeData, TypeSymbol>,
) {
    for node in SyntaxNode::new_root(root.clone()).descendants() {
        let green = node.green();
        let pointer: *const GreenNodeData = &*green;
        if let Some(symbol) = symbols.get(&pointer) {
            compilation
                .bindings
                .insert(NodeKey::new(index, &node), symbol.clone());
        }
        if let Some(ty) = expression_types.get(&pointer) {
            compilation
                .expression_types
                .insert(NodeKey::new(index, &node), ty.clone());
        }
    }
}

fn register(types: &mut IndexMap<String, TypeSymbol>, ty: &TypeSymbol) {
    let unnamed = matches!(
        ty.kind,
        TypeKind::TypeParameter | TypeKind::Array | TypeKind::Pointer | TypeKind::Error
    );
    if unnamed || ty.special != SpecialType::None {
        return;
    }
    let key = ty.fully_qualified_metadata_name();
    if types.contains_key(&key) {
        return;
    }
    types.insert(key, ty.clone());
    let related = ty
        .base_type
        .iter()
        .chain(ty.interfaces.iter())
        .chain(ty.containing_type.iter())
        .chain(ty.attributes.iter().map(|attribute| &attribute.class));
    for other in related {
        register(types, other);
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

type Declared = Vec<(GreenNode, Symbol)>;

fn file_syntax(types: &[TypeSymbol], declared: &mut Declared) -> GreenNode {
    let is_top_level = |ty: &&TypeSymbol| {
        ty.containing_type
            .as_ref()
            .is_none_or(|containing| !types.iter().any(|other| other.ptr_eq(containing)))
    };
    let namespace = types
        .iter()
        .find(is_top_level)
        .map(|ty| ty.namespace.clone())
        .unwrap_or_default();
    let members = types
        .iter()
        .filter(is_top_level)
        .map(|ty| type_declaration(ty, types, declared))
        .collect();
    CompilationUnitSyntax::new()
        .namespace(&namespace)
        .members(members)
        .build()
}

fn type_modifiers(ty: &TypeSymbol) -> Vec<Modifier> {
    let mut modifiers = ty.accessibility.modifiers().to_vec();
    if ty.is_static {
        modifiers.push(Modifier::Static);
    }
    if ty.is_abstract && ty.kind == TypeKind::Class {
        modifiers.push(Modifier::Abstract);
    }
    if ty.is_sealed && ty.kind == TypeKind::Class {
        modifiers.push(Modifier::Sealed);
    }
    if ty.is_partial && ty.kind != TypeKind::Enum {
        modifiers.push(Modifier::Partial);
    }
    modifiers
}

fn type_declaration(ty: &TypeSymbol, all: &[TypeSymbol], declared: &mut Declared) -> MemberSyntax {
    let syntax = if ty.kind == TypeKind::Enum {
        let members = ty
            .fields()
            .filter(|field| field.is_const)
            .map(enum_member)
            .collect();
        ty.attributes
            .iter()
            .fold(EnumDeclarationSyntax::new(&ty.name), |syntax, attribute| {
                syntax.attribute_list(attribute_list(attribute))
            })
            .modifiers(&type_modifiers(ty))
            .members(members)
            .build()
    } else {
        let kind = match (ty.kind, ty.is_record) {
            (TypeKind::Struct, false) => TypeDeclarationKind::Struct,
            (TypeKind::Struct, true) => TypeDeclarationKind::RecordStruct,
            (TypeKind::Interface, _) => TypeDeclarationKind::Interface,
            (_, true) => TypeDeclarationKind::Record,
            _ => TypeDeclarationKind::Class,
        };
        let mut members: Vec<MemberSyntax> = ty
            .members
            .iter()
            .filter_map(|member| member_declaration(ty, member, declared))
            .collect();
        members.extend(
            all.iter()
                .filter(|nested| {
                    nested
                        .containing_type
                        .as_ref()
                        .is_some_and(|containing| containing.ptr_eq(ty))
                })
                .map(|nested| type_declaration(nested, all, declared)),
        );
        let mut base_list = Vec::new();
        if let Some(base) = ty
            .base_type
            .as_ref()
            .filter(|base| base.special != SpecialType::Object)
        {
            base_list.push(TypeSyntax::parse(&base.fully_qualified()));
        }
        base_list.extend(
            ty.interfaces
                .iter()
                .map(|interface| TypeSyntax::parse(&interface.fully_qualified())),
        );
        let type_parameters: Vec<String> =
            ty.type_parameters.iter().map(SmolStr::to_string).collect();
        ty.attributes
            .iter()
            .fold(TypeDeclarationSyntax::new(kind, &ty.name), |syntax, attribute| {
                syntax.attribute_list(attribute_list(attribute))
            })
            .modifiers(&type_modifiers(ty))
            .type_parameters(&type_parameters)
            .base_list(base_list)
            .members(members)
            .build()
    };
    declared.push((syntax.green().clone(), Symbol::Type(ty.clone())));
    syntax
}

fn enum_member(field: &FieldSymbol) -> EnumMemberSyntax {
    let mut member = field
        .attributes
        .iter()
        .fold(EnumMemberSyntax::new(&field.name), |member, attribute| {
            member.attribute_list(attribute_list(attribute))
        });
    if let Some(value) = field.constant_value.as_ref().and_then(ConstantValue::as_i64) {
        member = member.value(ExpressionSyntax::number(&value.to_string()));
    }
    member
}

fn member_declaration(
    owner: &TypeSymbol,
    member: &MemberSymbol,
    declared: &mut Declared,
) -> Option<MemberSyntax> {
    let (syntax, symbol) = match member {
        MemberSymbol::Field(field) if !field.is_implicitly_declared => {
            (field_declaration(field), Symbol::Field(field.clone()))
        }
        MemberSymbol::Property(property) if !property.is_implicitly_declared => {
            (property_declaration(property), Symbol::Property(property.clone()))
        }
        MemberSymbol::Method(method) => {
            (method_declaration(owner, method), Symbol::Method(method.clone()))
        }
        _ => return None,
    };
    declared.push((syntax.green().clone(), symbol));
    Some(syntax)
}

fn type_syntax(ty: &TypeSymbol) -> TypeSyntax {
    TypeSyntax::parse(&ty.fully_qualified_with_nullability())
}

fn field_declaration(field: &FieldSymbol) -> MemberSyntax {
    let mut modifiers = field.accessibility.modifiers().to_vec();
    if field.is_const {
        modifiers.push(Modifier::Const);
    } else {
        if field.is_static {
            modifiers.push(Modifier::Static);
        }
        if field.is_readonly {
            modifiers.push(Modifier::Readonly);
        }
    }
    let mut syntax = field
        .attributes
        .iter()
        .fold(
            FieldDeclarationSyntax::new(type_syntax(&field.ty), &field.name),
            |syntax, attribute| syntax.attribute_list(attribute_list(attribute)),
        )
        .modifiers(&modifiers);
    if let Some(value) = &field.constant_value {
        syntax = syntax.initializer(constant_expression(value));
    } else if field.has_initializer {
        syntax = syntax.initializer(ExpressionSyntax::default_literal());
    }
    syntax.build()
}

fn property_declaration(property: &PropertySymbol) -> MemberSyntax {
    let mut modifiers = property.accessibility.modifiers().to_vec();
    if property.is_static {
        modifiers.push(Modifier::Static);
    }
    if property.is_partial_definition {
        modifiers.push(Modifier::Partial);
    }

    let accessor_modifiers = |accessibility: Accessibility| -> &'static [Modifier] {
        if accessibility == property.accessibility {
            &[]
        } else {
            accessibility.modifiers()
        }
    };
    let mut accessors = Vec::new();
    if let Some(getter) = &property.getter {
        accessors.push(AccessorSyntax::get(Body::None).modifiers(accessor_modifiers(getter.accessibility)));
    }
    if let Some(setter) = &property.setter {
        let accessor = if setter.is_init_only {
            AccessorSyntax::init(Body::None)
        } else {
            AccessorSyntax::set(Body::None)
        };
        accessors.push(accessor.modifiers(accessor_modifiers(setter.accessibility)));
    }

    let ty = if property.returns_by_ref {
        TypeSyntax::parse(&format!("ref {}", property.ty.fully_qualified_with_nullability()))
    } else {
        type_syntax(&property.ty)
    };

    if property.is_indexer() {
        let parameters = property
            .parameters
            .iter()
            .map(|parameter| ParameterSyntax::new(type_syntax(&parameter.ty), &parameter.name))
            .collect();
        return property
            .attributes
            .iter()
            .fold(IndexerDeclarationSyntax::new(ty, parameters), |syntax, attribute| {
                syntax.attribute_list(attribute_list(attribute))
            })
            .modifiers(&modifiers)
            .accessors(accessors)
            .build();
    }

    property
        .attributes
        .iter()
        .fold(PropertyDeclarationSyntax::new(ty, &property.name), |syntax, attribute| {
            syntax.attribute_list(attribute_list(attribute))
        })
        .modifiers(&modifiers)
        .accessors(accessors)
        .build()
}

fn method_declaration(owner: &TypeSymbol, method: &MethodSymbol) -> MemberSyntax {
    let mut modifiers = match method.kind {
        MethodKind::StaticConstructor => Vec::new(),
        _ => method.accessibility.modifiers().to_vec(),
    };
    if method.is_static || method.kind == MethodKind::StaticConstructor {
        modifiers.push(Modifier::Static);
    }
    if method.is_override {
        modifiers.push(Modifier::Override);
    }
    if method.is_partial_definition {
        modifiers.push(Modifier::Partial);
    }
    let parameters: Vec<ParameterSyntax> = method
        .parameters
        .iter()
        .map(|parameter| ParameterSyntax::new(type_syntax(&parameter.ty), &parameter.name))
        .collect();
    let body = if method.is_partial_definition {
        Body::None
    } else {
        Body::Block(method.body.clone().unwrap_or_default())
    };

    match method.kind {
        MethodKind::Constructor | MethodKind::StaticConstructor => method
            .attributes
            .iter()
            .fold(ConstructorDeclarationSyntax::new(&owner.name), |syntax, attribute| {
                syntax.attribute_list(attribute_list(attribute))
            })
            .modifiers(&modifiers)
            .parameters(parameters)
            .body(body)
            .build(),
        MethodKind::Ordinary => method
            .attributes
            .iter()
            .fold(
                MethodDeclarationSyntax::new(type_syntax(&method.return_type), &method.name),
                |syntax, attribute| syntax.attribute_list(attribute_list(attribute)),
            )
            .modifiers(&modifiers)
            .parameters(parameters)
            .body(body)
            .build(),
    }
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

fn attribute_list(attribute: &AttributeData) -> AttributeListSyntax {
    let name = attribute.class.fully_qualified();
    let mut arguments: Vec<ArgumentSyntax> = attribute
        .constructor_arguments
        .iter()
        .map(|value| ArgumentSyntax::new(constant_expression(value)))
        .collect();
    arguments.extend(
        attribute
            .named_arguments
            .iter()
            .map(|(name, value)| ArgumentSyntax::name_equals(name, constant_expression(value))),
    );
    let syntax = if arguments.is_empty() {
        AttributeSyntax::new(&name)
    } else {
        AttributeSyntax::with_arguments(&name, arguments)
    };
    AttributeListSyntax::single(syntax)
}

fn constant_expression(value: &ConstantValue) -> ExpressionSyntax {
    match value {
        ConstantValue::Null => ExpressionSyntax::null(),
        ConstantValue::Error => ExpressionSyntax::default_literal(),
        ConstantValue::Primitive(primitive) => primitive_expression(primitive),
        ConstantValue::Enum { ty, value } => match ty.enum_member_name(*value) {
            Some(member) => ExpressionSyntax::qualified(&ty.fully_qualified()).member(member),
            None => {
                let literal = ExpressionSyntax::number(&value.unsigned_abs().to_string());
                let operand = if *value < 0 {
                    ExpressionSyntax::prefix(SyntaxKind::Minus, literal).parenthesized()
                } else {
                    literal
                };
                ExpressionSyntax::cast(TypeSyntax::parse(&ty.fully_qualified()), operand)
            }
        },
        ConstantValue::Type(ty) => ExpressionSyntax::type_of(TypeSyntax::parse(&ty.fully_qualified())),
        ConstantValue::Array { items, .. } => {
            ExpressionSyntax::collection(items.iter().map(constant_expression).collect())
        }
    }
}

fn primitive_expression(primitive: &Primitive) -> ExpressionSyntax {
    match primitive {
        Primitive::String(value) => ExpressionSyntax::string(value),
        Primitive::Bool(value) => ExpressionSyntax::bool(*value),
        Primitive::Char(value) => ExpressionSyntax::char(&match value {
            '\'' => "'\\''".to_string(),
            '\\' => "'\\\\'".to_string(),
            c => format!("'{c}'"),
        }),
        Primitive::SByte(v) => ExpressionSyntax::number(&v.to_string()),
        Primitive::Byte(v) => ExpressionSyntax::number(&v.to_string()),
        Primitive::Short(v) => ExpressionSyntax::number(&v.to_string()),
        Primitive::UShort(v) => ExpressionSyntax::number(&v.to_string()),
        Primitive::Int(v) => ExpressionSyntax::number(&v.to_string()),
        Primitive::UInt(v) => ExpressionSyntax::number(&format!("{v}U")),
        Primitive::Long(v) => ExpressionSyntax::number(&format!("{v}L")),
        Primitive::ULong(v) => ExpressionSyntax::number(&format!("{v}UL")),
        Primitive::Float(v) => ExpressionSyntax::float(*v),
        Primitive::Double(v) => ExpressionSyntax::double(*v),
    }
}
