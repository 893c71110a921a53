//! Resolved program symbols.
//!
//! Symbols are shared through `Arc` and compare by identity only: two
//! structurally identical symbols are still different host objects. Nothing
//! downstream of snapshotting may keep one, which is why none of these types
//! implement `PartialEq`.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::syntax::factory::{Modifier, StatementSyntax};

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    ProtectedAndInternal,
    Protected,
    Internal,
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    /// Modifier keywords spelling this accessibility.
    pub fn modifiers(self) -> &'static [Modifier] {
        match self {
            Accessibility::NotApplicable => &[],
            Accessibility::Private => &[Modifier::Private],
            Accessibility::ProtectedAndInternal => &[Modifier::Private, Modifier::Protected],
            Accessibility::Protected => &[Modifier::Protected],
            Accessibility::Internal => &[Modifier::Internal],
            Accessibility::ProtectedOrInternal => &[Modifier::Protected, Modifier::Internal],
            Accessibility::Public => &[Modifier::Public],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    TypeParameter,
    Array,
    Pointer,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    StaticConstructor,
}

/// Types the language spells with a keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SpecialType {
    #[default]
    None,
    Object,
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    String,
    IntPtr,
    UIntPtr,
}

impl SpecialType {
    pub fn keyword(self) -> Option<&'static str> {
        Some(match self {
            SpecialType::None => return None,
            SpecialType::Object => "object",
            SpecialType::Void => "void",
            SpecialType::Boolean => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Int16 => "short",
            SpecialType::UInt16 => "ushort",
            SpecialType::Int32 => "int",
            SpecialType::UInt32 => "uint",
            SpecialType::Int64 => "long",
            SpecialType::UInt64 => "ulong",
            SpecialType::Single => "float",
            SpecialType::Double => "double",
            SpecialType::Decimal => "decimal",
            SpecialType::String => "string",
            SpecialType::IntPtr => "nint",
            SpecialType::UIntPtr => "nuint",
        })
    }

    /// Name of the type in the `System` namespace.
    pub fn metadata_name(self) -> &'static str {
        match self {
            SpecialType::None => "",
            SpecialType::Object => "Object",
            SpecialType::Void => "Void",
            SpecialType::Boolean => "Boolean",
            SpecialType::Char => "Char",
            SpecialType::SByte => "SByte",
            SpecialType::Byte => "Byte",
            SpecialType::Int16 => "Int16",
            SpecialType::UInt16 => "UInt16",
            SpecialType::Int32 => "Int32",
            SpecialType::UInt32 => "UInt32",
            SpecialType::Int64 => "Int64",
            SpecialType::UInt64 => "UInt64",
            SpecialType::Single => "Single",
            SpecialType::Double => "Double",
            SpecialType::Decimal => "Decimal",
            SpecialType::String => "String",
            SpecialType::IntPtr => "IntPtr",
            SpecialType::UIntPtr => "UIntPtr",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "object" => SpecialType::Object,
            "void" => SpecialType::Void,
            "bool" => SpecialType::Boolean,
            "char" => SpecialType::Char,
            "sbyte" => SpecialType::SByte,
            "byte" => SpecialType::Byte,
            "short" => SpecialType::Int16,
            "ushort" => SpecialType::UInt16,
            "int" => SpecialType::Int32,
            "uint" => SpecialType::UInt32,
            "long" => SpecialType::Int64,
            "ulong" => SpecialType::UInt64,
            "float" => SpecialType::Single,
            "double" => SpecialType::Double,
            "decimal" => SpecialType::Decimal,
            "string" => SpecialType::String,
            "nint" => SpecialType::IntPtr,
            "nuint" => SpecialType::UIntPtr,
            _ => return None,
        })
    }

    fn is_value_type(self) -> bool {
        !matches!(
            self,
            SpecialType::None | SpecialType::Object | SpecialType::String | SpecialType::Void
        )
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// A named type, type parameter, array or pointer.
#[derive(Clone)]
pub struct TypeSymbol(Arc<TypeData>);

#[derive(Clone)]
pub struct TypeData {
    pub name: SmolStr,
    pub kind: TypeKind,
    pub special: SpecialType,
    /// Dotted namespace; empty for the global namespace.
    pub namespace: SmolStr,
    pub containing_type: Option<TypeSymbol>,
    pub type_parameters: Vec<SmolStr>,
    pub type_arguments: Vec<TypeSymbol>,
    /// `List<>` as written in `typeof(List<>)`.
    pub is_unbound_generic: bool,
    /// Carries a `?` annotation.
    pub nullable: bool,
    pub is_record: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_partial: bool,
    pub accessibility: Accessibility,
    pub base_type: Option<TypeSymbol>,
    pub interfaces: Vec<TypeSymbol>,
    pub attributes: Vec<AttributeData>,
    pub members: Vec<MemberSymbol>,
    /// Element of an array or pointer type.
    pub element_type: Option<TypeSymbol>,
}

impl Deref for TypeSymbol {
    type Target = TypeData;

    fn deref(&self) -> &TypeData {
        &self.0
    }
}

impl fmt::Debug for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeSymbol({})", self.fully_qualified_with_nullability())
    }
}

impl TypeData {
    fn new(kind: TypeKind, namespace: &str, name: &str) -> Self {
        Self {
            name: name.into(),
            kind,
            special: SpecialType::None,
            namespace: namespace.into(),
            containing_type: None,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            is_unbound_generic: false,
            nullable: false,
            is_record: false,
            is_static: false,
            is_abstract: false,
            is_sealed: false,
            is_partial: true,
            accessibility: Accessibility::Internal,
            base_type: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            element_type: None,
        }
    }
}

impl TypeSymbol {
    pub fn class(namespace: &str, name: &str) -> TypeBuilder {
        TypeBuilder(TypeData::new(TypeKind::Class, namespace, name))
    }

    pub fn structure(namespace: &str, name: &str) -> TypeBuilder {
        TypeBuilder(TypeData::new(TypeKind::Struct, namespace, name))
    }

    pub fn interface(namespace: &str, name: &str) -> TypeBuilder {
        TypeBuilder(TypeData::new(TypeKind::Interface, namespace, name))
    }

    pub fn enumeration(namespace: &str, name: &str) -> TypeBuilder {
        TypeBuilder(TypeData::new(TypeKind::Enum, namespace, name))
    }

    /// A keyword type such as `int` or `string`.
    pub fn special(special: SpecialType) -> Self {
        let kind = if special.is_value_type() {
            TypeKind::Struct
        } else {
            TypeKind::Class
        };
        let mut data = TypeData::new(kind, "System", special.metadata_name());
        data.special = special;
        data.accessibility = Accessibility::Public;
        data.is_partial = false;
        Self(Arc::new(data))
    }

    pub fn type_parameter(name: &str) -> Self {
        let mut data = TypeData::new(TypeKind::TypeParameter, "", name);
        data.accessibility = Accessibility::NotApplicable;
        data.is_partial = false;
        Self(Arc::new(data))
    }

    pub fn array(element: TypeSymbol) -> Self {
        let mut data = TypeData::new(TypeKind::Array, "", "");
        data.element_type = Some(element);
        data.is_partial = false;
        Self(Arc::new(data))
    }

    pub fn pointer(element: TypeSymbol) -> Self {
        let mut data = TypeData::new(TypeKind::Pointer, "", "");
        data.element_type = Some(element);
        data.is_partial = false;
        Self(Arc::new(data))
    }

    /// A constructed generic, `Definition<arguments>`.
    pub fn construct(&self, arguments: Vec<TypeSymbol>) -> Self {
        let mut data = (*self.0).clone();
        data.type_arguments = arguments;
        data.is_unbound_generic = false;
        Self(Arc::new(data))
    }

    /// The open generic form, `Definition<>`.
    pub fn unbound(&self) -> Self {
        let mut data = (*self.0).clone();
        data.type_arguments.clear();
        data.is_unbound_generic = true;
        Self(Arc::new(data))
    }

    /// This type with a `?` annotation.
    pub fn annotated(&self) -> Self {
        if self.nullable {
            return self.clone();
        }
        let mut data = (*self.0).clone();
        data.nullable = true;
        Self(Arc::new(data))
    }

    /// Whether both handles refer to the same host object.
    pub fn ptr_eq(&self, other: &TypeSymbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_value_type(&self) -> bool {
        match self.kind {
            TypeKind::Struct | TypeKind::Enum => true,
            _ => self.special.is_value_type(),
        }
    }

    pub fn is_reference_type(&self) -> bool {
        match self.kind {
            TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array => {
                !self.special.is_value_type()
            }
            _ => false,
        }
    }

    /// Number of type parameters of the generic definition.
    pub fn arity(&self) -> usize {
        self.type_parameters.len().max(self.type_arguments.len())
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSymbol> {
        self.members.iter().filter_map(|member| match member {
            MemberSymbol::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertySymbol> {
        self.members.iter().filter_map(|member| match member {
            MemberSymbol::Property(property) => Some(property),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.members.iter().filter_map(|member| match member {
            MemberSymbol::Method(method) => Some(method),
            _ => None,
        })
    }

    /// Name of the enum member whose constant equals `value`.
    pub fn enum_member_name(&self, value: i64) -> Option<&SmolStr> {
        self.fields()
            .find(|field| {
                field.is_const
                    && field
                        .constant_value
                        .as_ref()
                        .and_then(ConstantValue::as_i64)
                        == Some(value)
            })
            .map(|field| &field.name)
    }
}

/// Assembles a [`TypeSymbol`].
pub struct TypeBuilder(TypeData);

impl TypeBuilder {
    pub fn nested_in(mut self, containing: &TypeSymbol) -> Self {
        self.0.namespace = containing.namespace.clone();
        self.0.containing_type = Some(containing.clone());
        self
    }

    pub fn type_parameters(mut self, names: &[&str]) -> Self {
        self.0.type_parameters = names.iter().map(|n| SmolStr::new(n)).collect();
        self
    }

    pub fn record(mut self) -> Self {
        self.0.is_record = true;
        self
    }

    pub fn static_type(mut self) -> Self {
        self.0.is_static = true;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.0.is_abstract = true;
        self
    }

    pub fn sealed(mut self) -> Self {
        self.0.is_sealed = true;
        self
    }

    pub fn not_partial(mut self) -> Self {
        self.0.is_partial = false;
        self
    }

    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.0.accessibility = accessibility;
        self
    }

    pub fn base(mut self, base: &TypeSymbol) -> Self {
        self.0.base_type = Some(base.clone());
        self
    }

    pub fn interface(mut self, interface: &TypeSymbol) -> Self {
        self.0.interfaces.push(interface.clone());
        self
    }

    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.0.attributes.push(attribute);
        self
    }

    pub fn field(mut self, field: FieldSymbol) -> Self {
        self.0.members.push(MemberSymbol::Field(field));
        self
    }

    pub fn property(mut self, property: PropertySymbol) -> Self {
        self.0.members.push(MemberSymbol::Property(property));
        self
    }

    pub fn method(mut self, method: MethodSymbol) -> Self {
        self.0.members.push(MemberSymbol::Method(method));
        self
    }

    /// Appends `name = value` as an enum member.
    pub fn enum_member(self, name: &str, value: i64) -> Self {
        let underlying = TypeSymbol::special(SpecialType::Int32);
        self.field(
            FieldSymbol::new(name, &underlying)
                .accessibility(Accessibility::Public)
                .constant(ConstantValue::Primitive(Primitive::Long(value)))
                .build(),
        )
    }

    /// Appends an enum member carrying attributes.
    pub fn enum_member_with(self, name: &str, value: i64, attributes: Vec<AttributeData>) -> Self {
        let underlying = TypeSymbol::special(SpecialType::Int32);
        let mut field = FieldSymbol::new(name, &underlying)
            .accessibility(Accessibility::Public)
            .constant(ConstantValue::Primitive(Primitive::Long(value)));
        for attribute in attributes {
            field = field.attribute(attribute);
        }
        self.field(field.build())
    }

    pub fn build(self) -> TypeSymbol {
        TypeSymbol(Arc::new(self.0))
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Clone, Debug)]
pub enum MemberSymbol {
    Field(FieldSymbol),
    Property(PropertySymbol),
    Method(MethodSymbol),
}

/// Any symbol a declaration can bind to.
#[derive(Clone, Debug)]
pub enum Symbol {
    Type(TypeSymbol),
    Field(FieldSymbol),
    Property(PropertySymbol),
    Method(MethodSymbol),
}

impl Symbol {
    pub fn attributes(&self) -> &[AttributeData] {
        match self {
            Symbol::Type(symbol) => &symbol.attributes,
            Symbol::Field(symbol) => &symbol.attributes,
            Symbol::Property(symbol) => &symbol.attributes,
            Symbol::Method(symbol) => &symbol.attributes,
        }
    }

    pub fn as_type(&self) -> Option<&TypeSymbol> {
        match self {
            Symbol::Type(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            Symbol::Method(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertySymbol> {
        match self {
            Symbol::Property(symbol) => Some(symbol),
            _ => None,
        }
    }
}

macro_rules! shared_symbol {
    ($name:ident, $data:ident) => {
        #[derive(Clone)]
        pub struct $name(Arc<$data>);

        impl Deref for $name {
            type Target = $data;

            fn deref(&self) -> &$data {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.name)
            }
        }

        impl $name {
            pub fn ptr_eq(&self, other: &$name) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }
    };
}

shared_symbol!(FieldSymbol, FieldData);
shared_symbol!(PropertySymbol, PropertyData);
shared_symbol!(MethodSymbol, MethodData);
shared_symbol!(ParameterSymbol, ParameterData);

#[derive(Clone)]
pub struct FieldData {
    pub name: SmolStr,
    pub ty: TypeSymbol,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_const: bool,
    pub has_initializer: bool,
    /// Compiler-synthesized, e.g. a property backing field.
    pub is_implicitly_declared: bool,
    /// The property this field backs.
    pub associated_property: Option<SmolStr>,
    pub constant_value: Option<ConstantValue>,
    pub attributes: Vec<AttributeData>,
}

/// Assembles a [`FieldSymbol`].
pub struct FieldBuilder(FieldData);

impl FieldSymbol {
    pub fn new(name: &str, ty: &TypeSymbol) -> FieldBuilder {
        FieldBuilder(FieldData {
            name: name.into(),
            ty: ty.clone(),
            accessibility: Accessibility::Private,
            is_static: false,
            is_readonly: false,
            is_const: false,
            has_initializer: false,
            is_implicitly_declared: false,
            associated_property: None,
            constant_value: None,
            attributes: Vec::new(),
        })
    }
}

impl FieldBuilder {
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.0.accessibility = accessibility;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.0.is_readonly = true;
        self
    }

    pub fn static_field(mut self) -> Self {
        self.0.is_static = true;
        self
    }

    pub fn constant(mut self, value: ConstantValue) -> Self {
        self.0.is_const = true;
        self.0.is_static = true;
        self.0.has_initializer = true;
        self.0.constant_value = Some(value);
        self
    }

    pub fn with_initializer(mut self) -> Self {
        self.0.has_initializer = true;
        self
    }

    /// Marks the field as the synthesized backing field of `property`.
    pub fn backing(mut self, property: &str) -> Self {
        self.0.is_implicitly_declared = true;
        self.0.associated_property = Some(property.into());
        self
    }

    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.0.attributes.push(attribute);
        self
    }

    pub fn build(self) -> FieldSymbol {
        FieldSymbol(Arc::new(self.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessorData {
    pub accessibility: Accessibility,
    pub is_init_only: bool,
}

#[derive(Clone)]
pub struct PropertyData {
    pub name: SmolStr,
    pub ty: TypeSymbol,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub getter: Option<AccessorData>,
    pub setter: Option<AccessorData>,
    /// Indexer parameters; empty for ordinary properties.
    pub parameters: Vec<ParameterSymbol>,
    /// A `partial` declaration without an implementation.
    pub is_partial_definition: bool,
    pub is_implicitly_declared: bool,
    pub returns_by_ref: bool,
    pub attributes: Vec<AttributeData>,
}

impl PropertyData {
    pub fn is_indexer(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// No setter at all.
    pub fn is_readonly(&self) -> bool {
        self.setter.is_none()
    }
}

/// Assembles a [`PropertySymbol`].
pub struct PropertyBuilder(PropertyData);

impl PropertySymbol {
    /// A public `{ get; set; }` property.
    pub fn new(name: &str, ty: &TypeSymbol) -> PropertyBuilder {
        let accessor = AccessorData {
            accessibility: Accessibility::Public,
            is_init_only: false,
        };
        PropertyBuilder(PropertyData {
            name: name.into(),
            ty: ty.clone(),
            accessibility: Accessibility::Public,
            is_static: false,
            getter: Some(accessor),
            setter: Some(accessor),
            parameters: Vec::new(),
            is_partial_definition: false,
            is_implicitly_declared: false,
            returns_by_ref: false,
            attributes: Vec::new(),
        })
    }

    /// `Type this[parameter] { get; set; }`
    pub fn indexer(ty: &TypeSymbol, parameter: ParameterSymbol) -> PropertyBuilder {
        let mut builder = Self::new("this[]", ty);
        builder.0.parameters.push(parameter);
        builder
    }
}

impl PropertyBuilder {
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.0.accessibility = accessibility;
        if let Some(getter) = self.0.getter.as_mut() {
            getter.accessibility = accessibility;
        }
        if let Some(setter) = self.0.setter.as_mut() {
            setter.accessibility = accessibility;
        }
        self
    }

    pub fn static_property(mut self) -> Self {
        self.0.is_static = true;
        self
    }

    pub fn get_only(mut self) -> Self {
        self.0.setter = None;
        self
    }

    pub fn set_only(mut self) -> Self {
        self.0.getter = None;
        self
    }

    pub fn init_only(mut self) -> Self {
        if let Some(setter) = self.0.setter.as_mut() {
            setter.is_init_only = true;
        }
        self
    }

    pub fn setter_accessibility(mut self, accessibility: Accessibility) -> Self {
        if let Some(setter) = self.0.setter.as_mut() {
            setter.accessibility = accessibility;
        }
        self
    }

    pub fn partial_definition(mut self) -> Self {
        self.0.is_partial_definition = true;
        self
    }

    pub fn by_ref(mut self) -> Self {
        self.0.returns_by_ref = true;
        self
    }

    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.0.attributes.push(attribute);
        self
    }

    pub fn build(self) -> PropertySymbol {
        PropertySymbol(Arc::new(self.0))
    }
}

#[derive(Clone)]
pub struct MethodData {
    pub name: SmolStr,
    pub kind: MethodKind,
    pub return_type: TypeSymbol,
    pub parameters: Vec<ParameterSymbol>,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_override: bool,
    pub is_partial_definition: bool,
    pub attributes: Vec<AttributeData>,
    /// Statements of the declaring syntax, if any were written.
    pub body: Option<Vec<StatementSyntax>>,
}

/// Assembles a [`MethodSymbol`].
pub struct MethodBuilder(MethodData);

impl MethodSymbol {
    pub fn new(name: &str, return_type: &TypeSymbol) -> MethodBuilder {
        MethodBuilder(MethodData {
            name: name.into(),
            kind: MethodKind::Ordinary,
            return_type: return_type.clone(),
            parameters: Vec::new(),
            accessibility: Accessibility::Public,
            is_static: false,
            is_override: false,
            is_partial_definition: false,
            attributes: Vec::new(),
            body: None,
        })
    }

    /// An instance constructor of `containing`.
    pub fn constructor(containing: &str) -> MethodBuilder {
        let mut builder = Self::new(containing, &TypeSymbol::special(SpecialType::Void));
        builder.0.kind = MethodKind::Constructor;
        builder
    }
}

impl MethodBuilder {
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.0.accessibility = accessibility;
        self
    }

    pub fn parameter(mut self, parameter: ParameterSymbol) -> Self {
        self.0.parameters.push(parameter);
        self
    }

    pub fn static_method(mut self) -> Self {
        self.0.is_static = true;
        self
    }

    pub fn override_method(mut self) -> Self {
        self.0.is_override = true;
        self
    }

    pub fn partial_definition(mut self) -> Self {
        self.0.is_partial_definition = true;
        self
    }

    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.0.attributes.push(attribute);
        self
    }

    pub fn body(mut self, statements: Vec<StatementSyntax>) -> Self {
        self.0.body = Some(statements);
        self
    }

    pub fn build(self) -> MethodSymbol {
        MethodSymbol(Arc::new(self.0))
    }
}

#[derive(Clone)]
pub struct ParameterData {
    pub name: SmolStr,
    pub ty: TypeSymbol,
}

impl ParameterSymbol {
    pub fn new(name: &str, ty: &TypeSymbol) -> Self {
        Self(Arc::new(ParameterData {
            name: name.into(),
            ty: ty.clone(),
        }))
    }
}

// ============================================================================
// ATTRIBUTES AND CONSTANTS
// ============================================================================

/// An applied attribute with its bound arguments.
#[derive(Clone, Debug)]
pub struct AttributeData {
    pub class: TypeSymbol,
    pub constructor_arguments: Vec<ConstantValue>,
    pub named_arguments: Vec<(SmolStr, ConstantValue)>,
}

impl AttributeData {
    pub fn new(class: &TypeSymbol) -> Self {
        Self {
            class: class.clone(),
            constructor_arguments: Vec::new(),
            named_arguments: Vec::new(),
        }
    }

    pub fn arg(mut self, value: ConstantValue) -> Self {
        self.constructor_arguments.push(value);
        self
    }

    pub fn named(mut self, name: &str, value: ConstantValue) -> Self {
        self.named_arguments.push((name.into(), value));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    String(SmolStr),
    Bool(bool),
    Char(char),
    SByte(i8),
    Byte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
}

/// A compile-time constant as bound by the host.
#[derive(Clone, Debug)]
pub enum ConstantValue {
    Null,
    Primitive(Primitive),
    Enum { ty: TypeSymbol, value: i64 },
    Type(TypeSymbol),
    Array {
        element_type: TypeSymbol,
        items: Vec<ConstantValue>,
    },
    /// An argument the host failed to bind.
    Error,
}

impl ConstantValue {
    pub fn string(value: &str) -> Self {
        Self::Primitive(Primitive::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::Primitive(Primitive::Bool(value))
    }

    pub fn int(value: i32) -> Self {
        Self::Primitive(Primitive::Int(value))
    }

    pub fn enum_value(ty: &TypeSymbol, value: i64) -> Self {
        Self::Enum {
            ty: ty.clone(),
            value,
        }
    }

    pub fn type_of(ty: &TypeSymbol) -> Self {
        Self::Type(ty.clone())
    }

    /// Integral value of an integer or enum constant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConstantValue::Enum { value, .. } => Some(*value),
            ConstantValue::Primitive(primitive) => match *primitive {
                Primitive::SByte(v) => Some(v.into()),
                Primitive::Byte(v) => Some(v.into()),
                Primitive::Short(v) => Some(v.into()),
                Primitive::UShort(v) => Some(v.into()),
                Primitive::Int(v) => Some(v.into()),
                Primitive::UInt(v) => Some(v.into()),
                Primitive::Long(v) => Some(v),
                Primitive::ULong(v) => i64::try_from(v).ok(),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::Primitive(Primitive::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstantValue::Primitive(Primitive::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_types_are_value_or_reference() {
        assert!(TypeSymbol::special(SpecialType::Int32).is_value_type());
        assert!(TypeSymbol::special(SpecialType::String).is_reference_type());
        assert!(!TypeSymbol::special(SpecialType::String).is_value_type());
        let t = TypeSymbol::type_parameter("T");
        assert!(!t.is_value_type() && !t.is_reference_type());
    }

    #[test]
    fn test_enum_member_lookup() {
        let lifetime = TypeSymbol::enumeration("Microsoft.Extensions.DependencyInjection", "ServiceLifetime")
            .enum_member("Singleton", 0)
            .enum_member("Scoped", 1)
            .enum_member("Transient", 2)
            .build();
        assert_eq!(lifetime.enum_member_name(1).map(SmolStr::as_str), Some("Scoped"));
        assert_eq!(lifetime.enum_member_name(7), None);
    }

    #[test]
    fn test_symbols_compare_by_identity() {
        let a = TypeSymbol::class("N", "A").build();
        let b = TypeSymbol::class("N", "A").build();
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_property_shapes() {
        let int = TypeSymbol::special(SpecialType::Int32);
        let readonly = PropertySymbol::new("Count", &int).get_only().build();
        assert!(readonly.is_readonly());
        let indexer =
            PropertySymbol::indexer(&int, ParameterSymbol::new("index", &int)).build();
        assert!(indexer.is_indexer());
    }
}
