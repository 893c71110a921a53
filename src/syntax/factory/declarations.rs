//! Declaration builders.
//!
//! Builders collect the parts of a declaration and produce a [`MemberSyntax`]
//! in source order: leading trivia, attribute lists, modifiers, then the
//! declaration-specific parts.

use rowan::{GreenNode, NodeOrToken};

use super::{
    ArgumentSyntax, Element, ExpressionSyntax, Modifier, StatementSyntax, TriviaSyntax,
    TypeSyntax, ident, keyword, modifiers, node, owned, punct, push_separated, syntax_wrapper,
};
use crate::syntax::SyntaxKind;

syntax_wrapper! {
    /// A type or member declaration.
    MemberSyntax,
    /// `[target: A, B(args)]`
    AttributeListSyntax,
    /// One attribute inside a list.
    AttributeSyntax,
}

impl MemberSyntax {
    /// Prepends `trivia`, merging with any trivia already present.
    pub fn with_leading_trivia(self, trivia: &TriviaSyntax) -> Self {
        if trivia.is_empty() {
            return self;
        }
        let kind = self.kind();
        let mut children: Vec<Element> = self.0.children().map(owned).collect();
        match children.first() {
            Some(NodeOrToken::Node(first))
                if SyntaxKind::from(first.kind()) == SyntaxKind::LeadingTrivia =>
            {
                let existing = TriviaSyntax(first.clone());
                children[0] = trivia.clone().concat(&existing).into();
            }
            _ => children.insert(0, trivia.clone().into()),
        }
        Self(node(kind, children))
    }
}

impl AttributeSyntax {
    /// An attribute without arguments; `name` is usually fully qualified.
    pub fn new(name: &str) -> Self {
        Self(node(
            SyntaxKind::Attribute,
            vec![TypeSyntax::parse(name).into()],
        ))
    }

    pub fn with_arguments(name: &str, args: Vec<ArgumentSyntax>) -> Self {
        let mut list = vec![punct(SyntaxKind::LParen)];
        push_separated(&mut list, args);
        list.push(punct(SyntaxKind::RParen));
        Self(node(
            SyntaxKind::Attribute,
            vec![
                TypeSyntax::parse(name).into(),
                NodeOrToken::Node(node(SyntaxKind::ArgumentList, list)),
            ],
        ))
    }
}

impl AttributeListSyntax {
    pub fn new(attributes: Vec<AttributeSyntax>) -> Self {
        Self::build(None, attributes)
    }

    pub fn single(attribute: AttributeSyntax) -> Self {
        Self::new(vec![attribute])
    }

    /// A list with an explicit target, e.g. `field` or `return`.
    pub fn targeted(target: &str, attributes: Vec<AttributeSyntax>) -> Self {
        Self::build(Some(target), attributes)
    }

    fn build(target: Option<&str>, attributes: Vec<AttributeSyntax>) -> Self {
        let mut children = vec![punct(SyntaxKind::LBracket)];
        if let Some(target) = target {
            children.push(NodeOrToken::Node(node(
                SyntaxKind::AttributeTarget,
                vec![keyword(target), punct(SyntaxKind::Colon)],
            )));
        }
        push_separated(&mut children, attributes);
        children.push(punct(SyntaxKind::RBracket));
        Self(node(SyntaxKind::AttributeList, children))
    }
}

/// Body of a method-like member or accessor.
pub enum Body {
    Block(Vec<StatementSyntax>),
    Expression(ExpressionSyntax),
    /// `;`
    None,
}

impl Body {
    fn push_into(self, children: &mut Vec<Element>) {
        match self {
            Body::Block(statements) => children.push(StatementSyntax::block_node(statements).into()),
            Body::Expression(expression) => {
                children.push(arrow_clause(expression));
                children.push(punct(SyntaxKind::Semicolon));
            }
            Body::None => children.push(punct(SyntaxKind::Semicolon)),
        }
    }
}

fn arrow_clause(expression: ExpressionSyntax) -> Element {
    NodeOrToken::Node(node(
        SyntaxKind::ArrowExpressionClause,
        vec![punct(SyntaxKind::FatArrow), expression.into()],
    ))
}

fn equals_value(expression: ExpressionSyntax) -> Element {
    NodeOrToken::Node(node(
        SyntaxKind::EqualsValue,
        vec![punct(SyntaxKind::Eq), expression.into()],
    ))
}

fn type_parameter_list(names: &[String]) -> Element {
    let mut children = vec![punct(SyntaxKind::LAngle)];
    push_separated(&mut children, names.iter().map(|n| ident(n)).collect());
    children.push(punct(SyntaxKind::RAngle));
    NodeOrToken::Node(node(SyntaxKind::TypeParameterList, children))
}

fn parameter_list(kind: SyntaxKind, parameters: Vec<ParameterSyntax>) -> Element {
    let (open, close) = match kind {
        SyntaxKind::BracketedParameterList => (SyntaxKind::LBracket, SyntaxKind::RBracket),
        _ => (SyntaxKind::LParen, SyntaxKind::RParen),
    };
    let mut children = vec![punct(open)];
    push_separated(
        &mut children,
        parameters.into_iter().map(ParameterSyntax::into_element).collect(),
    );
    children.push(punct(close));
    NodeOrToken::Node(node(kind, children))
}

/// Trivia, attribute lists and modifiers shared by every declaration.
#[derive(Default)]
struct Header {
    trivia: Option<TriviaSyntax>,
    attributes: Vec<AttributeListSyntax>,
    modifiers: Vec<Modifier>,
}

impl Header {
    fn push_into(self, children: &mut Vec<Element>) {
        if let Some(trivia) = self.trivia.filter(|t| !t.is_empty()) {
            children.push(trivia.into());
        }
        children.extend(self.attributes.into_iter().map(Into::into));
        children.push(modifiers(&self.modifiers));
    }
}

/// Adds the shared header setters to a builder.
macro_rules! header_methods {
    () => {
        pub fn leading_trivia(mut self, trivia: TriviaSyntax) -> Self {
            self.header.trivia = Some(trivia);
            self
        }

        pub fn attribute_list(mut self, list: AttributeListSyntax) -> Self {
            self.header.attributes.push(list);
            self
        }

        pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
            self.header.modifiers = modifiers.to_vec();
            self
        }
    };
}

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclarationKind {
    Class,
    Struct,
    Interface,
    Record,
    RecordStruct,
}

impl TypeDeclarationKind {
    fn syntax_kind(self) -> SyntaxKind {
        match self {
            TypeDeclarationKind::Class => SyntaxKind::ClassDecl,
            TypeDeclarationKind::Struct => SyntaxKind::StructDecl,
            TypeDeclarationKind::Interface => SyntaxKind::InterfaceDecl,
            TypeDeclarationKind::Record => SyntaxKind::RecordDecl,
            TypeDeclarationKind::RecordStruct => SyntaxKind::RecordStructDecl,
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            TypeDeclarationKind::Class => &["class"],
            TypeDeclarationKind::Struct => &["struct"],
            TypeDeclarationKind::Interface => &["interface"],
            TypeDeclarationKind::Record => &["record"],
            TypeDeclarationKind::RecordStruct => &["record", "struct"],
        }
    }
}

/// Class, struct, interface or record declaration.
pub struct TypeDeclarationSyntax {
    kind: TypeDeclarationKind,
    name: String,
    header: Header,
    type_parameters: Vec<String>,
    base_list: Vec<TypeSyntax>,
    members: Vec<MemberSyntax>,
}

impl TypeDeclarationSyntax {
    pub fn new(kind: TypeDeclarationKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            header: Header::default(),
            type_parameters: Vec::new(),
            base_list: Vec::new(),
            members: Vec::new(),
        }
    }

    header_methods!();

    pub fn type_parameters(mut self, names: &[String]) -> Self {
        self.type_parameters = names.to_vec();
        self
    }

    pub fn base_list(mut self, types: Vec<TypeSyntax>) -> Self {
        self.base_list = types;
        self
    }

    pub fn members(mut self, members: Vec<MemberSyntax>) -> Self {
        self.members = members;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.extend(self.kind.keywords().iter().map(|k| keyword(k)));
        children.push(ident(&self.name));
        if !self.type_parameters.is_empty() {
            children.push(type_parameter_list(&self.type_parameters));
        }
        if !self.base_list.is_empty() {
            let mut base = vec![punct(SyntaxKind::Colon)];
            push_separated(&mut base, self.base_list);
            children.push(NodeOrToken::Node(node(SyntaxKind::BaseList, base)));
        }
        let mut body = vec![punct(SyntaxKind::LBrace)];
        body.extend(self.members.into_iter().map(Into::into));
        body.push(punct(SyntaxKind::RBrace));
        children.push(NodeOrToken::Node(node(SyntaxKind::MemberList, body)));
        MemberSyntax(node(self.kind.syntax_kind(), children))
    }
}

/// Enum declaration.
pub struct EnumDeclarationSyntax {
    name: String,
    header: Header,
    members: Vec<EnumMemberSyntax>,
}

impl EnumDeclarationSyntax {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: Header::default(),
            members: Vec::new(),
        }
    }

    header_methods!();

    pub fn members(mut self, members: Vec<EnumMemberSyntax>) -> Self {
        self.members = members;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(keyword("enum"));
        children.push(ident(&self.name));
        let mut body = vec![punct(SyntaxKind::LBrace)];
        push_separated(
            &mut body,
            self.members.into_iter().map(EnumMemberSyntax::into_element).collect(),
        );
        body.push(punct(SyntaxKind::RBrace));
        children.push(NodeOrToken::Node(node(SyntaxKind::EnumMemberList, body)));
        MemberSyntax(node(SyntaxKind::EnumDecl, children))
    }
}

/// One enum member.
pub struct EnumMemberSyntax {
    name: String,
    trivia: Option<TriviaSyntax>,
    attributes: Vec<AttributeListSyntax>,
    value: Option<ExpressionSyntax>,
}

impl EnumMemberSyntax {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trivia: None,
            attributes: Vec::new(),
            value: None,
        }
    }

    pub fn leading_trivia(mut self, trivia: TriviaSyntax) -> Self {
        self.trivia = Some(trivia);
        self
    }

    pub fn attribute_list(mut self, list: AttributeListSyntax) -> Self {
        self.attributes.push(list);
        self
    }

    pub fn value(mut self, value: ExpressionSyntax) -> Self {
        self.value = Some(value);
        self
    }

    fn into_element(self) -> Element {
        let mut children = Vec::new();
        if let Some(trivia) = self.trivia.filter(|t| !t.is_empty()) {
            children.push(trivia.into());
        }
        children.extend(self.attributes.into_iter().map(Into::into));
        children.push(ident(&self.name));
        if let Some(value) = self.value {
            children.push(equals_value(value));
        }
        NodeOrToken::Node(node(SyntaxKind::EnumMemberDecl, children))
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

/// Field declaration with a single declarator.
pub struct FieldDeclarationSyntax {
    header: Header,
    ty: TypeSyntax,
    name: String,
    initializer: Option<ExpressionSyntax>,
}

impl FieldDeclarationSyntax {
    pub fn new(ty: TypeSyntax, name: &str) -> Self {
        Self {
            header: Header::default(),
            ty,
            name: name.to_string(),
            initializer: None,
        }
    }

    header_methods!();

    pub fn initializer(mut self, value: ExpressionSyntax) -> Self {
        self.initializer = Some(value);
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(self.ty.into());
        let mut declarator = vec![ident(&self.name)];
        if let Some(value) = self.initializer {
            declarator.push(equals_value(value));
        }
        children.push(NodeOrToken::Node(node(
            SyntaxKind::VariableDeclarator,
            declarator,
        )));
        children.push(punct(SyntaxKind::Semicolon));
        MemberSyntax(node(SyntaxKind::FieldDecl, children))
    }
}

/// `get`, `set` or `init` accessor.
pub struct AccessorSyntax {
    keyword: &'static str,
    modifiers: Vec<Modifier>,
    body: Body,
}

impl AccessorSyntax {
    pub fn get(body: Body) -> Self {
        Self {
            keyword: "get",
            modifiers: Vec::new(),
            body,
        }
    }

    pub fn set(body: Body) -> Self {
        Self {
            keyword: "set",
            modifiers: Vec::new(),
            body,
        }
    }

    pub fn init(body: Body) -> Self {
        Self {
            keyword: "init",
            modifiers: Vec::new(),
            body,
        }
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers = modifiers.to_vec();
        self
    }

    fn into_element(self) -> Element {
        let mut children = Vec::new();
        if !self.modifiers.is_empty() {
            children.push(modifiers(&self.modifiers));
        }
        children.push(keyword(self.keyword));
        self.body.push_into(&mut children);
        NodeOrToken::Node(node(SyntaxKind::AccessorDecl, children))
    }
}

fn accessor_list(accessors: Vec<AccessorSyntax>) -> Element {
    let mut children = vec![punct(SyntaxKind::LBrace)];
    children.extend(accessors.into_iter().map(AccessorSyntax::into_element));
    children.push(punct(SyntaxKind::RBrace));
    NodeOrToken::Node(node(SyntaxKind::AccessorList, children))
}

enum PropertyBody {
    Accessors(Vec<AccessorSyntax>),
    Expression(ExpressionSyntax),
}

/// Property declaration.
pub struct PropertyDeclarationSyntax {
    header: Header,
    ty: TypeSyntax,
    name: String,
    body: PropertyBody,
    initializer: Option<ExpressionSyntax>,
}

impl PropertyDeclarationSyntax {
    pub fn new(ty: TypeSyntax, name: &str) -> Self {
        Self {
            header: Header::default(),
            ty,
            name: name.to_string(),
            body: PropertyBody::Accessors(Vec::new()),
            initializer: None,
        }
    }

    header_methods!();

    pub fn accessors(mut self, accessors: Vec<AccessorSyntax>) -> Self {
        self.body = PropertyBody::Accessors(accessors);
        self
    }

    /// `Type Name => expression;`
    pub fn expression_body(mut self, expression: ExpressionSyntax) -> Self {
        self.body = PropertyBody::Expression(expression);
        self
    }

    pub fn initializer(mut self, value: ExpressionSyntax) -> Self {
        self.initializer = Some(value);
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(self.ty.into());
        children.push(ident(&self.name));
        match self.body {
            PropertyBody::Accessors(accessors) => {
                children.push(accessor_list(accessors));
                if let Some(value) = self.initializer {
                    children.push(equals_value(value));
                    children.push(punct(SyntaxKind::Semicolon));
                }
            }
            PropertyBody::Expression(expression) => {
                children.push(arrow_clause(expression));
                children.push(punct(SyntaxKind::Semicolon));
            }
        }
        MemberSyntax(node(SyntaxKind::PropertyDecl, children))
    }
}

/// Indexer declaration, `Type this[parameters] { accessors }`.
pub struct IndexerDeclarationSyntax {
    header: Header,
    ty: TypeSyntax,
    parameters: Vec<ParameterSyntax>,
    accessors: Vec<AccessorSyntax>,
}

impl IndexerDeclarationSyntax {
    pub fn new(ty: TypeSyntax, parameters: Vec<ParameterSyntax>) -> Self {
        Self {
            header: Header::default(),
            ty,
            parameters,
            accessors: Vec::new(),
        }
    }

    header_methods!();

    pub fn accessors(mut self, accessors: Vec<AccessorSyntax>) -> Self {
        self.accessors = accessors;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(self.ty.into());
        children.push(keyword("this"));
        children.push(parameter_list(
            SyntaxKind::BracketedParameterList,
            self.parameters,
        ));
        children.push(accessor_list(self.accessors));
        MemberSyntax(node(SyntaxKind::IndexerDecl, children))
    }
}

/// Method declaration.
pub struct MethodDeclarationSyntax {
    header: Header,
    return_type: TypeSyntax,
    name: String,
    type_parameters: Vec<String>,
    parameters: Vec<ParameterSyntax>,
    body: Body,
}

impl MethodDeclarationSyntax {
    pub fn new(return_type: TypeSyntax, name: &str) -> Self {
        Self {
            header: Header::default(),
            return_type,
            name: name.to_string(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            body: Body::None,
        }
    }

    header_methods!();

    pub fn type_parameters(mut self, names: &[String]) -> Self {
        self.type_parameters = names.to_vec();
        self
    }

    pub fn parameters(mut self, parameters: Vec<ParameterSyntax>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(self.return_type.into());
        children.push(ident(&self.name));
        if !self.type_parameters.is_empty() {
            children.push(type_parameter_list(&self.type_parameters));
        }
        children.push(parameter_list(SyntaxKind::ParameterList, self.parameters));
        self.body.push_into(&mut children);
        MemberSyntax(node(SyntaxKind::MethodDecl, children))
    }
}

/// Constructor declaration.
pub struct ConstructorDeclarationSyntax {
    header: Header,
    name: String,
    parameters: Vec<ParameterSyntax>,
    initializer: Option<(&'static str, Vec<ArgumentSyntax>)>,
    body: Body,
}

impl ConstructorDeclarationSyntax {
    pub fn new(name: &str) -> Self {
        Self {
            header: Header::default(),
            name: name.to_string(),
            parameters: Vec::new(),
            initializer: None,
            body: Body::Block(Vec::new()),
        }
    }

    header_methods!();

    pub fn parameters(mut self, parameters: Vec<ParameterSyntax>) -> Self {
        self.parameters = parameters;
        self
    }

    /// `: base(args)`
    pub fn base_initializer(mut self, args: Vec<ArgumentSyntax>) -> Self {
        self.initializer = Some(("base", args));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(ident(&self.name));
        children.push(parameter_list(SyntaxKind::ParameterList, self.parameters));
        if let Some((target, args)) = self.initializer {
            let mut list = vec![punct(SyntaxKind::LParen)];
            push_separated(&mut list, args);
            list.push(punct(SyntaxKind::RParen));
            children.push(NodeOrToken::Node(node(
                SyntaxKind::ConstructorInitializer,
                vec![
                    punct(SyntaxKind::Colon),
                    keyword(target),
                    NodeOrToken::Node(node(SyntaxKind::ArgumentList, list)),
                ],
            )));
        }
        self.body.push_into(&mut children);
        MemberSyntax(node(SyntaxKind::ConstructorDecl, children))
    }
}

/// User-defined operator, `Type operator op(parameters)`.
pub struct OperatorDeclarationSyntax {
    header: Header,
    return_type: TypeSyntax,
    operator: SyntaxKind,
    parameters: Vec<ParameterSyntax>,
    body: Body,
}

impl OperatorDeclarationSyntax {
    pub fn new(return_type: TypeSyntax, operator: SyntaxKind) -> Self {
        Self {
            header: Header::default(),
            return_type,
            operator,
            parameters: Vec::new(),
            body: Body::None,
        }
    }

    header_methods!();

    pub fn parameters(mut self, parameters: Vec<ParameterSyntax>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(self.return_type.into());
        children.push(keyword("operator"));
        children.push(punct(self.operator));
        children.push(parameter_list(SyntaxKind::ParameterList, self.parameters));
        self.body.push_into(&mut children);
        MemberSyntax(node(SyntaxKind::OperatorDecl, children))
    }
}

/// `implicit operator Type(parameter)` or the explicit form.
pub struct ConversionOperatorDeclarationSyntax {
    header: Header,
    implicit: bool,
    ty: TypeSyntax,
    parameters: Vec<ParameterSyntax>,
    body: Body,
}

impl ConversionOperatorDeclarationSyntax {
    pub fn implicit(ty: TypeSyntax) -> Self {
        Self {
            header: Header::default(),
            implicit: true,
            ty,
            parameters: Vec::new(),
            body: Body::None,
        }
    }

    pub fn explicit(ty: TypeSyntax) -> Self {
        Self {
            implicit: false,
            ..Self::implicit(ty)
        }
    }

    header_methods!();

    pub fn parameters(mut self, parameters: Vec<ParameterSyntax>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> MemberSyntax {
        let mut children = Vec::new();
        self.header.push_into(&mut children);
        children.push(keyword(if self.implicit { "implicit" } else { "explicit" }));
        children.push(keyword("operator"));
        children.push(self.ty.into());
        children.push(parameter_list(SyntaxKind::ParameterList, self.parameters));
        self.body.push_into(&mut children);
        MemberSyntax(node(SyntaxKind::ConversionOperatorDecl, children))
    }
}

/// A parameter in a method, constructor, operator or indexer list.
pub struct ParameterSyntax {
    modifiers: Vec<Modifier>,
    ty: TypeSyntax,
    name: String,
    default: Option<ExpressionSyntax>,
}

impl ParameterSyntax {
    pub fn new(ty: TypeSyntax, name: &str) -> Self {
        Self {
            modifiers: Vec::new(),
            ty,
            name: name.to_string(),
            default: None,
        }
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers = modifiers.to_vec();
        self
    }

    pub fn default_value(mut self, value: ExpressionSyntax) -> Self {
        self.default = Some(value);
        self
    }

    fn into_element(self) -> Element {
        let mut children = Vec::new();
        if !self.modifiers.is_empty() {
            children.push(modifiers(&self.modifiers));
        }
        children.push(self.ty.into());
        children.push(ident(&self.name));
        if let Some(value) = self.default {
            children.push(equals_value(value));
        }
        NodeOrToken::Node(node(SyntaxKind::Parameter, children))
    }
}

// ============================================================================
// COMPILATION UNIT
// ============================================================================

/// A whole file: usings, an optional file-scoped namespace and members.
#[derive(Default)]
pub struct CompilationUnitSyntax {
    usings: Vec<String>,
    trivia: Option<TriviaSyntax>,
    namespace: Option<String>,
    members: Vec<MemberSyntax>,
}

impl CompilationUnitSyntax {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn using(mut self, name: &str) -> Self {
        self.usings.push(name.to_string());
        self
    }

    /// Trivia written before the namespace declaration.
    pub fn leading_trivia(mut self, trivia: TriviaSyntax) -> Self {
        self.trivia = Some(trivia);
        self
    }

    /// Places members in `namespace X;`; empty names mean the global namespace.
    pub fn namespace(mut self, name: &str) -> Self {
        self.namespace = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn member(mut self, member: MemberSyntax) -> Self {
        self.members.push(member);
        self
    }

    pub fn members(mut self, members: Vec<MemberSyntax>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn build(self) -> GreenNode {
        let mut children: Vec<Element> = self
            .usings
            .iter()
            .map(|name| {
                NodeOrToken::Node(node(
                    SyntaxKind::UsingDirective,
                    vec![
                        keyword("using"),
                        TypeSyntax::parse(name).into(),
                        punct(SyntaxKind::Semicolon),
                    ],
                ))
            })
            .collect();

        let trivia = self.trivia.filter(|t| !t.is_empty()).map(Element::from);
        let members = self.members.into_iter().map(Into::into);
        match self.namespace {
            Some(namespace) => {
                let mut namespace_children: Vec<Element> = trivia.into_iter().collect();
                namespace_children.extend([
                    keyword("namespace"),
                    TypeSyntax::parse(&namespace).into(),
                    punct(SyntaxKind::Semicolon),
                ]);
                namespace_children.extend(members);
                children.push(NodeOrToken::Node(node(
                    SyntaxKind::FileScopedNamespace,
                    namespace_children,
                )));
            }
            None => {
                children.extend(trivia);
                children.extend(members);
            }
        }
        node(SyntaxKind::CompilationUnit, children)
    }
}
