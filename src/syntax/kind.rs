//! Syntax kinds for the C# green trees

/// All syntax kinds (tokens and nodes) the factory and host trees use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // === Trivia ===
    Whitespace = 0,
    LineComment,
    DocComment,
    Directive,

    // === Words and literals ===
    Identifier,
    Keyword,
    StringLiteral,
    CharLiteral,
    NumericLiteral,
    InterpolatedString,

    // === Punctuation ===
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `<` opening a type argument or parameter list
    LAngle,
    /// `>` closing a type argument or parameter list
    RAngle,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Semicolon,
    Comma,
    Dot,
    Colon,
    ColonColon,
    Question,
    QuestionQuestion,
    QuestionQuestionEq,
    Eq,
    EqEq,
    NotEq,
    FatArrow,
    Plus,
    Minus,
    Star,
    Amp,
    AmpAmp,
    PipePipe,
    Pipe,
    Bang,
    PlusPlus,
    MinusMinus,

    // === Declarations ===
    CompilationUnit,
    UsingDirective,
    FileScopedNamespace,
    NamespaceDecl,
    ClassDecl,
    StructDecl,
    InterfaceDecl,
    RecordDecl,
    RecordStructDecl,
    EnumDecl,
    Modifiers,
    TypeParameterList,
    BaseList,
    MemberList,
    AttributeList,
    AttributeTarget,
    Attribute,
    FieldDecl,
    VariableDeclarator,
    EqualsValue,
    PropertyDecl,
    IndexerDecl,
    MethodDecl,
    ConstructorDecl,
    ConstructorInitializer,
    OperatorDecl,
    ConversionOperatorDecl,
    EnumMemberList,
    EnumMemberDecl,
    AccessorList,
    AccessorDecl,
    ParameterList,
    BracketedParameterList,
    Parameter,
    ArrowExpressionClause,
    LeadingTrivia,

    // === Statements ===
    Block,
    ExpressionStatement,
    ReturnStatement,
    LocalDeclarationStatement,
    IfStatement,
    ThrowStatement,
    EmptyStatement,

    // === Types ===
    Type,
    GenericName,
    TypeArgumentList,

    // === Expressions ===
    IdentifierName,
    MemberAccess,
    Invocation,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    Literal,
    ObjectCreation,
    TypeOf,
    DefaultExpr,
    Cast,
    Parenthesized,
    PrefixUnary,
    PostfixUnary,
    Binary,
    Assignment,
    Lambda,
    SwitchExpression,
    SwitchArmList,
    SwitchArm,
    IsPattern,
    Pattern,
    ElementAccess,
    ThrowExpression,
    CollectionExpression,

    // === Special ===
    Error,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::DocComment
                | SyntaxKind::Directive
        )
    }

    /// Class, struct, interface, record and enum declarations.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDecl
                | SyntaxKind::StructDecl
                | SyntaxKind::InterfaceDecl
                | SyntaxKind::RecordDecl
                | SyntaxKind::RecordStructDecl
                | SyntaxKind::EnumDecl
        )
    }

    /// Declarations that can carry attribute lists.
    pub fn is_member_declaration(self) -> bool {
        self.is_type_declaration()
            || matches!(
                self,
                SyntaxKind::FieldDecl
                    | SyntaxKind::PropertyDecl
                    | SyntaxKind::IndexerDecl
                    | SyntaxKind::MethodDecl
                    | SyntaxKind::ConstructorDecl
                    | SyntaxKind::OperatorDecl
                    | SyntaxKind::ConversionOperatorDecl
                    | SyntaxKind::EnumMemberDecl
            )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::ExpressionStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::ThrowStatement
                | SyntaxKind::EmptyStatement
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 <= SyntaxKind::Error as u16, "unknown syntax kind {}", raw.0);
        // Safety: the discriminants are contiguous from zero up to `Error`
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CsLanguage {}

impl rowan::Language for CsLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CsLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CsLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CsLanguage>;
