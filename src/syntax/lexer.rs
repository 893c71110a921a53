//! Lexer for C# type names and member signatures using Logos
//!
//! Descriptors carry types as display strings (`global::System.Int32?`) and
//! endpoint files carry method signatures as text. Both are tokenized here
//! so the factory can build real token sequences instead of opaque text.
//! Angle brackets are always read as type argument brackets.

use logos::Logos;

use super::SyntaxKind;

/// Token with text and kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Logos-based token types
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*", priority = 2, allow_greedy = true)]
    LineComment,

    #[regex(r"@?[\p{L}_][\p{L}\p{N}_]*")]
    Word,

    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?[A-Za-z]*")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)'")]
    Char,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("??=")]
    QuestionQuestionEq,
    #[token("??")]
    QuestionQuestion,
    #[token("?")]
    Question,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("&&")]
    AmpAmp,
    #[token("&")]
    Amp,
    #[token("||")]
    PipePipe,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
}

/// Reserved words plus the contextual keywords the factory emits as keywords.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
    // contextual
    "async", "file", "get", "global", "init", "nint", "not", "nuint", "partial", "record", "set",
    "required", "scoped",
];

/// Whether `text` is spelled as a keyword.
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

fn to_syntax_kind(token: LogosToken, text: &str) -> SyntaxKind {
    match token {
        LogosToken::Whitespace => SyntaxKind::Whitespace,
        LogosToken::LineComment => SyntaxKind::LineComment,
        LogosToken::Word if is_keyword(text) => SyntaxKind::Keyword,
        LogosToken::Word => SyntaxKind::Identifier,
        LogosToken::Number => SyntaxKind::NumericLiteral,
        LogosToken::String => SyntaxKind::StringLiteral,
        LogosToken::Char => SyntaxKind::CharLiteral,
        LogosToken::LBrace => SyntaxKind::LBrace,
        LogosToken::RBrace => SyntaxKind::RBrace,
        LogosToken::LParen => SyntaxKind::LParen,
        LogosToken::RParen => SyntaxKind::RParen,
        LogosToken::LBracket => SyntaxKind::LBracket,
        LogosToken::RBracket => SyntaxKind::RBracket,
        LogosToken::LtEq => SyntaxKind::LtEq,
        LogosToken::GtEq => SyntaxKind::GtEq,
        LogosToken::LAngle => SyntaxKind::LAngle,
        LogosToken::RAngle => SyntaxKind::RAngle,
        LogosToken::Semicolon => SyntaxKind::Semicolon,
        LogosToken::Comma => SyntaxKind::Comma,
        LogosToken::Dot => SyntaxKind::Dot,
        LogosToken::ColonColon => SyntaxKind::ColonColon,
        LogosToken::Colon => SyntaxKind::Colon,
        LogosToken::QuestionQuestionEq => SyntaxKind::QuestionQuestionEq,
        LogosToken::QuestionQuestion => SyntaxKind::QuestionQuestion,
        LogosToken::Question => SyntaxKind::Question,
        LogosToken::EqEq => SyntaxKind::EqEq,
        LogosToken::NotEq => SyntaxKind::NotEq,
        LogosToken::FatArrow => SyntaxKind::FatArrow,
        LogosToken::Eq => SyntaxKind::Eq,
        LogosToken::PlusPlus => SyntaxKind::PlusPlus,
        LogosToken::MinusMinus => SyntaxKind::MinusMinus,
        LogosToken::Plus => SyntaxKind::Plus,
        LogosToken::Minus => SyntaxKind::Minus,
        LogosToken::Star => SyntaxKind::Star,
        LogosToken::AmpAmp => SyntaxKind::AmpAmp,
        LogosToken::Amp => SyntaxKind::Amp,
        LogosToken::PipePipe => SyntaxKind::PipePipe,
        LogosToken::Pipe => SyntaxKind::Pipe,
        LogosToken::Bang => SyntaxKind::Bang,
    }
}

/// Tokenize text into a vector of tokens with their text, whitespace included
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = LogosToken::lexer(source);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token) => to_syntax_kind(token, text),
            Err(()) => SyntaxKind::Error,
        };
        tokens.push(Token { kind, text });
    }

    tokens
}

/// Tokenize and drop whitespace.
pub fn significant_tokens(source: &str) -> Vec<Token<'_>> {
    tokenize(source)
        .into_iter()
        .filter(|t| t.kind != SyntaxKind::Whitespace)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        significant_tokens(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_qualified_generic_nullable_type() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("global::System.Collections.Generic.List<int?>"),
            vec![
                Keyword, ColonColon, Identifier, Dot, Identifier, Dot, Identifier, Dot,
                Identifier, LAngle, Keyword, Question, RAngle
            ]
        );
    }

    #[test]
    fn test_method_signature_with_default() {
        let tokens = significant_tokens("string GetPage(int page, string? name = \"a\")");
        assert_eq!(tokens[0].kind, SyntaxKind::Keyword);
        assert_eq!(tokens[1].text, "GetPage");
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::StringLiteral));
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::Eq));
    }

    #[test]
    fn test_pointer_and_array() {
        use SyntaxKind::*;
        assert_eq!(kinds("uint*"), vec![Keyword, Star]);
        assert_eq!(kinds("object?[]"), vec![Keyword, Question, LBracket, RBracket]);
    }

    #[test]
    fn test_unknown_character_is_error() {
        assert!(kinds("a # b").contains(&SyntaxKind::Error));
    }
}
