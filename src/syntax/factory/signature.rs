//! Method signatures read from text, such as the rows of an endpoints file.

use super::{
    ExpressionSyntax, MethodDeclarationSyntax, Modifier, ParameterSyntax, TypeSyntax, node, token,
};
use crate::syntax::SyntaxKind;
use crate::syntax::lexer::{Token, significant_tokens};

impl MethodDeclarationSyntax {
    /// Reads `ReturnType Name<T>(parameters)` into a bodiless declaration.
    ///
    /// Returns `None` when the text is not a single method signature. A
    /// trailing `;` is accepted.
    pub fn parse_signature(text: &str) -> Option<Self> {
        let mut tokens = significant_tokens(text);
        if tokens
            .iter()
            .any(|t| matches!(t.kind, SyntaxKind::Error | SyntaxKind::LineComment))
        {
            return None;
        }
        if tokens.last().is_some_and(|t| t.kind == SyntaxKind::Semicolon) {
            tokens.pop();
        }
        if tokens.last()?.kind != SyntaxKind::RParen {
            return None;
        }

        let open = parameter_list_start(&tokens)?;
        let (name_at, type_parameters) = match tokens[..open].last()?.kind {
            SyntaxKind::RAngle => {
                let start = matching_open_angle(&tokens[..open])?;
                let names = split_top_level(&tokens[start + 1..open - 1])
                    .into_iter()
                    .map(|part| match part {
                        [single] if single.kind == SyntaxKind::Identifier => Some(single.text.to_string()),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                (start.checked_sub(1)?, names)
            }
            _ => (open - 1, Vec::new()),
        };

        let name = tokens[name_at];
        if name.kind != SyntaxKind::Identifier || name_at == 0 {
            return None;
        }
        let return_type = type_from_tokens(&tokens[..name_at]);

        let inner = &tokens[open + 1..tokens.len() - 1];
        let parameters = if inner.is_empty() {
            Vec::new()
        } else {
            split_top_level(inner)
                .into_iter()
                .map(parameter)
                .collect::<Option<Vec<_>>>()?
        };

        Some(
            MethodDeclarationSyntax::new(return_type, name.text)
                .type_parameters(&type_parameters)
                .parameters(parameters),
        )
    }
}

/// Index of the `(` opening the parameter list, which must close at the end.
fn parameter_list_start(tokens: &[Token<'_>]) -> Option<usize> {
    let mut depth = 0usize;
    for (index, t) in tokens.iter().enumerate().rev() {
        match t.kind {
            SyntaxKind::RParen => depth += 1,
            SyntaxKind::LParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the `<` matching the trailing `>` of `tokens`.
fn matching_open_angle(tokens: &[Token<'_>]) -> Option<usize> {
    let mut depth = 0usize;
    for (index, t) in tokens.iter().enumerate().rev() {
        match t.kind {
            SyntaxKind::RAngle => depth += 1,
            SyntaxKind::LAngle => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas outside any bracket pair.
fn split_top_level<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (index, t) in tokens.iter().enumerate() {
        match t.kind {
            SyntaxKind::LParen | SyntaxKind::LAngle | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
            SyntaxKind::RParen | SyntaxKind::RAngle | SyntaxKind::RBracket | SyntaxKind::RBrace => depth -= 1,
            SyntaxKind::Comma if depth == 0 => {
                parts.push(&tokens[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

fn parameter_modifier(text: &str) -> Option<Modifier> {
    Some(match text {
        "this" => Modifier::This,
        "params" => Modifier::Params,
        "ref" => Modifier::Ref,
        "out" => Modifier::Out,
        "in" => Modifier::In,
        "scoped" => Modifier::Scoped,
        "readonly" => Modifier::Readonly,
        _ => return None,
    })
}

fn parameter(tokens: &[Token<'_>]) -> Option<ParameterSyntax> {
    let (declaration, default) = match tokens.iter().position(|t| t.kind == SyntaxKind::Eq) {
        Some(at) => (&tokens[..at], Some(default_value(&tokens[at + 1..])?)),
        None => (tokens, None),
    };

    let mut modifiers = Vec::new();
    let mut rest = declaration;
    while let Some((first, tail)) = rest.split_first() {
        match (first.kind, parameter_modifier(first.text)) {
            (SyntaxKind::Keyword, Some(modifier)) => {
                modifiers.push(modifier);
                rest = tail;
            }
            _ => break,
        }
    }

    let (name, ty) = rest.split_last()?;
    if name.kind != SyntaxKind::Identifier || ty.is_empty() {
        return None;
    }

    let mut parameter = ParameterSyntax::new(type_from_tokens(ty), name.text);
    if !modifiers.is_empty() {
        parameter = parameter.modifiers(&modifiers);
    }
    if let Some(value) = default {
        parameter = parameter.default_value(value);
    }
    Some(parameter)
}

fn default_value(tokens: &[Token<'_>]) -> Option<ExpressionSyntax> {
    match tokens {
        [] => None,
        [sign, number] if sign.kind == SyntaxKind::Minus && number.kind == SyntaxKind::NumericLiteral => {
            Some(ExpressionSyntax::prefix(SyntaxKind::Minus, ExpressionSyntax::number(number.text)))
        }
        _ => Some(ExpressionSyntax(node(
            SyntaxKind::Literal,
            tokens.iter().map(|t| token(t.kind, t.text)).collect(),
        ))),
    }
}

fn type_from_tokens(tokens: &[Token<'_>]) -> TypeSyntax {
    TypeSyntax(node(
        SyntaxKind::Type,
        tokens.iter().map(|t| token(t.kind, t.text)).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::syntax::render::render;
    use rstest::rstest;

    fn roundtrip(text: &str) -> Option<String> {
        MethodDeclarationSyntax::parse_signature(text).map(|method| render(method.build().green(), &RenderOptions::default()))
    }

    #[rstest]
    #[case("string Root()", "string Root();\n")]
    #[case("string Page(int index, string? filter = null)", "string Page(int index, string? filter = null);\n")]
    #[case(
        "global::System.Uri Gacha(global::System.Collections.Generic.List<string> ids, uint offset = 0);",
        "global::System.Uri Gacha(global::System.Collections.Generic.List<string> ids, uint offset = 0);\n"
    )]
    #[case("string Map<TKey, TValue>(Dictionary<TKey, TValue> map)", "string Map<TKey, TValue>(Dictionary<TKey, TValue> map);\n")]
    #[case("string Read(in Span<byte> data, int count = -1)", "string Read(in Span<byte> data, int count = -1);\n")]
    fn test_parse_signature(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(roundtrip(text).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("Root()")]
    #[case("string Root(")]
    #[case("string Root(int)")]
    #[case("string Root() => 1")]
    #[case("string 123()")]
    fn test_rejects_non_signatures(#[case] text: &str) {
        assert!(MethodDeclarationSyntax::parse_signature(text).is_none());
    }
}
