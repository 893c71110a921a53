//! Identifier sanitizing.

/// Turns arbitrary text into a valid C# identifier.
///
/// Characters that cannot continue an identifier become `_`, and a leading
/// character that cannot start one is prefixed with `_`. Empty input yields `_`.
pub fn to_csharp_identifier(text: &str) -> String {
    let mut identifier = String::with_capacity(text.len() + 1);
    for (index, c) in text.chars().enumerate() {
        if index == 0 && !is_identifier_start(c) {
            identifier.push('_');
            if unicode_ident::is_xid_continue(c) {
                identifier.push(c);
            }
            continue;
        }
        if unicode_ident::is_xid_continue(c) {
            identifier.push(c);
        } else {
            identifier.push('_');
        }
    }
    if identifier.is_empty() {
        identifier.push('_');
    }
    identifier
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// `camelCase` form of a PascalCase name, used for parameters and locals.
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Name", "Name")]
    #[case("1st", "_1st")]
    #[case("a-b.c", "a_b_c")]
    #[case("", "_")]
    #[case("-x", "_x")]
    #[case("名字", "名字")]
    fn test_to_csharp_identifier(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_csharp_identifier(input), expected);
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("ServiceProvider"), "serviceProvider");
        assert_eq!(camel_case(""), "");
    }
}
