//! Per-tree checks for the style and performance rules.

use smol_str::SmolStr;

use crate::base::names;
use crate::diagnostics::{DiagnosticCollector, Location, descriptors};
use crate::host::{Compilation, Symbol, SyntaxTree};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Walks one syntax tree and reports every rule violation in it.
pub struct TreeChecker<'a> {
    compilation: &'a Compilation,
    tree: usize,
    path: SmolStr,
    diagnostics: DiagnosticCollector,
}

impl<'a> TreeChecker<'a> {
    pub fn new(compilation: &'a Compilation, tree: usize, syntax: &SyntaxTree) -> Self {
        Self {
            compilation,
            tree,
            path: syntax.path.clone(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Check every node of `root`.
    pub fn check(mut self, root: &SyntaxNode) -> DiagnosticCollector {
        for node in root.descendants() {
            match node.kind() {
                SyntaxKind::ClassDecl | SyntaxKind::StructDecl | SyntaxKind::InterfaceDecl | SyntaxKind::EnumDecl => {
                    self.check_type_accessibility(&node)
                }
                SyntaxKind::MethodDecl => self.check_task_return(&node),
                SyntaxKind::PostfixUnary => self.check_null_forgiving(&node),
                SyntaxKind::Cast => self.check_cast(&node),
                _ => {}
            }
        }
        self.diagnostics
    }

    fn location(&self, node: &SyntaxNode) -> Option<Location> {
        Some(Location::new(self.path.clone(), node.text_range()))
    }

    /// SH001: class, struct, interface and enum declarations need `internal`,
    /// `private` or `file`. Records are not checked.
    fn check_type_accessibility(&mut self, node: &SyntaxNode) {
        let restricted = node
            .children()
            .find(|child| child.kind() == SyntaxKind::Modifiers)
            .is_some_and(|modifiers| {
                modifiers
                    .children_with_tokens()
                    .filter_map(|element| element.into_token())
                    .any(|token| matches!(token.text(), "internal" | "private" | "file"))
            });
        if restricted {
            return;
        }
        let Some(identifier) = node
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == SyntaxKind::Identifier)
        else {
            return;
        };
        let location = Location::new(self.path.clone(), identifier.text_range());
        self.diagnostics.report(
            &descriptors::TYPE_INTERNAL_OR_PRIVATE,
            Some(location),
            &[identifier.text()],
        );
    }

    /// SH003: methods returning `Task` should return `ValueTask`.
    fn check_task_return(&mut self, node: &SyntaxNode) {
        let Some(Symbol::Method(method)) = self.compilation.symbol_for(self.tree, node) else {
            return;
        };
        if method.is_override {
            return;
        }
        let is_command = method
            .attributes
            .iter()
            .any(|attribute| attribute.class.fully_qualified_metadata_name() == names::COMMAND_ATTRIBUTE);
        if is_command || !method.return_type.has_or_inherits_metadata_name(names::TASK) {
            return;
        }
        let Some(return_type) = node.children().find(|child| child.kind() == SyntaxKind::Type) else {
            return;
        };
        self.diagnostics
            .report(&descriptors::USE_VALUE_TASK, self.location(&return_type), &[]);
    }

    /// SH007: `x!` outside of `default!`.
    fn check_null_forgiving(&mut self, node: &SyntaxNode) {
        let is_bang = node
            .last_token()
            .is_some_and(|token| token.kind() == SyntaxKind::Bang);
        if !is_bang {
            return;
        }
        let Some(operand) = node.first_child() else {
            return;
        };
        let is_default = match operand.kind() {
            SyntaxKind::DefaultExpr => true,
            SyntaxKind::Literal => operand
                .first_token()
                .is_some_and(|token| token.text() == "default"),
            _ => false,
        };
        if is_default {
            return;
        }
        self.diagnostics.report(
            &descriptors::USE_ARGUMENT_NULL_EXCEPTION_THROW_IF_NULL,
            self.location(node),
            &[],
        );
    }

    /// SH008: casts that involve a reference type on either side.
    fn check_cast(&mut self, node: &SyntaxNode) {
        let mut children = node.children();
        let (Some(target), Some(operand)) = (children.next(), children.next()) else {
            return;
        };
        if operand.kind() == SyntaxKind::CollectionExpression {
            return;
        }
        let target = self.compilation.type_of(self.tree, &target);
        let source = self.compilation.type_of(self.tree, &operand);
        let value_only = |ty: Option<crate::host::TypeSymbol>| ty.is_none_or(|ty| ty.is_value_type());
        if value_only(target) && value_only(source) {
            return;
        }
        self.diagnostics
            .report(&descriptors::CAST_CAN_BE_SLOW, self.location(node), &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::marker;
    use crate::host::{
        Accessibility, CompilationBuilder, MethodSymbol, ParameterSymbol, SpecialType, TypeSymbol,
    };
    use crate::syntax::factory::{ExpressionSyntax, StatementSyntax, TypeSyntax};

    fn check(compilation: &Compilation) -> Vec<crate::diagnostics::Diagnostic> {
        let tree = &compilation.trees()[0];
        TreeChecker::new(compilation, 0, tree).check(&tree.syntax()).into_vec()
    }

    fn ids(compilation: &Compilation) -> Vec<&'static str> {
        check(compilation).into_iter().map(|d| d.id).collect()
    }

    fn task() -> TypeSymbol {
        TypeSymbol::class("System.Threading.Tasks", "Task")
            .accessibility(Accessibility::Public)
            .not_partial()
            .build()
    }

    #[test]
    fn test_public_type_reported() {
        let ty = TypeSymbol::class("App", "Shown")
            .accessibility(Accessibility::Public)
            .build();
        let compilation = CompilationBuilder::new("App").file("Shown.cs", vec![ty]).build();
        let diagnostics = check(&compilation);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "SH001");
        assert_eq!(&*diagnostics[0].message, "Type [Shown] should be internal or private");

        let tree = &compilation.trees()[0];
        let range = diagnostics[0].location.as_ref().unwrap().range;
        assert_eq!(&tree.syntax().text().to_string()[range], "Shown");
    }

    #[test]
    fn test_public_records_not_checked() {
        let record = TypeSymbol::class("App", "Snapshot")
            .record()
            .accessibility(Accessibility::Public)
            .build();
        let record_struct = TypeSymbol::structure("App", "Point")
            .record()
            .accessibility(Accessibility::Public)
            .build();
        let shown = TypeSymbol::enumeration("App", "Shown")
            .accessibility(Accessibility::Public)
            .build();
        let compilation = CompilationBuilder::new("App")
            .file("Types.cs", vec![record, record_struct, shown])
            .build();
        let diagnostics = check(&compilation);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&*diagnostics[0].message, "Type [Shown] should be internal or private");
    }

    #[test]
    fn test_internal_and_private_types_pass() {
        let outer = TypeSymbol::class("App", "Outer").build();
        let inner = TypeSymbol::structure("App", "Inner")
            .nested_in(&outer)
            .accessibility(Accessibility::Private)
            .build();
        let compilation = CompilationBuilder::new("App").file("Outer.cs", vec![outer, inner]).build();
        assert!(ids(&compilation).is_empty());
    }

    #[test]
    fn test_task_return_reported() {
        let task = task();
        let ty = TypeSymbol::class("App", "Worker")
            .method(MethodSymbol::new("RunAsync", &task).build())
            .build();
        let compilation = CompilationBuilder::new("App")
            .file("Worker.cs", vec![ty])
            .reference(&task)
            .build();
        let diagnostics = check(&compilation);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "SH003");

        let tree = &compilation.trees()[0];
        let range = diagnostics[0].location.as_ref().unwrap().range;
        assert_eq!(
            &tree.syntax().text().to_string()[range],
            "global::System.Threading.Tasks.Task"
        );
    }

    #[test]
    fn test_task_subclass_reported() {
        let task = task();
        let generic = TypeSymbol::class("System.Threading.Tasks", "Task")
            .type_parameters(&["TResult"])
            .base(&task)
            .accessibility(Accessibility::Public)
            .not_partial()
            .build();
        let ty = TypeSymbol::class("App", "Worker")
            .method(MethodSymbol::new("LoadAsync", &generic).build())
            .build();
        let compilation = CompilationBuilder::new("App").file("Worker.cs", vec![ty]).build();
        assert_eq!(ids(&compilation), vec!["SH003"]);
    }

    #[test]
    fn test_override_and_command_methods_pass() {
        let task = task();
        let ty = TypeSymbol::class("App", "Worker")
            .method(MethodSymbol::new("OnLoadedAsync", &task).override_method().build())
            .method(
                MethodSymbol::new("RefreshAsync", &task)
                    .attribute(marker(names::COMMAND_ATTRIBUTE))
                    .build(),
            )
            .method(MethodSymbol::new("Count", &TypeSymbol::special(SpecialType::Int32)).build())
            .build();
        let compilation = CompilationBuilder::new("App").file("Worker.cs", vec![ty]).build();
        assert!(ids(&compilation).is_empty());
    }

    #[test]
    fn test_null_forgiving() {
        let object = TypeSymbol::special(SpecialType::Object);
        let body = vec![
            StatementSyntax::expression(ExpressionSyntax::ident("value").suppress_nullable()),
            StatementSyntax::expression(ExpressionSyntax::default_literal().suppress_nullable()),
            StatementSyntax::ret(ExpressionSyntax::default_of(TypeSyntax::object()).suppress_nullable()),
        ];
        let ty = TypeSymbol::class("App", "Holder")
            .method(
                MethodSymbol::new("Get", &object)
                    .parameter(ParameterSymbol::new("value", &object))
                    .body(body)
                    .build(),
            )
            .build();
        let compilation = CompilationBuilder::new("App").file("Holder.cs", vec![ty]).build();
        let diagnostics = check(&compilation);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "SH007");

        let tree = &compilation.trees()[0];
        let range = diagnostics[0].location.as_ref().unwrap().range;
        assert_eq!(&tree.syntax().text().to_string()[range], "value!");
    }

    #[test]
    fn test_casts() {
        let object = TypeSymbol::special(SpecialType::Object);
        let int = TypeSymbol::special(SpecialType::Int32);
        let boxed = ExpressionSyntax::ident("boxed");
        let number = ExpressionSyntax::ident("number");
        let body = vec![
            StatementSyntax::expression(ExpressionSyntax::cast(TypeSyntax::keyword("int"), boxed.clone())),
            StatementSyntax::expression(ExpressionSyntax::cast(TypeSyntax::keyword("long"), number.clone())),
            StatementSyntax::expression(ExpressionSyntax::cast(
                TypeSyntax::parse("global::App.Unknown"),
                ExpressionSyntax::collection(Vec::new()),
            )),
            StatementSyntax::expression(ExpressionSyntax::cast(
                TypeSyntax::parse("global::App.Unknown"),
                ExpressionSyntax::ident("unbound"),
            )),
        ];
        let ty = TypeSymbol::class("App", "Converter")
            .method(
                MethodSymbol::new("Convert", &TypeSymbol::special(SpecialType::Void))
                    .body(body)
                    .build(),
            )
            .build();
        let compilation = CompilationBuilder::new("App")
            .file("Converter.cs", vec![ty])
            .expression_type(&boxed, &object)
            .expression_type(&number, &int)
            .build();
        let diagnostics = check(&compilation);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "SH008");

        let tree = &compilation.trees()[0];
        let range = diagnostics[0].location.as_ref().unwrap().range;
        assert_eq!(&tree.syntax().text().to_string()[range], "(int)boxed");
    }

    #[test]
    fn test_cast_to_reference_type_reported() {
        let object = TypeSymbol::special(SpecialType::Object);
        let value = ExpressionSyntax::ident("value");
        let body = vec![StatementSyntax::ret(ExpressionSyntax::cast(
            TypeSyntax::string(),
            value.clone(),
        ))];
        let ty = TypeSymbol::class("App", "Converter")
            .method(
                MethodSymbol::new("Text", &TypeSymbol::special(SpecialType::String))
                    .parameter(ParameterSymbol::new("value", &object))
                    .body(body)
                    .build(),
            )
            .build();
        let compilation = CompilationBuilder::new("App")
            .file("Converter.cs", vec![ty])
            .expression_type(&value, &object)
            .build();
        assert_eq!(ids(&compilation), vec!["SH008"]);
    }
}
