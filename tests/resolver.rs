#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::ast::{Expr, ExprId, Stmt};
    use lox::parser::Parser;
    use lox::resolver::{Locals, Resolver};
    use lox::scanner::Scanner;

    fn resolve(source: &str) -> (Vec<Stmt>, Locals, Vec<String>) {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        let (statements, parse_errors) = Parser::new(&tokens).parse();
        assert!(scan_errors.is_empty() && parse_errors.is_empty());

        let (locals, diagnostics) = Resolver::new().resolve(&statements);
        let errors: Vec<String> = diagnostics.iter().map(|e| e.to_string()).collect();

        (statements, locals, errors)
    }

    fn errors(source: &str) -> Vec<String> {
        resolve(source).2
    }

    /// Id of the first `print <variable>;` found in a depth‑first walk.
    fn printed_variable(statements: &[Stmt]) -> Option<ExprId> {
        statements.iter().find_map(|stmt| match stmt {
            Stmt::Print(Expr::Variable { id, .. }) => Some(*id),
            Stmt::Block(inner) => printed_variable(inner),
            Stmt::Function(decl) => printed_variable(&decl.body),
            _ => None,
        })
    }

    #[test]
    fn test_local_distance_counts_enclosing_scopes() {
        let (statements, locals, errors) = resolve("{ var a = 1; { print a; } }");
        assert!(errors.is_empty());

        let id = printed_variable(&statements).unwrap();
        assert_eq!(locals.get(&id), Some(&1));
    }

    #[test]
    fn test_same_scope_is_distance_zero() {
        let (statements, locals, _) = resolve("{ var a = 1; print a; }");

        let id = printed_variable(&statements).unwrap();
        assert_eq!(locals.get(&id), Some(&0));
    }

    #[test]
    fn test_globals_are_not_recorded() {
        let (statements, locals, errors) = resolve("var a = 1; print a; fun f() { print a; }");
        assert!(errors.is_empty());

        assert!(locals.is_empty());
        assert!(printed_variable(&statements).is_some());
    }

    #[test]
    fn test_parameters_resolve_inside_the_body() {
        let (statements, locals, _) = resolve("fun f(x) { print x; }");

        let id = printed_variable(&statements).unwrap();
        assert_eq!(locals.get(&id), Some(&0));
    }

    #[test]
    fn test_reading_local_in_own_initializer() {
        assert_eq!(
            errors("var a = 1; { var a = a; }"),
            vec!["[line 1] Error at 'a': Cannot read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_global_initializer_may_read_an_earlier_global() {
        let (_, locals, errors) = resolve("var a = 1; var a = a;");

        assert!(errors.is_empty());
        assert!(locals.is_empty());
        assert!(resolve("var b = b;").2.is_empty());
    }

    #[test]
    fn test_redeclaring_in_same_local_scope() {
        assert_eq!(
            errors("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Variable with this name already declared in this scope."]
        );
        assert!(errors("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_return_outside_function() {
        assert_eq!(
            errors("return 1;"),
            vec!["[line 1] Error at 'return': Cannot return from top-level code."]
        );
    }

    #[test]
    fn test_return_value_from_initializer() {
        assert_eq!(
            errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Cannot return a value from an initializer."]
        );
        assert!(errors("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_this_outside_class() {
        assert_eq!(
            errors("print this;"),
            vec!["[line 1] Error at 'this': Cannot use 'this' outside of a class."]
        );
        assert_eq!(
            errors("fun f() { return this; }"),
            vec!["[line 1] Error at 'this': Cannot use 'this' outside of a class."]
        );
    }

    #[test]
    fn test_super_misuse() {
        assert_eq!(
            errors("super.m();"),
            vec!["[line 1] Error at 'super': Cannot use 'super' outside of a class."]
        );
        assert_eq!(
            errors("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Cannot use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_class_inheriting_from_itself() {
        assert_eq!(
            errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class cannot inherit from itself."]
        );
    }

    #[test]
    fn test_all_errors_are_collected() {
        let source = "return;\nprint this;\n{ var x = 1; var x = 2; }";

        assert_eq!(errors(source).len(), 3);
    }
}
