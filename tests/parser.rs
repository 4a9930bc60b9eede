#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::ast::{Expr, ExprId, Stmt};
    use lox::ast_printer::AstPrinter;
    use lox::error::Diagnostics;
    use lox::parser::Parser;
    use lox::scanner::Scanner;

    fn parse(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        assert!(scan_errors.is_empty(), "scan errors: {}", scan_errors);

        Parser::new(&tokens).parse()
    }

    /// Parses cleanly and prints every statement in prefix form.
    fn printed(source: &str) -> Vec<String> {
        let (statements, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "parse errors: {}", diagnostics);

        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    fn errors(source: &str) -> Vec<String> {
        let (_, diagnostics) = parse(source);
        diagnostics.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_parser_01_arithmetic_precedence() {
        assert_eq!(
            printed("print 1 + 2 * 3 - -4;"),
            vec!["(print (- (+ 1.0 (* 2.0 3.0)) (- 4.0)))"]
        );
        assert_eq!(
            printed("print (1 + 2) / 3;"),
            vec!["(print (/ (group (+ 1.0 2.0)) 3.0))"]
        );
    }

    #[test]
    fn test_parser_02_logical_binds_looser_than_equality() {
        assert_eq!(
            printed("print a == b or c and !d;"),
            vec!["(print (or (== a b) (and c (! d))))"]
        );
    }

    #[test]
    fn test_parser_03_assignment_is_right_associative() {
        assert_eq!(printed("a = b = 3;"), vec!["(; (= a (= b 3.0)))"]);
    }

    #[test]
    fn test_parser_04_calls_and_properties() {
        assert_eq!(
            printed("obj.x.y = f(1, 2)(3);"),
            vec!["(; (= (. obj x).y (call (call f 1.0 2.0) 3.0)))"]
        );
    }

    #[test]
    fn test_parser_05_for_is_desugared() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
        assert_eq!(printed("for (;;) print 1;"), vec!["(while true (print 1.0))"]);
    }

    #[test]
    fn test_parser_06_declarations() {
        assert_eq!(
            printed("var a; fun add(x, y) { return x + y; } if (a) print 1; else { return; }"),
            vec![
                "(var a)",
                "(fun add (x y) (return (+ x y)))",
                "(if a (print 1.0) (block (return)))",
            ]
        );
    }

    #[test]
    fn test_parser_07_classes() {
        assert_eq!(
            printed("class B < A { init(x) { this.x = x; } m() { return super.m(); } }"),
            vec![
                "(class B < A (method init (x) (; (= this.x x))) (method m () (return (call (super m)))))"
            ]
        );
    }

    #[test]
    fn test_invalid_assignment_target_is_reported_not_fatal() {
        let (statements, diagnostics) = parse("1 + 2 = 3; print 4;");

        assert_eq!(
            diagnostics.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_synchronize_reports_every_error() {
        let source = "var = 1;\nprint 2\nvar b = 3;\nprint 4;";
        let (statements, diagnostics) = parse(source);

        assert_eq!(
            diagnostics.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec![
                "[line 1] Error at '=': Expected variable name.",
                "[line 3] Error at 'var': Expected ';' after value.",
            ]
        );
        assert_eq!(
            statements.iter().map(AstPrinter::print_stmt).collect::<Vec<_>>(),
            vec!["(print 4.0)"]
        );
    }

    #[test]
    fn test_error_at_end_of_input() {
        assert_eq!(
            errors("print 1"),
            vec!["[line 1] Error at end: Expected ';' after value."]
        );
        assert_eq!(
            errors("print ;"),
            vec!["[line 1] Error at ';': Expected expression."]
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let arguments: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", arguments.join(", "));

        assert_eq!(
            errors(&source),
            vec!["[line 1] Error at '255': Cannot have more than 255 arguments."]
        );
    }

    #[test]
    fn test_parsing_twice_gives_equal_trees() {
        let source = "fun f(n) { if (n < 2) return n; return f(n - 1) + f(n - 2); } print f(10);";

        let (first, _) = parse(source);
        let (second, _) = parse(source);

        assert_eq!(first, second);
    }

    #[test]
    fn test_node_ids_continue_from_first_id() {
        let (tokens, _) = Scanner::new("a; b;").scan_tokens();
        let mut parser = Parser::new(&tokens).with_first_id(10);
        let (statements, _) = parser.parse();

        let ids: Vec<ExprId> = statements
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Expression(Expr::Variable { id, .. }) => Some(*id),
                _ => None,
            })
            .collect();

        assert_eq!(ids, vec![ExprId(10), ExprId(11)]);
        assert_eq!(parser.next_id(), 12);
    }
}
