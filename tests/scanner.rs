#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::error::{LoxError, Result};
    use lox::scanner::*;
    use lox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(std::result::Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn rendered(source: &str) -> Vec<String> {
        let (tokens, diagnostics) = Scanner::new(source).scan_tokens();
        assert!(diagnostics.is_empty(), "unexpected errors: {}", diagnostics);
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "var orchid = nil or _x1; class fun",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::OR, "or"),
                (TokenType::IDENTIFIER, "_x1"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::CLASS, "class"),
                (TokenType::FUN, "fun"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_numbers() {
        assert_eq!(
            rendered("123 3.14 5."),
            vec![
                "NUMBER 123 123.0",
                "NUMBER 3.14 3.14",
                "NUMBER 5 5.0",
                "DOT . null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_05_strings_may_span_lines() {
        let (tokens, diagnostics) = Scanner::new("\"a\nb\" x").scan_tokens();

        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
        assert_eq!(tokens[0].to_string(), "STRING \"a\nb\" a\nb");
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_06_comments_are_skipped() {
        let (tokens, _) = Scanner::new("// nothing here (\n+ // trailing").scan_tokens();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::PLUS);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].token_type, TokenType::EOF);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<Result<Token>> = Scanner::new(source).collect();

        // COMMA, DOT, error, LEFT_PAREN, error, EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
            ]
        );

        fn assert_token_matches(result: &Result<Token>, expected_type: TokenType, lexeme: &str) {
            match result {
                Ok(token) => {
                    assert_eq!(token.token_type, expected_type);
                    assert_eq!(token.lexeme, lexeme);
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_unterminated_string_reports_and_still_ends() {
        let (tokens, diagnostics) = Scanner::new("print \"abc").scan_tokens();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].token_type, TokenType::EOF);

        let errors: Vec<&LoxError> = diagnostics.iter().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn test_exactly_one_eof_is_emitted() {
        let mut scanner = Scanner::new("");

        assert!(matches!(scanner.next(), Some(Ok(Token { token_type: TokenType::EOF, .. }))));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_scanning_is_repeatable() {
        let source = "fun f(a) { return a * 2; } // done\nprint f(21);";

        let (first, _) = Scanner::new(source).scan_tokens();
        let (second, _) = Scanner::new(source).scan_tokens();

        assert_eq!(first, second);
    }
}
