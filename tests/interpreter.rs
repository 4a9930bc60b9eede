#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::error::RunError;
    use lox::lox::Lox;

    /// Runs `source` in a fresh session, returning what it printed and the
    /// error (if any) that stopped it.
    fn run(source: &str) -> (String, Option<RunError>) {
        let mut session = Lox::with_output(Vec::new());
        let result = session.run(source);
        let printed = String::from_utf8(session.into_output()).unwrap();

        (printed, result.err())
    }

    fn output(source: &str) -> String {
        let (printed, error) = run(source);
        if let Some(error) = error {
            panic!("program failed: {}", error);
        }
        printed
    }

    fn runtime_error(source: &str) -> (String, String) {
        match run(source) {
            (printed, Some(error @ RunError::Runtime(_))) => {
                assert_eq!(error.exit_code(), 70);
                (printed, error.to_string())
            }
            (_, other) => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_arithmetic_and_stringification() {
        assert_eq!(
            output(
                "print 1 + 2 * 3;
                 print 7 / 2;
                 print -0.5 + 0.25;
                 print \"foo\" + \"bar\";
                 print nil;
                 print !nil;
                 print 1 == 1.0;
                 print \"a\" == \"a\";
                 print nil == false;"
            ),
            "7\n3.5\n-0.25\nfoobar\nnil\ntrue\ntrue\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_division_by_zero_follows_ieee() {
        assert_eq!(output("print 1 / 0; print -1 / 0;"), "inf\n-inf\n");
        assert_eq!(output("var n = 0 / 0; print n == n;"), "false\n");
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            output("print nil or \"yes\"; print 0 and \"both\"; print false and boom;"),
            "yes\nboth\nfalse\n"
        );
    }

    #[test]
    fn test_block_scoping_and_shadowing() {
        assert_eq!(
            output(
                "var a = \"global\";
                 {
                   var a = \"outer\";
                   { var a = \"inner\"; print a; }
                   print a;
                 }
                 print a;"
            ),
            "inner\nouter\nglobal\n"
        );
    }

    #[test]
    fn test_while_and_for_loops() {
        assert_eq!(
            output(
                "var i = 0; while (i < 3) { print i; i = i + 1; }
                 for (var j = 10; j > 8; j = j - 1) print j;"
            ),
            "0\n1\n2\n10\n9\n"
        );
    }

    #[test]
    fn test_closures_keep_their_own_state() {
        assert_eq!(
            output(
                "fun makeCounter() {
                   var count = 0;
                   fun inc() { count = count + 1; print count; }
                   return inc;
                 }
                 var c = makeCounter();
                 c();
                 c();
                 var d = makeCounter();
                 d();"
            ),
            "1\n2\n1\n"
        );
    }

    #[test]
    fn test_closure_binds_statically() {
        assert_eq!(
            output(
                "var a = \"global\";
                 {
                   fun show() { print a; }
                   show();
                   var a = \"block\";
                   show();
                 }"
            ),
            "global\nglobal\n"
        );
    }

    #[test]
    fn test_recursion_and_return() {
        assert_eq!(
            output(
                "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
                 print fib(15);
                 fun early() { while (true) { return \"out\"; } }
                 print early();
                 fun nothing() {}
                 print nothing();"
            ),
            "610\nout\nnil\n"
        );
    }

    #[test]
    fn test_callable_stringification() {
        assert_eq!(
            output(
                "fun f() {}
                 class Bagel {}
                 print f;
                 print clock;
                 print Bagel;
                 print Bagel();"
            ),
            "<fn f>\n<native fn>\nBagel\nBagel instance\n"
        );
    }

    #[test]
    fn test_clock_is_a_number() {
        assert_eq!(
            output("var t = clock(); print t >= 0; print clock() - t >= 0;"),
            "true\ntrue\n"
        );
    }

    #[test]
    fn test_fields_and_methods() {
        assert_eq!(
            output(
                "class Point {
                   init(x, y) { this.x = x; this.y = y; }
                   sum() { return this.x + this.y; }
                 }
                 var p = Point(1, 2);
                 print p.sum();
                 p.x = 10;
                 print p.sum();
                 var m = p.sum;
                 print m();"
            ),
            "3\n12\n12\n"
        );
    }

    #[test]
    fn test_initializer_always_returns_this() {
        assert_eq!(
            output(
                "class Foo { init() { this.n = 1; return; } }
                 var foo = Foo();
                 print foo.init() == foo;
                 print foo.n;"
            ),
            "true\n1\n"
        );
    }

    #[test]
    fn test_inheritance_and_super() {
        assert_eq!(
            output(
                "class A { method() { print \"A\"; } }
                 class B < A { method() { super.method(); print \"B\"; } }
                 B().method();"
            ),
            "A\nB\n"
        );
    }

    #[test]
    fn test_init_is_inherited() {
        assert_eq!(
            output(
                "class Base { init(name) { this.name = name; } }
                 class Derived < Base { greet() { print \"hi \" + this.name; } }
                 Derived(\"rox\").greet();"
            ),
            "hi rox\n"
        );
    }

    #[test]
    fn test_super_binds_to_the_original_instance() {
        assert_eq!(
            output(
                "class A { name() { return this.tag; } }
                 class B < A { name() { return \"B/\" + super.name(); } }
                 class C < B {}
                 var c = C();
                 c.tag = \"c\";
                 print c.name();"
            ),
            "B/c\n"
        );
    }

    #[test]
    fn test_runtime_error_halts_the_run() {
        let (printed, message) = runtime_error("print 1;\nprint -\"x\";\nprint 2;");

        assert_eq!(printed, "1\n");
        assert_eq!(message, "Operand must be a number.\n[line 2]");
    }

    #[test]
    fn test_runtime_error_messages() {
        let cases: &[(&str, &str)] = &[
            ("1 < \"a\";", "Operands must be numbers."),
            ("1 + nil;", "Operands must be two numbers or two strings."),
            ("print missing;", "Undefined variable 'missing'."),
            ("missing = 1;", "Undefined variable 'missing'."),
            ("\"str\"();", "Can only call functions and classes."),
            ("fun f(a) {} f();", "Expected 1 arguments but got 0."),
            ("class A {} A(1);", "Expected 0 arguments but got 1."),
            ("4.x;", "Only instances have properties."),
            ("4.x = 1;", "Only instances have fields."),
            ("class A {} A().nope;", "Undefined property 'nope'."),
            ("var NotAClass = 1; class B < NotAClass {}", "Superclass must be a class."),
        ];

        for (source, expected) in cases {
            let (_, message) = runtime_error(source);
            assert_eq!(message, format!("{}\n[line 1]", expected), "source: {}", source);
        }
    }

    #[test]
    fn test_static_errors_prevent_execution() {
        let (printed, error) = run("print 1;\nprint 2");

        assert_eq!(printed, "");
        match error {
            Some(RunError::Static(diagnostics)) => {
                assert_eq!(
                    diagnostics.to_string(),
                    "[line 2] Error at end: Expected ';' after value."
                );
            }
            other => panic!("expected a static error, got {:?}", other),
        }

        let (printed, error) = run("print 1; return 2;");
        assert_eq!(printed, "");
        assert_eq!(error.map(|e| e.exit_code()), Some(65));
    }

    #[test]
    fn test_scan_and_parse_errors_are_reported_together() {
        let (_, error) = run("print @;");

        match error {
            Some(RunError::Static(diagnostics)) => assert_eq!(
                diagnostics.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
                vec![
                    "[line 1] Error: Unexpected character: @",
                    "[line 1] Error at ';': Expected expression.",
                ]
            ),
            other => panic!("expected a static error, got {:?}", other),
        }
    }

    #[test]
    fn test_global_redeclaration_reads_the_previous_value() {
        assert_eq!(output("var a = 1; var a = a + 1; print a;"), "2\n");

        let (_, message) = runtime_error("var b = b;");
        assert_eq!(message, "Undefined variable 'b'.\n[line 1]");
    }

    #[test]
    fn test_block_error_restores_the_enclosing_environment() {
        let mut session = Lox::with_output(Vec::new());

        let error = session.run("{ var x = 1; print -\"a\"; }").unwrap_err();
        assert_eq!(error.exit_code(), 70);

        session.run("fun f() { { print -nil; } } f();").unwrap_err();

        session.run("var y = 2;").unwrap();
        session.run("print y;").unwrap();
        assert!(session.run("print x;").is_err());

        assert_eq!(session.output(), b"2\n");
    }

    #[test]
    fn test_session_keeps_globals_between_runs() {
        let mut session = Lox::with_output(Vec::new());

        session.run("var greeting = \"hi\";").unwrap();
        session.run("fun greet() { { var x = greeting; print x; } }").unwrap();
        assert!(session.run("print undefinedThing;").is_err());
        session.run("greet();").unwrap();

        assert_eq!(session.output(), b"hi\n");
    }
}
