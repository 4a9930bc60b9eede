//! Session driver: one interpreter that successive sources run against.
//!
//! ```
//! use rox::lox::Lox;
//!
//! let mut lox = Lox::with_output(Vec::new());
//! lox.run("var greeting = \"hi\";").unwrap();
//! lox.run("print greeting;").unwrap();
//! assert_eq!(lox.output(), b"hi\n");
//! ```

use std::io::{Stdout, Write};

use log::{debug, info};

use crate::error::{Diagnostics, RunError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Globals and resolved scopes persist across calls to [`Lox::run`], so a
/// prompt can define something on one line and use it on the next.
pub struct Lox<W: Write = Stdout> {
    interpreter: Interpreter<W>,
    next_id: usize,
}

impl Lox<Stdout> {
    pub fn new() -> Self {
        Self::with_output(std::io::stdout())
    }
}

impl Default for Lox<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
            next_id: 0,
        }
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Scan, parse, resolve and run `source`.
    ///
    /// Scanning and parsing both run before anything is reported, so lexical
    /// and syntax errors come back together.  Nothing executes unless every
    /// static stage was clean.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Running {} byte(s) of source", source.len());

        let (tokens, mut diagnostics) = Scanner::new(source).scan_tokens();

        let mut parser = Parser::new(&tokens).with_first_id(self.next_id);
        let (statements, parse_errors) = parser.parse();
        self.next_id = parser.next_id();
        diagnostics.extend(parse_errors);

        if !diagnostics.is_empty() {
            debug!("Stopping after {} scan/parse error(s)", diagnostics.len());
            return Err(RunError::Static(diagnostics));
        }

        let (locals, resolve_errors): (_, Diagnostics) = Resolver::new().resolve(&statements);
        if !resolve_errors.is_empty() {
            debug!("Stopping after {} resolve error(s)", resolve_errors.len());
            return Err(RunError::Static(resolve_errors));
        }

        self.interpreter.resolve(locals);
        self.interpreter.interpret(&statements)?;

        Ok(())
    }
}
