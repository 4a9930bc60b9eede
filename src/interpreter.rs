//! Tree‑walking evaluator.
//!
//! Statements execute to a [`Flow`]; a `return` travels back up as
//! `Flow::Return` until the nearest call boundary picks it up.  Runtime
//! errors travel as `Err(LoxError::Runtime)` and abort the whole run.
//!
//! Variable occurrences that the resolver recorded in [`Locals`] are looked
//! up at exactly that many environments out; everything else is a global.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Stdout, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info, trace};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::class::{LoxClass, LoxInstance, INITIALIZER};
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::function::{native_functions, LoxFunction};
use crate::resolver::Locals;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter<W: Write = Stdout> {
    globals: EnvRef,
    environment: EnvRef,
    locals: Locals,
    out: W,
}

impl Interpreter<Stdout> {
    /// Creates an Interpreter printing to stdout, with the native functions
    /// defined in its globals.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an Interpreter whose `print` statements write to `out`.
    pub fn with_output(out: W) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Rc::new(RefCell::new(Environment::new()));

        for native in native_functions() {
            debug!("Defining native function '{}'", native.name);
            globals
                .borrow_mut()
                .define(native.name, Value::Native(Rc::new(native)));
        }

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: Locals::new(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Merge scope distances produced by a resolver pass.
    pub fn resolve(&mut self, locals: Locals) {
        debug!("Merging {} resolved local(s)", locals.len());
        self.locals.extend(locals);
    }

    /// Interprets a list of statements (a "program").  Stops at the first
    /// runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        info!("Interpreting {} statement(s)", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }
        self.out.flush()?;

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                trace!("Printed value: {}", value);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let env: EnvRef = Environment::child_of(&self.environment);
                self.execute_block(statements, env)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                debug!("Entering while loop");
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                debug!("Exited while loop");
                Ok(Flow::Normal)
            }

            Stmt::Function(decl) => {
                debug!(
                    "Defining function '{}' with {} parameter(s)",
                    decl.name.lexeme,
                    decl.params.len()
                );
                let function = LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment
                    .borrow_mut()
                    .define(&decl.name.lexeme, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                trace!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                debug!("Defining class '{}'", name.lexeme);

                let superclass: Option<Rc<LoxClass>> = match superclass {
                    Some(expr) => match self.evaluate(expr)? {
                        Value::Class(class) => Some(class),
                        _ => {
                            let at: &Token = match expr {
                                Expr::Variable { name, .. } => name,
                                _ => name,
                            };
                            return Err(LoxError::runtime(at, "Superclass must be a class."));
                        }
                    },
                    None => None,
                };

                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Value::Nil);

                let method_env: EnvRef = match &superclass {
                    Some(class) => {
                        let env: EnvRef = Environment::child_of(&self.environment);
                        env.borrow_mut()
                            .define("super", Value::Class(Rc::clone(class)));
                        env
                    }
                    None => Rc::clone(&self.environment),
                };

                let table: HashMap<String, Rc<LoxFunction>> = methods
                    .iter()
                    .map(|method| {
                        let function = LoxFunction::new(
                            Rc::clone(method),
                            Rc::clone(&method_env),
                            method.name.lexeme == INITIALIZER,
                        );
                        (method.name.lexeme.clone(), Rc::new(function))
                    })
                    .collect();

                let class = LoxClass::new(name.lexeme.clone(), superclass, table);
                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(Rc::new(class)))?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` inside `env`, then put the previous environment back
    /// no matter how the block ended.
    pub fn execute_block(&mut self, statements: &[Stmt], env: EnvRef) -> Result<Flow> {
        trace!("Entering block with {} statement(s)", statements.len());

        let previous: EnvRef = mem::replace(&mut self.environment, env);
        let result: Result<Flow> = self.execute_all(statements);
        self.environment = previous;

        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        let value: Value = match expr {
            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            },

            Expr::Grouping(inner) => self.evaluate(inner)?,

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right)?,

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right)?,

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left)?;
                let short_circuit: bool = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };
                if short_circuit {
                    left
                } else {
                    self.evaluate(right)?
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name)?,

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                value
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee: Value = self.evaluate(callee)?;
                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }
                self.call_value(callee, paren, values)?
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name)?,
                _ => return Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name, "Only instances have fields."));
                };
                let value: Value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                value
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword)?,

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method)?,
        };

        trace!("Expression evaluated to: {}", value);
        Ok(value)
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right: Value = self.evaluate(right)?;

        match (&operator.token_type, right) {
            (TokenType::BANG, value) => Ok(Value::Bool(!value.is_truthy())),
            (TokenType::MINUS, Value::Number(n)) => Ok(Value::Number(-n)),
            _ => Err(LoxError::runtime(operator, "Operand must be a number.")),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left: Value = self.evaluate(left)?;
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
            TokenType::PLUS => {
                return match (left, right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                    _ => Err(LoxError::runtime(
                        operator,
                        "Operands must be two numbers or two strings.",
                    )),
                };
            }
            _ => {}
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(LoxError::runtime(operator, "Operands must be numbers."));
        };

        let value: Value = match operator.token_type {
            TokenType::MINUS => Value::Number(a - b),
            TokenType::STAR => Value::Number(a * b),
            // IEEE: x/0 is ±inf, 0/0 is NaN.
            TokenType::SLASH => Value::Number(a / b),
            TokenType::GREATER => Value::Bool(a > b),
            TokenType::GREATER_EQUAL => Value::Bool(a >= b),
            TokenType::LESS => Value::Bool(a < b),
            TokenType::LESS_EQUAL => Value::Bool(a <= b),
            _ => {
                return Err(LoxError::runtime(
                    operator,
                    format!("Invalid binary operator '{}'.", operator.lexeme),
                ))
            }
        };

        Ok(value)
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let Some(&distance) = self.locals.get(&id) else {
            return Err(LoxError::runtime(keyword, "Cannot use 'super' outside of a class."));
        };

        let Value::Class(superclass) = Environment::get_at(&self.environment, distance, keyword)?
        else {
            return Err(LoxError::runtime(keyword, "Superclass must be a class."));
        };

        // `this` lives in the frame just inside the one holding `super`.
        let this = Token::new(TokenType::THIS, "this", keyword.line);
        let Value::Instance(instance) =
            Environment::get_at(&self.environment, distance.saturating_sub(1), &this)?
        else {
            return Err(LoxError::runtime(keyword, "Only instances have properties."));
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(LoxError::runtime(
                method,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    /// Check arity, then dispatch on the kind of callable.
    fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> Result<Value> {
        let Some(arity) = callee.arity() else {
            return Err(LoxError::runtime(paren, "Can only call functions and classes."));
        };

        if arguments.len() != arity {
            return Err(LoxError::runtime(
                paren,
                format!("Expected {} arguments but got {}.", arity, arguments.len()),
            ));
        }

        match callee {
            Value::Native(native) => {
                debug!("Calling native function '{}'", native.name);
                (native.func)(&arguments).map_err(|message| LoxError::runtime(paren, message))
            }
            Value::Function(function) => function.call(self, arguments),
            Value::Class(class) => LoxClass::instantiate(&class, self, arguments),
            _ => Err(LoxError::runtime(paren, "Can only call functions and classes.")),
        }
    }
}
