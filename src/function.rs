//! Callables: host‑provided native functions and user closures.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

use log::{debug, trace};

use crate::ast::FunctionDecl;
use crate::class::LoxInstance;
use crate::environment::{EnvRef, Environment};
use crate::error::Result;
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;

/// Signature of a host function.  An `Err` message becomes a runtime error at
/// the call site.
pub type NativeFn = fn(&[Value]) -> std::result::Result<Value, String>;

/// A function implemented by the host.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// Process‑wide origin for `clock`.
fn clock_epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// `clock()`: milliseconds elapsed since an arbitrary, fixed point.
/// Monotonic, so differences between two calls are never negative.
fn clock(_args: &[Value]) -> std::result::Result<Value, String> {
    let millis: f64 = clock_epoch().elapsed().as_secs_f64() * 1000.0;

    trace!("Native function 'clock' returned: {}", millis);

    Ok(Value::Number(millis))
}

/// Every native function the global environment starts with.
pub fn native_functions() -> Vec<NativeFunction> {
    // Pin the epoch when the first interpreter starts, not at the first call.
    clock_epoch();

    vec![NativeFunction {
        name: "clock",
        arity: 0,
        func: clock,
    }]
}

/// A user function or method together with the environment it closes over.
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// A copy of this method whose closure is a fresh frame binding `this`.
    pub fn bind(&self, instance: Rc<RefCell<LoxInstance>>) -> LoxFunction {
        let environment: EnvRef = Environment::child_of(&self.closure);
        environment
            .borrow_mut()
            .define("this", Value::Instance(instance));

        LoxFunction {
            declaration: Rc::clone(&self.declaration),
            closure: environment,
            is_initializer: self.is_initializer,
        }
    }

    /// Run the body with `arguments` bound to the parameters.  The caller has
    /// already checked the argument count.
    pub fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        let environment: EnvRef = Environment::child_of(&self.closure);
        {
            let mut frame = environment.borrow_mut();
            for (param, argument) in self.declaration.params.iter().zip(arguments) {
                trace!("Binding parameter '{}' to {}", param.lexeme, argument);
                frame.define(&param.lexeme, argument);
            }
        }

        let flow: Flow = interpreter.execute_block(&self.declaration.body, environment)?;

        // An initializer hands back its instance whatever the body returned.
        if self.is_initializer {
            return Ok(self.closure.borrow().lookup("this").unwrap_or(Value::Nil));
        }

        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        })
    }
}

impl fmt::Debug for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}
