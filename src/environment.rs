use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope frame.  Closures, bound methods and child frames
/// all hold one of these, so a frame lives as long as anything can still see
/// it.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// The global frame.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap a fresh child of `enclosing` in a shared handle.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Bind `name` in this frame, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Value bound in this frame only.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    /// Dynamic lookup along the whole chain (used for globals).
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Dynamic assignment along the whole chain (used for globals).  Never
    /// creates a binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Look `name` up exactly `distance` frames out from `env`.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        let frame: EnvRef = Self::ancestor(env, distance, name)?;
        let value: Option<Value> = frame.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| {
            LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
        })
    }

    /// Assign `name` exactly `distance` frames out from `env`.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        let frame: EnvRef = Self::ancestor(env, distance, name)?;
        frame
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
        Ok(())
    }

    /// Walk `distance` enclosing links.  A chain that is too short means the
    /// resolver and the interpreter disagree; it surfaces as a runtime error
    /// at `name` instead of a panic.
    fn ancestor(env: &EnvRef, distance: usize, name: &Token) -> Result<EnvRef> {
        let mut frame: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let next: Option<EnvRef> = frame.borrow().enclosing.clone();
            frame = next.ok_or_else(|| {
                LoxError::runtime(
                    name,
                    format!("Unresolvable scope depth for '{}'.", name.lexeme),
                )
            })?;
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn get_at_walks_exactly_distance_links() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));

        let block: EnvRef = Environment::child_of(&global);
        block.borrow_mut().define("a", Value::Number(2.0));

        let inner: EnvRef = Environment::child_of(&block);

        assert_eq!(
            Environment::get_at(&inner, 1, &ident("a")).unwrap(),
            Value::Number(2.0)
        );
        assert_eq!(
            Environment::get_at(&inner, 2, &ident("a")).unwrap(),
            Value::Number(1.0)
        );
        assert!(Environment::get_at(&inner, 0, &ident("a")).is_err());
        assert!(Environment::get_at(&inner, 3, &ident("a")).is_err());
    }

    #[test]
    fn assign_updates_the_defining_frame() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("x", Value::Nil);

        let child: EnvRef = Environment::child_of(&global);
        child
            .borrow_mut()
            .assign(&ident("x"), Value::Bool(true))
            .unwrap();

        assert_eq!(global.borrow().get(&ident("x")).unwrap(), Value::Bool(true));
        assert!(child.borrow().values.get("x").is_none());
    }

    #[test]
    fn undefined_names_are_runtime_errors() {
        let mut global = Environment::new();

        let err = global.get(&ident("nope")).unwrap_err();
        assert_eq!(err.message(), "Undefined variable 'nope'.");

        assert!(global.assign(&ident("nope"), Value::Nil).is_err());
    }
}
