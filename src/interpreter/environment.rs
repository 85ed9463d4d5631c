use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::value::Value;

/// A frame shared by the block or call that created it and by every closure
/// formed while it was active.
pub type SharedEnvironment = Rc<RefCell<Environment>>;

/// One frame of the scope chain.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<SharedEnvironment>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn with_enclosing(enclosing: SharedEnvironment) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_shared(self) -> SharedEnvironment {
        Rc::new(RefCell::new(self))
    }

    /// Binds `name` in this frame, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Looks `name` up in this frame and then outward.
    pub fn get(&self, name: &Token) -> Result<Value, Error> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(undefined_variable(name)),
        }
    }

    /// Assigns to the nearest frame that binds `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), Error> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(undefined_variable(name)),
        }
    }

    /// Walks exactly `distance` enclosing links from `environment`.
    pub fn ancestor(environment: &SharedEnvironment, distance: usize) -> Option<SharedEnvironment> {
        let mut current = Rc::clone(environment);

        for _ in 0..distance {
            let enclosing = current.borrow().enclosing.clone()?;
            current = enclosing;
        }

        Some(current)
    }

    pub fn get_at(
        environment: &SharedEnvironment,
        distance: usize,
        name: &Token,
    ) -> Result<Value, Error> {
        let frame = Environment::ancestor(environment, distance).ok_or_else(|| undefined_variable(name))?;
        let value = frame.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| undefined_variable(name))
    }

    pub fn assign_at(
        environment: &SharedEnvironment,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<(), Error> {
        let frame = Environment::ancestor(environment, distance).ok_or_else(|| undefined_variable(name))?;
        let mut frame = frame.borrow_mut();

        match frame.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(undefined_variable(name)),
        }
    }
}

fn undefined_variable(name: &Token) -> Error {
    Error::at_token(
        ErrorImpl::VariableNotDeclared {
            variable: name.lexeme.clone(),
        },
        name,
    )
}
