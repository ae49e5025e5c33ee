use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Signal};
use crate::object::{Callable, Object};
use crate::stmt::FunctionDecl;
use crate::token::{Token, TokenKind};

/// A user-defined function or method. Carries its own closure so that a
/// nested function keeps seeing the variables visible at its definition
/// site even after the enclosing call returns.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a copy of this function whose closure encloses the original
    /// one and additionally binds `this` to `instance` (used for method
    /// lookups on an instance).
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);

        Function {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        let signal = interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment)))?;

        if self.is_initializer {
            let this_token = Token::from("this");
            return self.closure.borrow().get_at(0, &this_token);
        }

        match signal {
            Signal::Return(value) => Ok(value),
            Signal::None => Ok(Object::from(crate::literal::Literal::Nil)),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A builtin exposed to Lox code through the global environment.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: Token,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name.lexeme == other.name.lexeme && self.function == other.function
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        0
    }
}

impl NativeFunction {
    /// The interpreter's sole builtin: a monotonic-ish millisecond clock.
    pub fn get_globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: Token::new(TokenKind::Identifier, "clock".to_owned(), None, 0),
            function: |_, _| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock is after the Unix epoch")
                    .as_millis();
                Ok(Object::from(now as f64))
            },
        }]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name.lexeme)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name.lexeme)
    }
}
