use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Host, Reportable, RuntimeError};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, TokenKind};

/// What executing a statement produced, besides an error: either nothing, or
/// (once a `return` is hit) the value to unwind the enclosing call with.
#[derive(Debug, Clone)]
pub enum Signal {
    None,
    Return(Object),
}

/// Walks the resolved AST and evaluates it. Owns the `Host` for the
/// program's lifetime since nested calls (native functions, methods, deeply
/// recursive blocks) need to reach it without every visitor method
/// threading it through by hand.
pub struct Interpreter {
    pub host: Host,
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
}

impl Interpreter {
    pub fn new(host: Host) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            let name = native.name.lexeme.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter { host, globals: Rc::clone(&globals), environment: globals, locals: HashMap::new() }
    }

    /// Records that the variable reference `id` resolves `depth` scopes up
    /// from wherever it is evaluated. Called by the resolver, never by the
    /// evaluator itself.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Executes a finished statement list, reporting (and stopping at) the
    /// first runtime error, matching how a script aborts on an uncaught
    /// exception.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                error.report(&mut self.host);
                break;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        stmt.accept(self)
    }

    /// Executes `statements` in a fresh scope, restoring the previous scope
    /// afterward even if a runtime error or `return` unwinds through it.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Signal, RuntimeError> {
        let previous = mem::replace(&mut self.environment, environment);

        let mut result = Ok(Signal::None);
        for statement in statements {
            match self.execute(statement) {
                Ok(Signal::None) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
        match operand {
            Object::Literal(Literal::Number(n)) => Ok(*n),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operand must be a number.".to_string() }),
        }
    }

    fn number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok((*l, *r)),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operands must be a number.".to_string() }),
        }
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::from(expr.clone()))
    }

    fn visit_unary_expr(&mut self, expr: &UnaryExpr) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&expr.right)?;

        match expr.operator.kind {
            TokenKind::Minus => Ok(Object::from(-Self::number_operand(&expr.operator, &right)?)),
            TokenKind::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!("parser only produces unary operators here"),
        }
    }

    fn visit_binary_expr(&mut self, expr: &BinaryExpr) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&expr.left)?;
        let right = self.evaluate(&expr.right)?;
        let operator = &expr.operator;

        let value = match operator.kind {
            TokenKind::Greater => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l > r)
            }
            TokenKind::GreaterEqual => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l >= r)
            }
            TokenKind::Less => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l < r)
            }
            TokenKind::LessEqual => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l <= r)
            }
            TokenKind::BangEqual => Object::from(left != right),
            TokenKind::EqualEqual => Object::from(left == right),
            TokenKind::Minus => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l - r)
            }
            TokenKind::Slash => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l / r)
            }
            TokenKind::Star => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Object::from(l * r)
            }
            TokenKind::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Object::from(l + r),
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Object::from(format!("{l}{r}"))
                }
                _ => {
                    return Err(RuntimeError {
                        token: operator.clone(),
                        message: "Operands must be two numbers or two strings.".to_string(),
                    });
                }
            },
            _ => unreachable!("parser only produces binary operators here"),
        };

        Ok(value)
    }

    fn visit_logical_expr(&mut self, expr: &LogicalExpr) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&expr.left)?;

        if expr.operator.kind == TokenKind::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&expr.right)
    }

    fn visit_grouping_expr(&mut self, expr: &GroupingExpr) -> Result<Object, RuntimeError> {
        self.evaluate(&expr.expression)
    }

    fn visit_variable_expr(&mut self, expr: &VariableExpr) -> Result<Object, RuntimeError> {
        self.look_up_variable(expr.id, &expr.name)
    }

    fn visit_assign_expr(&mut self, expr: &AssignExpr) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&expr.value)?;

        match self.locals.get(&expr.id) {
            Some(&distance) => self.environment.borrow_mut().assign_at(distance, &expr.name, value.clone()),
            None => self.globals.borrow_mut().assign(&expr.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &CallExpr) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&expr.callee)?;

        let mut arguments = Vec::with_capacity(expr.arguments.len());
        for argument in &expr.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        match callee {
            Object::Function(function) => {
                check_arity(&expr.paren, function.arity(), arguments.len())?;
                function.call(self, arguments)
            }
            Object::NativeFunction(function) => {
                check_arity(&expr.paren, function.arity(), arguments.len())?;
                function.call(self, arguments)
            }
            Object::Class(class) => {
                check_arity(&expr.paren, class.arity(), arguments.len())?;

                let instance = Object::from(Instance::new(Rc::clone(&class)));

                if let Some(initializer) = class.find_method("init") {
                    initializer.bind(instance.clone()).call(self, arguments)?;
                }

                Ok(instance)
            }
            _ => Err(RuntimeError {
                token: expr.paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            }),
        }
    }

    fn visit_get_expr(&mut self, expr: &GetExpr) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&expr.object)?;

        if let Object::Instance(instance) = &object {
            instance.borrow().get(&expr.name, &object)
        } else {
            Err(RuntimeError { token: expr.name.clone(), message: "Only instances have properties.".to_string() })
        }
    }

    fn visit_set_expr(&mut self, expr: &SetExpr) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&expr.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError { token: expr.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&expr.value)?;
        instance.borrow_mut().set(&expr.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &ThisExpr) -> Result<Object, RuntimeError> {
        self.look_up_variable(expr.id, &expr.keyword)
    }

    fn visit_super_expr(&mut self, expr: &SuperExpr) -> Result<Object, RuntimeError> {
        let distance = *self.locals.get(&expr.id).expect("resolver always resolves a 'super' expression");

        let superclass = self.environment.borrow().get_at(distance, &Token::from("super"))?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to a class")
        };

        let instance = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let method = superclass.find_method(&expr.method.lexeme).ok_or_else(|| RuntimeError {
            token: expr.method.clone(),
            message: format!("Undefined property '{}'.", expr.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<(), RuntimeError> {
    if expected != got {
        return Err(RuntimeError {
            token: paren.clone(),
            message: format!("Expected {expected} arguments but got {got}."),
        });
    }

    Ok(())
}

impl StmtVisitor<Result<Signal, RuntimeError>> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionStmt) -> Result<Signal, RuntimeError> {
        self.evaluate(&stmt.expression)?;
        Ok(Signal::None)
    }

    fn visit_print_stmt(&mut self, stmt: &PrintStmt) -> Result<Signal, RuntimeError> {
        let value = self.evaluate(&stmt.expression)?;
        let _ = writeln!(self.host.out, "{value}");
        Ok(Signal::None)
    }

    fn visit_var_stmt(&mut self, stmt: &VarStmt) -> Result<Signal, RuntimeError> {
        let value = match &stmt.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&stmt.name.lexeme, value);
        Ok(Signal::None)
    }

    fn visit_block_stmt(&mut self, stmt: &BlockStmt) -> Result<Signal, RuntimeError> {
        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&stmt.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt) -> Result<Signal, RuntimeError> {
        if self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Signal::None)
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileStmt) -> Result<Signal, RuntimeError> {
        while self.evaluate(&stmt.condition)?.is_truthy() {
            match self.execute(&stmt.body)? {
                Signal::None => {}
                signal => return Ok(signal),
            }
        }

        Ok(Signal::None)
    }

    fn visit_function_stmt(&mut self, stmt: &Rc<FunctionDecl>) -> Result<Signal, RuntimeError> {
        let function = Function::new(Rc::clone(stmt), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&stmt.name.lexeme, Object::from(function));
        Ok(Signal::None)
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) -> Result<Signal, RuntimeError> {
        let value = match &stmt.value {
            Some(value) => self.evaluate(value)?,
            None => Object::from(Literal::Nil),
        };

        Ok(Signal::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &ClassStmt) -> Result<Signal, RuntimeError> {
        let superclass = match &stmt.superclass {
            Some(superclass_expr) => {
                let value = self.look_up_variable(superclass_expr.id, &superclass_expr.name)?;
                let Object::Class(class) = value else {
                    return Err(RuntimeError {
                        token: superclass_expr.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    });
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&stmt.name.lexeme, Object::from(Literal::Nil));

        let previous_environment = if let Some(superclass) = &superclass {
            let mut enclosed = Environment::new(Some(Rc::clone(&self.environment)));
            enclosed.define("super", Object::from(Rc::clone(superclass)));
            Some(mem::replace(&mut self.environment, Rc::new(RefCell::new(enclosed))))
        } else {
            None
        };

        let mut methods = HashMap::new();
        for method in &stmt.methods {
            let function = Function::new(
                Rc::clone(method),
                Rc::clone(&self.environment),
                method.name.lexeme == "init",
            );
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(Class::new(stmt.name.lexeme.clone(), superclass, methods));

        if let Some(previous_environment) = previous_environment {
            self.environment = previous_environment;
        }

        self.environment.borrow_mut().assign(&stmt.name, Object::from(class))?;

        Ok(Signal::None)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(Host::new(Box::new(std::io::stdout()), Box::new(std::io::stderr())))
    }
}
