use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use crate::error::{Reportable, ResolveError};
use crate::expr::*;
use crate::interpreter::Interpreter;
use crate::stmt::*;
use crate::token::Token;

enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static pass between parsing and evaluation: walks the AST once to bind
/// every variable reference to a lexical scope distance, so the evaluator
/// never has to search the environment chain by name. Reports through the
/// `Host` the interpreter already owns.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver { interpreter, scopes: vec![], current_function: FunctionType::None, current_class: ClassType::None }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_function(&mut self, declaration: &FunctionDecl, kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&declaration.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            ResolveError {
                token: name.clone(),
                message: "Already a variable with this name in this scope.".to_string(),
            }
            .report(&mut self.interpreter.host);
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        scope.insert(name.lexeme.clone(), true);
    }

    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
    }
}

impl ExprVisitor<()> for Resolver<'_> {
    fn visit_literal_expr(&mut self, _expr: &crate::literal::Literal) {}

    fn visit_unary_expr(&mut self, expr: &UnaryExpr) {
        self.resolve_expr(&expr.right);
    }

    fn visit_binary_expr(&mut self, expr: &BinaryExpr) {
        self.resolve_expr(&expr.left);
        self.resolve_expr(&expr.right);
    }

    fn visit_logical_expr(&mut self, expr: &LogicalExpr) {
        self.resolve_expr(&expr.left);
        self.resolve_expr(&expr.right);
    }

    fn visit_grouping_expr(&mut self, expr: &GroupingExpr) {
        self.resolve_expr(&expr.expression);
    }

    fn visit_variable_expr(&mut self, expr: &VariableExpr) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&expr.name.lexeme) == Some(&false) {
                ResolveError {
                    token: expr.name.clone(),
                    message: "Can't read local variable in its own initializer.".to_string(),
                }
                .report(&mut self.interpreter.host);
            }
        }

        self.resolve_local(expr.id, &expr.name);
    }

    fn visit_assign_expr(&mut self, expr: &AssignExpr) {
        self.resolve_expr(&expr.value);
        self.resolve_local(expr.id, &expr.name);
    }

    fn visit_call_expr(&mut self, expr: &CallExpr) {
        self.resolve_expr(&expr.callee);
        for argument in &expr.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, expr: &GetExpr) {
        self.resolve_expr(&expr.object);
    }

    fn visit_set_expr(&mut self, expr: &SetExpr) {
        self.resolve_expr(&expr.value);
        self.resolve_expr(&expr.object);
    }

    fn visit_this_expr(&mut self, expr: &ThisExpr) {
        if matches!(self.current_class, ClassType::None) {
            ResolveError { token: expr.keyword.clone(), message: "Can't use 'this' outside of a class.".to_string() }
                .report(&mut self.interpreter.host);
            return;
        }

        self.resolve_local(expr.id, &expr.keyword);
    }

    fn visit_super_expr(&mut self, expr: &SuperExpr) {
        match self.current_class {
            ClassType::None => {
                ResolveError {
                    token: expr.keyword.clone(),
                    message: "Can't use 'super' outside of a class.".to_string(),
                }
                .report(&mut self.interpreter.host);
            }
            ClassType::Class => {
                ResolveError {
                    token: expr.keyword.clone(),
                    message: "Can't use 'super' in a class with no superclass.".to_string(),
                }
                .report(&mut self.interpreter.host);
            }
            ClassType::Subclass => {}
        }

        self.resolve_local(expr.id, &expr.keyword);
    }
}

impl StmtVisitor<()> for Resolver<'_> {
    fn visit_block_stmt(&mut self, stmt: &BlockStmt) {
        self.begin_scope();
        self.resolve(&stmt.statements);
        self.end_scope();
    }

    fn visit_var_stmt(&mut self, stmt: &VarStmt) {
        self.declare(&stmt.name);
        if let Some(initializer) = &stmt.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&stmt.name);
    }

    fn visit_function_stmt(&mut self, stmt: &Rc<FunctionDecl>) {
        self.declare(&stmt.name);
        self.define(&stmt.name);

        self.resolve_function(stmt, FunctionType::Function);
    }

    fn visit_expression_stmt(&mut self, stmt: &ExpressionStmt) {
        self.resolve_expr(&stmt.expression);
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt) {
        self.resolve_expr(&stmt.condition);
        self.resolve_stmt(&stmt.then_branch);
        if let Some(else_branch) = &stmt.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_print_stmt(&mut self, stmt: &PrintStmt) {
        self.resolve_expr(&stmt.expression);
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) {
        if matches!(self.current_function, FunctionType::None) {
            ResolveError { token: stmt.keyword.clone(), message: "Can't return from top-level code.".to_string() }
                .report(&mut self.interpreter.host);
        }

        if let Some(value) = &stmt.value {
            if matches!(self.current_function, FunctionType::Initializer) {
                ResolveError {
                    token: stmt.keyword.clone(),
                    message: "Can't return a value from an initializer.".to_string(),
                }
                .report(&mut self.interpreter.host);
            }

            self.resolve_expr(value);
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileStmt) {
        self.resolve_expr(&stmt.condition);
        self.resolve_stmt(&stmt.body);
    }

    fn visit_class_stmt(&mut self, stmt: &ClassStmt) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&stmt.name);
        self.define(&stmt.name);

        if let Some(superclass) = &stmt.superclass {
            if stmt.name.lexeme == superclass.name.lexeme {
                ResolveError {
                    token: superclass.name.clone(),
                    message: "Class can't inherit from itself.".to_string(),
                }
                .report(&mut self.interpreter.host);
            }

            self.current_class = ClassType::Subclass;
            self.resolve_local(superclass.id, &superclass.name);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &stmt.methods {
            let kind = if method.name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if stmt.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
