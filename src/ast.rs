use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;

/// Renders an expression as a fully-parenthesized s-expression, the way
/// Crafting Interpreters' reference printer does.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";

            string
        }
    };
}

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> String {
        literal.to_string()
    }

    fn visit_logical_expr(&mut self, logical: &LogicalExpr) -> String {
        parenthesize!(self, &logical.operator.lexeme, &logical.left, &logical.right)
    }

    fn visit_unary_expr(&mut self, unary: &UnaryExpr) -> String {
        parenthesize!(self, &unary.operator.lexeme, &unary.right)
    }

    fn visit_binary_expr(&mut self, binary: &BinaryExpr) -> String {
        parenthesize!(self, &binary.operator.lexeme, &binary.left, &binary.right)
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingExpr) -> String {
        parenthesize!(self, "group", grouping.expression)
    }

    fn visit_variable_expr(&mut self, variable: &VariableExpr) -> String {
        variable.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, assign: &AssignExpr) -> String {
        parenthesize!(self, format!("= {}", &assign.name.lexeme).as_str(), assign.value)
    }

    fn visit_call_expr(&mut self, call: &CallExpr) -> String {
        let mut string = call.callee.accept(self);
        string += "(";
        string += &call.arguments.iter().map(|arg| arg.accept(self)).collect::<Vec<String>>().join(" ");
        string += ")";
        string
    }

    fn visit_get_expr(&mut self, get: &GetExpr) -> String {
        format!("(. {} {})", get.object.accept(self), get.name.lexeme)
    }

    fn visit_set_expr(&mut self, set: &SetExpr) -> String {
        format!("(= (. {} {}) {})", set.object.accept(self), set.name.lexeme, set.value.accept(self))
    }

    fn visit_this_expr(&mut self, _this: &ThisExpr) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, super_expr: &SuperExpr) -> String {
        format!("(super {})", super_expr.method.lexeme)
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionStmt) -> String {
        parenthesize!(self, "expr", &stmt.expression)
    }

    fn visit_function_stmt(&mut self, stmt: &std::rc::Rc<FunctionDecl>) -> String {
        let params = stmt.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<String>>().join(" ");
        let body = stmt.body.iter().map(|s| s.accept(self)).collect::<Vec<String>>().join(" ");
        format!("(fun {}({}) {{ {} }})", stmt.name.lexeme, params, body)
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt) -> String {
        let mut string = format!("(if {} {}", stmt.condition.accept(self), stmt.then_branch.accept(self));
        if let Some(else_branch) = &stmt.else_branch {
            string += &format!(" else {}", else_branch.accept(self));
        }
        string += ")";
        string
    }

    fn visit_print_stmt(&mut self, stmt: &PrintStmt) -> String {
        parenthesize!(self, "print", &stmt.expression)
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) -> String {
        match &stmt.value {
            Some(value) => format!("(return {})", value.accept(self)),
            None => "(return)".to_string(),
        }
    }

    fn visit_var_stmt(&mut self, stmt: &VarStmt) -> String {
        match &stmt.initializer {
            Some(initializer) => format!("(var {} = {})", stmt.name.lexeme, initializer.accept(self)),
            None => format!("(var {})", stmt.name.lexeme),
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileStmt) -> String {
        parenthesize!(self, "while", &stmt.condition, &stmt.body)
    }

    fn visit_block_stmt(&mut self, stmt: &BlockStmt) -> String {
        let body = stmt.statements.iter().map(|s| s.accept(self)).collect::<Vec<String>>().join(" ");
        format!("{{ {body} }}")
    }

    fn visit_class_stmt(&mut self, stmt: &ClassStmt) -> String {
        let methods = stmt.methods.iter().map(|m| m.name.lexeme.clone()).collect::<Vec<String>>().join(" ");
        match &stmt.superclass {
            Some(superclass) => format!("(class {} < {} {})", stmt.name.lexeme, superclass.name.lexeme, methods),
            None => format!("(class {} {})", stmt.name.lexeme, methods),
        }
    }
}
