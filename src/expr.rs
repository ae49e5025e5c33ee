use crate::literal::Literal;
use crate::token::Token;

/// Identifies a `Variable`/`Assign`/`This`/`Super` expression node for the
/// resolver's scope-distance table. Assigned by the parser at construction
/// time since AST nodes are plain owned values, not individually
/// addressable by pointer once stored in a tree.
pub type ExprId = u32;

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Grouping(GroupingExpr),
    Variable(VariableExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    Get(GetExpr),
    Set(SetExpr),
    This(ThisExpr),
    Super(SuperExpr),
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingExpr {
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct VariableExpr {
    pub id: ExprId,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub id: ExprId,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetExpr {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetExpr {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ThisExpr {
    pub id: ExprId,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct SuperExpr {
    pub id: ExprId,
    pub keyword: Token,
    pub method: Token,
}

impl Expr {
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(e) => visitor.visit_literal_expr(e),
            Expr::Unary(e) => visitor.visit_unary_expr(e),
            Expr::Binary(e) => visitor.visit_binary_expr(e),
            Expr::Logical(e) => visitor.visit_logical_expr(e),
            Expr::Grouping(e) => visitor.visit_grouping_expr(e),
            Expr::Variable(e) => visitor.visit_variable_expr(e),
            Expr::Assign(e) => visitor.visit_assign_expr(e),
            Expr::Call(e) => visitor.visit_call_expr(e),
            Expr::Get(e) => visitor.visit_get_expr(e),
            Expr::Set(e) => visitor.visit_set_expr(e),
            Expr::This(e) => visitor.visit_this_expr(e),
            Expr::Super(e) => visitor.visit_super_expr(e),
        }
    }
}

/// Visits a fully-typed expression node. Each method receives the concrete
/// data struct for its variant rather than the enum itself.
pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, expr: &Literal) -> T;
    fn visit_unary_expr(&mut self, expr: &UnaryExpr) -> T;
    fn visit_binary_expr(&mut self, expr: &BinaryExpr) -> T;
    fn visit_logical_expr(&mut self, expr: &LogicalExpr) -> T;
    fn visit_grouping_expr(&mut self, expr: &GroupingExpr) -> T;
    fn visit_variable_expr(&mut self, expr: &VariableExpr) -> T;
    fn visit_assign_expr(&mut self, expr: &AssignExpr) -> T;
    fn visit_call_expr(&mut self, expr: &CallExpr) -> T;
    fn visit_get_expr(&mut self, expr: &GetExpr) -> T;
    fn visit_set_expr(&mut self, expr: &SetExpr) -> T;
    fn visit_this_expr(&mut self, expr: &ThisExpr) -> T;
    fn visit_super_expr(&mut self, expr: &SuperExpr) -> T;
}
