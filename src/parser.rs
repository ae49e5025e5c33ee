use std::rc::Rc;

use crate::error::{Host, ParseError, Reportable};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, TokenKind};

type ParseResult<T> = Result<T, ParseError>;

/// Returns if the next token is any of the given kinds, consuming it if so.
macro_rules! matches {
    ( $self:ident, $( $kind:expr ),+ ) => {
        {
            if $( $self.check($kind) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser over a finished token stream.
///
/// - Program     -> Declaration* EOF ;
/// - Block       -> "{" Declaration* "}" ;
/// - Declaration -> ClassDecl | FunDecl | VarDecl | Statement ;
/// - ClassDecl   -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" Function* "}" ;
/// - FunDecl     -> "fun" Function ;
/// - VarDecl     -> "var" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function    -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters  -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement   -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt | WhileStmt | Block ;
/// - ExprStmt    -> Expression ";" ;
/// - ForStmt     -> "for" "(" ( Declaration | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt      -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt   -> "print" Expression ";" ;
/// - ReturnStmt  -> "return" Expression? ";" ;
/// - WhileStmt   -> "while" "(" Expression ")" Statement ;
/// - Expression  -> Assignment ;
/// - Assignment  -> ( Call "." )? IDENTIFIER "=" Assignment | LogicOr ;
/// - LogicOr     -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd    -> Equality ( "and" Equality )* ;
/// - Equality    -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison  -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term        -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor      -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary       -> ( "!" | "-" ) Unary | Call ;
/// - Arguments   -> Expression ( "," Expression )* ;
/// - Call        -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Primary     -> NUMBER | STRING | "false" | "true" | "nil" | "this" | "(" Expression ")" | IDENTIFIER | "super" "." IDENTIFIER ;
pub struct Parser {
    tokens: Vec<Token>,
    current: u32,
    next_id: ExprId,
    /// Non-fatal errors raised deep in expression parsing (past the 255
    /// argument cap) where no `Host` is in scope to report them
    /// immediately. Drained by `parse` after each declaration so parsing
    /// continues instead of synchronizing past the rest of the statement.
    pending_errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, next_id: 0, pending_errors: Vec::new() }
    }

    fn next_expr_id(&mut self) -> ExprId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Parses the token stream into a statement list, reporting (and
    /// recovering from) any parse errors along the way.
    pub fn parse(&mut self, host: &mut Host) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration(host) {
                statements.push(stmt);
            }

            for error in self.pending_errors.drain(..) {
                error.report(host);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current as usize]
    }

    fn previous(&self) -> &Token {
        &self.tokens[(self.current - 1) as usize]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self, host: &mut Host) -> Option<Stmt> {
        let result = if matches!(self, TokenKind::Class) {
            self.class_declaration(host)
        } else if matches!(self, TokenKind::Fun) {
            self.function("function", host).map(Stmt::Function)
        } else if matches!(self, TokenKind::Var) {
            self.var_declaration()
        } else {
            self.statement(host)
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                error.report(host);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self, host: &mut Host) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?.clone();

        let superclass = if matches!(self, TokenKind::Less) {
            self.consume(TokenKind::Identifier, "Expect superclass name.")?;
            Some(VariableExpr { id: self.next_expr_id(), name: self.previous().clone() })
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = vec![];
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method", host)?);
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassStmt { name, superclass, methods }))
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?.clone();

        let initializer = if matches!(self, TokenKind::Equal) { Some(self.expression()?) } else { None };

        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarStmt { name, initializer }))
    }

    fn while_statement(&mut self, host: &mut Host) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement(host)?);

        Ok(Stmt::While(WhileStmt { condition, body }))
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn statement(&mut self, host: &mut Host) -> ParseResult<Stmt> {
        if matches!(self, TokenKind::For) {
            return self.for_statement(host);
        }

        if matches!(self, TokenKind::If) {
            return self.if_statement(host);
        }

        if matches!(self, TokenKind::Print) {
            return self.print_statement();
        }

        if matches!(self, TokenKind::Return) {
            return self.return_statement();
        }

        if matches!(self, TokenKind::While) {
            return self.while_statement(host);
        }

        if matches!(self, TokenKind::LeftBrace) {
            return Ok(Stmt::Block(BlockStmt { statements: self.block(host)? }));
        }

        self.expression_statement()
    }

    fn for_statement(&mut self, host: &mut Host) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches!(self, TokenKind::Semicolon) {
            None
        } else if matches!(self, TokenKind::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RightParen) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement(host)?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockStmt {
                statements: vec![body, Stmt::Expression(ExpressionStmt { expression: increment })],
            });
        }

        body = Stmt::While(WhileStmt {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockStmt { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self, host: &mut Host) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement(host)?);
        let else_branch =
            if matches!(self, TokenKind::Else) { Some(Box::new(self.statement(host)?)) } else { None };

        Ok(Stmt::If(IfStmt { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintStmt { expression }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.expression()?) };

        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnStmt { keyword, value }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionStmt { expression }))
    }

    fn function(&mut self, kind: &str, host: &mut Host) -> ParseResult<Rc<FunctionDecl>> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {kind} name."))?.clone();

        self.consume(TokenKind::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = vec![];
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= 255 {
                    ParseError {
                        token: self.peek().clone(),
                        message: "Can't have more than 255 parameters.".to_string(),
                    }
                    .report(host);
                }

                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?.clone());

                if !matches!(self, TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.consume(TokenKind::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block(host)?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    fn block(&mut self, host: &mut Host) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration(host) {
                statements.push(stmt);
            }
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if matches!(self, TokenKind::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(v) => Ok(Expr::Assign(AssignExpr {
                    id: self.next_expr_id(),
                    name: v.name,
                    value: Box::new(value),
                })),
                Expr::Get(g) => {
                    Ok(Expr::Set(SetExpr { object: g.object, name: g.name, value: Box::new(value) }))
                }
                _ => Err(ParseError { token: equals, message: "Invalid assignment target.".to_string() }),
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, TokenKind::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while matches!(self, TokenKind::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches!(self, TokenKind::BangEqual, TokenKind::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches!(self, TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::Less, TokenKind::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Loops over the right operand so `-`/`+` are left-associative.
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, TokenKind::Minus, TokenKind::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Loops over the right operand so `/`/`*` are left-associative.
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches!(self, TokenKind::Slash, TokenKind::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, TokenKind::Bang, TokenKind::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryExpr { operator, right: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    self.pending_errors.push(ParseError {
                        token: self.peek().clone(),
                        message: "Can't have more than 255 arguments.".to_string(),
                    });
                }

                arguments.push(self.expression()?);

                if !matches!(self, TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?.clone();

        Ok(Expr::Call(CallExpr { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::Get(GetExpr { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, TokenKind::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }

        if matches!(self, TokenKind::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }

        if matches!(self, TokenKind::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }

        if matches!(self, TokenKind::Number, TokenKind::String) {
            let literal = self.previous().literal.clone().expect("number or string token carries a literal");
            return Ok(Expr::Literal(literal));
        }

        if matches!(self, TokenKind::Super) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(TokenKind::Identifier, "Expect superclass method name.")?.clone();

            return Ok(Expr::Super(SuperExpr { id: self.next_expr_id(), keyword, method }));
        }

        if matches!(self, TokenKind::This) {
            return Ok(Expr::This(ThisExpr { id: self.next_expr_id(), keyword: self.previous().clone() }));
        }

        if matches!(self, TokenKind::Identifier) {
            return Ok(Expr::Variable(VariableExpr { id: self.next_expr_id(), name: self.previous().clone() }));
        }

        if matches!(self, TokenKind::LeftParen) {
            let expression = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingExpr { expression: Box::new(expression) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    /// Discards tokens until we're likely at the start of the next
    /// statement, so one bad declaration doesn't hide the rest of the file.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}
