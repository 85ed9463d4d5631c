use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{LiteralExpr, LiteralValue},
        statements::{
            BlockStmt, ExpressionStmt, FnDeclStmt, IfStmt, PrintStmt, ReturnStmt, VarDeclStmt,
            WhileStmt,
        },
    },
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_expression, parse_function_body},
    parser::{ParseError, Parser},
};

/// Parses one declaration, recovering from a syntax error by reporting it and
/// skipping to the next statement boundary. Returns `None` for a statement
/// that could not be parsed.
pub fn parse_declaration(parser: &mut Parser) -> Option<Stmt> {
    let result = match parser.get_decl_handler(parser.current_token_kind()) {
        Some(handler) => handler(parser),
        None => parse_stmt(parser),
    };

    match result {
        Ok(stmt) => Some(stmt),
        Err(error) => {
            parser.report(error);
            parser.synchronize();
            None
        }
    }
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    if let Some(handler) = parser.get_stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let expression = parse_expression(parser)?;
    parser.expect(TokenKind::Semicolon, "Expect ';' after expression")?;

    Ok(Stmt::Expression(ExpressionStmt { expression }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let keyword = parser.advance().clone();
    let value = parse_expression(parser)?;
    parser.expect(TokenKind::Semicolon, "Expect ';' after value")?;

    Ok(Stmt::Print(PrintStmt { keyword, value }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier, "Expect variable name")?;

    let initializer = if parser.check(TokenKind::Assignment) {
        parser.advance();
        Some(parse_expression(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon, "Expect ';' after variable declaration")?;

    Ok(Stmt::Var(VarDeclStmt { name, initializer }))
}

/// Parses the statements of a block whose `{` has already been consumed.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, ParseError> {
    let mut statements = Vec::new();

    while !parser.check(TokenKind::CloseCurly) && !parser.is_at_end() {
        if let Some(stmt) = parse_declaration(parser) {
            statements.push(stmt);
        }
    }

    parser.expect(TokenKind::CloseCurly, "Expect '}' after block")?;

    Ok(statements)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    parser.advance();
    let body = parse_block(parser)?;

    Ok(Stmt::Block(BlockStmt { body }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    parser.advance();

    parser.expect(TokenKind::OpenParen, "Expect '(' after 'if'")?;
    let condition = parse_expression(parser)?;
    parser.expect(TokenKind::CloseParen, "Expect ')' after if condition")?;

    let then_body = parse_stmt(parser)?.boxed();

    let else_body = if parser.check(TokenKind::Else) {
        parser.advance();
        Some(parse_stmt(parser)?.boxed())
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    parser.advance();

    parser.expect(TokenKind::OpenParen, "Expect '(' after 'while'")?;
    let condition = parse_expression(parser)?;
    parser.expect(TokenKind::CloseParen, "Expect ')' after condition")?;

    let body = parse_stmt(parser)?.boxed();

    Ok(Stmt::While(WhileStmt { condition, body }))
}

/// `for (init; cond; incr) body` becomes
/// `{ init; while (cond) { body; incr; } }`, with a missing condition read as `true`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    parser.advance();

    parser.expect(TokenKind::OpenParen, "Expect '(' after 'for'")?;

    let initializer = match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            None
        }
        TokenKind::Var => Some(parse_var_decl_stmt(parser)?),
        _ => Some(parse_expression_stmt(parser)?),
    };

    let condition = if parser.check(TokenKind::Semicolon) {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.expect(TokenKind::Semicolon, "Expect ';' after loop condition")?;

    let increment = if parser.check(TokenKind::CloseParen) {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.expect(TokenKind::CloseParen, "Expect ')' after for clauses")?;

    let mut body = parse_stmt(parser)?;

    if let Some(increment) = increment {
        body = Stmt::Block(BlockStmt {
            body: vec![body, Stmt::Expression(ExpressionStmt { expression: increment })],
        });
    }

    let condition = condition.unwrap_or(Expr::Literal(LiteralExpr {
        value: LiteralValue::Bool(true),
    }));
    body = Stmt::While(WhileStmt {
        condition,
        body: body.boxed(),
    });

    if let Some(initializer) = initializer {
        body = Stmt::Block(BlockStmt {
            body: vec![initializer, body],
        });
    }

    Ok(body)
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    // `fun (` starts an anonymous function used as an expression statement
    if parser.next_token_kind() != TokenKind::Identifier {
        return parse_expression_stmt(parser);
    }

    parser.advance();
    let name = parser.expect(TokenKind::Identifier, "Expect function name")?;
    let function = parse_function_body(parser, "function")?;

    Ok(Stmt::Function(FnDeclStmt { name, function }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let keyword = parser.advance().clone();

    let value = if parser.check(TokenKind::Semicolon) {
        None
    } else {
        Some(parse_expression(parser)?)
    };

    parser.expect(TokenKind::Semicolon, "Expect ';' after return value")?;

    Ok(Stmt::Return(ReturnStmt { keyword, value }))
}
