use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, ExprId, FunctionDecl},
        expressions::{
            AssignExpr, BinaryExpr, CallExpr, FunctionExpr, GroupingExpr, LiteralExpr,
            LiteralValue, LogicalExpr, UnaryExpr, VariableExpr,
        },
    },
    errors::errors::ErrorImpl,
    lexer::tokens::{Literal, TokenKind},
};

use super::{
    lookups::BindingPower,
    parser::{ParseError, Parser},
    stmt::parse_block,
};

/// Upper bound on call arguments and function parameters.
pub const MAX_ARITY: usize = 255;

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, ParseError> {
    // First parse NUD
    let Some(nud) = parser.get_nud_handler(parser.current_token_kind()) else {
        return Err(parser.error_at_current("Expect expression"));
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the caller, keep extending lhs
    while parser.current_binding_power() > bp {
        let Some(led) = parser.get_led_handler(parser.current_token_kind()) else {
            break;
        };

        let binding_power = parser.current_binding_power();
        left = led(parser, left, binding_power)?;
    }

    Ok(left)
}

/// Parses a full expression, assignment included.
pub fn parse_expression(parser: &mut Parser) -> Result<Expr, ParseError> {
    parse_expr(parser, BindingPower::Default)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.advance().clone();

    let value = match token.kind {
        TokenKind::True => LiteralValue::Bool(true),
        TokenKind::False => LiteralValue::Bool(false),
        TokenKind::Nil => LiteralValue::Nil,
        TokenKind::Number => match token.literal {
            Some(Literal::Number(number)) => LiteralValue::Number(number),
            _ => LiteralValue::Number(token.lexeme.parse().unwrap_or_default()),
        },
        TokenKind::String => match token.literal {
            Some(Literal::String(string)) => LiteralValue::String(string),
            _ => LiteralValue::String(token.lexeme.trim_matches('"').to_string()),
        },
        TokenKind::Identifier => {
            return Ok(Expr::Variable(VariableExpr {
                id: ExprId::next(),
                name: token,
            }))
        }
        _ => {
            return Err(ParseError::new(
                ErrorImpl::expected(&token, "Expect expression"),
                &token,
            ))
        }
    };

    Ok(Expr::Literal(LiteralExpr { value }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, ParseError> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        left: left.boxed(),
        operator,
        right: right.boxed(),
    }))
}

pub fn parse_logical_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, ParseError> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Logical(LogicalExpr {
        left: left.boxed(),
        operator,
        right: right.boxed(),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        operator,
        right: right.boxed(),
    }))
}

/// Assignment is right-associative and only accepts a bare variable on the
/// left. Any other target is reported and the left side is kept as is.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, ParseError> {
    let equals = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Default)?;

    match left {
        Expr::Variable(variable) => Ok(Expr::Assign(AssignExpr {
            id: ExprId::next(),
            name: variable.name,
            value: value.boxed(),
        })),
        other => {
            parser.report(ParseError::new(ErrorImpl::InvalidAssignmentTarget, &equals));
            Ok(other)
        }
    }
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    parser.advance();
    let expression = parse_expression(parser)?;
    parser.expect(TokenKind::CloseParen, "Expect ')' after expression")?;

    Ok(Expr::Grouping(GroupingExpr {
        expression: expression.boxed(),
    }))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, ParseError> {
    parser.advance();

    let mut arguments = vec![];

    if !parser.check(TokenKind::CloseParen) {
        loop {
            if arguments.len() >= MAX_ARITY {
                let error = ParseError::new(ErrorImpl::TooManyArguments, parser.current_token());
                parser.report(error);
            }
            arguments.push(parse_expression(parser)?);

            if parser.check(TokenKind::Comma) {
                parser.advance();
            } else {
                break;
            }
        }
    }

    let paren = parser.expect(TokenKind::CloseParen, "Expect ')' after arguments")?;

    Ok(Expr::Call(CallExpr {
        callee: left.boxed(),
        paren,
        arguments,
    }))
}

pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    let keyword = parser.advance().clone();
    let function = parse_function_body(parser, "function")?;

    Ok(Expr::Function(FunctionExpr { keyword, function }))
}

/// Parses `(params) { body }`, shared by declarations and function expressions.
pub fn parse_function_body(parser: &mut Parser, kind: &str) -> Result<Rc<FunctionDecl>, ParseError> {
    parser.expect(TokenKind::OpenParen, &format!("Expect '(' after {} name", kind))?;

    let mut params = vec![];
    if !parser.check(TokenKind::CloseParen) {
        loop {
            if params.len() >= MAX_ARITY {
                let error = ParseError::new(ErrorImpl::TooManyParameters, parser.current_token());
                parser.report(error);
            }
            params.push(parser.expect(TokenKind::Identifier, "Expect parameter name")?);

            if parser.check(TokenKind::Comma) {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen, "Expect ')' after parameters")?;
    parser.expect(TokenKind::OpenCurly, &format!("Expect '{{' before {} body", kind))?;
    let body = parse_block(parser)?;

    Ok(Rc::new(FunctionDecl { params, body }))
}
