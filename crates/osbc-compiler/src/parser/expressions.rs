// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Expression parsing.
//!
//! ## Precedence Table (lowest to highest)
//!
//! | Precedence | Operators |
//! |------------|-----------|
//! | 1 | `==` `!=` |
//! | 2 | `<` `>` `<=` `>=` |
//! | 3 | `<<` `>>` |
//! | 4 | `+` `-` |
//! | 5 | `*` `/` `%` |
//! | 6 | `-` `!` `~` `+` (prefix) |
//! | 7 | literals, names, calls, `( )` |
//!
//! The five binary tiers share [`Parser::parse_binary`]. All binary
//! operators are left associative. A prefix `+` is accepted and dropped.

use crate::Error;
use crate::ast::*;
use crate::lexer::TokenKind;

use super::Parser;

type Tier = &'static [(TokenKind, BinaryOperator)];

/// Binary operator tiers, loosest first.
const TIERS: [Tier; 5] = [
    &[
        (TokenKind::Equality, BinaryOperator::Equal),
        (TokenKind::NotEqual, BinaryOperator::NotEqual),
    ],
    &[
        (TokenKind::Char('<'), BinaryOperator::Less),
        (TokenKind::Char('>'), BinaryOperator::Greater),
        (TokenKind::LessEqual, BinaryOperator::LessEqual),
        (TokenKind::GreatEqual, BinaryOperator::GreaterEqual),
    ],
    &[
        (TokenKind::LeftShift, BinaryOperator::LeftShift),
        (TokenKind::RightShift, BinaryOperator::RightShift),
    ],
    &[
        (TokenKind::Char('+'), BinaryOperator::Add),
        (TokenKind::Char('-'), BinaryOperator::Subtract),
    ],
    &[
        (TokenKind::Char('*'), BinaryOperator::Multiply),
        (TokenKind::Char('/'), BinaryOperator::Divide),
        (TokenKind::Char('%'), BinaryOperator::Modulo),
    ],
];

impl<'a> Parser<'a> {
    /// Parses an expression.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        self.parse_binary(0)
    }

    /// Parses one left-associative tier of binary operators. Operands come
    /// from the next tier, or from unary expressions below the last one.
    fn parse_binary(&mut self, tier: usize) -> Result<Expression, Error> {
        let Some(operators) = TIERS.get(tier).copied() else {
            return self.parse_unary();
        };

        let mut left = self.parse_binary(tier + 1)?;

        while let Some(operator) = self.binary_operator(operators) {
            let line = self.advance().line;
            let right = self.parse_binary(tier + 1)?;
            left = Expression::binary(line, operator, left, right);
        }

        Ok(left)
    }

    fn binary_operator(&self, operators: Tier) -> Option<BinaryOperator> {
        operators
            .iter()
            .find(|(kind, _)| *kind == self.current.kind)
            .map(|&(_, operator)| operator)
    }

    fn parse_unary(&mut self) -> Result<Expression, Error> {
        let operator = match self.current.kind {
            TokenKind::Char('+') => {
                self.advance();
                return self.parse_unary();
            }
            TokenKind::Char('-') => UnaryOperator::Negate,
            TokenKind::Char('!') => UnaryOperator::Not,
            TokenKind::Char('~') => UnaryOperator::BitNot,
            _ => return self.parse_primary(),
        };

        let line = self.advance().line;
        let operand = self.parse_unary()?;

        Ok(Expression::unary(line, operator, operand))
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        match self.current.kind {
            kind if kind.is_constant() => Ok(Expression::constant(self.advance())),
            TokenKind::Ident => {
                let is_call = self.lexer.look_ahead().kind == TokenKind::Char('(');
                let reference = self.parse_reference()?;

                if is_call {
                    Ok(Expression::call(self.parse_call(reference)?))
                } else {
                    Ok(Expression::reference(reference))
                }
            }
            TokenKind::Char('(') => {
                self.advance();
                let expression = self.parse_expression()?;
                self.expect(TokenKind::Char(')'))?;
                Ok(expression)
            }
            _ => Err(self.error_or_lexical("Expected primary expression".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(src: &str) -> Expression {
        let mut parser = Parser::new(src);
        parser.parse_expression().unwrap()
    }

    fn parse_expr_err(src: &str) -> Error {
        let mut parser = Parser::new(src);
        parser.parse_expression().unwrap_err()
    }

    fn binary(expr: &Expression) -> &BinaryExpression {
        match &expr.kind {
            ExpressionKind::Binary(binary) => binary,
            other => panic!("Expected binary expression, found {:?}", other),
        }
    }

    #[test]
    fn test_factor_binds_tighter_than_additive() {
        let expr = parse_expr("1 + 2 * 3");
        let add = binary(&expr);
        assert_eq!(add.operator, BinaryOperator::Add);
        assert_eq!(binary(&add.right).operator, BinaryOperator::Multiply);
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        let expr = parse_expr("10 - 4 - 3");
        let outer = binary(&expr);
        assert_eq!(outer.operator, BinaryOperator::Subtract);
        assert_eq!(binary(&outer.left).operator, BinaryOperator::Subtract);
        assert!(matches!(outer.right.kind, ExpressionKind::Constant(_)));
    }

    #[test]
    fn test_precedence_tiers() {
        let expr = parse_expr("a << 1 < b + 2 == c");
        let eq = binary(&expr);
        assert_eq!(eq.operator, BinaryOperator::Equal);

        let lt = binary(&eq.left);
        assert_eq!(lt.operator, BinaryOperator::Less);
        assert_eq!(binary(&lt.left).operator, BinaryOperator::LeftShift);
        assert_eq!(binary(&lt.right).operator, BinaryOperator::Add);
    }

    #[test]
    fn test_all_binary_operators() {
        let cases = [
            ("a * b", BinaryOperator::Multiply),
            ("a / b", BinaryOperator::Divide),
            ("a % b", BinaryOperator::Modulo),
            ("a + b", BinaryOperator::Add),
            ("a - b", BinaryOperator::Subtract),
            ("a << b", BinaryOperator::LeftShift),
            ("a >> b", BinaryOperator::RightShift),
            ("a < b", BinaryOperator::Less),
            ("a > b", BinaryOperator::Greater),
            ("a <= b", BinaryOperator::LessEqual),
            ("a >= b", BinaryOperator::GreaterEqual),
            ("a == b", BinaryOperator::Equal),
            ("a != b", BinaryOperator::NotEqual),
        ];

        for (src, operator) in cases {
            assert_eq!(binary(&parse_expr(src)).operator, operator, "{}", src);
        }
    }

    #[test]
    fn test_parentheses_group() {
        let expr = parse_expr("(1 + 2) * 3");
        let mul = binary(&expr);
        assert_eq!(mul.operator, BinaryOperator::Multiply);
        assert_eq!(binary(&mul.left).operator, BinaryOperator::Add);
    }

    #[test]
    fn test_unary_is_recursive() {
        let expr = parse_expr("-!~x");
        let ExpressionKind::Unary(neg) = &expr.kind else {
            panic!("Expected unary expression");
        };
        assert_eq!(neg.operator, UnaryOperator::Negate);

        let ExpressionKind::Unary(not) = &neg.operand.kind else {
            panic!("Expected unary expression");
        };
        assert_eq!(not.operator, UnaryOperator::Not);
    }

    #[test]
    fn test_unary_plus_is_dropped() {
        let expr = parse_expr("+5");
        assert!(matches!(&expr.kind, ExpressionKind::Constant(t) if t.literal == "5"));
    }

    #[test]
    fn test_call_expression() {
        let expr = parse_expr("max(a, b + 1, g())");
        let ExpressionKind::Call(call) = &expr.kind else {
            panic!("Expected call expression");
        };
        assert_eq!(call.reference.name(), "max");
        assert_eq!(call.arguments.len(), 3);
        assert!(matches!(call.arguments[2].kind, ExpressionKind::Call(_)));
    }

    #[test]
    fn test_literals_are_constant() {
        for src in ["42", "'c'", "\"text\"", "true", "null"] {
            let expr = parse_expr(src);
            assert!(expr.is_constant, "{}", src);
            assert!(matches!(expr.kind, ExpressionKind::Constant(_)), "{}", src);
        }
    }

    #[test]
    fn test_tiers_match_operator_precedence() {
        for (tier, operators) in TIERS.iter().enumerate() {
            for (_, operator) in operators.iter() {
                assert_eq!(operator.precedence() as usize, tier + 1, "{}", operator);
            }
        }
    }

    #[test]
    fn test_operator_line() {
        let expr = parse_expr("a\n+\nb");
        assert_eq!(expr.line, 2);
    }

    #[test]
    fn test_missing_primary() {
        let err = parse_expr_err("1 + ;");
        assert_eq!(err.message(), "Expected primary expression");

        let err = parse_expr_err("(1 + 2");
        assert_eq!(err.message(), "Unexpected end of file token, expecting \")\"");
    }
}
