use super::*;
use crate::ast::Expr;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression: a primary, optionally compared against a
    /// second primary.
    pub(crate) fn parse_expr(&mut self) -> Expr {
        let lhs = self.parse_primary_expr();

        if self.current_token.is_comparison() {
            let op = self.current_token.clone();
            self.next();
            let rhs = self.parse_primary_expr();
            return Expr::Comparison {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        lhs
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> Expr {
        match self.current_token {
            Token::IntegerLit(value) => {
                self.next();
                Expr::IntegerLit(value)
            }
            Token::Identifier(_) => self.parse_identifier_or_call_expr(),
            _ => {
                self.unexpected();
                Expr::Error
            }
        }
    }

    /* Expressions.Identifier */
    /// Parses an identifier or a call expression.
    fn parse_identifier_or_call_expr(&mut self) -> Expr {
        let ident = match self.eat_identifier() {
            Some(ident) => ident,
            None => {
                self.unexpected();
                return Expr::Error;
            }
        };

        if self.current_token == Token::OpenParen {
            self.finish_call_expr(ident)
        } else {
            Expr::Identifier(ident)
        }
    }

    /// Parses the parenthesized argument list of a call to `ident`.
    pub(crate) fn finish_call_expr(&mut self, ident: String) -> Expr {
        self.expect(Token::OpenParen);
        let mut args = Vec::new();

        if !self.eat(Token::CloseParen) {
            loop {
                args.push(self.parse_expr());

                if self.eat(Token::CloseParen) {
                    break;
                } else if !self.eat(Token::Comma) {
                    self.unexpected();
                    break;
                }
            }
        }

        Expr::FnCall { ident, args }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        let source = source.into();
        let ast = Parser::new(&source).parse_expr();
        assert!(source.has_no_errors(), "{}", source.render_errors());
        ast
    }

    #[test]
    fn literal() {
        assert_eq!(expr("7"), Expr::IntegerLit(7));
        assert_eq!(expr("1234567890123"), Expr::IntegerLit(1_234_567_890_123));
    }

    #[test]
    fn identifier() {
        assert_eq!(expr("foo"), Expr::Identifier("foo".to_string()));
    }

    #[test]
    fn fn_call() {
        assert_eq!(
            expr("foo()"),
            Expr::FnCall {
                ident: "foo".to_string(),
                args: Vec::new(),
            }
        );
        assert_eq!(
            expr("foo(1, bar)"),
            Expr::FnCall {
                ident: "foo".to_string(),
                args: vec![Expr::IntegerLit(1), Expr::Identifier("bar".to_string())],
            }
        );
        assert_eq!(
            expr("foo(1, bar, baz())"),
            Expr::FnCall {
                ident: "foo".to_string(),
                args: vec![
                    Expr::IntegerLit(1),
                    Expr::Identifier("bar".to_string()),
                    Expr::FnCall {
                        ident: "baz".to_string(),
                        args: Vec::new(),
                    },
                ],
            }
        );
    }

    #[test]
    fn comparisons() {
        assert_eq!(
            expr("x < 10"),
            Expr::Comparison {
                lhs: Box::new(Expr::Identifier("x".to_string())),
                op: Token::LessThan,
                rhs: Box::new(Expr::IntegerLit(10)),
            }
        );
        assert_eq!(
            expr("f() != g()"),
            Expr::Comparison {
                lhs: Box::new(Expr::FnCall {
                    ident: "f".to_string(),
                    args: Vec::new(),
                }),
                op: Token::NotEquals,
                rhs: Box::new(Expr::FnCall {
                    ident: "g".to_string(),
                    args: Vec::new(),
                }),
            }
        );
    }

    #[test]
    fn comparison_operands_nest_in_calls() {
        assert_eq!(
            expr("f(x <= 3)"),
            Expr::FnCall {
                ident: "f".to_string(),
                args: vec![Expr::Comparison {
                    lhs: Box::new(Expr::Identifier("x".to_string())),
                    op: Token::LessThanEquals,
                    rhs: Box::new(Expr::IntegerLit(3)),
                }],
            }
        );
    }

    #[test]
    fn malformed_expression_is_an_error_node() {
        let source: deviant_source::Source = "(".into();
        let ast = Parser::new(&source).parse_expr();
        assert_eq!(ast, Expr::Error);
        assert!(!source.has_no_errors());
    }
}
