use super::*;

impl<'a> Parser<'a> {
    /// Parses a function declaration: `fn name() -> int { ... }`.
    /// The grammar has no parameters; the return type is always `int`.
    pub(crate) fn parse_fn_declaration(&mut self) -> Stmt {
        self.expect(Token::Fn);
        let ident = match self.eat_identifier() {
            Some(ident) => ident,
            None => {
                self.unexpected();
                return Stmt::Error;
            }
        };
        self.expect(Token::OpenParen);
        self.expect(Token::CloseParen);
        self.expect(Token::Arrow);
        self.expect(Token::Int);
        let body = self.parse_block();
        Stmt::FnDeclaration { ident, body }
    }

    /// Parses a braced statement list.
    pub(crate) fn parse_block(&mut self) -> Vec<Stmt> {
        self.expect(Token::OpenBrace);

        let mut body = Vec::new();
        while !self.eat(Token::CloseBrace) {
            if self.current_token == Token::Eof {
                self.error_at_current("expected `}`");
                break;
            }
            body.push(self.parse_stmt());
        }

        body
    }

    /// Parses a statement. Dispatch is on the current token; a leading
    /// identifier needs one more token of lookahead to split assignments
    /// from calls.
    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        match self.current_token {
            Token::Var => self.parse_var_declaration(),
            Token::Return => self.parse_return_stmt(),
            Token::If => self.parse_if_stmt(),
            Token::OpenBrace => Stmt::Block(self.parse_block()),
            Token::Identifier(_) => self.parse_assignment_or_call(),
            _ => {
                self.unexpected();
                self.next(); // always make progress
                Stmt::Error
            }
        }
    }

    fn parse_var_declaration(&mut self) -> Stmt {
        self.expect(Token::Var);
        let ident = match self.eat_identifier() {
            Some(ident) => ident,
            None => {
                self.unexpected();
                return Stmt::Error;
            }
        };
        let initializer = if self.eat(Token::Equals) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(Token::Semi);
        Stmt::VarDeclaration { ident, initializer }
    }

    fn parse_assignment_or_call(&mut self) -> Stmt {
        let ident = match self.eat_identifier() {
            Some(ident) => ident,
            None => {
                self.unexpected();
                return Stmt::Error;
            }
        };

        match self.current_token {
            Token::OpenParen => {
                let call = self.finish_call_expr(ident);
                self.expect(Token::Semi);
                Stmt::ExprStmt(call)
            }
            Token::Equals => {
                self.next();
                let value = self.parse_expr();
                self.expect(Token::Semi);
                Stmt::Assignment { ident, value }
            }
            _ => {
                self.unexpected();
                Stmt::Error
            }
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        self.expect(Token::Return);
        if self.eat(Token::Semi) {
            return Stmt::ReturnStmt(None);
        }
        let expr = self.parse_expr();
        self.expect(Token::Semi);
        Stmt::ReturnStmt(Some(expr))
    }

    fn parse_if_stmt(&mut self) -> Stmt {
        self.expect(Token::If);
        self.expect(Token::OpenParen);
        let condition = self.parse_expr();
        self.expect(Token::CloseParen);
        let then_clause = self.parse_block();
        let else_clause = if self.eat(Token::Else) {
            Some(self.parse_block())
        } else {
            None
        };
        Stmt::IfStmt {
            condition,
            then_clause,
            else_clause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    fn parse(source: &str) -> Program {
        let source = source.into();
        let program = Parser::new(&source).parse_program();
        assert!(source.has_no_errors(), "{}", source.render_errors());
        program
    }

    fn parse_with_errors(source: &str) -> (Program, Vec<String>) {
        let source: deviant_source::Source = source.into();
        let program = Parser::new(&source).parse_program();
        let messages = source
            .errors
            .errors()
            .iter()
            .map(|error| error.message().to_string())
            .collect();
        (program, messages)
    }

    #[test]
    fn fn_declaration() {
        assert_eq!(
            parse("fn main() -> int { return 0; }").body,
            vec![Stmt::FnDeclaration {
                ident: "main".to_string(),
                body: vec![Stmt::ReturnStmt(Some(Expr::IntegerLit(0)))],
            }]
        );
    }

    #[test]
    fn var_declaration() {
        assert_eq!(
            parse("fn f() -> int { var x; var y = 2; return y; }").body,
            vec![Stmt::FnDeclaration {
                ident: "f".to_string(),
                body: vec![
                    Stmt::VarDeclaration {
                        ident: "x".to_string(),
                        initializer: None,
                    },
                    Stmt::VarDeclaration {
                        ident: "y".to_string(),
                        initializer: Some(Expr::IntegerLit(2)),
                    },
                    Stmt::ReturnStmt(Some(Expr::Identifier("y".to_string()))),
                ],
            }]
        );
    }

    #[test]
    fn assignment_vs_call() {
        assert_eq!(
            parse("fn f() -> int { x = 1; x(); return 0; }").body,
            vec![Stmt::FnDeclaration {
                ident: "f".to_string(),
                body: vec![
                    Stmt::Assignment {
                        ident: "x".to_string(),
                        value: Expr::IntegerLit(1),
                    },
                    Stmt::ExprStmt(Expr::FnCall {
                        ident: "x".to_string(),
                        args: Vec::new(),
                    }),
                    Stmt::ReturnStmt(Some(Expr::IntegerLit(0))),
                ],
            }]
        );
    }

    #[test]
    fn if_else() {
        assert_eq!(
            parse("fn f() -> int { if (x < 2) { return 1; } else { return 2; } }").body,
            vec![Stmt::FnDeclaration {
                ident: "f".to_string(),
                body: vec![Stmt::IfStmt {
                    condition: Expr::Comparison {
                        lhs: Box::new(Expr::Identifier("x".to_string())),
                        op: Token::LessThan,
                        rhs: Box::new(Expr::IntegerLit(2)),
                    },
                    then_clause: vec![Stmt::ReturnStmt(Some(Expr::IntegerLit(1)))],
                    else_clause: Some(vec![Stmt::ReturnStmt(Some(Expr::IntegerLit(2)))]),
                }],
            }]
        );
    }

    #[test]
    fn if_without_else() {
        let program = parse("fn f() -> int { if (x == 1) { x = 2; } return x; }");
        match &program.body[0] {
            Stmt::FnDeclaration { body, .. } => match &body[0] {
                Stmt::IfStmt { else_clause, .. } => assert!(else_clause.is_none()),
                stmt => panic!("not an if statement: {:?}", stmt),
            },
            stmt => panic!("not a function: {:?}", stmt),
        }
    }

    #[test]
    fn bare_return() {
        assert_eq!(
            parse("fn f() -> int { return; }").body,
            vec![Stmt::FnDeclaration {
                ident: "f".to_string(),
                body: vec![Stmt::ReturnStmt(None)],
            }]
        );
    }

    #[test]
    fn free_standing_block() {
        assert_eq!(
            parse("fn f() -> int { { var x; } return 0; }").body,
            vec![Stmt::FnDeclaration {
                ident: "f".to_string(),
                body: vec![
                    Stmt::Block(vec![Stmt::VarDeclaration {
                        ident: "x".to_string(),
                        initializer: None,
                    }]),
                    Stmt::ReturnStmt(Some(Expr::IntegerLit(0))),
                ],
            }]
        );
    }

    #[test]
    fn top_level_recovery() {
        // the stray tokens are reported, the following declaration still parses
        let (program, messages) = parse_with_errors("var x; fn main() -> int { return 0; }");
        assert_eq!(messages, vec!["expected a function declaration".to_string()]);
        assert_eq!(
            program.body,
            vec![Stmt::FnDeclaration {
                ident: "main".to_string(),
                body: vec![Stmt::ReturnStmt(Some(Expr::IntegerLit(0)))],
            }]
        );
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let (_, messages) = parse_with_errors("fn f() -> int { var x = 1 return x; }");
        assert_eq!(messages, vec!["expected `;`, found `return`".to_string()]);
    }

    #[test]
    fn unterminated_block_is_reported() {
        let (_, messages) = parse_with_errors("fn f() -> int { return 0;");
        assert_eq!(messages, vec!["expected `}`".to_string()]);
    }

    #[test]
    fn declaration_without_identifier() {
        let (_, messages) = parse_with_errors("fn f() -> int { var 1; }");
        assert!(!messages.is_empty());
    }
}
