//! Lowers the AST into an IR [`Module`].

use crate::intrinsics;
use deviant_ir::builder::IrBuilder;
use deviant_ir::{CmpOp, FunctionId, Module, SlotId, ValueId};
use deviant_parser::ast::{Expr, Program, Stmt};
use deviant_parser::lexer::Token;
use deviant_source::{CompileError, Source};
use std::collections::HashMap;

/// Generate IR from an abstract syntax tree.
///
/// Expression generation returns `Option<ValueId>`; `None` marks a failed
/// generation and is always accompanied by an error reported to the source,
/// so the walk keeps going and every problem in the program is collected in
/// one pass.
pub struct Codegen<'a> {
    builder: IrBuilder,
    /// Lexical scopes, innermost last. Pushed and popped in strict LIFO
    /// order, including on failed generation.
    scopes: Vec<Scope>,
    current_function: Option<FunctionId>,
    source: &'a Source<'a>,
}

#[derive(Default)]
struct Scope {
    locals: HashMap<String, SlotId>,
}

impl<'a> Codegen<'a> {
    pub fn new(module_name: &str, source: &'a Source<'a>) -> Self {
        Self {
            builder: IrBuilder::new(module_name),
            scopes: Vec::new(),
            current_function: None,
            source,
        }
    }

    /// Consumes `self` and returns the generated [`Module`].
    #[must_use]
    pub fn into_module(self) -> Module {
        self.builder.into_module()
    }

    pub fn codegen_program(&mut self, program: &Program) {
        for stmt in &program.body {
            match stmt {
                Stmt::FnDeclaration { .. } => {
                    self.gen_stmt(stmt);
                }
                Stmt::Error => {}
                _ => self.error("only function declarations are allowed at top level"),
            }
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    /// Resolves `ident` against the scope stack, innermost first, without
    /// crossing the function boundary (functions only nest at top level).
    fn resolve_local(&self, ident: &str) -> Option<SlotId> {
        for scope in self.scopes.iter().rev() {
            if let Some(slot) = scope.locals.get(ident) {
                return Some(*slot);
            }
        }
        None
    }

    fn error(&self, message: impl ToString) {
        self.source.errors.add_error(CompileError::new(message, 0..0));
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> Option<ValueId> {
        match stmt {
            Stmt::VarDeclaration { ident, initializer } => {
                self.gen_var_declaration(ident, initializer)
            }
            Stmt::Assignment { ident, value } => self.gen_assignment(ident, value),
            Stmt::FnDeclaration { ident, body } => self.gen_fn_declaration(ident, body),
            Stmt::Block(body) => {
                self.enter_scope();
                let mut last = None;
                for stmt in body {
                    last = self.gen_stmt(stmt);
                }
                self.exit_scope();
                last
            }
            Stmt::IfStmt {
                condition,
                then_clause,
                else_clause,
            } => self.gen_if_stmt(condition, then_clause, else_clause),
            Stmt::ReturnStmt(expr) => match expr {
                Some(expr) => {
                    let value = self.gen_expr(expr)?;
                    self.builder.ret(value);
                    Some(value)
                }
                // a bare `return;` emits nothing; the language has no void
                None => None,
            },
            Stmt::ExprStmt(expr) => self.gen_expr(expr),
            Stmt::Error => None,
        }
    }

    fn gen_var_declaration(&mut self, ident: &str, initializer: &Option<Expr>) -> Option<ValueId> {
        match self.scopes.last() {
            Some(scope) if scope.locals.contains_key(ident) => {
                self.error(format!(
                    "variable `{}` is already declared in this scope",
                    ident
                ));
                return None;
            }
            Some(_) => {}
            None => {
                self.error(format!("cannot declare `{}` outside of a function", ident));
                return None;
            }
        }

        let slot = self.builder.alloca(ident);
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.insert(ident.to_string(), slot);
        }

        match initializer {
            Some(expr) => {
                let value = self.gen_expr(expr)?;
                self.builder.store(value, slot);
                Some(value)
            }
            None => None,
        }
    }

    fn gen_assignment(&mut self, ident: &str, value: &Expr) -> Option<ValueId> {
        let slot = match self.resolve_local(ident) {
            Some(slot) => slot,
            None => {
                self.error(format!("cannot assign to undeclared variable `{}`", ident));
                return None;
            }
        };
        let value = self.gen_expr(value)?;
        self.builder.store(value, slot);
        Some(value)
    }

    fn gen_fn_declaration(&mut self, ident: &str, body: &[Stmt]) -> Option<ValueId> {
        // get-or-declare, so a redeclaration reuses the existing symbol
        let function = self.builder.declare_function(ident);
        let entry = self.builder.create_block("entry");
        self.builder.attach_block(function, entry);
        self.builder.set_insertion_point(entry);

        let enclosing = self.current_function.replace(function);
        self.enter_scope();
        for stmt in body {
            self.gen_stmt(stmt);
        }
        self.exit_scope();
        self.current_function = enclosing;

        None
    }

    fn gen_if_stmt(
        &mut self,
        condition: &Expr,
        then_clause: &[Stmt],
        else_clause: &Option<Vec<Stmt>>,
    ) -> Option<ValueId> {
        let cond = self.gen_expr(condition)?;
        let function = match self.current_function {
            Some(function) => function,
            None => {
                self.error("`if` outside of a function");
                return None;
            }
        };

        let then_block = self.builder.create_block("then");
        self.builder.attach_block(function, then_block);
        // created detached; attached only once (and if) they are needed
        let else_block = self.builder.create_block("else");
        let merge_block = self.builder.create_block("merge");

        self.builder.cond_br(cond, then_block, else_block);

        let mut need_merge_block = false;

        self.builder.set_insertion_point(then_block);
        self.enter_scope();
        for stmt in then_clause {
            self.gen_stmt(stmt);
        }
        self.exit_scope();
        if !self.builder.has_terminator(self.builder.current_block()) {
            self.builder.br(merge_block);
            need_merge_block = true;
        }

        self.builder.attach_block(function, else_block);
        self.builder.set_insertion_point(else_block);
        self.enter_scope();
        if let Some(else_clause) = else_clause {
            for stmt in else_clause {
                self.gen_stmt(stmt);
            }
        }
        self.exit_scope();
        if !self.builder.has_terminator(self.builder.current_block()) {
            self.builder.br(merge_block);
            need_merge_block = true;
        }

        // both branches returned: the merge block would be unreachable, so
        // it is never attached
        if need_merge_block {
            self.builder.attach_block(function, merge_block);
            self.builder.set_insertion_point(merge_block);
        }

        None
    }

    fn gen_expr(&mut self, expr: &Expr) -> Option<ValueId> {
        match expr {
            Expr::IntegerLit(value) => Some(self.builder.const_int(*value)),
            Expr::Identifier(ident) => match self.resolve_local(ident) {
                Some(slot) => Some(self.builder.load(slot)),
                None => {
                    self.error(format!("cannot resolve variable `{}`", ident));
                    None
                }
            },
            Expr::FnCall { ident, args } => self.gen_call_expr(ident, args),
            Expr::Comparison { lhs, op, rhs } => {
                let lhs = self.gen_expr(lhs)?;
                let rhs = self.gen_expr(rhs)?;
                Some(self.builder.cmp(cmp_op(op), lhs, rhs))
            }
            Expr::Error => None,
        }
    }

    fn gen_call_expr(&mut self, ident: &str, args: &[Expr]) -> Option<ValueId> {
        // arguments evaluate left to right, and every bad argument is
        // reported before the call itself is given up on
        let values = args
            .iter()
            .map(|arg| self.gen_expr(arg))
            .collect::<Vec<_>>();
        let values = values.into_iter().collect::<Option<Vec<_>>>()?;

        if let Some(intrinsic) = intrinsics::lookup(ident, values.len()) {
            let callee = match self.builder.lookup_function(intrinsic.symbol) {
                Some(callee) => callee,
                None => {
                    self.error(format!(
                        "intrinsic `{}` lowers to unknown symbol `{}`",
                        intrinsic.name, intrinsic.symbol
                    ));
                    return None;
                }
            };
            let format = self.builder.global_string(intrinsic.format);
            let mut call_args = vec![format];
            call_args.extend(values);
            return Some(self.builder.call(callee, call_args));
        }

        match self.builder.lookup_function(ident) {
            Some(callee) => Some(self.builder.call(callee, values)),
            None => {
                self.error(format!("call to undefined function `{}`", ident));
                None
            }
        }
    }
}

fn cmp_op(token: &Token) -> CmpOp {
    match token {
        Token::LessThan => CmpOp::Lt,
        Token::LessThanEquals => CmpOp::Le,
        Token::GreaterThan => CmpOp::Gt,
        Token::GreaterThanEquals => CmpOp::Ge,
        Token::EqualsEquals => CmpOp::Eq,
        Token::NotEquals => CmpOp::Ne,
        _ => unreachable!(),
    }
}
