use logos::Logos;

#[derive(Debug, Logos, Clone, PartialEq)]
pub enum Token {
    // literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    IntegerLit(i64),

    // identifiers
    #[regex("[a-zA-Z][a-zA-Z0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // keywords
    #[token("fn")]
    Fn,
    #[token("var")]
    Var,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("int")]
    Int,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - function return type marker
    #[token("->")]
    Arrow,
    // - assignment
    #[token("=")]
    Equals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    #[token("!")]
    LogicalNot,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Error,

    /// Only generated in parse phase when `lexer.next()` returns `None`.
    Eof,
}

impl Token {
    /// Returns `true` for the six comparison operators.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::LessThan
                | Token::LessThanEquals
                | Token::GreaterThan
                | Token::GreaterThanEquals
                | Token::EqualsEquals
                | Token::NotEquals
        )
    }

    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::IntegerLit(_) => "an integer literal",
            Token::Identifier(_) => "an identifier",
            Token::Fn => "`fn`",
            Token::Var => "`var`",
            Token::Return => "`return`",
            Token::If => "`if`",
            Token::Else => "`else`",
            Token::Int => "`int`",
            Token::OpenParen => "`(`",
            Token::CloseParen => "`)`",
            Token::OpenBrace => "`{`",
            Token::CloseBrace => "`}`",
            Token::Comma => "`,`",
            Token::Semi => "`;`",
            Token::Plus => "`+`",
            Token::Minus => "`-`",
            Token::Asterisk => "`*`",
            Token::Slash => "`/`",
            Token::Arrow => "`->`",
            Token::Equals => "`=`",
            Token::EqualsEquals => "`==`",
            Token::NotEquals => "`!=`",
            Token::LogicalNot => "`!`",
            Token::GreaterThan => "`>`",
            Token::GreaterThanEquals => "`>=`",
            Token::LessThan => "`<`",
            Token::LessThanEquals => "`<=`",
            Token::Error => "an unrecognized token",
            Token::Eof => "end of input",
        }
    }
}
