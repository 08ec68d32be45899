use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("func", TokenKind::Func);
        map.insert("var", TokenKind::Var);
        map.insert("return", TokenKind::Return);
        map.insert("print", TokenKind::Print);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("break", TokenKind::Break);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Semicolon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Func,
    Var,
    Return,
    Print,
    If,
    Else,
    While,
    Break,
}

impl TokenKind {
    /// Static operator text stored on operator nodes.
    pub fn operator_text(&self) -> Option<&'static str> {
        match self {
            TokenKind::Equals => Some("=="),
            TokenKind::NotEquals => Some("!="),
            TokenKind::Less => Some("<"),
            TokenKind::LessEquals => Some("<="),
            TokenKind::Greater => Some(">"),
            TokenKind::GreaterEquals => Some(">="),
            TokenKind::Plus => Some("+"),
            TokenKind::Dash => Some("-"),
            TokenKind::Star => Some("*"),
            TokenKind::Slash => Some("/"),
            TokenKind::Not => Some("!"),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn offset(&self) -> u32 {
        self.span.start.0
    }
}
