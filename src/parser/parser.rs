//! Parser implementation for building the syntax tree.
//!
//! This module contains the main Parser struct and the top-level parsing
//! functions. The parser uses a Pratt parser approach with NUD/LED handlers
//! for expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! Every node is allocated in the [`SyntaxTree`] owned by the parser, which
//! is handed back to the caller once the whole token stream is consumed.

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        tree::SyntaxTree,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, MAX_NESTING_DEPTH,
};

use super::{
    expr::parse_primary_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::{parse_identifier_list, parse_stmt},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements and expressions. It tracks the current position in
/// the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Arena receiving every node the parser creates
    tree: SyntaxTree,
    /// Current recursion depth of statement and expression parsing
    depth: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map(|token| token.span.end.clone());
            let end = end.unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: crate::Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            tree: SyntaxTree::new(Rc::clone(&file)),
            file,
            depth: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The position never moves past the terminating EOF token.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) => Err(error),
            None => Err(self.unexpected_token()),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedToken` error for the current token.
    pub fn unexpected_token(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    /// Builds an `UnexpectedTokenDetailed` error for the current token.
    pub fn unexpected_token_detailed(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// The tree being built.
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SyntaxTree {
        &mut self.tree
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens that are also infix operators keep the binding power of
    /// their LED registration.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.binding_power_lookup
            .insert(kind, BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Enters one level of statement or expression nesting.
    pub fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
                self.get_position(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns the position of the current token in the source file.
    pub fn get_position(&self) -> Position {
        Position(self.current_token().offset(), Rc::clone(&self.file))
    }
}

/// Parses a stream of tokens into a syntax tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses global declarations and
/// functions until EOF. The root of the returned tree is a LIST of
/// FUNCTION and GLOBAL_DECLARATION nodes.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<SyntaxTree, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let root = parser.tree_mut().create_list(vec![], 0);

    while parser.has_tokens() {
        let global = match parser.current_token_kind() {
            TokenKind::Func => parse_function(&mut parser)?,
            TokenKind::Var => parse_global_declaration(&mut parser)?,
            _ => {
                return Err(parser.unexpected_token_detailed(
                    "expected `func` or `var` at the top level",
                ))
            }
        };
        parser.tree_mut().append_to_list(root, global);
    }

    parser.tree_mut().set_root(Some(root));
    debug!(
        nodes = parser.tree().live_nodes(),
        globals = parser.tree().child_count(root),
        "parsed program"
    );

    Ok(parser.tree)
}

/// `func name(a, b) statement`
pub fn parse_function(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();

    let error = parser.unexpected_token_detailed("expected function name");
    let name_token = parser.expect_error(TokenKind::Identifier, Some(error))?;
    let name = parser
        .tree_mut()
        .create_identifier(name_token.value, name_token.span.start.0);

    let params_start = parser.expect(TokenKind::OpenParen)?.offset();
    let params = parser.tree_mut().create_list(vec![], params_start);
    if parser.current_token_kind() != TokenKind::CloseParen {
        for param in parse_identifier_list(parser)? {
            parser.tree_mut().append_to_list(params, param);
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(parser.tree_mut().create_at(
        NodeKind::Function,
        vec![Some(name), Some(params), Some(body)],
        start,
    ))
}

/// `var a, b[10];` at the top level. Array sizes are plain number literals.
pub fn parse_global_declaration(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();
    let list = parser.tree_mut().create_list(vec![], start);

    loop {
        let error = parser.unexpected_token_detailed("expected identifier during variable declaration");
        let name_token = parser.expect_error(TokenKind::Identifier, Some(error))?;
        let offset = name_token.span.start.0;
        let name = parser.tree_mut().create_identifier(name_token.value, offset);

        let declared = if parser.current_token_kind() == TokenKind::OpenBracket {
            parser.advance();
            if parser.current_token_kind() != TokenKind::Number {
                return Err(parser.unexpected_token_detailed("array size must be a number literal"));
            }
            let size = parse_primary_expr(parser)?;
            parser.expect(TokenKind::CloseBracket)?;
            parser
                .tree_mut()
                .create_at(NodeKind::ArrayIndexing, vec![Some(name), Some(size)], offset)
        } else {
            name
        };
        parser.tree_mut().append_to_list(list, declared);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(parser
        .tree_mut()
        .create_at(NodeKind::GlobalDeclaration, vec![Some(list)], start))
}
