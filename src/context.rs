//! The compilation unit threaded through every stage.
//!
//! A [`CompilationUnit`] owns the tree, the symbol tables and the string
//! table of one program. Stages run in order: parsing builds the tree,
//! [`CompilationUnit::simplify`] folds constants and removes unreachable
//! code, and [`CompilationUnit::create_tables`] binds names. Any error is
//! returned to the caller and leaves the unit unusable for later stages.

use std::rc::Rc;

use tracing::info;

use crate::{
    ast::{print::dump_syntax_tree, tree::SyntaxTree},
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    simplify::simplify_syntax_tree,
    symbols::{
        binder, print::print_tables, string_table::StringTable, symbol_table::SymbolTable,
    },
};

pub const DEFAULT_FILE_NAME: &str = "stdin";

#[derive(Debug)]
pub struct CompilationUnit {
    pub tree: SyntaxTree,
    /// Present once names are bound.
    pub globals: Option<SymbolTable>,
    pub strings: StringTable,
}

impl CompilationUnit {
    /// Tokenizes and parses `source`. `file` only labels positions in errors.
    pub fn from_source(source: String, file: Option<String>) -> Result<Self, Error> {
        let file_name = file.clone().unwrap_or_else(|| String::from(DEFAULT_FILE_NAME));

        let tokens = tokenize(source, file)?;
        info!(tokens = tokens.len(), "tokenized");

        let tree = parse(tokens, Rc::new(file_name))?;
        info!(nodes = tree.live_nodes(), "parsed");

        Ok(CompilationUnit {
            tree,
            globals: None,
            strings: StringTable::new(),
        })
    }

    pub fn simplify(&mut self) -> Result<(), Error> {
        simplify_syntax_tree(&mut self.tree)?;
        info!(nodes = self.tree.live_nodes(), "simplified");
        Ok(())
    }

    /// Builds the symbol tables and binds every identifier in the tree.
    pub fn create_tables(&mut self) -> Result<&SymbolTable, Error> {
        let globals = binder::create_tables(&mut self.tree, &mut self.strings)?;
        info!(
            globals = globals.len(),
            strings = self.strings.len(),
            "bound names"
        );
        Ok(self.globals.insert(globals))
    }

    /// Runs every stage after parsing.
    pub fn compile(source: String, file: Option<String>) -> Result<Self, Error> {
        let mut unit = CompilationUnit::from_source(source, file)?;
        unit.simplify()?;
        unit.create_tables()?;
        Ok(unit)
    }

    pub fn dump_tree(&self) -> String {
        dump_syntax_tree(&self.tree, self.globals.as_ref())
    }

    /// The `-s` listing, available once names are bound.
    pub fn dump_tables(&self) -> Option<String> {
        let globals = self.globals.as_ref()?;
        Some(print_tables(&self.tree, globals, &self.strings))
    }
}
