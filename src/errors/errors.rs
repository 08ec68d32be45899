use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateSymbol { .. } => "DuplicateSymbol",
            ErrorImpl::UnresolvedSymbol { .. } => "UnresolvedSymbol",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::AllocationFailure => "AllocationFailure",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::DuplicateSymbol { name } => {
                ErrorTip::Suggestion(format!("Symbol `{}` is already declared in this scope", name))
            }
            ErrorImpl::UnresolvedSymbol { name } => ErrorTip::Suggestion(format!(
                "Symbol `{}` is not declared in any enclosing scope",
                name
            )),
            ErrorImpl::DivisionByZero => {
                ErrorTip::Suggestion(String::from("Constant expression divides by zero"))
            }
            ErrorImpl::UnknownOperator { operator, operands } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to {} operand(s)",
                operator, operands
            )),
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Program nests deeper than {} levels",
                limit
            )),
            ErrorImpl::AllocationFailure => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("symbol {name:?} already declared")]
    DuplicateSymbol { name: String },
    #[error("symbol {name:?} not declared")]
    UnresolvedSymbol { name: String },
    #[error("division by zero in constant expression")]
    DivisionByZero,
    #[error("unknown operator {operator:?} with {operands} operand(s)")]
    UnknownOperator { operator: String, operands: usize },
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("allocation failure")]
    AllocationFailure,
}
