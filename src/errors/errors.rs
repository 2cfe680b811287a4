use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// How a diagnostic affects the parse.
///
/// Structural errors abort the current statement (or the whole file), semantic
/// errors are recorded and the best-effort node is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Structural,
    Semantic,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    expected: String,
    actual: String,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            expected: String::new(),
            actual: String::new(),
        }
    }

    /// Attaches the expected construct and the token actually found.
    pub fn with_context(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = expected.into();
        self.actual = actual.into();
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_line(&self) -> u32 {
        self.position.0
    }

    pub fn get_expected(&self) -> &str {
        &self.expected
    }

    pub fn get_actual(&self) -> &str {
        &self.actual
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_class(&self) -> ErrorClass {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::UnmatchedParenthesis
            | ErrorImpl::UnknownOperator { .. }
            | ErrorImpl::IllegalIndentation { .. }
            | ErrorImpl::CannotOwnBlock { .. }
            | ErrorImpl::UnparsedTrailingTokens { .. }
            | ErrorImpl::UnreadableFile { .. } => ErrorClass::Structural,
            _ => ErrorClass::Semantic,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.get_class() == ErrorClass::Structural
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnmatchedParenthesis => "UnmatchedParenthesis",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::IllegalIndentation { .. } => "IllegalIndentation",
            ErrorImpl::CannotOwnBlock { .. } => "CannotOwnBlock",
            ErrorImpl::UnparsedTrailingTokens { .. } => "UnparsedTrailingTokens",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UntypedParameter { .. } => "UntypedParameter",
            ErrorImpl::UnresolvedType { .. } => "UnresolvedType",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::NameCollision { .. } => "NameCollision",
            ErrorImpl::DuplicateOverload { .. } => "DuplicateOverload",
            ErrorImpl::BareLoopNotInteger { .. } => "BareLoopNotInteger",
            ErrorImpl::FileTypeDeclaredTwice => "FileTypeDeclaredTwice",
            ErrorImpl::FileTypeAfterDeclarations => "FileTypeAfterDeclarations",
            ErrorImpl::ElseWithoutIf => "ElseWithoutIf",
            ErrorImpl::ExtendsOutsideClass => "ExtendsOutsideClass",
            ErrorImpl::AlreadyExtends { .. } => "AlreadyExtends",
            ErrorImpl::UnknownSuperclass { .. } => "UnknownSuperclass",
            ErrorImpl::ImportNotFound { .. } => "ImportNotFound",
            ErrorImpl::UnreadableFile { .. } => "UnreadableFile",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected {}",
                token, self.expected
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnmatchedParenthesis => {
                ErrorTip::Suggestion(String::from("Unmatched parenthesis, expected `)`"))
            }
            ErrorImpl::UnknownOperator { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be used in an expression",
                operator
            )),
            ErrorImpl::IllegalIndentation { indent } => ErrorTip::Suggestion(format!(
                "No enclosing block accepts a line indented by {}",
                indent
            )),
            ErrorImpl::CannotOwnBlock { construct } => ErrorTip::Suggestion(format!(
                "A {} cannot own indented lines",
                construct
            )),
            ErrorImpl::UnparsedTrailingTokens { token } => ErrorTip::Suggestion(format!(
                "There is un-parsed junk at the end of the file, starting at `{}`",
                token
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::UntypedParameter { parameter } => ErrorTip::Suggestion(format!(
                "Parameter `{}` needs a type annotation",
                parameter
            )),
            ErrorImpl::UnresolvedType { variable } => ErrorTip::Suggestion(format!(
                "The type of `{}` could not be determined, add a type annotation",
                variable
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", variable))
            }
            ErrorImpl::NameCollision { name } => ErrorTip::Suggestion(format!(
                "Function `{}` cannot share its name with a variable",
                name
            )),
            ErrorImpl::DuplicateOverload { function } => ErrorTip::Suggestion(format!(
                "Function `{}` already has an overload with these parameter types",
                function
            )),
            ErrorImpl::BareLoopNotInteger { received } => ErrorTip::Suggestion(format!(
                "`loop N` needs an integer bound, received `{}`",
                received
            )),
            ErrorImpl::FileTypeDeclaredTwice => {
                ErrorTip::Suggestion(String::from("The file type is already declared"))
            }
            ErrorImpl::FileTypeAfterDeclarations => ErrorTip::Suggestion(String::from(
                "The file type must be declared before anything else",
            )),
            ErrorImpl::ElseWithoutIf => {
                ErrorTip::Suggestion(String::from("`else` must follow an `if` block"))
            }
            ErrorImpl::ExtendsOutsideClass => {
                ErrorTip::Suggestion(String::from("`extends` is only allowed at class level"))
            }
            ErrorImpl::AlreadyExtends { class } => {
                ErrorTip::Suggestion(format!("Class `{}` already extends a class", class))
            }
            ErrorImpl::UnknownSuperclass { class } => {
                ErrorTip::Suggestion(format!("Superclass `{}` could not be found", class))
            }
            ErrorImpl::ImportNotFound { package } => {
                ErrorTip::Suggestion(format!("Could not find a file for `{}`", package))
            }
            ErrorImpl::UnreadableFile { path, .. } => {
                ErrorTip::Suggestion(format!("Check that `{}` exists and is readable", path))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.get_error_name(),
            self.position.1,
            self.position.0,
            self.internal_error
        )
    }
}

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

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("operator {operator:?} is not in the precedence table")]
    UnknownOperator { operator: String },
    #[error("no enclosing block for indentation {indent}")]
    IllegalIndentation { indent: u32 },
    #[error("a {construct} cannot own indented children")]
    CannotOwnBlock { construct: String },
    #[error("unparsed tokens at end of file: {token:?}")]
    UnparsedTrailingTokens { token: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("parameter {parameter:?} has no type")]
    UntypedParameter { parameter: String },
    #[error("type of {variable:?} could not be determined")]
    UnresolvedType { variable: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("function {name:?} collides with a variable of the same name")]
    NameCollision { name: String },
    #[error("function {function:?} already has an overload with this signature")]
    DuplicateOverload { function: String },
    #[error("bare loop expects an integer, received {received:?}")]
    BareLoopNotInteger { received: String },
    #[error("file type declared twice")]
    FileTypeDeclaredTwice,
    #[error("file type declared after other declarations")]
    FileTypeAfterDeclarations,
    #[error("else without a preceding if")]
    ElseWithoutIf,
    #[error("extends used outside of a class")]
    ExtendsOutsideClass,
    #[error("class {class:?} already extends a class")]
    AlreadyExtends { class: String },
    #[error("unknown superclass {class:?}")]
    UnknownSuperclass { class: String },
    #[error("import {package:?} not found")]
    ImportNotFound { package: String },
    #[error("could not read {path:?}: {message}")]
    UnreadableFile { path: String, message: String },
}
