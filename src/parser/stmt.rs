use log::debug;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{ImportSymbols, NodeKind, NumberLiteral},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
    type_checker::type_checker::{check_same_type, signature, type_of},
};

use super::{parser::Parser, types::parse_type};

/// Dispatches the current line to its statement handler.
///
/// `name: ...` is told apart from an expression by the colon after the name.
pub fn parse_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let token_kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&token_kind).copied() {
        return handler(parser, parent);
    }

    if token_kind == TokenKind::Symbol && parser.peek_kind(1) == TokenKind::Colon {
        return parse_declaration(parser, parent);
    }

    let expr = parse_expr(parser, parent, BindingPower::Default)?;
    parser.finish_line()?;

    parser.ast_mut().attach(parent, expr);
    Ok(Some(expr))
}

pub fn parse_var_decl_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    parser.advance();
    parse_declaration(parser, parent)
}

fn parse_declaration(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let token = parser.current_token().to_string();
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: token.clone(),
            message: String::from("expected identifier during declaration"),
        },
        parser.get_position(),
    )
    .with_context("an identifier", token);
    let name = parser.expect_error(TokenKind::Symbol, Some(error))?;
    parser.expect(TokenKind::Colon, "`:`")?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        return parse_function_decl(parser, parent, name);
    }

    let variable = parse_variable(parser, parent, &name)?;
    parser.finish_line()?;

    if parser.ast().declared_in(parent, &name.value).is_some() {
        parser.report(
            Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.value.clone(),
                },
                parser.position_at(name.line),
            )
            .with_context("a name unused in this scope", name.value.clone()),
        );
    }

    parser.ast_mut().attach(parent, variable);
    Ok(Some(variable))
}

/// Parses `type? (= value)?` after `name:` into a detached declaration.
fn parse_variable(parser: &mut Parser, scope: NodeId, name: &Token) -> Result<NodeId, Error> {
    let annotated = parser.current_token_kind() == TokenKind::Symbol;
    let declared = if annotated {
        parse_type(parser, scope)?
    } else {
        None
    };

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, scope, BindingPower::Default)?)
    } else {
        None
    };

    let inferred = initializer.and_then(|value| type_of(parser.ast(), value));
    if let Err(error) = check_same_type(
        parser.ast(),
        declared,
        inferred,
        parser.position_at(name.line),
    ) {
        parser.report(error);
    }

    let ty = declared.or(inferred);
    if ty.is_none() && !annotated {
        parser.report(
            Error::new(
                ErrorImpl::UnresolvedType {
                    variable: name.value.clone(),
                },
                parser.position_at(name.line),
            )
            .with_context("a type annotation or typed initializer", format!("{}:", name.value)),
        );
    }

    let variable = parser.alloc(
        NodeKind::VariableDeclaration { ty },
        name.value.clone(),
        name.line,
    );
    if let Some(value) = initializer {
        parser.ast_mut().attach(variable, value);
    }

    Ok(variable)
}

struct Parameter {
    name: Token,
    ty: Option<Type>,
    annotated: bool,
}

/// Parses `(params) (-> type)? (=> expr)?` after `name:`.
///
/// The function is wrapped in a variable of type `function` and placed
/// under `parent`, merging with an existing function of the same name into
/// an overload group.
fn parse_function_decl(
    parser: &mut Parser,
    parent: NodeId,
    name: Token,
) -> Result<Option<NodeId>, Error> {
    parser.advance();

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let param = parser.expect(TokenKind::Symbol, "a parameter name")?;
            let annotated = parser.current_token_kind() == TokenKind::Colon;
            let ty = if annotated {
                parser.advance();
                parse_type(parser, parent)?
            } else {
                None
            };
            params.push(Parameter {
                name: param,
                ty,
                annotated,
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    if parser.current_token_kind() != TokenKind::CloseParen {
        return Err(Error::new(ErrorImpl::UnmatchedParenthesis, parser.get_position())
            .with_context(")", parser.current_token().to_string()));
    }
    parser.advance();

    let declared_return = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        parse_type(parser, parent)?
    } else {
        None
    };

    // `(a, b: int)` gives `a` the type of the next typed parameter
    let mut carried = None;
    for param in params.iter_mut().rev() {
        match param.ty {
            Some(ty) => carried = Some(ty),
            None if !param.annotated => param.ty = carried,
            None => {}
        }
    }

    let wrapper = parser.alloc(
        NodeKind::VariableDeclaration {
            ty: Some(Type::FUNCTION),
        },
        name.value.clone(),
        name.line,
    );
    let function = parser.alloc(
        NodeKind::FunctionDeclaration {
            return_type: declared_return.unwrap_or(Type::VOID),
            params: params.len(),
        },
        name.value.clone(),
        name.line,
    );
    parser.ast_mut().attach(wrapper, function);
    parser.ast_mut().attach(parent, wrapper);

    let mut param_nodes = vec![];
    for param in &params {
        let node = parser.alloc(
            NodeKind::VariableDeclaration { ty: param.ty },
            param.name.value.clone(),
            param.name.line,
        );
        parser.ast_mut().attach(function, node);
        param_nodes.push(node);
    }

    let body_type = match parse_expression_body(parser, function) {
        Ok(body_type) => body_type,
        Err(error) => {
            parser.ast_mut().detach(wrapper);
            return Err(error);
        }
    };
    if let Err(error) = parser.finish_line() {
        parser.ast_mut().detach(wrapper);
        return Err(error);
    }

    let return_type = declared_return.or(body_type);
    for (param, node) in params.iter().zip(&param_nodes) {
        let ty = match param.ty {
            None if !param.annotated => return_type,
            ty => ty,
        };

        if ty.is_none() && !param.annotated {
            parser.report(
                Error::new(
                    ErrorImpl::UntypedParameter {
                        parameter: param.name.value.clone(),
                    },
                    parser.position_at(param.name.line),
                )
                .with_context("a typed parameter", param.name.value.clone()),
            );
        }
        parser.ast_mut().node_mut(*node).kind = NodeKind::VariableDeclaration { ty };
    }

    parser.ast_mut().node_mut(function).kind = NodeKind::FunctionDeclaration {
        return_type: return_type.unwrap_or(Type::VOID),
        params: params.len(),
    };

    Ok(insert_function(parser, parent, wrapper))
}

/// Parses an optional `=> expr` body into a return statement.
///
/// Returns the type of the returned expression.
fn parse_expression_body(parser: &mut Parser, function: NodeId) -> Result<Option<Type>, Error> {
    if parser.current_token_kind() != TokenKind::FatArrow {
        return Ok(None);
    }
    let arrow = parser.advance();

    let value = parse_expr(parser, function, BindingPower::Default)?;
    let body = parser.alloc(NodeKind::ReturnExpression, "", arrow.line);
    parser.ast_mut().attach(body, value);
    parser.ast_mut().attach(function, body);

    Ok(type_of(parser.ast(), value))
}

/// Resolves a name clash between the new function variable `wrapper` and an
/// existing declaration in `parent`.
///
/// Returns `None` when the new function was discarded.
fn insert_function(parser: &mut Parser, parent: NodeId, wrapper: NodeId) -> Option<NodeId> {
    let name = parser.ast().name(wrapper).to_string();
    let line = parser.ast().node(wrapper).line;
    let existing = parser.ast().children(parent).iter().copied().find(|child| {
        *child != wrapper
            && parser.ast().kind(*child).is_declaration()
            && parser.ast().name(*child) == name
    });

    let Some(existing) = existing else {
        return Some(wrapper);
    };

    let ast = parser.ast();
    let new_signature = signature(ast, wrapper);
    let duplicate = || {
        Error::new(
            ErrorImpl::DuplicateOverload {
                function: name.clone(),
            },
            parser.position_at(line),
        )
        .with_context(
            "a new parameter signature",
            format!("{}{}", name, describe_signature(ast, &new_signature)),
        )
    };
    let error = if ast.is_function_variable(existing) {
        (signature(ast, existing) == new_signature).then(duplicate)
    } else if matches!(ast.kind(existing), NodeKind::FunctionGroup) {
        ast.children(existing)
            .iter()
            .any(|member| signature(ast, *member) == new_signature)
            .then(duplicate)
    } else {
        Some(
            Error::new(
                ErrorImpl::NameCollision { name: name.clone() },
                parser.position_at(line),
            )
            .with_context("a function or function group", ast.kind(existing).describe()),
        )
    };

    if let Some(error) = error {
        parser.report(error);
        parser.ast_mut().detach(wrapper);
        return None;
    }

    let ast = parser.ast_mut();
    if matches!(ast.kind(existing), NodeKind::FunctionGroup) {
        ast.reparent(wrapper, existing);
        return Some(wrapper);
    }

    let (_, index) = ast.detach(existing)?;
    ast.detach(wrapper);
    let column = ast.node(existing).column;
    let group_line = ast.node(existing).line;
    let group = ast.alloc(NodeKind::FunctionGroup, name.clone(), group_line, column);
    ast.insert_child(parent, index, group);
    ast.attach(group, existing);
    ast.attach(group, wrapper);
    debug!("grouped overloads of {}", name);

    Some(wrapper)
}

/// `(int, ?)` style rendering of a parameter signature.
fn describe_signature(ast: &Ast, signature: &[Option<Type>]) -> String {
    let types: Vec<String> = signature
        .iter()
        .map(|ty| ty.map(|ty| ty.name(ast)).unwrap_or_else(|| String::from("?")))
        .collect();
    format!("({})", types.join(", "))
}

pub fn parse_class_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    parser.advance();
    let name = parser.expect(TokenKind::Symbol, "a class name")?;
    parser.finish_line()?;

    if parser.ast().declared_in(parent, &name.value).is_some() {
        parser.report(
            Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.value.clone(),
                },
                parser.position_at(name.line),
            )
            .with_context("a name unused in this scope", name.value.clone()),
        );
    }

    let class = parser.alloc(NodeKind::Class { super_class: None }, name.value, name.line);
    parser.ast_mut().attach(parent, class);
    Ok(Some(class))
}

pub fn parse_if_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();
    let branch = parser.alloc(NodeKind::If, "", keyword.line);
    parser.ast_mut().attach(parent, branch);

    let condition = parse_expr(parser, branch, BindingPower::Default)
        .and_then(|condition| parser.finish_line().map(|_| condition));
    match condition {
        Ok(condition) => {
            parser.ast_mut().attach(branch, condition);
            Ok(Some(branch))
        }
        Err(error) => {
            parser.ast_mut().detach(branch);
            Err(error)
        }
    }
}

pub fn parse_else_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();
    parser.finish_line()?;

    let previous = parser.ast().last_child(parent);
    if !previous.is_some_and(|previous| matches!(parser.ast().kind(previous), NodeKind::If)) {
        let actual = previous
            .map(|previous| parser.ast().kind(previous).describe())
            .unwrap_or("start of block");
        parser.report(
            Error::new(ErrorImpl::ElseWithoutIf, parser.position_at(keyword.line))
                .with_context("an if statement before `else`", actual),
        );
        return Ok(None);
    }

    let branch = parser.alloc(NodeKind::Else, "", keyword.line);
    parser.ast_mut().attach(parent, branch);
    Ok(Some(branch))
}

pub fn parse_loop_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();
    let node = parser.alloc(NodeKind::Loop { desugared: false }, "", keyword.line);
    parser.ast_mut().attach(parent, node);

    match parse_loop_header(parser, node, keyword.line) {
        Ok(true) => Ok(Some(node)),
        Ok(false) => {
            parser.ast_mut().detach(node);
            Ok(None)
        }
        Err(error) => {
            parser.ast_mut().detach(node);
            Err(error)
        }
    }
}

/// Parses `init, condition, iteration` or a bare count into `node`.
///
/// Returns false when the loop has to be dropped.
fn parse_loop_header(parser: &mut Parser, node: NodeId, line: u32) -> Result<bool, Error> {
    let is_declaration = parser.current_token_kind() == TokenKind::Var
        || (parser.current_token_kind() == TokenKind::Symbol
            && parser.peek_kind(1) == TokenKind::Colon);

    let first = if is_declaration {
        if parser.current_token_kind() == TokenKind::Var {
            parser.advance();
        }
        let name = parser.expect(TokenKind::Symbol, "a loop variable")?;
        parser.expect(TokenKind::Colon, "`:`")?;
        let variable = parse_variable(parser, node, &name)?;
        parser.ast_mut().attach(node, variable);
        variable
    } else {
        parse_expr(parser, node, BindingPower::Default)?
    };

    if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        if parser.ast().parent(first).is_none() {
            parser.ast_mut().attach(node, first);
        }

        let condition = parse_expr(parser, node, BindingPower::Default)?;
        parser.ast_mut().attach(node, condition);
        parser.expect(TokenKind::Comma, "`,`")?;
        let iteration = parse_expr(parser, node, BindingPower::Default)?;
        parser.ast_mut().attach(node, iteration);

        parser.finish_line()?;
        return Ok(true);
    }

    if is_declaration {
        return Err(parser.unexpected("`,`"));
    }
    parser.finish_line()?;

    if let Some(ty) = type_of(parser.ast(), first).filter(|ty| !ty.is_integral()) {
        let received = ty.name(parser.ast());
        parser.report(
            Error::new(
                ErrorImpl::BareLoopNotInteger {
                    received: received.clone(),
                },
                parser.position_at(line),
            )
            .with_context("int", received),
        );
        return Ok(false);
    }

    desugar_counted_loop(parser, node, first, line);
    Ok(true)
}

/// Rewrites `loop N` as `loop $n: T = N, $n > 0, $n--`.
///
/// The counter keeps the integral type of `N`, `int` when it is unknown.
fn desugar_counted_loop(parser: &mut Parser, node: NodeId, count: NodeId, line: u32) {
    let counter_name = parser.hidden_name("loop");
    let counter_type = type_of(parser.ast(), count)
        .filter(Type::is_integral)
        .unwrap_or(Type::INT);

    let counter = parser.alloc(
        NodeKind::VariableDeclaration {
            ty: Some(counter_type),
        },
        counter_name.clone(),
        line,
    );
    parser.ast_mut().attach(counter, count);
    parser.ast_mut().attach(node, counter);

    let usage = parser.alloc(NodeKind::VariableUsage { scope: node }, counter_name.clone(), line);
    let zero = parser.alloc(NodeKind::Number(NumberLiteral::Int(0)), "", line);
    let condition = parser.alloc(
        NodeKind::Operator {
            operator: String::from(">"),
        },
        "",
        line,
    );
    parser.ast_mut().attach(condition, usage);
    parser.ast_mut().attach(condition, zero);
    parser.ast_mut().attach(node, condition);

    let usage = parser.alloc(NodeKind::VariableUsage { scope: node }, counter_name, line);
    let iteration = parser.alloc(
        NodeKind::Operator {
            operator: String::from("--"),
        },
        "",
        line,
    );
    parser.ast_mut().attach(iteration, usage);
    parser.ast_mut().attach(node, iteration);

    parser.ast_mut().node_mut(node).kind = NodeKind::Loop { desugared: true };
}

pub fn parse_return_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();

    let value = if parser.current_token_kind().is_line_end() {
        None
    } else {
        Some(parse_expr(parser, parent, BindingPower::Default)?)
    };
    parser.finish_line()?;

    let node = parser.alloc(NodeKind::ReturnExpression, "", keyword.line);
    if let Some(value) = value {
        parser.ast_mut().attach(node, value);
    }
    parser.ast_mut().attach(parent, node);
    Ok(Some(node))
}

pub fn parse_extends_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();
    let name = parser.expect(TokenKind::Symbol, "a class name")?;
    parser.finish_line()?;

    let error = if !matches!(parser.ast().kind(parent), NodeKind::Class { .. }) {
        Some(ErrorImpl::ExtendsOutsideClass)
    } else if parser.ast().extends_clause(parent).is_some() {
        Some(ErrorImpl::AlreadyExtends {
            class: parser.ast().name(parent).to_string(),
        })
    } else {
        None
    };

    if let Some(error) = error {
        let actual = format!("extends {}", name.value);
        parser.report(
            Error::new(error, parser.position_at(keyword.line))
                .with_context("a class without a superclass", actual),
        );
        return Ok(None);
    }

    let clause = parser.alloc(NodeKind::SubclassExpression, name.value, name.line);
    parser.ast_mut().attach(parent, clause);
    Ok(Some(clause))
}

/// `import a.b` or `from a.b import x, y`.
pub fn parse_import_stmt(parser: &mut Parser, parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();
    let package = parse_package(parser)?;

    let symbols = if keyword.kind == TokenKind::From {
        parser.expect(TokenKind::Import, "`import`")?;

        let mut symbols = vec![];
        loop {
            symbols.push(parser.expect(TokenKind::Symbol, "an imported name")?.value);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
        ImportSymbols::Explicit(symbols)
    } else {
        ImportSymbols::Wildcard
    };
    parser.finish_line()?;

    let name = package.join(".");
    let import = parser.alloc(NodeKind::ImportExpression { package, symbols }, name, keyword.line);
    parser.ast_mut().attach(parent, import);
    Ok(Some(import))
}

fn parse_package(parser: &mut Parser) -> Result<Vec<String>, Error> {
    let mut package = vec![parser.expect(TokenKind::Symbol, "a package name")?.value];

    while parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        package.push(parser.expect(TokenKind::Symbol, "a package name")?.value);
    }

    Ok(package)
}

/// `filetype name`, only valid before any other line of the file.
pub fn parse_file_type_stmt(parser: &mut Parser, _parent: NodeId) -> Result<Option<NodeId>, Error> {
    let keyword = parser.advance();
    let name = parser.expect(TokenKind::Symbol, "a file type")?;
    parser.finish_line()?;

    let error = if parser.ast().file_type().is_some() {
        Some(ErrorImpl::FileTypeDeclaredTwice)
    } else if !parser.in_header() {
        Some(ErrorImpl::FileTypeAfterDeclarations)
    } else {
        None
    };

    if let Some(error) = error {
        let actual = format!("filetype {}", name.value);
        parser.report(
            Error::new(error, parser.position_at(keyword.line))
                .with_context("a single file type before any other line", actual),
        );
        return Ok(None);
    }

    let root = parser.ast().root();
    let declaration = parser.alloc(NodeKind::FileTypeDeclaration, name.value, name.line);
    parser.ast_mut().attach(root, declaration);
    Ok(Some(declaration))
}
