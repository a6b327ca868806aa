//! Go source analyzer backed by tree-sitter.
//!
//! Walks the top level of a `source_file` tree and lifts the declarations dicon needs
//! into [`SourceFile`]. Comments are extras in the Go grammar, so they show up as
//! siblings of declarations; a comment group is attached to the declaration that
//! starts on the line right after it, the same rule `go/ast` uses for doc comments.

use tree_sitter::{Node, Parser, Tree};

use super::{
    ChanDir, Field, FuncDecl, ImportSpec, MethodSpec, SourceAnalyzer, SourceFile, TypeDecl,
    TypeNode, TypeSpec, TypeSpecKind,
};
use crate::core::DiconError;
use std::path::Path;

/// Tree-sitter based [`SourceAnalyzer`] for Go.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoAnalyzer;

impl GoAnalyzer {
    /// Create a new analyzer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse(&self, file: &str, source: &str) -> Result<Tree, DiconError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::language()).map_err(|e| DiconError::AnalyzeError {
            file: file.to_string(),
            reason: e.to_string(),
        })?;

        let tree = parser.parse(source, None).ok_or_else(|| DiconError::AnalyzeError {
            file: file.to_string(),
            reason: "parser produced no tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let reason = match first_error(root) {
                Some(node) => format!(
                    "syntax error at line {}, column {}",
                    node.start_position().row + 1,
                    node.start_position().column + 1
                ),
                None => "syntax error".to_string(),
            };
            return Err(DiconError::AnalyzeError {
                file: file.to_string(),
                reason,
            });
        }

        Ok(tree)
    }
}

impl SourceAnalyzer for GoAnalyzer {
    fn analyze(&self, path: &Path, source: &str) -> Result<SourceFile, DiconError> {
        let file = path.display().to_string();
        let tree = self.parse(&file, source)?;
        let src = source.as_bytes();
        let root = tree.root_node();

        let mut result = SourceFile {
            path: path.to_path_buf(),
            package: String::new(),
            imports: Vec::new(),
            type_decls: Vec::new(),
            func_decls: Vec::new(),
        };

        // (end row, text) of the comment group that may document the next declaration
        let mut pending_doc: Vec<(usize, String)> = Vec::new();
        let mut last_decl_end: Option<usize> = None;

        let mut cursor = root.walk();
        let children: Vec<Node> = root.named_children(&mut cursor).collect();

        for child in children {
            let start_row = child.start_position().row;

            if child.kind() == "comment" {
                // trailing comment of the previous declaration
                if last_decl_end == Some(start_row) {
                    continue;
                }
                let contiguous = pending_doc.last().is_none_or(|(end, _)| end + 1 == start_row);
                if !contiguous {
                    pending_doc.clear();
                }
                pending_doc.push((child.end_position().row, comment_text(text(child, src))));
                continue;
            }

            let doc: Vec<String> = match pending_doc.last() {
                Some((end, _)) if end + 1 == start_row => {
                    pending_doc.drain(..).map(|(_, line)| line).collect()
                }
                _ => Vec::new(),
            };
            pending_doc.clear();
            last_decl_end = Some(child.end_position().row);

            match child.kind() {
                "package_clause" => {
                    if let Some(name) = child.named_child(0) {
                        result.package = text(name, src).to_string();
                    }
                }
                "import_declaration" => collect_imports(child, src, &mut result.imports),
                "type_declaration" => result.type_decls.push(type_decl(child, src, doc)),
                "function_declaration" => {
                    if let Some(decl) = func_decl(child, src) {
                        result.func_decls.push(decl);
                    }
                }
                _ => {}
            }
        }

        if result.package.is_empty() {
            return Err(DiconError::AnalyzeError {
                file,
                reason: "missing package clause".to_string(),
            });
        }

        tracing::trace!(
            "analyzed {}: {} type decls, {} funcs",
            path.display(),
            result.type_decls.len(),
            result.func_decls.len()
        );

        Ok(result)
    }
}

/// Parse a standalone Go type expression such as `map[string][]*pkg.T`.
///
/// # Errors
///
/// Returns [`DiconError::AnalyzeError`] if `expr` is not a valid Go type.
pub fn parse_type(expr: &str) -> Result<TypeNode, DiconError> {
    let source = format!("package p\n\ntype _T {expr}\n");
    let tree = GoAnalyzer::new().parse(expr, &source)?;
    let src = source.as_bytes();
    let root = tree.root_node();

    let mut cursor = root.walk();
    let decl = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "type_declaration")
        .and_then(|d| d.named_child(0))
        .and_then(|spec| spec.child_by_field_name("type"));

    decl.map(|node| type_node(node, src)).ok_or_else(|| DiconError::AnalyzeError {
        file: expr.to_string(),
        reason: "not a type expression".to_string(),
    })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().filter(|c| c.has_error()).find_map(first_error)
}

fn text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or_default()
}

fn comment_text(raw: &str) -> String {
    if let Some(line) = raw.strip_prefix("//") {
        line.trim().to_string()
    } else {
        raw.trim_start_matches("/*").trim_end_matches("*/").trim().to_string()
    }
}

fn unquote(raw: &str) -> String {
    raw.trim_matches(|c| c == '"' || c == '`').to_string()
}

fn collect_imports(node: Node, src: &[u8], imports: &mut Vec<ImportSpec>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                imports.push(ImportSpec {
                    alias: child.child_by_field_name("name").map(|n| text(n, src).to_string()),
                    path: unquote(text(path, src)),
                });
            }
            "import_spec_list" => collect_imports(child, src, imports),
            _ => {}
        }
    }
}

fn type_decl(node: Node, src: &[u8], doc: Vec<String>) -> TypeDecl {
    let mut specs = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "type_spec" && child.kind() != "type_alias" {
            continue;
        }
        let Some(name) = child.child_by_field_name("name") else {
            continue;
        };
        let kind = match child.child_by_field_name("type") {
            Some(ty) if child.kind() == "type_spec" && ty.kind() == "interface_type" => {
                TypeSpecKind::Interface(interface_methods(ty, src))
            }
            _ => TypeSpecKind::Other,
        };
        specs.push(TypeSpec {
            name: text(name, src).to_string(),
            kind,
        });
    }
    TypeDecl {
        doc,
        specs,
    }
}

fn interface_methods(node: Node, src: &[u8]) -> Vec<MethodSpec> {
    let mut methods = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            // `method_spec` in older grammar releases
            "method_elem" | "method_spec" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                methods.push(MethodSpec {
                    name: text(name, src).to_string(),
                    params: child
                        .child_by_field_name("parameters")
                        .map(|p| parameter_list(p, src))
                        .unwrap_or_default(),
                    results: result_fields(child.child_by_field_name("result"), src),
                });
            }
            "comment" => {}
            other => {
                tracing::debug!("skipping interface element '{}': {}", other, text(child, src));
            }
        }
    }
    methods
}

fn func_decl(node: Node, src: &[u8]) -> Option<FuncDecl> {
    let name = node.child_by_field_name("name")?;
    Some(FuncDecl {
        name: text(name, src).to_string(),
        params: node
            .child_by_field_name("parameters")
            .map(|p| parameter_list(p, src))
            .unwrap_or_default(),
        results: result_fields(node.child_by_field_name("result"), src),
    })
}

fn result_fields(node: Option<Node>, src: &[u8]) -> Vec<Field> {
    match node {
        None => Vec::new(),
        Some(n) if n.kind() == "parameter_list" => parameter_list(n, src),
        Some(n) => vec![Field {
            names: Vec::new(),
            ty: type_node(n, src),
            variadic: false,
        }],
    }
}

fn parameter_list(node: Node, src: &[u8]) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        let variadic = match child.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let Some(ty) = child.child_by_field_name("type") else {
            continue;
        };
        let mut name_cursor = child.walk();
        let names = child
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, src).to_string())
            .collect();
        fields.push(Field {
            names,
            ty: type_node(ty, src),
            variadic,
        });
    }
    fields
}

fn type_node(node: Node, src: &[u8]) -> TypeNode {
    let other = || TypeNode::Other(text(node, src).to_string());
    let field = |name: &str| node.child_by_field_name(name).map(|n| Box::new(type_node(n, src)));

    match node.kind() {
        "type_identifier" => TypeNode::Name(text(node, src).to_string()),
        "qualified_type" => {
            match (node.child_by_field_name("package"), node.child_by_field_name("name")) {
                (Some(package), Some(name)) => TypeNode::Qualified {
                    package: text(package, src).to_string(),
                    name: text(name, src).to_string(),
                },
                _ => other(),
            }
        }
        "pointer_type" => match node.named_child(0) {
            Some(inner) => TypeNode::Pointer(Box::new(type_node(inner, src))),
            None => other(),
        },
        "parenthesized_type" => match node.named_child(0) {
            Some(inner) => type_node(inner, src),
            None => other(),
        },
        "slice_type" => field("element").map(TypeNode::Slice).unwrap_or_else(other),
        "map_type" => match (field("key"), field("value")) {
            (Some(key), Some(value)) => TypeNode::Map {
                key,
                value,
            },
            _ => other(),
        },
        "channel_type" => channel_type(node, src, false),
        "function_type" => TypeNode::Function {
            params: node
                .child_by_field_name("parameters")
                .map(|p| parameter_list(p, src))
                .unwrap_or_default(),
            results: result_fields(node.child_by_field_name("result"), src),
        },
        "interface_type" => {
            if has_named_children_besides_comments(node) {
                other()
            } else {
                TypeNode::EmptyInterface
            }
        }
        "struct_type" => {
            let empty = node
                .named_child(0)
                .is_none_or(|list| !has_named_children_besides_comments(list));
            if empty { TypeNode::EmptyStruct } else { other() }
        }
        _ => other(),
    }
}

fn has_named_children_besides_comments(node: Node) -> bool {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).any(|n| n.kind() != "comment")
}

/// Build a channel type from the `chan` and `<-` tokens before its element type.
///
/// `<-` binds to the leftmost `chan`, so `chan <-chan T` is `chan<- (chan T)`. The
/// grammar nests it the other way; when the element is an unparenthesized channel
/// opening with `<-`, that arrow is claimed here and dropped from the element.
fn channel_type(node: Node, src: &[u8], arrow_claimed: bool) -> TypeNode {
    let Some(value) = node.child_by_field_name("value") else {
        return TypeNode::Other(text(node, src).to_string());
    };

    let mut tokens = channel_tokens(node, value);
    if arrow_claimed && tokens.first() == Some(&"<-") {
        tokens.remove(0);
    }
    let dir = match tokens.as_slice() {
        ["<-", "chan"] => ChanDir::Recv,
        ["chan", "<-"] => ChanDir::Send,
        _ => ChanDir::Both,
    };

    let element_claims_arrow = dir == ChanDir::Both
        && value.kind() == "channel_type"
        && value
            .child_by_field_name("value")
            .is_some_and(|inner| channel_tokens(value, inner).first() == Some(&"<-"));
    if element_claims_arrow {
        return TypeNode::Channel {
            dir: ChanDir::Send,
            value: Box::new(channel_type(value, src, true)),
        };
    }

    TypeNode::Channel {
        dir,
        value: Box::new(type_node(value, src)),
    }
}

fn channel_tokens(node: Node, value: Node) -> Vec<&'static str> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .take_while(|child| child.id() != value.id())
        .filter(|child| !child.is_named())
        .map(|child| child.kind())
        .collect()
}
