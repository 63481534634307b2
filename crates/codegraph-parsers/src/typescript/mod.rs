//! Structural and call-graph extraction for TypeScript and JavaScript.
//! Both languages share one grammar family (`tree_sitter_typescript`) and
//! one extractor; the emitted node's `language` field distinguishes them by
//! extension, and `.tsx`/`.jsx` additionally select the JSX grammar variant.

mod helpers;

use std::collections::HashMap;

use codegraph_core::error::ExtractError;
use codegraph_core::id::{edge_id, node_id};
use codegraph_core::model::{Edge, EdgeKind, Language, Node, NodeKind};
use codegraph_core::properties::join_csv;

use crate::adapter::{walk, SyntaxNode};
use crate::extractor::{ExtractionResult, LanguageExtractor};
use crate::http::{extract_url_literal, http_method_from_name, looks_like_http_client_name, UrlLiteralKinds};
use crate::treesitter;

const URL_KINDS: UrlLiteralKinds = UrlLiteralKinds {
    string_kinds: &["string"],
    template_kinds: &["template_string"],
    concat_kinds: &["binary_expression"],
};

pub struct TypeScriptExtractor;

impl TypeScriptExtractor {
    pub fn new() -> Self {
        TypeScriptExtractor
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn language_for_path(path: &str) -> Language {
    if path.ends_with(".ts") || path.ends_with(".tsx") {
        Language::TypeScript
    } else {
        Language::JavaScript
    }
}

fn is_jsx_extension(path: &str) -> bool {
    path.ends_with(".tsx") || path.ends_with(".jsx")
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"]
    }

    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let tree = treesitter::parse_typescript(path, bytes, is_jsx_extension(path))?;
        let root = tree.root_node();
        Ok(extract(path, bytes, root, language_for_path(path)))
    }
}

struct RoutineSpan {
    start: u32,
    end: u32,
    id: String,
}

fn extract<'t>(path: &str, source: &[u8], root: impl SyntaxNode<'t>, language: Language) -> ExtractionResult {
    let mut result = ExtractionResult::new();
    let is_test_file = helpers::is_test_file(path);

    let file_kind = if is_test_file { NodeKind::TestFile } else { NodeKind::File };
    let file_id = node_id(file_kind.as_str(), path, path);
    result.nodes.push(Node::new(file_id.clone(), file_kind, path, path, language));

    let module_name = path.rsplit('/').next().unwrap_or(path).to_string();
    let module_id = node_id(NodeKind::Module.as_str(), path, path);
    result.nodes.push(Node::new(module_id.clone(), NodeKind::Module, module_name, path, language));
    contains(&mut result, &file_id, &module_id);

    let mut imports: HashMap<String, String> = HashMap::new();
    let mut funcs: HashMap<String, String> = HashMap::new();
    let mut routine_spans: Vec<RoutineSpan> = Vec::new();

    let mut i = 0;
    while let Some(raw_item) = root.child(i) {
        i += 1;
        let item = unwrap_export(raw_item);
        let is_exported = raw_item.kind() == "export_statement";
        match item.kind() {
            "import_statement" => extract_import(&item, source, path, &module_id, &mut result, &mut imports),
            "class_declaration" => extract_class(&item, source, path, &module_id, language, is_exported, &mut result),
            "interface_declaration" => extract_interface(&item, source, path, &module_id, language, is_exported, &mut result),
            "enum_declaration" => extract_enum(&item, source, path, &module_id, language, is_exported, &mut result),
            "type_alias_declaration" => extract_type_alias(&item, source, path, &module_id, language, is_exported, &mut result),
            "function_declaration" => {
                if let Some((fn_id, name)) = extract_function(&item, source, path, &module_id, language, is_exported, is_test_file, &mut result) {
                    funcs.insert(name, fn_id.clone());
                    routine_spans.push(RoutineSpan { start: item.start_line(), end: item.end_line(), id: fn_id });
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                extract_variable_statement(&item, source, path, &module_id, language, is_exported, &mut result, &mut funcs, &mut routine_spans)
            }
            _ => {}
        }
    }

    call_graph_pass(root, source, path, &module_id, &funcs, &imports, &routine_spans, is_test_file, &mut result);

    result
}

fn unwrap_export<'t>(node: impl SyntaxNode<'t>) -> impl SyntaxNode<'t> {
    if node.kind() == "export_statement" {
        node.child_by_field("declaration").unwrap_or(node)
    } else {
        node
    }
}

fn contains(result: &mut ExtractionResult, parent: &str, child: &str) {
    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), parent, child, ""), EdgeKind::Contains, parent, child));
}

fn extract_import<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    result: &mut ExtractionResult,
    imports: &mut HashMap<String, String>,
) {
    let Some(source_node) = item.child_by_field("source") else { return };
    let module_path = strip_quotes(source_node.text(source));
    let dep_id = node_id(NodeKind::Dependency.as_str(), path, &module_path);
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, module_path.clone(), path, Language::TypeScript).with_property("kind", "import");
    result.nodes.push(dep);
    contains(result, module_id, &dep_id);
    result.edges.push(Edge::new(edge_id(EdgeKind::Imports.as_str(), module_id, &dep_id, ""), EdgeKind::Imports, module_id, &dep_id));

    let mut i = 0;
    while let Some(clause) = item.child(i) {
        i += 1;
        match clause.kind() {
            "identifier" => {
                imports.insert(clause.text(source).to_string(), dep_id.clone());
            }
            "namespace_import" => {
                if let Some(name) = last_identifier_child(clause, source) {
                    imports.insert(name, dep_id.clone());
                }
            }
            "named_imports" => {
                let mut j = 0;
                while let Some(spec) = clause.child(j) {
                    j += 1;
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let name = spec.child_by_field("name").map(|n| n.text(source).to_string());
                    let alias = spec.child_by_field("alias").map(|n| n.text(source).to_string());
                    if let Some(binding) = alias.or(name) {
                        imports.insert(binding, dep_id.clone());
                    }
                }
            }
            _ => {}
        }
    }
}

fn last_identifier_child<'t>(node: impl SyntaxNode<'t>, source: &[u8]) -> Option<String> {
    let mut found = None;
    let mut i = 0;
    while let Some(child) = node.child(i) {
        i += 1;
        if child.kind() == "identifier" {
            found = Some(child.text(source).to_string());
        }
    }
    found
}

fn strip_quotes(text: &str) -> String {
    let t = text.trim();
    if t.len() >= 2 { t[1..t.len() - 1].to_string() } else { t.to_string() }
}

/// Gathers the contiguous `decorator` siblings immediately preceding `node`
/// within `parent`'s children — a decorator's callee name when it's a call
/// (`@Injectable()`), or its bare identifier otherwise.
fn preceding_decorators<'t>(parent: impl SyntaxNode<'t>, node: impl SyntaxNode<'t>, source: &[u8]) -> Vec<String> {
    let mut siblings = Vec::new();
    let mut i = 0;
    while let Some(child) = parent.child(i) {
        siblings.push(child);
        i += 1;
    }
    let Some(idx) = siblings.iter().position(|s| s.start_line() == node.start_line() && s.kind() == node.kind()) else {
        return Vec::new();
    };
    let mut decorators = Vec::new();
    let mut cursor = idx;
    while cursor > 0 {
        cursor -= 1;
        let candidate = siblings[cursor];
        if candidate.kind() != "decorator" {
            break;
        }
        if let Some(name) = decorator_name(candidate, source) {
            decorators.push(name);
        }
    }
    decorators.reverse();
    decorators
}

fn decorator_name<'t>(decorator: impl SyntaxNode<'t>, source: &[u8]) -> Option<String> {
    let mut i = 0;
    while let Some(child) = decorator.child(i) {
        i += 1;
        match child.kind() {
            "identifier" => return Some(child.text(source).to_string()),
            "call_expression" => {
                let function = child.child_by_field("function")?;
                return Some(function.text(source).to_string());
            }
            _ => {}
        }
    }
    None
}

fn class_heritage<'t>(item: impl SyntaxNode<'t>, source: &[u8]) -> (Vec<String>, Vec<String>) {
    let mut bases = Vec::new();
    let mut implemented = Vec::new();
    let mut i = 0;
    while let Some(child) = item.child(i) {
        i += 1;
        if child.kind() != "class_heritage" {
            continue;
        }
        let mut j = 0;
        while let Some(part) = child.child(j) {
            j += 1;
            match part.kind() {
                "extends_clause" => {
                    if let Some(value) = part.child_by_field("value") {
                        bases.push(helpers::strip_generics(value.text(source)));
                    }
                }
                "implements_clause" => {
                    let mut k = 0;
                    while let Some(t) = part.child(k) {
                        k += 1;
                        if t.kind().ends_with("type_identifier") || t.kind() == "generic_type" {
                            implemented.push(helpers::strip_generics(t.text(source)));
                        }
                    }
                }
                _ => {}
            }
        }
    }
    (bases, implemented)
}

fn contains_jsx<'t>(node: impl SyntaxNode<'t>) -> bool {
    let mut found = false;
    walk(node, &mut |n| {
        if matches!(n.kind(), "jsx_element" | "jsx_self_closing_element" | "jsx_fragment") {
            found = true;
        }
    });
    found
}

#[allow(clippy::too_many_arguments)]
fn extract_class<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    language: Language,
    is_exported: bool,
    result: &mut ExtractionResult,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let decorators = preceding_decorators(*item.parent().as_ref().unwrap_or(item), *item, source);
    let (bases, implemented) = class_heritage(*item, source);
    let id = node_id(NodeKind::Class.as_str(), path, &name);

    let mut methods = Vec::new();
    let mut fields = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            match member.kind() {
                "method_definition" => {
                    if let Some(mname) = member.child_by_field("name") {
                        methods.push(mname.text(source).to_string());
                    }
                }
                "public_field_definition" | "field_definition" => {
                    if let Some(fname) = member.child_by_field("property") {
                        fields.push(fname.text(source).to_string());
                    } else if let Some(fname) = member.child_by_field("name") {
                        fields.push(fname.text(source).to_string());
                    }
                }
                _ => {}
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Class, name.clone(), path, language).with_lines(item.start_line(), item.end_line());
    node.is_public = is_exported;
    node.doc_comment = preceding_block_comment(*item, source);
    if !decorators.is_empty() {
        node = node.with_property("decorators", join_csv(&decorators));
    }
    if !bases.is_empty() {
        node = node.with_property("extends", join_csv(&bases));
    }
    if !implemented.is_empty() {
        node = node.with_property("implements", join_csv(&implemented));
    }
    if !methods.is_empty() {
        node = node.with_property("methods", join_csv(&methods));
    }
    if !fields.is_empty() {
        node = node.with_property("fields", join_csv(&fields));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);

    for implements_name in &implemented {
        let interface_id = node_id(NodeKind::Interface.as_str(), path, implements_name);
        result.edges.push(Edge::new(edge_id(EdgeKind::Implements.as_str(), &id, &interface_id, ""), EdgeKind::Implements, id.clone(), interface_id));
    }

    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if member.kind() == "method_definition" {
                let _ = extract_method(&member, source, path, &id, &name, language, &body, false, result);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn extract_method<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    owner_id: &str,
    owner_name: &str,
    language: Language,
    parent: &impl SyntaxNode<'t>,
    in_test_file: bool,
    result: &mut ExtractionResult,
) -> Option<(String, String)> {
    let name_node = item.child_by_field("name")?;
    let name = name_node.text(source).to_string();
    let local_key = format!("{owner_name}.{name}");
    let kind = NodeKind::Method;
    let id = node_id(kind.as_str(), path, &local_key);

    let params = item.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();
    let return_type = item.child_by_field("return_type").map(|r| r.text(source).to_string());
    let signature = match &return_type {
        Some(ret) => format!("{name}{params}: {ret}"),
        None => format!("{name}{params}"),
    };

    let decorators = preceding_decorators(*parent, *item, source);
    let mut node = Node::new(id.clone(), kind, name.clone(), path, language).with_lines(item.start_line(), item.end_line()).with_signature(signature);
    node.doc_comment = preceding_block_comment(*item, source);
    node.properties.insert("receiver".to_string(), owner_name.to_string());
    if has_async_keyword(*item) {
        node = node.with_property("async", "true");
    }
    if !decorators.is_empty() {
        node = node.with_property("decorators", join_csv(&decorators));
    }
    let _ = in_test_file;
    result.nodes.push(node);
    contains(result, owner_id, &id);
    Some((id, name))
}

fn has_async_keyword<'t, N: SyntaxNode<'t>>(node: N) -> bool {
    let mut i = 0;
    while let Some(child) = node.child(i) {
        if child.kind() == "async" {
            return true;
        }
        i += 1;
    }
    false
}

fn preceding_block_comment<'t, N: SyntaxNode<'t>>(node: N, source: &[u8]) -> Option<String> {
    let parent = node.parent()?;
    let mut siblings = Vec::new();
    let mut i = 0;
    while let Some(child) = parent.child(i) {
        siblings.push(child);
        i += 1;
    }
    let idx = siblings.iter().position(|s| s.start_line() == node.start_line() && s.kind() == node.kind())?;
    if idx == 0 {
        return None;
    }
    let candidate = siblings[idx - 1];
    if candidate.kind() != "comment" {
        return None;
    }
    let text = candidate.text(source);
    if !text.trim_start().starts_with("/**") {
        return None;
    }
    Some(
        text.trim_start_matches("/**")
            .trim_end_matches("*/")
            .lines()
            .map(|l| l.trim().trim_start_matches('*').trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

#[allow(clippy::too_many_arguments)]
fn extract_interface<'t>(item: &impl SyntaxNode<'t>, source: &[u8], path: &str, module_id: &str, language: Language, is_exported: bool, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Interface.as_str(), path, &name);

    let mut methods = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if member.kind() == "method_signature" {
                if let Some(mname) = member.child_by_field("name") {
                    methods.push(mname.text(source).to_string());
                }
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Interface, name, path, language).with_lines(item.start_line(), item.end_line());
    node.is_public = is_exported;
    if !methods.is_empty() {
        node = node.with_property("methods", join_csv(&methods));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);
}

fn extract_enum<'t>(item: &impl SyntaxNode<'t>, source: &[u8], path: &str, module_id: &str, language: Language, is_exported: bool, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Enum.as_str(), path, &name);

    let mut members = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            match member.kind() {
                "property_identifier" => members.push(member.text(source).to_string()),
                "enum_assignment" => {
                    if let Some(n) = member.child_by_field("name") {
                        members.push(n.text(source).to_string());
                    }
                }
                _ => {}
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Enum, name, path, language).with_lines(item.start_line(), item.end_line());
    node.is_public = is_exported;
    if !members.is_empty() {
        node = node.with_property("constants", join_csv(&members));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);
}

fn extract_type_alias<'t>(item: &impl SyntaxNode<'t>, source: &[u8], path: &str, module_id: &str, language: Language, is_exported: bool, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Type.as_str(), path, &name);
    let mut node = Node::new(id.clone(), NodeKind::Type, name, path, language).with_lines(item.start_line(), item.end_line());
    node.is_public = is_exported;
    result.nodes.push(node);
    contains(result, module_id, &id);
}

#[allow(clippy::too_many_arguments)]
fn extract_function<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    container_id: &str,
    language: Language,
    is_exported: bool,
    in_test_file: bool,
    result: &mut ExtractionResult,
) -> Option<(String, String)> {
    let name_node = item.child_by_field("name")?;
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Function.as_str(), path, &name);

    let params = item.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();
    let return_type = item.child_by_field("return_type").map(|r| r.text(source).to_string());
    let signature = match &return_type {
        Some(ret) => format!("{name}{params}: {ret}"),
        None => format!("{name}{params}"),
    };

    let mut node = Node::new(id.clone(), NodeKind::Function, name.clone(), path, language).with_lines(item.start_line(), item.end_line()).with_signature(signature);
    node.is_public = is_exported;
    node.doc_comment = preceding_block_comment(*item, source);
    if has_async_keyword(*item) {
        node = node.with_property("async", "true");
    }
    if let Some(body) = item.child_by_field("body") {
        if contains_jsx(body) {
            node = node.with_property("component", "true");
        }
    }
    let _ = in_test_file;
    result.nodes.push(node);
    contains(result, container_id, &id);
    Some((id, name))
}

#[allow(clippy::too_many_arguments)]
fn extract_variable_statement<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    language: Language,
    is_exported: bool,
    result: &mut ExtractionResult,
    funcs: &mut HashMap<String, String>,
    routine_spans: &mut Vec<RoutineSpan>,
) {
    let is_const = item.text(source).trim_start().starts_with("const");
    let mut i = 0;
    while let Some(declarator) = item.child(i) {
        i += 1;
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field("name") else { continue };
        let name = name_node.text(source).to_string();
        let value = declarator.child_by_field("value");

        if let Some(value) = value {
            if matches!(value.kind(), "arrow_function" | "function_expression") {
                let id = node_id(NodeKind::Function.as_str(), path, &name);
                let params = value.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();
                let mut node = Node::new(id.clone(), NodeKind::Function, name.clone(), path, language)
                    .with_lines(item.start_line(), item.end_line())
                    .with_signature(format!("{name}{params}"));
                node.is_public = is_exported;
                if has_async_keyword(value) {
                    node = node.with_property("async", "true");
                }
                if let Some(body) = value.child_by_field("body") {
                    if contains_jsx(body) {
                        node = node.with_property("component", "true");
                    }
                }
                result.nodes.push(node);
                contains(result, module_id, &id);
                funcs.insert(name, id.clone());
                routine_spans.push(RoutineSpan { start: item.start_line(), end: item.end_line(), id });
                continue;
            }
        }

        let is_constant = is_const || is_all_uppercase(&name);
        let kind = if is_constant { NodeKind::Constant } else { NodeKind::Variable };
        let id = node_id(kind.as_str(), path, &name);
        let mut node = Node::new(id.clone(), kind, name, path, language).with_lines(item.start_line(), item.end_line());
        node.is_public = is_exported;
        result.nodes.push(node);
        contains(result, module_id, &id);
    }
}

fn is_all_uppercase(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_') && !name.starts_with('_') && name.chars().any(|c| c.is_ascii_alphabetic())
}

#[allow(clippy::too_many_arguments)]
fn call_graph_pass<'t>(
    root: impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    funcs: &HashMap<String, String>,
    imports: &HashMap<String, String>,
    routine_spans: &[RoutineSpan],
    is_test_file: bool,
    result: &mut ExtractionResult,
) {
    walk(root, &mut |node| {
        if node.kind() != "call_expression" {
            return;
        }
        let Some(function) = node.child_by_field("function") else { return };
        let caller_id = enclosing_routine(node.start_line(), routine_spans, module_id);
        let Some(arguments) = node.child_by_field("arguments") else { return };

        if function.kind() == "identifier" {
            let name = function.text(source).to_string();

            if is_test_file && matches!(name.as_str(), "describe" | "it" | "test") {
                if let Some(first) = arguments.named_child(0) {
                    if first.kind() == "string" {
                        emit_bdd_test(result, path, module_id, &strip_quotes(first.text(source)), node.start_line());
                        return;
                    }
                }
            }

            if name == "fetch" {
                if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                    emit_api_call(result, path, &caller_id, "fetch", "UNKNOWN", &url);
                }
                return;
            }
            if name == "axios" {
                if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                    emit_api_call(result, path, &caller_id, "axios", "UNKNOWN", &url);
                }
                return;
            }
            if matches!(name.as_str(), "useSWR" | "useQuery") {
                if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                    emit_api_call(result, path, &caller_id, "swr", "GET", &url);
                }
                return;
            }

            if let Some(target) = funcs.get(&name) {
                emit_call(result, &caller_id, target, None);
            } else if let Some(dep) = imports.get(&name) {
                emit_call(result, &caller_id, dep, Some(&name));
            }
        } else if function.kind() == "member_expression" {
            let Some(object) = function.child_by_field("object") else { return };
            let Some(property) = function.child_by_field("property") else { return };
            let method_name = property.text(source).to_string();
            let object_name = base_identifier(object, source);

            if object_name == "axios" {
                if let Some(http_method) = http_method_from_name(&method_name) {
                    if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                        emit_api_call(result, path, &caller_id, "axios", http_method, &url);
                        return;
                    }
                }
            }

            if let Some(http_method) = http_method_from_name(&method_name) {
                if let Some(path_node) = arguments.named_child(0) {
                    if let Some(url) = extract_url_literal(path_node, source, &URL_KINDS) {
                        let handler = arguments
                            .named_child(1)
                            .map(|h| if h.kind() == "identifier" { h.text(source).to_string() } else { "anonymous".to_string() })
                            .unwrap_or_else(|| "anonymous".to_string());
                        emit_route(result, path, &object_name, http_method, &url, &handler);
                        return;
                    }
                }
            }

            if object_name == "app" && method_name == "use" {
                if let (Some(prefix_node), Some(handler_node)) = (arguments.named_child(0), arguments.named_child(1)) {
                    if prefix_node.kind() == "string" && handler_node.kind() == "identifier" {
                        emit_router_mount(result, path, module_id, &strip_quotes(prefix_node.text(source)), &handler_node.text(source).to_string());
                        return;
                    }
                }
            }

            if looks_like_http_client_name(&object_name) {
                if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                    let method = http_method_from_name(&method_name).unwrap_or("UNKNOWN");
                    emit_api_call(result, path, &caller_id, "http_client", method, &url);
                    return;
                }
            }

            if object_name == "self" || object_name == "this" {
                if let Some(target) = funcs.get(&method_name) {
                    emit_call(result, &caller_id, target, None);
                }
                return;
            }

            if let Some(dep) = imports.get(&object_name) {
                emit_call(result, &caller_id, dep, Some(&method_name));
            }
        }
    });
}

fn base_identifier<'t>(node: impl SyntaxNode<'t>, source: &[u8]) -> String {
    match node.kind() {
        "identifier" | "this" => node.text(source).to_string(),
        "member_expression" => node.child_by_field("object").map(|o| base_identifier(o, source)).unwrap_or_default(),
        _ => node.text(source).to_string(),
    }
}

fn enclosing_routine(line: u32, spans: &[RoutineSpan], module_id: &str) -> String {
    spans.iter().filter(|s| s.start <= line && line <= s.end).min_by_key(|s| s.end - s.start).map(|s| s.id.clone()).unwrap_or_else(|| module_id.to_string())
}

fn emit_call(result: &mut ExtractionResult, caller_id: &str, target_id: &str, callee: Option<&str>) {
    let eid = edge_id(EdgeKind::Calls.as_str(), caller_id, target_id, callee.unwrap_or(""));
    let mut edge = Edge::new(eid, EdgeKind::Calls, caller_id, target_id);
    if let Some(c) = callee {
        edge = edge.with_property("callee", c);
    }
    result.edges.push(edge);
}

fn emit_api_call(result: &mut ExtractionResult, path: &str, caller_id: &str, framework: &str, method: &str, url: &str) {
    let local_key = format!("{framework}:{method}:{url}");
    let dep_id = node_id(NodeKind::Dependency.as_str(), path, &local_key);
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, format!("{method} {url}"), path, Language::TypeScript)
        .with_property("kind", "api_call")
        .with_property("http_method", method)
        .with_property("path", url)
        .with_property("framework", framework);
    result.nodes.push(dep);
    emit_call(result, caller_id, &dep_id, None);
}

fn emit_route(result: &mut ExtractionResult, path: &str, router: &str, method: &str, url: &str, handler: &str) {
    let local_key = format!("{method}:{url}");
    let id = node_id(NodeKind::ApiEndpoint.as_str(), path, &local_key);
    let module_id = node_id(NodeKind::Module.as_str(), path, path);
    let node = Node::new(id.clone(), NodeKind::ApiEndpoint, format!("{method} {url}"), path, Language::TypeScript)
        .with_property("http_method", method)
        .with_property("path", url)
        .with_property("framework", "express")
        .with_property("handler", handler)
        .with_property("router", router);
    result.nodes.push(node);
    contains(result, &module_id, &id);
    result.edges.push(Edge::new(edge_id(EdgeKind::Exposes.as_str(), &module_id, &id, ""), EdgeKind::Exposes, module_id, id));
}

fn emit_router_mount(result: &mut ExtractionResult, path: &str, module_id: &str, prefix: &str, handler: &str) {
    let local_key = format!("router_mount:{prefix}:{handler}");
    let id = node_id(NodeKind::Variable.as_str(), path, &local_key);
    let node = Node::new(id.clone(), NodeKind::Variable, handler.to_string(), path, Language::TypeScript)
        .with_property("kind", "router_mount")
        .with_property("prefix", prefix)
        .with_property("handler", handler);
    result.nodes.push(node);
    contains(result, module_id, &id);
}

fn emit_bdd_test(result: &mut ExtractionResult, path: &str, module_id: &str, description: &str, line: u32) {
    let local_key = format!("{description}@{line}");
    let id = node_id(NodeKind::TestFunction.as_str(), path, &local_key);
    let node = Node::new(id.clone(), NodeKind::TestFunction, description.to_string(), path, Language::TypeScript)
        .with_lines(line, line)
        .with_property("test_type", "bdd");
    result.nodes.push(node);
    contains(result, module_id, &id);
}

#[cfg(test)]
mod tests;
