//! Structural and call-graph extraction for Python.

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
    template_kinds: &[],
    concat_kinds: &["binary_operator"],
};

pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        PythonExtractor
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let tree = treesitter::parse(Language::Python, path, bytes)?;
        Ok(extract(path, bytes, tree.root_node()))
    }
}

#[derive(Default)]
struct ClassInfo {
    id: String,
    methods: Vec<String>,
}

struct RoutineSpan {
    start: u32,
    end: u32,
    id: String,
}

struct ReceiverSpan {
    start: u32,
    end: u32,
    receiver: String,
}

fn extract<'t>(path: &str, source: &[u8], root: impl SyntaxNode<'t>) -> ExtractionResult {
    let mut result = ExtractionResult::new();
    let is_test_file = helpers::is_test_file(path);

    let file_kind = if is_test_file { NodeKind::TestFile } else { NodeKind::File };
    let file_id = node_id(file_kind.as_str(), path, path);
    result.nodes.push(Node::new(file_id.clone(), file_kind, path, path, Language::Python));

    let module_name = path.rsplit('/').next().unwrap_or(path).trim_end_matches(".py").to_string();
    let module_id = node_id(NodeKind::Module.as_str(), path, path);
    result.nodes.push(Node::new(module_id.clone(), NodeKind::Module, module_name, path, Language::Python));
    contains(&mut result, &file_id, &module_id);

    let mut imports: HashMap<String, String> = HashMap::new();
    let mut funcs: HashMap<String, String> = HashMap::new();
    let mut classes: HashMap<String, ClassInfo> = HashMap::new();
    let mut field_types: HashMap<(String, String), String> = HashMap::new();
    let mut routine_spans: Vec<RoutineSpan> = Vec::new();
    let mut receiver_spans: Vec<ReceiverSpan> = Vec::new();

    let mut i = 0;
    while let Some(raw_item) = root.child(i) {
        i += 1;
        let (item, decorators) = unwrap_decorated(raw_item, source);
        match item.kind() {
            "import_statement" => extract_import(item, source, path, &module_id, &mut result, &mut imports),
            "import_from_statement" => extract_import_from(item, source, path, &module_id, &mut result, &mut imports),
            "class_definition" => extract_class(
                item,
                source,
                path,
                &module_id,
                &decorators,
                &mut result,
                &mut classes,
                &mut field_types,
                &mut routine_spans,
                &mut receiver_spans,
            ),
            "function_definition" => {
                if let Some((fn_id, name)) = extract_function(item, source, path, &module_id, &decorators, None, is_test_file, &mut result) {
                    funcs.insert(name, fn_id.clone());
                    routine_spans.push(RoutineSpan { start: item.start_line(), end: item.end_line(), id: fn_id });
                }
            }
            "expression_statement" => extract_module_assignment(item, source, path, &module_id, &mut result),
            _ => {}
        }
    }

    call_graph_pass(root, source, path, &module_id, &funcs, &imports, &classes, &field_types, &routine_spans, &receiver_spans, &mut result);

    result
}

fn contains(result: &mut ExtractionResult, parent: &str, child: &str) {
    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), parent, child, ""), EdgeKind::Contains, parent, child));
}

/// Unwraps a `decorated_definition`, returning the inner `class_definition`/
/// `function_definition` plus the text of each preceding `@decorator`.
fn unwrap_decorated<'t, N: SyntaxNode<'t>>(node: N, source: &[u8]) -> (N, Vec<String>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    let mut decorators = Vec::new();
    let mut definition = node;
    let mut i = 0;
    while let Some(child) = node.child(i) {
        i += 1;
        if child.kind() == "decorator" {
            if let Some(name) = decorator_expression_name(child, source) {
                decorators.push(name);
            }
        } else if matches!(child.kind(), "function_definition" | "class_definition") {
            definition = child;
        }
    }
    (definition, decorators)
}

fn decorator_expression_name<'t, N: SyntaxNode<'t>>(decorator: N, source: &[u8]) -> Option<String> {
    let mut i = 0;
    while let Some(child) = decorator.child(i) {
        i += 1;
        match child.kind() {
            "identifier" | "attribute" => return Some(child.text(source).to_string()),
            "call" => {
                let function = child.child_by_field("function")?;
                return Some(function.text(source).to_string());
            }
            _ => {}
        }
    }
    None
}

fn extract_import<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult, imports: &mut HashMap<String, String>) {
    let mut i = 0;
    while let Some(child) = item.child(i) {
        i += 1;
        let (module_path, binding) = match child.kind() {
            "dotted_name" => (child.text(source).to_string(), last_segment(child.text(source))),
            "aliased_import" => {
                let Some(name) = child.child_by_field("name") else { continue };
                let alias = child.child_by_field("alias").map(|a| a.text(source).to_string());
                (name.text(source).to_string(), alias.unwrap_or_else(|| last_segment(name.text(source))))
            }
            _ => continue,
        };
        register_dependency(result, path, module_id, &module_path, &binding, imports);
    }
}

fn extract_import_from<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult, imports: &mut HashMap<String, String>) {
    let Some(module_name) = item.child_by_field("module_name") else { return };
    let module_path = module_name.text(source).to_string();
    let mut i = 0;
    while let Some(child) = item.child(i) {
        i += 1;
        let binding = match child.kind() {
            "dotted_name" | "identifier" => Some(child.text(source).to_string()),
            "aliased_import" => {
                let name = child.child_by_field("name").map(|n| n.text(source).to_string());
                let alias = child.child_by_field("alias").map(|a| a.text(source).to_string());
                alias.or(name)
            }
            "wildcard_import" => None,
            _ => None,
        };
        if child.kind() == "import_from_statement" {
            continue;
        }
        if let Some(binding) = binding {
            if matches!(child.kind(), "dotted_name" | "identifier" | "aliased_import") && child.start_line() != item.start_line() {
                register_dependency(result, path, module_id, &format!("{module_path}.{binding}"), &binding, imports);
            } else if child.kind() != "wildcard_import" {
                register_dependency(result, path, module_id, &format!("{module_path}.{binding}"), &binding, imports);
            }
        }
    }
}

fn register_dependency(result: &mut ExtractionResult, path: &str, module_id: &str, module_path: &str, binding: &str, imports: &mut HashMap<String, String>) {
    let dep_id = node_id(NodeKind::Dependency.as_str(), path, module_path);
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, module_path.to_string(), path, Language::Python).with_property("kind", "import");
    result.nodes.push(dep);
    contains(result, module_id, &dep_id);
    result.edges.push(Edge::new(edge_id(EdgeKind::Imports.as_str(), module_id, &dep_id, ""), EdgeKind::Imports, module_id, &dep_id));
    imports.insert(binding.to_string(), dep_id);
}

fn last_segment(dotted: &str) -> String {
    dotted.rsplit('.').next().unwrap_or(dotted).to_string()
}

fn preceding_doc_comment<'t, N: SyntaxNode<'t>>(body: N, source: &[u8]) -> Option<String> {
    let first = body.child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string_node = first.child(0)?;
    if string_node.kind() != "string" {
        return None;
    }
    let text = string_node.text(source);
    let trimmed = text.trim().trim_start_matches("\"\"\"").trim_start_matches("'''").trim_end_matches("\"\"\"").trim_end_matches("'''");
    Some(trimmed.trim().to_string())
}

#[allow(clippy::too_many_arguments)]
fn extract_class<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    module_id: &str,
    decorators: &[String],
    result: &mut ExtractionResult,
    classes: &mut HashMap<String, ClassInfo>,
    field_types: &mut HashMap<(String, String), String>,
    routine_spans: &mut Vec<RoutineSpan>,
    receiver_spans: &mut Vec<ReceiverSpan>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Class.as_str(), path, &name);

    let bases = item
        .child_by_field("superclasses")
        .map(|s| {
            let mut out = Vec::new();
            let mut i = 0;
            while let Some(arg) = s.named_child(i) {
                i += 1;
                if matches!(arg.kind(), "identifier" | "attribute") {
                    out.push(arg.text(source).to_string());
                }
            }
            out
        })
        .unwrap_or_default();

    let mut methods = Vec::new();
    let mut fields = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            let (member, _) = unwrap_decorated(member, source);
            match member.kind() {
                "function_definition" => {
                    if let Some(n) = member.child_by_field("name") {
                        methods.push(n.text(source).to_string());
                    }
                    collect_self_assignments(member, source, &name, field_types);
                }
                "expression_statement" => {
                    if let Some(assignment) = member.child(0) {
                        if assignment.kind() == "assignment" {
                            if let Some(left) = assignment.child_by_field("left") {
                                if left.kind() == "identifier" {
                                    fields.push(left.text(source).to_string());
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Class, name.clone(), path, Language::Python).with_lines(item.start_line(), item.end_line());
    node.is_public = !name.starts_with('_');
    if let Some(body) = item.child_by_field("body") {
        node.doc_comment = preceding_doc_comment(body, source);
    }
    if !decorators.is_empty() {
        node = node.with_property("decorators", join_csv(decorators));
    }
    if !bases.is_empty() {
        node = node.with_property("bases", join_csv(&bases));
    }
    if !methods.is_empty() {
        node = node.with_property("methods", join_csv(&methods));
    }
    if !fields.is_empty() {
        node = node.with_property("fields", join_csv(&fields));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);

    for base in &bases {
        let base_id = node_id(NodeKind::Class.as_str(), path, base);
        result.edges.push(Edge::new(edge_id(EdgeKind::Implements.as_str(), &id, &base_id, ""), EdgeKind::Implements, id.clone(), base_id));
    }

    classes.insert(name.clone(), ClassInfo { id: id.clone(), methods });

    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            let (member, method_decorators) = unwrap_decorated(member, source);
            if member.kind() == "function_definition" {
                if let Some((method_id, _)) = extract_function(member, source, path, &id, &method_decorators, Some(&name), false, result) {
                    routine_spans.push(RoutineSpan { start: member.start_line(), end: member.end_line(), id: method_id });
                    receiver_spans.push(ReceiverSpan { start: member.start_line(), end: member.end_line(), receiver: name.clone() });
                }
            }
        }
    }
}

/// Scans a method body for `self.<attr> = <ClassName>(...)` assignments so
/// `self.<attr>.<method>()` call sites elsewhere in the class can resolve.
fn collect_self_assignments<'t, N: SyntaxNode<'t>>(method: N, source: &[u8], owner_class: &str, field_types: &mut HashMap<(String, String), String>) {
    let Some(body) = method.child_by_field("body") else { return };
    walk(body, &mut |node| {
        if node.kind() != "assignment" {
            return;
        }
        let Some(left) = node.child_by_field("left") else { return };
        if left.kind() != "attribute" {
            return;
        }
        let Some(object) = left.child_by_field("object") else { return };
        if object.kind() != "identifier" || object.text(source) != "self" {
            return;
        }
        let Some(attr) = left.child_by_field("attribute") else { return };
        let Some(right) = node.child_by_field("right") else { return };
        if right.kind() != "call" {
            return;
        }
        let Some(function) = right.child_by_field("function") else { return };
        if function.kind() == "identifier" {
            field_types.insert((owner_class.to_string(), attr.text(source).to_string()), function.text(source).to_string());
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn extract_function<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    container_id: &str,
    decorators: &[String],
    receiver: Option<&str>,
    in_test_file: bool,
    result: &mut ExtractionResult,
) -> Option<(String, String)> {
    let name_node = item.child_by_field("name")?;
    let name = name_node.text(source).to_string();
    let kind = if receiver.is_some() { NodeKind::Method } else { NodeKind::Function };
    let local_key = match receiver {
        Some(r) => format!("{r}.{name}"),
        None => name.clone(),
    };
    let id = node_id(kind.as_str(), path, &local_key);

    let params = item.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();
    let return_type = item.child_by_field("return_type").map(|r| r.text(source).to_string());
    let signature = match &return_type {
        Some(ret) => format!("{name}{params} -> {ret}"),
        None => format!("{name}{params}"),
    };

    let is_test_routine = in_test_file && helpers::is_test_routine_name(&name);
    let emitted_kind = if is_test_routine { NodeKind::TestFunction } else { kind };
    let id = if is_test_routine { node_id(emitted_kind.as_str(), path, &local_key) } else { id };

    let mut node = Node::new(id.clone(), emitted_kind, name.clone(), path, Language::Python).with_lines(item.start_line(), item.end_line()).with_signature(signature);
    node.is_public = !name.starts_with('_');
    if let Some(body) = item.child_by_field("body") {
        node.doc_comment = preceding_doc_comment(body, source);
    }
    if let Some(r) = receiver {
        node.properties.insert("receiver".to_string(), r.to_string());
    }
    if is_async(item) {
        node = node.with_property("async", "true");
    }
    if !decorators.is_empty() {
        node = node.with_property("decorators", join_csv(decorators));
        if let Some(route) = route_from_decorators(decorators) {
            node = node.with_property("http_method", route.0).with_property("path", route.1).with_property("kind_hint", "route");
        }
    }
    if is_test_routine {
        node = node.with_property("test_type", "test");
    }
    result.nodes.push(node);
    contains(result, container_id, &id);
    Some((id, name))
}

fn is_async<'t, N: SyntaxNode<'t>>(node: N) -> bool {
    let mut i = 0;
    while let Some(child) = node.child(i) {
        if child.kind() == "async" {
            return true;
        }
        i += 1;
    }
    false
}

/// Best-effort route extraction from a decorator's textual form, e.g.
/// `app.get("/items/{id}")` or `bp.route("/users")`. Returns
/// `(HTTP_METHOD, path)`; the path is left as written (braces, colons) since
/// decorator text alone doesn't carry a parsed string node here.
fn route_from_decorators(decorators: &[String]) -> Option<(&'static str, String)> {
    for d in decorators {
        let name = d.rsplit('.').next().unwrap_or(d);
        if let Some(method) = http_method_from_name(name) {
            return Some((method, String::new()));
        }
        if name == "route" {
            return Some(("ALL", String::new()));
        }
    }
    None
}

fn extract_module_assignment<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult) {
    let Some(assignment) = item.child(0) else { return };
    if assignment.kind() != "assignment" {
        return;
    }
    let Some(left) = assignment.child_by_field("left") else { return };
    if left.kind() != "identifier" {
        return;
    }
    let name = left.text(source).to_string();
    let is_constant = name.chars().all(|c| c.is_ascii_uppercase() || c == '_');
    let kind = if is_constant { NodeKind::Constant } else { NodeKind::Variable };
    let id = node_id(kind.as_str(), path, &name);
    let mut node = Node::new(id.clone(), kind, name.clone(), path, Language::Python).with_lines(item.start_line(), item.end_line());
    node.is_public = !name.starts_with('_');
    result.nodes.push(node);
    contains(result, module_id, &id);
}

#[allow(clippy::too_many_arguments)]
fn call_graph_pass<'t>(
    root: impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    funcs: &HashMap<String, String>,
    imports: &HashMap<String, String>,
    classes: &HashMap<String, ClassInfo>,
    field_types: &HashMap<(String, String), String>,
    routine_spans: &[RoutineSpan],
    receiver_spans: &[ReceiverSpan],
    result: &mut ExtractionResult,
) {
    walk(root, &mut |node| {
        if node.kind() != "call" {
            return;
        }
        let Some(function) = node.child_by_field("function") else { return };
        let Some(arguments) = node.child_by_field("arguments") else { return };
        let caller_id = enclosing_routine(node.start_line(), routine_spans, module_id);

        match function.kind() {
            "identifier" => {
                let name = function.text(source).to_string();
                if let Some(target) = funcs.get(&name) {
                    emit_call(result, &caller_id, target, None);
                } else if let Some(dep) = imports.get(&name) {
                    emit_call(result, &caller_id, dep, Some(&name));
                } else if let Some(class) = classes.get(&name) {
                    emit_call(result, &caller_id, &class.id, Some("__init__"));
                }
            }
            "attribute" => {
                let Some(object) = function.child_by_field("object") else { return };
                let Some(attribute) = function.child_by_field("attribute") else { return };
                let method_name = attribute.text(source).to_string();
                let object_name = base_identifier(object, source);

                if matches!(object_name.as_str(), "requests" | "httpx") {
                    if let Some(http_method) = http_method_from_name(&method_name) {
                        if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                            emit_api_call(result, path, &caller_id, &object_name, http_method, &url);
                            return;
                        }
                    }
                }

                if looks_like_http_client_name(&object_name) {
                    if let Some(http_method) = http_method_from_name(&method_name) {
                        if let Some(url) = arguments.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                            emit_api_call(result, path, &caller_id, "http_client", http_method, &url);
                            return;
                        }
                    }
                }

                if object_name == "self" {
                    let receiver = enclosing_receiver(node.start_line(), receiver_spans);
                    if let Some(receiver) = receiver {
                        if let Some(field_name) = attribute_chain_tail(object, attribute, source) {
                            if let Some((target_class, attr)) = resolve_field_chain(&receiver, &field_name, field_types) {
                                if let Some(info) = classes.get(&target_class) {
                                    if info.methods.contains(&attr) {
                                        let target = node_id(NodeKind::Method.as_str(), path, &format!("{}.{attr}", info.id));
                                        emit_call(result, &caller_id, &target, None);
                                        return;
                                    }
                                }
                            }
                        }
                        if let Some(info) = classes.get(&receiver) {
                            if info.methods.contains(&method_name) {
                                let target = node_id(NodeKind::Method.as_str(), path, &format!("{}.{method_name}", info.id));
                                emit_call(result, &caller_id, &target, None);
                                return;
                            }
                        }
                    }
                    return;
                }

                if let Some(dep) = imports.get(&object_name) {
                    emit_call(result, &caller_id, dep, Some(&method_name));
                }
            }
            _ => {}
        }
    });
}

/// For `self.a.b.c()`, returns `"a.b"` — the dotted attribute path between
/// `self` and the final call's method name — so it can be walked hop by hop
/// through `field_types`.
fn attribute_chain_tail<'t, N: SyntaxNode<'t>>(object: N, _final_attribute: N, source: &[u8]) -> Option<String> {
    if object.kind() != "attribute" {
        return None;
    }
    Some(object.text(source).trim_start_matches("self.").to_string())
}

fn resolve_field_chain(owner_class: &str, dotted: &str, field_types: &HashMap<(String, String), String>) -> Option<(String, String)> {
    let mut segments = dotted.split('.');
    let mut current_class = owner_class.to_string();
    let first = segments.next()?;
    let mut current_type = field_types.get(&(current_class.clone(), first.to_string()))?.clone();
    for seg in segments {
        current_class = current_type.clone();
        current_type = field_types.get(&(current_class.clone(), seg.to_string()))?.clone();
    }
    Some((current_type, String::new()))
}

fn base_identifier<'t>(node: impl SyntaxNode<'t>, source: &[u8]) -> String {
    match node.kind() {
        "identifier" => node.text(source).to_string(),
        "attribute" => node.child_by_field("object").map(|o| base_identifier(o, source)).unwrap_or_default(),
        _ => node.text(source).to_string(),
    }
}

fn enclosing_routine(line: u32, spans: &[RoutineSpan], module_id: &str) -> String {
    spans.iter().filter(|s| s.start <= line && line <= s.end).min_by_key(|s| s.end - s.start).map(|s| s.id.clone()).unwrap_or_else(|| module_id.to_string())
}

fn enclosing_receiver(line: u32, spans: &[ReceiverSpan]) -> Option<String> {
    spans.iter().filter(|s| s.start <= line && line <= s.end).min_by_key(|s| s.end - s.start).map(|s| s.receiver.clone())
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
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, format!("{method} {url}"), path, Language::Python)
        .with_property("kind", "api_call")
        .with_property("http_method", method)
        .with_property("path", url)
        .with_property("framework", framework);
    result.nodes.push(dep);
    emit_call(result, caller_id, &dep_id, None);
}

#[cfg(test)]
mod tests;
