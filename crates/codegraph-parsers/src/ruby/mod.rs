//! Structural and call-graph extraction for Ruby.

mod helpers;

use std::collections::HashMap;

use codegraph_core::error::ExtractError;
use codegraph_core::id::{edge_id, node_id};
use codegraph_core::model::{Edge, EdgeKind, Language, Node, NodeKind};
use codegraph_core::properties::join_csv;

use crate::adapter::{walk, SyntaxNode};
use crate::extractor::{ExtractionResult, LanguageExtractor};
use crate::http::{extract_url_literal, looks_like_http_client_name, UrlLiteralKinds};
use crate::treesitter;

const URL_KINDS: UrlLiteralKinds = UrlLiteralKinds {
    string_kinds: &["string"],
    template_kinds: &[],
    concat_kinds: &["binary"],
};

const HTTP_CLIENT_CONSTANTS: &[&str] = &["HTTParty", "RestClient", "Net::HTTP", "Faraday"];

pub struct RubyExtractor;

impl RubyExtractor {
    pub fn new() -> Self {
        RubyExtractor
    }
}

impl Default for RubyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for RubyExtractor {
    fn language(&self) -> Language {
        Language::Ruby
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".rb"]
    }

    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let tree = treesitter::parse(Language::Ruby, path, bytes)?;
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
    result.nodes.push(Node::new(file_id.clone(), file_kind, path, path, Language::Ruby));

    let module_id = node_id(NodeKind::Module.as_str(), path, path);
    result.nodes.push(Node::new(module_id.clone(), NodeKind::Module, path, path, Language::Ruby));
    contains(&mut result, &file_id, &module_id);

    // Maps a container's start_line to its assigned node id, so methods and
    // nested classes can find their enclosing scope by walking `parent()`
    // without an identity-equal node type.
    let mut container_ids: HashMap<u32, String> = HashMap::new();
    let mut classes: HashMap<String, ClassInfo> = HashMap::new();
    let mut funcs: HashMap<String, String> = HashMap::new();
    let mut routine_spans: Vec<RoutineSpan> = Vec::new();
    let mut receiver_spans: Vec<ReceiverSpan> = Vec::new();

    walk(root, &mut |node| match node.kind() {
        "class" => extract_class(
            node,
            source,
            path,
            &module_id,
            is_test_file,
            &mut result,
            &mut container_ids,
            &mut classes,
            &mut funcs,
            &mut routine_spans,
            &mut receiver_spans,
        ),
        "module" => extract_module(node, source, path, &module_id, &mut result, &mut container_ids),
        "call" if is_require_call(node, source) => extract_require(node, source, path, &module_id, &mut result),
        _ => {}
    });

    // Top-level (non-class) methods: script-style or Sinatra-route handlers.
    walk(root, &mut |node| {
        if node.kind() == "method" && nearest_container(node, &container_ids).is_none() {
            if let Some((method_id, name)) = extract_method(node, source, path, &module_id, None, is_test_file, &mut result) {
                funcs.insert(name.clone(), method_id.clone());
                routine_spans.push(RoutineSpan { start: node.start_line(), end: node.end_line(), id: method_id });
                receiver_spans.push(ReceiverSpan { start: node.start_line(), end: node.end_line(), receiver: String::new() });
            }
        }
    });

    call_graph_pass(root, source, path, &module_id, &funcs, &classes, &routine_spans, &receiver_spans, &mut result);
    route_pass(root, source, path, &module_id, &mut result);

    result
}

fn contains(result: &mut ExtractionResult, parent: &str, child: &str) {
    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), parent, child, ""), EdgeKind::Contains, parent, child));
}

fn nearest_container<'t, N: SyntaxNode<'t>>(node: N, container_ids: &HashMap<u32, String>) -> Option<String> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if matches!(ancestor.kind(), "class" | "module") {
            if let Some(id) = container_ids.get(&ancestor.start_line()) {
                return Some(id.clone());
            }
        }
        current = ancestor.parent();
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn extract_class<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    module_id: &str,
    is_test_file: bool,
    result: &mut ExtractionResult,
    container_ids: &mut HashMap<u32, String>,
    classes: &mut HashMap<String, ClassInfo>,
    funcs: &mut HashMap<String, String>,
    routine_spans: &mut Vec<RoutineSpan>,
    receiver_spans: &mut Vec<ReceiverSpan>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = last_segment(name_node.text(source));
    let id = node_id(NodeKind::Class.as_str(), path, &name);

    let base = item.child_by_field("superclass").map(|s| last_segment(s.text(source)));

    let mut methods = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if matches!(member.kind(), "method" | "singleton_method") {
                if let Some(n) = member.child_by_field("name") {
                    methods.push(n.text(source).to_string());
                }
            }
        }
    }

    let container_id = nearest_container(item, container_ids).unwrap_or_else(|| module_id.to_string());

    let mut node = Node::new(id.clone(), NodeKind::Class, name.clone(), path, Language::Ruby).with_lines(item.start_line(), item.end_line());
    if let Some(base) = &base {
        node = node.with_property("bases", base.clone());
    }
    if !methods.is_empty() {
        node = node.with_property("methods", join_csv(&methods));
    }
    result.nodes.push(node);
    contains(result, &container_id, &id);

    if let Some(base) = &base {
        let base_id = node_id(NodeKind::Class.as_str(), path, base);
        result.edges.push(Edge::new(edge_id(EdgeKind::Implements.as_str(), &id, &base_id, ""), EdgeKind::Implements, id.clone(), base_id));
    }

    container_ids.insert(item.start_line(), id.clone());
    classes.insert(name.clone(), ClassInfo { id: id.clone(), methods });

    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if matches!(member.kind(), "method" | "singleton_method") {
                if let Some((method_id, method_name)) = extract_method(member, source, path, &id, Some(&name), is_test_file, result) {
                    funcs.insert(format!("{name}.{method_name}"), method_id.clone());
                    routine_spans.push(RoutineSpan { start: member.start_line(), end: member.end_line(), id: method_id });
                    receiver_spans.push(ReceiverSpan { start: member.start_line(), end: member.end_line(), receiver: name.clone() });
                }
            }
        }
    }
}

fn extract_module<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    module_id: &str,
    result: &mut ExtractionResult,
    container_ids: &mut HashMap<u32, String>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = last_segment(name_node.text(source));
    let id = node_id(NodeKind::Module.as_str(), path, &name);

    let container_id = nearest_container(item, container_ids).unwrap_or_else(|| module_id.to_string());
    result.nodes.push(Node::new(id.clone(), NodeKind::Module, name, path, Language::Ruby).with_lines(item.start_line(), item.end_line()));
    contains(result, &container_id, &id);

    container_ids.insert(item.start_line(), id);
}

fn extract_method<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    owner_id: &str,
    owner_name: Option<&str>,
    is_test_file: bool,
    result: &mut ExtractionResult,
) -> Option<(String, String)> {
    let name_node = item.child_by_field("name")?;
    let name = name_node.text(source).to_string();
    let local_key = match owner_name {
        Some(owner) => format!("{owner}.{name}"),
        None => name.clone(),
    };

    let is_test_routine = is_test_file && helpers::is_test_routine_name(&name);
    let kind = if is_test_routine { NodeKind::TestFunction } else { NodeKind::Method };
    let id = node_id(kind.as_str(), path, &local_key);

    let params = item.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();

    let mut node = Node::new(id.clone(), kind, name.clone(), path, Language::Ruby).with_lines(item.start_line(), item.end_line()).with_signature(format!("{name}{params}"));
    if let Some(owner) = owner_name {
        node = node.with_property("receiver", owner);
    }
    if is_test_routine {
        node = node.with_property("test_type", "convention");
    }
    result.nodes.push(node);
    contains(result, owner_id, &id);
    Some((id, name))
}

fn last_segment(text: &str) -> String {
    text.rsplit("::").next().unwrap_or(text).trim().to_string()
}

fn is_require_call<'t, N: SyntaxNode<'t>>(node: N, source: &[u8]) -> bool {
    node.child_by_field("method").map(|m| matches!(m.text(source), "require" | "require_relative")).unwrap_or(false) && node.child_by_field("receiver").is_none()
}

fn extract_require<'t, N: SyntaxNode<'t>>(node: N, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult) {
    let Some(args) = node.child_by_field("arguments") else { return };
    let Some(first) = args.named_child(0) else { return };
    if first.kind() != "string" {
        return;
    }
    let module_path = string_contents(first, source);
    if module_path.is_empty() {
        return;
    }
    let dep_id = node_id(NodeKind::Dependency.as_str(), path, &module_path);
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, module_path.clone(), path, Language::Ruby).with_property("kind", "import");
    result.nodes.push(dep);
    contains(result, module_id, &dep_id);
    result.edges.push(Edge::new(edge_id(EdgeKind::Imports.as_str(), module_id, &dep_id, ""), EdgeKind::Imports, module_id, &dep_id));
}

fn string_contents<'t, N: SyntaxNode<'t>>(node: N, source: &[u8]) -> String {
    extract_url_literal(node, source, &URL_KINDS).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn call_graph_pass<'t>(
    root: impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    funcs: &HashMap<String, String>,
    classes: &HashMap<String, ClassInfo>,
    routine_spans: &[RoutineSpan],
    receiver_spans: &[ReceiverSpan],
    result: &mut ExtractionResult,
) {
    walk(root, &mut |node| {
        if node.kind() != "call" {
            return;
        }
        let Some(method_node) = node.child_by_field("method") else { return };
        let method_name = method_node.text(source).to_string();
        let caller_id = routine_spans
            .iter()
            .filter(|s| s.start <= node.start_line() && node.start_line() <= s.end)
            .min_by_key(|s| s.end - s.start)
            .map(|s| s.id.clone())
            .unwrap_or_else(|| module_id.to_string());

        match node.child_by_field("receiver") {
            None => {
                if matches!(method_name.as_str(), "require" | "require_relative") {
                    return;
                }
                if let Some(target) = funcs.get(&method_name) {
                    emit_call(result, &caller_id, target, None);
                }
            }
            Some(receiver) => {
                let receiver_text = receiver.text(source);
                if receiver_text == "self" {
                    if let Some(enclosing) = receiver_spans.iter().filter(|s| s.start <= node.start_line() && node.start_line() <= s.end).min_by_key(|s| s.end - s.start) {
                        if !enclosing.receiver.is_empty() {
                            if let Some(target) = funcs.get(&format!("{}.{}", enclosing.receiver, method_name)) {
                                emit_call(result, &caller_id, target, None);
                            }
                        }
                    }
                    return;
                }

                if HTTP_CLIENT_CONSTANTS.iter().any(|c| receiver_text == *c) {
                    if let Some(args) = node.child_by_field("arguments") {
                        if let Some(url_arg) = args.named_child(0) {
                            if let Some(url) = extract_url_literal(url_arg, source, &URL_KINDS) {
                                let http_method = helpers::http_verb_method(&method_name).unwrap_or("UNKNOWN");
                                emit_api_call(result, path, &caller_id, receiver_text, http_method, &url);
                                return;
                            }
                        }
                    }
                }

                if looks_like_http_client_name(receiver_text) {
                    if let Some(args) = node.child_by_field("arguments") {
                        if let Some(url_arg) = args.named_child(0) {
                            if let Some(url) = extract_url_literal(url_arg, source, &URL_KINDS) {
                                let http_method = helpers::http_verb_method(&method_name).unwrap_or("UNKNOWN");
                                emit_api_call(result, path, &caller_id, receiver_text, http_method, &url);
                                return;
                            }
                        }
                    }
                }

                if let Some(info) = classes.get(receiver_text) {
                    if info.methods.contains(&method_name) {
                        emit_call(result, &caller_id, &info.id, Some(&method_name));
                    }
                }
            }
        }
    });
}

/// Detects the Rails/Sinatra router DSL: a bare `get`/`post`/`put`/`patch`/
/// `delete` call whose first argument is a path string, optionally paired
/// with a `to: 'controller#action'` keyword argument.
fn route_pass<'t>(root: impl SyntaxNode<'t>, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult) {
    walk(root, &mut |node| {
        if node.kind() != "call" || node.child_by_field("receiver").is_some() {
            return;
        }
        let Some(method_node) = node.child_by_field("method") else { return };
        let Some(http_method) = helpers::http_verb_method(method_node.text(source)) else { return };
        let Some(args) = node.child_by_field("arguments") else { return };
        let Some(path_arg) = args.named_child(0) else { return };
        if path_arg.kind() != "string" {
            return;
        }
        let route_path = string_contents(path_arg, source);
        if route_path.is_empty() {
            return;
        }

        let action = find_to_action(args, source);
        let framework = if action.is_some() { "rails" } else { "sinatra" };
        let local_key = format!("{framework}:{http_method}:{route_path}");
        let endpoint_id = node_id(NodeKind::ApiEndpoint.as_str(), path, &local_key);
        let mut endpoint = Node::new(endpoint_id.clone(), NodeKind::ApiEndpoint, format!("{http_method} {route_path}"), path, Language::Ruby)
            .with_lines(node.start_line(), node.end_line())
            .with_property("http_method", http_method)
            .with_property("path", route_path)
            .with_property("framework", framework);
        if let Some(action) = action {
            endpoint = endpoint.with_property("action", action);
        }
        result.nodes.push(endpoint);
        contains(result, module_id, &endpoint_id);
        result.edges.push(Edge::new(edge_id(EdgeKind::Exposes.as_str(), module_id, &endpoint_id, ""), EdgeKind::Exposes, module_id, endpoint_id));
    });
}

fn find_to_action<'t, N: SyntaxNode<'t>>(args: N, source: &[u8]) -> Option<String> {
    let mut i = 0;
    while let Some(child) = args.named_child(i) {
        i += 1;
        if child.kind() != "pair" {
            continue;
        }
        let key = child.child_by_field("key")?;
        if key.text(source).trim_end_matches(':') != "to" {
            continue;
        }
        let value = child.child_by_field("value")?;
        if value.kind() == "string" {
            return Some(string_contents(value, source));
        }
    }
    None
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
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, format!("{method} {url}"), path, Language::Ruby)
        .with_property("kind", "api_call")
        .with_property("http_method", method)
        .with_property("path", url)
        .with_property("framework", framework);
    result.nodes.push(dep);
    emit_call(result, caller_id, &dep_id, None);
}

#[cfg(test)]
mod tests;
