//! Structural and call-graph extraction for Java.

mod helpers;

use std::collections::HashMap;

use codegraph_core::error::ExtractError;
use codegraph_core::id::{edge_id, node_id};
use codegraph_core::model::{Edge, EdgeKind, Language, Node, NodeKind};
use codegraph_core::properties::join_csv;

use crate::adapter::{walk, SyntaxNode};
use crate::extractor::{ExtractionResult, LanguageExtractor};
use crate::http::{extract_url_literal, UrlLiteralKinds};
use crate::treesitter;

const URL_KINDS: UrlLiteralKinds = UrlLiteralKinds {
    string_kinds: &["string_literal"],
    template_kinds: &[],
    concat_kinds: &["binary_expression"],
};

const ROUTE_ANNOTATIONS: &[(&str, &str)] = &[
    ("GetMapping", "GET"),
    ("PostMapping", "POST"),
    ("PutMapping", "PUT"),
    ("PatchMapping", "PATCH"),
    ("DeleteMapping", "DELETE"),
    ("RequestMapping", "UNKNOWN"),
];

const REST_TEMPLATE_METHODS: &[&str] = &[
    "getForObject",
    "getForEntity",
    "postForObject",
    "postForEntity",
    "put",
    "delete",
    "exchange",
];

pub struct JavaExtractor;

impl JavaExtractor {
    pub fn new() -> Self {
        JavaExtractor
    }
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for JavaExtractor {
    fn language(&self) -> Language {
        Language::Java
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".java"]
    }

    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let tree = treesitter::parse(Language::Java, path, bytes)?;
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
    result.nodes.push(Node::new(file_id.clone(), file_kind, path, path, Language::Java));

    let package_name = find_package(root, source);
    let container_id = if let Some(ref pkg) = package_name {
        let id = node_id(NodeKind::Package.as_str(), path, pkg);
        result.nodes.push(Node::new(id.clone(), NodeKind::Package, pkg.clone(), path, Language::Java));
        id
    } else {
        let id = node_id(NodeKind::Module.as_str(), path, path);
        result.nodes.push(Node::new(id.clone(), NodeKind::Module, path, path, Language::Java));
        id
    };
    contains(&mut result, &file_id, &container_id);

    let mut imports: HashMap<String, String> = HashMap::new();
    let mut classes: HashMap<String, ClassInfo> = HashMap::new();
    let mut funcs: HashMap<String, String> = HashMap::new();
    let mut routine_spans: Vec<RoutineSpan> = Vec::new();
    let mut receiver_spans: Vec<ReceiverSpan> = Vec::new();

    let mut i = 0;
    while let Some(item) = root.child(i) {
        i += 1;
        match item.kind() {
            "import_declaration" => extract_import(item, source, path, &container_id, &mut result, &mut imports),
            "class_declaration" => extract_class(
                item,
                source,
                path,
                &container_id,
                package_name.as_deref(),
                is_test_file,
                &mut result,
                &mut classes,
                &mut funcs,
                &mut routine_spans,
                &mut receiver_spans,
            ),
            "interface_declaration" => extract_interface(item, source, path, &container_id, &mut result),
            "enum_declaration" => extract_enum(item, source, path, &container_id, &mut result),
            _ => {}
        }
    }

    call_graph_pass(root, source, path, &container_id, &funcs, &imports, &classes, &routine_spans, &receiver_spans, &mut result);

    result
}

fn contains(result: &mut ExtractionResult, parent: &str, child: &str) {
    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), parent, child, ""), EdgeKind::Contains, parent, child));
}

fn find_package<'t, N: SyntaxNode<'t>>(root: N, source: &[u8]) -> Option<String> {
    let mut i = 0;
    while let Some(child) = root.child(i) {
        i += 1;
        if child.kind() == "package_declaration" {
            let text = child.text(source);
            let trimmed = text.trim_start_matches("package").trim_end_matches(';').trim();
            return Some(trimmed.to_string());
        }
    }
    None
}

fn extract_import<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], path: &str, container_id: &str, result: &mut ExtractionResult, imports: &mut HashMap<String, String>) {
    let text = item.text(source);
    let module_path = text.trim_start_matches("import").trim_start_matches("static").trim_end_matches(';').trim().to_string();
    if module_path.is_empty() {
        return;
    }
    let dep_id = node_id(NodeKind::Dependency.as_str(), path, &module_path);
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, module_path.clone(), path, Language::Java).with_property("kind", "import");
    result.nodes.push(dep);
    contains(result, container_id, &dep_id);
    result.edges.push(Edge::new(edge_id(EdgeKind::Imports.as_str(), container_id, &dep_id, ""), EdgeKind::Imports, container_id, &dep_id));

    let simple = module_path.trim_end_matches(".*").rsplit('.').next().unwrap_or(&module_path).to_string();
    imports.entry(simple).or_insert_with(|| dep_id.clone());
}

fn preceding_javadoc<'t, N: SyntaxNode<'t>>(node: N, source: &[u8]) -> Option<String> {
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
    if candidate.kind() != "block_comment" {
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
fn extract_class<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    container_id: &str,
    package_name: Option<&str>,
    is_test_file: bool,
    result: &mut ExtractionResult,
    classes: &mut HashMap<String, ClassInfo>,
    funcs: &mut HashMap<String, String>,
    routine_spans: &mut Vec<RoutineSpan>,
    receiver_spans: &mut Vec<ReceiverSpan>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Class.as_str(), path, &name);

    let (annotations, modifiers) = helpers::find_modifiers(item).map(|m| helpers::read_modifiers(m, source)).unwrap_or_default();

    let base = item
        .child_by_field("superclass")
        .and_then(|s| s.child_by_field("type"))
        .map(|t| helpers::strip_generics(t.text(source)));

    let implemented = item
        .child_by_field("interfaces")
        .and_then(|i| i.child_by_field("type"))
        .map(|list| {
            let mut out = Vec::new();
            let mut i = 0;
            while let Some(t) = list.named_child(i) {
                i += 1;
                out.push(helpers::strip_generics(t.text(source)));
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
            match member.kind() {
                "method_declaration" | "constructor_declaration" => {
                    if let Some(n) = member.child_by_field("name") {
                        methods.push(n.text(source).to_string());
                    }
                }
                "field_declaration" => {
                    let mut j = 0;
                    while let Some(declarator) = member.child(j) {
                        j += 1;
                        if declarator.kind() == "variable_declarator" {
                            if let Some(n) = declarator.child_by_field("name") {
                                fields.push(n.text(source).to_string());
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Class, name.clone(), path, Language::Java).with_lines(item.start_line(), item.end_line());
    node.is_public = modifiers.iter().any(|m| m == "public");
    node.doc_comment = preceding_javadoc(item, source);
    node.package = package_name.map(|p| p.to_string());
    if !annotations.is_empty() {
        node = node.with_property("annotations", join_csv(&annotations));
    }
    if !modifiers.is_empty() {
        node.properties.insert("modifiers".to_string(), modifiers.join(" "));
    }
    if let Some(base) = &base {
        node = node.with_property("bases", base.clone());
        node = node.with_property("extends", base.clone());
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
    contains(result, container_id, &id);

    if let Some(base) = &base {
        let base_id = node_id(NodeKind::Class.as_str(), path, base);
        result.edges.push(Edge::new(edge_id(EdgeKind::Implements.as_str(), &id, &base_id, ""), EdgeKind::Implements, id.clone(), base_id));
    }
    for iface in &implemented {
        let iface_id = node_id(NodeKind::Interface.as_str(), path, iface);
        result.edges.push(Edge::new(edge_id(EdgeKind::Implements.as_str(), &id, &iface_id, ""), EdgeKind::Implements, id.clone(), iface_id));
    }

    classes.insert(name.clone(), ClassInfo { id: id.clone(), methods });

    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if matches!(member.kind(), "method_declaration" | "constructor_declaration") {
                if let Some((method_id, method_name)) = extract_method(member, source, path, &id, &name, is_test_file, result) {
                    funcs.insert(format!("{name}.{method_name}"), method_id.clone());
                    routine_spans.push(RoutineSpan { start: member.start_line(), end: member.end_line(), id: method_id });
                    receiver_spans.push(ReceiverSpan { start: member.start_line(), end: member.end_line(), receiver: name.clone() });
                }
            }
        }
    }
}

fn extract_method<'t, N: SyntaxNode<'t>>(
    item: N,
    source: &[u8],
    path: &str,
    owner_id: &str,
    owner_name: &str,
    is_test_file: bool,
    result: &mut ExtractionResult,
) -> Option<(String, String)> {
    let name_node = item.child_by_field("name")?;
    let name = name_node.text(source).to_string();
    let local_key = format!("{owner_name}.{name}");

    let (annotations, modifiers) = helpers::find_modifiers(item).map(|m| helpers::read_modifiers(m, source)).unwrap_or_default();
    let is_test_routine = is_test_file && helpers::has_annotation(&annotations, "Test");
    let kind = if is_test_routine { NodeKind::TestFunction } else { NodeKind::Method };
    let id = node_id(kind.as_str(), path, &local_key);

    let params = item.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();
    let return_type = item.child_by_field("type").map(|r| r.text(source).to_string());
    let signature = match &return_type {
        Some(ret) => format!("{name}{params} -> {ret}"),
        None => format!("{name}{params}"),
    };

    let mut node = Node::new(id.clone(), kind, name.clone(), path, Language::Java).with_lines(item.start_line(), item.end_line()).with_signature(signature);
    node.is_public = modifiers.iter().any(|m| m == "public");
    node.doc_comment = preceding_javadoc(item, source);
    node = node.with_property("receiver", owner_name);
    if !annotations.is_empty() {
        node = node.with_property("annotations", join_csv(&annotations));
        if let Some((http_method, path_value)) = route_from_annotations(item, source, &annotations) {
            node = node.with_property("http_method", http_method).with_property("path", path_value).with_property("kind_hint", "route");
        }
    }
    if !modifiers.is_empty() {
        node.properties.insert("modifiers".to_string(), modifiers.join(" "));
    }
    if is_test_routine {
        node = node.with_property("test_type", "annotation");
    }
    result.nodes.push(node);
    contains(result, owner_id, &id);
    Some((id, name))
}

/// Best-effort Spring route extraction: a `@GetMapping`/`@PostMapping`/.../
/// `@RequestMapping` annotation whose single string-literal argument is the
/// path.
fn route_from_annotations<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], annotation_names: &[String]) -> Option<(String, String)> {
    let wanted = ROUTE_ANNOTATIONS.iter().find(|(name, _)| annotation_names.iter().any(|a| a == name))?;
    let modifiers = helpers::find_modifiers(item)?;
    let mut i = 0;
    while let Some(child) = modifiers.child(i) {
        i += 1;
        if child.kind() != "annotation" {
            continue;
        }
        let Some(name) = child.child_by_field("name") else { continue };
        if name.text(source) != wanted.0 {
            continue;
        }
        let Some(args) = child.child_by_field("arguments") else { continue };
        if let Some(first) = args.named_child(0) {
            if let Some(path_value) = extract_url_literal(first, source, &URL_KINDS) {
                return Some((wanted.1.to_string(), path_value));
            }
        }
    }
    Some((wanted.1.to_string(), String::new()))
}

fn extract_interface<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], path: &str, container_id: &str, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Interface.as_str(), path, &name);

    let mut methods = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if member.kind() == "method_declaration" {
                if let Some(n) = member.child_by_field("name") {
                    methods.push(n.text(source).to_string());
                }
            }
        }
    }

    let (annotations, modifiers) = helpers::find_modifiers(item).map(|m| helpers::read_modifiers(m, source)).unwrap_or_default();
    let mut node = Node::new(id.clone(), NodeKind::Interface, name, path, Language::Java).with_lines(item.start_line(), item.end_line());
    node.is_public = modifiers.iter().any(|m| m == "public");
    if !annotations.is_empty() {
        node = node.with_property("annotations", join_csv(&annotations));
    }
    if !methods.is_empty() {
        node = node.with_property("methods", join_csv(&methods));
    }
    result.nodes.push(node);
    contains(result, container_id, &id);
}

fn extract_enum<'t, N: SyntaxNode<'t>>(item: N, source: &[u8], path: &str, container_id: &str, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Enum.as_str(), path, &name);

    let mut constants = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if member.kind() == "enum_constant" {
                if let Some(n) = member.child_by_field("name") {
                    constants.push(n.text(source).to_string());
                }
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Enum, name, path, Language::Java).with_lines(item.start_line(), item.end_line());
    if !constants.is_empty() {
        node = node.with_property("constants", join_csv(&constants));
    }
    result.nodes.push(node);
    contains(result, container_id, &id);
}

#[allow(clippy::too_many_arguments)]
fn call_graph_pass<'t>(
    root: impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    container_id: &str,
    funcs: &HashMap<String, String>,
    imports: &HashMap<String, String>,
    classes: &HashMap<String, ClassInfo>,
    routine_spans: &[RoutineSpan],
    receiver_spans: &[ReceiverSpan],
    result: &mut ExtractionResult,
) {
    walk(root, &mut |node| {
        if node.kind() != "method_invocation" {
            return;
        }
        let Some(name_node) = node.child_by_field("name") else { return };
        let method_name = name_node.text(source).to_string();
        let caller_id = enclosing_routine(node.start_line(), routine_spans, container_id);
        let arguments = node.child_by_field("arguments");

        let Some(object) = node.child_by_field("object") else {
            // Unqualified call: same-class method.
            if let Some(receiver) = enclosing_receiver(node.start_line(), receiver_spans) {
                if let Some(target) = funcs.get(&format!("{receiver}.{method_name}")) {
                    emit_call(result, &caller_id, target, None);
                }
            }
            return;
        };

        let object_name = base_identifier(object, source);

        if REST_TEMPLATE_METHODS.contains(&method_name.as_str()) && object_name.to_ascii_lowercase().contains("resttemplate") {
            if let Some(args) = arguments {
                if let Some(url) = args.named_child(0).and_then(|a| extract_url_literal(a, source, &URL_KINDS)) {
                    emit_api_call(result, path, &caller_id, "spring-resttemplate", "UNKNOWN", &url);
                    return;
                }
            }
        }

        if matches!(object_name.as_str(), "this") {
            if let Some(receiver) = enclosing_receiver(node.start_line(), receiver_spans) {
                if let Some(target) = funcs.get(&format!("{receiver}.{method_name}")) {
                    emit_call(result, &caller_id, target, None);
                }
            }
            return;
        }

        // No local-variable-to-type tracking: a call through a variable only
        // resolves when the variable happens to be named after its class.
        if let Some(info) = classes.get(&object_name) {
            if info.methods.contains(&method_name) {
                emit_call(result, &caller_id, &info.id, Some(&method_name));
                return;
            }
        }

        if let Some(dep) = imports.get(&object_name) {
            emit_call(result, &caller_id, dep, Some(&method_name));
        }
    });
}

fn base_identifier<'t>(node: impl SyntaxNode<'t>, source: &[u8]) -> String {
    match node.kind() {
        "identifier" | "this" => node.text(source).to_string(),
        "field_access" => node.child_by_field("object").map(|o| base_identifier(o, source)).unwrap_or_default(),
        _ => node.text(source).to_string(),
    }
}

fn enclosing_routine(line: u32, spans: &[RoutineSpan], container_id: &str) -> String {
    spans.iter().filter(|s| s.start <= line && line <= s.end).min_by_key(|s| s.end - s.start).map(|s| s.id.clone()).unwrap_or_else(|| container_id.to_string())
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
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, format!("{method} {url}"), path, Language::Java)
        .with_property("kind", "api_call")
        .with_property("http_method", method)
        .with_property("path", url)
        .with_property("framework", framework);
    result.nodes.push(dep);
    emit_call(result, caller_id, &dep_id, None);
}
