//! Structural and call-graph extraction for the self-hosting language (Rust)
//! of this workspace. Unlike the other extractors, this one also runs the
//! structural interface-satisfaction pass (§4.2.1 step 5): Rust impl blocks
//! always name their trait explicitly, so that pass mostly re-derives what
//! explicit `impl Trait for Type` blocks already say, but it is kept exactly
//! as specified so a struct whose inherent methods happen to cover a
//! trait's method set is also linked, duck-typing style.

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
    string_kinds: &["string_literal", "raw_string_literal"],
    template_kinds: &[],
    concat_kinds: &["binary_expression"],
};

pub struct RustExtractor;

impl RustExtractor {
    pub fn new() -> Self {
        RustExtractor
    }
}

impl Default for RustExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for RustExtractor {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".rs"]
    }

    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let tree = treesitter::parse(Language::Rust, path, bytes)?;
        let root = tree.root_node();
        Ok(extract(path, bytes, root))
    }
}

/// One struct or trait's accumulated structural evidence, built while
/// walking top-level items and consulted once every item has been seen.
#[derive(Default)]
struct TypeInfo {
    node_id: String,
    kind: NodeKind,
    methods: Vec<String>,
}

/// A routine's source span paired with its node ID, so a call site found
/// anywhere inside that span can be attributed to the right caller without
/// re-deriving the routine's local key from the syntax tree alone.
struct RoutineSpan {
    start: u32,
    end: u32,
    id: String,
}

/// A method's source span paired with the simple name of its receiver type,
/// consulted when resolving `self.field...method()` call chains.
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
    result.nodes.push(Node::new(file_id.clone(), file_kind, path, path, Language::Rust));

    let module_name = path.trim_end_matches(".rs").rsplit('/').next().unwrap_or(path).to_string();
    let module_id = node_id(NodeKind::Module.as_str(), path, path);
    result.nodes.push(Node::new(module_id.clone(), NodeKind::Module, module_name, path, Language::Rust));
    contains(&mut result, &file_id, &module_id);

    let mut types: HashMap<String, TypeInfo> = HashMap::new();
    let mut field_types: HashMap<(String, String), String> = HashMap::new();
    let mut funcs: HashMap<String, String> = HashMap::new();
    let mut imports: HashMap<String, String> = HashMap::new();
    let mut routine_spans: Vec<RoutineSpan> = Vec::new();
    let mut receiver_spans: Vec<ReceiverSpan> = Vec::new();

    // Phase A: top-level declarations except impl blocks (so impl-block
    // processing in phase B can look type nodes up by name).
    let mut i = 0;
    while let Some(item) = root.child(i) {
        i += 1;
        match item.kind() {
            "use_declaration" => extract_use(&item, source, path, &module_id, &mut result, &mut imports),
            "struct_item" => extract_struct(&item, source, path, &module_id, &mut result, &mut types, &mut field_types),
            "enum_item" => extract_enum(&item, source, path, &module_id, &mut result, &mut types),
            "trait_item" => extract_trait(&item, source, path, &module_id, &mut result, &mut types),
            "type_item" => extract_type_alias(&item, source, path, &module_id, &mut result),
            "const_item" | "static_item" => extract_binding(&item, source, path, &module_id, &mut result),
            "function_item" => {
                if let Some((fn_id, name)) = extract_function(&item, source, path, &module_id, None, is_test_file, &mut result) {
                    funcs.insert(name, fn_id.clone());
                    routine_spans.push(RoutineSpan { start: item.start_line(), end: item.end_line(), id: fn_id });
                }
            }
            _ => {}
        }
    }

    // Phase B: impl blocks, now that every struct/trait node exists.
    let mut i = 0;
    while let Some(item) = root.child(i) {
        i += 1;
        if item.kind() == "impl_item" {
            extract_impl(
                &item,
                source,
                path,
                &module_id,
                is_test_file,
                &mut result,
                &mut types,
                &mut funcs,
                &mut routine_spans,
                &mut receiver_spans,
            );
        }
    }

    satisfy_interfaces(&types, &mut result, path);

    call_graph_pass(root, source, path, &module_id, &funcs, &imports, &field_types, &types, &routine_spans, &receiver_spans, &mut result);

    result
}

fn contains(result: &mut ExtractionResult, parent: &str, child: &str) {
    let id = edge_id(EdgeKind::Contains.as_str(), parent, child, "");
    result.edges.push(Edge::new(id, EdgeKind::Contains, parent, child));
}

fn has_visibility_modifier<'t, N: SyntaxNode<'t>>(node: N) -> bool {
    let mut i = 0;
    while let Some(child) = node.child(i) {
        if child.kind() == "visibility_modifier" {
            return true;
        }
        i += 1;
    }
    false
}

fn has_async_marker<'t, N: SyntaxNode<'t>>(node: N) -> bool {
    let mut i = 0;
    while let Some(child) = node.child(i) {
        if child.kind() == "async" {
            return true;
        }
        i += 1;
    }
    false
}

fn extract_use<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    result: &mut ExtractionResult,
    imports: &mut HashMap<String, String>,
) {
    let mut clauses = Vec::new();
    let mut i = 0;
    while let Some(child) = item.child(i) {
        i += 1;
        if child.kind() == ";" || child.kind() == "use" {
            continue;
        }
        flatten_use_clause(child, source, String::new(), &mut clauses);
    }

    for (full_path, binding) in clauses {
        let dep_id = node_id(NodeKind::Dependency.as_str(), path, &full_path);
        let dep = Node::new(dep_id.clone(), NodeKind::Dependency, full_path.clone(), path, Language::Rust).with_property("kind", "import");
        result.nodes.push(dep);
        contains(result, module_id, &dep_id);
        let edge = Edge::new(edge_id(EdgeKind::Imports.as_str(), module_id, &dep_id, ""), EdgeKind::Imports, module_id, &dep_id);
        result.edges.push(edge);

        if let Some(name) = binding {
            imports.insert(name, dep_id.clone());
        }
        if let Some(last) = full_path.rsplit("::").next() {
            imports.entry(last.to_string()).or_insert_with(|| dep_id.clone());
        }
    }
}

/// Recursively flattens a `use` clause into `(full_path, local_binding)`
/// pairs. `prefix` is the scope path accumulated so far from enclosing
/// `scoped_use_list`/`use_as_clause` wrappers.
fn flatten_use_clause<'t>(node: impl SyntaxNode<'t>, source: &[u8], prefix: String, out: &mut Vec<(String, Option<String>)>) {
    match node.kind() {
        "identifier" | "self" => {
            let name = node.text(source).to_string();
            let full = join_path(&prefix, &name);
            out.push((full, Some(name)));
        }
        "scoped_identifier" => {
            let text = node.text(source).to_string();
            let binding = text.rsplit("::").next().map(|s| s.to_string());
            out.push((join_path(&prefix, &text), binding));
        }
        "use_as_clause" => {
            let Some(path_node) = node.child_by_field("path") else { return };
            let Some(alias_node) = node.child_by_field("alias") else { return };
            let alias = alias_node.text(source).to_string();
            let base = path_node.text(source).to_string();
            out.push((join_path(&prefix, &base), Some(alias)));
        }
        "use_wildcard" => {
            if let Some(path_node) = node.child_by_field("path") {
                let base = path_node.text(source).to_string();
                out.push((join_path(&prefix, &base), None));
            }
        }
        "scoped_use_list" => {
            let base_prefix = node
                .child_by_field("path")
                .map(|p| join_path(&prefix, p.text(source)))
                .unwrap_or(prefix);
            if let Some(list) = node.child_by_field("list") {
                flatten_use_clause(list, source, base_prefix, out);
            }
        }
        "use_list" => {
            let mut i = 0;
            while let Some(child) = node.child(i) {
                i += 1;
                if child.kind() == "," || child.kind() == "{" || child.kind() == "}" {
                    continue;
                }
                flatten_use_clause(child, source, prefix.clone(), out);
            }
        }
        _ => {}
    }
}

fn join_path(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{prefix}::{suffix}")
    }
}

fn extract_struct<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    result: &mut ExtractionResult,
    types: &mut HashMap<String, TypeInfo>,
    field_types: &mut HashMap<(String, String), String>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Struct.as_str(), path, &name);

    let mut fields = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        if body.kind() == "field_declaration_list" {
            let mut i = 0;
            while let Some(field) = body.child(i) {
                i += 1;
                if field.kind() != "field_declaration" {
                    continue;
                }
                let Some(fname_node) = field.child_by_field("name") else { continue };
                let fname = fname_node.text(source).to_string();
                if let Some(ftype_node) = field.child_by_field("type") {
                    let ftype = simple_type_name(ftype_node.text(source));
                    field_types.insert((name.clone(), fname.clone()), ftype);
                }
                fields.push(fname);
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Struct, name.clone(), path, Language::Rust).with_lines(item.start_line(), item.end_line());
    node.is_public = has_visibility_modifier(*item);
    node.doc_comment = helpers::preceding_doc_comment(*item, source);
    if !fields.is_empty() {
        node = node.with_property("fields", join_csv(&fields));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);

    types.insert(name, TypeInfo { node_id: id, kind: NodeKind::Struct, methods: Vec::new() });
}

fn extract_enum<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    result: &mut ExtractionResult,
    types: &mut HashMap<String, TypeInfo>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Enum.as_str(), path, &name);

    let mut variants = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(variant) = body.child(i) {
            i += 1;
            if variant.kind() != "enum_variant" {
                continue;
            }
            if let Some(vname) = variant.child_by_field("name") {
                variants.push(vname.text(source).to_string());
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Enum, name.clone(), path, Language::Rust).with_lines(item.start_line(), item.end_line());
    node.is_public = has_visibility_modifier(*item);
    node.doc_comment = helpers::preceding_doc_comment(*item, source);
    if !variants.is_empty() {
        node = node.with_property("constants", join_csv(&variants));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);

    types.insert(name, TypeInfo { node_id: id, kind: NodeKind::Enum, methods: Vec::new() });
}

fn extract_trait<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    result: &mut ExtractionResult,
    types: &mut HashMap<String, TypeInfo>,
) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Interface.as_str(), path, &name);

    let mut methods = Vec::new();
    if let Some(body) = item.child_by_field("body") {
        let mut i = 0;
        while let Some(member) = body.child(i) {
            i += 1;
            if member.kind() != "function_item" && member.kind() != "function_signature_item" {
                continue;
            }
            if let Some(mname) = member.child_by_field("name") {
                methods.push(mname.text(source).to_string());
            }
        }
    }

    let mut node = Node::new(id.clone(), NodeKind::Interface, name.clone(), path, Language::Rust).with_lines(item.start_line(), item.end_line());
    node.is_public = has_visibility_modifier(*item);
    node.doc_comment = helpers::preceding_doc_comment(*item, source);
    if !methods.is_empty() {
        node = node.with_property("methods", join_csv(&methods));
    }
    result.nodes.push(node);
    contains(result, module_id, &id);

    types.insert(name, TypeInfo { node_id: id, kind: NodeKind::Interface, methods });
}

fn extract_type_alias<'t>(item: &impl SyntaxNode<'t>, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    let id = node_id(NodeKind::Type.as_str(), path, &name);
    let mut node = Node::new(id.clone(), NodeKind::Type, name, path, Language::Rust).with_lines(item.start_line(), item.end_line());
    node.is_public = has_visibility_modifier(*item);
    result.nodes.push(node);
    contains(result, module_id, &id);
}

fn extract_binding<'t>(item: &impl SyntaxNode<'t>, source: &[u8], path: &str, module_id: &str, result: &mut ExtractionResult) {
    let Some(name_node) = item.child_by_field("name") else { return };
    let name = name_node.text(source).to_string();
    // `const`/`static` are always a declaration-keyword distinction in Rust:
    // both map to `Constant`.
    let id = node_id(NodeKind::Constant.as_str(), path, &name);
    let mut node = Node::new(id.clone(), NodeKind::Constant, name, path, Language::Rust).with_lines(item.start_line(), item.end_line());
    node.is_public = has_visibility_modifier(*item);
    node.doc_comment = helpers::preceding_doc_comment(*item, source);
    result.nodes.push(node);
    contains(result, module_id, &id);
}

fn extract_function<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    container_id: &str,
    receiver: Option<&str>,
    in_test_file: bool,
    result: &mut ExtractionResult,
) -> Option<(String, String)> {
    let name_node = item.child_by_field("name")?;
    let name = name_node.text(source).to_string();

    let params = item.child_by_field("parameters").map(|p| p.text(source).to_string()).unwrap_or_default();
    let return_type = item.child_by_field("return_type").map(|r| r.text(source).to_string());
    let signature = match &return_type {
        Some(ret) => format!("{name}{params} -> {ret}"),
        None => format!("{name}{params}"),
    };

    let local_key = match receiver {
        Some(recv) => format!("{recv}.{name}"),
        None => name.clone(),
    };
    let kind = if receiver.is_some() {
        NodeKind::Method
    } else if in_test_file && helpers::test_routine_prefix(&name).is_some() {
        NodeKind::TestFunction
    } else {
        NodeKind::Function
    };
    let id = node_id(kind.as_str(), path, &local_key);

    let mut node = Node::new(id.clone(), kind, name.clone(), path, Language::Rust).with_lines(item.start_line(), item.end_line()).with_signature(signature);
    node.is_public = has_visibility_modifier(*item);
    node.doc_comment = helpers::preceding_doc_comment(*item, source);
    if has_async_marker(*item) {
        node = node.with_property("async", "true");
    }
    if let Some(recv) = receiver {
        node = node.with_property("receiver", recv);
    }
    if kind == NodeKind::TestFunction {
        if let Some(tag) = helpers::test_routine_prefix(&name) {
            node = node.with_property("test_type", tag);
        }
    }
    result.nodes.push(node);
    contains(result, container_id, &id);

    Some((id, name))
}

#[allow(clippy::too_many_arguments)]
fn extract_impl<'t>(
    item: &impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    in_test_file: bool,
    result: &mut ExtractionResult,
    types: &mut HashMap<String, TypeInfo>,
    funcs: &mut HashMap<String, String>,
    routine_spans: &mut Vec<RoutineSpan>,
    receiver_spans: &mut Vec<ReceiverSpan>,
) {
    let Some(type_node) = item.child_by_field("type") else { return };
    let type_name = simple_type_name(type_node.text(source));
    let trait_name = item.child_by_field("trait").map(|t| simple_type_name(t.text(source)));

    let Some(body) = item.child_by_field("body") else { return };
    let owner_id = types.get(&type_name).map(|t| t.node_id.clone());
    let container_id = owner_id.clone().unwrap_or_else(|| module_id.to_string());

    let mut method_names = Vec::new();
    let mut i = 0;
    while let Some(member) = body.child(i) {
        i += 1;
        if member.kind() != "function_item" {
            continue;
        }
        if let Some((fn_id, name)) = extract_function(&member, source, path, &container_id, Some(&type_name), in_test_file, result) {
            method_names.push(name.clone());
            funcs.insert(format!("{type_name}::{name}"), fn_id.clone());
            routine_spans.push(RoutineSpan { start: member.start_line(), end: member.end_line(), id: fn_id });
            receiver_spans.push(ReceiverSpan { start: member.start_line(), end: member.end_line(), receiver: type_name.clone() });
        }
    }

    if let Some(info) = types.get_mut(&type_name) {
        info.methods.extend(method_names.iter().cloned());
    }

    if let (Some(trait_name), Some(owner_id)) = (trait_name, owner_id) {
        let interface_id = node_id(NodeKind::Interface.as_str(), path, &trait_name);
        let edge = Edge::new(edge_id(EdgeKind::Implements.as_str(), &owner_id, &interface_id, ""), EdgeKind::Implements, owner_id, interface_id);
        result.edges.push(edge);
    }
}

/// Step 5: structural interface-satisfaction pass, independent of any
/// explicit `impl Trait for Type`.
fn satisfy_interfaces(types: &HashMap<String, TypeInfo>, result: &mut ExtractionResult, path: &str) {
    let traits: Vec<(String, Vec<String>)> = types
        .iter()
        .filter(|(_, info)| info.kind == NodeKind::Interface)
        .map(|(name, info)| (name.clone(), info.methods.clone()))
        .collect();

    for info in types.values() {
        if info.kind != NodeKind::Struct {
            continue;
        }
        for (trait_name, required) in &traits {
            if required.is_empty() {
                continue;
            }
            let covers = required.iter().all(|m| info.methods.iter().any(|own| own == m));
            if !covers {
                continue;
            }
            let interface_id = node_id(NodeKind::Interface.as_str(), path, trait_name);
            let explicit = edge_id(EdgeKind::Implements.as_str(), &info.node_id, &interface_id, "");
            if result.edges.iter().any(|e| e.id == explicit) {
                continue;
            }
            let eid = edge_id(EdgeKind::Implements.as_str(), &info.node_id, &interface_id, "satisfaction");
            if result.edges.iter().any(|e| e.id == eid) {
                continue;
            }
            result.edges.push(Edge::new(eid, EdgeKind::Implements, info.node_id.clone(), interface_id));
        }
    }
}

fn simple_type_name(text: &str) -> String {
    let trimmed = text.trim().trim_start_matches('&').trim_start_matches("mut ").trim();
    let without_generics = trimmed.split('<').next().unwrap_or(trimmed);
    without_generics.rsplit("::").next().unwrap_or(without_generics).trim().to_string()
}

#[allow(clippy::too_many_arguments)]
fn call_graph_pass<'t>(
    root: impl SyntaxNode<'t>,
    source: &[u8],
    path: &str,
    module_id: &str,
    funcs: &HashMap<String, String>,
    imports: &HashMap<String, String>,
    field_types: &HashMap<(String, String), String>,
    types: &HashMap<String, TypeInfo>,
    routine_spans: &[RoutineSpan],
    receiver_spans: &[ReceiverSpan],
    result: &mut ExtractionResult,
) {
    walk(root, &mut |node| {
        if node.kind() != "call_expression" {
            return;
        }
        let Some(function) = node.child_by_field("function") else { return };
        let caller_id = enclosing_routine(node.start_line(), routine_spans, module_id);
        let receiver = enclosing_receiver(node.start_line(), receiver_spans);

        if function.kind() == "field_expression" {
            let Some(value) = function.child_by_field("value") else { return };
            let Some(field) = function.child_by_field("field") else { return };
            let method = field.text(source).to_string();

            if let Some(arguments) = node.child_by_field("arguments") {
                if let Some(url) = first_url_argument(arguments, source) {
                    let base_name = base_identifier(value, source);
                    if looks_like_http_client_name(&base_name) {
                        emit_api_call(result, path, &caller_id, "http_client", "UNKNOWN", &url, &method);
                        return;
                    }
                }
            }

            if value.kind() == "self" {
                if let Some(recv) = &receiver {
                    if let Some(info) = types.get(recv) {
                        if info.methods.iter().any(|m| m == &method) {
                            if let Some(target) = funcs.get(&format!("{recv}::{method}")) {
                                emit_call(result, &caller_id, target, None);
                            }
                        }
                    }
                }
                return;
            }

            let base = base_identifier(value, source);
            if let Some(dep) = imports.get(&base) {
                emit_call(result, &caller_id, dep, Some(&method));
                return;
            }

            // Field-chain resolution: `recv.field.method()` or deeper,
            // rooted at `self` inside a method body.
            if let Some(recv) = &receiver {
                if let Some((final_type, is_local)) = resolve_field_chain(value, source, recv, field_types) {
                    if is_local {
                        if let Some(target) = funcs.get(&format!("{final_type}::{method}")) {
                            emit_call(result, &caller_id, target, None);
                        }
                    } else if let Some(dep) = imports.get(&final_type) {
                        emit_call(result, &caller_id, dep, Some(&format!("{final_type}.{method}")));
                    }
                }
            }
        } else if function.kind() == "identifier" {
            let name = function.text(source).to_string();
            if helpers::is_builtin(&name) {
                return;
            }
            if let Some(target) = funcs.get(&name) {
                emit_call(result, &caller_id, target, None);
            } else if let Some(dep) = imports.get(&name) {
                emit_call(result, &caller_id, dep, Some(&name));
            }
        } else if function.kind() == "scoped_identifier" {
            let text = function.text(source).to_string();
            let Some(pkg) = text.split("::").next() else { return };
            if let Some(dep) = imports.get(pkg) {
                let callee = text.rsplit("::").next().unwrap_or(&text);
                emit_call(result, &caller_id, dep, Some(callee));
            }
        }
    });
}

/// Finds the routine whose span most tightly encloses `line` (the smallest
/// such span — relevant for nested closures inside a method body, which
/// still attribute their calls to the enclosing named routine). Falls back
/// to the module container for a call at the top level of the file.
fn enclosing_routine(line: u32, spans: &[RoutineSpan], module_id: &str) -> String {
    spans
        .iter()
        .filter(|s| s.start <= line && line <= s.end)
        .min_by_key(|s| s.end - s.start)
        .map(|s| s.id.clone())
        .unwrap_or_else(|| module_id.to_string())
}

fn enclosing_receiver(line: u32, spans: &[ReceiverSpan]) -> Option<String> {
    spans.iter().filter(|s| s.start <= line && line <= s.end).min_by_key(|s| s.end - s.start).map(|s| s.receiver.clone())
}

fn first_url_argument<'t>(arguments: impl SyntaxNode<'t>, source: &[u8]) -> Option<String> {
    let first = arguments.named_child(0)?;
    extract_url_literal(first, source, &URL_KINDS)
}

fn base_identifier<'t>(node: impl SyntaxNode<'t>, source: &[u8]) -> String {
    match node.kind() {
        "identifier" | "self" => node.text(source).to_string(),
        "field_expression" => node.child_by_field("value").map(|v| base_identifier(v, source)).unwrap_or_default(),
        _ => node.text(source).to_string(),
    }
}

/// Resolves a (possibly multi-hop) field-access chain rooted at `self` to
/// the final field's declared type, per `field_types`. Returns the type
/// name and whether it is a known local struct.
fn resolve_field_chain<'t>(node: impl SyntaxNode<'t>, source: &[u8], recv: &str, field_types: &HashMap<(String, String), String>) -> Option<(String, bool)> {
    match node.kind() {
        "field_expression" => {
            let value = node.child_by_field("value")?;
            let field = node.child_by_field("field")?.text(source).to_string();
            let owner_type = if value.kind() == "self" {
                recv.to_string()
            } else {
                resolve_field_chain(value, source, recv, field_types).map(|(t, _)| t)?
            };
            let ty = field_types.get(&(owner_type, field))?.clone();
            let is_local = field_types.keys().any(|(t, _)| t == &ty);
            Some((ty, is_local))
        }
        _ => None,
    }
}

fn emit_call(result: &mut ExtractionResult, caller_id: &str, target_id: &str, callee: Option<&str>) {
    let eid = edge_id(EdgeKind::Calls.as_str(), caller_id, target_id, callee.unwrap_or(""));
    let mut edge = Edge::new(eid, EdgeKind::Calls, caller_id, target_id);
    if let Some(c) = callee {
        edge = edge.with_property("callee", c);
    }
    result.edges.push(edge);
}

fn emit_api_call(result: &mut ExtractionResult, path: &str, caller_id: &str, framework: &str, method: &str, url: &str, handler_method: &str) {
    let local_key = format!("{framework}:{method}:{url}");
    let dep_id = node_id(NodeKind::Dependency.as_str(), path, &local_key);
    let dep = Node::new(dep_id.clone(), NodeKind::Dependency, format!("{handler_method} {url}"), path, Language::Rust)
        .with_property("kind", "api_call")
        .with_property("http_method", method)
        .with_property("path", url)
        .with_property("framework", framework);
    result.nodes.push(dep);
    emit_call(result, caller_id, &dep_id, None);
}

#[cfg(test)]
mod tests;
