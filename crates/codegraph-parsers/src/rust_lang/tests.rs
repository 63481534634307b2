use super::*;
use codegraph_core::model::NodeKind;

fn extract_source(path: &str, source: &str) -> ExtractionResult {
    RustExtractor::new().parse_file(path, source.as_bytes()).expect("valid rust source")
}

#[test]
fn emits_module_and_file_nodes() {
    let result = extract_source("src/lib.rs", "pub fn greet() {}\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::File));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Module));
}

#[test]
fn test_file_suffix_upgrades_file_kind() {
    let result = extract_source("src/parser_test.rs", "fn helper() {}\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::TestFile));
}

#[test]
fn test_routine_prefix_only_upgrades_inside_test_file() {
    let in_test = extract_source("src/parser_test.rs", "fn TestParse() {}\n");
    let func = in_test.nodes.iter().find(|n| n.name == "TestParse").unwrap();
    assert_eq!(func.kind, NodeKind::TestFunction);

    let outside_test = extract_source("src/parser.rs", "fn TestParse() {}\n");
    let func = outside_test.nodes.iter().find(|n| n.name == "TestParse").unwrap();
    assert_eq!(func.kind, NodeKind::Function);
}

#[test]
fn struct_fields_and_visibility_are_captured() {
    let result = extract_source("src/model.rs", "pub struct Item { pub name: String, count: u32 }\n");
    let item = result.nodes.iter().find(|n| n.name == "Item").unwrap();
    assert_eq!(item.kind, NodeKind::Struct);
    assert!(item.is_public);
    assert_eq!(item.prop("fields"), Some("name, count"));
}

#[test]
fn doc_comment_is_attached_to_the_following_item() {
    let source = "/// Describes an item.\n/// Second line.\npub struct Item;\n";
    let result = extract_source("src/model.rs", source);
    let item = result.nodes.iter().find(|n| n.name == "Item").unwrap();
    assert_eq!(item.doc_comment.as_deref(), Some("Describes an item.\nSecond line."));
}

#[test]
fn use_declaration_emits_dependency_and_imports_edge() {
    let source = "use std::collections::HashMap;\n";
    let result = extract_source("src/lib.rs", source);
    let dep = result.nodes.iter().find(|n| n.kind == NodeKind::Dependency).unwrap();
    assert_eq!(dep.prop("kind"), Some("import"));
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Imports && e.target == dep.id));
}

#[test]
fn grouped_use_flattens_to_one_dependency_per_leaf() {
    let source = "use std::fmt::{Display, Debug};\n";
    let result = extract_source("src/lib.rs", source);
    let deps: Vec<_> = result.nodes.iter().filter(|n| n.kind == NodeKind::Dependency).collect();
    assert_eq!(deps.len(), 2);
    assert!(deps.iter().any(|d| d.name == "std::fmt::Display"));
    assert!(deps.iter().any(|d| d.name == "std::fmt::Debug"));
}

#[test]
fn structural_interface_satisfaction_links_inherent_impl() {
    let source = r#"
trait Processor {
    fn process(&self, input: String);
    fn reset(&self);
}

struct Item;

impl Item {
    fn process(&self, input: String) {}
    fn reset(&self) {}
    fn to_string(&self) -> String { String::new() }
}
"#;
    let result = extract_source("src/pipeline.rs", source);
    let item = result.nodes.iter().find(|n| n.name == "Item" && n.kind == NodeKind::Struct).unwrap();
    let processor = result.nodes.iter().find(|n| n.name == "Processor").unwrap();
    let implements: Vec<_> = result
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Implements && e.source == item.id)
        .collect();
    assert_eq!(implements.len(), 1);
    assert_eq!(implements[0].target, processor.id);
}

#[test]
fn explicit_trait_impl_emits_implements_edge() {
    let source = r#"
trait Greeter {
    fn greet(&self);
}

struct Bot;

impl Greeter for Bot {
    fn greet(&self) {}
}
"#;
    let result = extract_source("src/greet.rs", source);
    let bot = result.nodes.iter().find(|n| n.name == "Bot").unwrap();
    let greeter = result.nodes.iter().find(|n| n.name == "Greeter").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Implements && e.source == bot.id && e.target == greeter.id));
}

#[test]
fn method_call_through_field_chain_resolves_to_local_method() {
    let source = r#"
struct Logger;
impl Logger {
    fn info(&self) {}
}

struct Inner {
    logger: Logger,
}

struct Linker {
    inner: Inner,
}

impl Linker {
    fn deep_chain(&self) {
        self.inner.logger.info();
    }
}
"#;
    let result = extract_source("src/linker.rs", source);
    let info = result.nodes.iter().find(|n| n.name == "info").unwrap();
    let deep_chain = result.nodes.iter().find(|n| n.name == "deep_chain").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == deep_chain.id && e.target == info.id));
}

#[test]
fn bare_function_call_resolves_within_same_file() {
    let source = "fn helper() {}\nfn run() { helper(); }\n";
    let result = extract_source("src/lib.rs", source);
    let helper = result.nodes.iter().find(|n| n.name == "helper").unwrap();
    let run = result.nodes.iter().find(|n| n.name == "run").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == run.id && e.target == helper.id));
}
