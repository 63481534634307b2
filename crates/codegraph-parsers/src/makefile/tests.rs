use super::*;
use codegraph_core::model::NodeKind;

fn extract_source(source: &str) -> ExtractionResult {
    MakefileExtractor::new().parse_file("Makefile", source.as_bytes()).expect("makefile text is always parseable")
}

#[test]
fn emits_file_and_module_nodes() {
    let result = extract_source("all: build\n\nbuild:\n\tgo build ./...\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::File));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Module));
}

#[test]
fn target_becomes_a_function_node() {
    let result = extract_source("build:\n\tgo build ./...\n");
    let build = result.nodes.iter().find(|n| n.name == "build").unwrap();
    assert_eq!(build.kind, NodeKind::Function);
}

#[test]
fn phony_target_is_tagged() {
    let source = ".PHONY: clean\n\nclean:\n\trm -rf dist\n";
    let result = extract_source(source);
    let clean = result.nodes.iter().find(|n| n.name == "clean").unwrap();
    assert_eq!(clean.prop("phony"), Some("true"));
}

#[test]
fn non_phony_target_has_no_phony_property() {
    let source = "build:\n\tgo build ./...\n";
    let result = extract_source(source);
    let build = result.nodes.iter().find(|n| n.name == "build").unwrap();
    assert_eq!(build.prop("phony"), None);
}

#[test]
fn prerequisites_emit_depends_on_edges() {
    let source = "all: build test\n\nbuild:\n\tgo build ./...\n\ntest:\n\tgo test ./...\n";
    let result = extract_source(source);
    let all = result.nodes.iter().find(|n| n.name == "all").unwrap();
    let build = result.nodes.iter().find(|n| n.name == "build").unwrap();
    let test = result.nodes.iter().find(|n| n.name == "test").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::DependsOn && e.source == all.id && e.target == build.id));
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::DependsOn && e.source == all.id && e.target == test.id));
}

#[test]
fn variable_assignment_lines_are_not_targets() {
    let source = "CC := gcc\nCFLAGS = -Wall\n\nbuild:\n\t$(CC) $(CFLAGS) -o app main.c\n";
    let result = extract_source(source);
    assert!(!result.nodes.iter().any(|n| n.name == "CC"));
    assert!(!result.nodes.iter().any(|n| n.name == "CFLAGS"));
    assert!(result.nodes.iter().any(|n| n.name == "build"));
}

#[test]
fn phony_declared_after_its_target_rule_still_tags_it() {
    let source = "clean:\n\trm -rf dist\n\n.PHONY: clean\n";
    let result = extract_source(source);
    let clean = result.nodes.iter().find(|n| n.name == "clean").unwrap();
    assert_eq!(clean.prop("phony"), Some("true"));
}

#[test]
fn multiple_targets_on_one_line_share_prerequisites() {
    let source = "foo bar: common\n\ncommon:\n\techo common\n";
    let result = extract_source(source);
    let foo = result.nodes.iter().find(|n| n.name == "foo").unwrap();
    let bar = result.nodes.iter().find(|n| n.name == "bar").unwrap();
    let common = result.nodes.iter().find(|n| n.name == "common").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::DependsOn && e.source == foo.id && e.target == common.id));
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::DependsOn && e.source == bar.id && e.target == common.id));
}
