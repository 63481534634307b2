use super::*;
use codegraph_core::model::NodeKind;

fn extract_source(path: &str, source: &str) -> ExtractionResult {
    PythonExtractor::new().parse_file(path, source.as_bytes()).expect("valid python source")
}

#[test]
fn emits_module_and_file_nodes() {
    let result = extract_source("app/models.py", "def greet():\n    pass\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::File));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Module));
}

#[test]
fn test_prefix_filename_upgrades_file_kind() {
    let result = extract_source("tests/test_models.py", "def helper():\n    pass\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::TestFile));
}

#[test]
fn test_prefix_routine_only_upgrades_inside_test_file() {
    let in_test = extract_source("tests/test_models.py", "def test_create_user():\n    pass\n");
    let func = in_test.nodes.iter().find(|n| n.name == "test_create_user").unwrap();
    assert_eq!(func.kind, NodeKind::TestFunction);

    let outside_test = extract_source("app/models.py", "def test_create_user():\n    pass\n");
    let func = outside_test.nodes.iter().find(|n| n.name == "test_create_user").unwrap();
    assert_eq!(func.kind, NodeKind::Function);
}

#[test]
fn class_captures_bases_decorators_and_methods() {
    let source = "@dataclass\nclass User(Base):\n    def save(self):\n        pass\n\n    def delete(self):\n        pass\n";
    let result = extract_source("app/models.py", source);
    let user = result.nodes.iter().find(|n| n.name == "User").unwrap();
    assert_eq!(user.kind, NodeKind::Class);
    assert_eq!(user.prop("decorators"), Some("dataclass"));
    assert_eq!(user.prop("bases"), Some("Base"));
    assert_eq!(user.prop("methods"), Some("save, delete"));
}

#[test]
fn class_base_emits_implements_edge() {
    let source = "class User(Base):\n    pass\n";
    let result = extract_source("app/models.py", source);
    let user = result.nodes.iter().find(|n| n.name == "User").unwrap();
    let base = result.nodes.iter().find(|n| n.name == "Base").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Implements && e.source == user.id && e.target == base.id));
}

#[test]
fn import_from_tracks_dependency() {
    let source = "from flask import Flask\n";
    let result = extract_source("app/server.py", source);
    let dep = result.nodes.iter().find(|n| n.kind == NodeKind::Dependency).unwrap();
    assert_eq!(dep.prop("kind"), Some("import"));
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Imports && e.target == dep.id));
}

#[test]
fn requests_get_call_emits_api_call_dependency() {
    let source = "def load():\n    requests.get('/api/profile')\n";
    let result = extract_source("app/client.py", source);
    let dep = result.nodes.iter().find(|n| n.prop("kind") == Some("api_call")).unwrap();
    assert_eq!(dep.prop("http_method"), Some("GET"));
    assert_eq!(dep.prop("path"), Some("/api/profile"));
    assert_eq!(dep.prop("framework"), Some("requests"));
    let load = result.nodes.iter().find(|n| n.name == "load").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == load.id && e.target == dep.id));
}

#[test]
fn self_method_call_resolves_within_class() {
    let source = "class Service:\n    def run(self):\n        self.helper()\n\n    def helper(self):\n        pass\n";
    let result = extract_source("app/service.py", source);
    let run = result.nodes.iter().find(|n| n.name == "run").unwrap();
    let helper = result.nodes.iter().find(|n| n.name == "helper").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == run.id && e.target == helper.id));
}

#[test]
fn module_level_uppercase_assignment_is_a_constant() {
    let source = "MAX_RETRIES = 3\n";
    let result = extract_source("app/config.py", source);
    let constant = result.nodes.iter().find(|n| n.name == "MAX_RETRIES").unwrap();
    assert_eq!(constant.kind, NodeKind::Constant);
}

#[test]
fn bare_function_call_resolves_within_same_file() {
    let source = "def helper():\n    pass\n\ndef run():\n    helper()\n";
    let result = extract_source("app/lib.py", source);
    let helper = result.nodes.iter().find(|n| n.name == "helper").unwrap();
    let run = result.nodes.iter().find(|n| n.name == "run").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == run.id && e.target == helper.id));
}
