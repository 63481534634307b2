use super::*;
use codegraph_core::model::NodeKind;

fn extract_source(path: &str, source: &str) -> ExtractionResult {
    TypeScriptExtractor::new().parse_file(path, source.as_bytes()).expect("valid ts/js source")
}

#[test]
fn emits_module_and_file_nodes() {
    let result = extract_source("src/index.ts", "export function greet() {}\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::File));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Module));
}

#[test]
fn spec_suffix_upgrades_file_kind() {
    let result = extract_source("src/app.spec.ts", "test('works', () => {});\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::TestFile));
}

#[test]
fn exported_class_captures_methods_and_implements() {
    let source = r#"
interface Shape {
    area(): number;
}

export class Circle implements Shape {
    radius: number;

    area(): number {
        return this.radius;
    }
}
"#;
    let result = extract_source("src/shapes.ts", source);
    let circle = result.nodes.iter().find(|n| n.name == "Circle").unwrap();
    assert_eq!(circle.kind, NodeKind::Class);
    assert!(circle.is_public);
    assert_eq!(circle.prop("implements"), Some("Shape"));

    let shape = result.nodes.iter().find(|n| n.name == "Shape" && n.kind == NodeKind::Interface).unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Implements && e.source == circle.id && e.target == shape.id));

    let area = result.nodes.iter().find(|n| n.name == "area" && n.kind == NodeKind::Method).unwrap();
    assert_eq!(area.prop("receiver"), Some("Circle"));
}

#[test]
fn decorator_is_captured_on_class() {
    let source = "@Injectable()\nexport class UserService {}\n";
    let result = extract_source("src/user.service.ts", source);
    let service = result.nodes.iter().find(|n| n.name == "UserService").unwrap();
    assert_eq!(service.prop("decorators"), Some("Injectable"));
}

#[test]
fn named_import_is_tracked_as_dependency() {
    let source = "import { readFile } from 'fs/promises';\n";
    let result = extract_source("src/io.ts", source);
    let dep = result.nodes.iter().find(|n| n.kind == NodeKind::Dependency).unwrap();
    assert_eq!(dep.name, "fs/promises");
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Imports && e.target == dep.id));
}

#[test]
fn express_route_registration_emits_api_endpoint() {
    let source = r#"
function listUsers(req, res) {}
app.get('/users', listUsers);
"#;
    let result = extract_source("src/server.js", source);
    let endpoint = result.nodes.iter().find(|n| n.kind == NodeKind::ApiEndpoint).unwrap();
    assert_eq!(endpoint.prop("http_method"), Some("GET"));
    assert_eq!(endpoint.prop("path"), Some("/users"));
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Exposes && e.target == endpoint.id));
}

#[test]
fn router_mount_emits_variable_node() {
    let source = "app.use('/api/users', usersRouter);\n";
    let result = extract_source("src/server.js", source);
    let mount = result.nodes.iter().find(|n| n.prop("kind") == Some("router_mount")).unwrap();
    assert_eq!(mount.prop("prefix"), Some("/api/users"));
    assert_eq!(mount.prop("handler"), Some("usersRouter"));
}

#[test]
fn fetch_call_emits_api_call_dependency() {
    let source = r#"
function load() {
    fetch('/api/profile');
}
"#;
    let result = extract_source("src/client.ts", source);
    let dep = result.nodes.iter().find(|n| n.prop("kind") == Some("api_call")).unwrap();
    assert_eq!(dep.prop("path"), Some("/api/profile"));
    let load = result.nodes.iter().find(|n| n.name == "load").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == load.id && e.target == dep.id));
}

#[test]
fn bdd_test_block_emits_test_function_in_test_file() {
    let source = "describe('widget', () => {\n  it('renders', () => {});\n});\n";
    let result = extract_source("src/widget.test.ts", source);
    let tests: Vec<_> = result.nodes.iter().filter(|n| n.kind == NodeKind::TestFunction).collect();
    assert_eq!(tests.len(), 2);
    assert!(tests.iter().any(|t| t.name == "widget"));
    assert!(tests.iter().any(|t| t.name == "renders"));
}

#[test]
fn arrow_function_with_jsx_is_tagged_as_component() {
    let source = "export const Button = () => <button>Click</button>;\n";
    let result = extract_source("src/Button.tsx", source);
    let button = result.nodes.iter().find(|n| n.name == "Button").unwrap();
    assert_eq!(button.kind, NodeKind::Function);
    assert_eq!(button.prop("component"), Some("true"));
}

#[test]
fn bare_function_call_resolves_within_same_file() {
    let source = "function helper() {}\nfunction run() { helper(); }\n";
    let result = extract_source("src/lib.ts", source);
    let helper = result.nodes.iter().find(|n| n.name == "helper").unwrap();
    let run = result.nodes.iter().find(|n| n.name == "run").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == run.id && e.target == helper.id));
}

#[test]
fn uppercase_const_binding_is_a_constant_node() {
    let source = "const MAX_RETRIES = 3;\n";
    let result = extract_source("src/config.ts", source);
    let constant = result.nodes.iter().find(|n| n.name == "MAX_RETRIES").unwrap();
    assert_eq!(constant.kind, NodeKind::Constant);
}
