//! Architectural role assignment for class-like nodes. Middleware is the
//! one role that can also land on a free routine (a bare `http.Handler`
//! wrapper function, for instance) — that case is handled separately in
//! `lib.rs` alongside this module's [`is_middleware`] check.

use codegraph_core::model::{Language, Node};

use crate::evidence::{effective_package, Evidence};

const DATA_ACCESS_PREFIXES: &[&str] = &["find", "get", "save", "delete", "create", "update", "list"];
const DATA_ACCESS_EXCLUDED: &[&str] = &["getinstance", "instance", "getclass"];

/// Runs the four role tests in precedence order; a later match overrides an
/// earlier one, matching the spec's "later overrides earlier" rule.
pub fn assign_role(node: &Node, evidence: &Evidence) -> Option<&'static str> {
    let mut role = None;
    if is_controller(node, evidence) {
        role = Some("controller");
    }
    if is_service(node, evidence) {
        role = Some("service");
    }
    if is_repository(node, evidence) {
        role = Some("repository");
    }
    if is_middleware(node, evidence) {
        role = Some("middleware");
    }
    role
}

fn is_controller(node: &Node, evidence: &Evidence) -> bool {
    match node.language {
        Language::Java => ["Controller", "RestController", "RequestMapping"].iter().any(|a| evidence.has_annotation(a)),
        Language::Python => evidence.decorators.iter().any(|d| d.contains("app.route") || d.contains("router")) || evidence.has_base("APIView") || evidence.has_base("ViewSet"),
        Language::TypeScript | Language::JavaScript => evidence.decorators.iter().any(|d| d == "Controller"),
        Language::Rust => node.name.ends_with("Handler") || node.name.ends_with("Controller"),
        _ => false,
    }
}

fn is_service(node: &Node, evidence: &Evidence) -> bool {
    match node.language {
        Language::Java => ["Service", "Component"].iter().any(|a| evidence.has_annotation(a)),
        Language::Python => matches!(effective_package(node).as_deref(), Some("service") | Some("services") | Some("use_case") | Some("usecase")),
        Language::TypeScript | Language::JavaScript => evidence.decorators.iter().any(|d| d == "Injectable"),
        Language::Rust => node.name.ends_with("Service") || node.name.ends_with("UseCase") || node.name.ends_with("Interactor"),
        _ => false,
    }
}

fn is_repository(node: &Node, evidence: &Evidence) -> bool {
    let by_convention = match node.language {
        Language::Java => evidence.has_annotation("Repository"),
        Language::Rust => ["Repository", "Repo", "Store", "DAO"].iter().any(|suffix| node.name.ends_with(suffix)),
        Language::Python => matches!(effective_package(node).as_deref(), Some("repository") | Some("repositories")) || node.name.ends_with("Repository") || node.name.ends_with("Repo"),
        _ => false,
    };
    by_convention || is_repository_by_method_majority(evidence)
}

fn is_repository_by_method_majority(evidence: &Evidence) -> bool {
    let relevant: Vec<&String> = evidence.methods.iter().filter(|m| !DATA_ACCESS_EXCLUDED.contains(&m.to_ascii_lowercase().as_str())).collect();
    if relevant.is_empty() {
        return false;
    }
    let matches = relevant.iter().filter(|m| DATA_ACCESS_PREFIXES.iter().any(|p| m.to_ascii_lowercase().starts_with(p))).count();
    matches >= 3 && matches * 2 > relevant.len()
}

pub fn is_middleware(node: &Node, evidence: &Evidence) -> bool {
    match node.language {
        Language::Rust => node.name.contains("Middleware") || node.signature.as_deref().is_some_and(|sig| sig.contains("Handler")),
        Language::Python => evidence.has_decorator_containing("middleware"),
        Language::TypeScript | Language::JavaScript => evidence.implements.iter().any(|i| i == "NestMiddleware") || evidence.decorators.iter().any(|d| d == "Middleware"),
        Language::Java => evidence.has_annotation("Filter") || evidence.implements.iter().any(|i| i == "Filter" || i == "HandlerInterceptor"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::model::NodeKind;

    fn class_node(language: Language, name: &str, package: Option<&str>) -> Node {
        let mut node = Node::new("id".to_string(), NodeKind::Class, name, "src/file", language);
        node.package = package.map(|p| p.to_string());
        node
    }

    #[test]
    fn java_rest_controller_annotation_assigns_controller_role() {
        let mut node = class_node(Language::Java, "UserController", Some("com.example.controller"));
        node.properties.insert("annotations".to_string(), "RestController".to_string());
        let evidence = Evidence::from_node(&node);
        assert_eq!(assign_role(&node, &evidence), Some("controller"));
    }

    #[test]
    fn rust_name_suffix_assigns_service_role() {
        let node = class_node(Language::Rust, "UserService", None);
        let evidence = Evidence::from_node(&node);
        assert_eq!(assign_role(&node, &evidence), Some("service"));
    }

    #[test]
    fn repository_role_from_majority_crud_methods() {
        let mut node = class_node(Language::TypeScript, "Thing", None);
        node.properties.insert("methods".to_string(), "find, get, save, summarize".to_string());
        let evidence = Evidence::from_node(&node);
        assert_eq!(assign_role(&node, &evidence), Some("repository"));
    }

    #[test]
    fn rust_routine_returning_a_handler_type_is_middleware() {
        let mut node = Node::new("id".to_string(), NodeKind::Function, "logging_layer", "src/file", Language::Rust);
        node.signature = Some("fn logging_layer() -> impl Handler".to_string());
        let evidence = Evidence::from_node(&node);
        assert!(is_middleware(&node, &evidence));
    }

    #[test]
    fn minority_crud_methods_do_not_assign_repository() {
        let mut node = class_node(Language::TypeScript, "Thing", None);
        node.properties.insert("methods".to_string(), "find, summarize, render, validate".to_string());
        let evidence = Evidence::from_node(&node);
        assert_ne!(assign_role(&node, &evidence), Some("repository"));
    }
}
