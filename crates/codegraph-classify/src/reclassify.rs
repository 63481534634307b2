//! Type reclassification: the classifier's one opportunity to change a
//! node's `kind`, always evaluated against the kind the extractor originally
//! assigned, never against a kind an earlier reclassification already wrote.

use codegraph_core::model::{Language, Node, NodeKind};

use crate::evidence::{effective_package, Evidence};

const DDD_TERMS: &[&str] = &["Aggregate", "ValueObject", "DomainEvent"];
const DOMAIN_PACKAGES: &[&str] = &["domain", "model", "entity", "core"];
const DTO_SUFFIXES: &[&str] = &["DTO", "Request", "Response", "Payload", "Command", "Query"];
const DTO_PACKAGES: &[&str] = &["dto", "viewmodel", "api", "request", "response"];

/// Outcome of reclassification: the new kind (if any) plus, for the
/// `DomainModel` path only, the `arch_role` it also sets.
pub struct Reclassification {
    pub kind: Option<NodeKind>,
    pub domain_model_role: bool,
}

/// DBModel is checked first and applies regardless of whether a role was
/// already assigned; ViewModel/DTO/DomainModel only apply when no role is
/// set, since a controller or service that happens to be named `*Response`
/// stays what its role says it is.
pub fn reclassify(node: &Node, evidence: &Evidence, role: Option<&str>) -> Reclassification {
    if !node.kind.is_class_like() {
        return Reclassification { kind: None, domain_model_role: false };
    }

    if is_db_model(node, evidence) {
        return Reclassification { kind: Some(NodeKind::DbModel), domain_model_role: false };
    }

    if role.is_some() {
        return Reclassification { kind: None, domain_model_role: false };
    }

    if is_view_model(node) {
        return Reclassification { kind: Some(NodeKind::ViewModel), domain_model_role: false };
    }

    if is_dto(node, evidence) {
        return Reclassification { kind: Some(NodeKind::Dto), domain_model_role: false };
    }

    if is_domain_model(node, evidence) {
        return Reclassification { kind: Some(NodeKind::DomainModel), domain_model_role: true };
    }

    Reclassification { kind: None, domain_model_role: false }
}

fn is_db_model(node: &Node, evidence: &Evidence) -> bool {
    match node.language {
        Language::Java => ["Entity", "Table", "Document", "MappedSuperclass"].iter().any(|a| evidence.has_annotation(a)),
        Language::Python => {
            evidence.has_base("Model") || evidence.has_base("Base") || evidence.has_base("Document") || (evidence.decorators.iter().any(|d| d == "dataclass") && evidence.has_base("Base"))
        }
        Language::TypeScript | Language::JavaScript => evidence.decorators.iter().any(|d| d == "Entity" || d == "Schema"),
        Language::Rust => (node.name.ends_with("Model") || node.name.ends_with("Entity")) && node.prop("fields").map(|f| !f.is_empty()).unwrap_or(false),
        _ => false,
    }
}

fn is_view_model(node: &Node) -> bool {
    node.name.ends_with("ViewModel") || node.name.ends_with("View")
}

fn is_dto(node: &Node, evidence: &Evidence) -> bool {
    let by_suffix = DTO_SUFFIXES.iter().any(|s| node.name.ends_with(s));
    let by_java_annotation = node.language == Language::Java && (evidence.has_annotation("JsonProperty") || evidence.has_annotation("Serializable"));
    let by_package = effective_package(node).map(|p| DTO_PACKAGES.contains(&p.as_str())).unwrap_or(false);
    by_suffix || by_java_annotation || by_package
}

fn is_domain_model(node: &Node, evidence: &Evidence) -> bool {
    let has_db_annotation = match node.language {
        Language::Java => evidence.has_annotation("Entity") || evidence.has_annotation("Table"),
        Language::Python => evidence.has_base("Model") || evidence.has_base("Base"),
        Language::TypeScript | Language::JavaScript => evidence.decorators.iter().any(|d| d == "Entity"),
        _ => false,
    };

    let has_ddd_term = DDD_TERMS.iter().any(|t| node.name.contains(t));
    if has_ddd_term && !has_db_annotation {
        return true;
    }

    let in_domain_package = effective_package(node).map(|p| DOMAIN_PACKAGES.contains(&p.as_str())).unwrap_or(false);
    node.name.contains("Entity") && !has_db_annotation && in_domain_package
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_node(language: Language, name: &str, package: Option<&str>) -> Node {
        let mut node = Node::new("id".to_string(), NodeKind::Class, name, "src/file", language);
        node.package = package.map(|p| p.to_string());
        node
    }

    #[test]
    fn java_entity_annotation_becomes_db_model_even_with_no_role() {
        let mut node = class_node(Language::Java, "Order", Some("com.example.model"));
        node.properties.insert("annotations".to_string(), "Entity, Table".to_string());
        let evidence = Evidence::from_node(&node);
        let outcome = reclassify(&node, &evidence, None);
        assert_eq!(outcome.kind, Some(NodeKind::DbModel));
    }

    #[test]
    fn db_model_applies_even_when_a_role_is_already_assigned() {
        let mut node = class_node(Language::Java, "OrderService", Some("com.example.model"));
        node.properties.insert("annotations".to_string(), "Entity".to_string());
        let evidence = Evidence::from_node(&node);
        let outcome = reclassify(&node, &evidence, Some("service"));
        assert_eq!(outcome.kind, Some(NodeKind::DbModel));
    }

    #[test]
    fn dto_suffix_is_only_applied_without_a_role() {
        let node = class_node(Language::TypeScript, "CreateUserRequest", None);
        let evidence = Evidence::from_node(&node);
        assert_eq!(reclassify(&node, &evidence, None).kind, Some(NodeKind::Dto));
        assert_eq!(reclassify(&node, &evidence, Some("controller")).kind, None);
    }

    #[test]
    fn ddd_term_without_db_annotation_becomes_domain_model_and_sets_role() {
        let node = class_node(Language::TypeScript, "OrderAggregate", None);
        let evidence = Evidence::from_node(&node);
        let outcome = reclassify(&node, &evidence, None);
        assert_eq!(outcome.kind, Some(NodeKind::DomainModel));
        assert!(outcome.domain_model_role);
    }

    #[test]
    fn rust_struct_with_model_suffix_and_fields_becomes_db_model() {
        let mut node = class_node(Language::Rust, "UserModel", None);
        node.kind = NodeKind::Struct;
        node.properties.insert("fields".to_string(), "id, name".to_string());
        let evidence = Evidence::from_node(&node);
        assert_eq!(reclassify(&node, &evidence, None).kind, Some(NodeKind::DbModel));
    }

    #[test]
    fn rust_struct_with_model_suffix_but_no_fields_is_not_db_model() {
        let node = class_node(Language::Rust, "UserModel", None);
        let evidence = Evidence::from_node(&node);
        assert_eq!(reclassify(&node, &evidence, None).kind, None);
    }

    #[test]
    fn non_class_like_kinds_are_never_reclassified() {
        let node = Node::new("id".to_string(), NodeKind::Interface, "Repository", "src/file", Language::Java);
        let evidence = Evidence::from_node(&node);
        assert_eq!(reclassify(&node, &evidence, None).kind, None);
    }
}
