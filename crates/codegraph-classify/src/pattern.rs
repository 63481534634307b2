//! Additive design-pattern tags. Unlike role/reclassification, a node can
//! carry more than one of these at once; they're joined into the
//! `design_pattern` property in declaration order.

use codegraph_core::model::{Language, Node, NodeKind};

use crate::evidence::Evidence;

const FACTORY_PREFIXES: &[&str] = &["New", "Create", "Build", "Make"];
const SINGLETON_ACCESSORS: &[&str] = &["getinstance", "instance", "shared"];
const SUBSCRIBE_METHODS: &[&str] = &["subscribe", "on", "addobserver", "addlistener"];
const NOTIFY_METHODS: &[&str] = &["notify", "emit", "notifyobservers", "notifylisteners"];

pub fn detect_patterns(node: &Node, evidence: &Evidence, arch_role: Option<&str>) -> Vec<&'static str> {
    let mut patterns = Vec::new();
    if is_factory(node) {
        patterns.push("factory");
    }
    if is_singleton(node, evidence) {
        patterns.push("singleton");
    }
    if is_observer(node, evidence) {
        patterns.push("observer");
    }
    if is_builder(node, evidence) {
        patterns.push("builder");
    }
    if arch_role == Some("repository") {
        patterns.push("repository");
    }
    patterns
}

/// A free routine whose name starts `New`/`Create`/`Build`/`Make` followed
/// by at least one more character. The self-hosting language expresses
/// "returns a pointer" as an owning smart pointer, a reference, or a boxed
/// trait object rather than Go's bare `*T` — any of those count, unless the
/// return type names a plain trait object (an interface-shaped return),
/// which the original rule treats as disqualifying.
fn is_factory(node: &Node) -> bool {
    if !matches!(node.kind, NodeKind::Function | NodeKind::Method) {
        return false;
    }
    let has_factory_prefix = FACTORY_PREFIXES.iter().any(|p| node.name.len() > p.len() && node.name.starts_with(p));
    if !has_factory_prefix {
        return false;
    }
    if node.language != Language::Rust {
        return has_factory_prefix;
    }
    match &node.signature {
        Some(sig) => returns_owned_pointer(sig) && !returns_bare_dyn_trait(sig),
        None => false,
    }
}

fn returns_owned_pointer(signature: &str) -> bool {
    let Some(ret) = signature.split("->").nth(1) else { return false };
    let ret = ret.trim();
    ret.starts_with("Box<") || ret.starts_with("Arc<") || ret.starts_with("Rc<") || ret.starts_with('&')
}

fn returns_bare_dyn_trait(signature: &str) -> bool {
    let Some(ret) = signature.split("->").nth(1) else { return false };
    ret.trim().starts_with("dyn ")
}

fn is_singleton(node: &Node, evidence: &Evidence) -> bool {
    node.kind.is_class_like() && evidence.methods.iter().any(|m| SINGLETON_ACCESSORS.contains(&m.to_ascii_lowercase().as_str()))
}

fn is_observer(node: &Node, evidence: &Evidence) -> bool {
    if !node.kind.is_class_like() {
        return false;
    }
    let name_signal = evidence.implements.iter().chain(evidence.supertypes()).any(|t| {
        let lower = t.to_ascii_lowercase();
        lower.contains("listener") || lower.contains("observer")
    });
    if name_signal {
        return true;
    }
    let lower_methods: Vec<String> = evidence.methods.iter().map(|m| m.to_ascii_lowercase()).collect();
    let has_subscribe = lower_methods.iter().any(|m| SUBSCRIBE_METHODS.contains(&m.as_str()));
    let has_notify = lower_methods.iter().any(|m| NOTIFY_METHODS.contains(&m.as_str()));
    has_subscribe && has_notify
}

fn is_builder(node: &Node, evidence: &Evidence) -> bool {
    node.kind.is_class_like() && (node.name.ends_with("Builder") || evidence.methods.iter().any(|m| m == "Build" || m == "build"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(language: Language, name: &str, signature: Option<&str>) -> Node {
        let mut node = Node::new("id".to_string(), NodeKind::Function, name, "src/file", language);
        node.signature = signature.map(|s| s.to_string());
        node
    }

    fn class_node(name: &str) -> Node {
        Node::new("id".to_string(), NodeKind::Class, name, "src/file", Language::TypeScript)
    }

    #[test]
    fn rust_factory_with_boxed_return_is_detected() {
        let node = func(Language::Rust, "NewUserService", Some("fn new_user_service(db: &Db) -> Box<UserService>"));
        assert!(detect_patterns(&node, &Evidence::from_node(&node), None).contains(&"factory"));
    }

    #[test]
    fn rust_constructor_returning_plain_value_is_not_a_factory() {
        let node = func(Language::Rust, "NewConfig", Some("fn new_config() -> Config"));
        assert!(!detect_patterns(&node, &Evidence::from_node(&node), None).contains(&"factory"));
    }

    #[test]
    fn rust_factory_returning_bare_dyn_trait_is_not_detected() {
        let node = func(Language::Rust, "NewHandler", Some("fn new_handler() -> dyn Handler"));
        assert!(!detect_patterns(&node, &Evidence::from_node(&node), None).contains(&"factory"));
    }

    #[test]
    fn non_rust_factory_prefix_needs_no_signature_check() {
        let node = func(Language::Python, "create_user", None);
        assert!(detect_patterns(&node, &Evidence::from_node(&node), None).contains(&"factory"));
    }

    #[test]
    fn get_instance_method_marks_singleton() {
        let mut node = class_node("ConfigManager");
        node.properties.insert("methods".to_string(), "getInstance, reload".to_string());
        let evidence = Evidence::from_node(&node);
        assert!(detect_patterns(&node, &evidence, None).contains(&"singleton"));
    }

    #[test]
    fn subscribe_and_notify_methods_mark_observer() {
        let mut node = class_node("EventBus");
        node.properties.insert("methods".to_string(), "subscribe, notify".to_string());
        let evidence = Evidence::from_node(&node);
        assert!(detect_patterns(&node, &evidence, None).contains(&"observer"));
    }

    #[test]
    fn builder_suffix_marks_builder() {
        let node = class_node("RequestBuilder");
        let evidence = Evidence::from_node(&node);
        assert!(detect_patterns(&node, &evidence, None).contains(&"builder"));
    }

    #[test]
    fn repository_role_adds_repository_pattern() {
        let node = class_node("UserRepository");
        let evidence = Evidence::from_node(&node);
        assert!(detect_patterns(&node, &evidence, Some("repository")).contains(&"repository"));
    }
}
