use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The closed set of graph node kinds every language extractor emits into.
///
/// `DBModel`, `ViewModel`, `DTO` and `DomainModel` are never produced by an
/// extractor directly — they only appear after the classifier reclassifies a
/// `Class`/`Struct` node (see `codegraph-classify`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    TestFile,
    Package,
    Module,
    Dependency,
    Class,
    Struct,
    Interface,
    Enum,
    Type,
    Function,
    Method,
    TestFunction,
    Variable,
    Constant,
    ApiEndpoint,
    DbModel,
    ViewModel,
    Dto,
    DomainModel,
    Document,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::TestFile => "test_file",
            NodeKind::Package => "package",
            NodeKind::Module => "module",
            NodeKind::Dependency => "dependency",
            NodeKind::Class => "class",
            NodeKind::Struct => "struct",
            NodeKind::Interface => "interface",
            NodeKind::Enum => "enum",
            NodeKind::Type => "type",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::TestFunction => "test_function",
            NodeKind::Variable => "variable",
            NodeKind::Constant => "constant",
            NodeKind::ApiEndpoint => "api_endpoint",
            NodeKind::DbModel => "db_model",
            NodeKind::ViewModel => "view_model",
            NodeKind::Dto => "dto",
            NodeKind::DomainModel => "domain_model",
            NodeKind::Document => "document",
        }
    }

    /// Whether this kind participates in classifier reclassification
    /// (§4.3 of the spec only ever reassigns `Class`/`Struct` nodes).
    pub fn is_class_like(&self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Struct)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of edge kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Contains,
    Imports,
    DependsOn,
    Implements,
    Calls,
    Exposes,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "contains",
            EdgeKind::Imports => "imports",
            EdgeKind::DependsOn => "depends_on",
            EdgeKind::Implements => "implements",
            EdgeKind::Calls => "calls",
            EdgeKind::Exposes => "exposes",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source language tag carried by every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    TypeScript,
    JavaScript,
    Python,
    Java,
    Ruby,
    Make,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::Make => "make",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the code knowledge graph.
///
/// `id` is content-hashed from `(kind, file_path, local_key)` by the
/// extractor that creates it (see [`crate::id`]) and is never recomputed
/// once assigned — the classifier may mutate `kind` and `properties` but
/// must preserve `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub file_path: String,
    pub line_start: Option<u32>,
    pub line_end: Option<u32>,
    pub package: Option<String>,
    pub qualified_name: Option<String>,
    pub signature: Option<String>,
    pub doc_comment: Option<String>,
    pub is_public: bool,
    pub language: Language,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Node {
    pub fn new(id: String, kind: NodeKind, name: impl Into<String>, file_path: impl Into<String>, language: Language) -> Self {
        Node {
            id,
            kind,
            name: name.into(),
            file_path: file_path.into(),
            line_start: None,
            line_end: None,
            package: None,
            qualified_name: None,
            signature: None,
            doc_comment: None,
            is_public: false,
            language,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.line_start = Some(start);
        self.line_end = Some(end);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn prop(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }
}

/// An edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Edge {
    pub fn new(id: String, kind: EdgeKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge {
            id,
            kind,
            source: source.into(),
            target: target.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
