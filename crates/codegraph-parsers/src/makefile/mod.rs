//! Line-oriented extraction for Makefiles: no tree-sitter grammar backs this
//! language, so rules are recognized directly from the source text instead
//! of through the [`crate::adapter::SyntaxNode`] walk every other extractor
//! uses.

use std::collections::{HashMap, HashSet};

use codegraph_core::error::ExtractError;
use codegraph_core::id::{edge_id, node_id};
use codegraph_core::model::{Edge, EdgeKind, Language, Node, NodeKind};

use crate::extractor::{ExtractionResult, LanguageExtractor};

pub struct MakefileExtractor;

impl MakefileExtractor {
    pub fn new() -> Self {
        MakefileExtractor
    }
}

impl Default for MakefileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for MakefileExtractor {
    fn language(&self) -> Language {
        Language::Make
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".mk"]
    }

    fn filenames(&self) -> &'static [&'static str] {
        &["Makefile", "makefile", "GNUmakefile"]
    }

    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(extract(path, &text))
    }
}

fn extract(path: &str, text: &str) -> ExtractionResult {
    let mut result = ExtractionResult::new();

    let file_id = node_id(NodeKind::File.as_str(), path, path);
    result.nodes.push(Node::new(file_id.clone(), NodeKind::File, path, path, Language::Make));

    let module_id = node_id(NodeKind::Module.as_str(), path, path);
    result.nodes.push(Node::new(module_id.clone(), NodeKind::Module, path, path, Language::Make));
    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), &file_id, &module_id, ""), EdgeKind::Contains, file_id, module_id.clone()));

    let mut phony: HashSet<String> = HashSet::new();
    let mut target_ids: HashMap<String, String> = HashMap::new();
    // Two passes: collect every `.PHONY` declaration first, since it may
    // appear anywhere in the file, after the targets it marks.
    for (line_no, raw) in text.lines().enumerate() {
        if raw.starts_with('\t') {
            continue;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(rest) = strip_phony_prefix(trimmed) {
            phony.extend(rest.split_whitespace().map(|s| s.to_string()));
        }
        let _ = line_no;
    }

    for (line_no, raw) in text.lines().enumerate() {
        if raw.starts_with('\t') {
            continue;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || strip_phony_prefix(trimmed).is_some() {
            continue;
        }
        let Some((colon_pos, width)) = rule_colon(trimmed) else { continue };
        let (targets_part, rest) = trimmed.split_at(colon_pos);
        let prereqs_part = &rest[width..];
        // A recipe/command is allowed to trail a rule on the same line after
        // a `;`; only the dependency list precedes it.
        let prereqs_part = prereqs_part.split(';').next().unwrap_or(prereqs_part);

        for target_name in targets_part.split_whitespace() {
            if target_name.starts_with('.') {
                continue;
            }
            let line = (line_no + 1) as u32;
            let target_id = target_ids
                .entry(target_name.to_string())
                .or_insert_with(|| {
                    let id = node_id(NodeKind::Function.as_str(), path, target_name);
                    let mut node = Node::new(id.clone(), NodeKind::Function, target_name, path, Language::Make).with_lines(line, line);
                    if phony.contains(target_name) {
                        node = node.with_property("phony", "true");
                    }
                    result.nodes.push(node);
                    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), &module_id, &id, ""), EdgeKind::Contains, module_id.clone(), id.clone()));
                    id
                })
                .clone();

            for prereq in prereqs_part.split_whitespace() {
                let prereq_id = target_ids.entry(prereq.to_string()).or_insert_with(|| {
                    let id = node_id(NodeKind::Function.as_str(), path, prereq);
                    let mut node = Node::new(id.clone(), NodeKind::Function, prereq, path, Language::Make);
                    if phony.contains(prereq) {
                        node = node.with_property("phony", "true");
                    }
                    result.nodes.push(node);
                    result.edges.push(Edge::new(edge_id(EdgeKind::Contains.as_str(), &module_id, &id, ""), EdgeKind::Contains, module_id.clone(), id.clone()));
                    id
                }).clone();
                result.edges.push(Edge::new(
                    edge_id(EdgeKind::DependsOn.as_str(), target_id.as_str(), &prereq_id, ""),
                    EdgeKind::DependsOn,
                    target_id.clone(),
                    prereq_id,
                ));
            }
        }
    }

    // Retroactively tag any target discovered only as a prerequisite before
    // its own `.PHONY` declaration was reached.
    for (name, id) in target_ids.iter() {
        if phony.contains(name) {
            if let Some(node) = result.nodes.iter_mut().find(|n| &n.id == id) {
                node.properties.insert("phony".to_string(), "true".to_string());
            }
        }
    }

    result
}

fn strip_phony_prefix(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix(".PHONY:").or_else(|| trimmed.strip_prefix(".PHONY").filter(|rest| rest.starts_with(char::is_whitespace))).map(|rest| rest.trim_start_matches(':'))
}

/// Finds the first rule-introducing colon in a non-recipe line, distinguishing
/// it from `:=`/`=`/`+=`/`?=` variable assignment. Returns the byte offset
/// and the colon's width (2 for a double-colon rule, 1 otherwise); `None`
/// when the line is an assignment or carries no colon at all.
fn rule_colon(line: &str) -> Option<(usize, usize)> {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' {
            if bytes.get(i + 1) == Some(&b'=') {
                return None;
            }
            let width = if bytes.get(i + 1) == Some(&b':') { 2 } else { 1 };
            return Some((i, width));
        }
        if b == b'=' {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests;
