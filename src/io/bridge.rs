//! Bridging `serde_yaml` values and external YAML trees
//!
//! `serde_yaml` does not expose the parser's node model, so this module
//! reconstructs one from a parsed [`Value`] and turns an external tree back
//! into a [`Value`] for serialization. Tags are resolved the way a YAML 1.2
//! core schema parser reports them. Comments, positions and anchors are not
//! available from `serde_yaml`; aliases were already expanded by it.

use crate::error::{CandidateError, Result};
use crate::yaml::{Kind, Node, NodeRef, Style, Tree};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};

const MAX_EXPANSION_DEPTH: usize = 1024;

/// Default cap on nodes produced by expanding aliases during serialization
pub const DEFAULT_ALIAS_EXPANSION_LIMIT: usize = 1_000_000;

/// Plain scalars that a YAML reader would not take as strings
static AMBIGUOUS_PLAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:~|null|true|false|yes|no|on|off|[-+]?(?:\.inf|\.nan)|[-+]?(?:[0-9][0-9_]*)?\.?[0-9]+(?:e[-+]?[0-9]+)?|0x[0-9a-f]+|0o[0-7]+)$",
    )
    .expect("valid ambiguous scalar regex")
});

/// Build an external tree holding `value` as a single document
pub fn value_to_tree(value: &Value) -> Tree {
    let mut tree = Tree::new();
    let doc = tree.push(Node::new(Kind::DOCUMENT));
    let body = push_value(&mut tree, value);
    if let Some(node) = tree.get_mut(doc) {
        node.content = vec![body];
    }
    tree.set_root(doc);
    tree
}

fn push_value(tree: &mut Tree, value: &Value) -> NodeRef {
    // parents take their slot before children, keeping the arena in document order
    let slot = tree.push(Node::default());
    let node = build_node(tree, value);
    if let Some(placeholder) = tree.get_mut(slot) {
        *placeholder = node;
    }
    slot
}

fn build_node(tree: &mut Tree, value: &Value) -> Node {
    match value {
        Value::Null => Node::scalar("!!null", "null"),
        Value::Bool(b) => Node::scalar("!!bool", b.to_string()),
        Value::Number(n) if n.is_f64() => Node::scalar("!!float", n.to_string()),
        Value::Number(n) => Node::scalar("!!int", n.to_string()),
        Value::String(s) => Node::scalar("!!str", s.as_str()).with_style(string_style(s)),
        Value::Sequence(items) => {
            let content = items.iter().map(|item| push_value(tree, item)).collect();
            Node::sequence(content)
        }
        Value::Mapping(map) => {
            let mut content = Vec::with_capacity(map.len() * 2);
            for (key, value) in map {
                content.push(push_value(tree, key));
                content.push(push_value(tree, value));
            }
            Node::mapping(content)
        }
        Value::Tagged(tagged) => {
            let mut node = build_node(tree, &tagged.value);
            node.tag = tag_string(&tagged.tag);
            // quoted strings keep their quoting so they do not read back as numbers
            if node.style.is_none() {
                node.style = Style::TAGGED;
            }
            node
        }
    }
}

fn tag_string(tag: &Tag) -> String {
    let rendered = tag.to_string();
    if rendered.starts_with('!') {
        rendered
    } else {
        format!("!{}", rendered)
    }
}

/// Style a string scalar needs so it reads back as a string
fn string_style(s: &str) -> Style {
    if s.contains('\n') {
        return Style::LITERAL;
    }
    let needs_quotes = s.is_empty()
        || s.trim() != s
        || AMBIGUOUS_PLAIN.is_match(s)
        || s.starts_with([
            '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
            '@', '`',
        ])
        || s.contains(": ")
        || s.contains(" #");
    if needs_quotes {
        Style::DOUBLE_QUOTED
    } else {
        Style::NONE
    }
}

/// Convert an external tree back into a `serde_yaml` value
///
/// Aliases are expanded by following their links, with at most
/// [`DEFAULT_ALIAS_EXPANSION_LIMIT`] nodes produced on their behalf.
pub fn tree_to_value(tree: &Tree) -> Result<Value> {
    tree_to_value_with_limit(tree, Some(DEFAULT_ALIAS_EXPANSION_LIMIT))
}

/// Convert an external tree back into a `serde_yaml` value, capping the
/// number of nodes alias expansion may produce
pub fn tree_to_value_with_limit(tree: &Tree, alias_limit: Option<usize>) -> Result<Value> {
    let root = tree
        .root()
        .ok_or_else(|| CandidateError::validation("external tree has no root node"))?;
    Expansion {
        tree,
        alias_limit,
        expanded: 0,
    }
    .node_to_value(root, 0, false)
}

/// State of one conversion; counts the nodes emitted through aliases
struct Expansion<'a> {
    tree: &'a Tree,
    alias_limit: Option<usize>,
    expanded: usize,
}

impl<'a> Expansion<'a> {
    fn node_to_value(&mut self, node_ref: NodeRef, depth: usize, aliased: bool) -> Result<Value> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(CandidateError::DepthLimitExceeded {
                limit: MAX_EXPANSION_DEPTH,
            });
        }
        let tree = self.tree;
        let node = tree
            .get(node_ref)
            .ok_or(CandidateError::InvalidNodeRef { index: node_ref.0 })?;

        if aliased {
            self.expanded += 1;
            if let Some(limit) = self.alias_limit {
                if self.expanded > limit {
                    return Err(CandidateError::AliasExpansionExceeded { limit });
                }
            }
        }

        let value = match node.kind {
            Kind::DOCUMENT => {
                return match node.content.first() {
                    Some(&body) => self.node_to_value(body, depth + 1, aliased),
                    None => Ok(Value::Null),
                };
            }
            Kind::ALIAS => {
                let target = node
                    .alias
                    .ok_or_else(|| CandidateError::dangling_alias(node.value.as_str()))?;
                return self.node_to_value(target, depth + 1, true);
            }
            Kind::SCALAR => scalar_to_value(node)?,
            Kind::SEQUENCE => Value::Sequence(
                node.content
                    .iter()
                    .map(|&child| self.node_to_value(child, depth + 1, aliased))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Kind::MAPPING => {
                if node.content.len() % 2 != 0 {
                    return Err(CandidateError::OddMappingContent {
                        len: node.content.len(),
                    });
                }
                let mut map = Mapping::new();
                for pair in node.content.chunks_exact(2) {
                    let key = self.node_to_value(pair[0], depth + 1, aliased)?;
                    let value = self.node_to_value(pair[1], depth + 1, aliased)?;
                    map.insert(key, value);
                }
                Value::Mapping(map)
            }
            other => {
                return Err(CandidateError::malformed_node(format!(
                    "cannot serialize node of {} at {}",
                    other, node_ref
                )))
            }
        };

        if is_local_tag(&node.tag) {
            return Ok(Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(node.tag.trim_start_matches('!')),
                value,
            })));
        }
        Ok(value)
    }
}

fn is_local_tag(tag: &str) -> bool {
    tag.starts_with('!') && !tag.starts_with("!!") && tag.len() > 1
}

fn scalar_to_value(node: &Node) -> Result<Value> {
    let text = node.value.as_str();
    match node.tag.as_str() {
        "!!null" => Ok(Value::Null),
        "!!bool" => match text.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(CandidateError::type_conversion(text, "boolean")),
        },
        "!!int" => parse_int(text)
            .map(Value::Number)
            .ok_or_else(|| CandidateError::type_conversion(text, "integer")),
        "!!float" => parse_float(text)
            .map(|f| Value::Number(Number::from(f)))
            .ok_or_else(|| CandidateError::type_conversion(text, "float")),
        "!!str" => Ok(Value::String(text.to_string())),
        _ => Ok(resolve_plain(node)),
    }
}

fn parse_int(text: &str) -> Option<Number> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if let Some(hex) = unsigned.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16).ok().map(Number::from);
    }
    if let Some(octal) = unsigned.strip_prefix("0o") {
        return u64::from_str_radix(octal, 8).ok().map(Number::from);
    }
    if let Ok(i) = unsigned.parse::<i64>() {
        return Some(Number::from(i));
    }
    unsigned.parse::<u64>().ok().map(Number::from)
}

fn parse_float(text: &str) -> Option<f64> {
    match text.to_ascii_lowercase().as_str() {
        ".inf" | "+.inf" => Some(f64::INFINITY),
        "-.inf" => Some(f64::NEG_INFINITY),
        ".nan" => Some(f64::NAN),
        other => other.replace('_', "").parse::<f64>().ok(),
    }
}

/// Resolve an untagged or locally tagged scalar the way a plain reader would
fn resolve_plain(node: &Node) -> Value {
    let quoted = matches!(
        node.style,
        Style::DOUBLE_QUOTED | Style::SINGLE_QUOTED | Style::LITERAL | Style::FOLDED
    );
    if quoted {
        return Value::String(node.value.clone());
    }
    match serde_yaml::from_str::<Value>(&node.value) {
        Ok(value @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(node.value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_to_tree_tags() {
        let value: Value = serde_yaml::from_str("a: 1\nb: [true, ~, 2.5, text]").unwrap();
        let tree = value_to_tree(&value);

        let doc = tree.get(tree.root().unwrap()).unwrap();
        assert_eq!(doc.kind, Kind::DOCUMENT);
        let map = tree.get(doc.content[0]).unwrap();
        assert_eq!(map.kind, Kind::MAPPING);
        assert_eq!(map.content.len(), 4);

        let seq = tree.get(map.content[3]).unwrap();
        let tags: Vec<_> = seq
            .content
            .iter()
            .map(|&r| tree.get(r).unwrap().tag.as_str())
            .collect();
        assert_eq!(tags, vec!["!!bool", "!!null", "!!float", "!!str"]);
    }

    #[test]
    fn test_ambiguous_strings_are_quoted() {
        assert_eq!(string_style("123"), Style::DOUBLE_QUOTED);
        assert_eq!(string_style("true"), Style::DOUBLE_QUOTED);
        assert_eq!(string_style(""), Style::DOUBLE_QUOTED);
        assert_eq!(string_style("- item"), Style::DOUBLE_QUOTED);
        assert_eq!(string_style("plain words"), Style::NONE);
        assert_eq!(string_style("two\nlines"), Style::LITERAL);
    }

    #[test]
    fn test_round_trip_value() {
        let text = "name: demo\ncount: 3\nratio: 0.5\nflags: [true, false]\nempty: null\nquoted: '42'\n";
        let value: Value = serde_yaml::from_str(text).unwrap();
        let back = tree_to_value(&value_to_tree(&value)).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_tagged_value_round_trip() {
        let value: Value = serde_yaml::from_str("item: !Point 3").unwrap();
        let tree = value_to_tree(&value);
        let map = tree.get(tree.get(tree.root().unwrap()).unwrap().content[0]).unwrap();
        let tagged = tree.get(map.content[1]).unwrap();
        assert_eq!(tagged.tag, "!Point");
        assert_eq!(tagged.style, Style::TAGGED);

        let back = tree_to_value(&tree).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_tagged_quoted_number_stays_string() {
        let value: Value = serde_yaml::from_str("item: !Point '3'").unwrap();
        let tree = value_to_tree(&value);
        let map = tree.get(tree.get(tree.root().unwrap()).unwrap().content[0]).unwrap();
        let tagged = tree.get(map.content[1]).unwrap();
        assert_eq!(tagged.tag, "!Point");
        assert_eq!(tagged.style, Style::DOUBLE_QUOTED);

        let back = tree_to_value(&tree).unwrap();
        assert_eq!(back, value);
        assert_eq!(serde_yaml::to_string(&back).unwrap(), "item: !Point '3'\n");
    }

    /// Each level is a sequence holding two aliases of the level below
    fn alias_chain(levels: usize) -> Tree {
        let mut tree = Tree::new();
        let mut prev = tree.push(Node::scalar("!!str", "x").with_anchor("a0"));
        for level in 1..=levels {
            let name = format!("a{}", level - 1);
            let left = tree.push(Node::alias(name.clone(), prev));
            let right = tree.push(Node::alias(name, prev));
            prev = tree.push(Node::sequence(vec![left, right]).with_anchor(format!("a{}", level)));
        }
        tree.set_root(prev);
        tree
    }

    #[test]
    fn test_alias_expansion_limit() {
        let tree = alias_chain(12);
        assert!(matches!(
            tree_to_value_with_limit(&tree, Some(100)),
            Err(CandidateError::AliasExpansionExceeded { limit: 100 })
        ));

        let small = alias_chain(3);
        match tree_to_value(&small).unwrap() {
            Value::Sequence(items) => assert_eq!(items.len(), 2),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_expansion_without_limit() {
        let tree = alias_chain(6);
        let value = tree_to_value_with_limit(&tree, None).unwrap();
        let rendered = serde_yaml::to_string(&value).unwrap();
        assert_eq!(rendered.matches('x').count(), 64);
    }

    #[test]
    fn test_alias_is_expanded() {
        let mut tree = Tree::new();
        let target = tree.push(Node::scalar("!!str", "shared").with_anchor("a"));
        let alias = tree.push(Node::alias("a", target));
        let seq = tree.push(Node::sequence(vec![target, alias]));
        tree.set_root(seq);

        let value = tree_to_value(&tree).unwrap();
        assert_eq!(value, serde_yaml::from_str::<Value>("[shared, shared]").unwrap());
    }

    #[test]
    fn test_unlinked_alias_fails() {
        let mut tree = Tree::new();
        let alias = tree.push(Node::new(Kind::ALIAS));
        tree.set_root(alias);
        assert!(matches!(
            tree_to_value(&tree),
            Err(CandidateError::DanglingAlias { .. })
        ));
    }

    #[test]
    fn test_bad_int_fails() {
        let mut tree = Tree::new();
        let node = tree.push(Node::scalar("!!int", "twelve"));
        tree.set_root(node);
        assert!(matches!(
            tree_to_value(&tree),
            Err(CandidateError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_untagged_scalars_resolve_plainly() {
        assert_eq!(resolve_plain(&Node::scalar("", "12")), Value::Number(12.into()));
        assert_eq!(
            resolve_plain(&Node::scalar("", "12").with_style(Style::SINGLE_QUOTED)),
            Value::String("12".to_string())
        );
        assert_eq!(
            resolve_plain(&Node::scalar("", "a: b")),
            Value::String("a: b".to_string())
        );
    }

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int("0x1f"), Some(Number::from(31u64)));
        assert_eq!(parse_int("0o17"), Some(Number::from(15u64)));
        assert_eq!(parse_int("-12"), Some(Number::from(-12i64)));
        assert_eq!(parse_int("1_000"), Some(Number::from(1000i64)));
        assert_eq!(parse_int("x"), None);
    }
}
