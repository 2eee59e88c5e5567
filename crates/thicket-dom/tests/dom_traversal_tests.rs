//! Tests for tree queries: descendants, ancestors, lookups, attributes.

use thicket_dom::{AttributesMap, DocumentTypeData, DomTree, ElementData, NodeId, NodeType};

fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// `<html><head></head><body><p>hi</p></body></html>` built by hand.
fn small_document() -> (DomTree, [NodeId; 5]) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    let p = alloc_element(&mut tree, "p");
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);
    tree.append_child(body, p);
    tree.append_child(p, text);
    (tree, [html, head, body, p, text])
}

#[test]
fn test_descendants_pre_order() {
    let (tree, [html, head, body, p, text]) = small_document();

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();

    assert_eq!(order, vec![NodeId::ROOT, html, head, body, p, text]);
}

#[test]
fn test_descendants_stay_inside_subtree() {
    let (tree, [_, head, body, p, text]) = small_document();

    let order: Vec<NodeId> = tree.descendants(body).collect();
    assert_eq!(order, vec![body, p, text]);

    let leaf: Vec<NodeId> = tree.descendants(head).collect();
    assert_eq!(leaf, vec![head]);
}

#[test]
fn test_descendants_of_unknown_id_is_empty() {
    let tree = DomTree::new();
    assert_eq!(tree.descendants(NodeId(42)).count(), 0);
}

#[test]
fn test_ancestors_and_is_descendant_of() {
    let (tree, [html, _, body, p, text]) = small_document();

    let chain: Vec<NodeId> = tree.ancestors(text).collect();
    assert_eq!(chain, vec![p, body, html, NodeId::ROOT]);

    assert!(tree.is_descendant_of(text, html));
    assert!(!tree.is_descendant_of(html, text));
}

#[test]
fn test_document_element_skips_doctype() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::DocumentType(DocumentTypeData {
        name: "html".to_string(),
        ..Default::default()
    }));
    tree.append_child(NodeId::ROOT, doctype);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), None);
}

#[test]
fn test_body_and_tag_name_lookup() {
    let (tree, [html, _, body, p, text]) = small_document();

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.tag_name(p), Some("p"));
    assert_eq!(tree.tag_name(text), None);
    assert_eq!(tree.as_text(text), Some("hi"));
}

#[test]
fn test_attribute_lookup() {
    let mut tree = DomTree::new();
    let mut data = ElementData::new("a");
    let _ = data.attrs.insert("href".to_string(), "/x".to_string());
    let _ = data.attrs.insert("class".to_string(), "nav  big".to_string());
    let link = tree.alloc(NodeType::Element(data));

    assert_eq!(tree.attribute(link, "href"), Some("/x"));
    assert_eq!(tree.attribute(link, "title"), None);

    let classes = tree.as_element(link).map(ElementData::classes).unwrap_or_default();
    assert_eq!(classes.len(), 2);
    assert!(classes.contains("nav"));
}

// ========== AttributesMap ==========

#[test]
fn test_attributes_keep_source_order() {
    let mut attrs = AttributesMap::new();
    assert_eq!(attrs.insert("b".to_string(), "1".to_string()), None);
    assert_eq!(attrs.insert("a".to_string(), "2".to_string()), None);
    assert_eq!(attrs.insert("b".to_string(), "3".to_string()), Some("1".to_string()));

    let names: Vec<&str> = attrs.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
    assert_eq!(attrs.get("b").map(String::as_str), Some("3"));
    assert_eq!(attrs.len(), 2);
}

#[test]
fn test_insert_if_absent_keeps_existing() {
    let mut attrs: AttributesMap = [("lang".to_string(), "en".to_string())]
        .into_iter()
        .collect();

    assert!(!attrs.insert_if_absent("lang", "fr"));
    assert!(attrs.insert_if_absent("dir", "ltr"));
    assert_eq!(attrs.get("lang").map(String::as_str), Some("en"));
    assert_eq!(attrs.get("dir").map(String::as_str), Some("ltr"));
}

#[test]
fn test_from_iter_first_value_wins() {
    let attrs: AttributesMap = vec![
        ("id".to_string(), "one".to_string()),
        ("id".to_string(), "two".to_string()),
    ]
    .into_iter()
    .collect();

    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs.get("id").map(String::as_str), Some("one"));
}
