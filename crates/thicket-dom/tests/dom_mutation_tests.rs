//! Tests for tree mutation: append_child, remove_child, insert_before, move_children.

use thicket_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// Parent with three element children `a`, `b`, `c`.
fn three_children(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== append_child ==========

#[test]
fn test_append_links_siblings() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(c), None);
    assert_eq!(tree.parent(b), Some(parent));
}

#[test]
fn test_append_reparents_attached_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    // b must appear in exactly one child list
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(b), None);
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_first_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, a);

    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_last_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, c);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_non_child_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let stray = alloc_element(&mut tree, "i");

    tree.remove_child(parent, stray);

    assert_eq!(tree.children(parent), &[a, b, c]);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, a);

    assert_eq!(tree.children(parent), &[x, a, b, c]);
    assert_eq!(tree.prev_sibling(x), None);
    assert_eq!(tree.next_sibling(x), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(x));
    assert_eq!(tree.parent(x), Some(parent));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, b);

    assert_eq!(tree.children(parent), &[a, x, b, c]);
    assert_eq!(tree.next_sibling(a), Some(x));
    assert_eq!(tree.prev_sibling(x), Some(a));
    assert_eq!(tree.next_sibling(x), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(x));
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let stray = alloc_element(&mut tree, "i");
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, stray);

    assert_eq!(tree.children(parent), &[a, b, c, x]);
    assert_eq!(tree.prev_sibling(x), Some(c));
}

#[test]
fn test_insert_before_moves_sibling_within_parent() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.insert_before(parent, c, a);

    assert_eq!(tree.children(parent), &[c, a, b]);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.prev_sibling(c), None);
    assert_eq!(tree.next_sibling(c), Some(a));
}

// ========== move_children ==========

#[test]
fn test_move_children_preserves_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let target = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, target);
    let existing = alloc_element(&mut tree, "hr");
    tree.append_child(target, existing);

    tree.move_children(parent, target);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.children(target), &[existing, a, b, c]);
    assert_eq!(tree.parent(a), Some(target));
    assert_eq!(tree.prev_sibling(a), Some(existing));
    assert_eq!(tree.next_sibling(c), None);
}

#[test]
fn test_move_children_of_empty_node() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "div");

    tree.move_children(from, to);

    assert!(tree.children(to).is_empty());
}
