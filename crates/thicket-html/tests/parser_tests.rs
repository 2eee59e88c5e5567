//! Integration tests for the HTML parser.

use thicket_common::ContractViolation;
use thicket_dom::{DomTree, NodeId, NodeType};
use thicket_html::{
    Document, HTMLParser, HTMLTokenizer, InsertionMode, ParseErrorCode, ParseOptions, QuirksMode,
    TreeBuilder, serialize,
};

fn options() -> ParseOptions {
    ParseOptions::default().with_log_warnings(false)
}

/// Helper to parse HTML and return the document
fn parse(html: &str) -> Document {
    HTMLParser::new(options()).parse(Some(html)).unwrap()
}

/// Serialized children of the body element
fn body_html(doc: &Document) -> String {
    let body = doc.body().expect("document has a body");
    doc.tree()
        .children(body)
        .iter()
        .map(|&child| serialize(doc.tree(), child))
        .collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to get text content of a node (concatenated)
fn text_content(tree: &DomTree, id: NodeId) -> String {
    let mut result = String::new();
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Text(data) => result.push_str(data),
            _ => {
                for &child_id in tree.children(id) {
                    result.push_str(&text_content(tree, child_id));
                }
            }
        }
    }
    result
}

fn codes(doc: &Document) -> Vec<ParseErrorCode> {
    doc.issues().iter().map(|issue| issue.code).collect()
}

// -----------------------------------------------------------------------------
// Document structure
// -----------------------------------------------------------------------------

#[test]
fn test_document_structure() {
    let doc = parse("<!DOCTYPE html><html><head></head><body></body></html>");
    let tree = doc.tree();

    let children = tree.children(NodeId::ROOT);
    assert_eq!(children.len(), 2);
    assert!(matches!(
        &tree.get(children[0]).unwrap().node_type,
        NodeType::DocumentType(doctype) if doctype.name == "html"
    ));

    let html = doc.document_element().unwrap();
    assert_eq!(doc.tag_name(html), Some("html"));
    let names: Vec<_> = tree
        .children(html)
        .iter()
        .filter_map(|&id| doc.tag_name(id))
        .collect();
    assert_eq!(names, vec!["head", "body"]);
    assert!(doc.issues().is_empty());
}

#[test]
fn test_missing_structure_is_synthesized() {
    let doc = parse("Hello");
    assert_eq!(
        serialize(doc.tree(), doc.root()),
        "<html><head></head><body>Hello</body></html>"
    );
    assert!(codes(&doc).contains(&ParseErrorCode::MissingDoctype));
}

#[test]
fn test_empty_input_still_builds_a_document() {
    let doc = parse("");
    assert_eq!(
        serialize(doc.tree(), doc.root()),
        "<html><head></head><body></body></html>"
    );
}

#[test]
fn test_head_content() {
    let doc = parse("<!DOCTYPE html><title>T</title><meta charset=utf-8><p>x");
    assert_eq!(
        serialize(doc.tree(), doc.root()),
        r#"<!DOCTYPE html><html><head><title>T</title><meta charset="utf-8"></head><body><p>x</p></body></html>"#
    );
}

#[test]
fn test_script_text_is_raw() {
    let doc = parse("<script>if (a<b) {}</script>");
    let tree = doc.tree();
    let head = find_element(tree, NodeId::ROOT, "head").unwrap();
    let script = find_element(tree, head, "script").unwrap();
    assert_eq!(text_content(tree, script), "if (a<b) {}");
}

#[test]
fn test_comments_around_the_document() {
    let doc = parse("<!--a--><!DOCTYPE html><p>x</p></html><!--b-->");
    assert_eq!(
        serialize(doc.tree(), doc.root()),
        "<!--a--><!DOCTYPE html><html><head></head><body><p>x</p></body></html><!--b-->"
    );
}

#[test]
fn test_text_after_body_goes_into_body() {
    let doc = parse("<body>a</body>b");
    assert_eq!(body_html(&doc), "ab");
    assert!(codes(&doc).contains(&ParseErrorCode::UnexpectedCharacter));
}

#[test]
fn test_adjacent_text_is_coalesced() {
    let doc = parse("a&amp;b");
    let tree = doc.tree();
    let body = doc.body().unwrap();
    assert_eq!(tree.children(body).len(), 1);
    assert_eq!(tree.as_text(tree.children(body)[0]), Some("a&b"));
}

#[test]
fn test_frameset_document() {
    let doc = parse("<frameset><frame></frameset>");
    assert_eq!(
        serialize(doc.tree(), doc.root()),
        "<html><head></head><frameset><frame></frameset></html>"
    );
    assert_eq!(doc.tag_name(doc.body().unwrap()), Some("frameset"));
}

// -----------------------------------------------------------------------------
// Implicit closing
// -----------------------------------------------------------------------------

#[test]
fn test_p_closes_p() {
    assert_eq!(body_html(&parse("<p>a<p>b")), "<p>a</p><p>b</p>");
}

#[test]
fn test_block_closes_p() {
    assert_eq!(body_html(&parse("<p>a<div>b</div>")), "<p>a</p><div>b</div>");
}

#[test]
fn test_li_closes_li() {
    assert_eq!(
        body_html(&parse("<ul><li>a<li>b</ul>")),
        "<ul><li>a</li><li>b</li></ul>"
    );
}

#[test]
fn test_dd_and_dt_close_each_other() {
    assert_eq!(
        body_html(&parse("<dl><dt>a<dd>b<dt>c</dl>")),
        "<dl><dt>a</dt><dd>b</dd><dt>c</dt></dl>"
    );
}

#[test]
fn test_heading_closes_heading() {
    let doc = parse("<h1>a<h2>b");
    assert_eq!(body_html(&doc), "<h1>a</h1><h2>b</h2>");
    assert!(codes(&doc).contains(&ParseErrorCode::UnexpectedStartTag));
}

#[test]
fn test_option_closes_option() {
    assert_eq!(
        body_html(&parse("<select><option>a<option>b</select>")),
        "<select><option>a</option><option>b</option></select>"
    );
}

#[test]
fn test_stray_p_end_tag_creates_empty_p() {
    let doc = parse("x</p>");
    assert_eq!(body_html(&doc), "x<p></p>");
    assert!(codes(&doc).contains(&ParseErrorCode::UnexpectedEndTag));

    let doc = parse("<body></p>");
    assert_eq!(body_html(&doc), "<p></p>");
}

#[test]
fn test_p_end_tag_before_body_is_ignored() {
    let doc = parse("</p>");
    assert_eq!(body_html(&doc), "");
    assert!(codes(&doc).contains(&ParseErrorCode::UnexpectedEndTag));
}

#[test]
fn test_br_end_tag_becomes_br() {
    assert_eq!(body_html(&parse("a</br>b")), "a<br>b");
}

#[test]
fn test_unmatched_end_tag_is_ignored() {
    let doc = parse("<p>a</div>b");
    assert_eq!(body_html(&doc), "<p>ab</p>");
    assert!(codes(&doc).contains(&ParseErrorCode::UnexpectedEndTag));
}

#[test]
fn test_leading_newline_in_pre_is_dropped() {
    let doc = parse("<pre>\nx</pre><textarea>\ny</textarea>");
    let tree = doc.tree();
    let pre = find_element(tree, NodeId::ROOT, "pre").unwrap();
    let textarea = find_element(tree, NodeId::ROOT, "textarea").unwrap();
    assert_eq!(text_content(tree, pre), "x");
    assert_eq!(text_content(tree, textarea), "y");
}

#[test]
fn test_self_closing_non_void_is_reported_and_ignored() {
    let doc = parse("<div/>x");
    assert_eq!(body_html(&doc), "<div>x</div>");
    assert!(codes(&doc).contains(&ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus));

    let doc = parse("<br/>x");
    assert!(!codes(&doc).contains(&ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus));
}

#[test]
fn test_unclosed_elements_at_eof() {
    assert!(codes(&parse("<div>x")).contains(&ParseErrorCode::EofWithOpenElements));
    assert!(!codes(&parse("<p>x")).contains(&ParseErrorCode::EofWithOpenElements));
}

#[test]
fn test_unclosed_elements_keep_their_content() {
    let doc = parse("<div><span>text");
    let tree = doc.tree();
    let body = doc.body().unwrap();
    let div = tree.first_child(body).unwrap();
    assert_eq!(tree.tag_name(div), Some("div"));
    assert_eq!(tree.children(body).len(), 1);
    let span = tree.first_child(div).unwrap();
    assert_eq!(tree.tag_name(span), Some("span"));
    assert_eq!(tree.children(div).len(), 1);
    let text = tree.first_child(span).unwrap();
    assert_eq!(tree.as_text(text), Some("text"));
    assert_eq!(tree.children(span).len(), 1);
}

#[test]
fn test_duplicate_attribute_keeps_first_value_in_tree() {
    let doc = parse(r#"<a href="1" href="2">x</a>"#);
    let a = find_element(doc.tree(), NodeId::ROOT, "a").unwrap();
    assert_eq!(doc.attribute(a, "href"), Some("1"));
    assert_eq!(doc.tree().as_element(a).unwrap().attrs.len(), 1);
    assert!(codes(&doc).contains(&ParseErrorCode::DuplicateAttribute));
}

// -----------------------------------------------------------------------------
// Formatting elements
// -----------------------------------------------------------------------------

#[test]
fn test_adoption_agency_with_furthest_block() {
    let doc = parse("<b><p>x</b>y");
    assert_eq!(body_html(&doc), "<b></b><p><b>x</b>y</p>");
    assert!(codes(&doc).contains(&ParseErrorCode::MisnestedFormattingElement));
}

#[test]
fn test_every_formatting_end_tag_closes_its_element() {
    assert_eq!(
        body_html(&parse("<tt>a</tt>b<nobr>c</nobr>d<strike>e</strike>f")),
        "<tt>a</tt>b<nobr>c</nobr>d<strike>e</strike>f"
    );
}

#[test]
fn test_misnested_inline_formatting() {
    assert_eq!(
        body_html(&parse("<b>1<i>2</b>3</i>4")),
        "<b>1<i>2</i></b><i>3</i>4"
    );
}

#[test]
fn test_nested_anchor_closes_outer_anchor() {
    assert_eq!(
        body_html(&parse("<a href=x>1<a href=y>2")),
        r#"<a href="x">1</a><a href="y">2</a>"#
    );
}

#[test]
fn test_formatting_is_reconstructed_in_new_block() {
    assert_eq!(
        body_html(&parse("<p><i>a</p><p>b")),
        "<p><i>a</i></p><p><i>b</i></p>"
    );
}

#[test]
fn test_noahs_ark_limits_reconstruction_to_three() {
    assert_eq!(
        body_html(&parse("<p><b><b><b><b></p><p>x")),
        "<p><b><b><b><b></b></b></b></b></p><p><b><b><b>x</b></b></b></p>"
    );
}

// -----------------------------------------------------------------------------
// Tables
// -----------------------------------------------------------------------------

#[test]
fn test_implied_tbody() {
    assert_eq!(
        body_html(&parse("<table><tr><td>a</td></tr></table>")),
        "<table><tbody><tr><td>a</td></tr></tbody></table>"
    );
}

#[test]
fn test_cell_without_row() {
    assert_eq!(
        body_html(&parse("<table><td>a")),
        "<table><tbody><tr><td>a</td></tr></tbody></table>"
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let doc = parse("<table>x<tr><td>y</table>");
    assert_eq!(
        body_html(&doc),
        "x<table><tbody><tr><td>y</td></tr></tbody></table>"
    );
    assert!(codes(&doc).contains(&ParseErrorCode::FosterParentedContent));

    let doc = parse("<table>text<tr></tr></table>");
    assert_eq!(
        body_html(&doc),
        "text<table><tbody><tr></tr></tbody></table>"
    );
    let body = doc.body().unwrap();
    let text = doc.tree().first_child(body).unwrap();
    assert_eq!(doc.tree().as_text(text), Some("text"));
    assert_eq!(doc.tree().next_sibling(text).and_then(|id| doc.tag_name(id)), Some("table"));
}

#[test]
fn test_element_in_table_is_foster_parented() {
    assert_eq!(
        body_html(&parse("<table><div>x</div></table>")),
        "<div>x</div><table></table>"
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        body_html(&parse("<table> <tr></tr></table>")),
        "<table> <tbody><tr></tr></tbody></table>"
    );
}

#[test]
fn test_cell_start_tag_closes_select_in_table() {
    assert_eq!(
        body_html(&parse("<table><tr><td><select><option>a<td>b")),
        "<table><tbody><tr><td><select><option>a</option></select></td><td>b</td></tr></tbody></table>"
    );
}

#[test]
fn test_caption() {
    assert_eq!(
        body_html(&parse("<table><caption>c<tr><td>a</table>")),
        "<table><caption>c</caption><tbody><tr><td>a</td></tr></tbody></table>"
    );
}

// -----------------------------------------------------------------------------
// Quirks mode
// -----------------------------------------------------------------------------

#[test]
fn test_quirks_mode_selection() {
    assert_eq!(parse("<!DOCTYPE html>").quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(parse("<p>").quirks_mode(), QuirksMode::Quirks);
    assert_eq!(
        parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#).quirks_mode(),
        QuirksMode::Quirks
    );
    assert_eq!(
        parse(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#
        )
        .quirks_mode(),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "x">"#)
            .quirks_mode(),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(parse("<!DOCTYPE svg>").quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_table_closes_p_only_outside_quirks_mode() {
    assert_eq!(
        body_html(&parse("<p><table></table>")),
        "<p><table></table></p>"
    );
    assert_eq!(
        body_html(&parse("<!DOCTYPE html><p><table></table>")),
        "<p></p><table></table>"
    );
}

// -----------------------------------------------------------------------------
// Attribute merging
// -----------------------------------------------------------------------------

#[test]
fn test_repeated_html_and_body_merge_attributes() {
    let doc = parse(
        r#"<html lang="en"><body class="a"><html id="x" lang="fr"><body class="b" id="y">"#,
    );
    let html = doc.document_element().unwrap();
    let body = doc.body().unwrap();

    assert_eq!(doc.attribute(html, "lang"), Some("en"));
    assert_eq!(doc.attribute(html, "id"), Some("x"));
    assert_eq!(doc.attribute(body, "class"), Some("a"));
    assert_eq!(doc.attribute(body, "id"), Some("y"));
    assert_eq!(
        serialize(doc.tree(), html),
        r#"<html lang="en" id="x"><head></head><body class="a" id="y"></body></html>"#
    );
}

// -----------------------------------------------------------------------------
// Options, issues and failure
// -----------------------------------------------------------------------------

#[test]
fn test_missing_input_is_a_contract_violation() {
    let err = HTMLParser::new(options()).parse(None).unwrap_err();
    assert!(matches!(err, ContractViolation::NullValue(_)));
}

#[test]
fn test_issues_are_in_input_order() {
    let doc = parse(r#"<p id=a id=b></div><1"#);
    let starts: Vec<usize> = doc.issues().iter().map(|issue| issue.span.start).collect();
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));

    let found = codes(&doc);
    assert_eq!(found[0], ParseErrorCode::MissingDoctype);
    assert!(found.contains(&ParseErrorCode::DuplicateAttribute));
    assert!(found.contains(&ParseErrorCode::UnexpectedEndTag));
    assert!(found.contains(&ParseErrorCode::InvalidFirstCharacterOfTagName));
}

#[test]
fn test_issue_collection_can_be_turned_off() {
    let doc = HTMLParser::new(options().with_collect_issues(false))
        .parse(Some("<p id=a id=b></div>"))
        .unwrap();
    assert!(doc.issues().is_empty());
}

#[test]
fn test_declared_encoding_is_recorded() {
    let doc = HTMLParser::new(options().with_declared_encoding("windows-1252"))
        .parse(Some("x"))
        .unwrap();
    assert_eq!(doc.declared_encoding(), Some("windows-1252"));
    assert_eq!(parse("x").declared_encoding(), None);
}

#[test]
fn test_zero_reprocess_budget_drops_tokens_and_terminates() {
    let doc = HTMLParser::new(options().with_reprocess_budget(0))
        .parse(Some("hello"))
        .unwrap();
    assert!(codes(&doc).contains(&ParseErrorCode::ReprocessBudgetExceeded));
}

#[test]
fn test_default_budget_is_enough_for_ordinary_markup() {
    let doc = parse("<table><tr><td><select><option>a<td>b</table>text");
    assert!(!codes(&doc).contains(&ParseErrorCode::ReprocessBudgetExceeded));
}

#[test]
fn test_descendants_start_at_the_document() {
    let doc = parse("<p>x");
    let ids: Vec<NodeId> = doc.descendants().collect();
    assert_eq!(ids[0], doc.root());
    // Document, html, head, body, p, "x"
    assert_eq!(ids.len(), 6);
}

#[test]
fn test_tree_builder_driven_by_hand() {
    let mut tokenizer = HTMLTokenizer::new("<!DOCTYPE html><p>").with_warnings(false);
    let mut builder = TreeBuilder::new(&options());
    assert_eq!(builder.insertion_mode(), InsertionMode::Initial);

    builder.process_token(&tokenizer.next_token().unwrap()).unwrap();
    assert_eq!(builder.insertion_mode(), InsertionMode::BeforeHtml);
    assert_eq!(builder.quirks_mode(), QuirksMode::NoQuirks);

    builder.process_token(&tokenizer.next_token().unwrap()).unwrap();
    assert_eq!(builder.insertion_mode(), InsertionMode::InBody);
    let open: Vec<_> = builder
        .open_elements()
        .iter()
        .filter_map(|&id| builder.tree().tag_name(id))
        .collect();
    assert_eq!(open, vec!["html", "body", "p"]);

    let eof = tokenizer.next_token().unwrap();
    assert!(eof.token.is_eof());
    builder.process_token(&eof).unwrap();
    assert!(builder.is_stopped());
    assert!(builder.open_elements().is_empty());
}
