//! Tests for serialization and the debug tree dump.

use thicket_dom::NodeId;
use thicket_html::{Document, HTMLParser, ParseOptions, format_tree, serialize};

fn parse(html: &str) -> Document {
    HTMLParser::new(ParseOptions::default().with_log_warnings(false))
        .parse(Some(html))
        .unwrap()
}

fn to_html(html: &str) -> String {
    let doc = parse(html);
    serialize(doc.tree(), doc.root())
}

fn body_html(html: &str) -> String {
    let doc = parse(html);
    let body = doc.body().unwrap();
    doc.tree()
        .children(body)
        .iter()
        .map(|&child| serialize(doc.tree(), child))
        .collect()
}

#[test]
fn test_text_is_escaped() {
    assert_eq!(body_html("a&lt;b&amp;c&gt;"), "a&lt;b&amp;c&gt;");
    assert_eq!(body_html("x&nbsp;y"), "x&nbsp;y");
    assert_eq!(body_html("\"quoted\""), "\"quoted\"");
}

#[test]
fn test_attribute_values_are_escaped() {
    assert_eq!(
        body_html(r#"<p title='say "hi" & go'>"#),
        r#"<p title="say &quot;hi&quot; &amp; go"></p>"#
    );
}

#[test]
fn test_void_elements_have_no_end_tag() {
    assert_eq!(
        body_html("<br><img src=a.png><input disabled>"),
        r#"<br><img src="a.png"><input disabled="">"#
    );
}

#[test]
fn test_raw_text_is_not_escaped() {
    let html = to_html("<style>a > b { }</style><script>if (a < b && c) {}</script>");
    assert!(html.contains("<style>a > b { }</style>"));
    assert!(html.contains("<script>if (a < b && c) {}</script>"));
}

#[test]
fn test_rcdata_is_escaped() {
    let html = to_html("<title>&lt;t&gt;</title>");
    assert!(html.contains("<title>&lt;t&gt;</title>"));
}

#[test]
fn test_comment_and_doctype() {
    assert_eq!(
        to_html("<!DOCTYPE html><!-- note -->"),
        "<!DOCTYPE html><!-- note --><html><head></head><body></body></html>"
    );
}

#[test]
fn test_leading_newline_in_pre_survives() {
    let doc = parse("<pre>\n\nx</pre>");
    let html = serialize(doc.tree(), doc.body().unwrap());
    assert_eq!(html, "<body><pre>\n\nx</pre></body>");
}

#[test]
fn test_serializing_a_single_text_node() {
    let doc = parse("<p>1 &lt; 2</p>");
    let body = doc.body().unwrap();
    let p = doc.tree().first_child(body).unwrap();
    let text = doc.tree().first_child(p).unwrap();
    assert_eq!(serialize(doc.tree(), text), "1 &lt; 2");
}

#[test]
fn test_serialize_then_parse_is_stable() {
    let inputs = [
        "<p>a<p>b",
        "<b><p>x</b>y",
        "<b>1<i>2</b>3</i>4",
        "<table>x<tr><td>y</table>",
        "<ul><li>1<li>2</ul>",
        "<select><option>a<option>b</select>",
        "<pre>\n\nx</pre>",
        "<textarea>\n\na &amp; b</textarea>",
        r#"<!--c--><!DOCTYPE html><title>&lt;t&gt;</title><p id="a&quot;">x&amp;y"#,
        "<frameset><frame></frameset>",
        "<html lang=en><body class=a><html id=x>",
    ];
    for input in inputs {
        let once = to_html(input);
        let twice = to_html(&once);
        assert_eq!(once, twice, "unstable serialization for {input:?}");
    }
}

#[test]
fn test_format_tree() {
    let doc = parse("<!DOCTYPE html><p class=a>x y<!--c-->");
    let expected = "\
#document
  <!DOCTYPE html>
  <html>
    <head>
    <body>
      <p class=\"a\">
        \"x\u{B7}y\"
        <!-- c -->
";
    assert_eq!(format_tree(doc.tree(), NodeId::ROOT), expected);
}

#[test]
fn test_format_tree_escapes_newlines() {
    let doc = parse("<p>a\nb");
    let dump = format_tree(doc.tree(), doc.body().unwrap());
    assert!(dump.contains("\"a\\nb\""));
}
