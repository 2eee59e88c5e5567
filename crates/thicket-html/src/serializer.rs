//! Turning a tree back into markup, and a debug dump of its structure.

use core::fmt::Write as _;

use thicket_dom::{DomTree, NodeId, NodeType};

/// [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
/// "void elements": start tag only, no children, no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current node's
/// data literally."
const RAW_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize `id` and everything below it as HTML.
///
/// An element is written with its own start and end tags. For the Document
/// node the output is its children in order, DOCTYPE included, which is a
/// complete document that parses back to the same tree.
#[must_use]
pub fn serialize(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_node(tree, id, &mut out);
    out
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => serialize_children(tree, id, out),

        // "If current node is a DocumentType: Append "<!DOCTYPE", a space, the
        // value of current node's name, and ">"."
        NodeType::DocumentType(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }

        // "If current node is an Element"
        NodeType::Element(element) => {
            let tag = element.tag_name.as_str();
            out.push('<');
            out.push_str(tag);
            // "For each attribute that the element has, append a U+0020 SPACE
            // character, the attribute's serialized name, "=", a U+0022
            // QUOTATION MARK character ("), the attribute's value, escaped as
            // described below in attribute mode, and a second U+0022 QUOTATION
            // MARK character (")."
            for (name, value) in element.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');

            // "If current node serializes as void, then continue on to the
            // next child node at this point."
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            // The parser drops one leading newline inside these, so a text
            // child that starts with one needs an extra one to survive.
            if matches!(tag, "pre" | "textarea" | "listing")
                && tree
                    .first_child(id)
                    .and_then(|child| tree.as_text(child))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                out.push('\n');
            }

            serialize_children(tree, id, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }

        // "If current node is a Text node"
        NodeType::Text(text) => {
            let raw = tree
                .parent(id)
                .and_then(|parent| tree.tag_name(parent))
                .is_some_and(|parent| RAW_TEXT_PARENTS.contains(&parent));
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }

        // "If current node is a Comment: Append "<!--", the value of current
        // node's data, and "-->"."
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
    }
}

fn serialize_children(tree: &DomTree, id: NodeId, out: &mut String) {
    for &child in tree.children(id) {
        serialize_node(tree, child, out);
    }
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
/// "Escaping a string":
///
/// "1. Replace any occurrence of the "&" character by the string "&amp;"."
/// "2. Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;"."
/// "3. Replace any occurrences of the "<" character by the string "&lt;"."
/// "4. Replace any occurrences of the ">" character by the string "&gt;"."
/// "5. If the algorithm was invoked in the attribute mode, then replace any
/// occurrences of the """ character by the string "&quot;"."
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Render the tree below `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_tree(tree, id, indent, &mut out);
    print!("{out}");
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}#document"),
        NodeType::DocumentType(doctype) => writeln!(out, "{prefix}<!DOCTYPE {}>", doctype.name),
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                writeln!(out, "{prefix}<{}>", data.tag_name)
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child in tree.children(id) {
        write_tree(tree, child, indent + 1, out);
    }
}
