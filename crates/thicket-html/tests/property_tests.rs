//! Property tests: the tokenizer and parser accept any input and always
//! produce a well-formed tree.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use thicket_dom::{DomTree, NodeId};
use thicket_html::{CharacterReader, HTMLParser, HTMLTokenizer, ParseOptions};

/// Markup fragments that exercise most insertion modes when shuffled.
const FRAGMENTS: &[&str] = &[
    "<p>", "</p>", "<b>", "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<div>", "</div>",
    "<table>", "</table>", "<tr>", "</tr>", "<td>", "</td>", "<th>", "<tbody>", "<caption>",
    "<colgroup>", "<col>", "<select>", "</select>", "<option>", "<optgroup>", "<ul>", "<li>",
    "<dl>", "<dd>", "<dt>", "<h1>", "<h2>", "</h1>", "<form>", "</form>", "<button>",
    "</button>", "<nobr>", "<frameset>", "<frame>", "<head>", "<body>", "</body>", "<html>",
    "</html>", "<title>", "</title>", "<script>", "</script>", "<style>", "<textarea>",
    "<noscript>", "<plaintext>", "<pre>", "<br>", "</br>", "<hr/>", "<img>", "<input>",
    "<template>", "<svg/>", "<!DOCTYPE html>", "<!-- c -->", "<!", "&amp;", "&#x41;", "&",
    "<", ">", "text", " ", "\n", "\0",
];

#[derive(Debug, Clone)]
struct TagSoup(String);

impl Arbitrary for TagSoup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 48;
        let soup = (0..len)
            .filter_map(|_| g.choose(FRAGMENTS).copied())
            .collect();
        Self(soup)
    }
}

fn quiet() -> ParseOptions {
    ParseOptions::default().with_log_warnings(false)
}

/// Every attached node is listed by its parent exactly once and reachable
/// from the root exactly once.
fn tree_is_consistent(tree: &DomTree) -> bool {
    let mut seen = vec![false; tree.len()];
    for id in tree.descendants(NodeId::ROOT) {
        if std::mem::replace(&mut seen[id.0], true) {
            return false;
        }
        for &child in tree.children(id) {
            if tree.parent(child) != Some(id) {
                return false;
            }
        }
    }
    true
}

#[quickcheck]
fn parsing_any_string_succeeds(input: String) -> bool {
    let Ok(doc) = HTMLParser::new(quiet()).parse(Some(&input)) else {
        return false;
    };
    doc.document_element()
        .is_some_and(|html| doc.tag_name(html) == Some("html"))
        && tree_is_consistent(doc.tree())
}

#[quickcheck]
fn parsing_tag_soup_succeeds(soup: TagSoup) -> bool {
    let Ok(doc) = HTMLParser::new(quiet()).parse(Some(&soup.0)) else {
        return false;
    };
    let len = CharacterReader::new(&soup.0).len();
    doc.body().is_some()
        && tree_is_consistent(doc.tree())
        && doc.issues().iter().all(|issue| issue.span.end <= len)
}

#[quickcheck]
fn tiny_reprocess_budgets_still_terminate(soup: TagSoup, budget: u8) -> bool {
    let options = quiet().with_reprocess_budget(usize::from(budget % 3));
    HTMLParser::new(options)
        .parse(Some(&soup.0))
        .is_ok_and(|doc| tree_is_consistent(doc.tree()))
}

#[quickcheck]
fn tokenizer_ends_with_a_single_eof(input: String) -> bool {
    let len = CharacterReader::new(&input).len();
    let tokens: Result<Vec<_>, _> = HTMLTokenizer::new(&input).with_warnings(false).collect();
    let Ok(tokens) = tokens else {
        return false;
    };
    let eof_count = tokens.iter().filter(|t| t.token.is_eof()).count();
    eof_count == 1
        && tokens.last().is_some_and(|t| t.token.is_eof())
        && tokens.iter().all(|t| t.span.start <= t.span.end && t.span.end <= len)
}
