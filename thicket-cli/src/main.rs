//! thicket command line
//!
//! Parses an HTML file or string and prints what the parser made of it:
//! the tree, its JSON form, the re-serialized markup or the raw token stream.
//! Recovered parse errors go to stderr so they never mix with the output.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use thicket_common::warning::set_warnings_enabled;
use thicket_dom::{DomTree, NodeId, NodeType};
use thicket_html::{HTMLParser, HTMLTokenizer, ParseIssue, ParseOptions, print_tree, serialize};

/// thicket: a forgiving HTML parser
#[derive(Parser, Debug)]
#[command(name = "thicket")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM tree of a file
    thicket ./index.html

    # Parse inline HTML
    thicket --html '<p>One<p>Two'

    # Dump the tree as JSON
    thicket --output json ./index.html

    # Show the token stream and every recovered error
    thicket --output tokens --issues --html '<a href=x>&amp'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Output::Tree)]
    output: Output,

    /// List recovered parse errors on stderr after the output
    #[arg(short, long)]
    issues: bool,

    /// Do not print warnings while parsing
    #[arg(short, long)]
    quiet: bool,

    /// How many times one token may be reprocessed before it is dropped
    #[arg(long, value_name = "N", default_value_t = 16)]
    reprocess_budget: usize,

    /// Encoding label the input was decoded with, recorded on the document
    #[arg(long, value_name = "LABEL")]
    encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Indented DOM tree
    Tree,
    /// DOM tree as JSON
    Json,
    /// Serialized HTML
    Html,
    /// Token stream with byte spans, no tree construction
    Tokens,
}

/// JSON shape of one node.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonNode {
    Document {
        children: Vec<JsonNode>,
    },
    #[serde(rename_all = "camelCase")]
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Element {
        tag_name: String,
        attributes: Vec<JsonAttribute>,
        children: Vec<JsonNode>,
    },
    Text {
        content: String,
    },
    Comment {
        content: String,
    },
}

#[derive(Debug, Serialize)]
struct JsonAttribute {
    name: String,
    value: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet {
        set_warnings_enabled(false);
    }
    let input = read_input(&cli)?;

    if cli.output == Output::Tokens {
        return print_tokens(&cli, &input);
    }

    let mut options = ParseOptions::default()
        .with_reprocess_budget(cli.reprocess_budget)
        .with_log_warnings(!cli.quiet);
    if let Some(label) = &cli.encoding {
        options = options.with_declared_encoding(label.as_str());
    }

    let document = HTMLParser::new(options).parse(Some(&input))?;
    let tree = document.tree();

    match cli.output {
        Output::Tree => {
            println!("{}", "=== DOM Tree ===".bold());
            print_tree(tree, document.root(), 0);
            println!("\nquirks mode: {:?}", document.quirks_mode());
            if let Some(encoding) = document.declared_encoding() {
                println!("encoding: {encoding}");
            }
        }
        Output::Json => {
            let json = json_node(tree, document.root())
                .context("document has no root node")?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Output::Html => println!("{}", serialize(tree, document.root())),
        Output::Tokens => {}
    }

    if cli.issues {
        print_issues(document.issues());
    }
    Ok(())
}

/// Read the document from `--html` or from FILE. Bytes that are not valid
/// UTF-8 are replaced rather than rejected.
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    let Some(path) = &cli.path else {
        bail!("no input: pass a FILE or --html '<p>...'");
    };
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_tokens(cli: &Cli, input: &str) -> Result<()> {
    let mut tokenizer = HTMLTokenizer::new(input).with_warnings(!cli.quiet);
    loop {
        let spanned = tokenizer.next_token()?;
        println!("{spanned}");
        if spanned.token.is_eof() {
            break;
        }
    }
    if cli.issues {
        print_issues(tokenizer.issues());
    }
    Ok(())
}

fn print_issues(issues: &[ParseIssue]) {
    eprintln!("{}", "=== Parse Issues ===".bold());
    for issue in issues {
        eprintln!("{}", issue.to_string().yellow());
    }
    eprintln!("{} issue(s)", issues.len());
}

fn json_node(tree: &DomTree, id: NodeId) -> Option<JsonNode> {
    let node = tree.get(id)?;
    let children = || -> Vec<JsonNode> {
        tree.children(id)
            .iter()
            .filter_map(|&child| json_node(tree, child))
            .collect()
    };
    Some(match &node.node_type {
        NodeType::Document => JsonNode::Document {
            children: children(),
        },
        NodeType::DocumentType(doctype) => JsonNode::Doctype {
            name: doctype.name.clone(),
            public_id: doctype.public_id.clone(),
            system_id: doctype.system_id.clone(),
        },
        NodeType::Element(data) => JsonNode::Element {
            tag_name: data.tag_name.clone(),
            attributes: data
                .attrs
                .iter()
                .map(|(name, value)| JsonAttribute {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
            children: children(),
        },
        NodeType::Text(text) => JsonNode::Text {
            content: text.clone(),
        },
        NodeType::Comment(text) => JsonNode::Comment {
            content: text.clone(),
        },
    })
}
