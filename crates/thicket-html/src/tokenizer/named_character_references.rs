//! Named character reference lookup table.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! The full table in § 13.5 defines 2,231 entities. This one carries every
//! legacy entity that also works without a trailing semicolon (the whole of
//! Latin-1 plus `amp`, `lt`, `gt`, `quot` and their uppercase forms) and the
//! commonly used semicolon-terminated ones: typography, arrows, maths and Greek.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Latin-1 entity names for U+00A0 through U+00FF, in code point order.
/// Every one of these is also recognized without its semicolon.
const LATIN1: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", //
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr", //
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot", //
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest", //
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", //
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", //
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times", //
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig", //
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil", //
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", //
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", //
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml", //
];

/// Other legacy entities usable without a semicolon.
const LEGACY_ASCII: [(&str, &str); 10] = [
    ("amp", "&"),
    ("AMP", "&"),
    ("lt", "<"),
    ("LT", "<"),
    ("gt", ">"),
    ("GT", ">"),
    ("quot", "\""),
    ("QUOT", "\""),
    ("COPY", "\u{00A9}"),
    ("REG", "\u{00AE}"),
];

/// Entities that are only recognized with their trailing semicolon.
const SEMICOLON_ONLY: &[(&str, &str)] = &[
    ("apos;", "'"),
    ("Tab;", "\t"),
    ("NewLine;", "\n"),
    ("fjlig;", "fj"),
    // Punctuation and typography
    ("ensp;", "\u{2002}"),
    ("emsp;", "\u{2003}"),
    ("thinsp;", "\u{2009}"),
    ("zwnj;", "\u{200C}"),
    ("zwj;", "\u{200D}"),
    ("lrm;", "\u{200E}"),
    ("rlm;", "\u{200F}"),
    ("hyphen;", "\u{2010}"),
    ("dash;", "\u{2010}"),
    ("ndash;", "\u{2013}"),
    ("mdash;", "\u{2014}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("sbquo;", "\u{201A}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("bdquo;", "\u{201E}"),
    ("dagger;", "\u{2020}"),
    ("Dagger;", "\u{2021}"),
    ("bull;", "\u{2022}"),
    ("hellip;", "\u{2026}"),
    ("permil;", "\u{2030}"),
    ("prime;", "\u{2032}"),
    ("Prime;", "\u{2033}"),
    ("lsaquo;", "\u{2039}"),
    ("rsaquo;", "\u{203A}"),
    ("oline;", "\u{203E}"),
    ("frasl;", "\u{2044}"),
    ("euro;", "\u{20AC}"),
    ("trade;", "\u{2122}"),
    ("check;", "\u{2713}"),
    ("circ;", "\u{02C6}"),
    ("tilde;", "\u{02DC}"),
    ("OElig;", "\u{0152}"),
    ("oelig;", "\u{0153}"),
    ("Scaron;", "\u{0160}"),
    ("scaron;", "\u{0161}"),
    ("Yuml;", "\u{0178}"),
    ("fnof;", "\u{0192}"),
    // Arrows
    ("larr;", "\u{2190}"),
    ("uarr;", "\u{2191}"),
    ("rarr;", "\u{2192}"),
    ("darr;", "\u{2193}"),
    ("harr;", "\u{2194}"),
    ("crarr;", "\u{21B5}"),
    ("lArr;", "\u{21D0}"),
    ("uArr;", "\u{21D1}"),
    ("rArr;", "\u{21D2}"),
    ("dArr;", "\u{21D3}"),
    ("hArr;", "\u{21D4}"),
    // Mathematical operators
    ("forall;", "\u{2200}"),
    ("part;", "\u{2202}"),
    ("exist;", "\u{2203}"),
    ("empty;", "\u{2205}"),
    ("nabla;", "\u{2207}"),
    ("isin;", "\u{2208}"),
    ("notin;", "\u{2209}"),
    ("ni;", "\u{220B}"),
    ("prod;", "\u{220F}"),
    ("sum;", "\u{2211}"),
    ("minus;", "\u{2212}"),
    ("lowast;", "\u{2217}"),
    ("radic;", "\u{221A}"),
    ("prop;", "\u{221D}"),
    ("infin;", "\u{221E}"),
    ("ang;", "\u{2220}"),
    ("and;", "\u{2227}"),
    ("or;", "\u{2228}"),
    ("cap;", "\u{2229}"),
    ("cup;", "\u{222A}"),
    ("int;", "\u{222B}"),
    ("there4;", "\u{2234}"),
    ("sim;", "\u{223C}"),
    ("cong;", "\u{2245}"),
    ("asymp;", "\u{2248}"),
    ("ne;", "\u{2260}"),
    ("equiv;", "\u{2261}"),
    ("le;", "\u{2264}"),
    ("ge;", "\u{2265}"),
    ("sub;", "\u{2282}"),
    ("sup;", "\u{2283}"),
    ("nsub;", "\u{2284}"),
    ("sube;", "\u{2286}"),
    ("supe;", "\u{2287}"),
    ("oplus;", "\u{2295}"),
    ("otimes;", "\u{2297}"),
    ("perp;", "\u{22A5}"),
    ("sdot;", "\u{22C5}"),
    ("lceil;", "\u{2308}"),
    ("rceil;", "\u{2309}"),
    ("lfloor;", "\u{230A}"),
    ("rfloor;", "\u{230B}"),
    ("lang;", "\u{27E8}"),
    ("rang;", "\u{27E9}"),
    ("loz;", "\u{25CA}"),
    ("spades;", "\u{2660}"),
    ("clubs;", "\u{2663}"),
    ("hearts;", "\u{2665}"),
    ("diams;", "\u{2666}"),
    // Greek
    ("Alpha;", "\u{0391}"),
    ("Beta;", "\u{0392}"),
    ("Gamma;", "\u{0393}"),
    ("Delta;", "\u{0394}"),
    ("Epsilon;", "\u{0395}"),
    ("Zeta;", "\u{0396}"),
    ("Eta;", "\u{0397}"),
    ("Theta;", "\u{0398}"),
    ("Iota;", "\u{0399}"),
    ("Kappa;", "\u{039A}"),
    ("Lambda;", "\u{039B}"),
    ("Mu;", "\u{039C}"),
    ("Nu;", "\u{039D}"),
    ("Xi;", "\u{039E}"),
    ("Omicron;", "\u{039F}"),
    ("Pi;", "\u{03A0}"),
    ("Rho;", "\u{03A1}"),
    ("Sigma;", "\u{03A3}"),
    ("Tau;", "\u{03A4}"),
    ("Upsilon;", "\u{03A5}"),
    ("Phi;", "\u{03A6}"),
    ("Chi;", "\u{03A7}"),
    ("Psi;", "\u{03A8}"),
    ("Omega;", "\u{03A9}"),
    ("alpha;", "\u{03B1}"),
    ("beta;", "\u{03B2}"),
    ("gamma;", "\u{03B3}"),
    ("delta;", "\u{03B4}"),
    ("epsilon;", "\u{03B5}"),
    ("zeta;", "\u{03B6}"),
    ("eta;", "\u{03B7}"),
    ("theta;", "\u{03B8}"),
    ("iota;", "\u{03B9}"),
    ("kappa;", "\u{03BA}"),
    ("lambda;", "\u{03BB}"),
    ("mu;", "\u{03BC}"),
    ("nu;", "\u{03BD}"),
    ("xi;", "\u{03BE}"),
    ("omicron;", "\u{03BF}"),
    ("pi;", "\u{03C0}"),
    ("rho;", "\u{03C1}"),
    ("sigmaf;", "\u{03C2}"),
    ("sigma;", "\u{03C3}"),
    ("tau;", "\u{03C4}"),
    ("upsilon;", "\u{03C5}"),
    ("phi;", "\u{03C6}"),
    ("chi;", "\u{03C7}"),
    ("psi;", "\u{03C8}"),
    ("omega;", "\u{03C9}"),
    ("thetasym;", "\u{03D1}"),
    ("upsih;", "\u{03D2}"),
    ("piv;", "\u{03D6}"),
];

/// Maps entity names (without the leading '&') to their replacement text.
/// Legacy entities appear twice, with and without the semicolon.
static NAMED_ENTITIES: LazyLock<HashMap<String, String>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    let latin1 = LATIN1
        .iter()
        .zip(0xA0_u32..)
        .filter_map(|(name, code)| char::from_u32(code).map(|c| (*name, c.to_string())));
    let legacy = LEGACY_ASCII
        .iter()
        .map(|(name, value)| (*name, (*value).to_string()));
    for (name, value) in latin1.chain(legacy) {
        let _ = table.insert(format!("{name};"), value.clone());
        let _ = table.insert(name.to_string(), value);
    }
    for (name, value) in SEMICOLON_ONLY {
        let _ = table.insert((*name).to_string(), (*value).to_string());
    }
    table
});

/// Every proper and improper prefix of every entity name.
static PREFIXES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let mut prefixes = HashSet::new();
    for name in NAMED_ENTITIES.keys() {
        for (end, _) in name.char_indices().skip(1) {
            let _ = prefixes.insert(name[..end].to_string());
        }
        let _ = prefixes.insert(name.clone());
    }
    prefixes
});

/// Look up a named character reference.
///
/// Returns the replacement string if found.
/// The `name` should NOT include the leading '&'.
///
/// ```
/// use thicket_html::tokenizer::named_character_references::lookup_entity;
///
/// assert_eq!(lookup_entity("amp;"), Some("&"));
/// assert_eq!(lookup_entity("amp"), Some("&"));
/// assert_eq!(lookup_entity("hellip"), None);
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).map(String::as_str)
}

/// Check if any entity name starts with the given prefix.
///
/// Used to decide whether to keep consuming characters while looking for the
/// longest match.
#[must_use]
pub fn any_entity_has_prefix(prefix: &str) -> bool {
    PREFIXES.contains(prefix)
}
