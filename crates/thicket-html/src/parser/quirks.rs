//! Quirks mode selection from the DOCTYPE token.
//!
//! [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use crate::document::QuirksMode;

/// "The public identifier starts with" one of these: quirks mode.
const QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// "The public identifier is set to" one of these: quirks mode.
const QUIRKY_PUBLIC_IDENTIFIERS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// HTML 4.01 frameset and transitional: quirks without a system identifier,
/// limited quirks with one.
const HTML401_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// XHTML 1.0 frameset and transitional: limited quirks.
const LIMITED_QUIRKS_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

const QUIRKY_SYSTEM_IDENTIFIER: &str =
    "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

fn starts_with_any(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| value.starts_with(prefix))
}

/// "Then, if the document is not an iframe srcdoc document, and the parser
/// cannot change the mode flag is false, and the DOCTYPE token matches one of
/// the conditions in the following list, then set the Document to quirks
/// mode"; "Otherwise, ... if the DOCTYPE token matches one of the conditions
/// in the following list, then set the Document to limited-quirks mode".
///
/// All identifier comparisons are ASCII case-insensitive.
pub(super) fn quirks_mode_for_doctype(
    name: Option<&str>,
    public_identifier: Option<&str>,
    system_identifier: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    let public = public_identifier.map(str::to_ascii_lowercase);
    let system = system_identifier.map(str::to_ascii_lowercase);
    let public = public.as_deref();

    // "The force-quirks flag is set to on."
    // "The name is not "html"."
    if force_quirks || name != Some("html") {
        return QuirksMode::Quirks;
    }

    if let Some(public) = public {
        if QUIRKY_PUBLIC_IDENTIFIERS.contains(&public)
            || starts_with_any(public, QUIRKY_PUBLIC_PREFIXES)
        {
            return QuirksMode::Quirks;
        }
        // "The system identifier is missing and the public identifier starts
        // with: "-//W3C//DTD HTML 4.01 Frameset//" ..."
        if starts_with_any(public, HTML401_PUBLIC_PREFIXES) {
            return if system.is_none() {
                QuirksMode::Quirks
            } else {
                QuirksMode::LimitedQuirks
            };
        }
        if starts_with_any(public, LIMITED_QUIRKS_PUBLIC_PREFIXES) {
            return QuirksMode::LimitedQuirks;
        }
    }

    // "The system identifier is set to:
    // "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd""
    if system.as_deref() == Some(QUIRKY_SYSTEM_IDENTIFIER) {
        return QuirksMode::Quirks;
    }

    QuirksMode::NoQuirks
}
