//! Structural signature extraction from markup documents.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Attributes that define structure and survive extraction.
const STRUCTURAL_ATTRS: &[&str] = &["class", "id", "href", "src"];

/// Attributes whose values are dynamic URLs, replaced by a placeholder.
const URL_ATTRS: &[&str] = &["href", "src"];

/// Elements whose entire subtree is dropped.
const DROPPED_ELEMENTS: &[&str] = &["script", "style"];

const URL_PLACEHOLDER: &str = "URL_PLACEHOLDER";

/// Extract the structural signature of a document template.
///
/// - every text node collapses to a single placeholder space
/// - `script`/`style` subtrees are removed entirely
/// - only `class`, `id`, `href`, `src` attributes are retained, with
///   `href`/`src` values replaced by a constant placeholder
/// - the result is re-serialized with whitespace runs collapsed and trimmed
///
/// The walk is lenient: mismatched or unclosed tags are tolerated, and a
/// malformed tail simply ends the walk. The same input always yields the
/// same signature.
pub fn extract_template_structure(body: &str) -> String {
    let mut reader = Reader::from_str(body);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut out = String::new();
    // When inside a script/style element, everything is discarded until the
    // matching end tag by *name*: script bodies routinely contain angle
    // brackets that would corrupt a depth counter.
    let mut dropped: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e);
                if dropped.is_some() {
                    continue;
                }
                if DROPPED_ELEMENTS.contains(&name.as_str()) {
                    dropped = Some(name);
                } else {
                    write_start_tag(&mut out, &name, e, false);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if dropped.is_none() {
                    let name = tag_name(e);
                    if !DROPPED_ELEMENTS.contains(&name.as_str()) {
                        write_start_tag(&mut out, &name, e, true);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                match &dropped {
                    Some(dropped_name) => {
                        if &name == dropped_name {
                            dropped = None;
                        }
                    }
                    None => {
                        out.push_str("</");
                        out.push_str(&name);
                        out.push('>');
                    }
                }
            }
            Ok(Event::Text(_)) | Ok(Event::CData(_)) => {
                if dropped.is_none() {
                    // Text content never affects the fingerprint
                    out.push(' ');
                }
            }
            Ok(Event::Comment(_))
            | Ok(Event::Decl(_))
            | Ok(Event::PI(_))
            | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            // Lenient: hash the walkable prefix of a malformed document
            Err(_) => break,
        }
    }

    collapse_whitespace(&out)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_lowercase()
}

fn write_start_tag(out: &mut String, name: &str, e: &BytesStart<'_>, self_closing: bool) {
    out.push('<');
    out.push_str(name);

    for attr in e.attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        if !STRUCTURAL_ATTRS.contains(&key.as_str()) {
            continue;
        }
        let value = if URL_ATTRS.contains(&key.as_str()) {
            URL_PLACEHOLDER.to_string()
        } else {
            String::from_utf8_lossy(&attr.value).into_owned()
        };
        out.push(' ');
        out.push_str(&key);
        out.push_str("=\"");
        out.push_str(&value);
        out.push('"');
    }

    if self_closing {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_becomes_placeholder() {
        let structure = extract_template_structure("<div>Hello world</div>");
        assert_eq!(structure, "<div> </div>");
    }

    #[test]
    fn test_script_and_style_subtrees_dropped() {
        let structure = extract_template_structure(
            "<div><script>var x = \"<b>\";</script><style>.a { color: red }</style><p>ok</p></div>",
        );
        assert_eq!(structure, "<div><p> </p></div>");
    }

    #[test]
    fn test_attribute_allow_list() {
        let structure = extract_template_structure(
            r#"<td class="cell" id="c1" style="color:red" data-ts="1732814400">x</td>"#,
        );
        assert_eq!(structure, r#"<td class="cell" id="c1"> </td>"#);
    }

    #[test]
    fn test_urls_replaced_by_placeholder() {
        let a = extract_template_structure(r#"<a href="https://x.example/1">v</a>"#);
        let b = extract_template_structure(r#"<a href="https://y.example/2?q=3">v</a>"#);
        assert_eq!(a, b);
        assert_eq!(a, r#"<a href="URL_PLACEHOLDER"> </a>"#);
    }

    #[test]
    fn test_self_closing_tags_kept() {
        let structure = extract_template_structure(r#"<div><img src="/logo.png"/><br/></div>"#);
        assert_eq!(structure, r#"<div><img src="URL_PLACEHOLDER"/><br/></div>"#);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let structure = extract_template_structure("<div>\n\n   <p>  a  </p>\t</div>");
        assert_eq!(structure, "<div> <p> </p> </div>");
    }

    #[test]
    fn test_malformed_tail_is_tolerated() {
        // Unclosed tag: the walkable prefix still produces a stable signature
        let a = extract_template_structure("<div><p>text");
        let b = extract_template_structure("<div><p>other");
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_insensitive_names() {
        let a = extract_template_structure(r#"<DIV CLASS="row">x</DIV>"#);
        let b = extract_template_structure(r#"<div class="row">x</div>"#);
        assert_eq!(a, b);
    }
}
