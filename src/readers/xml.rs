use crate::caption::{Caption, CaptionList};
use crate::error::ConvertError;
use crate::timestamp::{parse_offset, parse_timestamp};

use std::time::Duration;

use roxmltree::{Document, Node};

/// Parses XML-based caption dialects (TTML, DFXP and friends) by
/// searching the element tree for nodes carrying timing attributes.
/// Only a document that fails to parse as XML at all is an error;
/// individual elements with missing or broken timing are skipped.
pub fn parse(input: &str) -> Result<CaptionList, ConvertError> {
    let doc = Document::parse(input).map_err(|err| {
        ConvertError::MalformedDocument(format!("Input is not well-formed XML: {}", err))
    })?;

    let mut list = CaptionList::new();
    walk(doc.root_element(), &mut list);
    Ok(list)
}

fn walk(node: Node, list: &mut CaptionList) {
    for child in node.children().filter(|n| n.is_element()) {
        if has_timing(&child) {
            // Timed elements are leaves as far as we are concerned; their
            // descendants only contribute text.
            if let Some(caption) = timed_caption(&child) {
                list.append(caption);
            }
        } else {
            walk(child, list);
        }
    }
}

fn has_timing(node: &Node) -> bool {
    node.attribute("begin")
        .or_else(|| node.attribute("start"))
        .is_some()
}

fn timed_caption(node: &Node) -> Option<Caption> {
    let name = node.tag_name().name().to_string();
    let begin = node.attribute("begin").or_else(|| node.attribute("start"))?;

    let show_at = match time_value(begin) {
        Ok(show_at) => show_at,
        Err(err) => {
            eprintln!("Warning: skipping <{}> element: {}", name, err);
            return None;
        }
    };
    let hide_at = if let Some(end) = node.attribute("end") {
        match time_value(end) {
            Ok(hide_at) => hide_at,
            Err(err) => {
                eprintln!("Warning: skipping <{}> element: {}", name, err);
                return None;
            }
        }
    } else if let Some(dur) = node.attribute("dur") {
        match time_value(dur) {
            Ok(duration) => show_at + duration,
            Err(err) => {
                eprintln!("Warning: skipping <{}> element: {}", name, err);
                return None;
            }
        }
    } else {
        eprintln!("Warning: skipping <{}> element without an end time", name);
        return None;
    };

    let text = element_text(node);
    if text.is_empty() {
        return None;
    }
    Some(Caption::new(show_at, hide_at, text))
}

/// Timing attribute values are either clock timestamps or offsets such
/// as `7.5s`.
fn time_value(text: &str) -> Result<Duration, ConvertError> {
    parse_timestamp(text).or_else(|_| parse_offset(text))
}

/// Concatenates the descendant text of an element, turning <br/> into
/// line breaks and collapsing the surrounding document whitespace.
fn element_text(node: &Node) -> Vec<String> {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_text(node: &Node, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                out.push_str(text);
            }
        } else if child.is_element() {
            if child.tag_name().name().eq_ignore_ascii_case("br") {
                out.push('\n');
            } else {
                collect_text(&child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ttml_paragraphs() {
        let input = r#"<?xml version="1.0" encoding="utf-8"?>
<tt xmlns="http://www.w3.org/ns/ttml">
  <body>
    <div>
      <p begin="00:00:01.000" end="00:00:04.000">Hello world</p>
      <p begin="00:00:05.000" end="00:00:06.500">Second</p>
    </div>
  </body>
</tt>"#;

        let captions = parse(input).unwrap();

        assert_eq!(captions.len(), 2);
        assert_eq!(captions.entries()[0].show_at.as_millis(), 1000);
        assert_eq!(captions.entries()[0].hide_at.as_millis(), 4000);
        assert_eq!(captions.entries()[0].text, vec!["Hello world"]);
        assert_eq!(captions.entries()[1].hide_at.as_millis(), 6500);
    }

    #[test]
    fn duration_attribute_yields_end_time() {
        let input = r#"<timedtext><body><p begin="2s" dur="3s">X</p></body></timedtext>"#;

        let captions = parse(input).unwrap();

        assert_eq!(captions.entries()[0].show_at.as_millis(), 2000);
        assert_eq!(captions.entries()[0].hide_at.as_millis(), 5000);
    }

    #[test]
    fn accepts_start_attribute_and_bare_offsets() {
        let input = r#"<subtitles><subtitle start="1.5" end="3">Hi there</subtitle></subtitles>"#;

        let captions = parse(input).unwrap();

        assert_eq!(captions.entries()[0].show_at.as_millis(), 1500);
        assert_eq!(captions.entries()[0].hide_at.as_millis(), 3000);
    }

    #[test]
    fn nested_markup_contributes_text_only() {
        let input = r#"<tt><body><p begin="1s" end="2s">Hello <span style="i">there</span><br/>friend</p></body></tt>"#;

        let captions = parse(input).unwrap();

        assert_eq!(captions.len(), 1);
        assert_eq!(captions.entries()[0].text, vec!["Hello there", "friend"]);
    }

    #[test]
    fn untimed_elements_are_ignored() {
        let input = r#"<tt><head><title>Nope</title></head><body><p begin="1s" end="2s">Yes</p></body></tt>"#;

        let captions = parse(input).unwrap();

        assert_eq!(captions.len(), 1);
        assert_eq!(captions.entries()[0].text, vec!["Yes"]);
    }

    #[test]
    fn element_with_bad_timing_is_skipped() {
        let input = r#"<tt><body>
            <p begin="bogus" end="2s">Bad</p>
            <p begin="3s" end="4s">Good</p>
        </body></tt>"#;

        let captions = parse(input).unwrap();

        assert_eq!(captions.len(), 1);
        assert_eq!(captions.entries()[0].text, vec!["Good"]);
    }

    #[test]
    fn ill_formed_xml_is_fatal() {
        match parse("<tt><body>") {
            Err(ConvertError::MalformedDocument(_)) => (),
            other => panic!("expected MalformedDocument, got {:?}", other),
        }
    }
}
