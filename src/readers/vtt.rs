use crate::caption::{Caption, CaptionList};
use crate::timestamp::parse_timestamp;

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile tag regex"))
}

/// Parses WebVTT. The header and NOTE/STYLE/REGION blocks are discarded,
/// cue identifiers and cue settings are ignored, and inline markup is
/// stripped from the payload. Malformed cues are skipped with a warning.
pub fn parse(input: &str) -> CaptionList {
    let input = input.trim_start_matches('\u{FEFF}');
    let lines: Vec<&str> = input.lines().collect();
    let mut list = CaptionList::new();
    let mut i = 0;

    // The header is the WEBVTT signature plus any metadata lines up to
    // the first blank line. Files in the wild sometimes omit it, so its
    // absence is not an error.
    if let Some(first) = lines.first() {
        let first = first.trim();
        if first == "WEBVTT" || first.starts_with("WEBVTT ") || first.starts_with("WEBVTT\t") {
            i = skip_block(&lines, 0);
        }
    }

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }
        if line.starts_with("NOTE") || line.starts_with("STYLE") || line.starts_with("REGION") {
            i = skip_block(&lines, i);
            continue;
        }
        parse_cue(&lines, &mut i, &mut list);
    }
    list
}

fn skip_block(lines: &[&str], mut i: usize) -> usize {
    i += 1;
    while i < lines.len() && !lines[i].trim().is_empty() {
        i += 1;
    }
    i
}

fn parse_cue(lines: &[&str], i: &mut usize, list: &mut CaptionList) {
    let mut line = lines[*i].trim();

    // An optional cue identifier precedes the timing line.
    if !line.contains("-->") {
        *i += 1;
        if *i >= lines.len() {
            return;
        }
        line = lines[*i].trim();
    }

    let (show_at, hide_at) = match cue_timing(line) {
        Some(timing) => timing,
        None => {
            eprintln!("Warning: skipping cue with a malformed timing line: '{}'", line);
            *i = skip_block(lines, *i);
            return;
        }
    };
    *i += 1;

    let mut text = Vec::new();
    while *i < lines.len() && !lines[*i].trim().is_empty() {
        let stripped = strip_markup(lines[*i].trim());
        if !stripped.is_empty() {
            text.push(stripped);
        }
        *i += 1;
    }

    if !text.is_empty() {
        list.append(Caption::new(show_at, hide_at, text));
    }
}

/// Parses `start --> end`, tolerating cue settings after the end
/// timestamp. Hours may be omitted for short cues.
fn cue_timing(line: &str) -> Option<(Duration, Duration)> {
    let mut parts = line.splitn(2, "-->");
    let start = parts.next()?.trim();
    let rest = parts.next()?.trim();
    let end = rest.split_whitespace().next()?;

    let show_at = parse_timestamp(start).ok()?;
    let hide_at = parse_timestamp(end).ok()?;
    Some((show_at, hide_at))
}

fn strip_markup(line: &str) -> String {
    tag_regex().replace_all(line, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_file() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nHello world\n";

        let captions = parse(input);

        assert_eq!(captions.len(), 1);
        assert_eq!(captions.entries()[0].show_at.as_millis(), 1000);
        assert_eq!(captions.entries()[0].hide_at.as_millis(), 4000);
        assert_eq!(captions.entries()[0].text, vec!["Hello world"]);
    }

    #[test]
    fn hours_may_be_omitted() {
        let input = "WEBVTT\n\n01:30.000 --> 01:45.500\nShort cue\n";

        let captions = parse(input);

        assert_eq!(captions.entries()[0].show_at.as_millis(), 90_000);
        assert_eq!(captions.entries()[0].hide_at.as_millis(), 105_500);
    }

    #[test]
    fn skips_notes_styles_and_identifiers() {
        let input = "WEBVTT - with metadata\nKind: captions\n\n\
                     NOTE This is a comment\nspanning two lines\n\n\
                     STYLE\n::cue { color: red }\n\n\
                     intro-cue\n00:00:01.000 --> 00:00:02.000\nHi\n";

        let captions = parse(input);

        assert_eq!(captions.len(), 1);
        assert_eq!(captions.entries()[0].text, vec!["Hi"]);
    }

    #[test]
    fn strips_inline_markup() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n<v Roger>Hey <b>you</b></v>\n";

        let captions = parse(input);

        assert_eq!(captions.entries()[0].text, vec!["Hey you"]);
    }

    #[test]
    fn ignores_cue_settings() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000 align:start position:0%\nHi\n";

        let captions = parse(input);

        assert_eq!(captions.len(), 1);
        assert_eq!(captions.entries()[0].hide_at.as_millis(), 2000);
    }

    #[test]
    fn one_bad_cue_does_not_spoil_the_rest() {
        let input = "WEBVTT\n\n\
                     00:00:01.000 --> 00:00:02.000\nOne\n\n\
                     garbage timing line --> nowhere\nBad\n\n\
                     00:00:03.000 --> 00:00:04.000\nThree\n\n\
                     00:00:05.000 --> 00:00:06.000\nFour\n\n\
                     00:00:07.000 --> 00:00:08.000\nFive\n";

        let captions = parse(input);

        assert_eq!(captions.len(), 4);
        assert_eq!(captions.entries()[1].text, vec!["Three"]);
    }

    #[test]
    fn header_is_optional() {
        let input = "00:00:01.000 --> 00:00:02.000\nNo header\n";

        let captions = parse(input);

        assert_eq!(captions.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(parse("WEBVTT\n").is_empty());
        assert!(parse("").is_empty());
    }
}
