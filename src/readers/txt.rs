use crate::caption::{Caption, CaptionList};
use crate::timestamp::parse_timestamp;

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

/// A bare start time gets a five-second display window.
const DEFAULT_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Loose timestamp shape. The regex only locates candidates; the
/// timestamp parser decides whether they are actually valid.
const TS: &str = r"\d+(?::\d+){1,3}(?:[.,]\d+)?";

fn arrow_regex() -> &'static Regex {
    static ARROW: OnceLock<Regex> = OnceLock::new();
    ARROW.get_or_init(|| {
        // The arrow between the two timestamps comes in several spellings:
        // -->, ->, an en-dash arrow, or a plain hyphen.
        Regex::new(&format!(r"({0})\s*(?:-->|->|–>|-)\s*({0})", TS))
            .expect("Failed to compile range regex")
    })
}

fn pair_regex() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| {
        // Comma-joined start and end, as written by some caption editors.
        // The fractional separator must be a period here, or the line
        // would be ambiguous.
        Regex::new(&format!(r"^({0})\s*,\s*({0})$", r"\d+(?::\d+){1,3}(?:\.\d+)?"))
            .expect("Failed to compile pair regex")
    })
}

fn lone_regex() -> &'static Regex {
    static LONE: OnceLock<Regex> = OnceLock::new();
    LONE.get_or_init(|| {
        Regex::new(&format!(r"^{}$", TS)).expect("Failed to compile lone timestamp regex")
    })
}

pub(crate) enum TimingLine {
    Range(Duration, Duration),
    /// Looks like a timing line, but the timestamps do not parse.
    Malformed,
    Text,
}

pub(crate) fn classify_line(line: &str) -> TimingLine {
    if let Some(caps) = arrow_regex().captures(line) {
        return range_from(&caps[1], &caps[2]);
    }
    if let Some(caps) = pair_regex().captures(line) {
        return range_from(&caps[1], &caps[2]);
    }
    if lone_regex().is_match(line) {
        return match parse_timestamp(line) {
            Ok(show_at) => TimingLine::Range(show_at, show_at + DEFAULT_DISPLAY_TIME),
            Err(_) => TimingLine::Malformed,
        };
    }
    TimingLine::Text
}

fn range_from(start: &str, end: &str) -> TimingLine {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Ok(show_at), Ok(hide_at)) => TimingLine::Range(show_at, hide_at),
        _ => TimingLine::Malformed,
    }
}

/// Parses plain text structured into blank-line-separated blocks, each
/// holding a timing line followed by text lines. Malformed blocks are
/// skipped with a warning; this reader never fails outright.
pub fn parse(input: &str) -> CaptionList {
    let mut list = CaptionList::new();
    for block in blocks(input) {
        parse_block(&block, &mut list);
    }
    list
}

fn parse_block(lines: &[&str], list: &mut CaptionList) {
    let mut current: Option<Caption> = None;
    let mut found_timing = false;

    for line in lines {
        match classify_line(line) {
            TimingLine::Range(show_at, hide_at) => {
                flush(&mut current, list);
                current = Some(Caption::new(show_at, hide_at, Vec::new()));
                found_timing = true;
            }
            TimingLine::Malformed => {
                flush(&mut current, list);
                found_timing = true;
                eprintln!("Warning: skipping entry with malformed timestamps: '{}'", line);
            }
            TimingLine::Text => {
                if let Some(caption) = current.as_mut() {
                    caption.text.push((*line).to_string());
                }
            }
        }
    }
    flush(&mut current, list);

    if !found_timing {
        eprintln!("Warning: skipping block without a timestamp line: '{}'", lines[0]);
    }
}

fn flush(current: &mut Option<Caption>, list: &mut CaptionList) {
    if let Some(caption) = current.take() {
        if !caption.text.is_empty() {
            list.append(caption);
        }
    }
}

fn blocks(input: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
