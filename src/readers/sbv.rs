use crate::caption::{Caption, CaptionList};
use crate::timestamp::parse_timestamp;

use std::sync::OnceLock;

use regex::Regex;

fn timing_regex() -> &'static Regex {
    static TIMING: OnceLock<Regex> = OnceLock::new();
    TIMING.get_or_init(|| {
        Regex::new(r"^(\d+:\d{2}:\d{2}\.\d{1,3})\s*,\s*(\d+:\d{2}:\d{2}\.\d{1,3})$")
            .expect("Failed to compile SBV timing regex")
    })
}

/// Parses YouTube's SBV format: a `start,end` timing line followed by
/// text lines, with blank-line separators. Lines outside that structure
/// are ignored.
pub fn parse(input: &str) -> CaptionList {
    let lines: Vec<&str> = input.lines().collect();
    let mut list = CaptionList::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        let caps = match timing_regex().captures(line) {
            Some(caps) => caps,
            None => {
                i += 1;
                continue;
            }
        };

        let timing = parse_timestamp(&caps[1])
            .and_then(|show_at| parse_timestamp(&caps[2]).map(|hide_at| (show_at, hide_at)));
        let (show_at, hide_at) = match timing {
            Ok(timing) => timing,
            Err(err) => {
                eprintln!("Warning: skipping entry: {}", err);
                i += 1;
                continue;
            }
        };
        i += 1;

        let mut text = Vec::new();
        while i < lines.len()
            && !lines[i].trim().is_empty()
            && !timing_regex().is_match(lines[i].trim())
        {
            text.push(lines[i].trim().to_string());
            i += 1;
        }

        if !text.is_empty() {
            list.append(Caption::new(show_at, hide_at, text));
        }
    }
    list
}
