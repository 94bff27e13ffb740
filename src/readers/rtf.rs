use crate::caption::CaptionList;
use crate::readers::txt;

use std::iter::Peekable;
use std::str::Chars;

/// Destination groups whose content never contributes visible text.
const HIDDEN_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
];

/// Strips control sequences and invisible groups from the document,
/// then recovers timestamped entries from whatever text remains. RTF has
/// no guaranteed structure for captions, so this is best-effort: entries
/// without a recognisable timestamp are dropped, never an error.
pub fn parse(input: &str) -> CaptionList {
    txt::parse(&strip_rtf(input))
}

fn strip_rtf(content: &str) -> String {
    let mut out = String::new();
    let mut chars = content.chars().peekable();
    let mut depth: u32 = 0;
    // Depth of the outermost group currently hiding its content.
    let mut hidden_at: Option<u32> = None;

    while let Some(c) = chars.next() {
        let visible = hidden_at.is_none();
        match c {
            '{' => depth += 1,
            '}' => {
                if hidden_at == Some(depth) {
                    hidden_at = None;
                }
                depth = depth.saturating_sub(1);
            }
            '\\' => match chars.peek().copied() {
                Some('\\') | Some('{') | Some('}') => {
                    if let Some(literal) = chars.next() {
                        if visible {
                            out.push(literal);
                        }
                    }
                }
                Some('\'') => {
                    chars.next();
                    // Two hex digits encoding a codepage byte. Decoding it
                    // as Latin-1 recovers most Western punctuation.
                    let byte = hex_byte(&mut chars);
                    if visible {
                        if let Some(byte) = byte {
                            out.push(char::from(byte));
                        }
                    }
                }
                Some('~') => {
                    chars.next();
                    if visible {
                        out.push(' ');
                    }
                }
                Some('*') => {
                    chars.next();
                    if hidden_at.is_none() {
                        hidden_at = Some(depth);
                    }
                }
                Some('\r') | Some('\n') => {
                    // A backslash-escaped line break is a paragraph break.
                    chars.next();
                    if visible {
                        out.push('\n');
                    }
                }
                Some(ch) if ch.is_ascii_alphabetic() => {
                    let (word, param) = control_word(&mut chars);
                    match word.as_str() {
                        "par" | "line" => {
                            if visible {
                                out.push('\n');
                            }
                        }
                        "tab" => {
                            if visible {
                                out.push(' ');
                            }
                        }
                        "u" => {
                            // \uN carries a signed 16-bit code unit, followed
                            // by a fallback character we discard.
                            if chars.peek() == Some(&'?') {
                                chars.next();
                            }
                            if visible {
                                let code = param.unwrap_or(0);
                                let code = if code < 0 { code + 65536 } else { code };
                                if let Some(ch) = char::from_u32(code as u32) {
                                    out.push(ch);
                                }
                            }
                        }
                        word if HIDDEN_DESTINATIONS.contains(&word) => {
                            if hidden_at.is_none() {
                                hidden_at = Some(depth);
                            }
                        }
                        _ => {}
                    }
                }
                _ => {
                    chars.next();
                }
            },
            // Raw line breaks carry no meaning in RTF.
            '\r' | '\n' => {}
            _ => {
                if visible {
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Reads a control word: a run of letters, an optional signed numeric
/// parameter, and the single space that delimits the word, if present.
fn control_word(chars: &mut Peekable<Chars>) -> (String, Option<i32>) {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }

    let mut digits = String::new();
    if chars.peek() == Some(&'-') {
        digits.push('-');
        chars.next();
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if chars.peek() == Some(&' ') {
        chars.next();
    }

    let param = digits.parse().ok();
    (word, param)
}

fn hex_byte(chars: &mut Peekable<Chars>) -> Option<u8> {
    let mut hex = String::new();
    for _ in 0..2 {
        match chars.peek() {
            Some(&c) if c.is_ascii_hexdigit() => {
                hex.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    u8::from_str_radix(&hex, 16).ok()
}
