use crate::error::ConvertError;

use std::time::Duration;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{char, digit1, one_of};
use nom::combinator::{all_consuming, map_res, opt, recognize};
use nom::error::VerboseError;
use nom::sequence::{pair, preceded};
use nom::IResult;

type TsResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Parses any of the supported textual timestamp encodings into elapsed
/// time since 00:00:00.
///
/// Accepted shapes: `HH:MM:SS,mmm`, `HH:MM:SS.mmm`, `HH:MM:SS:mmm`,
/// `HH:MM:SS`, `MM:SS` and `MM:SS.mmm`, with one- or two-digit
/// hour/minute/second fields.
pub fn parse_timestamp(text: &str) -> Result<Duration, ConvertError> {
    match all_consuming(timestamp)(text.trim()) {
        Ok((_, duration)) => Ok(duration),
        Err(_) => Err(ConvertError::MalformedTimestamp(text.trim().to_string())),
    }
}

/// Renders the canonical SRT encoding, `HH:MM:SS,mmm`. All output timing
/// flows through here.
pub fn format_timestamp(timestamp: Duration) -> String {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.subsec_millis();
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parses an offset value as found in XML timing attributes: a number
/// with an optional unit suffix (`7.5s`, `1200ms`, `2m`, `1.5h`).
/// A bare number is taken to be seconds.
pub fn parse_offset(text: &str) -> Result<Duration, ConvertError> {
    match all_consuming(offset)(text.trim()) {
        Ok((_, duration)) => Ok(duration),
        Err(_) => Err(ConvertError::MalformedTimestamp(text.trim().to_string())),
    }
}

pub(crate) fn timestamp(input: &str) -> TsResult<Duration> {
    let (input, first) = field(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, second) = field(input)?;
    let (input, third) = opt(preceded(tag(":"), field))(input)?;
    let (input, millis) = opt(preceded(one_of(",.:"), millis_field))(input)?;

    // Two fields means the hours were omitted, as in short VTT cues.
    let (hours, minutes, seconds) = match third {
        Some(seconds) => (first, second, seconds),
        None => (0, first, second),
    };
    let millis = millis.unwrap_or(0);

    Ok((
        input,
        Duration::from_millis(
            millis + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

fn field(input: &str) -> TsResult<u64> {
    map_res(
        take_while_m_n(1, 2, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse(),
    )(input)
}

fn millis_field(input: &str) -> TsResult<u64> {
    map_res(
        take_while_m_n(0, 3, |c: char| c.is_ascii_digit()),
        |s: &str| {
            // Sometimes, a milliseconds value like `,2` may be encountered.
            // This is not valid SRT, but we must be able to handle it anyway.
            // We choose to interpret this as `,200`. In other words, we right-pad
            // every string until it reaches a length of 3 characters.
            format!("{:0<3}", s).parse()
        },
    )(input)
}

fn offset(input: &str) -> TsResult<Duration> {
    let (input, value) = map_res(
        recognize(pair(digit1, opt(preceded(char('.'), digit1)))),
        |s: &str| s.parse::<f64>(),
    )(input)?;
    let (input, unit) = opt(alt((tag("ms"), tag("h"), tag("s"), tag("m"))))(input)?;

    let unit_millis = match unit {
        Some("ms") => 1.0,
        Some("m") => 60_000.0,
        Some("h") => 3_600_000.0,
        _ => 1000.0,
    };

    Ok((
        input,
        Duration::from_millis((value * unit_millis).round() as u64),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let duration = parse_timestamp(input).unwrap();

                assert_eq!(duration.as_millis(), expected);
            }
        )*
        }
    }

    test_parse_ts! {
        test_parse_ts_srt: ("00:00:01,200", 1200),
        test_parse_ts_vtt: ("00:00:01.200", 1200),
        test_parse_ts_short_hour: ("0:00:01.000", 1000),
        test_parse_ts_short_millis: ("00:00:01,2", 1200),
        test_parse_ts_padded_millis: ("00:00:01,02", 1020),
        test_parse_ts_no_millis: ("01:02:03", 3723000),
        test_parse_ts_single_digits: ("1:1:1,200", 3661200),
        test_parse_ts_minutes_seconds: ("01:02", 62000),
        test_parse_ts_minutes_seconds_millis: ("01:02.500", 62500),
        test_parse_ts_colon_millis: ("00:00:14:22", 14220),
        test_parse_ts_trailing_comma: ("00:00:01,", 1000),
    }

    macro_rules! test_format_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let ts = Duration::from_millis(input);

                assert_eq!(format_timestamp(ts), expected);
            }
        )*
        }
    }

    test_format_ts! {
        test_format_ts_0: (0, "00:00:00,000"),
        test_format_ts_1: (1, "00:00:00,001"),
        test_format_ts_2: (999, "00:00:00,999"),
        test_format_ts_3: (1000, "00:00:01,000"),
        test_format_ts_4: (59_999, "00:00:59,999"),
        test_format_ts_5: (60_000, "00:01:00,000"),
        test_format_ts_6: (3_600_000, "01:00:00,000"),
        test_format_ts_7: (7_326_159, "02:02:06,159"),
        test_format_ts_8: (34_380_001, "09:33:00,001"),
    }

    macro_rules! test_parse_offset {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let duration = parse_offset(input).unwrap();

                assert_eq!(duration.as_millis(), expected);
            }
        )*
        }
    }

    test_parse_offset! {
        test_parse_offset_bare: ("7", 7000),
        test_parse_offset_fraction: ("7.5", 7500),
        test_parse_offset_seconds: ("7.5s", 7500),
        test_parse_offset_millis: ("1200ms", 1200),
        test_parse_offset_minutes: ("2m", 120_000),
        test_parse_offset_hours: ("1.5h", 5_400_000),
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in &["", "abc", "12", "1:2:3:4:5", "::", "1:2:3,4,5"] {
            assert!(parse_timestamp(input).is_err(), "accepted '{}'", input);
        }
    }

    #[test]
    fn parse_inverts_format() {
        for &millis in &[0u64, 1, 999, 1000, 59_999, 60_000, 3_599_999, 3_600_000, 86_399_999] {
            let ts = Duration::from_millis(millis);
            assert_eq!(parse_timestamp(&format_timestamp(ts)).unwrap(), ts);
        }
    }
}
