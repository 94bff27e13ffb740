use crate::caption::{Caption, CaptionList};
use crate::error::ConvertError;
use crate::timestamp::timestamp;

use std::time::Duration;

use anyhow::Context;
use nom::bytes::complete::take_while1;
use nom::character::complete::{digit1, line_ending, multispace0, multispace1, space0, space1};
use nom::combinator::{map_res, opt};
use nom::error::{convert_error, ErrorKind, VerboseError};
use nom::multi::many_till;
use nom::sequence::terminated;
use nom::{branch::alt, bytes::complete::tag, error_position, Err, IResult};

/// Parses a complete SRT document. Unlike the loose readers, this one is
/// strict: a document that does not follow the SRT block structure is
/// rejected as a whole. Sequence numbers in the input are discarded and
/// reassigned when writing.
pub fn parse(input: &str) -> Result<CaptionList, anyhow::Error> {
    match srt_file(input) {
        Ok((_, captions)) => Ok(captions),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => {
            let conv = convert_error(input, err);
            Err(ConvertError::ParseError(conv)).context("Failed to parse SRT file")
        }
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn srt_file(input: &str) -> IResult<&str, CaptionList, VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, mut captions) = all_captions(input)?;
    let (input, _) = end_of_file(input)?;
    captions.sort_by_time();
    Ok((input, captions))
}

fn all_captions(input: &str) -> IResult<&str, CaptionList, VerboseError<&str>> {
    let mut parsed = CaptionList::new();
    let mut input = input;
    loop {
        match caption(input) {
            Ok((rem_input, caption)) => {
                parsed.append(caption);
                input = rem_input;
                let (rem_input, _) = multispace0(input)?;
                input = rem_input;
            }
            Err(err) => {
                if input.is_empty() {
                    return Ok((input, parsed));
                } else {
                    return Err(err);
                }
            }
        }
    }
}

fn caption(input: &str) -> IResult<&str, Caption, VerboseError<&str>> {
    let (input, _) = multispace0(input)?;
    let (input, _) = terminated(seq_num, multispace1)(input)?;
    let (input, (show_at, hide_at)) = terminated(show_hide, line_ending)(input)?;
    let (input, text) = caption_text(input)?;

    Ok((input, Caption::new(show_at, hide_at, text)))
}

fn end_of_file(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

fn caption_text(input: &str) -> IResult<&str, Vec<String>, VerboseError<&str>> {
    let line = terminated(
        take_while1(|c: char| c != '\n' && c != '\r'),
        alt((line_ending, end_of_file)),
    );

    let (input, (vec, _)) = many_till(line, alt((line_ending, end_of_file)))(input)?;

    Ok((input, vec.into_iter().map(String::from).collect()))
}

fn show_hide(input: &str) -> IResult<&str, (Duration, Duration), VerboseError<&str>> {
    let (input, show_at) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, hide_at) = timestamp(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (show_at, hide_at)))
}

fn seq_num(input: &str) -> IResult<&str, usize, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}
