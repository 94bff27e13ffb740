use crate::caption::{Caption, CaptionList};
use crate::timestamp::format_timestamp;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Writes the list in SRT form, assigning 1-based sequence numbers in
/// list order. An empty list produces an empty document, which is not
/// an error.
pub fn serialise<W: Write>(captions: CaptionList, output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    for (index, caption) in captions.into_iter().enumerate() {
        write_caption(&mut writer, index + 1, caption)
            .context("Failed to write to output file.")?;
    }
    writer.flush().context("Failed to write to output file.")?;
    Ok(())
}

fn write_caption<W: Write>(buf: &mut W, sequence_number: usize, caption: Caption) -> Result<()> {
    // Inputs occasionally carry a cue whose times are reversed. Swap
    // them rather than dropping the cue.
    let (show_at, hide_at) = if caption.show_at <= caption.hide_at {
        (caption.show_at, caption.hide_at)
    } else {
        (caption.hide_at, caption.show_at)
    };

    writeln!(buf, "{}", sequence_number)?;
    writeln!(
        buf,
        "{} --> {}",
        format_timestamp(show_at),
        format_timestamp(hide_at)
    )?;
    for line in caption.text {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}
