use crate::caption::CaptionList;
use crate::error::ConvertError;
use crate::readers;

use std::path::Path;

use anyhow::Result;

/// The supported input formats, keyed by file extension. Detection is
/// deliberately extension-only; no content sniffing takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Rtf,
    Txt,
    Vtt,
    Xml,
    Sbv,
    Srt,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "rtf" => Ok(Format::Rtf),
            "txt" => Ok(Format::Txt),
            "vtt" => Ok(Format::Vtt),
            "xml" => Ok(Format::Xml),
            "sbv" => Ok(Format::Sbv),
            "srt" => Ok(Format::Srt),
            _ => Err(ConvertError::UnsupportedFormat(format!(
                ".{}",
                ext.to_ascii_lowercase()
            ))),
        }
    }

    /// Runs the reader for this format over the input text.
    pub fn parse(self, input: &str) -> Result<CaptionList> {
        match self {
            Format::Rtf => Ok(readers::rtf::parse(input)),
            Format::Txt => Ok(readers::txt::parse(input)),
            Format::Vtt => Ok(readers::vtt::parse(input)),
            Format::Sbv => Ok(readers::sbv::parse(input)),
            Format::Xml => Ok(readers::xml::parse(input)?),
            Format::Srt => readers::srt::parse(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(Format::from_path(Path::new("foo.rtf")).unwrap(), Format::Rtf);
        assert_eq!(Format::from_path(Path::new("foo.txt")).unwrap(), Format::Txt);
        assert_eq!(Format::from_path(Path::new("foo.vtt")).unwrap(), Format::Vtt);
        assert_eq!(Format::from_path(Path::new("foo.xml")).unwrap(), Format::Xml);
        assert_eq!(Format::from_path(Path::new("foo.sbv")).unwrap(), Format::Sbv);
        assert_eq!(Format::from_path(Path::new("foo.srt")).unwrap(), Format::Srt);
    }

    #[test]
    fn detection_ignores_case() {
        assert_eq!(Format::from_path(Path::new("foo.VTT")).unwrap(), Format::Vtt);
        assert_eq!(Format::from_path(Path::new("foo.Rtf")).unwrap(), Format::Rtf);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        for path in &["foo.unknown", "foo.ass", "foo", "foo."] {
            match Format::from_path(Path::new(path)) {
                Err(ConvertError::UnsupportedFormat(_)) => (),
                other => panic!("expected UnsupportedFormat for '{}', got {:?}", path, other),
            }
        }
    }
}
