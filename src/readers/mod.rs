pub mod rtf;
pub mod sbv;
pub mod srt;
pub mod txt;
pub mod vtt;
pub mod xml;
