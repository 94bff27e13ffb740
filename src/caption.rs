use std::time::Duration;

/// One timed cue. Sequence numbers are not stored here; the serialiser
/// assigns them in list order when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub(crate) show_at: Duration,
    pub(crate) hide_at: Duration,
    pub(crate) text: Vec<String>,
}

impl Caption {
    pub fn new(show_at: Duration, hide_at: Duration, text: Vec<String>) -> Self {
        Self {
            show_at,
            hide_at,
            text,
        }
    }
}

/// An ordered sequence of captions, in the order they should display.
/// Readers append in display order; the serialiser does not re-sort.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CaptionList {
    entries: Vec<Caption>,
}

impl CaptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without validation. Entries with `show_at > hide_at` are
    /// fixed up by the serialiser, not here.
    pub fn append(&mut self, caption: Caption) {
        self.entries.push(caption);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Caption] {
        &self.entries
    }

    pub(crate) fn sort_by_time(&mut self) {
        self.entries.sort_by_key(|c| c.show_at);
    }
}

impl IntoIterator for CaptionList {
    type Item = Caption;
    type IntoIter = std::vec::IntoIter<Caption>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
