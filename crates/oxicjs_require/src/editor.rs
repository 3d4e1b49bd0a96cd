use anyhow::{Result, anyhow};
use log::trace;
use oxc_span::Span;

/// Position-addressed text edits against the original source.
///
/// Offsets always refer to the unedited source, so edits may be recorded in
/// any order as long as they do not overlap.
pub trait TextEditor {
    fn overwrite(&mut self, span: Span, text: &str) -> Result<()>;
    fn remove(&mut self, span: Span) -> Result<()>;
}

#[derive(Debug)]
struct Edit {
    span: Span,
    text: String,
}

/// Records edits and applies them in one pass when finished.
#[derive(Debug)]
pub struct SourceEditor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
    intro: String,
    outro: String,
}

impl<'s> SourceEditor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source, edits: Vec::new(), intro: String::new(), outro: String::new() }
    }

    pub fn prepend(&mut self, text: &str) {
        self.intro.insert_str(0, text);
    }

    pub fn append(&mut self, text: &str) {
        self.outro.push_str(text);
    }

    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty() || !self.intro.is_empty() || !self.outro.is_empty()
    }

    fn record(&mut self, span: Span, text: &str) -> Result<()> {
        if span.start > span.end || span.end as usize > self.source.len() {
            return Err(anyhow!(
                "Edit {}..{} is outside the source ({} bytes)",
                span.start,
                span.end,
                self.source.len()
            ));
        }
        if let Some(other) =
            self.edits.iter().find(|e| span.start < e.span.end && e.span.start < span.end)
        {
            return Err(anyhow!(
                "Edit {}..{} overlaps edit {}..{}",
                span.start,
                span.end,
                other.span.start,
                other.span.end
            ));
        }
        trace!("Recording edit {}..{} -> {:?}", span.start, span.end, text);
        self.edits.push(Edit { span, text: text.to_string() });
        Ok(())
    }

    /// Applies every recorded edit and returns the new source.
    pub fn finish(mut self) -> String {
        self.edits.sort_by_key(|e| e.span.start);

        let capacity = self.intro.len() + self.source.len() + self.outro.len();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.intro);
        let mut cursor = 0usize;
        for edit in &self.edits {
            out.push_str(&self.source[cursor..edit.span.start as usize]);
            out.push_str(&edit.text);
            cursor = edit.span.end as usize;
        }
        out.push_str(&self.source[cursor..]);
        out.push_str(&self.outro);
        out
    }
}

impl TextEditor for SourceEditor<'_> {
    fn overwrite(&mut self, span: Span, text: &str) -> Result<()> {
        self.record(span, text)
    }

    fn remove(&mut self, span: Span) -> Result<()> {
        self.record(span, "")
    }
}
