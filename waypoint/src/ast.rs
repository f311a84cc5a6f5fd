//! Source location metadata shared by the parser, validator and error types.

/// Span representing a location in tree source code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

/// Byte offsets of every line start in one source text.
///
/// Built once per parse so each span costs a binary search instead of a
/// rescan from the top of the file.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// 1-based line and column (in characters) of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line];
        let col = self
            .text
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (line + 1, col + 1)
    }

    pub fn span(&self, span: pest::Span) -> Span {
        let (line, col) = self.line_col(span.start());
        Span {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }
}
