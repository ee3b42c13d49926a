use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Location of a lexical element in the original sketch text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    /// Byte offset of the first byte
    pub start: usize,
    /// Byte offset one past the last byte
    pub end: usize,
    /// 1-indexed line of `start`
    pub line: usize,
    /// 1-indexed column of `start`, counted in characters
    pub column: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        SourceSpan {
            start,
            end,
            line,
            column,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &SourceSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `offset` lies inside this span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Precomputed line starts for repeated offset lookups over the same text
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        LineIndex {
            starts: line_starts(text),
        }
    }

    /// 1-indexed line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset)
    }

    /// Byte offset where the 1-indexed `line` starts, if the line exists.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|i| self.starts.get(i).copied())
    }

    /// Build a span for `start..end` in `text`, which must be the text this index was built from.
    pub fn span(&self, text: &str, start: usize, end: usize) -> SourceSpan {
        let line = self.line_of(start);
        let line_start = self.starts[line - 1];
        let column = text[line_start..start].chars().count() + 1;
        SourceSpan::new(start, end, line, column)
    }
}

/// Byte offset where each line starts. Always contains at least one entry.
pub fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        text.bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

/// Number of lines in `text`. A trailing newline does not open a new line.
pub fn count_lines(text: &str) -> usize {
    let newlines = text.bytes().filter(|&b| b == b'\n').count();
    if text.is_empty() || text.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_col(text: &str, offset: usize) -> (usize, usize) {
        let span = LineIndex::new(text).span(text, offset, offset);
        (span.line, span.column)
    }

    #[test]
    fn test_span_line_and_column() {
        let text = "ab\ncd\n\nef";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 1), (1, 2));
        assert_eq!(line_col(text, 3), (2, 1));
        assert_eq!(line_col(text, 6), (3, 1));
        assert_eq!(line_col(text, 7), (4, 1));
        assert_eq!(line_col(text, 9), (4, 3));
    }

    #[test]
    fn test_span_column_counts_chars() {
        let text = "/* é */ x";
        assert_eq!(line_col(text, text.find('x').unwrap()), (1, 9));
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("a"), 1);
        assert_eq!(count_lines("a\n"), 1);
        assert_eq!(count_lines("a\nb"), 2);
        assert_eq!(count_lines("\n\n"), 2);
    }

    #[test]
    fn test_line_starts() {
        assert_eq!(line_starts(""), vec![0]);
        assert_eq!(line_starts("a\nbc\n"), vec![0, 2, 5]);
    }

    #[test]
    fn test_line_index_lookups() {
        let text = "void setup() {\n  int é = 1;\n}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(14), 1);
        assert_eq!(index.line_of(15), 2);
        assert_eq!(line_col(text, 23), (2, 8));
        assert_eq!(index.line_start(2), Some(15));
        assert_eq!(index.line_start(0), None);
        assert_eq!(index.line_start(9), None);
    }

    #[test]
    fn test_span_overlap() {
        let a = SourceSpan::new(0, 4, 1, 1);
        let b = SourceSpan::new(4, 6, 1, 5);
        let c = SourceSpan::new(3, 5, 1, 4);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert!(a.contains(3));
        assert!(!a.contains(4));
    }
}
