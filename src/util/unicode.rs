use unicode_width::UnicodeWidthChar;

/// Width of a tab in diagnostic excerpts.
pub const TAB_WIDTH: usize = 4;

/// Display width of a single character in terminal cells. Tabs count as 4.
pub fn char_display_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        UnicodeWidthChar::width(c).unwrap_or(0)
    }
}

/// Cells before the 1-indexed character `column` of `line`.
pub fn column_to_display_col(line: &str, column: usize) -> usize {
    line.chars()
        .take(column.saturating_sub(1))
        .map(char_display_width)
        .sum()
}

/// Replace tabs with spaces so a caret placed by [`column_to_display_col`] lines up.
pub fn expand_tabs(line: &str) -> String {
    line.replace('\t', &" ".repeat(TAB_WIDTH))
}
