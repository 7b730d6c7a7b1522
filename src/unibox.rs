//! Box drawing markers placed under a pattern to point at a byte offset

/// The characters used to draw a marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Drawn when the marked code point is the first one
    pub left: char,
    /// Drawn under the marked code point
    pub mark: char,
    /// Drawn under every other code point
    pub line: char,
    /// Drawn last when the offset is past the end of the pattern
    pub overflow: char,
}

impl Marker {
    /// `┌──┬──╖`
    pub const EDGE_ABOVE: Marker = Marker {
        left: '┌',
        mark: '┬',
        line: '─',
        overflow: '╖',
    };

    /// `└──┴──╜`
    pub const EDGE_BELOW: Marker = Marker {
        left: '└',
        mark: '┴',
        line: '─',
        overflow: '╜',
    };

    /// `┵──┴──┺`
    pub const LINE_BELOW: Marker = Marker {
        left: '┵',
        mark: '┴',
        line: '─',
        overflow: '┺',
    };
}

/// Draws one marker character per code point of `pattern`, placing the mark
/// under the code point that contains byte `offset`
pub fn mark_with(pattern: &str, offset: usize, marker: Marker) -> String {
    if pattern.is_empty() {
        return String::new();
    }
    if offset >= pattern.len() {
        let mut out = marker.line.to_string().repeat(pattern.chars().count() - 1);
        out.push(marker.overflow);
        return out;
    }

    let mut marked = false;
    pattern
        .char_indices()
        .map(|(idx, c)| {
            if marked {
                marker.line
            } else if idx == 0 && offset < c.len_utf8() {
                marked = true;
                marker.left
            } else if idx + c.len_utf8() > offset {
                marked = true;
                marker.mark
            } else {
                marker.line
            }
        })
        .collect()
}

/// Marks `offset` with [`Marker::EDGE_ABOVE`]
pub fn mark_edge_above(pattern: &str, offset: usize) -> String {
    mark_with(pattern, offset, Marker::EDGE_ABOVE)
}

/// Marks `offset` with [`Marker::EDGE_BELOW`]
pub fn mark_edge_below(pattern: &str, offset: usize) -> String {
    mark_with(pattern, offset, Marker::EDGE_BELOW)
}

/// Marks `offset` with [`Marker::LINE_BELOW`]
pub fn mark_line_below(pattern: &str, offset: usize) -> String {
    mark_with(pattern, offset, Marker::LINE_BELOW)
}

/// Renders `message` above `pattern` with an edge marker under `offset`,
/// annotating the pattern length and the offset on the right
pub fn mark_expected(pattern: &str, message: &str, offset: usize) -> String {
    format!(
        "{message}\n{pattern} [{:>3}]\n{} [{offset:>3}]\n",
        pattern.len(),
        mark_edge_below(pattern, offset)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_with() {
        let cases = [
            ("", 0, ""),
            ("a", 0, "┵"),
            ("a", 1, "┺"),
            ("abc", 0, "┵──"),
            ("abc", 1, "─┴─"),
            ("abc", 2, "──┴"),
            ("abc", 3, "──┺"),
            ("abc", 9, "──┺"),
            ("/:id([0-9])", 3, "───┴───────"),
        ];
        for (pattern, offset, exp) in cases {
            assert_eq!(mark_line_below(pattern, offset), exp, "{pattern:?} at {offset}");
        }
    }

    #[test]
    fn test_mark_multibyte() {
        // "À" spans bytes 0..2, "☃" spans bytes 2..5
        assert_eq!(mark_edge_below("À☃a", 1), "└──");
        assert_eq!(mark_edge_below("À☃a", 2), "─┴─");
        assert_eq!(mark_edge_below("À☃a", 4), "─┴─");
        assert_eq!(mark_edge_below("À☃a", 5), "──┴");
        assert_eq!(mark_edge_above("À☃a", 3), "─┬─");
        assert_eq!(mark_edge_above("À☃a", 6), "──╖");
    }

    #[test]
    fn test_mark_expected() {
        assert_eq!(
            mark_expected("/abc", "exp", 2),
            "exp\n/abc [  4]\n──┴─ [  2]\n"
        );
    }
}
