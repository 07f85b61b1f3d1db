//! Source coordinates: points, locations, ranges and a line index.
//!
//! Columns are byte columns, matching what tree-sitter reports. Byte offsets
//! are only comparable between locations taken from the same buffer
//! generation.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Zero-based row/column position, ordered row-major.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Render as `row:column`, optionally counting from one like editors do.
    pub fn pretty(&self, one_based: bool) -> String {
        if one_based {
            format!("{}:{}", self.row + 1, self.column + 1)
        } else {
            format!("{}:{}", self.row, self.column)
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row, point.column)
    }
}

impl From<Point> for tree_sitter::Point {
    fn from(point: Point) -> Self {
        tree_sitter::Point::new(point.row, point.column)
    }
}

/// A position expressed both as row/column and as an absolute byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub point: Point,
    pub byte: usize,
}

impl Location {
    pub const fn new(row: usize, column: usize, byte: usize) -> Self {
        Self {
            point: Point::new(row, column),
            byte,
        }
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.byte
            .cmp(&other.byte)
            .then_with(|| self.point.cmp(&other.point))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.point, self.byte)
    }
}

/// Half-open source range `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

impl Range {
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Whether two ranges share at least one byte.
    ///
    /// Touching ranges (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        if self.start > other.start {
            return other.overlaps(self);
        }
        self.end.byte > other.start.byte
    }

    pub fn is_empty(&self) -> bool {
        self.start.byte == self.end.byte
    }

    pub fn is_single_line(&self) -> bool {
        self.start.point.row == self.end.point.row
    }

    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start.byte..self.end.byte
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} (bytes {}..{})",
            self.start.point, self.end.point, self.start.byte, self.end.byte
        )
    }
}

impl From<tree_sitter::Range> for Range {
    fn from(range: tree_sitter::Range) -> Self {
        Self {
            start: Location {
                point: range.start_point.into(),
                byte: range.start_byte,
            },
            end: Location {
                point: range.end_point.into(),
                byte: range.end_byte,
            },
        }
    }
}

/// Byte offset <-> row/column conversion over one buffer.
///
/// Stores the byte offset at which every line starts, so conversions are a
/// lookup (point to byte) or a binary search (byte to point).
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Location of a byte offset, or `None` past the end of the buffer.
    #[must_use]
    pub fn location_at_byte(&self, byte: usize) -> Option<Location> {
        if byte > self.len {
            return None;
        }
        let row = match self.line_starts.binary_search(&byte) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Some(Location::new(row, byte - self.line_starts[row], byte))
    }

    /// Location of a row/column point, or `None` if it lies past the end of
    /// its line.
    #[must_use]
    pub fn location_at_point(&self, point: Point) -> Option<Location> {
        let line_start = *self.line_starts.get(point.row)?;
        let line_end = self
            .line_starts
            .get(point.row + 1)
            .map_or(self.len, |next| next - 1);
        let byte = line_start + point.column;
        (byte <= line_end).then_some(Location {
            point,
            byte,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> Range {
        Range::new(Location::new(0, start, start), Location::new(0, end, end))
    }

    #[test]
    fn point_ordering_is_row_major() {
        assert!(Point::new(0, 10) < Point::new(1, 0));
        assert!(Point::new(1, 2) < Point::new(1, 3));
        assert_eq!(Point::new(2, 2), Point::new(2, 2));
    }

    #[test]
    fn point_pretty() {
        let point = Point::new(3, 7);
        assert_eq!(point.pretty(false), "3:7");
        assert_eq!(point.pretty(true), "4:8");
    }

    #[test]
    fn location_orders_by_byte() {
        let a = Location::new(5, 0, 3);
        let b = Location::new(0, 9, 4);
        assert!(a < b);
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!range(0, 2).overlaps(&range(2, 4)));
        assert!(!range(2, 4).overlaps(&range(0, 2)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (range(0, 4), range(2, 6)),
            (range(0, 6), range(2, 6)),
            (range(0, 6), range(2, 4)),
            (range(0, 6), range(0, 3)),
        ];
        for (a, b) in cases {
            assert!(a.overlaps(&b), "{a} should overlap {b}");
            assert!(b.overlaps(&a), "{b} should overlap {a}");
        }
        assert!(!range(0, 2).overlaps(&range(5, 6)));
    }

    #[test]
    fn identical_ranges_overlap() {
        assert!(range(1, 3).overlaps(&range(1, 3)));
    }

    #[test]
    fn line_index_round_trips() {
        let index = LineIndex::new("local a = 1\nlocal b = 2\nreturn a + b");
        assert_eq!(index.line_starts, vec![0, 12, 24]);

        let location = index.location_at_byte(22).unwrap();
        assert_eq!(location, Location::new(1, 10, 22));
        assert_eq!(index.location_at_point(Point::new(1, 10)), Some(location));
    }

    #[test]
    fn line_index_rejects_out_of_range() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.location_at_byte(6), None);
        assert_eq!(index.location_at_point(Point::new(0, 3)), None);
        assert_eq!(index.location_at_point(Point::new(2, 0)), None);
        // end of the last line is addressable
        assert_eq!(
            index.location_at_point(Point::new(1, 2)),
            Some(Location::new(1, 2, 5))
        );
    }
}
