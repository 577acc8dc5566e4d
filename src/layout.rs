// WHY: Layout collaborator interface and a fixed-cell grid implementation
// Maps a tap point to the character under it, accounting for hard breaks and word wrapping

use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::annotation::CharPos;

/// A point in the rendered text's coordinate space; origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parses "X,Y"
impl FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Expected a point as X,Y, got {:?}", s))?;
        let x: f64 = x.trim().parse().map_err(|e| anyhow!("Invalid x coordinate {:?}: {}", x, e))?;
        let y: f64 = y.trim().parse().map_err(|e| anyhow!("Invalid y coordinate {:?}: {}", y, e))?;
        Ok(Self { x, y })
    }
}

/// Resolves a point to a character offset, or `None` when no character is under it
pub trait Layout {
    fn offset_at(&self, text: &str, point: Point) -> Option<CharPos>;
}

/// One laid-out visual line: `len` characters starting at character `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub len: usize,
}

/// Monospace layout: every char takes one `cell_width` x `line_height` cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell_width: f64,
    pub line_height: f64,
    /// Columns before a word wraps; `None` disables wrapping
    pub wrap_width: Option<usize>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: 1.0,
            line_height: 1.0,
            wrap_width: None,
        }
    }
}

impl GridLayout {
    pub fn new(cell_width: f64, line_height: f64, wrap_width: Option<usize>) -> Self {
        Self {
            cell_width,
            line_height,
            wrap_width,
        }
    }

    /// Visual lines of `text`; '\n' ends a line and belongs to none
    pub fn lines(&self, text: &str) -> Vec<LineSpan> {
        let mut lines = Vec::new();
        let mut offset = 0;

        for hard_line in text.split('\n') {
            let chars: Vec<char> = hard_line.chars().collect();
            match self.wrap_width {
                Some(width) if width > 0 => wrap_line(&chars, offset, width, &mut lines),
                _ => lines.push(LineSpan {
                    start: offset,
                    len: chars.len(),
                }),
            }
            offset += chars.len() + 1;
        }

        lines
    }
}

/// Greedy word wrap; spaces may hang past the edge, over-long words are broken
fn wrap_line(chars: &[char], offset: usize, width: usize, lines: &mut Vec<LineSpan>) {
    let mut line_start = 0;
    let mut col = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            col += 1;
            i += 1;
            continue;
        }

        let word_end = chars[i..]
            .iter()
            .position(|c| c.is_whitespace())
            .map_or(chars.len(), |p| i + p);

        if col > 0 && col + (word_end - i) > width {
            lines.push(LineSpan {
                start: offset + line_start,
                len: i - line_start,
            });
            line_start = i;
            col = 0;
        }

        while col + (word_end - i) > width {
            let take = width - col;
            i += take;
            lines.push(LineSpan {
                start: offset + line_start,
                len: i - line_start,
            });
            line_start = i;
            col = 0;
        }

        col += word_end - i;
        i = word_end;
    }

    lines.push(LineSpan {
        start: offset + line_start,
        len: chars.len() - line_start,
    });
}

impl Layout for GridLayout {
    fn offset_at(&self, text: &str, point: Point) -> Option<CharPos> {
        if !(point.x >= 0.0 && point.y >= 0.0) || self.cell_width <= 0.0 || self.line_height <= 0.0 {
            return None;
        }

        let row = (point.y / self.line_height).floor() as usize;
        let col = (point.x / self.cell_width).floor() as usize;

        let line = self.lines(text).into_iter().nth(row)?;
        (col < line.len).then(|| CharPos::new(line.start + col))
    }
}
