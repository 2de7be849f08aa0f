//! Line assembly for positioned text.
//!
//! Sources deliver text items in reading order; this module groups them into
//! visual lines by vertical proximity without reordering anything.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// An axis-aligned bounding box in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }
}

/// A text fragment with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedItem {
    /// The text content
    pub text: String,
    /// Where the fragment sits
    pub bbox: BoundingBox,
}

impl PositionedItem {
    /// Create a positioned item.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    /// Create an item from its top-left corner and size.
    pub fn at(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(text, BoundingBox::new(x, y, x + width, y + height))
    }
}

/// A visual line: items sharing a vertical band, in extraction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    items: Vec<PositionedItem>,
}

impl Line {
    /// Create a line from items.
    pub fn new(items: Vec<PositionedItem>) -> Self {
        Self { items }
    }

    /// The items in this line.
    pub fn items(&self) -> &[PositionedItem] {
        &self.items
    }

    /// Check if the line has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Leftmost x of any item, or 0 for an empty line.
    pub fn leftmost_x(&self) -> f32 {
        self.items
            .iter()
            .map(|item| item.bbox.x0)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(0.0)
    }

    /// Get the combined text of all items.
    ///
    /// Items are concatenated in order. A single space is inserted where two
    /// neighbours leave a gap wider than a quarter of the item height and
    /// neither side already carries whitespace.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                let prev = &self.items[i - 1];
                let gap = item.bbox.x0 - prev.bbox.x1;
                let height = item.bbox.height().max(prev.bbox.height());
                let space_threshold = height * 0.25;

                let prev_ends_with_space = prev.text.ends_with(char::is_whitespace);
                let curr_starts_with_space = item.text.starts_with(char::is_whitespace);

                if height > 0.0
                    && gap > space_threshold
                    && !prev_ends_with_space
                    && !curr_starts_with_space
                {
                    result.push(' ');
                }
            }
            result.push_str(&item.text);
        }

        result.nfc().collect()
    }
}

/// Groups a page's items into lines by vertical proximity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAssembler {
    gap_threshold: f32,
}

impl LineAssembler {
    /// Create an assembler with the given vertical gap threshold.
    pub fn new(gap_threshold: f32) -> Self {
        Self { gap_threshold }
    }

    /// The configured gap threshold.
    pub fn gap_threshold(&self) -> f32 {
        self.gap_threshold
    }

    /// Assemble items into lines.
    ///
    /// The anchor is the vertical position of the item that opened the
    /// current line; an item further than the threshold from it opens a new
    /// line and becomes the new anchor.
    pub fn assemble(&self, items: Vec<PositionedItem>) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<PositionedItem> = Vec::new();
        let mut anchor: Option<f32> = None;

        for item in items {
            let y = item.bbox.y0;
            match anchor {
                Some(a) if (y - a).abs() <= self.gap_threshold => current.push(item),
                _ => {
                    if !current.is_empty() {
                        lines.push(Line::new(std::mem::take(&mut current)));
                    }
                    anchor = Some(y);
                    current.push(item);
                }
            }
        }

        if !current.is_empty() {
            lines.push(Line::new(current));
        }

        lines
    }
}
