//! Bullet and list-item classification for assembled lines.

use regex::Regex;

use super::layout::Line;
use super::options::LayoutOptions;
use super::source::SourceKind;
use crate::error::{Error, Result};

/// Which rule classified a line as a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletRule {
    /// A marker pattern matched (index into the configured pattern list)
    Pattern(usize),
    /// The line is indented past the threshold
    Indent,
    /// The line starts with a configured bullet glyph
    LeadingGlyph,
}

/// A line together with its bullet decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    /// The source line
    pub line: Line,
    /// Whether the line is a list item
    pub is_bullet: bool,
    /// Text with any matched marker removed
    pub cleaned_text: String,
    /// The rule that fired, if any
    pub rule: Option<BulletRule>,
}

impl ClassifiedLine {
    fn plain(line: Line, text: String) -> Self {
        Self {
            line,
            is_bullet: false,
            cleaned_text: text,
            rule: None,
        }
    }

    fn bullet(line: Line, text: String, rule: BulletRule) -> Self {
        Self {
            line,
            is_bullet: true,
            cleaned_text: text,
            rule: Some(rule),
        }
    }
}

/// Decides per line whether it is a list item, and strips the marker.
///
/// Rules are tried in order and the first that fires wins:
/// marker patterns, then indentation, then (character streams only) a
/// leading bullet glyph.
#[derive(Debug, Clone)]
pub struct BulletClassifier {
    patterns: Vec<Regex>,
    indent_threshold: f32,
    glyphs: Vec<char>,
    leading_glyph_rule: bool,
}

impl BulletClassifier {
    /// Build a classifier for lines coming from the given kind of source.
    pub fn new(options: &LayoutOptions, kind: SourceKind) -> Result<Self> {
        let patterns = options
            .bullet_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| Error::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            indent_threshold: options.bullet_indent_threshold,
            glyphs: options.bullet_glyphs.clone(),
            leading_glyph_rule: kind == SourceKind::Chars,
        })
    }

    /// Classify one line.
    pub fn classify(&self, line: Line) -> ClassifiedLine {
        let full_text = line.text();
        let text = full_text.trim();

        if let Some((index, rest)) = self.match_pattern(text) {
            let cleaned = rest.trim().to_string();
            return ClassifiedLine::bullet(line, cleaned, BulletRule::Pattern(index));
        }

        if line.leftmost_x() > self.indent_threshold {
            let text = text.to_string();
            return ClassifiedLine::bullet(line, text, BulletRule::Indent);
        }

        if self.leading_glyph_rule {
            if let Some(first) = text.chars().next() {
                if self.glyphs.contains(&first) {
                    let cleaned = text[first.len_utf8()..].trim().to_string();
                    return ClassifiedLine::bullet(line, cleaned, BulletRule::LeadingGlyph);
                }
            }
        }

        let text = text.to_string();
        ClassifiedLine::plain(line, text)
    }

    /// Find the first pattern matching at the start of `text`.
    fn match_pattern<'t>(&self, text: &'t str) -> Option<(usize, &'t str)> {
        self.patterns.iter().enumerate().find_map(|(i, re)| {
            re.find(text)
                .filter(|m| m.start() == 0)
                .map(|m| (i, &text[m.end()..]))
        })
    }
}
