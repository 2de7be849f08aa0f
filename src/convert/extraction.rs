//! Structured extraction strategies.

use std::sync::Arc;

use super::{Strategy, StrategyOutcome};
use crate::error::Result;
use crate::model::Document;
use crate::parser::{
    BulletClassifier, DocumentBuilder, LayoutOptions, LineAssembler, TextSource,
};

/// Runs a [`TextSource`] through line assembly, bullet classification and
/// document building.
///
/// The line gap and the leading-glyph rule are chosen from the source's
/// [`SourceKind`](crate::parser::SourceKind).
pub struct ExtractionStrategy {
    source: Arc<dyn TextSource>,
    assembler: LineAssembler,
    classifier: BulletClassifier,
}

impl ExtractionStrategy {
    /// Create a strategy for `source`.
    ///
    /// Fails with [`Error::InvalidPattern`](crate::Error::InvalidPattern)
    /// when a configured bullet pattern does not compile.
    pub fn new(source: Arc<dyn TextSource>, options: &LayoutOptions) -> Result<Self> {
        let kind = source.kind();
        let assembler = LineAssembler::new(kind.line_gap(options));
        let classifier = BulletClassifier::new(options, kind)?;
        Ok(Self {
            source,
            assembler,
            classifier,
        })
    }

    /// Run the full pipeline on `data`.
    pub fn run(&self, data: &[u8]) -> Result<Document> {
        let pages = self.source.extract(data)?;
        let mut builder = DocumentBuilder::new();

        for (index, items) in pages.into_iter().enumerate() {
            builder.begin_page();
            let lines = self.assembler.assemble(items);
            log::debug!(
                "{}: page {} assembled into {} lines",
                self.source.name(),
                index + 1,
                lines.len()
            );
            builder.extend(lines.into_iter().map(|line| self.classifier.classify(line)));
        }

        Ok(builder.build())
    }
}

impl Strategy for ExtractionStrategy {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn attempt(&self, data: &[u8]) -> StrategyOutcome {
        self.run(data).into()
    }
}

impl std::fmt::Debug for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionStrategy")
            .field("source", &self.source.name())
            .field("gap_threshold", &self.assembler.gap_threshold())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::ParagraphStyle;
    use crate::parser::{PageItems, PositionedItem, SourceKind};

    struct FixedSource {
        kind: SourceKind,
        pages: Vec<PageItems>,
    }

    impl TextSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn extract(&self, _data: &[u8]) -> Result<Vec<PageItems>> {
            Ok(self.pages.clone())
        }
    }

    struct MissingSource;

    impl TextSource for MissingSource {
        fn name(&self) -> &str {
            "missing"
        }

        fn kind(&self) -> SourceKind {
            SourceKind::Spans
        }

        fn extract(&self, _data: &[u8]) -> Result<Vec<PageItems>> {
            Err(Error::CapabilityUnavailable("backend not installed".into()))
        }
    }

    #[test]
    fn test_span_pipeline() {
        let source = FixedSource {
            kind: SourceKind::Spans,
            pages: vec![
                vec![
                    PositionedItem::at("Shopping", 20.0, 700.0, 60.0, 10.0),
                    PositionedItem::at("• First item", 20.0, 680.0, 80.0, 10.0),
                ],
                vec![],
                vec![PositionedItem::at("Indented note", 120.0, 700.0, 80.0, 10.0)],
            ],
        };
        let strategy = ExtractionStrategy::new(Arc::new(source), &LayoutOptions::default()).unwrap();
        let doc = strategy.run(b"ignored").unwrap();

        assert_eq!(doc.metadata().page_count, 3);
        let got: Vec<_> = doc
            .paragraphs()
            .iter()
            .map(|p| (p.text(), p.style()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Shopping", ParagraphStyle::Normal),
                ("First item", ParagraphStyle::ListBullet),
                ("Indented note", ParagraphStyle::ListBullet),
            ]
        );
    }

    #[test]
    fn test_char_pipeline_groups_glyphs() {
        let glyphs = "▪Milk"
            .chars()
            .enumerate()
            .map(|(i, c)| PositionedItem::at(c.to_string(), 20.0 + i as f32 * 5.0, 700.0 + (i % 2) as f32, 5.0, 10.0))
            .collect();
        let source = FixedSource {
            kind: SourceKind::Chars,
            pages: vec![glyphs],
        };
        let options = LayoutOptions::default().with_bullet_patterns(Vec::<String>::new());
        let strategy = ExtractionStrategy::new(Arc::new(source), &options).unwrap();
        let doc = strategy.run(b"").unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.paragraphs()[0].text(), "Milk");
        assert!(doc.paragraphs()[0].is_list_item());
    }

    #[test]
    fn test_unavailable_source() {
        let strategy = ExtractionStrategy::new(Arc::new(MissingSource), &LayoutOptions::default()).unwrap();
        assert!(matches!(
            strategy.attempt(b"%PDF-1.4"),
            StrategyOutcome::Unavailable(_)
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let options = LayoutOptions::default().with_bullet_patterns(vec!["(".to_string()]);
        let result = ExtractionStrategy::new(Arc::new(MissingSource), &options);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }
}
