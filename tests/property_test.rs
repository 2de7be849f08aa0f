//! Property-based tests for invariants that must hold for any input.

use proptest::prelude::*;

use pdfdocx::convert::PostProcessPass;
use pdfdocx::parser::{
    BulletClassifier, DocumentBuilder, LayoutOptions, LineAssembler, PositionedItem, SourceKind,
};
use pdfdocx::{Document, Metadata, ParagraphStyle};

/// Paragraph text: arbitrary printable text, or text dense in bullet glyphs
/// (square and round bullets plus private-use code points).
fn paragraph_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,40}",
        "[a-zA-Z0-9 \t.)•●∙⁃⁌□■▪▫▬▭▮▯⬜⬛\u{E000}-\u{E010}\u{F0A7}\u{F0B7}\u{F8FF}]{0,30}",
    ]
}

fn style() -> impl Strategy<Value = ParagraphStyle> {
    prop_oneof![Just(ParagraphStyle::Normal), Just(ParagraphStyle::ListBullet)]
}

fn source_kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![Just(SourceKind::Spans), Just(SourceKind::Chars)]
}

proptest! {
    #[test]
    fn proptest_post_process_is_idempotent(
        items in prop::collection::vec((paragraph_text(), style()), 0..12)
    ) {
        let doc = Document::from_texts(Metadata::default(), items);
        let pass = PostProcessPass::new();

        let once = pass.apply(doc);
        let twice = pass.apply(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn proptest_post_process_never_yields_blank_paragraphs(
        items in prop::collection::vec((paragraph_text(), style()), 0..12)
    ) {
        let doc = PostProcessPass::new().apply(Document::from_texts(Metadata::default(), items));
        for paragraph in doc.paragraphs() {
            prop_assert!(!paragraph.text().trim().is_empty());
        }
    }

    #[test]
    fn proptest_built_paragraphs_are_never_blank(
        lines in prop::collection::vec((paragraph_text(), 0.0f32..400.0), 0..20),
        kind in source_kind(),
    ) {
        let options = LayoutOptions::default();
        let classifier = BulletClassifier::new(&options, kind).unwrap();
        let assembler = LineAssembler::new(kind.line_gap(&options));

        let items: Vec<PositionedItem> = lines
            .iter()
            .enumerate()
            .map(|(i, (text, x))| {
                PositionedItem::at(text.as_str(), *x, 700.0 - i as f32 * 20.0, 60.0, 10.0)
            })
            .collect();

        let mut builder = DocumentBuilder::new();
        builder.begin_page();
        builder.extend(
            assembler
                .assemble(items)
                .into_iter()
                .map(|line| classifier.classify(line)),
        );
        let doc = builder.build();

        prop_assert!(doc.len() <= lines.len());
        for paragraph in doc.paragraphs() {
            prop_assert!(!paragraph.text().trim().is_empty());
        }
    }
}
