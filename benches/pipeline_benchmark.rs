//! Benchmarks for the line assembly and classification pipeline.
//!
//! Run with: cargo bench
//!
//! Items are synthetic so the numbers measure the pipeline, not PDF parsing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfdocx::convert::PostProcessPass;
use pdfdocx::parser::{
    BulletClassifier, DocumentBuilder, LayoutOptions, LineAssembler, PositionedItem, SourceKind,
};
use pdfdocx::{Document, Metadata, ParagraphStyle};

/// Character items for a page of `lines` lines, every third one a bullet.
fn create_char_page(lines: usize) -> Vec<PositionedItem> {
    let mut items = Vec::new();
    for line in 0..lines {
        let text = match line % 3 {
            0 => format!("• Item number {} in the list", line),
            1 => format!("{}) Numbered entry for benchmarking", line),
            _ => format!("Plain paragraph text on line {}", line),
        };
        let y = 800.0 - line as f32 * 14.0;
        for (i, c) in text.chars().enumerate() {
            items.push(PositionedItem::at(c.to_string(), 72.0 + i as f32 * 6.0, y, 6.0, 12.0));
        }
    }
    items
}

fn run_pipeline(items: Vec<PositionedItem>, classifier: &BulletClassifier, gap: f32) -> Document {
    let lines = LineAssembler::new(gap).assemble(items);
    let mut builder = DocumentBuilder::new();
    builder.begin_page();
    builder.extend(lines.into_iter().map(|line| classifier.classify(line)));
    builder.build()
}

/// Benchmark assembly + classification at various page sizes.
fn bench_pipeline(c: &mut Criterion) {
    let options = LayoutOptions::default();
    let classifier = BulletClassifier::new(&options, SourceKind::Chars).unwrap();
    let gap = SourceKind::Chars.line_gap(&options);

    let mut group = c.benchmark_group("pipeline");
    for lines in [10, 50, 200].iter() {
        let items = create_char_page(*lines);
        group.bench_function(format!("{}_lines", lines), |b| {
            b.iter(|| run_pipeline(black_box(items.clone()), &classifier, gap));
        });
    }
    group.finish();
}

/// Benchmark the bullet glyph normalization pass.
fn bench_post_process(c: &mut Criterion) {
    let texts: Vec<String> = (0..500)
        .map(|i| match i % 4 {
            0 => format!("\u{F0B7}Task {}", i),
            1 => format!("Option ▪ {} □ other", i),
            _ => format!("Ordinary sentence {}", i),
        })
        .collect();
    let doc = Document::from_texts(
        Metadata::default(),
        texts.iter().map(|t| (t.as_str(), ParagraphStyle::Normal)),
    );
    let pass = PostProcessPass::new();

    c.bench_function("post_process_500", |b| {
        b.iter(|| pass.apply(black_box(doc.clone())));
    });
}

criterion_group!(benches, bench_pipeline, bench_post_process);
criterion_main!(benches);
