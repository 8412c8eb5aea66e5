use std::collections::HashSet;
use std::time::{Duration, Instant};

use quill_tui::book::{BlockKind, ContentBlock};
use quill_tui::outline::build_outline;
use quill_tui::outline_view::visible_rows;

/// Performance benchmark suite for outline derivation
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Outline building from flat block lists of various sizes
/// - Visible-row flattening with and without collapsed chapters
const SMALL_BOOK_BLOCKS: usize = 10;
const MEDIUM_BOOK_BLOCKS: usize = 100;
const LARGE_BOOK_BLOCKS: usize = 1000;
const HUGE_BOOK_BLOCKS: usize = 10000;

const ITERATIONS: usize = 100;

/// Create a test manuscript with the specified number of blocks, mixing
/// chapters, sections, text, and page breaks the way a real book would.
fn create_test_book(num_blocks: usize, avg_words_per_block: usize) -> Vec<ContentBlock> {
    let sample_words = vec![
        "Lorem",
        "ipsum",
        "dolor",
        "sit",
        "amet",
        "consectetur",
        "adipiscing",
        "elit",
        "sed",
        "do",
        "eiusmod",
        "tempor",
        "incididunt",
        "ut",
        "labore",
        "et",
        "dolore",
        "magna",
        "aliqua",
    ];

    let mut blocks = Vec::with_capacity(num_blocks);
    for i in 0..num_blocks {
        let kind = match i % 10 {
            0 => BlockKind::Chapter,
            3 | 7 => BlockKind::Section,
            9 => BlockKind::PageBreak,
            _ => BlockKind::Text,
        };

        let mut text = String::new();
        if kind != BlockKind::PageBreak {
            for j in 0..avg_words_per_block {
                if j > 0 {
                    text.push(' ');
                }
                text.push_str(sample_words[(i + j) % sample_words.len()]);
            }
        }

        blocks.push(ContentBlock::new(i.to_string(), kind, text));
    }

    blocks
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);

        // The outline is rebuilt on every draw, so anything near frame
        // budget is worth flagging.
        if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (may drop frames)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..10 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = *durations.iter().min().unwrap();
    let max_duration = *durations.iter().max().unwrap();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

#[test]
fn bench_outline_building() {
    let books = vec![
        ("small", create_test_book(SMALL_BOOK_BLOCKS, 20)),
        ("medium", create_test_book(MEDIUM_BOOK_BLOCKS, 20)),
        ("large", create_test_book(LARGE_BOOK_BLOCKS, 20)),
        ("huge", create_test_book(HUGE_BOOK_BLOCKS, 20)),
    ];

    for (label, blocks) in &books {
        let result = benchmark(
            &format!("build_outline ({label}, {} blocks)", blocks.len()),
            ITERATIONS,
            || {
                let forest = build_outline(blocks);
                std::hint::black_box(forest);
            },
        );
        result.print();
    }
}

#[test]
fn bench_visible_rows() {
    let blocks = create_test_book(LARGE_BOOK_BLOCKS, 20);
    let forest = build_outline(&blocks);

    let result = benchmark("visible_rows (expanded)", ITERATIONS, || {
        let rows = visible_rows(&forest, &HashSet::new());
        std::hint::black_box(rows);
    });
    result.print();

    // Collapse every chapter; the flattened view shrinks accordingly.
    let collapsed: HashSet<String> = forest.iter().map(|node| node.id.clone()).collect();
    let result = benchmark("visible_rows (all chapters collapsed)", ITERATIONS, || {
        let rows = visible_rows(&forest, &collapsed);
        std::hint::black_box(rows);
    });
    result.print();
}
