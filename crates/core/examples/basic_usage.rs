//! Basic usage example of the htmldiff library
//!
//! Run with `RUST_LOG=htmldiff_core=debug` to see the engine's tracing output.

use htmldiff_core::tokenizers::GraphemeTokenizer;
use htmldiff_core::{compute_diff, diff, DiffConfig, DiffEngine, MergeThreshold, RenderStyle};
use tracing_subscriber::EnvFilter;

const LINE: &str = "----------------------------------------";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== HTML Diff Examples ===\n");

    // Example 1: Simple diff with default configuration
    example_simple_diff();

    // Example 2: Markup stays balanced
    example_markup();

    // Example 3: Merge threshold
    example_merge_threshold();

    // Example 4: Custom styles and tokenizers
    example_custom_config();
}

fn example_simple_diff() {
    println!("Example 1: Simple Diff");
    println!("{}", LINE);

    let old = "Hello World! This is a test.";
    let new = "Hello Rust! This is a test.";

    let result = compute_diff(old, new, None);

    println!("Old: {}", old);
    println!("New: {}", new);
    println!("\n{}", result);
    println!("Rendered: {}", diff(old, new));
    println!("\n");
}

fn example_markup() {
    println!("Example 2: Markup");
    println!("{}", LINE);

    let old = r#"<p>See <a href="https://example.com">the docs</a> for details.</p>"#;
    let new = concat!(
        r#"<p>See <a href="https://example.com">the new docs</a> "#,
        r#"and <img src="chart.png"/> for details.</p>"#
    );

    println!("{}", diff(old, new));
    println!("\n");
}

fn example_merge_threshold() {
    println!("Example 3: Merge Threshold");
    println!("{}", LINE);

    let old = "The quick fox jumped";
    let new = "The slow fox hopped";

    let thresholds = [MergeThreshold::Disabled, MergeThreshold::Chars(0), MergeThreshold::default()];
    for threshold in thresholds {
        let engine = DiffEngine::new(DiffConfig::new().with_merge_threshold(threshold));
        let result = engine.compute(old, new);
        println!(
            "{:?}: {} operation(s)\n  {}",
            threshold,
            result.operations.len(),
            engine.format(&result)
        );
    }
    println!("\n");
}

fn example_custom_config() {
    println!("Example 4: Custom Configuration");
    println!("{}", LINE);

    let span = DiffConfig::new().with_style(RenderStyle::span());
    println!("{}", DiffEngine::new(span).diff("a b c", "a d c"));

    let characters = DiffConfig::new()
        .with_tokenizer(Box::new(GraphemeTokenizer::new()))
        .with_style(RenderStyle::new().with_tag("mark"));
    println!("{}", DiffEngine::new(characters).diff("colour", "color"));

    let options = r#"{
        "mergeThreshold": -1,
        "htmlFormat": {"tagDelete": "s", "classInsert": ["added", "hl"]}
    }"#;
    match DiffConfig::from_json(options) {
        Ok(config) => println!("{}", DiffEngine::new(config).diff("one two", "one three")),
        Err(err) => eprintln!("invalid options: {err}"),
    }
    println!("\n");
}
