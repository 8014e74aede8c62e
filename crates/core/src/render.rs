//! Rendering operations as marked-up text
//!
//! The default renderer never lets a marker straddle markup: within a changed
//! span, runs of content (including atomic tags such as images) are wrapped
//! in one marker each, while ordinary open and close tags between them are
//! emitted as they are.

use std::ops::Range;

use crate::diff::{OpKind, Operation};
use crate::style::{Marker, RenderStyle, Side};
use crate::tokenizers::{join_tokens, Token};

/// Trait for formatters that turn operations into output text
pub trait Formatter: Send + Sync {
    /// Format the operations over the given token sequences
    fn format(&self, operations: &[Operation], old: &[Token], new: &[Token]) -> String;

    /// Get the name of this formatter
    fn name(&self) -> &str;

    /// Clone this formatter into a Box
    fn clone_box(&self) -> Box<dyn Formatter>;
}

impl Clone for Box<dyn Formatter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Formatter({})", self.name())
    }
}

/// Marker-based HTML formatter (the default)
#[derive(Debug, Clone, Default)]
pub struct HtmlFormatter {
    style: RenderStyle,
}

impl HtmlFormatter {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }
}

impl Formatter for HtmlFormatter {
    fn format(&self, operations: &[Operation], old: &[Token], new: &[Token]) -> String {
        render(operations, old, new, &self.style)
    }

    fn name(&self) -> &str {
        "html"
    }

    fn clone_box(&self) -> Box<dyn Formatter> {
        Box::new(self.clone())
    }
}

/// Render operations with the given style
///
/// # Panics
///
/// Panics if an operation refers to tokens outside `old` or `new`.
pub fn render(
    operations: &[Operation],
    old: &[Token],
    new: &[Token],
    style: &RenderStyle,
) -> String {
    let markers = Markers::resolve(style);
    let mut out = String::new();

    for op in operations {
        match op.kind {
            OpKind::Equal => {
                write_span(side_tokens(new, op.new_range(), "new"), markers.equal, &mut out);
            }
            OpKind::Delete => {
                write_span(side_tokens(old, op.old_range(), "old"), markers.delete, &mut out);
            }
            OpKind::Insert => {
                write_span(side_tokens(new, op.new_range(), "new"), markers.insert, &mut out);
            }
            OpKind::Replace => {
                write_span(
                    side_tokens(old, op.old_range(), "old"),
                    markers.replace_delete,
                    &mut out,
                );
                write_span(
                    side_tokens(new, op.new_range(), "new"),
                    markers.replace_insert,
                    &mut out,
                );
            }
        }
    }

    out
}

/// Markers for every side, resolved once per render
struct Markers<'a> {
    delete: Option<Marker<'a>>,
    insert: Option<Marker<'a>>,
    replace_delete: Option<Marker<'a>>,
    replace_insert: Option<Marker<'a>>,
    equal: Option<Marker<'a>>,
}

impl<'a> Markers<'a> {
    fn resolve(style: &'a RenderStyle) -> Self {
        Self {
            delete: style.marker(Side::Delete),
            insert: style.marker(Side::Insert),
            replace_delete: style.marker(Side::ReplaceDelete),
            replace_insert: style.marker(Side::ReplaceInsert),
            equal: style.marker(Side::Equal),
        }
    }
}

fn side_tokens<'t>(tokens: &'t [Token], range: Range<usize>, side: &str) -> &'t [Token] {
    match tokens.get(range.clone()) {
        Some(slice) => slice,
        None => panic!(
            "operation range {range:?} is out of bounds for {} {side} tokens",
            tokens.len()
        ),
    }
}

/// Write a span, wrapping content runs and passing real tags through
fn write_span(tokens: &[Token], marker: Option<Marker<'_>>, out: &mut String) {
    let Some(marker) = marker else {
        tokens.iter().for_each(|token| out.push_str(token.as_str()));
        return;
    };

    let is_markup = |token: &Token| token.is_tag() && !token.is_atomic();
    let mut rest = tokens;

    while !rest.is_empty() {
        let content_len = rest.iter().position(is_markup).unwrap_or(rest.len());
        let (content, tail) = rest.split_at(content_len);
        let text = join_tokens(content);
        if !text.is_empty() {
            marker.wrap(&text, out);
        }

        let tags_len = tail.iter().position(|t| !is_markup(t)).unwrap_or(tail.len());
        let (tags, tail) = tail.split_at(tags_len);
        tags.iter().for_each(|tag| out.push_str(tag.as_str()));

        rest = tail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        let mut offset = 0;
        words
            .iter()
            .map(|w| {
                let token = Token::infer(*w, offset);
                offset += w.len();
                token
            })
            .collect()
    }

    fn classic(operations: &[Operation], old: &[&str], new: &[&str]) -> String {
        render(operations, &tokens(old), &tokens(new), &RenderStyle::classic())
    }

    #[test]
    fn test_empty_operations() {
        assert_eq!(classic(&[], &[], &[]), "");
    }

    #[test]
    fn test_equal_is_unwrapped() {
        let ops = [Operation::new(OpKind::Equal, 0, 3, 0, 3)];
        let words = ["Hello", " ", "world"];
        assert_eq!(classic(&ops, &words, &words), "Hello world");

        let words = ["<p>", "Hello", "</p>"];
        assert_eq!(classic(&ops, &words, &words), "<p>Hello</p>");
    }

    #[test]
    fn test_insert() {
        let ops = [
            Operation::new(OpKind::Equal, 0, 1, 0, 1),
            Operation::new(OpKind::Insert, 1, 1, 1, 4),
            Operation::new(OpKind::Equal, 1, 3, 4, 5),
        ];
        let result = classic(
            &ops,
            &["Hello", " ", "world"],
            &["Hello", " ", "beautiful", " ", "world"],
        );
        assert_eq!(result, r#"Hello<ins class="diffins"> beautiful </ins>world"#);
    }

    #[test]
    fn test_delete() {
        let ops = [
            Operation::new(OpKind::Equal, 0, 2, 0, 2),
            Operation::new(OpKind::Delete, 2, 4, 2, 2),
            Operation::new(OpKind::Equal, 4, 5, 2, 3),
        ];
        let result = classic(
            &ops,
            &["Hello", " ", "beautiful", " ", "world"],
            &["Hello", " ", "world"],
        );
        assert_eq!(result, r#"Hello <del class="diffdel">beautiful </del>world"#);
    }

    #[test]
    fn test_replace() {
        let ops = [
            Operation::new(OpKind::Equal, 0, 2, 0, 2),
            Operation::new(OpKind::Replace, 2, 3, 2, 3),
            Operation::new(OpKind::Equal, 3, 4, 3, 4),
        ];
        let result = classic(
            &ops,
            &["Hello", " ", "world", "!"],
            &["Hello", " ", "everyone", "!"],
        );
        assert_eq!(
            result,
            r#"Hello <del class="diffmod">world</del><ins class="diffmod">everyone</ins>!"#
        );
    }

    #[test]
    fn test_tags_stay_outside_markers() {
        let ops = [
            Operation::new(OpKind::Equal, 0, 1, 0, 1),
            Operation::new(OpKind::Insert, 1, 1, 1, 4),
            Operation::new(OpKind::Equal, 1, 2, 4, 5),
        ];
        let result = classic(
            &ops,
            &["Text", "</p>"],
            &["Text", "<strong>", "bold", "</strong>", "</p>"],
        );
        assert_eq!(result, r#"Text<strong><ins class="diffins">bold</ins></strong></p>"#);

        let ops = [Operation::new(OpKind::Insert, 0, 0, 0, 5)];
        let result = classic(&ops, &[], &["<div>", "<p>", "Hello", "</p>", "</div>"]);
        assert_eq!(result, r#"<div><p><ins class="diffins">Hello</ins></p></div>"#);
    }

    #[test]
    fn test_atomic_tags_are_wrapped() {
        let ops = [Operation::new(OpKind::Insert, 0, 0, 0, 1)];
        let result = classic(&ops, &[], &[r#"<img src="test.jpg" />"#]);
        assert_eq!(result, r#"<ins class="diffins"><img src="test.jpg" /></ins>"#);

        let ops = [Operation::new(OpKind::Delete, 0, 4, 0, 0)];
        let result = classic(&ops, &["a", "<br/>", "<b>", "c"], &[]);
        assert_eq!(
            result,
            r#"<del class="diffdel">a<br/></del><b><del class="diffdel">c</del>"#
        );
    }

    #[test]
    fn test_equal_wrapper() {
        let style = RenderStyle::classic().with_tag_equal("span").with_class_equal("same");
        let ops = [Operation::new(OpKind::Equal, 0, 3, 0, 3)];
        let words = tokens(&["<p>", "Hi", "</p>"]);

        assert_eq!(
            render(&ops, &words, &words, &style),
            r#"<p><span class="same">Hi</span></p>"#
        );
    }

    #[test]
    fn test_custom_style() {
        let classes: crate::style::ClassList = ["x", "y"].into_iter().collect();
        let style = RenderStyle::new().with_tag("<span>").with_class(classes);
        let ops = [Operation::new(OpKind::Replace, 0, 1, 0, 1)];

        assert_eq!(
            render(&ops, &tokens(&["a"]), &tokens(&["b"]), &style),
            r#"<span class="x y">a</span><span class="x y">b</span>"#
        );
    }

    #[test]
    fn test_formatter_trait() {
        let formatter: Box<dyn Formatter> = Box::new(HtmlFormatter::new(RenderStyle::new()));
        let ops = [Operation::new(OpKind::Delete, 0, 1, 0, 0)];

        assert_eq!(formatter.clone().format(&ops, &tokens(&["x"]), &[]), "<del>x</del>");
        assert_eq!(formatter.name(), "html");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_range_operation_panics() {
        let ops = [Operation::new(OpKind::Delete, 0, 3, 0, 0)];
        classic(&ops, &["a"], &[]);
    }
}
