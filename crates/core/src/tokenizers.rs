//! Text tokenizers
//!
//! Provides the `Tokenizer` trait and the built-in tokenizers. A tokenizer
//! splits text into the atomic units compared by the alignment engine. Every
//! built-in tokenizer is lossless: concatenating the token texts in order
//! reproduces the (normalized) input exactly.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::normalizers::{Normalizer, UnicodeNfc};

/// What matched a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An HTML tag literal, `<` through the next `>`
    Tag,
    /// An HTML entity such as `&nbsp;` or `&#x1F600;`
    Entity,
    /// An `http://`, `https://` or `www.` address
    Url,
    /// An email address
    Email,
    /// A run of digits with optional separators
    Number,
    /// A maximal run of whitespace
    Whitespace,
    /// A run of letters from one space-delimited script
    Word,
    /// A single grapheme cluster (punctuation, CJK, Thai, stray `<` or `&`, ...)
    Grapheme,
}

/// A single token with its position in the tokenized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text
    pub text: String,

    /// What kind of input produced this token
    pub kind: TokenKind,

    /// Byte range of the token in the text that was tokenized
    pub span: Range<usize>,
}

impl Token {
    /// Create a new token
    pub fn new(text: impl Into<String>, kind: TokenKind, span: Range<usize>) -> Self {
        Self {
            text: text.into(),
            kind,
            span,
        }
    }

    /// Create a token starting at `offset`, guessing its kind from the text
    ///
    /// Intended for custom tokenizers that do not track kinds themselves;
    /// the renderer only cares whether a token is a tag.
    pub fn infer(text: impl Into<String>, offset: usize) -> Self {
        let text = text.into();
        let kind = if TAG_PATTERN.find(&text).is_some_and(|m| m.end() == text.len()) {
            TokenKind::Tag
        } else if !text.is_empty() && text.chars().all(char::is_whitespace) {
            TokenKind::Whitespace
        } else {
            TokenKind::Word
        };
        let span = offset..offset + text.len();
        Self { text, kind, span }
    }

    /// The token text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this token is HTML markup
    pub fn is_tag(&self) -> bool {
        self.kind == TokenKind::Tag
    }

    /// Whether this token is an indivisible tag, treated as content
    ///
    /// Self-closing tags (`<br/>`, `<img ... />`) and image tags are atomic.
    pub fn is_atomic(&self) -> bool {
        self.is_tag()
            && (self.text.ends_with("/>") || self.element_name().eq_ignore_ascii_case("img"))
    }

    /// Whether this token is whitespace only
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Element name of a tag token (`"p"` for `<p class="x">`, `"p"` for `</p>`)
    fn element_name(&self) -> &str {
        let inner = self.text.trim_start_matches('<').trim_start_matches('/');
        let end = inner
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(inner.len());
        &inner[..end]
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Join token texts back into a string
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(Token::as_str).collect()
}

/// Trait for tokenizers that split text into tokens
pub trait Tokenizer: Send + Sync {
    /// Tokenize the text
    ///
    /// Must not fail for any input; empty input yields no tokens.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Get the name of this tokenizer
    fn name(&self) -> &str;

    /// Clone this tokenizer into a Box
    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

impl Clone for Box<dyn Tokenizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tokenizer({})", self.name())
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Scripts that separate words with spaces; each is grouped into runs.
///
/// Han, Hiragana, Katakana and Thai are absent: they fall back to
/// one grapheme cluster per token so single-character edits are visible.
const SPACED_SCRIPTS: &[&str] = &[
    "Latin",
    "Cyrillic",
    "Greek",
    "Armenian",
    "Georgian",
    "Arabic",
    "Hebrew",
    "Syriac",
    "Thaana",
    "Devanagari",
    "Bengali",
    "Gurmukhi",
    "Gujarati",
    "Oriya",
    "Tamil",
    "Telugu",
    "Kannada",
    "Malayalam",
    "Sinhala",
    "Tibetan",
    "Mongolian",
    "Ethiopic",
    "Cherokee",
    "Coptic",
    "Khmer",
    "Lao",
    "Myanmar",
    "Hangul",
];

/// Capture group names in priority order, with the kind each produces
const TOKEN_GROUPS: &[(&str, TokenKind)] = &[
    ("tag", TokenKind::Tag),
    ("entity", TokenKind::Entity),
    ("url", TokenKind::Url),
    ("email", TokenKind::Email),
    ("number", TokenKind::Number),
    ("space", TokenKind::Whitespace),
    ("word", TokenKind::Word),
];

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&token_pattern()).expect("token pattern is a valid regex"));

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A<[^>]+>").expect("tag pattern is a valid regex"));

fn token_pattern() -> String {
    let words = SPACED_SCRIPTS
        .iter()
        .map(|script| format!(r"\p{{{script}}}[\p{{{script}}}\p{{Inherited}}]*"))
        .collect::<Vec<_>>()
        .join("|");

    let mut pattern = String::from(r"\A(?:");
    pattern.push_str(r"(?P<tag><[^>]+>)");
    pattern.push_str(r"|(?P<entity>&(?:[a-zA-Z0-9]+|#[0-9]{1,6}|#[xX][0-9a-fA-F]{1,6});)");
    pattern.push_str(r#"|(?P<url>(?i:https?://|www\.)[^\s<>"']+)"#);
    pattern.push_str(r"|(?P<email>[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,})");
    pattern.push_str(r"|(?P<number>[.+\-]?[0-9](?:[,.\-]?[0-9]+)*)");
    pattern.push_str(r"|(?P<space>\s+)");
    pattern.push_str(&format!("|(?P<word>{words})"));
    pattern.push(')');
    pattern
}

/// Match the token at the start of `rest`: `(byte length, kind)`
fn next_token(rest: &str) -> (usize, TokenKind) {
    if let Some(caps) = TOKEN_PATTERN.captures(rest) {
        let kind = TOKEN_GROUPS
            .iter()
            .find(|(name, _)| caps.name(name).is_some())
            .map_or(TokenKind::Word, |(_, kind)| *kind);
        let len = caps.get(0).map_or(0, |m| m.end());
        if len > 0 {
            return (len, kind);
        }
    }
    (next_grapheme_len(rest), TokenKind::Grapheme)
}

fn next_grapheme_len(rest: &str) -> usize {
    rest.graphemes(true).next().map_or(rest.len(), str::len)
}

/// Run `step` over the whole text, collecting one token per step
fn scan(text: &str, step: impl Fn(&str) -> (usize, TokenKind)) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let (len, kind) = step(rest);
        tokens.push(Token::new(&rest[..len], kind, pos..pos + len));
        pos += len;
    }

    tokens
}

// ============================================================================
// Built-in Tokenizers
// ============================================================================

/// Markup- and script-aware tokenizer (the default)
///
/// At each position the first of these that matches wins: an HTML tag, an
/// HTML entity, a URL, an email address, a number, a whitespace run, a run of
/// letters from one space-delimited script, and finally a single grapheme
/// cluster.
#[derive(Debug, Clone)]
pub struct HtmlTokenizer {
    normalizer: Box<dyn Normalizer>,
}

impl HtmlTokenizer {
    /// Create a tokenizer that normalizes input to NFC
    pub fn new() -> Self {
        Self {
            normalizer: Box::new(UnicodeNfc),
        }
    }

    /// Replace the normalizer applied before scanning
    pub fn with_normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Tokenize raw bytes, replacing invalid UTF-8 with U+FFFD
    pub fn tokenize_bytes(&self, bytes: &[u8]) -> Vec<Token> {
        self.tokenize(&String::from_utf8_lossy(bytes))
    }
}

impl Default for HtmlTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for HtmlTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        let normalized = self.normalizer.normalize(text);
        scan(&normalized, next_token)
    }

    fn name(&self) -> &str {
        "html"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}

/// Character-level tokenizer
///
/// Emits one grapheme cluster per token, except that HTML tags are still kept
/// whole so the renderer can step around them.
#[derive(Debug, Clone)]
pub struct GraphemeTokenizer {
    normalizer: Box<dyn Normalizer>,
}

impl GraphemeTokenizer {
    pub fn new() -> Self {
        Self {
            normalizer: Box::new(UnicodeNfc),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }
}

impl Default for GraphemeTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for GraphemeTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let normalized = self.normalizer.normalize(text);
        scan(&normalized, |rest| match TAG_PATTERN.find(rest) {
            Some(tag) => (tag.end(), TokenKind::Tag),
            None => {
                let len = next_grapheme_len(rest);
                let kind = if rest[..len].chars().all(char::is_whitespace) {
                    TokenKind::Whitespace
                } else {
                    TokenKind::Grapheme
                };
                (len, kind)
            }
        })
    }

    fn name(&self) -> &str {
        "grapheme"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizers::Verbatim;

    fn texts(input: &str) -> Vec<String> {
        HtmlTokenizer::new()
            .tokenize(input)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(HtmlTokenizer::new().tokenize("").is_empty());
        assert!(GraphemeTokenizer::new().tokenize("").is_empty());
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(texts("Hello world"), ["Hello", " ", "world"]);
        assert_eq!(texts("Hello, world!"), ["Hello", ",", " ", "world", "!"]);
        assert_eq!(texts("$ % ^ &"), ["$", " ", "%", " ", "^", " ", "&"]);
    }

    #[test]
    fn test_whitespace_runs_are_single_tokens() {
        assert_eq!(texts("   "), ["   "]);
        assert_eq!(texts("a \t\n b"), ["a", " \t\n ", "b"]);

        let tokens = HtmlTokenizer::new().tokenize("a  b");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert!(tokens[1].is_whitespace());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("12345 67890"), ["12345", " ", "67890"]);
        assert_eq!(texts("pi is 3.14"), ["pi", " ", "is", " ", "3.14"]);
        assert_eq!(texts("Latin123"), ["Latin", "123"]);
        assert_eq!(texts("Привет123"), ["Привет", "123"]);
    }

    #[test]
    fn test_html_tags() {
        assert_eq!(texts("<p>Hello</p>"), ["<p>", "Hello", "</p>"]);
        assert_eq!(
            texts("<div><p>Hello</p></div>"),
            ["<div>", "<p>", "Hello", "</p>", "</div>"]
        );
        assert_eq!(
            texts(r#"<p class="greeting">Hello</p>"#),
            [r#"<p class="greeting">"#, "Hello", "</p>"]
        );
        assert_eq!(texts(r#"<img src="test.jpg" />"#), [r#"<img src="test.jpg" />"#]);
    }

    #[test]
    fn test_tag_kinds() {
        let tokens = HtmlTokenizer::new().tokenize(r#"<p>a<img src="x.png"/><br/></p>"#);
        let kinds: Vec<_> = tokens.iter().map(|t| (t.is_tag(), t.is_atomic())).collect();

        assert_eq!(
            kinds,
            [(true, false), (false, false), (true, true), (true, true), (true, false)]
        );
    }

    #[test]
    fn test_unmatched_angle_bracket() {
        assert_eq!(texts("a < b"), ["a", " ", "<", " ", "b"]);
        assert_eq!(texts("<>"), ["<", ">"]);
    }

    #[test]
    fn test_entities() {
        assert_eq!(texts("Hello&nbsp;world"), ["Hello", "&nbsp;", "world"]);
        assert_eq!(texts("&#169; Copyright"), ["&#169;", " ", "Copyright"]);
        assert_eq!(texts("&#x1F600; Emoji"), ["&#x1F600;", " ", "Emoji"]);
        assert_eq!(texts("&nbsp;&copy;"), ["&nbsp;", "&copy;"]);
    }

    #[test]
    fn test_stray_ampersands() {
        assert_eq!(texts("A & B"), ["A", " ", "&", " ", "B"]);
        assert_eq!(texts("&incomplete"), ["&", "incomplete"]);
    }

    #[test]
    fn test_mixed_markup() {
        let tokens = texts("<p>Hello&nbsp;world! <strong>This</strong> is a test.</p>");
        assert_eq!(
            tokens,
            [
                "<p>", "Hello", "&nbsp;", "world", "!", " ", "<strong>", "This", "</strong>", " ",
                "is", " ", "a", " ", "test", ".", "</p>"
            ]
        );
    }

    #[test]
    fn test_emails() {
        assert_eq!(texts("Contact: user@example.com"), ["Contact", ":", " ", "user@example.com"]);
        assert_eq!(texts("first.last@example.com"), ["first.last@example.com"]);
        assert_eq!(texts("user+tag@example.com"), ["user+tag@example.com"]);
        assert_eq!(
            texts("Email user@пример.com"),
            ["Email", " ", "user", "@", "пример", ".", "com"]
        );
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            texts("https://example.com/search?q=term&page=2"),
            ["https://example.com/search?q=term&page=2"]
        );
        assert_eq!(texts("www.example.com"), ["www.example.com"]);
        assert_eq!(
            texts("Visit https://example.com/привет for content"),
            ["Visit", " ", "https://example.com/привет", " ", "for", " ", "content"]
        );
        assert_eq!(
            texts(r#"<a href="https://example.com">Visit</a>"#),
            [r#"<a href="https://example.com">"#, "Visit", "</a>"]
        );
    }

    #[test]
    fn test_script_transitions_split_words() {
        assert_eq!(texts("LatinПривет"), ["Latin", "Привет"]);
        assert_eq!(texts("HelloΚαλημέρα"), ["Hello", "Καλημέρα"]);
        assert_eq!(texts("Helloשלום"), ["Hello", "שלום"]);
        assert_eq!(
            texts("LatinПриветΚαλημέραمرحباनमस्ते世界"),
            ["Latin", "Привет", "Καλημέρα", "مرحبا", "नमस्ते", "世", "界"]
        );
        assert_eq!(
            texts("English(английский),हिन्दी!العربية?"),
            ["English", "(", "английский", ")", ",", "हिन्दी", "!", "العربية", "?"]
        );
    }

    #[test]
    fn test_unspaced_scripts_are_per_character() {
        assert_eq!(texts("こんにちは世界"), ["こ", "ん", "に", "ち", "は", "世", "界"]);
        assert_eq!(texts("안녕하세요"), ["안녕하세요"]);
        assert_eq!(texts("สวัสดี"), ["ส", "วั", "ส", "ดี"]);
    }

    #[test]
    fn test_combining_marks_stay_in_word() {
        let tokens = HtmlTokenizer::new()
            .with_normalizer(Box::new(Verbatim))
            .tokenize("cafe\u{0301} ok");
        assert_eq!(tokens[0].text, "cafe\u{0301}");
        assert_eq!(tokens[0].kind, TokenKind::Word);
    }

    #[test]
    fn test_normalizes_to_nfc() {
        assert_eq!(texts("de\u{0301}ja\u{0300}"), ["d\u{e9}j\u{e0}"]);
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let tokens = HtmlTokenizer::new().tokenize_bytes(b"ab\xffcd");
        let joined = join_tokens(&tokens);
        assert_eq!(joined, "ab\u{fffd}cd");
    }

    #[test]
    fn test_spans_point_into_text() {
        let text = "<b>Γεια σας</b>";
        let tokens = HtmlTokenizer::new().tokenize(text);
        for token in &tokens {
            assert_eq!(&text[token.span.clone()], token.text);
        }
        assert_eq!(tokens.last().map(|t| t.span.end), Some(text.len()));
    }

    #[test]
    fn test_grapheme_tokenizer() {
        let tokens: Vec<_> = GraphemeTokenizer::new()
            .tokenize("<b>ab c</b>")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(tokens, ["<b>", "a", "b", " ", "c", "</b>"]);
    }

    #[test]
    fn test_infer_kind() {
        assert!(Token::infer("<em>", 0).is_tag());
        assert!(Token::infer("  ", 3).is_whitespace());
        assert_eq!(Token::infer("word", 5).span, 5..9);
        assert!(!Token::infer("a<b>", 0).is_tag());
    }
}
