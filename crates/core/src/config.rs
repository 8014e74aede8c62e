//! Configuration for the diff engine

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::Formatter;
use crate::style::RenderStyle;
use crate::tokenizers::Tokenizer;

/// How large an unchanged run may be and still be folded into nearby edits
///
/// Whitespace-only runs are always eligible unless merging is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ThresholdValue", into = "ThresholdValue")]
pub enum MergeThreshold {
    /// Never merge
    Disabled,
    /// Merge runs of at most this many characters; `0` merges whitespace only
    Chars(usize),
}

impl Default for MergeThreshold {
    fn default() -> Self {
        Self::Chars(5)
    }
}

impl MergeThreshold {
    /// Threshold from a signed value; negative values disable merging
    pub fn from_signed(value: i64) -> Self {
        usize::try_from(value).map_or(Self::Disabled, Self::Chars)
    }

    /// Whether an unchanged run with this text may be merged
    pub fn allows(&self, text: &str) -> bool {
        match *self {
            Self::Disabled => false,
            Self::Chars(limit) => text.trim().is_empty() || text.chars().count() <= limit,
        }
    }

    pub fn is_disabled(&self) -> bool {
        *self == Self::Disabled
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ThresholdValue {
    Count(i64),
    Flag(bool),
    Keyword(String),
}

impl TryFrom<ThresholdValue> for MergeThreshold {
    type Error = Error;

    fn try_from(value: ThresholdValue) -> Result<Self> {
        match value {
            ThresholdValue::Count(count) => Ok(Self::from_signed(count)),
            ThresholdValue::Flag(false) => Ok(Self::Disabled),
            ThresholdValue::Flag(true) => Ok(Self::default()),
            ThresholdValue::Keyword(keyword) if keyword.eq_ignore_ascii_case("disabled") => {
                Ok(Self::Disabled)
            }
            ThresholdValue::Keyword(keyword) => Err(Error::InvalidMergeThreshold(keyword)),
        }
    }
}

impl From<MergeThreshold> for ThresholdValue {
    fn from(threshold: MergeThreshold) -> Self {
        match threshold {
            MergeThreshold::Disabled => Self::Keyword("disabled".to_string()),
            MergeThreshold::Chars(count) => Self::Count(i64::try_from(count).unwrap_or(i64::MAX)),
        }
    }
}

/// Options that can be loaded from data
///
/// ```json
/// { "mergeThreshold": 0, "style": { "tag": "span", "classDelete": "gone" } }
/// ```
///
/// `htmlFormat` is accepted as another name for `style`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DiffOptions {
    #[serde(alias = "merge_threshold")]
    pub merge_threshold: MergeThreshold,

    #[serde(alias = "htmlFormat", alias = "html_format", skip_serializing_if = "Option::is_none")]
    pub style: Option<RenderStyle>,
}

/// Configuration for diff computation
#[derive(Debug, Clone, Default)]
pub struct DiffConfig {
    /// Tokenizer to use (`HtmlTokenizer` when unset)
    pub tokenizer: Option<Box<dyn Tokenizer>>,

    /// Formatter replacing the built-in renderer (`HtmlFormatter` when unset)
    pub formatter: Option<Box<dyn Formatter>>,

    /// Merge threshold for the merge pass
    pub merge_threshold: MergeThreshold,

    /// Style used by the built-in renderer
    pub style: RenderStyle,
}

impl DiffConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that reports every raw edit, with merging disabled
    pub fn exact() -> Self {
        Self::new().with_merge_threshold(MergeThreshold::Disabled)
    }

    /// Build a configuration from JSON options
    pub fn from_json(json: &str) -> Result<Self> {
        let options: DiffOptions = serde_json::from_str(json)?;
        Self::try_from(options)
    }

    /// Set the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Replace the renderer
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Set the merge threshold
    pub fn with_merge_threshold(mut self, threshold: MergeThreshold) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Set the render style
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }
}

impl TryFrom<DiffOptions> for DiffConfig {
    type Error = Error;

    fn try_from(options: DiffOptions) -> Result<Self> {
        let style = match options.style {
            Some(style) => {
                style.validate()?;
                style
            }
            None => RenderStyle::default(),
        };

        Ok(Self::new()
            .with_merge_threshold(options.merge_threshold)
            .with_style(style))
    }
}
