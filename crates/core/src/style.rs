//! Render styles
//!
//! A `RenderStyle` names the marker tag and CSS classes used for each kind of
//! change. Every field is optional; lookups walk a fallback chain from the
//! most specific field to the generic one and finally to a built-in default:
//!
//! | side | tag chain | class chain |
//! |---|---|---|
//! | delete | `tag_delete`, `tag`, `del` | `class_delete`, `class` |
//! | insert | `tag_insert`, `tag`, `ins` | `class_insert`, `class` |
//! | replace, old half | `tag_replace_delete`, `tag_replace`, `tag_delete`, `tag`, `del` | `class_replace_delete`, `class_replace`, `class_delete`, `class` |
//! | replace, new half | `tag_replace_insert`, `tag_replace`, `tag_insert`, `tag`, `ins` | `class_replace_insert`, `class_replace`, `class_insert`, `class` |
//! | equal | `tag_equal` (unset: no marker) | `class_equal` |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which marker a run of tokens is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Delete,
    Insert,
    /// Old half of a replacement
    ReplaceDelete,
    /// New half of a replacement
    ReplaceInsert,
    Equal,
}

/// CSS classes for a marker
///
/// Deserializes from either a space separated string or a list of strings.
/// An empty list is meaningful: it stops the fallback chain and the marker is
/// rendered without a `class` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClassValue", into = "Vec<String>")]
pub struct ClassList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassValue {
    One(String),
    Many(Vec<String>),
}

impl From<ClassValue> for ClassList {
    fn from(value: ClassValue) -> Self {
        match value {
            ClassValue::One(classes) => Self::from(classes.as_str()),
            ClassValue::Many(classes) => classes.into_iter().collect(),
        }
    }
}

impl From<ClassList> for Vec<String> {
    fn from(list: ClassList) -> Self {
        list.0
    }
}

impl ClassList {
    /// A class list with no classes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the list holds no classes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The classes joined with single spaces
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl From<&str> for ClassList {
    fn from(classes: &str) -> Self {
        classes.split_whitespace().collect()
    }
}

impl From<String> for ClassList {
    fn from(classes: String) -> Self {
        Self::from(classes.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .filter(|class: &String| !class.trim().is_empty())
                .collect(),
        )
    }
}

/// Tag names and classes used by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "RenderStyle::new", rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(alias = "tag_delete", skip_serializing_if = "Option::is_none")]
    pub tag_delete: Option<String>,
    #[serde(alias = "tag_insert", skip_serializing_if = "Option::is_none")]
    pub tag_insert: Option<String>,
    #[serde(alias = "tag_replace", skip_serializing_if = "Option::is_none")]
    pub tag_replace: Option<String>,
    #[serde(alias = "tag_replace_delete", skip_serializing_if = "Option::is_none")]
    pub tag_replace_delete: Option<String>,
    #[serde(alias = "tag_replace_insert", skip_serializing_if = "Option::is_none")]
    pub tag_replace_insert: Option<String>,
    /// Wrapper for unchanged text; unchanged text is emitted bare when unset
    #[serde(alias = "tag_equal", skip_serializing_if = "Option::is_none")]
    pub tag_equal: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassList>,
    #[serde(alias = "class_delete", skip_serializing_if = "Option::is_none")]
    pub class_delete: Option<ClassList>,
    #[serde(alias = "class_insert", skip_serializing_if = "Option::is_none")]
    pub class_insert: Option<ClassList>,
    #[serde(alias = "class_replace", skip_serializing_if = "Option::is_none")]
    pub class_replace: Option<ClassList>,
    #[serde(alias = "class_replace_delete", skip_serializing_if = "Option::is_none")]
    pub class_replace_delete: Option<ClassList>,
    #[serde(alias = "class_replace_insert", skip_serializing_if = "Option::is_none")]
    pub class_replace_insert: Option<ClassList>,
    #[serde(alias = "class_equal", skip_serializing_if = "Option::is_none")]
    pub class_equal: Option<ClassList>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::classic()
    }
}

impl RenderStyle {
    /// Bare `<del>`/`<ins>` markers without classes
    pub fn new() -> Self {
        Self {
            tag: None,
            tag_delete: None,
            tag_insert: None,
            tag_replace: None,
            tag_replace_delete: None,
            tag_replace_insert: None,
            tag_equal: None,
            class: None,
            class_delete: None,
            class_insert: None,
            class_replace: None,
            class_replace_delete: None,
            class_replace_insert: None,
            class_equal: None,
        }
    }

    /// `<del>`/`<ins>` markers with the `diffdel`, `diffins` and `diffmod` classes
    pub fn classic() -> Self {
        Self::new()
            .with_class_delete("diffdel")
            .with_class_insert("diffins")
            .with_class_replace("diffmod")
    }

    /// `<span>` markers with `diff-remove`/`diff-add` classes
    ///
    /// Replacement halves additionally carry `diff-replace`.
    pub fn span() -> Self {
        Self::new()
            .with_tag("span")
            .with_class_delete("diff-remove")
            .with_class_insert("diff-add")
            .with_class_replace_delete(
                ["diff-replace", "diff-remove"].into_iter().collect::<ClassList>(),
            )
            .with_class_replace_insert(
                ["diff-replace", "diff-add"].into_iter().collect::<ClassList>(),
            )
    }

    /// Parse a style from JSON and validate its tag names
    pub fn from_json(json: &str) -> Result<Self> {
        let style: Self = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    /// Tag used for every marker unless a narrower one is set
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Tag for deletions
    pub fn with_tag_delete(mut self, tag: impl Into<String>) -> Self {
        self.tag_delete = Some(tag.into());
        self
    }

    /// Tag for insertions
    pub fn with_tag_insert(mut self, tag: impl Into<String>) -> Self {
        self.tag_insert = Some(tag.into());
        self
    }

    /// Tag for both halves of a replacement
    pub fn with_tag_replace(mut self, tag: impl Into<String>) -> Self {
        self.tag_replace = Some(tag.into());
        self
    }

    /// Tag for the removed half of a replacement
    pub fn with_tag_replace_delete(mut self, tag: impl Into<String>) -> Self {
        self.tag_replace_delete = Some(tag.into());
        self
    }

    /// Tag for the added half of a replacement
    pub fn with_tag_replace_insert(mut self, tag: impl Into<String>) -> Self {
        self.tag_replace_insert = Some(tag.into());
        self
    }

    /// Wrap unchanged text too
    pub fn with_tag_equal(mut self, tag: impl Into<String>) -> Self {
        self.tag_equal = Some(tag.into());
        self
    }

    /// Classes used for every marker unless a narrower list is set
    pub fn with_class(mut self, classes: impl Into<ClassList>) -> Self {
        self.class = Some(classes.into());
        self
    }

    /// Classes for deletions
    pub fn with_class_delete(mut self, classes: impl Into<ClassList>) -> Self {
        self.class_delete = Some(classes.into());
        self
    }

    /// Classes for insertions
    pub fn with_class_insert(mut self, classes: impl Into<ClassList>) -> Self {
        self.class_insert = Some(classes.into());
        self
    }

    /// Classes for both halves of a replacement
    pub fn with_class_replace(mut self, classes: impl Into<ClassList>) -> Self {
        self.class_replace = Some(classes.into());
        self
    }

    /// Classes for the removed half of a replacement
    pub fn with_class_replace_delete(mut self, classes: impl Into<ClassList>) -> Self {
        self.class_replace_delete = Some(classes.into());
        self
    }

    /// Classes for the added half of a replacement
    pub fn with_class_replace_insert(mut self, classes: impl Into<ClassList>) -> Self {
        self.class_replace_insert = Some(classes.into());
        self
    }

    /// Classes for unchanged text wrapped by `with_tag_equal`
    pub fn with_class_equal(mut self, classes: impl Into<ClassList>) -> Self {
        self.class_equal = Some(classes.into());
        self
    }

    /// Check that every configured tag is a usable element name
    ///
    /// Empty tag names are accepted; they fall through to the next tag in
    /// the chain.
    pub fn validate(&self) -> Result<()> {
        let tags = [
            &self.tag,
            &self.tag_delete,
            &self.tag_insert,
            &self.tag_replace,
            &self.tag_replace_delete,
            &self.tag_replace_insert,
            &self.tag_equal,
        ];

        for tag in tags.into_iter().flatten() {
            let name = strip_brackets(tag);
            if !name.is_empty() && !is_element_name(name) {
                return Err(Error::InvalidTagName(tag.clone()));
            }
        }
        Ok(())
    }

    /// Resolve the marker for one side, or `None` when text is left bare
    pub fn marker(&self, side: Side) -> Option<Marker<'_>> {
        let (tags, default_tag) = match side {
            Side::Delete => (vec![&self.tag_delete, &self.tag], Some("del")),
            Side::Insert => (vec![&self.tag_insert, &self.tag], Some("ins")),
            Side::ReplaceDelete => (
                vec![&self.tag_replace_delete, &self.tag_replace, &self.tag_delete, &self.tag],
                Some("del"),
            ),
            Side::ReplaceInsert => (
                vec![&self.tag_replace_insert, &self.tag_replace, &self.tag_insert, &self.tag],
                Some("ins"),
            ),
            Side::Equal => (vec![&self.tag_equal], None),
        };
        let classes = match side {
            Side::Delete => vec![&self.class_delete, &self.class],
            Side::Insert => vec![&self.class_insert, &self.class],
            Side::ReplaceDelete => vec![
                &self.class_replace_delete,
                &self.class_replace,
                &self.class_delete,
                &self.class,
            ],
            Side::ReplaceInsert => vec![
                &self.class_replace_insert,
                &self.class_replace,
                &self.class_insert,
                &self.class,
            ],
            Side::Equal => vec![&self.class_equal],
        };

        let tag = tags
            .into_iter()
            .filter_map(|tag| tag.as_deref())
            .map(strip_brackets)
            .find(|name| !name.is_empty())
            .or(default_tag)?;
        let classes = classes
            .into_iter()
            .find_map(|classes| classes.as_ref())
            .filter(|classes| !classes.is_empty());

        Some(Marker { tag, classes })
    }
}

/// A resolved marker: element name plus optional classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub tag: &'a str,
    pub classes: Option<&'a ClassList>,
}

impl Marker<'_> {
    /// Wrap `content` in this marker
    pub fn wrap(&self, content: &str, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(classes) = self.classes {
            out.push_str(" class=\"");
            html_escape::encode_double_quoted_attribute_to_string(classes.joined(), out);
            out.push('"');
        }
        out.push('>');
        out.push_str(content);
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// `"<del>"` → `"del"`
fn strip_brackets(tag: &str) -> &str {
    tag.trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/')
        .trim()
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
