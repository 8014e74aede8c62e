//! Text normalizers
//!
//! Provides the `Normalizer` trait applied to input text before tokenization.
//! Normalizing both sides to the same Unicode form keeps visually identical
//! text (precomposed `é` versus `e` + combining acute) from showing up as a
//! change.

use std::borrow::Cow;

use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Trait for text normalizers
pub trait Normalizer: Send + Sync {
    /// Normalize the input text
    ///
    /// Implementations should borrow the input when it is already normalized.
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str>;

    /// Get the name of this normalizer
    fn name(&self) -> &str;

    /// Clone this normalizer into a Box
    fn clone_box(&self) -> Box<dyn Normalizer>;
}

impl Clone for Box<dyn Normalizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Normalizer({})", self.name())
    }
}

// ============================================================================
// Built-in Normalizers
// ============================================================================

/// Unicode Normalization Form C (canonical composition)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeNfc;

impl Normalizer for UnicodeNfc {
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if is_nfc(input) {
            Cow::Borrowed(input)
        } else {
            Cow::Owned(input.nfc().collect())
        }
    }

    fn name(&self) -> &str {
        "nfc"
    }

    fn clone_box(&self) -> Box<dyn Normalizer> {
        Box::new(*self)
    }
}

/// Leaves text untouched
///
/// Use this when the diff output must reproduce the input byte for byte,
/// including non-NFC sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Normalizer for Verbatim {
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(input)
    }

    fn name(&self) -> &str {
        "verbatim"
    }

    fn clone_box(&self) -> Box<dyn Normalizer> {
        Box::new(*self)
    }
}
