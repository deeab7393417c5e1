//! The stateless tagger: given a token and a little context, returns the
//! tag string drawn from the tagset.

use crate::petscii::{self, AsciiClass};
use crate::tagset::Tagset;
use crate::token::Token;

/// A stateless classifier consulting a [`Tagset`].
///
/// `Tagger` holds only a reference to the read-only tagset; it carries no
/// state of its own and so is trivially `Copy`-able across the decoder's
/// per-line invocations.
#[derive(Debug, Clone, Copy)]
pub struct Tagger<'a> {
    tagset: &'a Tagset,
}

impl<'a> Tagger<'a> {
    /// Build a tagger over the given tagset.
    pub fn new(tagset: &'a Tagset) -> Self {
        Tagger { tagset }
    }

    /// Classify an ASCII printable token (letter, digit, sigil or
    /// punctuation), consulting `out` only to check whether the preceding
    /// token was a bare `.` (for integer-vs-real disambiguation).
    pub fn parse_ascii(&self, token: &Token, out: &[Token]) -> String {
        match petscii::classify_ascii(token.value) {
            Some(AsciiClass::Letter) => self.tagset.tag("variables", "real").to_string(),
            Some(AsciiClass::Digit) => {
                if out.last().is_some_and(|t| t.text == ".") {
                    self.tagset.tag("numbers", "real").to_string()
                } else {
                    self.tagset.tag("numbers", "integer").to_string()
                }
            }
            Some(AsciiClass::Sigil) => self.tagset.tag("punctuations", "type").to_string(),
            Some(AsciiClass::Punctuation) => self
                .tagset
                .find_tag_by_value("punctuations", &token.text)
                .unwrap_or_else(|| self.tagset.tag("punctuations", "other"))
                .to_string(),
            None => crate::tagset::UNKNOWN_SENTINEL_TAG.to_string(),
        }
    }

    /// Classify a command-byte token: operator ranges first, then a
    /// literal lookup across `commands` and `constants`, falling back to
    /// the catalog's `unknown` tag.
    pub fn parse_command(&self, token: &Token) -> String {
        if let Some(tag) = self.parse_operator(token) {
            return tag.to_string();
        }

        if let Some(tag) = self.tagset.find_tag_by_value("commands", &token.text) {
            return tag.to_string();
        }

        if let Some(tag) = self.tagset.find_tag_by_value("constants", &token.text) {
            return tag.to_string();
        }

        self.tagset.tag("unknown", "unknown").to_string()
    }

    fn parse_operator(&self, token: &Token) -> Option<&str> {
        let v = token.value;
        if petscii::ARITHMETIC_RANGE.contains(&v) {
            Some(self.tagset.tag("operators", "arithmetic"))
        } else if petscii::RELATIONAL_BYTES.contains(&v) {
            Some(self.tagset.tag("operators", "relational"))
        } else if petscii::LOGICAL_BYTES.contains(&v) {
            Some(self.tagset.tag("operators", "logical"))
        } else {
            None
        }
    }

    /// The fixed tag for a token inside a string literal.
    pub fn parse_string(&self) -> String {
        self.tagset.tag("strings", "string").to_string()
    }

    /// The fixed tag for a token inside a `REM` comment.
    pub fn parse_comment(&self) -> String {
        self.tagset.tag("strings", "comment").to_string()
    }

    /// The fixed tag for a standalone print-context token.
    ///
    /// No lexer code path currently assigns this tag (see `DESIGN.md`'s
    /// print-mode note); kept so callers can classify a standalone
    /// print-context token directly.
    pub fn parse_print(&self) -> String {
        self.tagset.tag("strings", "print").to_string()
    }
}
