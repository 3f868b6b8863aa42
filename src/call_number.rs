//! Library of Congress style call numbers.
//!
//! A call number arrives as two raw subfield texts: the classification part
//! (subfield `a`, e.g. `QA76.73`) and the optional item part (subfield `b`,
//! e.g. `.C35 1990`). [`CallNumber::parse`] splits them into five components
//! that are compared in order:
//!
//! | component        | source                                   | when missing |
//! |------------------|------------------------------------------|--------------|
//! | `class_letters`  | leading letters of the class part        | `"0"`        |
//! | `class_digits`   | first digit run of the class part        | `"0"`        |
//! | `cutter_letters` | leading letters of the item part         | `""`         |
//! | `cutter_digits`  | letters/digits code after cutter letters | `""`         |
//! | `edition`        | whatever follows the cutter              | `""`         |
//!
//! Every component is a plain string and comparison is by byte order, so
//! `"9"` sorts after `"10"`. Catalog listings produced by earlier tooling rely
//! on exactly this order.
//!
//! # Examples
//!
//! ```
//! use shelflink::CallNumber;
//!
//! let cn = CallNumber::parse("QA76", Some("C35 1990"));
//! assert_eq!(cn.class_letters, "QA");
//! assert_eq!(cn.class_digits, "76");
//! assert_eq!(cn.cutter_letters, "C");
//! assert_eq!(cn.cutter_digits, "35");
//! assert_eq!(cn.edition, " 1990");
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Stand-in for a class part with no leading letters, and for one with no digits.
pub const MISSING_CLASS_COMPONENT: &str = "0";

lazy_static! {
    static ref LEADING_LETTERS: Regex = Regex::new(r"^[A-Za-z]+").unwrap();
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();
    static ref CUTTER_NUMBER: Regex = Regex::new(r"[A-Za-z]*\d+").unwrap();
}

/// A parsed call number.
///
/// Equality and ordering look only at the five parsed components; the raw
/// `class_part` and `item_part` are kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallNumber {
    /// Raw classification text (subfield `a`)
    pub class_part: String,
    /// Raw item text (subfield `b`), if the field had one
    pub item_part: Option<String>,
    /// Uppercased leading letters of the class part, or `"0"`
    pub class_letters: String,
    /// First digit run of the class part, or `"0"`
    pub class_digits: String,
    /// Uppercased leading letters of the item part
    pub cutter_letters: String,
    /// Cutter code following the cutter letters
    pub cutter_digits: String,
    /// Remainder of the item part (edition, year, volume...)
    pub edition: String,
}

impl CallNumber {
    /// Parse a call number from its class part and optional item part.
    ///
    /// Never fails. Periods are ignored in both parts and text that does not
    /// fit the grammar ends up in sentinel values or in `edition`.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelflink::CallNumber;
    ///
    /// let cn = CallNumber::parse("Z", None);
    /// assert_eq!(cn.class_letters, "Z");
    /// assert_eq!(cn.class_digits, "0");
    /// assert_eq!(cn.cutter_letters, "");
    /// assert_eq!(cn.edition, "");
    /// ```
    #[must_use]
    pub fn parse(class_part: &str, item_part: Option<&str>) -> Self {
        let class = class_part.replace('.', "");

        let class_letters = LEADING_LETTERS.find(&class).map_or_else(
            || MISSING_CLASS_COMPONENT.to_string(),
            |m| m.as_str().to_ascii_uppercase(),
        );
        let class_digits = DIGIT_RUN.find(&class).map_or_else(
            || MISSING_CLASS_COMPONENT.to_string(),
            |m| m.as_str().to_string(),
        );

        let (cutter_letters, cutter_digits, edition) = match item_part {
            Some(item) => split_item_part(&item.replace('.', "")),
            None => (String::new(), String::new(), String::new()),
        };

        CallNumber {
            class_part: class_part.to_string(),
            item_part: item_part.map(str::to_string),
            class_letters,
            class_digits,
            cutter_letters,
            cutter_digits,
            edition,
        }
    }

    /// The five components in comparison order.
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str, &str, &str, &str) {
        (
            &self.class_letters,
            &self.class_digits,
            &self.cutter_letters,
            &self.cutter_digits,
            &self.edition,
        )
    }
}

/// Split a period-free item part into cutter letters, cutter code and edition.
fn split_item_part(item: &str) -> (String, String, String) {
    let Some(letters) = LEADING_LETTERS.find(item) else {
        return (String::new(), String::new(), item.to_string());
    };

    let cutter_letters = letters.as_str().to_ascii_uppercase();
    let rest = &item[letters.end()..];

    match CUTTER_NUMBER.find(rest) {
        Some(code) => (
            cutter_letters,
            code.as_str().to_string(),
            rest[code.end()..].to_string(),
        ),
        None => (cutter_letters, String::new(), rest.to_string()),
    }
}

/// Compare two call numbers component by component.
///
/// Equivalent to `x.cmp(y)`; provided for use with `sort_by` and friends.
#[must_use]
pub fn compare(x: &CallNumber, y: &CallNumber) -> Ordering {
    x.sort_key().cmp(&y.sort_key())
}

impl PartialEq for CallNumber {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for CallNumber {}

impl PartialOrd for CallNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CallNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl fmt::Display for CallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item_part {
            Some(item) => write!(f, "{} {}", self.class_part, item),
            None => write!(f, "{}", self.class_part),
        }
    }
}
