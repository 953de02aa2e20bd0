// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Routing of lookup keys to slug or identifier retrieval.
//!
//! Callers may look a record up by its slug or by its primary identifier
//! through the same entry point. Text that does not parse as a number is a
//! slug; numbers, numeric text and control tokens take the identifier path.

use serde::Serialize;
use tracing::debug;

use crate::{
    config::SlugConfig,
    error::Error,
    record::Scope,
    store::{Lookup, SlugQuery, SlugStore},
};

/// Symbolic lookup tokens that never denote a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum ControlToken
{
    All,
    First,
    Last,
}

impl ControlToken
{
    /// Parses `:all`, `:first` or `:last`.
    pub fn parse(input: &str,) -> Option<Self,>
    {
        match input {
            ":all" => Some(Self::All,),
            ":first" => Some(Self::First,),
            ":last" => Some(Self::Last,),
            _ => None,
        }
    }
}

/// Key supplied by a caller to a lookup entry point.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub enum LookupKey
{
    Sequence(Vec<LookupKey,>,),
    Text(String,),
    /// Exact integer key, typically a record identifier.
    Integer(u64,),
    Number(f64,),
    Control(ControlToken,),
    Absent,
}

impl LookupKey
{
    /// Interprets command-line style input: `:all`, `:first` and `:last`
    /// become control tokens, anything else is text.
    pub fn parse(input: &str,) -> Self
    {
        ControlToken::parse(input.trim(),)
            .map_or_else(|| Self::Text(input.to_owned(),), Self::Control,)
    }

    /// Builds a sequence key from text values.
    pub fn texts<I, S,>(values: I,) -> Self
    where
        I: IntoIterator<Item = S,>,
        S: Into<String,>,
    {
        Self::Sequence(values.into_iter().map(|value| Self::Text(value.into(),),).collect(),)
    }

    pub fn is_sequence(&self,) -> bool
    {
        matches!(self, Self::Sequence(_,))
    }

    /// First non-sequence element in depth-first order. Empty nested
    /// sequences contribute nothing.
    pub fn first_leaf(&self,) -> Option<&LookupKey,>
    {
        match self {
            Self::Sequence(items,) => items.iter().find_map(Self::first_leaf,),
            other => Some(other,),
        }
    }

    /// Slug candidates carried by the key, in order.
    pub fn slug_values(&self,) -> Vec<String,>
    {
        let mut values = Vec::new();
        self.collect_slug_values(&mut values,);
        values
    }

    fn collect_slug_values(&self, values: &mut Vec<String,>,)
    {
        match self {
            Self::Sequence(items,) => {
                for item in items {
                    item.collect_slug_values(values,);
                }
            }
            Self::Text(text,) => values.push(text.clone(),),
            Self::Integer(number,) => values.push(number.to_string(),),
            Self::Number(number,) => values.push(number.to_string(),),
            Self::Control(_,) | Self::Absent => {}
        }
    }
}

impl From<&str,> for LookupKey
{
    fn from(value: &str,) -> Self
    {
        Self::Text(value.to_owned(),)
    }
}

impl From<u64,> for LookupKey
{
    fn from(value: u64,) -> Self
    {
        Self::Integer(value,)
    }
}

impl From<ControlToken,> for LookupKey
{
    fn from(value: ControlToken,) -> Self
    {
        Self::Control(value,)
    }
}

/// Decides whether `key` denotes a slug.
///
/// # Examples
///
/// ```
/// use named_slug::{ControlToken, LookupKey, should_use_slug};
///
/// assert!(should_use_slug(&LookupKey::from("my-post")));
/// assert!(!should_use_slug(&LookupKey::from("42")));
/// assert!(should_use_slug(&LookupKey::texts(["my-post", "other"])));
/// assert!(!should_use_slug(&LookupKey::Control(ControlToken::First)));
/// ```
pub fn should_use_slug(key: &LookupKey,) -> bool
{
    match key {
        LookupKey::Sequence(_,) => key.first_leaf().is_some_and(should_use_slug,),
        LookupKey::Text(text,) => !is_numeric(text,),
        LookupKey::Integer(_,)
        | LookupKey::Number(_,)
        | LookupKey::Control(_,)
        | LookupKey::Absent => false,
    }
}

/// Whether `text` reads as a number: optional surrounding whitespace and
/// sign, then a decimal literal (digits, fraction, exponent, single
/// underscores between digits) or a `0x` hexadecimal integer literal.
/// `0b` and `0o` prefixes are not numeric.
pub fn is_numeric(text: &str,) -> bool
{
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix(['+', '-',],).unwrap_or(trimmed,);

    if let Some(digits,) = hex_literal(unsigned,) {
        return !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_hexdigit(),);
    }

    if !unsigned.starts_with(|ch: char| ch.is_ascii_digit() || ch == '.',) {
        return false;
    }
    if !underscores_between_digits(unsigned,) {
        return false;
    }

    let decimal: String = unsigned.chars().filter(|ch| *ch != '_',).collect();
    decimal.chars().all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-'),)
        && decimal.parse::<f64>().is_ok()
}

fn hex_literal(input: &str,) -> Option<&str,>
{
    input.strip_prefix("0x",).or_else(|| input.strip_prefix("0X",),)
}

fn underscores_between_digits(input: &str,) -> bool
{
    let bytes = input.as_bytes();
    bytes.iter().enumerate().filter(|(_, byte,)| **byte == b'_',).all(|(index, _,)| {
        index > 0
            && bytes[index - 1].is_ascii_digit()
            && bytes.get(index + 1,).is_some_and(u8::is_ascii_digit,)
    },)
}

/// Generic lookup entry point.
///
/// Slug keys are resolved through [`SlugStore::find_by_slugs`], optionally
/// restricted to `scope`; a sequence key yields every match, any other key
/// the first one. Other keys go to [`SlugStore::find_by_key`].
///
/// # Errors
///
/// Propagates store failures.
pub fn find<S,>(
    store: &S,
    config: &SlugConfig,
    key: &LookupKey,
    scope: Option<&Scope,>,
) -> Result<Lookup<S::Record,>, Error,>
where
    S: SlugStore + ?Sized,
{
    if should_use_slug(key,) {
        return find_by_slug(store, config, key, scope,);
    }

    debug!("looking up {} by identifier", config.record_type());
    store.find_by_key(key,)
}

/// Explicitly named lookup entry point with the same dispatch as [`find`],
/// for call sites that do not route through the generic one. Identifier keys
/// are deferred to [`find`].
///
/// # Errors
///
/// Propagates store failures.
pub fn named<S,>(
    store: &S,
    config: &SlugConfig,
    key: &LookupKey,
    scope: Option<&Scope,>,
) -> Result<Lookup<S::Record,>, Error,>
where
    S: SlugStore + ?Sized,
{
    if should_use_slug(key,) {
        return find_by_slug(store, config, key, scope,);
    }

    find(store, config, key, scope,)
}

fn find_by_slug<S,>(
    store: &S,
    config: &SlugConfig,
    key: &LookupKey,
    scope: Option<&Scope,>,
) -> Result<Lookup<S::Record,>, Error,>
where
    S: SlugStore + ?Sized,
{
    let slugs = key.slug_values();
    debug!("looking up {} by slug {:?}", config.record_type(), slugs);

    let query = SlugQuery {
        slug_field: config.slug_field(),
        slugs: &slugs,
        scope,
    };
    let records = store.find_by_slugs(&query,)?;

    if key.is_sequence() {
        Ok(Lookup::Many(records,),)
    } else {
        Ok(Lookup::One(records.into_iter().next(),),)
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{ControlToken, LookupKey, is_numeric, should_use_slug};

    proptest! {
        #[test]
        fn integers_are_never_slugs(value in any::<i64>()) {
            prop_assert!(!should_use_slug(&LookupKey::Text(value.to_string())));
        }

        #[test]
        fn lowercase_words_are_slugs(word in "[a-z][a-z-]{0,20}") {
            prop_assert!(should_use_slug(&LookupKey::Text(word)));
        }
    }

    #[test]
    fn numeric_text_routes_to_identifier()
    {
        assert!(!should_use_slug(&LookupKey::from("42")));
        assert!(!should_use_slug(&LookupKey::from(" 42 ")));
        assert!(!should_use_slug(&LookupKey::from("-3.5")));
        assert!(!should_use_slug(&LookupKey::from("1e5")));
        assert!(!should_use_slug(&LookupKey::from("1_000")));
        assert!(!should_use_slug(&LookupKey::from("0x1A")));
    }

    #[test]
    fn non_numeric_text_routes_to_slug()
    {
        assert!(should_use_slug(&LookupKey::from("my-post")));
        assert!(should_use_slug(&LookupKey::from("42-answers")));
        assert!(should_use_slug(&LookupKey::from("")));
        assert!(should_use_slug(&LookupKey::from("inf")));
        assert!(should_use_slug(&LookupKey::from("NaN")));
        assert!(should_use_slug(&LookupKey::from("1__0")));
        assert!(should_use_slug(&LookupKey::from("_1")));
        assert!(should_use_slug(&LookupKey::from("0x")));
        assert!(should_use_slug(&LookupKey::from("+-5")));
    }

    #[test]
    fn binary_and_octal_looking_slugs_route_to_slug()
    {
        assert!(should_use_slug(&LookupKey::from("0b1")));
        assert!(should_use_slug(&LookupKey::from("0o7")));
        assert!(should_use_slug(&LookupKey::from("0B101")));
        assert!(!should_use_slug(&LookupKey::from("0xff")));
        assert!(!is_numeric("0o17"));
    }

    #[test]
    fn integer_keys_keep_full_precision()
    {
        let large = (1u64 << 53) + 1;
        let key = LookupKey::from(large,);
        assert_eq!(key, LookupKey::Integer(large));
        assert!(!should_use_slug(&key));
        assert_eq!(key.slug_values(), [large.to_string()]);
    }

    #[test]
    fn sequences_use_their_first_leaf()
    {
        assert!(should_use_slug(&LookupKey::texts(["my-post", "other"])));
        assert!(!should_use_slug(&LookupKey::texts(["7", "my-post"])));

        let nested = LookupKey::Sequence(vec![
            LookupKey::Sequence(Vec::new()),
            LookupKey::Sequence(vec![LookupKey::from("deep")]),
            LookupKey::from(3u64),
        ],);
        assert!(should_use_slug(&nested));
        assert!(!should_use_slug(&LookupKey::Sequence(Vec::new())));
    }

    #[test]
    fn numbers_control_tokens_and_absent_keys_use_identifier_path()
    {
        assert!(!should_use_slug(&LookupKey::Number(42.0)));
        assert!(!should_use_slug(&LookupKey::Integer(42)));
        assert!(!should_use_slug(&LookupKey::Control(ControlToken::First)));
        assert!(!should_use_slug(&LookupKey::Control(ControlToken::All)));
        assert!(!should_use_slug(&LookupKey::Absent));
    }

    #[test]
    fn parse_recognizes_control_tokens()
    {
        assert_eq!(LookupKey::parse(":first"), LookupKey::Control(ControlToken::First));
        assert_eq!(LookupKey::parse(":last"), LookupKey::Control(ControlToken::Last));
        assert_eq!(LookupKey::parse(":other"), LookupKey::Text(":other".to_owned()));
        assert_eq!(LookupKey::parse("42"), LookupKey::Text("42".to_owned()));
    }

    #[test]
    fn slug_values_flatten_text_and_numbers()
    {
        let key = LookupKey::Sequence(vec![
            LookupKey::from("a"),
            LookupKey::Sequence(vec![LookupKey::from("b"), LookupKey::Absent]),
            LookupKey::from(5u64),
            LookupKey::Control(ControlToken::All),
        ],);
        assert_eq!(key.slug_values(), ["a", "b", "5"]);
    }

    #[test]
    fn is_numeric_rejects_letters_other_than_exponent()
    {
        assert!(is_numeric("2.5E3"));
        assert!(!is_numeric("12abc"));
        assert!(!is_numeric("infinity"));
    }
}
