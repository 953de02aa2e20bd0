// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Collision detection and numeric suffix assignment.
//!
//! Siblings of a base slug are the slugs equal to it or of the form
//! `base-<digits>` within the same scope. They are ordered by length, then
//! value, both descending, so the numerically largest suffix comes first and
//! the next suffix is that number plus one. Freed numbers are never reused.
//!
//! Suffix assignment reads before it writes. Two concurrent saves may compute
//! the same suffix; the store's uniqueness constraint rejects the later one.

use std::cmp::Ordering;

use regex::Regex;
use tracing::debug;

use crate::{
    error::Error,
    normalize::SEPARATOR,
    store::{SiblingQuery, SlugStore},
};

/// Compiles the anchored sibling pattern `^<base>(-[0-9]+)?$`.
///
/// # Errors
///
/// Returns [`Error::Pattern`](Error::Pattern) when the pattern cannot be
/// compiled.
pub fn sibling_pattern(base_slug: &str,) -> Result<Regex, Error,>
{
    let pattern = format!("^{}(-[0-9]+)?$", regex::escape(base_slug));
    Ok(Regex::new(&pattern,)?,)
}

/// Sorts siblings by slug length, then slug value, both descending.
pub fn order_siblings(siblings: &mut [String],)
{
    siblings.sort_by(|left, right| compare_siblings(left, right,),);
}

fn compare_siblings(left: &str, right: &str,) -> Ordering
{
    right.len().cmp(&left.len(),).then_with(|| right.cmp(left,),)
}

/// Returns the digits of `slug` after `base_slug-`, if any.
pub fn trailing_suffix<'slug,>(base_slug: &str, slug: &'slug str,) -> Option<&'slug str,>
{
    let digits = slug.strip_prefix(base_slug,)?.strip_prefix(SEPARATOR,)?;
    (!digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit(),)).then_some(digits,)
}

/// Computes the suffix for `base_slug` given siblings already ordered with
/// [`order_siblings`].
///
/// Returns `None` when there are no siblings. Otherwise the first sibling's
/// suffix plus one, or `1` when it carries no suffix.
///
/// # Examples
///
/// ```
/// use named_slug::next_suffix;
///
/// let siblings = ["foo-2".to_owned(), "foo-1".to_owned(), "foo".to_owned()];
/// assert_eq!(next_suffix("foo", &siblings).as_deref(), Some("3"));
/// assert_eq!(next_suffix("bar", &[]), None);
/// ```
pub fn next_suffix(base_slug: &str, ordered_siblings: &[String],) -> Option<String,>
{
    let first = ordered_siblings.first()?;
    let next = match trailing_suffix(base_slug, first,) {
        Some(digits,) => increment_decimal(digits,),
        None => "1".to_owned(),
    };
    Some(next,)
}

/// Adds one to a run of decimal digits without a width limit. Leading zeros
/// are dropped.
fn increment_decimal(digits: &str,) -> String
{
    let mut chars: Vec<char,> = digits.trim_start_matches('0',).chars().collect();
    let mut index = chars.len();

    loop {
        if index == 0 {
            chars.insert(0, '1',);
            break;
        }
        index -= 1;
        if chars[index] == '9' {
            chars[index] = '0';
        } else {
            chars[index] = char::from(chars[index] as u8 + 1,);
            break;
        }
    }

    chars.into_iter().collect()
}

/// Reads the siblings of `query` from `store` and computes the suffix the
/// record needs, or `None` when its base slug is free.
///
/// # Errors
///
/// Propagates store failures and pattern compilation errors.
pub fn resolve_suffix<S,>(store: &S, query: &SiblingQuery<'_,>,) -> Result<Option<String,>, Error,>
where
    S: SlugStore + ?Sized,
{
    let pattern = query.pattern()?;
    let mut siblings = store.similar_slugs(query,)?;
    siblings.retain(|slug| pattern.is_match(slug,),);
    order_siblings(&mut siblings,);

    let suffix = next_suffix(query.base_slug, &siblings,);
    match suffix.as_deref() {
        Some(suffix,) => debug!(
            "base slug '{}' taken by {} sibling(s) in {}, next suffix {}",
            query.base_slug,
            siblings.len(),
            query.scope,
            suffix
        ),
        None => debug!("base slug '{}' is free in {}", query.base_slug, query.scope),
    }
    Ok(suffix,)
}
