// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Queries the slug algorithm issues against its backing store.
//!
//! The crate never persists records itself. A host implements [`SlugStore`]
//! for its storage layer and, when it wants the provided save helpers,
//! [`CommitStore`] for the write side.

use regex::Regex;

use crate::{
    collision,
    error::Error,
    lookup::LookupKey,
    record::{Record, RecordId, Scope},
};

/// Sibling lookup issued while resolving collisions for one record.
#[derive(Debug, Clone, Copy,)]
pub struct SiblingQuery<'query,>
{
    /// Field holding slugs.
    pub slug_field: &'query str,
    /// Base slug whose siblings are requested.
    pub base_slug:  &'query str,
    /// Scope value of the record being saved.
    pub scope:      &'query Scope,
    /// Identifier of the record being saved. `None` for an unsaved record,
    /// which never equals a stored identifier.
    pub exclude:    Option<RecordId,>,
}

impl SiblingQuery<'_,>
{
    /// Anchored pattern matching `base_slug` and `base_slug-<digits>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](Error::Pattern) when the pattern cannot be
    /// compiled.
    pub fn pattern(&self,) -> Result<Regex, Error,>
    {
        collision::sibling_pattern(self.base_slug,)
    }

    /// Whether a stored record with identifier `id` is the record being saved.
    pub fn excludes(&self, id: Option<RecordId,>,) -> bool
    {
        matches!((self.exclude, id), (Some(excluded,), Some(candidate,)) if excluded == candidate)
    }
}

/// Exact slug lookup issued by the slug path of the lookup dispatcher.
#[derive(Debug, Clone, Copy,)]
pub struct SlugQuery<'query,>
{
    pub slug_field: &'query str,
    pub slugs:      &'query [String],
    /// Optional scope restriction; `None` searches every record of the type.
    pub scope:      Option<&'query Scope,>,
}

/// Result of a lookup: a single record or a collection.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum Lookup<R,>
{
    One(Option<R,>,),
    Many(Vec<R,>,),
}

impl<R,> Lookup<R,>
{
    /// Flattens the result into a vector.
    pub fn into_vec(self,) -> Vec<R,>
    {
        match self {
            Self::One(record,) => record.into_iter().collect(),
            Self::Many(records,) => records,
        }
    }

    pub fn first(&self,) -> Option<&R,>
    {
        match self {
            Self::One(record,) => record.as_ref(),
            Self::Many(records,) => records.first(),
        }
    }
}

/// Read side of a record store as seen by the slug algorithm.
pub trait SlugStore
{
    type Record: Record;

    /// Returns slugs of records in `query.scope`, other than the excluded
    /// one, whose slug matches [`SiblingQuery::pattern`].
    ///
    /// Order does not matter. Returning a superset (for example a prefix
    /// match) is allowed; slugs not matching the pattern are discarded.
    ///
    /// # Errors
    ///
    /// Store failures are propagated unchanged.
    fn similar_slugs(&self, query: &SiblingQuery<'_,>,) -> Result<Vec<String,>, Error,>;

    /// Returns records whose slug is one of `query.slugs`.
    ///
    /// # Errors
    ///
    /// Store failures are propagated unchanged.
    fn find_by_slugs(&self, query: &SlugQuery<'_,>,) -> Result<Vec<Self::Record,>, Error,>;

    /// Identifier based lookup used when a key does not denote a slug.
    ///
    /// # Errors
    ///
    /// Store failures are propagated unchanged.
    fn find_by_key(&self, key: &LookupKey,) -> Result<Lookup<Self::Record,>, Error,>;
}

/// Write side of a record store.
pub trait CommitStore: SlugStore
{
    /// Enforces the scoped slug uniqueness constraint, persists the record,
    /// applies its pending changes and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlugTaken`](Error::SlugTaken) when another record in
    /// the same scope already holds the slug.
    fn commit(&mut self, record: &mut Self::Record,) -> Result<RecordId, Error,>;
}
