// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! In-memory record store.
//!
//! Keeps [`Document`]s keyed by identifier and enforces the scoped slug
//! uniqueness constraint of one record type on commit. Used by the CLI and
//! as a reference implementation of [`SlugStore`] and [`CommitStore`].

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    config::{SlugConfig, UniquenessConstraint},
    error::Error,
    lookup::{ControlToken, LookupKey},
    record::{Document, Record, RecordId, Scope},
    store::{CommitStore, Lookup, SiblingQuery, SlugQuery, SlugStore},
};

/// Records of a single type held in memory.
#[derive(Debug, Clone,)]
pub struct MemoryStore
{
    constraint: UniquenessConstraint,
    records:    BTreeMap<RecordId, Document,>,
    last_id:    u64,
}

impl MemoryStore
{
    /// Creates an empty store enforcing the uniqueness constraint declared by
    /// `config`.
    pub fn new(config: &SlugConfig,) -> Self
    {
        Self {
            constraint: config.uniqueness_constraint(),
            records:    BTreeMap::new(),
            last_id:    0,
        }
    }

    /// Stores `record` without running the uniqueness check.
    ///
    /// Records that already carry an identifier keep it; unsaved records are
    /// committed under a fresh one.
    pub fn insert(&mut self, mut record: Document,) -> RecordId
    {
        let id = self.claim_id(record.id(),);
        record.commit(id,);
        self.records.insert(id, record,);
        id
    }

    pub fn get(&self, id: RecordId,) -> Option<&Document,>
    {
        self.records.get(&id,)
    }

    pub fn len(&self,) -> usize
    {
        self.records.len()
    }

    pub fn is_empty(&self,) -> bool
    {
        self.records.is_empty()
    }

    /// Records in identifier order.
    pub fn iter(&self,) -> impl Iterator<Item = &Document,>
    {
        self.records.values()
    }

    /// Keeps an existing identifier, moving the allocator past it, or
    /// allocates a fresh one.
    fn claim_id(&mut self, id: Option<RecordId,>,) -> RecordId
    {
        match id {
            Some(id,) => {
                self.last_id = self.last_id.max(id.0,);
                id
            }
            None => {
                self.last_id += 1;
                RecordId(self.last_id,)
            }
        }
    }

    fn collect_ids(key: &LookupKey, ids: &mut Vec<RecordId,>,)
    {
        match key {
            LookupKey::Sequence(items,) => {
                for item in items {
                    Self::collect_ids(item, ids,);
                }
            }
            other => ids.extend(record_id_of(other,),),
        }
    }
}

/// Identifier denoted by a number or numeric text, if any.
fn record_id_of(key: &LookupKey,) -> Option<RecordId,>
{
    let number = match key {
        LookupKey::Integer(id,) => return Some(RecordId(*id,),),
        LookupKey::Number(number,) => *number,
        LookupKey::Text(text,) => {
            let trimmed = text.trim();
            match trimmed.parse::<u64>() {
                Ok(id,) => return Some(RecordId(id,),),
                Err(_,) => trimmed.parse::<f64>().ok()?,
            }
        }
        _ => return None,
    };

    (number.is_finite() && number >= 0.0 && number.fract() == 0.0 && number <= u64::MAX as f64)
        .then(|| RecordId(number as u64,),)
}

impl SlugStore for MemoryStore
{
    type Record = Document;

    fn similar_slugs(&self, query: &SiblingQuery<'_,>,) -> Result<Vec<String,>, Error,>
    {
        let pattern = query.pattern()?;
        let slugs = self
            .records
            .values()
            .filter(|record| !query.excludes(record.id(),) && query.scope.matches(*record,),)
            .filter_map(|record| record.field(query.slug_field,),)
            .filter(|slug| pattern.is_match(slug,),)
            .map(str::to_owned,)
            .collect();
        Ok(slugs,)
    }

    fn find_by_slugs(&self, query: &SlugQuery<'_,>,) -> Result<Vec<Document,>, Error,>
    {
        let records = self
            .records
            .values()
            .filter(|record| {
                record
                    .field(query.slug_field,)
                    .is_some_and(|slug| query.slugs.iter().any(|candidate| candidate == slug,),)
            },)
            .filter(|record| query.scope.is_none_or(|scope| scope.matches(*record,),),)
            .cloned()
            .collect();
        Ok(records,)
    }

    fn find_by_key(&self, key: &LookupKey,) -> Result<Lookup<Document,>, Error,>
    {
        let found = match key {
            LookupKey::Control(ControlToken::All,) => {
                Lookup::Many(self.records.values().cloned().collect(),)
            }
            LookupKey::Control(ControlToken::First,) => {
                Lookup::One(self.records.values().next().cloned(),)
            }
            LookupKey::Control(ControlToken::Last,) => {
                Lookup::One(self.records.values().next_back().cloned(),)
            }
            LookupKey::Sequence(_,) => {
                let mut ids = Vec::new();
                Self::collect_ids(key, &mut ids,);
                Lookup::Many(ids.iter().filter_map(|id| self.records.get(id,).cloned(),).collect(),)
            }
            other => Lookup::One(record_id_of(other,).and_then(|id| self.records.get(&id,).cloned(),),),
        };
        Ok(found,)
    }
}

impl CommitStore for MemoryStore
{
    fn commit(&mut self, record: &mut Document,) -> Result<RecordId, Error,>
    {
        let slug_field = self.constraint.slug_field.as_str();
        if let Some(slug,) = record.field(slug_field,).filter(|slug| !slug.trim().is_empty(),) {
            let scope = Scope::of(&self.constraint.scope, record,);
            let taken = self.records.values().any(|other| {
                other.id() != record.id()
                    && scope.matches(other,)
                    && other.field(slug_field,) == Some(slug,)
            },);
            if taken {
                warn!("slug '{}' {} within {}", slug, self.constraint.message, scope);
                return Err(Error::SlugTaken {
                    slug:  slug.to_owned(),
                    scope: scope.to_string(),
                },);
            }
        }

        let id = self.claim_id(record.id(),);
        record.commit(id,);
        self.records.insert(id, record.clone(),);
        debug!("committed record {}", id);
        Ok(id,)
    }
}
