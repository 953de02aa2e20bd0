// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Record access used by the slug algorithm.
//!
//! Fields are addressed by name so a single [`SlugConfig`](crate::SlugConfig)
//! can describe which field carries the source text, which carries the slug,
//! and which fields partition records into scopes. [`Document`] is an
//! in-memory record with per-save change tracking.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Primary identifier assigned by a store on first commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,)]
#[serde(transparent)]
pub struct RecordId(pub u64,);

impl fmt::Display for RecordId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Field-level view of a stored record.
///
/// `field` returns the value the record would persist right now: the pending
/// value when the field changed during the current save cycle, the stored
/// value otherwise.
pub trait Record
{
    /// Identifier assigned by the store, `None` until the first commit.
    fn id(&self,) -> Option<RecordId,>;

    /// Current value of the named field.
    fn field(&self, name: &str,) -> Option<&str,>;

    /// Whether the named field changed during the current save cycle.
    fn field_changed(&self, name: &str,) -> bool;

    /// Sets the pending value of the named field.
    fn set_field(&mut self, name: &str, value: Option<String,>,);

    /// Drops the pending value of the named field, restoring the stored one.
    fn discard_change(&mut self, name: &str,);
}

/// Returns `true` for absent values and values made of whitespace only.
pub fn is_blank(value: Option<&str,>,) -> bool
{
    value.is_none_or(|text| text.trim().is_empty(),)
}

/// Equality constraints that partition records into disambiguation groups.
///
/// Slugs only need to be unique among records sharing the same scope value.
/// An empty scope covers every record of the type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize,)]
pub struct Scope
{
    constraints: Vec<(String, Option<String,>,),>,
}

impl Scope
{
    /// Scope covering every record of the type.
    pub fn unscoped() -> Self
    {
        Self::default()
    }

    /// Reads the scope value of `record` for the configured scope fields.
    pub fn of<R,>(fields: &[String], record: &R,) -> Self
    where
        R: Record + ?Sized,
    {
        let constraints = fields
            .iter()
            .map(|name| (name.clone(), record.field(name,).map(str::to_owned,),),)
            .collect();
        Self {
            constraints,
        }
    }

    /// Adds an equality constraint.
    pub fn with(mut self, field: impl Into<String,>, value: Option<&str,>,) -> Self
    {
        self.constraints.push((field.into(), value.map(str::to_owned,),),);
        self
    }

    pub fn constraints(&self,) -> &[(String, Option<String,>,)]
    {
        &self.constraints
    }

    pub fn is_unscoped(&self,) -> bool
    {
        self.constraints.is_empty()
    }

    /// Whether `record` belongs to this scope value.
    pub fn matches<R,>(&self, record: &R,) -> bool
    where
        R: Record + ?Sized,
    {
        self.constraints
            .iter()
            .all(|(name, value,)| record.field(name,) == value.as_deref(),)
    }
}

impl fmt::Display for Scope
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        if self.constraints.is_empty() {
            return f.write_str("all records",);
        }

        for (index, (name, value,),) in self.constraints.iter().enumerate() {
            if index > 0 {
                f.write_str(", ",)?;
            }
            match value {
                Some(value,) => write!(f, "{name}={value}")?,
                None => write!(f, "{name}=<none>")?,
            }
        }
        Ok((),)
    }
}

/// In-memory record with stored values and pending changes.
///
/// Values assigned through [`Record::set_field`] stay pending until
/// [`commit`](Self::commit). Assigning the stored value again cancels the
/// pending change, so `field_changed` only reports real modifications.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct Document
{
    id:      Option<RecordId,>,
    stored:  BTreeMap<String, String,>,
    pending: BTreeMap<String, Option<String,>,>,
}

impl Document
{
    /// Creates an unsaved record without fields.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Creates an unsaved record whose fields are all pending changes.
    pub fn from_fields<I, K, V,>(fields: I,) -> Self
    where
        I: IntoIterator<Item = (K, V,),>,
        K: Into<String,>,
        V: Into<String,>,
    {
        let mut document = Self::new();
        for (name, value,) in fields {
            document.pending.insert(name.into(), Some(value.into(),),);
        }
        document
    }

    /// Creates a record as loaded from a store, without pending changes.
    pub fn persisted<I, K, V,>(id: RecordId, fields: I,) -> Self
    where
        I: IntoIterator<Item = (K, V,),>,
        K: Into<String,>,
        V: Into<String,>,
    {
        Self {
            id:      Some(id,),
            stored:  fields.into_iter().map(|(name, value,)| (name.into(), value.into(),),).collect(),
            pending: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`Record::set_field`].
    pub fn with_field(mut self, name: &str, value: impl Into<String,>,) -> Self
    {
        self.set_field(name, Some(value.into(),),);
        self
    }

    /// Value of the field as last committed.
    pub fn stored_field(&self, name: &str,) -> Option<&str,>
    {
        self.stored.get(name,).map(String::as_str,)
    }

    pub fn has_changes(&self,) -> bool
    {
        !self.pending.is_empty()
    }

    /// Applies pending changes and records the identifier assigned by the
    /// store.
    pub fn commit(&mut self, id: RecordId,)
    {
        self.id = Some(id,);
        for (name, value,) in std::mem::take(&mut self.pending,) {
            match value {
                Some(value,) => {
                    self.stored.insert(name, value,);
                }
                None => {
                    self.stored.remove(&name,);
                }
            }
        }
    }
}

impl Record for Document
{
    fn id(&self,) -> Option<RecordId,>
    {
        self.id
    }

    fn field(&self, name: &str,) -> Option<&str,>
    {
        match self.pending.get(name,) {
            Some(value,) => value.as_deref(),
            None => self.stored_field(name,),
        }
    }

    fn field_changed(&self, name: &str,) -> bool
    {
        self.pending.contains_key(name,)
    }

    fn set_field(&mut self, name: &str, value: Option<String,>,)
    {
        if self.stored_field(name,) == value.as_deref() {
            self.pending.remove(name,);
        } else {
            self.pending.insert(name.to_owned(), value,);
        }
    }

    fn discard_change(&mut self, name: &str,)
    {
        self.pending.remove(name,);
    }
}

#[cfg(test)]
mod tests
{
    use super::{Document, Record, RecordId, Scope, is_blank};

    #[test]
    fn new_fields_are_pending_until_commit()
    {
        let mut document = Document::from_fields([("title", "Hello",)],);
        assert!(document.field_changed("title"));
        assert_eq!(document.field("title"), Some("Hello"));
        assert_eq!(document.stored_field("title"), None);

        document.commit(RecordId(7,),);
        assert_eq!(document.id(), Some(RecordId(7)));
        assert!(!document.has_changes());
        assert_eq!(document.stored_field("title"), Some("Hello"));
    }

    #[test]
    fn reassigning_stored_value_is_not_a_change()
    {
        let mut document = Document::persisted(RecordId(1,), [("title", "Hello",)],);
        document.set_field("title", Some("Bye".to_owned(),),);
        assert!(document.field_changed("title"));
        document.set_field("title", Some("Hello".to_owned(),),);
        assert!(!document.field_changed("title"));
    }

    #[test]
    fn discarding_restores_stored_value()
    {
        let mut document = Document::persisted(RecordId(1,), [("slug", "hello",)],);
        document.set_field("slug", None,);
        assert_eq!(document.field("slug"), None);
        document.discard_change("slug",);
        assert_eq!(document.field("slug"), Some("hello"));
    }

    #[test]
    fn commit_removes_cleared_fields()
    {
        let mut document = Document::persisted(RecordId(1,), [("slug", "hello",)],);
        document.set_field("slug", None,);
        document.commit(RecordId(1,),);
        assert_eq!(document.stored_field("slug"), None);
    }

    #[test]
    fn scope_reads_and_matches_field_values()
    {
        let fields = vec!["category".to_owned()];
        let news = Document::from_fields([("category", "news",)],);
        let sport = Document::from_fields([("category", "sport",)],);

        let scope = Scope::of(&fields, &news,);
        assert!(scope.matches(&news));
        assert!(!scope.matches(&sport));
        assert_eq!(scope.to_string(), "category=news");
        assert!(Scope::unscoped().matches(&sport));
    }

    #[test]
    fn scope_display_covers_absent_values()
    {
        let scope = Scope::unscoped().with("category", None,).with("lang", Some("en",),);
        assert_eq!(scope.to_string(), "category=<none>, lang=en");
        assert_eq!(Scope::unscoped().to_string(), "all records");
    }

    #[test]
    fn blankness_treats_whitespace_as_empty()
    {
        assert!(is_blank(None));
        assert!(is_blank(Some(" \n")));
        assert!(!is_blank(Some("x")));
    }
}
