// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Slug construction in word and hash mode.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    collision,
    config::SlugConfig,
    error::Error,
    normalize::{SEPARATOR, base_slug},
    record::{Record, Scope},
    store::{SiblingQuery, SlugStore},
};

/// Builds the slug `record` should carry, using the current time in hash
/// mode.
///
/// Returns `None` when the source field is absent or blank.
///
/// # Errors
///
/// Propagates failures of the sibling query.
pub fn build_slug<R, S,>(
    config: &SlugConfig,
    record: &R,
    store: &S,
) -> Result<Option<String,>, Error,>
where
    R: Record + ?Sized,
    S: SlugStore + ?Sized,
{
    build_slug_at(config, record, store, Utc::now(),)
}

/// Same as [`build_slug`] with an explicit hash-mode timestamp.
///
/// # Errors
///
/// Propagates failures of the sibling query.
pub fn build_slug_at<R, S,>(
    config: &SlugConfig,
    record: &R,
    store: &S,
    now: DateTime<Utc,>,
) -> Result<Option<String,>, Error,>
where
    R: Record + ?Sized,
    S: SlugStore + ?Sized,
{
    let Some(word,) = word_slug(config, record, store,)? else {
        return Ok(None,);
    };

    if !config.hash_mode() {
        debug!("built slug '{}' for {}", word, config.record_type());
        return Ok(Some(word,),);
    }

    let hashed = hashed_slug(now, config.salt(), &word,);
    debug!("built hashed slug for {} from '{}'", config.record_type(), word);
    Ok(Some(hashed,),)
}

/// Builds the human-readable slug: the base slug, followed by `-N` when the
/// base is already taken in the record's scope.
///
/// # Errors
///
/// Propagates failures of the sibling query.
pub fn word_slug<R, S,>(
    config: &SlugConfig,
    record: &R,
    store: &S,
) -> Result<Option<String,>, Error,>
where
    R: Record + ?Sized,
    S: SlugStore + ?Sized,
{
    let Some(base,) = base_slug(record.field(config.source_field(),),) else {
        return Ok(None,);
    };

    let scope = Scope::of(config.scope_fields(), record,);
    let query = SiblingQuery {
        slug_field: config.slug_field(),
        base_slug:  &base,
        scope:      &scope,
        exclude:    record.id(),
    };

    let slug = match collision::resolve_suffix(store, &query,)? {
        Some(suffix,) => format!("{base}{SEPARATOR}{suffix}"),
        None => base,
    };
    Ok(Some(slug,),)
}

/// Lowercase hex SHA-256 of the RFC 3339 timestamp (nanosecond precision),
/// the salt and the word slug, in that order.
pub fn hashed_slug(timestamp: DateTime<Utc,>, salt: &str, word_slug: &str,) -> String
{
    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true,).as_bytes(),);
    hasher.update(salt.as_bytes(),);
    hasher.update(word_slug.as_bytes(),);
    hex::encode(hasher.finalize(),)
}

#[cfg(test)]
mod tests
{
    use chrono::{TimeZone, Utc};

    use super::{build_slug, build_slug_at, hashed_slug, word_slug};
    use crate::{
        config::SlugConfig,
        memory::MemoryStore,
        record::{Document, Record, RecordId},
    };

    fn post_config() -> SlugConfig
    {
        SlugConfig::new("post",).with_source_field("title",).with_slug_field("slug",)
    }

    fn store_with(config: &SlugConfig, slugs: &[&str],) -> MemoryStore
    {
        let mut store = MemoryStore::new(config,);
        for (index, slug,) in slugs.iter().enumerate() {
            store.insert(Document::persisted(
                RecordId(index as u64 + 1,),
                [("title", "Foo",), ("slug", *slug,)],
            ),);
        }
        store
    }

    #[test]
    fn blank_source_builds_nothing()
    {
        let config = post_config();
        let store = MemoryStore::new(&config,);
        let record = Document::from_fields([("title", "  ",)],);
        assert_eq!(build_slug(&config, &record, &store,).expect("query succeeds",), None);
        assert_eq!(build_slug(&config, &Document::new(), &store,).expect("query succeeds",), None);
    }

    #[test]
    fn free_base_is_used_as_is()
    {
        let config = post_config();
        let store = MemoryStore::new(&config,);
        let record = Document::from_fields([("title", "Bar",)],);
        let slug = build_slug(&config, &record, &store,).expect("query succeeds",);
        assert_eq!(slug.as_deref(), Some("bar"));
    }

    #[test]
    fn taken_base_gets_next_suffix()
    {
        let config = post_config();
        let store = store_with(&config, &["foo", "foo-1", "foo-2"],);
        let record = Document::from_fields([("title", "Foo",)],);
        let slug = word_slug(&config, &record, &store,).expect("query succeeds",);
        assert_eq!(slug.as_deref(), Some("foo-3"));
    }

    #[test]
    fn record_does_not_collide_with_itself()
    {
        let config = post_config();
        let store = store_with(&config, &["foo"],);
        let mut record =
            Document::persisted(RecordId(1,), [("title", "Old",), ("slug", "foo",)],);
        record.set_field("title", Some("Foo".to_owned(),),);
        let slug = word_slug(&config, &record, &store,).expect("query succeeds",);
        assert_eq!(slug.as_deref(), Some("foo"));
    }

    #[test]
    fn hash_mode_hashes_timestamp_salt_and_word_slug()
    {
        let config = post_config().with_hash_mode(Some("pepper",),);
        let store = MemoryStore::new(&config,);
        let record = Document::from_fields([("title", "Foo",)],);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0,).single().expect("valid instant",);

        let slug = build_slug_at(&config, &record, &store, now,)
            .expect("query succeeds",)
            .expect("slug built",);
        assert_eq!(slug, hashed_slug(now, "pepper", "foo",));
        assert_eq!(slug.len(), 64);
        assert!(slug.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
    }

    #[test]
    fn hashed_slug_varies_with_every_input()
    {
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0,).single().expect("valid instant",);
        let later = first + chrono::Duration::nanoseconds(1,);
        let base = hashed_slug(first, "post", "foo",);
        assert_eq!(base, hashed_slug(first, "post", "foo"));
        assert_ne!(base, hashed_slug(later, "post", "foo"));
        assert_ne!(base, hashed_slug(first, "page", "foo"));
        assert_ne!(base, hashed_slug(first, "post", "foo-1"));
    }
}
