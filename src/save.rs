// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Slug handling around a record save.
//!
//! [`prepare_save`] is the pre-save hook point: it runs the configured
//! `before_slug` hook, decides whether the slug needs recomputing and, if so,
//! writes the new slug as a pending change. The store then checks the scoped
//! uniqueness constraint on commit.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    builder::{build_slug, build_slug_at},
    config::SlugConfig,
    error::Error,
    record::{Record, RecordId, is_blank},
    store::{CommitStore, SlugStore},
    update::needs_update,
};

/// Effective slug of `record`: the pending value when the slug changed during
/// this save cycle, the stored value otherwise.
pub fn slug<'record, R,>(config: &SlugConfig, record: &'record R,) -> Option<&'record str,>
where
    R: Record + ?Sized,
{
    record.field(config.slug_field(),)
}

/// Externally visible key of `record`, suitable for building URLs.
pub fn to_param<'record, R,>(config: &SlugConfig, record: &'record R,) -> Option<&'record str,>
where
    R: Record + ?Sized,
{
    slug(config, record,).filter(|value| !value.trim().is_empty(),)
}

/// Whether the caller assigned a non-blank slug during this save cycle.
pub fn explicitly_assigned<R,>(config: &SlugConfig, record: &R,) -> bool
where
    R: Record + ?Sized,
{
    record.field_changed(config.slug_field(),) && !is_blank(slug(config, record,),)
}

/// Assigns a slug explicitly.
///
/// A non-blank `value` is stored verbatim and wins over any slug the save
/// would compute. A blank or absent `value` keeps the current slug when there
/// is one and builds a new slug otherwise.
///
/// # Errors
///
/// Propagates failures of the sibling query when a slug has to be built.
pub fn assign_slug<R, S,>(
    config: &SlugConfig,
    record: &mut R,
    value: Option<&str,>,
    store: &S,
) -> Result<(), Error,>
where
    R: Record + ?Sized,
    S: SlugStore + ?Sized,
{
    if let Some(explicit,) = value.filter(|value| !value.trim().is_empty(),) {
        record.set_field(config.slug_field(), Some(explicit.to_owned(),),);
        return Ok((),);
    }

    let fallback = match to_param(config, record,) {
        Some(current,) => Some(current.to_owned(),),
        None => build_slug(config, record, store,)?,
    };
    record.set_field(config.slug_field(), fallback,);
    Ok((),)
}

/// Runs the pre-save slug step on `record`.
///
/// # Errors
///
/// Propagates failures of the sibling query.
pub fn prepare_save<R, S,>(config: &SlugConfig, record: &mut R, store: &S,) -> Result<(), Error,>
where
    R: Record,
    S: SlugStore + ?Sized,
{
    prepare_save_at(config, record, store, Utc::now(),)
}

/// Same as [`prepare_save`] with an explicit hash-mode timestamp.
///
/// # Errors
///
/// Propagates failures of the sibling query.
pub fn prepare_save_at<R, S,>(
    config: &SlugConfig,
    record: &mut R,
    store: &S,
    now: DateTime<Utc,>,
) -> Result<(), Error,>
where
    R: Record,
    S: SlugStore + ?Sized,
{
    if let Some(hook,) = config.before_slug() {
        hook.run(record,);
    }

    if explicitly_assigned(config, record,) {
        debug!("keeping explicitly assigned slug for {}", config.record_type());
        return Ok((),);
    }

    if !needs_update(config, record,) {
        debug!("slug of {} is up to date", config.record_type());
        return Ok((),);
    }

    // A source that normalizes to nothing leaves the current slug in place.
    if let Some(built,) = build_slug_at(config, record, store, now,)? {
        record.set_field(config.slug_field(), Some(built,),);
    }
    Ok((),)
}

/// Prepares `record` and commits it to `store`.
///
/// # Errors
///
/// Propagates sibling query failures and commit failures, including
/// [`Error::SlugTaken`](Error::SlugTaken).
pub fn save_record<R, S,>(
    config: &SlugConfig,
    record: &mut R,
    store: &mut S,
) -> Result<RecordId, Error,>
where
    R: Record,
    S: CommitStore<Record = R,> + ?Sized,
{
    prepare_save(config, record, &*store,)?;
    let id = store.commit(record,)?;
    info!("saved {} {} with slug {:?}", config.record_type(), id, slug(config, record));
    Ok(id,)
}
