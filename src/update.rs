// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Decides whether a record's slug must be recomputed on save.

use crate::{
    config::SlugConfig,
    normalize::{SEPARATOR, base_slug},
    record::Record,
    save::slug,
};

/// Returns `true` when the slug of `record` must be rebuilt during this save.
///
/// A blank slug always needs building. In word mode a slug is also rebuilt
/// when the source field changed and its new base slug no longer matches the
/// slug's own base (the slug with any `-<digits>` suffix removed). Hash-mode
/// slugs are never rebuilt once set.
pub fn needs_update<R,>(config: &SlugConfig, record: &R,) -> bool
where
    R: Record + ?Sized,
{
    let Some(current,) = slug(config, record,).filter(|value| !value.trim().is_empty(),) else {
        return true;
    };

    if config.hash_mode() || !record.field_changed(config.source_field(),) {
        return false;
    }

    match base_slug(record.field(config.source_field(),),) {
        Some(base,) => base != current && base != strip_numeric_suffix(current,),
        None => true,
    }
}

/// Removes a trailing `-<digits>` suffix, if present.
pub fn strip_numeric_suffix(slug: &str,) -> &str
{
    match slug.rsplit_once(SEPARATOR,) {
        Some((head, digits,),)
            if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit(),) =>
        {
            head
        }
        _ => slug,
    }
}
