// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Retrying saves that lose a slug race.
//!
//! Suffix assignment reads siblings before the store commits, so two
//! concurrent saves can compute the same slug. The store rejects the second
//! commit with [`Error::SlugTaken`]; [`save_with_retry`] then drops the built
//! slug, recomputes it against the now visible sibling and commits again,
//! with exponential backoff between attempts.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::SlugConfig,
    error::Error,
    record::{Record, RecordId},
    save::{explicitly_assigned, save_record},
    store::CommitStore,
};

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone,)]
pub struct RetryConfig
{
    /// Maximum number of attempts (default: 3).
    pub max_attempts:     u32,
    /// Initial delay between attempts in milliseconds (default: 1000).
    pub initial_delay_ms: u64,
    /// Multiplier for exponential backoff (default: 2.0).
    pub backoff_factor:   f64,
}

impl Default for RetryConfig
{
    fn default() -> Self
    {
        Self {
            max_attempts: 3, initial_delay_ms: 1000, backoff_factor: 2.0,
        }
    }
}

/// Runs `attempt` until it succeeds, fails with an error other than
/// [`Error::SlugTaken`], or `config.max_attempts` is reached.
///
/// The closure receives the 1-based attempt number.
///
/// # Errors
///
/// Returns the first non-retryable error, or the last uniqueness violation
/// once attempts are exhausted.
pub async fn retry_with_backoff<F, T,>(
    config: &RetryConfig,
    operation_name: &str,
    mut attempt: F,
) -> Result<T, Error,>
where
    F: FnMut(u32,) -> Result<T, Error,>,
{
    let mut current = 1;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match attempt(current,) {
            Ok(result,) => {
                if current > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, current);
                }
                return Ok(result,);
            }
            Err(error,) if !error.is_slug_taken() => return Err(error,),
            Err(error,) => {
                if current >= config.max_attempts {
                    warn!(
                        "{} failed after {} attempts: {}",
                        operation_name, config.max_attempts, error
                    );
                    return Err(error,);
                }

                warn!(
                    "{} failed on attempt {}/{}: {}. Retrying in {}ms...",
                    operation_name, current, config.max_attempts, error, delay_ms
                );

                sleep(Duration::from_millis(delay_ms,),).await;
                delay_ms = (delay_ms as f64 * config.backoff_factor) as u64;
                current += 1;
            }
        }
    }
}

/// Saves `record`, recomputing its slug and retrying when the store reports
/// that the slug was taken concurrently.
///
/// An explicitly assigned slug is never recomputed, so a conflict on it is
/// returned after the first attempt.
///
/// # Errors
///
/// Propagates store failures and the final [`Error::SlugTaken`].
pub async fn save_with_retry<R, S,>(
    config: &SlugConfig,
    record: &mut R,
    store: &mut S,
    retry: &RetryConfig,
) -> Result<RecordId, Error,>
where
    R: Record,
    S: CommitStore<Record = R,>,
{
    if explicitly_assigned(config, record,) {
        return save_record(config, record, store,);
    }

    let operation = format!("save {}", config.record_type());
    retry_with_backoff(retry, &operation, |attempt| {
        if attempt > 1 {
            record.discard_change(config.slug_field(),);
        }
        save_record(config, record, store,)
    },)
    .await
}
