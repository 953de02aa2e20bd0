//! Collision-free, human-readable slugs for stored records.
//!
//! A slug is an alternative lookup key derived from a record's source field,
//! such as a title. The library normalizes the source into a base slug,
//! disambiguates it against sibling records in the same scope with a numeric
//! suffix (or replaces it with a salted hash in hash mode), decides on each
//! save whether the slug must be recomputed, and routes lookup keys to slug
//! or identifier retrieval. Persistence stays with the host, which plugs in
//! through the [`SlugStore`] and [`CommitStore`] traits.

mod builder;
mod collision;
mod config;
mod error;
mod lookup;
mod memory;
mod normalize;
mod record;
mod retry;
mod save;
mod store;
mod update;

pub use builder::{build_slug, build_slug_at, hashed_slug, word_slug};
pub use collision::{next_suffix, order_siblings, resolve_suffix, sibling_pattern, trailing_suffix};
pub use config::{
    BeforeSlug, ConfigDocument, DEFAULT_SLUG_FIELD, DEFAULT_SOURCE_FIELD, SlugConfig,
    UNIQUENESS_MESSAGE, UniquenessConstraint, load_config, parse_config,
};
pub use error::{Error, io_error};
pub use lookup::{ControlToken, LookupKey, find, is_numeric, named, should_use_slug};
pub use memory::MemoryStore;
pub use normalize::{BaseSlug, SEPARATOR, base_slug};
pub use record::{Document, Record, RecordId, Scope, is_blank};
pub use retry::{RetryConfig, retry_with_backoff, save_with_retry};
pub use save::{
    assign_slug, explicitly_assigned, prepare_save, prepare_save_at, save_record, slug, to_param,
};
pub use store::{CommitStore, Lookup, SiblingQuery, SlugQuery, SlugStore};
pub use update::{needs_update, strip_numeric_suffix};
