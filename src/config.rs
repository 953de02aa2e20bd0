// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Per record type slug configuration.
//!
//! A [`SlugConfig`] names the source, slug and scope fields of one record
//! type and selects word or hash mode. It is built once, either in code via
//! [`SlugConfig::new`] and the `with_*` methods or from a YAML document via
//! [`load_config`], and is passed explicitly to every slug operation.

use std::{collections::HashSet, fmt, fs, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    record::Record,
};

/// Source field used when none is configured.
pub const DEFAULT_SOURCE_FIELD: &str = "name";
/// Slug field used when none is configured.
pub const DEFAULT_SLUG_FIELD: &str = "url_slug";
/// Message attached to uniqueness violations on the slug field.
pub const UNIQUENESS_MESSAGE: &str = "is already taken";

/// Side-effecting step run on a record right before its slug is computed.
#[derive(Clone,)]
pub struct BeforeSlug(Arc<dyn Fn(&mut dyn Record,) + Send + Sync,>,);

impl BeforeSlug
{
    pub fn new<F,>(hook: F,) -> Self
    where
        F: Fn(&mut dyn Record,) + Send + Sync + 'static,
    {
        Self(Arc::new(hook,),)
    }

    pub(crate) fn run(&self, record: &mut dyn Record,)
    {
        (self.0)(record,);
    }
}

impl fmt::Debug for BeforeSlug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str("BeforeSlug(..)",)
    }
}

/// Slug settings of a single record type.
///
/// # Examples
///
/// ```
/// use named_slug::SlugConfig;
///
/// let config = SlugConfig::new("post",)
///     .with_source_field("title",)
///     .with_slug_field("slug",)
///     .with_scope(["category",],);
/// assert_eq!(config.salt(), "post");
/// assert_eq!(config.scope_fields(), ["category"]);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct SlugConfig
{
    #[serde(alias = "type")]
    record_type: String,

    #[serde(default = "default_source_field", alias = "source_column")]
    source_field: String,

    #[serde(default = "default_slug_field", alias = "slug_column")]
    slug_field: String,

    #[serde(default, alias = "slug_scope")]
    scope: Vec<String,>,

    #[serde(default, alias = "hashed")]
    hash_mode: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<String,>,

    #[serde(skip)]
    before_slug: Option<BeforeSlug,>,
}

fn default_source_field() -> String
{
    DEFAULT_SOURCE_FIELD.to_owned()
}

fn default_slug_field() -> String
{
    DEFAULT_SLUG_FIELD.to_owned()
}

impl SlugConfig
{
    /// Creates a word-mode configuration with default field names.
    pub fn new(record_type: impl Into<String,>,) -> Self
    {
        Self {
            record_type:  record_type.into(),
            source_field: default_source_field(),
            slug_field:   default_slug_field(),
            scope:        Vec::new(),
            hash_mode:    false,
            salt:         None,
            before_slug:  None,
        }
    }

    pub fn with_source_field(mut self, field: impl Into<String,>,) -> Self
    {
        self.source_field = field.into();
        self
    }

    pub fn with_slug_field(mut self, field: impl Into<String,>,) -> Self
    {
        self.slug_field = field.into();
        self
    }

    pub fn with_scope<I, S,>(mut self, fields: I,) -> Self
    where
        I: IntoIterator<Item = S,>,
        S: Into<String,>,
    {
        self.scope = fields.into_iter().map(Into::into,).collect();
        self
    }

    /// Switches to hash mode, optionally overriding the salt.
    pub fn with_hash_mode(mut self, salt: Option<&str,>,) -> Self
    {
        self.hash_mode = true;
        self.salt = salt.map(str::to_owned,);
        self
    }

    pub fn with_before_slug(mut self, hook: BeforeSlug,) -> Self
    {
        self.before_slug = Some(hook,);
        self
    }

    pub fn record_type(&self,) -> &str
    {
        &self.record_type
    }

    pub fn source_field(&self,) -> &str
    {
        &self.source_field
    }

    pub fn slug_field(&self,) -> &str
    {
        &self.slug_field
    }

    pub fn scope_fields(&self,) -> &[String]
    {
        &self.scope
    }

    pub fn hash_mode(&self,) -> bool
    {
        self.hash_mode
    }

    /// Salt mixed into hash-mode slugs. Defaults to the record type name.
    pub fn salt(&self,) -> &str
    {
        self.salt.as_deref().unwrap_or(&self.record_type,)
    }

    pub fn before_slug(&self,) -> Option<&BeforeSlug,>
    {
        self.before_slug.as_ref()
    }

    /// Declares the constraint a store must enforce: the slug is unique among
    /// records sharing the same scope value.
    pub fn uniqueness_constraint(&self,) -> UniquenessConstraint
    {
        UniquenessConstraint {
            slug_field: self.slug_field.clone(),
            scope:      self.scope.clone(),
            message:    UNIQUENESS_MESSAGE,
        }
    }

    /// Checks field names for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) when a field name is
    /// blank or contains whitespace, when the source and slug fields coincide,
    /// or when the slug field is listed in the scope.
    pub fn validate(&self,) -> Result<(), Error,>
    {
        validate_field_name(&self.record_type, "record_type",)?;
        validate_field_name(&self.source_field, "source_field",)?;
        validate_field_name(&self.slug_field, "slug_field",)?;
        for field in &self.scope {
            validate_field_name(field, "scope",)?;
        }

        if self.source_field == self.slug_field {
            return Err(Error::validation(format!(
                "{}: source_field and slug_field must differ",
                self.record_type
            ),),);
        }
        if self.scope.contains(&self.slug_field,) {
            return Err(Error::validation(format!(
                "{}: scope cannot contain the slug field '{}'",
                self.record_type, self.slug_field
            ),),);
        }
        if self.salt.as_deref().is_some_and(|salt| salt.trim().is_empty(),) {
            return Err(Error::validation(format!("{}: salt cannot be blank", self.record_type),),);
        }

        Ok((),)
    }
}

/// Scoped uniqueness constraint a store enforces on the slug field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct UniquenessConstraint
{
    /// Field that must be unique.
    pub slug_field: String,
    /// Fields whose values partition the uniqueness check.
    pub scope:      Vec<String,>,
    /// Message reported on violation.
    pub message:    &'static str,
}

/// Root document listing the slug configuration of every record type.
#[derive(Debug, Deserialize, Serialize,)]
pub struct ConfigDocument
{
    #[serde(default)]
    pub types: Vec<SlugConfig,>,
}

impl ConfigDocument
{
    /// Looks up the configuration of a record type by name.
    pub fn get(&self, record_type: &str,) -> Option<&SlugConfig,>
    {
        self.types.iter().find(|config| config.record_type == record_type,)
    }
}

/// Loads slug configuration from the provided YAML file path.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or a record type fails validation.
pub fn load_config(path: &Path,) -> Result<ConfigDocument, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses slug configuration from a YAML document string.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded
/// and [`Error::Validation`](Error::Validation) when the document is empty,
/// lists a record type twice, or a record type is inconsistent.
pub fn parse_config(contents: &str,) -> Result<ConfigDocument, Error,>
{
    let document: ConfigDocument = serde_yaml::from_str(contents,)?;
    if document.types.is_empty() {
        return Err(Error::validation("configuration must include at least one record type",),);
    }

    let mut seen = HashSet::with_capacity(document.types.len(),);
    for config in &document.types {
        config.validate()?;
        if !seen.insert(config.record_type.as_str(),) {
            return Err(Error::validation(format!(
                "duplicate record_type '{}'",
                config.record_type
            ),),);
        }
    }

    Ok(document,)
}

fn validate_field_name(input: &str, field: &str,) -> Result<(), Error,>
{
    if input.trim().is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty"),),);
    }
    if input.chars().any(char::is_whitespace,) {
        return Err(Error::validation(format!("{field} cannot contain whitespace"),),);
    }
    Ok((),)
}

#[cfg(test)]
mod tests
{
    use std::io::Write;

    use super::{BeforeSlug, Error, SlugConfig, UNIQUENESS_MESSAGE, load_config, parse_config};

    #[test]
    fn defaults_follow_conventional_field_names()
    {
        let config = SlugConfig::new("article",);
        assert_eq!(config.source_field(), "name");
        assert_eq!(config.slug_field(), "url_slug");
        assert!(config.scope_fields().is_empty());
        assert!(!config.hash_mode());
        assert_eq!(config.salt(), "article");
        assert!(config.before_slug().is_none());
    }

    #[test]
    fn hash_mode_salt_override()
    {
        let config = SlugConfig::new("article",).with_hash_mode(Some("pepper",),);
        assert!(config.hash_mode());
        assert_eq!(config.salt(), "pepper");
    }

    #[test]
    fn uniqueness_constraint_mirrors_slug_and_scope()
    {
        let constraint = SlugConfig::new("post",)
            .with_slug_field("slug",)
            .with_scope(["category", "lang",],)
            .uniqueness_constraint();
        assert_eq!(constraint.slug_field, "slug");
        assert_eq!(constraint.scope, ["category", "lang"]);
        assert_eq!(constraint.message, UNIQUENESS_MESSAGE);
    }

    #[test]
    fn parses_document_with_defaults_and_aliases()
    {
        let yaml = r"
            types:
              - record_type: post
                source_field: title
                slug_field: slug
                scope: [category]
              - type: tag
                hashed: true
                salt: tags
        ";

        let document = parse_config(yaml,).expect("expected parse success",);
        let post = document.get("post",).expect("post configured",);
        assert_eq!(post.source_field(), "title");
        assert_eq!(post.scope_fields(), ["category"]);
        let tag = document.get("tag",).expect("tag configured",);
        assert_eq!(tag.slug_field(), "url_slug");
        assert!(tag.hash_mode());
        assert_eq!(tag.salt(), "tags");
        assert!(document.get("missing").is_none());
    }

    #[test]
    fn rejects_empty_document()
    {
        assert!(parse_config("types: []").is_err());
    }

    #[test]
    fn rejects_duplicate_record_types()
    {
        let yaml = "types:\n  - record_type: post\n  - record_type: post\n";
        let error = parse_config(yaml,).expect_err("expected duplicate failure",);
        match error {
            Error::Validation {
                message,
            } => assert_eq!(message, "duplicate record_type 'post'"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_fields()
    {
        let yaml = "types:\n  - record_type: post\n    colour: red\n";
        assert!(matches!(parse_config(yaml), Err(Error::Parse { .. })));
    }

    #[test]
    fn validate_rejects_inconsistent_fields()
    {
        let same = SlugConfig::new("post",).with_source_field("slug",).with_slug_field("slug",);
        assert!(same.validate().is_err());

        let scoped = SlugConfig::new("post",).with_scope(["url_slug",],);
        assert!(scoped.validate().is_err());

        let spaced = SlugConfig::new("post",).with_source_field("the title",);
        match spaced.validate().expect_err("expected whitespace failure",) {
            Error::Validation {
                message,
            } => assert_eq!(message, "source_field cannot contain whitespace"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let salted = SlugConfig::new("post",).with_hash_mode(Some("  ",),);
        assert!(salted.validate().is_err());
    }

    #[test]
    fn before_slug_hook_is_kept_and_debug_printable()
    {
        let config =
            SlugConfig::new("post",).with_before_slug(BeforeSlug::new(|_record| {},),);
        assert!(config.before_slug().is_some());
        assert!(format!("{config:?}").contains("BeforeSlug(..)"));
    }

    #[test]
    fn load_config_reads_from_disk()
    {
        let mut file = tempfile::NamedTempFile::new().expect("expected temp file",);
        write!(file, "types:\n  - record_type: post\n    source_field: title\n")
            .expect("expected write to succeed",);

        let document = load_config(file.path(),).expect("expected load to succeed",);
        assert_eq!(document.types.len(), 1);
        assert_eq!(document.types[0].source_field(), "title");
    }

    #[test]
    fn load_config_reports_io_errors()
    {
        let path = std::path::Path::new("/nonexistent/slugs.yaml",);
        let error = load_config(path,).expect_err("expected io error",);
        assert!(matches!(error, Error::Io { .. }));
    }
}
