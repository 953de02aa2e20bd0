// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Normalization of human-authored text into base slugs.
//!
//! Base slugs contain only lowercase ASCII letters, digits and colons,
//! separated by single hyphens, with no leading or trailing hyphen. They are
//! the input of collision resolution and never carry a disambiguating suffix.

/// Separator inserted in place of every disallowed character.
pub const SEPARATOR: char = '-';

/// Builder for base slugs derived from a record's source field.
#[derive(Debug, Clone, Copy,)]
pub struct BaseSlug<'input,>
{
    source: &'input str,
}

impl<'input,> BaseSlug<'input,>
{
    /// Creates a new base slug builder for the provided string slice.
    ///
    /// The builder retains a borrowed view of the source to avoid allocations
    /// until [`build`](Self::build) is invoked.
    pub fn builder(source: &'input str,) -> Self
    {
        Self {
            source,
        }
    }

    /// Builds the base slug.
    ///
    /// The source is trimmed and lowercased, `<...>` tags are removed, a small
    /// table of accented vowels is transliterated, every remaining character
    /// outside `[a-z0-9:]` becomes a single separator, and separators are
    /// stripped from both ends. Returns `None` when nothing slug-worthy
    /// remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use named_slug::BaseSlug;
    ///
    /// let slug = BaseSlug::builder(" <b>Café</b> Réunion: 2024! ",).build();
    /// assert_eq!(slug.as_deref(), Some("cafe-reunion:-2024"));
    /// ```
    pub fn build(self,) -> Option<String,>
    {
        let trimmed = self.source.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lowered = trimmed.to_lowercase();
        let untagged = strip_tags(&lowered,);

        let mut slug = String::with_capacity(untagged.len(),);
        let mut previous_separator = false;

        for candidate in untagged.chars().map(transliterate,) {
            match candidate {
                'a'..='z' | '0'..='9' | ':' => {
                    slug.push(candidate,);
                    previous_separator = false;
                }
                _ => {
                    if !previous_separator && !slug.is_empty() {
                        slug.push(SEPARATOR,);
                        previous_separator = true;
                    }
                }
            }
        }

        while slug.ends_with(SEPARATOR,) {
            slug.pop();
        }

        if slug.is_empty() { None } else { Some(slug,) }
    }
}

/// Derives the base slug of an optional source field.
///
/// Absent and blank sources yield `None`.
pub fn base_slug(source: Option<&str,>,) -> Option<String,>
{
    source.and_then(|text| BaseSlug::builder(text,).build(),)
}

/// Removes every `<...>` span. A `<` with no closing `>` is kept as text.
fn strip_tags(input: &str,) -> String
{
    let mut output = String::with_capacity(input.len(),);
    let mut rest = input;

    while let Some(open,) = rest.find('<',) {
        let Some(close,) = rest[open..].find('>',) else {
            break;
        };
        output.push_str(&rest[..open],);
        rest = &rest[open + close + 1..];
    }

    output.push_str(rest,);
    output
}

fn transliterate(candidate: char,) -> char
{
    match candidate {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        other => other,
    }
}
