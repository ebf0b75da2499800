use std::collections::HashMap;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::error::{Error, Result};
use crate::wallpaper::Purity;

/// Grammar table for the search/collection query parameters, as documented
/// at <https://wallhaven.cc/help/api#search>. Compiled once on first use.
static GRAMMARS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    [
        ("categories", r"^[01]{3}$"),
        ("purity", r"^[01]{3}$"),
        (
            "sorting",
            r"^(?:date_added|relevance|random|views|favorites|toplist)$",
        ),
        ("order", r"^(?:desc|asc)$"),
        ("topRange", r"^(?:1d|3d|1w|1M|3M|6M|1y)$"),
        ("atleast", r"^[1-9][0-9]*x[1-9][0-9]*$"),
        (
            "resolutions",
            r"^[1-9][0-9]*x[1-9][0-9]*(?:,[1-9][0-9]*x[1-9][0-9]*)*$",
        ),
        (
            "ratios",
            r"^[1-9][0-9]*x[1-9][0-9]*(?:,[1-9][0-9]*x[1-9][0-9]*)*$",
        ),
        ("colors", r"^[0-9A-F]{6}$"),
        ("page", r"^[1-9][0-9]*$"),
        ("seed", r"^[a-zA-Z0-9]{6}$"),
    ]
    .into_iter()
    .map(|(key, grammar)| (key, Regex::new(grammar).expect("hard-coded grammar")))
    .collect()
});

static Q_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^id:\d+$").expect("hard-coded grammar"));
static Q_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^like:[a-zA-Z0-9]{6}$").expect("hard-coded grammar"));

/// Checks that `value` satisfies the grammar of the search parameter `key`,
/// failing fast on client-side mistakes instead of wasting a round trip.
///
/// Returns the pair unchanged on success.
///
/// ```
/// # use wallhaven::query::validate_parameter;
/// assert!(validate_parameter("purity", "111").is_ok());
/// assert!(validate_parameter("purity", "1111").is_err());
/// assert!(validate_parameter("flavour", "sweet").is_err());
/// ```
pub fn validate_parameter<'a>(key: &'a str, value: &'a str) -> Result<(&'a str, &'a str)> {
    let accepted = match key {
        // `id:`/`like:` filters must be the whole term; anything else goes,
        // as long as it doesn't embed one of them.
        "q" => {
            Q_ID.is_match(value)
                || Q_LIKE.is_match(value)
                || (!value.contains("id:") && !value.contains("like:"))
        }
        _ => GRAMMARS
            .get(key)
            .ok_or_else(|| Error::UnknownParameter(key.to_string()))?
            .is_match(value),
    };

    if accepted {
        Ok((key, value))
    } else {
        Err(Error::InvalidParameter {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// An insertion-ordered set of query parameters for the search and
/// collection endpoints.
///
/// Values are coerced to their string form when set and validated against
/// the parameter grammar when the query string is built.
///
/// ```
/// # use wallhaven::query::Params;
/// let params = Params::new().set("purity", "110").set("page", 4);
/// assert_eq!(params.to_query_string().unwrap(), "?purity=110&page=4");
/// assert_eq!(Params::new().to_query_string().unwrap(), "");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value for the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Whether a value is set for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Build the `?k1=v1&k2=v2` query string, or the empty string if no
    /// parameter is set. Every pair is validated via [`validate_parameter`].
    pub fn to_query_string(&self) -> Result<String> {
        if self.entries.is_empty() {
            return Ok(String::new());
        }

        for (key, value) in &self.entries {
            validate_parameter(key, value)?;
        }

        Ok(format!(
            "?{}",
            self.entries
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .join("&")
        ))
    }
}

/// Extensions the `type:` filter accepts.
const IMAGE_TYPES: [&str; 3] = ["png", "jpeg", "jpg"];

/// Builder for the free-text `q` search term.
///
/// The grammar of `q` is too permissive to validate directly; this builder
/// assembles a well-formed term from its parts instead. `id:` and `like:`
/// filters aren't supported here, they must be used on their own as the
/// whole term.
///
/// ```
/// # use wallhaven::query::{Params, Query};
/// # fn main() -> wallhaven::error::Result<()> {
/// let q = Query::new()
///     .tag("landscape")
///     .exclude_tag("city")
///     .uploader("someuser")
///     .file_type("png")
///     .build()?;
/// let params = Params::new().set("q", q).set("purity", "100");
/// # Ok(()) }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query {
    include: Vec<String>,
    exclude: Vec<String>,
    uploader: Option<String>,
    file_type: Option<String>,
}

impl Query {
    /// Create a new instance of `Query` with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `tag` in the results.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.include.push(tag.into());
        self
    }

    /// Require every tag of `tags` in the results.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Exclude results carrying `tag`.
    pub fn exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.exclude.push(tag.into());
        self
    }

    /// Exclude results carrying any tag of `tags`.
    pub fn exclude_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Limit results to wallpapers uploaded by `username`.
    pub fn uploader(mut self, username: impl Into<String>) -> Self {
        self.uploader = Some(username.into());
        self
    }

    /// Limit results to one image type, one of `png`, `jpeg` or `jpg`.
    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    /// Assemble the value for the `q` parameter.
    ///
    /// Tags are percent-encoded individually (spaces inside a tag become
    /// `+`) and joined by encoded ` +`/` -` markers; the uploader and image
    /// type are appended as literal ` @username` and ` type:<t>` segments.
    pub fn build(&self) -> Result<String> {
        let mut q = String::new();

        for tag in &self.include {
            q.push_str(&urlencoding::encode(" +"));
            q.push_str(&encode_tag(tag));
        }

        for tag in &self.exclude {
            q.push_str(&urlencoding::encode(" -"));
            q.push_str(&encode_tag(tag));
        }

        if let Some(username) = &self.uploader {
            q.push_str(" @");
            q.push_str(username);
        }

        if let Some(file_type) = &self.file_type {
            if !IMAGE_TYPES.contains(&file_type.as_str()) {
                return Err(Error::InvalidImageType(file_type.clone()));
            }
            q.push_str(" type:");
            q.push_str(file_type);
        }

        Ok(q.trim().to_string())
    }
}

fn encode_tag(tag: &str) -> String {
    urlencoding::encode(tag).replace("%20", "+")
}

/// Folds a list of purities back into the `purity` parameter form, e.g.
/// `[Sfw, Sketchy]` into `"110"`.
///
/// The API reports purities as a list in some places (notably
/// [`UserSettings`][crate::settings::UserSettings]); this rebuilds the
/// numeric string a query wants from such a list.
pub fn purity_mask(purities: &[Purity]) -> String {
    let mut digits = ['0'; 3];
    for purity in purities {
        let slot = match purity {
            Purity::Sfw => 0,
            Purity::Sketchy => 1,
            Purity::Nsfw => 2,
        };
        digits[slot] = '1';
    }
    digits.iter().collect()
}
