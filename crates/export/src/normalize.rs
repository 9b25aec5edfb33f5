//! Identifier normalization shared by the Puppet and Chef builders.
//!
//! Asset and type names are free text. Puppet class/environment names and
//! Chef environment/role names need `[a-z0-9_]`; Chef data bag item ids
//! additionally allow `-`.

use regex::Regex;
use std::sync::LazyLock;

static NON_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").unwrap());

/// Normalize a name into a Puppet/Chef identifier.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_` and trims `_` from both ends. May return an empty string.
#[must_use]
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_IDENTIFIER
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Normalize a name into a Chef data bag item id.
///
/// Like [`normalize`], but keeps `_` and `-`, joins runs with `-` and trims
/// `-` from both ends.
#[must_use]
pub fn data_bag_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
