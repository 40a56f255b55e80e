//! Joining record locations onto the inventory's base location.
//!
//! The codec does not pick a path convention. Callers pass a [`PathJoin`];
//! any `Fn(&str, &str) -> String` works, and [`PosixJoin`] and [`UrlJoin`]
//! cover the usual cases. No normalization happens beyond what the join does.

/// Joins a base location and a relative location.
pub trait PathJoin {
    fn join(&self, base: &str, relative: &str) -> String;
}

impl<F> PathJoin for F
where
    F: Fn(&str, &str) -> String,
{
    fn join(&self, base: &str, relative: &str) -> String {
        self(base, relative)
    }
}

/// POSIX path joining: an absolute right-hand side replaces the base,
/// otherwise the parts are separated by exactly one inserted `/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PosixJoin;

impl PathJoin for PosixJoin {
    fn join(&self, base: &str, relative: &str) -> String {
        if relative.starts_with('/') || base.is_empty() {
            relative.to_string()
        } else if base.ends_with('/') {
            format!("{base}{relative}")
        } else {
            format!("{base}/{relative}")
        }
    }
}

/// Like [`PosixJoin`], but a right-hand side that is already a full URL
/// (`scheme://...`) is also left untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct UrlJoin;

impl PathJoin for UrlJoin {
    fn join(&self, base: &str, relative: &str) -> String {
        if has_scheme(relative) {
            relative.to_string()
        } else {
            PosixJoin.join(base, relative)
        }
    }
}

fn has_scheme(uri: &str) -> bool {
    match uri.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Resolves raw record uris against one base location.
pub struct Resolver<'a, J> {
    base: &'a str,
    join: J,
}

impl<'a, J: PathJoin> Resolver<'a, J> {
    pub fn new(base: &'a str, join: J) -> Self {
        Self { base, join }
    }

    /// The base location.
    pub fn base(&self) -> &str {
        self.base
    }

    /// Final uri for a raw, placeholder-expanded record location.
    pub fn resolve(&self, raw_uri: &str) -> String {
        self.join.join(self.base, raw_uri)
    }
}
