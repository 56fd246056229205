use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;

/// Characters escaped when an identifier is placed in a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const ESSAY_PREFIX: &str = "/essay/";

/// A path in the reader's URL scheme.
///
/// `/` is the essay list and `/essay/<identifier>` is a single essay. The
/// path is always stored with a leading slash and without query or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
}

/// What a location points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Essay(String),
    Unknown(String),
}

impl Location {
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
        }
    }

    pub fn essay(identifier: &str) -> Self {
        Self {
            path: format!("{}{}", ESSAY_PREFIX, utf8_percent_encode(identifier, SEGMENT)),
        }
    }

    /// Accepts a bare path (`/essay/a.md`), a relative path (`essay/a.md`) or
    /// an absolute http(s) URL, whose path is used.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let raw = match url::Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url.path().to_string(),
            _ => input
                .split(|c: char| c == '?' || c == '#')
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        if raw.is_empty() {
            Self::root()
        } else if raw.starts_with('/') {
            Self { path: raw }
        } else {
            Self {
                path: format!("/{}", raw),
            }
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route(&self) -> Route {
        if self.path == "/" {
            return Route::Root;
        }
        match self.path.strip_prefix(ESSAY_PREFIX) {
            Some(rest) if !rest.is_empty() => {
                Route::Essay(percent_decode_str(rest).decode_utf8_lossy().into_owned())
            }
            _ => Route::Unknown(self.path.clone()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
