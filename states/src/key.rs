//! Query keys.
//!
//! A key names one logical query, e.g. `users` or `user/3`. Segments are interned
//! with `Ustr` since the same handful of keys is hashed on every cache access.

use std::fmt::{Display, Formatter};

use ustr::Ustr;

/// Identifies a cached query. Two keys are equal iff all segments are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    segments: Vec<Ustr>,
}

impl QueryKey {
    /// Create a key with a single segment.
    pub fn new(root: &str) -> Self {
        Self {
            segments: vec![Ustr::from(root)],
        }
    }

    /// Append a parameter segment, e.g. `QueryKey::new("user").with(3)`.
    #[must_use]
    pub fn with(mut self, segment: impl Display) -> Self {
        self.segments.push(Ustr::from(&segment.to_string()));
        self
    }

    pub fn segments(&self) -> &[Ustr] {
        &self.segments
    }

    /// The first segment, used to group related keys.
    pub fn root(&self) -> Ustr {
        self.segments[0]
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut iter = self.segments.iter();
        if let Some(first) = iter.next() {
            f.write_str(first.as_str())?;
        }
        for segment in iter {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
