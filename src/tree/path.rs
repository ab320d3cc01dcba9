//! Stable, textual addresses of nodes inside a tree.
//!
//! A [`NodePath`] is the link representation used by reference properties:
//! rather than pointing at a node, a reference stores the route to it from a
//! root and resolves that route at the point of use.
//!
//! Text form: keys separated by `.`, list indices in brackets, e.g.
//! `types[2].fields.name`. The empty string is the root itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Key;
use crate::{Error, Result};

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Entry of a composite.
    Key(Key),
    /// Element of a list.
    Index(usize),
}

/// A route from a root node to a descendant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath {
    segments: SmallVec<[Segment; 4]>,
}

impl NodePath {
    /// The empty path; resolves to the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend with a composite key.
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Extend with a list index.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path without its last segment; `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        let (_, init) = self.segments.split_last()?;
        Some(Self { segments: init.iter().cloned().collect() })
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        let mut path = NodePath::root();
        let mut rest = s;
        let mut first = true;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let index = after[..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("list index is not a non-negative integer"))?;
                path.segments.push(Segment::Index(index));
                rest = &after[close + 1..];
            } else {
                let body = if first {
                    rest
                } else {
                    rest.strip_prefix('.').ok_or_else(|| invalid("expected '.' or '['"))?
                };
                let end = body.find(['.', '[']).unwrap_or(body.len());
                if end == 0 {
                    return Err(invalid("empty key"));
                }
                path.segments.push(Segment::Key(Key::from(body[..end].to_string())));
                rest = &body[end..];
            }
            first = false;
        }

        Ok(path)
    }
}
