//! The immutable path catalog.
//!
//! Built once per process from an injected `(id, uri)` feed, then shared
//! read-only by every worker. It holds two parallel views of the known
//! paths: a byte-keyed lookup used by the parser's hot loop, and an
//! id-indexed table of JSON-escaped paths used by the emitter.

use ahash::AHashMap;

use crate::config::PREFIX;

/// Read-only mapping between raw path bytes and dense path ids.
///
/// Only pairs whose URI starts with the fixed 19-byte prefix are kept; the
/// stored path is the remainder after the prefix. The escaped view replaces
/// every `/` with `\/`, the only escaping the emitter performs, which is
/// sound because the feed guarantees paths contain no other JSON-special
/// characters.
#[derive(Debug, Default)]
pub struct PathCatalog {
    escaped_by_id: Vec<String>,
    id_by_path: AHashMap<Box<[u8]>, u32>,
}

impl PathCatalog {
    /// Builds the catalog from `(id, uri)` pairs.
    ///
    /// Pairs with an empty URI or one that does not start with the prefix
    /// are dropped. Ids are expected to be dense; the id-indexed table grows
    /// to the largest accepted id, and gap entries are inert (no record path
    /// ever resolves to them).
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, String)>,
    {
        let mut escaped_by_id: Vec<String> = Vec::new();
        let mut id_by_path = AHashMap::new();

        for (id, uri) in pairs {
            if uri.is_empty() || !uri.as_bytes().starts_with(PREFIX) {
                continue;
            }
            let path = &uri[PREFIX.len()..];
            let slot = id as usize;
            if slot >= escaped_by_id.len() {
                escaped_by_id.resize(slot + 1, String::new());
            }
            escaped_by_id[slot] = path.replace('/', "\\/");
            id_by_path.insert(path.as_bytes().into(), id);
        }

        Self {
            escaped_by_id,
            id_by_path,
        }
    }

    /// Looks up the id for raw path bytes (the portion after the prefix).
    #[inline]
    pub fn id_of(&self, path: &[u8]) -> Option<u32> {
        self.id_by_path.get(path).copied()
    }

    /// The JSON-escaped path for an id, if the id is in range.
    pub fn escaped(&self, id: u32) -> Option<&str> {
        self.escaped_by_id.get(id as usize).map(String::as_str)
    }

    /// Size of the id-indexed table (the `P` dimension of every matrix).
    pub fn len(&self) -> usize {
        self.escaped_by_id.len()
    }

    /// Whether the catalog holds no paths at all.
    pub fn is_empty(&self) -> bool {
        self.escaped_by_id.is_empty()
    }
}
