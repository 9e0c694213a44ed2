//! Insertion ordered collections hashed with `FxHasher`. Emitted output follows their iteration
//! order, so anything rendered from them is deterministic.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;
