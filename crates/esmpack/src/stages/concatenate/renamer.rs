use std::collections::hash_map::Entry;

use esmpack_utils::{
  concat_string,
  rstr::{Rstr, ToRstr},
};
use oxc::syntax::keyword::{GLOBAL_OBJECTS, RESERVED_KEYWORDS};
use rustc_hash::FxHashMap;

/// Hands out top-level names that are unique across every member of a concatenated module.
#[derive(Debug)]
pub struct Renamer {
  /// Base name -> last suffix handed out for it. `a` -> 0 means `a` is taken and `a$1` is next.
  used_canonical_names: FxHashMap<Rstr, u32>,
}

impl Renamer {
  pub fn new() -> Self {
    let used_canonical_names = ["exports", "Object", "Promise"]
      .iter()
      .chain(RESERVED_KEYWORDS.iter())
      .chain(GLOBAL_OBJECTS.iter())
      .map(|s| (Rstr::new(s), 0))
      .collect();
    Self { used_canonical_names }
  }

  /// Takes `name` as written, even if it's reserved. For bindings whose declarations are emitted
  /// without being rewritten.
  pub fn claim(&mut self, name: &str) -> Rstr {
    let name = name.to_rstr();
    self.used_canonical_names.entry(name.clone()).or_insert(0);
    name
  }

  /// `hint` itself if it's free, otherwise the first free `hint$<n>`.
  pub fn create_conflictless_name(&mut self, hint: &str) -> Rstr {
    let mut conflictless_name = hint.to_rstr();
    loop {
      match self.used_canonical_names.entry(conflictless_name.clone()) {
        Entry::Occupied(mut occ) => {
          let next_conflict_index = *occ.get() + 1;
          *occ.get_mut() = next_conflict_index;
          conflictless_name =
            concat_string!(hint, "$", itoa::Buffer::new().format(next_conflict_index)).into();
        }
        Entry::Vacant(vac) => {
          vac.insert(0);
          return conflictless_name;
        }
      }
    }
  }
}

#[test]
fn test_create_conflictless_name() {
  let mut renamer = Renamer::new();
  assert_eq!(renamer.create_conflictless_name("value"), "value");
  assert_eq!(renamer.create_conflictless_name("value"), "value$1");
  assert_eq!(renamer.create_conflictless_name("value"), "value$2");
  assert_eq!(renamer.create_conflictless_name("value$1"), "value$1$1");
  assert_eq!(renamer.create_conflictless_name("exports"), "exports$1");
}

#[test]
fn test_claim_keeps_reserved_names() {
  let mut renamer = Renamer::new();
  assert_eq!(renamer.claim("exports"), "exports");
  assert_eq!(renamer.claim("value"), "value");
  assert_eq!(renamer.create_conflictless_name("value"), "value$1");
  assert_eq!(renamer.create_conflictless_name("exports"), "exports$1");
}
