use fnv::FnvHasher;
use std::collections::HashSet;
use std::hash::{BuildHasherDefault, Hash};

/// Hash set for coordinates. FNV is quicker than SipHash on small integer keys but not collision
/// resistant, which is fine for grid positions.
pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;

pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    HashSet::with_capacity_and_hasher(capacity, BuildHasherDefault::<FnvHasher>::default())
}
