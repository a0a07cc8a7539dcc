use crate::common::Coord;
use crate::error::SearchError;

/// Maps a key to a bucket in `0..table_size`.
pub type HashFn<K> = fn(&K, usize) -> usize;
/// Key equality. Must agree with the hash: equal keys hash alike.
pub type EqFn<K> = fn(&K, &K) -> bool;

/// `(x * 83) ^ (y * 97)`, reduced to the table size.
pub fn coord_hash(coord: &Coord, table_size: usize) -> usize {
    (coord.x.wrapping_mul(83) ^ coord.y.wrapping_mul(97)) % table_size
}

pub fn coord_eq(a: &Coord, b: &Coord) -> bool {
    a.x == b.x && a.y == b.y
}

/// Fixed-size hash table with separate chaining.
///
/// The bucket count is chosen once at construction and never changes; long
/// chains are the price of an undersized table.
#[derive(Debug, Clone)]
pub struct PositionIndex<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    hash_fn: HashFn<K>,
    eq_fn: EqFn<K>,
    len: usize,
    used_buckets: usize,
}

impl<V> PositionIndex<Coord, V> {
    /// Index keyed by grid coordinate.
    pub fn for_coords(table_size: usize) -> Result<Self, SearchError> {
        Self::new(table_size, coord_hash, coord_eq)
    }
}

impl<K, V> PositionIndex<K, V> {
    pub fn new(table_size: usize, hash_fn: HashFn<K>, eq_fn: EqFn<K>) -> Result<Self, SearchError> {
        if table_size == 0 {
            return Err(SearchError::ZeroBuckets);
        }

        Ok(PositionIndex {
            buckets: (0..table_size).map(|_| Vec::new()).collect(),
            hash_fn,
            eq_fn,
            len: 0,
            used_buckets: 0,
        })
    }

    fn bucket_of(&self, key: &K) -> usize {
        (self.hash_fn)(key, self.buckets.len()) % self.buckets.len()
    }

    /// Inserts or overwrites, returning the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.bucket_of(&key);
        let eq = self.eq_fn;
        let bucket = &mut self.buckets[idx];

        if let Some((_, slot)) = bucket.iter_mut().find(|(k, _)| eq(k, &key)) {
            return Some(std::mem::replace(slot, value));
        }

        if bucket.is_empty() {
            self.used_buckets += 1;
        }
        bucket.push((key, value));
        self.len += 1;
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let eq = self.eq_fn;
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| eq(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` and returns its value. Emptied buckets are released.
    pub fn pop(&mut self, key: &K) -> Option<V> {
        let idx = self.bucket_of(key);
        let eq = self.eq_fn;
        let bucket = &mut self.buckets[idx];

        let pos = bucket.iter().position(|(k, _)| eq(k, key))?;
        let (_, value) = bucket.swap_remove(pos);
        self.len -= 1;

        if bucket.is_empty() {
            *bucket = Vec::new();
            self.used_buckets -= 1;
        }
        Some(value)
    }

    /// Number of buckets.
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn used_buckets(&self) -> usize {
        self.used_buckets
    }

    /// Length of the longest chain.
    pub fn max_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }
}
