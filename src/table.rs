//! Append-only hash-consing table.
//!
//! Values are stored in insertion order and never removed, so an index handed
//! out once stays valid for the lifetime of the table. Index `0` is a sentry.

use log::debug;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let size = 1usize << bits;
        let mut data = Vec::with_capacity(size);
        data.push(Entry {
            value: T::default(),
            next: 0,
        });

        Self {
            data,
            buckets: vec![0; size],
            bitmask: (size - 1) as u64,
        }
    }
}

impl<T> Table<T> {
    /// Get the number of stored values (excluding the sentry).
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    /// Append a value without hash-consing it and return its index.
    pub fn add(&mut self, value: T) -> usize {
        self.data.push(Entry { value, next: 0 });
        self.data.len() - 1
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Find an equal value or insert a new one, returning its index.
    pub fn put(&mut self, value: T) -> usize {
        let bucket = self.bucket_index(&value);
        let mut index = self.buckets[bucket];

        while index != 0 {
            if self.data[index].value == value {
                return index;
            }
            index = self.data[index].next;
        }

        let i = self.add(value);
        self.data[i].next = self.buckets[bucket];
        self.buckets[bucket] = i;

        if self.size() > 2 * self.buckets.len() {
            self.grow();
        }
        i
    }

    /// Double the number of buckets and relink every chain.
    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        debug!("Growing table buckets to {}", size);
        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;
        for i in 1..self.data.len() {
            let bucket = self.bucket_index(&self.data[i].value);
            self.data[i].next = self.buckets[bucket];
            self.buckets[bucket] = i;
        }
    }
}
