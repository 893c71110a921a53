//! Rent/return buffer pool and the scoped builder that uses it.
//!
//! A [`PooledBuilder`] rents a `Vec<T>` from the pool of its element type,
//! grows it by doubling (handing the outgrown buffer back), and returns its
//! buffer when dropped. Anything that escapes the builder is copied out
//! first, so no pooled buffer is ever aliased after it has been returned.

use parking_lot::Mutex;

use super::StructuralArray;

/// Largest number of idle buffers a pool keeps.
const MAX_RETAINED: usize = 32;

/// Buffers above this capacity are dropped instead of pooled.
const MAX_RETAINED_CAPACITY: usize = 1 << 20;

/// A thread-safe pool of reusable buffers.
pub struct ArrayPool<T> {
    buffers: Mutex<Vec<Vec<T>>>,
}

impl<T> ArrayPool<T> {
    pub const fn new() -> Self {
        Self {
            buffers: parking_lot::const_mutex(Vec::new()),
        }
    }

    /// Rents an empty buffer whose capacity is at least `min_capacity`.
    pub fn rent(&self, min_capacity: usize) -> Vec<T> {
        let mut buffers = self.buffers.lock();
        match buffers.iter().position(|b| b.capacity() >= min_capacity) {
            Some(index) => buffers.swap_remove(index),
            None => Vec::with_capacity(min_capacity),
        }
    }

    /// Clears `buffer` and keeps it for a later [`rent`](Self::rent).
    pub fn give_back(&self, mut buffer: Vec<T>) {
        if buffer.capacity() == 0 || buffer.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buffer.clear();
        let mut buffers = self.buffers.lock();
        if buffers.len() < MAX_RETAINED {
            buffers.push(buffer);
        }
    }

    pub fn idle_count(&self) -> usize {
        self.buffers.lock().len()
    }
}

impl<T> Default for ArrayPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Element types that own a shared pool.
pub trait PoolElement: Sized + 'static {
    /// Capacity of a freshly rented builder.
    const INITIAL_CAPACITY: usize = 8;

    fn pool() -> &'static ArrayPool<Self>;
}

/// Gives each listed type its own static pool.
macro_rules! pool_element {
    ($($ty:ty => $capacity:expr),* $(,)?) => {
        $(
            impl $crate::base::PoolElement for $ty {
                const INITIAL_CAPACITY: usize = $capacity;

                fn pool() -> &'static $crate::base::ArrayPool<Self> {
                    static POOL: $crate::base::ArrayPool<$ty> = $crate::base::ArrayPool::new();
                    &POOL
                }
            }
        )*
    };
}

pub(crate) use pool_element;

pool_element! {
    char => 1024,
    u8 => 1024,
    String => 8,
    smol_str::SmolStr => 8,
}

/// An append-only builder over a rented buffer.
pub struct PooledBuilder<T: 'static> {
    pool: &'static ArrayPool<T>,
    buffer: Vec<T>,
}

impl<T: PoolElement> PooledBuilder<T> {
    /// Rents from the shared pool of `T`.
    pub fn rent() -> Self {
        Self::rent_in(T::pool(), T::INITIAL_CAPACITY)
    }
}

impl<T: 'static> PooledBuilder<T> {
    pub fn rent_in(pool: &'static ArrayPool<T>, capacity: usize) -> Self {
        Self {
            pool,
            buffer: pool.rent(capacity.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    pub fn push(&mut self, item: T) {
        self.reserve(1);
        self.buffer.push(item);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn reserve(&mut self, additional: usize) {
        let required = self.buffer.len() + additional;
        if required <= self.buffer.capacity() {
            return;
        }

        let mut capacity = self.buffer.capacity().max(1);
        while capacity < required {
            capacity *= 2;
        }

        let mut grown = self.pool.rent(capacity);
        grown.append(&mut self.buffer);
        let outgrown = std::mem::replace(&mut self.buffer, grown);
        self.pool.give_back(outgrown);
    }
}

impl<T: Clone + 'static> PooledBuilder<T> {
    pub fn extend_from_slice(&mut self, items: &[T]) {
        self.reserve(items.len());
        self.buffer.extend_from_slice(items);
    }

    /// Copies the contents into a structural array.
    pub fn to_immutable(&self) -> StructuralArray<T> {
        StructuralArray::from(self.buffer.clone())
    }

    /// Copies the contents into an owned vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.buffer.clone()
    }
}

impl PooledBuilder<char> {
    pub fn push_str(&mut self, text: &str) {
        self.reserve(text.len());
        self.buffer.extend(text.chars());
    }
}

impl PooledBuilder<u8> {
    pub fn push_str(&mut self, text: &str) {
        self.extend_from_slice(text.as_bytes());
    }
}

impl std::fmt::Display for PooledBuilder<char> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        self.buffer.iter().try_for_each(|c| f.write_char(*c))
    }
}

impl std::fmt::Display for PooledBuilder<u8> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.buffer))
    }
}

impl<T: 'static> Drop for PooledBuilder<T> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buffer));
    }
}
