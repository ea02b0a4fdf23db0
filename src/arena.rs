use std::cmp::min;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::handle::ArenaKey;

struct Entry<V> {
    value: Option<V>,
    generation: u32,
    /// Set once the generation counter is exhausted. A retired cell is never reused.
    retired: bool,
}

impl<V> Entry<V> {
    fn vacant() -> Self {
        Self {
            value: None,
            generation: 0,
            retired: false,
        }
    }

    /// Check if the cell is occupied.
    fn occupied(&self) -> bool {
        self.value.is_some()
    }

    /// Check if the cell can take a new value.
    fn available(&self) -> bool {
        !self.occupied() && !self.retired
    }
}

/// Generational arena.
///
/// Values never move between cells: a key handed out by [`alloc`][Arena::alloc] resolves to
/// the same value until that value is [freed][Arena::free]. Freed cells are reused, but
/// every reuse bumps the cell generation, so stale keys resolve to nothing. A cell whose
/// generation counter would overflow is retired instead of reused.
pub struct Arena<K, V> {
    data: Vec<Entry<V>>,
    /// Index of the first *possibly* free (non-occupied) cell.
    min_free: usize,
    /// Number of occupied cells.
    real_size: usize,
    _key: PhantomData<K>,
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            min_free: 0,
            real_size: 0,
            _key: PhantomData,
        }
    }

    /// Get the number of cells, occupied or not.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
    /// Get the number of occupied cells.
    pub fn len(&self) -> usize {
        self.real_size
    }
    pub fn is_empty(&self) -> bool {
        self.real_size == 0
    }
}

impl<K, V> Arena<K, V>
where
    K: ArenaKey,
{
    /// Store the value in the first free cell and return its key.
    pub fn alloc(&mut self, value: V) -> K {
        let index = (self.min_free..self.data.len())
            .find(|&i| self.data[i].available())
            .unwrap_or_else(|| {
                self.data.push(Entry::vacant());
                self.data.len() - 1
            });

        assert!(index <= u32::MAX as usize, "Arena is full");

        let entry = &mut self.data[index];
        entry.value = Some(value);
        self.min_free = index + 1;
        self.real_size += 1;

        K::new(index as u32, entry.generation)
    }

    /// Release the cell behind `key`, returning its value.
    ///
    /// Returns `None` if the key is stale or was never issued by this arena.
    pub fn free(&mut self, key: K) -> Option<V> {
        let entry = self.data.get_mut(key.index())?;
        if entry.generation != key.generation() {
            return None;
        }
        let value = entry.value.take()?;
        match entry.generation.checked_add(1) {
            Some(generation) => entry.generation = generation,
            None => entry.retired = true,
        }

        self.min_free = min(self.min_free, key.index());
        self.real_size -= 1;

        Some(value)
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.data
            .get(key.index())
            .filter(|entry| entry.generation == key.generation())
            .and_then(|entry| entry.value.as_ref())
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.data
            .get_mut(key.index())
            .filter(|entry| entry.generation == key.generation())
            .and_then(|entry| entry.value.as_mut())
    }

    /// Iterate over occupied cells in index order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.data.iter().enumerate().filter_map(|(i, entry)| {
            let value = entry.value.as_ref()?;
            Some((K::new(i as u32, entry.generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> + '_ {
        self.data.iter_mut().enumerate().filter_map(|(i, entry)| {
            let generation = entry.generation;
            let value = entry.value.as_mut()?;
            Some((K::new(i as u32, generation), value))
        })
    }
}

impl<K, V> Index<K> for Arena<K, V>
where
    K: ArenaKey,
{
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("Cell {} is not occupied by this key", key.index()),
        }
    }
}

impl<K, V> IndexMut<K> for Arena<K, V>
where
    K: ArenaKey,
{
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        match self.get_mut(key) {
            Some(value) => value,
            None => panic!("Cell {} is not occupied by this key", key.index()),
        }
    }
}
