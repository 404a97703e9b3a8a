use std::iter::repeat_with;
use std::mem;

/// Open-addressed hash table from strings to values, with linear
/// probing and tombstone deletion. Maps are chainable: a lookup that
/// misses falls through to the parent map, which is how the
/// preprocessor's macro table and the parser's symbol tables model
/// nested scopes. A child never mutates its parent.
#[derive(Clone, Debug)]
pub struct Map<V> {
    slots: Vec<Slot<V>>,
    nelem: usize,
    nused: usize,
    parent: Option<Box<Map<V>>>,
}

#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    /// Deleted slot; keeps probe chains intact until the next rehash.
    Tombstone,
    Live { key: String, value: V },
}

const INIT_SIZE: usize = 16;

/// FNV-1a, 32-bit.
fn hash(key: &str) -> u32 {
    let mut r: u32 = 2166136261;
    for &byte in key.as_bytes() {
        r ^= u32::from(byte);
        r = r.wrapping_mul(16777619);
    }
    r
}

fn empty_slots<V>(size: usize) -> Vec<Slot<V>> {
    repeat_with(|| Slot::Empty).take(size).collect()
}

impl<V> Map<V> {
    pub fn new() -> Self {
        Self {
            slots: empty_slots(INIT_SIZE),
            nelem: 0,
            nused: 0,
            parent: None,
        }
    }

    /// Opens a nested scope on top of `parent`.
    pub fn with_parent(parent: Map<V>) -> Self {
        Self {
            parent: Some(Box::new(parent)),
            ..Self::new()
        }
    }

    /// Closes the innermost scope, returning the parent map.
    pub fn into_parent(self) -> Option<Map<V>> {
        self.parent.map(|parent| *parent)
    }

    fn get_nostack(&self, key: &str) -> Option<&V> {
        let mask = self.slots.len() - 1;
        let mut i = hash(key) as usize & mask;
        loop {
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Tombstone => (),
                Slot::Live { key: live, value } if live == key => return Some(value),
                Slot::Live { .. } => (),
            }
            i = (i + 1) & mask;
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        if let Some(value) = self.get_nostack(key) {
            return Some(value);
        }
        self.parent.as_ref().and_then(|parent| parent.get(key))
    }

    fn maybe_rehash(&mut self) {
        if (self.nused as f64) < self.slots.len() as f64 * 0.7 {
            return;
        }
        // A table mostly full of tombstones is rebuilt at the same
        // size; a genuinely full one doubles.
        let newsize = if (self.nelem as f64) < self.slots.len() as f64 * 0.35 {
            self.slots.len()
        } else {
            self.slots.len() * 2
        };
        let mask = newsize - 1;
        let old = mem::replace(&mut self.slots, empty_slots(newsize));
        for slot in old {
            if let Slot::Live { key, value } = slot {
                let mut i = hash(&key) as usize & mask;
                while matches!(self.slots[i], Slot::Live { .. }) {
                    i = (i + 1) & mask;
                }
                self.slots[i] = Slot::Live { key, value };
            }
        }
        self.nused = self.nelem;
    }

    pub fn put(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        self.maybe_rehash();
        let mask = self.slots.len() - 1;
        let mut i = hash(&key) as usize & mask;
        loop {
            match &mut self.slots[i] {
                Slot::Live { key: live, value: slot } if *live == key => {
                    *slot = value;
                    return;
                }
                Slot::Live { .. } => i = (i + 1) & mask,
                vacant => {
                    let was_empty = matches!(vacant, Slot::Empty);
                    *vacant = Slot::Live { key, value };
                    self.nelem += 1;
                    if was_empty {
                        self.nused += 1;
                    }
                    return;
                }
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        let mask = self.slots.len() - 1;
        let mut i = hash(key) as usize & mask;
        loop {
            match &self.slots[i] {
                Slot::Empty => return,
                Slot::Live { key: live, .. } if live == key => {
                    self.slots[i] = Slot::Tombstone;
                    self.nelem -= 1;
                    return;
                }
                _ => i = (i + 1) & mask,
            }
        }
    }

    /// Number of live entries in this map, not counting parents.
    pub fn len(&self) -> usize {
        self.nelem
    }

    pub fn is_empty(&self) -> bool {
        self.nelem == 0
    }
}

impl<V> Default for Map<V> {
    fn default() -> Self {
        Self::new()
    }
}
