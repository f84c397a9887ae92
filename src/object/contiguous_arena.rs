use generational_arena::{Arena, Index};
use std::marker::PhantomData;

pub type ContiguousArenaIndex = Index;

/// A set of objects stored contiguously, addressed by generational handles.
///
/// Removing an object swaps the last one into its slot, so iteration over the values stays a
/// plain slice traversal.
#[derive(Clone, Debug)]
pub struct ContiguousArena<Idx, T> {
    objects: Vec<T>,
    rev_indices: Vec<Index>,
    indices: Arena<usize>,
    phantoms: PhantomData<Idx>,
}

impl<Idx, T> Default for ContiguousArena<Idx, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx, T> ContiguousArena<Idx, T> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            indices: Arena::new(),
            rev_indices: Vec::new(),
            phantoms: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn get(&self, handle: Idx) -> Option<&T>
    where
        Idx: Into<ContiguousArenaIndex>,
    {
        self.objects.get(*self.indices.get(handle.into())?)
    }

    #[inline]
    pub fn values(&self) -> std::slice::Iter<T> {
        self.objects.iter()
    }

    #[inline]
    pub fn values_mut(&mut self) -> std::slice::IterMut<T> {
        self.objects.iter_mut()
    }

    #[inline]
    pub fn insert(&mut self, object: T) -> Idx
    where
        Idx: From<ContiguousArenaIndex>,
    {
        let i = self.objects.len();
        self.objects.push(object);
        let idx = self.indices.insert(i);
        self.rev_indices.push(idx);
        Idx::from(idx)
    }

    #[inline]
    pub fn remove(&mut self, handle: Idx) -> Option<T>
    where
        Idx: Into<ContiguousArenaIndex>,
    {
        let idx = handle.into();
        let i = *self.indices.get(idx)?;
        Some(self.remove_at(i))
    }

    /// Removes every object for which `keep` returns `false`, and returns their handles.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> Vec<Idx>
    where
        Idx: From<ContiguousArenaIndex>,
    {
        let mut removed = Vec::new();
        let mut i = 0;

        while i < self.objects.len() {
            if keep(&self.objects[i]) {
                i += 1;
            } else {
                // The last object is swapped into slot `i`, so `i` is examined again.
                removed.push(Idx::from(self.rev_indices[i]));
                let _ = self.remove_at(i);
            }
        }

        removed
    }

    fn remove_at(&mut self, i: usize) -> T {
        let _ = self.indices.remove(self.rev_indices[i]);
        let deleted_object = self.objects.swap_remove(i);
        let _ = self.rev_indices.swap_remove(i);

        if let Some(moved) = self.rev_indices.get(i) {
            self.indices[*moved] = i;
        }

        deleted_object
    }
}
