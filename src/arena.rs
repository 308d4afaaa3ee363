use core::{fmt, marker::PhantomData, mem};
use std::vec::Vec;

use crate::error::Error;

/// An offset into an [`Arena`]. It stays valid until the slot it refers to is deallocated.
#[repr(transparent)]
pub(crate) struct Pointer<T> {
  offset: u32,
  _m: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Pointer<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Pointer").field(&self.offset).finish()
  }
}

impl<T> Clone for Pointer<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Pointer<T> {}

impl<T> PartialEq for Pointer<T> {
  fn eq(&self, other: &Self) -> bool {
    self.offset == other.offset
  }
}

impl<T> Eq for Pointer<T> {}

impl<T> Pointer<T> {
  #[inline]
  const fn new(offset: u32) -> Self {
    Self {
      offset,
      _m: PhantomData,
    }
  }
}

enum Slot<T> {
  Occupied(T),
  Vacant { next_free: Option<u32> },
}

/// A slab of `T` addressed by [`Pointer`]s.
///
/// Deallocated slots are chained into a freelist and reused before the
/// backing vector grows.
pub(crate) struct Arena<T> {
  slots: Vec<Slot<T>>,
  free: Option<u32>,
  len: u32,
  cap: Option<u32>,
}

impl<T> fmt::Debug for Arena<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Arena")
      .field("cap", &self.cap)
      .field("allocated", &self.len)
      .field("slots", &self.slots.len())
      .finish()
  }
}

impl<T> Arena<T> {
  #[inline]
  pub(crate) const fn new(cap: Option<u32>) -> Self {
    Self {
      slots: Vec::new(),
      free: None,
      len: 0,
      cap,
    }
  }

  /// Returns the number of live slots.
  #[inline]
  pub(crate) const fn len(&self) -> u32 {
    self.len
  }

  #[inline]
  pub(crate) const fn capacity(&self) -> Option<u32> {
    self.cap
  }

  /// Makes sure the next `additional` calls to [`Arena::alloc`] succeed without
  /// touching the global allocator.
  pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), Error> {
    let live = self.len as usize;
    let limit = self.cap.unwrap_or(u32::MAX);
    if live + additional > limit as usize {
      #[cfg(feature = "tracing")]
      tracing::warn!(
        capacity = limit,
        live,
        additional,
        "arena refused allocation"
      );
      return Err(Error::Full {
        capacity: limit,
        requested: live + additional,
      });
    }

    let vacant = self.slots.len() - live;
    if additional > vacant {
      self.slots.try_reserve(additional - vacant)?;
    }
    Ok(())
  }

  /// Stores `val` and returns a pointer to it.
  ///
  /// Callers reserve room first, so this never fails on a bounded arena.
  pub(crate) fn alloc(&mut self, val: T) -> Pointer<T> {
    self.len += 1;
    match self.free {
      Some(offset) => {
        let slot = &mut self.slots[offset as usize];
        self.free = match slot {
          Slot::Vacant { next_free } => *next_free,
          Slot::Occupied(_) => unreachable!("freelist points to an occupied slot"),
        };
        *slot = Slot::Occupied(val);
        Pointer::new(offset)
      }
      None => {
        let offset = self.slots.len() as u32;
        self.slots.push(Slot::Occupied(val));
        Pointer::new(offset)
      }
    }
  }

  /// Releases the slot and hands back its value.
  pub(crate) fn dealloc(&mut self, ptr: Pointer<T>) -> T {
    let slot = &mut self.slots[ptr.offset as usize];
    match mem::replace(
      slot,
      Slot::Vacant {
        next_free: self.free,
      },
    ) {
      Slot::Occupied(val) => {
        self.free = Some(ptr.offset);
        self.len -= 1;
        val
      }
      Slot::Vacant { next_free } => {
        *slot = Slot::Vacant { next_free };
        panic!("double free of arena slot {}", ptr.offset)
      }
    }
  }

  #[inline]
  pub(crate) fn get(&self, ptr: Pointer<T>) -> &T {
    match &self.slots[ptr.offset as usize] {
      Slot::Occupied(val) => val,
      Slot::Vacant { .. } => panic!("dangling arena pointer {}", ptr.offset),
    }
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, ptr: Pointer<T>) -> &mut T {
    match &mut self.slots[ptr.offset as usize] {
      Slot::Occupied(val) => val,
      Slot::Vacant { .. } => panic!("dangling arena pointer {}", ptr.offset),
    }
  }

  /// Drops every value, keeping the allocation around.
  pub(crate) fn clear(&mut self) {
    self.slots.clear();
    self.free = None;
    self.len = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reuse_freed_slot() {
    let mut arena = Arena::new(None);
    let a = arena.alloc("a");
    let b = arena.alloc("b");
    assert_eq!(arena.dealloc(a), "a");
    let c = arena.alloc("c");
    assert_eq!(c, a);
    assert_eq!(*arena.get(b), "b");
    assert_eq!(*arena.get(c), "c");
    assert_eq!(arena.len(), 2);
  }

  #[test]
  fn test_full() {
    let mut arena = Arena::new(Some(2));
    arena.reserve(2).unwrap();
    arena.alloc(1u64);
    arena.alloc(2u64);
    assert_eq!(
      arena.reserve(1),
      Err(Error::Full {
        capacity: 2,
        requested: 3
      })
    );
  }

  #[test]
  fn test_reserve_counts_vacant_slots() {
    let mut arena = Arena::new(Some(3));
    arena.reserve(3).unwrap();
    let ptrs = [arena.alloc(0), arena.alloc(1), arena.alloc(2)];
    arena.dealloc(ptrs[1]);
    assert!(arena.reserve(1).is_ok());
    assert!(arena.reserve(2).is_err());
  }

  #[test]
  #[should_panic(expected = "double free")]
  fn test_double_free() {
    let mut arena = Arena::new(None);
    let a = arena.alloc(7);
    arena.dealloc(a);
    arena.dealloc(a);
  }

  #[test]
  fn test_get_mut() {
    let mut arena = Arena::new(None);
    let a = arena.alloc(1);
    *arena.get_mut(a) += 1;
    assert_eq!(*arena.get(a), 2);
  }
}
