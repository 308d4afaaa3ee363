use core::{borrow::Borrow, cmp, fmt, iter::FusedIterator};
use std::vec::Vec;

use crate::{
  arena::Arena,
  node::{Node, NodePtr, ValuePtr},
  policy::{Geometric, LevelPolicy, Profile},
  Error, Options,
};


/// Room for the predecessors of every level a skiplist can have.
const SPLICE_LEN: usize = u8::MAX as usize + 1;

/// An ordered skiplist.
///
/// Level 0 holds every element, duplicates included, in ascending order. Every
/// level above holds a sparser subset of the one below, and every level starts
/// with a sentinel head node, so the minimum is spliced in and out like any
/// other element.
///
/// Elements are stored once, in an arena owned by the list. The level 0 node
/// of an element owns its slot; the nodes of the same element on higher levels
/// refer to the slot by offset and never release it.
///
/// The list is single threaded: mutation takes `&mut self`. Share it between
/// threads behind a lock.
///
/// ## Example
///
/// ```
/// use probab::SkipList;
///
/// let mut l = SkipList::from_sorted([1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
/// assert!(l.contains(&4));
/// assert!(!l.contains(&9));
///
/// assert!(l.erase(&4));
/// assert!(!l.contains(&4));
/// assert_eq!(l.len(), 7);
/// ```
pub struct SkipList<T, P = Geometric> {
  nodes: Arena<Node<T>>,
  values: Arena<T>,
  /// Sentinel of every level, bottom level first.
  heads: Vec<NodePtr<T>>,
  /// Number of elements on every level, bottom level first.
  lens: Vec<usize>,
  policy: P,
  opts: Options,
}

impl<T, P> fmt::Debug for SkipList<T, P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SkipList")
      .field("len", &self.len())
      .field("height", &self.height())
      .field("lens", &self.lens)
      .field("nodes", &self.nodes)
      .field("opts", &self.opts)
      .finish()
  }
}

impl<T> Default for SkipList<T> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<T> SkipList<T> {
  /// Creates an empty skiplist with the default [`Options`] and a [`Geometric`]
  /// leveling policy.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::SkipList;
  ///
  /// let l = SkipList::<u64>::new();
  /// assert!(l.is_empty());
  /// assert_eq!(l.height(), 1);
  /// ```
  #[inline]
  pub fn new() -> Self {
    let opts = Options::new();
    Self::empty(opts, Geometric::from_options(&opts))
  }

  /// Creates an empty skiplist with the given [`Options`].
  ///
  /// Fails if the configured capacity cannot even hold the sentinel of level 0.
  #[inline]
  pub fn with_options(opts: Options) -> Result<Self, Error> {
    Self::with_policy(opts, Geometric::from_options(&opts))
  }

  /// Builds a skiplist from elements already in ascending order.
  ///
  /// The input is not sorted nor checked: unsorted input leaves the list in
  /// an unspecified order. Level 0 keeps the input order. Above it, levels are
  /// sampled deterministically, every level taking every other element of the
  /// level below, until the running half count of the input reaches zero.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::SkipList;
  ///
  /// let l = SkipList::from_sorted([1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
  /// assert_eq!(l.height(), 4);
  /// assert_eq!(l.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7, 8]);
  /// assert_eq!(l.to_string(), "1\n1 5\n1 3 5 7\n1 2 3 4 5 6 7 8\n");
  /// ```
  #[inline]
  pub fn from_sorted<I>(iter: I) -> Result<Self, Error>
  where
    I: IntoIterator<Item = T>,
  {
    Self::from_sorted_with_options(iter, Options::new())
  }

  /// Same as [`SkipList::from_sorted`], with the given [`Options`].
  #[inline]
  pub fn from_sorted_with_options<I>(iter: I, opts: Options) -> Result<Self, Error>
  where
    I: IntoIterator<Item = T>,
  {
    Self::from_sorted_with_policy(iter, opts, Geometric::from_options(&opts))
  }
}

impl<T, P> SkipList<T, P> {
  /// Creates an empty skiplist driven by a custom [`LevelPolicy`].
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::{Halving, Options, SkipList};
  ///
  /// let mut l = SkipList::with_policy(Options::new(), Halving::new()).unwrap();
  /// for i in 0..4 {
  ///   l.insert(i).unwrap();
  /// }
  /// assert_eq!(l.to_string(), "0 2\n0 1 2 3\n");
  /// ```
  pub fn with_policy(opts: Options, policy: P) -> Result<Self, Error> {
    let mut nodes = Arena::new(opts.capacity());
    nodes.reserve(1)?;
    let head = nodes.alloc(Node::head(None));
    let mut heads = Vec::new();
    heads.try_reserve(1)?;
    heads.push(head);
    let mut lens = Vec::new();
    lens.try_reserve(1)?;
    lens.push(0);
    Ok(Self {
      nodes,
      values: Arena::new(None),
      heads,
      lens,
      policy,
      opts,
    })
  }

  /// Same as [`SkipList::from_sorted`], driven by a custom [`LevelPolicy`].
  pub fn from_sorted_with_policy<I>(iter: I, opts: Options, policy: P) -> Result<Self, Error>
  where
    I: IntoIterator<Item = T>,
  {
    let mut this = Self::with_policy(opts, policy)?;
    let iter = iter.into_iter();
    let (lower, _) = iter.size_hint();
    this.values.reserve(lower)?;

    let mut tail = this.heads[0];
    for value in iter {
      this.nodes.reserve(1)?;
      this.values.reserve(1)?;
      let value = this.values.alloc(value);
      let node = this.nodes.alloc(Node::new(value, None, None));
      this.nodes.get_mut(tail).next = Some(node);
      tail = node;
      this.lens[0] += 1;
    }

    let mut half = this.lens[0] / 2;
    while half > 0 && this.heads.len() < this.max_height() {
      this.sample_level()?;
      half /= 2;
    }
    Ok(this)
  }

  /// Returns the number of elements, duplicates included.
  #[inline]
  pub fn len(&self) -> usize {
    self.lens[0]
  }

  /// Returns `true` if the skiplist holds no element.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the number of levels currently materialized, at least `1`.
  #[inline]
  pub fn height(&self) -> usize {
    self.heads.len()
  }

  /// Returns the number of elements on every level, bottom level first.
  #[inline]
  pub fn level_lens(&self) -> &[usize] {
    &self.lens
  }

  /// Returns the number of live nodes, sentinels included.
  #[inline]
  pub fn allocated(&self) -> usize {
    self.nodes.len() as usize
  }

  /// Returns the node capacity, if the skiplist was configured with one.
  #[inline]
  pub fn capacity(&self) -> Option<u32> {
    self.nodes.capacity()
  }

  /// Returns the options the skiplist was built with.
  #[inline]
  pub const fn options(&self) -> &Options {
    &self.opts
  }

  /// Returns the leveling policy.
  #[inline]
  pub const fn policy(&self) -> &P {
    &self.policy
  }

  /// Returns the leveling policy mutably, to retune it in place.
  #[inline]
  pub fn policy_mut(&mut self) -> &mut P {
    &mut self.policy
  }

  /// Returns an iterator over every element in ascending order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, T> {
    Iter::new(self, 0)
  }

  /// Returns an iterator over one level, `None` if the level does not exist.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::SkipList;
  ///
  /// let l = SkipList::from_sorted([1, 2, 3, 4]).unwrap();
  /// assert_eq!(l.level(1).unwrap().copied().collect::<Vec<_>>(), [1, 3]);
  /// assert!(l.level(3).is_none());
  /// ```
  #[inline]
  pub fn level(&self, level: usize) -> Option<Iter<'_, T>> {
    (level < self.heads.len()).then(|| Iter::new(self, level))
  }

  /// Returns the smallest element.
  #[inline]
  pub fn first(&self) -> Option<&T> {
    let next = self.nodes.get(self.heads[0]).next?;
    self.value_of(next)
  }

  /// Returns the largest element.
  pub fn last(&self) -> Option<&T> {
    let mut level = self.heads.len() - 1;
    let mut curr = self.heads[level];
    loop {
      while let Some(next) = self.nodes.get(curr).next {
        curr = next;
      }
      if level == 0 {
        return self.value_of(curr);
      }
      level -= 1;
      curr = self.nodes.get(curr).down.unwrap_or(self.heads[level]);
    }
  }

  /// Removes every element, keeping the allocated memory.
  pub fn clear(&mut self) {
    self.nodes.clear();
    self.values.clear();
    self.heads.clear();
    self.lens.clear();
    let head = self.nodes.alloc(Node::head(None));
    self.heads.push(head);
    self.lens.push(0);
  }

  fn empty(opts: Options, policy: P) -> Self {
    let mut nodes = Arena::new(opts.capacity());
    let head = nodes.alloc(Node::head(None));
    Self {
      nodes,
      values: Arena::new(None),
      heads: std::vec![head],
      lens: std::vec![0],
      policy,
      opts,
    }
  }

  #[inline]
  fn max_height(&self) -> usize {
    self.opts.max_height() as usize
  }

  #[inline]
  fn value_of(&self, node: NodePtr<T>) -> Option<&T> {
    self.nodes.get(node).value.map(|v| self.values.get(v))
  }

  /// Adds a level on top, holding the first element of the current top level
  /// and every other element after it.
  fn sample_level(&mut self) -> Result<(), Error> {
    let top = self.heads.len() - 1;
    let sampled = self.lens[top].div_ceil(2);
    self.nodes.reserve(sampled + 1)?;
    self.heads.try_reserve(1)?;
    self.lens.try_reserve(1)?;

    let head = self.nodes.alloc(Node::head(Some(self.heads[top])));
    let mut tail = head;
    let mut cursor = self.nodes.get(self.heads[top]).next;
    let mut idx = 0usize;
    while let Some(below) = cursor {
      let (value, next) = {
        let node = self.nodes.get(below);
        (node.value, node.next)
      };
      if idx % 2 == 0 {
        if let Some(value) = value {
          let node = self.nodes.alloc(Node::new(value, None, Some(below)));
          self.nodes.get_mut(tail).next = Some(node);
          tail = node;
        }
      }
      idx += 1;
      cursor = next;
    }

    self.heads.push(head);
    self.lens.push(sampled);

    #[cfg(feature = "tracing")]
    tracing::trace!(height = self.heads.len(), top_len = sampled, "sampled a new level");
    Ok(())
  }

  /// Drops empty levels from the top, always keeping level 0.
  fn shrink(&mut self) {
    while self.heads.len() > 1 && self.lens.last() == Some(&0) {
      if let Some(head) = self.heads.pop() {
        self.nodes.dealloc(head);
      }
      self.lens.pop();

      #[cfg(feature = "tracing")]
      tracing::trace!(height = self.heads.len(), "dropped an empty level");
    }
  }
}

impl<T: Ord, P> SkipList<T, P> {
  /// Walks down the staircase and records, for every level, the last node
  /// before the position of `key`: the last node `<= key` if `inclusive`,
  /// the last node `< key` otherwise.
  ///
  /// Returns `true` if a node equal to `key` was met above level 0.
  fn find_splice<Q>(&self, key: &Q, inclusive: bool, preds: &mut [NodePtr<T>]) -> bool
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    let mut level = self.heads.len() - 1;
    let mut curr = self.heads[level];
    let mut seen_above = false;
    loop {
      while let Some(next) = self.nodes.get(curr).next {
        let Some(next_value) = self.value_of(next) else {
          break;
        };
        match next_value.borrow().cmp(key) {
          cmp::Ordering::Less => curr = next,
          cmp::Ordering::Equal if inclusive => {
            seen_above |= level > 0;
            curr = next;
          }
          _ => break,
        }
      }

      preds[level] = curr;
      if level == 0 {
        return seen_above;
      }
      level -= 1;
      curr = self.nodes.get(curr).down.unwrap_or(self.heads[level]);
    }
  }

  /// Returns the first node equal to `key` met while walking down the staircase.
  fn find<Q>(&self, key: &Q) -> Option<NodePtr<T>>
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    let mut level = self.heads.len() - 1;
    let mut curr = self.heads[level];
    loop {
      while let Some(next) = self.nodes.get(curr).next {
        let Some(next_value) = self.value_of(next) else {
          break;
        };
        match next_value.borrow().cmp(key) {
          cmp::Ordering::Less => curr = next,
          cmp::Ordering::Equal => return Some(next),
          cmp::Ordering::Greater => break,
        }
      }

      if level == 0 {
        return None;
      }
      level -= 1;
      curr = self.nodes.get(curr).down.unwrap_or(self.heads[level]);
    }
  }

  /// Returns `true` if the skiplist holds an element equal to `key`.
  #[inline]
  pub fn contains<Q>(&self, key: &Q) -> bool
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    self.find(key).is_some()
  }

  /// Returns a reference to an element equal to `key`.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::SkipList;
  ///
  /// let l = SkipList::from_sorted([String::from("a"), String::from("b")]).unwrap();
  /// assert_eq!(l.get("b").map(String::as_str), Some("b"));
  /// assert!(l.get("c").is_none());
  /// ```
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<&T>
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    self.find(key).and_then(|node| self.value_of(node))
  }

  /// Removes one element equal to `key`, returning `true` if there was one.
  ///
  /// Erasing an absent element is a no-op.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::SkipList;
  ///
  /// let mut l = SkipList::new();
  /// l.insert(10).unwrap();
  /// l.insert(10).unwrap();
  /// assert!(l.erase(&10));
  /// assert!(l.contains(&10));
  /// assert_eq!(l.len(), 1);
  /// assert!(l.erase(&10));
  /// assert!(!l.erase(&10));
  /// assert!(l.is_empty());
  /// ```
  #[inline]
  pub fn erase<Q>(&mut self, key: &Q) -> bool
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    self.take(key).is_some()
  }

  /// Same as [`SkipList::erase`].
  #[inline]
  pub fn remove<Q>(&mut self, key: &Q) -> bool
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    self.erase(key)
  }

  /// Removes one element equal to `key` and returns it.
  ///
  /// With duplicates, the oldest insertion goes first.
  pub fn take<Q>(&mut self, key: &Q) -> Option<T>
  where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
  {
    let mut preds = [self.heads[0]; SPLICE_LEN];
    let preds = &mut preds[..self.heads.len()];
    self.find_splice(key, false, preds);

    // The leftmost equal node of level 0 is removed. Above it, the leftmost
    // equal node of every level belongs to the same tower as long as it sits
    // right on top of the node removed one level below.
    let victim = self.nodes.get(preds[0]).next?;
    if self.value_of(victim)?.borrow().cmp(key) != cmp::Ordering::Equal {
      return None;
    }

    let value = self.unlink(0, preds[0], victim)?;
    let mut below = victim;
    for (level, &pred) in preds.iter().enumerate().skip(1) {
      match self.nodes.get(pred).next {
        Some(node) if self.nodes.get(node).down == Some(below) => {
          self.unlink(level, pred, node);
          below = node;
        }
        _ => break,
      }
    }

    self.shrink();
    Some(self.values.dealloc(value))
  }

  /// Removes the node after `pred` on `level` and returns the value slot it referred to.
  fn unlink(&mut self, level: usize, pred: NodePtr<T>, node: NodePtr<T>) -> Option<ValuePtr<T>> {
    let removed = self.nodes.dealloc(node);
    self.nodes.get_mut(pred).next = removed.next;
    self.lens[level] -= 1;
    removed.value
  }
}

impl<T: Ord, P: LevelPolicy> SkipList<T, P> {
  /// Inserts an element. Duplicates are kept, after the equal elements already present.
  ///
  /// The element is linked on level 0, then promoted level by level as long as
  /// the [`LevelPolicy`] agrees, up to the current top level. An element equal
  /// to one already present above level 0 is never promoted. Afterwards the
  /// policy may add a new top level sampled from the current one.
  ///
  /// Every node the insertion needs, including the ones of a new top level, is
  /// reserved up front: on error the skiplist is left untouched.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::{Options, SkipList};
  ///
  /// let mut l = SkipList::with_options(Options::new().with_capacity(3)).unwrap();
  /// l.insert(1).unwrap();
  /// l.insert(2).unwrap();
  /// assert!(l.insert(3).is_err());
  /// assert_eq!(l.len(), 2);
  /// ```
  pub fn insert(&mut self, value: T) -> Result<(), Error> {
    let mut preds = [self.heads[0]; SPLICE_LEN];
    let preds = &mut preds[..self.heads.len()];
    let seen_above = self.find_splice(&value, true, preds);

    let height = self.heads.len();
    let max_height = self.max_height();
    let tower = if seen_above {
      1
    } else {
      self
        .policy
        .height(Profile::new(&self.lens, max_height))
        .clamp(1, height)
    };

    // the lengths every level will have once the element is linked
    let mut after = [0usize; SPLICE_LEN];
    let after = &mut after[..height];
    after.copy_from_slice(&self.lens);
    after.iter_mut().take(tower).for_each(|len| *len += 1);
    let profile = Profile::new(after, max_height);
    let grow = profile.can_grow() && self.policy.grow(profile);

    let sampled = if grow {
      self.heads.try_reserve(1)?;
      self.lens.try_reserve(1)?;
      after[height - 1].div_ceil(2) + 1
    } else {
      0
    };
    self.nodes.reserve(tower + sampled)?;
    self.values.reserve(1)?;

    let value = self.values.alloc(value);
    let mut down = None;
    for (level, &pred) in preds.iter().enumerate().take(tower) {
      let next = self.nodes.get(pred).next;
      let node = self.nodes.alloc(Node::new(value, next, down));
      self.nodes.get_mut(pred).next = Some(node);
      self.lens[level] += 1;
      down = Some(node);
    }

    if grow {
      self.sample_level()?;
    }
    Ok(())
  }
}

impl<T: fmt::Display, P> fmt::Display for SkipList<T, P> {
  /// Writes one line per level, top level first, values separated by a space.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for level in (0..self.heads.len()).rev() {
      for (idx, value) in Iter::new(self, level).enumerate() {
        if idx > 0 {
          f.write_str(" ")?;
        }
        write!(f, "{value}")?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

impl<'a, T, P> IntoIterator for &'a SkipList<T, P> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// An iterator over one level of a [`SkipList`], in ascending order.
pub struct Iter<'a, T> {
  nodes: &'a Arena<Node<T>>,
  values: &'a Arena<T>,
  curr: Option<NodePtr<T>>,
  remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
  fn clone(&self) -> Self {
    Self {
      nodes: self.nodes,
      values: self.values,
      curr: self.curr,
      remaining: self.remaining,
    }
  }
}

impl<T> fmt::Debug for Iter<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Iter")
      .field("curr", &self.curr)
      .field("remaining", &self.remaining)
      .finish()
  }
}

impl<'a, T> Iter<'a, T> {
  #[inline]
  fn new<P>(list: &'a SkipList<T, P>, level: usize) -> Self {
    Self {
      nodes: &list.nodes,
      values: &list.values,
      curr: list.nodes.get(list.heads[level]).next,
      remaining: list.lens[level],
    }
  }
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<Self::Item> {
    let curr = self.curr?;
    let node = self.nodes.get(curr);
    self.curr = node.next;
    self.remaining = self.remaining.saturating_sub(1);
    node.value.map(|v| self.values.get(v))
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
