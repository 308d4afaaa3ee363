use crate::arena::Pointer;

pub(crate) type NodePtr<T> = Pointer<Node<T>>;
pub(crate) type ValuePtr<T> = Pointer<T>;

/// One entry of one level.
///
/// Every node of the same insertion shares one [`ValuePtr`]. The value slot is
/// owned by the level 0 node and released together with it, nodes above only
/// alias it. Heads are sentinels without a value.
pub(crate) struct Node<T> {
  pub(crate) value: Option<ValuePtr<T>>,
  pub(crate) next: Option<NodePtr<T>>,
  pub(crate) down: Option<NodePtr<T>>,
}

impl<T> core::fmt::Debug for Node<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Node")
      .field("value", &self.value)
      .field("next", &self.next)
      .field("down", &self.down)
      .finish()
  }
}

impl<T> Node<T> {
  #[inline]
  pub(crate) const fn head(down: Option<NodePtr<T>>) -> Self {
    Self {
      value: None,
      next: None,
      down,
    }
  }

  #[inline]
  pub(crate) const fn new(
    value: ValuePtr<T>,
    next: Option<NodePtr<T>>,
    down: Option<NodePtr<T>>,
  ) -> Self {
    Self {
      value: Some(value),
      next,
      down,
    }
  }
}
