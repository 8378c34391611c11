//! Insertion-ordered keyed collection that reports every mutation.
//!
//! [`Collection`] is used uniformly for the windows of a workspace and for
//! the workspaces of a [`WorkspaceSet`](crate::workspaces::WorkspaceSet).
//! Membership only changes through [`add`](Collection::add),
//! [`take`](Collection::take) and [`retain`](Collection::retain), and
//! typed field changes go through [`update`](Collection::update), so an
//! injected [`CollectionObserver`] sees each of them.
//!
//! Insertion order is meaningful: [`next`](Collection::next) and
//! [`prev`](Collection::prev) walk it cyclically for focus cycling.

use log::debug;
use std::fmt;
use std::hash::Hash;

/// An item that can live in a [`Collection`].
pub trait Keyed {
    /// Canonical identifier, assigned once when the item is created.
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    /// Typed partial update accepted by [`Collection::update`].
    type Patch;

    fn id(&self) -> Self::Id;

    /// Merge `patch` into `self`.
    fn apply(&mut self, patch: Self::Patch);
}

/// Receives a synchronous notification for every mutation of a
/// [`Collection`].
///
/// Removal is reported in two phases: [`on_before_removed`] while the item is
/// still stored, then [`on_removed`] once it is gone.  Both complete before
/// the removing call returns.
///
/// [`on_before_removed`]: CollectionObserver::on_before_removed
/// [`on_removed`]: CollectionObserver::on_removed
pub trait CollectionObserver<T: Keyed> {
    fn on_added(&mut self, _item: &T) {}
    fn on_before_removed(&mut self, _item: &T) {}
    fn on_removed(&mut self, _id: T::Id) {}
    fn on_updated(&mut self, _item: &T) {}
}

impl<T: Keyed, O: CollectionObserver<T> + ?Sized> CollectionObserver<T> for Box<O> {
    fn on_added(&mut self, item: &T) {
        (**self).on_added(item);
    }

    fn on_before_removed(&mut self, item: &T) {
        (**self).on_before_removed(item);
    }

    fn on_removed(&mut self, id: T::Id) {
        (**self).on_removed(id);
    }

    fn on_updated(&mut self, item: &T) {
        (**self).on_updated(item);
    }
}

/// Observer that writes every notification to the debug log.
#[derive(Debug, Clone)]
pub struct LogObserver {
    scope: String,
}

impl LogObserver {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }
}

impl<T: Keyed> CollectionObserver<T> for LogObserver {
    fn on_added(&mut self, item: &T) {
        debug!("{}: added {}", self.scope, item.id());
    }

    fn on_before_removed(&mut self, item: &T) {
        debug!("{}: removing {}", self.scope, item.id());
    }

    fn on_removed(&mut self, id: T::Id) {
        debug!("{}: removed {}", self.scope, id);
    }

    fn on_updated(&mut self, item: &T) {
        debug!("{}: updated {}", self.scope, item.id());
    }
}

/// Keyed container preserving insertion order.
pub struct Collection<T: Keyed> {
    items: Vec<T>,
    observer: Box<dyn CollectionObserver<T>>,
}

impl<T: Keyed> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

impl<T: Keyed> Collection<T> {
    /// Create an empty collection reporting to `observer`.
    pub fn new(observer: impl CollectionObserver<T> + 'static) -> Self {
        Self {
            items: Vec::new(),
            observer: Box::new(observer),
        }
    }

    fn position(&self, id: T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Insert `item` unless its id is already present.
    ///
    /// Returns `false` (and drops `item`) on a duplicate id; the stored item
    /// is left untouched.
    pub fn add(&mut self, item: T) -> bool {
        if self.exists(item.id()) {
            debug!("ignoring duplicate add of {}", item.id());
            return false;
        }
        self.items.push(item);
        if let Some(item) = self.items.last() {
            self.observer.on_added(item);
        }
        true
    }

    /// Remove and return the item stored under `id`.
    pub fn take(&mut self, id: T::Id) -> Option<T> {
        let pos = self.position(id)?;
        self.observer.on_before_removed(&self.items[pos]);
        let item = self.items.remove(pos);
        self.observer.on_removed(id);
        Some(item)
    }

    /// Keep only the items for which `keep` returns `true`.
    ///
    /// Keys are snapshotted before the walk, so removals cannot disturb it.
    /// Every rejected item is removed through [`take`](Self::take) and
    /// returned in iteration order.
    pub fn retain(&mut self, mut keep: impl FnMut(&T, T::Id) -> bool) -> Vec<T> {
        let mut removed = Vec::new();
        for id in self.keys() {
            let Some(item) = self.get(id) else {
                continue;
            };
            if !keep(item, id) {
                removed.extend(self.take(id));
            }
        }
        removed
    }

    /// Merge `patch` into the item stored under `id`.
    ///
    /// Returns `false` if `id` is absent.
    pub fn update(&mut self, id: T::Id, patch: T::Patch) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let item = &mut self.items[pos];
        item.apply(patch);
        self.observer.on_updated(item);
        true
    }

    pub fn exists(&self, id: T::Id) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mutable access for state that is not part of membership (geometry,
    /// visibility).  Membership changes must use `add`/`take`/`retain`.
    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// The key following `id` in insertion order, wrapping to the first.
    ///
    /// `None` if `id` is not present (which includes the empty collection).
    pub fn next(&self, id: T::Id) -> Option<T::Id> {
        let pos = self.position(id)?;
        let next = (pos + 1) % self.items.len();
        Some(self.items[next].id())
    }

    /// The key preceding `id` in insertion order, wrapping to the last.
    pub fn prev(&self, id: T::Id) -> Option<T::Id> {
        let pos = self.position(id)?;
        let prev = if pos == 0 { self.items.len() - 1 } else { pos - 1 };
        Some(self.items[prev].id())
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> Vec<T::Id> {
        self.items.iter().map(|item| item.id()).collect()
    }

    pub fn first(&self) -> Option<T::Id> {
        self.items.first().map(|item| item.id())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

//  Tests
