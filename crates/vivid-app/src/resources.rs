//! Type-indexed singleton storage shared by every system.
//!
//! A [`Resources`] holds at most one value of any given type. Values are
//! addressed by their [`TypeId`] alone; there are no string keys.

use std::any::{Any, TypeId, type_name};
use std::fmt;

use rustc_hash::FxHashMap;

struct Slot {
    name: &'static str,
    value: Box<dyn Any>,
}

/// Heterogeneous container of singleton resources.
///
/// Any `'static` type may be stored. Inserting a second value of the same
/// type drops the first one.
#[derive(Default)]
pub struct Resources {
    slots: FxHashMap<TypeId, Slot>,
}

impl Resources {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, dropping any previous `T`, and returns a reference to
    /// the stored instance.
    ///
    /// The old value is dropped before this returns. Callers that need to run
    /// teardown on it should [`remove`](Self::remove) it first.
    pub fn insert<T: 'static>(&mut self, value: T) -> &mut T {
        // The displaced slot, if any, is dropped here.
        self.put(value);
        self.stored_mut::<T>()
    }

    /// Returns the stored `T`, or `None` if absent.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    /// Returns the stored `T` mutably, or `None` if absent.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    /// Returns the stored `T`, inserting the value produced by `init` first
    /// if there is none.
    pub fn get_or_insert_with<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        if !self.has::<T>() {
            self.put(init());
        }
        self.stored_mut::<T>()
    }

    /// Returns `true` if a `T` is stored.
    pub fn has<T: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Removes the stored `T` and hands it back. No-op returning `None` if
    /// absent.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        let slot = self.slots.remove(&TypeId::of::<T>())?;
        slot.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Type names of all stored resources, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.values().map(|slot| slot.name)
    }

    fn put<T: 'static>(&mut self, value: T) {
        let slot = Slot {
            name: type_name::<T>(),
            value: Box::new(value),
        };
        self.slots.insert(TypeId::of::<T>(), slot);
    }

    /// Only called once a `T` is known to be stored under `TypeId::of::<T>()`.
    fn stored_mut<T: 'static>(&mut self) -> &mut T {
        self.get_mut::<T>()
            .expect("slot keyed by TypeId::of::<T> holds a T")
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[derive(Debug, PartialEq)]
    struct Gravity(f32);

    #[derive(Debug, PartialEq)]
    struct Title(String);

    #[test]
    fn test_insert_returns_stored_instance() {
        let mut res = Resources::new();
        let gravity = res.insert(Gravity(9.8));
        gravity.0 = 1.6;
        assert_eq!(res.get::<Gravity>(), Some(&Gravity(1.6)));
    }

    #[test]
    fn test_get_absent_is_none() {
        let res = Resources::new();
        assert!(res.get::<Gravity>().is_none());
        assert!(!res.has::<Gravity>());
    }

    #[test]
    fn test_reinsert_drops_previous_value() {
        let drops = Rc::new(Cell::new(0));
        let mut res = Resources::new();

        res.insert(DropCounter(drops.clone()));
        assert_eq!(drops.get(), 0);

        res.insert(DropCounter(drops.clone()));
        assert_eq!(drops.get(), 1, "first instance is dropped on replace");
        assert_eq!(res.len(), 1);

        drop(res);
        assert_eq!(drops.get(), 2, "store teardown drops the survivor");
    }

    #[test]
    fn test_distinct_types_coexist() {
        let mut res = Resources::new();
        res.insert(Gravity(9.8));
        res.insert(Title("vivid".to_string()));

        assert_eq!(res.len(), 2);
        assert_eq!(res.get::<Title>().map(|t| t.0.as_str()), Some("vivid"));
        assert_eq!(res.get::<Gravity>(), Some(&Gravity(9.8)));
    }

    #[test]
    fn test_remove_returns_value_then_noop() {
        let mut res = Resources::new();
        res.insert(Gravity(3.7));

        assert_eq!(res.remove::<Gravity>(), Some(Gravity(3.7)));
        assert!(!res.has::<Gravity>());
        assert_eq!(res.remove::<Gravity>(), None);
        assert!(res.is_empty());
    }

    #[test]
    fn test_get_mut_mutates_in_place() {
        let mut res = Resources::new();
        res.insert(Gravity(0.0));
        if let Some(g) = res.get_mut::<Gravity>() {
            g.0 += 2.5;
        }
        assert_eq!(res.get::<Gravity>(), Some(&Gravity(2.5)));
    }

    #[test]
    fn test_get_or_insert_with_only_inits_once() {
        let mut res = Resources::new();
        let mut calls = 0;
        res.get_or_insert_with(|| {
            calls += 1;
            Gravity(1.0)
        })
        .0 += 1.0;
        res.get_or_insert_with(|| {
            calls += 1;
            Gravity(100.0)
        });

        assert_eq!(calls, 1);
        assert_eq!(res.get::<Gravity>(), Some(&Gravity(2.0)));
    }

    #[test]
    fn test_get_or_insert_with_returns_existing_instance() {
        let mut res = Resources::new();
        res.insert(Gravity(9.8));

        let gravity = res.get_or_insert_with(|| Gravity(0.0));
        gravity.0 = 3.7;

        assert_eq!(res.len(), 1);
        assert_eq!(res.get::<Gravity>(), Some(&Gravity(3.7)));
    }

    #[test]
    fn test_debug_lists_type_names() {
        let mut res = Resources::new();
        res.insert(Gravity(1.0));
        let printed = format!("{res:?}");
        assert!(printed.contains("Gravity"));
    }
}
