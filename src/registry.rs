//! Trigger registry
//!
//! Maps each [`TriggerKey`] to its bound callback and current [`Phase`].
//! The phase lives inside the same entry as the callback, so registering
//! or removing a trigger always creates or drops both together.
//!
//! Entries iterate in registration order, which fixes the order of
//! per-tick `update` dispatch.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::callback::LifecycleCallback;
use crate::phase::Phase;
use crate::trigger::TriggerKey;

/// A registered trigger: its callback, phase, and the tick it last changed.
pub struct RegistryEntry<C> {
    callback: Box<dyn LifecycleCallback<C>>,
    phase: Phase,
    changed_at: Option<u64>,
}

impl<C> RegistryEntry<C> {
    fn new(callback: Box<dyn LifecycleCallback<C>>) -> Self {
        Self {
            callback,
            phase: Phase::Begin,
            changed_at: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the bound callback.
    #[must_use]
    pub fn callback_name(&self) -> &str {
        self.callback.name()
    }

    /// Tick on which the phase last changed, if ever.
    #[must_use]
    pub const fn changed_at(&self) -> Option<u64> {
        self.changed_at
    }

    pub(crate) fn set_phase(&mut self, phase: Phase, tick: u64) {
        self.phase = phase;
        self.changed_at = Some(tick);
    }

    pub(crate) fn callback_mut(&mut self) -> &mut dyn LifecycleCallback<C> {
        self.callback.as_mut()
    }
}

impl<C> std::fmt::Debug for RegistryEntry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("callback", &self.callback.name())
            .field("phase", &self.phase)
            .field("changed_at", &self.changed_at)
            .finish()
    }
}

/// Registered triggers in registration order.
pub struct TriggerRegistry<C> {
    entries: IndexMap<TriggerKey, RegistryEntry<C>>,
}

impl<C> TriggerRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Binds `callback` to `key` with phase `Begin`.
    ///
    /// Returns `false` without touching the existing binding if `key` is
    /// already registered.
    pub fn register(&mut self, key: TriggerKey, callback: Box<dyn LifecycleCallback<C>>) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(RegistryEntry::new(callback));
                true
            }
        }
    }

    /// Removes a trigger together with its phase.
    ///
    /// Returns `false` if `key` was not registered. Remaining entries keep
    /// their relative order.
    pub fn unregister(&mut self, key: &TriggerKey) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Returns whether `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &TriggerKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the phase of `key`, if registered.
    #[must_use]
    pub fn phase(&self, key: &TriggerKey) -> Option<Phase> {
        self.entries.get(key).map(RegistryEntry::phase)
    }

    /// Returns the entry for `key`, if registered.
    #[must_use]
    pub fn get(&self, key: &TriggerKey) -> Option<&RegistryEntry<C>> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &TriggerKey) -> Option<&mut RegistryEntry<C>> {
        self.entries.get_mut(key)
    }

    /// Number of registered triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no triggers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates keys and entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&TriggerKey, &RegistryEntry<C>)> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&TriggerKey, &mut RegistryEntry<C>)> {
        self.entries.iter_mut()
    }
}

impl<C> Default for TriggerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for TriggerRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
