//! Single-registration cell for late-bound runtime services.
//!
//! Holds a `&'static T`, where `T` may be a trait object, so a target can
//! register its syscall provider or a service table once at startup.

use spin::Once;

/// A cell for single-registration service tables and providers.
pub struct ServiceCell<T: ?Sized + 'static> {
    slot: Once<&'static T>,
    name: &'static str,
}

impl<T: ?Sized + 'static> ServiceCell<T> {
    /// Create an empty cell. `name` appears in panic messages.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            slot: Once::new(),
            name,
        }
    }

    /// Register the service. Panics if already registered.
    #[inline]
    pub fn register(&self, services: &'static T) {
        let mut fresh = false;
        self.slot.call_once(|| {
            fresh = true;
            services
        });
        assert!(fresh, "{} already registered", self.name);
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.slot.is_completed()
    }

    /// Get the service. Panics if not registered.
    #[inline]
    pub fn get(&self) -> &'static T {
        match self.slot.get() {
            Some(&services) => services,
            None => panic!("{} not initialized", self.name),
        }
    }

    /// Try to get the service, `None` if not registered.
    #[inline]
    pub fn try_get(&self) -> Option<&'static T> {
        self.slot.get().copied()
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}
