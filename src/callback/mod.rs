//! Lifecycle callbacks
//!
//! A [`LifecycleCallback`] is the user behaviour bound to a trigger. For
//! each occurrence the recorder calls `begin` once, `update` on every tick
//! while the occurrence is active, and `end` once.
//!
//! `update` has no default: a callback that does not implement it is
//! rejected at compile time. `begin` and `end` default to no-ops.
//!
//! Callbacks run inside the tick loop and must not block.

pub mod builtin;

pub use builtin::{LogCallback, Stopwatch};

/// Behaviour driven through one begin, many update, one end per occurrence.
///
/// `C` is the opaque tick context forwarded verbatim from
/// [`Recorder::update`](crate::recorder::Recorder::update).
pub trait LifecycleCallback<C> {
    /// Human-readable name used in logs and transition records.
    fn name(&self) -> &str;

    /// Called exactly once when an occurrence starts.
    fn begin(&mut self, _ctx: &C) {}

    /// Called once per tick while the occurrence is active.
    fn update(&mut self, ctx: &C);

    /// Called exactly once when an occurrence closes.
    fn end(&mut self, _ctx: &C) {}
}

impl<C, T> LifecycleCallback<C> for Box<T>
where
    T: LifecycleCallback<C> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn begin(&mut self, ctx: &C) {
        (**self).begin(ctx);
    }

    fn update(&mut self, ctx: &C) {
        (**self).update(ctx);
    }

    fn end(&mut self, ctx: &C) {
        (**self).end(ctx);
    }
}

#[cfg(test)]
pub(crate) mod probe {
    //! Recording callback shared by the unit tests.

    use std::sync::{Arc, Mutex};

    use super::LifecycleCallback;

    /// One observed lifecycle call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Call {
        Begin(u32),
        Update(u32),
        End(u32),
    }

    /// Callback that appends every call (with the tick context) to a shared log.
    pub struct Probe {
        name: String,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl Probe {
        pub fn new(name: &str) -> (Self, Arc<Mutex<Vec<Call>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    name: name.to_string(),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl LifecycleCallback<u32> for Probe {
        fn name(&self) -> &str {
            &self.name
        }

        fn begin(&mut self, ctx: &u32) {
            self.calls.lock().unwrap().push(Call::Begin(*ctx));
        }

        fn update(&mut self, ctx: &u32) {
            self.calls.lock().unwrap().push(Call::Update(*ctx));
        }

        fn end(&mut self, ctx: &u32) {
            self.calls.lock().unwrap().push(Call::End(*ctx));
        }
    }
}
