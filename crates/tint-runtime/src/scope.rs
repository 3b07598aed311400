#![forbid(unsafe_code)]

//! Typed provider scopes with nearest-enclosing lookup.
//!
//! A [`ScopeStack`] models the render tree's ambient context: a producer
//! pushes a value with [`ScopeStack::provide`] when it is entered, and every
//! descendant rendered while the returned [`ScopeGuard`] is alive can find it
//! with [`ScopeStack::lookup`]. Lookup walks from the innermost frame
//! outward and returns the first frame holding the requested type, so an
//! inner provider shadows an outer one of the same type.
//!
//! # Invariants
//!
//! 1. `lookup::<T>()` returns the most recently provided, still-live `T`.
//! 2. Dropping a guard removes exactly its own frame, even when guards are
//!    dropped out of order.
//! 3. Frames of other types are transparent to lookup.
//!
//! # Example
//!
//! ```
//! use tint_runtime::ScopeStack;
//!
//! let scopes = ScopeStack::new();
//! let _outer = scopes.provide(1u32);
//! {
//!     let _inner = scopes.provide(2u32);
//!     assert_eq!(scopes.lookup::<u32>(), Some(2));
//! }
//! assert_eq!(scopes.lookup::<u32>(), Some(1));
//! ```

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::trace;

struct Frame {
    id: u64,
    type_id: TypeId,
    type_name: &'static str,
    value: Rc<dyn Any>,
}

#[derive(Default)]
struct StackInner {
    frames: RefCell<Vec<Frame>>,
    next_id: Cell<u64>,
}

/// Stack of typed provider frames.
///
/// Cloning shares the same stack. `!Send`: scopes belong to the UI thread.
#[derive(Clone, Default)]
pub struct ScopeStack {
    inner: Rc<StackInner>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `value` as the innermost provider of `T`.
    ///
    /// The frame lives until the returned guard is dropped.
    #[must_use = "dropping the guard immediately pops the scope"]
    pub fn provide<T: 'static>(&self, value: T) -> ScopeGuard {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let type_name = std::any::type_name::<T>();
        self.inner.frames.borrow_mut().push(Frame {
            id,
            type_id: TypeId::of::<T>(),
            type_name,
            value: Rc::new(value),
        });
        trace!(scope_id = id, provides = type_name, "scope entered");
        ScopeGuard {
            stack: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Nearest enclosing provider of `T`, if any.
    #[must_use]
    pub fn lookup<T: Clone + 'static>(&self) -> Option<T> {
        let wanted = TypeId::of::<T>();
        self.inner
            .frames
            .borrow()
            .iter()
            .rev()
            .find(|frame| frame.type_id == wanted)
            .and_then(|frame| frame.value.downcast_ref::<T>())
            .cloned()
    }

    /// Whether any frame provides `T`.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        let wanted = TypeId::of::<T>();
        self.inner
            .frames
            .borrow()
            .iter()
            .any(|frame| frame.type_id == wanted)
    }

    /// Number of live frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.frames.borrow().len()
    }
}

impl std::fmt::Debug for ScopeStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frames = self.inner.frames.borrow();
        f.debug_list()
            .entries(frames.iter().map(|frame| frame.type_name))
            .finish()
    }
}

/// Guard owning one scope frame. Dropping it pops the frame.
#[derive(Debug)]
pub struct ScopeGuard {
    stack: Weak<StackInner>,
    id: u64,
}

impl ScopeGuard {
    /// Identifier of the frame this guard owns.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let Some(stack) = self.stack.upgrade() else {
            return;
        };
        let mut frames = stack.frames.borrow_mut();
        if let Some(pos) = frames.iter().rposition(|frame| frame.id == self.id) {
            let frame = frames.remove(pos);
            trace!(scope_id = self.id, provides = frame.type_name, "scope exited");
        }
    }
}
