//! Write-once guard for published schema descriptions.
//!
//! Descriptions carry an `ObjectId`. Finalized ids are recorded in an
//! identity-keyed marker table behind its own lock, independent of the
//! registry lock, so setters can be checked before an object is registered.

use serde::Serialize;
use std::{
    collections::HashSet,
    fmt::{self, Display},
    sync::{
        LazyLock, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// ObjectId
/// Identity of one description object. Clones share it.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);

        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

///
/// FinalizationGuard
///

#[derive(Debug, Default)]
pub struct FinalizationGuard {
    finalized: Mutex<HashSet<ObjectId>>,
}

impl FinalizationGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide guard consulted by every description setter.
    ///
    /// Marks are never removed, so the set grows with every object a
    /// registry resolves, including those of dropped private registries.
    pub fn global() -> &'static Self {
        static GUARD: LazyLock<FinalizationGuard> = LazyLock::new(FinalizationGuard::new);

        &GUARD
    }

    pub fn mark_finalized(&self, id: ObjectId) {
        self.finalized
            .lock()
            .expect("finalization guard mutex poisoned")
            .insert(id);
    }

    #[must_use]
    pub fn is_finalized(&self, id: ObjectId) -> bool {
        self.finalized
            .lock()
            .expect("finalization guard mutex poisoned")
            .contains(&id)
    }
}

///
/// Finalizable
///
/// Implemented by the description nodes. Every mutating setter calls
/// `ensure_not_finalized` before applying a change.
///

pub trait Finalizable {
    fn object_id(&self) -> ObjectId;

    /// Short label used in violation messages, e.g. `relationship 'person'`.
    fn describe(&self) -> String;

    fn mark_finalized(&self) {
        FinalizationGuard::global().mark_finalized(self.object_id());
    }

    fn is_finalized(&self) -> bool {
        FinalizationGuard::global().is_finalized(self.object_id())
    }

    /// Panics when the object has been finalized.
    #[track_caller]
    fn ensure_not_finalized(&self) {
        assert!(
            !self.is_finalized(),
            "attempt to modify finalized {}",
            self.describe()
        );
    }
}
