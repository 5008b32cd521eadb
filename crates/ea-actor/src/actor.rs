//! `Actor<E>` — the handle that owns one mutable entity.

use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use ea_core::{ContextId, EntityKey};

use crate::{ActorError, Pending, PoolHandle};

struct Shared<E> {
    key:     EntityKey,
    context: ContextId,
    pool:    PoolHandle,
    entity:  Mutex<E>,
}

/// Exclusive owner of one entity.
///
/// The entity is moved in at construction and is only reachable through
/// [`call`](Self::call), which runs the given operation on the entity's
/// execution context.  Clones share the same entity; equality and hashing go
/// by [`EntityKey`], never by the entity's value.
///
/// # Forwarding protocol
///
/// ```text
/// caller (context C)                 entity lane (context K)
///   actor.call(op) ── enqueue ──────► op(&mut entity)
///   .await  (C's task suspended)           │
///   ◄──────────────── reply ───────────────┘
///   continues on C
/// ```
///
/// The continuation after `.await` always runs on the caller's context C.
/// Nothing from K leaks into it.
pub struct Actor<E> {
    shared: Arc<Shared<E>>,
}

impl<E: Send + 'static> Actor<E> {
    /// Take ownership of `entity` and bind it to its execution context.
    pub fn spawn(pool: &PoolHandle, key: EntityKey, entity: E) -> Self {
        let context = pool.context_for(key);
        Self {
            shared: Arc::new(Shared {
                key,
                context,
                pool:   pool.clone(),
                entity: Mutex::new(entity),
            }),
        }
    }

    /// Run `op` on the entity, on the entity's context, after every operation
    /// enqueued before it.
    ///
    /// `op` must be a short synchronous computation.  It may *issue* calls to
    /// other actors (the returned `Pending`s can be handed back to the
    /// caller), but must never wait for them: waiting is the caller's job.
    pub fn call<T, F>(&self, op: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut E) -> T + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        self.shared.pool.submit(self.shared.context, move || {
            let mut entity = shared
                .entity
                .lock()
                .map_err(|_| ActorError::Poisoned(shared.key))?;
            Ok(op(&mut entity))
        })
    }

    /// [`call`](Self::call) for fallible operations, flattening scheduler
    /// failures into the operation's own error type.
    ///
    /// Enqueued immediately, like `call`.
    pub fn try_call<T, Er, F>(&self, op: F) -> impl Future<Output = Result<T, Er>> + Send + 'static
    where
        T: Send + 'static,
        Er: From<ActorError> + Send + 'static,
        F: FnOnce(&mut E) -> Result<T, Er> + Send + 'static,
    {
        let pending = self.call(op);
        async move { pending.await? }
    }
}

impl<E> Actor<E> {
    pub fn key(&self) -> EntityKey {
        self.shared.key
    }

    /// The execution context this entity is bound to.
    pub fn context(&self) -> ContextId {
        self.shared.context
    }

    pub fn pool(&self) -> &PoolHandle {
        &self.shared.pool
    }
}

impl<E> Clone for Actor<E> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<E> PartialEq for Actor<E> {
    fn eq(&self, other: &Self) -> bool {
        self.shared.key == other.shared.key
    }
}

impl<E> Eq for Actor<E> {}

impl<E> Hash for Actor<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shared.key.hash(state);
    }
}

impl<E> fmt::Debug for Actor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("key", &self.shared.key)
            .field("context", &self.shared.context)
            .finish()
    }
}
