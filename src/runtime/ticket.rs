//! The exclusive-access ticket.
//!
//! Python can only be used by the thread that holds the interpreter lock. After startup that's
//! the thread that initialized Python. To use Python from multiple threads, that thread acquires
//! a [`Ticket`], which suspends its own implicit access. From then on every thread must lock
//! the ticket before it uses Python and unlock it afterwards so other threads can make progress:
//!
//! ```no_run
//! use std::thread;
//!
//! use pyrs::prelude::*;
//!
//! # fn main() -> PyrsResult<()> {
//! let python = unsafe { RuntimeBuilder::new().start()? };
//! let ticket = python.acquire_ticket()?;
//!
//! thread::scope(|s| {
//!     s.spawn(|| {
//!         ticket.scope(|| {
//!             let answer = Scalar::from_int(42)?;
//!             assert_eq!(answer.to_int()?, 42);
//!             Ok(())
//!         })
//!     });
//! });
//!
//! ticket.release()?;
//! # Ok(())
//! # }
//! ```
//!
//! A ticket moves through the following states, as observed by the calling thread:
//! [`TicketState::Suspended`] when no thread holds the lock, [`TicketState::Unlocked`] when
//! another thread holds it, [`TicketState::Locked`] when the calling thread holds it, and
//! finally [`TicketState::Released`]. Released is terminal: locking, unlocking and scopes
//! all fail with [`RuntimeError::ReleasedResourceUse`].
//!
//! Handles can be cloned and dropped by threads that don't hold the lock, but every other
//! operation on Python objects requires it.
//!
//! [`RuntimeError::ReleasedResourceUse`]: crate::error::RuntimeError::ReleasedResourceUse

use std::{
    fmt,
    marker::PhantomData,
    ptr::NonNull,
    sync::atomic::{AtomicBool, Ordering},
    thread::{self, ThreadId},
};

use fnv::FnvHashMap;
use lock_api::RawMutex as _;
use parking_lot::{Mutex, RawMutex};
use pyo3_ffi as ffi;

use super::ensure_active;
use crate::error::{PyrsResult, RuntimeError};

static TICKET_LIVE: AtomicBool = AtomicBool::new(false);

/// Returns `true` if a ticket exists that hasn't been released yet.
pub(crate) fn is_live() -> bool {
    TICKET_LIVE.load(Ordering::Acquire)
}

/// The state of a [`Ticket`] from the perspective of the calling thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketState {
    /// No thread holds the lock.
    Suspended,
    /// Another thread holds the lock.
    Unlocked,
    /// The calling thread holds the lock.
    Locked,
    /// The ticket has been released.
    Released,
}

struct SavedThread(NonNull<ffi::PyThreadState>);

// The thread state is only restored by the thread that saved it.
unsafe impl Send for SavedThread {}

enum Phase {
    Active(SavedThread),
    Released,
}

struct Inner {
    phase: Phase,
    holders: FnvHashMap<ThreadId, ffi::PyGILState_STATE>,
}

/// The exclusive right to use Python, shared between threads.
///
/// See the [module-level documentation] for more information.
///
/// [module-level documentation]: crate::runtime::ticket
pub struct Ticket {
    // Held by the thread that has locked the ticket. The interpreter lock alone is not
    // exclusive, Python hands it to waiting threads while a call is running.
    exclusive: RawMutex,
    inner: Mutex<Inner>,
    owner: ThreadId,
}

impl Ticket {
    /// Suspend the calling thread's implicit access to Python and convert it to a ticket.
    ///
    /// The calling thread must hold the interpreter lock, only one ticket can exist at a time.
    pub fn acquire() -> PyrsResult<Self> {
        ensure_active()?;

        if TICKET_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            Err(RuntimeError::TicketExists)?
        }

        let saved = unsafe {
            if ffi::PyGILState_Check() == 0 {
                None
            } else {
                NonNull::new(ffi::PyEval_SaveThread())
            }
        };

        let saved = match saved {
            Some(saved) => saved,
            None => {
                TICKET_LIVE.store(false, Ordering::Release);
                Err(RuntimeError::NotLocked)?
            }
        };

        let owner = thread::current().id();
        tracing::debug!(?owner, "acquired ticket");

        Ok(Ticket {
            exclusive: RawMutex::INIT,
            inner: Mutex::new(Inner {
                phase: Phase::Active(SavedThread(saved)),
                holders: FnvHashMap::default(),
            }),
            owner,
        })
    }

    /// Lock the ticket, blocking until no other thread holds it.
    ///
    /// Fails if the ticket has been released or if the calling thread has already locked it.
    pub fn lock(&self) -> PyrsResult<()> {
        let tid = thread::current().id();

        {
            let inner = self.inner.lock();
            if let Phase::Released = inner.phase {
                Err(RuntimeError::ReleasedResourceUse)?
            }

            if inner.holders.contains_key(&tid) {
                Err(RuntimeError::AlreadyLocked)?
            }
        }

        // The state mutex must not be held while waiting for either lock. The exclusive lock is
        // always taken before the interpreter lock.
        self.exclusive.lock();
        let gstate = unsafe { ffi::PyGILState_Ensure() };

        let mut inner = self.inner.lock();
        if let Phase::Released = inner.phase {
            std::mem::drop(inner);
            unsafe {
                ffi::PyGILState_Release(gstate);
                self.exclusive.unlock();
            }
            return Err(RuntimeError::ReleasedResourceUse.into());
        }

        inner.holders.insert(tid, gstate);
        tracing::trace!(?tid, "locked ticket");
        Ok(())
    }

    /// Unlock the ticket.
    ///
    /// Fails if the calling thread doesn't hold the lock or if the ticket has been released. A
    /// thread that still held the lock when the ticket was released gives it up before the
    /// error is returned.
    pub fn unlock(&self) -> PyrsResult<()> {
        let tid = thread::current().id();

        let mut inner = self.inner.lock();
        let gstate = inner.holders.remove(&tid);
        let released = matches!(inner.phase, Phase::Released);
        std::mem::drop(inner);

        match gstate {
            Some(gstate) => unsafe {
                ffi::PyGILState_Release(gstate);
                self.exclusive.unlock();
            },
            None if released => Err(RuntimeError::ReleasedResourceUse)?,
            None => Err(RuntimeError::NotLocked)?,
        }

        if released {
            Err(RuntimeError::ReleasedResourceUse)?
        }

        tracing::trace!(?tid, "unlocked ticket");
        Ok(())
    }

    /// Lock the ticket and return a guard that unlocks it when it's dropped.
    pub fn guard(&self) -> PyrsResult<TicketGuard<'_>> {
        self.lock()?;
        Ok(TicketGuard {
            ticket: self,
            _not_send: PhantomData,
        })
    }

    /// Call `func` while the ticket is locked.
    ///
    /// The ticket is unlocked before this method returns, including when `func` returns an
    /// error or panics. If the ticket has been released `func` isn't called.
    pub fn scope<T, F>(&self, func: F) -> PyrsResult<T>
    where
        F: FnOnce() -> PyrsResult<T>,
    {
        let _guard = self.guard()?;
        func()
    }

    /// Release the ticket and restore the implicit access of the thread that acquired it.
    ///
    /// Releasing is idempotent and must happen on the thread that acquired the ticket. If that
    /// thread holds the lock it's unlocked first.
    pub fn release(&self) -> PyrsResult<()> {
        if thread::current().id() != self.owner {
            Err(RuntimeError::WrongThread)?
        }

        let mut inner = self.inner.lock();
        let saved = match std::mem::replace(&mut inner.phase, Phase::Released) {
            Phase::Active(saved) => saved,
            Phase::Released => return Ok(()),
        };

        if let Some(gstate) = inner.holders.remove(&self.owner) {
            unsafe {
                ffi::PyGILState_Release(gstate);
                self.exclusive.unlock();
            }
        }
        std::mem::drop(inner);

        unsafe { ffi::PyEval_RestoreThread(saved.0.as_ptr()) };
        TICKET_LIVE.store(false, Ordering::Release);
        tracing::debug!(owner = ?self.owner, "released ticket");

        Ok(())
    }

    /// Returns the state of the ticket from the perspective of the calling thread.
    pub fn state(&self) -> TicketState {
        let tid = thread::current().id();
        let inner = self.inner.lock();

        match inner.phase {
            Phase::Released => TicketState::Released,
            Phase::Active(_) if inner.holders.contains_key(&tid) => TicketState::Locked,
            Phase::Active(_) if inner.holders.is_empty() => TicketState::Suspended,
            Phase::Active(_) => TicketState::Unlocked,
        }
    }

    /// Returns `true` if the ticket has been released.
    pub fn is_released(&self) -> bool {
        self.state() == TicketState::Released
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("owner", &self.owner)
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if thread::current().id() == self.owner {
            if let Err(e) = self.release() {
                tracing::warn!(error = %e, "failed to release ticket");
            }
        } else if !self.is_released() {
            tracing::warn!(
                owner = ?self.owner,
                "ticket dropped by a thread that didn't acquire it, access is not restored"
            );
        }
    }
}

/// Keeps a [`Ticket`] locked until it's dropped.
///
/// A guard must be dropped by the thread that created it.
pub struct TicketGuard<'ticket> {
    ticket: &'ticket Ticket,
    _not_send: PhantomData<*mut ()>,
}

impl TicketGuard<'_> {
    /// Returns the locked ticket.
    pub fn ticket(&self) -> &Ticket {
        self.ticket
    }
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.ticket.unlock() {
            tracing::trace!(error = %e, "ticket was not unlocked by its guard");
        }
    }
}
