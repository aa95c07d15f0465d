use std::sync::atomic::{AtomicU8, Ordering};

use pyo3_ffi as ffi;

/// State of the Python runtime
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    /// Python is inactive
    Uninit = 0,
    /// Python is active and has been embedded in a Rust application
    Init = 1,
    /// Python is active and about to be finalized
    PendingExit = 2,
    /// Python has been finalized
    Exit = 3,
}

static PYTHON_STATE: AtomicU8 = AtomicU8::new(State::Uninit as u8);

/// Returns the current state
pub fn current_state() -> State {
    match PYTHON_STATE.load(Ordering::Acquire) {
        0 => State::Uninit,
        1 => State::Init,
        2 => State::PendingExit,
        _ => State::Exit,
    }
}

/// Returns `true` if `state` is the current state.
pub fn current_state_is(state: State) -> bool {
    current_state() == state
}

/// Returns `true` if the current state is [`State::Init`]
pub fn is_init() -> bool {
    current_state_is(State::Init)
}

pub(super) fn can_init() -> bool {
    unsafe {
        if ffi::Py_IsInitialized() != 0 {
            return false;
        }
    }

    try_set_init()
}

/// Reverts a claimed initialization after startup has failed.
pub(super) fn reset_init() {
    PYTHON_STATE.store(State::Uninit as _, Ordering::Release);
}

pub(super) fn set_pending_exit() {
    PYTHON_STATE.store(State::PendingExit as _, Ordering::Release);
}

pub(super) fn set_exit() {
    PYTHON_STATE.store(State::Exit as _, Ordering::Release);
}

fn try_set_init() -> bool {
    PYTHON_STATE
        .compare_exchange(
            State::Uninit as _,
            State::Init as _,
            Ordering::AcqRel,
            Ordering::Acquire,
        )
        .is_ok()
}
