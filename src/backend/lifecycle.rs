//! Process-wide backend lifecycle
//!
//! `backend_init()` must run once before the first decode and
//! `backend_shutdown()` once after the last. Decoding in between the two
//! is the only state shared across calls.

use std::sync::atomic::{AtomicU8, Ordering};

use log::{debug, error};
use symphonia::core::codecs::CODEC_TYPE_PCM_S16LE;

const UNINITIALIZED: u8 = 0;
const READY: u8 = 1;
const SHUT_DOWN: u8 = 2;

/// Lifecycle flag for one backend instance
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub const fn new() -> Self {
        Lifecycle {
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Mark ready. Returns false if it already was.
    pub fn start(&self) -> bool {
        self.state.swap(READY, Ordering::AcqRel) != READY
    }

    /// Mark shut down. Returns false if it was not ready.
    pub fn stop(&self) -> bool {
        self.state
            .compare_exchange(READY, SHUT_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

static BACKEND: Lifecycle = Lifecycle::new();

/// Check that the codec registries are usable
fn check_registries() -> Result<(), String> {
    // Forces the lazily built symphonia registries
    let codecs = symphonia::default::get_codecs();
    let _ = symphonia::default::get_probe();
    if codecs.get_codec(CODEC_TYPE_PCM_S16LE).is_none() {
        return Err("symphonia codec registry has no PCM decoder".to_string());
    }
    Ok(())
}

/// Initialize the codec backends
///
/// Idempotent. A failure here leaves no way to decode anything, so the
/// process is aborted.
pub fn backend_init() {
    if let Err(reason) = check_registries() {
        error!("Couldn't initialize codec backend: {}", reason);
        std::process::abort();
    }
    if BACKEND.start() {
        debug!("Codec backend initialized");
    }
}

/// Tear down the codec backends after the last decode
pub fn backend_shutdown() {
    if BACKEND.stop() {
        debug!("Codec backend shut down");
    }
}

/// Whether decodes are currently allowed
pub fn is_initialized() -> bool {
    BACKEND.is_ready()
}

/// Initializes the backend on creation and shuts it down on drop
#[derive(Debug)]
#[must_use = "the backend shuts down when the guard is dropped"]
pub struct BackendGuard {
    _private: (),
}

impl BackendGuard {
    pub fn new() -> Self {
        backend_init();
        BackendGuard { _private: () }
    }
}

impl Default for BackendGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackendGuard {
    fn drop(&mut self) {
        backend_shutdown();
    }
}
