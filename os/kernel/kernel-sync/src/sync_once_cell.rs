use core::{
    cell::UnsafeCell,
    hint::spin_loop,
    mem::MaybeUninit,
    sync::atomic::{AtomicU8, Ordering},
};

const EMPTY: u8 = 0;
const WRITING: u8 = 1;
const READY: u8 = 2;

/// A write-once cell usable from `static` items.
///
/// The first of [`set`](Self::set) or [`get_or_init`](Self::get_or_init)
/// claims the slot; the value is immutable afterwards and never dropped.
pub struct SyncOnceCell<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Default for SyncOnceCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncOnceCell<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Returns `Some(&T)` once a value has been published.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        if self.is_initialized() {
            // SAFETY: READY is only stored after the value was written.
            Some(unsafe { self.value_unchecked() })
        } else {
            None
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Publishes `value` unless the cell was already claimed.
    ///
    /// # Errors
    /// Hands `value` back if another value was (or is being) stored.
    pub fn set(&self, value: T) -> Result<(), T> {
        if self.claim() {
            self.publish(value);
            Ok(())
        } else {
            Err(value)
        }
    }

    /// Initializes the cell at most once and returns the stored value.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        if let Some(value) = self.get() {
            return value;
        }

        if self.claim() {
            return self.publish(init());
        }

        while !self.is_initialized() {
            spin_loop();
        }
        // SAFETY: READY.
        unsafe { self.value_unchecked() }
    }

    fn claim(&self) -> bool {
        self.state
            .compare_exchange(EMPTY, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    fn publish(&self, value: T) -> &T {
        // SAFETY: the caller won `claim`, so no reader or writer aliases the slot yet.
        unsafe {
            (*self.value.get()).write(value);
        }
        self.state.store(READY, Ordering::Release);
        // SAFETY: just written.
        unsafe { self.value_unchecked() }
    }

    /// # Safety
    /// The state must be READY.
    unsafe fn value_unchecked(&self) -> &T {
        unsafe { (*self.value.get()).assume_init_ref() }
    }
}

// SAFETY: shared only after READY; initialization has a single writer.
unsafe impl<T: Sync + Send> Sync for SyncOnceCell<T> {}
unsafe impl<T: Send> Send for SyncOnceCell<T> {}
