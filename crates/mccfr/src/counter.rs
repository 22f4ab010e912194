use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

/// A hand-rolled atomic `f32`, built the same way the standard library's own
/// (unstable) `AtomicF32` is: bit-cast to `u32` and back around a
/// compare-exchange loop. No crate in this workspace's dependency graph
/// ships an atomic float type, so this is the one piece of lock-free
/// plumbing written from scratch rather than borrowed.
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }
    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }
    pub fn store(&self, value: f32, order: Ordering) {
        self.0.store(value.to_bits(), order)
    }
    pub fn fetch_update<F>(&self, set: Ordering, fetch: Ordering, mut f: F) -> Result<f32, f32>
    where
        F: FnMut(f32) -> Option<f32>,
    {
        let mut current = self.0.load(fetch);
        loop {
            let current_f = f32::from_bits(current);
            let next = f(current_f).ok_or(current_f)?;
            match self.0.compare_exchange_weak(current, next.to_bits(), set, fetch) {
                Ok(_) => return Ok(current_f),
                Err(actual) => current = actual,
            }
        }
    }
}

/// A value storable in [`crate::storage::StrategyStorage`] behind a
/// lock-free atomic slot. Implemented for `i32` (cumulative regret) and
/// `f32` (cumulative average-strategy weight, `phi`) — the two counter
/// types spec.md's blueprint trainer accumulates.
pub trait Counter: Copy + Send + Sync + 'static {
    type Atomic: Send + Sync;
    fn zero_atomic() -> Self::Atomic;
    /// Builds an atomic pre-loaded with `value` — used to reconstruct
    /// storage from a deserialized snapshot.
    fn new_atomic(value: Self) -> Self::Atomic;
    fn load(atomic: &Self::Atomic) -> Self;
    /// Multiplies the stored value by `factor` in place (the LCFR discount
    /// step, spec §4.6).
    fn scale(atomic: &Self::Atomic, factor: f32);
    /// Widens to `f64` for regret-matching/strategy-normalisation math,
    /// which is done the same way regardless of which counter type backs
    /// the storage.
    fn to_f64(self) -> f64;
    /// Inverse of [`Counter::to_f64`], for snapshot round-tripping.
    fn from_f64(value: f64) -> Self;
}

impl Counter for i32 {
    type Atomic = AtomicI32;
    fn zero_atomic() -> Self::Atomic {
        AtomicI32::new(0)
    }
    fn new_atomic(value: Self) -> Self::Atomic {
        AtomicI32::new(value)
    }
    fn load(atomic: &Self::Atomic) -> Self {
        atomic.load(Ordering::Relaxed)
    }
    fn scale(atomic: &Self::Atomic, factor: f32) {
        let _ = atomic.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
            Some(((v as f64) * (factor as f64)) as i32)
        });
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        value.round() as i32
    }
}

impl Counter for f32 {
    type Atomic = AtomicF32;
    fn zero_atomic() -> Self::Atomic {
        AtomicF32::new(0.0)
    }
    fn new_atomic(value: Self) -> Self::Atomic {
        AtomicF32::new(value)
    }
    fn load(atomic: &Self::Atomic) -> Self {
        atomic.load(Ordering::Relaxed)
    }
    fn scale(atomic: &Self::Atomic, factor: f32) {
        let _ = atomic.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v * factor));
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store/load round-trips exactly for representative floats.
    #[test]
    fn atomic_f32_round_trips() {
        let a = AtomicF32::new(1.5);
        assert_eq!(a.load(Ordering::Relaxed), 1.5);
        a.store(-2.25, Ordering::Relaxed);
        assert_eq!(a.load(Ordering::Relaxed), -2.25);
    }

    /// `fetch_update` applies the closure atomically and returns the
    /// previous value.
    #[test]
    fn atomic_f32_fetch_update() {
        let a = AtomicF32::new(10.0);
        let prev = a.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v + 1.0)).unwrap();
        assert_eq!(prev, 10.0);
        assert_eq!(a.load(Ordering::Relaxed), 11.0);
    }

    /// Scaling an i32 counter truncates toward zero like the `int` cast it replaces.
    #[test]
    fn i32_scale_truncates() {
        let atomic = i32::zero_atomic();
        atomic.store(10, Ordering::Relaxed);
        i32::scale(&atomic, 0.95);
        assert_eq!(i32::load(&atomic), 9);
    }
}
