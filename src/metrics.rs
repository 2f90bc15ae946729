//! Minimal metrics scaffolding for the item pipeline.
//! Counters only for now; histograms and exposition can come later.
use std::sync::atomic::{AtomicU64, Ordering};

static EQUIP_ATTEMPTS: AtomicU64 = AtomicU64::new(0);
static EQUIP_SUCCESSES: AtomicU64 = AtomicU64::new(0);
static EQUIP_REJECTIONS: AtomicU64 = AtomicU64::new(0);
static BIND_PROMPTS: AtomicU64 = AtomicU64::new(0);
static NOTIFY_FAILED: AtomicU64 = AtomicU64::new(0);

pub fn inc_equip_attempts() {
    EQUIP_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_equip_successes() {
    EQUIP_SUCCESSES.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_equip_rejections() {
    EQUIP_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_bind_prompts() {
    BIND_PROMPTS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_notify_failed() {
    NOTIFY_FAILED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub equip_attempts: u64,
    pub equip_successes: u64,
    pub equip_rejections: u64,
    pub bind_prompts: u64,
    pub notify_failed: u64,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        equip_attempts: EQUIP_ATTEMPTS.load(Ordering::Relaxed),
        equip_successes: EQUIP_SUCCESSES.load(Ordering::Relaxed),
        equip_rejections: EQUIP_REJECTIONS.load(Ordering::Relaxed),
        bind_prompts: BIND_PROMPTS.load(Ordering::Relaxed),
        notify_failed: NOTIFY_FAILED.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_only_move_forward() {
        // Counters are process-wide and other tests may bump them
        // concurrently, so assert on deltas, not absolutes.
        let before = snapshot();
        inc_equip_attempts();
        inc_equip_rejections();
        inc_bind_prompts();
        inc_notify_failed();
        inc_equip_successes();
        let after = snapshot();

        assert!(after.equip_attempts >= before.equip_attempts + 1);
        assert!(after.equip_successes >= before.equip_successes + 1);
        assert!(after.equip_rejections >= before.equip_rejections + 1);
        assert!(after.bind_prompts >= before.bind_prompts + 1);
        assert!(after.notify_failed >= before.notify_failed + 1);
    }
}
