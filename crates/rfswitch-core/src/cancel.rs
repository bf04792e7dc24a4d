use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use crate::error::{Result, RfkillError};

pub type CancelFlag = Arc<AtomicBool>;

pub fn check_cancel(flag: &CancelFlag) -> Result<()> {
    if flag.load(Ordering::Relaxed) {
        return Err(RfkillError::SessionClosed);
    }
    Ok(())
}

/// Sleep for `duration`, waking every `tick` to check `flag`.
pub fn cancel_sleep(flag: &CancelFlag, duration: Duration, tick: Duration) -> Result<()> {
    if duration.is_zero() {
        return check_cancel(flag);
    }

    let start = Instant::now();
    while start.elapsed() < duration {
        check_cancel(flag)?;
        let remaining = duration.saturating_sub(start.elapsed());
        std::thread::sleep(tick.min(remaining));
    }
    check_cancel(flag)
}
