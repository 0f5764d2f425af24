// Trigger constants (No magic values)
use std::time::Duration;

/// Default total time `stop()` waits for in-flight jobs before aborting their slots (5s)
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Default one-shot verification delay after start (10s)
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(10);
