// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Recurring timer: first tick after `initial_delay`, then every `period`.
///
/// Ticks missed while a cycle overran are not replayed in a burst.
pub(crate) fn periodic(initial_delay: Duration, period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + initial_delay, period.max(MIN_PERIOD));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
