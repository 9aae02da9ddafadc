// src/domain/cycle.rs

pub const DAY: i64 = 24 * 60 * 60;

/// 2024-07-01 23:00 UTC+8, the start of a known lottery cycle.
pub const CYCLE_ORIGIN: i64 = 1719846000;

/// How an observed timestamp maps onto a sale deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleRule {
    /// Fixed-length cycles; purchases close `purchase_window` after the cycle ends.
    SinglePhase {
        start: i64,
        length: i64,
        purchase_window: i64,
    },
    /// Each cycle is an application phase followed by a publicity phase.
    TwoPhase {
        start: i64,
        application: i64,
        publicity: i64,
    },
}

impl CycleRule {
    pub fn single_phase_default() -> Self {
        CycleRule::SinglePhase {
            start: CYCLE_ORIGIN,
            length: 9 * DAY,
            purchase_window: 5 * DAY,
        }
    }

    pub fn two_phase_default() -> Self {
        CycleRule::TwoPhase {
            start: CYCLE_ORIGIN,
            application: 5 * DAY,
            publicity: 4 * DAY,
        }
    }

    /// End of the phase containing `timestamp`, or `None` when the arithmetic
    /// leaves the `i64` range or a duration is zero.
    pub fn deadline(&self, timestamp: i64) -> Option<i64> {
        match *self {
            CycleRule::SinglePhase {
                start,
                length,
                purchase_window,
            } => single_phase_deadline(timestamp, start, length, purchase_window),
            CycleRule::TwoPhase {
                start,
                application,
                publicity,
            } => two_phase_deadline(timestamp, start, application, publicity),
        }
    }
}

/// Timestamps before `start` are clamped into the first cycle.
pub fn single_phase_deadline(
    timestamp: i64,
    start: i64,
    length: i64,
    purchase_window: i64,
) -> Option<i64> {
    let cycle_number = if timestamp < start {
        0
    } else {
        timestamp.checked_sub(start)?.checked_div(length)?
    };
    let cycle_end = start.checked_add(cycle_number.checked_add(1)?.checked_mul(length)?)?;
    cycle_end.checked_add(purchase_window)
}

pub fn two_phase_deadline(
    timestamp: i64,
    start: i64,
    application: i64,
    publicity: i64,
) -> Option<i64> {
    if timestamp < start {
        return start.checked_add(application);
    }

    let period = application.checked_add(publicity)?;
    let cycle_number = timestamp.checked_sub(start)?.checked_div(period)?;
    let phase_start = start.checked_add(cycle_number.checked_mul(period)?)?;
    let offset = timestamp - phase_start;

    if offset < application {
        phase_start.checked_add(application)
    } else {
        phase_start.checked_add(period)
    }
}
