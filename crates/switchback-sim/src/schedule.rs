use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use switchback_types::{Result, SwitchbackError, Variant, WindowAssignment};

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Most windows one schedule may hold: a leap year of 1-minute windows
pub const MAX_WINDOWS: u64 = 366 * MINUTES_PER_DAY;

/// Whole windows of `window_minutes` that fit in `days` days
pub fn window_count(days: u32, window_minutes: u32) -> u64 {
    if window_minutes == 0 {
        return 0;
    }
    days as u64 * MINUTES_PER_DAY / window_minutes as u64
}

/// End of the last window of a schedule starting at `start`.
///
/// Fails if the schedule would be empty, hold more than [`MAX_WINDOWS`]
/// windows, or end beyond the range `DateTime<Utc>` can represent.
pub fn schedule_end(start: DateTime<Utc>, days: u32, window_minutes: u32) -> Result<DateTime<Utc>> {
    if days == 0 {
        return Err(SwitchbackError::InvalidHorizon(days));
    }
    if window_minutes == 0 {
        return Err(SwitchbackError::InvalidWindowLength(window_minutes));
    }

    let windows = window_count(days, window_minutes);
    if windows == 0 {
        return Err(SwitchbackError::EmptySchedule { days, window_minutes });
    }
    if windows > MAX_WINDOWS {
        return Err(SwitchbackError::HorizonTooLarge {
            windows,
            max_windows: MAX_WINDOWS,
        });
    }

    let span = Duration::minutes((windows * window_minutes as u64) as i64);
    start
        .checked_add_signed(span)
        .ok_or(SwitchbackError::ScheduleOutOfRange { start, windows })
}

/// Randomise contiguous windows starting at `start`.
///
/// Each window is independently Control or Treatment with probability 0.5.
pub fn generate_schedule<R: Rng + ?Sized>(
    start: DateTime<Utc>,
    days: u32,
    window_minutes: u32,
    rng: &mut R,
) -> Result<Vec<WindowAssignment>> {
    schedule_end(start, days, window_minutes)?;

    let count = window_count(days, window_minutes);
    let step = Duration::minutes(window_minutes as i64);
    let mut window_start = start;
    let mut schedule = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let variant = if rng.gen_bool(0.5) {
            Variant::Treatment
        } else {
            Variant::Control
        };
        schedule.push(WindowAssignment::new(window_start, variant));
        window_start += step;
    }

    tracing::debug!(windows = schedule.len(), %start, window_minutes, "generated switchback schedule");

    Ok(schedule)
}
