use candela_core::{CandelaError, TestWindow, Timeframe};
use chrono::{DateTime, Utc};

/// Generate the ordered sequence of backtest windows covering
/// `[test_start, test_end]`.
///
/// Window starts advance by one frequency unit (not by `window_size`), so
/// windows overlap densely rather than partitioning the range; the evaluator
/// resolves re-predicted timestamps by keeping the last-computed value. Each
/// window spans exactly `window_size` steps (`end = start + (window_size - 1)`
/// units), and starts run through `test_end - window_size` units so the last
/// window fits fully before `test_end`. A range shorter than one window
/// yields an empty sequence.
///
/// # Errors
/// Returns `InvalidArg` if `window_size` is zero or out of range, or if
/// `test_end` precedes `test_start`.
pub fn generate_test_windows(
    test_start: DateTime<Utc>,
    test_end: DateTime<Utc>,
    window_size: usize,
    timeframe: Timeframe,
) -> Result<Vec<TestWindow>, CandelaError> {
    if window_size == 0 {
        return Err(CandelaError::InvalidArg(
            "window_size must be at least 1".to_string(),
        ));
    }
    if test_end < test_start {
        return Err(CandelaError::InvalidArg(format!(
            "test range ends before it starts: {test_start} > {test_end}"
        )));
    }
    let steps = i32::try_from(window_size)
        .map_err(|_| CandelaError::InvalidArg(format!("window_size {window_size} out of range")))?;

    let unit = timeframe.unit();
    let last_start = test_end - unit * steps;

    let mut windows = Vec::new();
    let mut start = test_start;
    while start <= last_start {
        windows.push(TestWindow {
            start,
            end: start + unit * (steps - 1),
        });
        start += unit;
    }
    Ok(windows)
}
