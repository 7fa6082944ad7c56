//! Macros for the error handling patterns repeated across command handlers.

/// Write a line to a stream and return the error exit code if the write fails.
///
/// # Examples
///
/// ```ignore
/// write_or_exit!(err, "Error: {}", message);
/// ```
#[macro_export]
macro_rules! write_or_exit {
    ($dest:expr, $($arg:tt)*) => {
        if writeln!($dest, $($arg)*).is_err() {
            return $crate::exit_code::ERROR;
        }
    };
}

/// Parse a JSON history line or count it as corrupted and move to the next one.
///
/// # Examples
///
/// ```ignore
/// let event: HistoryEvent = parse_json_or_continue!(line, err, format!("line {}", n), corrupted);
/// ```
#[macro_export]
macro_rules! parse_json_or_continue {
    ($line:expr, $err:expr, $context:expr, $counter:expr) => {
        match serde_json::from_str($line) {
            Ok(r) => r,
            Err(e) => {
                $counter += 1;
                $crate::ui::write_error($err, &format!("Failed to parse {}: {}", $context, e))?;
                continue;
            }
        }
    };
}
