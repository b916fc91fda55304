//! Debug text channel
//!
//! Human-readable `key=value` lines for the serial console.

/// Line-oriented text output
pub trait DebugSink {
    /// Write one line. The implementation appends the line terminator.
    fn write_line(&mut self, line: &str);
}
