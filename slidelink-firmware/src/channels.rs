//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use slidelink_core::{Event, SettingsRecord};
use slidelink_protocol::{Command, ConsoleError, DebugLine};

/// Channel capacity for input events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for parsed console lines
const CONSOLE_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outgoing debug lines
const DEBUG_CHANNEL_SIZE: usize = 16;

/// Button, position button and mode switch events
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, Event, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Parsed console commands (or the parse error to report)
pub static CONSOLE_CHANNEL: Channel<
    CriticalSectionRawMutex,
    Result<Command, ConsoleError>,
    CONSOLE_CHANNEL_SIZE,
> = Channel::new();

/// Debug lines waiting to go out on the console UART
pub static DEBUG_CHANNEL: Channel<CriticalSectionRawMutex, DebugLine, DEBUG_CHANNEL_SIZE> =
    Channel::new();

/// Settings record to persist (latest request wins)
pub static SETTINGS_FLUSH: Signal<CriticalSectionRawMutex, SettingsRecord> = Signal::new();
