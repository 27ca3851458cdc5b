//! Process exit codes.

pub const SUCCESS: i32 = 0;
pub const REQUEST_FAILED: i32 = 1; // Backend answered with a failed envelope
pub const CONFIG_ERROR: i32 = 2; // Bad arguments, config, or local I/O
