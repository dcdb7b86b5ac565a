// Constants shared by the runner, the binary and the viewer

/// Byte ceiling for the ledger (10 MB); the routines never get close
pub const DEFAULT_HEAP_LIMIT: usize = 10 * 1024 * 1024;

/// Bytes per hex-dump row in the heap pane
pub const HEX_ROW_BYTES: usize = 8;

/// Event poll interval for the viewer, in milliseconds
pub const UI_POLL_MS: u64 = 50;
