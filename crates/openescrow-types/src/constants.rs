//! System-wide constants for the OpenEscrow engine.

/// Maximum byte length of a trade description.
pub const MAX_DESCRIPTION_LEN: usize = 512;

/// Maximum byte length of a dispute reason or resolution note.
pub const MAX_NOTE_LEN: usize = 512;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenEscrow";
