//! CLI Exit Code Registry
//!
//! Single source of truth for `colprefs` exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad args, missing or invalid schema file)    |
//! | 3    | Operation ignored (unknown/locked column, bad index)      |
//! | 4    | Change applied but not saved (storage rejected the write) |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing or invalid schema.
pub const EXIT_USAGE: u8 = 2;

/// The store ignored the operation (see `InvalidOperation`).
pub const EXIT_IGNORED: u8 = 3;

/// The storage medium rejected the write or delete.
pub const EXIT_NOT_SAVED: u8 = 4;

