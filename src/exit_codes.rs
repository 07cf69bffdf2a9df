//! Exit code constants for the clairscan CLI.
//!
//! - 0: Success
//! - 1: User error (missing argument, bad config, I/O)
//! - 2: Conflict (a same-named directory blocks a resource)
//! - 3: Container runtime failure
//! - 4: Fetch failure
//! - 5: Scanner failure (could not launch, health check failed)
//!
//! A scanner tool that exits non-zero has its own exit code propagated
//! instead of one of the above. Tool codes are passed through unchanged even
//! when they coincide with 1-5, so a script that must tell a conflict apart
//! from a scanner exiting 2 runs `clairscan check` first.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: missing argument, invalid config, or local I/O failure.
pub const USER_ERROR: i32 = 1;

/// A directory with the resource's name occupies its slot.
pub const CONFLICT: i32 = 2;

/// The container runtime could not be invoked or reported an error.
pub const CONTAINER_FAILURE: i32 = 3;

/// Downloading a release artifact failed.
pub const FETCH_FAILURE: i32 = 4;

/// A scanner binary could not be launched or its health check failed.
pub const SCANNER_FAILURE: i32 = 5;
