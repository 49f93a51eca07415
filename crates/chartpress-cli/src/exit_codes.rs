//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - plugin options failed schema validation
pub const VALIDATION_ERROR: i32 = 2;

/// Tool error - helm, helm-docs or git failed or could not be started
pub const TOOL_ERROR: i32 = 3;

/// Config error - options file missing or malformed
pub const CONFIG_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
