//! Error codes for all semantic diagnostics.

use std::fmt;

/// Error codes for all semantic diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E2xxx: Coercion and type errors
/// - E6xxx: Constant evaluation errors
/// - E9xxx: Diagnostic pipeline notices
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Coercion Errors (E2xxx)
    /// No implicit conversion between two types
    E2001,
    /// No explicit conversion between two types
    E2002,
    /// `null` used where a value type is expected
    E2003,
    /// `null` used where a non-null wrapper is expected
    E2004,
    /// `null` used for a type parameter without a reference constraint
    E2005,
    /// Anonymous function or delegate signature does not match
    E2006,
    /// Constant does not fit the target type
    E2007,

    // Constant Evaluation Errors (E6xxx)
    /// Checked constant arithmetic or conversion overflowed
    E6001,
    /// Integral constant division by zero
    E6002,
    /// Constant initializer refers to itself
    E6003,

    // Pipeline Notices (E9xxx)
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E9002,
    ];

    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a coercion/type error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
        )
    }

    /// Check if this is a constant evaluation error (E6xxx range).
    pub fn is_eval_error(&self) -> bool {
        matches!(self, ErrorCode::E6001 | ErrorCode::E6002 | ErrorCode::E6003)
    }

    /// Check if this is a pipeline notice (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
