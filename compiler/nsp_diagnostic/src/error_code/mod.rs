//! Error codes for all diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2002`) with the first digit
//! indicating the phase. Used for `explain` lookups and documentation.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Reader errors
/// - E2xxx: Namespace errors (the engine)
/// - E3xxx: Host evaluation and loading errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Reader Errors (E1xxx)
    /// Unexpected closing parenthesis
    E1001,
    /// Unclosed list
    E1002,
    /// Unterminated string literal
    E1003,
    /// Malformed dotted list
    E1004,
    /// Invalid escape sequence in string
    E1005,

    // Namespace Errors (E2xxx)
    /// Namespace opened with no exported names
    E2001,
    /// Incompatible re-mapping of a short name
    E2002,
    /// Import or private registration outside any namespace
    E2003,
    /// Import source is neither a module nor a loadable unit
    E2004,
    /// Requested symbol not exported by the import source
    E2005,
    /// `:prefix` supplied for a registered module
    E2006,
    /// Reference to an ambiguous wildcard import
    E2007,
    /// Malformed namespace directive
    E2008,
    /// Loading an imported unit failed
    E2009,

    // Host Errors (E3xxx)
    /// Symbol has no value
    E3001,
    /// Symbol has no function definition
    E3002,
    /// Wrong type argument
    E3003,
    /// Wrong number of arguments
    E3004,
    /// Malformed special form
    E3005,
    /// Unit source could not be read
    E3006,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    pub const ALL: &[ErrorCode] = &[
        // Reader
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        // Namespace
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        // Host
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
    ];

    /// Get the code as a string (e.g., "E2002").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Reader
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            // Namespace
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            // Host
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            // Internal
        }
    }

    /// Check if this is a reader error (E1xxx range).
    pub fn is_reader_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
        )
    }

    /// Check if this is a namespace error (E2xxx range).
    pub fn is_namespace_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
                | ErrorCode::E2008
                | ErrorCode::E2009
        )
    }

    /// Check if this is a host evaluation/loading error (E3xxx range).
    pub fn is_host_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E3001
                | ErrorCode::E3002
                | ErrorCode::E3003
                | ErrorCode::E3004
                | ErrorCode::E3005
                | ErrorCode::E3006
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2002"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or(())
    }
}
