//! Configuration and constants for the parser and the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Token the engine prints in place of a NULL parameter or context value
pub const NULL_SENTINEL: &str = "<NULL>";

/// Status words that may precede the event keyword in a header line
pub const STATUS_FAILED: &str = "FAILED";
pub const STATUS_UNAUTHORIZED: &str = "UNAUTHORIZED";

// Access statistics table layout. The first label names the table column,
// the remaining eight are right-aligned counter columns, in this order.
pub const ACCESS_TABLE_LABEL: &str = "Table";
pub const ACCESS_COUNTER_LABELS: [&str; 8] = [
    "Natural", "Index", "Update", "Insert", "Delete", "Backout", "Purge", "Expunge",
];

// Textual anchors used by the body parsers
pub const ATTACHMENT_ANCHOR: &str = "(ATT_";
pub const TRANSACTION_ANCHOR: &str = "(TRA_";
pub const SERVICE_ANCHOR: &str = "(Service ";
pub const SQL_SEPARATOR: &str = "-------";
pub const PLAN_SEPARATOR: &str = "^^^";
pub const SWEEP_COUNTERS_HEADER: &str = "Transaction counters:";

/// Default number of statements listed in a summary
pub const DEFAULT_TOP_STATEMENTS: usize = 10;
