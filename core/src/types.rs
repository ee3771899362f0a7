//! Shared primitive types used across the engine.

use std::fmt;

/// A policy identifier as it appears in the source files.
pub type PolicyId = String;

/// Storage class of a source column inside the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column {
    Column { name, kind: ColumnKind::Text }
}

const fn real(name: &'static str) -> Column {
    Column { name, kind: ColumnKind::Real }
}

const POLICY_COLUMNS: &[Column] = &[
    text("policy_id"),
    text("effective_date"),
    real("written_premium"),
    text("product"),
    text("state"),
    text("broker"),
];

const GL_COLUMNS: &[Column] = &[
    text("policy_id"),
    text("booking_date"),
    real("premium_booked"),
    real("taxes"),
    real("fees"),
];

const CLAIM_COLUMNS: &[Column] = &[
    text("claim_id"),
    text("policy_id"),
    text("state"),
    text("loss_date"),
    real("incurred_loss"),
    real("paid_loss"),
    real("reserve"),
];

/// The three input tables. Table names double as SQLite table names
/// and as the `table_name` column of the issues output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTable {
    Policies,
    AccountingGl,
    Claims,
}

impl SourceTable {
    pub const ALL: [SourceTable; 3] = [
        SourceTable::Policies,
        SourceTable::AccountingGl,
        SourceTable::Claims,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceTable::Policies     => "policies",
            SourceTable::AccountingGl => "accounting_gl",
            SourceTable::Claims       => "claims",
        }
    }

    /// Required columns, in schema order.
    pub fn columns(self) -> &'static [Column] {
        match self {
            SourceTable::Policies     => POLICY_COLUMNS,
            SourceTable::AccountingGl => GL_COLUMNS,
            SourceTable::Claims       => CLAIM_COLUMNS,
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
