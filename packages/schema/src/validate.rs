//! Structural checks for documents arriving from outside the editor
//! (imports, stored templates, CLI input).

use std::collections::HashSet;
use std::fmt;

use crate::document::{Document, Row, MAX_COLUMNS, MIN_COLUMNS, MIN_COLUMN_WIDTH, MIN_WRAPPER_HEIGHT};
use crate::positioned::MAX_NAME_LEN;

/// Tolerance for the sum-to-100 width check
pub const WIDTH_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    ColumnCount { row_id: String, count: usize },
    WidthSum { row_id: String, sum: f64 },
    NarrowColumn { row_id: String, column_id: String, width: f64 },
    WrapperTooShort { row_id: String, height: f64 },
    DuplicateName { row_id: String, name: String },
    NameTooLong { row_id: String, name: String },
    EmptyName { row_id: String, block_id: String },
    DuplicateId { id: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::ColumnCount { row_id, count } => write!(
                f,
                "row {} has {} columns (expected {}-{})",
                row_id, count, MIN_COLUMNS, MAX_COLUMNS
            ),
            Issue::WidthSum { row_id, sum } => {
                write!(f, "row {} column widths sum to {:.2}, not 100", row_id, sum)
            }
            Issue::NarrowColumn {
                row_id,
                column_id,
                width,
            } => write!(
                f,
                "column {} in row {} is {:.2}% wide (minimum {}%)",
                column_id, row_id, width, MIN_COLUMN_WIDTH
            ),
            Issue::WrapperTooShort { row_id, height } => write!(
                f,
                "wrapper {} is {} high (minimum {})",
                row_id, height, MIN_WRAPPER_HEIGHT
            ),
            Issue::DuplicateName { row_id, name } => {
                write!(f, "wrapper {} has more than one block named {:?}", row_id, name)
            }
            Issue::NameTooLong { row_id, name } => write!(
                f,
                "block name {:?} in wrapper {} is longer than {} characters",
                name, row_id, MAX_NAME_LEN
            ),
            Issue::EmptyName { row_id, block_id } => {
                write!(f, "block {} in wrapper {} has an empty name", block_id, row_id)
            }
            Issue::DuplicateId { id } => write!(f, "id {:?} is used more than once", id),
        }
    }
}

/// Collect every structural problem in `doc`; empty means well formed.
pub fn validate(doc: &Document) -> Vec<Issue> {
    let mut issues = Vec::new();

    for row in &doc.rows {
        match row {
            Row::Columns(row) => {
                let count = row.columns.len();
                if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&count) {
                    issues.push(Issue::ColumnCount {
                        row_id: row.id.clone(),
                        count,
                    });
                    continue;
                }

                let sum: f64 = row.columns.iter().map(|c| c.width).sum();
                if (sum - 100.0).abs() > WIDTH_EPSILON {
                    issues.push(Issue::WidthSum {
                        row_id: row.id.clone(),
                        sum,
                    });
                }
                for column in &row.columns {
                    if column.width < MIN_COLUMN_WIDTH - WIDTH_EPSILON {
                        issues.push(Issue::NarrowColumn {
                            row_id: row.id.clone(),
                            column_id: column.id.clone(),
                            width: column.width,
                        });
                    }
                }
            }
            Row::Wrapper(row) => {
                if row.height < MIN_WRAPPER_HEIGHT {
                    issues.push(Issue::WrapperTooShort {
                        row_id: row.id.clone(),
                        height: row.height,
                    });
                }

                let mut names = HashSet::new();
                for block in &row.blocks {
                    if block.name.trim().is_empty() {
                        issues.push(Issue::EmptyName {
                            row_id: row.id.clone(),
                            block_id: block.id.clone(),
                        });
                    } else if block.name.chars().count() > MAX_NAME_LEN {
                        issues.push(Issue::NameTooLong {
                            row_id: row.id.clone(),
                            name: block.name.clone(),
                        });
                    }
                    if !names.insert(block.name.as_str()) {
                        issues.push(Issue::DuplicateName {
                            row_id: row.id.clone(),
                            name: block.name.clone(),
                        });
                    }
                }
            }
        }
    }

    let mut seen = HashSet::new();
    for id in doc.ids() {
        if !seen.insert(id) {
            issues.push(Issue::DuplicateId { id: id.to_string() });
        }
    }

    issues
}
