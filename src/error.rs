// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Errors raised while importing GTFS files.
//!
//! Functions of the crate return [`crate::Result`]; the underlying error
//! is one of the types below and can be recovered with
//! `anyhow::Error::downcast_ref`.

use thiserror::Error;

/// Constraint violation reported by the storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// A record with the same natural key already exists in the feed.
    #[error("{entity} with identifier {key:?} already exists in the feed")]
    DuplicateKey {
        /// Name of the entity, e.g. `route`.
        entity: &'static str,
        /// The duplicated natural key.
        key: String,
    },
}

/// Failure of the import of one GTFS file.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file is not valid delimited text, or a value could not be
    /// deserialized.
    #[error("malformed {file}: {source}")]
    Csv {
        /// GTFS file name.
        file: &'static str,
        /// Underlying reader error.
        #[source]
        source: csv::Error,
    },
    /// A column required by the schema is absent from the header.
    #[error("{file}: missing required column {column:?}")]
    MissingColumn {
        /// GTFS file name.
        file: &'static str,
        /// GTFS name of the missing column.
        column: &'static str,
    },
    /// A value does not satisfy the constraint declared by the schema.
    #[error("{file}:{line}: invalid {field} {value:?}, {reason}")]
    InvalidValue {
        /// GTFS file name.
        file: &'static str,
        /// Line of the row in the file.
        line: u64,
        /// Attribute name.
        field: &'static str,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: String,
    },
    /// A natural-key reference does not resolve within the feed.
    #[error("{file}:{line}: {entity} {key:?} not found in the feed")]
    NotFound {
        /// GTFS file name.
        file: &'static str,
        /// Line of the row in the file.
        line: u64,
        /// Name of the referenced entity.
        entity: &'static str,
        /// Unresolved natural key.
        key: String,
    },
    /// The storage refused the record.
    #[error("{file}:{line}: {source}")]
    Storage {
        /// GTFS file name.
        file: &'static str,
        /// Line of the row in the file.
        line: u64,
        /// Constraint violation.
        #[source]
        source: StorageError,
    },
}
