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

//! The `gtfs_import` crate proposes a data model for
//! [GTFS](https://gtfs.org/) feeds and a bulk import of the GTFS text
//! files into a storage scoped by feed.
//!
//! Each GTFS file is read row by row, its headers are translated to the
//! attributes of the corresponding object, and one record is created per
//! row. References between files use the GTFS identifiers (`route_id`,
//! `service_id`, ...) and are resolved within the imported feed.
//!
//! ```no_run
//! # fn main() -> gtfs_import::Result<()> {
//! let (collections, feed) = gtfs_import::gtfs::read_from_path("path/to/gtfs", None)?;
//! println!("{} agencies", collections.agencies.filter(feed).len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod configuration;
pub mod error;
pub mod field_mapper;
pub mod file_handler;
pub mod gtfs;
pub mod objects;
pub mod schema;
mod serde_utils;
pub mod storage;
#[doc(hidden)]
pub mod test_utils;

/// The error type used by the crate.
pub type Error = anyhow::Error;

/// The corresponding result type used by the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use crate::configuration::{Configuration, ErrorPolicy};
pub use crate::error::{ImportError, StorageError};
pub use crate::storage::{Collections, Label, Storage};
