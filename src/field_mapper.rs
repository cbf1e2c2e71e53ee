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

//! Translation of GTFS column headers into attribute names.
//!
//! Each GTFS file has its own table. A header without an entry in the table
//! is used as the attribute name unchanged (`agency_id` stays `agency_id`).

use csv::StringRecord;

/// Association list from GTFS column to attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapper(&'static [(&'static str, &'static str)]);

impl FieldMapper {
    /// Builds a mapper from `(gtfs_column, attribute)` pairs.
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        FieldMapper(pairs)
    }

    /// Returns the attribute name for a GTFS header, or the header itself.
    pub fn map<'a>(&self, header: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(column, _)| *column == header)
            .map(|(_, attribute)| *attribute)
            .unwrap_or(header)
    }

    /// Returns the GTFS column an attribute is read from.
    pub fn column<'a>(&self, attribute: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(_, attr)| *attr == attribute)
            .map(|(column, _)| *column)
            .unwrap_or(attribute)
    }

    /// Maps a whole header row.
    pub fn map_headers(&self, headers: &StringRecord) -> StringRecord {
        headers.iter().map(|header| self.map(header)).collect()
    }
}

/// `agency.txt`
pub const AGENCY: FieldMapper = FieldMapper::new(&[
    ("agency_name", "name"),
    ("agency_url", "url"),
    ("agency_timezone", "timezone"),
    ("agency_lang", "lang"),
    ("agency_phone", "phone"),
    ("agency_fare_url", "fare_url"),
]);

/// `routes.txt`
pub const ROUTE: FieldMapper = FieldMapper::new(&[
    ("route_short_name", "short_name"),
    ("route_long_name", "long_name"),
    ("route_desc", "desc"),
    ("route_type", "rtype"),
    ("route_url", "url"),
    ("route_color", "color"),
    ("route_text_color", "text_color"),
]);

/// `calendar.txt`, headers are the attribute names.
pub const SERVICE: FieldMapper = FieldMapper::new(&[]);

/// `calendar_dates.txt`, headers are the attribute names.
pub const SERVICE_DATE: FieldMapper = FieldMapper::new(&[]);

/// `stops.txt`
pub const STOP: FieldMapper = FieldMapper::new(&[
    ("stop_code", "code"),
    ("stop_name", "name"),
    ("stop_desc", "desc"),
    ("stop_lat", "lat"),
    ("stop_lon", "lon"),
    ("stop_url", "url"),
    ("stop_timezone", "timezone"),
]);

/// `shapes.txt`
pub const SHAPE_POINT: FieldMapper = FieldMapper::new(&[
    ("shape_pt_lat", "lat"),
    ("shape_pt_lon", "lon"),
    ("shape_pt_sequence", "sequence"),
    ("shape_dist_traveled", "traveled"),
]);

/// `trips.txt`
pub const TRIP: FieldMapper = FieldMapper::new(&[
    ("trip_headsign", "headsign"),
    ("trip_short_name", "short_name"),
    ("direction_id", "direction"),
]);

/// `stop_times.txt`
pub const STOP_TIME: FieldMapper = FieldMapper::new(&[("shape_dist_traveled", "traveled")]);

/// `frequencies.txt`, headers are the attribute names.
pub const FREQUENCY: FieldMapper = FieldMapper::new(&[]);

/// `fare_attributes.txt`, headers are the attribute names.
pub const FARE: FieldMapper = FieldMapper::new(&[]);

/// `fare_rules.txt`
pub const FARE_RULE: FieldMapper = FieldMapper::new(&[
    ("origin_id", "origin"),
    ("destination_id", "destination"),
    ("contains_id", "contains"),
]);

/// `transfers.txt`, headers are the attribute names.
pub const TRANSFER: FieldMapper = FieldMapper::new(&[]);

/// `feed_info.txt`
pub const FEED_INFO: FieldMapper = FieldMapper::new(&[
    ("feed_publisher_name", "publisher_name"),
    ("feed_publisher_url", "publisher_url"),
    ("feed_lang", "lang"),
    ("feed_start_date", "start_date"),
    ("feed_end_date", "end_date"),
    ("feed_version", "version"),
]);
