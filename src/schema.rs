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

//! Declarative description of the GTFS entities.
//!
//! A schema lists, for one GTFS file, the attributes of the created
//! records, the kind of value each one holds, whether the column is
//! required, and the documentation of the field taken from the
//! [GTFS reference](https://gtfs.org/schedule/reference/).
//!
//! The importer uses it to reject files missing a required column and to
//! check every value before the record is built.

use crate::field_mapper::{self, FieldMapper};
use crate::objects::{Date, Time};
use chrono_tz::Tz;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Kind of value held by an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Free text with a maximum length in characters.
    Text(usize),
    /// Fully qualified `http://` or `https://` URL.
    Url,
    /// IANA timezone name, e.g. `America/Los_Angeles`.
    Timezone,
    /// Two-letter ISO 639-1 language code.
    Language,
    /// One of an enumerated set of codes.
    Code(&'static [&'static str]),
    /// `YYYYMMDD` service date.
    Date,
    /// `HH:MM:SS` time, hours may exceed 24.
    Time,
    /// Non negative integer.
    Integer,
    /// Non negative decimal number.
    Decimal,
    /// Floating point number.
    Float,
    /// Six hexadecimal digits color.
    Color,
    /// ISO 4217 alphabetical currency code.
    Currency,
    /// Natural key of a record of the given entity in the same feed.
    Reference(&'static str),
    /// Natural key of one of the records of the given entity linked to
    /// the created record; several rows may add several links.
    Multiset(&'static str),
}

/// One attribute of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Attribute name, after header mapping.
    pub name: &'static str,
    /// Kind of value.
    pub kind: Kind,
    /// Whether the column must be present and the value not empty.
    pub required: bool,
    /// Documentation of the field.
    pub help: &'static str,
}

impl Field {
    const fn required(name: &'static str, kind: Kind, help: &'static str) -> Self {
        Field {
            name,
            kind,
            required: true,
            help,
        }
    }

    const fn optional(name: &'static str, kind: Kind, help: &'static str) -> Self {
        Field {
            name,
            kind,
            required: false,
            help,
        }
    }

    /// Value given to the attribute when the column is absent or blank:
    /// the empty string for textual kinds, `None` (null) otherwise.
    pub fn default(&self) -> Option<&'static str> {
        match self.kind {
            Kind::Text(_)
            | Kind::Url
            | Kind::Timezone
            | Kind::Language
            | Kind::Code(_)
            | Kind::Color
            | Kind::Currency => Some(""),
            _ => None,
        }
    }

    /// Checks a raw (trimmed) value against the kind of the field.
    pub fn check(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return if self.required {
                Err("a value is required".to_string())
            } else {
                Ok(())
            };
        }
        match self.kind {
            Kind::Text(max) => {
                if value.chars().count() > max {
                    return Err(format!("longer than {} characters", max));
                }
            }
            Kind::Url => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err("expected an URL starting with http:// or https://".to_string());
                }
                if value.contains(char::is_whitespace) {
                    return Err("URL must not contain spaces".to_string());
                }
            }
            Kind::Timezone => {
                if Tz::from_str(value).is_err() {
                    return Err("unknown timezone".to_string());
                }
            }
            Kind::Language => {
                if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err("expected a two-letter ISO 639-1 code".to_string());
                }
            }
            Kind::Code(codes) => {
                if !codes.contains(&value) {
                    return Err(format!("expected one of {:?}", codes));
                }
            }
            Kind::Date => {
                Date::parse_from_str(value, "%Y%m%d")
                    .map_err(|_| "expected a YYYYMMDD date".to_string())?;
            }
            Kind::Time => {
                value.parse::<Time>().map_err(|e| e.to_string())?;
            }
            Kind::Integer => {
                value
                    .parse::<u32>()
                    .map_err(|_| "expected a non negative integer".to_string())?;
            }
            Kind::Decimal => {
                let decimal = Decimal::from_str(value)
                    .map_err(|_| "expected a decimal number".to_string())?;
                if decimal.is_sign_negative() && !decimal.is_zero() {
                    return Err("expected a non negative number".to_string());
                }
            }
            Kind::Float => {
                let number = value
                    .parse::<f64>()
                    .map_err(|_| "expected a number".to_string())?;
                if !number.is_finite() {
                    return Err("expected a finite number".to_string());
                }
            }
            Kind::Color => {
                if value.len() != 6 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err("expected six hexadecimal digits".to_string());
                }
            }
            Kind::Currency => {
                if iso4217::alpha3(value).is_none() {
                    return Err("unrecognized currency code (ISO-4217)".to_string());
                }
            }
            Kind::Reference(_) | Kind::Multiset(_) => {
                if value.chars().count() > 255 {
                    return Err("longer than 255 characters".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Description of the entity created from one GTFS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Entity name, e.g. `agency`.
    pub entity: &'static str,
    /// GTFS file name, e.g. `agency.txt`.
    pub file: &'static str,
    /// Header mapping of the file.
    pub mapper: FieldMapper,
    /// Attributes read from the file.
    pub fields: &'static [Field],
}

impl EntitySchema {
    /// Returns the field of the given attribute.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Optional attributes absent from mapped headers that have a default
    /// value, with that value. The importer appends them to every row.
    pub fn absent_defaults(&self, headers: &StringRecord) -> Vec<(&'static str, &'static str)> {
        self.fields
            .iter()
            .filter(|field| !headers.iter().any(|header| header == field.name))
            .filter_map(|field| field.default().map(|default| (field.name, default)))
            .collect()
    }

    /// GTFS names of the required columns absent from mapped headers.
    pub fn missing_columns(&self, headers: &StringRecord) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .filter(|field| !headers.iter().any(|header| header == field.name))
            .map(|field| self.mapper.column(field.name))
            .collect()
    }

    /// Checks every known value of a row, returning the first violation as
    /// `(attribute, value, reason)`. Unknown columns are ignored.
    pub fn check_row<'r>(
        &self,
        headers: &StringRecord,
        record: &'r StringRecord,
    ) -> Result<(), (&'static str, &'r str, String)> {
        for (header, value) in headers.iter().zip(record.iter()) {
            if let Some(field) = self.field(header) {
                field
                    .check(value)
                    .map_err(|reason| (field.name, value, reason))?;
            }
        }
        Ok(())
    }
}

const BOOL: Kind = Kind::Code(&["0", "1"]);
const TEXT: Kind = Kind::Text(255);

/// `agency.txt`
pub static AGENCY: EntitySchema = EntitySchema {
    entity: "agency",
    file: "agency.txt",
    mapper: field_mapper::AGENCY,
    fields: &[
        Field::optional("agency_id", TEXT, "Unique identifier for transit agency"),
        Field::required("name", TEXT, "Full name of the transit agency"),
        Field::optional("url", Kind::Url, "URL of the transit agency"),
        Field::required("timezone", Kind::Timezone, "Timezone of the agency"),
        Field::optional(
            "lang",
            Kind::Language,
            "ISO 639-1 code for the primary language",
        ),
        Field::optional("phone", TEXT, "Voice telephone number"),
        Field::optional("fare_url", Kind::Url, "URL for purchasing tickets online"),
    ],
};

/// `routes.txt`
pub static ROUTE: EntitySchema = EntitySchema {
    entity: "route",
    file: "routes.txt",
    mapper: field_mapper::ROUTE,
    fields: &[
        Field::required("route_id", TEXT, "Unique identifier for a route"),
        Field::optional(
            "agency_id",
            Kind::Reference("agency"),
            "Agency operating the route",
        ),
        Field::optional("short_name", Kind::Text(63), "Short name of the route"),
        Field::optional("long_name", TEXT, "Full name of the route"),
        Field::optional("desc", Kind::Text(4096), "Description of the route"),
        Field::required(
            "rtype",
            Kind::Integer,
            "Type of transportation used on the route",
        ),
        Field::optional("url", Kind::Url, "Web page about the route"),
        Field::optional("color", Kind::Color, "Color of the route"),
        Field::optional("text_color", Kind::Color, "Color of the route text"),
    ],
};

const WEEKDAY_HELP: &str = "Is the service active on this day of the week?";

/// `calendar.txt`
pub static SERVICE: EntitySchema = EntitySchema {
    entity: "service",
    file: "calendar.txt",
    mapper: field_mapper::SERVICE,
    fields: &[
        Field::required("service_id", TEXT, "Unique identifier for service dates"),
        Field::required("monday", BOOL, WEEKDAY_HELP),
        Field::required("tuesday", BOOL, WEEKDAY_HELP),
        Field::required("wednesday", BOOL, WEEKDAY_HELP),
        Field::required("thursday", BOOL, WEEKDAY_HELP),
        Field::required("friday", BOOL, WEEKDAY_HELP),
        Field::required("saturday", BOOL, WEEKDAY_HELP),
        Field::required("sunday", BOOL, WEEKDAY_HELP),
        Field::required("start_date", Kind::Date, "Start date for service"),
        Field::required("end_date", Kind::Date, "End date for service"),
    ],
};

/// `calendar_dates.txt`
pub static SERVICE_DATE: EntitySchema = EntitySchema {
    entity: "service date",
    file: "calendar_dates.txt",
    mapper: field_mapper::SERVICE_DATE,
    fields: &[
        Field::required(
            "service_id",
            Kind::Reference("service"),
            "Service that is modified on this date",
        ),
        Field::required("date", Kind::Date, "Date of the service exception"),
        Field::required(
            "exception_type",
            Kind::Code(&["1", "2"]),
            "Is service added (1) or removed (2) on this date?",
        ),
    ],
};

/// `stops.txt`
pub static STOP: EntitySchema = EntitySchema {
    entity: "stop",
    file: "stops.txt",
    mapper: field_mapper::STOP,
    fields: &[
        Field::required("stop_id", TEXT, "Unique identifier for a stop or station"),
        Field::optional("code", TEXT, "Identifier (short text or number) for passengers"),
        Field::required("name", TEXT, "Name of stop in local vernacular"),
        Field::optional("desc", TEXT, "Description of a stop"),
        Field::required("lat", Kind::Float, "WGS 84 latitude of stop or station"),
        Field::required("lon", Kind::Float, "WGS 84 longitude of stop or station"),
        Field::optional("zone_id", Kind::Reference("zone"), "Fare zone for a stop"),
        Field::optional("url", Kind::Url, "URL for the stop"),
        Field::optional(
            "location_type",
            Kind::Code(&["0", "1", "2", "3", "4"]),
            "Is this a stop (0), a station (1) or a station part (2, 3, 4)?",
        ),
        Field::optional(
            "parent_station",
            Kind::Reference("stop"),
            "The station associated with the stop",
        ),
        Field::optional("timezone", Kind::Timezone, "Timezone of the stop"),
        Field::optional(
            "wheelchair_boarding",
            Kind::Code(&["0", "1", "2"]),
            "Is wheelchair boarding possible?",
        ),
    ],
};

/// `shapes.txt`
pub static SHAPE_POINT: EntitySchema = EntitySchema {
    entity: "shape point",
    file: "shapes.txt",
    mapper: field_mapper::SHAPE_POINT,
    fields: &[
        Field::required(
            "shape_id",
            Kind::Reference("shape"),
            "The shape this point belongs to",
        ),
        Field::required("lat", Kind::Float, "WGS 84 latitude of point"),
        Field::required("lon", Kind::Float, "WGS 84 longitude of point"),
        Field::required(
            "sequence",
            Kind::Integer,
            "Sequence order along the shape",
        ),
        Field::optional(
            "traveled",
            Kind::Float,
            "Distance of point from start of shape",
        ),
    ],
};

/// `trips.txt`
pub static TRIP: EntitySchema = EntitySchema {
    entity: "trip",
    file: "trips.txt",
    mapper: field_mapper::TRIP,
    fields: &[
        Field::required("route_id", Kind::Reference("route"), "Route for the trip"),
        Field::required(
            "service_id",
            Kind::Multiset("service"),
            "Services during which the trip runs",
        ),
        Field::required("trip_id", TEXT, "Unique identifier for a trip"),
        Field::optional("headsign", TEXT, "Destination identification for passengers"),
        Field::optional("short_name", TEXT, "Short name used in schedules and signboards"),
        Field::optional(
            "direction",
            Kind::Code(&["0", "1"]),
            "Direction for bi-directional routes",
        ),
        Field::optional(
            "block_id",
            Kind::Reference("block"),
            "Block of sequential trips that this trip belongs to",
        ),
        Field::optional(
            "shape_id",
            Kind::Reference("shape"),
            "Shape used for this trip",
        ),
        Field::optional(
            "wheelchair_accessible",
            Kind::Code(&["0", "1", "2"]),
            "Are there accommodations for riders with wheelchair?",
        ),
        Field::optional(
            "bikes_allowed",
            Kind::Code(&["0", "1", "2"]),
            "Are bicycles allowed?",
        ),
    ],
};

const PICKUP_HELP: &str = "Regular (0), none (1), phone agency (2) or ask driver (3)";

/// `stop_times.txt`
pub static STOP_TIME: EntitySchema = EntitySchema {
    entity: "stop time",
    file: "stop_times.txt",
    mapper: field_mapper::STOP_TIME,
    fields: &[
        Field::required("trip_id", Kind::Reference("trip"), "Trip for this stop time"),
        Field::optional("arrival_time", Kind::Time, "Arrival time at the stop"),
        Field::optional("departure_time", Kind::Time, "Departure time from the stop"),
        Field::required("stop_id", Kind::Reference("stop"), "Stop of this stop time"),
        Field::required(
            "stop_sequence",
            Kind::Integer,
            "Order of the stop for this trip",
        ),
        Field::optional("stop_headsign", TEXT, "Headsign at this stop"),
        Field::optional("pickup_type", Kind::Code(&["0", "1", "2", "3"]), PICKUP_HELP),
        Field::optional("drop_off_type", Kind::Code(&["0", "1", "2", "3"]), PICKUP_HELP),
        Field::optional(
            "traveled",
            Kind::Float,
            "Distance of stop from start of shape",
        ),
    ],
};

/// `frequencies.txt`
pub static FREQUENCY: EntitySchema = EntitySchema {
    entity: "frequency",
    file: "frequencies.txt",
    mapper: field_mapper::FREQUENCY,
    fields: &[
        Field::required("trip_id", Kind::Reference("trip"), "Trip run at this frequency"),
        Field::required("start_time", Kind::Time, "Time that the service begins"),
        Field::required("end_time", Kind::Time, "Time that the service ends"),
        Field::required(
            "headway_secs",
            Kind::Integer,
            "Time in seconds between departures",
        ),
        Field::optional(
            "exact_times",
            BOOL,
            "Are the times exact (1) or estimated (0)?",
        ),
    ],
};

/// `fare_attributes.txt`
pub static FARE: EntitySchema = EntitySchema {
    entity: "fare",
    file: "fare_attributes.txt",
    mapper: field_mapper::FARE,
    fields: &[
        Field::required("fare_id", TEXT, "Unique identifier for a fare class"),
        Field::required("price", Kind::Decimal, "Fare price, in units of currency"),
        Field::required("currency_type", Kind::Currency, "ISO 4217 code for currency"),
        Field::required(
            "payment_method",
            BOOL,
            "When is the fare paid: on board (0) or before boarding (1)?",
        ),
        Field::optional(
            "transfers",
            Kind::Code(&["0", "1", "2"]),
            "Number of transfers permitted, empty for unlimited",
        ),
        Field::optional(
            "transfer_duration",
            Kind::Integer,
            "Time in seconds until a ticket or transfer expires",
        ),
    ],
};

/// `fare_rules.txt`
pub static FARE_RULE: EntitySchema = EntitySchema {
    entity: "fare rule",
    file: "fare_rules.txt",
    mapper: field_mapper::FARE_RULE,
    fields: &[
        Field::required("fare_id", Kind::Reference("fare"), "Fare class"),
        Field::optional(
            "route_id",
            Kind::Reference("route"),
            "Fare class is valid for this route",
        ),
        Field::optional(
            "origin",
            Kind::Reference("zone"),
            "Fare class is valid for travel originating in this zone",
        ),
        Field::optional(
            "destination",
            Kind::Reference("zone"),
            "Fare class is valid for travel ending in this zone",
        ),
        Field::optional(
            "contains",
            Kind::Reference("zone"),
            "Fare class is valid for travel within this zone",
        ),
    ],
};

/// `transfers.txt`
pub static TRANSFER: EntitySchema = EntitySchema {
    entity: "transfer",
    file: "transfers.txt",
    mapper: field_mapper::TRANSFER,
    fields: &[
        Field::required("from_stop_id", Kind::Reference("stop"), "Stop to transfer from"),
        Field::required("to_stop_id", Kind::Reference("stop"), "Stop to transfer to"),
        Field::required(
            "transfer_type",
            Kind::Code(&["0", "1", "2", "3"]),
            "Type of transfer",
        ),
        Field::optional(
            "min_transfer_time",
            Kind::Integer,
            "How many seconds are required to transfer?",
        ),
    ],
};

/// `feed_info.txt`
pub static FEED_INFO: EntitySchema = EntitySchema {
    entity: "feed info",
    file: "feed_info.txt",
    mapper: field_mapper::FEED_INFO,
    fields: &[
        Field::required("publisher_name", TEXT, "Full name of organization that publishes the feed"),
        Field::required("publisher_url", Kind::Url, "URL of the feed publishing organization"),
        Field::required("lang", Kind::Text(20), "IETF BCP 47 language code used in the feed"),
        Field::optional("start_date", Kind::Date, "Date that feed starts providing reliable data"),
        Field::optional("end_date", Kind::Date, "Date that feed stops providing reliable data"),
        Field::optional("version", TEXT, "String that indicates the current version of the feed"),
    ],
};
