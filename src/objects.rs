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

//! The different objects contained in a GTFS feed.
//!
//! Every record belongs to one [`Feed`] and refers to the other records
//! through the typed indices handed out by the storage.

#![allow(missing_docs)]

use crate::storage::Record;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use typed_index_collection::Idx;

pub type Date = chrono::NaiveDate;

/// Time of the service day, stored as seconds since midnight.
/// Hours may exceed 24 for trips running past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(u32);

impl Time {
    pub fn new(h: u32, m: u32, s: u32) -> Time {
        Time(h * 60 * 60 + m * 60 + s)
    }
    pub fn hours(self) -> u32 {
        self.0 / 60 / 60
    }
    pub fn minutes(self) -> u32 {
        self.0 / 60 % 60
    }
    pub fn seconds(self) -> u32 {
        self.0 % 60
    }
    pub fn total_seconds(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("wrong time format, expected HH:MM:SS")]
    WrongFormat,
    #[error("time out of range, minutes and seconds must be lower than 60")]
    WrongValue,
}

impl FromStr for Time {
    type Err = TimeError;
    fn from_str(time: &str) -> Result<Self, Self::Err> {
        let mut t = time.split(':');
        let (hours, minutes, seconds) = match (t.next(), t.next(), t.next(), t.next()) {
            (Some(h), Some(m), Some(s), None) => (h, m, s),
            _ => return Err(TimeError::WrongFormat),
        };
        if minutes.len() != 2 || seconds.len() != 2 {
            return Err(TimeError::WrongFormat);
        }
        let parse = |s: &str| s.parse::<u32>().map_err(|_| TimeError::WrongFormat);
        let (hours, minutes, seconds) = (parse(hours)?, parse(minutes)?, parse(seconds)?);
        if minutes > 59 || seconds > 59 {
            return Err(TimeError::WrongValue);
        }
        hours
            .checked_mul(60 * 60)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .map(Time)
            .ok_or(TimeError::WrongValue)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Time, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let time = String::deserialize(deserializer)?;
        time.parse().map_err(serde::de::Error::custom)
    }
}

/// One complete GTFS dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub name: String,
}

/// A transit agency that provides the data in this feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Agency {
    pub feed: Idx<Feed>,
    pub agency_id: String,
    pub name: String,
    pub url: String,
    pub timezone: String,
    pub lang: String,
    pub phone: String,
    pub fare_url: String,
}

impl Record for Agency {
    const ENTITY: &'static str = "agency";
    // agency_id is indexed, several agencies of a feed may share it
    const UNIQUE_KEY: bool = false;
    fn feed(&self) -> Idx<Feed> {
        self.feed
    }
    fn natural_key(&self) -> Option<&str> {
        Some(&self.agency_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub feed: Idx<Feed>,
    pub route_id: String,
    pub agency: Option<Idx<Agency>>,
    pub short_name: String,
    pub long_name: String,
    pub desc: String,
    pub rtype: u32,
    pub url: String,
    pub color: String,
    pub text_color: String,
}

/// Dates on which a set of trips run.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub feed: Idx<Feed>,
    pub service_id: String,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    /// `None` for services only defined by `calendar_dates.txt`.
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl Service {
    /// A service without regular weekly dates.
    pub fn without_calendar(feed: Idx<Feed>, service_id: String) -> Self {
        Service {
            feed,
            service_id,
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    #[serde(rename = "1")]
    Add,
    #[serde(rename = "2")]
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDate {
    pub feed: Idx<Feed>,
    pub service: Idx<Service>,
    pub date: Date,
    pub exception_type: ExceptionType,
}

/// Fare zone, only known through the `zone_id` of stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub feed: Idx<Feed>,
    pub zone_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub feed: Idx<Feed>,
    pub stop_id: String,
    pub code: String,
    pub name: String,
    pub desc: String,
    pub lat: f64,
    pub lon: f64,
    pub zone: Option<Idx<Zone>>,
    pub url: String,
    pub location_type: String,
    pub parent_station: Option<Idx<Stop>>,
    pub timezone: String,
    pub wheelchair_boarding: String,
}

/// Sequential trips made with the same vehicle, only known through the
/// `block_id` of trips.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub feed: Idx<Feed>,
    pub block_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub feed: Idx<Feed>,
    pub shape_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapePoint {
    pub feed: Idx<Feed>,
    pub shape: Idx<Shape>,
    pub lat: f64,
    pub lon: f64,
    pub sequence: u32,
    pub traveled: Option<f64>,
}

/// A trip of a route. The services it runs under are stored as links,
/// see [`crate::storage::ServiceLinks`].
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub feed: Idx<Feed>,
    pub route: Idx<Route>,
    pub trip_id: String,
    pub headsign: String,
    pub short_name: String,
    pub direction: String,
    pub block: Option<Idx<Block>>,
    pub shape: Option<Idx<Shape>>,
    pub wheelchair_accessible: String,
    pub bikes_allowed: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub feed: Idx<Feed>,
    pub trip: Idx<Trip>,
    pub stop: Idx<Stop>,
    pub arrival_time: Option<Time>,
    pub departure_time: Option<Time>,
    pub stop_sequence: u32,
    pub stop_headsign: String,
    pub pickup_type: String,
    pub drop_off_type: String,
    pub traveled: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    pub feed: Idx<Feed>,
    pub trip: Idx<Trip>,
    pub start_time: Time,
    pub end_time: Time,
    pub headway_secs: u32,
    pub exact_times: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fare {
    pub feed: Idx<Feed>,
    pub fare_id: String,
    pub price: Decimal,
    pub currency_type: String,
    pub payment_method: String,
    /// `None` means unlimited transfers.
    pub transfers: Option<u8>,
    pub transfer_duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FareRule {
    pub feed: Idx<Feed>,
    pub fare: Idx<Fare>,
    pub route: Option<Idx<Route>>,
    pub origin: Option<Idx<Zone>>,
    pub destination: Option<Idx<Zone>>,
    pub contains: Option<Idx<Zone>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub feed: Idx<Feed>,
    pub from_stop: Idx<Stop>,
    pub to_stop: Idx<Stop>,
    pub transfer_type: String,
    pub min_transfer_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedInfo {
    pub feed: Idx<Feed>,
    pub publisher_name: String,
    pub publisher_url: String,
    pub lang: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub version: String,
}

macro_rules! impl_record {
    ($ty:ty, $entity:expr) => {
        impl Record for $ty {
            const ENTITY: &'static str = $entity;
            fn feed(&self) -> Idx<Feed> {
                self.feed
            }
        }
    };
    ($ty:ty, $entity:expr, $key:ident) => {
        impl Record for $ty {
            const ENTITY: &'static str = $entity;
            fn feed(&self) -> Idx<Feed> {
                self.feed
            }
            fn natural_key(&self) -> Option<&str> {
                Some(&self.$key)
            }
        }
    };
}

impl_record!(Route, "route", route_id);
impl_record!(Service, "service", service_id);
impl_record!(ServiceDate, "service date");
impl_record!(Zone, "zone", zone_id);
impl_record!(Stop, "stop", stop_id);
impl_record!(Block, "block", block_id);
impl_record!(Shape, "shape", shape_id);
impl_record!(ShapePoint, "shape point");
impl_record!(Trip, "trip", trip_id);
impl_record!(StopTime, "stop time");
impl_record!(Frequency, "frequency");
impl_record!(Fare, "fare", fare_id);
impl_record!(FareRule, "fare rule");
impl_record!(Transfer, "transfer");
impl_record!(FeedInfo, "feed info");
