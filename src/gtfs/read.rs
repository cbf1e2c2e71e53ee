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

use crate::{
    configuration::ErrorPolicy,
    error::{ImportError, StorageError},
    objects::*,
    schema::{self, EntitySchema},
    serde_utils::*,
    storage::{Record, ServiceLinks, Storage},
    Result,
};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};
use skip_error::skip_error_and_warn;
use std::io::Read;
use tracing::{debug, info, warn};
use typed_index_collection::Idx;

// Propagates the error of a row, or logs it and goes on with the next row.
macro_rules! handle_row {
    ($outcome:expr, $on_error:expr) => {
        match $on_error {
            ErrorPolicy::Abort => $outcome?,
            ErrorPolicy::Skip => skip_error_and_warn!($outcome),
        }
    };
}

#[derive(Deserialize, Debug)]
struct AgencyRow {
    agency_id: String,
    name: String,
    url: String,
    timezone: String,
    lang: String,
    phone: String,
    fare_url: String,
}

#[derive(Deserialize, Debug)]
struct RouteRow {
    route_id: String,
    #[serde(default)]
    agency_id: Option<String>,
    short_name: String,
    long_name: String,
    desc: String,
    rtype: u32,
    url: String,
    color: String,
    text_color: String,
}

#[derive(Deserialize, Debug)]
struct ServiceRow {
    service_id: String,
    #[serde(deserialize_with = "de_from_u8")]
    monday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    tuesday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    wednesday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    thursday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    friday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    saturday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    sunday: bool,
    #[serde(deserialize_with = "de_from_date_string")]
    start_date: Date,
    #[serde(deserialize_with = "de_from_date_string")]
    end_date: Date,
}

#[derive(Deserialize, Debug)]
struct ServiceDateRow {
    service_id: String,
    #[serde(deserialize_with = "de_from_date_string")]
    date: Date,
    exception_type: ExceptionType,
}

#[derive(Deserialize, Debug)]
struct StopRow {
    stop_id: String,
    code: String,
    name: String,
    desc: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    zone_id: Option<String>,
    url: String,
    location_type: String,
    #[serde(default)]
    parent_station: Option<String>,
    timezone: String,
    wheelchair_boarding: String,
}

#[derive(Deserialize, Debug)]
struct ShapePointRow {
    shape_id: String,
    lat: f64,
    lon: f64,
    sequence: u32,
    #[serde(default)]
    traveled: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct TripRow {
    route_id: String,
    service_id: String,
    trip_id: String,
    headsign: String,
    short_name: String,
    direction: String,
    #[serde(default)]
    block_id: Option<String>,
    #[serde(default)]
    shape_id: Option<String>,
    wheelchair_accessible: String,
    bikes_allowed: String,
}

#[derive(Deserialize, Debug)]
struct StopTimeRow {
    trip_id: String,
    #[serde(default)]
    arrival_time: Option<Time>,
    #[serde(default)]
    departure_time: Option<Time>,
    stop_id: String,
    stop_sequence: u32,
    stop_headsign: String,
    pickup_type: String,
    drop_off_type: String,
    #[serde(default)]
    traveled: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct FrequencyRow {
    trip_id: String,
    start_time: Time,
    end_time: Time,
    headway_secs: u32,
    exact_times: String,
}

#[derive(Deserialize, Debug)]
struct FareRow {
    fare_id: String,
    #[serde(deserialize_with = "de_decimal")]
    price: Decimal,
    currency_type: String,
    payment_method: String,
    #[serde(default)]
    transfers: Option<u8>,
    #[serde(default)]
    transfer_duration: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct FareRuleRow {
    fare_id: String,
    #[serde(default)]
    route_id: Option<String>,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    contains: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TransferRow {
    from_stop_id: String,
    to_stop_id: String,
    transfer_type: String,
    #[serde(default)]
    min_transfer_time: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct FeedInfoRow {
    publisher_name: String,
    publisher_url: String,
    lang: String,
    #[serde(default, deserialize_with = "de_option_from_date_string")]
    start_date: Option<Date>,
    #[serde(default, deserialize_with = "de_option_from_date_string")]
    end_date: Option<Date>,
    version: String,
}

/// Reads the rows of a GTFS file and hands them to `import_row` with their
/// line number.
///
/// The headers are translated with the mapper of the schema and every
/// required column must be present. Absent optional columns get the default
/// value of their field. Each row is checked against the schema before being
/// deserialized with the translated headers.
fn import_rows<R, T, F>(
    reader: R,
    schema: &'static EntitySchema,
    on_error: ErrorPolicy,
    mut import_row: F,
) -> Result<()>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T, u64) -> Result<(), ImportError>,
{
    let file = schema.file;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|source| ImportError::Csv { file, source })?;
    // a UTF-8 byte order mark sticks to the first header
    let headers: StringRecord = headers
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}'))
        .collect();
    let mut headers = schema.mapper.map_headers(&headers);
    if let Some(column) = schema.missing_columns(&headers).into_iter().next() {
        return Err(ImportError::MissingColumn { file, column }.into());
    }
    let defaults = schema.absent_defaults(&headers);
    for (name, _) in &defaults {
        headers.push_field(name);
    }

    let mut count = 0;
    for record in rdr.records() {
        let mut record = record.map_err(|source| ImportError::Csv { file, source })?;
        let line = record.position().map_or(0, |position| position.line());
        for (_, default) in &defaults {
            record.push_field(default);
        }
        let outcome =
            read_row(schema, &headers, &record, line).and_then(|row| import_row(row, line));
        handle_row!(outcome, on_error);
        count += 1;
    }
    info!("{} {} records imported from {}", count, schema.entity, file);
    Ok(())
}

fn read_row<T: DeserializeOwned>(
    schema: &'static EntitySchema,
    headers: &StringRecord,
    record: &StringRecord,
    line: u64,
) -> Result<T, ImportError> {
    let file = schema.file;
    schema
        .check_row(headers, record)
        .map_err(|(field, value, reason)| ImportError::InvalidValue {
            file,
            line,
            field,
            value: value.to_string(),
            reason,
        })?;
    record
        .deserialize(Some(headers))
        .map_err(|source| ImportError::Csv { file, source })
}

fn create<T, S>(storage: &mut S, record: T, file: &'static str, line: u64) -> Result<Idx<T>, ImportError>
where
    T: Record,
    S: Storage<T> + ?Sized,
{
    storage
        .create(record)
        .map_err(|source| ImportError::Storage { file, line, source })
}

fn resolve<T, S>(
    storage: &S,
    feed: Idx<Feed>,
    key: &str,
    file: &'static str,
    line: u64,
) -> Result<Idx<T>, ImportError>
where
    T: Record,
    S: Storage<T> + ?Sized,
{
    storage
        .find(feed, key)
        .ok_or_else(|| ImportError::NotFound {
            file,
            line,
            entity: T::ENTITY,
            key: key.to_string(),
        })
}

// An absent or empty reference is `None`, an unknown one is an error.
fn resolve_optional<T, S>(
    storage: &S,
    feed: Idx<Feed>,
    key: Option<&str>,
    file: &'static str,
    line: u64,
) -> Result<Option<Idx<T>>, ImportError>
where
    T: Record,
    S: Storage<T> + ?Sized,
{
    match key.filter(|key| !key.is_empty()) {
        Some(key) => resolve(storage, feed, key, file, line).map(Some),
        None => Ok(None),
    }
}

fn get_or_create<T, S, F>(
    storage: &mut S,
    feed: Idx<Feed>,
    key: &str,
    file: &'static str,
    line: u64,
    new: F,
) -> Result<Idx<T>, ImportError>
where
    T: Record,
    S: Storage<T> + ?Sized,
    F: FnOnce() -> T,
{
    if let Some(idx) = storage.find(feed, key) {
        return Ok(idx);
    }
    debug!("{}:{}: creating {} {:?}", file, line, T::ENTITY, key);
    create(storage, new(), file, line)
}

fn get_or_create_zone<S>(
    storage: &mut S,
    feed: Idx<Feed>,
    zone_id: Option<&str>,
    file: &'static str,
    line: u64,
) -> Result<Option<Idx<Zone>>, ImportError>
where
    S: Storage<Zone> + ?Sized,
{
    match zone_id.filter(|zone_id| !zone_id.is_empty()) {
        Some(zone_id) => get_or_create(storage, feed, zone_id, file, line, || Zone {
            feed,
            zone_id: zone_id.to_string(),
        })
        .map(Some),
        None => Ok(None),
    }
}

/// Imports `agency.txt`: one [`Agency`] per row.
pub fn import_agency_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Agency>,
{
    let file = schema::AGENCY.file;
    import_rows(reader, &schema::AGENCY, on_error, |row: AgencyRow, line| {
        if row.url.is_empty() {
            warn!("{}:{}: agency {:?} has no url", file, line, row.name);
        }
        create(
            storage,
            Agency {
                feed,
                agency_id: row.agency_id,
                name: row.name,
                url: row.url,
                timezone: row.timezone,
                lang: row.lang,
                phone: row.phone,
                fare_url: row.fare_url,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `routes.txt`, linking each [`Route`] to its agency when given.
pub fn import_routes_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Agency> + Storage<Route>,
{
    let file = schema::ROUTE.file;
    import_rows(reader, &schema::ROUTE, on_error, |row: RouteRow, line| {
        let agency =
            resolve_optional::<Agency, _>(storage, feed, row.agency_id.as_deref(), file, line)?;
        create::<Route, _>(
            storage,
            Route {
                feed,
                route_id: row.route_id,
                agency,
                short_name: row.short_name,
                long_name: row.long_name,
                desc: row.desc,
                rtype: row.rtype,
                url: row.url,
                color: row.color,
                text_color: row.text_color,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `calendar.txt`: one [`Service`] per row.
pub fn import_calendar_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Service>,
{
    let file = schema::SERVICE.file;
    import_rows(reader, &schema::SERVICE, on_error, |row: ServiceRow, line| {
        if row.end_date < row.start_date {
            warn!(
                "{}:{}: service {:?} ends before it starts",
                file, line, row.service_id
            );
        }
        create(
            storage,
            Service {
                feed,
                service_id: row.service_id,
                monday: row.monday,
                tuesday: row.tuesday,
                wednesday: row.wednesday,
                thursday: row.thursday,
                friday: row.friday,
                saturday: row.saturday,
                sunday: row.sunday,
                start_date: Some(row.start_date),
                end_date: Some(row.end_date),
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `calendar_dates.txt`. A service only defined by its exceptions
/// is created with its first date.
pub fn import_calendar_dates_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Service> + Storage<ServiceDate>,
{
    let file = schema::SERVICE_DATE.file;
    import_rows(reader, &schema::SERVICE_DATE, on_error, |row: ServiceDateRow, line| {
        let service = get_or_create::<Service, _, _>(storage, feed, &row.service_id, file, line, || {
            Service::without_calendar(feed, row.service_id.clone())
        })?;
        create::<ServiceDate, _>(
            storage,
            ServiceDate {
                feed,
                service,
                date: row.date,
                exception_type: row.exception_type,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `stops.txt`.
///
/// A `parent_station` may be defined anywhere in the file: stops are
/// created once their parent exists, and a parent that never shows up is
/// reported as not found.
pub fn import_stops_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Zone> + Storage<Stop>,
{
    let file = schema::STOP.file;
    let mut pending = Vec::new();
    import_rows(reader, &schema::STOP, on_error, |row: StopRow, line| {
        pending.push((row, line));
        Ok(())
    })?;

    while !pending.is_empty() {
        let waiting_before = pending.len();
        let mut waiting = Vec::new();
        for (row, line) in pending {
            let parent_station = match row.parent_station.as_deref().filter(|p| !p.is_empty()) {
                None => None,
                Some(parent_id) => match <S as Storage<Stop>>::find(storage, feed, parent_id) {
                    Some(parent) => Some(parent),
                    None => {
                        waiting.push((row, line));
                        continue;
                    }
                },
            };
            handle_row!(create_stop(storage, feed, row, parent_station, line), on_error);
        }
        if waiting.len() == waiting_before {
            for (row, line) in waiting {
                let not_found: Result<(), ImportError> = Err(ImportError::NotFound {
                    file,
                    line,
                    entity: Stop::ENTITY,
                    key: row.parent_station.unwrap_or_default(),
                });
                handle_row!(not_found, on_error);
            }
            break;
        }
        pending = waiting;
    }
    Ok(())
}

// The zone is only created along with the stop.
fn create_stop<S>(
    storage: &mut S,
    feed: Idx<Feed>,
    row: StopRow,
    parent_station: Option<Idx<Stop>>,
    line: u64,
) -> Result<(), ImportError>
where
    S: Storage<Zone> + Storage<Stop>,
{
    let file = schema::STOP.file;
    if <S as Storage<Stop>>::find(storage, feed, &row.stop_id).is_some() {
        return Err(ImportError::Storage {
            file,
            line,
            source: StorageError::DuplicateKey {
                entity: Stop::ENTITY,
                key: row.stop_id,
            },
        });
    }
    let zone = get_or_create_zone(storage, feed, row.zone_id.as_deref(), file, line)?;
    let stop = Stop {
        feed,
        stop_id: row.stop_id,
        code: row.code,
        name: row.name,
        desc: row.desc,
        lat: row.lat,
        lon: row.lon,
        zone,
        url: row.url,
        location_type: row.location_type,
        parent_station,
        timezone: row.timezone,
        wheelchair_boarding: row.wheelchair_boarding,
    };
    create::<Stop, _>(storage, stop, file, line)?;
    Ok(())
}

/// Imports `shapes.txt`, creating each [`Shape`] with its first point.
pub fn import_shapes_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Shape> + Storage<ShapePoint>,
{
    let file = schema::SHAPE_POINT.file;
    import_rows(reader, &schema::SHAPE_POINT, on_error, |row: ShapePointRow, line| {
        let shape = get_or_create::<Shape, _, _>(storage, feed, &row.shape_id, file, line, || Shape {
            feed,
            shape_id: row.shape_id.clone(),
        })?;
        create::<ShapePoint, _>(
            storage,
            ShapePoint {
                feed,
                shape,
                lat: row.lat,
                lon: row.lon,
                sequence: row.sequence,
                traveled: row.traveled,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `trips.txt`.
///
/// Rows sharing a `trip_id` describe the same [`Trip`] running under
/// several services: the trip is created by the first row and each row
/// links it to its service.
pub fn import_trips_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Route> + Storage<Service> + Storage<Block> + Storage<Shape> + Storage<Trip> + ServiceLinks,
{
    let file = schema::TRIP.file;
    import_rows(reader, &schema::TRIP, on_error, |row: TripRow, line| {
        let route = resolve::<Route, _>(storage, feed, &row.route_id, file, line)?;
        let service = resolve::<Service, _>(storage, feed, &row.service_id, file, line)?;
        let shape = resolve_optional::<Shape, _>(storage, feed, row.shape_id.as_deref(), file, line)?;

        let trip = match <S as Storage<Trip>>::find(storage, feed, &row.trip_id) {
            Some(trip) => {
                if <S as Storage<Trip>>::get(storage, trip).route != route {
                    warn!(
                        "{}:{}: trip {:?} already exists with another route, route {:?} ignored",
                        file, line, row.trip_id, row.route_id
                    );
                }
                trip
            }
            None => {
                let block = match row.block_id.as_deref().filter(|b| !b.is_empty()) {
                    Some(block_id) => Some(get_or_create::<Block, _, _>(
                        storage,
                        feed,
                        block_id,
                        file,
                        line,
                        || Block {
                            feed,
                            block_id: block_id.to_string(),
                        },
                    )?),
                    None => None,
                };
                create::<Trip, _>(
                    storage,
                    Trip {
                        feed,
                        route,
                        trip_id: row.trip_id.clone(),
                        headsign: row.headsign,
                        short_name: row.short_name,
                        direction: row.direction,
                        block,
                        shape,
                        wheelchair_accessible: row.wheelchair_accessible,
                        bikes_allowed: row.bikes_allowed,
                    },
                    file,
                    line,
                )?
            }
        };
        if !storage.link_service(trip, service) {
            debug!(
                "{}:{}: trip {:?} already runs under service {:?}",
                file, line, row.trip_id, row.service_id
            );
        }
        Ok(())
    })
}

/// Imports `stop_times.txt`.
pub fn import_stop_times_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Trip> + Storage<Stop> + Storage<StopTime>,
{
    let file = schema::STOP_TIME.file;
    import_rows(reader, &schema::STOP_TIME, on_error, |row: StopTimeRow, line| {
        let trip = resolve::<Trip, _>(storage, feed, &row.trip_id, file, line)?;
        let stop = resolve::<Stop, _>(storage, feed, &row.stop_id, file, line)?;
        create::<StopTime, _>(
            storage,
            StopTime {
                feed,
                trip,
                stop,
                arrival_time: row.arrival_time,
                departure_time: row.departure_time,
                stop_sequence: row.stop_sequence,
                stop_headsign: row.stop_headsign,
                pickup_type: row.pickup_type,
                drop_off_type: row.drop_off_type,
                traveled: row.traveled,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `frequencies.txt`.
pub fn import_frequencies_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Trip> + Storage<Frequency>,
{
    let file = schema::FREQUENCY.file;
    import_rows(reader, &schema::FREQUENCY, on_error, |row: FrequencyRow, line| {
        let trip = resolve::<Trip, _>(storage, feed, &row.trip_id, file, line)?;
        create::<Frequency, _>(
            storage,
            Frequency {
                feed,
                trip,
                start_time: row.start_time,
                end_time: row.end_time,
                headway_secs: row.headway_secs,
                exact_times: row.exact_times,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `fare_attributes.txt`.
pub fn import_fare_attributes_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Fare>,
{
    let file = schema::FARE.file;
    import_rows(reader, &schema::FARE, on_error, |row: FareRow, line| {
        create(
            storage,
            Fare {
                feed,
                fare_id: row.fare_id,
                price: row.price,
                currency_type: row.currency_type,
                payment_method: row.payment_method,
                transfers: row.transfers,
                transfer_duration: row.transfer_duration,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `fare_rules.txt`. Zones are created when first referenced.
pub fn import_fare_rules_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Fare> + Storage<Route> + Storage<Zone> + Storage<FareRule>,
{
    let file = schema::FARE_RULE.file;
    import_rows(reader, &schema::FARE_RULE, on_error, |row: FareRuleRow, line| {
        let fare = resolve::<Fare, _>(storage, feed, &row.fare_id, file, line)?;
        let route = resolve_optional::<Route, _>(storage, feed, row.route_id.as_deref(), file, line)?;
        let origin = get_or_create_zone(storage, feed, row.origin.as_deref(), file, line)?;
        let destination = get_or_create_zone(storage, feed, row.destination.as_deref(), file, line)?;
        let contains = get_or_create_zone(storage, feed, row.contains.as_deref(), file, line)?;
        create::<FareRule, _>(
            storage,
            FareRule {
                feed,
                fare,
                route,
                origin,
                destination,
                contains,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `transfers.txt`.
pub fn import_transfers_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<Stop> + Storage<Transfer>,
{
    let file = schema::TRANSFER.file;
    import_rows(reader, &schema::TRANSFER, on_error, |row: TransferRow, line| {
        let from_stop = resolve::<Stop, _>(storage, feed, &row.from_stop_id, file, line)?;
        let to_stop = resolve::<Stop, _>(storage, feed, &row.to_stop_id, file, line)?;
        create::<Transfer, _>(
            storage,
            Transfer {
                feed,
                from_stop,
                to_stop,
                transfer_type: row.transfer_type,
                min_transfer_time: row.min_transfer_time,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

/// Imports `feed_info.txt`.
pub fn import_feed_info_txt<R, S>(
    reader: R,
    feed: Idx<Feed>,
    storage: &mut S,
    on_error: ErrorPolicy,
) -> Result<()>
where
    R: Read,
    S: Storage<FeedInfo>,
{
    let file = schema::FEED_INFO.file;
    import_rows(reader, &schema::FEED_INFO, on_error, |row: FeedInfoRow, line| {
        create(
            storage,
            FeedInfo {
                feed,
                publisher_name: row.publisher_name,
                publisher_url: row.publisher_url,
                lang: row.lang,
                start_date: row.start_date,
                end_date: row.end_date,
                version: row.version,
            },
            file,
            line,
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const ABORT: ErrorPolicy = ErrorPolicy::Abort;

    #[test]
    fn load_minimal_agency() {
        let (mut collections, feed) = storage_with_feed();
        let content = "agency_name,agency_url,agency_timezone\n\
                       \"Metro\",\"http://metro.example\",\"America/Los_Angeles\"";
        import_agency_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let agencies = collections.agencies.filter(feed);
        assert_eq!(1, agencies.len());
        let agency = &collections.agencies[agencies[0]];
        assert_eq!(
            Agency {
                feed,
                agency_id: String::new(),
                name: "Metro".to_string(),
                url: "http://metro.example".to_string(),
                timezone: "America/Los_Angeles".to_string(),
                lang: String::new(),
                phone: String::new(),
                fare_url: String::new(),
            },
            *agency
        );
    }

    #[test]
    fn load_complete_agency() {
        let (mut collections, feed) = storage_with_feed();
        let content = "agency_id,agency_name,agency_url,agency_timezone,agency_lang,agency_phone,agency_fare_url\n\
                       M, Metro ,http://metro.example,Europe/Paris,fr,01 23 45 67 89,http://metro.example/fares\n\
                       B,Bus,,Europe/Paris,,,";
        import_agency_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        assert_eq!(2, collections.agencies.len());
        let metro = &collections.agencies[collections.agencies.find(feed, "M").unwrap()];
        assert_eq!("Metro", metro.name);
        assert_eq!("fr", metro.lang);
        assert_eq!("01 23 45 67 89", metro.phone);
        assert_eq!("http://metro.example/fares", metro.fare_url);
        let bus = &collections.agencies[collections.agencies.find(feed, "B").unwrap()];
        assert_eq!("", bus.url);
    }

    #[test]
    fn agency_without_required_column() {
        let (mut collections, feed) = storage_with_feed();
        let content = "agency_name,agency_url\nMetro,http://metro.example";
        let error = import_error(import_agency_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::MissingColumn { file, column } => {
                assert_eq!("agency.txt", file);
                assert_eq!("agency_timezone", column);
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(collections.agencies.is_empty());
    }

    #[test]
    fn agency_with_invalid_timezone() {
        let (mut collections, feed) = storage_with_feed();
        let content = "agency_name,agency_timezone\nMetro,Mars/Olympus_Mons";
        let error = import_error(import_agency_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::InvalidValue {
                line, field, value, ..
            } => {
                assert_eq!(2, line);
                assert_eq!("timezone", field);
                assert_eq!("Mars/Olympus_Mons", value);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn malformed_file() {
        let (mut collections, feed) = storage_with_feed();
        let content = "agency_name,agency_timezone\nMetro,Europe/Paris,extra";
        let error = import_error(import_agency_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(error, ImportError::Csv { .. }));
    }

    #[test]
    fn header_with_byte_order_mark() {
        let (mut collections, feed) = storage_with_feed();
        let content = "\u{feff}agency_name,agency_timezone\nMetro,Europe/Paris";
        import_agency_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();
        assert_eq!(1, collections.agencies.len());
    }

    #[test]
    fn skip_invalid_rows() {
        let (mut collections, feed) = storage_with_feed();
        let content = "agency_name,agency_timezone\n\
                       Metro,Europe/Paris\n\
                       Bus,Nowhere\n\
                       Tram,Europe/Paris";
        import_agency_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ErrorPolicy::Skip,
        )
        .unwrap();
        let names: Vec<_> = collections.agencies.values().map(|a| a.name.as_str()).collect();
        assert_eq!(vec!["Metro", "Tram"], names);
    }

    #[test]
    fn route_with_agency() {
        let (mut collections, feed) = storage_with_feed();
        import_agency_txt(
            "agency_id,agency_name,agency_timezone\nM,Metro,Europe/Paris".as_bytes(),
            feed,
            &mut collections,
            ABORT,
        )
        .unwrap();
        let content = "route_id,agency_id,route_short_name,route_long_name,route_type,route_color\n\
                       R1,M,1,Line 1,1,FFCC00\n\
                       R2,,2,Line 2,3,";
        import_routes_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let r1 = &collections.routes[collections.routes.find(feed, "R1").unwrap()];
        assert_eq!(collections.agencies.find(feed, "M"), r1.agency);
        assert_eq!("1", r1.short_name);
        assert_eq!("Line 1", r1.long_name);
        assert_eq!(1, r1.rtype);
        assert_eq!("FFCC00", r1.color);
        let r2 = &collections.routes[collections.routes.find(feed, "R2").unwrap()];
        assert_eq!(None, r2.agency);
    }

    #[test]
    fn route_with_unknown_agency() {
        let (mut collections, feed) = storage_with_feed();
        let content = "route_id,agency_id,route_type\nR1,unknown,3";
        let error = import_error(import_routes_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::NotFound { entity, key, .. } => {
                assert_eq!("agency", entity);
                assert_eq!("unknown", key);
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(collections.routes.is_empty());
    }

    #[test]
    fn route_type_out_of_range() {
        let (mut collections, feed) = storage_with_feed();
        let content = "route_id,route_type\nR1,1700\nR2,70000\nR3,5000000000";
        let error = import_error(import_routes_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::InvalidValue { line, field, .. } => {
                assert_eq!(4, line);
                assert_eq!("rtype", field);
            }
            e => panic!("unexpected error {:?}", e),
        }
        let r2 = collections.routes.find(feed, "R2").unwrap();
        assert_eq!(70000, collections.routes[r2].rtype);
    }

    #[test]
    fn duplicate_route_id() {
        let (mut collections, feed) = storage_with_feed();
        let content = "route_id,route_type\nR1,3\nR1,3";
        let error = import_error(import_routes_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::Storage { line, source, .. } => {
                assert_eq!(3, line);
                assert_eq!(
                    StorageError::DuplicateKey {
                        entity: "route",
                        key: "R1".to_string()
                    },
                    source
                );
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert_eq!(1, collections.routes.len());
    }

    #[test]
    fn calendar_and_calendar_dates() {
        let (mut collections, feed) = storage_with_feed();
        let calendar = "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                        S1,1,1,1,1,1,0,0,20180101,20181231";
        import_calendar_txt(calendar.as_bytes(), feed, &mut collections, ABORT).unwrap();
        let calendar_dates = "service_id,date,exception_type\n\
                              S1,20180501,2\n\
                              S2,20180714,1";
        import_calendar_dates_txt(calendar_dates.as_bytes(), feed, &mut collections, ABORT)
            .unwrap();

        assert_eq!(2, collections.services.len());
        let s1 = collections.services.find(feed, "S1").unwrap();
        let service = &collections.services[s1];
        assert!(service.monday);
        assert!(!service.sunday);
        assert_eq!(NaiveDate::from_ymd_opt(2018, 1, 1), service.start_date);

        let s2 = collections.services.find(feed, "S2").unwrap();
        assert_eq!(
            Service::without_calendar(feed, "S2".to_string()),
            collections.services[s2]
        );

        let dates: Vec<_> = collections
            .service_dates
            .values()
            .map(|d| (d.service, d.date, d.exception_type))
            .collect();
        assert_eq!(
            vec![
                (
                    s1,
                    NaiveDate::from_ymd_opt(2018, 5, 1).unwrap(),
                    ExceptionType::Remove
                ),
                (
                    s2,
                    NaiveDate::from_ymd_opt(2018, 7, 14).unwrap(),
                    ExceptionType::Add
                ),
            ],
            dates
        );
    }

    #[test]
    fn invalid_exception_type() {
        let (mut collections, feed) = storage_with_feed();
        let content = "service_id,date,exception_type\nS1,20180501,3";
        let error = import_error(import_calendar_dates_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(
            error,
            ImportError::InvalidValue {
                field: "exception_type",
                ..
            }
        ));
        assert!(collections.services.is_empty());
    }

    #[test]
    fn stops_with_zones_and_later_parent() {
        let (mut collections, feed) = storage_with_feed();
        let content = "stop_id,stop_name,stop_lat,stop_lon,zone_id,location_type,parent_station\n\
                       SP1,Platform 1,48.84,2.37,Z1,0,SA\n\
                       SP2,Platform 2,48.84,2.37,Z1,0,SA\n\
                       SA,Station,48.84,2.37,,1,";
        import_stops_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        assert_eq!(3, collections.stops.len());
        assert_eq!(1, collections.zones.len());
        let station = collections.stops.find(feed, "SA").unwrap();
        let zone = collections.zones.find(feed, "Z1");
        for stop_id in &["SP1", "SP2"] {
            let stop = &collections.stops[collections.stops.find(feed, stop_id).unwrap()];
            assert_eq!(Some(station), stop.parent_station);
            assert_eq!(zone, stop.zone);
        }
        assert_eq!(None, collections.stops[station].parent_station);
        assert_eq!("1", collections.stops[station].location_type);
    }

    #[test]
    fn stop_with_unknown_parent() {
        let (mut collections, feed) = storage_with_feed();
        let content = "stop_id,stop_name,stop_lat,stop_lon,parent_station\n\
                       SA,Station,48.84,2.37,\n\
                       SP1,Platform 1,48.84,2.37,unknown";
        let error = import_error(import_stops_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::NotFound {
                line, entity, key, ..
            } => {
                assert_eq!(3, line);
                assert_eq!("stop", entity);
                assert_eq!("unknown", key);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn skip_stop_with_unknown_parent() {
        let (mut collections, feed) = storage_with_feed();
        let content = "stop_id,stop_name,stop_lat,stop_lon,parent_station\n\
                       SP1,Platform 1,48.84,2.37,unknown\n\
                       SA,Station,48.84,2.37,";
        import_stops_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ErrorPolicy::Skip,
        )
        .unwrap();
        assert_eq!(1, collections.stops.len());
        assert!(collections.stops.find(feed, "SA").is_some());
    }

    #[test]
    fn failed_stops_create_no_zone() {
        let (mut collections, feed) = storage_with_feed();
        let content = "stop_id,stop_name,stop_lat,stop_lon,zone_id,parent_station\n\
                       SP1,Platform 1,48.84,2.37,Z9,unknown\n\
                       SA,Station,48.84,2.37,,\n\
                       SA,Station again,48.84,2.37,Z8,";
        import_stops_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ErrorPolicy::Skip,
        )
        .unwrap();
        assert_eq!(1, collections.stops.len());
        assert!(collections.zones.is_empty());
    }

    #[test]
    fn stop_with_non_finite_latitude() {
        let (mut collections, feed) = storage_with_feed();
        let content = "stop_id,stop_name,stop_lat,stop_lon\nSP1,Platform 1,NaN,2.37";
        let error = import_error(import_stops_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(error, ImportError::InvalidValue { field: "lat", .. }));
        assert!(collections.stops.is_empty());
    }

    #[test]
    fn stop_with_invalid_latitude() {
        let (mut collections, feed) = storage_with_feed();
        let content = "stop_id,stop_name,stop_lat,stop_lon\nSP1,Platform 1,north,2.37";
        let error = import_error(import_stops_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(error, ImportError::InvalidValue { field: "lat", .. }));
    }

    #[test]
    fn shapes_are_created_with_their_points() {
        let (mut collections, feed) = storage_with_feed();
        let content = "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled\n\
                       SH1,48.84,2.37,1,0\n\
                       SH1,48.85,2.38,2,1.5\n\
                       SH2,48.86,2.39,1,";
        import_shapes_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        assert_eq!(2, collections.shapes.len());
        assert_eq!(3, collections.shape_points.len());
        let sh1 = collections.shapes.find(feed, "SH1").unwrap();
        let points: Vec<_> = collections
            .shape_points
            .values()
            .filter(|p| p.shape == sh1)
            .map(|p| (p.sequence, p.traveled))
            .collect();
        assert_eq!(vec![(1, Some(0.0)), (2, Some(1.5))], points);
    }

    #[test]
    fn minimal_trip() {
        let (mut collections, feed) = storage_with_feed();
        let route = create_route(&mut collections, feed, "R1");
        let service = create_service(&mut collections, feed, "S1");
        let content = "route_id,service_id,trip_id\nR1,S1,T1";
        import_trips_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let trips = collections.trips.filter(feed);
        assert_eq!(1, trips.len());
        let trip = &collections.trips[trips[0]];
        assert_eq!(
            Trip {
                feed,
                route,
                trip_id: "T1".to_string(),
                headsign: String::new(),
                short_name: String::new(),
                direction: String::new(),
                block: None,
                shape: None,
                wheelchair_accessible: String::new(),
                bikes_allowed: String::new(),
            },
            *trip
        );
        let services = collections.services_of(trips[0]);
        assert_eq!(1, services.len());
        assert!(services.contains(&service));
    }

    #[test]
    fn trip_with_several_services() {
        let (mut collections, feed) = storage_with_feed();
        create_route(&mut collections, feed, "R1");
        let s1 = create_service(&mut collections, feed, "S1");
        let s2 = create_service(&mut collections, feed, "S2");
        let content = "route_id,service_id,trip_id\nR1,S1,T1\nR1,S2,T1\nR1,S1,T1";
        import_trips_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        assert_eq!(1, collections.trips.len());
        let trip = collections.trips.find(feed, "T1").unwrap();
        let services = collections.services_of(trip);
        assert_eq!(2, services.len());
        assert!(services.contains(&s1));
        assert!(services.contains(&s2));
    }

    #[test]
    fn maximal_trip() {
        let (mut collections, feed) = storage_with_feed();
        let route = create_route(&mut collections, feed, "R1");
        create_service(&mut collections, feed, "S1");
        import_shapes_txt(
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\nSH1,48.84,2.37,1".as_bytes(),
            feed,
            &mut collections,
            ABORT,
        )
        .unwrap();
        let content = "route_id,service_id,trip_id,trip_headsign,trip_short_name,direction_id,block_id,shape_id,wheelchair_accessible,bikes_allowed\n\
                       R1,S1,T1,Downtown,Express,0,B1,SH1,1,2";
        import_trips_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let trip = &collections.trips[collections.trips.find(feed, "T1").unwrap()];
        assert_eq!(
            Trip {
                feed,
                route,
                trip_id: "T1".to_string(),
                headsign: "Downtown".to_string(),
                short_name: "Express".to_string(),
                direction: "0".to_string(),
                block: collections.blocks.find(feed, "B1"),
                shape: collections.shapes.find(feed, "SH1"),
                wheelchair_accessible: "1".to_string(),
                bikes_allowed: "2".to_string(),
            },
            *trip
        );
        assert!(trip.block.is_some());
    }

    #[test]
    fn trip_with_unknown_route() {
        let (mut collections, feed) = storage_with_feed();
        create_service(&mut collections, feed, "S1");
        let content = "route_id,service_id,trip_id\nunknown,S1,T1";
        let error = import_error(import_trips_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::NotFound { entity, key, .. } => {
                assert_eq!("route", entity);
                assert_eq!("unknown", key);
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(collections.trips.is_empty());
    }

    #[test]
    fn trip_with_unknown_service_creates_nothing() {
        let (mut collections, feed) = storage_with_feed();
        create_route(&mut collections, feed, "R1");
        let content = "route_id,service_id,trip_id,block_id\nR1,unknown,T1,B1";
        let error = import_error(import_trips_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(
            error,
            ImportError::NotFound {
                entity: "service",
                ..
            }
        ));
        assert!(collections.trips.is_empty());
        assert!(collections.blocks.is_empty());
    }

    #[test]
    fn trips_are_scoped_by_feed() {
        let (mut collections, feed) = storage_with_feed();
        let other_feed = collections.create_feed(Feed::default());
        create_route(&mut collections, other_feed, "R1");
        create_service(&mut collections, feed, "S1");
        let content = "route_id,service_id,trip_id\nR1,S1,T1";
        let error = import_error(import_trips_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(error, ImportError::NotFound { entity: "route", .. }));
    }

    #[test]
    fn stop_times_and_frequencies() {
        let (mut collections, feed) = storage_with_feed();
        create_route(&mut collections, feed, "R1");
        create_service(&mut collections, feed, "S1");
        import_stops_txt(
            "stop_id,stop_name,stop_lat,stop_lon\nSP1,A,48.84,2.37\nSP2,B,48.85,2.38".as_bytes(),
            feed,
            &mut collections,
            ABORT,
        )
        .unwrap();
        import_trips_txt(
            "route_id,service_id,trip_id\nR1,S1,T1".as_bytes(),
            feed,
            &mut collections,
            ABORT,
        )
        .unwrap();
        let stop_times = "trip_id,arrival_time,departure_time,stop_id,stop_sequence,shape_dist_traveled\n\
                          T1,06:00:00,06:00:00,SP1,1,\n\
                          T1,,,SP2,2,\n\
                          T1,25:10:00,25:12:00,SP1,3,2.5";
        import_stop_times_txt(stop_times.as_bytes(), feed, &mut collections, ABORT).unwrap();
        let frequencies = "trip_id,start_time,end_time,headway_secs\nT1,06:00:00,22:00:00,600";
        import_frequencies_txt(frequencies.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let times: Vec<_> = collections
            .stop_times
            .values()
            .map(|st| (st.stop_sequence, st.arrival_time, st.departure_time, st.traveled))
            .collect();
        assert_eq!(
            vec![
                (1, Some(Time::new(6, 0, 0)), Some(Time::new(6, 0, 0)), None),
                (2, None, None, None),
                (
                    3,
                    Some(Time::new(25, 10, 0)),
                    Some(Time::new(25, 12, 0)),
                    Some(2.5)
                ),
            ],
            times
        );
        let frequency = collections.frequencies.values().next().unwrap();
        assert_eq!(Time::new(22, 0, 0), frequency.end_time);
        assert_eq!(600, frequency.headway_secs);
    }

    #[test]
    fn stop_time_with_invalid_time() {
        let (mut collections, feed) = storage_with_feed();
        let content = "trip_id,arrival_time,departure_time,stop_id,stop_sequence\nT1,6h,6h,SP1,1";
        let error = import_error(import_stop_times_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(
            error,
            ImportError::InvalidValue {
                field: "arrival_time",
                ..
            }
        ));
    }

    #[test]
    fn stop_time_with_out_of_range_time() {
        let (mut collections, feed) = storage_with_feed();
        let content = "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                       T1,1193047:00:00,1193047:00:00,SP1,1";
        let error = import_error(import_stop_times_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        match error {
            ImportError::InvalidValue {
                line, field, value, ..
            } => {
                assert_eq!(2, line);
                assert_eq!("arrival_time", field);
                assert_eq!("1193047:00:00", value);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn fares_and_fare_rules() {
        let (mut collections, feed) = storage_with_feed();
        create_route(&mut collections, feed, "R1");
        let fares = "fare_id,price,currency_type,payment_method,transfers,transfer_duration\n\
                     F1,1.90,EUR,0,,\n\
                     F2,2.10,EUR,1,0,3600";
        import_fare_attributes_txt(fares.as_bytes(), feed, &mut collections, ABORT).unwrap();
        let fare_rules = "fare_id,route_id,origin_id,destination_id,contains_id\n\
                          F1,R1,,,\n\
                          F2,,Z1,Z2,";
        import_fare_rules_txt(fare_rules.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let f1 = collections.fares.find(feed, "F1").unwrap();
        assert_eq!(Decimal::new(190, 2), collections.fares[f1].price);
        assert_eq!(None, collections.fares[f1].transfers);
        let f2 = &collections.fares[collections.fares.find(feed, "F2").unwrap()];
        assert_eq!(Some(0), f2.transfers);
        assert_eq!(Some(3600), f2.transfer_duration);

        assert_eq!(2, collections.zones.len());
        let rules: Vec<_> = collections.fare_rules.values().collect();
        assert_eq!(collections.routes.find(feed, "R1"), rules[0].route);
        assert_eq!(None, rules[0].origin);
        assert_eq!(collections.zones.find(feed, "Z1"), rules[1].origin);
        assert_eq!(collections.zones.find(feed, "Z2"), rules[1].destination);
        assert_eq!(None, rules[1].contains);
    }

    #[test]
    fn fare_with_unknown_currency() {
        let (mut collections, feed) = storage_with_feed();
        let content = "fare_id,price,currency_type,payment_method\nF1,1.90,XYZ,0";
        let error = import_error(import_fare_attributes_txt(
            content.as_bytes(),
            feed,
            &mut collections,
            ABORT,
        ));
        assert!(matches!(
            error,
            ImportError::InvalidValue {
                field: "currency_type",
                ..
            }
        ));
    }

    #[test]
    fn transfers_between_stops() {
        let (mut collections, feed) = storage_with_feed();
        import_stops_txt(
            "stop_id,stop_name,stop_lat,stop_lon\nSP1,A,48.84,2.37\nSP2,B,48.85,2.38".as_bytes(),
            feed,
            &mut collections,
            ABORT,
        )
        .unwrap();
        let content = "from_stop_id,to_stop_id,transfer_type,min_transfer_time\n\
                       SP1,SP2,2,120\n\
                       SP2,SP1,0,";
        import_transfers_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let transfers: Vec<_> = collections.transfers.values().collect();
        assert_eq!(2, transfers.len());
        assert_eq!(collections.stops.find(feed, "SP1"), Some(transfers[0].from_stop));
        assert_eq!(Some(120), transfers[0].min_transfer_time);
        assert_eq!(None, transfers[1].min_transfer_time);
    }

    #[test]
    fn feed_info() {
        let (mut collections, feed) = storage_with_feed();
        let content = "feed_publisher_name,feed_publisher_url,feed_lang,feed_start_date,feed_end_date,feed_version\n\
                       Metro,http://metro.example,en,20180101,,v1";
        import_feed_info_txt(content.as_bytes(), feed, &mut collections, ABORT).unwrap();

        let feed_info = collections.feed_infos.values().next().unwrap();
        assert_eq!("Metro", feed_info.publisher_name);
        assert_eq!(NaiveDate::from_ymd_opt(2018, 1, 1), feed_info.start_date);
        assert_eq!(None, feed_info.end_date);
        assert_eq!("v1", feed_info.version);
    }
}
