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

//! [GTFS](https://gtfs.org/reference/static) import.
//!
//! Every `import_*_txt` function reads one GTFS file into a feed of a
//! [`Storage`]. [`import_feed`] reads the files of a whole feed in
//! dependency order, and [`read_from_path`] and [`read_from_zip`] do it
//! into a new [`Collections`].

mod read;

pub use read::{
    import_agency_txt, import_calendar_dates_txt, import_calendar_txt, import_fare_attributes_txt,
    import_fare_rules_txt, import_feed_info_txt, import_frequencies_txt, import_routes_txt,
    import_shapes_txt, import_stop_times_txt, import_stops_txt, import_transfers_txt,
    import_trips_txt,
};

use crate::{
    configuration::{read_config, Configuration},
    file_handler::{FileHandler, PathFileHandler, ZipHandler},
    objects::*,
    storage::{Collections, ServiceLinks, Storage},
    Result,
};
use anyhow::{anyhow, Context};
use std::{fs::File, path::Path};
use tracing::info;
use typed_index_collection::Idx;

/// A storage accepting every entity of a feed.
pub trait FeedStorage:
    Storage<Agency>
    + Storage<Route>
    + Storage<Service>
    + Storage<ServiceDate>
    + Storage<Zone>
    + Storage<Stop>
    + Storage<Block>
    + Storage<Shape>
    + Storage<ShapePoint>
    + Storage<Trip>
    + Storage<StopTime>
    + Storage<Frequency>
    + Storage<Fare>
    + Storage<FareRule>
    + Storage<Transfer>
    + Storage<FeedInfo>
    + ServiceLinks
{
}

impl<S> FeedStorage for S where
    S: Storage<Agency>
        + Storage<Route>
        + Storage<Service>
        + Storage<ServiceDate>
        + Storage<Zone>
        + Storage<Stop>
        + Storage<Block>
        + Storage<Shape>
        + Storage<ShapePoint>
        + Storage<Trip>
        + Storage<StopTime>
        + Storage<Frequency>
        + Storage<Fare>
        + Storage<FareRule>
        + Storage<Transfer>
        + Storage<FeedInfo>
        + ServiceLinks
{
}

// Imports one file of the feed with `$import` if the file exists.
// Evaluates to `true` if the file was imported.
macro_rules! import_file {
    ($file_handler:expr, $name:expr, $import:path, $feed:expr, $storage:expr, $on_error:expr) => {{
        let (reader, path) = (&mut *$file_handler).get_file_if_exists($name)?;
        match reader {
            Some(reader) => {
                info!("Reading {}", $name);
                $import(reader, $feed, $storage, $on_error)
                    .with_context(|| format!("Error reading {:?}", path))?;
                true
            }
            None => {
                info!("Skipping {}, file not found", $name);
                false
            }
        }
    }};
}

const REQUIRED_FILES: [&str; 5] = [
    "agency.txt",
    "stops.txt",
    "routes.txt",
    "trips.txt",
    "stop_times.txt",
];

/// Imports the GTFS files of `file_handler` into the `feed` of `storage`.
///
/// `agency.txt`, `stops.txt`, `routes.txt`, `trips.txt`, `stop_times.txt`
/// and one of `calendar.txt` or `calendar_dates.txt` are required, the
/// other files are imported when present. Files are read so that every
/// referenced record is imported before the records referencing it.
///
/// On error, the records already created are left in `storage`; use
/// [`import`] to import atomically into [`Collections`].
pub fn import_feed<H, S>(
    file_handler: &mut H,
    storage: &mut S,
    feed: Idx<Feed>,
    configuration: &Configuration,
) -> Result<()>
where
    for<'a> &'a mut H: FileHandler,
    S: FeedStorage,
{
    for name in REQUIRED_FILES.iter() {
        let (reader, path) = (&mut *file_handler).get_file_if_exists(name)?;
        if reader.is_none() {
            return Err(anyhow!("required file {:?} not found", path));
        }
    }
    let on_error = configuration.on_error;
    import_file!(file_handler, "agency.txt", import_agency_txt, feed, storage, on_error);
    import_file!(file_handler, "stops.txt", import_stops_txt, feed, storage, on_error);
    import_file!(file_handler, "routes.txt", import_routes_txt, feed, storage, on_error);
    let has_calendar =
        import_file!(file_handler, "calendar.txt", import_calendar_txt, feed, storage, on_error);
    let has_calendar_dates = import_file!(
        file_handler,
        "calendar_dates.txt",
        import_calendar_dates_txt,
        feed,
        storage,
        on_error
    );
    if !has_calendar && !has_calendar_dates {
        return Err(anyhow!(
            "calendar.txt or calendar_dates.txt file is required"
        ));
    }
    import_file!(file_handler, "shapes.txt", import_shapes_txt, feed, storage, on_error);
    import_file!(file_handler, "trips.txt", import_trips_txt, feed, storage, on_error);
    import_file!(file_handler, "stop_times.txt", import_stop_times_txt, feed, storage, on_error);
    import_file!(file_handler, "frequencies.txt", import_frequencies_txt, feed, storage, on_error);
    import_file!(
        file_handler,
        "fare_attributes.txt",
        import_fare_attributes_txt,
        feed,
        storage,
        on_error
    );
    import_file!(file_handler, "fare_rules.txt", import_fare_rules_txt, feed, storage, on_error);
    import_file!(file_handler, "transfers.txt", import_transfers_txt, feed, storage, on_error);
    import_file!(file_handler, "feed_info.txt", import_feed_info_txt, feed, storage, on_error);
    Ok(())
}

/// Creates a feed in `collections` and imports the files of `file_handler`
/// into it.
///
/// The import is atomic: if it fails, `collections` is left unchanged.
pub fn import<H>(
    collections: &mut Collections,
    file_handler: &mut H,
    configuration: &Configuration,
) -> Result<Idx<Feed>>
where
    for<'a> &'a mut H: FileHandler,
{
    collections.transaction(|collections| {
        let feed = collections.create_feed(Feed {
            name: configuration.feed_name.clone(),
        });
        import_feed(file_handler, collections, feed, configuration)?;
        Ok(feed)
    })
}

/// Imports a GTFS feed stored in a directory.
///
/// The optional configuration file is described in
/// [`read_config`](crate::configuration::read_config).
pub fn read_from_path<P: AsRef<Path>>(
    path: P,
    config_path: Option<P>,
) -> Result<(Collections, Idx<Feed>)> {
    let configuration = read_config(config_path)?;
    let mut file_handler = PathFileHandler::new(path.as_ref().to_path_buf());
    let mut collections = Collections::default();
    let feed = import(&mut collections, &mut file_handler, &configuration)?;
    Ok((collections, feed))
}

/// Imports a GTFS feed stored in a zip archive.
pub fn read_from_zip<P: AsRef<Path>>(
    path: P,
    config_path: Option<P>,
) -> Result<(Collections, Idx<Feed>)> {
    let configuration = read_config(config_path)?;
    let reader = File::open(path.as_ref())
        .with_context(|| format!("Error reading {:?}", path.as_ref()))?;
    let mut file_handler = ZipHandler::new(reader, path)?;
    let mut collections = Collections::default();
    let feed = import(&mut collections, &mut file_handler, &configuration)?;
    Ok((collections, feed))
}
