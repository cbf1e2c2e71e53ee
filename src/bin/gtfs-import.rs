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

use clap::Parser;
use gtfs_import::{
    configuration::read_config,
    file_handler::{PathFileHandler, ZipHandler},
    gtfs, Collections, Result,
};
use serde_json::json;
use std::{fs::File, path::PathBuf};
use tracing::info;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};
use typed_index_collection::Idx;

#[derive(Debug, Parser)]
#[command(
    name = "gtfs-import",
    about = "Import a GTFS feed and print the number of imported records.",
    version
)]
struct Opt {
    /// Input directory, or zip archive.
    #[arg(short = 'i', long = "input", default_value = ".")]
    input: PathBuf,

    /// JSON file containing additional configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Name of the imported feed, overriding the one of the configuration.
    #[arg(short = 'n', long = "name")]
    name: Option<String>,
}

fn summary(collections: &Collections, feed: Idx<gtfs_import::objects::Feed>) -> serde_json::Value {
    json!({
        "feed": collections.feeds[feed].name,
        "agencies": collections.agencies.filter(feed).len(),
        "routes": collections.routes.filter(feed).len(),
        "services": collections.services.filter(feed).len(),
        "service_dates": collections.service_dates.filter(feed).len(),
        "zones": collections.zones.filter(feed).len(),
        "stops": collections.stops.filter(feed).len(),
        "blocks": collections.blocks.filter(feed).len(),
        "shapes": collections.shapes.filter(feed).len(),
        "shape_points": collections.shape_points.filter(feed).len(),
        "trips": collections.trips.filter(feed).len(),
        "stop_times": collections.stop_times.filter(feed).len(),
        "frequencies": collections.frequencies.filter(feed).len(),
        "fares": collections.fares.filter(feed).len(),
        "fare_rules": collections.fare_rules.filter(feed).len(),
        "transfers": collections.transfers.filter(feed).len(),
        "feed_infos": collections.feed_infos.filter(feed).len(),
    })
}

fn run(opt: Opt) -> Result<()> {
    info!("Launching gtfs-import...");

    let mut configuration = read_config(opt.config)?;
    if let Some(name) = opt.name {
        configuration.feed_name = name;
    }

    let mut collections = Collections::default();
    let feed = match opt.input.extension() {
        Some(ext) if ext == "zip" => {
            let reader = File::open(&opt.input)?;
            let mut file_handler = ZipHandler::new(reader, &opt.input)?;
            gtfs::import(&mut collections, &mut file_handler, &configuration)?
        }
        _ => {
            let mut file_handler = PathFileHandler::new(opt.input);
            gtfs::import(&mut collections, &mut file_handler, &configuration)?
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&summary(&collections, feed))?
    );
    Ok(())
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|e| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            e,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter_subscriber)
        .init();
}

fn main() {
    init_logger();
    if let Err(err) = run(Opt::parse()) {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}
