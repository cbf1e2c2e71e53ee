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

//! Storage of the imported records.
//!
//! The importer only talks to the storage through the [`Storage`] and
//! [`ServiceLinks`] traits. [`Collections`] is the in-memory implementation:
//! one [`Table`] per entity, each indexed by `(feed, natural key)`.

use crate::{error::StorageError, objects::*, Result};
use derivative::Derivative;
use relational_types::{IdxSet, ManyToMany};
use std::collections::{BTreeMap, HashMap};
use std::ops;
use tracing::debug;
use typed_index_collection::{Collection, Idx};

/// An object stored in a [`Table`].
pub trait Record {
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    /// Whether the natural key identifies at most one record of a feed.
    const UNIQUE_KEY: bool = true;

    /// The feed owning the record.
    fn feed(&self) -> Idx<Feed>;

    /// The GTFS identifier of the record, if the entity has one.
    fn natural_key(&self) -> Option<&str> {
        None
    }
}

/// Records of one entity, with their natural key index.
#[derive(Debug, Derivative, Clone)]
#[derivative(Default(bound = ""))]
pub struct Table<T> {
    records: Collection<T>,
    by_key: HashMap<Idx<Feed>, HashMap<String, Idx<T>>>,
}

impl<T: Record> Table<T> {
    /// Inserts a record, indexing its natural key when not empty.
    ///
    /// Fails if the natural key is unique and already used in the feed.
    pub fn create(&mut self, record: T) -> Result<Idx<T>, StorageError> {
        let feed = record.feed();
        let key = record
            .natural_key()
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        if let Some(key) = &key {
            if T::UNIQUE_KEY && self.find(feed, key).is_some() {
                return Err(StorageError::DuplicateKey {
                    entity: T::ENTITY,
                    key: key.clone(),
                });
            }
        }
        let idx = self.records.push(record);
        if let Some(key) = key {
            // first record wins the lookup of a non unique key
            self.by_key
                .entry(feed)
                .or_insert_with(HashMap::new)
                .entry(key)
                .or_insert(idx);
        }
        Ok(idx)
    }

    /// Finds the record of the feed with the given natural key.
    pub fn find(&self, feed: Idx<Feed>, key: &str) -> Option<Idx<T>> {
        self.by_key
            .get(&feed)
            .and_then(|keys| keys.get(key))
            .copied()
    }

    /// Records of the feed, in creation order.
    pub fn filter(&self, feed: Idx<Feed>) -> Vec<Idx<T>> {
        self.records
            .iter()
            .filter(|(_, record)| record.feed() == feed)
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl<T> Table<T> {
    /// Number of records of every feed.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over `(Idx<T>, &T)`.
    pub fn iter(&self) -> impl Iterator<Item = (Idx<T>, &T)> + '_ {
        self.records.iter()
    }

    /// Iterates over the records.
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.records.values()
    }
}

impl<T> ops::Index<Idx<T>> for Table<T> {
    type Output = T;
    fn index(&self, index: Idx<T>) -> &Self::Output {
        &self.records[index]
    }
}

/// Create and query the records of one entity.
pub trait Storage<T: Record> {
    /// Stores a new record.
    fn create(&mut self, record: T) -> Result<Idx<T>, StorageError>;
    /// Returns a stored record.
    fn get(&self, idx: Idx<T>) -> &T;
    /// Looks a record up by natural key within a feed.
    fn find(&self, feed: Idx<Feed>, natural_key: &str) -> Option<Idx<T>>;
    /// Records of a feed, in creation order.
    fn filter(&self, feed: Idx<Feed>) -> Vec<Idx<T>>;
}

/// Many-to-many association between trips and the services they run under.
pub trait ServiceLinks {
    /// Links a trip to a service. Returns `false` if they were already linked.
    fn link_service(&mut self, trip: Idx<Trip>, service: Idx<Service>) -> bool;
    /// Services linked to a trip.
    fn services_of(&self, trip: Idx<Trip>) -> IdxSet<Service>;
}

/// The in-memory storage: every entity of every imported feed.
#[derive(Debug, Default, Clone)]
#[allow(missing_docs)]
pub struct Collections {
    pub feeds: Collection<Feed>,
    pub agencies: Table<Agency>,
    pub routes: Table<Route>,
    pub services: Table<Service>,
    pub service_dates: Table<ServiceDate>,
    pub zones: Table<Zone>,
    pub stops: Table<Stop>,
    pub blocks: Table<Block>,
    pub shapes: Table<Shape>,
    pub shape_points: Table<ShapePoint>,
    pub trips: Table<Trip>,
    pub stop_times: Table<StopTime>,
    pub frequencies: Table<Frequency>,
    pub fares: Table<Fare>,
    pub fare_rules: Table<FareRule>,
    pub transfers: Table<Transfer>,
    pub feed_infos: Table<FeedInfo>,
    trip_services: BTreeMap<Idx<Trip>, IdxSet<Service>>,
}

impl Collections {
    /// Registers a new feed.
    pub fn create_feed(&mut self, feed: Feed) -> Idx<Feed> {
        debug!("creating feed {:?}", feed.name);
        self.feeds.push(feed)
    }

    /// Runs `f` as one unit: if it fails, every change it made is dropped.
    pub fn transaction<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        let savepoint = self.clone();
        let result = f(self);
        if result.is_err() {
            debug!("rolling back the storage");
            *self = savepoint;
        }
        result
    }

    /// Relation between the trips and the services they run under.
    pub fn trips_to_services(&self) -> ManyToMany<Trip, Service> {
        ManyToMany::from_forward(self.trip_services.clone())
    }
}

/// Short identification of a stored record, prefixed by the number of its
/// feed, e.g. `1-R1-T1` for the trip `T1` of the route `R1` of the first
/// feed.
pub trait Label<T> {
    /// Label of the record.
    fn label(&self, idx: Idx<T>) -> String;
}

impl Collections {
    /// Number of the feed, counted from 1 in creation order.
    pub fn feed_number(&self, feed: Idx<Feed>) -> usize {
        self.feeds
            .iter()
            .position(|(idx, _)| idx == feed)
            .map_or(0, |position| position + 1)
    }
}

impl Label<Agency> for Collections {
    fn label(&self, idx: Idx<Agency>) -> String {
        let agency = &self.agencies[idx];
        format!("{}-{}", self.feed_number(agency.feed), agency.agency_id)
    }
}

impl Label<Route> for Collections {
    fn label(&self, idx: Idx<Route>) -> String {
        let route = &self.routes[idx];
        format!("{}-{}", self.feed_number(route.feed), route.route_id)
    }
}

impl Label<Trip> for Collections {
    fn label(&self, idx: Idx<Trip>) -> String {
        let trip = &self.trips[idx];
        format!("{}-{}", self.label(trip.route), trip.trip_id)
    }
}

macro_rules! impl_storage {
    ($ty:ty, $table:ident) => {
        impl Storage<$ty> for Collections {
            fn create(&mut self, record: $ty) -> Result<Idx<$ty>, StorageError> {
                self.$table.create(record)
            }
            fn get(&self, idx: Idx<$ty>) -> &$ty {
                &self.$table[idx]
            }
            fn find(&self, feed: Idx<Feed>, natural_key: &str) -> Option<Idx<$ty>> {
                self.$table.find(feed, natural_key)
            }
            fn filter(&self, feed: Idx<Feed>) -> Vec<Idx<$ty>> {
                self.$table.filter(feed)
            }
        }
    };
}

impl_storage!(Agency, agencies);
impl_storage!(Route, routes);
impl_storage!(Service, services);
impl_storage!(ServiceDate, service_dates);
impl_storage!(Zone, zones);
impl_storage!(Stop, stops);
impl_storage!(Block, blocks);
impl_storage!(Shape, shapes);
impl_storage!(ShapePoint, shape_points);
impl_storage!(Trip, trips);
impl_storage!(StopTime, stop_times);
impl_storage!(Frequency, frequencies);
impl_storage!(Fare, fares);
impl_storage!(FareRule, fare_rules);
impl_storage!(Transfer, transfers);
impl_storage!(FeedInfo, feed_infos);

impl ServiceLinks for Collections {
    fn link_service(&mut self, trip: Idx<Trip>, service: Idx<Service>) -> bool {
        self.trip_services
            .entry(trip)
            .or_insert_with(IdxSet::default)
            .insert(service)
    }

    fn services_of(&self, trip: Idx<Trip>) -> IdxSet<Service> {
        self.trip_services.get(&trip).cloned().unwrap_or_default()
    }
}
