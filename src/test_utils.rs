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

#![allow(missing_docs)]

use crate::storage::Collections;
use crate::{
    objects::{Feed, Route, Service},
    ImportError, Result,
};
use std::fs::File;
use std::io::prelude::*;
use std::path;
use typed_index_collection::Idx;

pub fn create_file_with_content(path: &path::Path, file_name: &str, content: &str) -> File {
    let file_path = path.join(file_name);
    let mut f = File::create(&file_path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    File::open(file_path).unwrap()
}

pub fn test_in_tmp_dir<F>(func: F)
where
    F: FnOnce(&path::Path),
{
    let tmp_dir = tempfile::tempdir().expect("create temp dir");
    {
        let path = tmp_dir.path();
        func(path);
    }
    tmp_dir.close().expect("delete temp dir");
}

/// A storage holding one empty feed.
pub fn storage_with_feed() -> (Collections, Idx<Feed>) {
    let mut collections = Collections::default();
    let feed = collections.create_feed(Feed::default());
    (collections, feed)
}

pub fn create_route(collections: &mut Collections, feed: Idx<Feed>, route_id: &str) -> Idx<Route> {
    collections
        .routes
        .create(Route {
            feed,
            route_id: route_id.to_string(),
            agency: None,
            short_name: String::new(),
            long_name: String::new(),
            desc: String::new(),
            rtype: 3,
            url: String::new(),
            color: String::new(),
            text_color: String::new(),
        })
        .unwrap()
}

pub fn create_service(
    collections: &mut Collections,
    feed: Idx<Feed>,
    service_id: &str,
) -> Idx<Service> {
    collections
        .services
        .create(Service::without_calendar(feed, service_id.to_string()))
        .unwrap()
}

/// The `ImportError` carried by a failed import.
pub fn import_error<T: std::fmt::Debug>(result: Result<T>) -> ImportError {
    result
        .unwrap_err()
        .downcast::<ImportError>()
        .expect("an ImportError")
}
