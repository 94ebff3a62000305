use std::iter::FusedIterator;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{DmmpError, Result};
use crate::model::MPath;
#[cfg(unix)]
use crate::session::Session;

/// Command asking multipathd for every map, path group and path as JSON.
pub const SHOW_MAPS_JSON: &str = "show maps json";

/// JSON API major version this client understands.
pub const API_VERSION_MAJOR: i64 = 0;

/// Query all multipath maps from the local multipathd.
///
/// Uses [`ClientConfig::default`]. Every call opens a fresh connection.
#[cfg(unix)]
pub fn mpaths_get() -> Result<MPaths> {
    Client::default().mpaths()
}

/// multipathd query client.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Query all multipath maps.
    ///
    /// Connects, sends [`SHOW_MAPS_JSON`], and returns the maps of the reply.
    /// No retries: a failed query is reported as is.
    #[cfg(unix)]
    pub fn mpaths(&self) -> Result<MPaths> {
        let reply = Session::connect(&self.config)?.exec(SHOW_MAPS_JSON)?;
        parse_mpaths(&reply)
    }
}

/// Parse a `show maps json` reply.
///
/// An empty reply means multipathd has no maps. Replies from any other API
/// major version are rejected before their maps are looked at.
pub fn parse_mpaths(reply: &str) -> Result<MPaths> {
    if reply.is_empty() {
        debug!("empty reply, no multipath maps");
        return Ok(MPaths::default());
    }

    let mut root: Value = serde_json::from_str(reply)?;

    let version = root
        .get("major_version")
        .ok_or(DmmpError::MissingField("major_version"))?;
    // Any integer is a version, even one that overflows i64.
    let found = match version
        .as_i64()
        .map(i128::from)
        .or_else(|| version.as_u64().map(i128::from))
    {
        Some(found) => found,
        None => i64::deserialize(version)?.into(),
    };
    if found != i128::from(API_VERSION_MAJOR) {
        return Err(DmmpError::VersionMismatch {
            expected: API_VERSION_MAJOR,
            found,
        });
    }

    let maps = root
        .get_mut("maps")
        .map(Value::take)
        .ok_or(DmmpError::MissingField("maps"))?;
    let maps = Vec::<Value>::deserialize(maps)?;
    debug!(maps = maps.len(), "parsed multipathd reply");

    Ok(MPaths {
        inner: maps.into_iter(),
    })
}

/// Maps of one query, built one at a time as they are consumed.
///
/// Forward-only and not restartable; query again for fresh state.
#[derive(Debug, Default)]
pub struct MPaths {
    inner: std::vec::IntoIter<Value>,
}

impl Iterator for MPaths {
    type Item = Result<MPath>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|map| MPath::deserialize(map).map_err(DmmpError::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for MPaths {}

impl FusedIterator for MPaths {}
