//! Multipath maps, path groups and paths as reported by `show maps json`.
//!
//! Built once per query and never mutated. Each map owns its groups and each
//! group owns its paths; there are no back references.

use std::fmt;

use serde::Deserialize;

use crate::status::{PathGroupStatus, PathStatus};

/// One path (block device) of a multipath map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Path {
    #[serde(rename = "dev")]
    blk_name: String,
    #[serde(rename = "chk_st")]
    status: PathStatus,
}

impl Path {
    /// Block device name, e.g. `sda` or `nvme0n1`.
    pub fn blk_name(&self) -> &str {
        &self.blk_name
    }

    pub fn status(&self) -> PathStatus {
        self.status
    }

    pub fn status_string(&self) -> &'static str {
        self.status.as_str()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.blk_name, self.status)
    }
}

/// A group of paths sharing a priority and path selector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathGroup {
    #[serde(rename = "group")]
    id: u32,
    #[serde(rename = "pri")]
    priority: i32,
    selector: String,
    #[serde(rename = "dm_st")]
    status: PathGroupStatus,
    paths: Vec<Path>,
}

impl PathGroup {
    /// Group number, as used when switching the active group.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// When the active group fails, the enabled group with the highest
    /// priority takes over.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Path selector choosing which path of the group gets the next I/O,
    /// e.g. `service-time 0`.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn status(&self) -> PathGroupStatus {
        self.status
    }

    pub fn status_string(&self) -> &'static str {
        self.status.as_str()
    }

    /// Paths in the order multipathd reported them.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }
}

impl fmt::Display for PathGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.id, self.status, self.priority)
    }
}

/// A multipath map (one dm-multipath device).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MPath {
    #[serde(rename = "uuid")]
    wwid: String,
    name: String,
    #[serde(rename = "sysfs")]
    kdev_name: String,
    path_groups: Vec<PathGroup>,
}

impl MPath {
    /// World-wide identifier of the backing volume.
    pub fn wwid(&self) -> &str {
        &self.wwid
    }

    /// Map name or alias; may change, unlike the WWID.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kernel device name used in uevents, e.g. `dm-3`.
    pub fn kdev_name(&self) -> &str {
        &self.kdev_name
    }

    pub fn path_groups(&self) -> &[PathGroup] {
        &self.path_groups
    }

    /// All paths of every group, in group order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.path_groups.iter().flat_map(|pg| pg.paths.iter())
    }
}

impl fmt::Display for MPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'|'{}'", self.wwid, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "name": "mpatha",
        "uuid": "3600508b4000156d700012000000b0000",
        "sysfs": "dm-3",
        "failback": "immediate",
        "path_groups": [
            {
                "selector": "service-time 0",
                "pri": 50,
                "dm_st": "active",
                "group": 1,
                "paths": [
                    {"dev": "sda", "chk_st": "ready", "dev_st": "running"},
                    {"dev": "sdc", "chk_st": "faulty"}
                ]
            },
            {
                "selector": "service-time 0",
                "pri": 10,
                "dm_st": "enabled",
                "group": 2,
                "paths": [
                    {"dev": "sdb", "chk_st": "ghost"}
                ]
            }
        ]
    }"#;

    #[test]
    fn builds_map_from_daemon_fields() {
        let map: MPath = serde_json::from_str(MAP).unwrap();
        assert_eq!(map.wwid(), "3600508b4000156d700012000000b0000");
        assert_eq!(map.name(), "mpatha");
        assert_eq!(map.kdev_name(), "dm-3");
        assert_eq!(map.path_groups().len(), 2);

        let pg = &map.path_groups()[0];
        assert_eq!(pg.id(), 1);
        assert_eq!(pg.priority(), 50);
        assert_eq!(pg.selector(), "service-time 0");
        assert_eq!(pg.status(), PathGroupStatus::Active);
        assert_eq!(pg.status_string(), "active");
        assert_eq!(pg.paths()[1].status(), PathStatus::Down);
    }

    #[test]
    fn flattened_paths_keep_group_order() {
        let map: MPath = serde_json::from_str(MAP).unwrap();
        let devs: Vec<&str> = map.paths().map(Path::blk_name).collect();
        assert_eq!(devs, ["sda", "sdc", "sdb"]);
    }

    #[test]
    fn display_formats() {
        let map: MPath = serde_json::from_str(MAP).unwrap();
        assert_eq!(map.to_string(), "'3600508b4000156d700012000000b0000'|'mpatha'");
        assert_eq!(map.path_groups()[1].to_string(), "2|enabled|10");
        assert_eq!(map.path_groups()[1].paths()[0].to_string(), "sdb|ghost");
    }

    #[test]
    fn unknown_status_strings_do_not_fail() {
        let path: Path = serde_json::from_str(r#"{"dev": "sdz", "chk_st": "wobbly"}"#).unwrap();
        assert_eq!(path.status(), PathStatus::Unknown);
        assert_eq!(path.status_string(), "undef");
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = serde_json::from_str::<Path>(r#"{"dev": "sda"}"#).unwrap_err();
        assert!(err.to_string().contains("chk_st"));

        let err = serde_json::from_str::<PathGroup>(
            r#"{"group": "one", "pri": 1, "selector": "", "dm_st": "active", "paths": []}"#,
        )
        .unwrap_err();
        assert!(err.is_data());
    }
}
