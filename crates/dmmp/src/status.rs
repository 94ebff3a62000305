//! Path and path group states reported by multipathd.
//!
//! Each enum is declared once as `Variant = code => "string"`; the numeric
//! code, the display string and the reverse lookup all derive from that
//! single table. Strings multipathd adds later map to `Unknown` instead of
//! failing, so the daemon's vocabulary can grow independently of this crate.

use std::fmt;

macro_rules! status_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal => $text:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $code,
            )+
        }

        impl $name {
            /// Every status, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Numeric status code.
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Status string as multipathd prints it.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Look up a status by numeric code.
            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Map a multipathd status string, falling back to `Unknown`.
            pub fn from_status_str(text: &str) -> Self {
                match text {
                    $($text => $name::$variant,)+
                    _ => {
                        tracing::trace!(
                            status = text,
                            kind = stringify!($name),
                            "unrecognized status string"
                        );
                        $name::Unknown
                    }
                }
            }

            /// Status string for a numeric code; `"undef"` for codes outside the table.
            pub fn code_to_str(code: u8) -> &'static str {
                Self::from_code(code).unwrap_or($name::Unknown).as_str()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Unknown
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self::from_status_str(text)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_status_str(&text))
            }
        }
    };
}

status_table! {
    /// Checker state of a single path (`chk_st`).
    pub enum PathStatus {
        /// Unknown status.
        Unknown = 0 => "undef",
        /// Path is down and you shouldn't try to send commands to it.
        Down = 2 => "faulty",
        /// Path is up and I/O can be sent to it.
        Up = 3 => "ready",
        /// Only the emc_clariion checker, when the path is not available for
        /// "normal" operations.
        Shaky = 4 => "shaky",
        /// Only the hp_sw and rdac checkers. A passive/standby path on an
        /// active/passive array: it answers TUR, READ CAPACITY and INQUIRY but
        /// fails I/O until it is sent an initialization command.
        Ghost = 5 => "ghost",
        /// An async checker has a check I/O in flight.
        Pending = 6 => "i/o pending",
        /// Only the tur checker, when the command timed out.
        Timeout = 7 => "i/o timeout",
        /// The path failed shortly after coming up and is held back until it
        /// has stayed up for `delay_wait_checks` checks.
        Delayed = 9 => "delayed",
    }
}

status_table! {
    /// Device-mapper state of a path group (`dm_st`).
    pub enum PathGroupStatus {
        /// Unknown status.
        Unknown = 0 => "undef",
        /// Standby, ready to become active.
        Enabled = 1 => "enabled",
        /// Disabled because all its paths are down.
        Disabled = 2 => "disabled",
        /// Selected to handle I/O.
        Active = 3 => "active",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_status_table_roundtrips() {
        for status in PathStatus::ALL {
            assert_eq!(PathStatus::from_status_str(status.as_str()), *status);
            assert_eq!(PathStatus::from_code(status.code()), Some(*status));
        }
        assert_eq!(PathStatus::ALL.len(), 8);
    }

    #[test]
    fn path_group_status_table_roundtrips() {
        for status in PathGroupStatus::ALL {
            assert_eq!(PathGroupStatus::from_status_str(status.as_str()), *status);
            assert_eq!(PathGroupStatus::from_code(status.code()), Some(*status));
        }
        assert_eq!(PathGroupStatus::ALL.len(), 4);
    }

    #[test]
    fn path_status_codes_match_checker_values() {
        assert_eq!(PathStatus::Unknown.code(), 0);
        assert_eq!(PathStatus::Down.code(), 2);
        assert_eq!(PathStatus::Up.code(), 3);
        assert_eq!(PathStatus::Ghost.code(), 5);
        assert_eq!(PathStatus::Delayed.code(), 9);
        assert_eq!(PathStatus::from_code(1), None);
        assert_eq!(PathStatus::from_code(8), None);
    }

    #[test]
    fn multipathd_strings() {
        assert_eq!(PathStatus::from("ready"), PathStatus::Up);
        assert_eq!(PathStatus::from("faulty"), PathStatus::Down);
        assert_eq!(PathStatus::from("i/o pending"), PathStatus::Pending);
        assert_eq!(PathStatus::Timeout.to_string(), "i/o timeout");
        assert_eq!(PathGroupStatus::from("active"), PathGroupStatus::Active);
        assert_eq!(PathGroupStatus::Enabled.to_string(), "enabled");
    }

    #[test]
    fn unrecognized_strings_are_unknown() {
        for text in ["", "READY", "up", "i/o  pending", "standby", "undef "] {
            assert_eq!(PathStatus::from_status_str(text), PathStatus::Unknown);
            assert_eq!(PathGroupStatus::from_status_str(text), PathGroupStatus::Unknown);
        }
    }

    #[test]
    fn code_to_str_defaults_to_undef() {
        assert_eq!(PathStatus::code_to_str(3), "ready");
        assert_eq!(PathStatus::code_to_str(200), "undef");
        assert_eq!(PathGroupStatus::code_to_str(2), "disabled");
        assert_eq!(PathGroupStatus::code_to_str(7), "undef");
    }

    #[test]
    fn deserialize_from_daemon_string() {
        let status: PathStatus = serde_json::from_str("\"ghost\"").unwrap();
        assert_eq!(status, PathStatus::Ghost);
        let status: PathGroupStatus = serde_json::from_str("\"switching\"").unwrap();
        assert_eq!(status, PathGroupStatus::Unknown);
        assert!(serde_json::from_str::<PathStatus>("3").is_err());
    }
}
