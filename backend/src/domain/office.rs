//! Office table and network-origin resolution.
//!
//! The table is loaded once at start-up and never mutated. Resolution is an
//! exact string match on the caller's trusted origin: no CIDR ranges, no
//! normalisation, and no fallback office.

use std::collections::HashMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One physical office reachable from a single public address.
///
/// ## Invariants
/// - `network_address` parses as an IP address and carries no surrounding
///   whitespace.
/// - `display_name`, `emoji` and `status_text` are non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeRecord {
    network_address: String,
    display_name: String,
    emoji: String,
    status_text: String,
}

/// Validation failures raised while building the office table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfficeTableError {
    /// A field was blank once trimmed.
    #[error("office {address:?} has a blank {field}")]
    BlankField {
        /// Address of the offending record.
        address: String,
        /// Name of the blank field.
        field: &'static str,
    },
    /// The address is not a bare IP address.
    #[error("office address {address:?} is not a valid IP address")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },
    /// Two records share the same address.
    #[error("office address {address} is listed more than once")]
    DuplicateAddress {
        /// The repeated address.
        address: String,
    },
    /// The table contained no offices at all.
    #[error("office table must contain at least one office")]
    Empty,
    /// The table source could not be decoded.
    #[error("office table is not valid JSON: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },
}

impl OfficeRecord {
    /// Validate and construct an office record.
    ///
    /// # Examples
    /// ```
    /// use checkin::domain::OfficeRecord;
    ///
    /// let office = OfficeRecord::new("39.110.215.6", "銀座オフィス", ":office:", "銀座オフィスで勤務中")
    ///     .expect("valid office");
    /// assert_eq!(office.emoji(), ":office:");
    /// ```
    pub fn new(
        network_address: impl Into<String>,
        display_name: impl Into<String>,
        emoji: impl Into<String>,
        status_text: impl Into<String>,
    ) -> Result<Self, OfficeTableError> {
        let network_address = network_address.into();
        if network_address.trim() != network_address
            || network_address.parse::<IpAddr>().is_err()
        {
            return Err(OfficeTableError::InvalidAddress {
                address: network_address,
            });
        }

        let record = Self {
            network_address,
            display_name: display_name.into(),
            emoji: emoji.into(),
            status_text: status_text.into(),
        };
        for (field, value) in [
            ("display name", &record.display_name),
            ("emoji", &record.emoji),
            ("status text", &record.status_text),
        ] {
            if value.trim().is_empty() {
                return Err(OfficeTableError::BlankField {
                    address: record.network_address.clone(),
                    field,
                });
            }
        }
        Ok(record)
    }

    /// Public address the office egresses from.
    pub fn network_address(&self) -> &str {
        self.network_address.as_str()
    }

    /// Human-readable office name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Slack emoji shortcode shown next to the status.
    pub fn emoji(&self) -> &str {
        self.emoji.as_str()
    }

    /// Status text written to the profile on check-in.
    pub fn status_text(&self) -> &str {
        self.status_text.as_str()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OfficeRecordDto {
    network_address: String,
    display_name: String,
    emoji: String,
    status_text: String,
}

/// Immutable office table keyed by network address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeDirectory {
    offices: HashMap<String, OfficeRecord>,
}

impl OfficeDirectory {
    /// Build a directory, rejecting duplicate addresses and empty tables.
    pub fn new(records: impl IntoIterator<Item = OfficeRecord>) -> Result<Self, OfficeTableError> {
        let mut offices = HashMap::new();
        for record in records {
            let address = record.network_address.clone();
            if offices.insert(address.clone(), record).is_some() {
                return Err(OfficeTableError::DuplicateAddress { address });
            }
        }
        if offices.is_empty() {
            return Err(OfficeTableError::Empty);
        }
        Ok(Self { offices })
    }

    /// Decode a JSON array of `{networkAddress, displayName, emoji, statusText}`.
    ///
    /// # Examples
    /// ```
    /// use checkin::domain::OfficeDirectory;
    ///
    /// let json = br#"[{"networkAddress":"192.0.2.10","displayName":"HQ","emoji":":office:","statusText":"At HQ"}]"#;
    /// let directory = OfficeDirectory::from_json_slice(json).expect("valid table");
    /// assert!(directory.resolve("192.0.2.10").is_some());
    /// ```
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, OfficeTableError> {
        let rows: Vec<OfficeRecordDto> =
            serde_json::from_slice(bytes).map_err(|err| OfficeTableError::Decode {
                message: err.to_string(),
            })?;
        let records = rows
            .into_iter()
            .map(|row| {
                OfficeRecord::new(
                    row.network_address,
                    row.display_name,
                    row.emoji,
                    row.status_text,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(records)
    }

    /// Built-in table used when no office file is configured.
    pub fn builtin() -> Self {
        let offices = [
            ("39.110.215.6", "銀座オフィス", ":office:", "銀座オフィスで勤務中"),
            (
                "143.189.212.172",
                "立川オフィス",
                ":cityscape:",
                "立川オフィスで勤務中",
            ),
        ]
        .into_iter()
        .map(|(address, name, emoji, status)| {
            (
                address.to_owned(),
                OfficeRecord {
                    network_address: address.to_owned(),
                    display_name: name.to_owned(),
                    emoji: emoji.to_owned(),
                    status_text: status.to_owned(),
                },
            )
        })
        .collect();
        Self { offices }
    }

    /// Resolve a trusted origin to its office by exact match.
    ///
    /// Returns `None` for any origin not present in the table; callers must
    /// reject the check-in rather than pick a default.
    pub fn resolve(&self, origin: &str) -> Option<&OfficeRecord> {
        self.offices.get(origin)
    }

    /// Number of configured offices.
    pub fn len(&self) -> usize {
        self.offices.len()
    }

    /// Always false for a successfully constructed directory.
    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }
}
