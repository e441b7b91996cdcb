//! Off-site work locations a user may pick explicitly.
//!
//! These never stand in for an unrecognised office: they are only applied
//! when the user selects one by key.

use serde::Serialize;

/// A selectable off-site location such as remote work or a client site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLocation {
    key: &'static str,
    display_name: &'static str,
    emoji: &'static str,
    status_text: &'static str,
}

impl WorkLocation {
    /// Selection key submitted by the client (`remote`, `site`).
    pub fn key(&self) -> &str {
        self.key
    }

    /// Human-readable location name.
    pub fn display_name(&self) -> &str {
        self.display_name
    }

    /// Slack emoji shortcode shown next to the status.
    pub fn emoji(&self) -> &str {
        self.emoji
    }

    /// Status text written to the profile.
    pub fn status_text(&self) -> &str {
        self.status_text
    }
}

static LOCATIONS: [WorkLocation; 2] = [
    WorkLocation {
        key: "remote",
        display_name: "リモートワーク",
        emoji: ":heads-down:",
        status_text: "リモートワーク中",
    },
    WorkLocation {
        key: "site",
        display_name: "現場",
        emoji: ":building_construction:",
        status_text: "現場で勤務中",
    },
];

/// Catalogue of off-site locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkLocations;

impl WorkLocations {
    /// Look a location up by its selection key.
    ///
    /// # Examples
    /// ```
    /// use checkin::domain::WorkLocations;
    ///
    /// let remote = WorkLocations.find("remote").expect("remote exists");
    /// assert_eq!(remote.status_text(), "リモートワーク中");
    /// assert!(WorkLocations.find("beach").is_none());
    /// ```
    pub fn find(&self, key: &str) -> Option<&'static WorkLocation> {
        LOCATIONS.iter().find(|location| location.key == key)
    }

    /// All locations in display order.
    pub fn all(&self) -> &'static [WorkLocation] {
        &LOCATIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("remote", ":heads-down:")]
    #[case("site", ":building_construction:")]
    fn known_keys_resolve(#[case] key: &str, #[case] emoji: &str) {
        let location = WorkLocations.find(key).expect("location exists");
        assert_eq!(location.key(), key);
        assert_eq!(location.emoji(), emoji);
    }

    #[rstest]
    #[case("")]
    #[case("Remote")]
    #[case("office")]
    fn unknown_keys_do_not_resolve(#[case] key: &str) {
        assert!(WorkLocations.find(key).is_none());
    }

    #[rstest]
    fn keys_are_unique() {
        let all = WorkLocations.all();
        for (index, location) in all.iter().enumerate() {
            assert!(
                all.iter().skip(index + 1).all(|other| other.key() != location.key()),
                "duplicate key {}",
                location.key()
            );
        }
    }
}
