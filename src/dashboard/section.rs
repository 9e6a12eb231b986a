//! The fixed registry of independently fetched dashboard sections.

/// One of the four dashboard data groups. Each section loads, fails, and
/// retries independently of the others.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Profile,
    Stats,
    Bookings,
    Messages,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Profile,
        Section::Stats,
        Section::Bookings,
        Section::Messages,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub(crate) fn index(self) -> usize {
        match self {
            Section::Profile => 0,
            Section::Stats => 1,
            Section::Bookings => 2,
            Section::Messages => 3,
        }
    }

    /// Keyboard shortcut shown next to the retry hint.
    pub fn hotkey(self) -> char {
        match self {
            Section::Profile => '1',
            Section::Stats => '2',
            Section::Bookings => '3',
            Section::Messages => '4',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_the_registry() {
        for (position, section) in Section::ALL.iter().enumerate() {
            assert_eq!(section.index(), position);
        }
    }

    #[test]
    fn display_uses_lowercase_keys() {
        assert_eq!(Section::Profile.to_string(), "profile");
        assert_eq!(Section::Messages.to_string(), "messages");
    }
}
