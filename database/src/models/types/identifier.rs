use std::fmt::{Display, Formatter};

/// A table, column or schema name that is safe to interpolate into SQL when quoted.
///
/// Identifiers can't be bound as query parameters, so names coming from clients are
/// reduced to `[A-Za-z0-9_]` and names coming from the catalog get their quotes doubled.
/// Neither constructor checks that the relation exists, the database does that.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn sanitized(raw: &str) -> Self {
        Identifier(raw.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect())
    }

    pub fn trusted(name: &str) -> Self {
        Identifier(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_strips_injection() {
        let identifier = Identifier::sanitized("orders; DROP TABLE x");
        assert_eq!(identifier.as_str(), "ordersDROPTABLEx");
        assert_eq!(identifier.quoted(), "\"ordersDROPTABLEx\"");
    }

    #[test]
    fn sanitized_only_keeps_word_characters() {
        for raw in ["a-b.c", "\"quoted\"", "naïve_table", "tab\tle", "x'; --", "Donations_2024"] {
            let identifier = Identifier::sanitized(raw);
            assert!(identifier.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_'), "{raw} -> {identifier}");
        }
        assert_eq!(Identifier::sanitized("naïve_table").as_str(), "nave_table");
    }

    #[test]
    fn sanitized_may_be_empty() {
        let identifier = Identifier::sanitized("';--");
        assert!(identifier.is_empty());
        assert_eq!(identifier.quoted(), "\"\"");
    }

    #[test]
    fn trusted_doubles_quotes() {
        assert_eq!(Identifier::trusted("we\"ird").quoted(), "\"we\"\"ird\"");
        assert_eq!(Identifier::trusted("MatchingDonationLog").quoted(), "\"MatchingDonationLog\"");
    }
}
