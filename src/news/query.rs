//! Inbound query parsing.

use url::form_urlencoded;

use crate::news::error::RelayError;

/// Country assumed when the caller does not name one.
pub const DEFAULT_COUNTRY: &str = "US";

/// Language assumed when the caller does not name one.
pub const DEFAULT_LANG: &str = "en";

/// Locale hint used for the US edition regardless of `lang`.
const US_LOCALE: &str = "en-US";

/// A validated news search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub location: String,
    pub country: String,
    pub lang: String,
}

impl NewsQuery {
    /// Parse the raw query string of an inbound request.
    ///
    /// Parameters are looked up by first occurrence. An empty value counts as
    /// absent, so `location=` is rejected and `country=` falls back to the default.
    pub fn from_query_str(query: Option<&str>) -> Result<Self, RelayError> {
        let raw = query.unwrap_or_default();

        let location = query_param(raw, "location").ok_or(RelayError::MissingLocation)?;
        let country = query_param(raw, "country").unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
        let lang = query_param(raw, "lang").unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Self {
            location,
            country,
            lang,
        })
    }

    /// The `hl` value sent upstream.
    ///
    /// Defaulting is per parameter, so `country=DE` alone still yields `en`.
    pub fn locale_hint(&self) -> &str {
        if self.country == DEFAULT_COUNTRY {
            US_LOCALE
        } else {
            &self.lang
        }
    }

    /// The composite `ceid` value, `COUNTRY:lang`.
    pub fn edition_id(&self) -> String {
        format!("{}:{}", self.country, self.lang)
    }
}

/// Extracts the first non-empty value of a query parameter.
fn query_param(raw: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(raw.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let query = NewsQuery::from_query_str(Some("location=Paris")).unwrap();
        assert_eq!(query.location, "Paris");
        assert_eq!(query.country, "US");
        assert_eq!(query.lang, "en");
        assert_eq!(query.locale_hint(), "en-US");
        assert_eq!(query.edition_id(), "US:en");
    }

    #[test]
    fn test_missing_location_rejected() {
        assert!(matches!(
            NewsQuery::from_query_str(None),
            Err(RelayError::MissingLocation)
        ));
        assert!(matches!(
            NewsQuery::from_query_str(Some("country=DE&lang=de")),
            Err(RelayError::MissingLocation)
        ));
    }

    #[test]
    fn test_empty_location_counts_as_missing() {
        assert!(matches!(
            NewsQuery::from_query_str(Some("location=&country=FR")),
            Err(RelayError::MissingLocation)
        ));
    }

    #[test]
    fn test_non_us_country_uses_raw_lang() {
        let query = NewsQuery::from_query_str(Some("location=Berlin&country=DE&lang=de")).unwrap();
        assert_eq!(query.locale_hint(), "de");
        assert_eq!(query.edition_id(), "DE:de");
    }

    #[test]
    fn test_us_country_ignores_lang_for_locale() {
        let query = NewsQuery::from_query_str(Some("location=Austin&lang=es")).unwrap();
        assert_eq!(query.locale_hint(), "en-US");
        assert_eq!(query.edition_id(), "US:es");
    }

    #[test]
    fn test_country_without_lang_keeps_default_lang() {
        let query = NewsQuery::from_query_str(Some("location=Munich&country=DE")).unwrap();
        assert_eq!(query.locale_hint(), "en");
        assert_eq!(query.edition_id(), "DE:en");
    }

    #[test]
    fn test_values_are_decoded_and_first_wins() {
        let query =
            NewsQuery::from_query_str(Some("location=New+York%20%26%20Co&location=Boston")).unwrap();
        assert_eq!(query.location, "New York & Co");
    }

    #[test]
    fn test_empty_country_falls_back() {
        let query = NewsQuery::from_query_str(Some("location=Lyon&country=&lang=fr")).unwrap();
        assert_eq!(query.country, "US");
        assert_eq!(query.lang, "fr");
    }
}
