//! Checkout redirection and return-URL session extraction.
//!
//! Buying credits is a full-page redirect to the hosted checkout page of the
//! selected tier. After payment the hosted page redirects back to
//! `{frontend}/credits/success?session_id=...`; `session_from_return_url`
//! recovers that token so the payment confirmation poller can pick it up.

use niwi_core::CreditPackage;
use reqwest::Url;

/// Extract the `session_id` query parameter from a checkout return URL.
///
/// Returns `None` when the parameter is absent or empty; the workflow then
/// goes straight to its error view without any network call.
#[must_use]
pub fn session_from_return_url(return_url: &str) -> Option<String> {
    let url = Url::parse(return_url).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "session_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// The hosted checkout page for a package tier.
///
/// No parameters are passed; the hosted page carries the return URL itself.
#[must_use]
pub fn checkout_redirect(package: CreditPackage) -> &'static str {
    package.checkout_url()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_session_id() {
        let url = "https://app.niwi.ca/credits/success?session_id=cs_test_a1B2c3";
        assert_eq!(
            session_from_return_url(url).as_deref(),
            Some("cs_test_a1B2c3")
        );
    }

    #[test]
    fn extracts_among_other_parameters() {
        let url = "https://app.niwi.ca/credits/success?utm_source=stripe&session_id=cs_123&lang=en";
        assert_eq!(session_from_return_url(url).as_deref(), Some("cs_123"));
    }

    #[test]
    fn absent_parameter_is_none() {
        assert_eq!(
            session_from_return_url("https://app.niwi.ca/credits/success"),
            None
        );
    }

    #[test]
    fn empty_parameter_is_none() {
        assert_eq!(
            session_from_return_url("https://app.niwi.ca/credits/success?session_id="),
            None
        );
    }

    #[test]
    fn unparsable_url_is_none() {
        assert_eq!(session_from_return_url("not a url"), None);
    }

    #[test]
    fn every_tier_has_a_checkout_page() {
        for package in CreditPackage::ALL {
            assert!(checkout_redirect(package).starts_with("https://"));
        }
    }
}
