//! Credit package catalog.
//!
//! Professionals buy one of six fixed packages. Each package maps to a
//! hosted checkout page; the checkout provider redirects back to the app
//! with a `session_id` query parameter that the payment confirmation
//! workflow polls on.

use serde::{Deserialize, Serialize};

/// A purchasable credit package tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditPackage {
    /// Tester Pack: 3 credits for $150.
    #[serde(rename = "starter_10")]
    Starter10,

    /// 777 Pack: 25 credits for $499.
    #[serde(rename = "basic_25")]
    Basic25,

    /// Elite Pack: 20 exclusive credits for $1,500.
    #[serde(rename = "professional_50")]
    Professional50,

    /// Pro Pack: 30 exclusive credits for $2,000.
    #[serde(rename = "premium_100")]
    Premium100,

    /// Premium Deluxe: 100 credits for $6,000.
    #[serde(rename = "business_250")]
    Business250,

    /// Enterprise Deluxe: 200 credits for $13,250.
    #[serde(rename = "enterprise_500")]
    Enterprise500,
}

impl CreditPackage {
    /// All package tiers, cheapest first.
    pub const ALL: [Self; 6] = [
        Self::Starter10,
        Self::Basic25,
        Self::Professional50,
        Self::Premium100,
        Self::Business250,
        Self::Enterprise500,
    ];

    /// Number of credits granted by this package.
    #[must_use]
    pub const fn credits(&self) -> i64 {
        match self {
            Self::Starter10 => 3,
            Self::Basic25 => 25,
            Self::Professional50 => 20,
            Self::Premium100 => 30,
            Self::Business250 => 100,
            Self::Enterprise500 => 200,
        }
    }

    /// Price in cents USD.
    #[must_use]
    pub const fn price_cents(&self) -> i64 {
        match self {
            Self::Starter10 => 15_000,
            Self::Basic25 => 49_900,
            Self::Professional50 => 150_000,
            Self::Premium100 => 200_000,
            Self::Business250 => 600_000,
            Self::Enterprise500 => 1_325_000,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Starter10 => "Tester Pack",
            Self::Basic25 => "777 Pack",
            Self::Professional50 => "Elite Pack",
            Self::Premium100 => "Pro Pack",
            Self::Business250 => "Premium Deluxe",
            Self::Enterprise500 => "Enterprise Deluxe",
        }
    }

    /// Marketing description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Starter10 => "Perfect for testing the platform",
            Self::Basic25 => "Great for small businesses",
            Self::Professional50 => "20 Exclusive leads for growing businesses",
            Self::Premium100 => "30 Exclusive leads for active professionals",
            Self::Business250 => "For established businesses",
            Self::Enterprise500 => "200 quality leads for large operations",
        }
    }

    /// Fixed hosted checkout URL for this tier.
    ///
    /// The hosted page redirects back to
    /// `{frontend}/credits/success?session_id=...` after payment.
    #[must_use]
    pub const fn checkout_url(&self) -> &'static str {
        match self {
            Self::Starter10 => "https://buy.stripe.com/7sY7sEcN8ghrcDl5W3gUM07",
            Self::Basic25 => "https://buy.stripe.com/7sYfZacN82qBcDl707gUM02",
            Self::Professional50 => "https://buy.stripe.com/4gM7sEbJ48OZcDl2JRgUM06",
            Self::Premium100 => "https://buy.stripe.com/9B6aEQ5kG7KVavd0BJgUM03",
            Self::Business250 => "https://buy.stripe.com/cNi9AM28ughrcDl4RZgUM01",
            Self::Enterprise500 => "https://buy.stripe.com/3cIcMYdRce9javdeszgUM04",
        }
    }

    /// Price per credit in cents, rounded to the nearest cent.
    #[must_use]
    pub const fn price_per_credit_cents(&self) -> i64 {
        self.price_cents() / self.credits()
    }

    /// Wire name of the tier (the serde representation).
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Starter10 => "starter_10",
            Self::Basic25 => "basic_25",
            Self::Professional50 => "professional_50",
            Self::Premium100 => "premium_100",
            Self::Business250 => "business_250",
            Self::Enterprise500 => "enterprise_500",
        }
    }
}

impl std::fmt::Display for CreditPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_complete() {
        assert_eq!(CreditPackage::ALL.len(), 6);
        for package in CreditPackage::ALL {
            assert!(package.credits() > 0);
            assert!(package.price_cents() > 0);
            assert!(package.checkout_url().starts_with("https://"));
        }
    }

    #[test]
    fn wire_names_roundtrip_through_serde() {
        for package in CreditPackage::ALL {
            let json = serde_json::to_string(&package).unwrap();
            assert_eq!(json, format!("\"{}\"", package.wire_name()));
            let parsed: CreditPackage = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, package);
        }
    }

    #[test]
    fn tester_pack_values() {
        let pack = CreditPackage::Starter10;
        assert_eq!(pack.credits(), 3);
        assert_eq!(pack.price_cents(), 15_000);
        assert_eq!(pack.price_per_credit_cents(), 5_000);
        assert_eq!(pack.name(), "Tester Pack");
    }

    #[test]
    fn unknown_package_rejected() {
        let result: Result<CreditPackage, _> = serde_json::from_str("\"mega_9000\"");
        assert!(result.is_err());
    }
}
