use std::{fmt::Display, str::FromStr};

/// Merchant region. Swipe runs a separate API deployment per country.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    #[default]
    Nz,
    Ca,
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nz => f.write_str("NZ"),
            Self::Ca => f.write_str("CA"),
        }
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NZ" => Ok(Self::Nz),
            "CA" => Ok(Self::Ca),
            _ => Err(UnknownRegion(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl std::error::Error for UnknownRegion {}

impl Display for UnknownRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown Swipe region {:?}, expected NZ or CA", self.0)
    }
}

/// Names of the form fields sent to the transaction endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub merchant_id: &'static str,
    pub api_key: &'static str,
    pub test: &'static str,
    pub amount: &'static str,
    pub currency: &'static str,
    pub card_number: &'static str,
    pub card_type: &'static str,
    pub name_on_card: &'static str,
    pub card_expiry: &'static str,
    pub secure_number: &'static str,
    pub email: &'static str,
    pub ip_address: &'static str,
    pub order_id: &'static str,
    pub description: &'static str,
    pub company: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub country: &'static str,
    pub mobile: &'static str,
}

impl Fields {
    pub const SHOPIFY: Fields = Fields {
        merchant_id: "merchant_id",
        api_key: "api_key",
        test: "test",
        amount: "amount",
        currency: "currency",
        card_number: "card_number",
        card_type: "card_type",
        name_on_card: "name_on_card",
        card_expiry: "card_expiry",
        secure_number: "secure_number",
        email: "email",
        ip_address: "ip_address",
        order_id: "order_id",
        description: "description",
        company: "company",
        first_name: "first_name",
        last_name: "last_name",
        address: "address",
        city: "city",
        country: "country",
        mobile: "mobile",
    };
}

/// Static per-region gateway data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionProfile {
    pub region: Region,
    pub live_url: &'static str,
    pub test_url: &'static str,
    pub transaction_path: &'static str,
    pub currencies_path: &'static str,
    pub default_currency: &'static str,
    pub fields: &'static Fields,
}

pub const DISPLAY_NAME: &str = "Swipe Checkout";
pub const HOMEPAGE_URL: &str = "https://www.swipehq.com/checkout";
pub const SUPPORTED_CARD_TYPES: &[&str] = &["visa", "master"];

static NZ: RegionProfile = RegionProfile {
    region: Region::Nz,
    live_url: "https://api.swipehq.com",
    test_url: "https://api.swipehq.com",
    transaction_path: "/createShopifyTransaction.php",
    currencies_path: "/fetchCurrencyCodes.php",
    default_currency: "NZD",
    fields: &Fields::SHOPIFY,
};

static CA: RegionProfile = RegionProfile {
    region: Region::Ca,
    live_url: "https://api.swipehq.ca",
    test_url: "https://api.swipehq.ca",
    transaction_path: "/createShopifyTransaction.php",
    currencies_path: "/fetchCurrencyCodes.php",
    default_currency: "CAD",
    fields: &Fields::SHOPIFY,
};

impl RegionProfile {
    pub fn get(region: Region) -> &'static RegionProfile {
        match region {
            Region::Nz => &NZ,
            Region::Ca => &CA,
        }
    }

    pub fn base_url(&self, test: bool) -> &'static str {
        if test { self.test_url } else { self.live_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_region_has_profile() {
        for region in [Region::Nz, Region::Ca] {
            assert_eq!(RegionProfile::get(region).region, region);
        }
    }

    #[test]
    fn canada_uses_ca_domain() {
        let profile = RegionProfile::get(Region::Ca);
        assert_eq!(profile.base_url(false), "https://api.swipehq.ca");
        assert_eq!(profile.default_currency, "CAD");
    }

    #[test]
    fn parse_region() {
        assert_eq!("nz".parse::<Region>().unwrap(), Region::Nz);
        assert_eq!(" CA ".parse::<Region>().unwrap(), Region::Ca);
        assert!("AU".parse::<Region>().is_err());
    }

    #[test]
    fn region_serde_is_uppercase() {
        let region: Region = serde_json::from_str(r#""CA""#).unwrap();
        assert_eq!(region, Region::Ca);
        assert_eq!(serde_json::to_string(&Region::Nz).unwrap(), r#""NZ""#);
    }
}
