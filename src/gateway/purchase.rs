use crate::gateway::{region::Fields, transport::Form};

/// Amount in minor units with the currency it was quoted in, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub cents: u64,
    pub currency: Option<String>,
}

impl Money {
    pub fn new(cents: u64) -> Self {
        Self {
            cents,
            currency: None,
        }
    }

    pub fn with_currency(cents: u64, currency: impl Into<String>) -> Self {
        Self {
            cents,
            currency: Some(currency.into()),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    pub number: String,
    pub brand: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub month: u8,
    pub year: u16,
    pub verification_value: Option<String>,
}

// Never print card data
impl std::fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditCard")
            .field("brand", &self.brand)
            .field("month", &self.month)
            .field("year", &self.year)
            .finish_non_exhaustive()
    }
}

impl CreditCard {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// `MMYY`
    pub fn expiry(&self) -> String {
        format!("{:02}{:02}", self.month, self.year % 100)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Address {
    pub name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl Address {
    /// First word is the first name, everything after it is the last name.
    fn split_name(&self) -> (Option<&str>, Option<&str>) {
        let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            return (None, None);
        };
        match name.split_once(' ') {
            Some((first, last)) => (Some(first), Some(last.trim_start())),
            None => (Some(name), None),
        }
    }

    fn street(&self) -> Option<String> {
        match (self.address1.as_deref(), self.address2.as_deref()) {
            (Some(line1), Some(line2)) if !line2.is_empty() => Some(format!("{line1}, {line2}")),
            (Some(line1), _) => Some(line1.to_owned()),
            (None, Some(line2)) => Some(line2.to_owned()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseOptions {
    pub billing_address: Option<Address>,
    /// Used when no billing address is given
    pub address: Option<Address>,
    pub email: Option<String>,
    pub ip: Option<String>,
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

impl PurchaseOptions {
    fn address(&self) -> Option<&Address> {
        self.billing_address.as_ref().or(self.address.as_ref())
    }
}

/// Transaction form builder. Fields the caller did not supply are left out.
pub struct PurchaseRequest<'a> {
    fields: &'a Fields,
    form: Form,
}

impl<'a> PurchaseRequest<'a> {
    pub fn new(fields: &'a Fields) -> Self {
        Self {
            fields,
            form: Vec::new(),
        }
    }

    fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.form.push((name, value.into()));
    }

    fn push_opt(&mut self, name: &'static str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    pub fn add_invoice(&mut self, options: &PurchaseOptions) {
        let f = self.fields;
        self.push_opt(f.order_id, options.order_id.as_deref());
        self.push_opt(f.description, options.description.as_deref());
    }

    pub fn add_credit_card(&mut self, card: &CreditCard) {
        let f = self.fields;
        self.push(f.card_number, card.number.as_str());
        self.push_opt(f.card_type, card.brand.as_deref());
        self.push(f.name_on_card, card.name());
        self.push(f.card_expiry, card.expiry());
        self.push_opt(f.secure_number, card.verification_value.as_deref());
    }

    pub fn add_customer_data(&mut self, options: &PurchaseOptions) {
        let f = self.fields;
        self.push_opt(f.email, options.email.as_deref());
        self.push_opt(f.ip_address, options.ip.as_deref());
        let Some(address) = options.address() else {
            return;
        };
        self.push_opt(f.company, address.company.as_deref());
        let (first_name, last_name) = address.split_name();
        self.push_opt(f.first_name, first_name);
        self.push_opt(f.last_name, last_name);
        self.push_opt(f.address, address.street());
        self.push_opt(f.city, address.city.as_deref());
        self.push_opt(f.country, address.country.as_deref());
        self.push_opt(f.mobile, address.phone.as_deref());
    }

    pub fn add_amount(&mut self, money: &Money, currency: &str) {
        let f = self.fields;
        self.push(f.amount, money.cents.to_string());
        self.push(f.currency, currency);
    }

    pub fn into_form(self) -> Form {
        self.form
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn credit_card() -> CreditCard {
        CreditCard {
            number: "4000100011112224".into(),
            brand: Some("visa".into()),
            first_name: "Longbob".into(),
            last_name: "Longsen".into(),
            month: 9,
            year: 2031,
            verification_value: Some("123".into()),
        }
    }

    pub fn address() -> Address {
        Address {
            name: Some("Jim Smith Junior".into()),
            company: Some("Widgets Inc".into()),
            address1: Some("456 My Street".into()),
            address2: Some("Apt 1".into()),
            city: Some("Ottawa".into()),
            state: Some("ON".into()),
            zip: Some("K1C2N6".into()),
            country: Some("CA".into()),
            phone: Some("(555)555-5555".into()),
        }
    }

    fn value<'f>(form: &'f Form, name: &str) -> Option<&'f str> {
        form.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn amount_is_sent_in_minor_units() {
        for (cents, expected) in [(100, "100"), (1050, "1050"), (7, "7")] {
            let mut request = PurchaseRequest::new(&Fields::SHOPIFY);
            request.add_amount(&Money::new(cents), "NZD");
            let form = request.into_form();
            assert_eq!(value(&form, "amount"), Some(expected));
            assert_eq!(value(&form, "currency"), Some("NZD"));
        }
    }

    #[test]
    fn expiry_is_two_digit_month_and_year() {
        assert_eq!(credit_card().expiry(), "0931");
        let card = CreditCard {
            month: 12,
            year: 2100,
            ..credit_card()
        };
        assert_eq!(card.expiry(), "1200");
    }

    #[test]
    fn card_fields() {
        let mut request = PurchaseRequest::new(&Fields::SHOPIFY);
        request.add_credit_card(&credit_card());
        let form = request.into_form();
        assert_eq!(value(&form, "card_number"), Some("4000100011112224"));
        assert_eq!(value(&form, "card_type"), Some("visa"));
        assert_eq!(value(&form, "name_on_card"), Some("Longbob Longsen"));
        assert_eq!(value(&form, "card_expiry"), Some("0931"));
        assert_eq!(value(&form, "secure_number"), Some("123"));
    }

    #[test]
    fn address_name_is_split_on_first_space() {
        let mut request = PurchaseRequest::new(&Fields::SHOPIFY);
        let options = PurchaseOptions {
            billing_address: Some(address()),
            email: Some("joe@example.com".into()),
            ..Default::default()
        };
        request.add_customer_data(&options);
        let form = request.into_form();
        assert_eq!(value(&form, "first_name"), Some("Jim"));
        assert_eq!(value(&form, "last_name"), Some("Smith Junior"));
        assert_eq!(value(&form, "address"), Some("456 My Street, Apt 1"));
        assert_eq!(value(&form, "mobile"), Some("(555)555-5555"));
        assert_eq!(value(&form, "company"), Some("Widgets Inc"));
        assert_eq!(value(&form, "email"), Some("joe@example.com"));
        assert_eq!(value(&form, "ip_address"), None);
    }

    #[test]
    fn falls_back_to_plain_address() {
        let mut request = PurchaseRequest::new(&Fields::SHOPIFY);
        let options = PurchaseOptions {
            address: Some(Address {
                name: Some("Cher".into()),
                address1: Some("1 Main Rd".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        request.add_customer_data(&options);
        let form = request.into_form();
        assert_eq!(value(&form, "first_name"), Some("Cher"));
        assert_eq!(value(&form, "last_name"), None);
        assert_eq!(value(&form, "address"), Some("1 Main Rd"));
    }

    #[test]
    fn debug_hides_card_number() {
        let printed = format!("{:?}", credit_card());
        assert!(!printed.contains("4000100011112224"));
        assert!(!printed.contains("123"));
    }
}
