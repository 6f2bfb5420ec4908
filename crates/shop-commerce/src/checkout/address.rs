//! Shipping addresses and administrative divisions.

use crate::ids::AddressId;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// A province or centrally-run city.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Province {
    /// Administrative code.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// A district within a province.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct District {
    /// Administrative code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Parent province code.
    #[serde(default)]
    pub province_code: String,
}

/// A ward within a district.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    /// Administrative code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Parent district code.
    #[serde(default)]
    pub district_code: String,
}

/// Delivery address entered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient name.
    pub full_name: String,
    /// Recipient phone number.
    pub phone: String,
    /// Contact email, required for guest orders by some backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// House number and street.
    pub street: String,
    /// Ward code.
    pub ward_code: String,
    /// District code.
    pub district_code: String,
    /// Province code.
    pub province_code: String,
    /// Ward name, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward_name: Option<String>,
    /// District name, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    /// Province name, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_name: Option<String>,
}

impl ShippingAddress {
    /// Create an address from the required fields.
    pub fn new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        street: impl Into<String>,
        ward: &Ward,
        district: &District,
        province: &Province,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            phone: phone.into(),
            email: None,
            street: street.into(),
            ward_code: ward.code.clone(),
            district_code: district.code.clone(),
            province_code: province.code.clone(),
            ward_name: Some(ward.name.clone()),
            district_name: Some(district.name.clone()),
            province_name: Some(province.name.clone()),
        }
    }

    /// Set the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let required = [
            ("fullName", &self.full_name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("wardCode", &self.ward_code),
            ("districtCode", &self.district_code),
            ("provinceCode", &self.province_code),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }

    /// Check if every required field is filled in.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Reject an incomplete address.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::ValidationError(format!(
                "shipping address is missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Format as a single line, using names where known.
    pub fn one_line(&self) -> String {
        let ward = self.ward_name.as_deref().unwrap_or(&self.ward_code);
        let district = self.district_name.as_deref().unwrap_or(&self.district_code);
        let province = self.province_name.as_deref().unwrap_or(&self.province_code);

        [self.street.as_str(), ward, district, province]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An address stored on the customer's account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    /// Address identifier.
    #[serde(alias = "_id")]
    pub id: AddressId,
    /// The address itself.
    #[serde(flatten)]
    pub address: ShippingAddress,
    /// Whether this is the customer's default.
    #[serde(default)]
    pub is_default: bool,
}
