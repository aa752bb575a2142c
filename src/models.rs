//! Core data models used throughout People Sync.
//!
//! These types represent the contacts that flow from the directory API
//! through normalization and rendering into vault files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A contact exactly as the directory API returned it.
///
/// Kept as raw JSON: any field may be missing, null, or of an unexpected
/// type, and the normalizer decides what each shape means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawContact(pub Value);

impl RawContact {
    /// Look up a top-level field. Non-object contacts have no fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|obj| obj.get(name))
    }
}

impl From<Value> for RawContact {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One page of the contact collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphPage {
    /// Items on this page. Anything other than an array counts as empty.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub value: Vec<RawContact>,
    /// Absolute URL of the next page; absent on the last one.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

fn items_or_empty<'de, D>(deserializer: D) -> Result<Vec<RawContact>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().map(RawContact).collect(),
        _ => Vec::new(),
    })
}

/// The closed set of fields a template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DisplayName,
    Title,
    JobTitle,
    CompanyName,
    Department,
    OfficeLocation,
    MobilePhone,
    BusinessPhones,
    PrimaryEmail,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::DisplayName,
        Field::Title,
        Field::JobTitle,
        Field::CompanyName,
        Field::Department,
        Field::OfficeLocation,
        Field::MobilePhone,
        Field::BusinessPhones,
        Field::PrimaryEmail,
    ];

    /// Placeholder name as written in templates.
    pub fn name(self) -> &'static str {
        match self {
            Field::DisplayName => "displayName",
            Field::Title => "title",
            Field::JobTitle => "jobTitle",
            Field::CompanyName => "companyName",
            Field::Department => "department",
            Field::OfficeLocation => "officeLocation",
            Field::MobilePhone => "mobilePhone",
            Field::BusinessPhones => "businessPhones",
            Field::PrimaryEmail => "primaryEmail",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Field::DisplayName => "Full display name",
            Field::Title => "Courtesy title (Mr., Dr., ...)",
            Field::JobTitle => "Job title",
            Field::CompanyName => "Company",
            Field::Department => "Department",
            Field::OfficeLocation => "Office location",
            Field::MobilePhone => "Mobile phone number",
            Field::BusinessPhones => "Business phone numbers, comma separated",
            Field::PrimaryEmail => "First email address on the contact",
        }
    }
}

/// A contact flattened into template-ready strings.
///
/// Every value is trimmed and never absent; missing data is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContact {
    pub display_name: String,
    pub title: String,
    pub job_title: String,
    pub company_name: String,
    pub department: String,
    pub office_location: String,
    pub mobile_phone: String,
    pub business_phones: String,
    pub primary_email: String,
}

impl NormalizedContact {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::DisplayName => &self.display_name,
            Field::Title => &self.title,
            Field::JobTitle => &self.job_title,
            Field::CompanyName => &self.company_name,
            Field::Department => &self.department,
            Field::OfficeLocation => &self.office_location,
            Field::MobilePhone => &self.mobile_phone,
            Field::BusinessPhones => &self.business_phones,
            Field::PrimaryEmail => &self.primary_email,
        }
    }
}

/// Counts reported at the end of a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub written: u64,
    pub skipped: u64,
}
