//! Contact normalization.
//!
//! Flattens a [`RawContact`] into a [`NormalizedContact`], or returns `None`
//! when the contact carries nothing worth writing. Pure and deterministic.

use serde_json::Value;

use crate::models::{NormalizedContact, RawContact};

/// Normalize one raw contact.
///
/// Returns `None` when every identifying field is empty: display name, job
/// title, company, department, office, mobile phone, primary email and all
/// business phones. `title` on its own does not keep a contact.
pub fn normalize_contact(contact: &RawContact) -> Option<NormalizedContact> {
    let text = |name: &str| contact.field(name).map(scalar_text).unwrap_or_default();

    let phones: Vec<String> = array_items(contact.field("businessPhones"))
        .iter()
        .map(scalar_text)
        .filter(|p| !p.is_empty())
        .collect();

    let primary_email = array_items(contact.field("emailAddresses"))
        .first()
        .and_then(|email| email.get("address"))
        .map(scalar_text)
        .unwrap_or_default();

    let normalized = NormalizedContact {
        display_name: text("displayName"),
        title: text("title"),
        job_title: text("jobTitle"),
        company_name: text("companyName"),
        department: text("department"),
        office_location: text("officeLocation"),
        mobile_phone: text("mobilePhone"),
        business_phones: phones.join(", "),
        primary_email,
    };

    let has_any = [
        &normalized.display_name,
        &normalized.job_title,
        &normalized.company_name,
        &normalized.department,
        &normalized.office_location,
        &normalized.mobile_phone,
        &normalized.primary_email,
    ]
    .iter()
    .any(|v| !v.is_empty())
        || !phones.is_empty();

    has_any.then_some(normalized)
}

/// Convert a JSON scalar to trimmed text.
///
/// Null, `false`, zero and the empty string all mean "no value". Arrays and
/// objects are not scalars and also yield `""`.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => String::new(),
            // `1.0` renders as `1`.
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.trim().to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn array_items(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}
