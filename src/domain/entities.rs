//! Domain entities. Pure data structures for the core business.
//!
//! Field names follow the camelCase document layout. `id` is the document id: it is
//! filled in on decode and never written back into the document body.

use crate::domain::{BmiCategory, MonthToken};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Timestamps are written with millisecond precision so text ordering matches time ordering.
fn serialize_millis<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn serialize_opt_millis<S: Serializer>(
    dt: &Option<DateTime<Utc>>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match dt {
        Some(dt) => serialize_millis(dt, s),
        None => s.serialize_none(),
    }
}

/// The category is re-derived on save; an unreadable stored value is dropped.
fn lenient_bmi_category<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BmiCategory>, D::Error> {
    let raw = Value::deserialize(d)?;
    Ok(serde_json::from_value(raw).ok())
}

/// A gym member's profile record (`members` collection).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(skip_serializing)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub gym_id: Option<String>,
    #[serde(serialize_with = "serialize_opt_millis")]
    pub join_date: Option<DateTime<Utc>>,

    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimetres.
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    #[serde(deserialize_with = "lenient_bmi_category")]
    pub bmi_category: Option<BmiCategory>,

    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,

    pub status: AccountStatus,
    pub membership_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

/// Account status. Values outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Other(String),
}

impl From<String> for AccountStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => AccountStatus::Active,
            "inactive" => AccountStatus::Inactive,
            "suspended" => AccountStatus::Suspended,
            _ => AccountStatus::Other(s),
        }
    }
}

impl From<AccountStatus> for String {
    fn from(s: AccountStatus) -> Self {
        s.to_string()
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Other(s) => s,
        })
    }
}

/// A complaint filed by a member (`complaints` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub member_id: String,
    /// Display name: the member's name, or "Anonymous".
    pub member_name: String,
    #[serde(default)]
    pub gym_id: Option<String>,
    pub subject: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub description: String,
    #[serde(default)]
    pub is_anonymous: bool,
    pub status: ComplaintStatus,
    /// Admin responses in stored order.
    #[serde(default)]
    pub responses: Vec<AdminResponse>,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintCategory {
    Equipment,
    Cleanliness,
    Staff,
    Facilities,
    Billing,
    Other,
}

impl ComplaintCategory {
    pub const ALL: [ComplaintCategory; 6] = [
        ComplaintCategory::Equipment,
        ComplaintCategory::Cleanliness,
        ComplaintCategory::Staff,
        ComplaintCategory::Facilities,
        ComplaintCategory::Billing,
        ComplaintCategory::Other,
    ];
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComplaintCategory::Equipment => "Equipment",
            ComplaintCategory::Cleanliness => "Cleanliness",
            ComplaintCategory::Staff => "Staff",
            ComplaintCategory::Facilities => "Facilities",
            ComplaintCategory::Billing => "Billing",
            ComplaintCategory::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl ComplaintPriority {
    pub const ALL: [ComplaintPriority; 3] = [
        ComplaintPriority::Low,
        ComplaintPriority::Medium,
        ComplaintPriority::High,
    ];
}

impl fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComplaintPriority::Low => "Low",
            ComplaintPriority::Medium => "Medium",
            ComplaintPriority::High => "High",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    /// Wire value, e.g. for equality filters against the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub responded_by: String,
    pub message: String,
    #[serde(serialize_with = "serialize_millis")]
    pub responded_at: DateTime<Utc>,
}

/// A recorded monthly payment (`payments` collection). Read-only for members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub member_id: String,
    pub month: MonthToken,
    /// Missing amounts count as zero in totals.
    #[serde(default)]
    pub amount: Option<f64>,
    pub payment_method: PaymentMethod,
    #[serde(serialize_with = "serialize_millis")]
    pub paid_at: DateTime<Utc>,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

/// Payment method. Unknown values recorded by admin tooling are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Online,
    Other(String),
}

impl From<String> for PaymentMethod {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Cash" => PaymentMethod::Cash,
            "Card" => PaymentMethod::Card,
            "UPI" => PaymentMethod::Upi,
            "Bank Transfer" => PaymentMethod::BankTransfer,
            "Online" => PaymentMethod::Online,
            _ => PaymentMethod::Other(s),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(m: PaymentMethod) -> Self {
        m.to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Online => "Online",
            PaymentMethod::Other(s) => s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complaint_status_wire_values() {
        assert_eq!(
            serde_json::to_value(ComplaintStatus::InProgress).unwrap(),
            json!("In Progress")
        );
        let s: ComplaintStatus = serde_json::from_value(json!("Resolved")).unwrap();
        assert_eq!(s, ComplaintStatus::Resolved);
        assert!(serde_json::from_value::<ComplaintStatus>(json!("Closed")).is_err());
    }

    #[test]
    fn test_member_ignores_id_on_write() {
        let m = Member {
            id: "m1".into(),
            name: "Asha".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&m).unwrap();
        assert!(v.get("id").is_none());
        assert_eq!(v["name"], "Asha");
        assert_eq!(v["status"], "active");
    }

    #[test]
    fn test_member_decodes_sparse_document() {
        let m: Member = serde_json::from_value(json!({ "name": "Ravi", "weight": 80.5 })).unwrap();
        assert_eq!(m.name, "Ravi");
        assert_eq!(m.weight, Some(80.5));
        assert_eq!(m.height, None);
        assert_eq!(m.status, AccountStatus::Active);
    }

    #[test]
    fn test_member_tolerates_unknown_status_and_category() {
        let m: Member = serde_json::from_value(json!({
            "name": "Asha",
            "status": "expired",
            "bmiCategory": "Chunky",
            "weight": 70.0
        }))
        .unwrap();
        assert_eq!(m.status, AccountStatus::Other("expired".into()));
        assert_eq!(m.bmi_category, None);
        assert_eq!(m.weight, Some(70.0));
        assert_eq!(serde_json::to_value(&m).unwrap()["status"], "expired");

        let m: Member = serde_json::from_value(json!({ "status": "suspended" })).unwrap();
        assert_eq!(m.status, AccountStatus::Suspended);
    }

    #[test]
    fn test_timestamps_written_at_millisecond_precision() {
        let whole = AdminResponse {
            responded_by: "Desk".into(),
            message: "Fixed".into(),
            responded_at: "2024-06-20T09:00:00Z".parse().unwrap(),
        };
        let v = serde_json::to_value(&whole).unwrap();
        assert_eq!(v["respondedAt"], "2024-06-20T09:00:00.000Z");

        let m = Member::default();
        assert!(serde_json::to_value(&m).unwrap()["joinDate"].is_null());
    }

    #[test]
    fn test_payment_method_keeps_unknown_values() {
        let p: PaymentMethod = serde_json::from_value(json!("Cheque")).unwrap();
        assert_eq!(p, PaymentMethod::Other("Cheque".into()));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("Cheque"));
        let p: PaymentMethod = serde_json::from_value(json!("Bank Transfer")).unwrap();
        assert_eq!(p, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_payment_missing_amount() {
        let p: Payment = serde_json::from_value(json!({
            "memberId": "m1",
            "month": "2024-05",
            "paymentMethod": "Cash",
            "paidAt": "2024-05-03T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(p.amount_or_zero(), 0.0);
        assert_eq!(p.month.to_string(), "2024-05");
    }
}
