use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod session;

pub use protocol::{ApiError, ApiRequest, HttpMethod};
pub use session::{DecodeError, Session, TokenClaims};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 角色 (Role)
// =========================================================

/// 用户权限类别，对应令牌中的 `role` 声明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Resident,
    Visitor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Resident, Role::Visitor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Resident => "RESIDENT",
            Role::Visitor => "VISITOR",
        }
    }

    /// 解析令牌中的角色声明，未知值返回 `None`
    pub fn from_claim(claim: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == claim)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================
//
// 以下类型均为外部服务所拥有实体的只读副本，字段宽松反序列化，
// 缺失字段取默认值。

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Apartment {
    pub id: i64,
    pub name: String,
    pub floor_number: Option<i32>,
    pub unit_number: String,
    pub area: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rent: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(alias = "available")]
    pub is_available: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// 新建或更新公寓时提交的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentInput {
    pub name: String,
    pub floor_number: Option<i32>,
    pub unit_number: String,
    pub area: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rent: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// 公寓列表筛选条件，全部为可选查询参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentFilter {
    pub is_available: Option<bool>,
    pub min_bedrooms: Option<u32>,
    pub max_rent: Option<u32>,
    pub floor_number: Option<i32>,
    pub limit: Option<u32>,
}

impl ApartmentFilter {
    /// 访客面板使用的"可预订推荐"筛选
    pub fn featured(limit: u32) -> Self {
        Self {
            is_available: Some(true),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = self.is_available {
            pairs.push(("isAvailable", v.to_string()));
        }
        if let Some(v) = self.min_bedrooms {
            pairs.push(("minBedrooms", v.to_string()));
        }
        if let Some(v) = self.max_rent {
            pairs.push(("maxRent", v.to_string()));
        }
        if let Some(v) = self.floor_number {
            pairs.push(("floorNumber", v.to_string()));
        }
        if let Some(v) = self.limit {
            pairs.push(("limit", v.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintCategory {
    #[default]
    Maintenance,
    Plumbing,
    Electrical,
    Hvac,
    Appliance,
    Noise,
    Security,
    Other,
    #[serde(other)]
    Unknown,
}

impl ComplaintCategory {
    pub const SELECTABLE: [ComplaintCategory; 8] = [
        ComplaintCategory::Maintenance,
        ComplaintCategory::Plumbing,
        ComplaintCategory::Electrical,
        ComplaintCategory::Hvac,
        ComplaintCategory::Appliance,
        ComplaintCategory::Noise,
        ComplaintCategory::Security,
        ComplaintCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "MAINTENANCE",
            Self::Plumbing => "PLUMBING",
            Self::Electrical => "ELECTRICAL",
            Self::Hvac => "HVAC",
            Self::Appliance => "APPLIANCE",
            Self::Noise => "NOISE",
            Self::Security => "SECURITY",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance",
            Self::Plumbing => "Plumbing",
            Self::Electrical => "Electrical",
            Self::Hvac => "HVAC/Air Conditioning",
            Self::Appliance => "Appliance",
            Self::Noise => "Noise Complaint",
            Self::Security => "Security",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

impl ComplaintPriority {
    pub const SELECTABLE: [ComplaintPriority; 4] = [
        ComplaintPriority::Low,
        ComplaintPriority::Medium,
        ComplaintPriority::High,
        ComplaintPriority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low - Not urgent",
            Self::Medium => "Medium - Needs attention soon",
            Self::High => "High - Urgent issue",
            Self::Critical => "Critical - Emergency",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Closed,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ComplaintStatus {
    pub const SELECTABLE: [ComplaintStatus; 5] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
        ComplaintStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Complaint {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    pub image_url: Option<String>,
    pub resolution: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    #[default]
    Rent,
    Deposit,
    Maintenance,
    Utility,
    LateFee,
    Other,
    #[serde(other)]
    Unknown,
}

impl PaymentType {
    pub const SELECTABLE: [PaymentType; 6] = [
        PaymentType::Rent,
        PaymentType::Deposit,
        PaymentType::Maintenance,
        PaymentType::Utility,
        PaymentType::LateFee,
        PaymentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "RENT",
            Self::Deposit => "DEPOSIT",
            Self::Maintenance => "MAINTENANCE",
            Self::Utility => "UTILITY",
            Self::LateFee => "LATE_FEE",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Deposit => "Deposit",
            Self::Maintenance => "Maintenance",
            Self::Utility => "Utility",
            Self::LateFee => "Late Fee",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SELECTABLE.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Late,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Late => "Late",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub id: i64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub amount: f64,
    pub description: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    pub id: i64,
    pub move_in_date: Option<NaiveDate>,
    pub status: BookingStatus,
    pub message: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub apartment: Option<Apartment>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_apartments: u64,
    pub available_apartments: u64,
    pub total_residents: u64,
    pub pending_complaints: u64,
    pub total_revenue: f64,
    pub recent_complaints: Vec<Complaint>,
    pub upcoming_payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_claim_parsing() {
        assert_eq!(Role::from_claim("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_claim("RESIDENT"), Some(Role::Resident));
        assert_eq!(Role::from_claim("VISITOR"), Some(Role::Visitor));
        assert_eq!(Role::from_claim("admin"), None);
        assert_eq!(Role::from_claim("JANITOR"), None);
    }

    #[test]
    fn test_apartment_accepts_available_alias_and_missing_fields() {
        let apt: Apartment = serde_json::from_value(json!({
            "id": 7,
            "name": "Maple Court",
            "unitNumber": "3B",
            "rent": 1250.0,
            "available": true
        }))
        .unwrap();

        assert_eq!(apt.id, 7);
        assert_eq!(apt.unit_number, "3B");
        assert!(apt.is_available);
        assert_eq!(apt.bedrooms, None);
    }

    #[test]
    fn test_unknown_enum_values_do_not_fail_payload() {
        let complaint: Complaint = serde_json::from_value(json!({
            "id": 1,
            "title": "Leak",
            "status": "ESCALATED",
            "category": "PLUMBING"
        }))
        .unwrap();

        assert_eq!(complaint.status, ComplaintStatus::Unknown);
        assert_eq!(complaint.category, ComplaintCategory::Plumbing);
    }

    #[test]
    fn test_filter_query_pairs_skip_unset_fields() {
        let filter = ApartmentFilter {
            min_bedrooms: Some(2),
            max_rent: Some(1500),
            ..ApartmentFilter::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("minBedrooms", "2".to_string()), ("maxRent", "1500".to_string())]
        );

        let featured = ApartmentFilter::featured(3);
        assert_eq!(
            featured.query_pairs(),
            vec![("isAvailable", "true".to_string()), ("limit", "3".to_string())]
        );
    }

    #[test]
    fn test_payment_type_field_rename() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 3,
            "type": "LATE_FEE",
            "amount": 25.0,
            "status": "PAID",
            "dueDate": "2024-05-01"
        }))
        .unwrap();

        assert_eq!(payment.payment_type, PaymentType::LateFee);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
