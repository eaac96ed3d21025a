use crate::{
    AdminStats, Apartment, ApartmentFilter, ApartmentInput, Booking, Complaint, ComplaintCategory,
    ComplaintPriority, ComplaintStatus, Payment, PaymentType, UserProfile,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};
use std::borrow::Cow;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

// =========================================================
// Errors
// =========================================================

/// Uniform failure shape for every API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Coerce a non-2xx response body into an `ApiError`.
    ///
    /// A server payload carrying a non-blank string `message` is passed
    /// through as-is; anything else falls back to the operation's own message.
    pub fn from_error_body(body: &str, fallback: &str) -> Self {
        #[derive(Deserialize)]
        struct ServerError {
            message: String,
        }

        match serde_json::from_str::<ServerError>(body) {
            Ok(payload) if !payload.message.trim().is_empty() => Self::new(payload.message),
            _ => Self::new(fallback),
        }
    }
}

// =========================================================
// Request Trait
// =========================================================

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Message surfaced when the server cannot be reached or gives no usable error.
    const FALLBACK_ERROR: &'static str;

    /// The URL path relative to the API base, always starting with `/`.
    fn path(&self) -> Cow<'static, str>;

    /// Query parameters appended to the path.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Path plus the url-encoded query string, if any.
    fn path_and_query(&self) -> String {
        let path = self.path();
        let pairs = self.query();
        if pairs.is_empty() {
            return path.into_owned();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}?{}", path, query)
    }

    /// JSON body for methods that carry one.
    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        if Self::METHOD.carries_body() {
            serde_json::to_string(self).map(Some)
        } else {
            Ok(None)
        }
    }
}

// =========================================================
// Authentication
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to connect to server";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/login")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ApiRequest for RegisterRequest {
    // The service's registration payload is not used by the client.
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to connect to server";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/register")
    }
}

// =========================================================
// Apartments
// =========================================================

/// List apartments matching a filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListApartmentsRequest {
    #[serde(skip)]
    pub filter: ApartmentFilter,
}

impl ApiRequest for ListApartmentsRequest {
    type Response = Vec<Apartment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch apartments";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/apartments")
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.filter.query_pairs()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetApartmentRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for GetApartmentRequest {
    type Response = Apartment;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch apartment details";

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/apartments/{}", self.id))
    }
}

/// Visitor booking request for an apartment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookApartmentRequest {
    #[serde(skip)]
    pub apartment_id: i64,
    pub move_in_date: Option<NaiveDate>,
    pub message: Option<String>,
}

impl ApiRequest for BookApartmentRequest {
    type Response = Booking;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to book apartment";

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/apartments/{}/book", self.apartment_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApartmentRequest(pub ApartmentInput);

impl ApiRequest for CreateApartmentRequest {
    type Response = Apartment;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to create apartment";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/apartments")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApartmentRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub apartment: ApartmentInput,
}

impl ApiRequest for UpdateApartmentRequest {
    type Response = Apartment;
    const METHOD: HttpMethod = HttpMethod::Put;
    const FALLBACK_ERROR: &'static str = "Unable to update apartment";

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/apartments/{}", self.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteApartmentRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteApartmentRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const FALLBACK_ERROR: &'static str = "Unable to delete apartment";

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/apartments/{}", self.id))
    }
}

// =========================================================
// Complaints
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
}

impl ApiRequest for CreateComplaintRequest {
    type Response = Complaint;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to create complaint";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/complaints")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListComplaintsRequest {
    #[serde(skip)]
    pub status: Option<ComplaintStatus>,
}

impl ApiRequest for ListComplaintsRequest {
    type Response = Vec<Complaint>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch complaints";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/complaints")
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateComplaintStatusRequest {
    #[serde(skip)]
    pub id: i64,
    pub status: ComplaintStatus,
}

impl ApiRequest for UpdateComplaintStatusRequest {
    type Response = Complaint;
    const METHOD: HttpMethod = HttpMethod::Patch;
    const FALLBACK_ERROR: &'static str = "Unable to update complaint status";

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/complaints/{}", self.id))
    }
}

// =========================================================
// Payments
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakePaymentRequest {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub amount: f64,
    pub description: Option<String>,
    pub payment_method: String,
}

impl ApiRequest for MakePaymentRequest {
    type Response = Payment;
    const METHOD: HttpMethod = HttpMethod::Post;
    const FALLBACK_ERROR: &'static str = "Unable to process payment";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/payments")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistoryRequest;

impl ApiRequest for PaymentHistoryRequest {
    type Response = Vec<Payment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch payment history";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/payments/history")
    }
}

// =========================================================
// Users & Admin
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch user profile";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/users/profile")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Put;
    const FALLBACK_ERROR: &'static str = "Unable to update user profile";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/users/profile")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatsRequest;

impl ApiRequest for AdminStatsRequest {
    type Response = AdminStats;
    const METHOD: HttpMethod = HttpMethod::Get;
    const FALLBACK_ERROR: &'static str = "Unable to fetch admin statistics";

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/admin/stats")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_server_message_passes_through() {
        let err = ApiError::from_error_body(
            r#"{"message":"Invalid email or password"}"#,
            LoginRequest::FALLBACK_ERROR,
        );
        assert_eq!(err.message, "Invalid email or password");
    }

    #[test]
    fn test_unusable_error_body_uses_fallback() {
        for body in ["", "<html>502</html>", r#"{"error":"Bad Gateway"}"#, "null"] {
            let err = ApiError::from_error_body(body, ListApartmentsRequest::FALLBACK_ERROR);
            assert_eq!(err.message, "Unable to fetch apartments");
        }
    }

    #[test]
    fn test_blank_server_message_uses_fallback() {
        let spring_default = r#"{"status":500,"error":"Internal Server Error","message":""}"#;
        for body in [spring_default, r#"{"message":"   "}"#] {
            let err = ApiError::from_error_body(body, ListApartmentsRequest::FALLBACK_ERROR);
            assert_eq!(err.message, "Unable to fetch apartments");
        }
    }

    #[test]
    fn test_get_requests_have_no_body() {
        let req = ListApartmentsRequest::default();
        assert_eq!(req.body().unwrap(), None);
        assert_eq!(req.path_and_query(), "/apartments");
    }

    #[test]
    fn test_filtered_listing_encodes_query() {
        let req = ListApartmentsRequest {
            filter: ApartmentFilter {
                is_available: Some(false),
                floor_number: Some(4),
                ..ApartmentFilter::default()
            },
        };
        assert_eq!(req.path_and_query(), "/apartments?isAvailable=false&floorNumber=4");
    }

    #[test]
    fn test_path_ids_are_not_serialized_into_body() {
        let req = UpdateComplaintStatusRequest {
            id: 42,
            status: ComplaintStatus::InProgress,
        };
        assert_eq!(req.path(), "/complaints/42");
        let body: Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(body, json!({ "status": "IN_PROGRESS" }));

        let book = BookApartmentRequest {
            apartment_id: 9,
            move_in_date: NaiveDate::from_ymd_opt(2024, 9, 1),
            message: None,
        };
        assert_eq!(book.path(), "/apartments/9/book");
        let body: Value = serde_json::from_str(&book.body().unwrap().unwrap()).unwrap();
        assert_eq!(body, json!({ "moveInDate": "2024-09-01", "message": null }));
    }

    #[test]
    fn test_payment_body_uses_wire_names() {
        let req = MakePaymentRequest {
            payment_type: PaymentType::Rent,
            amount: 1200.0,
            description: None,
            payment_method: "CARD".into(),
        };
        let body: Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(body["type"], "RENT");
        assert_eq!(body["paymentMethod"], "CARD");
    }

    #[test]
    fn test_delete_accepts_any_response() {
        let _: <DeleteApartmentRequest as ApiRequest>::Response =
            serde_json::from_str("null").unwrap();
        let _: <DeleteApartmentRequest as ApiRequest>::Response =
            serde_json::from_str(r#"{"deleted":true}"#).unwrap();
    }
}
