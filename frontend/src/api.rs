//! API 网关
//!
//! 所有对外部服务的调用都经过这里：附加 Bearer 令牌、解包成功载荷、
//! 把各种失败统一为 `ApiError`。不重试、不设超时、不缓存。

use std::sync::Arc;

use ams_shared::protocol::{
    AdminStatsRequest, BookApartmentRequest, CreateApartmentRequest, CreateComplaintRequest,
    DeleteApartmentRequest, GetApartmentRequest, GetProfileRequest, ListApartmentsRequest,
    ListComplaintsRequest, LoginRequest, LoginResponse, MakePaymentRequest, PaymentHistoryRequest,
    RegisterRequest, UpdateApartmentRequest, UpdateComplaintStatusRequest, UpdateProfileRequest,
};
use ams_shared::{
    AdminStats, ApiError, ApiRequest, Apartment, ApartmentFilter, ApartmentInput, BEARER_PREFIX,
    Booking, CONTENT_TYPE_JSON, Complaint, ComplaintStatus, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE, Payment, UserProfile,
};
use leptos::prelude::*;

use crate::web::{FetchClient, HttpClient, HttpError, HttpRequest, HttpResponse};

/// 网关读取当前令牌的入口
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

impl TokenSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

#[derive(Clone)]
pub struct ApiGateway<C = FetchClient> {
    base_url: Arc<str>,
    client: C,
    tokens: Arc<dyn TokenSource + Send + Sync>,
}

impl<C: HttpClient> ApiGateway<C> {
    pub fn new(base_url: &str, client: C, tokens: impl TokenSource + Send + Sync + 'static) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            client,
            tokens: Arc::new(tokens),
        }
    }

    /// 构建请求：令牌存在时附加 Bearer 凭据，否则原样放行
    pub fn prepare<R: ApiRequest>(&self, request: &R) -> Result<HttpRequest, ApiError> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        let mut http = HttpRequest::new(url, R::METHOD);

        if let Some(token) = self.tokens.token() {
            http = http.header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token));
        }

        let body = request.body().map_err(|e| {
            tracing::error!(error = %e, "failed to serialize request body");
            ApiError::new(R::FALLBACK_ERROR)
        })?;
        if let Some(body) = body {
            http = http.header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON).body(body);
        }

        Ok(http)
    }

    /// 发送请求并把结果统一为 `Result<R::Response, ApiError>`
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let http = self.prepare(request)?;
        tracing::debug!(method = R::METHOD.as_str(), url = %http.url, "api request");
        let outcome = self.client.send(http).await;
        interpret::<R>(outcome)
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, email: String, password: String) -> Result<LoginResponse, ApiError> {
        self.send(&LoginRequest { email, password }).await
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        self.send(&request).await.map(|_| ())
    }

    // =========================================================
    // 公寓
    // =========================================================

    pub async fn apartments(&self, filter: ApartmentFilter) -> Result<Vec<Apartment>, ApiError> {
        self.send(&ListApartmentsRequest { filter }).await
    }

    pub async fn apartment(&self, id: i64) -> Result<Apartment, ApiError> {
        self.send(&GetApartmentRequest { id }).await
    }

    pub async fn book_apartment(&self, request: BookApartmentRequest) -> Result<Booking, ApiError> {
        self.send(&request).await
    }

    pub async fn create_apartment(&self, apartment: ApartmentInput) -> Result<Apartment, ApiError> {
        self.send(&CreateApartmentRequest(apartment)).await
    }

    pub async fn update_apartment(
        &self,
        id: i64,
        apartment: ApartmentInput,
    ) -> Result<Apartment, ApiError> {
        self.send(&UpdateApartmentRequest { id, apartment }).await
    }

    pub async fn delete_apartment(&self, id: i64) -> Result<(), ApiError> {
        self.send(&DeleteApartmentRequest { id }).await.map(|_| ())
    }

    // =========================================================
    // 投诉
    // =========================================================

    pub async fn create_complaint(
        &self,
        request: CreateComplaintRequest,
    ) -> Result<Complaint, ApiError> {
        self.send(&request).await
    }

    pub async fn complaints(
        &self,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<Complaint>, ApiError> {
        self.send(&ListComplaintsRequest { status }).await
    }

    pub async fn update_complaint_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Complaint, ApiError> {
        self.send(&UpdateComplaintStatusRequest { id, status }).await
    }

    // =========================================================
    // 付款
    // =========================================================

    pub async fn make_payment(&self, request: MakePaymentRequest) -> Result<Payment, ApiError> {
        self.send(&request).await
    }

    pub async fn payment_history(&self) -> Result<Vec<Payment>, ApiError> {
        self.send(&PaymentHistoryRequest).await
    }

    // =========================================================
    // 用户与管理
    // =========================================================

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.send(&GetProfileRequest).await
    }

    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        self.send(&request).await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.send(&AdminStatsRequest).await
    }
}

/// 把传输结果映射为成功载荷或 `ApiError`
fn interpret<R: ApiRequest>(
    outcome: Result<HttpResponse, HttpError>,
) -> Result<R::Response, ApiError> {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "api request did not reach the server");
            return Err(ApiError::new(R::FALLBACK_ERROR));
        }
    };

    if !response.ok() {
        tracing::warn!(status = response.status, "api request failed");
        return Err(ApiError::from_error_body(&response.body, R::FALLBACK_ERROR));
    }

    // 空响应体按 JSON null 处理
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, "api response could not be decoded");
        ApiError::new(R::FALLBACK_ERROR)
    })
}

/// 从 Context 获取 API 网关
pub fn use_api() -> ApiGateway {
    use_context::<ApiGateway>().expect("ApiGateway should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MockHttpClient;
    use ams_shared::{ComplaintCategory, ComplaintPriority};
    use serde_json::json;

    const BASE: &str = "http://ams.test/api";

    fn gateway(token: Option<&str>) -> ApiGateway<MockHttpClient> {
        ApiGateway::new(BASE, MockHttpClient::new(), token.map(str::to_string))
    }

    #[tokio::test]
    async fn test_bearer_attached_when_token_present() {
        let api = gateway(Some("abc.def.ghi"));
        api.client
            .mock_response("http://ams.test/api/users/profile", 200, json!({ "id": 1 }));

        api.profile().await.unwrap();

        let reqs = api.client.requests.borrow();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].header_value("Authorization"), Some("Bearer abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_no_bearer_without_token() {
        let api = gateway(None);
        api.client
            .mock_response("http://ams.test/api/apartments", 200, json!([]));

        api.apartments(ApartmentFilter::default()).await.unwrap();

        let reqs = api.client.requests.borrow();
        assert_eq!(reqs[0].header_value("Authorization"), None);
    }

    #[tokio::test]
    async fn test_unreachable_server_uses_operation_fallback() {
        let api = gateway(None);

        let err = api.apartments(ApartmentFilter::default()).await.unwrap_err();
        assert_eq!(err.message, "Unable to fetch apartments");

        let err = api.login("a@b.c".into(), "pw".into()).await.unwrap_err();
        assert_eq!(err.message, "Unable to connect to server");

        let err = api.admin_stats().await.unwrap_err();
        assert_eq!(err.message, "Unable to fetch admin statistics");
    }

    #[tokio::test]
    async fn test_server_error_payload_passes_through() {
        let api = gateway(None);
        api.client.mock_response(
            "http://ams.test/api/auth/login",
            401,
            json!({ "message": "Invalid email or password" }),
        );

        let err = api.login("a@b.c".into(), "bad".into()).await.unwrap_err();
        assert_eq!(err, ApiError::new("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_error_without_message_uses_fallback() {
        let api = gateway(Some("t"));
        api.client
            .mock_raw("http://ams.test/api/payments", 500, "Internal Server Error");

        let err = api
            .make_payment(MakePaymentRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unable to process payment");
    }

    #[tokio::test]
    async fn test_login_unwraps_token() {
        let api = gateway(None);
        api.client.mock_response(
            "http://ams.test/api/auth/login",
            200,
            json!({ "token": "h.p.s", "type": "Bearer" }),
        );

        let res = api.login("a@b.c".into(), "pw".into()).await.unwrap();
        assert_eq!(res.token, "h.p.s");

        let reqs = api.client.requests.borrow();
        assert_eq!(reqs[0].method, ams_shared::HttpMethod::Post);
        assert_eq!(reqs[0].header_value("Content-Type"), Some("application/json"));
        let body: serde_json::Value =
            serde_json::from_str(reqs[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "email": "a@b.c", "password": "pw" }));
    }

    #[tokio::test]
    async fn test_filtered_listing_hits_query_url() {
        let api = gateway(None);
        api.client.mock_response(
            "http://ams.test/api/apartments?isAvailable=true&limit=3",
            200,
            json!([{ "id": 1, "name": "A", "unitNumber": "1A", "rent": 900.0, "isAvailable": true }]),
        );

        let list = api.apartments(ApartmentFilter::featured(3)).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "A");
    }

    #[tokio::test]
    async fn test_empty_success_body_is_accepted() {
        let api = gateway(Some("t"));
        api.client
            .mock_raw("http://ams.test/api/apartments/5", 204, "");

        api.delete_apartment(5).await.unwrap();
        let reqs = api.client.requests.borrow();
        assert_eq!(reqs[0].method, ams_shared::HttpMethod::Delete);
        assert!(reqs[0].body.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_success_body_uses_fallback() {
        let api = gateway(Some("t"));
        api.client
            .mock_raw("http://ams.test/api/complaints", 200, "<html></html>");

        let err = api
            .create_complaint(CreateComplaintRequest {
                title: "Leak".into(),
                description: "Kitchen sink".into(),
                category: ComplaintCategory::Plumbing,
                priority: ComplaintPriority::High,
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unable to create complaint");
    }

    #[tokio::test]
    async fn test_complaint_status_patch() {
        let api = gateway(Some("t"));
        api.client.mock_response(
            "http://ams.test/api/complaints/12",
            200,
            json!({ "id": 12, "title": "Noise", "status": "RESOLVED" }),
        );

        let updated = api
            .update_complaint_status(12, ComplaintStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(updated.status, ComplaintStatus::Resolved);
        assert_eq!(
            api.client.requests.borrow()[0].method,
            ams_shared::HttpMethod::Patch
        );
    }
}
