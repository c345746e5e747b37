//! 미러 API HTTP 클라이언트.
//!
//! `TimelineService` 포트 구현. 인스턴스 하나가 bearer 토큰 하나에
//! 바인딩된다. 읽기 호출은 재시도하지만 삽입/삭제는 재시도하지
//! 않는다 — 네트워크 단절 시 카드가 중복 삽입되는 것을 막는다.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use glassware_core::error::GlassError;
use glassware_core::models::contact::Contact;
use glassware_core::models::credential::Credential;
use glassware_core::models::subscription::{Collection, Subscription};
use glassware_core::models::timeline::{Attachment, TimelineItem};
use glassware_core::ports::timeline_service::TimelineService;

/// 기본 재시도 횟수
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// 목록 응답 envelope — `{ "items": [...] }`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

/// 미러 API REST 클라이언트 — `TimelineService` 포트 구현
pub struct HttpMirrorClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    max_retries: u32,
}

impl HttpMirrorClient {
    /// 새 클라이언트 생성 (전용 reqwest 클라이언트 포함)
    pub fn new(
        endpoint: &str,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<Self, GlassError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GlassError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;
        Ok(Self::with_client(client, endpoint, credential))
    }

    /// 공유 reqwest 클라이언트로 생성 (팩토리가 사용)
    pub(crate) fn with_client(
        client: reqwest::Client,
        endpoint: &str,
        credential: &Credential,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: credential.access_token.clone(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// 재시도 횟수 설정
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Authorization 헤더가 포함된 요청 빌더
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        resp: reqwest::Response,
        resource_type: &str,
        id: &str,
    ) -> Result<reqwest::Response, GlassError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            401 => Err(GlassError::AuthRequired(format!("토큰 거부: {text}"))),
            404 => Err(GlassError::NotFound {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
            }),
            429 => Err(GlassError::RateLimit {
                retry_after_secs: 60,
            }),
            503 => Err(GlassError::ServiceUnavailable(text)),
            code => Err(GlassError::External {
                status: code,
                message: text,
            }),
        }
    }

    /// 재시도가 포함된 읽기 요청 실행
    ///
    /// exponential backoff: 1s → 2s → 4s (최대 30s)
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, GlassError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, GlassError>>,
    {
        let mut delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() || attempt == self.max_retries {
                        return Err(e);
                    }

                    warn!(
                        "요청 실패 (시도 {}/{}): {e}, {delay:?} 후 재시도",
                        attempt + 1,
                        self.max_retries + 1
                    );

                    // RateLimit의 경우 서버 지정 대기 시간 사용
                    if let GlassError::RateLimit { retry_after_secs } = &e {
                        delay = Duration::from_secs(*retry_after_secs);
                    }

                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(30));
                }
            }
        }

        unreachable!("재시도 루프는 항상 반환한다")
    }

    fn map_send_error(e: reqwest::Error, what: &str) -> GlassError {
        GlassError::Network(format!("{what} 요청 실패: {e}"))
    }
}

#[async_trait]
impl TimelineService for HttpMirrorClient {
    async fn insert_item(
        &self,
        item: &TimelineItem,
        attachment: Option<&Attachment>,
    ) -> Result<TimelineItem, GlassError> {
        debug!("타임라인 아이템 삽입");

        let resp = self
            .request(reqwest::Method::POST, "/timeline")
            .json(item)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "타임라인 삽입"))?;
        let resp = Self::check_response(resp, "TimelineItem", "").await?;

        let inserted: TimelineItem = resp
            .json()
            .await
            .map_err(|e| GlassError::Internal(format!("타임라인 응답 파싱 실패: {e}")))?;

        if let Some(att) = attachment {
            let item_id = inserted.id.as_deref().ok_or_else(|| {
                GlassError::Internal("삽입 응답에 아이템 ID가 없습니다".to_string())
            })?;
            debug!("첨부 업로드: item={item_id}, {} bytes", att.data.len());

            let path = format!("/timeline/{item_id}/attachments");
            let resp = self
                .request(reqwest::Method::POST, &path)
                .header(reqwest::header::CONTENT_TYPE, &att.content_type)
                .body(att.data.clone())
                .send()
                .await
                .map_err(|e| Self::map_send_error(e, "첨부 업로드"))?;
            Self::check_response(resp, "TimelineItem", item_id).await?;
        }

        Ok(inserted)
    }

    async fn list_timeline(&self, max_results: u32) -> Result<Vec<TimelineItem>, GlassError> {
        self.execute_with_retry(|| async {
            let resp = self
                .request(reqwest::Method::GET, "/timeline")
                .query(&[("maxResults", max_results)])
                .send()
                .await
                .map_err(|e| Self::map_send_error(e, "타임라인 조회"))?;
            let resp = Self::check_response(resp, "Timeline", "").await?;

            let list: ListResponse<TimelineItem> = resp
                .json()
                .await
                .map_err(|e| GlassError::Internal(format!("타임라인 목록 파싱 실패: {e}")))?;
            Ok(list.items)
        })
        .await
    }

    async fn get_contact(&self, id: &str) -> Result<Option<Contact>, GlassError> {
        let result = self
            .execute_with_retry(|| async {
                let path = format!("/contacts/{id}");
                let resp = self
                    .request(reqwest::Method::GET, &path)
                    .send()
                    .await
                    .map_err(|e| Self::map_send_error(e, "연락처 조회"))?;
                let resp = Self::check_response(resp, "Contact", id).await?;

                resp.json::<Contact>()
                    .await
                    .map_err(|e| GlassError::Internal(format!("연락처 파싱 실패: {e}")))
            })
            .await;

        // "not found"만 부재로 환원한다. 그 외 제공자 에러는 그대로 전파.
        match result {
            Ok(contact) => Ok(Some(contact)),
            Err(GlassError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn insert_contact(&self, contact: &Contact) -> Result<(), GlassError> {
        debug!("연락처 삽입: {}", contact.id);
        let resp = self
            .request(reqwest::Method::POST, "/contacts")
            .json(contact)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "연락처 삽입"))?;
        Self::check_response(resp, "Contact", &contact.id).await?;
        Ok(())
    }

    async fn delete_contact(&self, id: &str) -> Result<(), GlassError> {
        debug!("연락처 삭제: {id}");
        let path = format!("/contacts/{id}");
        let resp = self
            .request(reqwest::Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "연락처 삭제"))?;

        // 이미 없는 연락처 삭제는 성공으로 취급 (멱등)
        match Self::check_response(resp, "Contact", id).await {
            Ok(_) | Err(GlassError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, GlassError> {
        self.execute_with_retry(|| async {
            let resp = self
                .request(reqwest::Method::GET, "/subscriptions")
                .send()
                .await
                .map_err(|e| Self::map_send_error(e, "구독 목록 조회"))?;
            let resp = Self::check_response(resp, "Subscription", "").await?;

            let list: ListResponse<Subscription> = resp
                .json()
                .await
                .map_err(|e| GlassError::Internal(format!("구독 목록 파싱 실패: {e}")))?;
            Ok(list.items)
        })
        .await
    }

    async fn insert_subscription(
        &self,
        collection: Collection,
        user_token: &str,
        callback_url: &str,
    ) -> Result<Subscription, GlassError> {
        debug!("구독 등록: {collection}, callback={callback_url}");

        let body = serde_json::json!({
            "collection": collection,
            "userToken": user_token,
            "callbackUrl": callback_url,
        });
        let resp = self
            .request(reqwest::Method::POST, "/subscriptions")
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "구독 등록"))?;
        let resp = Self::check_response(resp, "Subscription", collection.as_str()).await?;

        resp.json::<Subscription>()
            .await
            .map_err(|e| GlassError::Internal(format!("구독 응답 파싱 실패: {e}")))
    }

    async fn delete_subscription(&self, id: &str) -> Result<(), GlassError> {
        debug!("구독 해제: {id}");
        let path = format!("/subscriptions/{id}");
        let resp = self
            .request(reqwest::Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "구독 해제"))?;
        Self::check_response(resp, "Subscription", id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn client_for(server: &mockito::ServerGuard) -> HttpMirrorClient {
        HttpMirrorClient::new(
            &server.url(),
            &Credential::new("test_token"),
            Duration::from_secs(5),
        )
        .unwrap()
        // 테스트에서 backoff 대기를 피한다
        .with_max_retries(0)
    }

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let client = HttpMirrorClient::new(
            "https://example.com/mirror/v1/",
            &Credential::new("t"),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint, "https://example.com/mirror/v1");
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[tokio::test]
    async fn insert_item_posts_card_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/timeline")
            .match_header("authorization", "Bearer test_token")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "text": "Hello World!",
                "notification": {"level": "DEFAULT"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"item_1","text":"Hello World!"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let item = TimelineItem::with_text("Hello World!");
        let inserted = client.insert_item(&item, None).await.unwrap();

        assert_eq!(inserted.id.as_deref(), Some("item_1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn insert_item_uploads_attachment_after_insert() {
        let mut server = mockito::Server::new_async().await;
        let insert_mock = server
            .mock("POST", "/timeline")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"item_9"}"#)
            .create_async()
            .await;
        let attach_mock = server
            .mock("POST", "/timeline/item_9/attachments")
            .match_header("content-type", "image/jpeg")
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        let item = TimelineItem::with_text("Chipotle says hi!");
        let attachment = Attachment {
            content_type: "image/jpeg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF],
        };
        client.insert_item(&item, Some(&attachment)).await.unwrap();

        insert_mock.assert_async().await;
        attach_mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_timeline_unwraps_items_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/timeline")
            .match_query(mockito::Matcher::UrlEncoded(
                "maxResults".into(),
                "3".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"id":"a","text":"one"},{"id":"b","text":"two"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let items = client.list_timeline(3).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text.as_deref(), Some("one"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_contact_not_found_is_absence() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/contacts/php-quick-start")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let contact = client.get_contact("php-quick-start").await.unwrap();
        assert!(contact.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_contact_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/contacts/php-quick-start")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"php-quick-start","displayName":"PHP Quick Start"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let contact = client.get_contact("php-quick-start").await.unwrap().unwrap();
        assert_eq!(contact.display_name, "PHP Quick Start");
    }

    #[tokio::test]
    async fn get_contact_server_error_is_not_absence() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/contacts/php-quick-start")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.get_contact("php-quick-start").await;
        assert_matches!(result, Err(GlassError::External { status: 500, .. }));
    }

    #[tokio::test]
    async fn delete_contact_tolerates_missing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/contacts/ghost")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.delete_contact("ghost").await.is_ok());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_required() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/timeline")
            .with_status(401)
            .with_body("invalid_token")
            .create_async()
            .await;

        let client = client_for(&server);
        let item = TimelineItem::with_text("hi");
        let result = client.insert_item(&item, None).await;
        assert_matches!(result, Err(GlassError::AuthRequired(_)));
    }

    #[tokio::test]
    async fn read_call_retries_transient_unavailable() {
        let mut server = mockito::Server::new_async().await;
        // expect(2) = 최초 시도 + 재시도 1회
        let mock = server
            .mock("GET", "/timeline")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("maintenance")
            .expect(2)
            .create_async()
            .await;

        let client = HttpMirrorClient::new(
            &server.url(),
            &Credential::new("test_token"),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_max_retries(1);

        let result = client.list_timeline(3).await;
        assert_matches!(result, Err(GlassError::ServiceUnavailable(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn insert_is_never_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/timeline")
            .with_status(503)
            .with_body("maintenance")
            .expect(1)
            .create_async()
            .await;

        let client = HttpMirrorClient::new(
            &server.url(),
            &Credential::new("test_token"),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_max_retries(2);

        let item = TimelineItem::with_text("hi");
        let result = client.insert_item(&item, None).await;
        assert_matches!(result, Err(GlassError::ServiceUnavailable(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/timeline")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_timeline(3).await;
        assert_matches!(
            result,
            Err(GlassError::RateLimit {
                retry_after_secs: 60
            })
        );
    }

    #[tokio::test]
    async fn service_unavailable_maps_to_503_variant() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/subscriptions")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_subscriptions().await;
        assert_matches!(result, Err(GlassError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn insert_subscription_sends_callback_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/subscriptions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "collection": "timeline",
                "userToken": "user_1",
                "callbackUrl": "https://glass.example.com/notify"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"timeline","collection":"timeline","userToken":"user_1","callbackUrl":"https://glass.example.com/notify"}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let sub = client
            .insert_subscription(
                Collection::Timeline,
                "user_1",
                "https://glass.example.com/notify",
            )
            .await
            .unwrap();
        assert_eq!(sub.id, "timeline");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_subscription_hits_id_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/subscriptions/timeline")
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        client.delete_subscription("timeline").await.unwrap();
        mock.assert_async().await;
    }
}
