//! Audit log queries

use authplatform_transport::{Method, RequestOptions, Result, Transport};

use crate::envelope::{ListParams, Paginated};
use crate::models::AuditLog;

/// Read-only audit trail.
pub struct AuditLogs<'a> {
    transport: &'a Transport,
}

impl<'a> AuditLogs<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, params: ListParams) -> Result<Paginated<AuditLog>> {
        let url = self.transport.build_scoped_url("audit-logs");
        self.transport
            .request_json(Method::Get, &url, params.apply(RequestOptions::new()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;
    use crate::envelope::ListParams;
    use crate::test_support::{client_for, scoped};
    use axum::Json;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn list_entries() {
        let router = axum::Router::new().route(
            &scoped("audit-logs"),
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("sort").map(String::as_str), Some("-created_at"));
                Json(json!({
                    "data": [{
                        "id": "log_1",
                        "action": "user.login",
                        "actor_id": "usr_1",
                        "metadata": {"mfa": true}
                    }],
                    "meta": {"current_page": 1, "last_page": 1}
                }))
            }),
        );
        let client = client_for(router).await;

        let page = client
            .audit_logs()
            .list(ListParams::new().sort("-created_at"))
            .await
            .unwrap();
        assert_eq!(page.data[0].action, "user.login");
        assert_eq!(page.data[0].metadata.as_ref().unwrap()["mfa"], true);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn rate_limited_is_retryable() {
        let router = axum::Router::new().route(
            &scoped("audit-logs"),
            get(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"message": "Slow down", "retry_after": 5})),
                )
            }),
        );
        let client = client_for(router).await;

        let err = client.audit_logs().list(ListParams::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(err.kind().is_retryable());
        assert_eq!(err.message(), "Slow down");
        assert_eq!(err.body().unwrap()["retry_after"], 5);
    }
}
