//! Code relay endpoints.
//!
//! The relay has a single route:
//!
//! - POST / - record a code for a recipient identity
//! - GET / - HTML page listing the codes addressed to the caller
//!
//! Callers are identified by the hash of their `User-Agent` header; a
//! sender targets a recipient by submitting that hash as `to`. Delivered
//! codes are not consumed by a read: they survive repeated GETs and
//! disappear only when the background sweep expires them.
//!
//! Any other method on `/` falls through to axum's method router and gets
//! a 405.

use std::collections::BTreeMap;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse},
    routing::get,
};
use garde::Validate;
use shared::api::{SubmitCodePayload, SubmitResponse};

use crate::{error::AppError, identity::identity_for, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_codes).post(submit_code))
}

#[debug_handler]
async fn get_codes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let identity = identity_for(user_agent);

    let codes = state.store.fetch_for(&identity).await?;

    Ok(Html(render_codes_page(&identity, &codes)))
}

#[debug_handler]
async fn submit_code(
    State(state): State<AppState>,
    Json(payload): Json<SubmitCodePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Missing fields"))?;

    state
        .store
        .submit(&payload.to, &payload.from, &payload.code)
        .await?;

    tracing::info!(to = %payload.to, from = %payload.from, "code submitted");

    Ok(Json(SubmitResponse::ok()))
}

/// Renders the polled codes page: a sender/code table, or an empty-state
/// line, plus the caller's derived identity so a recipient can tell a
/// sender where to address codes.
fn render_codes_page(identity: &str, codes: &BTreeMap<String, String>) -> String {
    let body = if codes.is_empty() {
        "<p>No codes have arrived for you yet.</p>".to_string()
    } else {
        let rows: String = codes
            .iter()
            .map(|(from, code)| {
                format!(
                    "<tr><td>{}</td><td>{}</td></tr>",
                    escape_html(from),
                    escape_html(code)
                )
            })
            .collect();
        format!("<table><tr><th>From</th><th>Code</th></tr>{rows}</table>")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Received codes</title>
    <style>
        body {{ font-family: Arial, sans-serif; text-align: center; margin: 20px; }}
        table {{ margin: 20px auto; border-collapse: collapse; }}
        th, td {{ border: 1px solid #ddd; padding: 10px; text-align: left; }}
        th {{ background-color: #f4f4f4; }}
        footer {{ margin-top: 20px; font-size: 12px; color: #777; }}
    </style>
</head>
<body>
    <h1>Your received codes</h1>
    {body}
    <footer>
        <p>Your identity: {identity}</p>
    </footer>
</body>
</html>
"#
    )
}

/// Sender and code strings are caller-supplied; escape them before they
/// land in the page.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MockCodeStore;
    use crate::test_utils::TestStateBuilder;
    use axum::http::StatusCode;
    use axum::response::Response;
    use http_body_util::BodyExt;

    async fn response_body(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, "test-browser/1.0".parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn get_codes_lists_pending_codes() {
        let mut store = MockCodeStore::new();
        store.expect_fetch_for().returning(|_| {
            Ok(BTreeMap::from([(
                "alice".to_string(),
                "123456".to_string(),
            )]))
        });

        let state = TestStateBuilder::new().with_store(store).build();

        let result = get_codes(State(state), browser_headers()).await.unwrap();

        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        assert!(body.contains("alice"));
        assert!(body.contains("123456"));
    }

    #[tokio::test]
    async fn get_codes_renders_empty_state() {
        let mut store = MockCodeStore::new();
        store.expect_fetch_for().returning(|_| Ok(BTreeMap::new()));

        let state = TestStateBuilder::new().with_store(store).build();

        let result = get_codes(State(state), browser_headers()).await.unwrap();

        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        assert!(body.contains("No codes have arrived"));
    }

    #[tokio::test]
    async fn get_codes_looks_up_the_hashed_user_agent() {
        let expected = identity_for("test-browser/1.0");

        let mut store = MockCodeStore::new();
        let looked_up = expected.clone();
        store
            .expect_fetch_for()
            .withf(move |identity| identity == looked_up)
            .returning(|_| Ok(BTreeMap::new()));

        let state = TestStateBuilder::new().with_store(store).build();

        let result = get_codes(State(state), browser_headers()).await.unwrap();

        // The page echoes the identity the lookup used.
        let body = response_body(result.into_response()).await;
        assert!(body.contains(&expected));
    }

    #[tokio::test]
    async fn get_codes_without_user_agent_hashes_the_empty_string() {
        let mut store = MockCodeStore::new();
        store
            .expect_fetch_for()
            .withf(|identity| identity == identity_for(""))
            .returning(|_| Ok(BTreeMap::new()));

        let state = TestStateBuilder::new().with_store(store).build();

        let result = get_codes(State(state), HeaderMap::new()).await.unwrap();

        assert_eq!(result.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_codes_escapes_markup_in_entries() {
        let mut store = MockCodeStore::new();
        store.expect_fetch_for().returning(|_| {
            Ok(BTreeMap::from([(
                "<script>alert(1)</script>".to_string(),
                "123456".to_string(),
            )]))
        });

        let state = TestStateBuilder::new().with_store(store).build();

        let result = get_codes(State(state), browser_headers()).await.unwrap();

        let body = response_body(result.into_response()).await;
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn submit_code_records_and_reports_success() {
        let mut store = MockCodeStore::new();
        store
            .expect_submit()
            .with(
                mockall::predicate::eq("u1"),
                mockall::predicate::eq("alice"),
                mockall::predicate::eq("123456"),
            )
            .returning(|_, _, _| Ok(()));

        let state = TestStateBuilder::new().with_store(store).build();

        let payload = SubmitCodePayload {
            to: "u1".to_string(),
            from: "alice".to_string(),
            code: "123456".to_string(),
        };

        let result = submit_code(State(state), Json(payload)).await.unwrap();

        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_body(response).await, r#"{"success":true}"#);
    }

    #[tokio::test]
    async fn submit_code_rejects_missing_fields_without_touching_the_store() {
        // No expectations: any store call would panic the test.
        let state = TestStateBuilder::new()
            .with_store(MockCodeStore::new())
            .build();

        for payload in [
            SubmitCodePayload {
                to: String::new(),
                from: "alice".to_string(),
                code: "123456".to_string(),
            },
            SubmitCodePayload {
                to: "u1".to_string(),
                from: String::new(),
                code: "123456".to_string(),
            },
            SubmitCodePayload {
                to: "u1".to_string(),
                from: "alice".to_string(),
                code: String::new(),
            },
        ] {
            let result = submit_code(State(state.clone()), Json(payload)).await;

            let Err(err) = result else {
                panic!("Expected error, got Ok");
            };
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response_body(response).await,
                r#"{"success":false,"error":"Missing fields"}"#
            );
        }
    }
}
