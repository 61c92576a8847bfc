use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use quotedeck_client::MarketData;
use quotedeck_common::{CompanyInfo, QuoteError, RawQuote, Result, Symbol};
use quotedeck_web::routes::SESSION_COOKIE;
use quotedeck_web::{configure, AppState, MemorySessionStore, RequestHandler};
use serde_json::{json, Value};
use std::sync::Arc;

/// Knows `AAPL`, has no trades for `IPO`, an unreadable quote for `ODD`, and nothing else.
struct Provider;

#[async_trait]
impl MarketData for Provider {
    async fn fetch_company_info(&self, symbol: &Symbol) -> Result<CompanyInfo> {
        match symbol.as_str() {
            "AAPL" | "IPO" | "ODD" => Ok(CompanyInfo {
                name: Some(format!("{symbol} Inc")),
                symbol: Some(symbol.to_string()),
                ..Default::default()
            }),
            _ => Err(QuoteError::NotFound),
        }
    }

    async fn fetch_latest_quote(&self, symbol: &Symbol) -> Result<RawQuote> {
        match symbol.as_str() {
            "AAPL" => Ok(RawQuote {
                timestamp: Some("2024-01-05T16:00:00.123456789+00:00".into()),
                prev_close: Some(json!(181.18)),
                last: Some(json!(181.91)),
                volume: Some(json!(62303300)),
                ..Default::default()
            }),
            "IPO" => RawQuote::latest(vec![]),
            "ODD" => Ok(RawQuote {
                timestamp: Some("yesterday afternoon".into()),
                ..Default::default()
            }),
            _ => Err(QuoteError::NotFound),
        }
    }
}

fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(RequestHandler::new(Arc::new(Provider))))
}

#[actix_web::test]
async fn stock_lookup_succeeds() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/stock/aapl").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["company_info"]["name"], "AAPL Inc");
    assert_eq!(body["company_info"]["exchange"], Value::Null);
    assert_eq!(
        body["stock_summary"],
        json!({
            "symbol": "AAPL",
            "tradingDay": "2024-01-05",
            "prevClose": "181.18",
            "open": "N/A",
            "high": "N/A",
            "low": "N/A",
            "last": "181.91",
            "change": "0.73 ▲",
            "changePercent": "0.40% ▲",
            "volume": "62,303,300"
        })
    );
}

#[actix_web::test]
async fn lookup_errors_use_the_error_envelope() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let cases = [
        ("/api/stock/%20%20", "Please enter a stock symbol"),
        (
            "/api/stock/ZZZZ",
            "No record has been found, please enter a valid symbol.",
        ),
        (
            "/api/stock/ipo",
            "No recent trading data available for this symbol.",
        ),
        (
            "/api/stock/odd",
            "Unable to read the trading day of the latest quote.",
        ),
    ];
    for (uri, message) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": message }), "{uri}");
    }
}

#[actix_web::test]
async fn index_remembers_the_last_symbol() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    // first visit issues a session cookie
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .expect("session cookie");
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains(r#"value="""#));

    // a failed lookup still counts as the last search
    let req = test::TestRequest::get()
        .uri("/api/stock/msft")
        .cookie(Cookie::new(SESSION_COOKIE, session.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.response().cookies().count(), 0);

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new(SESSION_COOKIE, session))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains(r#"value="MSFT""#));

    // other clients do not see it
    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(!String::from_utf8_lossy(&body).contains("MSFT"));
}

#[actix_web::test]
async fn openapi_document_lists_the_stock_endpoint() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/openapi.json").to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;

    assert!(doc["paths"]["/api/stock/{symbol}"]["get"].is_object());
    assert!(doc["components"]["schemas"]["StockPayload"].is_object());
}

#[actix_web::test]
async fn cookieless_clients_do_not_grow_the_session_store() {
    let state = web::Data::new(AppState {
        handler: RequestHandler::new(Arc::new(Provider)),
        sessions: Arc::new(MemorySessionStore::with_capacity(4)),
    });
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    for _ in 0..50 {
        let req = test::TestRequest::get().uri("/api/stock/aapl").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.response().cookies().count(), 1);
    }

    assert_eq!(state.sessions.len(), 4);
}
