use crate::handler::RequestHandler;
use crate::page;
use crate::session::{
    new_session_id, MemorySessionStore, Session, SessionHandle, LAST_SEARCHED_SYMBOL,
};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{get, web, HttpRequest, HttpResponse, HttpResponseBuilder, Responder};
use quotedeck_common::{CompanyInfo, ErrorBody, FormattedQuote, StockPayload};
use std::sync::Arc;
use utoipa::OpenApi;

pub const SESSION_COOKIE: &str = "quotedeck_session";

/// Shared by every worker.
pub struct AppState {
    pub handler: RequestHandler,
    pub sessions: Arc<MemorySessionStore>,
}

impl AppState {
    pub fn new(handler: RequestHandler) -> Self {
        AppState {
            handler,
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }

    /// The caller's session, and whether its id is new (and so must be sent back as a cookie).
    fn session(&self, req: &HttpRequest) -> (SessionHandle, bool) {
        match req.cookie(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => {
                (self.sessions.session(cookie.value()), false)
            }
            _ => (self.sessions.session(new_session_id()), true),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(stock),
    components(schemas(StockPayload, CompanyInfo, FormattedQuote, ErrorBody))
)]
pub struct ApiDoc;

/// Register every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(stock).service(openapi_json);
}

fn respond(status: StatusCode, session: &SessionHandle, issued: bool) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    if issued {
        builder.cookie(
            Cookie::build(SESSION_COOKIE, session.id().to_string())
                .path("/")
                .http_only(true)
                .finish(),
        );
    }
    builder
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Search page
#[get("/")]
async fn index(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let (session, issued) = state.session(&req);
    let last = session.get(LAST_SEARCHED_SYMBOL).unwrap_or_default();

    respond(StatusCode::OK, &session, issued)
        .content_type("text/html; charset=utf-8")
        .body(page::render_index(&last))
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Company outlook & latest stock summary of a ticker symbol
///
/// ```json
/// {
///     "company_info": {
///         "name": "Apple Inc",
///         "symbol": "AAPL",
///         "exchange": "NASDAQ",
///         "startDate": "1980-12-12",
///         "description": "..."
///     },
///     "stock_summary": {
///         "symbol": "AAPL",
///         "tradingDay": "2024-01-05",
///         "prevClose": "181.18",
///         "open": "181.99",
///         "high": "182.76",
///         "low": "180.17",
///         "last": "181.91",
///         "change": "0.73 ▲",
///         "changePercent": "0.40% ▲",
///         "volume": "62,303,300"
///     }
/// }
/// ```
#[utoipa::path(
    get,
    path = "/api/stock/{symbol}",
    responses(
        (
            status = 200, description = "Company metadata and the latest quote, formatted for display",
            body = StockPayload, content_type = "application/json"
        ),
        (
            status = 400, description = "Blank or unknown symbol, no trading data, unreadable quote, or provider failure",
            body = ErrorBody, content_type = "application/json",
            example = json!({ "error": "No record has been found, please enter a valid symbol." })
        ),
        (
            status = 500, description = "Unexpected failure; details are not exposed",
            body = ErrorBody, content_type = "application/json",
            example = json!({ "error": "An unexpected error occurred" })
        )
    ),
    params(
        ("symbol", description = "Stock ticker symbol")
    )
)]
#[get("/api/stock/{symbol}")]
async fn stock(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let (session, issued) = state.session(&req);
    let (payload, status) = state.handler.handle(&path.into_inner(), &session).await;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    respond(status, &session, issued).json(payload)
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// OpenAPI document of the JSON endpoints
#[get("/openapi.json")]
async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
