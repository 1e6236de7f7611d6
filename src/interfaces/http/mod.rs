use crate::application::FormValues;
use crate::domain::chart_slot::ChartSlot;
use crate::domain::error::AppError;
use crate::domain::feature::{feature_catalogue, FeatureRange, FEATURE_NAMES};
use crate::interfaces::commands::{self, Tab};
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app_state: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Serialize)]
struct FeaturesResponse {
    features: Vec<&'static str>,
    feature_ranges: BTreeMap<&'static str, FeatureRange>,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = json!({ "success": false, "error": err.to_string() });
    match err {
        AppError::Validation(validation) => HttpResponse::UnprocessableEntity().json(json!({
            "success": false,
            "error": validation.to_string(),
            "missing": validation.missing,
            "invalid": validation.invalid,
        })),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::Transport(_) | AppError::Backend(_) => HttpResponse::BadGateway().json(body),
        AppError::DataLoad(_) => HttpResponse::ServiceUnavailable().json(body),
        AppError::ParseError(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Form values arrive as strings or numbers; `null` counts as a blank field.
fn form_values(body: Map<String, JsonValue>) -> FormValues {
    body.into_iter()
        .filter_map(|(name, value)| match value {
            JsonValue::Null => None,
            JsonValue::String(text) => Some((name, text)),
            other => Some((name, other.to_string())),
        })
        .collect()
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "Sustainalyze",
        "status": "running",
        "endpoints": [
            "GET /api/health",
            "GET /api/features",
            "POST /api/predict",
            "POST /api/tabs/{tab}",
            "GET /api/charts",
            "GET /api/charts/{slot}",
            "GET /api/logs",
        ],
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[get("/features")]
async fn features() -> impl Responder {
    HttpResponse::Ok().json(FeaturesResponse {
        features: FEATURE_NAMES.to_vec(),
        feature_ranges: feature_catalogue().collect(),
    })
}

#[post("/predict")]
async fn predict(data: web::Data<HttpState>, body: web::Json<Map<String, JsonValue>>) -> impl Responder {
    let form = form_values(body.into_inner());
    let submission = commands::submit_prediction(&data.app_state, form).await;

    if let Some(result) = submission.result() {
        return HttpResponse::Ok().json(json!({
            "success": true,
            "co2_emission": result.co2_emission,
            "category": result.category,
            "thresholds": result.thresholds,
            "view": submission.view(),
        }));
    }

    match submission.into_result() {
        Ok(_) => HttpResponse::InternalServerError().finish(),
        Err(err) => error_response(&err),
    }
}

#[post("/tabs/{tab}")]
async fn open_tab(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let tab = match path.parse::<Tab>() {
        Ok(tab) => tab,
        Err(e) => return error_response(&e),
    };

    match commands::open_tab(&data.app_state, tab).await {
        Ok(activation) => HttpResponse::Ok().json(activation),
        Err(e) => error_response(&e),
    }
}

#[get("/charts")]
async fn list_charts(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(commands::charts(&data.app_state))
}

#[get("/charts/{slot}")]
async fn get_chart(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let chart = path
        .parse::<ChartSlot>()
        .and_then(|slot| commands::chart(&data.app_state, slot));

    match chart {
        Ok(chart) => HttpResponse::Ok().json(chart),
        Err(e) => error_response(&e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(PoisonError::into_inner);
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(PoisonError::into_inner);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Routes shared by the server and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(
        web::scope("/api")
            .service(health)
            .service(features)
            .service(predict)
            .service(open_tab)
            .service(list_charts)
            .service(get_chart)
            .service(get_logs),
    );
}

pub fn start_server(
    app_state: Arc<AppState>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { app_state, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // the dashboard page may be served from anywhere

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    info!(host, port, "Dashboard API listening");
    Ok(server)
}
