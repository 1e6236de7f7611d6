use super::PredictionClient;
use crate::domain::error::{AppError, Result};
use crate::domain::feature::FeatureVector;
use crate::domain::prediction::PredictionResponse;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct HttpPredictionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, features: &FeatureVector) -> Result<PredictionResponse> {
        let url = self.endpoint();
        debug!(url = %url, "Submitting prediction request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(features)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Request to {} failed: {}", url, e)))?;

        // The backend answers 400 with a `success: false` envelope, so the body
        // is parsed whatever the status.
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_str::<PredictionResponse>(&text).map_err(|e| {
            AppError::Backend(format!(
                "Unexpected response ({}): {}",
                status, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::prediction_request::tests::complete_form;
    use crate::application::use_cases::prediction_request::PredictionRequestBuilder;
    use actix_web::{post, web, App, HttpResponse, HttpServer, Responder};
    use std::net::SocketAddr;

    #[post("/api/predict")]
    async fn fake_predict(body: web::Json<serde_json::Value>) -> impl Responder {
        if body.get("Latitude").and_then(|v| v.as_f64()) == Some(-1.0) {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({"success": false, "error": "model not loaded"}));
        }
        let features = body.as_object().map(|o| o.len()).unwrap_or(0);
        HttpResponse::Ok().json(serde_json::json!({
            "success": features == 18,
            "co2_emission": 1234.5,
            "category": "High",
            "thresholds": {"low": 50, "high": 500}
        }))
    }

    #[post("/slow/predict")]
    async fn slow_predict() -> impl Responder {
        tokio::time::sleep(Duration::from_secs(3)).await;
        HttpResponse::Ok().json(serde_json::json!({"success": false, "error": "too late"}))
    }

    #[post("/broken/predict")]
    async fn broken_predict() -> impl Responder {
        HttpResponse::InternalServerError().body("<html>Internal Server Error</html>")
    }

    fn spawn_backend() -> SocketAddr {
        let server = HttpServer::new(|| App::new()
                .service(fake_predict)
                .service(slow_predict)
                .service(broken_predict))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        addr
    }

    fn features_with_latitude(latitude: &str) -> FeatureVector {
        let mut form = complete_form();
        form.insert("Latitude".to_string(), latitude.to_string());
        PredictionRequestBuilder::build(&form).unwrap()
    }

    #[actix_web::test]
    async fn test_successful_prediction() {
        let addr = spawn_backend();
        let client = HttpPredictionClient::new(
            &format!("http://{}/api/", addr),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint(), format!("http://{}/api/predict", addr));

        let response = client.predict(&features_with_latitude("59.9")).await.unwrap();
        assert!(response.success);
        assert_eq!(response.co2_emission, Some(1234.5));
        assert_eq!(response.category.as_deref(), Some("High"));
    }

    #[actix_web::test]
    async fn test_failure_envelope_on_bad_request() {
        let addr = spawn_backend();
        let client = HttpPredictionClient::new(&format!("http://{}/api", addr), Duration::from_secs(5)).unwrap();

        let response = client.predict(&features_with_latitude("-1")).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("model not loaded"));
    }

    #[actix_web::test]
    async fn test_non_json_body_is_backend_error() {
        let addr = spawn_backend();
        let client = HttpPredictionClient::new(&format!("http://{}/broken", addr), Duration::from_secs(5)).unwrap();

        match client.predict(&features_with_latitude("10")).await {
            Err(AppError::Backend(msg)) => assert!(msg.starts_with("Unexpected response (500")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // bind then drop to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = HttpPredictionClient::new(
            &format!("http://127.0.0.1:{}/api", port),
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(matches!(
            client.predict(&features_with_latitude("10")).await,
            Err(AppError::Transport(_))
        ));
    }

    #[actix_web::test]
    async fn test_slow_backend_hits_timeout() {
        let addr = spawn_backend();
        let client =
            HttpPredictionClient::new(&format!("http://{}/slow", addr), Duration::from_millis(200)).unwrap();

        let started = std::time::Instant::now();
        let result = client.predict(&features_with_latitude("10")).await;
        assert!(matches!(result, Err(AppError::Transport(_))), "{:?}", result);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
