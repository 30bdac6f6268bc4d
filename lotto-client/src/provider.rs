use lotto_core::models::WinningDraw;
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{
    CreatedPurchase, ErrorBody, LottoResult, PurchaseDetail, PurchaseRequest, Purchases,
    ResultRequest, Statistics,
};

/// Source of purchases, results and statistics.
pub trait LottoProvider {
    /// Buys tickets for `amount` and returns the new purchase id.
    fn create_purchase(&self, amount: u64) -> Result<u64>;
    fn purchases(&self) -> Result<Purchases>;
    fn purchase(&self, id: u64) -> Result<PurchaseDetail>;
    /// Records the winning draw for a purchase; the returned result is authoritative.
    fn submit_result(&self, id: u64, draw: &WinningDraw) -> Result<LottoResult>;
    fn result(&self, id: u64) -> Result<LottoResult>;
    fn statistics(&self) -> Result<Statistics>;
}

pub struct HttpProvider {
    base_url: String,
    http: Client,
}

impl HttpProvider {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = ensure_success(self.http.get(&url).send()?)?;
        Ok(response.json()?)
    }
}

impl LottoProvider for HttpProvider {
    fn create_purchase(&self, amount: u64) -> Result<u64> {
        let url = self.url("/lottos");
        tracing::debug!("POST {} amount={}", url, amount);
        let response = self
            .http
            .post(&url)
            .json(&PurchaseRequest { purchase_amount: amount })
            .send()?;
        let response = ensure_success(response)?;

        if let Some(id) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(purchase_id_from_location)
        {
            return Ok(id);
        }

        let body = response.text()?;
        let created: CreatedPurchase = if body.trim().is_empty() {
            CreatedPurchase::default()
        } else {
            serde_json::from_str(&body)?
        };
        created.resolved_id().ok_or(ClientError::MissingPurchaseId)
    }

    fn purchases(&self) -> Result<Purchases> {
        self.get_json("/lottos")
    }

    fn purchase(&self, id: u64) -> Result<PurchaseDetail> {
        self.get_json(&format!("/lottos/{}", id))
    }

    fn submit_result(&self, id: u64, draw: &WinningDraw) -> Result<LottoResult> {
        let url = self.url(&format!("/lottos/{}/result", id));
        tracing::debug!("PUT {} draw={}", url, draw);
        let response = self
            .http
            .put(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ResultRequest::from(draw))
            .send()?;
        Ok(ensure_success(response)?.json()?)
    }

    fn result(&self, id: u64) -> Result<LottoResult> {
        let url = self.url(&format!("/lottos/{}/result", id));
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send()?;
        if matches!(response.status(), StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
            tracing::debug!("no result for purchase {} ({})", id, response.status());
            return Err(ClientError::NoResultYet(id));
        }
        Ok(ensure_success(response)?.json()?)
    }

    fn statistics(&self) -> Result<Statistics> {
        self.get_json("/lottos/statistics")
    }
}

/// Last path segment of a `Location` header, if it is a numeric id.
pub fn purchase_id_from_location(location: &str) -> Option<u64> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        tracing::debug!("status {}", status);
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = error_message(status, &body);
    tracing::warn!("request failed with {}: {}", status, message);
    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Server-provided message when the body is an error document, else `"<code> <reason>"`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_core::rank::Rank;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answers a single request on a local port with a canned response and
    /// returns the raw request text from the join handle.
    fn serve_once(status: &str, headers: &[(&str, &str)], body: &str) -> (HttpProvider, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            status,
            body.len()
        );
        for (name, value) in headers {
            response.push_str(&format!("{}: {}\r\n", name, value));
        }
        response.push_str("\r\n");
        response.push_str(body);

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let end_of_headers = line == "\r\n" || line.is_empty();
                request.push_str(&line);
                if end_of_headers {
                    break;
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();
            request.push_str(&String::from_utf8_lossy(&request_body));
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            request
        });

        // Bypass any proxy from the environment so requests reach the local listener.
        let provider = HttpProvider {
            base_url: format!("http://{}", addr),
            http: Client::builder().no_proxy().build().unwrap(),
        };
        (provider, handle)
    }

    const RESULT_JSON: &str = r#"{
        "purchaseId": 3,
        "purchaseAmount": 2000,
        "totalPrize": 2000005000,
        "returnRate": 100000250.0,
        "rankCounts": [{"rank": "FIRST", "count": 1}, {"rank": "FIFTH", "count": 1}]
    }"#;

    #[test]
    fn test_create_purchase_id_from_location_header() {
        let (provider, server) = serve_once("201 Created", &[("Location", "/lottos/42")], r#"{"id": 1}"#);
        assert_eq!(provider.create_purchase(5000).unwrap(), 42);
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /lottos HTTP/1.1"));
        assert!(request.contains(r#"{"purchaseAmount":5000}"#));
    }

    #[test]
    fn test_create_purchase_id_from_body() {
        let (provider, server) = serve_once("201 Created", &[], r#"{"id": 7}"#);
        assert_eq!(provider.create_purchase(1000).unwrap(), 7);
        server.join().unwrap();

        let (provider, server) = serve_once("200 OK", &[], r#"{"purchaseId": 8}"#);
        assert_eq!(provider.create_purchase(1000).unwrap(), 8);
        server.join().unwrap();
    }

    #[test]
    fn test_create_purchase_location_without_numeric_id_falls_back_to_body() {
        let (provider, server) = serve_once("201 Created", &[("Location", "/lottos/latest")], r#"{"purchaseId": 11}"#);
        assert_eq!(provider.create_purchase(1000).unwrap(), 11);
        server.join().unwrap();
    }

    #[test]
    fn test_create_purchase_missing_id() {
        let (provider, server) = serve_once("201 Created", &[], "");
        assert!(matches!(provider.create_purchase(1000), Err(ClientError::MissingPurchaseId)));
        server.join().unwrap();

        let (provider, server) = serve_once("201 Created", &[], r#"{"other": 1}"#);
        assert!(matches!(provider.create_purchase(1000), Err(ClientError::MissingPurchaseId)));
        server.join().unwrap();
    }

    #[test]
    fn test_server_error_message_is_surfaced() {
        let body = r#"{"status": 400, "errorCode": "INVALID_AMOUNT", "message": "bad amount"}"#;
        let (provider, server) = serve_once("400 Bad Request", &[], body);
        match provider.create_purchase(1500) {
            Err(ClientError::Http { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad amount");
            }
            other => panic!("expected Http error, got {:?}", other),
        }
        server.join().unwrap();

        let (provider, server) = serve_once("500 Internal Server Error", &[], "oops");
        assert!(matches!(
            provider.purchases(),
            Err(ClientError::Http { status: 500, ref message }) if message == "500 Internal Server Error"
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_result_missing_maps_to_no_result_yet() {
        let (provider, server) = serve_once("404 Not Found", &[], r#"{"message": "no result"}"#);
        assert!(matches!(provider.result(5), Err(ClientError::NoResultYet(5))));
        assert!(server.join().unwrap().starts_with("GET /lottos/5/result HTTP/1.1"));

        let (provider, server) = serve_once("400 Bad Request", &[], "");
        assert!(matches!(provider.result(6), Err(ClientError::NoResultYet(6))));
        server.join().unwrap();
    }

    #[test]
    fn test_result_decodes_body() {
        let (provider, server) = serve_once("200 OK", &[], RESULT_JSON);
        let result = provider.result(3).unwrap();
        assert_eq!(result.purchase_id, 3);
        assert_eq!(result.rank_count(Rank::Fifth), 1);
        server.join().unwrap();
    }

    #[test]
    fn test_submit_result_sends_draw() {
        let (provider, server) = serve_once("200 OK", &[], RESULT_JSON);
        let draw = WinningDraw::new([1, 2, 3, 4, 5, 6], 7).unwrap();
        let result = provider.submit_result(3, &draw).unwrap();
        assert_eq!(result.rank_count(Rank::First), 1);

        let request = server.join().unwrap();
        assert!(request.starts_with("PUT /lottos/3/result HTTP/1.1"));
        assert!(request.contains(r#"{"lottoNumbers":[1,2,3,4,5,6],"bonusNumber":7}"#));
    }

    #[test]
    fn test_statistics_path() {
        let body = r#"{"totalSamples": 2, "averageReturnRate": 250.0, "accumulatedRankCounts": []}"#;
        let (provider, server) = serve_once("200 OK", &[], body);
        let stats = provider.statistics().unwrap();
        assert_eq!(stats.total_samples, 2);
        assert!(server.join().unwrap().starts_with("GET /lottos/statistics HTTP/1.1"));
    }

    #[test]
    fn test_purchase_id_from_location() {
        assert_eq!(purchase_id_from_location("/lottos/42"), Some(42));
        assert_eq!(purchase_id_from_location("http://localhost:8080/lottos/7"), Some(7));
        assert_eq!(purchase_id_from_location("/lottos/7/"), Some(7));
        assert_eq!(purchase_id_from_location("/lottos/abc"), None);
        assert_eq!(purchase_id_from_location(""), None);
    }

    #[test]
    fn test_error_message_from_body() {
        let body = r#"{"status": 400, "errorCode": "INVALID_AMOUNT", "message": "amount must be a multiple of 1000"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "amount must be a multiple of 1000"
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "500 Internal Server Error"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, r#"{"status": 404}"#), "404 Not Found");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = ClientConfig::default();
        config.base_url = "ftp://nowhere".to_string();
        assert!(matches!(HttpProvider::new(&config), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let mut config = ClientConfig::default();
        config.base_url = "http://localhost:8080/".to_string();
        let provider = HttpProvider::new(&config).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8080");
        assert_eq!(provider.url("/lottos"), "http://localhost:8080/lottos");
    }
}
