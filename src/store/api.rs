//! Workout API store.
//!
//! Posts the record as JSON to `{base_url}/api/workouts`.  The
//! `Authorization: Bearer …` header is attached only when an API key is
//! configured.

use async_trait::async_trait;

use crate::config::StoreConfig;

use super::{StoreError, WorkoutRecord, WorkoutStore};

pub struct ApiWorkoutStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ApiWorkoutStore {
    /// Build from config.  Falls back to a client without a timeout if the
    /// builder fails.
    pub fn from_config(config: &StoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!("{}/api/workouts", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pull the record id out of the API response body (`_id` or `id`).
fn response_id(body: &serde_json::Value) -> Option<String> {
    ["_id", "id"].iter().find_map(|key| match body.get(*key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[async_trait]
impl WorkoutStore for ApiWorkoutStore {
    async fn save(&self, record: &WorkoutRecord) -> Result<String, StoreError> {
        let mut request = self.client.post(&self.endpoint).json(record);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // The record is stored once the status is 2xx; the id is best effort.
        let body = response.text().await.unwrap_or_default();
        let id = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| response_id(&value))
            .unwrap_or_default();
        log::info!("store: workout uploaded (id={id:?}, reps={})", record.rep_count);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ExerciseKind;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let config = StoreConfig {
            base_url: "https://fit.example.com/".into(),
            ..StoreConfig::default()
        };
        assert_eq!(
            ApiWorkoutStore::from_config(&config).endpoint(),
            "https://fit.example.com/api/workouts"
        );
    }

    #[test]
    fn empty_api_key_is_ignored() {
        let config = StoreConfig {
            api_key: Some(String::new()),
            ..StoreConfig::default()
        };
        assert!(ApiWorkoutStore::from_config(&config).api_key.is_none());
    }

    #[test]
    fn id_read_from_either_key() {
        assert_eq!(
            response_id(&serde_json::json!({"_id": "65f0c0ffee"})),
            Some("65f0c0ffee".into())
        );
        assert_eq!(response_id(&serde_json::json!({"id": 17})), Some("17".into()));
        assert_eq!(response_id(&serde_json::json!({"ok": true})), None);
    }

    /// Accept one connection, drain the request and answer with `response`.
    async fn one_shot_server(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= head_end + 4 + length
    }

    fn empty_record() -> WorkoutRecord {
        WorkoutRecord {
            exercise: ExerciseKind::Pushups,
            rep_count: 3,
            started_at_ms: 0,
            poses: Vec::new(),
            feedback: Vec::new(),
        }
    }

    #[tokio::test]
    async fn created_without_body_is_saved_with_empty_id() {
        let base_url = one_shot_server(
            "HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let config = StoreConfig {
            base_url,
            timeout_secs: 5,
            ..StoreConfig::default()
        };

        let id = ApiWorkoutStore::from_config(&config)
            .save(&empty_record())
            .await
            .expect("2xx is a successful save");
        assert_eq!(id, "");
    }

    #[tokio::test]
    async fn json_reply_id_is_returned() {
        let base_url = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 14\r\nConnection: close\r\n\r\n{\"_id\":\"a1b2\"}",
        )
        .await;
        let config = StoreConfig {
            base_url,
            timeout_secs: 5,
            ..StoreConfig::default()
        };

        let id = ApiWorkoutStore::from_config(&config)
            .save(&empty_record())
            .await
            .expect("save");
        assert_eq!(id, "a1b2");
    }

    #[tokio::test]
    async fn unreachable_server_is_request_error() {
        let config = StoreConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..StoreConfig::default()
        };
        let record = WorkoutRecord {
            exercise: ExerciseKind::Pushups,
            rep_count: 0,
            started_at_ms: 0,
            poses: Vec::new(),
            feedback: Vec::new(),
        };
        let err = ApiWorkoutStore::from_config(&config)
            .save(&record)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Request(_) | StoreError::Timeout));
    }
}
