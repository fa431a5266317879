use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use dayz_domain::{NitradoConfig, RemoteLogFile, RemoteLogService};

#[derive(Debug, Error)]
pub enum NitradoError {
    #[error("nitrado {0} is not configured")]
    MissingSetting(&'static str),
    #[error("nitrado api error: {0}")]
    Api(String),
    #[error("nitrado response is missing {0}")]
    MissingData(&'static str),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    entries: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    path: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified_at: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DownloadData {
    token: Option<DownloadToken>,
}

#[derive(Debug, Deserialize)]
struct DownloadToken {
    url: String,
    token: String,
}

/// File server access for a Nitrado-hosted game service.
pub struct NitradoClient {
    config: NitradoConfig,
    client: Client,
}

impl NitradoClient {
    pub fn new(config: NitradoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self { config, client })
    }

    fn token(&self) -> Result<&str, NitradoError> {
        self.config
            .api_token
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(NitradoError::MissingSetting("api_token"))
    }

    fn endpoint(&self, action: &str) -> Result<String, NitradoError> {
        let service_id = self
            .config
            .service_id
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(NitradoError::MissingSetting("service_id"))?;
        Ok(format!(
            "{}{}{}/{}",
            self.config.api_base_url, service_id, self.config.remote_base_path, action
        ))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(action)?;
        let token = self.token()?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope<T> = response.json().await?;
        if envelope.status.as_deref().is_some_and(|status| status != "success") {
            let message = envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string());
            return Err(NitradoError::Api(message).into());
        }
        Ok(envelope.data.ok_or(NitradoError::MissingData("data"))?)
    }
}

#[async_trait]
impl RemoteLogService for NitradoClient {
    async fn list_files(&self, directory: &str) -> Result<Vec<RemoteLogFile>> {
        let data: ListData = self.get_json("list", &[("dir", directory)]).await?;
        let files = data
            .entries
            .into_iter()
            .filter(|entry| entry.kind == "file")
            .map(|entry| RemoteLogFile {
                modified_at: entry.modified_at.as_ref().and_then(parse_modified_at),
                name: entry.name,
                path: entry.path,
                size: entry.size,
            })
            .collect::<Vec<_>>();
        debug!("{} files listed in {}", files.len(), directory);
        Ok(files)
    }

    async fn download_file(&self, remote_path: &str) -> Result<Vec<u8>> {
        let data: DownloadData = self.get_json("download", &[("file", remote_path)]).await?;
        let token = data.token.ok_or(NitradoError::MissingData("data.token"))?;
        let bytes = self
            .client
            .get(&token.url)
            .query(&[("token", token.token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Unix seconds (number or numeric string) or an ISO-like timestamp, in UTC.
fn parse_modified_at(value: &serde_json::Value) -> Option<NaiveDateTime> {
    let from_unix = |secs: i64| DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    match value {
        serde_json::Value::Number(number) => number.as_i64().and_then(from_unix),
        serde_json::Value::String(text) => {
            let text = text.trim();
            if let Ok(secs) = text.parse::<i64>() {
                return from_unix(secs);
            }
            DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.naive_utc())
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
                .ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base: &str) -> NitradoConfig {
        NitradoConfig {
            api_token: Some("secret".to_string()),
            service_id: Some("12345".to_string()),
            server_id: Some("678".to_string()),
            api_base_url: format!("{}/services/", base),
            remote_base_path: "/gameservers/file_server".to_string(),
            request_timeout_seconds: 5,
            default_patterns: Vec::new(),
        }
    }

    #[tokio::test]
    async fn list_files_keeps_only_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/12345/gameservers/file_server/list"))
            .and(query_param("dir", "games/678/ftproot/dayzxb/config/"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "entries": [
                    { "type": "dir", "name": "backups", "path": "/games/678/ftproot/dayzxb/config/backups" },
                    { "type": "file", "name": "DayZServer_x1.ADM", "path": "/games/678/ftproot/dayzxb/config/DayZServer_x1.ADM",
                      "size": 2048, "modified_at": 1686139200 },
                    { "type": "file", "name": "DayZServer_x1.RPT", "path": "/games/678/ftproot/dayzxb/config/DayZServer_x1.RPT",
                      "modified_at": "1686139200" }
                ]}
            })))
            .mount(&server)
            .await;

        let client = NitradoClient::new(config(&server.uri())).expect("client");
        let files = client
            .list_files("games/678/ftproot/dayzxb/config/")
            .await
            .expect("list");

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "DayZServer_x1.ADM");
        assert_eq!(files[0].size, Some(2048));
        assert_eq!(
            files[0].modified_at.map(|value| value.to_string()),
            Some("2023-06-07 12:00:00".to_string())
        );
        assert_eq!(files[1].modified_at, files[0].modified_at);
    }

    #[tokio::test]
    async fn download_follows_token_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/12345/gameservers/file_server/download"))
            .and(query_param("file", "/logs/a.ADM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "token": { "url": format!("{}/blob", server.uri()), "token": "abc" } }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blob"))
            .and(query_param("token", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"AdminLog".to_vec()))
            .mount(&server)
            .await;

        let client = NitradoClient::new(config(&server.uri())).expect("client");
        let bytes = client.download_file("/logs/a.ADM").await.expect("download");
        assert_eq!(bytes, b"AdminLog");
    }

    #[tokio::test]
    async fn api_errors_and_missing_settings_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = NitradoClient::new(config(&server.uri())).expect("client");
        assert!(client.list_files("x").await.is_err());

        let mut missing = config(&server.uri());
        missing.api_token = None;
        let client = NitradoClient::new(missing).expect("client");
        let err = client.list_files("x").await.expect_err("missing token");
        assert!(err.to_string().contains("api_token"));
    }
}
