//! HTTP implementation of the quiz backend.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vocab_core::{
    FailedWord, FailureReport, LeaderboardEntry, ProgressMap, UserSettings, VocabItem,
};

use super::{BackendError, QuizBackend, ScoreReport};

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct SaveFailureRequest<'a> {
    category: &'a str,
    word: &'a str,
    english: &'a str,
    gender: Option<&'a str>,
    plural: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct FailedWordsCount {
    count: usize,
}

/// Envelope returned by every write endpoint.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

struct HttpBackendInner {
    client: Client,
    backend_url: String,
    vocab_dir: Option<PathBuf>,
}

/// Quiz backend reached over HTTP.
///
/// Vocabulary files are fetched from the backend's static data path unless
/// a local data directory is configured.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

impl HttpBackend {
    pub fn new(backend_url: &str) -> Self {
        Self::with_vocab_dir(backend_url, None)
    }

    pub fn with_vocab_dir(backend_url: &str, vocab_dir: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(HttpBackendInner {
                client: Client::new(),
                backend_url: backend_url.trim_end_matches('/').to_string(),
                vocab_dir,
            }),
        }
    }

    /// Backend URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.inner.backend_url)
            .map_err(|e| BackendError::InvalidName(format!("{}: {e}", self.inner.backend_url)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidName(self.inner.backend_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str]) -> Result<Response, BackendError> {
        let resp = self
            .inner
            .client
            .get(self.url(segments)?)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        check_status(resp).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BackendError> {
        self.get(segments)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn post_json<B>(&self, segments: &[&str], body: &B) -> Result<(), BackendError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .inner
            .client
            .post(self.url(segments)?)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status: StatusResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        if status.status == "error" {
            return Err(BackendError::Rejected(
                status.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(())
    }

    async fn read_vocab_file(&self, level: &str, category: &str) -> Result<String, BackendError> {
        let level = check_name(level)?;
        let file = format!("{}.json", check_name(category)?);
        match &self.inner.vocab_dir {
            Some(dir) => {
                let path = dir.join(level).join(&file);
                match tokio::fs::read_to_string(&path).await {
                    Ok(content) => Ok(content),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Err(BackendError::NotFound(path.display().to_string()))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            None => self
                .get(&["static", "data", level, file.as_str()])
                .await?
                .text()
                .await
                .map_err(|e| BackendError::Network(e.to_string())),
        }
    }
}

/// A level or category name must be a single plain path component.
fn check_name(name: &str) -> Result<&str, BackendError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(BackendError::InvalidName(name.to_string()));
    }
    Ok(name)
}

async fn check_status(resp: Response) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().path().to_string();
    if status == StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(url));
    }
    let message = resp.text().await.unwrap_or_default();
    Err(BackendError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl QuizBackend for HttpBackend {
    async fn get_settings(&self) -> Result<UserSettings, BackendError> {
        self.get_json(&["api", "settings"]).await
    }

    async fn get_progress(&self) -> Result<ProgressMap, BackendError> {
        self.get_json(&["api", "progress"]).await
    }

    async fn get_failed_words_count(&self) -> Result<usize, BackendError> {
        let count: FailedWordsCount = self.get_json(&["api", "failed_words_count"]).await?;
        Ok(count.count)
    }

    async fn get_failed_words(&self) -> Result<Vec<VocabItem>, BackendError> {
        let words: Vec<FailedWord> = self.get_json(&["api", "failed_words"]).await?;
        Ok(words.into_iter().map(FailedWord::into_item).collect())
    }

    async fn get_vocab_category(
        &self,
        level: &str,
        category: &str,
    ) -> Result<Vec<VocabItem>, BackendError> {
        let content = self.read_vocab_file(level, category).await?;
        vocab_core::parse(&content).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn report_failure(&self, failure: &FailureReport) -> Result<(), BackendError> {
        let request = SaveFailureRequest {
            category: &failure.category,
            word: &failure.term,
            english: &failure.translation,
            gender: failure.gender.as_deref(),
            plural: failure.plural.as_deref(),
        };
        self.post_json(&["save_failure"], &request).await
    }

    async fn save_score(&self, report: &ScoreReport) -> Result<(), BackendError> {
        self.post_json(&["save_score"], report).await
    }

    async fn save_leaderboard_entry(&self, report: &ScoreReport) -> Result<(), BackendError> {
        self.post_json(&["save_leaderboard"], report).await
    }

    async fn get_leaderboard(
        &self,
        category: &str,
    ) -> Result<Vec<LeaderboardEntry>, BackendError> {
        self.get_json(&["api", "leaderboard", category]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vocab_core::QuizDirection;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"}))
    }

    #[tokio::test]
    async fn settings_from_backend_columns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_id": 3,
                "theme": "german",
                "sound_enabled": false,
                "strict_articles": true,
                "speedrun_enabled": false,
                "default_mode": "en-to-de"
            })))
            .mount(&server)
            .await;

        let settings = HttpBackend::new(&server.uri()).get_settings().await.unwrap();
        assert!(!settings.sound);
        assert!(settings.strict);
        assert_eq!(settings.default_mode, QuizDirection::TargetToSource);
    }

    #[tokio::test]
    async fn null_settings_columns_fall_back_per_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_id": 3,
                "theme": "german",
                "sound_enabled": true,
                "custom_color": null,
                "speedrun_enabled": true,
                "strict_articles": true,
                "default_mode": null,
                "plurals": null,
                "show_examples": null
            })))
            .mount(&server)
            .await;

        let settings = HttpBackend::new(&server.uri()).get_settings().await.unwrap();
        assert!(settings.strict);
        assert!(settings.speedrun);
        assert!(settings.sound);
        assert!(!settings.plurals);
        assert_eq!(settings.default_mode, QuizDirection::SourceToTarget);
    }

    #[tokio::test]
    async fn failed_words_get_placeholders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/failed_words"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"german": "der Hund", "english": "dog", "gender": "m"},
                {"german": null, "english": "", "gender": null}
            ])))
            .mount(&server)
            .await;

        let words = HttpBackend::new(&server.uri()).get_failed_words().await.unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], VocabItem::new("der Hund", "dog").with_gender("m"));
        assert_eq!(words[1].term, "(unknown)");
        assert_eq!(words[1].translation, "(missing)");
    }

    #[tokio::test]
    async fn missing_vocab_file_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/static/data/A1/nothing.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = HttpBackend::new(&server.uri())
            .get_vocab_category("A1", "nothing")
            .await;
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn vocab_file_is_validated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/static/data/A1/colors.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"[{"german": "rot", "english": ""}]"#),
            )
            .mount(&server)
            .await;

        let result = HttpBackend::new(&server.uri())
            .get_vocab_category("A1", "colors")
            .await;
        assert!(matches!(result, Err(BackendError::Parse(_))));
    }

    #[tokio::test]
    async fn vocab_from_local_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("A1")).unwrap();
        std::fs::write(
            dir.path().join("A1").join("colors.json"),
            r#"[{"german": "rot", "english": "red"}]"#,
        )
        .unwrap();

        let backend = HttpBackend::with_vocab_dir("http://127.0.0.1:9", Some(dir.path().into()));
        let items = backend.get_vocab_category("A1", "colors").await.unwrap();
        assert_eq!(items, vec![VocabItem::new("rot", "red")]);

        let missing = backend.get_vocab_category("A1", "numbers").await;
        assert!(matches!(missing, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn failure_report_uses_wire_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/save_failure"))
            .and(body_json(serde_json::json!({
                "category": "animals",
                "word": "der Hund",
                "english": "dog",
                "gender": "m",
                "plural": null
            })))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;

        let failure = FailureReport {
            category: "animals".into(),
            term: "der Hund".into(),
            translation: "dog".into(),
            gender: Some("m".into()),
            plural: None,
        };
        HttpBackend::new(&server.uri())
            .report_failure(&failure)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn score_rejected_when_logged_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/save_score"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "message": "not_logged_in"
            })))
            .mount(&server)
            .await;

        let report = ScoreReport {
            category: "animals".into(),
            score: 3,
            time: 12.5,
        };
        let result = HttpBackend::new(&server.uri()).save_score(&report).await;
        assert!(matches!(result, Err(BackendError::Rejected(m)) if m == "not_logged_in"));
    }

    #[tokio::test]
    async fn leaderboard_rows_keep_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/leaderboard/animals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"username": "anna", "score": 10, "time": 31.5},
                {"username": "ben", "score": 10, "time": 40.25}
            ])))
            .mount(&server)
            .await;

        let rows = HttpBackend::new(&server.uri())
            .get_leaderboard("animals")
            .await
            .unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["anna", "ben"]);
        assert_eq!(rows[1].time, 40.25);
    }

    #[tokio::test]
    async fn leaderboard_category_is_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/leaderboard/b1%23fast%3Fx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = HttpBackend::new(&server.uri())
            .get_leaderboard("b1#fast?x")
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn vocab_names_cannot_leave_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(data.join("A1")).unwrap();
        std::fs::write(dir.path().join("secret.json"), r#"[{"german": "a", "english": "b"}]"#)
            .unwrap();

        let backend = HttpBackend::with_vocab_dir("http://127.0.0.1:9", Some(data));
        let names = [("A1", "../../secret"), ("..", "secret"), ("A1", ""), ("A1", "a\\b")];
        for (level, category) in names {
            let result = backend.get_vocab_category(level, category).await;
            assert!(
                matches!(result, Err(BackendError::InvalidName(_))),
                "{level}/{category} accepted"
            );
        }
    }

    #[tokio::test]
    async fn server_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/progress"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = HttpBackend::new(&server.uri()).get_progress().await;
        assert!(matches!(
            result,
            Err(BackendError::Backend { status: 500, ref message }) if message == "boom"
        ));
    }
}
