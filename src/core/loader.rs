use crate::adapters::fetch::{build_client, UrlSource};
use crate::adapters::upload::UploadSource;
use crate::core::parser::parse_csv;
use crate::domain::model::{Dataset, UploadedFile};
use crate::domain::ports::CsvSource;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Reads a source and parses it as CSV. Both the configured URL and the
/// user's choice go through here, so they fail the same way.
#[derive(Clone)]
pub struct DatasetLoader {
    client: Client,
}

impl DatasetLoader {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    pub async fn load(&self, source: &dyn CsvSource) -> Result<Dataset> {
        let started = Instant::now();
        let origin = source.describe();

        tracing::debug!("📡 Reading {}", origin);
        let bytes = source.read_bytes().await?;

        let dataset = parse_csv(&bytes)?;
        tracing::info!(
            "📂 Loaded {}: {} rows x {} columns in {:?}",
            origin,
            dataset.row_count(),
            dataset.column_count(),
            started.elapsed()
        );

        Ok(dataset)
    }

    pub async fn load_url(&self, url: &str) -> Result<Dataset> {
        let source = UrlSource::new(self.client.clone(), url);
        self.load(&source).await
    }

    pub async fn load_upload(&self, file: UploadedFile) -> Result<Dataset> {
        let source = UploadSource::new(file);
        self.load(&source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DashboardError;
    use async_trait::async_trait;
    use httpmock::prelude::*;

    struct StaticSource(&'static [u8]);

    #[async_trait]
    impl CsvSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn read_bytes(&self) -> Result<Vec<u8>> {
            Ok(self.0.to_vec())
        }
    }

    #[tokio::test]
    async fn test_load_from_any_source() {
        let loader = DatasetLoader::new(None).unwrap();
        let dataset = loader.load(&StaticSource(b"a,b\n1,2\n3,4\n")).await.unwrap();
        assert_eq!(dataset.shape(), (2, 2));
    }

    #[tokio::test]
    async fn test_load_url_parses_response() {
        let server = MockServer::start();
        let csv_mock = server.mock(|when, then| {
            when.method(GET).path("/sheet.csv");
            then.status(200).body("country,capital\nPeru,Lima\nChile,Santiago\n");
        });

        let loader = DatasetLoader::new(Some(Duration::from_secs(5))).unwrap();
        let dataset = loader.load_url(&server.url("/sheet.csv")).await.unwrap();

        csv_mock.assert();
        assert_eq!(dataset.shape(), (2, 2));
        assert_eq!(dataset.value(1, "capital"), Some("Santiago"));
    }

    #[tokio::test]
    async fn test_load_url_surfaces_parse_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken.csv");
            then.status(200).body("a,b\n\"unclosed,1\n");
        });

        let loader = DatasetLoader::new(None).unwrap();
        let err = loader.load_url(&server.url("/broken.csv")).await.unwrap_err();
        assert!(matches!(err, DashboardError::UnterminatedQuoteError { line: 2 }));
    }

    #[tokio::test]
    async fn test_load_url_times_out_on_slow_source() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.csv");
            then.status(200)
                .body("a,b\n1,2\n")
                .delay(Duration::from_secs(3));
        });

        let loader = DatasetLoader::new(Some(Duration::from_secs(1))).unwrap();
        let started = Instant::now();
        let err = loader.load_url(&server.url("/slow.csv")).await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(3));
        match &err {
            DashboardError::FetchError(inner) => assert!(inner.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other),
        }
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_load_upload() {
        let loader = DatasetLoader::new(None).unwrap();
        let dataset = loader
            .load_upload(UploadedFile {
                filename: "scores.csv".to_string(),
                content: b"name,score\nAna,10\n".to_vec(),
            })
            .await
            .unwrap();
        assert_eq!(dataset.shape(), (1, 2));
    }
}
