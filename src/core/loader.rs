use crate::config::SourceKind;
use crate::domain::model::{Dataset, HeaderSet, Record};
use crate::utils::error::{QrBatchError, Result};
use crate::utils::validation::is_remote;
use reqwest::Client;

/// Fetches batch data from a local file or an http(s) URL and parses it.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    client: Client,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch(&self, location: &str) -> Result<String> {
        let text = if is_remote(location) {
            tracing::debug!("Fetching data from: {}", location);
            let response = self.client.get(location).send().await?;
            tracing::debug!("Data response status: {}", response.status());

            if !response.status().is_success() {
                return Err(QrBatchError::DataUnavailable {
                    location: location.to_string(),
                    reason: format!("server answered {}", response.status()),
                });
            }
            response.text().await?
        } else {
            tracing::debug!("Reading data from file: {}", location);
            tokio::fs::read_to_string(location).await?
        };

        if text.is_empty() {
            return Err(QrBatchError::DataUnavailable {
                location: location.to_string(),
                reason: "no data found".to_string(),
            });
        }
        Ok(text)
    }

    pub async fn load(&self, kind: SourceKind, location: &str) -> Result<Dataset> {
        let text = self.fetch(location).await?;
        let dataset = parse(kind, &text)?;
        tracing::info!(
            "Loaded {} records with {} fields from {}",
            dataset.records.len(),
            dataset.headers.len(),
            location
        );
        Ok(dataset)
    }
}

pub fn parse(kind: SourceKind, text: &str) -> Result<Dataset> {
    let dataset = match kind {
        SourceKind::Csv => parse_csv(text)?,
        SourceKind::Json => parse_json(text)?,
    };

    if dataset.headers.is_empty() || dataset.records.is_empty() {
        return Err(QrBatchError::invalid_shape(
            "array of objects expected, got no fields or no records",
        ));
    }
    Ok(dataset)
}

/// Plain comma splitting: no quoting, no escapes. Short rows leave trailing
/// fields unset and long rows drop the surplus. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();
    let header_row: Vec<String> = match rows.next() {
        Some(row) => row?.iter().map(str::to_string).collect(),
        None => return Ok(Dataset::default()),
    };

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        let record: Record = header_row
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    let headers: HeaderSet = header_row
        .into_iter()
        .filter(|h| !h.is_empty())
        .collect();

    Ok(Dataset { headers, records })
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(items) = value else {
        return Err(QrBatchError::invalid_shape(
            "array of objects expected at the top level",
        ));
    };

    let headers: HeaderSet = match items.first() {
        Some(serde_json::Value::Object(first)) => first.keys().cloned().collect(),
        _ => HeaderSet::default(),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let serde_json::Value::Object(obj) = item else {
            return Err(QrBatchError::invalid_shape(format!(
                "element {} is not an object",
                index
            )));
        };
        records.push(Record {
            data: obj.into_iter().collect(),
        });
    }

    Ok(Dataset { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_csv_basic() {
        let dataset = parse(SourceKind::Csv, "a,b\n1,2").unwrap();
        assert_eq!(dataset.headers.as_slice(), &["a", "b"]);
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].get("a"), Some(&json!("1")));
        assert_eq!(dataset.records[0].get("b"), Some(&json!("2")));
    }

    #[test]
    fn test_parse_csv_crlf_and_trailing_newline() {
        let dataset = parse_csv("id,name\r\n1,apple\r\n2,pear\r\n").unwrap();
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[1].text("name"), "pear");
    }

    #[test]
    fn test_parse_csv_ignores_quotes() {
        let dataset = parse_csv("a,b\n\"x,y\",z").unwrap();
        assert_eq!(dataset.records[0].text("a"), "\"x");
        assert_eq!(dataset.records[0].text("b"), "y\"");
    }

    #[test]
    fn test_parse_csv_misaligned_rows() {
        let dataset = parse_csv("a,b,c\n1\n1,2,3,4").unwrap();
        assert_eq!(dataset.records[0].text("a"), "1");
        assert_eq!(dataset.records[0].get("b"), None);
        assert_eq!(dataset.records[1].text("c"), "3");
        assert_eq!(dataset.records[1].data.len(), 3);
    }

    #[test]
    fn test_parse_csv_skips_blank_lines() {
        let dataset = parse_csv("a,b\n\n1,2\n").unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].text("a"), "1");
        assert_eq!(dataset.records[0].text("b"), "2");
    }

    #[test]
    fn test_parse_csv_header_only_is_invalid() {
        assert!(matches!(
            parse(SourceKind::Csv, "a,b\n"),
            Err(QrBatchError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_parse_json_array_of_objects() {
        let text = r#"[{"k":"x","n":1},{"k":"y","n":2,"extra":true}]"#;
        let dataset = parse(SourceKind::Json, text).unwrap();

        assert_eq!(dataset.headers.len(), 2);
        assert!(dataset.headers.contains("k"));
        assert!(dataset.headers.contains("n"));
        assert!(!dataset.headers.contains("extra"));
        assert_eq!(dataset.records[1].get("n"), Some(&json!(2)));
    }

    #[test]
    fn test_parse_json_keeps_first_object_key_order() {
        let dataset = parse_json(r#"[{"zeta":1,"alpha":2,"mid":3}]"#).unwrap();
        assert_eq!(dataset.headers.as_slice(), &["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_json_non_array_is_invalid_shape() {
        for text in [r#"{"k":"x"}"#, "42", r#""text""#, "null"] {
            assert!(
                matches!(
                    parse(SourceKind::Json, text),
                    Err(QrBatchError::InvalidShape { .. })
                ),
                "expected InvalidShape for {}",
                text
            );
        }
    }

    #[test]
    fn test_parse_json_empty_or_non_object_elements() {
        assert!(matches!(
            parse(SourceKind::Json, "[]"),
            Err(QrBatchError::InvalidShape { .. })
        ));
        assert!(matches!(
            parse(SourceKind::Json, "[{}]"),
            Err(QrBatchError::InvalidShape { .. })
        ));
        assert!(matches!(
            parse(SourceKind::Json, r#"[{"a":1}, 2]"#),
            Err(QrBatchError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_parse_json_syntax_error() {
        assert!(matches!(
            parse(SourceKind::Json, "[{"),
            Err(QrBatchError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"sku,aisle\nA1,3\n").unwrap();

        let loader = DataLoader::new();
        let dataset = loader
            .load(SourceKind::Csv, file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(dataset.records[0].text("sku"), "A1");
    }

    #[tokio::test]
    async fn test_fetch_empty_file_is_unavailable() {
        let file = NamedTempFile::new().unwrap();
        let loader = DataLoader::new();
        let result = loader.fetch(file.path().to_str().unwrap()).await;
        assert!(matches!(result, Err(QrBatchError::DataUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_io_error() {
        let loader = DataLoader::new();
        let result = loader.fetch("/definitely/not/here.csv").await;
        assert!(matches!(result, Err(QrBatchError::IoError(_))));
    }

    #[tokio::test]
    async fn test_fetch_remote_json() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/items.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"id": 7, "name": "bolt"}]));
        });

        let loader = DataLoader::new();
        let dataset = loader
            .load(SourceKind::Json, &server.url("/items.json"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].text("id"), "7");
    }

    #[tokio::test]
    async fn test_fetch_remote_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/gone.csv");
            then.status(404);
        });

        let loader = DataLoader::new();
        let result = loader.fetch(&server.url("/gone.csv")).await;

        api_mock.assert();
        assert!(matches!(result, Err(QrBatchError::DataUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_fetch_remote_empty_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty.csv");
            then.status(200).body("");
        });

        let loader = DataLoader::new();
        let result = loader.fetch(&server.url("/empty.csv")).await;
        assert!(matches!(result, Err(QrBatchError::DataUnavailable { .. })));
    }
}
