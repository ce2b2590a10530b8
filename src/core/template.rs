use crate::domain::model::{Dataset, HeaderSet, Manifest, Record};

pub fn placeholder(key: &str) -> String {
    format!("$$<{}>", key)
}

/// A string with `$$<key>` placeholders filled in per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
}

impl Template {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Headers whose placeholder appears literally in the template, in header order.
    pub fn present_keys<'h>(&self, headers: &'h HeaderSet) -> Vec<&'h str> {
        headers
            .iter()
            .filter(|key| self.raw.contains(&placeholder(key)))
            .collect()
    }

    /// Replaces every occurrence of each key's placeholder with the record's value.
    pub fn resolve(&self, keys: &[&str], record: &Record) -> String {
        keys.iter().fold(self.raw.clone(), |acc, key| {
            acc.replace(&placeholder(key), &record.text(key))
        })
    }
}

/// Resolves both templates against every record and groups the results.
pub struct ManifestBuilder<'a> {
    payload: &'a Template,
    naming: &'a Template,
    group_by: Option<&'a str>,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(payload: &'a Template, naming: &'a Template, group_by: Option<&'a str>) -> Self {
        Self {
            payload,
            naming,
            group_by,
        }
    }

    /// Empty and null values are real group names; only a missing field
    /// (or no grouping key at all) lands in the default bucket.
    fn group_name(&self, record: &Record) -> String {
        let Some(key) = self.group_by else {
            return Manifest::DEFAULT_GROUP.to_string();
        };
        match record.get(key) {
            None => Manifest::DEFAULT_GROUP.to_string(),
            Some(serde_json::Value::Null) => "null".to_string(),
            Some(_) => record.text(key),
        }
    }

    pub fn build(&self, dataset: &Dataset) -> Manifest {
        let payload_keys = self.payload.present_keys(&dataset.headers);
        let naming_keys = self.naming.present_keys(&dataset.headers);

        if naming_keys.is_empty() {
            tracing::warn!(
                "File naming format '{}' uses no known keys; every record in a group maps to the same file",
                self.naming.as_str()
            );
        }
        if let Some(key) = self.group_by {
            if !dataset.headers.contains(key) {
                tracing::warn!("Grouping key '{}' is not one of the data fields", key);
            }
        }

        let mut manifest = Manifest::new();
        for record in &dataset.records {
            let filename = self.naming.resolve(&naming_keys, record);
            let payload = self.payload.resolve(&payload_keys, record);
            let group = self.group_name(record);

            if let Some(previous) = manifest.insert(group.clone(), filename.clone(), payload) {
                tracing::warn!(
                    "File '{}' in group '{}' resolved more than once; replacing payload '{}'",
                    filename,
                    group,
                    previous
                );
            }
        }

        tracing::debug!(
            "Built manifest: {} groups, {} files from {} records",
            manifest.group_count(),
            manifest.entry_count(),
            dataset.records.len()
        );
        manifest
    }
}

pub fn build_manifest(
    payload: &Template,
    naming: &Template,
    group_by: Option<&str>,
    dataset: &Dataset,
) -> Manifest {
    ManifestBuilder::new(payload, naming, group_by).build(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    fn dataset(headers: &[&str], records: Vec<Record>) -> Dataset {
        Dataset {
            headers: headers.iter().copied().collect(),
            records,
        }
    }

    #[test]
    fn test_present_keys_only_literal_matches() {
        let headers: HeaderSet = ["id", "name", "kind"].into_iter().collect();
        let template = Template::new("https://x.com/$$<id>?n=$$<name>&k=$kind");
        assert_eq!(template.present_keys(&headers), vec!["id", "name"]);
    }

    #[test]
    fn test_resolve_replaces_every_occurrence() {
        let headers: HeaderSet = ["id"].into_iter().collect();
        let template = Template::new("$$<id>/$$<id>");
        let keys = template.present_keys(&headers);
        let rec = record(&[("id", json!("7"))]);
        assert_eq!(template.resolve(&keys, &rec), "7/7");
    }

    #[test]
    fn test_resolve_without_placeholders_is_constant() {
        let headers: HeaderSet = ["id"].into_iter().collect();
        let template = Template::new("https://example.com/static");
        let keys = template.present_keys(&headers);
        assert!(keys.is_empty());

        for id in ["1", "2"] {
            let rec = record(&[("id", json!(id))]);
            assert_eq!(template.resolve(&keys, &rec), "https://example.com/static");
        }
    }

    #[test]
    fn test_resolve_leaves_unknown_placeholders() {
        let headers: HeaderSet = ["id"].into_iter().collect();
        let template = Template::new("$$<id>-$$<other>");
        let keys = template.present_keys(&headers);
        let rec = record(&[("id", json!(3))]);
        assert_eq!(template.resolve(&keys, &rec), "3-$$<other>");
    }

    #[test]
    fn test_grouped_manifest() {
        let data = dataset(
            &["k", "n"],
            vec![
                record(&[("k", json!("x")), ("n", json!("1"))]),
                record(&[("k", json!("y")), ("n", json!("2"))]),
            ],
        );

        let manifest = build_manifest(
            &Template::new("$$<k>-$$<n>"),
            &Template::new("$$<n>"),
            Some("k"),
            &data,
        );

        assert_eq!(
            serde_json::to_value(&manifest).unwrap(),
            json!({"x": {"1": "x-1"}, "y": {"2": "y-2"}})
        );
    }

    #[test]
    fn test_no_group_key_uses_default_bucket() {
        let data = dataset(
            &["k", "n"],
            vec![
                record(&[("k", json!("x")), ("n", json!("1"))]),
                record(&[("k", json!("y")), ("n", json!("2"))]),
            ],
        );

        let manifest = build_manifest(
            &Template::new("$$<k>"),
            &Template::new("$$<n>"),
            None,
            &data,
        );

        assert_eq!(manifest.group_count(), 1);
        assert_eq!(manifest.group("default").unwrap().len(), 2);
    }

    #[test]
    fn test_missing_group_field_falls_back_to_default() {
        let data = dataset(
            &["k", "n"],
            vec![
                record(&[("k", json!("x")), ("n", json!("1"))]),
                record(&[("n", json!("2"))]),
            ],
        );

        let manifest = build_manifest(
            &Template::new("$$<n>"),
            &Template::new("$$<n>"),
            Some("k"),
            &data,
        );

        assert_eq!(manifest.group("x").unwrap().len(), 1);
        assert_eq!(manifest.group("default").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_and_null_group_values_keep_their_own_buckets() {
        let data = dataset(
            &["k", "n", "v"],
            vec![
                record(&[("k", json!("default")), ("n", json!("1")), ("v", json!("a"))]),
                record(&[("k", json!("")), ("n", json!("1")), ("v", json!("b"))]),
                record(&[("k", json!(null)), ("n", json!("1")), ("v", json!("c"))]),
            ],
        );

        let manifest = build_manifest(
            &Template::new("$$<v>"),
            &Template::new("$$<n>"),
            Some("k"),
            &data,
        );

        assert_eq!(manifest.entry_count(), 3);
        assert_eq!(
            serde_json::to_value(&manifest).unwrap(),
            json!({"default": {"1": "a"}, "": {"1": "b"}, "null": {"1": "c"}})
        );
    }

    #[test]
    fn test_filename_collision_last_write_wins() {
        let data = dataset(
            &["n", "v"],
            vec![
                record(&[("n", json!("same")), ("v", json!("first"))]),
                record(&[("n", json!("same")), ("v", json!("second"))]),
            ],
        );

        let manifest = build_manifest(
            &Template::new("$$<v>"),
            &Template::new("$$<n>"),
            None,
            &data,
        );

        let group = manifest.group("default").unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.get("same").unwrap(), "second");
    }

    #[test]
    fn test_constant_filename_keeps_only_last_record() {
        let data = dataset(
            &["n"],
            vec![
                record(&[("n", json!(1))]),
                record(&[("n", json!(2))]),
                record(&[("n", json!(3))]),
            ],
        );

        let manifest = build_manifest(
            &Template::new("$$<n>"),
            &Template::new("label"),
            None,
            &data,
        );

        assert_eq!(manifest.entry_count(), 1);
        assert_eq!(manifest.group("default").unwrap().get("label").unwrap(), "3");
    }
}
