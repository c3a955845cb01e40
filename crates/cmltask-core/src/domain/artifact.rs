//! Artifacts - 名前付きデータの順序付きマップ
//!
//! Artifact は task に紐づけてアップロードされるデータ（モデル、設定、ファイルパスなど）。
//! 公開順序は YAML の記述順（または insert 順）を保ちます。

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Arbitrary structured artifact payload.
pub type ArtifactValue = serde_json::Value;

/// Ordered mapping from artifact name to value.
///
/// Inserting an existing name replaces the value but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifacts {
    entries: Vec<(String, ArtifactValue)>,
}

impl Artifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArtifactValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ArtifactValue>> FromIterator<(K, V)> for Artifacts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut artifacts = Artifacts::new();
        for (name, value) in iter {
            artifacts.insert(name, value);
        }
        artifacts
    }
}

impl Serialize for Artifacts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// HashMap 経由だと順序が失われるので MapAccess で直接読む
impl<'de> Deserialize<'de> for Artifacts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArtifactsVisitor;

        impl<'de> Visitor<'de> for ArtifactsVisitor {
            type Value = Artifacts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of artifact name to value")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Artifacts, M::Error> {
                let mut artifacts = Artifacts::new();
                while let Some((name, value)) = access.next_entry::<String, ArtifactValue>()? {
                    artifacts.insert(name, value);
                }
                Ok(artifacts)
            }
        }

        deserializer.deserialize_map(ArtifactsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_document_order_from_yaml() {
        let yaml = "zeta: 1\nalpha: {layers: 3}\nmid: weights.bin\n";
        let artifacts: Artifacts = serde_yaml::from_str(yaml).unwrap();

        let names: Vec<&str> = artifacts.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(artifacts.get("alpha"), Some(&json!({"layers": 3})));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut artifacts: Artifacts = [("a", json!(1)), ("b", json!(2))].into_iter().collect();
        artifacts.insert("a", json!("one"));

        let pairs: Vec<_> = artifacts.iter().collect();
        assert_eq!(pairs, vec![("a", &json!("one")), ("b", &json!(2))]);
    }

    #[test]
    fn rejects_non_mapping() {
        let err = serde_yaml::from_str::<Artifacts>("- model\n- data\n").unwrap_err();
        assert!(err.to_string().contains("mapping of artifact name"));
    }
}
