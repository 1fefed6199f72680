//! Model and query files.
//!
//! A model file is YAML (`.yml`/`.yaml`) or JSON (`.json`):
//!
//! ```yaml
//! logic: modal        # modal | lhs | travel | sabotage, any case
//! P: [p, q]
//! V:
//!   w1: [p]
//!   w2: [q]
//!   w3: ~             # no proposition holds
//! R:
//!   w1: [w2, w3]
//!   w2: []
//! ```
//!
//! Travel models declare `P_A` (read at the observer) and `P_E` (read at the
//! agents) instead of, or in addition to, `P`, and optionally `agents`.
//!
//! A query file holds the formula on its first line and the comma-separated
//! evaluation worlds on its second.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::kripke::KripkeBuilder;
use crate::logic::Logic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub logic: Logic,
    #[serde(rename = "P", default, deserialize_with = "nullable_list")]
    pub props: Vec<String>,
    #[serde(rename = "P_A", default, deserialize_with = "nullable_list")]
    pub agent_props: Vec<String>,
    #[serde(rename = "P_E", default, deserialize_with = "nullable_list")]
    pub external_props: Vec<String>,
    #[serde(rename = "V", default, deserialize_with = "nullable_lists")]
    pub valuation: BTreeMap<String, Vec<String>>,
    #[serde(rename = "R", default, deserialize_with = "nullable_lists")]
    pub relation: BTreeMap<String, Vec<String>>,
    /// Total number of agents, the observer included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<i64>,
}

fn nullable_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_lists<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let lists = Option::<BTreeMap<String, Option<Vec<String>>>>::deserialize(deserializer)?;
    Ok(lists
        .unwrap_or_default()
        .into_iter()
        .map(|(key, list)| (key, list.unwrap_or_default()))
        .collect())
}

impl ModelDescription {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a model file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        debug!("Loading model from {}", path.display());

        match extension.as_str() {
            "yml" | "yaml" => Self::from_yaml_str(&fs::read_to_string(path)?),
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// All declared propositions: `P`, `P_A` and `P_E` together.
    pub fn propositions(&self) -> BTreeSet<String> {
        self.props
            .iter()
            .chain(&self.agent_props)
            .chain(&self.external_props)
            .cloned()
            .collect()
    }

    /// Number of traveling agents: one less than `agents`, but at least one.
    pub fn travelers(&self) -> Result<usize> {
        match self.agents {
            None => Ok(1),
            Some(n) if n < 1 => Err(Error::InvalidModel(format!("agents must be at least 1, got {}", n))),
            Some(n) => Ok(usize::try_from(n - 1)
                .map_err(|_| Error::InvalidModel(format!("too many agents: {}", n)))?
                .max(1)),
        }
    }

    pub fn builder(&self) -> KripkeBuilder {
        let mut builder = KripkeBuilder::default().props(self.propositions());
        for (world, props) in &self.valuation {
            builder = builder.world(world.as_str(), props.iter().map(String::as_str));
        }
        for (world, targets) in &self.relation {
            builder = builder.edges(world.as_str(), targets.iter().map(String::as_str));
        }
        builder
    }
}

/// A formula together with its evaluation worlds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub formula: String,
    pub worlds: Vec<String>,
}

impl Query {
    /// Formula on the first line, comma-separated worlds on the second.
    /// Whitespace in the world list is ignored.
    pub fn parse(text: &str) -> Query {
        let mut lines = text.lines();
        let formula = lines.next().unwrap_or_default().trim().to_string();
        let worlds = lines
            .next()
            .unwrap_or_default()
            .split(',')
            .map(|w| w.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|w| !w.is_empty())
            .collect();
        Query { formula, worlds }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Query> {
        Ok(Query::parse(&fs::read_to_string(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODAL: &str = "
logic: Modal
P: [p, q]
V:
  w1: [p]
  w2: [q]
  w3: ~
R:
  w1: [w2, w3]
  w2:
";

    #[test]
    fn test_yaml() {
        let desc = ModelDescription::from_yaml_str(MODAL).unwrap();
        assert_eq!(desc.logic, Logic::Modal);
        assert_eq!(desc.props, ["p", "q"]);
        assert_eq!(desc.valuation["w1"], ["p"]);
        assert!(desc.valuation["w3"].is_empty());
        assert_eq!(desc.relation["w1"], ["w2", "w3"]);
        assert!(desc.relation["w2"].is_empty());
        assert!(desc.agent_props.is_empty());
        assert_eq!(desc.agents, None);
    }

    #[test]
    fn test_json_travel() {
        let desc = ModelDescription::from_json_str(
            r#"{
                "logic": "lhs",
                "P_A": ["home"],
                "P_E": ["p"],
                "V": {"w1": ["home"], "w2": ["p"]},
                "R": {"w1": ["w2"], "w2": null},
                "agents": 3
            }"#,
        )
        .unwrap();
        assert_eq!(desc.logic, Logic::Travel);
        assert_eq!(desc.propositions().into_iter().collect::<Vec<_>>(), ["home", "p"]);
        assert_eq!(desc.travelers().unwrap(), 2);
    }

    #[test]
    fn test_travelers() {
        let mut desc = ModelDescription::from_yaml_str(MODAL).unwrap();
        assert_eq!(desc.travelers().unwrap(), 1);
        desc.agents = Some(1);
        assert_eq!(desc.travelers().unwrap(), 1);
        desc.agents = Some(2);
        assert_eq!(desc.travelers().unwrap(), 1);
        desc.agents = Some(0);
        assert!(matches!(desc.travelers(), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_unknown_logic() {
        let err = ModelDescription::from_yaml_str("logic: ctl\nV: {}\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_builder() {
        let desc = ModelDescription::from_yaml_str(MODAL).unwrap();
        let kripke = desc.builder().build().unwrap();
        assert_eq!(kripke.num_worlds(), 3);
        assert_eq!(kripke.edges().len(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            ModelDescription::from_path("model.toml"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_query() {
        let query = Query::parse("<>(q)\nw1, w2 ,w3\n");
        assert_eq!(query.formula, "<>(q)");
        assert_eq!(query.worlds, ["w1", "w2", "w3"]);

        let query = Query::parse("p");
        assert_eq!(query.formula, "p");
        assert!(query.worlds.is_empty());
    }
}
