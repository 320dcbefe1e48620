//! Scaling plan document model.

use std::{collections::HashSet, fmt};

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::PlanItem;

/// Discriminator written at the top of every document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DocumentKind {
    #[default]
    ScalingPlan,
}

/// Plan-level settings.
///
/// The three well-known keys are typed; anything else the backend stores is
/// carried through `extra` untouched and in its original order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Metadata {
    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Seconds the engine waits between two scaling actions
    #[serde(rename = "cool_down", default, skip_serializing_if = "Option::is_none")]
    pub cool_down_seconds: Option<u64>,

    /// Evaluation interval of the plan in milliseconds
    #[serde(rename = "interval", default, skip_serializing_if = "Option::is_none")]
    pub interval_millis: Option<u64>,

    /// Any other metadata keys
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A complete scaling plan as exchanged with the plan repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScalingPlanDocument {
    #[serde(default)]
    pub kind: DocumentKind,

    /// Identifier unique within the hosting system
    pub id: String,

    /// Storage identifier, absent until the document is first persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_id: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Named values; a value may itself be an expression
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, Value>,

    #[serde(default)]
    pub enabled: bool,

    /// Plan items in authoring order
    #[serde(rename = "plans", default, deserialize_with = "unique_items")]
    pub items: Vec<PlanItem>,
}

impl ScalingPlanDocument {
    /// Creates an empty, disabled, never persisted document.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::ScalingPlan,
            id: id.into(),
            db_id: None,
            metadata: Metadata::default(),
            variables: IndexMap::new(),
            enabled: false,
            items: Vec::new(),
        }
    }

    /// Returns the metadata title, falling back to the document id.
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(&self.id)
    }

    /// Looks up an item by id.
    pub fn item(&self, id: &str) -> Option<&PlanItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Position of the item with the given id.
    pub fn item_index(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Returns a copy holding only persisted state (every `ui` cleared).
    pub fn persisted(&self) -> Self {
        let mut document = self.clone();
        for item in &mut document.items {
            item.ui = Default::default();
        }
        document
    }
}

/// Reads the item list, rejecting a repeated id at the element that repeats
/// it so the error carries that element's location.
fn unique_items<'de, D>(deserializer: D) -> Result<Vec<PlanItem>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(UniqueItems)
}

struct UniqueItems;

impl<'de> de::Visitor<'de> for UniqueItems {
    type Value = Vec<PlanItem>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a list of plan items")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(UniqueItem(&mut seen))? {
            items.push(item);
        }
        Ok(items)
    }
}

/// One list element; fails inside the element's own mapping when its id was
/// seen before.
struct UniqueItem<'s>(&'s mut HashSet<String>);

impl<'de> de::DeserializeSeed<'de> for UniqueItem<'_> {
    type Value = PlanItem;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> de::Visitor<'de> for UniqueItem<'_> {
    type Value = PlanItem;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a plan item")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let item = PlanItem::deserialize(de::value::MapAccessDeserializer::new(map))?;
        if !self.0.insert(item.id.clone()) {
            return Err(de::Error::custom(format!(
                "duplicate plan item id '{}'",
                item.id
            )));
        }
        Ok(item)
    }
}
