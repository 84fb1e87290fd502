//! Tool catalog and panel data model
//!
//! Panel payloads discriminate entries by their `model_class` field. The
//! discriminant is resolved once, at deserialization, into [`PanelEntry`].

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A single tool from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_section_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub hidden: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub disabled: bool,
    #[serde(default = "default_true", deserialize_with = "deserialize_flag")]
    pub is_workflow_compatible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edam_operations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edam_topics: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Accept `true`/`false`, `null`, numbers and strings for boolean flags.
///
/// Catalog payloads are not consistent about flag types (`"hidden": ""` is
/// common), and ingestion must not fail on them.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

impl Tool {
    /// Create a visible, enabled, workflow-compatible tool without a section
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            help: None,
            version: None,
            panel_section_id: None,
            panel_section_name: None,
            hidden: false,
            disabled: false,
            is_workflow_compatible: true,
            edam_operations: Vec::new(),
            edam_topics: Vec::new(),
        }
    }

    /// Place the tool in a panel section
    pub fn with_section(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.panel_section_id = Some(id.into());
        self.panel_section_name = Some(name.into());
        self
    }

    /// Look up a searchable field by name.
    ///
    /// Returns `None` for unknown fields and for fields that are empty, so
    /// callers can treat both as "tool lacks this field".
    pub fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value: Cow<'_, str> = match key {
            "id" => Cow::Borrowed(self.id.as_str()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "description" => Cow::Borrowed(self.description.as_str()),
            "help" => Cow::Borrowed(self.help.as_deref()?),
            "version" => Cow::Borrowed(self.version.as_deref()?),
            "panel_section_id" => Cow::Borrowed(self.panel_section_id.as_deref()?),
            "panel_section_name" => Cow::Borrowed(self.panel_section_name.as_deref()?),
            "edam_operations" => Cow::Owned(self.edam_operations.join(" ")),
            "edam_topics" => Cow::Owned(self.edam_topics.join(" ")),
            _ => return None,
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Ontology category ids for a category kind such as `edam_operation`
    pub fn categories(&self, kind: &str) -> Option<&[String]> {
        match kind {
            "edam_operation" => Some(&self.edam_operations),
            "edam_topic" => Some(&self.edam_topics),
            _ => None,
        }
    }
}

/// A non-interactive heading inside or alongside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSectionLabel {
    pub id: String,
    pub text: String,
}

/// One entry of a section's tool list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionItem {
    ToolId(String),
    Label(ToolSectionLabel),
}

impl SectionItem {
    pub fn tool_id(&self) -> Option<&str> {
        match self {
            SectionItem::ToolId(id) => Some(id),
            SectionItem::Label(_) => None,
        }
    }
}

/// A named grouping of tool ids and labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tools: Vec<SectionItem>,
}

impl ToolSection {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            tools: Vec::new(),
        }
    }

    /// Builder helper: append tool ids
    pub fn with_tools<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools
            .extend(ids.into_iter().map(|id| SectionItem::ToolId(id.into())));
        self
    }

    /// Tool ids in list order, labels skipped
    pub fn tool_ids(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().filter_map(SectionItem::tool_id)
    }

    pub fn contains_tool(&self, tool_id: &str) -> bool {
        self.tool_ids().any(|id| id == tool_id)
    }

    /// Clone every field except the tool list, which starts empty
    pub fn empty_clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            tools: Vec::new(),
        }
    }
}

/// A panel entry, discriminated by `model_class`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_class")]
pub enum PanelEntry {
    Tool(Tool),
    #[serde(rename = "ToolSection")]
    Section(ToolSection),
    #[serde(rename = "ToolSectionLabel")]
    Label(ToolSectionLabel),
}

impl PanelEntry {
    pub fn as_section(&self) -> Option<&ToolSection> {
        match self {
            PanelEntry::Section(section) => Some(section),
            _ => None,
        }
    }
}

/// Ordered mapping from entry id to panel entry.
///
/// Insertion order is render order. Serialized as a JSON object whose key
/// order is preserved in both directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    entries: Vec<(String, PanelEntry)>,
    index: HashMap<String, usize>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PanelEntry> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PanelEntry> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Insert an entry; an existing key keeps its position and gets the new value
    pub fn insert(&mut self, id: impl Into<String>, entry: PanelEntry) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&i) => self.entries[i].1 = entry,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, entry));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PanelEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Every tool id the panel references, standalone or inside sections,
    /// in panel order (duplicates possible when a tool sits in several sections)
    pub fn tool_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for (_, entry) in self.iter() {
            match entry {
                PanelEntry::Tool(tool) => ids.push(tool.id.as_str()),
                PanelEntry::Section(section) => ids.extend(section.tool_ids()),
                PanelEntry::Label(_) => {}
            }
        }
        ids
    }

    /// Derive the default panel from catalog section assignments.
    ///
    /// Sections appear in the order their first tool appears; tools without a
    /// section become standalone entries.
    pub fn from_tools(tools: &[Tool]) -> Self {
        let mut panel = Panel::new();
        for tool in tools {
            match tool.panel_section_id.as_deref() {
                Some(section_id) if !section_id.is_empty() => {
                    if let Some(PanelEntry::Section(section)) = panel.get_mut(section_id) {
                        section.tools.push(SectionItem::ToolId(tool.id.clone()));
                        continue;
                    }
                    let name = tool
                        .panel_section_name
                        .clone()
                        .unwrap_or_else(|| section_id.to_string());
                    let section = ToolSection::new(section_id, name).with_tools([tool.id.clone()]);
                    panel.insert(section_id, PanelEntry::Section(section));
                }
                _ => panel.insert(tool.id.clone(), PanelEntry::Tool(tool.clone())),
            }
        }
        panel
    }
}

impl FromIterator<(String, PanelEntry)> for Panel {
    fn from_iter<T: IntoIterator<Item = (String, PanelEntry)>>(iter: T) -> Self {
        let mut panel = Panel::new();
        for (id, entry) in iter {
            panel.insert(id, entry);
        }
        panel
    }
}

impl Serialize for Panel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, entry) in &self.entries {
            map.serialize_entry(id, entry)?;
        }
        map.end()
    }
}

struct PanelVisitor;

impl<'de> Visitor<'de> for PanelVisitor {
    type Value = Panel;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of panel entry id to Tool, ToolSection or ToolSectionLabel")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Panel, A::Error> {
        let mut panel = Panel::new();
        while let Some((id, entry)) = access.next_entry::<String, PanelEntry>()? {
            panel.insert(id, entry);
        }
        Ok(panel)
    }
}

impl<'de> Deserialize<'de> for Panel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PanelVisitor)
    }
}
