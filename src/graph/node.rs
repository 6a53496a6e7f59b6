//! Node types for the flattened ontology graph.
//!
//! Each node in the flattened graph has:
//! - A stable string identifier (dataset-supplied or synthesized)
//! - A kind (root, therapy class, drug subclass, phenotype)
//! - The full set of domain attributes carried over from the source tree
//! - An optional on-screen position, filled in by layout passes

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classification level of a node in the ontology tree.
///
/// Unknown or absent `type` strings in the source data map to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single tree root.
    Root,
    /// A top-level therapy class.
    TherapyClass,
    /// A drug subclass under a therapy class.
    DrugSubclass,
    /// A leaf phenotype carrying clinical detail attributes.
    Phenotype,
    /// Fallback for nodes without a recognized type.
    #[serde(other)]
    Default,
}

impl NodeKind {
    /// Parse a kind from an optional source `type` string.
    pub fn from_type(value: Option<&str>) -> Self {
        match value {
            Some("root") => Self::Root,
            Some("therapy_class") => Self::TherapyClass,
            Some("drug_subclass") => Self::DrugSubclass,
            Some("phenotype") => Self::Phenotype,
            _ => Self::Default,
        }
    }

    /// The snake_case name used in the dataset and on the JS boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::TherapyClass => "therapy_class",
            Self::DrugSubclass => "drug_subclass",
            Self::Phenotype => "phenotype",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position in layout space.
///
/// Layout drivers produce center coordinates; positions stored on nodes are
/// top-left anchors, which is what the rendering collaborator expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Domain attributes carried from a source tree node.
///
/// `label` is always present (derived from the source `name`); every other
/// source field except `children` rides along untouched in `fields`, so the
/// rendering and detail-view collaborators never need to re-read the source
/// tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Display label, taken from the source node's `name`.
    pub label: String,
    /// All remaining source fields, keyed by their original names.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NodeAttributes {
    /// Create attributes with a label and no extra fields.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fields: Map::new(),
        }
    }

    /// Look up a raw attribute value by its source field name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a string attribute by its source field name.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// A node of the flattened graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Unique stable identifier.
    pub id: String,
    /// Classification level.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Carried-over domain attributes.
    pub attributes: NodeAttributes,
    /// Top-left anchor assigned by the most recent layout pass covering
    /// this node, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl GraphNode {
    /// The display label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.attributes.label
    }

    /// Whether this node opens the detail view instead of toggling.
    #[inline]
    pub fn is_phenotype(&self) -> bool {
        self.kind == NodeKind::Phenotype
    }
}

/// Clinical detail fields of a phenotype node, extracted for the detail view.
///
/// `drug_examples` is the structured list form; datasets that only carry a
/// free-text list provide `drug_examples_raw` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhenotypeDetails {
    /// Node id of the phenotype.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Classification identifier (CUTID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_id: Option<String>,
    /// Reported incidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidence: Option<String>,
    /// Time to onset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tti: Option<String>,
    /// Management and prevention guidance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_prevention: Option<String>,
    /// Structured list of example drugs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_examples: Option<Vec<String>>,
    /// Free-text fallback when no structured list exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_examples_raw: Option<String>,
}

impl PhenotypeDetails {
    /// Extract the detail fields from a graph node's attributes.
    pub fn from_node(node: &GraphNode) -> Self {
        let text = |key: &str| node.attributes.text(key).map(str::to_owned);

        let drug_examples = node
            .attributes
            .get("drug_examples")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty());

        Self {
            id: node.id.clone(),
            name: node.attributes.label.clone(),
            cut_id: text("cut_id"),
            incidence: text("incidence"),
            tti: text("tti"),
            management_prevention: text("management_prevention"),
            drug_examples,
            drug_examples_raw: text("drug_examples_raw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_type() {
        assert_eq!(NodeKind::from_type(Some("root")), NodeKind::Root);
        assert_eq!(
            NodeKind::from_type(Some("therapy_class")),
            NodeKind::TherapyClass
        );
        assert_eq!(
            NodeKind::from_type(Some("drug_subclass")),
            NodeKind::DrugSubclass
        );
        assert_eq!(NodeKind::from_type(Some("phenotype")), NodeKind::Phenotype);
        assert_eq!(NodeKind::from_type(Some("mystery")), NodeKind::Default);
        assert_eq!(NodeKind::from_type(None), NodeKind::Default);
    }

    #[test]
    fn test_kind_display_round_trip() {
        for kind in [
            NodeKind::Root,
            NodeKind::TherapyClass,
            NodeKind::DrugSubclass,
            NodeKind::Phenotype,
            NodeKind::Default,
        ] {
            assert_eq!(NodeKind::from_type(Some(kind.as_str())), kind);
        }
        assert_eq!(format!("{}", NodeKind::Phenotype), "phenotype");
    }

    #[test]
    fn test_attribute_access() {
        let mut attributes = NodeAttributes::with_label("Alkylating agents");
        attributes.fields.insert("incidence".into(), json!("10-20%"));
        attributes.fields.insert("count".into(), json!(3));

        assert_eq!(attributes.text("incidence"), Some("10-20%"));
        assert_eq!(attributes.text("count"), None);
        assert_eq!(attributes.get("count"), Some(&json!(3)));
        assert_eq!(attributes.get("missing"), None);
    }

    #[test]
    fn test_phenotype_details_extraction() {
        let mut attributes = NodeAttributes::with_label("Hand-foot syndrome");
        attributes.fields.insert("cut_id".into(), json!("CUT-0042"));
        attributes.fields.insert("incidence".into(), json!("30%"));
        attributes.fields.insert("tti".into(), json!("2-21 days"));
        attributes
            .fields
            .insert("management_prevention".into(), json!("Dose reduction"));
        attributes
            .fields
            .insert("drug_examples".into(), json!(["capecitabine", "5-FU"]));

        let node = GraphNode {
            id: "hfs".into(),
            kind: NodeKind::Phenotype,
            attributes,
            position: None,
        };

        let details = PhenotypeDetails::from_node(&node);
        assert_eq!(details.name, "Hand-foot syndrome");
        assert_eq!(details.cut_id.as_deref(), Some("CUT-0042"));
        assert_eq!(details.incidence.as_deref(), Some("30%"));
        assert_eq!(details.tti.as_deref(), Some("2-21 days"));
        assert_eq!(
            details.drug_examples.as_deref(),
            Some(&["capecitabine".to_owned(), "5-FU".to_owned()][..])
        );
        assert_eq!(details.drug_examples_raw, None);
    }

    #[test]
    fn test_phenotype_details_raw_fallback() {
        let mut attributes = NodeAttributes::with_label("Nail changes");
        attributes
            .fields
            .insert("drug_examples_raw".into(), json!("taxanes, anthracyclines"));

        let node = GraphNode {
            id: "nails".into(),
            kind: NodeKind::Phenotype,
            attributes,
            position: None,
        };

        let details = PhenotypeDetails::from_node(&node);
        assert_eq!(details.drug_examples, None);
        assert_eq!(
            details.drug_examples_raw.as_deref(),
            Some("taxanes, anthracyclines")
        );
    }

    #[test]
    fn test_details_ignore_non_string_entries() {
        let mut attributes = NodeAttributes::with_label("Rash");
        attributes
            .fields
            .insert("drug_examples".into(), json!([1, 2, 3]));

        let node = GraphNode {
            id: "rash".into(),
            kind: NodeKind::Phenotype,
            attributes,
            position: None,
        };

        // An all-numeric list degrades to no structured examples at all.
        let details = PhenotypeDetails::from_node(&node);
        assert_eq!(details.drug_examples, None);
    }
}
