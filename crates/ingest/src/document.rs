use serde::{Deserialize, Serialize};

/// What the upstream extraction pipeline is handed for one paragraph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineInput {
    pub doc_key: String,
    pub sentences: Vec<String>, // pre-tokenized, single spaces between tokens
}

impl PipelineInput {
    pub fn for_paragraph(index: usize, paragraph: &str) -> Self {
        Self {
            doc_key: paragraph_key(index),
            sentences: vec![paragraph.to_string()],
        }
    }
}

/// One entity mention as emitted upstream.
///
/// `span` is an inclusive token range over the whole document's flattened
/// token sequence, not over a single sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mention {
    pub span: (usize, usize),
    pub entity_type: String,
    #[serde(
        default,
        rename = "name",
        alias = "surface_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub surface_text: Option<String>,
}

/// Mentions believed to denote the same real-world entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreferenceGroup {
    #[serde(default)]
    pub mention_indices: Vec<usize>,
}

/// A relation between two coreference groups, referenced by group index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRelation {
    #[serde(rename = "arg1")]
    pub arg1_group: usize,
    #[serde(rename = "arg2")]
    pub arg2_group: usize,
    #[serde(rename = "relation")]
    pub relation_type: String,
}

/// Upstream output for one document.
///
/// Field names follow the upstream wire format: coreference groups travel
/// under `entities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineDocument {
    #[serde(default)]
    pub doc_key: String,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default, rename = "entities")]
    pub groups: Vec<CoreferenceGroup>,
    #[serde(default)]
    pub relations: Vec<RawRelation>,
}

pub fn paragraph_key(index: usize) -> String {
    format!("P{}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_upstream_document() {
        let json = r#"{
            "doc_key": "P0",
            "sentences": ["Aspirin reduces pain ."],
            "mentions": [
                {"span": [0, 0], "entity_type": "Chemical", "name": "Aspirin"},
                {"span": [2, 2], "entity_type": "Disease"}
            ],
            "entities": [{"mention_indices": [0]}, {"mention_indices": [1]}],
            "relations": [{"arg1": 0, "arg2": 1, "relation": "CID"}]
        }"#;

        let doc: PipelineDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.mentions.len(), 2);
        assert_eq!(doc.mentions[0].surface_text.as_deref(), Some("Aspirin"));
        assert_eq!(doc.mentions[1].surface_text, None);
        assert_eq!(doc.groups[1].mention_indices, vec![1]);
        assert_eq!(doc.relations[0].relation_type, "CID");
        assert_eq!(doc.relations[0].arg2_group, 1);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let doc: PipelineDocument = serde_json::from_str(r#"{"sentences": []}"#).unwrap();
        assert!(doc.mentions.is_empty());
        assert!(doc.groups.is_empty());
        assert!(doc.relations.is_empty());

        let group: CoreferenceGroup = serde_json::from_str("{}").unwrap();
        assert!(group.mention_indices.is_empty());
    }

    #[test]
    fn test_surface_text_alias() {
        let m: Mention = serde_json::from_str(
            r#"{"span": [1, 2], "entity_type": "gene", "surface_text": "IL 6"}"#,
        )
        .unwrap();
        assert_eq!(m.surface_text.as_deref(), Some("IL 6"));
        assert_eq!(m.span, (1, 2));
    }

    #[test]
    fn test_paragraph_input() {
        let input = PipelineInput::for_paragraph(3, "A B .");
        assert_eq!(input.doc_key, "P3");
        assert_eq!(input.sentences, vec!["A B .".to_string()]);
    }
}
