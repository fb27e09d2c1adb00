use crate::domain::model::ClassIndex;
use crate::utils::error::{AppError, Result};
use std::path::Path;

pub const UNKNOWN_DISEASE: &str = "Unknown Disease (Index out of range)";

/// Ordered class names, index `i` is output unit `i` of the classifier.
#[derive(Debug, Clone)]
pub struct LabelDecoder {
    labels: Vec<String>,
}

impl LabelDecoder {
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(AppError::Config {
                message: "class-name list is empty".to_string(),
            });
        }
        Ok(Self { labels })
    }

    /// Loads a JSON array of strings, or one name per line for any other extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let labels: Vec<String> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        };

        Self::new(labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn decode(&self, index: ClassIndex) -> &str {
        match self.labels.get(index.0) {
            Some(label) => label,
            None => {
                tracing::warn!(
                    index = index.0,
                    classes = self.labels.len(),
                    "Class index outside the class-name list, model and class list disagree"
                );
                UNKNOWN_DISEASE
            }
        }
    }
}

/// `Species___Disease_Name` -> `Species Disease Name`. Presentation only.
pub fn display_label(raw: &str) -> String {
    raw.replace("___", " ").replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn decoder() -> LabelDecoder {
        LabelDecoder::new(vec![
            "Apple___Apple_scab".to_string(),
            "Tomato___Early_blight".to_string(),
            "Tomato___healthy".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_in_range_indices_resolve() {
        let decoder = decoder();
        for i in 0..decoder.len() {
            assert_ne!(decoder.decode(ClassIndex(i)), UNKNOWN_DISEASE);
        }
        assert_eq!(decoder.decode(ClassIndex(1)), "Tomato___Early_blight");
    }

    #[test]
    fn test_out_of_range_returns_sentinel() {
        let decoder = decoder();
        assert_eq!(decoder.decode(ClassIndex(3)), UNKNOWN_DISEASE);
        assert_eq!(decoder.decode(ClassIndex(usize::MAX)), UNKNOWN_DISEASE);
    }

    #[test]
    fn test_empty_list_is_a_config_error() {
        assert!(matches!(LabelDecoder::new(vec![]), Err(AppError::Config { .. })));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("Tomato___Early_Blight"), "Tomato Early Blight");
        assert_eq!(
            display_label("Corn_(maize)___Northern_Leaf_Blight"),
            "Corn (maize) Northern Leaf Blight"
        );
    }

    #[test]
    fn test_display_label_is_idempotent() {
        for raw in ["Tomato___Early_Blight", "Pepper,_bell___healthy", "plain", ""] {
            let once = display_label(raw);
            assert_eq!(display_label(&once), once);
            assert!(!once.contains('_'));
        }
    }

    #[test]
    fn test_loads_json_and_text_lists() {
        let mut json = NamedTempFile::with_suffix(".json").unwrap();
        write!(json, r#"["Grape___Black_rot", "Grape___healthy"]"#).unwrap();
        let from_json = LabelDecoder::from_file(json.path()).unwrap();
        assert_eq!(from_json.len(), 2);
        assert_eq!(from_json.decode(ClassIndex(0)), "Grape___Black_rot");

        let mut text = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(text, "Potato___Early_blight\n\nPotato___Late_blight\n").unwrap();
        let from_text = LabelDecoder::from_file(text.path()).unwrap();
        assert_eq!(from_text.len(), 2);
        assert_eq!(from_text.decode(ClassIndex(1)), "Potato___Late_blight");
    }

    #[test]
    fn test_corrupt_json_list_fails() {
        let mut json = NamedTempFile::with_suffix(".json").unwrap();
        write!(json, "{{not json").unwrap();
        assert!(LabelDecoder::from_file(json.path()).is_err());
    }
}
