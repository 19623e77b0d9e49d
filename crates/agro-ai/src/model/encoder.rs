use serde::{Deserialize, Serialize};

use super::ModelError;

/// Categorical-to-integer mapping fit at training time.
///
/// Classes are stored sorted, so a value's code is its position in `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ModelError> {
        let encoder = Self { classes };
        encoder.validate()?;
        Ok(encoder)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if let Some(pair) = self.classes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(ModelError::Invalid(format!(
                "encoder classes must be sorted and unique ('{}' precedes '{}')",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }

    /// Code for `value`, or `None` when the value was never seen during training.
    pub fn transform(&self, value: &str) -> Option<u32> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
            .map(|index| index as u32)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
