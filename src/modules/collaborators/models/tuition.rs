use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A tuition as reported by the registration service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitionRecord {
    pub tuition_id: String,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

impl TuitionRecord {
    pub fn new(tuition_id: impl Into<String>, student_ids: Vec<String>) -> Self {
        Self {
            tuition_id: tuition_id.into(),
            student_ids,
        }
    }

    /// Enrolled students with duplicates removed, first occurrence wins
    pub fn distinct_student_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::with_capacity(self.student_ids.len());
        self.student_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// `data` payload of the registration service's tuition list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitionList {
    #[serde(default)]
    pub tuition_list: Vec<TuitionRecord>,
}

/// `data` payload of the payment service's paid students endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidStudents {
    #[serde(default)]
    pub student_ids: Vec<String>,
}
