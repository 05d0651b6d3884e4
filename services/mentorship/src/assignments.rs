use std::collections::BTreeMap;

/// Mentee id to mentor id. One mentor per mentee, last write wins.
#[derive(Debug, Clone, Default)]
pub struct AssignmentRegistry {
    assignments: BTreeMap<String, String>,
}

impl AssignmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            assignments: pairs
                .into_iter()
                .map(|(mentee, mentor)| (mentee.into(), mentor.into()))
                .collect(),
        }
    }

    /// Records the pairing and returns the mentor it replaced, if any.
    /// The mentor id is not checked against the directory.
    pub fn assign(&mut self, mentee_id: &str, mentor_id: &str) -> Option<String> {
        self.assignments
            .insert(mentee_id.to_string(), mentor_id.to_string())
    }

    pub fn get(&self, mentee_id: &str) -> Option<&str> {
        self.assignments.get(mentee_id).map(String::as_str)
    }

    pub fn list_mentees(&self, mentor_id: &str) -> Vec<String> {
        self.assignments
            .iter()
            .filter(|(_, mentor)| mentor.as_str() == mentor_id)
            .map(|(mentee, _)| mentee.clone())
            .collect()
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.assignments
    }
}
