use crate::types::Subject;

/// Ordered set of subjects.
///
/// Subjects keep their first-insertion order so exports are deterministic.
/// Lists stay small in practice, so membership is a linear scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct SubjectSet(Vec<Subject>);

impl SubjectSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, subject: &str) -> bool {
        self.0.iter().any(|existing| existing.as_str() == subject)
    }

    /// Appends the subject unless it is already present.
    pub(crate) fn insert(&mut self, subject: Subject) -> bool {
        if self.contains(subject.as_str()) {
            return false;
        }
        self.0.push(subject);
        true
    }

    pub(crate) fn remove(&mut self, subject: &str) -> bool {
        match self.0.iter().position(|existing| existing.as_str() == subject) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.0.iter()
    }

    pub(crate) fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|subject| subject.as_str().to_string()).collect()
    }
}

impl FromIterator<Subject> for SubjectSet {
    fn from_iter<I: IntoIterator<Item = Subject>>(iter: I) -> Self {
        let mut set = Self::new();
        for subject in iter {
            set.insert(subject);
        }
        set
    }
}
