use crate::error::{Error, Result};
use crate::subjects::SubjectSet;
use crate::types::Subject;

/// Plain export record of a [`PermissionList`].
///
/// This is the persistence format: `{ "authorized": [..], "blocked": [..], "public": bool }`.
/// Missing fields default to empty lists and `false` when deserialized.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PermissionListRecord {
    /// Subjects explicitly granted access while the permission is private.
    pub authorized: Vec<String>,
    /// Subjects denied access regardless of any other state.
    pub blocked: Vec<String>,
    /// Whether every non-blocked subject is allowed.
    pub public: bool,
}

/// Authorization policy of a single permission.
///
/// A subject is allowed when it is not blocked and the list is either public
/// or has the subject authorized. Blocking always wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PermissionList {
    authorized: SubjectSet,
    blocked: SubjectSet,
    public: bool,
}

impl PermissionList {
    /// Creates an empty, private permission list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from an export record.
    ///
    /// Subjects are copied element by element and validated; repeated subjects
    /// collapse to their first occurrence.
    pub fn from_record(record: &PermissionListRecord) -> Result<Self> {
        Ok(Self {
            authorized: validate_subjects(&record.authorized)?,
            blocked: validate_subjects(&record.blocked)?,
            public: record.public,
        })
    }

    /// Adds the subject to the authorized subjects.
    pub fn authorize(&mut self, subject: impl AsRef<str>) -> Result<()> {
        self.authorized.insert(Subject::new(subject)?);
        Ok(())
    }

    /// Removes the subject from the authorized subjects.
    pub fn unauthorize(&mut self, subject: impl AsRef<str>) -> Result<()> {
        self.authorized.remove(Subject::new(subject)?.as_str());
        Ok(())
    }

    /// Returns whether the subject is explicitly authorized.
    pub fn is_authorized(&self, subject: impl AsRef<str>) -> Result<bool> {
        Ok(self.authorized.contains(Subject::new(subject)?.as_str()))
    }

    /// Adds the subject to the blocked subjects.
    pub fn block(&mut self, subject: impl AsRef<str>) -> Result<()> {
        self.blocked.insert(Subject::new(subject)?);
        Ok(())
    }

    /// Removes the subject from the blocked subjects.
    pub fn unblock(&mut self, subject: impl AsRef<str>) -> Result<()> {
        self.blocked.remove(Subject::new(subject)?.as_str());
        Ok(())
    }

    /// Returns whether the subject is explicitly blocked.
    pub fn is_blocked(&self, subject: impl AsRef<str>) -> Result<bool> {
        Ok(self.blocked.contains(Subject::new(subject)?.as_str()))
    }

    /// Allows every subject that is not blocked.
    pub fn make_public(&mut self) {
        self.public = true;
    }

    /// Allows only explicitly authorized subjects that are not blocked.
    pub fn make_private(&mut self) {
        self.public = false;
    }

    /// Returns whether the list is public.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Decides whether the subject may perform the permission's action.
    ///
    /// Checked in order: blocked, public, authorized.
    pub fn is_allowed(&self, subject: impl AsRef<str>) -> Result<bool> {
        let subject = Subject::new(subject)?;
        if self.blocked.contains(subject.as_str()) {
            return Ok(false);
        }
        if self.public {
            return Ok(true);
        }
        Ok(self.authorized.contains(subject.as_str()))
    }

    /// Returns whether at least one of the subjects is allowed.
    ///
    /// Every subject is validated, even after a match is found.
    pub fn is_any_allowed<I>(&self, subjects: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut allowed = false;
        for subject in subjects {
            allowed |= self.is_allowed(subject)?;
        }
        Ok(allowed)
    }

    /// Authorized subjects in insertion order.
    pub fn authorized(&self) -> impl Iterator<Item = &Subject> {
        self.authorized.iter()
    }

    /// Blocked subjects in insertion order.
    pub fn blocked(&self) -> impl Iterator<Item = &Subject> {
        self.blocked.iter()
    }

    /// Returns the export record for persistence.
    pub fn to_exportable(&self) -> PermissionListRecord {
        PermissionListRecord {
            authorized: self.authorized.to_strings(),
            blocked: self.blocked.to_strings(),
            public: self.public,
        }
    }
}

impl TryFrom<&PermissionListRecord> for PermissionList {
    type Error = Error;

    fn try_from(record: &PermissionListRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

impl TryFrom<PermissionListRecord> for PermissionList {
    type Error = Error;

    fn try_from(record: PermissionListRecord) -> Result<Self> {
        Self::from_record(&record)
    }
}

fn validate_subjects(values: &[String]) -> Result<SubjectSet> {
    values.iter().map(Subject::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(authorized: &[&str], blocked: &[&str], public: bool) -> PermissionListRecord {
        PermissionListRecord {
            authorized: authorized.iter().map(|s| s.to_string()).collect(),
            blocked: blocked.iter().map(|s| s.to_string()).collect(),
            public,
        }
    }

    #[test]
    fn from_record_should_apply_block_over_authorization() {
        let input = record(&["subject-1", "subject-2"], &["subject-1"], false);
        let list = PermissionList::from_record(&input).unwrap();

        assert!(!list.is_allowed("subject-1").unwrap());
        assert!(list.is_allowed("subject-2").unwrap());
    }

    #[test]
    fn from_record_should_reject_empty_subjects() {
        let result = PermissionList::from_record(&record(&["subject-1", ""], &[], false));
        assert!(matches!(result, Err(Error::InvalidSubject(_))));

        let result = PermissionList::from_record(&record(&[], &[""], false));
        assert!(matches!(result, Err(Error::InvalidSubject(_))));
    }

    #[test]
    fn from_record_should_collapse_duplicates() {
        let list = PermissionList::from_record(&record(&["a", "b", "a"], &[], false)).unwrap();
        assert_eq!(list.to_exportable().authorized, vec!["a", "b"]);
    }

    #[test]
    fn authorize_should_be_idempotent() {
        let mut list = PermissionList::new();
        list.authorize("subject-1").unwrap();
        list.authorize("subject-2").unwrap();
        list.authorize("subject-1").unwrap();

        assert_eq!(list.to_exportable().authorized, vec!["subject-1", "subject-2"]);
    }

    #[test]
    fn unauthorize_should_be_idempotent() {
        let input = record(&["subject-1", "subject-2"], &[], false);
        let mut list = PermissionList::from_record(&input).unwrap();
        list.unauthorize("subject-1").unwrap();
        list.unauthorize("subject-1").unwrap();
        list.unauthorize("subject-3").unwrap();

        assert_eq!(list.to_exportable().authorized, vec!["subject-2"]);
    }

    #[test]
    fn block_and_unblock_should_be_idempotent() {
        let mut list = PermissionList::new();
        list.block("subject-1").unwrap();
        list.block("subject-1").unwrap();
        assert_eq!(list.to_exportable().blocked, vec!["subject-1"]);
        assert!(list.is_blocked("subject-1").unwrap());

        list.unblock("subject-1").unwrap();
        list.unblock("subject-1").unwrap();
        assert!(list.to_exportable().blocked.is_empty());
        assert!(!list.is_blocked("subject-1").unwrap());
    }

    #[test]
    fn operations_should_reject_empty_subject() {
        let mut list = PermissionList::new();

        assert!(matches!(list.authorize(""), Err(Error::InvalidSubject(_))));
        assert!(matches!(list.unauthorize(""), Err(Error::InvalidSubject(_))));
        assert!(matches!(list.block(""), Err(Error::InvalidSubject(_))));
        assert!(matches!(list.unblock(""), Err(Error::InvalidSubject(_))));
        assert!(matches!(list.is_authorized(""), Err(Error::InvalidSubject(_))));
        assert!(matches!(list.is_blocked(""), Err(Error::InvalidSubject(_))));
        assert!(matches!(list.is_allowed(""), Err(Error::InvalidSubject(_))));
        assert_eq!(list, PermissionList::new());
    }

    #[test]
    fn private_list_should_only_allow_authorized_subjects() {
        let mut list = PermissionList::new();
        list.authorize("subject-1").unwrap();

        assert!(!list.is_public());
        assert!(list.is_allowed("subject-1").unwrap());
        assert!(!list.is_allowed("subject-2").unwrap());

        list.block("subject-1").unwrap();
        assert!(!list.is_allowed("subject-1").unwrap());
    }

    #[test]
    fn public_list_should_only_check_blocked_subjects() {
        let mut list = PermissionList::new();
        list.make_public();
        list.block("subject-2").unwrap();

        assert!(list.is_public());
        assert!(list.is_allowed("subject-1").unwrap());
        assert!(!list.is_allowed("subject-2").unwrap());

        list.make_private();
        assert!(!list.is_allowed("subject-1").unwrap());
    }

    #[test]
    fn is_any_allowed_should_match_any_subject() {
        let mut list = PermissionList::new();
        list.authorize("subject-2").unwrap();

        assert!(list.is_any_allowed(["subject-1", "subject-2"]).unwrap());
        assert!(!list.is_any_allowed(["subject-1", "subject-3"]).unwrap());
        assert!(!list.is_any_allowed(Vec::<String>::new()).unwrap());
        assert!(matches!(
            list.is_any_allowed(["subject-2", ""]),
            Err(Error::InvalidSubject(_))
        ));
    }

    #[test]
    fn accessors_should_return_subjects_in_insertion_order() {
        let mut list = PermissionList::new();
        for subject in ["carol", "alice", "bob", "alice"] {
            list.authorize(subject).unwrap();
        }
        list.block("zed").unwrap();
        list.block("adam").unwrap();
        list.unauthorize("alice").unwrap();
        list.authorize("alice").unwrap();

        let authorized: Vec<&str> = list.authorized().map(Subject::as_str).collect();
        let blocked: Vec<&str> = list.blocked().map(Subject::as_str).collect();
        assert_eq!(authorized, vec!["carol", "bob", "alice"]);
        assert_eq!(blocked, vec!["zed", "adam"]);
    }

    #[test]
    fn to_exportable_should_return_record() {
        let mut list = PermissionList::new();
        list.authorize("subject-1").unwrap();
        list.block("subject-2").unwrap();
        list.make_public();

        let exported = list.to_exportable();
        assert_eq!(exported, record(&["subject-1"], &["subject-2"], true));
        assert_eq!(PermissionList::try_from(exported).unwrap(), list);
    }

    #[test]
    fn exported_record_should_not_alias_list_state() {
        let mut list = PermissionList::new();
        list.authorize("subject-1").unwrap();

        let mut exported = list.to_exportable();
        exported.authorized.push("subject-2".to_string());

        assert!(!list.is_authorized("subject-2").unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_should_serialize_to_plain_object() {
        let value = serde_json::to_value(record(&["a"], &["b"], true)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "authorized": ["a"], "blocked": ["b"], "public": true })
        );

        let parsed: PermissionListRecord =
            serde_json::from_value(serde_json::json!({ "authorized": ["a"] })).unwrap();
        assert_eq!(parsed, record(&["a"], &[], false));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_should_reject_non_boolean_public() {
        let parsed = serde_json::from_value::<PermissionListRecord>(
            serde_json::json!({ "public": "yes" }),
        );
        assert!(parsed.is_err());
    }
}
