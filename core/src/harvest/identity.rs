use crate::error::{HarvestError, Result};
use crate::types::IdentityScope;
use std::collections::HashMap;

/// First-seen ordinal assignment for one identity scope
///
/// The first unseen key gets the next ordinal (0, 1, 2, ...); a key seen
/// before always gets the ordinal it was first given.
#[derive(Debug, Clone, Default)]
pub struct OrdinalIndex {
    ordinals: HashMap<String, usize>,
}

impl OrdinalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ordinal of `key`, assigning the next one if it is new
    pub fn ordinal(&mut self, key: &str) -> usize {
        if let Some(&ordinal) = self.ordinals.get(key) {
            return ordinal;
        }
        let next = self.ordinals.len();
        self.ordinals.insert(key.to_string(), next);
        next
    }

    /// Number of distinct keys seen
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    pub fn clear(&mut self) {
        self.ordinals.clear();
    }
}

/// Hierarchical identifiers of one harvested frame
///
/// Each identifier extends the one of its enclosing scope with its own
/// zero-padded ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalId {
    pub subject: String,
    pub session: String,
    pub series: String,
    pub image: String,
}

/// Assigns subject/session/series/image identifiers while walking one subject
///
/// Lives for the processing of a single subject. Series and image ordinals
/// restart for every session, so identifiers are only meaningful as the
/// composite strings, never as bare ordinals.
///
/// # Example
///
/// ```
/// use csharvest_core::IdentityAssigner;
///
/// let mut ids = IdentityAssigner::new(2);
/// ids.enter_session("sub-01", "ses-a");
/// let first = ids.identify_frame("1.2.3", "1", 0).unwrap();
/// let second = ids.identify_frame("1.2.4", "1", 0).unwrap();
///
/// assert_eq!(first.image, "000020000000");
/// assert_eq!(second.series, "000020001");
/// ```
#[derive(Debug, Clone)]
pub struct IdentityAssigner {
    subject: String,
    sessions: OrdinalIndex,
    series: OrdinalIndex,
    images: OrdinalIndex,
    current_session: Option<String>,
}

impl IdentityAssigner {
    /// Starts identity assignment for the subject at position `subject_ordinal`
    pub fn new(subject_ordinal: usize) -> Self {
        Self {
            subject: IdentityScope::Subject.format_ordinal(subject_ordinal),
            sessions: OrdinalIndex::new(),
            series: OrdinalIndex::new(),
            images: OrdinalIndex::new(),
            current_session: None,
        }
    }

    /// Subject identifier
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Enters a session and returns its composite identifier
    ///
    /// The session key is the subject directory name followed by the session
    /// directory name. Series and image scopes start over.
    pub fn enter_session(&mut self, subject_name: &str, session_name: &str) -> String {
        let key = format!("{}{}", subject_name, session_name);
        let ordinal = self.sessions.ordinal(&key);
        let session = format!(
            "{}{}",
            self.subject,
            IdentityScope::Session.format_ordinal(ordinal)
        );
        self.series.clear();
        self.images.clear();
        self.current_session = Some(session.clone());
        session
    }

    /// Identifies one materialized frame of the current session
    ///
    /// The image key is the series UID, the instance number and the frame
    /// index concatenated, so frames of one multi-frame file stay distinct.
    ///
    /// # Errors
    ///
    /// Returns an error if no session has been entered yet.
    pub fn identify_frame(
        &mut self,
        series_uid: &str,
        instance_number: &str,
        frame_index: usize,
    ) -> Result<HierarchicalId> {
        let session = self
            .current_session
            .clone()
            .ok_or_else(|| HarvestError::ExtractionError("No session entered".to_string()))?;

        let series_ordinal = self.series.ordinal(series_uid);
        let series = format!(
            "{}{}",
            session,
            IdentityScope::Series.format_ordinal(series_ordinal)
        );

        let image_key = format!("{}{}{}", series_uid, instance_number, frame_index);
        let image_ordinal = self.images.ordinal(&image_key);
        let image = format!(
            "{}{}",
            series,
            IdentityScope::Image.format_ordinal(image_ordinal)
        );

        Ok(HierarchicalId {
            subject: self.subject.clone(),
            session,
            series,
            image,
        })
    }

    /// Number of distinct sessions seen so far
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_index_first_seen() {
        let mut index = OrdinalIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.ordinal("b"), 0);
        assert_eq!(index.ordinal("a"), 1);
        assert_eq!(index.ordinal("b"), 0);
        assert_eq!(index.ordinal("c"), 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_series_increments_session_fixed() {
        let mut ids = IdentityAssigner::new(0);
        let session = ids.enter_session("subject", "session");
        let a = ids.identify_frame("1.2.3", "1", 0).unwrap();
        let b = ids.identify_frame("1.2.4", "1", 0).unwrap();

        assert_eq!(session, "0000000");
        assert_eq!(a.session, b.session);
        assert_eq!(a.series, "000000000");
        assert_eq!(b.series, "000000001");
    }

    #[test]
    fn test_frames_of_one_file_get_distinct_images() {
        let mut ids = IdentityAssigner::new(1);
        ids.enter_session("subject", "session");
        let f0 = ids.identify_frame("1.2.3", "7", 0).unwrap();
        let f1 = ids.identify_frame("1.2.3", "7", 1).unwrap();
        let again = ids.identify_frame("1.2.3", "7", 0).unwrap();

        assert_eq!(f0.series, f1.series);
        assert_ne!(f0.image, f1.image);
        assert_eq!(f0.image, again.image);
        assert_eq!(f1.image, "000010000001");
    }

    #[test]
    fn test_sessions_reset_series_and_images() {
        let mut ids = IdentityAssigner::new(0);
        ids.enter_session("subject", "a");
        ids.identify_frame("1.2.3", "1", 0).unwrap();
        let first = ids.identify_frame("1.2.4", "1", 0).unwrap();

        ids.enter_session("subject", "b");
        let second = ids.identify_frame("1.2.4", "1", 0).unwrap();

        assert_eq!(first.series, "000000001");
        assert_eq!(second.series, "000000100");
        assert_eq!(ids.session_count(), 2);

        // Re-entering a known session keeps its ordinal
        assert_eq!(ids.enter_session("subject", "a"), "0000000");
    }

    #[test]
    fn test_identifiers_extend_enclosing_scopes() {
        let mut ids = IdentityAssigner::new(42);
        ids.enter_session("s", "t");
        let id = ids.identify_frame("9.9", "3", 2).unwrap();

        assert!(id.session.starts_with(&id.subject) && id.session.len() > id.subject.len());
        assert!(id.series.starts_with(&id.session) && id.series.len() > id.session.len());
        assert!(id.image.starts_with(&id.series) && id.image.len() > id.series.len());
    }

    #[test]
    fn test_identify_without_session_fails() {
        let mut ids = IdentityAssigner::new(0);
        assert!(ids.identify_frame("1.2.3", "1", 0).is_err());
    }
}
