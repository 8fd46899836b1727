/// Opaque undo/redo position of the text model (Monaco's alternative
/// version id).
pub type VersionId = u64;

/// Dirty tracking for one loaded document.
///
/// The cached flag always equals `version != clean_marker` as of the last
/// observation. Every mutating method returns `Some(flag)` only when the flag
/// actually changed, which is the caller's cue to notify the host.
#[derive(Debug, Clone)]
pub struct Session {
    clean_marker: VersionId,
    modified: bool,
}

impl Session {
    pub fn new(version: VersionId) -> Self {
        Session {
            clean_marker: version,
            modified: false,
        }
    }

    /// New content was loaded at `version`. Change events raised by the load
    /// itself compare equal to the new marker, so they never count as edits.
    pub fn loaded(&mut self, version: VersionId) -> Option<bool> {
        self.clean_marker = version;
        self.set_modified(false)
    }

    /// Content changed in the editor.
    pub fn observe(&mut self, version: VersionId) -> Option<bool> {
        self.set_modified(version != self.clean_marker)
    }

    /// The document was saved at `version`.
    pub fn mark_clean(&mut self, version: VersionId) -> Option<bool> {
        self.clean_marker = version;
        self.set_modified(false)
    }

    /// Fresh comparison, independent of the cached flag.
    pub fn is_modified_at(&self, version: VersionId) -> bool {
        version != self.clean_marker
    }

    /// Last value reported to the host.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    fn set_modified(&mut self, modified: bool) -> Option<bool> {
        if self.modified == modified {
            return None;
        }
        self.modified = modified;
        Some(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only() {
        let mut session = Session::new(1);
        assert_eq!(session.observe(2), Some(true));
        assert_eq!(session.observe(3), None);
        assert_eq!(session.observe(4), None);
        // undo back to the clean position
        assert_eq!(session.observe(1), Some(false));
        assert_eq!(session.observe(1), None);
    }

    #[test]
    fn mark_clean_reports_only_when_dirty() {
        let mut session = Session::new(1);
        assert_eq!(session.mark_clean(1), None);
        session.observe(5);
        assert_eq!(session.mark_clean(5), Some(false));
        assert!(!session.is_modified_at(5));
        assert!(session.is_modified_at(1));
    }

    #[test]
    fn load_resets_marker() {
        let mut session = Session::new(1);
        session.observe(2);
        assert!(session.is_modified());
        assert_eq!(session.loaded(4), Some(false));
        // the change event from the load itself
        assert_eq!(session.observe(4), None);
        assert_eq!(session.observe(5), Some(true));
    }

    #[test]
    fn clean_load_emits_nothing() {
        let mut session = Session::new(1);
        assert_eq!(session.loaded(2), None);
        assert!(!session.is_modified());
    }
}
