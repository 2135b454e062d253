//! Attachment statistics.

use serde::Serialize;

use crate::storage::PartStore;

/// Counts of attachments by storage class, as shown by the status summary.
///
/// The classes overlap: an attachment downloaded into the secure area
/// counts as secure, external and downloaded at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttachmentStats {
    /// Stored in the access-controlled area.
    pub secure: usize,
    /// Pointing at an external URL.
    pub external: usize,
    /// Uploaded by a user, with no external source.
    pub user_uploaded: usize,
    /// Downloaded copies of external files.
    pub downloaded: usize,
}

impl AttachmentStats {
    /// Tallies the attachments of every part in the store.
    #[must_use]
    pub fn collect<S: PartStore>(store: &S) -> Self {
        let mut stats = Self::default();
        for part in store.all_parts() {
            for attachment in &part.attachments {
                if attachment.is_secure() {
                    stats.secure += 1;
                }
                if attachment.is_external() {
                    stats.external += 1;
                }
                if attachment.is_user_uploaded() {
                    stats.user_uploaded += 1;
                }
                if attachment.is_downloaded() {
                    stats.downloaded += 1;
                }
            }
        }
        stats
    }
}
