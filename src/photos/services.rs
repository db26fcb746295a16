use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::meals::repo::{MealRepository, RepoError};
use crate::storage::StorageClient;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("failed to upload photo {photo_id}: {cause:#}")]
    UploadFailed {
        photo_id: String,
        cause: anyhow::Error,
    },
    #[error("photo {photo_id} already exists")]
    AssociationConflict { photo_id: String },
    #[error("failed to create meal photo record {photo_id}")]
    AssociationFailed {
        photo_id: String,
        #[source]
        cause: RepoError,
    },
    #[error("meal photo {photo_id} not found")]
    NotFound { photo_id: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// How a successful detach left the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    Removed,
    /// The row is gone but the blob delete failed; the blob needs out-of-band cleanup.
    OrphanedBlob,
}

/// Keeps `meal_photo` rows and stored blobs in agreement.
///
/// Attach uploads before inserting, so a failure between the two steps can
/// only leave an unreferenced blob, never a row pointing at a missing one.
/// The database is the source of truth for whether a photo exists.
pub struct PhotoService {
    meals: Arc<dyn MealRepository>,
    storage: Arc<dyn StorageClient>,
}

impl PhotoService {
    pub fn new(meals: Arc<dyn MealRepository>, storage: Arc<dyn StorageClient>) -> Self {
        Self { meals, storage }
    }

    #[instrument(skip(self, content, content_type), fields(size = content.len()))]
    pub async fn attach(
        &self,
        meal_id: &str,
        photo_id: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), PhotoError> {
        if let Err(e) = self.storage.put_object(photo_id, content, content_type).await {
            error!(error = %e, "photo upload failed");
            return Err(PhotoError::UploadFailed {
                photo_id: photo_id.to_string(),
                cause: e,
            });
        }

        if let Err(e) = self.meals.create_association(photo_id, meal_id).await {
            warn!(error = %e, "meal photo insert failed; removing uploaded object");
            self.discard_upload(photo_id).await;
            return Err(match e {
                RepoError::Duplicate => PhotoError::AssociationConflict {
                    photo_id: photo_id.to_string(),
                },
                other => PhotoError::AssociationFailed {
                    photo_id: photo_id.to_string(),
                    cause: other,
                },
            });
        }

        info!("photo attached");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn detach(&self, photo_id: &str) -> Result<DetachOutcome, PhotoError> {
        let affected = self.meals.delete_association(photo_id).await?;
        if affected == 0 {
            return Err(PhotoError::NotFound {
                photo_id: photo_id.to_string(),
            });
        }

        match self.storage.delete_object(photo_id).await {
            Ok(()) => {
                info!("photo detached");
                Ok(DetachOutcome::Removed)
            }
            Err(e) => {
                error!(error = %e, %photo_id, orphaned_blob = true, "photo record deleted but object delete failed");
                Ok(DetachOutcome::OrphanedBlob)
            }
        }
    }

    // Single attempt; a failure here only leaves an orphaned blob.
    async fn discard_upload(&self, photo_id: &str) {
        if let Err(e) = self.storage.delete_object(photo_id).await {
            error!(error = %e, %photo_id, orphaned_blob = true, "compensating delete failed");
        }
    }
}
