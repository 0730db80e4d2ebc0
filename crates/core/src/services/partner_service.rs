use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::traits::FinanceBackend;
use crate::errors::CoreError;
use crate::models::profile::Profile;

/// Links and unlinks two accounts as partners.
///
/// A link is written on both profiles. Row sharing between partners is the
/// backend's job; this service only maintains the link itself.
pub struct PartnerService;

impl PartnerService {
    pub fn new() -> Self {
        Self
    }

    /// Check that `me` may link to `candidate`.
    ///
    /// Rules:
    /// - No self-links
    /// - Neither side may already hold a link
    pub fn validate_link(&self, me: &Profile, candidate: &Profile) -> Result<(), CoreError> {
        if me.id == candidate.id {
            return Err(CoreError::SelfLink);
        }
        if me.is_linked() || candidate.is_linked() {
            return Err(CoreError::PartnerAlreadyLinked);
        }
        Ok(())
    }

    /// Link account `me` with the account named `partner_username`.
    /// Returns the partner's profile as it was found.
    pub async fn link(
        &self,
        backend: &dyn FinanceBackend,
        me: Uuid,
        partner_username: &str,
    ) -> Result<Profile, CoreError> {
        let username = partner_username.trim();
        let candidate = backend
            .find_profile_by_username(username)
            .await?
            .ok_or_else(|| CoreError::PartnerNotFound(username.to_string()))?;
        let my_profile = backend.fetch_profile(me).await?;

        self.validate_link(&my_profile, &candidate)?;

        backend.set_partner(me, Some(candidate.id)).await?;
        if let Err(e) = backend.set_partner(candidate.id, Some(me)).await {
            warn!(%me, partner = %candidate.id, error = %e, "partner side failed, reverting link");
            revert(backend, me, None).await;
            return Err(e);
        }

        info!(%me, partner = %candidate.id, "partners linked");
        Ok(candidate)
    }

    /// Remove the link between `me` and its partner, on both sides.
    pub async fn unlink(&self, backend: &dyn FinanceBackend, me: Uuid) -> Result<(), CoreError> {
        let my_profile = backend.fetch_profile(me).await?;
        let partner = my_profile
            .linked_partner_id
            .ok_or(CoreError::PartnerNotLinked)?;

        backend.set_partner(me, None).await?;
        if let Err(e) = backend.set_partner(partner, None).await {
            warn!(%me, %partner, error = %e, "partner side failed, restoring link");
            revert(backend, me, Some(partner)).await;
            return Err(e);
        }

        info!(%me, %partner, "partners unlinked");
        Ok(())
    }
}

impl Default for PartnerService {
    fn default() -> Self {
        Self::new()
    }
}

/// Put `me` back to `partner_id` after the other side of a write failed.
/// The caller returns the original failure, so a failed revert is only logged.
async fn revert(backend: &dyn FinanceBackend, me: Uuid, partner_id: Option<Uuid>) {
    if let Err(e) = backend.set_partner(me, partner_id).await {
        error!(%me, error = %e, "could not revert partner link, it may be one-sided");
    }
}
