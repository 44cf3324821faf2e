//! Achievement catalog and milestone awarding. Awards happen as a side
//! effect of other actions and must never fail the action itself.

pub mod handlers;

use tracing::{info, warn};
use uuid::Uuid;

use crate::db::operations::DbOperations;

/// Awards the given achievement if the user doesn't have it yet. Errors
/// are logged and swallowed so the triggering request still succeeds.
pub async fn try_award(db: &DbOperations, user_id: Uuid, code: &str) {
    match db.award_achievement(user_id, code).await {
        Ok(rows) if rows > 0 => {
            info!("Awarded achievement '{}' to user {}", code, user_id);
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Failed to award achievement '{}' to user {}: {}", code, user_id, e);
        }
    }
}
