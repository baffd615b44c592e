//! Read-side views produced by the engine.

use pacto_domain::{FavorRecord, FavorType, Participant, RedemptionRecord, RewardType};
use serde::Serialize;

/// Static catalogs, as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    #[serde(rename = "gestos")]
    pub favor_types: &'static [FavorType],
    #[serde(rename = "canjes")]
    pub reward_types: &'static [RewardType],
}

/// Everything one participant sees at a given instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub user: Participant,
    /// Whether a review window is open right now
    pub review: bool,
    pub my_points: i64,
    pub other_points: i64,
    pub my_total_earned: i64,
    pub my_total_spent: i64,
    /// Own favors still awaiting review
    pub my_pending: Vec<FavorRecord>,
    /// Other participant's pending favors; empty outside review windows
    pub to_review: Vec<FavorRecord>,
    #[serde(rename = "myCanjes")]
    pub my_redemptions: Vec<RedemptionRecord>,
    /// Other participant's pending redemptions; never gated
    #[serde(rename = "pendingCanjes")]
    pub pending_redemptions: Vec<RedemptionRecord>,
    #[serde(rename = "canjesToday")]
    pub redemptions_today: usize,
    /// Disputed favors of both participants
    pub disputed: Vec<FavorRecord>,
    /// Most recent resolved favors, oldest first
    pub history: Vec<FavorRecord>,
}
