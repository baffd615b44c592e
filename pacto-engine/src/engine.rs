//! Ledger Engine: the rules of the pact.
//!
//! Pure and deterministic. Each operation receives the ledger and the
//! current instant explicitly; loading and saving the ledger is the
//! caller's job.
//!
//! # Rules
//!
//! - A favor is reviewed once, by the other participant only. Approval
//!   credits its points; rejection sends it to dispute.
//! - A redemption is reviewed once, by the other participant only.
//!   Approval debits its cost; rejection simply closes it.
//! - A participant may create at most `daily_redemption_limit`
//!   redemptions per local day, and only when the balance covers the cost.
//! - The other participant's pending favors are only listed inside a
//!   review window. Reviewing itself is not time-gated.

use chrono::{DateTime, Utc};
use tracing::debug;

use pacto_domain::{
    favor_type, is_review_window, local_date, reward_type, FavorRecord, FavorStatus, Ledger,
    Participant, RecordId, RedemptionRecord, RedemptionStatus, ReviewDecision, FAVOR_TYPES,
    REWARD_TYPES,
};

use crate::error::{EngineError, EngineResult};
use crate::status::{CatalogView, StatusReport};

/// Default maximum redemptions per participant per local day
pub const DEFAULT_DAILY_REDEMPTION_LIMIT: usize = 3;

/// Default number of resolved favors returned as history
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Tunable limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRules {
    pub daily_redemption_limit: usize,
    pub history_limit: usize,
}

impl Default for LedgerRules {
    fn default() -> Self {
        Self {
            daily_redemption_limit: DEFAULT_DAILY_REDEMPTION_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Stateless rule engine over a [`Ledger`].
#[derive(Debug, Clone, Default)]
pub struct LedgerEngine {
    rules: LedgerRules,
}

impl LedgerEngine {
    pub fn new(rules: LedgerRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &LedgerRules {
        &self.rules
    }

    /// The favor and reward catalogs.
    pub fn config(&self) -> CatalogView {
        CatalogView {
            favor_types: FAVOR_TYPES,
            reward_types: REWARD_TYPES,
        }
    }

    /// Build the status report for `user` at `now`. Read-only.
    pub fn status(&self, ledger: &Ledger, user: Participant, now: DateTime<Utc>) -> StatusReport {
        let other = user.other();
        let review = is_review_window(now);

        let my_pending = ledger
            .favors
            .iter()
            .filter(|f| f.user == user && f.is_pending())
            .cloned()
            .collect();

        let to_review = if review {
            ledger
                .favors
                .iter()
                .filter(|f| f.user == other && f.is_pending())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        let my_redemptions = ledger
            .redemptions
            .iter()
            .filter(|r| r.user == user)
            .cloned()
            .collect();

        let pending_redemptions = ledger
            .redemptions
            .iter()
            .filter(|r| r.user == other && r.is_pending())
            .cloned()
            .collect();

        let disputed = ledger
            .favors
            .iter()
            .filter(|f| f.status == FavorStatus::Disputed)
            .cloned()
            .collect();

        let resolved: Vec<&FavorRecord> = ledger.favors.iter().filter(|f| !f.is_pending()).collect();
        let skip = resolved.len().saturating_sub(self.rules.history_limit);
        let history = resolved.into_iter().skip(skip).cloned().collect();

        let my_total_earned = ledger.total_earned(user);
        let my_total_spent = ledger.total_spent(user);

        StatusReport {
            user,
            review,
            my_points: my_total_earned - my_total_spent,
            other_points: ledger.balance(other),
            my_total_earned,
            my_total_spent,
            my_pending,
            to_review,
            my_redemptions,
            pending_redemptions,
            redemptions_today: self.redemptions_today(ledger, user, now),
            disputed,
            history,
        }
    }

    /// Log a new pending favor for `user`. Returns the new record id.
    ///
    /// # Errors
    /// `UnknownFavorType` if the id is not in the catalog
    pub fn submit_favor(
        &self,
        ledger: &mut Ledger,
        user: Participant,
        favor_type_id: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<RecordId> {
        let favor = favor_type(favor_type_id)?;

        let id = ledger.next_id();
        ledger.favors.push(FavorRecord::new(id, user, favor, now));
        Ok(id)
    }

    /// Resolve one of the other participant's pending favors.
    ///
    /// # Errors
    /// `RecordNotFound` when no pending favor with `id` belongs to the other
    /// participant (wrong id, own favor, or already resolved)
    pub fn review_favor(
        &self,
        ledger: &mut Ledger,
        reviewer: Participant,
        id: RecordId,
        decision: ReviewDecision,
    ) -> EngineResult<FavorStatus> {
        let owner = reviewer.other();
        let favor = ledger
            .favors
            .iter_mut()
            .find(|f| f.id == id && f.user == owner && f.is_pending())
            .ok_or_else(|| EngineError::favor_not_found(id))?;

        Ok(favor.review(decision)?)
    }

    /// Request a reward for `user`. Returns the new record id.
    ///
    /// The cost is not deducted until the other participant approves.
    ///
    /// # Errors
    /// - `UnknownRewardType` if the id is not in the catalog
    /// - `DailyRedemptionLimitExceeded` if the daily cap is reached
    /// - `InsufficientPoints` if the balance is below the cost
    pub fn submit_redemption(
        &self,
        ledger: &mut Ledger,
        user: Participant,
        reward_type_id: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<RecordId> {
        let reward = reward_type(reward_type_id)?;

        let limit = self.rules.daily_redemption_limit;
        let today = self.redemptions_today(ledger, user, now);
        if today >= limit {
            debug!(participant = %user, today, limit, "Daily redemption limit reached");
            return Err(EngineError::DailyRedemptionLimitExceeded { limit });
        }

        let available = ledger.balance(user);
        if available < i64::from(reward.cost) {
            debug!(participant = %user, available, cost = reward.cost, "Insufficient points");
            return Err(EngineError::InsufficientPoints {
                available,
                required: reward.cost,
            });
        }

        let id = ledger.next_id();
        ledger
            .redemptions
            .push(RedemptionRecord::new(id, user, reward, now));
        Ok(id)
    }

    /// Resolve one of the other participant's pending redemptions.
    ///
    /// # Errors
    /// `RecordNotFound` when no pending redemption with `id` belongs to the
    /// other participant
    pub fn review_redemption(
        &self,
        ledger: &mut Ledger,
        reviewer: Participant,
        id: RecordId,
        decision: ReviewDecision,
    ) -> EngineResult<RedemptionStatus> {
        let owner = reviewer.other();
        let redemption = ledger
            .redemptions
            .iter_mut()
            .find(|r| r.id == id && r.user == owner && r.is_pending())
            .ok_or_else(|| EngineError::redemption_not_found(id))?;

        Ok(redemption.review(decision)?)
    }

    /// Redemptions `user` created on the local day of `now`, any status.
    pub fn redemptions_today(&self, ledger: &Ledger, user: Participant, now: DateTime<Utc>) -> usize {
        let today = local_date(now);
        ledger
            .redemptions
            .iter()
            .filter(|r| r.user == user && local_date(r.timestamp) == today)
            .count()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pacto_domain::DomainError;

    const MARCOS: Participant = Participant::Marcos;
    const SOFI: Participant = Participant::Sofi;

    /// 2025-03-14 12:00 local (15:00 UTC), outside any review window
    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap()
    }

    /// 2025-03-14 16:10 local, inside a review window
    fn in_window() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 19, 10, 0).unwrap()
    }

    fn earn(engine: &LedgerEngine, ledger: &mut Ledger, user: Participant, favor: &str) {
        let id = engine.submit_favor(ledger, user, favor, noon()).unwrap();
        engine
            .review_favor(ledger, user.other(), id, ReviewDecision::Approve)
            .unwrap();
    }

    #[test]
    fn test_config_exposes_catalogs() {
        let engine = LedgerEngine::default();
        let config = engine.config();
        assert_eq!(config.favor_types.len(), 11);
        assert_eq!(config.reward_types.len(), 8);
    }

    #[test]
    fn test_full_favor_and_redemption_cycle() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();

        let favor_id = engine.submit_favor(&mut ledger, MARCOS, "foto", noon()).unwrap();
        assert_eq!(ledger.favors[0].status, FavorStatus::Pending);
        assert_eq!(ledger.balance(MARCOS), 0);

        let status = engine
            .review_favor(&mut ledger, SOFI, favor_id, ReviewDecision::Approve)
            .unwrap();
        assert_eq!(status, FavorStatus::Approved);
        assert_eq!(ledger.balance(MARCOS), 1);

        let redemption_id = engine
            .submit_redemption(&mut ledger, MARCOS, "alarma", noon())
            .unwrap();
        assert_eq!(ledger.redemptions[0].status, RedemptionStatus::Pending);
        // Not deducted until approved
        assert_eq!(ledger.balance(MARCOS), 1);

        let status = engine
            .review_redemption(&mut ledger, SOFI, redemption_id, ReviewDecision::Approve)
            .unwrap();
        assert_eq!(status, RedemptionStatus::Approved);
        assert_eq!(ledger.balance(MARCOS), 0);
    }

    #[test]
    fn test_ids_shared_across_record_kinds() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, SOFI, "premium");

        let a = engine.submit_favor(&mut ledger, MARCOS, "mimos", noon()).unwrap();
        let b = engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()).unwrap();
        let c = engine.submit_favor(&mut ledger, SOFI, "pelo", noon()).unwrap();

        assert_eq!((a, b, c), (2, 3, 4));
        assert_eq!(ledger.counter, 4);
    }

    #[test]
    fn test_unknown_favor_type() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();

        let err = engine.submit_favor(&mut ledger, MARCOS, "nope", noon()).unwrap_err();
        assert_eq!(err, EngineError::Domain(DomainError::UnknownFavorType("nope".into())));
        assert_eq!(ledger, Ledger::new());
    }

    #[test]
    fn test_self_review_forbidden() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();

        let id = engine.submit_favor(&mut ledger, MARCOS, "foto", noon()).unwrap();
        let err = engine
            .review_favor(&mut ledger, MARCOS, id, ReviewDecision::Approve)
            .unwrap_err();

        assert!(matches!(err, EngineError::RecordNotFound { id: found, .. } if found == id));
        assert!(ledger.favors[0].is_pending());
    }

    #[test]
    fn test_favor_reviewed_only_once() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();

        let id = engine.submit_favor(&mut ledger, SOFI, "fiaca", noon()).unwrap();
        engine
            .review_favor(&mut ledger, MARCOS, id, ReviewDecision::Approve)
            .unwrap();

        let err = engine
            .review_favor(&mut ledger, MARCOS, id, ReviewDecision::Reject)
            .unwrap_err();
        assert!(matches!(err, EngineError::RecordNotFound { .. }));
        assert_eq!(ledger.favors[0].status, FavorStatus::Approved);
    }

    #[test]
    fn test_rejecting_favor_disputes_and_redemption_rejects() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, MARCOS, "masajes");

        let favor_id = engine.submit_favor(&mut ledger, MARCOS, "foto", noon()).unwrap();
        let favor_status = engine
            .review_favor(&mut ledger, SOFI, favor_id, ReviewDecision::Reject)
            .unwrap();
        assert_eq!(favor_status, FavorStatus::Disputed);

        let redemption_id = engine
            .submit_redemption(&mut ledger, MARCOS, "bano", noon())
            .unwrap();
        let redemption_status = engine
            .review_redemption(&mut ledger, SOFI, redemption_id, ReviewDecision::Reject)
            .unwrap();
        assert_eq!(redemption_status, RedemptionStatus::Rejected);

        // Disputed favor earns nothing, rejected redemption costs nothing
        assert_eq!(ledger.balance(MARCOS), 2);
    }

    #[test]
    fn test_redemption_review_requires_other_participant() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, SOFI, "sorpresa");

        let id = engine.submit_redemption(&mut ledger, SOFI, "fotos", noon()).unwrap();

        let err = engine
            .review_redemption(&mut ledger, SOFI, id, ReviewDecision::Approve)
            .unwrap_err();
        assert!(matches!(err, EngineError::RecordNotFound { .. }));

        let err = engine
            .review_redemption(&mut ledger, MARCOS, id + 100, ReviewDecision::Approve)
            .unwrap_err();
        assert!(matches!(err, EngineError::RecordNotFound { .. }));
    }

    #[test]
    fn test_insufficient_points_creates_nothing() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, SOFI, "compu");

        let before = ledger.clone();
        let err = engine
            .submit_redemption(&mut ledger, SOFI, "tarde", noon())
            .unwrap_err();

        assert_eq!(err, EngineError::InsufficientPoints { available: 1, required: 2 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_unknown_reward_type() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();

        let err = engine
            .submit_redemption(&mut ledger, SOFI, "foto", noon())
            .unwrap_err();
        assert_eq!(err, EngineError::Domain(DomainError::UnknownRewardType("foto".into())));
    }

    #[test]
    fn test_daily_redemption_limit() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        for _ in 0..4 {
            earn(&engine, &mut ledger, SOFI, "premium");
        }

        let first = engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()).unwrap();
        let second = engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()).unwrap();
        engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()).unwrap();
        engine
            .review_redemption(&mut ledger, MARCOS, first, ReviewDecision::Approve)
            .unwrap();
        engine
            .review_redemption(&mut ledger, MARCOS, second, ReviewDecision::Reject)
            .unwrap();
        assert_eq!(ledger.balance(SOFI), 11);

        // Every status counts toward the cap
        let count = ledger.record_count();
        let err = engine
            .submit_redemption(&mut ledger, SOFI, "alarma", noon())
            .unwrap_err();
        assert_eq!(err, EngineError::DailyRedemptionLimitExceeded { limit: 3 });
        assert_eq!(ledger.record_count(), count);

        // Marcos has his own cap
        assert!(matches!(
            engine.submit_redemption(&mut ledger, MARCOS, "alarma", noon()),
            Err(EngineError::InsufficientPoints { .. })
        ));

        let tomorrow = noon() + Duration::days(1);
        assert!(engine.submit_redemption(&mut ledger, SOFI, "alarma", tomorrow).is_ok());
    }

    #[test]
    fn test_daily_limit_follows_local_day() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        for _ in 0..4 {
            earn(&engine, &mut ledger, MARCOS, "premium");
        }

        // 23:30 local on the 14th is already the 15th in UTC
        let late = Utc.with_ymd_and_hms(2025, 3, 15, 2, 30, 0).unwrap();
        for _ in 0..3 {
            engine.submit_redemption(&mut ledger, MARCOS, "bano", late).unwrap();
        }
        assert_eq!(engine.redemptions_today(&ledger, MARCOS, noon()), 3);
        assert!(engine.submit_redemption(&mut ledger, MARCOS, "bano", noon()).is_err());

        // 00:30 local on the 15th
        let after_midnight = Utc.with_ymd_and_hms(2025, 3, 15, 3, 30, 0).unwrap();
        assert_eq!(engine.redemptions_today(&ledger, MARCOS, after_midnight), 0);
        assert!(engine
            .submit_redemption(&mut ledger, MARCOS, "bano", after_midnight)
            .is_ok());
    }

    #[test]
    fn test_custom_daily_limit() {
        let engine = LedgerEngine::new(LedgerRules {
            daily_redemption_limit: 1,
            ..LedgerRules::default()
        });
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, SOFI, "premium");

        engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()).unwrap();
        assert_eq!(
            engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()),
            Err(EngineError::DailyRedemptionLimitExceeded { limit: 1 })
        );
    }

    #[test]
    fn test_status_review_window_gates_only_favors() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, SOFI, "premium");
        engine.submit_favor(&mut ledger, SOFI, "mimos", noon()).unwrap();
        engine.submit_redemption(&mut ledger, SOFI, "alarma", noon()).unwrap();

        let outside = engine.status(&ledger, MARCOS, noon());
        assert!(!outside.review);
        assert!(outside.to_review.is_empty());
        assert_eq!(outside.pending_redemptions.len(), 1);

        let inside = engine.status(&ledger, MARCOS, in_window());
        assert!(inside.review);
        assert_eq!(inside.to_review.len(), 1);
        assert_eq!(inside.to_review[0].favor_type_id, "mimos");
        assert_eq!(inside.pending_redemptions.len(), 1);
    }

    #[test]
    fn test_review_not_blocked_outside_window() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        let id = engine.submit_favor(&mut ledger, SOFI, "mimos", noon()).unwrap();

        assert!(engine.status(&ledger, MARCOS, noon()).to_review.is_empty());
        assert!(engine
            .review_favor(&mut ledger, MARCOS, id, ReviewDecision::Approve)
            .is_ok());
    }

    #[test]
    fn test_status_totals_and_lists() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, MARCOS, "sorpresa");
        earn(&engine, &mut ledger, SOFI, "masajes");
        engine.submit_favor(&mut ledger, MARCOS, "foto", noon()).unwrap();

        let disputed_id = engine.submit_favor(&mut ledger, SOFI, "pelo", noon()).unwrap();
        engine
            .review_favor(&mut ledger, MARCOS, disputed_id, ReviewDecision::Reject)
            .unwrap();

        let spent = engine.submit_redemption(&mut ledger, MARCOS, "fotos", noon()).unwrap();
        engine
            .review_redemption(&mut ledger, SOFI, spent, ReviewDecision::Approve)
            .unwrap();
        engine.submit_redemption(&mut ledger, MARCOS, "alarma", noon()).unwrap();

        let report = engine.status(&ledger, MARCOS, noon());
        assert_eq!(report.user, MARCOS);
        assert_eq!(report.my_total_earned, 3);
        assert_eq!(report.my_total_spent, 2);
        assert_eq!(report.my_points, 1);
        assert_eq!(report.other_points, 2);
        assert_eq!(report.my_pending.len(), 1);
        assert_eq!(report.my_redemptions.len(), 2);
        assert!(report.pending_redemptions.is_empty());
        assert_eq!(report.redemptions_today, 2);
        assert_eq!(report.disputed.len(), 1);
        assert_eq!(report.disputed[0].user, SOFI);
        assert_eq!(report.history.len(), 3);
        assert!(report.history.iter().all(|f| !f.is_pending()));

        // Sofi sees the same disputes but the other side of the balances
        let other = engine.status(&ledger, SOFI, noon());
        assert_eq!(other.my_points, 2);
        assert_eq!(other.other_points, 1);
        assert_eq!(other.pending_redemptions.len(), 1);
        assert_eq!(other.disputed.len(), 1);
    }

    #[test]
    fn test_history_keeps_most_recent_resolved() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();

        for _ in 0..60 {
            earn(&engine, &mut ledger, MARCOS, "foto");
            engine.submit_favor(&mut ledger, SOFI, "mimos", noon()).unwrap();
        }

        let report = engine.status(&ledger, SOFI, noon());
        assert_eq!(report.history.len(), 50);
        assert!(report.history.iter().all(|f| !f.is_pending()));

        // Oldest-first window over the last 50 resolved favors
        let resolved: Vec<RecordId> = ledger
            .favors
            .iter()
            .filter(|f| !f.is_pending())
            .map(|f| f.id)
            .collect();
        let ids: Vec<RecordId> = report.history.iter().map(|f| f.id).collect();
        assert_eq!(ids, &resolved[10..]);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_status_is_read_only() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        engine.submit_favor(&mut ledger, SOFI, "mimos", noon()).unwrap();

        let before = ledger.clone();
        let _ = engine.status(&ledger, MARCOS, in_window());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_stored_points_and_costs_win_over_catalog() {
        let engine = LedgerEngine::default();
        // "foto" is worth 1 and "tarde" costs 2 in the current catalog
        let mut ledger: Ledger = serde_json::from_str(
            r#"{
                "gestos": [{
                    "id": 1, "user": "marcos", "gestoId": "foto", "gestoName": "Foto",
                    "points": 3, "timestamp": "2025-03-10T15:00:00Z", "status": "approved"
                }],
                "canjes": [{
                    "id": 2, "user": "marcos", "canjeId": "tarde", "canjeName": "Tarde",
                    "cost": 1, "timestamp": "2025-03-10T16:00:00Z", "status": "approved"
                }],
                "counter": 2
            }"#,
        )
        .unwrap();

        assert_eq!(ledger.balance(MARCOS), 2);
        let report = engine.status(&ledger, MARCOS, noon());
        assert_eq!(report.my_total_earned, 3);
        assert_eq!(report.my_total_spent, 1);
        assert_eq!(report.my_points, 2);

        assert_eq!(
            engine.submit_redemption(&mut ledger, MARCOS, "premium_canje", noon()),
            Err(EngineError::InsufficientPoints {
                available: 2,
                required: reward_type("premium_canje").unwrap().cost,
            })
        );
        let id = engine.submit_redemption(&mut ledger, MARCOS, "tarde", noon()).unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn test_late_evening_redemption_counts_for_same_local_day() {
        let engine = LedgerEngine::default();
        let mut ledger = Ledger::new();
        earn(&engine, &mut ledger, SOFI, "premium");

        // 21:30 local on the 14th, already 00:30 on the 15th in UTC
        let evening = Utc.with_ymd_and_hms(2025, 3, 15, 0, 30, 0).unwrap();
        engine.submit_redemption(&mut ledger, SOFI, "alarma", evening).unwrap();

        // 23:50 local on the 14th
        let before_midnight = Utc.with_ymd_and_hms(2025, 3, 15, 2, 50, 0).unwrap();
        assert_eq!(engine.redemptions_today(&ledger, SOFI, noon()), 1);
        assert_eq!(engine.redemptions_today(&ledger, SOFI, before_midnight), 1);

        // 09:00 local on the 15th
        let next_morning = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(engine.redemptions_today(&ledger, SOFI, next_morning), 0);
    }
}
