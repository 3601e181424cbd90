//! Risk Scoring Module
//! Heuristic 0-100 risk score from an account snapshot
//!
//! The score is advisory only. Rules run in a fixed order, each adding a
//! delta to a running total and a reason; the total is clamped once at
//! the end:
//! - 0-20: Low Risk
//! - 21-60: Medium Risk
//! - 61-100: High Risk

use crate::models::config::ScoringThresholds;
use crate::models::types::{AccountSnapshot, RiskAssessment, RiskLevel};
use crate::utils::constants::{
    LSF_DEFAULT_RIPPLE, LSF_DISALLOW_XRP, LSF_GLOBAL_FREEZE, LSF_REQUIRE_DEST_TAG, RISK_MODEL_TAG,
};

/// Pure scorer over a fixed ruleset
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    thresholds: ScoringThresholds,
}

/// Running state while rules are evaluated
struct ScoreAccumulator {
    raw: i32,
    reasons: Vec<String>,
}

impl ScoreAccumulator {
    fn new() -> Self {
        Self {
            raw: 0,
            reasons: Vec::new(),
        }
    }

    fn add(&mut self, delta: i32, reason: impl Into<String>) {
        self.raw += delta;
        self.reasons.push(reason.into());
    }

    fn finish(self) -> RiskAssessment {
        let score = self.raw.clamp(0, 100) as u8;
        RiskAssessment {
            score,
            level: RiskLevel::from_score(score),
            reasons: self.reasons,
            model: RISK_MODEL_TAG.to_string(),
        }
    }
}

impl RiskScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    /// Score one snapshot. Deterministic, no I/O.
    pub fn score(&self, snapshot: &AccountSnapshot) -> RiskAssessment {
        let t = &self.thresholds;
        let mut acc = ScoreAccumulator::new();

        // Balance tier
        let balance = coerce_balance(snapshot.balance_xrp);
        if balance < t.low_balance_xrp {
            acc.add(t.low_balance_delta, format!("Very low balance ({:.6} XRP).", balance));
        } else if balance > t.healthy_balance_xrp {
            acc.add(
                t.healthy_balance_delta,
                format!("Healthy balance (>{} XRP).", t.healthy_balance_xrp),
            );
        } else {
            acc.add(0, "Moderate balance.");
        }

        // Owner objects
        let owner_count = snapshot.owner_count;
        if owner_count > t.high_owner_count {
            acc.add(t.high_owner_delta, format!("High owner count ({}).", owner_count));
        } else if owner_count == 0 {
            acc.add(t.no_owner_delta, "No owned objects (simple account).");
        }

        // Flags, each independent
        let flags = snapshot.flags;
        if flags & LSF_GLOBAL_FREEZE != 0 {
            acc.add(t.global_freeze_delta, "GlobalFreeze set.");
        }
        if flags & LSF_DISALLOW_XRP != 0 {
            acc.add(t.disallow_xrp_delta, "DisallowXRP set.");
        }
        if flags & LSF_REQUIRE_DEST_TAG != 0 {
            acc.add(t.require_dest_tag_delta, "RequireDestTag set.");
        }
        if flags & LSF_DEFAULT_RIPPLE != 0 {
            acc.add(0, "DefaultRipple enabled.");
        }

        acc.finish()
    }
}

/// Score with the default ruleset
pub fn score_snapshot(snapshot: &AccountSnapshot) -> RiskAssessment {
    RiskScorer::new().score(snapshot)
}

fn coerce_balance(balance: f64) -> f64 {
    if balance.is_finite() && balance > 0.0 {
        balance
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XRP: u64 = 1_000_000;

    fn snapshot(drops: u64, owner_count: u64, flags: u32) -> AccountSnapshot {
        AccountSnapshot::funded("https://node.example/", drops, owner_count, flags)
    }

    #[test]
    fn test_freeze_alone_sits_on_medium_boundary() {
        let risk = score_snapshot(&snapshot(10 * XRP, 5, LSF_GLOBAL_FREEZE));
        assert_eq!(risk.score, 60);
        assert_eq!(risk.level, RiskLevel::Medium);
        assert_eq!(risk.reasons, vec!["Moderate balance.", "GlobalFreeze set."]);
    }

    #[test]
    fn test_all_failed_snapshot_scores() {
        let risk = score_snapshot(&AccountSnapshot::all_failed());
        // +15 very low balance, -2 no owned objects
        assert_eq!(risk.score, 13);
        assert_eq!(risk.level, RiskLevel::Low);
        assert_eq!(risk.reasons.len(), 2);
        assert_eq!(risk.model, "heuristic-stub");
    }

    #[test]
    fn test_healthy_simple_account_clamps_to_zero() {
        let risk = score_snapshot(&snapshot(50 * XRP, 0, 0));
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.reasons[0].starts_with("Healthy balance"));
    }

    #[test]
    fn test_every_flag_clamps_to_hundred() {
        let flags = LSF_GLOBAL_FREEZE | LSF_DISALLOW_XRP | LSF_REQUIRE_DEST_TAG | LSF_DEFAULT_RIPPLE;
        let risk = score_snapshot(&snapshot(0, 150, flags));
        // 15 + 10 + 60 + 25 + 5 = 115
        assert_eq!(risk.score, 100);
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(
            risk.reasons,
            vec![
                "Very low balance (0.000000 XRP).",
                "High owner count (150).",
                "GlobalFreeze set.",
                "DisallowXRP set.",
                "RequireDestTag set.",
                "DefaultRipple enabled.",
            ]
        );
    }

    #[test]
    fn test_default_ripple_is_informational() {
        let plain = score_snapshot(&snapshot(10 * XRP, 5, 0));
        let rippling = score_snapshot(&snapshot(10 * XRP, 5, LSF_DEFAULT_RIPPLE));
        assert_eq!(plain.score, rippling.score);
        assert_eq!(rippling.reasons.last().map(String::as_str), Some("DefaultRipple enabled."));
    }

    #[test]
    fn test_balance_tier_boundaries() {
        // exactly 1 XRP and exactly 20 XRP are both moderate
        assert_eq!(score_snapshot(&snapshot(XRP, 5, 0)).reasons[0], "Moderate balance.");
        assert_eq!(score_snapshot(&snapshot(20 * XRP, 5, 0)).reasons[0], "Moderate balance.");
    }

    #[test]
    fn test_clamp_happens_once() {
        // -5 (healthy) -2 (no owners) +25 (disallow) = 18, not max(0,-5)-2+25
        let risk = score_snapshot(&snapshot(50 * XRP, 0, LSF_DISALLOW_XRP));
        assert_eq!(risk.score, 18);
    }

    #[test]
    fn test_malformed_balance_coerced() {
        let mut snap = snapshot(10 * XRP, 5, 0);
        snap.balance_xrp = f64::NAN;
        let risk = score_snapshot(&snap);
        assert_eq!(risk.score, 15);
    }

    #[test]
    fn test_deterministic() {
        let snap = snapshot(3 * XRP, 120, LSF_REQUIRE_DEST_TAG);
        assert_eq!(score_snapshot(&snap), score_snapshot(&snap));
    }

    #[test]
    fn test_custom_thresholds() {
        let scorer = RiskScorer::with_thresholds(ScoringThresholds {
            low_balance_xrp: 100.0,
            ..ScoringThresholds::default()
        });
        let risk = scorer.score(&snapshot(50 * XRP, 5, 0));
        assert_eq!(risk.score, 15);
    }
}
