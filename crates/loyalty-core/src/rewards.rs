//! Reward catalog for the loyalty ledger.
//!
//! The catalog maps a reward selection to a point cost. It is a pure,
//! stateless lookup: the resolver has no side effects and is always
//! consulted before a redemption is attempted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point cost of a personal training session.
pub const PERSONAL_TRAINING_POINTS: i64 = 1000;

/// Point cost of a free membership month.
pub const FREE_MONTH_POINTS: i64 = 5000;

/// Fallback cost for a marketplace discount with no catalog entry.
pub const DEFAULT_MARKETPLACE_DISCOUNT_POINTS: i64 = 250;

/// Fallback cost for a class pass with no catalog entry.
pub const DEFAULT_CLASS_PASS_POINTS: i64 = 150;

/// The kind of reward being redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// One personal training session (fixed cost).
    PersonalTraining,

    /// One free membership month (fixed cost).
    FreeMonth,

    /// Discount on a marketplace item (variable, looked up by reward ID).
    MarketplaceDiscount,

    /// A drop-in class pass (variable, looked up by reward ID).
    ClassPass,
}

/// A resolved reward cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardCost {
    /// Points required to redeem the reward.
    pub points: i64,

    /// Human-readable description for the ledger entry.
    pub description: String,
}

/// Reward catalog with fixed entries and per-ID variable pricing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardCatalog {
    /// Marketplace discount costs by item ID.
    pub marketplace_discounts: HashMap<String, i64>,

    /// Class pass costs by class ID.
    pub class_passes: HashMap<String, i64>,
}

impl RewardCatalog {
    /// Resolve the point cost and description for a reward selection.
    ///
    /// Fixed entries (`PersonalTraining`, `FreeMonth`) return constants.
    /// Variable entries look up `reward_id` in the relevant table and
    /// fall back to the documented default when the ID is unknown or
    /// absent.
    #[must_use]
    pub fn resolve_cost(&self, kind: RewardKind, reward_id: Option<&str>) -> RewardCost {
        match kind {
            RewardKind::PersonalTraining => RewardCost {
                points: PERSONAL_TRAINING_POINTS,
                description: "Personal training session".to_string(),
            },
            RewardKind::FreeMonth => RewardCost {
                points: FREE_MONTH_POINTS,
                description: "Free membership month".to_string(),
            },
            RewardKind::MarketplaceDiscount => {
                let points = reward_id
                    .and_then(|id| self.marketplace_discounts.get(id).copied())
                    .unwrap_or(DEFAULT_MARKETPLACE_DISCOUNT_POINTS);
                RewardCost {
                    points,
                    description: match reward_id {
                        Some(id) => format!("Marketplace discount ({id})"),
                        None => "Marketplace discount".to_string(),
                    },
                }
            }
            RewardKind::ClassPass => {
                let points = reward_id
                    .and_then(|id| self.class_passes.get(id).copied())
                    .unwrap_or(DEFAULT_CLASS_PASS_POINTS);
                RewardCost {
                    points,
                    description: match reward_id {
                        Some(id) => format!("Class pass ({id})"),
                        None => "Class pass".to_string(),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rewards_resolve_to_constants() {
        let catalog = RewardCatalog::default();

        let training = catalog.resolve_cost(RewardKind::PersonalTraining, None);
        assert_eq!(training.points, 1000);

        let month = catalog.resolve_cost(RewardKind::FreeMonth, Some("ignored"));
        assert_eq!(month.points, 5000);
    }

    #[test]
    fn marketplace_discount_uses_catalog_entry() {
        let mut catalog = RewardCatalog::default();
        catalog
            .marketplace_discounts
            .insert("protein-bar".to_string(), 400);

        let cost = catalog.resolve_cost(RewardKind::MarketplaceDiscount, Some("protein-bar"));
        assert_eq!(cost.points, 400);
        assert!(cost.description.contains("protein-bar"));
    }

    #[test]
    fn unknown_marketplace_id_falls_back_to_default() {
        let catalog = RewardCatalog::default();

        let cost = catalog.resolve_cost(RewardKind::MarketplaceDiscount, Some("mystery"));
        assert_eq!(cost.points, DEFAULT_MARKETPLACE_DISCOUNT_POINTS);
    }

    #[test]
    fn class_pass_without_id_uses_default() {
        let catalog = RewardCatalog::default();

        let cost = catalog.resolve_cost(RewardKind::ClassPass, None);
        assert_eq!(cost.points, DEFAULT_CLASS_PASS_POINTS);
        assert_eq!(cost.description, "Class pass");
    }
}
