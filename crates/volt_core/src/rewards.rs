//! Loyalty tiers earned with reward points.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub name: &'static str,
    pub min_points: u32,
    pub cashback_percent: u8,
    pub benefits: &'static [&'static str],
}

/// Ordered by `min_points`, the first tier starts at zero.
pub const TIERS: [RewardTier; 4] = [
    RewardTier {
        name: "Bronze",
        min_points: 0,
        cashback_percent: 5,
        benefits: &[
            "5% cashback on charging",
            "Basic customer support",
            "Monthly newsletter",
        ],
    },
    RewardTier {
        name: "Silver",
        min_points: 1000,
        cashback_percent: 10,
        benefits: &[
            "10% cashback on charging",
            "Priority customer support",
            "Exclusive offers",
            "Free cancellations",
        ],
    },
    RewardTier {
        name: "Gold",
        min_points: 2000,
        cashback_percent: 15,
        benefits: &[
            "15% cashback on charging",
            "VIP customer support",
            "Premium offers",
            "Free cancellations",
            "Early access to new features",
        ],
    },
    RewardTier {
        name: "Platinum",
        min_points: 5000,
        cashback_percent: 20,
        benefits: &[
            "20% cashback on charging",
            "Dedicated account manager",
            "Exclusive events",
            "All previous benefits",
            "Custom pricing options",
        ],
    },
];

pub fn tier_for(points: u32) -> &'static RewardTier {
    TIERS
        .iter()
        .rev()
        .find(|tier| points >= tier.min_points)
        .unwrap_or(&TIERS[0])
}

pub fn next_tier(points: u32) -> Option<&'static RewardTier> {
    TIERS.iter().find(|tier| tier.min_points > points)
}

/// `None` once the highest tier is reached.
pub fn points_to_next_tier(points: u32) -> Option<u32> {
    next_tier(points).map(|tier| tier.min_points - points)
}
