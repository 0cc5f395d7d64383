//! Food groups and per-group percentage mixes.
//!
//! Every meal is characterized by how its energy splits across ten fixed
//! food groups. A [`FoodGroupMix`] holds one percentage per group; meals
//! carry one and the nutrition blend produces one.

use serde::{Deserialize, Serialize};

/// One of the ten fixed meal-composition categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    WholeGrains,
    Vegetables,
    Fruits,
    Legumes,
    Nuts,
    Dairy,
    Fish,
    Poultry,
    RedMeat,
    AddedFats,
}

impl FoodGroup {
    /// Number of food groups.
    pub const COUNT: usize = 10;

    /// All groups in their fixed display order.
    pub const ALL: [FoodGroup; Self::COUNT] = [
        FoodGroup::WholeGrains,
        FoodGroup::Vegetables,
        FoodGroup::Fruits,
        FoodGroup::Legumes,
        FoodGroup::Nuts,
        FoodGroup::Dairy,
        FoodGroup::Fish,
        FoodGroup::Poultry,
        FoodGroup::RedMeat,
        FoodGroup::AddedFats,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            FoodGroup::WholeGrains => "Whole Grains",
            FoodGroup::Vegetables => "Vegetables",
            FoodGroup::Fruits => "Fruits",
            FoodGroup::Legumes => "Legumes",
            FoodGroup::Nuts => "Nuts",
            FoodGroup::Dairy => "Dairy",
            FoodGroup::Fish => "Fish",
            FoodGroup::Poultry => "Poultry",
            FoodGroup::RedMeat => "Red Meat",
            FoodGroup::AddedFats => "Added Fats",
        }
    }
}

/// Percentage contribution of each food group.
///
/// For a single meal the shares conceptually sum to 100. An all-zero mix
/// means "nothing eaten yet".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodGroupMix {
    pub whole_grains: f64,
    pub vegetables: f64,
    pub fruits: f64,
    pub legumes: f64,
    pub nuts: f64,
    pub dairy: f64,
    pub fish: f64,
    pub poultry: f64,
    pub red_meat: f64,
    pub added_fats: f64,
}

impl FoodGroupMix {
    /// Mix with every group at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Share of one group.
    pub fn get(&self, group: FoodGroup) -> f64 {
        match group {
            FoodGroup::WholeGrains => self.whole_grains,
            FoodGroup::Vegetables => self.vegetables,
            FoodGroup::Fruits => self.fruits,
            FoodGroup::Legumes => self.legumes,
            FoodGroup::Nuts => self.nuts,
            FoodGroup::Dairy => self.dairy,
            FoodGroup::Fish => self.fish,
            FoodGroup::Poultry => self.poultry,
            FoodGroup::RedMeat => self.red_meat,
            FoodGroup::AddedFats => self.added_fats,
        }
    }

    /// Mutable share of one group.
    pub fn get_mut(&mut self, group: FoodGroup) -> &mut f64 {
        match group {
            FoodGroup::WholeGrains => &mut self.whole_grains,
            FoodGroup::Vegetables => &mut self.vegetables,
            FoodGroup::Fruits => &mut self.fruits,
            FoodGroup::Legumes => &mut self.legumes,
            FoodGroup::Nuts => &mut self.nuts,
            FoodGroup::Dairy => &mut self.dairy,
            FoodGroup::Fish => &mut self.fish,
            FoodGroup::Poultry => &mut self.poultry,
            FoodGroup::RedMeat => &mut self.red_meat,
            FoodGroup::AddedFats => &mut self.added_fats,
        }
    }

    /// `(group, share)` pairs in fixed group order.
    pub fn iter(&self) -> impl Iterator<Item = (FoodGroup, f64)> + '_ {
        FoodGroup::ALL.iter().map(move |&g| (g, self.get(g)))
    }

    /// Sum of all shares.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, share)| share).sum()
    }

    /// Whether every group is zero.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, share)| share == 0.0)
    }

    /// Non-zero groups, largest share first (legend order).
    ///
    /// Ties keep fixed group order.
    pub fn ranked(&self) -> Vec<(FoodGroup, f64)> {
        let mut entries: Vec<_> = self.iter().filter(|&(_, share)| share > 0.0).collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        entries
    }
}
