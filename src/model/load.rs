//! Per-member load vectors and the derived measures computed from them

use serde::{Deserialize, Serialize};

use super::member::{Member, Role};

/// Headroom a member has before they are considered fully loaded
pub const BASELINE_CAPACITY: f64 = 150.0;

/// One of the six fixed categories of load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Visible,
    Invisible,
    Emotional,
    Cognitive,
    Anticipatory,
    Administrative,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Visible,
        Dimension::Invisible,
        Dimension::Emotional,
        Dimension::Cognitive,
        Dimension::Anticipatory,
        Dimension::Administrative,
    ];

    /// Multiplier applied when folding this dimension into the total
    pub fn weight(self) -> f64 {
        match self {
            Dimension::Visible => 1.0,
            Dimension::Invisible => 1.5,
            Dimension::Emotional => 2.0,
            Dimension::Cognitive => 1.8,
            Dimension::Anticipatory => 1.6,
            Dimension::Administrative => 1.3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Visible => "Visible Tasks",
            Dimension::Invisible => "Invisible Planning",
            Dimension::Emotional => "Emotional Labor",
            Dimension::Cognitive => "Cognitive Load",
            Dimension::Anticipatory => "Anticipatory Care",
            Dimension::Administrative => "Administrative Burden",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Visible => write!(f, "visible"),
            Dimension::Invisible => write!(f, "invisible"),
            Dimension::Emotional => write!(f, "emotional"),
            Dimension::Cognitive => write!(f, "cognitive"),
            Dimension::Anticipatory => write!(f, "anticipatory"),
            Dimension::Administrative => write!(f, "administrative"),
        }
    }
}

/// Accumulated magnitude per dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct DimensionValues {
    pub visible: f64,
    pub invisible: f64,
    pub emotional: f64,
    pub cognitive: f64,
    pub anticipatory: f64,
    pub administrative: f64,
}

impl DimensionValues {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Visible => self.visible,
            Dimension::Invisible => self.invisible,
            Dimension::Emotional => self.emotional,
            Dimension::Cognitive => self.cognitive,
            Dimension::Anticipatory => self.anticipatory,
            Dimension::Administrative => self.administrative,
        }
    }

    pub fn add(&mut self, dimension: Dimension, magnitude: f64) {
        let slot = match dimension {
            Dimension::Visible => &mut self.visible,
            Dimension::Invisible => &mut self.invisible,
            Dimension::Emotional => &mut self.emotional,
            Dimension::Cognitive => &mut self.cognitive,
            Dimension::Anticipatory => &mut self.anticipatory,
            Dimension::Administrative => &mut self.administrative,
        };
        *slot += magnitude;
    }

    pub fn weighted_total(&self) -> f64 {
        Dimension::ALL
            .iter()
            .map(|d| self.get(*d) * d.weight())
            .sum()
    }
}

/// Which kind of signal produced a contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Task,
    Event,
    Habit,
    Baseline,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Task => write!(f, "task"),
            SourceType::Event => write!(f, "event"),
            SourceType::Habit => write!(f, "habit"),
            SourceType::Baseline => write!(f, "baseline"),
        }
    }
}

/// Provenance of one contribution to a member's load
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoadDetail {
    pub source_type: SourceType,
    pub label: String,
    pub magnitude: f64,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnoutRisk {
    #[default]
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl BurnoutRisk {
    pub fn from_total(total: f64) -> Self {
        if total >= 200.0 {
            BurnoutRisk::Critical
        } else if total >= 150.0 {
            BurnoutRisk::High
        } else if total >= 100.0 {
            BurnoutRisk::Moderate
        } else if total >= 50.0 {
            BurnoutRisk::Low
        } else {
            BurnoutRisk::Minimal
        }
    }
}

impl std::fmt::Display for BurnoutRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BurnoutRisk::Minimal => write!(f, "minimal"),
            BurnoutRisk::Low => write!(f, "low"),
            BurnoutRisk::Moderate => write!(f, "moderate"),
            BurnoutRisk::High => write!(f, "high"),
            BurnoutRisk::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityStatus {
    #[default]
    Healthy,
    Stretched,
    Overwhelmed,
}

impl std::fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityStatus::Healthy => write!(f, "healthy"),
            CapacityStatus::Stretched => write!(f, "stretched"),
            CapacityStatus::Overwhelmed => write!(f, "overwhelmed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Capacity {
    pub absolute: f64,
    pub percentage: u32,
    pub status: CapacityStatus,
}

impl Capacity {
    pub fn from_total(total: f64) -> Self {
        let absolute = (BASELINE_CAPACITY - total).max(0.0);
        let percentage = (absolute / BASELINE_CAPACITY * 100.0).round() as u32;
        let status = if percentage > 50 {
            CapacityStatus::Healthy
        } else if percentage > 20 {
            CapacityStatus::Stretched
        } else {
            CapacityStatus::Overwhelmed
        };
        Self {
            absolute,
            percentage,
            status,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::from_total(0.0)
    }
}

/// A member's load across all dimensions plus derived measures
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoadVector {
    pub member_id: String,

    pub name: String,

    pub role: Role,

    #[serde(default)]
    pub age: Option<u32>,

    #[serde(flatten)]
    pub dimensions: DimensionValues,

    #[serde(default)]
    pub details: Vec<LoadDetail>,

    pub total: f64,

    pub percentage_of_family: u32,

    pub burnout_risk: BurnoutRisk,

    pub capacity_remaining: Capacity,
}

impl LoadVector {
    /// A zeroed vector for a roster member
    pub fn for_member(member: &Member) -> Self {
        Self {
            member_id: member.id.clone(),
            name: member.name.clone(),
            role: member.role,
            age: member.age,
            dimensions: DimensionValues::default(),
            details: Vec::new(),
            total: 0.0,
            percentage_of_family: 0,
            burnout_risk: BurnoutRisk::default(),
            capacity_remaining: Capacity::default(),
        }
    }

    pub fn contribute(
        &mut self,
        source_type: SourceType,
        label: &str,
        dimension: Dimension,
        magnitude: f64,
    ) {
        self.dimensions.add(dimension, magnitude);
        self.details.push(LoadDetail {
            source_type,
            label: label.to_string(),
            magnitude,
            dimension,
        });
    }

    /// Recompute total, burnout risk and capacity from the dimension values
    pub fn derive(&mut self) {
        self.total = self.dimensions.weighted_total();
        self.burnout_risk = BurnoutRisk::from_total(self.total);
        self.capacity_remaining = Capacity::from_total(self.total);
    }

    pub fn visible(&self) -> f64 {
        self.dimensions.visible
    }

    pub fn invisible(&self) -> f64 {
        self.dimensions.invisible
    }

    pub fn emotional(&self) -> f64 {
        self.dimensions.emotional
    }
}

/// Load vectors for a whole group, kept in roster order
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LoadMap {
    members: Vec<LoadVector>,
}

impl LoadMap {
    pub fn from_roster(roster: &[Member]) -> Self {
        Self {
            members: roster.iter().map(LoadVector::for_member).collect(),
        }
    }

    pub fn get(&self, member_id: &str) -> Option<&LoadVector> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    pub fn get_mut(&mut self, member_id: &str) -> Option<&mut LoadVector> {
        self.members.iter_mut().find(|m| m.member_id == member_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoadVector> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LoadVector> {
        self.members.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn family_total(&self) -> f64 {
        self.members.iter().map(|m| m.total).sum()
    }

    /// Derive per-member measures, then shares of the group total.
    ///
    /// Shares need every total, so they are computed in a second pass.
    pub fn finalize(&mut self) {
        for member in &mut self.members {
            member.derive();
        }

        let family_total = self.family_total();
        for member in &mut self.members {
            member.percentage_of_family = if family_total > 0.0 {
                (member.total / family_total * 100.0).round() as u32
            } else {
                0
            };
        }
    }
}

impl<'a> IntoIterator for &'a LoadMap {
    type Item = &'a LoadVector;
    type IntoIter = std::slice::Iter<'a, LoadVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl FromIterator<LoadVector> for LoadMap {
    fn from_iter<I: IntoIterator<Item = LoadVector>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vector_with(values: DimensionValues) -> LoadVector {
        let mut vector = LoadVector::for_member(&Member::new("m", "Morgan", Role::Parent));
        vector.dimensions = values;
        vector.derive();
        vector
    }

    #[test]
    fn test_burnout_boundaries() {
        assert_eq!(BurnoutRisk::from_total(49.0), BurnoutRisk::Minimal);
        assert_eq!(BurnoutRisk::from_total(50.0), BurnoutRisk::Low);
        assert_eq!(BurnoutRisk::from_total(99.0), BurnoutRisk::Low);
        assert_eq!(BurnoutRisk::from_total(100.0), BurnoutRisk::Moderate);
        assert_eq!(BurnoutRisk::from_total(149.0), BurnoutRisk::Moderate);
        assert_eq!(BurnoutRisk::from_total(150.0), BurnoutRisk::High);
        assert_eq!(BurnoutRisk::from_total(199.0), BurnoutRisk::High);
        assert_eq!(BurnoutRisk::from_total(200.0), BurnoutRisk::Critical);
    }

    #[test]
    fn test_capacity_status_bands() {
        assert_eq!(Capacity::from_total(0.0).status, CapacityStatus::Healthy);
        assert_eq!(Capacity::from_total(0.0).percentage, 100);
        // 150 - 90 = 60 -> 40%
        assert_eq!(Capacity::from_total(90.0).status, CapacityStatus::Stretched);
        // 150 - 130 = 20 -> 13%
        assert_eq!(Capacity::from_total(130.0).status, CapacityStatus::Overwhelmed);
    }

    #[test]
    fn test_capacity_clamps_at_zero() {
        let capacity = Capacity::from_total(400.0);
        assert_eq!(capacity.absolute, 0.0);
        assert_eq!(capacity.percentage, 0);
        assert_eq!(capacity.status, CapacityStatus::Overwhelmed);
    }

    #[test]
    fn test_contribute_records_detail_and_value() {
        let mut vector = LoadVector::for_member(&Member::new("m", "Morgan", Role::Parent));
        vector.contribute(SourceType::Task, "Dishes", Dimension::Visible, 2.0);
        vector.contribute(SourceType::Task, "Dishes", Dimension::Invisible, 1.5);

        assert_eq!(vector.visible(), 2.0);
        assert_eq!(vector.invisible(), 1.5);
        assert_eq!(vector.details.len(), 2);
        assert_eq!(vector.details[1].dimension, Dimension::Invisible);
    }

    #[test]
    fn test_shares_are_zero_for_empty_load() {
        let roster = vec![
            Member::new("a", "Alex", Role::Parent),
            Member::new("b", "Blake", Role::Child),
        ];
        let mut map = LoadMap::from_roster(&roster);
        map.finalize();
        assert!(map.iter().all(|m| m.percentage_of_family == 0));
    }

    #[test]
    fn test_dimensions_serialize_flat() {
        let vector = vector_with(DimensionValues {
            visible: 3.0,
            ..Default::default()
        });
        let json = serde_json::to_value(&vector).unwrap();
        assert_eq!(json["visible"], 3.0);
        assert_eq!(json["burnout_risk"], "minimal");
    }

    fn dimension_values() -> impl Strategy<Value = DimensionValues> {
        (
            0.0..500.0f64,
            0.0..500.0f64,
            0.0..500.0f64,
            0.0..500.0f64,
            0.0..500.0f64,
            0.0..500.0f64,
        )
            .prop_map(
                |(visible, invisible, emotional, cognitive, anticipatory, administrative)| {
                    DimensionValues {
                        visible,
                        invisible,
                        emotional,
                        cognitive,
                        anticipatory,
                        administrative,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn prop_total_is_weighted_sum(values in dimension_values()) {
            let vector = vector_with(values);
            let expected = values.visible * 1.0
                + values.invisible * 1.5
                + values.emotional * 2.0
                + values.cognitive * 1.8
                + values.anticipatory * 1.6
                + values.administrative * 1.3;
            prop_assert!((vector.total - expected).abs() < 1e-9);
        }

        #[test]
        fn prop_capacity_never_negative(values in dimension_values()) {
            let vector = vector_with(values);
            prop_assert!(vector.capacity_remaining.absolute >= 0.0);
            prop_assert!(vector.capacity_remaining.percentage <= 100);
        }

        #[test]
        fn prop_shares_sum_to_about_hundred(group in prop::collection::vec(dimension_values(), 1..8)) {
            let mut map: LoadMap = group
                .iter()
                .enumerate()
                .map(|(idx, values)| {
                    let member = Member::new(format!("m{}", idx), format!("Member {}", idx), Role::Parent);
                    let mut vector = LoadVector::for_member(&member);
                    vector.dimensions = *values;
                    vector
                })
                .collect();
            map.finalize();

            if map.family_total() > 0.0 {
                let sum: i64 = map.iter().map(|m| m.percentage_of_family as i64).sum();
                prop_assert!((sum - 100).abs() <= map.len() as i64);
            }
        }
    }
}
