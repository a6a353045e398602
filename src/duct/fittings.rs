use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 곡관(벤드) 각도. 각 각도마다 고정된 등가 길이를 가진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BendAngle {
    Deg45,
    Deg90,
    Deg180,
}

/// 각도별 등가 길이 표 [ft].
const EQUIVALENT_LENGTH_TABLE_FT: [(BendAngle, f64); 3] = [
    (BendAngle::Deg45, 10.0),
    (BendAngle::Deg90, 20.0),
    (BendAngle::Deg180, 40.0),
];

impl BendAngle {
    pub const ALL: [BendAngle; 3] = [BendAngle::Deg45, BendAngle::Deg90, BendAngle::Deg180];

    /// 입력 맵에서 쓰는 라벨("45", "90", "180").
    pub fn label(&self) -> &'static str {
        match self {
            BendAngle::Deg45 => "45",
            BendAngle::Deg90 => "90",
            BendAngle::Deg180 => "180",
        }
    }

    /// 라벨을 각도로 바꾼다. "90°"처럼 도 기호가 붙어도 허용한다.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_end_matches('°') {
            "45" => Some(BendAngle::Deg45),
            "90" => Some(BendAngle::Deg90),
            "180" => Some(BendAngle::Deg180),
            _ => None,
        }
    }

    /// 곡관 1개당 등가 길이 [ft].
    pub fn equivalent_length_ft(&self) -> f64 {
        EQUIVALENT_LENGTH_TABLE_FT
            .iter()
            .find(|(angle, _)| angle == self)
            .map(|(_, len)| *len)
            .unwrap_or(0.0)
    }
}

/// 각도별 곡관 개수. 없는 각도는 0개로 본다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BendCounts {
    counts: BTreeMap<BendAngle, u32>,
}

impl BendCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 45°/90°/180° 개수로 바로 만든다.
    pub fn from_counts(n45: u32, n90: u32, n180: u32) -> Self {
        let mut bends = Self::new();
        bends.set(BendAngle::Deg45, n45);
        bends.set(BendAngle::Deg90, n90);
        bends.set(BendAngle::Deg180, n180);
        bends
    }

    /// 라벨-개수 쌍으로 만든다. 알 수 없는 라벨은 None.
    pub fn from_labels<'a, I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut bends = Self::new();
        for (label, count) in pairs {
            bends.set(BendAngle::from_label(label)?, count);
        }
        Some(bends)
    }

    pub fn set(&mut self, angle: BendAngle, count: u32) {
        self.counts.insert(angle, count);
    }

    pub fn count(&self, angle: BendAngle) -> u32 {
        self.counts.get(&angle).copied().unwrap_or(0)
    }

    /// 고정 표 기준 피팅 등가 길이 합계 [ft].
    ///
    /// Leq = 10·n45 + 20·n90 + 40·n180
    pub fn equivalent_length_ft(&self) -> f64 {
        BendAngle::ALL
            .iter()
            .map(|angle| f64::from(self.count(*angle)) * angle.equivalent_length_ft())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_angles_count_as_zero() {
        let bends = BendCounts::from_labels([("90", 3)]).unwrap();
        assert_eq!(bends.count(BendAngle::Deg45), 0);
        assert_eq!(bends.count(BendAngle::Deg180), 0);
        assert_eq!(bends.equivalent_length_ft(), 60.0);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = BendCounts::from_labels([("45", 2), ("90", 1), ("180", 0)]).unwrap();
        let b = BendCounts::from_labels([("180", 0), ("90", 1), ("45", 2)]).unwrap();
        assert_eq!(a.equivalent_length_ft(), 40.0);
        assert_eq!(a.equivalent_length_ft(), b.equivalent_length_ft());
    }

    #[test]
    fn unknown_label_rejected() {
        assert!(BendCounts::from_labels([("30", 1)]).is_none());
        assert_eq!(BendAngle::from_label("180°"), Some(BendAngle::Deg180));
    }
}
