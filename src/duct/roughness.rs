use serde::{Deserialize, Serialize};

/// 플렉시블 덕트 내면 거칠기 등급. 값은 절대 거칠기 [ft].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuctRoughness {
    Low,
    Medium,
    High,
}

const ROUGHNESS_TABLE: [(DuctRoughness, &str, f64); 3] = [
    (DuctRoughness::Low, "Low", 0.003),
    (DuctRoughness::Medium, "Medium", 0.009),
    (DuctRoughness::High, "High", 0.015),
];

impl DuctRoughness {
    pub const ALL: [DuctRoughness; 3] = [
        DuctRoughness::Low,
        DuctRoughness::Medium,
        DuctRoughness::High,
    ];

    fn entry(&self) -> (&'static str, f64) {
        ROUGHNESS_TABLE
            .iter()
            .find(|(r, _, _)| r == self)
            .map(|(_, name, value)| (*name, *value))
            .unwrap_or(("Medium", 0.009))
    }

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    /// 절대 거칠기 [ft].
    pub fn value(&self) -> f64 {
        self.entry().1
    }

    /// 화면 표시용 라벨. 예: "Medium (0.009)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.name(), self.value())
    }

    /// "Medium" 또는 "Medium (0.009)" 형태의 라벨을 등급으로 바꾼다.
    /// 값은 표에서 가져오며 괄호 안 숫자는 해석하지 않는다.
    pub fn from_label(label: &str) -> Option<Self> {
        let name = label.split('(').next().unwrap_or_default().trim();
        ROUGHNESS_TABLE
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
            .map(|(r, _, _)| *r)
    }
}

impl Default for DuctRoughness {
    fn default() -> Self {
        DuctRoughness::Medium
    }
}

impl std::fmt::Display for DuctRoughness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_both_forms() {
        assert_eq!(DuctRoughness::from_label("Low"), Some(DuctRoughness::Low));
        assert_eq!(
            DuctRoughness::from_label("Medium (0.009)"),
            Some(DuctRoughness::Medium)
        );
        assert_eq!(DuctRoughness::from_label("high"), Some(DuctRoughness::High));
        assert_eq!(DuctRoughness::from_label("Smooth"), None);
    }

    #[test]
    fn values_come_from_table() {
        assert_eq!(DuctRoughness::Low.value(), 0.003);
        assert_eq!(DuctRoughness::Medium.value(), 0.009);
        assert_eq!(DuctRoughness::High.value(), 0.015);
        assert_eq!(DuctRoughness::Medium.label(), "Medium (0.009)");
    }
}
