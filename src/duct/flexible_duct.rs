//! 플렉시블 덕트 풍속/압력손실 계산.
//!
//! 단위계는 고정이다: 직경 [in], 풍량 [CFM], 길이 [ft], 풍속 [FPM], 압력 [in. w.g.].

use tracing::debug;

use super::fittings::BendCounts;

/// 표준 공기 밀도 [lb/ft3].
pub const AIR_DENSITY_LB_PER_FT3: f64 = 0.075;

/// 풍속 [FPM]. 단면적이 0이거나 풍속이 유한하지 않으면 정의되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Velocity {
    Defined(f64),
    UndefinedZeroArea,
}

impl Velocity {
    pub fn fpm(&self) -> Option<f64> {
        match self {
            Velocity::Defined(v) => Some(*v),
            Velocity::UndefinedZeroArea => None,
        }
    }
}

/// 플렉시블 덕트 계산 입력. 호출측에서 음수 검사를 마친 값이어야 한다.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexDuctInput {
    /// 덕트 직경 [in]
    pub duct_diameter_in: f64,
    /// 풍량 [CFM]
    pub air_flow_cfm: f64,
    /// 직관 길이 [ft]
    pub duct_length_ft: f64,
    /// 각도별 곡관 개수
    pub bend_counts: BendCounts,
    /// 절대 거칠기 [ft]
    pub roughness_value: f64,
    /// 덕트 압축률 [%] (0~100)
    pub compression_percent: f64,
    /// 안전율 배수 (1 + %/100)
    pub safety_factor: f64,
}

/// 보고용 중간값 9종.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexDuctDetails {
    pub area_ft2: f64,
    pub velocity: Velocity,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub equivalent_length_ft: f64,
    pub raw_pressure_loss_in_wg: f64,
    pub pdcf: f64,
    pub safety_factor: f64,
    pub total_pressure_loss_in_wg: f64,
}

/// 상세 항목 종류. 보고서 출력 순서를 정의한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Area,
    Velocity,
    Reynolds,
    FrictionFactor,
    EquivalentLength,
    RawPressureLoss,
    Pdcf,
    SafetyFactor,
    TotalPressureLoss,
}

impl DetailKind {
    pub fn label(&self) -> &'static str {
        match self {
            DetailKind::Area => "Area (ft²)",
            DetailKind::Velocity => "Velocity (FPM)",
            DetailKind::Reynolds => "Reynolds Number",
            DetailKind::FrictionFactor => "Friction Factor (f)",
            DetailKind::EquivalentLength => "Equivalent Length (ft)",
            DetailKind::RawPressureLoss => "Raw Pf (in.w.g.)",
            DetailKind::Pdcf => "PDCF",
            DetailKind::SafetyFactor => "Safety Factor",
            DetailKind::TotalPressureLoss => "Total ΔP (in.w.g.)",
        }
    }
}

/// 상세 값 한 줄. 풍속만 정의되지 않을 수 있다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailValue {
    Number(f64),
    Velocity(Velocity),
}

impl FlexDuctDetails {
    /// 정해진 순서대로 (항목, 값) 목록을 돌려준다.
    pub fn entries(&self) -> [(DetailKind, DetailValue); 9] {
        use DetailValue::Number;
        [
            (DetailKind::Area, Number(self.area_ft2)),
            (DetailKind::Velocity, DetailValue::Velocity(self.velocity)),
            (DetailKind::Reynolds, Number(self.reynolds)),
            (DetailKind::FrictionFactor, Number(self.friction_factor)),
            (DetailKind::EquivalentLength, Number(self.equivalent_length_ft)),
            (DetailKind::RawPressureLoss, Number(self.raw_pressure_loss_in_wg)),
            (DetailKind::Pdcf, Number(self.pdcf)),
            (DetailKind::SafetyFactor, Number(self.safety_factor)),
            (DetailKind::TotalPressureLoss, Number(self.total_pressure_loss_in_wg)),
        ]
    }
}

/// 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexDuctResult {
    pub velocity: Velocity,
    /// 총 압력손실 [in. w.g.]
    pub total_pressure_loss: f64,
    pub details: FlexDuctDetails,
}

/// 플렉시블 덕트의 풍속과 총 압력손실을 계산한다.
///
/// 어떤 입력에서도 실패하지 않는다. 단면적이 0이거나 풍속이 유한하지 않으면
/// `Velocity::UndefinedZeroArea`, 로그 인수가 비물리적이면 마찰계수 0.0으로 처리한다.
pub fn compute(input: &FlexDuctInput) -> FlexDuctResult {
    let d_in = input.duct_diameter_in;
    let dh_ft = d_in / 12.0;
    let area = std::f64::consts::PI * dh_ft * dh_ft / 4.0;

    let velocity = match input.air_flow_cfm / area {
        v if area > 0.0 && v.is_finite() => Velocity::Defined(v),
        _ => Velocity::UndefinedZeroArea,
    };

    // 풍속이 정의되지 않아도 직경과 풍량이 양수면 Re는 무한대다.
    let reynolds = match velocity {
        Velocity::Defined(v) => 8.50 * d_in * v,
        Velocity::UndefinedZeroArea if d_in > 0.0 && input.air_flow_cfm > 0.0 => f64::INFINITY,
        Velocity::UndefinedZeroArea => 0.0,
    };

    let friction_factor = friction_factor(input.roughness_value, d_in, reynolds);
    let equivalent_length_ft = input.bend_counts.equivalent_length_ft();

    let raw_pressure_loss = match velocity {
        Velocity::Defined(v) if friction_factor != 0.0 => {
            (12.0 * friction_factor * (input.duct_length_ft + equivalent_length_ft) / d_in)
                * AIR_DENSITY_LB_PER_FT3
                * (v / 1097.0).powi(2)
        }
        Velocity::UndefinedZeroArea if friction_factor > 0.0 => f64::INFINITY,
        _ => 0.0,
    };

    let pdcf = compression_derating_factor(input.compression_percent, d_in);
    let total = raw_pressure_loss * pdcf * input.safety_factor;

    debug!(
        area_ft2 = area,
        ?velocity,
        reynolds,
        friction_factor,
        equivalent_length_ft,
        raw_pressure_loss,
        pdcf,
        total,
        "flexible duct calculation"
    );

    FlexDuctResult {
        velocity,
        total_pressure_loss: total,
        details: FlexDuctDetails {
            area_ft2: area,
            velocity,
            reynolds,
            friction_factor,
            equivalent_length_ft,
            raw_pressure_loss_in_wg: raw_pressure_loss,
            pdcf,
            safety_factor: input.safety_factor,
            total_pressure_loss_in_wg: total,
        },
    }
}

/// 위치 인수 형태의 편의 함수.
pub fn calculate_flexible_duct(
    duct_diameter_in: f64,
    air_flow_cfm: f64,
    duct_length_ft: f64,
    bend_counts: &BendCounts,
    roughness_value: f64,
    compression_percent: f64,
    safety_factor: f64,
) -> FlexDuctResult {
    compute(&FlexDuctInput {
        duct_diameter_in,
        air_flow_cfm,
        duct_length_ft,
        bend_counts: bend_counts.clone(),
        roughness_value,
        compression_percent,
        safety_factor,
    })
}

/// Colebrook 근사(양해식) 마찰계수.
///
/// f = 0.25 / [log10(ε/(3.7·D) + 5.74/Re^0.9)]²
///
/// Re가 양수가 아니거나 로그 인수가 양의 유한값이 아니면 0.0을 돌려준다.
/// Re = ∞ 이면 거칠기 항만 남는다.
pub fn friction_factor(roughness: f64, diameter_in: f64, reynolds: f64) -> f64 {
    if reynolds.is_nan() || reynolds <= 0.0 {
        return 0.0;
    }
    let log_arg = roughness / (3.7 * diameter_in) + 5.74 / reynolds.powf(0.9);
    if !(log_arg.is_finite() && log_arg > 0.0) {
        return 0.0;
    }
    let log = log_arg.log10();
    if log == 0.0 {
        return 0.0;
    }
    let f = 0.25 / (log * log);
    if f.is_finite() {
        f
    } else {
        0.0
    }
}

/// 덕트 압축 보정계수(PDCF).
///
/// PDCF = 1 + 0.58·kc·exp(-0.126·D). kc는 퍼센트 값을 그대로 쓴다.
pub fn compression_derating_factor(compression_percent: f64, diameter_in: f64) -> f64 {
    1.0 + 0.58 * compression_percent * (-0.126 * diameter_in).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> FlexDuctInput {
        FlexDuctInput {
            duct_diameter_in: 6.0,
            air_flow_cfm: 1000.0,
            duct_length_ft: 10.0,
            bend_counts: BendCounts::new(),
            roughness_value: 0.009,
            compression_percent: 0.0,
            safety_factor: 1.10,
        }
    }

    #[test]
    fn reference_case_velocity() {
        let res = compute(&base_input());
        assert!((res.details.area_ft2 - 0.19635).abs() < 1e-5);
        let v = res.velocity.fpm().expect("defined velocity");
        assert!((v - 5093.0).abs() < 0.05, "velocity={v}");
        assert!(res.details.friction_factor > 0.0);
        assert!(res.total_pressure_loss > 0.0);
        assert_eq!(res.details.pdcf, 1.0);
    }

    #[test]
    fn zero_diameter_degrades() {
        let mut input = base_input();
        input.duct_diameter_in = 0.0;
        let res = compute(&input);
        assert_eq!(res.velocity, Velocity::UndefinedZeroArea);
        assert_eq!(res.details.reynolds, 0.0);
        assert_eq!(res.details.friction_factor, 0.0);
        assert_eq!(res.total_pressure_loss, 0.0);
    }

    #[test]
    fn vanishing_diameter_is_unbounded() {
        for d in [1e-170, 1e-160] {
            let mut input = base_input();
            input.duct_diameter_in = d;
            let res = compute(&input);
            assert_eq!(res.velocity, Velocity::UndefinedZeroArea, "d={d}");
            assert_eq!(res.details.reynolds, f64::INFINITY);
            assert!(res.details.friction_factor > 0.0 && res.details.friction_factor.is_finite());
            assert_eq!(res.total_pressure_loss, f64::INFINITY);
        }
    }

    #[test]
    fn zero_flow_gives_zero_friction() {
        let mut input = base_input();
        input.air_flow_cfm = 0.0;
        let res = compute(&input);
        assert_eq!(res.velocity, Velocity::Defined(0.0));
        assert_eq!(res.details.friction_factor, 0.0);
        assert_eq!(res.total_pressure_loss, 0.0);
    }

    #[test]
    fn friction_factor_guards() {
        assert_eq!(friction_factor(0.009, 6.0, 0.0), 0.0);
        assert_eq!(friction_factor(0.009, 6.0, -10.0), 0.0);
        assert_eq!(friction_factor(0.009, 6.0, f64::NAN), 0.0);
        assert_eq!(friction_factor(0.0, 6.0, f64::INFINITY), 0.0);
        let log = (0.009f64 / (3.7 * 6.0)).log10();
        let rough_only = 0.25 / (log * log);
        assert_eq!(friction_factor(0.009, 6.0, f64::INFINITY), rough_only);
        // 음의 거칠기로 로그 인수가 음수가 되는 경우
        assert_eq!(friction_factor(-100.0, 6.0, 1.0e5), 0.0);
        assert!(friction_factor(0.009, 6.0, 2.6e5) > 0.0);
    }

    #[test]
    fn pdcf_uses_percent_as_is() {
        let pdcf = compression_derating_factor(10.0, 6.0);
        let expected = 1.0 + 0.58 * 10.0 * (-0.756f64).exp();
        assert!((pdcf - expected).abs() < 1e-12);
        assert!(pdcf > 3.0);
    }

    #[test]
    fn details_follow_report_order() {
        let res = compute(&base_input());
        let kinds: Vec<DetailKind> = res.details.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds.first(), Some(&DetailKind::Area));
        assert_eq!(kinds.last(), Some(&DetailKind::TotalPressureLoss));
        assert_eq!(kinds.len(), 9);
    }
}
