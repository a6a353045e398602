//! 화면/CLI에서 받은 문자열 입력을 검증해 계산 입력으로 바꾼다.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::fittings::{BendAngle, BendCounts};
use super::flexible_duct::FlexDuctInput;
use super::roughness::DuctRoughness;

/// 사용자 지정 안전율을 끈 경우의 기본 안전율 [%].
pub const DEFAULT_SAFETY_FACTOR_PERCENT: f64 = 10.0;

/// 입력 필드. 오류 메시지에 필드 라벨을 넣는 데 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DuctDiameter,
    AirFlow,
    DuctLength,
    Bends(BendAngle),
    Roughness,
    Compression,
    SafetyFactor,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::DuctDiameter => "Duct Diameter (in)",
            Field::AirFlow => "Air Flow (CFM)",
            Field::DuctLength => "Duct Length (ft)",
            Field::Bends(BendAngle::Deg45) => "Bends 45°",
            Field::Bends(BendAngle::Deg90) => "Bends 90°",
            Field::Bends(BendAngle::Deg180) => "Bends 180°",
            Field::Roughness => "Duct Roughness",
            Field::Compression => "Compression (%)",
            Field::SafetyFactor => "Safety Factor (%)",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 입력 검증 오류. 항상 문제 필드를 담는다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{0} must be a number.")]
    NotANumber(Field),

    #[error("{0} must be non-negative.")]
    Negative(Field),

    #[error("{0} must be a whole number.")]
    NotAnInteger(Field),

    #[error("{field} must be between {min} and {max}.")]
    OutOfRange { field: Field, min: f64, max: f64 },

    #[error("Unknown duct roughness: {0}")]
    UnknownRoughness(String),
}

impl InputError {
    pub fn field(&self) -> Field {
        match self {
            InputError::NotANumber(f) | InputError::Negative(f) | InputError::NotAnInteger(f) => {
                *f
            }
            InputError::OutOfRange { field, .. } => *field,
            InputError::UnknownRoughness(_) => Field::Roughness,
        }
    }
}

/// 사용자가 입력한 원시 문자열 폼.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexDuctForm {
    pub duct_diameter_in: String,
    pub air_flow_cfm: String,
    pub duct_length_ft: String,
    pub bend_45: String,
    pub bend_90: String,
    pub bend_180: String,
    pub roughness: DuctRoughness,
    pub compression_percent: f64,
    pub safety_factor_enabled: bool,
    pub safety_factor_percent: String,
}

impl Default for FlexDuctForm {
    fn default() -> Self {
        Self {
            duct_diameter_in: "6.0".into(),
            air_flow_cfm: "1000".into(),
            duct_length_ft: "10".into(),
            bend_45: "0".into(),
            bend_90: "0".into(),
            bend_180: "0".into(),
            roughness: DuctRoughness::Medium,
            compression_percent: 0.0,
            safety_factor_enabled: false,
            safety_factor_percent: "10".into(),
        }
    }
}

/// 검증을 마친 입력. 보고서의 입력 섹션에도 쓴다.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub input: FlexDuctInput,
    pub roughness: DuctRoughness,
    pub safety_factor_percent: f64,
}

impl FlexDuctForm {
    /// 모든 필드를 검증하고 계산 입력을 만든다. 첫 번째 오류에서 멈춘다.
    pub fn validate(&self) -> Result<ValidatedForm, InputError> {
        let result = self.validate_inner();
        if let Err(e) = &result {
            warn!(field = e.field().label(), "input rejected: {e}");
        }
        result
    }

    fn validate_inner(&self) -> Result<ValidatedForm, InputError> {
        let duct_diameter_in = parse_non_negative(&self.duct_diameter_in, Field::DuctDiameter)?;
        let air_flow_cfm = parse_non_negative(&self.air_flow_cfm, Field::AirFlow)?;
        let duct_length_ft = parse_non_negative(&self.duct_length_ft, Field::DuctLength)?;
        let bend_counts = BendCounts::from_counts(
            parse_count(&self.bend_45, Field::Bends(BendAngle::Deg45))?,
            parse_count(&self.bend_90, Field::Bends(BendAngle::Deg90))?,
            parse_count(&self.bend_180, Field::Bends(BendAngle::Deg180))?,
        );
        let compression_percent = check_compression(self.compression_percent)?;
        let safety_factor_percent = if self.safety_factor_enabled {
            parse_non_negative(&self.safety_factor_percent, Field::SafetyFactor)?
        } else {
            DEFAULT_SAFETY_FACTOR_PERCENT
        };

        Ok(ValidatedForm {
            input: FlexDuctInput {
                duct_diameter_in,
                air_flow_cfm,
                duct_length_ft,
                bend_counts,
                roughness_value: self.roughness.value(),
                compression_percent,
                safety_factor: safety_factor_from_percent(safety_factor_percent),
            },
            roughness: self.roughness,
            safety_factor_percent,
        })
    }
}

/// 안전율 퍼센트를 배수로 바꾼다. 10% → 1.10
pub fn safety_factor_from_percent(percent: f64) -> f64 {
    1.0 + percent / 100.0
}

/// 숫자로 파싱하고 음수를 거부한다.
pub fn parse_non_negative(raw: &str, field: Field) -> Result<f64, InputError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| InputError::NotANumber(field))?;
    if !value.is_finite() {
        return Err(InputError::NotANumber(field));
    }
    if value < 0.0 {
        return Err(InputError::Negative(field));
    }
    Ok(value)
}

/// 곡관 개수(0 이상의 정수)를 파싱한다.
pub fn parse_count(raw: &str, field: Field) -> Result<u32, InputError> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Ok(n);
    }
    match s.parse::<i64>() {
        Ok(n) if n < 0 => Err(InputError::Negative(field)),
        Ok(_) => Err(InputError::OutOfRange {
            field,
            min: 0.0,
            max: f64::from(u32::MAX),
        }),
        Err(_) if s.parse::<f64>().is_ok() => Err(InputError::NotAnInteger(field)),
        Err(_) => Err(InputError::NotANumber(field)),
    }
}

/// 압축률은 0~100% 범위여야 한다.
pub fn check_compression(percent: f64) -> Result<f64, InputError> {
    if !percent.is_finite() {
        return Err(InputError::NotANumber(Field::Compression));
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(InputError::OutOfRange {
            field: Field::Compression,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(percent)
}

/// 거칠기 라벨을 해석한다.
pub fn parse_roughness(raw: &str) -> Result<DuctRoughness, InputError> {
    DuctRoughness::from_label(raw).ok_or_else(|| InputError::UnknownRoughness(raw.trim().into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_validates() {
        let v = FlexDuctForm::default().validate().unwrap();
        assert_eq!(v.input.duct_diameter_in, 6.0);
        assert_eq!(v.input.air_flow_cfm, 1000.0);
        assert_eq!(v.input.roughness_value, 0.009);
        assert!((v.input.safety_factor - 1.10).abs() < 1e-12);
        assert_eq!(v.safety_factor_percent, DEFAULT_SAFETY_FACTOR_PERCENT);
    }

    #[test]
    fn custom_safety_factor_used_only_when_enabled() {
        let mut form = FlexDuctForm {
            safety_factor_percent: "25".into(),
            ..Default::default()
        };
        assert!((form.validate().unwrap().input.safety_factor - 1.10).abs() < 1e-12);
        form.safety_factor_enabled = true;
        assert!((form.validate().unwrap().input.safety_factor - 1.25).abs() < 1e-12);
    }

    #[test]
    fn errors_name_the_field() {
        let form = FlexDuctForm {
            duct_diameter_in: "-1".into(),
            ..Default::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, InputError::Negative(Field::DuctDiameter));
        assert_eq!(err.to_string(), "Duct Diameter (in) must be non-negative.");

        let form = FlexDuctForm {
            air_flow_cfm: "abc".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Air Flow (CFM) must be a number."
        );

        for raw in ["inf", "NaN", "-inf"] {
            let form = FlexDuctForm {
                duct_length_ft: raw.into(),
                ..Default::default()
            };
            assert_eq!(
                form.validate().unwrap_err(),
                InputError::NotANumber(Field::DuctLength),
                "{raw}"
            );
        }
    }

    #[test]
    fn negative_safety_factor_rejected() {
        let form = FlexDuctForm {
            safety_factor_enabled: true,
            safety_factor_percent: "-5".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err().field(),
            Field::SafetyFactor
        );
    }

    #[test]
    fn bend_counts_must_be_whole() {
        assert_eq!(parse_count(" 3 ", Field::Bends(BendAngle::Deg90)), Ok(3));
        assert_eq!(
            parse_count("1.5", Field::Bends(BendAngle::Deg90)),
            Err(InputError::NotAnInteger(Field::Bends(BendAngle::Deg90)))
        );
        assert_eq!(
            parse_count("-2", Field::Bends(BendAngle::Deg45)),
            Err(InputError::Negative(Field::Bends(BendAngle::Deg45)))
        );
    }

    #[test]
    fn compression_range_checked() {
        assert!(check_compression(0.0).is_ok());
        assert!(check_compression(100.0).is_ok());
        assert!(matches!(
            check_compression(120.0),
            Err(InputError::OutOfRange { field: Field::Compression, .. })
        ));
    }

    #[test]
    fn roughness_lookup() {
        assert_eq!(parse_roughness("High (0.015)"), Ok(DuctRoughness::High));
        assert!(parse_roughness("Ultra").is_err());
    }
}
