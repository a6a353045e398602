//! 계산 결과 표시 문자열과 전체 결과 보고서.

use crate::duct::{BendAngle, DetailValue, FlexDuctResult, ValidatedForm, Velocity};

/// 단면적 0일 때 풍속 대신 보여줄 문구.
pub const INVALID_VELOCITY_TEXT: &str = "Invalid (zero area)";

/// 보고서 한 줄(라벨, 값).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
}

impl ReportRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// 입력/계산 두 섹션으로 나뉜 전체 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullReport {
    pub inputs: Vec<ReportRow>,
    pub calculated: Vec<ReportRow>,
}

impl FullReport {
    pub fn new(form: &ValidatedForm, result: &FlexDuctResult) -> Self {
        let input = &form.input;
        let bends = BendAngle::ALL
            .iter()
            .map(|a| format!("{}°: {}", a.label(), input.bend_counts.count(*a)))
            .collect::<Vec<_>>()
            .join(", ");
        let inputs = vec![
            ReportRow::new("Duct Diameter (in)", format!("{:?}", input.duct_diameter_in)),
            ReportRow::new("Air Flow (CFM)", format!("{:?}", input.air_flow_cfm)),
            ReportRow::new("Duct Length (ft)", format!("{:?}", input.duct_length_ft)),
            ReportRow::new("Bends", bends),
            ReportRow::new("Roughness", form.roughness.label()),
            ReportRow::new("Compression (%)", format!("{:?}", input.compression_percent)),
            ReportRow::new("Safety Factor (%)", format!("{:?}", form.safety_factor_percent)),
        ];
        let calculated = result
            .details
            .entries()
            .iter()
            .map(|(kind, value)| {
                let text = match value {
                    DetailValue::Number(v) => format_significant(*v, 5),
                    DetailValue::Velocity(Velocity::Defined(v)) => format_significant(*v, 5),
                    DetailValue::Velocity(Velocity::UndefinedZeroArea) => {
                        INVALID_VELOCITY_TEXT.to_string()
                    }
                };
                ReportRow::new(kind.label(), text)
            })
            .collect();
        Self { inputs, calculated }
    }

    /// CLI 출력용 평문 보고서.
    pub fn render_text(&self) -> String {
        let width = self
            .inputs
            .iter()
            .chain(self.calculated.iter())
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0)
            + 1;
        let mut out = String::from("--- INPUTS ---\n");
        for row in &self.inputs {
            out.push_str(&format_row(row, width));
        }
        out.push_str("\n--- CALCULATED ---\n");
        for row in &self.calculated {
            out.push_str(&format_row(row, width));
        }
        out
    }
}

fn format_row(row: &ReportRow, width: usize) -> String {
    let label = format!("{}:", row.label);
    let pad = width.saturating_sub(label.chars().count()) + 1;
    format!("{label}{}{}\n", " ".repeat(pad), row.value)
}

/// 결과 패널용 풍속 문자열. 예: "5,093.0 FPM"
pub fn format_velocity(velocity: &Velocity) -> String {
    match velocity {
        Velocity::Defined(v) => format!("{} FPM", group_thousands(&format!("{v:.1}"))),
        Velocity::UndefinedZeroArea => INVALID_VELOCITY_TEXT.to_string(),
    }
}

/// 결과 패널용 압력손실 문자열. 예: "0.1234 in. w.g."
pub fn format_pressure_loss(total: f64) -> String {
    format!("{total:.4} in. w.g.")
}

/// 유효숫자 `digits`자리 일반 표기(천 단위 구분 포함).
/// 지수가 -4 미만이거나 `digits` 이상이면 지수 표기로 바꾼다.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if value == 0.0 {
        return "0".into();
    }
    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };
    if exp < -4 || exp >= digits as i32 {
        let mantissa = strip_trailing_zeros(&mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }
    let decimals = (digits as i32 - 1 - exp).max(0) as usize;
    let fixed = format!("{value:.decimals$}");
    group_thousands(&strip_trailing_zeros(&fixed))
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// 정수부에 천 단위 쉼표를 넣는다.
pub fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
