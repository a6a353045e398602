use std::io::{BufRead, Write};

use crate::app::{AppError, CalculationSession};
use crate::duct::DuctRoughness;
use crate::i18n::{keys, Translator};
use crate::report::{format_pressure_loss, format_velocity};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    FullResults,
    Reset,
    Credits,
    Exit,
}

/// 프롬프트 출력과 한 줄 입력을 묶는다. 테스트에서는 메모리 버퍼를 넣는다.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn println(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    /// 프롬프트를 찍고 한 줄을 읽는다. 입력이 끝났으면 `AppError::InputClosed`.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(buf.trim().to_string())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다. 입력이 끝나면 종료로 본다.
pub fn main_menu<R: BufRead, W: Write>(
    tr: &Translator,
    p: &mut Prompter<R, W>,
) -> Result<MenuChoice, AppError> {
    p.println(&tr.t(keys::MENU_TITLE))?;
    for key in [
        keys::MENU_CALCULATE,
        keys::MENU_FULL_RESULTS,
        keys::MENU_RESET,
        keys::MENU_CREDITS,
        keys::MENU_EXIT,
    ] {
        p.println(&tr.t(key))?;
    }
    loop {
        let sel = match p.read_line(&tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(s) => s,
            Err(AppError::InputClosed) => return Ok(MenuChoice::Exit),
            Err(e) => return Err(e),
        };
        match sel.as_str() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::FullResults),
            "3" => return Ok(MenuChoice::Reset),
            "4" => return Ok(MenuChoice::Credits),
            "0" => return Ok(MenuChoice::Exit),
            _ => p.println(&tr.t(keys::INVALID_SELECTION_RETRY))?,
        }
    }
}

/// 플렉시블 덕트 입력을 받고 계산한다. 빈 입력은 현재 값을 유지한다.
pub fn handle_calculation<R: BufRead, W: Write>(
    tr: &Translator,
    p: &mut Prompter<R, W>,
    session: &mut CalculationSession,
) -> Result<(), AppError> {
    p.println(&tr.t(keys::FLEX_HEADING))?;
    p.println(&tr.t(keys::FLEX_KEEP_HINT))?;

    let form = &mut session.form;
    for (key, slot) in [
        (keys::DUCT_DIAMETER, &mut form.duct_diameter_in),
        (keys::AIR_FLOW, &mut form.air_flow_cfm),
        (keys::DUCT_LENGTH, &mut form.duct_length_ft),
        (keys::BENDS_45, &mut form.bend_45),
        (keys::BENDS_90, &mut form.bend_90),
        (keys::BENDS_180, &mut form.bend_180),
    ] {
        let entered = p.read_line(&format!("{} [{}]: ", tr.t(key), slot))?;
        if !entered.is_empty() {
            *slot = entered;
        }
    }

    p.println(&tr.t(keys::ROUGHNESS_OPTIONS))?;
    let sel = p.read_line(&format!("{} [{}]: ", tr.t(keys::ROUGHNESS), form.roughness.label()))?;
    form.roughness = match sel.as_str() {
        "" => form.roughness,
        "1" => DuctRoughness::Low,
        "2" => DuctRoughness::Medium,
        "3" => DuctRoughness::High,
        other => match crate::duct::form::parse_roughness(other) {
            Ok(r) => r,
            Err(err) => return report_input_error(tr, p, &err),
        },
    };

    let comp = p.read_line(&format!(
        "{} [{}]: ",
        tr.t(keys::COMPRESSION),
        form.compression_percent
    ))?;
    if !comp.is_empty() {
        match comp.parse::<f64>() {
            Ok(v) => form.compression_percent = v,
            Err(_) => {
                let err = crate::duct::InputError::NotANumber(crate::duct::form::Field::Compression);
                return report_input_error(tr, p, &err);
            }
        }
    }

    let sf = p.read_line(&format!(
        "{} [{}]: ",
        tr.t(keys::SAFETY_FACTOR),
        if form.safety_factor_enabled {
            form.safety_factor_percent.as_str()
        } else {
            "10"
        }
    ))?;
    if !sf.is_empty() {
        form.safety_factor_enabled = true;
        form.safety_factor_percent = sf;
    }

    match session.calculate() {
        Ok(result) => {
            p.println(&format!(
                "{} {}",
                tr.t(keys::RESULT_VELOCITY),
                format_velocity(&result.velocity)
            ))?;
            p.println(&format!(
                "{} {}",
                tr.t(keys::RESULT_PRESSURE_LOSS),
                format_pressure_loss(result.total_pressure_loss)
            ))?;
            p.println(&tr.t(keys::STATUS_DONE))?;
            Ok(())
        }
        Err(err) => report_input_error(tr, p, &err),
    }
}

fn report_input_error<R: BufRead, W: Write>(
    tr: &Translator,
    p: &mut Prompter<R, W>,
    err: &crate::duct::InputError,
) -> Result<(), AppError> {
    p.println(&format!("{}: {err}", tr.t(keys::INVALID_INPUT)))?;
    p.println(&tr.t(keys::STATUS_ERROR))
}

/// 마지막 계산의 전체 결과를 출력한다.
pub fn handle_full_results<R: BufRead, W: Write>(
    tr: &Translator,
    p: &mut Prompter<R, W>,
    session: &CalculationSession,
) -> Result<(), AppError> {
    match session.full_report() {
        Some(report) => {
            p.println(&format!("\n{}", tr.t(keys::FULL_RESULTS_TITLE)))?;
            p.println(report.render_text().trim_end())
        }
        None => p.println(&tr.t(keys::NO_RESULTS)),
    }
}

pub fn handle_credits<R: BufRead, W: Write>(
    tr: &Translator,
    p: &mut Prompter<R, W>,
) -> Result<(), AppError> {
    p.println(&format!("\n-- {} --", tr.t(keys::CREDITS_TITLE)))?;
    p.println(&tr.t(keys::CREDITS_BODY))
}
