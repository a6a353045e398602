use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::duct::{self, FlexDuctForm, FlexDuctResult, InputError, ValidatedForm};
use crate::i18n::{self, Translator};
use crate::report::FullReport;
use crate::ui_cli::{self, MenuChoice, Prompter};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Input(#[from] InputError),

    /// 표준 입력이 닫힌 경우
    #[error("input stream closed")]
    InputClosed,
}

/// 입력 폼과 마지막 계산 결과를 들고 있는 세션.
///
/// 검증에 실패하면 이전 결과를 그대로 둔다.
#[derive(Debug, Clone)]
pub struct CalculationSession {
    pub form: FlexDuctForm,
    defaults: FlexDuctForm,
    last: Option<(ValidatedForm, FlexDuctResult)>,
}

impl CalculationSession {
    pub fn new(defaults: FlexDuctForm) -> Self {
        Self {
            form: defaults.clone(),
            defaults,
            last: None,
        }
    }

    /// 현재 폼을 검증하고 계산한다.
    pub fn calculate(&mut self) -> Result<FlexDuctResult, InputError> {
        let validated = self.form.validate()?;
        let result = duct::compute(&validated.input);
        info!(
            velocity = ?result.velocity,
            total = result.total_pressure_loss,
            "calculation completed"
        );
        self.last = Some((validated, result));
        Ok(result)
    }

    pub fn last_result(&self) -> Option<&FlexDuctResult> {
        self.last.as_ref().map(|(_, r)| r)
    }

    /// 마지막 계산의 전체 보고서. 계산 전이면 None.
    pub fn full_report(&self) -> Option<FullReport> {
        self.last
            .as_ref()
            .map(|(form, result)| FullReport::new(form, result))
    }

    /// 입력을 기본값으로 되돌리고 결과를 지운다.
    pub fn reset(&mut self) {
        self.form = self.defaults.clone();
        self.last = None;
    }
}

/// CLI 대화형 메인 루프를 실행한다.
pub fn run<R: BufRead, W: Write>(
    config: &Config,
    tr: &Translator,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError> {
    let mut session = CalculationSession::new(config.defaults.clone());
    loop {
        match ui_cli::main_menu(tr, prompter)? {
            MenuChoice::Calculate => ui_cli::handle_calculation(tr, prompter, &mut session)?,
            MenuChoice::FullResults => ui_cli::handle_full_results(tr, prompter, &session)?,
            MenuChoice::Reset => {
                session.reset();
                prompter.println(&tr.t(i18n::keys::STATUS_RESET))?;
            }
            MenuChoice::Credits => ui_cli::handle_credits(tr, prompter)?,
            MenuChoice::Exit => {
                prompter.println(&tr.t(i18n::keys::APP_EXIT))?;
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duct::Velocity;

    #[test]
    fn failed_validation_keeps_previous_result() {
        let mut session = CalculationSession::new(FlexDuctForm::default());
        let first = session.calculate().unwrap();
        session.form.duct_length_ft = "-3".into();
        assert!(session.calculate().is_err());
        assert_eq!(session.last_result(), Some(&first));
    }

    #[test]
    fn reset_clears_result_and_restores_defaults() {
        let mut session = CalculationSession::new(FlexDuctForm::default());
        session.form.duct_diameter_in = "0".into();
        let res = session.calculate().unwrap();
        assert_eq!(res.velocity, Velocity::UndefinedZeroArea);
        session.reset();
        assert!(session.full_report().is_none());
        assert_eq!(session.form, FlexDuctForm::default());
    }
}
