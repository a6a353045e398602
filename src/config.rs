use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::duct::FlexDuctForm;

/// 기본 설정 파일 경로.
pub const CONFIG_PATH: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/en-us/ko)
    pub language: String,
    /// 언어팩(TOML) 디렉터리. 없으면 locales/ 와 내장 문자열을 쓴다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_pack_dir: Option<String>,
    /// 창 투명도 (0.3~1.0)
    pub window_alpha: f32,
    /// 입력 초기화 시 채울 기본값
    pub defaults: FlexDuctForm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            window_alpha: 1.0,
            defaults: FlexDuctForm::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드한다. 파일이 없으면 기본 설정을 돌려주며 파일은 만들지 않는다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_PATH))
}

/// 지정 경로의 설정을 로드한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let mut cfg: Config = toml::from_str(&content)?;
        cfg.sanitize();
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    } else {
        info!(path = %path.display(), "config not found, using defaults");
        Ok(Config::default())
    }
}

impl Config {
    /// 설정을 지정 경로에 저장한다. `init-config` 명령에서만 호출한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn sanitize(&mut self) {
        if !(0.3..=1.0).contains(&self.window_alpha) {
            warn!(alpha = self.window_alpha, "window_alpha out of range, clamping");
            self.window_alpha = self.window_alpha.clamp(0.3, 1.0);
        }
        let c = self.defaults.compression_percent;
        if !(0.0..=100.0).contains(&c) {
            warn!(compression = c, "default compression out of range, resetting to 0");
            self.defaults.compression_percent = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duct::DuctRoughness;

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
language = "ko"

[defaults]
duct_diameter_in = "8"
roughness = "High"
"#,
        )
        .unwrap();
        assert_eq!(cfg.language, "ko");
        assert_eq!(cfg.window_alpha, 1.0);
        assert_eq!(cfg.defaults.duct_diameter_in, "8");
        assert_eq!(cfg.defaults.air_flow_cfm, "1000");
        assert_eq!(cfg.defaults.roughness, DuctRoughness::High);
    }

    #[test]
    fn sanitize_clamps_out_of_range() {
        let mut cfg = Config {
            window_alpha: 5.0,
            ..Default::default()
        };
        cfg.defaults.compression_percent = 250.0;
        cfg.sanitize();
        assert_eq!(cfg.window_alpha, 1.0);
        assert_eq!(cfg.defaults.compression_percent, 0.0);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = load_from(Path::new("does/not/exist/config.toml")).unwrap();
        assert_eq!(cfg.language, "auto");
        assert_eq!(cfg.defaults, FlexDuctForm::default());
    }

    #[test]
    fn default_config_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.defaults, FlexDuctForm::default());
    }
}
