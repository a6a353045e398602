use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;
use tracing::debug;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";
    pub const CLOSE: &str = "general.close";

    pub const MENU_TITLE: &str = "main_menu.title";
    pub const MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MENU_FULL_RESULTS: &str = "main_menu.full_results";
    pub const MENU_RESET: &str = "main_menu.reset";
    pub const MENU_CREDITS: &str = "main_menu.credits";
    pub const MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const INVALID_INPUT: &str = "error.invalid_input";

    pub const FLEX_HEADING: &str = "flex.heading";
    pub const FLEX_KEEP_HINT: &str = "flex.keep_hint";
    pub const INPUT_PARAMETERS: &str = "flex.input_parameters";
    pub const DUCT_DIAMETER: &str = "flex.duct_diameter";
    pub const AIR_FLOW: &str = "flex.air_flow";
    pub const DUCT_LENGTH: &str = "flex.duct_length";
    pub const BENDS: &str = "flex.bends";
    pub const BENDS_45: &str = "flex.bends_45";
    pub const BENDS_90: &str = "flex.bends_90";
    pub const BENDS_180: &str = "flex.bends_180";
    pub const ROUGHNESS: &str = "flex.roughness";
    pub const ROUGHNESS_OPTIONS: &str = "flex.roughness_options";
    pub const COMPRESSION: &str = "flex.compression";
    pub const SAFETY_FACTOR: &str = "flex.safety_factor";
    pub const SAFETY_FACTOR_ENABLE: &str = "flex.safety_factor_enable";
    pub const CALCULATE: &str = "flex.calculate";
    pub const RESET_INPUTS: &str = "flex.reset_inputs";
    pub const BACK_HOME: &str = "flex.back_home";

    pub const RESULTS: &str = "result.heading";
    pub const RESULT_VELOCITY: &str = "result.air_velocity";
    pub const RESULT_PRESSURE_LOSS: &str = "result.pressure_loss";
    pub const SEE_FULL_RESULTS: &str = "result.see_full";
    pub const FULL_RESULTS_TITLE: &str = "result.full_title";
    pub const SECTION_INPUTS: &str = "result.section_inputs";
    pub const SECTION_CALCULATED: &str = "result.section_calculated";
    pub const NO_RESULTS: &str = "result.none";

    pub const HOME_TITLE: &str = "home.title";
    pub const HOME_SUBTITLE: &str = "home.subtitle";
    pub const HOME_FLEX_CARD: &str = "home.flex_card";
    pub const HOME_OPEN_CALCULATOR: &str = "home.open_calculator";
    pub const HOME_RECT_CARD: &str = "home.rect_card";
    pub const HOME_COMING_SOON: &str = "home.coming_soon";
    pub const HOME_RECT_PLACEHOLDER: &str = "home.rect_placeholder";
    pub const HOME_EXIT: &str = "home.exit";

    pub const CREDITS_TITLE: &str = "credits.title";
    pub const CREDITS_BODY: &str = "credits.body";

    pub const MENU_INFO: &str = "gui.menu.info";
    pub const MENU_ABOUT: &str = "gui.menu.about";
    pub const ABOUT_BODY: &str = "gui.about.body";
    pub const MENU_SETTINGS: &str = "gui.menu.settings";
    pub const MENU_PREFERENCES: &str = "gui.menu.preferences";
    pub const PREFERENCES_LANGUAGE: &str = "gui.preferences.language";
    pub const PREFERENCES_ALPHA: &str = "gui.preferences.alpha";
    pub const MENU_HELP: &str = "gui.menu.help";
    pub const MENU_USER_GUIDE: &str = "gui.menu.user_guide";
    pub const USER_GUIDE_BODY: &str = "gui.help.user_guide_body";
    pub const MENU_FAQ: &str = "gui.menu.faq";
    pub const FAQ_BODY: &str = "gui.help.faq_body";

    pub const STATUS_READY: &str = "status.ready";
    pub const STATUS_VIEWING: &str = "status.viewing";
    pub const STATUS_DONE: &str = "status.done";
    pub const STATUS_ERROR: &str = "status.error";
    pub const STATUS_RESET: &str = "status.reset";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        if overrides.is_some() {
            debug!(lang = lang_code, "language pack loaded");
        }
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 언어팩에서만 키를 조회한다. 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 현재 언어 내장 → 영어 내장 순으로 찾는다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let builtin = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        builtin.unwrap_or("[missing translation]").to_string()
    }

    /// `{name}` 자리표시자를 채운 번역을 돌려준다.
    pub fn t_with(&self, key: &str, vars: &[(&str, &str)]) -> String {
        let mut out = self.t(key);
        for (k, v) in vars {
            out = out.replace(&format!("{{{k}}}"), v);
        }
        out
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "ko" | "ko-kr" | "en" | "en-us" => Some(c.clone()),
        "en-uk" | "en-gb" => Some("en-us".into()),
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., en-us)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., en)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Table = toml::from_str(src).ok()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in &value {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        APP_TITLE => "HVAC 덕트 계산기 v1.4",
        CLOSE => "닫기",
        MENU_TITLE => "\n=== HVAC 덕트 계산기 ===",
        MENU_CALCULATE => "1) 플렉시블 덕트 계산",
        MENU_FULL_RESULTS => "2) 전체 결과 보기",
        MENU_RESET => "3) 입력 초기화",
        MENU_CREDITS => "4) 제작 정보",
        MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        INVALID_INPUT => "입력 오류",
        FLEX_HEADING => "\n-- 플렉시블 덕트 계산기 --",
        FLEX_KEEP_HINT => "(엔터: 현재 값 유지)",
        INPUT_PARAMETERS => "입력 값",
        DUCT_DIAMETER => "덕트 직경 (in)",
        AIR_FLOW => "풍량 (CFM)",
        DUCT_LENGTH => "덕트 길이 (ft)",
        BENDS => "곡관:",
        BENDS_45 => "45° 곡관 개수",
        BENDS_90 => "90° 곡관 개수",
        BENDS_180 => "180° 곡관 개수",
        ROUGHNESS => "덕트 거칠기",
        ROUGHNESS_OPTIONS => "1=Low (0.003)  2=Medium (0.009)  3=High (0.015)",
        COMPRESSION => "압축률 (%)",
        SAFETY_FACTOR => "안전율 (%)",
        SAFETY_FACTOR_ENABLE => "사용자 안전율 사용",
        CALCULATE => "계산",
        RESET_INPUTS => "입력 초기화",
        BACK_HOME => "홈으로",
        RESULTS => "결과",
        RESULT_VELOCITY => "풍속:",
        RESULT_PRESSURE_LOSS => "총 압력손실:",
        SEE_FULL_RESULTS => "전체 결과 보기",
        FULL_RESULTS_TITLE => "전체 계산 결과",
        SECTION_INPUTS => "--- 입력 ---",
        SECTION_CALCULATED => "--- 계산 ---",
        NO_RESULTS => "먼저 계산을 실행하세요.",
        HOME_TITLE => "HVAC 덕트 계산기",
        HOME_SUBTITLE => "사용할 계산기를 선택하세요",
        HOME_FLEX_CARD => "플렉시블 덕트 계산기",
        HOME_OPEN_CALCULATOR => "계산기 열기",
        HOME_RECT_CARD => "사각 덕트 계산기",
        HOME_COMING_SOON => "준비 중",
        HOME_RECT_PLACEHOLDER => "사각 덕트 계산기는 추후 추가될 예정입니다.",
        HOME_EXIT => "종료",
        CREDITS_TITLE => "제작 정보",
        CREDITS_BODY => "Developed by Eng. Bashar\nEmail: basharwmn@gmail.com\n\nAll rights reserved ©",
        MENU_INFO => "정보",
        MENU_ABOUT => "프로그램 정보",
        ABOUT_BODY => "HVAC 덕트 계산기\n버전 1.4\n\n덕트 시스템의 압력손실을 계산하는 도구입니다.",
        MENU_SETTINGS => "설정",
        MENU_PREFERENCES => "환경 설정",
        PREFERENCES_LANGUAGE => "언어",
        PREFERENCES_ALPHA => "창 투명도",
        MENU_HELP => "도움말",
        MENU_USER_GUIDE => "사용 설명서",
        USER_GUIDE_BODY => "직경/풍량/길이와 곡관 개수를 입력하고 거칠기·압축률을 고른 뒤 계산을 누르세요.\n안전율은 기본 10%이며 '사용자 안전율 사용'을 켜면 직접 입력할 수 있습니다.",
        MENU_FAQ => "자주 묻는 질문",
        FAQ_BODY => "풍속이 'Invalid (zero area)'로 표시되면 직경이 0입니다.\n압축률은 퍼센트 값을 그대로 보정계수에 사용합니다.",
        STATUS_READY => "준비",
        STATUS_VIEWING => "{page} 화면",
        STATUS_DONE => "계산이 완료되었습니다",
        STATUS_ERROR => "계산 오류",
        STATUS_RESET => "입력이 기본값으로 초기화되었습니다",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        APP_TITLE => "HVAC Duct Calculator v1.4",
        CLOSE => "Close",
        MENU_TITLE => "\n=== HVAC Duct Calculator ===",
        MENU_CALCULATE => "1) Flexible duct calculation",
        MENU_FULL_RESULTS => "2) See full results",
        MENU_RESET => "3) Reset inputs",
        MENU_CREDITS => "4) Credits",
        MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        INVALID_INPUT => "Invalid input",
        FLEX_HEADING => "\n-- Flexible Duct Calculator --",
        FLEX_KEEP_HINT => "(press enter to keep the current value)",
        INPUT_PARAMETERS => "Input Parameters",
        DUCT_DIAMETER => "Duct Diameter (in)",
        AIR_FLOW => "Air Flow (CFM)",
        DUCT_LENGTH => "Duct Length (ft)",
        BENDS => "Bends:",
        BENDS_45 => "45° bends",
        BENDS_90 => "90° bends",
        BENDS_180 => "180° bends",
        ROUGHNESS => "Duct Roughness",
        ROUGHNESS_OPTIONS => "1=Low (0.003)  2=Medium (0.009)  3=High (0.015)",
        COMPRESSION => "Compression (%)",
        SAFETY_FACTOR => "Safety Factor (%)",
        SAFETY_FACTOR_ENABLE => "Enable custom SF",
        CALCULATE => "Calculate",
        RESET_INPUTS => "Reset Inputs",
        BACK_HOME => "Back to Home",
        RESULTS => "Results",
        RESULT_VELOCITY => "Air Velocity:",
        RESULT_PRESSURE_LOSS => "Total Pressure Loss:",
        SEE_FULL_RESULTS => "See Full Results",
        FULL_RESULTS_TITLE => "Full Calculation Results",
        SECTION_INPUTS => "--- INPUTS ---",
        SECTION_CALCULATED => "--- CALCULATED ---",
        NO_RESULTS => "Please run a calculation first.",
        HOME_TITLE => "HVAC Duct Calculator",
        HOME_SUBTITLE => "Select a calculator to begin",
        HOME_FLEX_CARD => "Flexible Duct Calculator",
        HOME_OPEN_CALCULATOR => "Open Calculator",
        HOME_RECT_CARD => "Rectangular Duct Calculator",
        HOME_COMING_SOON => "Coming Soon",
        HOME_RECT_PLACEHOLDER => "Rectangular Duct Calculator will be added later.",
        HOME_EXIT => "Exit",
        CREDITS_TITLE => "Credits",
        CREDITS_BODY => "Developed by Eng. Bashar\nEmail: basharwmn@gmail.com\n\nAll rights reserved ©",
        MENU_INFO => "Info",
        MENU_ABOUT => "About",
        ABOUT_BODY => "HVAC Duct Calculator\nVersion 1.4\n\nA tool for calculating pressure loss in duct systems.",
        MENU_SETTINGS => "Settings",
        MENU_PREFERENCES => "Preferences",
        PREFERENCES_LANGUAGE => "Language",
        PREFERENCES_ALPHA => "Window transparency",
        MENU_HELP => "Help",
        MENU_USER_GUIDE => "User Guide",
        USER_GUIDE_BODY => "Enter diameter, air flow, length and bend counts, choose roughness and compression, then press Calculate.\nThe safety factor defaults to 10%; tick 'Enable custom SF' to enter your own.",
        MENU_FAQ => "FAQ",
        FAQ_BODY => "Velocity shows 'Invalid (zero area)' when the diameter is zero.\nCompression is applied to the derating factor as the raw percent value.",
        STATUS_READY => "Ready",
        STATUS_VIEWING => "Viewing {page}",
        STATUS_DONE => "Calculation completed successfully",
        STATUS_ERROR => "Error in calculation",
        STATUS_RESET => "Inputs reset to default values",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_falls_back_to_english() {
        let tr = Translator::new("ko-kr");
        assert_eq!(tr.language(), Language::Ko);
        assert_eq!(tr.t(keys::HOME_EXIT), "종료");
        assert_eq!(tr.t("nope.key"), "[missing translation]");
    }

    #[test]
    fn placeholders_are_filled() {
        let tr = Translator::new("en");
        assert_eq!(
            tr.t_with(keys::STATUS_VIEWING, &[("page", "Home")]),
            "Viewing Home"
        );
    }

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language("ko", Some("en-us")), "ko");
        assert_eq!(resolve_language("auto", Some("en-gb")), "en-us");
    }

    #[test]
    fn nested_pack_tables_flatten() {
        let map = parse_toml_to_map("[status]\nready = \"Bereit\"\n").unwrap();
        assert_eq!(map.get("status.ready").map(String::as_str), Some("Bereit"));
    }
}
