//! 덕트 압력손실 계산 모듈 모음.
//! 현재는 플렉시블(원형) 덕트만 지원한다. 사각 덕트는 GUI에서 자리만 잡아 둔다.

pub mod fittings;
pub mod flexible_duct;
pub mod form;
pub mod roughness;

pub use fittings::{BendAngle, BendCounts};
pub use flexible_duct::*;
pub use form::{FlexDuctForm, InputError, ValidatedForm};
pub use roughness::DuctRoughness;
