//! 모델 응답 정규화와 휴리스틱 폴백

mod complexity;
mod severity;
mod normalize;
mod extract;
mod insights;

pub use complexity::{calculate_complexity, heuristic_score, HeuristicScore};
pub use severity::{infer_severity, severity_for_type};
pub use normalize::{normalize, parse_analysis, fallback_record, extract_json_block};
pub use extract::{extract_fixed_code, extract_code_block, basic_fix, comment_marker};
pub use insights::{parse_insights, normalize_insights, fallback_insights};
