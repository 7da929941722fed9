use indicatif::ProgressStyle;

const SPINNER_TEMPLATE: &str = "{spinner} {prefix:.bold} {wide_msg}";
const COUNTER_TEMPLATE: &str = "{spinner} {prefix:.bold} {msg:30} {wide_bar} {pos:>4}/{len:4}";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn spinner() -> ProgressStyle {
        ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn counter() -> ProgressStyle {
        ProgressStyle::with_template(COUNTER_TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}
