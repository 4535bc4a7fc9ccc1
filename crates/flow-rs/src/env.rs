use std::env;
use std::sync::OnceLock;

static FLOWRS_EAGER: OnceLock<bool> = OnceLock::new();

fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

/// Whether tensors default to eager determination when `is_lazy` is not pinned.
pub(crate) fn eager_enabled() -> bool {
    *FLOWRS_EAGER.get_or_init(|| match env::var("FLOWRS_EAGER") {
        Ok(value) if !value.trim().is_empty() => parse_bool(&value),
        _ => false,
    })
}
