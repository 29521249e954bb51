//! Report reason categories.
//!
//! Reasons come from a fixed bilingual allow-list (English and Arabic).
//! A free-text reason is only meaningful when the category is the
//! catch-all "Other" entry.

/// Accepted reason categories, English first, then their Arabic forms.
pub const VALID_REASONS: [&str; 10] = [
    "Product dissatisfaction",
    "Refused to open package",
    "Package damaged during delivery",
    "Customer changed mind",
    "Other",
    "عدم الرضا عن المنتج",
    "رفض فتح الطرد",
    "تلف الطرد أثناء التوصيل",
    "تغيير رأي العميل",
    "أخرى",
];

/// Whether `reason` is one of the accepted categories. Exact match,
/// no trimming or case folding.
#[must_use]
pub fn is_valid_reason(reason: &str) -> bool {
    VALID_REASONS.contains(&reason)
}

/// Whether `reason` is the catch-all category in either language.
#[must_use]
pub fn is_other_reason(reason: &str) -> bool {
    reason == "Other" || reason == "أخرى"
}
