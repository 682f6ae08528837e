//! Pagination defaults and search-pattern helpers.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows returned by list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows a list endpoint will return.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Default page size for page-numbered listings (exams).
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for page-numbered listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Resolved page-numbered window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: i64,
    pub page_size: i64,
    pub offset: i64,
}

/// Resolve `?page=&page_size=` into a clamped window.
///
/// Huge page numbers saturate the offset rather than overflow.
pub fn page_window(page: Option<i64>, page_size: Option<i64>) -> PageWindow {
    let page = page.unwrap_or(1).max(1);
    let page_size = clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    PageWindow {
        page,
        page_size,
        offset: (page - 1).saturating_mul(page_size),
    }
}

/// Number of pages needed to show `total` rows.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

// ---------------------------------------------------------------------------
// Search patterns
// ---------------------------------------------------------------------------

/// Turn free text into an `ILIKE` substring pattern.
///
/// `%`, `_` and `\` are escaped so they match literally. Returns `None` for
/// empty input so the caller can skip the filter.
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
