//! Paging and text shortening for list replies.

/// One page of a longer list.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number, always within `1..=total_pages`.
    pub number: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn footer(&self) -> String {
        format!("Page {}/{}", self.number, self.total_pages)
    }
}

/// Slice `items` into the requested page.
///
/// Out-of-range or unparsable page arguments are clamped rather than
/// rejected. An empty list has a single empty page.
pub fn paginate<'a, T>(items: &'a [T], per_page: usize, requested: Option<&str>) -> Page<'a, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);

    let number = requested
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|n| n.clamp(1, total_pages as i64) as usize)
        .unwrap_or(1);

    let start = (number - 1) * per_page;
    let end = (start + per_page).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages,
    }
}

/// Shorten `text` to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
