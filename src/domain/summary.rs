use super::Cents;

/// Per-category sum as produced by the store's range aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_cents: Cents,
}

/// A category's share of a window's spending.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total_cents: Cents,
    /// 100 * category total / window grand total. Not pre-rounded;
    /// formatting is the caller's concern.
    pub percentage: f64,
}

/// Attach percentage-of-total to each category sum, sorted by total
/// descending. Returns an empty vec when the grand total is zero so a
/// window with no spending never divides by zero.
pub fn category_shares(mut totals: Vec<CategoryTotal>) -> Vec<CategoryShare> {
    let grand_total: Cents = totals.iter().map(|t| t.total_cents).sum();
    if grand_total == 0 {
        return Vec::new();
    }

    totals.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
    totals
        .into_iter()
        .map(|t| CategoryShare {
            percentage: 100.0 * t.total_cents as f64 / grand_total as f64,
            category: t.category,
            total_cents: t.total_cents,
        })
        .collect()
}

/// Human-readable name for a calendar month number (1-12).
pub fn month_name(month_number: u32) -> Option<&'static str> {
    let name = match month_number {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => return None,
    };
    Some(name)
}
