//! Presentation formatting for estimates
//!
//! Turns raw estimate numbers into the strings the calculator surfaces
//! show: whole-dollar prices with thousands grouping, a week-range
//! timeline derived from a 40 hour work week, and signed hour deltas.

/// Hours assumed per work week when deriving a timeline
pub const WORK_HOURS_PER_WEEK: f64 = 40.0;

/// Format an amount as whole dollars with thousands grouping
///
/// Rounds to the nearest dollar, e.g. `1234.6` becomes `"$1,235"`.
/// Amounts are expected non-negative; a negative amount keeps its sign
/// after the dollar mark.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push('$');
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format total hours as a delivery timeline
///
/// Hours convert to weeks at [`WORK_HOURS_PER_WEEK`]; the text spans the
/// floor and ceiling of that quotient. Anything under one week reads
/// `"< 1 week"`, exact multiples collapse to a single figure, and
/// everything else reads as a range such as `"2-3 weeks"`.
#[must_use]
pub fn format_timeline(hours: f64) -> String {
    let weeks = hours / WORK_HOURS_PER_WEEK;
    let min_weeks = weeks.floor() as i64;
    let max_weeks = weeks.ceil() as i64;

    if min_weeks == 0 && max_weeks <= 1 {
        return "< 1 week".to_owned();
    }
    if min_weeks == max_weeks {
        let unit = if min_weeks == 1 { "week" } else { "weeks" };
        return format!("{min_weeks} {unit}");
    }
    format!("{min_weeks}-{max_weeks} weeks")
}

/// Format an hour difference as a signed annotation, e.g. `"+8h"`
///
/// Positive deltas carry an explicit plus sign; whole-number deltas
/// print without a fractional part.
#[must_use]
pub fn format_hour_delta(delta: f64) -> String {
    format!("{delta:+}h")
}
