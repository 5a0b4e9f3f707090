//! Message templates with `{key}` placeholders and price formatting.

/// Replaces the first occurrence of every `{key}` in `template`.
///
/// ```
/// use delivery_calendar::utils::message::fill_template;
///
/// let text = fill_template("${fee} Hand delivery for {zip}", &[("fee", "5.00"), ("zip", "90210")]);
/// assert_eq!(text, "$5.00 Hand delivery for 90210");
/// ```
pub fn fill_template(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut message = template.to_string();
    for (key, value) in replacements {
        let placeholder = format!("{{{}}}", key);
        message = message.replacen(&placeholder, value, 1);
    }
    message
}

/// Formats a price with a fixed number of decimals, optionally with `$`.
pub fn format_price(amount: f64, decimals: usize, include_dollar: bool) -> String {
    let formatted = if decimals == 0 {
        format!("{}", amount.round())
    } else {
        let factor = 10f64.powi(decimals as i32);
        format!("{:.*}", decimals, (amount * factor).round() / factor)
    };

    if include_dollar {
        format!("${}", formatted)
    } else {
        formatted
    }
}
