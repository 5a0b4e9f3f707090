use crate::models::settings::FeeMessages;
use crate::utils::message::{fill_template, format_price};

use super::FeeResponse;

/// Chooses and fills the fee panel text for a successful lookup.
pub fn message_for_response(messages: &FeeMessages, response: &FeeResponse, zip: &str) -> String {
    let fee = response.fee.unwrap_or(0.0);
    let template = if !response.delivery {
        let preferred = if response.zone_disabled {
            &messages.zone_disabled
        } else if response.is_box {
            &messages.box_not_found
        } else {
            &messages.not_found
        };
        or_fallback(preferred, &messages.not_found)
    } else if fee != 0.0 {
        let preferred = if response.is_box { &messages.box_found } else { &messages.found };
        or_fallback(preferred, &messages.found)
    } else if !messages.found_and_free.is_empty() {
        let preferred = if response.is_box {
            &messages.box_found_and_free
        } else {
            &messages.found_and_free
        };
        or_fallback(preferred, &messages.found_and_free)
    } else {
        let preferred = if response.is_box { &messages.box_not_found } else { &messages.not_found };
        or_fallback(preferred, &messages.not_found)
    };

    fill_template(template, &[("zip", zip), ("fee", &format_price(fee, 2, false))])
}

fn or_fallback<'a>(preferred: &'a str, fallback: &'a str) -> &'a str {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn response(delivery: bool, fee: Option<f64>, is_box: bool, zone_disabled: bool) -> FeeResponse {
        FeeResponse {
            success: true,
            delivery,
            fee,
            is_box,
            zone_disabled,
            ..FeeResponse::default()
        }
    }

    #[test_case(response(true, Some(12.5), false, false), "$12.50 Hand delivery for 90210" ; "hand delivery")]
    #[test_case(response(true, Some(7.0), true, false), "Shipping starting from $7.00 for 90210" ; "box shipping")]
    #[test_case(response(true, None, false, false), "FREE Hand delivery for 90210" ; "free delivery")]
    #[test_case(response(true, Some(0.0), true, false), "Shipping starting from $0.00 for 90210" ; "free shipping")]
    #[test_case(response(false, None, false, false), "Oh no! The florist does not deliver to 90210" ; "no delivery")]
    #[test_case(response(false, None, true, false), "Oh no! The florist does not ship to 90210" ; "no shipping")]
    #[test_case(
        response(false, None, false, true),
        "Oh no! The florist does not deliver to 90210 on your selected date. Try another day." ;
        "zone disabled"
    )]
    fn test_message_selection(response: FeeResponse, expected: &str) {
        assert_eq!(message_for_response(&FeeMessages::default(), &response, "90210"), expected);
    }

    #[test]
    fn test_free_without_free_template_reads_as_not_found() {
        let messages = FeeMessages {
            found_and_free: String::new(),
            ..FeeMessages::default()
        };
        assert_eq!(
            message_for_response(&messages, &response(true, None, false, false), "90210"),
            "Oh no! The florist does not deliver to 90210"
        );
    }

    #[test]
    fn test_empty_template_falls_back() {
        let messages = FeeMessages {
            box_found: String::new(),
            ..FeeMessages::default()
        };
        assert_eq!(
            message_for_response(&messages, &response(true, Some(3.0), true, false), "10001"),
            "$3.00 Hand delivery for 10001"
        );
    }
}
