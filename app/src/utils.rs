//! Utility functions
//!
//! Helper functions used across the frontend.

use std::str::FromStr;

use stratfin_types::SearchParams;

/// Parse an optional form field. Blank or unparsable input counts as not supplied.
pub fn parse_optional<T: FromStr>(input: &str) -> Option<T> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Like [`parse_optional`], rejecting NaN and infinities
pub fn parse_optional_amount(input: &str) -> Option<f64> {
    parse_optional::<f64>(input).filter(|v| v.is_finite())
}

/// Raw text of the override inputs on the search form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideInputs {
    pub months: String,
    pub sales_people: String,
    pub marketing_spend: String,
    pub large_revenue: String,
}

impl OverrideInputs {
    /// Overrides to send; blank fields are left out
    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            months: parse_optional(&self.months),
            initial_sales_people: parse_optional(&self.sales_people),
            marketing_spend_monthly: parse_optional_amount(&self.marketing_spend),
            large_customer_revenue_monthly: parse_optional_amount(&self.large_revenue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_omitted() {
        assert_eq!(OverrideInputs::default().to_params(), SearchParams::default());
    }

    #[test]
    fn filled_fields_are_parsed() {
        let inputs = OverrideInputs {
            months: " 24 ".into(),
            marketing_spend: "150000.5".into(),
            ..Default::default()
        };
        let params = inputs.to_params();
        assert_eq!(params.months, Some(24));
        assert_eq!(params.marketing_spend_monthly, Some(150000.5));
        assert_eq!(params.initial_sales_people, None);
    }

    #[test]
    fn garbage_is_not_sent() {
        assert_eq!(parse_optional::<u32>("-3"), None);
        assert_eq!(parse_optional::<u32>("twelve"), None);
        assert_eq!(parse_optional_amount("inf"), None);
    }
}
