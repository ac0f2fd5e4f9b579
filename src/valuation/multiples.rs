/// Revenue multiple by industry, growth-adjusted. Unknown industries get
/// the default multiple.
pub fn industry_multiple(industry: &str, growth_rate: Option<f64>) -> f64 {
    let key = industry.trim().to_lowercase().replace(' ', "_");
    let base = match key.as_str() {
        "saas" => 10.0,
        "fintech" => 8.0,
        "ecommerce" => 5.0,
        "healthtech" => 7.0,
        "ai_ml" => 12.0,
        "enterprise_software" => 8.0,
        "consumer_tech" => 6.0,
        "biotech" => 15.0,
        "clean_tech" => 9.0,
        _ => 5.0,
    };

    let adjustment = match growth_rate {
        Some(g) if g > 0.5 => 1.5,
        Some(g) if g > 0.2 => 1.2,
        Some(_) => 1.0,
        None => 1.0,
    };

    base * adjustment
}

/// Canonical human display for a resolved dollar value.
pub fn format_currency(value: f64) -> String {
    if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_lookup_with_growth_adjustment() {
        assert_eq!(industry_multiple("SaaS", Some(0.6)), 15.0);
        assert_eq!(industry_multiple("saas", Some(0.3)), 12.0);
        assert_eq!(industry_multiple("saas", Some(0.1)), 10.0);
        assert_eq!(industry_multiple("unknown_industry", None), 5.0);
        assert_eq!(industry_multiple("Enterprise Software", None), 8.0);
        assert_eq!(industry_multiple("ai ml", None), 12.0);
    }

    #[test]
    fn currency_formatting_thresholds() {
        assert_eq!(format_currency(1_500_000_000.0), "$1.50B");
        assert_eq!(format_currency(100_000_000.0), "$100.00M");
        assert_eq!(format_currency(2_500.0), "$2.50K");
        assert_eq!(format_currency(12.34), "$12.34");
    }
}
