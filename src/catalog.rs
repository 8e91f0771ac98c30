//! Pricing, label and chip helpers shared by the product, cart and detail views.

pub const LABEL_DISCOUNT: &str = "diskon";
pub const LABEL_NEW: &str = "baru";

pub const MAX_DISCOUNT: i32 = 100;

/// Highest accepted base price (one trillion rupiah). Mirrored by a CHECK on
/// `products.price`.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// Price after applying a percentage discount, rounded half up.
///
/// `discount` is expected to be within `0..=100`; values outside that range
/// are clamped so the result stays between zero and `price`.
pub fn final_price(price: i64, discount: i32) -> i64 {
    let discount = i64::from(discount.clamp(0, MAX_DISCOUNT));
    if discount == 0 {
        return price;
    }
    let discounted = (i128::from(price) * i128::from(100 - discount) + 50).div_euclid(100);
    i64::try_from(discounted).unwrap_or(price)
}

/// Trim chip entries, drop empty ones and optionally skip repeats.
/// Insertion order is preserved.
pub fn normalize_chips<I, S>(inputs: I, dedupe: bool) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chips: Vec<String> = Vec::new();
    for input in inputs {
        let value = input.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        if dedupe && chips.iter().any(|c| c == value) {
            continue;
        }
        chips.push(value.to_string());
    }
    chips
}

/// Labels stored with a new product: the admin's own labels followed by
/// `diskon` when discounted and `baru` for every new product.
pub fn derive_labels<I, S>(discount: i32, labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = normalize_chips(labels, true);
    if discount > 0 && !out.iter().any(|l| l == LABEL_DISCOUNT) {
        out.push(LABEL_DISCOUNT.to_string());
    }
    if !out.iter().any(|l| l == LABEL_NEW) {
        out.push(LABEL_NEW.to_string());
    }
    out
}

/// Compact counter used next to the like button: `999`, `1 rb`, `1,5 rb`, `2,3 jt`.
pub fn format_count(n: i64) -> String {
    let n = n.max(0);
    if n >= 1_000_000 {
        return format!("{} jt", one_decimal(n, 1_000_000));
    }
    if n >= 1_000 {
        return format!("{} rb", one_decimal(n, 1_000));
    }
    n.to_string()
}

fn one_decimal(n: i64, unit: i64) -> String {
    let tenths = n.saturating_mul(10).saturating_add(unit / 2) / unit;
    let whole = group_thousands(tenths / 10);
    match tenths % 10 {
        0 => whole,
        frac => format!("{whole},{frac}"),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_price_applies_discount() {
        assert_eq!(final_price(150_000, 10), 135_000);
        assert_eq!(final_price(99_999, 0), 99_999);
        assert_eq!(final_price(1_000, 100), 0);
    }

    #[test]
    fn final_price_rounds_half_up() {
        // 15 * 0.5 = 7.5
        assert_eq!(final_price(15, 50), 8);
        // 10 * 0.67 = 6.7
        assert_eq!(final_price(10, 33), 7);
    }

    #[test]
    fn final_price_handles_extreme_prices() {
        assert_eq!(final_price(MAX_PRICE, 10), 900_000_000_000);
        assert_eq!(final_price(i64::MAX / 50, 10), 166_020_696_663_385_964);
        assert_eq!(final_price(i64::MAX, 1), 9_131_138_316_486_228_049);
        assert_eq!(format_count(i64::MAX), "922.337.203.685,4 jt");
    }

    #[test]
    fn final_price_clamps_out_of_range_discount() {
        assert_eq!(final_price(500, -5), 500);
        assert_eq!(final_price(500, 150), 0);
    }

    #[test]
    fn chips_trim_and_keep_order() {
        let chips = normalize_chips(["  a.jpg", "", "b.jpg ", "   ", "a.jpg"], false);
        assert_eq!(chips, vec!["a.jpg", "b.jpg", "a.jpg"]);
    }

    #[test]
    fn chips_dedupe_when_requested() {
        let chips = normalize_chips(["fashion", "elektronik", " fashion"], true);
        assert_eq!(chips, vec!["fashion", "elektronik"]);
    }

    #[test]
    fn discounted_products_are_labelled() {
        let labels = derive_labels(10, Vec::<String>::new());
        assert_eq!(labels, vec!["diskon", "baru"]);
    }

    #[test]
    fn labels_without_discount_only_get_new() {
        let labels = derive_labels(0, ["promo"]);
        assert_eq!(labels, vec!["promo", "baru"]);
    }

    #[test]
    fn derived_labels_are_not_duplicated() {
        let labels = derive_labels(25, ["baru", "diskon", "limited"]);
        assert_eq!(labels, vec!["baru", "diskon", "limited"]);
    }

    #[test]
    fn format_count_matches_display() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1 rb");
        assert_eq!(format_count(1_500), "1,5 rb");
        assert_eq!(format_count(1_500_000), "1,5 jt");
        assert_eq!(format_count(2_000_000_000), "2.000 jt");
        assert_eq!(format_count(-3), "0");
    }
}
