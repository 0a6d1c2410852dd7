//! Plain-text rendering of the result table.

use st11_core::Product;

const NAME_WIDTH: usize = 40;
const PRICE_WIDTH: usize = 12;
const URL_WIDTH: usize = 44;

/// Renders the indexed result table, one row per product in list order.
pub(crate) fn render_table(products: &[Product]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<nw$}  {:>pw$}  {:<uw$}  {}\n",
        "#",
        "name",
        "price",
        "thumbnail",
        "local path",
        nw = NAME_WIDTH,
        pw = PRICE_WIDTH,
        uw = URL_WIDTH,
    ));
    for (idx, product) in products.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<nw$}  {:>pw$}  {:<uw$}  {}\n",
            idx + 1,
            clip(&product.name, NAME_WIDTH),
            clip(&product.price, PRICE_WIDTH),
            clip(&product.thumbnail, URL_WIDTH),
            product.local_thumbnail_path().unwrap_or("-"),
            nw = NAME_WIDTH,
            pw = PRICE_WIDTH,
            uw = URL_WIDTH,
        ));
    }
    out
}

/// Truncates on char boundaries with a trailing ellipsis.
fn clip(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut clipped: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product {
            url: "/products/1".to_owned(),
            name: name.to_owned(),
            price: "9,900".to_owned(),
            thumbnail: "//cdn.example.com/t.jpg".to_owned(),
            thumbnail_local: Some("thumbnails/1_x.jpg".to_owned()),
            registered_date: "2026-08-23".to_owned(),
        }
    }

    #[test]
    fn renders_one_line_per_product_plus_header() {
        let table = render_table(&[product("Mug"), product("Plate")]);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("1"));
        assert!(table.contains("Plate"));
        assert!(table.contains("thumbnails/1_x.jpg"));
    }

    #[test]
    fn rows_keep_list_order() {
        let table = render_table(&[product("First"), product("Second")]);
        let first = table.find("First").unwrap();
        let second = table.find("Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn clip_truncates_long_names_with_ellipsis() {
        let clipped = clip(&"x".repeat(60), 10);
        assert_eq!(clipped.chars().count(), 10);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn clip_leaves_short_strings_alone() {
        assert_eq!(clip("short", 10), "short");
    }
}
