//! Text and JSON rendering of cart state and the catalog.

use std::io::{self, Write};

use shieldsync_core::{CartSnapshot, Catalog};

/// Render a snapshot as a table, or as one line of JSON.
pub fn snapshot(out: &mut impl Write, snapshot: &CartSnapshot, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, snapshot)?;
        return writeln!(out);
    }

    if snapshot.is_empty() {
        return writeln!(out, "Cart is empty");
    }

    writeln!(out, "Cart (v{})", snapshot.version())?;
    for line in snapshot.lines() {
        writeln!(
            out,
            "  {:<16} {:<32} {} x {:<4} {}",
            line.id(),
            line.name(),
            line.unit_price(),
            line.quantity(),
            line.line_total()
        )?;
    }
    writeln!(out, "{}", total_line(snapshot))
}

/// `Total: ₹28 (2 items)`
pub fn total_line(snapshot: &CartSnapshot) -> String {
    let count = snapshot.item_count();
    let noun = if count == 1 { "item" } else { "items" };
    format!("Total: {} ({count} {noun})", snapshot.total())
}

/// List every plan with its yearly price and features.
pub fn catalog(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    for product in catalog {
        writeln!(out, "{:<16} {} - {}/year", product.id, product.name, product.price)?;
        for feature in &product.features {
            writeln!(out, "    - {feature}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shieldsync_core::{CartStore, NewCartItem, NullNotifier, Price};

    use super::*;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let text = rendered(|out| snapshot(out, &CartSnapshot::default(), false));
        assert_eq!(text, "Cart is empty\n");
    }

    #[test]
    fn test_cart_table() {
        let store = CartStore::new(NullNotifier);
        store.add_item(NewCartItem::new("basic-av", "Basic", Price::whole(14)));
        store.add_item(NewCartItem::new("basic-av", "Basic", Price::whole(14)));

        let text = rendered(|out| snapshot(out, &store.snapshot(), false));

        assert!(text.starts_with("Cart (v2)\n"));
        assert!(text.contains("basic-av"));
        assert!(text.contains("₹14 x 2"));
        assert!(text.ends_with("Total: ₹28 (2 items)\n"));
    }

    #[test]
    fn test_cart_json_is_one_line() {
        let store = CartStore::new(NullNotifier);
        store.add_item(NewCartItem::new("pro-av", "Pro", Price::whole(9)));

        let text = rendered(|out| snapshot(out, &store.snapshot(), true));

        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total"], "9");
        assert_eq!(value["item_count"], 1);
    }

    #[test]
    fn test_total_line_singular() {
        let store = CartStore::new(NullNotifier);
        store.add_item(NewCartItem::new("cloud-av", "Cloud", Price::whole(8)));
        assert_eq!(total_line(&store.snapshot()), "Total: ₹8 (1 item)");
    }

    #[test]
    fn test_catalog_listing() {
        let text = rendered(|out| catalog(out, &Catalog::shieldsync()));

        assert!(text.contains("SHIELDSYNC Basic Antivirus - ₹14/year"));
        assert!(text.contains("    - VPN service"));
        assert_eq!(text.lines().filter(|l| !l.starts_with(' ')).count(), 4);
    }
}
