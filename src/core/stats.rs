use crate::domain::model::{AggregateStats, CartState};

pub fn compute_totals(cart: &CartState) -> AggregateStats {
    AggregateStats {
        item_count: cart.len(),
        total_hours: cart.iter().map(|e| u64::from(e.hours)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CartEntry, Technology};

    #[test]
    fn test_empty_cart_totals() {
        assert_eq!(
            compute_totals(&CartState::new()),
            AggregateStats {
                item_count: 0,
                total_hours: 0
            }
        );
    }

    #[test]
    fn test_totals_match_entries() {
        let entries = [("Arrays", 6), ("OOP", 12), ("Hooks", 5)]
            .iter()
            .map(|(id, hours)| CartEntry {
                technology: Technology::JavaScript,
                identifier: id.to_string(),
                title: id.to_string(),
                summary: String::new(),
                resource_locator: String::new(),
                hours: *hours,
            })
            .collect();
        let (cart, _) = CartState::from_entries(entries);

        let stats = compute_totals(&cart);
        assert_eq!(stats.item_count, cart.len());
        assert_eq!(stats.total_hours, 23);
    }

    #[test]
    fn test_totals_do_not_overflow_u32() {
        let entries = ["Marathon", "Ultra"]
            .iter()
            .map(|id| CartEntry {
                technology: Technology::React,
                identifier: id.to_string(),
                title: id.to_string(),
                summary: String::new(),
                resource_locator: String::new(),
                hours: u32::MAX - 1,
            })
            .collect();
        let (cart, _) = CartState::from_entries(entries);

        let stats = compute_totals(&cart);
        assert_eq!(stats.total_hours, 2 * u64::from(u32::MAX - 1));
    }
}
