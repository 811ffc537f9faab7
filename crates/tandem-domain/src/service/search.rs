//! Order list filtering

use crate::model::Order;

/// Case-insensitive substring search over contract number, customer, plate
/// number and brand, optionally restricted to one vehicle type.
pub fn matches_search(order: &Order, query: &str, vehicle_type: Option<&str>) -> bool {
    let needle = query.trim().to_lowercase();
    let text_match = needle.is_empty()
        || [
            &order.contract_number,
            &order.customer,
            &order.plate_number,
            &order.brand,
        ]
        .iter()
        .any(|field| field.trim().to_lowercase().contains(&needle));

    let type_match = vehicle_type.map_or(true, |wanted| {
        order.vehicle_type.trim().to_lowercase() == wanted.trim().to_lowercase()
    });

    text_match && type_match
}

pub fn filter_orders<'a>(
    orders: &'a [Order],
    query: &str,
    vehicle_type: Option<&str>,
) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| matches_search(order, query, vehicle_type))
        .collect()
}
