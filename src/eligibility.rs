pub fn is_eligible(max_bid: Option<f64>, minimum_bid: Option<f64>, current_price: f64) -> bool {
    // Unset bids compare like NaN: every comparison with them is false.
    let max_bid = max_bid.unwrap_or(f64::NAN);
    let minimum_bid = minimum_bid.unwrap_or(f64::NAN);

    if minimum_bid >= current_price && max_bid >= minimum_bid {
        return true;
    }
    max_bid > current_price
}
