use crate::domain::event::ProductPromotion;
use crate::domain::metrics::ProductMetric;
use rand::Rng;

/// All promotional prices land on 100-won boundaries.
pub fn round_to_100(price: f64) -> i64 {
    (price / 100.0).round() as i64 * 100
}

/// Absolute price floor.
pub const MIN_EVENT_PRICE: i64 = 100;

/// Effective tag price: the listed tag when present, otherwise reconstructed
/// from the average sale price (x1.6) or the cost (x3).
pub fn effective_tag(p: &ProductMetric) -> i64 {
    if p.tag_price > 0 {
        p.tag_price
    } else if p.avg_sale_price > 0.0 {
        round_to_100(p.avg_sale_price * 1.6)
    } else if p.cost > 0 {
        round_to_100(p.cost as f64 * 3.0)
    } else {
        0
    }
}

/// Nominal discounted price with the margin safety floor: unless the campaign
/// allows loss-leading, a price under cost x1.05 is raised to cost x1.1.
pub fn calc_event_price(tag: i64, cost: i64, discount_rate: f64, allow_loss: bool) -> i64 {
    let mut event_price = round_to_100(tag as f64 * (1.0 - discount_rate));
    if !allow_loss && cost > 0 && event_price < round_to_100(cost as f64 * 1.05) {
        event_price = round_to_100(cost as f64 * 1.1);
    }
    event_price.max(MIN_EVENT_PRICE)
}

/// Bind one product to a campaign at the given discount rate.
pub fn build_product(p: &ProductMetric, discount_rate: f64, allow_loss: bool) -> ProductPromotion {
    let tag = effective_tag(p);
    let cost = p.cost.max(0);
    let event_price = calc_event_price(tag, cost, discount_rate, allow_loss);

    let actual_disc = if tag > 0 {
        round2((1.0 - event_price as f64 / tag as f64) * 100.0)
    } else {
        0.0
    };
    let markup = if cost > 0 {
        round2(event_price as f64 / cost as f64)
    } else {
        0.0
    };
    let margin = if cost > 0 {
        round2((1.0 - cost as f64 / event_price as f64) * 100.0)
    } else {
        0.0
    };
    let below_bep = cost > 0 && event_price < cost;

    ProductPromotion {
        code: p.code.clone(),
        name: p.name.clone(),
        category: p.category,
        tag_price: tag,
        event_price,
        discount_rate: actual_disc,
        cost,
        stock: p.stock,
        sales_qty: p.sales_qty,
        expected_margin: margin,
        markup,
        daily_sales_rate: p.daily_sales_rate,
        below_bep,
        profit_per_unit: event_price - cost,
        limit_per_person: None,
        deal_stock: None,
        inventory_value: None,
        days_of_stock: None,
    }
}

/// Pick a rate inside a campaign band, biased toward the top for high-margin
/// products, plus a bounded jitter for campaign-to-campaign variety.
pub fn vary_rate<R: Rng + ?Sized>(
    base_min: f64,
    base_max: f64,
    margin_rate: f64,
    rng: &mut R,
) -> f64 {
    let range = base_max - base_min;
    let offset = if margin_rate > 60.0 {
        range * 0.6
    } else if margin_rate > 45.0 {
        range * 0.3
    } else {
        0.0
    };
    let jitter = rng.gen::<f64>() * range * 0.4;
    round2(base_max.min(base_min + offset + jitter))
}

/// Drop promotions whose expected margin falls under the campaign minimum.
/// Unknown cost always passes.
pub fn margin_safe_filter(products: Vec<ProductPromotion>, min_margin_pct: f64) -> Vec<ProductPromotion> {
    products
        .into_iter()
        .filter(|p| p.cost <= 0 || p.expected_margin >= min_margin_pct)
        .collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn metric(tag: i64, cost: i64, avg_sale_price: f64) -> ProductMetric {
        ProductMetric {
            code: "P1".to_string(),
            name: "테스트 스니커즈".to_string(),
            category: Category::Sneakers,
            tag_price: tag,
            plan_type: "정상".to_string(),
            cost,
            stock: 50,
            sales_qty: 120,
            sales_revenue: 0,
            avg_sale_price,
            discount_rate: 0.0,
            margin_rate: 0.0,
            daily_sales_rate: 1.5,
            days_of_stock: 33.3,
            color_breakdown: Vec::new(),
            size_breakdown: Vec::new(),
        }
    }

    #[test]
    fn rounds_to_nearest_hundred() {
        assert_eq!(round_to_100(12_349.0), 12_300);
        assert_eq!(round_to_100(12_350.0), 12_400);
        assert_eq!(round_to_100(49.0), 0);
    }

    #[test]
    fn effective_tag_reconstruction_chain() {
        assert_eq!(effective_tag(&metric(39_000, 10_000, 25_000.0)), 39_000);
        // No tag: avg sale price x1.6 rounded.
        assert_eq!(effective_tag(&metric(0, 10_000, 25_000.0)), 40_000);
        // No tag, no sales: cost x3.
        assert_eq!(effective_tag(&metric(0, 10_000, 0.0)), 30_000);
        assert_eq!(effective_tag(&metric(0, 0, 0.0)), 0);
    }

    #[test]
    fn margin_floor_raises_too_deep_discounts() {
        // 40,000 tag at 80% off is 8,000 < cost x1.05 (10,500).
        let price = calc_event_price(40_000, 10_000, 0.80, false);
        assert_eq!(price, 11_000);
        // Loss-allowed campaigns keep the deep price.
        assert_eq!(calc_event_price(40_000, 10_000, 0.80, true), 8_000);
    }

    #[test]
    fn price_never_drops_below_absolute_minimum() {
        assert_eq!(calc_event_price(100, 0, 0.90, true), 100);
        assert_eq!(calc_event_price(0, 0, 0.50, true), 100);
    }

    #[test]
    fn built_product_derives_actuals_from_final_price() {
        let p = build_product(&metric(40_000, 10_000, 0.0), 0.50, false);
        assert_eq!(p.event_price, 20_000);
        assert_eq!(p.discount_rate, 50.0);
        assert_eq!(p.markup, 2.0);
        assert_eq!(p.expected_margin, 50.0);
        assert!(!p.below_bep);
        assert_eq!(p.profit_per_unit, 10_000);
    }

    #[test]
    fn loss_allowed_product_flags_below_bep() {
        let p = build_product(&metric(40_000, 10_000, 0.0), 0.85, true);
        assert_eq!(p.event_price, 6_000);
        assert!(p.below_bep);
        assert_eq!(p.profit_per_unit, -4_000);
    }

    #[test]
    fn vary_rate_stays_inside_the_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for margin in [0.0, 50.0, 70.0] {
            for _ in 0..200 {
                let r = vary_rate(0.40, 0.60, margin, &mut rng);
                assert!((0.40..=0.60).contains(&r), "rate {r} out of band");
            }
        }
    }

    #[test]
    fn vary_rate_biases_with_margin_headroom() {
        // With the jitter floored at zero, the bias offsets are exact.
        let mut rng = StdRng::seed_from_u64(1);
        let low = vary_rate(0.40, 0.60, 10.0, &mut rng);
        assert!(low >= 0.40);
        // High-margin offset alone puts the floor at min + 60% of the band.
        let mut rng = StdRng::seed_from_u64(1);
        let high = vary_rate(0.40, 0.60, 70.0, &mut rng);
        assert!(high >= 0.52);
    }

    #[test]
    fn margin_filter_passes_unknown_cost() {
        // Floored at cost x1.1 the margin lands at ~9.09%, under a 10% minimum.
        let known = build_product(&metric(40_000, 38_000, 0.0), 0.10, false);
        let unknown = build_product(&metric(40_000, 0, 0.0), 0.10, false);
        let kept = margin_safe_filter(vec![known, unknown], 10.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].cost, 0);
    }
}
