//! KRW amount formatting used by KPI/budget projections and the renderer.

/// Thousands-grouped decimal string, e.g. 1234567 -> "1,234,567".
pub fn comma(n: i64) -> String {
    let negative = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// KRW amount expressed in 만원 (10,000 KRW) units, e.g. 7_000_000 -> "700만원".
pub fn manwon(n: i64) -> String {
    format!("{}만원", comma((n as f64 / 10_000.0).round() as i64))
}

/// Plain won amount with grouping, e.g. 38_900 -> "38,900원".
pub fn won(n: i64) -> String {
    format!("{}원", comma(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(comma(0), "0");
        assert_eq!(comma(999), "999");
        assert_eq!(comma(1_000), "1,000");
        assert_eq!(comma(25_000_000), "25,000,000");
        assert_eq!(comma(-1_234_567), "-1,234,567");
    }

    #[test]
    fn manwon_rounds_to_ten_thousands() {
        assert_eq!(manwon(7_000_000), "700만원");
        assert_eq!(manwon(2_100_000), "210만원");
        assert_eq!(manwon(15_000), "2만원");
    }

    #[test]
    fn won_keeps_grouping() {
        assert_eq!(won(38_900), "38,900원");
    }
}
