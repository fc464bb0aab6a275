use decimal_fmt::{format, Precision, CAPACITY, MAX_PRECISION};

/// Split a rendered value into sign, integer digits and fraction digits.
fn parts(s: &str) -> (bool, &str, Option<&str>) {
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    match s.split_once('.') {
        Some((int, frac)) => (negative, int, Some(frac)),
        None => (negative, s, None),
    }
}

#[test]
fn fraction_digit_count() {
    for value in [0.0, 0.3, -7.25, 123.456, -98765.4321] {
        for p in 0..=MAX_PRECISION {
            let s = format(value, p as i16);
            let (_, int, frac) = parts(&s);
            assert!(!int.is_empty(), "{s}");
            assert!(int.bytes().all(|b| b.is_ascii_digit()), "{s}");
            match frac {
                None => assert_eq!(p, 0, "{s}"),
                Some(frac) => {
                    assert_eq!(frac.len(), p as usize, "{s}");
                    assert!(frac.bytes().all(|b| b.is_ascii_digit()), "{s}");
                }
            }
        }
    }
}

#[test]
fn no_leading_zeros() {
    for value in [0.0, 0.99, 1.0, 10.0, 100.5, 70_000.0, 4_000_000_000.0] {
        let s = format(value, 3);
        let (_, int, _) = parts(&s);
        assert!(int == "0" || !int.starts_with('0'), "{s}");
    }
}

#[test]
fn sign() {
    for value in [0.25, 1.0, 33.3, 1e6] {
        let positive = format(value, 4);
        let negative = format(-value, 4);
        assert_eq!(parts(&negative), (true, parts(&positive).1, parts(&positive).2));
    }
}

#[test]
fn integers_round_trip() {
    for value in [-5000i32, -4804, -98, 0, 98, 6569, 20098, 45000] {
        let s = format(value as f64, 2);
        assert_eq!(s.as_str(), std::format!("{value}.00"));
    }
}

#[test]
fn hundredths_match_std_away_from_ties() {
    // Values well clear of a tie agree with correctly rounded formatting.
    for cents in -20_000i32..20_000 {
        let value = cents as f64 / 100.0 + 0.001;
        assert_eq!(
            format(value, 2).as_str(),
            std::format!("{value:.2}"),
            "{value}"
        );
    }
}

#[test]
fn auto_boundaries() {
    for (value, digits) in [
        (0.999_999, 6),
        (1.0, 5),
        (9.5, 5),
        (10.0, 4),
        (99.0, 4),
        (100.0, 3),
        (999.0, 3),
        (1_000.0, 2),
        (9_999.0, 2),
        (10_000.0, 1),
        (99_999.0, 1),
        (100_000.0, 0),
    ] {
        let s = format(value, Precision::Auto);
        let (_, _, frac) = parts(&s);
        assert_eq!(frac.map_or(0, str::len), digits, "{s}");
    }
}

#[test]
fn bounded() {
    for value in [f64::MAX, f64::MIN, f64::INFINITY, f64::NEG_INFINITY, 1e25] {
        for p in [-1i8, 0, 5, 10, 100] {
            assert!(format(value, p).len() <= CAPACITY);
        }
    }
}
