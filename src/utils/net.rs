use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
        .expect("dotted-quad pattern is valid")
});

/// Parse a dotted-quad IPv4 address, every octet 1-3 ASCII digits in 0..=255.
/// Leading zeros are accepted (`010.0.0.1` is 10.0.0.1).
pub fn parse_ipv4(input: &str) -> Option<Ipv4Addr> {
    let caps = DOTTED_QUAD.captures(input)?;
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = caps[i + 1].parse::<u8>().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

pub fn is_valid_ipv4(input: &str) -> bool {
    parse_ipv4(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("192.168.1.1", true)]
    #[case("0.0.0.0", true)]
    #[case("255.255.255.255", true)]
    #[case("010.0.0.1", true)]
    #[case("192.168.1.256", false)]
    #[case("10.0.0", false)]
    #[case("10.0.0.0.1", false)]
    #[case("1.2.3.a", false)]
    #[case("1.2.3.-1", false)]
    #[case(" 1.2.3.4", false)]
    #[case("1.2.3.4\n", false)]
    #[case("1..3.4", false)]
    #[case("::1", false)]
    #[case("١.٢.٣.٤", false)]
    #[case("", false)]
    fn test_is_valid_ipv4(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_ipv4(input), expected, "input: {:?}", input);
    }

    #[test]
    fn test_parse_leading_zeros() {
        assert_eq!(parse_ipv4("010.000.000.001"), Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    proptest! {
        #[test]
        fn accepts_every_in_range_quad(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let input = format!("{}.{}.{}.{}", a, b, c, d);
            prop_assert_eq!(parse_ipv4(&input), Some(Ipv4Addr::new(a, b, c, d)));
        }

        #[test]
        fn rejects_out_of_range_octet(a in 256u16..1000, pos in 0usize..4) {
            let mut parts = vec!["1".to_string(); 4];
            parts[pos] = a.to_string();
            prop_assert!(!is_valid_ipv4(&parts.join(".")));
        }

        #[test]
        fn rejects_wrong_segment_count(octets in proptest::collection::vec(any::<u8>(), 1..8usize)) {
            prop_assume!(octets.len() != 4);
            let input = octets.iter().map(u8::to_string).collect::<Vec<_>>().join(".");
            prop_assert!(!is_valid_ipv4(&input));
        }
    }
}
