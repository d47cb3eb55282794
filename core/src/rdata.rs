//! Normalization of record targets returned by the service.

use std::net::Ipv6Addr;

/// Normalize `rdata` for display and comparison.
///
/// AAAA targets are expanded to all eight zero-padded groups so that
/// `2001:db8::1` and `2001:0db8:0000:...:0001` compare equal after
/// processing. LOC targets get their measurements padded by
/// `pad_coordinates`. Targets that do not parse, and all other record types,
/// pass through unchanged.
pub fn process_rdata(rdata: &[String], record_type: &str) -> Vec<String> {
    if record_type.eq_ignore_ascii_case("AAAA") {
        rdata
            .iter()
            .map(|target| match target.parse::<Ipv6Addr>() {
                Ok(addr) => full_ipv6(&addr),
                Err(_) => target.clone(),
            })
            .collect()
    } else if record_type.eq_ignore_ascii_case("LOC") {
        rdata.iter().map(|target| pad_coordinates(target)).collect()
    } else {
        rdata.to_vec()
    }
}

/// Number of whitespace-separated fields in a fully specified LOC target:
/// latitude (d m s N/S), longitude (d m s E/W), altitude, size and the two
/// precisions.
const LOC_FIELDS: usize = 12;

/// Rewrite the four trailing measurements of a LOC target as `x.xxm`.
///
/// `52 22 23.000 N 4 53 32.000 E -2m 0m 10000m 10m` becomes
/// `52 22 23.000 N 4 53 32.000 E -2.00m 0.00m 10000.00m 10.00m`. A target
/// that does not have all twelve fields, or whose measurements are not
/// numbers, is returned unchanged.
pub fn pad_coordinates(target: &str) -> String {
    let fields: Vec<&str> = target.split_whitespace().collect();
    if fields.len() != LOC_FIELDS {
        return target.to_string();
    }
    let (position, measurements) = fields.split_at(8);
    let padded: Option<Vec<String>> = measurements.iter().map(|m| pad_meters(m)).collect();
    match padded {
        Some(padded) => format!("{} {}", position.join(" "), padded.join(" ")),
        None => target.to_string(),
    }
}

fn pad_meters(value: &str) -> Option<String> {
    let meters: f64 = value.trim_end_matches('m').parse().ok()?;
    Some(format!("{meters:.2}m"))
}

/// Format `addr` without `::` compression, four hex digits per group.
pub fn full_ipv6(addr: &Ipv6Addr) -> String {
    addr.segments()
        .iter()
        .map(|segment| format!("{segment:04x}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_compressed_ipv6() {
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        assert_eq!(full_ipv6(&addr), "2001:0db8:0000:0000:0000:0000:0000:0001");
    }

    #[test]
    fn pads_loc_measurements() {
        assert_eq!(
            pad_coordinates("51 30 12.748 N 0 7 39.611 W 0m 1m 10000m 10m"),
            "51 30 12.748 N 0 7 39.611 W 0.00m 1.00m 10000.00m 10.00m"
        );
        assert_eq!(
            pad_coordinates("52 22 23.000 N 4 53 32.000 E -2.5m 0.00m 10.1m 10"),
            "52 22 23.000 N 4 53 32.000 E -2.50m 0.00m 10.10m 10.00m"
        );
    }

    #[test]
    fn partial_loc_target_is_unchanged() {
        assert_eq!(pad_coordinates("52 22 23.000 N 4 53 32.000 E"), "52 22 23.000 N 4 53 32.000 E");
        let bad = "52 22 23.000 N 4 53 32.000 E high 0m 0m 0m";
        assert_eq!(pad_coordinates(bad), bad);
    }

    #[test]
    fn loc_targets_are_padded() {
        let rdata = vec!["51 30 12.748 N 0 7 39.611 W 0m 1m 10000m 10m".to_string()];
        assert_eq!(
            process_rdata(&rdata, "loc"),
            vec!["51 30 12.748 N 0 7 39.611 W 0.00m 1.00m 10000.00m 10.00m".to_string()]
        );
    }

    #[test]
    fn aaaa_targets_are_expanded() {
        let rdata = vec!["2001:db8::1".to_string(), "not-an-address".to_string()];
        assert_eq!(
            process_rdata(&rdata, "aaaa"),
            vec![
                "2001:0db8:0000:0000:0000:0000:0000:0001".to_string(),
                "not-an-address".to_string(),
            ]
        );
    }

    #[test]
    fn other_types_pass_through() {
        let rdata = vec!["10 mail.example.com.".to_string()];
        assert_eq!(process_rdata(&rdata, "MX"), rdata);
    }
}
