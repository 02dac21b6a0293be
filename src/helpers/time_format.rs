/// Format a number of seconds as `m:ss` for the progress labels.
///
/// Minutes are not wrapped into hours, a 75 minute track shows as `75:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(9.4), "0:09");
        assert_eq!(format_clock(59.6), "1:00");
        assert_eq!(format_clock(185.0), "3:05");
        assert_eq!(format_clock(4500.0), "75:00");
    }

    #[test]
    fn test_format_clock_rejects_garbage() {
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
    }
}
