/// Formats a countdown as `mm:ss`; an hour shows as `60:00`.
#[must_use]
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(300), "05:00");
        assert_eq!(format_remaining(61), "01:01");
        assert_eq!(format_remaining(9), "00:09");
        assert_eq!(format_remaining(3600), "60:00");
    }
}
