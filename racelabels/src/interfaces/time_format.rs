/// TimeFormatter turns a duration in seconds into display text. `precision` is the number of
/// decimal places (0 to 3), `force_minutes` always prints the minutes component, e.g. 0:45.2
/// instead of 45.2.
pub trait TimeFormatter {
    fn format_time(&self, seconds: f64, precision: u8, force_minutes: bool) -> String;
}

/// ClockTimeFormatter renders `h:mm:ss.fff`, `m:ss.fff` or `s.fff` depending on the magnitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockTimeFormatter;

impl TimeFormatter for ClockTimeFormatter {
    fn format_time(&self, seconds: f64, precision: u8, force_minutes: bool) -> String {
        if !seconds.is_finite() {
            return "-.--".to_owned();
        }

        let precision = precision.min(3) as usize;
        let scale = 10f64.powi(precision as i32);

        // round once on the full value so that 59.9996 becomes 1:00.000 and not 0:60.000
        let scaled = (seconds.abs() * scale).round() as u64;
        let whole = scaled / scale as u64;
        let frac = scaled % scale as u64;

        let hours = whole / 3600;
        let minutes = (whole % 3600) / 60;
        let secs = whole % 60;

        let sign = if seconds < 0.0 && scaled > 0 { "-" } else { "" };
        let frac = if precision > 0 {
            format!(".{:0width$}", frac, width = precision)
        } else {
            String::new()
        };

        if hours > 0 {
            format!("{}{}:{:02}:{:02}{}", sign, hours, minutes, secs, frac)
        } else if minutes > 0 || force_minutes {
            format!("{}{}:{:02}{}", sign, minutes, secs, frac)
        } else {
            format!("{}{}{}", sign, secs, frac)
        }
    }
}
