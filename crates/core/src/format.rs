use chrono::{Datelike, NaiveDateTime, Timelike};

/// "dd.mm.yyyy, H:MM Uhr – dd.mm.yyyy, H:MM Uhr" — day, month and minute
/// zero-padded, hour not, matching the original display.
pub fn format_shift_window(from: NaiveDateTime, to: NaiveDateTime) -> String {
    format!("{} – {}", format_wall_clock(from), format_wall_clock(to))
}

fn format_wall_clock(t: NaiveDateTime) -> String {
    format!(
        "{:02}.{:02}.{}, {}:{:02} Uhr",
        t.day(),
        t.month(),
        t.year(),
        t.hour(),
        t.minute()
    )
}

/// Two decimal places, round half away from zero (`toFixed`-style). Display
/// only; comparisons and sorting use the full-precision value.
pub fn format_distance_km(km: f64) -> String {
    format!("{:.2}", (km * 100.0).round() / 100.0)
}
