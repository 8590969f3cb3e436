//! Human-readable interval formatting for progress and ETA lines.

/// Formats a second count as `Ns`, `Mm:Ss`, `Hh:Mm:Ss` or
/// `D day(s), Hh:Mm:Ss` depending on magnitude.
pub fn format_interval(total_secs: i64) -> String {
    let secs = total_secs.max(0);

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m:{}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h:{}m:{}s", secs / 3600, secs % 3600 / 60, secs % 3600 % 60)
    } else {
        let days = secs / 86_400;
        let unit = if days == 1 { "day" } else { "days" };
        format!(
            "{days} {unit}, {}h:{}m:{}s",
            secs % 86_400 / 3600,
            secs % 86_400 % 3600 / 60,
            secs % 86_400 % 3600 % 60
        )
    }
}
