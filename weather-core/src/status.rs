use chrono::{DateTime, Utc};

use crate::locale::Locale;

/// Human-readable age of the last refresh.
///
/// Under a minute reads as "just now", under an hour as whole minutes,
/// anything older as whole hours. Before the first refresh the loading label
/// is shown instead.
pub fn status_label(last_refresh: Option<DateTime<Utc>>, now: DateTime<Utc>, locale: Locale) -> String {
    let Some(last) = last_refresh else {
        return locale.loading().to_string();
    };

    let diff = (now - last).num_seconds().max(0);

    if diff < 60 {
        locale.just_now().to_string()
    } else if diff < 3600 {
        locale.minutes_ago(diff / 60)
    } else {
        locale.hours_ago(diff / 3600)
    }
}

/// [`status_label`] with the "Last refresh:" prefix once data has arrived.
pub fn status_line(last_refresh: Option<DateTime<Utc>>, now: DateTime<Utc>, locale: Locale) -> String {
    let label = status_label(last_refresh, now, locale);
    match last_refresh {
        Some(_) => format!("{}{label}", locale.last_refresh_prefix()),
        None => label,
    }
}
