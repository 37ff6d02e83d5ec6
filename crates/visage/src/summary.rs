//! Display summary of a save.

use visage_save::{Flavor, SaveFile, Sex};

/// The facts about a save worth showing before a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaveSummary {
    pub game: Flavor,
    pub save_number: u32,
    pub name: String,
    pub level: u32,
    pub race: String,
    pub sex: Sex,
    pub location: String,
    pub playing_time: String,
    pub screenshot_width: u32,
    pub screenshot_height: u32,
}

impl SaveSummary {
    pub fn from_save(save: &SaveFile) -> Self {
        let header = save.header();
        Self {
            game: save.flavor(),
            save_number: header.save_number,
            name: header.player_name.to_string_lossy(),
            level: header.player_level,
            race: header.race_editor_id.to_string_lossy(),
            sex: header.sex,
            location: header.player_location.to_string_lossy(),
            playing_time: format_playing_time(&header.game_date.to_string_lossy()),
            screenshot_width: save.screenshot().width(),
            screenshot_height: save.screenshot().height(),
        }
    }
}

/// Turn the header's play-time text into `2days 5h 30min` style.
///
/// Fallout 4 writes `002d.05h.30m.0 days`, Skyrim SE writes `12.34.56`
/// (hours, minutes, seconds). Zero components are left out.
pub fn format_playing_time(timestamp: &str) -> String {
    let parts: [&str; 4] = if timestamp.contains("days") {
        let mut fields = timestamp.splitn(4, '.').map(|field| {
            let mut chars = field.chars();
            chars.next_back();
            chars.as_str()
        });
        [
            fields.next().unwrap_or(""),
            fields.next().unwrap_or(""),
            fields.next().unwrap_or(""),
            "",
        ]
    } else {
        let mut fields = timestamp.split('.');
        [
            "",
            fields.next().unwrap_or(""),
            fields.next().unwrap_or(""),
            fields.next().unwrap_or(""),
        ]
    };

    parts
        .iter()
        .zip(["days", "h", "min", "s"])
        .filter_map(|(value, unit)| {
            let value = value.trim_start_matches('0');
            (!value.is_empty()).then(|| format!("{}{}", value, unit))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skyrim_time() {
        assert_eq!(format_playing_time("12.34.56"), "12h 34min 56s");
        assert_eq!(format_playing_time("00.05.00"), "5min");
    }

    #[test]
    fn test_fallout4_time() {
        assert_eq!(format_playing_time("002d.05h.30m.0 days"), "2days 5h 30min");
        assert_eq!(format_playing_time("000d.00h.07m.0 days"), "7min");
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_playing_time(""), "");
    }
}
