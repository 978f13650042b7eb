//! Persisted settings types
//!
//! The on-disk layout matches earlier releases: numeric fields were once
//! written as strings (`"channels": "2"`), so both forms are accepted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::audio::formats::codecs_for;

/// Accept `44100` as well as `"44100"`
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u32),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Parameters for converting audio files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Output format / file extension (e.g. "mp3")
    pub format: String,
    /// ffmpeg audio codec (must be allowed for `format`)
    pub codec: String,
    /// Target bitrate as passed to ffmpeg (e.g. "192k")
    pub bitrate: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub channels: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub sample_rate: u32,
    /// Trim start (`HH:MM:SS`), empty for none
    #[serde(default)]
    pub start_time: String,
    /// Trim end (`HH:MM:SS`), empty for none
    #[serde(default)]
    pub end_time: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            format: "mp3".to_string(),
            codec: "libmp3lame".to_string(),
            bitrate: "192k".to_string(),
            channels: 2,
            sample_rate: 44100,
            start_time: String::new(),
            end_time: String::new(),
        }
    }
}

impl ConversionConfig {
    /// Quick preset for a target format: the format's default codec, 192k
    /// stereo at 44.1 kHz, no trim
    pub fn for_format(format: &str) -> Self {
        let mut config = Self::default();
        config.set_format(format);
        config
    }

    /// Switch the output format.
    ///
    /// If the current codec is not allowed for the new format, the format's
    /// first codec is selected instead.
    pub fn set_format(&mut self, format: &str) {
        self.format = format.to_string();
        let allowed = codecs_for(format);
        if !allowed.contains(&self.codec.as_str())
            && let Some(first) = allowed.first()
        {
            self.codec = first.to_string();
        }
    }

    pub fn trim_start(&self) -> Option<&str> {
        Some(self.start_time.trim()).filter(|s| !s.is_empty())
    }

    pub fn trim_end(&self) -> Option<&str> {
        Some(self.end_time.trim()).filter(|s| !s.is_empty())
    }

    /// One-line summary for the log
    pub fn summary(&self) -> String {
        format!(
            "codec: {}, bitrate: {}, channels: {}, sample rate: {}",
            self.codec, self.bitrate, self.channels, self.sample_rate
        )
    }
}

/// The persisted settings record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Folder used by the last scan
    #[serde(default)]
    pub last_folder: String,
    /// Whether scans also look for gaps in the numbering
    #[serde(default)]
    pub check_missing_files: bool,
    #[serde(default)]
    pub convert_config: ConversionConfig,
}
