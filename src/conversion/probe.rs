//! Metadata probing with ffprobe

use serde::Deserialize;
use std::path::Path;

use super::{Orchestrator, ffmpeg_path_string};
use crate::error::{AppError, AppResult};

const UNKNOWN: &str = "unknown";

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    channel_layout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
    duration: Option<String>,
    bit_rate: Option<String>,
}

/// Metadata of one audio file as reported by ffprobe
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    pub file_name: String,
    /// Duration as `m:ss`
    pub duration: String,
    pub codec: Option<String>,
    /// Overall bitrate in kbps
    pub bit_rate_kbps: Option<u64>,
    pub sample_rate: Option<String>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
    /// Container format name (e.g. "mp3", "mov,mp4,m4a,3gp,3g2,mj2")
    pub format_name: Option<String>,
}

impl AudioInfo {
    /// Label/value pairs in display order
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        fn or_unknown(value: Option<&str>) -> String {
            value.unwrap_or(UNKNOWN).to_string()
        }

        vec![
            ("File", self.file_name.clone()),
            ("Duration", self.duration.clone()),
            ("Codec", or_unknown(self.codec.as_deref())),
            (
                "Bitrate",
                self.bit_rate_kbps
                    .map(|k| format!("{} kbps", k))
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            ),
            (
                "Sample rate",
                self.sample_rate
                    .as_deref()
                    .map(|r| format!("{} Hz", r))
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            ),
            (
                "Channels",
                self.channels
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            ),
            ("Channel layout", or_unknown(self.channel_layout.as_deref())),
            ("Format", or_unknown(self.format_name.as_deref())),
        ]
    }
}

/// Format seconds as `m:ss`, truncating fractions
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Build an [`AudioInfo`] from ffprobe's JSON output
pub fn parse_probe_output(file_name: &str, json: &str) -> Result<AudioInfo, String> {
    let document: ProbeDocument =
        serde_json::from_str(json).map_err(|e| format!("unreadable ffprobe output: {}", e))?;

    let stream = document
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| "no audio stream".to_string())?;

    let duration = document
        .format
        .duration
        .as_deref()
        .ok_or_else(|| "no duration reported".to_string())?;
    let seconds: f64 = duration
        .trim()
        .parse()
        .map_err(|_| format!("unreadable duration '{}'", duration))?;

    let bit_rate_kbps = document
        .format
        .bit_rate
        .as_deref()
        .and_then(|b| b.trim().parse::<u64>().ok())
        .map(|bps| bps / 1000);

    Ok(AudioInfo {
        file_name: file_name.to_string(),
        duration: format_duration(seconds),
        codec: stream.codec_name,
        bit_rate_kbps,
        sample_rate: stream.sample_rate,
        channels: stream.channels,
        channel_layout: stream.channel_layout,
        format_name: document.format.format_name,
    })
}

impl Orchestrator<'_> {
    /// Read the metadata of one file with ffprobe
    pub fn probe(&self, path: &Path) -> AppResult<AudioInfo> {
        let args: Vec<String> = [
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(ffmpeg_path_string(path)))
        .collect();

        let output = self.run(&self.tools.ffprobe, &args)?;
        if !output.success() {
            return Err(AppError::ProbeFailed {
                path: path.to_path_buf(),
                reason: format!("ffprobe failed ({}): {}", output.exit, output.stderr.trim()),
            });
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        parse_probe_output(&file_name, &output.stdout).map_err(|reason| AppError::ProbeFailed {
            path: path.to_path_buf(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Toolchain;
    use crate::test_fixtures::{FakeRunner, failed, ok};

    const MP3_PROBE: &str = r#"{
        "streams": [
            { "index": 0, "codec_type": "video", "codec_name": "mjpeg" },
            {
                "index": 1, "codec_type": "audio", "codec_name": "mp3",
                "sample_rate": "44100", "channels": 2, "channel_layout": "stereo"
            }
        ],
        "format": {
            "format_name": "mp3", "duration": "245.672000", "bit_rate": "320112"
        }
    }"#;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(245.672), "4:05");
        assert_eq!(format_duration(3661.0), "61:01");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_parse_picks_first_audio_stream() {
        let info = parse_probe_output("song.mp3", MP3_PROBE).unwrap();
        assert_eq!(info.file_name, "song.mp3");
        assert_eq!(info.duration, "4:05");
        assert_eq!(info.codec.as_deref(), Some("mp3"));
        assert_eq!(info.bit_rate_kbps, Some(320));
        assert_eq!(info.sample_rate.as_deref(), Some("44100"));
        assert_eq!(info.channels, Some(2));
        assert_eq!(info.channel_layout.as_deref(), Some("stereo"));
        assert_eq!(info.format_name.as_deref(), Some("mp3"));
    }

    #[test]
    fn test_parse_missing_bitrate_is_unknown() {
        let json = r#"{"streams":[{"codec_type":"audio","codec_name":"flac"}],
                       "format":{"duration":"10.0"}}"#;
        let info = parse_probe_output("a.flac", json).unwrap();
        assert_eq!(info.bit_rate_kbps, None);

        let lines = info.lines();
        assert!(lines.contains(&("Bitrate", "unknown".to_string())));
        assert!(lines.contains(&("Duration", "0:10".to_string())));
        assert!(lines.contains(&("Channel layout", "unknown".to_string())));
    }

    #[test]
    fn test_parse_without_audio_stream_fails() {
        let json = r#"{"streams":[{"codec_type":"video"}],"format":{}}"#;
        assert!(parse_probe_output("v.ts", json).is_err());
    }

    #[test]
    fn test_parse_bad_duration_fails() {
        let unreadable = r#"{"streams":[{"codec_type":"audio"}],"format":{"duration":"N/A"}}"#;
        assert_eq!(
            parse_probe_output("a.mp3", unreadable).unwrap_err(),
            "unreadable duration 'N/A'"
        );

        let missing = r#"{"streams":[{"codec_type":"audio"}],"format":{}}"#;
        assert!(parse_probe_output("a.mp3", missing).is_err());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_probe_output("x.mp3", "not json").is_err());
    }

    #[test]
    fn test_probe_invocation_and_result() {
        let runner = FakeRunner::new(vec![ok(MP3_PROBE)]);
        let tools = Toolchain::default();
        let orchestrator = Orchestrator::new(&tools, &runner);

        let info = orchestrator.probe(Path::new("/music/song.mp3")).unwrap();
        assert_eq!(info.bit_rate_kbps, Some(320));

        let calls = runner.calls();
        assert_eq!(calls[0].0, Path::new("ffprobe"));
        assert_eq!(
            calls[0].1,
            [
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "/music/song.mp3"
            ]
        );
    }

    #[test]
    fn test_probe_nonzero_exit_is_probe_failure() {
        let runner = FakeRunner::new(vec![failed(1, "No such file or directory")]);
        let tools = Toolchain::default();
        let orchestrator = Orchestrator::new(&tools, &runner);

        let err = orchestrator.probe(Path::new("/music/gone.mp3")).unwrap_err();
        match err {
            AppError::ProbeFailed { reason, .. } => {
                assert!(reason.contains("No such file or directory"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
