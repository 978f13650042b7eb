//! Output formats, their allowed codecs, and the preset values offered to the user

/// Output formats a conversion can target
pub const OUTPUT_FORMATS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a"];

/// Bitrates offered in the conversion settings
pub const BITRATE_PRESETS: &[&str] = &["96k", "128k", "192k", "256k", "320k"];

/// Channel counts offered in the conversion settings
pub const CHANNEL_PRESETS: &[u32] = &[1, 2, 4, 6];

/// Sample rates offered in the conversion settings
pub const SAMPLE_RATE_PRESETS: &[u32] = &[22050, 44100, 48000, 96000];

/// Codecs ffmpeg may use for a given output format.
///
/// The first entry is the default for the format. Unknown formats have no codecs.
pub fn codecs_for(format: &str) -> &'static [&'static str] {
    match format {
        "mp3" => &["libmp3lame"],
        "wav" => &["pcm_s16le", "pcm_s24le", "pcm_f32le"],
        "flac" => &["flac"],
        "aac" | "m4a" => &["aac", "libfdk_aac"],
        "ogg" => &["libvorbis"],
        "wma" => &["wmav2"],
        _ => &[],
    }
}

/// Returns true if `codec` is in the allowed set for `format`
pub fn is_codec_allowed(format: &str, codec: &str) -> bool {
    codecs_for(format).contains(&codec)
}

/// Encoder arguments used when a stream-copy merge has to be redone with re-encoding.
///
/// The choice depends only on the output extension.
pub fn reencode_args(extension: &str) -> Vec<String> {
    let args: &[&str] = match extension {
        "mp3" => &["-c:a", "libmp3lame", "-q:a", "2"],
        "wav" => &["-c:a", "pcm_s16le"],
        "flac" => &["-c:a", "flac"],
        _ => &["-c:a", "aac", "-b:a", "192k"],
    };
    args.iter().map(|s| s.to_string()).collect()
}
