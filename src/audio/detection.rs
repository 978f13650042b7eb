use std::path::Path;

/// Extensions the scanner treats as audio (lowercase, without the dot)
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "ts"];

/// Check if a file is an audio file based on its extension
pub fn is_audio_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        let ext = ext.to_string_lossy().to_lowercase();
        AUDIO_EXTENSIONS.contains(&ext.as_str())
    } else {
        false
    }
}

/// Lowercased extension of a file name, or an empty string
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_audio_formats() {
        assert!(is_audio_file(Path::new("test.mp3")));
        assert!(is_audio_file(Path::new("test.flac")));
        assert!(is_audio_file(Path::new("test.wav")));
        assert!(is_audio_file(Path::new("test.wma")));
        assert!(is_audio_file(Path::new("segment_001.ts")));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(is_audio_file(Path::new("LOUD.MP3")));
        assert!(is_audio_file(Path::new("Mixed.FlAc")));
    }

    #[test]
    fn test_rejects_non_audio() {
        assert!(!is_audio_file(Path::new("test.txt")));
        assert!(!is_audio_file(Path::new("test")));
        assert!(!is_audio_file(Path::new("test.opus")));
        assert!(!is_audio_file(Path::new("missing_files.txt")));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.MP3"), "mp3");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("dots.in.name.flac"), "flac");
    }
}
