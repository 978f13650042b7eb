// Audio module - file detection and the format/codec tables

pub mod detection;
pub mod formats;

pub use detection::{extension_of, is_audio_file};
pub use formats::{codecs_for, is_codec_allowed, reencode_args};
