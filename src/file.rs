use std::path::Path;

/// Size limit shared by a group of file extensions
#[derive(Debug)]
pub struct FileTypeConfig {
    pub extensions: &'static [&'static str],
    pub size_limit: u64,
}

pub const SUPPORTED_FILE_TYPES: &[FileTypeConfig] = &[
    FileTypeConfig {
        extensions: &["mp4", "mov"],
        size_limit: 262144000, // 250 MB
    },
    FileTypeConfig {
        extensions: &["jpg", "png", "jpeg", "gif", "webp"],
        size_limit: 52428800, // 50 MB
    },
    FileTypeConfig {
        extensions: &["flac", "wav", "mp3", "m4a", "aac", "alac", "ogg"],
        size_limit: 20971520, // 20 MB
    },
    FileTypeConfig {
        extensions: &["txt"],
        size_limit: 5242880, // 5 MB
    },
];

/// Lowercased extension of `path`, without the dot
pub fn normalized_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Upload size limit in bytes for the extension of `path`, if supported
pub fn size_limit_for(path: &Path) -> Option<u64> {
    let extension = normalized_extension(path)?;
    SUPPORTED_FILE_TYPES
        .iter()
        .find(|file_type| file_type.extensions.contains(&extension.as_str()))
        .map(|file_type| file_type.size_limit)
}
