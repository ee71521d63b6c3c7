//! File classification for delivery decisions.
//!
//! Classification is name-based first (fixed allow-lists per category),
//! with a content-sampling heuristic as a fallback for text preview only.
//! Each recognized image/video extension maps to exactly one MIME string.

use std::path::Path;

use tokio::io::AsyncReadExt;

/// How many leading bytes the text heuristic inspects.
pub const TEXT_SAMPLE_BYTES: usize = 8 * 1024;

/// Control-byte ratio above which a sample is considered binary.
const MAX_CONTROL_RATIO: f64 = 0.02;

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "log", "json", "js", "mjs", "cjs", "ts", "py", "rs", "sh", "yaml",
    "yml", "toml", "xml", "html", "htm", "css", "ini", "conf", "cfg", "env", "gitignore",
    "dockerignore", "gradle", "properties",
];

const TEXT_NAMES: &[&str] = &[
    // shells & dotfiles
    ".bashrc",
    ".bash_profile",
    ".bash_aliases",
    ".profile",
    ".zshrc",
    ".gitconfig",
    ".npmrc",
    ".yarnrc",
    ".tmux.conf",
    ".editorconfig",
    ".gitignore",
    // editors & conventional project files
    ".vimrc",
    "vimrc",
    "Dockerfile",
    "Makefile",
    "CMakeLists.txt",
    "README",
    "LICENSE",
    "CHANGELOG",
    "NOTICE",
    "Procfile",
];

// `.ts` deliberately belongs to the text list (TypeScript), so MPEG-TS
// segments are not recognized as video here.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
];

const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
];

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether a file name is text-eligible by extension or conventional name.
pub fn is_text_name(name: &str) -> bool {
    if let Some(ext) = extension_of(name) {
        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return true;
        }
    }
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    TEXT_NAMES.contains(&base)
}

/// The exact content type for a recognized image extension.
pub fn image_mime(name: &str) -> Option<&'static str> {
    let ext = extension_of(name)?;
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// The exact content type for a recognized video extension.
pub fn video_mime(name: &str) -> Option<&'static str> {
    let ext = extension_of(name)?;
    VIDEO_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Best-effort text detection over a leading sample of a file.
///
/// Empty sample counts as text. Any NUL byte means binary. Otherwise the
/// sample is text iff control bytes outside {TAB, LF, CR} make up less
/// than 2% of it.
pub fn looks_like_text(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return true;
    }
    let mut control = 0usize;
    for &b in sample {
        if b == 0 {
            return false;
        }
        if b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r' {
            control += 1;
        }
    }
    (control as f64) / (sample.len() as f64) < MAX_CONTROL_RATIO
}

/// Read up to the first 8 KiB of `path` and run the text heuristic.
///
/// An unreadable file is reported as binary rather than an error: this is
/// a preview gate, not an integrity check.
pub async fn sample_is_text(path: &Path) -> bool {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut buf = vec![0u8; TEXT_SAMPLE_BYTES];
    let mut filled = 0usize;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return false,
        }
    }
    looks_like_text(&buf[..filled])
}
