//! Upload gate: extension allow-list and filename sanitization.
//!
//! The extension check is the only gate before an upload is written to disk
//! and handed to the image pipeline.

/// Raster formats the normalizer knows how to decode.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "jfif", "bmp", "tiff", "tif",
];

/// Whether a filename carries an allow-listed image extension
/// (case-insensitive). Extension-less names are rejected.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce an untrusted filename to a safe basename: path components are
/// stripped and anything outside `[A-Za-z0-9._-]` becomes `_`. Never returns
/// an empty or dot-leading name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_extension() {
        for ext in ALLOWED_EXTENSIONS {
            assert!(allowed_file(&format!("photo.{ext}")), "rejected .{ext}");
        }
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(allowed_file("photo.PNG"));
        assert!(allowed_file("photo.JpEg"));
        assert!(allowed_file("PHOTO.WEBP"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!allowed_file("photo.exe"));
        assert!(!allowed_file("photo.pdf"));
        assert!(!allowed_file("photo.png.sh"));
        assert!(!allowed_file("photo."));
    }

    #[test]
    fn rejects_extensionless_names() {
        assert!(!allowed_file("photo"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\shot.png"), "shot.png");
    }

    #[test]
    fn sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("snapshot?.jpg"), "snapshot_.jpg");
    }

    #[test]
    fn sanitize_never_returns_hidden_or_empty_names() {
        assert_eq!(sanitize_filename(".bashrc"), "bashrc");
        assert_eq!(sanitize_filename("///"), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }
}
