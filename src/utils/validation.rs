use thiserror::Error;

/// File extensions accepted for uploaded images (compared lowercase)
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];

/// Why a multipart file part was dropped by the acceptance filter.
///
/// Callers of the relay never see these individually; they only observe the
/// aggregate "no image" outcome. The reason is kept for debug logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("declared type {0:?} is not an image")]
    NotAnImage(Option<String>),

    #[error("filename {0:?} does not have an allowed image extension")]
    UnsupportedExtension(Option<String>),
}

/// Returns true when the declared MIME type mentions "image".
pub fn is_image_mime(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("image"))
}

/// Returns the allow-listed extension the filename ends with, if any.
pub fn image_extension(filename: Option<&str>) -> Option<&'static str> {
    let lower = filename?.to_lowercase();
    ALLOWED_IMAGE_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.ends_with(ext))
}

/// Acceptance filter applied to every file part before it is persisted.
///
/// A part passes only if its declared type contains "image" AND its filename
/// ends with one of [`ALLOWED_IMAGE_EXTENSIONS`]. On success the matched
/// extension is returned so the staged copy can keep it.
pub fn check_image_part(
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<&'static str, RejectReason> {
    if !is_image_mime(content_type) {
        return Err(RejectReason::NotAnImage(content_type.map(str::to_string)));
    }

    image_extension(filename)
        .ok_or_else(|| RejectReason::UnsupportedExtension(filename.map(str::to_string)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime(Some("image/jpeg")));
        assert!(is_image_mime(Some("image/png; charset=binary")));
        assert!(is_image_mime(Some("image/*")));
        assert!(!is_image_mime(Some("application/pdf")));
        assert!(!is_image_mime(Some("text/plain")));
        assert!(!is_image_mime(None));
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(Some("cat.jpg")), Some(".jpg"));
        assert_eq!(image_extension(Some("CAT.JPEG")), Some(".jpeg"));
        assert_eq!(image_extension(Some("holiday.photo.WebP")), Some(".webp"));
        assert_eq!(image_extension(Some("scan.bmp")), Some(".bmp"));
        assert_eq!(image_extension(Some("doc.pdf")), None);
        assert_eq!(image_extension(Some("jpg")), None);
        assert_eq!(image_extension(Some("image.png.exe")), None);
        assert_eq!(image_extension(None), None);
    }

    #[test]
    fn test_check_image_part() {
        assert_eq!(check_image_part(Some("image/png"), Some("dog.png")), Ok(".png"));
        assert_eq!(check_image_part(Some("image/gif"), Some("Anim.GIF")), Ok(".gif"));

        // Both conditions are required
        assert_eq!(
            check_image_part(Some("application/pdf"), Some("doc.pdf")),
            Err(RejectReason::NotAnImage(Some("application/pdf".to_string())))
        );
        assert_eq!(
            check_image_part(Some("application/octet-stream"), Some("cat.jpg")),
            Err(RejectReason::NotAnImage(Some(
                "application/octet-stream".to_string()
            )))
        );
        assert_eq!(
            check_image_part(Some("image/jpeg"), Some("cat.tiff")),
            Err(RejectReason::UnsupportedExtension(Some("cat.tiff".to_string())))
        );
        assert_eq!(
            check_image_part(Some("image/jpeg"), None),
            Err(RejectReason::UnsupportedExtension(None))
        );
        assert_eq!(
            check_image_part(None, Some("cat.jpg")),
            Err(RejectReason::NotAnImage(None))
        );
    }
}
