//! Image format sniffing from leading byte signatures.

use leafscan_types::ImageFormat;

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF_SIGNATURE: &[u8] = b"GIF";
const RIFF_SIGNATURE: &[u8] = b"RIFF";

/// Detect the image format from the payload's leading bytes.
///
/// Pure and total: unknown signatures degrade to JPEG rather than
/// failing, so the result is a best-effort label only.
pub fn sniff_format(bytes: &[u8]) -> ImageFormat {
    if bytes.starts_with(PNG_SIGNATURE) {
        ImageFormat::Png
    } else if bytes.starts_with(JPEG_SIGNATURE) {
        ImageFormat::Jpeg
    } else if bytes.starts_with(GIF_SIGNATURE) {
        ImageFormat::Gif
    } else if is_webp(bytes) {
        ImageFormat::Webp
    } else {
        ImageFormat::Jpeg
    }
}

/// WEBP is a RIFF container with a "WEBP" tag in the first 20 bytes.
fn is_webp(bytes: &[u8]) -> bool {
    bytes.starts_with(RIFF_SIGNATURE)
        && bytes[..bytes.len().min(20)]
            .windows(4)
            .any(|w| w == b"WEBP")
}
