//! Loading a local image for attachment to the first question.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use base64::Engine;

use crate::error::{Error, Result};
use crate::types::ContentPart;

/// Supported image media types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageMediaType {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `image/gif`
    Gif,
    /// `image/webp`
    Webp,
}

impl ImageMediaType {
    /// Guess the media type from the file extension, falling back to JPEG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("png") => ImageMediaType::Png,
            Some("gif") => ImageMediaType::Gif,
            Some("webp") => ImageMediaType::Webp,
            _ => ImageMediaType::Jpeg,
        }
    }

    /// The MIME type string.
    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }
}

/// A base64-encoded image ready to be attached to a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// MIME type of the image.
    pub mime_type: String,
    /// Standard base64 encoding of the file contents.
    pub base64_data: String,
}

impl ImageData {
    /// Encode raw bytes.
    pub fn from_bytes(media_type: ImageMediaType, bytes: &[u8]) -> Self {
        Self {
            mime_type: media_type.as_mime().to_string(),
            base64_data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl From<ImageData> for ContentPart {
    fn from(image: ImageData) -> Self {
        ContentPart::ImageReference {
            mime_type: image.mime_type,
            base64_data: image.base64_data,
        }
    }
}

/// Source of image attachments.
pub trait ImageLoader {
    /// Read the image at `path`, or `None` if there is no file there.
    fn read_image_as_base64(&self, path: &Path) -> Result<Option<ImageData>>;
}

/// Reads images from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn read_image_as_base64(&self, path: &Path) -> Result<Option<ImageData>> {
        if !path.is_file() {
            return Ok(None);
        }
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::io(
                    format!("failed to open image {}", path.display()),
                    err,
                ));
            }
        };
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .map_err(|err| Error::io(format!("failed to read image {}", path.display()), err))?;
        Ok(Some(ImageData::from_bytes(
            ImageMediaType::from_path(path),
            &buffer,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn media_type_from_extension() {
        assert_eq!(
            ImageMediaType::from_path(Path::new("a/cat.PNG")),
            ImageMediaType::Png
        );
        assert_eq!(
            ImageMediaType::from_path(Path::new("cat.webp")),
            ImageMediaType::Webp
        );
        assert_eq!(
            ImageMediaType::from_path(Path::new("cat.jpeg")),
            ImageMediaType::Jpeg
        );
        assert_eq!(
            ImageMediaType::from_path(Path::new("cat")),
            ImageMediaType::Jpeg
        );
    }

    #[test]
    fn missing_file_is_none() {
        let loader = FsImageLoader;
        let path = PathBuf::from("/definitely/not/here/cat.jpg");
        assert_eq!(loader.read_image_as_base64(&path).unwrap(), None);
    }

    #[test]
    fn reads_and_encodes() {
        let path = std::env::temp_dir().join(format!("aoai-chat-image-{}.gif", std::process::id()));
        std::fs::write(&path, b"Hello World").unwrap();
        let image = FsImageLoader.read_image_as_base64(&path).unwrap().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image.mime_type, "image/gif");
        assert_eq!(image.base64_data, "SGVsbG8gV29ybGQ=");
        let part = ContentPart::from(image);
        assert_eq!(
            part.data_uri().as_deref(),
            Some("data:image/gif;base64,SGVsbG8gV29ybGQ=")
        );
    }
}
