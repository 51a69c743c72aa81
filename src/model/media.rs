//! Purpose: The media family: one of image, video, external video, or 3D model.
//! Exports: `Media`, `MediaKind`, `MEDIA_SHAPES`, concrete shapes and their nested records.
//! Role: Top-level polymorphic entity; its own `__typename` or GID selects the shape.
//! Invariants: `MediaImage` answers to both `MediaImage` and `Image` discriminators.
//! Invariants: Serialized media carry `__typename`, so output decodes back to the same shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::decode::{Decoder, Family, deserialize_family};
use crate::core::error::Error;
use crate::core::fields::Fields;
use crate::core::registry::{Shape, ShapeRegistry, build_variant};
use crate::core::resolve::DiscriminatorRule;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaContentType {
    Image,
    Video,
    ExternalVideo,
    #[serde(rename = "MODEL_3D")]
    Model3d,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaPreviewImage {
    pub image: Option<Image>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaImage {
    pub id: String,
    pub alt: Option<String>,
    pub media_content_type: Option<MediaContentType>,
    pub status: Option<String>,
    pub mime_type: Option<String>,
    pub image: Option<Image>,
    pub preview: Option<MediaPreviewImage>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSource {
    pub url: String,
    pub mime_type: Option<String>,
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_size: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub alt: Option<String>,
    pub media_content_type: Option<MediaContentType>,
    pub status: Option<String>,
    pub duration: Option<u64>,
    pub filename: Option<String>,
    pub original_source: Option<VideoSource>,
    pub sources: Vec<VideoSource>,
    pub preview: Option<MediaPreviewImage>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalVideo {
    pub id: String,
    pub alt: Option<String>,
    pub media_content_type: Option<MediaContentType>,
    pub status: Option<String>,
    pub host: Option<String>,
    pub origin_url: Option<String>,
    pub embed_url: Option<String>,
    pub preview: Option<MediaPreviewImage>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Model3dSource {
    pub url: String,
    pub mime_type: Option<String>,
    pub format: Option<String>,
    pub filesize: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Model3d {
    pub id: String,
    pub alt: Option<String>,
    pub media_content_type: Option<MediaContentType>,
    pub status: Option<String>,
    pub filename: Option<String>,
    pub original_source: Option<Model3dSource>,
    pub sources: Vec<Model3dSource>,
    pub preview: Option<MediaPreviewImage>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MediaKind {
    Image,
    Video,
    ExternalVideo,
    Model3d,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "MediaImage",
            MediaKind::Video => "Video",
            MediaKind::ExternalVideo => "ExternalVideo",
            MediaKind::Model3d => "Model3d",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "__typename")]
pub enum Media {
    #[serde(rename = "MediaImage")]
    Image(MediaImage),
    Video(Video),
    ExternalVideo(ExternalVideo),
    Model3d(Model3d),
}

impl Media {
    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Image(_) => MediaKind::Image,
            Media::Video(_) => MediaKind::Video,
            Media::ExternalVideo(_) => MediaKind::ExternalVideo,
            Media::Model3d(_) => MediaKind::Model3d,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Media::Image(media) => &media.id,
            Media::Video(media) => &media.id,
            Media::ExternalVideo(media) => &media.id,
            Media::Model3d(media) => &media.id,
        }
    }

    pub fn alt(&self) -> Option<&str> {
        match self {
            Media::Image(media) => media.alt.as_deref(),
            Media::Video(media) => media.alt.as_deref(),
            Media::ExternalVideo(media) => media.alt.as_deref(),
            Media::Model3d(media) => media.alt.as_deref(),
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            Media::Image(media) => media.status.as_deref(),
            Media::Video(media) => media.status.as_deref(),
            Media::ExternalVideo(media) => media.status.as_deref(),
            Media::Model3d(media) => media.status.as_deref(),
        }
    }

    pub fn preview(&self) -> Option<&MediaPreviewImage> {
        match self {
            Media::Image(media) => media.preview.as_ref(),
            Media::Video(media) => media.preview.as_ref(),
            Media::ExternalVideo(media) => media.preview.as_ref(),
            Media::Model3d(media) => media.preview.as_ref(),
        }
    }
}

impl From<MediaImage> for Media {
    fn from(value: MediaImage) -> Self {
        Media::Image(value)
    }
}

impl From<Video> for Media {
    fn from(value: Video) -> Self {
        Media::Video(value)
    }
}

impl From<ExternalVideo> for Media {
    fn from(value: ExternalVideo) -> Self {
        Media::ExternalVideo(value)
    }
}

impl From<Model3d> for Media {
    fn from(value: Model3d) -> Self {
        Media::Model3d(value)
    }
}

pub static MEDIA_SHAPES: ShapeRegistry<Media> = ShapeRegistry::new(
    "Media",
    &[
        Shape {
            discriminator: "MediaImage",
            build: build_variant::<MediaImage, Media>,
        },
        Shape {
            discriminator: "Image",
            build: build_variant::<MediaImage, Media>,
        },
        Shape {
            discriminator: "Video",
            build: build_variant::<Video, Media>,
        },
        Shape {
            discriminator: "ExternalVideo",
            build: build_variant::<ExternalVideo, Media>,
        },
        Shape {
            discriminator: "Model3d",
            build: build_variant::<Model3d, Media>,
        },
    ],
);

impl Family for Media {
    const NAME: &'static str = "Media";

    fn decode_fields(decoder: &Decoder, fields: Fields) -> Result<Self, Error> {
        decoder.decode_polymorphic(fields, DiscriminatorRule::TYPENAME_OR_ID, &MEDIA_SHAPES)
    }
}

impl<'de> Deserialize<'de> for Media {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_family(deserializer)
    }
}
