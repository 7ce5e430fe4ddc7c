//! Homepage carousel slides. A slide shows either an image or a video, so its upload
//! policy is the union of the two.

use super::{record_id, require};
use resource_framework::{AdminResource, FileField, UploadPolicy};
use serde::{Deserialize, Serialize};

record_id!(CarouselSlideId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSlide {
    pub id: CarouselSlideId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    pub media_type: MediaKind,
    pub media: String,
    /// Display position, lowest first.
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselSlideForm {
    pub title: String,
    pub subtitle: Option<String>,
    pub link: Option<String>,
    pub position: u32,
}

impl AdminResource for CarouselSlide {
    type Id = CarouselSlideId;
    type Payload = CarouselSlideForm;
    const COLLECTION: &'static str = "carousel";
    const LABEL: &'static str = "Slide";
    const FILE: Option<FileField> = Some(FileField::required("media"));

    fn id(&self) -> &CarouselSlideId {
        &self.id
    }

    fn to_payload(&self) -> CarouselSlideForm {
        CarouselSlideForm {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            link: self.link.clone(),
            position: self.position,
        }
    }

    fn validate(form: &CarouselSlideForm) -> Result<(), String> {
        require(&form.title, "Title is required")?;
        match form.link.as_deref().map(str::trim) {
            Some(link) if !link.is_empty() && !link.starts_with('/') && !link.starts_with("http") => {
                Err("Link must be a path or a URL".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// A slide takes an image or a video, each held to its own type list and size ceiling.
pub fn media_policies(images: &UploadPolicy, videos: &UploadPolicy) -> Vec<UploadPolicy> {
    vec![images.clone(), videos.clone()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::upload;

    #[test]
    fn test_each_media_kind_keeps_its_own_ceiling() {
        let policies = media_policies(&UploadPolicy::images(), &UploadPolicy::videos());
        let image = upload::select(&policies, "image/png").unwrap();
        let video = upload::select(&policies, "video/mp4").unwrap();
        assert_eq!(image.max_bytes, UploadPolicy::images().max_bytes);
        assert_eq!(video.max_bytes, UploadPolicy::videos().max_bytes);
        assert!(upload::select(&policies, "application/pdf").is_none());
    }

    #[test]
    fn test_media_type_uses_lowercase_names() {
        let slide: CarouselSlide = serde_json::from_str(
            r#"{"id": 1, "title": "Summer", "media_type": "video", "media": "/m/1.mp4"}"#,
        )
        .unwrap();
        assert_eq!(slide.media_type, MediaKind::Video);
        assert_eq!(slide.position, 0);
    }
}
