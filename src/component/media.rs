// src/component/media.rs

//! Icon and screenshot metadata
//!
//! Only metadata is carried here. Images are never fetched or decoded.

use super::LocaleMap;
use crate::pool::RefStr;
use std::sync::Arc;

/// Where an icon lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IconKind {
    #[default]
    Unknown,
    /// Themed icon name
    Stock,
    /// Pre-rendered icon in a catalog icon cache
    Cached,
    /// Absolute path on the local filesystem
    Local,
    /// URL to a remote image
    Remote,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Stock => "stock",
            Self::Cached => "cached",
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stock" => Some(Self::Stock),
            "cached" => Some(Self::Cached),
            "local" => Some(Self::Local),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Icon metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Icon {
    pub kind: IconKind,
    /// Icon name or file name
    pub name: Option<RefStr>,
    /// Path or URL for local/remote icons
    pub url: Option<RefStr>,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl Icon {
    /// Create an icon of a kind with a name
    pub fn new(kind: IconKind, name: &str) -> Self {
        Self {
            kind,
            name: Some(Arc::from(name)),
            scale: 1,
            ..Default::default()
        }
    }

    /// Set the rendered size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Whether two icons denote the same image
    pub fn same_icon(&self, other: &Icon) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.url == other.url
            && self.width == other.width
            && self.height == other.height
            && self.scale == other.scale
    }
}

/// Role of a screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenshotKind {
    #[default]
    Normal,
    /// The screenshot to show first
    Default,
}

impl ScreenshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Default => "default",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

/// Role of one image of a screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageKind {
    #[default]
    Unknown,
    Source,
    Thumbnail,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Source => "source",
            Self::Thumbnail => "thumbnail",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "source" => Some(Self::Source),
            "thumbnail" => Some(Self::Thumbnail),
            _ => None,
        }
    }
}

/// One rendition of a screenshot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    pub kind: ImageKind,
    pub url: RefStr,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(kind: ImageKind, url: &str) -> Self {
        Self {
            kind,
            url: Arc::from(url),
            width: 0,
            height: 0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Screenshot metadata
///
/// Two screenshots are the same when kind, caption and images all match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screenshot {
    pub kind: ScreenshotKind,
    pub caption: LocaleMap,
    pub images: Vec<Image>,
    pub priority: i32,
}

impl Screenshot {
    pub fn new(kind: ScreenshotKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_caption(mut self, locale: Option<&str>, caption: &str) -> Self {
        self.caption
            .insert(Arc::from(locale.unwrap_or("C")), Arc::from(caption));
        self
    }

    /// The full-size source image, if any
    pub fn source_image(&self) -> Option<&Image> {
        self.images.iter().find(|i| i.kind == ImageKind::Source)
    }

    /// Whether two entries are the same screenshot (priority is ignored)
    pub fn same_screenshot(&self, other: &Screenshot) -> bool {
        self.kind == other.kind && self.caption == other.caption && self.images == other.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_icon_includes_size() {
        let a = Icon::new(IconKind::Cached, "foo.png").with_size(64, 64);
        let b = Icon::new(IconKind::Cached, "foo.png").with_size(128, 128);
        assert!(a.same_icon(&a.clone()));
        assert!(!a.same_icon(&b));
    }

    #[test]
    fn test_same_screenshot_ignores_priority() {
        let image = Image::new(ImageKind::Source, "https://example.com/a.png");
        let mut a = Screenshot::new(ScreenshotKind::Default).with_image(image.clone());
        let b = Screenshot::new(ScreenshotKind::Default).with_image(image);
        a.priority = 10;
        assert!(a.same_screenshot(&b));
        assert!(a.source_image().is_some());
    }
}
