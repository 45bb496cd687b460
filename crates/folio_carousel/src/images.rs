// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image references shown by a carousel.

use crate::CarouselError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reference to one carousel image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageRef {
    /// Remote image fetched over http(s)
    Url(String),
    /// Image file on disk
    Path(PathBuf),
}

impl ImageRef {
    /// Parse a reference; anything with an http(s) scheme is a URL
    pub fn parse(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            ImageRef::Url(reference)
        } else {
            ImageRef::Path(PathBuf::from(reference))
        }
    }

    /// Stable key used for texture caching
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Local path, if this is a file reference
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ImageRef::Path(path) => Some(path),
            ImageRef::Url(_) => None,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Url(url) => f.write_str(url),
            ImageRef::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self::parse(value)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.to_string()
    }
}

/// Ordered, non-empty, immutable list of images
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageList {
    images: Arc<[ImageRef]>,
}

impl ImageList {
    /// Create a list; an empty list is a configuration error
    pub fn new(images: Vec<ImageRef>) -> Result<Self, CarouselError> {
        if images.is_empty() {
            return Err(CarouselError::EmptyImageList);
        }
        Ok(Self {
            images: images.into(),
        })
    }

    /// Create a list from string references
    pub fn from_refs<I, S>(references: I) -> Result<Self, CarouselError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(references.into_iter().map(ImageRef::parse).collect())
    }

    /// Number of images (at least one)
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image at `index`, wrapping out-of-range indices
    pub fn get(&self, index: usize) -> &ImageRef {
        &self.images[index % self.images.len()]
    }

    /// Iterate over the images in order
    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter()
    }

    /// Whether both lists share the same storage
    pub fn ptr_eq(&self, other: &ImageList) -> bool {
        Arc::ptr_eq(&self.images, &other.images)
    }
}
