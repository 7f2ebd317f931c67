//! Template storage and labelled template sets.

use crate::image::{ImageView, OwnedImage};
use crate::util::{IconLocError, IconLocResult};

pub(crate) mod plan;

pub use plan::{TemplatePlan, NCC_EPSILON};

/// Owned template image in contiguous interleaved format.
#[derive(Clone, Debug)]
pub struct Template {
    img: OwnedImage,
}

impl Template {
    /// Creates a single-channel template from a contiguous buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> IconLocResult<Self> {
        Self::with_channels(data, width, height, 1)
    }

    /// Creates a template with `channels` interleaved values per pixel.
    pub fn with_channels(
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> IconLocResult<Self> {
        let img = OwnedImage::with_channels(data, width, height, channels)?;
        Ok(Self { img })
    }

    /// Copies a region of another image (typically the scene) into a template.
    pub fn from_view(view: ImageView<'_, u8>) -> IconLocResult<Self> {
        Ok(Self {
            img: OwnedImage::from_view(view)?,
        })
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    pub fn width(&self) -> usize {
        self.img.width()
    }

    pub fn height(&self) -> usize {
        self.img.height()
    }

    pub fn channels(&self) -> usize {
        self.img.channels()
    }
}

impl From<OwnedImage> for Template {
    fn from(img: OwnedImage) -> Self {
        Self { img }
    }
}

/// Insertion-ordered collection of uniquely labelled templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateSet {
    entries: Vec<(String, Template)>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template under `label`, rejecting labels already present.
    pub fn insert(&mut self, label: impl Into<String>, template: Template) -> IconLocResult<()> {
        let label = label.into();
        if self.get(&label).is_some() {
            return Err(IconLocError::DuplicateLabel { label });
        }
        self.entries.push((label, template));
        Ok(())
    }

    /// Builder-style variant of [`TemplateSet::insert`].
    pub fn with(mut self, label: impl Into<String>, template: Template) -> IconLocResult<Self> {
        self.insert(label, template)?;
        Ok(self)
    }

    pub fn get(&self, label: &str) -> Option<&Template> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, tpl)| tpl)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(label, template)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.entries.iter().map(|(l, tpl)| (l.as_str(), tpl))
    }
}
