//! Domain entities for the Practices domain
//!
//! A practice is assembled from a title, a rich-text description, one
//! required video, an optional preview image and any number of documents.
//! Files are described by `FileDescriptor` when picked and become
//! `AssetReference`s once the staging manager accepts them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use practica_publisher::AssetSummary;

/// Advisory upper bound shown next to the video picker (500MB)
pub const MAX_VIDEO_SIZE_BYTES: u64 = 500 * 1024 * 1024;

/// Extensions offered by the documents picker
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Opaque identifier of a staged asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Slot an asset occupies in a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Preview,
    Video,
    Document,
}

impl AssetKind {
    /// Whether staging this kind allocates a local preview handle
    pub fn has_preview_handle(&self) -> bool {
        matches!(self, Self::Preview | Self::Video)
    }

    /// Accept filter offered to the file picker (advisory)
    pub fn accept_filter(&self) -> &'static str {
        match self {
            Self::Preview => "image/*",
            Self::Video => "video/*",
            Self::Document => ".pdf,.doc,.docx,.xls,.xlsx,.ppt,.pptx",
        }
    }

    /// MIME top-level type a file must declare for this slot, if any
    pub fn required_mime_category(&self) -> Option<&'static str> {
        match self {
            Self::Preview => Some("image"),
            Self::Video => Some("video"),
            Self::Document => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preview => write!(f, "preview"),
            Self::Video => write!(f, "video"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// A file as reported by the picker, before staging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Lowercased text after the last dot of the file name
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// Top-level MIME type, ignoring undeclared and catch-all types
    pub fn mime_category(&self) -> Option<&str> {
        let mime = self.mime_type.as_deref()?.trim();
        if mime.is_empty() || mime.eq_ignore_ascii_case("application/octet-stream") {
            return None;
        }
        mime.split('/').next().filter(|category| !category.is_empty())
    }
}

/// Revocable local handle used to render a preview of a staged file
///
/// Holding a handle grants no authority to revoke it; only the staging
/// manager that allocated it can.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A staged file attached to a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    pub id: AssetId,
    pub kind: AssetKind,
    pub original_name: String,
    pub size_bytes: u64,
    pub preview_handle: Option<PreviewHandle>,
}

impl AssetReference {
    /// Icon category and human-readable size for list rendering
    pub fn describe(&self) -> AssetDescription {
        AssetDescription {
            icon: IconCategory::from_file_name(&self.original_name),
            human_size: human_size(self.size_bytes),
        }
    }

    /// Name and size as delivered in a submission
    pub fn summary(&self) -> AssetSummary {
        AssetSummary::new(self.original_name.clone(), self.size_bytes)
    }
}

/// Icon shown next to an attached file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconCategory {
    PdfDoc,
    WordDoc,
    Sheet,
    Slide,
    Image,
    Generic,
}

impl IconCategory {
    /// Derive the icon from a file name's extension (case-insensitive)
    pub fn from_file_name(name: &str) -> Self {
        match extension_of(name).as_deref() {
            Some("pdf") => Self::PdfDoc,
            Some("doc" | "docx") => Self::WordDoc,
            Some("xls" | "xlsx") => Self::Sheet,
            Some("ppt" | "pptx") => Self::Slide,
            Some("jpg" | "jpeg" | "png" | "gif") => Self::Image,
            _ => Self::Generic,
        }
    }
}

impl fmt::Display for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PdfDoc => write!(f, "pdf-doc"),
            Self::WordDoc => write!(f, "word-doc"),
            Self::Sheet => write!(f, "sheet"),
            Self::Slide => write!(f, "slide"),
            Self::Image => write!(f, "image"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// Rendering hints for an attached file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescription {
    pub icon: IconCategory,
    pub human_size: String,
}

/// Format a byte count with base-1024 units, rounded to two decimals
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let scaled = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// The practice being assembled
///
/// Title and description are set directly; asset slots change only
/// through `AssetStagingManager`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDraft {
    title: String,
    description: String,
    preview: Option<AssetReference>,
    video: Option<AssetReference>,
    documents: Vec<AssetReference>,
}

impl ContentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Rich-text markup as produced by the editor
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn preview(&self) -> Option<&AssetReference> {
        self.preview.as_ref()
    }

    pub fn video(&self) -> Option<&AssetReference> {
        self.video.as_ref()
    }

    /// Documents in the order they were attached
    pub fn documents(&self) -> &[AssetReference] {
        &self.documents
    }

    pub(crate) fn replace_slot(
        &mut self,
        kind: AssetKind,
        asset: Option<AssetReference>,
    ) -> Option<AssetReference> {
        match kind {
            AssetKind::Preview => std::mem::replace(&mut self.preview, asset),
            AssetKind::Video => std::mem::replace(&mut self.video, asset),
            AssetKind::Document => None,
        }
    }

    pub(crate) fn push_document(&mut self, asset: AssetReference) {
        self.documents.push(asset);
    }

    pub(crate) fn take_asset(&mut self, id: AssetId) -> Option<AssetReference> {
        if self.preview.as_ref().is_some_and(|a| a.id == id) {
            return self.preview.take();
        }
        if self.video.as_ref().is_some_and(|a| a.id == id) {
            return self.video.take();
        }
        let position = self.documents.iter().position(|a| a.id == id)?;
        Some(self.documents.remove(position))
    }
}
