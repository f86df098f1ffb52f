#![forbid(unsafe_code)]

//! Header cell of a timetable column.
//!
//! A [`ChannelTitleCell`] shows the channel logo at the column's current
//! width, with a resize gutter straddling its right edge.

use std::collections::HashMap;
use std::fmt;

/// Fixed header height.
pub const TITLE_HEIGHT: u32 = 72;
/// Inner padding around the logo.
pub const TITLE_PADDING: u32 = 14;
/// Left and right border width.
pub const TITLE_BORDER: u32 = 1;
/// Width of the resize gutter.
pub const GUTTER_WIDTH: u32 = 8;
/// How far the gutter extends past the cell's right edge.
pub const GUTTER_OVERHANG: u32 = 4;
/// Column width when none has been set.
pub const DEFAULT_COLUMN_WIDTH: u32 = 376;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub logo_url: String,
}

/// Channel lookup.
pub trait ChannelDirectory {
    fn channel_by_id(&self, id: &str) -> Option<Channel>;
}

impl ChannelDirectory for [Channel] {
    fn channel_by_id(&self, id: &str) -> Option<Channel> {
        self.iter().find(|channel| channel.id == id).cloned()
    }
}

impl ChannelDirectory for Vec<Channel> {
    fn channel_by_id(&self, id: &str) -> Option<Channel> {
        self.as_slice().channel_by_id(id)
    }
}

/// Per-column width lookup.
pub trait ColumnWidths {
    fn column_width(&self, channel_id: &str) -> u32;
}

/// Map-backed [`ColumnWidths`] with a fallback width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidthTable {
    widths: HashMap<String, u32>,
    default_width: u32,
}

impl Default for ColumnWidthTable {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH)
    }
}

impl ColumnWidthTable {
    pub fn new(default_width: u32) -> Self {
        Self {
            widths: HashMap::new(),
            default_width,
        }
    }

    pub fn set(&mut self, channel_id: impl Into<String>, width: u32) {
        self.widths.insert(channel_id.into(), width);
    }

    #[must_use]
    pub fn with_width(mut self, channel_id: impl Into<String>, width: u32) -> Self {
        self.set(channel_id, width);
        self
    }

    pub fn default_width(&self) -> u32 {
        self.default_width
    }
}

impl ColumnWidths for ColumnWidthTable {
    fn column_width(&self, channel_id: &str) -> u32 {
        self.widths
            .get(channel_id)
            .copied()
            .unwrap_or(self.default_width)
    }
}

/// Resize handle attached to a title cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GutterSlot {
    pub channel_id: String,
    pub width: u32,
    /// Distance the gutter extends past the right edge.
    pub overhang: u32,
    /// Drawn above the cell.
    pub above_cell: bool,
}

impl GutterSlot {
    /// Horizontal range covered by the gutter, relative to the cell's left
    /// edge.
    pub fn x_range(&self, cell_width: u32) -> std::ops::Range<u32> {
        let end = cell_width + self.overhang;
        end.saturating_sub(self.width)..end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelTitleCell {
    pub channel_id: String,
    pub logo_url: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub border: u32,
    pub draggable: bool,
    pub gutter: GutterSlot,
}

impl ChannelTitleCell {
    /// Box available to the logo once padding and borders are removed.
    pub fn logo_box(&self) -> (u32, u32) {
        let inset = 2 * self.padding;
        (
            self.width.saturating_sub(inset + 2 * self.border),
            self.height.saturating_sub(inset),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    UnknownChannel(String),
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel(id) => write!(f, "unknown channel: {id}"),
        }
    }
}

impl std::error::Error for TimetableError {}

/// Build the header cell for `channel_id`.
pub fn channel_title<D, W>(
    channel_id: &str,
    directory: &D,
    widths: &W,
) -> Result<ChannelTitleCell, TimetableError>
where
    D: ChannelDirectory + ?Sized,
    W: ColumnWidths + ?Sized,
{
    let channel = directory
        .channel_by_id(channel_id)
        .ok_or_else(|| TimetableError::UnknownChannel(channel_id.to_string()))?;

    Ok(ChannelTitleCell {
        channel_id: channel.id.clone(),
        width: widths.column_width(channel_id),
        height: TITLE_HEIGHT,
        padding: TITLE_PADDING,
        border: TITLE_BORDER,
        draggable: false,
        gutter: GutterSlot {
            channel_id: channel.id,
            width: GUTTER_WIDTH,
            overhang: GUTTER_OVERHANG,
            above_cell: true,
        },
        logo_url: channel.logo_url,
        alt: channel.name,
    })
}
