//! Image File Directory (IFD) structures
//!
//! An IFD stores the metadata for one image in a TIFF file as a series of
//! tag entries. The viewer only ever reads the first IFD of an asset:
//! overlay rasters are single-image files.

use std::collections::HashMap;

use crate::geotiff::constants::{field_types, tags};

/// Represents an entry in an Image File Directory
///
/// Each entry describes one aspect of the image (dimensions, sample layout,
/// compression, georeferencing) as a tag-value pair. For small values the
/// value_offset field holds the value itself; otherwise it is a file offset.
#[derive(Debug, Clone)]
pub struct IfdEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value or offset to values
    pub value_offset: u64,
}

impl IfdEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        Self {
            tag,
            field_type,
            count,
            value_offset,
        }
    }

    /// Get the size in bytes of a single value of this entry's field type
    pub fn field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            _ => 1,
        }
    }

    /// Determines whether the value fits inline in the value_offset field
    ///
    /// Classic TIFF stores values of up to 4 bytes directly in the entry
    /// rather than at a separate offset.
    pub fn is_value_inline(&self) -> bool {
        self.field_type_size() * self.count as usize <= 4
    }
}

/// Represents the first Image File Directory of a raster asset
#[derive(Debug, Clone)]
pub struct Ifd {
    /// Entries in this IFD
    pub entries: Vec<IfdEntry>,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Cached tag values for quick lookup
    tag_map: HashMap<u16, IfdEntry>,
}

impl Ifd {
    /// Creates a new empty IFD at the given file offset
    pub fn new(offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry and updates the tag lookup cache
    pub fn add_entry(&mut self, entry: IfdEntry) {
        self.tag_map.insert(entry.tag, entry.clone());
        self.entries.push(entry);
    }

    /// Gets a tag's value_offset field directly
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.tag_map.get(&tag).map(|entry| entry.value_offset)
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IfdEntry> {
        self.tag_map.get(&tag)
    }

    /// Gets the dimensions of the image described by this IFD
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width as u32, height as u32))
    }

    /// Returns samples per pixel (default 1 if not specified)
    pub fn samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }
}
