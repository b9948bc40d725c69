//! Static manufacturer ID tables, one per bus family.
//!
//! The tables are compiled-in data; adding an entry is a data change, not
//! a runtime interface. An ID absent from its table is a valid "Unlisted"
//! outcome, never an error.

use crate::bus::BusFamily;

/// One manufacturer table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerEntry {
    /// Manufacturer ID as reported in the identity register.
    pub id: u32,
    /// Manufacturer name(s) associated with the ID.
    pub name: &'static str,
}

const fn entry(id: u32, name: &'static str) -> ManufacturerEntry {
    ManufacturerEntry { id, name }
}

/// Known SD-family manufacturer IDs.
pub static SD_MANUFACTURERS: &[ManufacturerEntry] = &[
    entry(0x01, "Panasonic"),
    entry(0x02, "Toshiba/Kingston/Viking"),
    entry(0x03, "SanDisk"),
    entry(0x08, "Silicon Power"),
    entry(0x18, "Infineon"),
    entry(0x1b, "Transcend/Samsung"),
    entry(0x1c, "Transcend"),
    entry(0x1d, "Corsair/AData"),
    entry(0x1e, "Transcend"),
    entry(0x1f, "Kingston"),
    entry(0x27, "Delkin/Phison"),
    entry(0x28, "Lexar"),
    entry(0x30, "SanDisk"),
    entry(0x31, "Silicon Power"),
    entry(0x33, "STMicroelectronics"),
    entry(0x41, "Kingston"),
    entry(0x6f, "STMicroelectronics"),
    entry(0x74, "Transcend"),
    entry(0x76, "Patriot"),
    entry(0x82, "Gobe/Sony"),
    entry(0x89, "Unknown"),
];

/// Known MMC-family manufacturer IDs.
pub static MMC_MANUFACTURERS: &[ManufacturerEntry] = &[
    entry(0x00, "SanDisk"),
    entry(0x02, "Kingston/SanDisk"),
    entry(0x03, "Toshiba"),
    entry(0x05, "Unknown"),
    entry(0x06, "Unknown"),
    entry(0x11, "Toshiba"),
    entry(0x13, "Micron"),
    entry(0x15, "Samsung/SanDisk/LG"),
    entry(0x37, "KingMax"),
    entry(0x44, "ATP"),
    entry(0x45, "SanDisk Corporation"),
    entry(0x2c, "Kingston"),
    entry(0x70, "Kingston"),
    entry(0xfe, "Micron"),
];

/// Looks up the manufacturer name for `id` in the family's table.
#[must_use]
pub fn manufacturer_name(bus: BusFamily, id: u32) -> Option<&'static str> {
    let table = match bus {
        BusFamily::Sd => SD_MANUFACTURERS,
        BusFamily::Mmc => MMC_MANUFACTURERS,
    };
    table.iter().find(|entry| entry.id == id).map(|entry| entry.name)
}
