//! Register image decoding for SD and MMC cards.

/// Bus family selection shared by every decoder.
pub mod bus;
pub use bus::BusFamily;

/// Decode error taxonomy.
pub mod error;
pub use error::DecodeError;

/// Hex image to bitstream conversion.
pub mod bits;
pub use bits::Bitstream;

/// Declarative field layouts and the bit-field extraction engine.
pub mod layout;
pub use layout::{extract, FieldKind, FieldSpec, FieldValue, Fields};

/// Manufacturer identifier tables.
pub mod ids;
pub use ids::{manufacturer_name, ManufacturerEntry, MMC_MANUFACTURERS, SD_MANUFACTURERS};

/// Enumerated-value and unit lookup tables.
pub mod tables;

/// Report assembly and detail modes.
pub mod report;
pub use report::{Report, ReportMode};

/// Card identification register decoding.
pub mod cid;
pub use cid::{decode_cid, MmcCid, SdCid, MMC_CID_LAYOUT, SD_CID_LAYOUT};

/// Card-specific data register decoding.
pub mod csd;
pub use csd::{
    decode_csd, Capacity, MmcCsd, SdCsd, SdCsdVersion, MMC_CSD_LAYOUT, SD_CSD_V0_LAYOUT,
    SD_CSD_V1_LAYOUT,
};

/// SD card configuration register decoding.
pub mod scr;
pub use scr::{decode_scr, SdScr, SD_SCR_LAYOUT};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
