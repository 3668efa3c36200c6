//! The `black.dds` default texture.
//!
//! Game shaders fall back to `art/defaultassets/black.dds`, which many
//! extractions lack. A 4x4 uncompressed black texture stands in for it.

use std::io::{self, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

/// Location of the default texture below the `resources` root.
pub const BLACK_DDS_PATH: &str = "art/defaultassets/black.dds";

const SIZE: u32 = 4;

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PITCH: u32 = 0x8;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDPF_ALPHAPIXELS: u32 = 0x1;
const DDPF_RGB: u32 = 0x40;
const DDSCAPS_TEXTURE: u32 = 0x1000;

/// Writes `black.dds` under `resources_root` unless present.
///
/// Returns true when the file was written.
pub fn ensure_black_dds(resources_root: &Path) -> io::Result<bool> {
    let path = resources_root.join(BLACK_DDS_PATH);
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(&path)?;
    write_black_dds(&mut file)?;
    file.flush()?;
    log::info!("placed {}", path.display());
    Ok(true)
}

/// Encodes a 4x4 opaque black A8R8G8B8 DDS texture.
pub fn write_black_dds<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"DDS ")?;

    // DDS_HEADER
    w.write_u32::<LittleEndian>(124)?;
    w.write_u32::<LittleEndian>(
        DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PITCH | DDSD_PIXELFORMAT,
    )?;
    w.write_u32::<LittleEndian>(SIZE)?; // height
    w.write_u32::<LittleEndian>(SIZE)?; // width
    w.write_u32::<LittleEndian>(SIZE * 4)?; // pitch
    w.write_u32::<LittleEndian>(0)?; // depth
    w.write_u32::<LittleEndian>(0)?; // mip count
    for _ in 0..11 {
        w.write_u32::<LittleEndian>(0)?;
    }

    // DDS_PIXELFORMAT
    w.write_u32::<LittleEndian>(32)?;
    w.write_u32::<LittleEndian>(DDPF_RGB | DDPF_ALPHAPIXELS)?;
    w.write_u32::<LittleEndian>(0)?; // fourCC
    w.write_u32::<LittleEndian>(32)?;
    w.write_u32::<LittleEndian>(0x00ff_0000)?;
    w.write_u32::<LittleEndian>(0x0000_ff00)?;
    w.write_u32::<LittleEndian>(0x0000_00ff)?;
    w.write_u32::<LittleEndian>(0xff00_0000)?;

    w.write_u32::<LittleEndian>(DDSCAPS_TEXTURE)?;
    for _ in 0..4 {
        w.write_u32::<LittleEndian>(0)?; // caps2..4, reserved2
    }

    for _ in 0..SIZE * SIZE {
        w.write_all(&[0, 0, 0, 0xff])?;
    }
    Ok(())
}
