//! # Chunked Raster Transmission
//!
//! Thermal printers have small receive buffers; one `GS v 0` command for a
//! tall image overflows them and the tail prints as garbage. Images are
//! therefore sent as horizontal strips with a pause after each one.
//!
//! ```text
//! rows 0..60    ─► GS v 0 ─► sleep strip_delay
//! rows 60..120  ─► GS v 0 ─► sleep strip_delay
//! rows 120..150 ─► GS v 0 ─► sleep strip_delay
//! LF            ─► sleep trailing_delay
//! ```

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::TicketeraError;
use crate::protocol::{commands, graphics};
use crate::render::dither::Monochrome;
use crate::transport::PrintHandle;

/// Default strip height in rows.
pub const STRIP_HEIGHT: u32 = 60;

/// Strip size and delays for raster transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Rows per strip. Zero is treated as one.
    pub strip_height: u32,
    /// Pause after each strip.
    pub strip_delay: Duration,
    /// Pause after the trailing line feed.
    pub trailing_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            strip_height: STRIP_HEIGHT,
            strip_delay: Duration::from_millis(150),
            trailing_delay: Duration::from_millis(100),
        }
    }
}

impl Pacing {
    /// Default strips, no sleeping.
    pub fn immediate() -> Self {
        Self {
            strip_height: STRIP_HEIGHT,
            strip_delay: Duration::ZERO,
            trailing_delay: Duration::ZERO,
        }
    }
}

/// A band of rows `top..top + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    pub top: u32,
    pub height: u32,
}

/// Partition `0..total_height` into consecutive strips of at most
/// `strip_height` rows.
///
/// ```
/// use ticketera::job::transmit::{strips, Strip};
///
/// let s: Vec<Strip> = strips(150, 60).collect();
/// assert_eq!(s, vec![
///     Strip { top: 0, height: 60 },
///     Strip { top: 60, height: 60 },
///     Strip { top: 120, height: 30 },
/// ]);
/// ```
pub fn strips(total_height: u32, strip_height: u32) -> impl Iterator<Item = Strip> {
    let step = strip_height.max(1);
    (0..total_height).step_by(step as usize).map(move |top| Strip {
        top,
        height: step.min(total_height - top),
    })
}

/// Raster command for one strip of `bitmap`.
pub fn encode_strip(bitmap: &Monochrome, strip: Strip) -> Result<Vec<u8>, TicketeraError> {
    let width_bytes = u16::try_from(bitmap.width_bytes()).map_err(|_| {
        TicketeraError::Transport(format!("raster width {} bytes is too wide", bitmap.width_bytes()))
    })?;
    let height = u16::try_from(strip.height).map_err(|_| {
        TicketeraError::Transport(format!("strip height {} is too tall", strip.height))
    })?;
    let data = bitmap.pack_rows(strip.top, strip.top + strip.height);
    Ok(graphics::raster(width_bytes, height, &data))
}

/// Send `bitmap` as paced strips followed by the safety line feed.
///
/// Returns the number of strips written. Any write failure aborts the
/// transmission and is returned as is.
pub fn send_image(
    handle: &mut dyn PrintHandle,
    bitmap: &Monochrome,
    pacing: &Pacing,
) -> Result<usize, TicketeraError> {
    let mut sent = 0;
    for strip in strips(bitmap.height(), pacing.strip_height) {
        let command = encode_strip(bitmap, strip)?;
        handle.write(&command)?;
        debug!(top = strip.top, rows = strip.height, bytes = command.len(), "strip sent");
        sent += 1;
        pause(pacing.strip_delay);
    }

    handle.write(&commands::line_feeds(1))?;
    pause(pacing.trailing_delay);
    Ok(sent)
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
