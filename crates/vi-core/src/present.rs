/// Presenter-side collaborator interface.
///
/// The VI decodes a frame descriptor once per refresh period and hands
/// it to the presenter together with a view of RDRAM. The presenter
/// owns the window/surface lifecycle and any GPU resources; the VI core
/// only triggers one-time setup at device-create time and releases the
/// presenter when the device is dropped.

/// Frame-buffer pixel encoding, from the low 2 bits of VI_STATUS_REG.
///
/// Selector 0 (blank) and 1 (reserved) never reach the presenter: blank
/// produces no frame and reserved is a modeled hardware fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16 bits per pixel, 5/5/5/1 RGBA, big-endian packed as stored by
    /// the console. Channel expansion is the presenter's job.
    Rgba5551,
    /// 32 bits per pixel, 8/8/8/8 RGBA in console-native byte order.
    Rgba8888,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgba5551 => 2,
            PixelFormat::Rgba8888 => 4,
        }
    }
}

/// A decoded frame, ready to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    pub format: PixelFormat,
    /// Source row width in pixels, including stride slack beyond the
    /// visible width.
    pub width: u32,
    pub height: u32,
    /// Byte offset of the frame buffer within RDRAM.
    pub offset: u32,
}

impl FrameDescriptor {
    pub fn bytes_per_pixel(&self) -> u32 {
        self.format.bytes_per_pixel()
    }

    /// Total bytes the presenter will read starting at `offset`.
    /// Widened before multiplying: the width already carries any stride
    /// slack and can approach the full 32-bit range.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel() as usize
    }
}

#[derive(Debug, thiserror::Error)]
#[error("surface setup failed: {0}")]
pub struct SurfaceError(pub String);

pub trait Presenter {
    /// One-time setup (e.g. acquiring a surface or frame texture),
    /// invoked exactly once when the device is created.
    fn acquire(&mut self) -> Result<(), SurfaceError>;

    /// Display a decoded frame. `rdram` is the system memory the
    /// descriptor's offset indexes into; the range
    /// `offset .. offset + byte_len()` is trusted to be in bounds.
    fn present(&mut self, frame: &FrameDescriptor, rdram: &[u8]);
}
