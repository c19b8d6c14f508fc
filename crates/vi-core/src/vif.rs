/// VI — Video Interface.
///
/// Register-mapped device model: owns the register file, the
/// per-refresh interrupt down-counter, and the cached render area.
/// Stepped one RCP cycle at a time by the host; on counter expiry it
/// decodes the current frame buffer, hands it to the presenter, and
/// raises the VI interrupt on the bus.
///
/// Registers at physical 0x0440_0000.

use std::time::Instant;

use crate::bus::{RcpBus, RcpInterrupt};
use crate::decode;
use crate::geometry::{self, GeometryVariant, RenderArea};
use crate::present::{Presenter, SurfaceError};
use crate::regs::{ViRegister, WriteEffect, NUM_VI_REGISTERS};

/// RCP clock in Hz; the VI is stepped once per RCP cycle.
pub const RCP_CLOCK_HZ: u64 = 62_500_000;
pub const REFRESH_RATE_HZ: u64 = 60;
/// Cycles between VI interrupts.
pub const VI_INTR_PERIOD: u64 = RCP_CLOCK_HZ / REFRESH_RATE_HZ + 1;

/// Throughput is reported once per this many produced frames.
const RATE_SAMPLE_FRAMES: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ViError {
    #[error("address {addr:#010X} is outside the VI register window")]
    AddressOutOfRange { addr: u32 },
    #[error("reserved pixel format selected (VI_STATUS_REG = {status:#010X})")]
    ReservedFormat { status: u32 },
    #[error("presenter setup failed: {0}")]
    Surface(#[from] SurfaceError),
}

pub struct ViController<P: Presenter> {
    regs: [u32; NUM_VI_REGISTERS],
    cycles_until_intr: u64,
    render_area: RenderArea,
    variant: GeometryVariant,
    presenter: P,
    /// Frames produced since the last throughput report.
    frame_count: u32,
    rate_mark: Instant,
}

impl<P: Presenter> ViController<P> {
    /// Create the device: registers zeroed, counter at a full refresh
    /// period, presenter surface acquired. A setup failure returns the
    /// error with no partially constructed device behind it.
    pub fn new(variant: GeometryVariant, mut presenter: P) -> Result<Self, ViError> {
        log::debug!("initializing VI ({variant:?})");
        presenter.acquire()?;

        let regs = [0u32; NUM_VI_REGISTERS];
        Ok(Self {
            regs,
            cycles_until_intr: VI_INTR_PERIOD,
            render_area: geometry::derive_render_area(&regs, variant),
            variant,
            presenter,
            frame_count: 0,
            rate_mark: Instant::now(),
        })
    }

    /// Read a VI register. `&mut self` because VI_CURRENT_REG is
    /// synthesized from the counter position and written back into its
    /// slot, as the hardware's live scan position.
    pub fn read_u32(&mut self, addr: u32) -> Result<u32, ViError> {
        let reg = ViRegister::from_address(addr).ok_or(ViError::AddressOutOfRange { addr })?;

        if reg == ViRegister::Current {
            self.regs[reg as usize] = self.current_scanline();
        }

        let val = self.regs[reg as usize];
        log::trace!("VI read [{}] -> {val:#010X}", reg.mnemonic());
        Ok(val)
    }

    /// Write a VI register, dispatching through the per-register effect
    /// table. A VI_CURRENT_REG write stores nothing and acknowledges
    /// the pending VI interrupt; geometry-register writes refresh the
    /// cached render area.
    pub fn write_u32<B: RcpBus>(&mut self, addr: u32, val: u32, bus: &mut B) -> Result<(), ViError> {
        let reg = ViRegister::from_address(addr).ok_or(ViError::AddressOutOfRange { addr })?;
        log::trace!("VI write [{}] = {val:#010X}", reg.mnemonic());

        match reg.write_effect() {
            WriteEffect::Store => self.regs[reg as usize] = val,
            WriteEffect::StoreAndReshape => {
                self.regs[reg as usize] = val;
                self.render_area = geometry::derive_render_area(&self.regs, self.variant);
            }
            WriteEffect::AckInterrupt => bus.clear_interrupt(RcpInterrupt::VI),
        }
        Ok(())
    }

    /// Advance the VI by one RCP cycle. On counter expiry: decode and
    /// present the frame (if there is one), raise the VI interrupt, and
    /// reload the counter. The interrupt fires on schedule whether or
    /// not a frame was produced; deassertion happens only through the
    /// VI_CURRENT_REG write effect.
    pub fn cycle<B: RcpBus>(&mut self, bus: &mut B) -> Result<(), ViError> {
        if self.cycles_until_intr == 0 {
            self.frame_count += 1;
            if self.frame_count == RATE_SAMPLE_FRAMES {
                self.log_throughput();
                self.frame_count = 0;
                self.rate_mark = Instant::now();
            }

            self.produce_frame(bus)?;

            bus.raise_interrupt(RcpInterrupt::VI);
            self.cycles_until_intr = VI_INTR_PERIOD;
        }

        self.cycles_until_intr -= 1;
        Ok(())
    }

    pub fn render_area(&self) -> &RenderArea {
        &self.render_area
    }

    pub fn variant(&self) -> GeometryVariant {
        self.variant
    }

    /// Raw register value, bypassing read side effects. For host
    /// introspection (frontends, debuggers).
    pub fn reg(&self, reg: ViRegister) -> u32 {
        self.regs[reg as usize]
    }

    fn produce_frame<B: RcpBus>(&mut self, bus: &mut B) -> Result<(), ViError> {
        let area = &self.render_area;
        log::debug!(
            "VI refresh: x {}..{}, y {}..{}, {}x{}, hskip {}",
            area.x.start, area.x.end, area.y.start, area.y.end,
            area.width, area.height, area.hskip,
        );

        let status = self.regs[ViRegister::Status as usize];
        let origin = self.regs[ViRegister::Origin as usize];
        match decode::decode_frame(status, origin, area, self.variant)? {
            Some(frame) => {
                log::debug!(
                    "presenting {:?} frame {}x{} at RDRAM {:#08X}",
                    frame.format, frame.width, frame.height, frame.offset,
                );
                self.presenter.present(&frame, bus.rdram());
            }
            None => log::trace!("no frame this refresh"),
        }
        Ok(())
    }

    /// Live scan position: elapsed cycles within the current refresh
    /// period, scaled into 0..VI_V_SYNC scanlines and masked to an even
    /// value. Reads as zero until VI_V_SYNC_REG is configured.
    fn current_scanline(&self) -> u32 {
        let v_sync = self.regs[ViRegister::VSync as usize] as u64;
        if v_sync == 0 {
            return 0;
        }
        let cycles_per_line = VI_INTR_PERIOD / v_sync;
        if cycles_per_line == 0 {
            // VI_V_SYNC larger than the refresh period itself.
            return 0;
        }

        let elapsed = VI_INTR_PERIOD - self.cycles_until_intr;
        ((elapsed / cycles_per_line) as u32) & !1
    }

    fn log_throughput(&self) {
        let elapsed = self.rate_mark.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return;
        }
        let vis = RATE_SAMPLE_FRAMES as f64 / elapsed;
        let rcp_hz = (VI_INTR_PERIOD * RATE_SAMPLE_FRAMES as u64) as f64 / elapsed;
        log::info!(
            "{vis:.2} VI/s, RCP: {:.2} MHz, VR4300: {:.2} MHz",
            rcp_hz / 1e6,
            rcp_hz * 1.5 / 1e6,
        );
    }
}
