/// Bus-side collaborator interface.
///
/// The VI never owns the bus; it is handed `&mut` into the calls that
/// need it (register writes and the cycle step). The bus aggregates RCP
/// interrupts into the CPU's interrupt line and owns RDRAM.

/// The six RCP interrupt lines. This device only ever touches `VI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RcpInterrupt {
    SP = 0,
    SI = 1,
    AI = 2,
    VI = 3,
    PI = 4,
    DP = 5,
}

pub trait RcpBus {
    fn raise_interrupt(&mut self, intr: RcpInterrupt);
    fn clear_interrupt(&mut self, intr: RcpInterrupt);

    /// System memory (RDRAM). Frame-buffer byte offsets index into this
    /// slice; range validation is the bus's responsibility, not the VI's.
    fn rdram(&self) -> &[u8];
}
