use crate::io::Io;
use crate::memory::Memory;

/// The combined memory and I/O port address spaces a running CPU needs,
/// bundled into the single handle `Z80::step` drives each instruction
/// through. Any type implementing both [`Memory`] and [`Io`] gets this for
/// free.
pub trait Bus: Memory + Io {}

impl<T: Memory + Io> Bus for T {}
