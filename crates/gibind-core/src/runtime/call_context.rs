//! The view a native callable gets of its argument frame.

use std::fmt;

use super::{NativeArg, NativeHeap, NativePtr, OutCell};
use crate::error::NativeError;

/// Context for one native call.
///
/// Bridges the marshaled frame and the native implementation: typed access to
/// in slots, write access to out cells, and the native heap for allocating
/// returned memory.
///
/// ## Slot layout
///
/// For methods, in slot 0 holds the receiver and `arg(0)` is the first
/// declared input. In slots of InOut parameters hold an [`OutCell`] address;
/// [`arg`](Self::arg) follows it so the callee reads the seeded value, and
/// [`set_arg`](Self::set_arg) writes through it.
///
/// ```ignore
/// let a = call.int(0)?;
/// call.set_out(0, NativeArg::Int(a * 2))?;
/// Ok(NativeArg::Int(a + 1))
/// ```
pub struct NativeCall<'a> {
    in_slots: &'a [NativeArg],
    out_slots: &'a [NativeArg],
    out_values: &'a mut [NativeArg],
    /// 1 for methods, where slot 0 is the receiver
    arg_offset: usize,
    heap: &'a mut NativeHeap,
}

impl<'a> NativeCall<'a> {
    pub fn new(
        in_slots: &'a [NativeArg],
        out_slots: &'a [NativeArg],
        out_values: &'a mut [NativeArg],
        arg_offset: usize,
        heap: &'a mut NativeHeap,
    ) -> Self {
        Self {
            in_slots,
            out_slots,
            out_values,
            arg_offset,
            heap,
        }
    }

    /// Number of in slots, excluding the receiver.
    pub fn in_count(&self) -> usize {
        self.in_slots.len().saturating_sub(self.arg_offset)
    }

    pub fn out_count(&self) -> usize {
        self.out_slots.len()
    }

    /// Native pointer of the receiver for method calls.
    pub fn this(&self) -> Result<NativePtr, NativeError> {
        if self.arg_offset == 0 {
            return Err(NativeError::other("function called without a receiver"));
        }

        self.in_slots
            .first()
            .and_then(NativeArg::as_pointer)
            .ok_or_else(|| NativeError::other("receiver slot does not hold a pointer"))
    }

    /// Raw in slot, without following InOut addresses.
    pub fn slot(&self, index: usize) -> Result<&NativeArg, NativeError> {
        self.in_slots
            .get(self.arg_offset + index)
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// Value of an input; InOut addresses are followed to their cell.
    pub fn arg(&self, index: usize) -> Result<&NativeArg, NativeError> {
        match self.slot(index)? {
            NativeArg::Address(cell) => self.cell(*cell),
            other => Ok(other),
        }
    }

    pub fn boolean(&self, index: usize) -> Result<bool, NativeError> {
        let arg = self.arg(index)?;
        arg.as_bool().ok_or_else(|| mismatch(index, "boolean", arg))
    }

    pub fn int(&self, index: usize) -> Result<i64, NativeError> {
        let arg = self.arg(index)?;
        arg.as_int().ok_or_else(|| mismatch(index, "int", arg))
    }

    pub fn uint(&self, index: usize) -> Result<u64, NativeError> {
        let arg = self.arg(index)?;
        arg.as_uint().ok_or_else(|| mismatch(index, "uint", arg))
    }

    pub fn double(&self, index: usize) -> Result<f64, NativeError> {
        let arg = self.arg(index)?;
        arg.as_double().ok_or_else(|| mismatch(index, "double", arg))
    }

    pub fn pointer(&self, index: usize) -> Result<NativePtr, NativeError> {
        let arg = self.arg(index)?;
        arg.as_pointer().ok_or_else(|| mismatch(index, "pointer", arg))
    }

    /// Borrow the string an input points at. A null pointer reads as `None`.
    pub fn string(&self, index: usize) -> Result<Option<&str>, NativeError> {
        let ptr = self.pointer(index)?;
        if ptr.is_null() {
            return Ok(None);
        }
        self.heap
            .string(ptr)
            .map(Some)
            .ok_or_else(|| NativeError::other(format!("argument {index} is not a live string")))
    }

    /// Write through the address of an InOut input.
    pub fn set_arg(&mut self, index: usize, value: NativeArg) -> Result<(), NativeError> {
        let cell = match self.slot(index)? {
            NativeArg::Address(cell) => *cell,
            other => return Err(mismatch(index, "address", other)),
        };
        *self.cell_mut(cell)? = value;
        Ok(())
    }

    /// Write the `index`-th output through its out slot.
    pub fn set_out(&mut self, index: usize, value: NativeArg) -> Result<(), NativeError> {
        let cell = self
            .out_slots
            .get(index)
            .and_then(NativeArg::as_address)
            .ok_or_else(|| {
                NativeError::other(format!(
                    "out argument {index} out of bounds (call has {} outputs)",
                    self.out_slots.len()
                ))
            })?;
        *self.cell_mut(cell)? = value;
        Ok(())
    }

    /// Current value of the `index`-th output cell.
    pub fn out(&self, index: usize) -> Result<&NativeArg, NativeError> {
        let cell = self
            .out_slots
            .get(index)
            .and_then(NativeArg::as_address)
            .ok_or_else(|| NativeError::other(format!("out argument {index} out of bounds")))?;
        self.cell(cell)
    }

    pub fn heap(&self) -> &NativeHeap {
        self.heap
    }

    pub fn heap_mut(&mut self) -> &mut NativeHeap {
        self.heap
    }

    fn cell(&self, cell: OutCell) -> Result<&NativeArg, NativeError> {
        self.out_values
            .get(cell.index())
            .ok_or_else(|| NativeError::other(format!("dangling out cell {}", cell.index())))
    }

    fn cell_mut(&mut self, cell: OutCell) -> Result<&mut NativeArg, NativeError> {
        self.out_values
            .get_mut(cell.index())
            .ok_or_else(|| NativeError::other(format!("dangling out cell {}", cell.index())))
    }

    fn out_of_bounds(&self, index: usize) -> NativeError {
        NativeError::other(format!(
            "argument index {index} out of bounds (call has {} inputs)",
            self.in_count()
        ))
    }
}

fn mismatch(index: usize, expected: &str, actual: &NativeArg) -> NativeError {
    NativeError::other(format!(
        "argument {index}: expected {expected}, got {}",
        actual.kind_name()
    ))
}

impl fmt::Debug for NativeCall<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeCall")
            .field("in_count", &self.in_count())
            .field("out_count", &self.out_count())
            .field("arg_offset", &self.arg_offset)
            .finish()
    }
}
