//! Parameter classification.

use gibind_core::CallableInfo;

/// Slot counts of one callable, computed in a single pass over its
/// parameters.
///
/// `in_count` is the number of script arguments the call consumes; the
/// native frame has [`in_slots`](Self::in_slots) entries, one more for
/// methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub is_method: bool,
    /// Declared parameters, receiver excluded
    pub n_args: usize,
    /// In and InOut parameters
    pub in_count: usize,
    /// Out and InOut parameters
    pub out_count: usize,
}

impl Signature {
    pub fn analyze(info: &dyn CallableInfo) -> Self {
        let mut in_count = 0;
        let mut out_count = 0;

        for arg in info.args() {
            if arg.direction.is_in() {
                in_count += 1;
            }
            if arg.direction.is_out() {
                out_count += 1;
            }
        }

        Self {
            is_method: info.is_method(),
            n_args: info.n_args(),
            in_count,
            out_count,
        }
    }

    /// Native in slots, receiver included.
    pub fn in_slots(&self) -> usize {
        self.in_count + self.arg_offset()
    }

    /// Index of the first declared input in the in slots.
    pub fn arg_offset(&self) -> usize {
        usize::from(self.is_method)
    }

    /// Values the call produces: the return value (if not void) and every
    /// output.
    pub fn result_count(&self, info: &dyn CallableInfo) -> usize {
        self.out_count + usize::from(!info.return_type().is_void())
    }
}
