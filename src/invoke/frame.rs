//! Native argument frame construction.

use tracing::{debug, warn};

use gibind_core::{
    BridgeError, BridgeResult, CallableInfo, Direction, Dynamic, NativeArg, OutCell,
    OwnershipMode,
};
use gibind_registry::MarshalContext;

use super::Signature;

/// Native arguments for one call.
///
/// Out and InOut parameters each own one cell in `out_values`. The matching
/// `out_slots` entry holds the cell's address, and for InOut the in slot
/// holds the same address, so the callee reads the seeded input and writes
/// the output through one cell.
#[derive(Debug, Default)]
pub struct NativeFrame {
    pub in_slots: Vec<NativeArg>,
    pub out_slots: Vec<NativeArg>,
    pub out_values: Vec<NativeArg>,
    /// In-only values the bridge keeps ownership of: (parameter, slot)
    temporaries: Vec<(usize, NativeArg)>,
    /// InOut cells seeded by the bridge: (parameter, cell, seed)
    seeded: Vec<(usize, OutCell, NativeArg)>,
}

impl NativeFrame {
    /// Convert `args` into a frame for `info`.
    ///
    /// Too few arguments fail before anything is converted; extra arguments
    /// are ignored. A conversion failure stops the build, releases what was
    /// already converted and returns the converter's error.
    pub fn build(
        cx: &mut MarshalContext<'_>,
        info: &dyn CallableInfo,
        sig: &Signature,
        this: Option<&Dynamic>,
        args: &[Dynamic],
    ) -> BridgeResult<Self> {
        if args.len() < sig.in_count {
            return Err(BridgeError::Arity {
                kind: info.kind(),
                callable: info.name().clone(),
                expected: sig.in_count,
                actual: args.len(),
            });
        }

        let mut frame = NativeFrame {
            in_slots: Vec::with_capacity(sig.in_slots()),
            out_slots: Vec::with_capacity(sig.out_count),
            out_values: Vec::with_capacity(sig.out_count),
            temporaries: Vec::new(),
            seeded: Vec::new(),
        };

        if sig.is_method {
            frame.in_slots.push(receiver(cx, info, this)?);
        }

        let mut argv = args.iter();
        for (index, arg) in info.args().iter().enumerate() {
            if arg.direction == Direction::Out {
                let cell = OutCell::new(frame.out_values.len());
                frame.out_values.push(NativeArg::Void);
                frame.out_slots.push(NativeArg::Address(cell));
                continue;
            }

            // Arity was checked above, so every in parameter has an argument.
            let Some(value) = argv.next() else {
                break;
            };

            let slot = match cx.to_native(value, &arg.ty) {
                Ok(slot) => slot,
                Err(err) => {
                    debug!(
                        callable = %info.name(),
                        arg = %arg.name,
                        error = %err,
                        "argument conversion failed"
                    );
                    frame.release_acquired(cx, info);
                    return Err(err.into());
                }
            };

            if arg.direction == Direction::InOut {
                let cell = OutCell::new(frame.out_values.len());
                frame.out_values.push(slot.clone());
                frame.out_slots.push(NativeArg::Address(cell));
                frame.in_slots.push(NativeArg::Address(cell));
                frame.seeded.push((index, cell, slot));
            } else {
                if !arg.transfer.transfers() {
                    frame.temporaries.push((index, slot.clone()));
                }
                frame.in_slots.push(slot);
            }
        }

        Ok(frame)
    }

    /// Release In temporaries once the native call has returned.
    ///
    /// Release failures are logged; the call's own outcome is what gets
    /// reported.
    pub fn release_temporaries(&mut self, cx: &mut MarshalContext<'_>, info: &dyn CallableInfo) {
        for (index, slot) in self.temporaries.drain(..) {
            let Some(arg) = info.arg(index) else {
                continue;
            };
            if let Err(err) = cx.release(OwnershipMode::Everything, &arg.ty, &slot) {
                warn!(
                    callable = %info.name(),
                    arg = %arg.name,
                    error = %err,
                    "failed to release temporary argument"
                );
            }
        }
    }

    /// Release the seeded InOut inputs, for calls whose outputs will not be
    /// lifted.
    pub fn release_seeded(&mut self, cx: &mut MarshalContext<'_>, info: &dyn CallableInfo) {
        for (index, cell, _) in std::mem::take(&mut self.seeded) {
            let (Some(arg), Some(slot)) = (info.arg(index), self.out_values.get(cell.index()))
            else {
                continue;
            };
            if let Err(err) = cx.release(OwnershipMode::Everything, &arg.ty, slot) {
                warn!(
                    callable = %info.name(),
                    arg = %arg.name,
                    error = %err,
                    "failed to release inout argument"
                );
            }
        }
    }

    /// Release seeds the callee left in place, after a successful call's
    /// outputs were lifted.
    ///
    /// Lifting releases an InOut cell by the parameter's transfer, which
    /// leaves a bridge-owned seed alive when the parameter does not transfer.
    /// A cell the callee overwrote holds the callee's value instead, and the
    /// seed is the callee's to dispose of.
    pub fn release_unclaimed_seeds(
        &mut self,
        cx: &mut MarshalContext<'_>,
        info: &dyn CallableInfo,
    ) {
        for (index, cell, seed) in std::mem::take(&mut self.seeded) {
            let Some(arg) = info.arg(index) else {
                continue;
            };
            if arg.transfer.transfers() || self.out_values.get(cell.index()) != Some(&seed) {
                continue;
            }
            if let Err(err) = cx.release(OwnershipMode::Everything, &arg.ty, &seed) {
                warn!(
                    callable = %info.name(),
                    arg = %arg.name,
                    error = %err,
                    "failed to release inout seed"
                );
            }
        }
    }

    /// Everything the bridge converted so far, on a failed build.
    fn release_acquired(&mut self, cx: &mut MarshalContext<'_>, info: &dyn CallableInfo) {
        self.release_temporaries(cx, info);
        self.release_seeded(cx, info);
    }

    /// Value written to the `index`-th output cell.
    pub fn output(&self, index: usize) -> Option<&NativeArg> {
        let cell = self.out_slots.get(index)?.as_address()?;
        self.out_values.get(cell.index())
    }
}

/// Native pointer of the receiver wrapper.
fn receiver(
    cx: &MarshalContext<'_>,
    info: &dyn CallableInfo,
    this: Option<&Dynamic>,
) -> BridgeResult<NativeArg> {
    let invalid = |message: &str| BridgeError::InvalidThis {
        callable: info.name().clone(),
        message: message.to_string(),
    };

    let handle = match this {
        Some(Dynamic::Object(handle)) => *handle,
        Some(other) => return Err(invalid(&format!("expected an object, got {}", other.type_name()))),
        None => return Err(invalid("method called without a receiver")),
    };

    let object = cx
        .objects
        .get(handle)
        .ok_or_else(|| invalid("receiver object was freed"))?;
    let ptr = object
        .native()
        .ok_or_else(|| invalid(&format!("{} does not wrap a native object", object.kind().name())))?;

    if !cx.native.is_live(ptr) {
        return Err(invalid("receiver's native object was freed"));
    }
    Ok(NativeArg::Pointer(ptr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibind_core::{
        CallableDescriptor, ConversionError, NativeCall, NativeError, NativeHeap, ObjectHeap,
        TypeTag,
    };
    use gibind_registry::ConverterRegistry;

    fn noop(_: &mut NativeCall<'_>) -> Result<NativeArg, NativeError> {
        Ok(NativeArg::Void)
    }

    struct Heaps {
        objects: ObjectHeap,
        native: NativeHeap,
        converters: ConverterRegistry,
    }

    impl Heaps {
        fn new() -> Self {
            Self {
                objects: ObjectHeap::new(),
                native: NativeHeap::new(),
                converters: ConverterRegistry::with_defaults(),
            }
        }

        fn cx(&mut self) -> MarshalContext<'_> {
            MarshalContext::new(&mut self.objects, &mut self.native, &self.converters)
        }
    }

    #[test]
    fn inout_shares_one_cell() {
        let desc = CallableDescriptor::new("Demo.f", noop)
            .out_arg("first", TypeTag::Int32, OwnershipMode::None)
            .inout_arg("count", TypeTag::Int32, OwnershipMode::None);
        let sig = Signature::analyze(&desc);
        let mut heaps = Heaps::new();

        let frame =
            NativeFrame::build(&mut heaps.cx(), &desc, &sig, None, &[Dynamic::Int(4)]).unwrap();

        assert_eq!(frame.in_slots, vec![NativeArg::Address(OutCell::new(1))]);
        assert_eq!(
            frame.out_slots,
            vec![
                NativeArg::Address(OutCell::new(0)),
                NativeArg::Address(OutCell::new(1))
            ]
        );
        assert_eq!(frame.output(1), Some(&NativeArg::Int(4)));
    }

    #[test]
    fn arity_checked_before_conversion() {
        let desc = CallableDescriptor::new("Demo.pair", noop)
            .in_arg("a", TypeTag::Utf8)
            .in_arg("b", TypeTag::Utf8);
        let sig = Signature::analyze(&desc);
        let mut heaps = Heaps::new();

        let err = NativeFrame::build(&mut heaps.cx(), &desc, &sig, None, &[Dynamic::from("x")])
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Arity {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        assert_eq!(heaps.native.stats().allocations, 0);
    }

    #[test]
    fn failure_releases_earlier_arguments() {
        let desc = CallableDescriptor::new("Demo.mixed", noop)
            .in_arg("a", TypeTag::Utf8)
            .inout_arg("b", TypeTag::Utf8, OwnershipMode::None)
            .in_arg("c", TypeTag::Int32);
        let sig = Signature::analyze(&desc);
        let mut heaps = Heaps::new();

        let args = [Dynamic::from("a"), Dynamic::from("b"), Dynamic::from("c")];
        let err = NativeFrame::build(&mut heaps.cx(), &desc, &sig, None, &args).unwrap_err();

        assert!(matches!(
            err,
            BridgeError::Conversion(ConversionError::TypeMismatch { .. })
        ));
        assert_eq!(heaps.native.stats().allocations, 2);
        assert_eq!(heaps.native.stats().frees, 2);
        assert_eq!(heaps.native.live_count(), 0);
    }

    #[test]
    fn method_requires_wrapper() {
        let desc = CallableDescriptor::new("Demo.Obj.f", noop).method();
        let sig = Signature::analyze(&desc);
        let mut heaps = Heaps::new();
        let plain = heaps.objects.new_plain().unwrap();

        let err = NativeFrame::build(&mut heaps.cx(), &desc, &sig, Some(&Dynamic::Object(plain)), &[])
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidThis { .. }));

        let err = NativeFrame::build(&mut heaps.cx(), &desc, &sig, None, &[]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidThis { .. }));
    }

    #[test]
    fn transferred_inputs_are_not_temporaries() {
        let desc = CallableDescriptor::new("Demo.take", noop).with_arg(
            gibind_core::ArgDescriptor::input("s", TypeTag::Utf8)
                .with_transfer(OwnershipMode::Everything),
        );
        let sig = Signature::analyze(&desc);
        let mut heaps = Heaps::new();

        let mut frame =
            NativeFrame::build(&mut heaps.cx(), &desc, &sig, None, &[Dynamic::from("s")]).unwrap();
        frame.release_temporaries(&mut heaps.cx(), &desc);
        assert_eq!(heaps.native.live_count(), 1);
    }
}
