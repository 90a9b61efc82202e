//! Result lifting and packaging.

use tracing::{debug, trace};

use gibind_core::{BridgeError, BridgeResult, CallableInfo, Dynamic, NativeArg};
use gibind_registry::MarshalContext;

use super::{NativeFrame, Signature};

/// Lift the return value and every output of a finished call.
///
/// Each value is lifted, then its native memory is released according to
/// its ownership mode. A failure does not stop the pass: every transferred
/// value is still released exactly once, values already lifted are dropped,
/// and the first error is returned.
pub fn lift_results(
    cx: &mut MarshalContext<'_>,
    info: &dyn CallableInfo,
    sig: &Signature,
    frame: &NativeFrame,
    return_value: &NativeArg,
) -> BridgeResult<Dynamic> {
    let mut results = Vec::with_capacity(sig.result_count(info));
    let mut first_error: Option<BridgeError> = None;

    let return_type = info.return_type();
    if !return_type.is_void() {
        match cx.from_native(return_value, return_type) {
            Ok(value) => results.push(value),
            Err(err) => {
                first_error.get_or_insert(err.into());
            }
        }
        if let Err(err) = cx.release(info.caller_owns(), return_type, return_value) {
            first_error.get_or_insert(err.into());
        }
    }

    let outputs = info.args().iter().filter(|arg| arg.direction.is_out());
    for (index, arg) in outputs.enumerate() {
        let Some(slot) = frame.output(index) else {
            first_error.get_or_insert(BridgeError::Conversion(
                gibind_core::ConversionError::failed(format!("missing output cell {index}")),
            ));
            continue;
        };

        match cx.from_native(slot, &arg.ty) {
            Ok(value) => results.push(value),
            Err(err) => {
                first_error.get_or_insert(err.into());
            }
        }

        trace!(arg = %arg.name, mode = %arg.transfer, "releasing output");
        if let Err(err) = cx.release(arg.transfer, &arg.ty, slot) {
            first_error.get_or_insert(err.into());
        }
    }

    if let Some(err) = first_error {
        debug!(callable = %info.name(), error = %err, "failed to lift results");
        cx.discard(&results);
        return Err(err);
    }

    package(cx, results)
}

/// Zero values are `undefined`, one is returned bare, more become an array.
pub fn package(cx: &mut MarshalContext<'_>, mut results: Vec<Dynamic>) -> BridgeResult<Dynamic> {
    match results.len() {
        0 => Ok(Dynamic::Undefined),
        1 => Ok(results.pop().unwrap_or_default()),
        _ => match cx.objects.new_array(results.clone()) {
            Ok(handle) => Ok(Dynamic::Object(handle)),
            Err(err) => {
                cx.discard(&results);
                Err(err)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibind_core::{HeapLimits, NativeHeap, ObjectHeap};
    use gibind_registry::ConverterRegistry;

    #[test]
    fn packaging_by_count() {
        let mut objects = ObjectHeap::new();
        let mut native = NativeHeap::new();
        let converters = ConverterRegistry::with_defaults();
        let mut cx = MarshalContext::new(&mut objects, &mut native, &converters);

        assert_eq!(package(&mut cx, vec![]).unwrap(), Dynamic::Undefined);
        assert_eq!(
            package(&mut cx, vec![Dynamic::Int(3)]).unwrap(),
            Dynamic::Int(3)
        );

        let packed = package(&mut cx, vec![Dynamic::Int(7), Dynamic::Int(2)]).unwrap();
        let handle = packed.as_object().unwrap();
        assert_eq!(
            cx.objects.get(handle).unwrap().elements(),
            Some(&[Dynamic::Int(7), Dynamic::Int(2)][..])
        );
    }

    #[test]
    fn packaging_failure_discards_lifted_objects() {
        let mut objects = ObjectHeap::with_limits(HeapLimits {
            max_objects: 1,
            ..HeapLimits::default()
        });
        let mut native = NativeHeap::new();
        let converters = ConverterRegistry::with_defaults();

        let inner = objects.new_plain().unwrap();
        let mut cx = MarshalContext::new(&mut objects, &mut native, &converters);
        let result = package(&mut cx, vec![Dynamic::Object(inner), Dynamic::Int(1)]);

        assert!(result.is_err());
        assert_eq!(objects.live_count(), 0);
    }
}
