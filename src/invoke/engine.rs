//! The invocation state machine.

use tracing::debug;

use gibind_core::{BridgeError, BridgeResult, CallableInfo, Dynamic, NativeCall};

use super::{NativeFrame, Signature, lift_results};
use crate::BridgeContext;

/// Call `info` with script arguments.
///
/// Classifies the parameters, builds the native frame, runs the native
/// function and lifts its results. Either a value or an error comes back,
/// never both; native memory the bridge acquired is released on every path.
pub fn invoke(
    ctx: &mut BridgeContext,
    info: &dyn CallableInfo,
    this: Option<&Dynamic>,
    args: &[Dynamic],
) -> BridgeResult<Dynamic> {
    let sig = Signature::analyze(info);

    debug!(
        "call is to {} {} with argc {}, expected: {} in args, {} out args, {} total args",
        info.kind(),
        info.name(),
        args.len(),
        sig.in_count,
        sig.out_count,
        sig.n_args,
    );

    let mut cx = ctx.marshal();
    let mut frame = NativeFrame::build(&mut cx, info, &sig, this, args)?;

    let outcome = {
        let mut call = NativeCall::new(
            &frame.in_slots,
            &frame.out_slots,
            &mut frame.out_values,
            sig.arg_offset(),
            &mut *cx.native,
        );
        info.invoke(&mut call)
    };

    frame.release_temporaries(&mut cx, info);

    match outcome {
        Ok(return_value) => {
            let lifted = lift_results(&mut cx, info, &sig, &frame, &return_value);
            frame.release_unclaimed_seeds(&mut cx, info);
            lifted
        }
        Err(source) => {
            debug!(callable = %info.name(), domain = %source.domain, code = source.code, "native call failed");
            frame.release_seeded(&mut cx, info);
            Err(BridgeError::Invocation {
                callable: info.name().clone(),
                source,
            })
        }
    }
}
