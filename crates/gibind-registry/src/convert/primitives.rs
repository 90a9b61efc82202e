//! Scalar converters: void, boolean, integers and floating point.

use gibind_core::{ConversionError, Dynamic, NativeArg, TypeDescriptor, TypeTag};

use crate::{MarshalContext, TypeConverter};

fn mismatch(expected: &'static str, actual: &'static str) -> ConversionError {
    ConversionError::TypeMismatch { expected, actual }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VoidConverter;

impl TypeConverter for VoidConverter {
    fn to_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        _value: &Dynamic,
        _ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        Ok(NativeArg::Void)
    }

    fn from_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        _slot: &NativeArg,
        _ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        Ok(Dynamic::Undefined)
    }
}

/// Truthiness in, `gboolean` out.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl TypeConverter for BooleanConverter {
    fn to_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        let b = match value {
            Dynamic::Bool(b) => *b,
            Dynamic::Int(i) => *i != 0,
            Dynamic::Float(f) => *f != 0.0 && !f.is_nan(),
            Dynamic::Null | Dynamic::Undefined => false,
            other => return Err(mismatch(ty.tag.name(), other.type_name())),
        };
        Ok(NativeArg::Boolean(b))
    }

    fn from_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        match slot {
            NativeArg::Boolean(b) => Ok(Dynamic::Bool(*b)),
            NativeArg::Int(i) => Ok(Dynamic::Bool(*i != 0)),
            NativeArg::UInt(u) => Ok(Dynamic::Bool(*u != 0)),
            other => Err(mismatch(ty.tag.name(), other.kind_name())),
        }
    }
}

/// Range-checked fixed-width integers.
///
/// Floats are accepted when finite and are truncated toward zero before the
/// range check. Signed tags produce [`NativeArg::Int`], unsigned ones
/// [`NativeArg::UInt`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl IntegerConverter {
    fn to_i128(value: &Dynamic, target: &'static str) -> Result<i128, ConversionError> {
        match value {
            Dynamic::Int(i) => Ok(i128::from(*i)),
            Dynamic::Float(f) if f.is_finite() => {
                let truncated = f.trunc();
                if truncated < i128::MIN as f64 || truncated > i128::MAX as f64 {
                    return Err(ConversionError::FloatConversion { value: *f, target });
                }
                Ok(truncated as i128)
            }
            Dynamic::Float(f) => Err(ConversionError::FloatConversion { value: *f, target }),
            other => Err(mismatch(target, other.type_name())),
        }
    }
}

impl TypeConverter for IntegerConverter {
    fn to_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        let target = ty.tag.name();
        let Some((min, max)) = ty.tag.integer_range() else {
            return Err(ConversionError::Unsupported { tag: ty.tag });
        };

        let v = Self::to_i128(value, target)?;
        if v < min || v > max {
            return Err(ConversionError::IntegerOverflow { value: v, target });
        }

        // In range for the tag, so the casts are lossless.
        if ty.tag.is_unsigned() {
            Ok(NativeArg::UInt(v as u64))
        } else {
            Ok(NativeArg::Int(v as i64))
        }
    }

    fn from_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        match slot {
            NativeArg::Int(i) => Ok(Dynamic::Int(*i)),
            NativeArg::UInt(u) => match i64::try_from(*u) {
                Ok(i) => Ok(Dynamic::Int(i)),
                Err(_) => Ok(Dynamic::Float(*u as f64)),
            },
            other => Err(mismatch(ty.tag.name(), other.kind_name())),
        }
    }
}

/// `gfloat` and `gdouble`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl TypeConverter for FloatConverter {
    fn to_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        let target = ty.tag.name();
        let v = value
            .as_float()
            .ok_or_else(|| mismatch(target, value.type_name()))?;

        match ty.tag {
            TypeTag::Float => {
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return Err(ConversionError::FloatConversion { value: v, target });
                }
                Ok(NativeArg::Float(v as f32))
            }
            _ => Ok(NativeArg::Double(v)),
        }
    }

    fn from_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        match slot {
            NativeArg::Float(f) => Ok(Dynamic::Float(f64::from(*f))),
            NativeArg::Double(d) => Ok(Dynamic::Float(*d)),
            other => Err(mismatch(ty.tag.name(), other.kind_name())),
        }
    }
}
