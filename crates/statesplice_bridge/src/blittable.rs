//! Fixed-layout value types that can cross the bridge.
//!
//! A [`Blittable`] type has a fixed byte width and a total mapping between its
//! native-endian byte representation and its value. Reading a field copies
//! exactly [`Blittable::SIZE`] bytes into a local buffer and decodes them;
//! writing encodes the value into a buffer of the same width and copies it out.

/// A fixed-layout value type copyable by raw byte reinterpretation.
///
/// Implemented for the primitive integer and float types and for `bool`.
/// `bool` decodes any non-zero byte as `true` so that a stray host byte can
/// never produce an invalid Rust `bool`.
pub trait Blittable: Copy + Send + Sync + 'static {
    /// Width of the value in bytes.
    const SIZE: usize;

    /// Decodes a value from exactly [`SIZE`](Self::SIZE) native-endian bytes.
    fn decode(bytes: &[u8]) -> Self;

    /// Encodes the value into exactly [`SIZE`](Self::SIZE) native-endian bytes.
    fn encode(self, out: &mut [u8]);
}

macro_rules! impl_blittable_for_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Blittable for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_ne_bytes(raw)
                }

                fn encode(self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_blittable_for_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl Blittable for bool {
    const SIZE: usize = 1;

    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn encode(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }
}
