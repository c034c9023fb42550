pub mod bcd_phone;
pub mod bit_invert;
pub mod bit_reverse;
pub mod compression;
pub mod framing;
pub mod packed7;

pub use bcd_phone::BcdPhoneCodec;
pub use bit_invert::BitInvertCodec;
pub use bit_reverse::BitReverseCodec;
pub use compression::CompressionCodec;
pub use framing::FramingCodec;
pub use packed7::Packed7Codec;
