pub mod absorption;
pub mod arg;
pub mod codec;
pub mod codecs;
pub mod config;
pub mod error;
pub mod registry;

pub use absorption::{AbsorbError, Absorbed, absorb, absorb_all};
pub use arg::{ByteString, CodecArg, CodecKind};
pub use codec::{Absorb, AnyCodec, Codec, DecodePolicy, new_codec};
pub use config::{CodecEntry, WeftConfig};
pub use error::{ArgError, CodecError};
pub use registry::{CodecRegistry, RegistryError};
