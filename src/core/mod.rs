pub mod context;
pub mod path;
pub mod types;

pub use context::{CommandContext, CommandContextBuilder};
pub use path::{Navigator, RemotePath};
pub use types::{
    Device, DeviceId, DeviceState, EntryKind, OutputFormat, RemoteEntry, TransferDirection,
};
