pub mod manager;
pub mod remote;
pub mod session;

pub use manager::DeviceManager;
pub use remote::{Listing, RemoteFs, TreeNode};
pub use session::DeviceSession;
