pub mod gateway;
pub mod link;

pub use gateway::{parse_device_body, DeviceError, DeviceGateway, HttpDeviceGateway};
pub use link::{DeviceLink, LinkStore, LinkStoreError, MemoryLinkStore};
