//! Board and host bindings of the report loop peripherals
pub mod sim;
pub mod systick;

#[cfg(all(feature = "firmware", target_arch = "arm", target_os = "none"))]
pub mod serial;
