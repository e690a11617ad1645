pub(crate) mod device;
pub(crate) mod frame;
pub(crate) mod stream;
