// Library exports for mmcartbox

pub mod dataset;
pub mod oracle;
pub mod render;
pub mod resolve;
pub mod server;
pub mod spec;
pub mod suggest;
