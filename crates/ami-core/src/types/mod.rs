mod category;
mod image;
mod instance;

pub use category::*;
pub use image::*;
pub use instance::*;
