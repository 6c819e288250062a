mod assets;
pub use assets::*;

mod atlas;
pub use atlas::*;

mod buffer;
pub use buffer::*;

mod camera;
pub use camera::*;

mod texture;
pub use texture::*;
