mod assets;
pub use assets::*;

mod atlas;
pub use atlas::*;

mod buffer;
pub use buffer::*;

mod texture;
pub use texture::*;

mod multipass;
pub use multipass::*;