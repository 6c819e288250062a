mod gfx;
pub use gfx::*;

mod input;
pub use input::*;

mod main_loop;
pub use main_loop::*;

mod time_step;
pub use time_step::*;

mod viewport;
pub use viewport::*;
