#![allow(dead_code)] // Utils folders are bound to have some unused code.

pub mod error;
pub mod str;
pub mod vk_util;

pub use vk_util::prelude as vk_prelude;
