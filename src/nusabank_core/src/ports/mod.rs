pub mod counter;
pub mod hasher;
pub mod repositories;
