pub mod align;
pub mod batch;
pub mod classify;
pub mod forecast;
pub mod opportunities;
pub mod patterns;
pub mod strategies;
