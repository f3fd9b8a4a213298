pub mod preview;

pub use preview::Preview;
