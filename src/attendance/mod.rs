pub mod classify;
pub mod excel;
pub mod holidays;
pub mod normalize;
pub mod report;
pub mod resolver;
pub mod writer;
