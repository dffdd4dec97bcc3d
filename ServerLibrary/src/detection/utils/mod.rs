pub mod class_map;
pub mod detection;
pub mod frame;
pub mod report;
