#![allow(non_snake_case)]

pub mod detection;
pub mod management;
pub mod utils;
pub mod web;
