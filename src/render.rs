pub mod composite;
pub mod cpu;
pub mod pipeline;
pub mod present;
pub mod sketch;
pub mod surface;
pub mod svg;
