//! Task Planner - turns robot goals into ordered atomic action sequences

pub mod command;
pub mod core;
pub mod planning;
pub mod scene;
