pub mod consumption;
pub mod hydraulics;
pub mod parameters;
pub mod policy;
pub mod simulation;
pub mod solver;
pub mod step;
pub mod summary;
pub mod tariff;
