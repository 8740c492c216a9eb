//! Domain logic for the example programs: the cooking assistant (bread, cake
//! and curry) and the mortgage restructuring analysis.

pub mod clients;
pub mod console;
pub mod cooking;
pub mod mortgage;
pub mod telemetry;

