//! Step definitions for generation pipeline scenarios.


mod given;
mod then;
mod when;
