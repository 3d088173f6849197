//! # GymDesk Core
//!
//! Domain types shared by the persistence layer, the HTTP API and the
//! maintenance binaries, together with the small amount of pure logic the
//! gym back-office needs: calendar ranges in the gym's timezone, attendance
//! hour totals, workout streaks and the package-name repair heuristic.

pub mod date_range;
pub mod errors;
pub mod maintenance;
pub mod models;
